//! Numeric helpers shared by the summary and plotting stages
//!
//! All functions take already-filtered (non-missing) values.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (ddof = 1), `None` below two values.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Sort a copy of the values ascending.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Quantile of pre-sorted values with linear interpolation between ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Quartiles (q1, median, q3) of pre-sorted values.
pub fn quartiles_sorted(sorted: &[f64]) -> Option<(f64, f64, f64)> {
    Some((
        quantile_sorted(sorted, 0.25)?,
        quantile_sorted(sorted, 0.5)?,
        quantile_sorted(sorted, 0.75)?,
    ))
}

/// Upper bound on the number of histogram bins.
pub const MAX_BINS: usize = 1_000;

/// Histogram bin edges using the numpy "auto" rule.
///
/// The bin width is the smaller of the Sturges and Freedman-Diaconis
/// widths, falling back to Sturges when the IQR is zero. A constant sample
/// gets a single bin of width 1 centred on the value. Non-finite values are
/// ignored.
pub fn auto_bin_edges(values: &[f64]) -> Vec<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Vec::new();
    }
    let s = sorted(&finite);
    let (min, max) = (s[0], s[s.len() - 1]);
    if max - min == 0.0 {
        return vec![min - 0.5, min + 0.5];
    }

    let n = s.len() as f64;
    let range = max - min;
    let sturges_width = range / (n.log2() + 1.0);
    let iqr = match quartiles_sorted(&s) {
        Some((q1, _, q3)) => q3 - q1,
        None => 0.0,
    };
    let fd_width = 2.0 * iqr * n.powf(-1.0 / 3.0);
    let width = if fd_width > 0.0 {
        fd_width.min(sturges_width)
    } else {
        sturges_width
    };

    let bins = ((range / width).ceil() as usize).clamp(1, MAX_BINS);
    let step = range / bins as f64;
    // Pin the last edge to the maximum so it is never lost to rounding
    (0..=bins)
        .map(|i| if i == bins { max } else { min + step * i as f64 })
        .collect()
}

/// Count values per bin. The last bin is closed on the right.
pub fn bin_counts(values: &[f64], edges: &[f64]) -> Vec<usize> {
    if edges.len() < 2 {
        return Vec::new();
    }
    let bins = edges.len() - 1;
    let (lo, hi) = (edges[0], edges[bins]);
    let mut counts = vec![0usize; bins];
    for &v in values {
        if v < lo || v > hi {
            continue;
        }
        let idx = if v == hi {
            bins - 1
        } else {
            edges.partition_point(|&e| e <= v).saturating_sub(1).min(bins - 1)
        };
        counts[idx] += 1;
    }
    counts
}

/// Scott's rule bandwidth for a Gaussian kernel.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let sd = std_dev(values)?;
    if sd == 0.0 {
        return None;
    }
    Some(sd * (values.len() as f64).powf(-0.2))
}

/// Gaussian kernel density estimate evaluated at `points` (integrates to 1).
pub fn gaussian_kde(values: &[f64], bandwidth: f64, points: &[f64]) -> Vec<f64> {
    let n = values.len() as f64;
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    points
        .iter()
        .map(|&x| {
            values
                .iter()
                .map(|&v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm
        })
        .collect()
}

/// `count` evenly spaced points from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_dev_sample() {
        // Var = 10 / 4 = 2.5
        let sd = std_dev(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!((sd - 2.5f64.sqrt()).abs() < 1e-12);
        assert!(std_dev(&[5.0]).is_none());
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        let s = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&s, 0.25), Some(1.75));
        assert_eq!(quantile_sorted(&s, 0.5), Some(2.5));
        assert_eq!(quantile_sorted(&s, 1.0), Some(4.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn test_auto_bins_cover_range() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let edges = auto_bin_edges(&values);
        assert!(edges.len() >= 2);
        assert_eq!(edges[0], 0.0);
        assert!((edges[edges.len() - 1] - 99.0).abs() < 1e-9);

        let counts = bin_counts(&values, &edges);
        assert_eq!(counts.iter().sum::<usize>(), 100);
    }

    #[test]
    fn test_auto_bins_ignore_infinite_values() {
        let mut values: Vec<f64> = (1..=9).map(f64::from).collect();
        values.push(f64::INFINITY);
        values.push(f64::NEG_INFINITY);

        let edges = auto_bin_edges(&values);
        assert_eq!(edges[0], 1.0);
        assert_eq!(edges[edges.len() - 1], 9.0);
        assert!(auto_bin_edges(&[f64::INFINITY, f64::NAN]).is_empty());
    }

    #[test]
    fn test_auto_bins_are_capped() {
        // Tiny IQR against a huge range
        let mut values: Vec<f64> = (0..1000).map(|i| i as f64 * 1e-6).collect();
        values.push(1e12);
        let edges = auto_bin_edges(&values);
        assert_eq!(edges.len(), MAX_BINS + 1);
        assert_eq!(edges[MAX_BINS], 1e12);
    }

    #[test]
    fn test_auto_bins_constant() {
        let edges = auto_bin_edges(&[3.0, 3.0, 3.0]);
        assert_eq!(edges, vec![2.5, 3.5]);
        assert_eq!(bin_counts(&[3.0, 3.0, 3.0], &edges), vec![3]);
    }

    #[test]
    fn test_kde_integrates_to_one() {
        let values = [1.0, 2.0, 2.5, 3.0, 7.0];
        let bw = scott_bandwidth(&values).unwrap();
        let grid = linspace(-20.0, 30.0, 2001);
        let density = gaussian_kde(&values, bw, &grid);
        let step = grid[1] - grid[0];
        let area: f64 = density.iter().sum::<f64>() * step;
        assert!((area - 1.0).abs() < 1e-3, "area was {area}");
    }

    #[test]
    fn test_scott_bandwidth_constant_is_none() {
        assert!(scott_bandwidth(&[2.0, 2.0, 2.0]).is_none());
    }
}
