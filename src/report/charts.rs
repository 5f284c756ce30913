//! SVG chart rendering with plotters
//!
//! Every function returns a complete `<svg>` document as a string. Charts
//! with numeric axes use plotters' cartesian charts; heatmaps and the count
//! plot are laid out directly in pixel coordinates.

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::pipeline::{
    CorrelationMatrix, CountPlot, DistributionReport, MissingMatrix, PairGrid, ViolinShape,
};
use crate::pipeline::stats::{auto_bin_edges, bin_counts};

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

const FONT: &str = "sans-serif";
const WIDTH: u32 = 800;
const PLOT_HEIGHT: u32 = 360;

/// Categorical palette (seaborn "deep").
const PALETTE: [RGBColor; 10] = [
    RGBColor(76, 114, 176),
    RGBColor(221, 132, 82),
    RGBColor(85, 168, 104),
    RGBColor(196, 78, 82),
    RGBColor(129, 114, 179),
    RGBColor(147, 120, 96),
    RGBColor(218, 139, 195),
    RGBColor(140, 140, 140),
    RGBColor(204, 185, 116),
    RGBColor(100, 181, 205),
];

const MISSING_COLOR: RGBColor = RGBColor(253, 231, 37);
const PRESENT_COLOR: RGBColor = RGBColor(68, 1, 84);
const UNDEFINED_COLOR: RGBColor = RGBColor(235, 235, 235);

pub fn group_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

fn render_svg<F>(size: (u32, u32), draw: F) -> Result<String>
where
    F: FnOnce(&Area<'_>) -> Result<()>,
{
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }
    Ok(buf)
}

fn text_style(size: u32, color: RGBColor, h: HPos, v: VPos) -> TextStyle<'static> {
    (FONT, size).into_font().color(&color).pos(Pos::new(h, v))
}

fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let kept: String = label.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

/// Pad a degenerate range so plotters gets a non-empty axis.
fn padded(lo: f64, hi: f64, frac: f64) -> (f64, f64) {
    if hi - lo <= f64::EPSILON {
        (lo - 0.5, hi + 0.5)
    } else {
        let pad = (hi - lo) * frac;
        (lo - pad, hi + pad)
    }
}

/// A placeholder chart carrying only a title and a message.
pub fn message_svg(title: &str, message: &str) -> Result<String> {
    render_svg((WIDTH, 120), |root| {
        let w = WIDTH as i32;
        root.draw(&Text::new(
            title.to_string(),
            (w / 2, 30),
            text_style(18, BLACK, HPos::Center, VPos::Center),
        ))?;
        root.draw(&Text::new(
            message.to_string(),
            (w / 2, 75),
            text_style(14, RGBColor(110, 110, 110), HPos::Center, VPos::Center),
        ))?;
        Ok(())
    })
}

/// Row-by-column missing-value heatmap.
pub fn missing_heatmap_svg(matrix: &MissingMatrix) -> Result<String> {
    let title = "Missing Values Heatmap";
    if matrix.rows == 0 || matrix.columns.is_empty() {
        return message_svg(title, "The table has no rows.");
    }

    let (left, top, bottom, right) = (60i32, 50i32, 70i32, 20i32);
    let height = 420u32;
    let plot_w = WIDTH as i32 - left - right;
    let plot_h = height as i32 - top - bottom;
    let n_cols = matrix.columns.len();
    let col_w = plot_w as f64 / n_cols as f64;
    let row_y = |row: usize| top + (row as f64 / matrix.rows as f64 * plot_h as f64).round() as i32;

    render_svg((WIDTH, height), |root| {
        root.draw(&Text::new(
            title.to_string(),
            (WIDTH as i32 / 2, 22),
            text_style(18, BLACK, HPos::Center, VPos::Center),
        ))?;
        root.draw(&Rectangle::new(
            [(left, top), (left + plot_w, top + plot_h)],
            PRESENT_COLOR.filled(),
        ))?;

        for col in 0..n_cols {
            let x0 = left + (col as f64 * col_w).round() as i32;
            let x1 = left + ((col + 1) as f64 * col_w).round() as i32;
            for (start, len) in matrix.runs(col) {
                let y0 = row_y(start);
                // keep single missing rows visible on tall tables
                let y1 = row_y(start + len).max(y0 + 1);
                root.draw(&Rectangle::new([(x0, y0), (x1, y1)], MISSING_COLOR.filled()))?;
            }

            let max_chars = ((col_w / 7.0) as usize).max(3);
            root.draw(&Text::new(
                truncate_label(&matrix.columns[col], max_chars),
                ((x0 + x1) / 2, top + plot_h + 14),
                text_style(11, BLACK, HPos::Center, VPos::Center),
            ))?;
        }

        // row ticks
        let ticks = matrix.rows.min(5);
        for t in 0..ticks {
            let row = if ticks <= 1 {
                0
            } else {
                t * (matrix.rows - 1) / (ticks - 1)
            };
            let y = row_y(row) + (plot_h as f64 / matrix.rows as f64 / 2.0) as i32;
            root.draw(&Text::new(
                row.to_string(),
                (left - 6, y),
                text_style(10, BLACK, HPos::Right, VPos::Center),
            ))?;
        }

        // legend
        let ly = height as i32 - 22;
        root.draw(&Rectangle::new([(left, ly - 6), (left + 12, ly + 6)], PRESENT_COLOR.filled()))?;
        root.draw(&Text::new(
            "present".to_string(),
            (left + 18, ly),
            text_style(11, BLACK, HPos::Left, VPos::Center),
        ))?;
        root.draw(&Rectangle::new(
            [(left + 90, ly - 6), (left + 102, ly + 6)],
            MISSING_COLOR.filled(),
        ))?;
        root.draw(&Text::new(
            "missing".to_string(),
            (left + 108, ly),
            text_style(11, BLACK, HPos::Left, VPos::Center),
        ))?;
        Ok(())
    })
}

/// Histogram with a density curve per hue group.
pub fn histogram_svg(report: &DistributionReport) -> Result<String> {
    let title = format!("Histogram {}", report.column);
    let hist = &report.histogram;
    if hist.is_empty() {
        return message_svg(&title, "No values to plot.");
    }

    let x0 = hist.edges[0];
    let x1 = hist.edges[hist.edges.len() - 1];
    let kde_max = hist
        .groups
        .iter()
        .filter_map(|g| g.kde.as_ref())
        .flat_map(|k| k.iter().map(|(_, y)| *y))
        .fold(0.0, f64::max);
    let y_max = (hist.max_count() as f64).max(kde_max).max(1.0) * 1.1;
    let layered = hist.groups.len() > 1;

    render_svg((WIDTH, PLOT_HEIGHT), |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(&title, (FONT, 20))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(55)
            .build_cartesian_2d(x0..x1, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(report.column.as_str())
            .y_desc("Count")
            .draw()?;

        for (gi, group) in hist.groups.iter().enumerate() {
            let color = group_color(gi);
            let alpha = if layered { 0.45 } else { 0.7 };
            let label = group.label.clone().unwrap_or_else(|| report.column.clone());

            chart
                .draw_series(hist.edges.windows(2).zip(&group.counts).map(|(w, &c)| {
                    Rectangle::new([(w[0], 0.0), (w[1], c as f64)], color.mix(alpha).filled())
                }))?
                .label(label)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));

            if let Some(kde) = &group.kde {
                chart.draw_series(LineSeries::new(kde.iter().copied(), color.stroke_width(2)))?;
            }
        }

        if layered {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.85))
                .border_style(BLACK)
                .position(SeriesLabelPosition::UpperRight)
                .draw()?;
        }
        Ok(())
    })
}

/// Shared value axis for the box and violin panels.
fn value_axis(report: &DistributionReport) -> (f64, f64) {
    let (lo, hi) = report.value_range().unwrap_or((0.0, 1.0));
    padded(lo, hi, 0.05)
}

fn panel_label(label: &Option<String>, fallback: &str) -> String {
    truncate_label(label.as_deref().unwrap_or(fallback), 24)
}

/// Boxplot, one panel per hue group.
pub fn boxplot_svg(report: &DistributionReport) -> Result<String> {
    let title = format!("Boxplot {}", report.column);
    if report.boxes.is_empty() {
        return message_svg(&title, "No values to plot.");
    }
    let (y0, y1) = value_axis(report);

    render_svg((WIDTH, PLOT_HEIGHT), |root| {
        let body = root.titled(&title, (FONT, 20))?;
        let panels = body.split_evenly((1, report.boxes.len()));

        for (gi, (panel, stats)) in panels.iter().zip(&report.boxes).enumerate() {
            let color = group_color(gi);
            let mut chart = ChartBuilder::on(panel)
                .caption(panel_label(&stats.label, &report.column), (FONT, 13))
                .margin(8)
                .x_label_area_size(10)
                .y_label_area_size(if gi == 0 { 55 } else { 35 })
                .build_cartesian_2d(-1f64..1f64, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_x_axis()
                .y_desc(if gi == 0 { report.column.as_str() } else { "" })
                .draw()?;

            let half = 0.4;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(-half, stats.q1), (half, stats.q3)],
                color.mix(0.75).filled(),
            )))?;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(-half, stats.q1), (half, stats.q3)],
                BLACK.stroke_width(1),
            )))?;
            chart.draw_series(
                [
                    vec![(-half, stats.median), (half, stats.median)],
                    vec![(0.0, stats.q3), (0.0, stats.whisker_high)],
                    vec![(0.0, stats.q1), (0.0, stats.whisker_low)],
                    vec![(-half / 2.0, stats.whisker_high), (half / 2.0, stats.whisker_high)],
                    vec![(-half / 2.0, stats.whisker_low), (half / 2.0, stats.whisker_low)],
                ]
                .into_iter()
                .map(|points| PathElement::new(points, BLACK.stroke_width(2))),
            )?;
            chart.draw_series(
                stats
                    .outliers
                    .iter()
                    .map(|&v| Circle::new((0.0, v), 3, BLACK.stroke_width(1))),
            )?;
        }
        Ok(())
    })
}

fn violin_outline(violin: &ViolinShape, half_width: f64) -> Option<Vec<(f64, f64)>> {
    let density = violin.density.as_ref()?;
    let max = violin.max_density();
    if max <= 0.0 {
        return None;
    }
    let right = density.iter().map(|&(y, d)| (d / max * half_width, y));
    let left = density.iter().rev().map(|&(y, d)| (-d / max * half_width, y));
    Some(right.chain(left).collect())
}

/// Violin plot, one panel per hue group.
pub fn violin_svg(report: &DistributionReport) -> Result<String> {
    let title = format!("Violin Plot {}", report.column);
    if report.violins.is_empty() {
        return message_svg(&title, "No values to plot.");
    }
    let (y0, y1) = value_axis(report);

    render_svg((WIDTH, PLOT_HEIGHT), |root| {
        let body = root.titled(&title, (FONT, 20))?;
        let panels = body.split_evenly((1, report.violins.len()));

        for (gi, (panel, violin)) in panels.iter().zip(&report.violins).enumerate() {
            let color = group_color(gi);
            let stats = &violin.summary;
            let mut chart = ChartBuilder::on(panel)
                .caption(panel_label(&stats.label, &report.column), (FONT, 13))
                .margin(8)
                .x_label_area_size(10)
                .y_label_area_size(if gi == 0 { 55 } else { 35 })
                .build_cartesian_2d(-1f64..1f64, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_x_axis()
                .y_desc(if gi == 0 { report.column.as_str() } else { "" })
                .draw()?;

            if let Some(outline) = violin_outline(violin, 0.8) {
                chart.draw_series(std::iter::once(Polygon::new(
                    outline.clone(),
                    color.mix(0.75).filled(),
                )))?;
                chart.draw_series(std::iter::once(PathElement::new(
                    outline,
                    BLACK.stroke_width(1),
                )))?;
            }

            // inner box
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(0.0, stats.whisker_low), (0.0, stats.whisker_high)],
                BLACK.stroke_width(1),
            )))?;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(-0.05, stats.q1), (0.05, stats.q3)],
                RGBColor(60, 60, 60).filled(),
            )))?;
            chart.draw_series(std::iter::once(Circle::new(
                (0.0, stats.median),
                3,
                WHITE.filled(),
            )))?;
        }
        Ok(())
    })
}

/// Scatter matrix with marginal histograms on the diagonal.
pub fn pair_grid_svg(grid: &PairGrid) -> Result<String> {
    let title = "Pairplot of Numeric Data";
    if grid.rows_used == 0 {
        return message_svg(title, "No rows without missing values remain for the pairplot.");
    }

    let n = grid.columns.len();
    let cell = (900 / n as u32).clamp(110, 220);
    let size = cell * n as u32;
    let ranges: Vec<(f64, f64)> = grid
        .data
        .iter()
        .map(|col| {
            let lo = col.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = col.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            padded(lo, hi, 0.05)
        })
        .collect();

    render_svg((size, size + 40), |root| {
        let body = root.titled(title, (FONT, 20))?;
        let areas = body.split_evenly((n, n));

        for (idx, area) in areas.iter().enumerate() {
            let (row, col) = (idx / n, idx % n);
            let (x0, x1) = ranges[col];
            let x_desc = if row == n - 1 { grid.columns[col].as_str() } else { "" };
            let y_desc = if col == 0 { grid.columns[row].as_str() } else { "" };

            if row == col {
                let values = &grid.data[col];
                let edges = auto_bin_edges(values);
                let counts = bin_counts(values, &edges);
                let y_max = counts.iter().copied().max().unwrap_or(1).max(1) as f64 * 1.1;
                let (hx0, hx1) = padded(edges[0], edges[edges.len() - 1], 0.0);

                let mut chart = ChartBuilder::on(area)
                    .margin(4)
                    .x_label_area_size(if row == n - 1 { 30 } else { 4 })
                    .y_label_area_size(if col == 0 { 40 } else { 4 })
                    .build_cartesian_2d(hx0..hx1, 0f64..y_max)?;
                chart
                    .configure_mesh()
                    .disable_mesh()
                    .x_labels(3)
                    .y_labels(3)
                    .x_desc(x_desc)
                    .y_desc(y_desc)
                    .draw()?;
                chart.draw_series(edges.windows(2).zip(&counts).map(|(w, &c)| {
                    Rectangle::new([(w[0], 0.0), (w[1], c as f64)], group_color(0).mix(0.8).filled())
                }))?;
            } else {
                let (y0, y1) = ranges[row];
                let mut chart = ChartBuilder::on(area)
                    .margin(4)
                    .x_label_area_size(if row == n - 1 { 30 } else { 4 })
                    .y_label_area_size(if col == 0 { 40 } else { 4 })
                    .build_cartesian_2d(x0..x1, y0..y1)?;
                chart
                    .configure_mesh()
                    .disable_mesh()
                    .x_labels(3)
                    .y_labels(3)
                    .x_desc(x_desc)
                    .y_desc(y_desc)
                    .draw()?;
                chart.draw_series(
                    grid.scatter(row, col)
                        .into_iter()
                        .map(|p| Circle::new(p, 2, group_color(0).mix(0.7).filled())),
                )?;
            }
        }
        Ok(())
    })
}

/// Horizontal count plot with annotated bars.
pub fn count_plot_svg(plot: &CountPlot) -> Result<String> {
    let title = format!("Count Plot {}", plot.column);
    if plot.categories.is_empty() {
        return message_svg(&title, "No values to plot.");
    }

    let bar_h = 16i32;
    let gap = 10i32;
    let n_groups = plot.groups.len() as i32;
    let row_h = bar_h * n_groups + gap;
    let (left, top, right) = (170i32, 50i32, 70i32);
    let legend_h = if plot.hue.is_some() { 30 } else { 0 };
    let height = (top + row_h * plot.categories.len() as i32 + 30 + legend_h) as u32;
    let bar_area = WIDTH as i32 - left - right;
    let max = plot.max_count().max(1) as f64;

    render_svg((WIDTH, height), |root| {
        root.draw(&Text::new(
            title.clone(),
            (WIDTH as i32 / 2, 22),
            text_style(18, BLACK, HPos::Center, VPos::Center),
        ))?;
        root.draw(&PathElement::new(
            vec![(left, top - 4), (left, top + row_h * plot.categories.len() as i32)],
            BLACK.stroke_width(1),
        ))?;

        for (ci, category) in plot.categories.iter().enumerate() {
            let row_top = top + ci as i32 * row_h;
            root.draw(&Text::new(
                truncate_label(category, 22),
                (left - 8, row_top + (bar_h * n_groups) / 2),
                text_style(12, BLACK, HPos::Right, VPos::Center),
            ))?;

            for (gi, &count) in plot.counts[ci].iter().enumerate() {
                let y0 = row_top + gi as i32 * bar_h;
                let len = (count as f64 / max * bar_area as f64).round() as i32;
                root.draw(&Rectangle::new(
                    [(left, y0 + 1), (left + len, y0 + bar_h - 1)],
                    group_color(gi).filled(),
                ))?;
                root.draw(&Text::new(
                    count.to_string(),
                    (left + len + 4, y0 + bar_h / 2),
                    text_style(11, BLACK, HPos::Left, VPos::Center),
                ))?;
            }
        }

        root.draw(&Text::new(
            "count".to_string(),
            (left + bar_area / 2, top + row_h * plot.categories.len() as i32 + 14),
            text_style(12, BLACK, HPos::Center, VPos::Center),
        ))?;

        if let Some(hue) = &plot.hue {
            let ly = height as i32 - 16;
            let mut x = left;
            root.draw(&Text::new(
                format!("{}:", hue),
                (x, ly),
                text_style(11, BLACK, HPos::Left, VPos::Center),
            ))?;
            x += 10 + 7 * hue.chars().count() as i32;
            for (gi, group) in plot.groups.iter().enumerate() {
                let label = truncate_label(group, 16);
                root.draw(&Rectangle::new([(x, ly - 6), (x + 12, ly + 6)], group_color(gi).filled()))?;
                root.draw(&Text::new(
                    label.clone(),
                    (x + 16, ly),
                    text_style(11, BLACK, HPos::Left, VPos::Center),
                ))?;
                x += 30 + 7 * label.chars().count() as i32;
            }
        }
        Ok(())
    })
}

/// Interpolate the diverging "coolwarm" map for a value in [-1, 1].
pub fn coolwarm(value: f64) -> RGBColor {
    const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

    let t = value.clamp(-1.0, 1.0);
    let (from, to, f) = if t < 0.0 { (MID, COOL, -t) } else { (MID, WARM, t) };
    let lerp = |a: f64, b: f64| (a + (b - a) * f).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

/// Annotated correlation heatmap with coefficients to two decimals.
pub fn correlation_heatmap_svg(matrix: &CorrelationMatrix) -> Result<String> {
    let title = "Correlation Heatmap";
    let n = matrix.len();
    if n == 0 {
        return message_svg(title, "No numeric columns.");
    }

    let cell = (560 / n as i32).clamp(18, 70);
    let (left, top) = (140i32, 50i32);
    let grid = cell * n as i32;
    let width = (left + grid + 110) as u32;
    let height = (top + grid + 50) as u32;
    let font = (cell / 4).clamp(8, 13) as u32;

    render_svg((width, height), |root| {
        root.draw(&Text::new(
            title.to_string(),
            (width as i32 / 2, 22),
            text_style(18, BLACK, HPos::Center, VPos::Center),
        ))?;

        for i in 0..n {
            let y = top + i as i32 * cell;
            root.draw(&Text::new(
                truncate_label(&matrix.columns()[i], 18),
                (left - 6, y + cell / 2),
                text_style(11, BLACK, HPos::Right, VPos::Center),
            ))?;
            root.draw(&Text::new(
                truncate_label(&matrix.columns()[i], (cell / 7).max(3) as usize),
                (left + i as i32 * cell + cell / 2, top + grid + 12),
                text_style(11, BLACK, HPos::Center, VPos::Center),
            ))?;

            for j in 0..n {
                let x = left + j as i32 * cell;
                let value = matrix.get(i, j);
                let fill = value.map(coolwarm).unwrap_or(UNDEFINED_COLOR);
                root.draw(&Rectangle::new([(x, y), (x + cell, y + cell)], fill.filled()))?;
                let (label, ink) = match value {
                    Some(v) if v.abs() > 0.6 => (format!("{:.2}", v), WHITE),
                    Some(v) => (format!("{:.2}", v), BLACK),
                    None => ("nan".to_string(), BLACK),
                };
                root.draw(&Text::new(
                    label,
                    (x + cell / 2, y + cell / 2),
                    text_style(font, ink, HPos::Center, VPos::Center),
                ))?;
            }
        }

        // color bar
        let bar_x = left + grid + 30;
        let steps = 40;
        let step_h = grid as f64 / steps as f64;
        for s in 0..steps {
            let value = 1.0 - 2.0 * (s as f64 + 0.5) / steps as f64;
            let y0 = top + (s as f64 * step_h).round() as i32;
            let y1 = top + ((s + 1) as f64 * step_h).round() as i32;
            root.draw(&Rectangle::new([(bar_x, y0), (bar_x + 16, y1)], coolwarm(value).filled()))?;
        }
        for (value, y) in [(1.0, top), (0.0, top + grid / 2), (-1.0, top + grid)] {
            root.draw(&Text::new(
                format!("{:.1}", value),
                (bar_x + 22, y),
                text_style(10, BLACK, HPos::Left, VPos::Center),
            ))?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coolwarm_endpoints() {
        assert_eq!(coolwarm(-1.0), RGBColor(59, 76, 192));
        assert_eq!(coolwarm(0.0), RGBColor(221, 221, 221));
        assert_eq!(coolwarm(1.0), RGBColor(180, 4, 38));
        assert_eq!(coolwarm(5.0), coolwarm(1.0));
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("short", 10), "short");
        assert_eq!(truncate_label("a_long_column_name", 6), "a_lon…");
    }

    #[test]
    fn test_message_svg_contains_text() {
        let svg = message_svg("Pairplot", "not enough columns").unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("not enough columns"));
    }
}
