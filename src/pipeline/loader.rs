//! Dataset loader for uploaded CSV files

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use super::error::{EdaResult, ParseError};
use super::table::Table;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Cell values read as missing in every column.
pub const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn missing_markers() -> NullValues {
    NullValues::AllColumns(MISSING_MARKERS.iter().map(|m| PlSmallStr::from(*m)).collect())
}

/// Options controlling how an upload is parsed.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Number of rows used for dtype inference; 0 scans the whole file.
    pub infer_schema_length: usize,
    /// Field delimiter.
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            infer_schema_length: 10_000,
            delimiter: b',',
        }
    }
}

/// Load a CSV file from disk.
pub fn load_table(path: &Path, options: LoadOptions) -> EdaResult<Table> {
    let bytes = std::fs::read(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "read upload");
    load_table_from_bytes(&bytes, options)
}

/// Parse uploaded CSV bytes into a classified table.
///
/// Fails with a [`ParseError`] when the bytes are empty, not UTF-8, or not
/// well-formed CSV. A header without data rows yields a zero-row table.
pub fn load_table_from_bytes(bytes: &[u8], options: LoadOptions) -> EdaResult<Table> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ParseError::Empty.into());
    }
    if let Err(e) = std::str::from_utf8(bytes) {
        return Err(ParseError::Encoding {
            offset: e.valid_up_to(),
        }
        .into());
    }

    // 0 means full table scan
    let schema_length = if options.infer_schema_length == 0 {
        None
    } else {
        Some(options.infer_schema_length)
    };

    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(schema_length)
        .map_parse_options(|parse| {
            parse
                .with_separator(options.delimiter)
                .with_null_values(Some(missing_markers()))
        })
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .map_err(|e| ParseError::Malformed(e.to_string()))?;

    if frame.width() == 0 {
        return Err(ParseError::Malformed("no columns found in header".to_string()).into());
    }

    let table = Table::new(frame);
    debug!(
        rows = table.height(),
        columns = table.width(),
        numeric = table.numeric_columns().len(),
        "parsed upload"
    );
    Ok(table)
}

/// List the header names of a CSV file without parsing its data rows.
pub fn get_column_names(path: &Path, options: LoadOptions) -> EdaResult<Vec<String>> {
    let io_error = |source| ParseError::Io {
        path: path.display().to_string(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;
    let mut header = Vec::new();
    BufReader::new(file)
        .read_until(b'\n', &mut header)
        .map_err(io_error)?;

    let table = load_table_from_bytes(&header, options)?;
    Ok(table.column_names())
}
