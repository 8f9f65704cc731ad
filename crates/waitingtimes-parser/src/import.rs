use std::fs;
use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::datetime::DateTimeLayout;
use crate::errors::ImportError;
use crate::model::EventPrefix;
use crate::schema::{validate_columns, EXPECTED_COLUMNS};

/// Used only when the reader cannot report a record position: the header is
/// line 1, so data row `n` (0-based) sits on line `n + 2`.
const FIRST_DATA_LINE: usize = 2;

/// Imports a patient visit CSV, checks its columns against
/// [`EXPECTED_COLUMNS`] and appends `ARRIVAL_DATETIME`, `SERVICE_DATETIME`
/// and `DEPARTURE_DATETIME`.
///
/// Source cells are kept verbatim as string columns. The derived columns are
/// naive `Datetime(Microseconds)` values parsed day-first from
/// `"<DATE> <TIME>"`.
pub fn import_patient_data(path: impl AsRef<Path>) -> Result<DataFrame, ImportError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "importing patient data");

    let content = fs::read(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_slice());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            if idx == 0 {
                name.trim_start_matches('\u{feff}').to_string()
            } else {
                name.to_string()
            }
        })
        .collect();
    if headers.is_empty() {
        return Err(ImportError::MissingHeader {
            path: path.to_path_buf(),
        });
    }

    if let Err(err) = validate_columns(&headers) {
        warn!(path = %path.display(), columns = ?headers, "patient data schema mismatch");
        return Err(err);
    }
    debug!(path = %path.display(), "patient data schema accepted");

    let mut values: Vec<Vec<String>> = vec![Vec::new(); EXPECTED_COLUMNS.len()];
    // 1-based file line of each record; blank lines and multi-line quoted
    // fields make this differ from the row index.
    let mut lines: Vec<usize> = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|pos| record_line(&content, pos.byte()))
            .unwrap_or(row_idx + FIRST_DATA_LINE);
        lines.push(line);
        for (column, cell) in values.iter_mut().zip(record.iter()) {
            column.push(cell.to_string());
        }
    }
    drop(reader);
    drop(content);

    let columns: Vec<Column> = EXPECTED_COLUMNS
        .iter()
        .zip(values.iter())
        .map(|(name, column)| Series::new((*name).into(), column.as_slice()).into())
        .collect();
    let mut df = DataFrame::new(columns)?;

    for prefix in EventPrefix::ALL {
        let derived = derive_datetime(&df, &lines, prefix)?;
        df.with_column(derived)?;
    }

    info!(
        path = %path.display(),
        rows = df.height(),
        "imported patient data"
    );
    Ok(df)
}

fn derive_datetime(
    df: &DataFrame,
    lines: &[usize],
    prefix: EventPrefix,
) -> Result<Series, ImportError> {
    let dates = df.column(prefix.date_column())?.str()?;
    let times = df.column(prefix.time_column())?.str()?;

    let combined: Vec<String> = dates
        .into_iter()
        .zip(times.into_iter())
        .map(|(date, time)| format!("{} {}", date.unwrap_or_default(), time.unwrap_or_default()))
        .collect();

    let mut micros = Vec::with_capacity(combined.len());
    if let Some(first) = combined.first() {
        let layout = DateTimeLayout::infer(first)
            .map_err(|reason| datetime_error(prefix, lines, 0, first, reason))?;
        debug!(column = prefix.datetime_column(), %layout, "inferred datetime layout");

        for (row_idx, text) in combined.iter().enumerate() {
            let parsed = layout
                .parse(text)
                .map_err(|reason| datetime_error(prefix, lines, row_idx, text, reason))?;
            micros.push(parsed.and_utc().timestamp_micros());
        }
    }

    let series = Series::new(prefix.datetime_column().into(), micros)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;
    Ok(series)
}

/// A record's position can point at skipped blank lines before it, so step
/// over line terminators before counting.
fn record_line(content: &[u8], byte: u64) -> usize {
    let mut start = usize::try_from(byte).unwrap_or(content.len()).min(content.len());
    while start < content.len() && matches!(content[start], b'\n' | b'\r') {
        start += 1;
    }
    1 + content[..start].iter().filter(|&&b| b == b'\n').count()
}

fn datetime_error(
    prefix: EventPrefix,
    lines: &[usize],
    row_idx: usize,
    value: &str,
    reason: String,
) -> ImportError {
    ImportError::DateTime {
        column: prefix.datetime_column(),
        line: lines
            .get(row_idx)
            .copied()
            .unwrap_or(row_idx + FIRST_DATA_LINE),
        value: value.to_string(),
        reason,
    }
}
