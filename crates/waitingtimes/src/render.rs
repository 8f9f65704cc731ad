use std::path::Path;

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::ValueEnum;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use polars::prelude::*;
use serde::Serialize;
use waitingtimes_parser::{EventPrefix, EXPECTED_COLUMNS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub path: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub first_arrival: Option<String>,
    pub last_departure: Option<String>,
}

pub fn render_frame(df: &DataFrame, format: OutputFormat, limit: Option<usize>) -> Result<String> {
    let mut frame = match limit {
        Some(n) => df.head(Some(n)),
        None => df.clone(),
    };

    match format {
        OutputFormat::Table => render_table(&frame),
        OutputFormat::Json => {
            let mut buffer = Vec::new();
            JsonWriter::new(&mut buffer)
                .with_json_format(JsonFormat::Json)
                .finish(&mut frame)
                .context("failed to write JSON")?;
            buffer.push(b'\n');
            String::from_utf8(buffer).context("JSON output was not UTF-8")
        }
        OutputFormat::Csv => {
            let mut buffer = Vec::new();
            CsvWriter::new(&mut buffer)
                .include_header(true)
                .finish(&mut frame)
                .context("failed to write CSV")?;
            String::from_utf8(buffer).context("CSV output was not UTF-8")
        }
    }
}

fn render_table(df: &DataFrame) -> Result<String> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        df.get_column_names()
            .into_iter()
            .map(|name| Cell::new(name.as_str()).add_attribute(Attribute::Bold)),
    );

    for row_idx in 0..df.height() {
        let mut row = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            row.push(any_to_string(column.get(row_idx)?));
        }
        table.add_row(row);
    }

    Ok(format!("{table}\n"))
}

/// Cell text for display: nulls are blank, strings unquoted, datetimes as
/// `YYYY-MM-DD HH:MM:SS`.
fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Datetime(v, unit, _) => format_timestamp(v, unit),
        other => other.to_string(),
    }
}

fn format_timestamp(value: i64, unit: TimeUnit) -> String {
    let micros = match unit {
        TimeUnit::Nanoseconds => value / 1_000,
        TimeUnit::Microseconds => value,
        TimeUnit::Milliseconds => value.saturating_mul(1_000),
    };
    DateTime::from_timestamp_micros(micros)
        .map(|dt| dt.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| value.to_string())
}

pub fn summarize(path: &Path, df: &DataFrame) -> Result<Summary> {
    let first_arrival = datetime_extreme(df, EventPrefix::Arrival, Extreme::Min)?;
    let last_departure = datetime_extreme(df, EventPrefix::Departure, Extreme::Max)?;

    Ok(Summary {
        path: path.display().to_string(),
        rows: df.height(),
        columns: df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect(),
        first_arrival,
        last_departure,
    })
}

#[derive(Clone, Copy)]
enum Extreme {
    Min,
    Max,
}

fn datetime_extreme(df: &DataFrame, prefix: EventPrefix, extreme: Extreme) -> Result<Option<String>> {
    let physical = df
        .column(prefix.datetime_column())?
        .cast(&DataType::Int64)?;
    let values = physical.i64()?;
    let value = match extreme {
        Extreme::Min => values.min(),
        Extreme::Max => values.max(),
    };
    Ok(value.map(|micros| format_timestamp(micros, TimeUnit::Microseconds)))
}

pub fn render_summary(summary: &Summary, json: bool) -> Result<String> {
    if json {
        let mut text = serde_json::to_string_pretty(summary).context("failed to encode summary")?;
        text.push('\n');
        return Ok(text);
    }

    let mut text = String::new();
    text.push_str(&format!("File: {}\n", summary.path));
    text.push_str(&format!("Rows: {}\n", summary.rows));
    text.push_str(&format!("Columns: {}\n", summary.columns.join(", ")));
    if let Some(first) = &summary.first_arrival {
        text.push_str(&format!("First arrival: {first}\n"));
    }
    if let Some(last) = &summary.last_departure {
        text.push_str(&format!("Last departure: {last}\n"));
    }
    Ok(text)
}

pub fn schema_listing() -> String {
    let mut text = String::from("Expected input columns:\n");
    for (idx, name) in EXPECTED_COLUMNS.iter().enumerate() {
        text.push_str(&format!("  {}. {name}\n", idx + 1));
    }
    text.push_str("Derived columns:\n");
    for prefix in EventPrefix::ALL {
        text.push_str(&format!(
            "  {} = {} + ' ' + {} (day-first)\n",
            prefix.datetime_column(),
            prefix.date_column(),
            prefix.time_column()
        ));
    }
    text
}
