//! The three steps of a split run: load the table, filter it per city label,
//! write each non-empty subset.

use crate::core::{Record, RecordTable, Storage};
use crate::utils::error::{Result, SplitError};
use std::path::Path;

pub const LABEL_PLACEHOLDER: &str = "{label}";

/// Read `source_path` through `storage` and parse it as a headered CSV.
pub async fn load<S: Storage>(
    storage: &S,
    source_path: &str,
    address_column: &str,
) -> Result<RecordTable> {
    let data = storage.read_file(source_path).await?;
    tracing::debug!("Read {} bytes from {}", data.len(), source_path);
    parse_table(source_path, &data, address_column)
}

/// Parse CSV bytes into a [`RecordTable`].
///
/// Empty fields become `None`. Short rows are padded with `None`; rows with
/// more fields than the header are rejected, as is a header without
/// `address_column`.
pub fn parse_table(source: &str, data: &[u8], address_column: &str) -> Result<RecordTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| SplitError::parse(source, e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() {
        return Err(SplitError::parse(source, "file is empty, expected a header row"));
    }

    let address_index = headers
        .iter()
        .position(|h| h == address_column)
        .ok_or_else(|| {
            SplitError::parse(
                source,
                format!("missing column '{}' (found: {})", address_column, headers.join(", ")),
            )
        })?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| SplitError::parse(source, e.to_string()))?;

        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(SplitError::parse(
                source,
                format!(
                    "line {}: expected {} fields, found {}",
                    line,
                    headers.len(),
                    record.len()
                ),
            ));
        }

        let mut values: Vec<Option<String>> = record
            .iter()
            .map(|field| (!field.is_empty()).then(|| field.to_string()))
            .collect();
        values.resize(headers.len(), None);
        rows.push(Record::new(values));
    }

    Ok(RecordTable::new(headers, address_index, rows))
}

/// Rows whose address contains `label`, compared case-insensitively.
/// Rows with no address never match. Source order is kept.
pub fn filter_by_city(table: &RecordTable, label: &str) -> RecordTable {
    let needle = label.to_lowercase();
    let rows = table
        .rows()
        .iter()
        .filter(|row| {
            table
                .address_of(row)
                .is_some_and(|address| address.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();
    table.with_rows(rows)
}

pub fn output_file_name(pattern: &str, label: &str) -> String {
    pattern.replace(LABEL_PLACEHOLDER, &label.to_lowercase())
}

pub fn output_path(output_dir: &str, pattern: &str, label: &str) -> String {
    Path::new(output_dir)
        .join(output_file_name(pattern, label))
        .to_string_lossy()
        .into_owned()
}

/// Serialize a table with its header row and no index column.
pub fn to_csv_bytes(table: &RecordTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row.values.iter().map(|v| v.as_deref().unwrap_or("")))?;
    }
    writer
        .into_inner()
        .map_err(|e| SplitError::Io(e.into_error()))
}

/// Write `subset` to the file derived from `label`. An empty subset writes
/// nothing and returns `None`; otherwise the written path is returned.
pub async fn write_if_nonempty<S: Storage>(
    storage: &S,
    subset: &RecordTable,
    label: &str,
    output_dir: &str,
    pattern: &str,
) -> Result<Option<String>> {
    if subset.is_empty() {
        tracing::debug!("No rows for {}, skipping", label);
        return Ok(None);
    }

    let path = output_path(output_dir, pattern, label);
    let data = to_csv_bytes(subset)?;
    storage.write_file(&path, &data).await?;
    tracing::debug!("Wrote {} rows ({} bytes) to {}", subset.len(), data.len(), path);
    Ok(Some(path))
}
