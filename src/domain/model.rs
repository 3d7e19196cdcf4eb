use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One CSV row. Values are positional against [`RecordTable::headers`];
/// `None` marks an empty or absent field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub values: Vec<Option<String>>,
}

impl Record {
    pub fn new(values: Vec<Option<String>>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }
}

/// An immutable table loaded from one CSV file, rows kept in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTable {
    headers: Vec<String>,
    address_index: usize,
    rows: Vec<Record>,
}

impl RecordTable {
    /// Callers guarantee `address_index < headers.len()` and that every row
    /// has exactly `headers.len()` values.
    pub(crate) fn new(headers: Vec<String>, address_index: usize, rows: Vec<Record>) -> Self {
        Self {
            headers,
            address_index,
            rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn address_column(&self) -> &str {
        &self.headers[self.address_index]
    }

    pub fn address_of<'a>(&self, record: &'a Record) -> Option<&'a str> {
        record.get(self.address_index)
    }

    /// A table with the same columns holding `rows`.
    pub fn with_rows(&self, rows: Vec<Record>) -> Self {
        Self {
            headers: self.headers.clone(),
            address_index: self.address_index,
            rows,
        }
    }
}

/// The rows of a table matching one city label.
#[derive(Debug, Clone)]
pub struct CityPartition {
    pub label: String,
    pub subset: RecordTable,
}

#[derive(Debug, Clone)]
pub struct SplitResult {
    pub total_rows: usize,
    pub partitions: Vec<CityPartition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityOutcome {
    pub label: String,
    pub matched_rows: usize,
    /// Set when a file was written (or would be, on a dry run).
    pub output_path: Option<String>,
}

/// Summary of one run, serialized with `--report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitReport {
    pub generated_at: DateTime<Utc>,
    pub input_path: String,
    pub total_rows: usize,
    pub dry_run: bool,
    pub cities: Vec<CityOutcome>,
}

impl SplitReport {
    pub fn files_written(&self) -> usize {
        self.cities.iter().filter(|c| c.output_path.is_some()).count()
    }

    pub fn to_json_pretty(&self) -> crate::utils::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
