use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SCHEMA_VERSION: u32 = 1;

/// One fetched item (e.g. a commit). Fields are kept as the endpoint returned
/// them; hosting APIs nest their payloads, so lookups take dotted paths like
/// `commit.author.date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub fields: serde_json::Map<String, Value>,
    pub origin: Option<String>,
}

impl Record {
    pub fn new(fields: serde_json::Map<String, Value>) -> Self {
        Self { fields, origin: None }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn field(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut value = self.fields.get(segments.next()?)?;
        for segment in segments {
            value = value.as_object()?.get(segment)?;
        }
        Some(value)
    }

    pub fn text(&self, path: &str) -> Option<&str> {
        self.field(path).and_then(Value::as_str)
    }
}

/// Ordered records from one or more pages/endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSet {
    pub records: Vec<Record>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        self.records.extend(records);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Whether at least one record carries the field at `path`.
    pub fn has_field(&self, path: &str) -> bool {
        self.records.iter().any(|r| r.field(path).is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: u32,
}

/// 7×W contribution matrix. Row 0 is the configured week-start day; cell
/// (r, c) covers the date `grid_start + c*7 + r` days. Cells outside
/// `[range_start, range_end]` are boundary-week padding and always count 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarGrid {
    pub counts: Vec<Vec<u32>>,
    pub row_labels: Vec<String>,
    pub month_labels: Vec<String>,
    pub grid_start: NaiveDate,
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
}

impl CalendarGrid {
    pub fn weeks(&self) -> usize {
        self.month_labels.len()
    }

    pub fn date_at(&self, row: usize, col: usize) -> NaiveDate {
        self.grid_start + Duration::days((col * 7 + row) as i64)
    }

    pub fn count_at(&self, row: usize, col: usize) -> u32 {
        self.counts[row][col]
    }

    pub fn in_range(&self, row: usize, col: usize) -> bool {
        let date = self.date_at(row, col);
        date >= self.range_start && date <= self.range_end
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub endpoints: Vec<String>,
    pub author: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub week_start: String,
    pub grid: CalendarGrid,
}

#[derive(Debug, Clone, Serialize)]
pub struct DaysOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub endpoints: Vec<String>,
    pub author: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub days: Vec<DayCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub endpoints: Vec<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub records: Vec<Record>,
}

#[derive(Debug, Clone)]
pub struct DateRange {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new() -> Self {
        Self { since: None, until: None }
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        if let Some(since) = self.since {
            if timestamp < &since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if timestamp > &until {
                return false;
            }
        }
        true
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::new()
    }
}
