use crate::model::{DayCount, Record, RecordSet};
use crate::util::parse_timestamp;
use std::collections::BTreeMap;

/// Restricts counting to records whose author field contains `value`
/// (case-insensitive).
#[derive(Debug, Clone)]
pub struct AuthorFilter {
    pub field: String,
    pub value: String,
}

impl AuthorFilter {
    pub fn matches(&self, record: &Record) -> bool {
        record
            .text(&self.field)
            .map_or(false, |author| {
                author.to_lowercase().contains(&self.value.to_lowercase())
            })
    }
}

#[derive(Debug, Clone)]
pub struct DailyCounts {
    pub days: Vec<DayCount>,
    pub skipped: u32,
}

/// Group records by the calendar day of `date_field` and count them.
///
/// The author filter runs before grouping; filtering the grouped output
/// instead would fold other authors' records into the kept days. Records
/// with a missing or unparseable timestamp are skipped and counted, never
/// fatal. No zero-count days are synthesized here.
pub fn aggregate(
    records: &RecordSet,
    date_field: &str,
    date_format: &str,
    author: Option<&AuthorFilter>,
) -> DailyCounts {
    let mut day_map: BTreeMap<chrono::NaiveDate, u32> = BTreeMap::new();
    let mut skipped = 0u32;

    for record in records.iter() {
        if let Some(filter) = author {
            if !filter.matches(record) {
                continue;
            }
        }

        match record.text(date_field) {
            Some(value) => match parse_timestamp(value, date_format) {
                Ok(ts) => *day_map.entry(ts.date_naive()).or_insert(0) += 1,
                Err(_) => skipped += 1,
            },
            None => skipped += 1,
        }
    }

    let days = day_map
        .into_iter()
        .map(|(date, count)| DayCount { date, count })
        .collect();

    DailyCounts { days, skipped }
}
