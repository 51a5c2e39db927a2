use super::PageFetcher;
use crate::error::{GridError, Result};
use crate::model::RecordSet;
use crate::util::parse_timestamp;
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};

/// Hard cap the hosting API puts on `per_page`; larger requests are silently
/// capped, not rejected.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Cutoff for threshold early-stop. The boundary is strictly exclusive on
/// both sides: only records strictly older than `cutoff` trigger the stop,
/// and records stamped exactly at `cutoff` are dropped by the filter. Callers
/// who want an inclusive window must back the cutoff off by one second.
#[derive(Debug, Clone)]
pub struct DateThreshold {
    pub field: String,
    pub format: String,
    pub cutoff: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Collected {
    pub records: RecordSet,
    pub pages: u32,
    pub skipped: u32,
}

pub fn collect(
    fetcher: &dyn PageFetcher,
    endpoint: &str,
    page_size: u32,
    threshold: Option<&DateThreshold>,
) -> Result<Collected> {
    collect_with_progress(fetcher, endpoint, page_size, threshold, false)
}

pub fn collect_with_progress(
    fetcher: &dyn PageFetcher,
    endpoint: &str,
    page_size: u32,
    threshold: Option<&DateThreshold>,
    show_progress: bool,
) -> Result<Collected> {
    if endpoint.trim().is_empty() {
        return Err(GridError::InvalidArgument(
            "Endpoint must not be empty".to_string(),
        ));
    }
    if page_size == 0 {
        return Err(GridError::InvalidArgument(
            "Page size must be positive".to_string(),
        ));
    }
    let page_size = page_size.min(MAX_PAGE_SIZE);

    let pb = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut records = RecordSet::new();
    let mut pages = 0u32;
    let mut skipped = 0u32;
    let mut page = 1u32;

    // Pages must arrive in order: the stop check below relies on the API's
    // reverse-chronological default, so page N+1 is never requested before
    // page N has been merged and checked.
    loop {
        pb.set_message(format!("Fetching page {page} of {endpoint}"));
        let rows = fetcher.fetch_page(endpoint, page, page_size)?;
        let full_page = rows.len() as u32 == page_size;
        records.extend(rows);
        pages += 1;

        let mut crossed = false;
        if let Some(threshold) = threshold {
            if records.has_field(&threshold.field) && crossed_threshold(&records, threshold) {
                skipped += retain_after(&mut records, threshold);
                crossed = true;
            }
        }

        if crossed || !full_page {
            break;
        }
        page += 1;
    }

    pb.finish_and_clear();
    Ok(Collected { records, pages, skipped })
}

fn crossed_threshold(records: &RecordSet, threshold: &DateThreshold) -> bool {
    records.iter().any(|record| {
        record
            .text(&threshold.field)
            .and_then(|value| parse_timestamp(value, &threshold.format).ok())
            .map_or(false, |ts| ts < threshold.cutoff)
    })
}

/// Keep only records stamped strictly after the cutoff. Records whose date
/// field is missing or unparseable are dropped too; the returned count covers
/// only those, not the intentionally-filtered old records.
fn retain_after(records: &mut RecordSet, threshold: &DateThreshold) -> u32 {
    let mut malformed = 0u32;
    records.records.retain(|record| match record.text(&threshold.field) {
        Some(value) => match parse_timestamp(value, &threshold.format) {
            Ok(ts) => ts > threshold.cutoff,
            Err(_) => {
                malformed += 1;
                false
            }
        },
        None => {
            malformed += 1;
            false
        }
    });
    malformed
}
