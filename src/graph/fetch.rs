use crate::api::{collect_with_progress, commits_endpoint, DateThreshold, PageFetcher};
use crate::cli::CommonArgs;
use crate::error::Result;
use crate::model::{DateRange, RecordSet};

#[derive(Debug, Clone)]
pub struct CollectSummary {
    pub records: RecordSet,
    pub pages: u32,
    pub skipped: u32,
}

/// Collect every requested repository into one record set. Endpoints are
/// walked one at a time so each keeps its strict page order; `range.since`
/// doubles as the pagination cutoff.
pub fn collect_records(
    fetcher: &dyn PageFetcher,
    common: &CommonArgs,
    range: &DateRange,
    repos: &[String],
    show_progress: bool,
) -> Result<CollectSummary> {
    let threshold = range.since.map(|cutoff| DateThreshold {
        field: common.date_field.clone(),
        format: common.date_format.clone(),
        cutoff,
    });

    let mut records = RecordSet::new();
    let mut pages = 0u32;
    let mut skipped = 0u32;

    for slug in repos {
        let endpoint = commits_endpoint(slug)?;
        let collected = collect_with_progress(
            fetcher,
            &endpoint,
            common.page_size,
            threshold.as_ref(),
            show_progress,
        )?;
        records.extend(collected.records.records);
        pages += collected.pages;
        skipped += collected.skipped;
    }

    Ok(CollectSummary { records, pages, skipped })
}
