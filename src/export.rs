use crate::api::HttpFetcher;
use crate::cli::CommonArgs;
use crate::error::Result;
use crate::graph::{collect_records, AuthorFilter};
use crate::model::{DateRange, ExportOutput, Record, RecordSet, SCHEMA_VERSION};
use crate::util::{parse_timestamp, resolve_range};
use anyhow::Context;
use chrono::Utc;
use std::collections::HashSet;

pub fn exec(common: CommonArgs, repos: Vec<String>, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let range = resolve_range(common.since.as_deref(), common.until.as_deref())
        .context("Failed to resolve date range")?;

    let fetcher = HttpFetcher::new(&common.api_base, common.token.clone())
        .context("Failed to build API client")?;

    let collected = collect_records(&fetcher, &common, &range, &repos, !json && !ndjson)
        .context("Failed to collect commits")?;

    let export_data = prepare_export_data(&collected.records, &common, &range)
        .context("Failed to prepare export data")?;

    if json {
        output_json(&export_data, &common, &repos)?;
    } else if ndjson {
        output_ndjson(&export_data)?;
    } else {
        output_summary(&export_data, &common)?;
    }

    Ok(())
}

fn prepare_export_data(
    records: &RecordSet,
    common: &CommonArgs,
    range: &DateRange,
) -> Result<Vec<Record>> {
    let author = common.author.as_ref().map(|value| AuthorFilter {
        field: common.author_field.clone(),
        value: value.clone(),
    });

    let mut entries: Vec<Record> = Vec::with_capacity(records.len());
    for record in records.iter() {
        if let Some(filter) = &author {
            if !filter.matches(record) {
                continue;
            }
        }
        if let Some(value) = record.text(&common.date_field) {
            if let Ok(ts) = parse_timestamp(value, &common.date_format) {
                if !range.contains(&ts) {
                    continue;
                }
            }
        }
        entries.push(record.clone());
    }

    // RFC3339 strings sort chronologically as-is.
    entries.sort_by(|a, b| {
        a.text(&common.date_field)
            .unwrap_or("")
            .cmp(b.text(&common.date_field).unwrap_or(""))
    });
    Ok(entries)
}

fn output_json(export_data: &[Record], common: &CommonArgs, repos: &[String]) -> anyhow::Result<()> {
    let output = ExportOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        endpoints: repos.to_vec(),
        since: common.since.clone(),
        until: common.until.clone(),
        records: export_data.to_vec(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_ndjson(export_data: &[Record]) -> anyhow::Result<()> {
    for record in export_data {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

fn output_summary(export_data: &[Record], common: &CommonArgs) -> anyhow::Result<()> {
    use console::style;

    println!("{}", style("Export Summary").bold());
    println!("{}", "─".repeat(50));

    let total_records = export_data.len();
    let origins: HashSet<_> = export_data.iter().filter_map(|r| r.origin.as_deref()).collect();

    println!("Total records: {}", style(total_records).cyan());
    println!("Endpoints: {}", style(origins.len()).cyan());

    if let (Some(first), Some(last)) = (export_data.first(), export_data.last()) {
        if let (Some(start), Some(end)) = (
            first.text(&common.date_field),
            last.text(&common.date_field),
        ) {
            println!(
                "Date range: {} to {}",
                style(start).dim(),
                style(end).dim()
            );
        }
    }

    println!("\nUse --json or --ndjson flags to export the raw data.");
    Ok(())
}
