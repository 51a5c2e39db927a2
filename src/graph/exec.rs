use super::{aggregate, build_grid, collect_records, output_calendar, output_json, output_ndjson};
use crate::api::HttpFetcher;
use crate::cli::CommonArgs;
use crate::graph::AuthorFilter;
use crate::util::{parse_week_start, resolve_range};
use anyhow::Context;
use chrono::Utc;
use console::style;

pub fn exec(
    common: CommonArgs,
    repos: Vec<String>,
    week_start: String,
    json: bool,
    ndjson: bool,
) -> anyhow::Result<()> {
    let week_start_day = parse_week_start(&week_start).context("Invalid week start day")?;

    let range = resolve_range(common.since.as_deref(), common.until.as_deref())
        .context("Failed to resolve date range")?;

    let fetcher = HttpFetcher::new(&common.api_base, common.token.clone())
        .context("Failed to build API client")?;

    // Progress spinners stay off for machine-readable output.
    let collected = collect_records(&fetcher, &common, &range, &repos, !json && !ndjson)
        .context("Failed to collect commits")?;

    let author = common.author.as_ref().map(|value| AuthorFilter {
        field: common.author_field.clone(),
        value: value.clone(),
    });
    let daily = aggregate(
        &collected.records,
        &common.date_field,
        &common.date_format,
        author.as_ref(),
    );

    let skipped = collected.skipped + daily.skipped;
    if skipped > 0 {
        eprintln!(
            "{} skipped {} record(s) with missing or malformed timestamps",
            style("warning:").yellow().bold(),
            skipped
        );
    }

    let range_start = match range.since {
        Some(since) => since.date_naive(),
        None => match daily.days.first() {
            Some(day) => day.date,
            None => {
                println!("No data to display");
                return Ok(());
            }
        },
    };
    let range_end = match range.until {
        Some(until) => until.date_naive(),
        None => Utc::now().date_naive(),
    };

    let grid = build_grid(&daily.days, range_start, range_end, week_start_day)
        .context("Failed to build calendar grid")?;

    if json {
        output_json(&grid, &common, &repos, &week_start)?;
    } else if ndjson {
        output_ndjson(&grid)?;
    } else {
        output_calendar(&grid, &common)?;
    }

    Ok(())
}
