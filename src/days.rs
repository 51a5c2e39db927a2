use crate::api::HttpFetcher;
use crate::cli::CommonArgs;
use crate::graph::{aggregate, collect_records, AuthorFilter};
use crate::model::{DateRange, DayCount, DaysOutput, SCHEMA_VERSION};
use crate::util::resolve_range;
use anyhow::Context;
use chrono::Utc;
use console::style;

pub fn exec(common: CommonArgs, repos: Vec<String>, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let range = resolve_range(common.since.as_deref(), common.until.as_deref())
        .context("Failed to resolve date range")?;

    let fetcher = HttpFetcher::new(&common.api_base, common.token.clone())
        .context("Failed to build API client")?;

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

    let days = clip_to_range(daily.days, &range);

    if json {
        output_json(&days, &common, &repos)?;
    } else if ndjson {
        output_ndjson(&days)?;
    } else {
        output_summary(&days)?;
    }

    Ok(())
}

/// The collector only bounds the lower end; the upper bound is applied here.
fn clip_to_range(days: Vec<DayCount>, range: &DateRange) -> Vec<DayCount> {
    let since = range.since.map(|s| s.date_naive());
    let until = range.until.map(|u| u.date_naive());

    days.into_iter()
        .filter(|day| since.map_or(true, |s| day.date >= s))
        .filter(|day| until.map_or(true, |u| day.date <= u))
        .collect()
}

fn output_json(days: &[DayCount], common: &CommonArgs, repos: &[String]) -> anyhow::Result<()> {
    let output = DaysOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        endpoints: repos.to_vec(),
        author: common.author.clone(),
        since: common.since.clone(),
        until: common.until.clone(),
        days: days.to_vec(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_ndjson(days: &[DayCount]) -> anyhow::Result<()> {
    for day in days {
        println!("{}", serde_json::to_string(day)?);
    }
    Ok(())
}

fn output_summary(days: &[DayCount]) -> anyhow::Result<()> {
    if days.is_empty() {
        println!("No data to display");
        return Ok(());
    }

    println!("{}", style("Daily Commit Counts").bold());
    println!("{}", "─".repeat(50));

    let max = days.iter().map(|d| d.count).max().unwrap_or(1).max(1);
    for day in days {
        let bar_len = ((day.count as f64 / max as f64) * 30.0).ceil() as usize;
        println!(
            "{} {:>4} {}",
            day.date.format("%Y-%m-%d"),
            day.count,
            style("█".repeat(bar_len)).green()
        );
    }

    let total: u64 = days.iter().map(|d| d.count as u64).sum();
    println!("\nTotal commits: {}", style(total).cyan());
    println!("Active days: {}", style(days.len()).cyan());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn day(y: i32, m: u32, d: u32, count: u32) -> DayCount {
        DayCount { date: NaiveDate::from_ymd_opt(y, m, d).unwrap(), count }
    }

    #[test]
    fn clips_days_outside_the_range() {
        let range = resolve_range(Some("2024-01-02"), Some("2024-01-03")).unwrap();
        let days = vec![
            day(2024, 1, 1, 1),
            day(2024, 1, 2, 2),
            day(2024, 1, 3, 3),
            day(2024, 1, 4, 4),
        ];
        assert_eq!(
            clip_to_range(days, &range),
            vec![day(2024, 1, 2, 2), day(2024, 1, 3, 3)]
        );
    }
}
