use crate::cli::CommonArgs;
use crate::model::{CalendarGrid, GraphOutput, SCHEMA_VERSION};
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use console::style;
use serde::Serialize;

pub fn output_json(
    grid: &CalendarGrid,
    common: &CommonArgs,
    repos: &[String],
    week_start: &str,
) -> Result<()> {
    let output = GraphOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        endpoints: repos.to_vec(),
        author: common.author.clone(),
        since: common.since.clone(),
        until: common.until.clone(),
        week_start: week_start.to_string(),
        grid: grid.clone(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[derive(Serialize)]
struct GridColumn {
    week: usize,
    month: String,
    start: NaiveDate,
    counts: Vec<u32>,
}

pub fn output_ndjson(grid: &CalendarGrid) -> Result<()> {
    for col in 0..grid.weeks() {
        let column = GridColumn {
            week: col,
            month: grid.month_labels[col].clone(),
            start: grid.date_at(0, col),
            counts: (0..7).map(|row| grid.count_at(row, col)).collect(),
        };
        println!("{}", serde_json::to_string(&column)?);
    }
    Ok(())
}

pub fn output_calendar(grid: &CalendarGrid, common: &CommonArgs) -> Result<()> {
    if let (Some(since), Some(until)) = (&common.since, &common.until) {
        println!("Counting commits from {} to {}", since, until);
    } else if let Some(since) = &common.since {
        println!("Counting commits since {}", since);
    } else if let Some(until) = &common.until {
        println!("Counting commits until {}", until);
    }

    let max = grid.counts.iter().flatten().copied().max().unwrap_or(0);

    println!("{}", style("Contribution Calendar").bold());
    println!("{}", "─".repeat(4 + grid.weeks() * 2));

    println!("{}", month_header(grid, 4));
    for row in 0..7 {
        let mut line = format!("{:<4}", grid.row_labels[row]);
        for col in 0..grid.weeks() {
            if !grid.in_range(row, col) {
                line.push_str("  ");
                continue;
            }
            let count = grid.count_at(row, col);
            if count == 0 {
                line.push_str(&format!("{} ", style("·").dim()));
            } else {
                line.push_str(&format!("{} ", style(intensity_char(count, max)).green()));
            }
        }
        println!("{}", line.trim_end());
    }

    let total: u64 = grid.counts.iter().flatten().map(|&c| c as u64).sum();
    let active = grid.counts.iter().flatten().filter(|&&c| c > 0).count();
    let busiest = busiest_day(grid);

    println!("\n{}", style("Legend").bold());
    println!("  {} no activity, {} more", style("·").dim(), style("░▒▓█").green());
    println!("Total commits: {}", style(total).cyan());
    println!("Active days: {}", style(active).cyan());
    if let Some((date, count)) = busiest {
        println!(
            "Busiest day: {} ({} commits)",
            style(date.format("%Y-%m-%d")).yellow(),
            count
        );
    }

    Ok(())
}

fn intensity_char(count: u32, max: u32) -> char {
    let level = ((count as f64 / max.max(1) as f64) * 4.0).ceil() as u32;
    match level {
        0 | 1 => '░',
        2 => '▒',
        3 => '▓',
        _ => '█',
    }
}

fn busiest_day(grid: &CalendarGrid) -> Option<(NaiveDate, u32)> {
    let mut best: Option<(NaiveDate, u32)> = None;
    for col in 0..grid.weeks() {
        for row in 0..7 {
            let count = grid.count_at(row, col);
            if count > 0 && best.map_or(true, |(_, b)| count > b) {
                best = Some((grid.date_at(row, col), count));
            }
        }
    }
    best
}

/// One month label above the first column of each month, two characters per
/// week column.
fn month_header(grid: &CalendarGrid, indent: usize) -> String {
    let mut header = vec![' '; indent + grid.weeks() * 2 + 4];
    let mut previous: Option<&str> = None;
    let mut next_free = indent;

    for (col, label) in grid.month_labels.iter().enumerate() {
        let pos = indent + col * 2;
        if previous != Some(label.as_str()) && pos >= next_free {
            for (i, ch) in label.chars().enumerate() {
                header[pos + i] = ch;
            }
            next_free = pos + label.chars().count() + 1;
            previous = Some(label.as_str());
        }
    }

    header.into_iter().collect::<String>().trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_grid;
    use crate::model::DayCount;
    use chrono::Weekday;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn intensity_ramp_is_monotonic() {
        assert_eq!(intensity_char(1, 8), '░');
        assert_eq!(intensity_char(4, 8), '▒');
        assert_eq!(intensity_char(5, 8), '▓');
        assert_eq!(intensity_char(8, 8), '█');
        assert_eq!(intensity_char(1, 1), '█');
    }

    #[test]
    fn month_header_marks_month_changes_once() {
        let grid = build_grid(&[], date(2024, 1, 28), date(2024, 2, 24), Weekday::Sun).unwrap();
        let header = month_header(&grid, 4);
        assert_eq!(header.matches("Jan").count(), 1);
        assert_eq!(header.matches("Feb").count(), 1);
    }

    #[test]
    fn busiest_day_picks_the_maximum() {
        let counts = vec![
            DayCount { date: date(2024, 3, 5), count: 2 },
            DayCount { date: date(2024, 3, 9), count: 7 },
        ];
        let grid =
            build_grid(&counts, date(2024, 3, 1), date(2024, 3, 31), Weekday::Sun).unwrap();
        assert_eq!(busiest_day(&grid), Some((date(2024, 3, 9), 7)));
    }
}
