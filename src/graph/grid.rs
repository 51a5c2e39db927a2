use crate::error::{GridError, Result};
use crate::model::{CalendarGrid, DayCount};
use crate::util::{day_label, days_from_week_start, nth_day_from};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeMap;

/// Lay sparse per-day counts out as a week-aligned 7×W matrix.
///
/// Days of `[range_start, range_end]` missing from `day_counts` become
/// zero-count entries; entries outside the range are ignored. The head and
/// tail are padded with synthetic zero-count days until both boundary weeks
/// are whole, then the padded sequence is reshaped column-major: entry i
/// lands in row i mod 7, column i div 7. Each column is labeled with the
/// month of its row-0 day.
pub fn build_grid(
    day_counts: &[DayCount],
    range_start: NaiveDate,
    range_end: NaiveDate,
    week_start: Weekday,
) -> Result<CalendarGrid> {
    if range_end < range_start {
        return Err(GridError::InvalidRange(format!(
            "end date {range_end} precedes start date {range_start}"
        )));
    }

    let by_date: BTreeMap<NaiveDate, u32> = day_counts
        .iter()
        .filter(|dc| dc.date >= range_start && dc.date <= range_end)
        .map(|dc| (dc.date, dc.count))
        .collect();

    // Dense, gap-free sequence over the exact requested range.
    let span = (range_end - range_start).num_days() + 1;
    let mut padded: Vec<DayCount> = Vec::with_capacity(span as usize + 12);
    let head = days_from_week_start(range_start.weekday(), week_start) as i64;
    for offset in -head..span {
        let date = range_start + Duration::days(offset);
        let count = if offset < 0 {
            0
        } else {
            by_date.get(&date).copied().unwrap_or(0)
        };
        padded.push(DayCount { date, count });
    }
    let tail = 6 - days_from_week_start(range_end.weekday(), week_start);
    for offset in 1..=tail as i64 {
        padded.push(DayCount { date: range_end + Duration::days(offset), count: 0 });
    }

    debug_assert_eq!(padded.len() % 7, 0);
    let weeks = padded.len() / 7;
    let grid_start = padded[0].date;

    let mut counts = vec![vec![0u32; weeks]; 7];
    for (i, day) in padded.iter().enumerate() {
        counts[i % 7][i / 7] = day.count;
    }

    let row_labels = (0..7)
        .map(|r| day_label(nth_day_from(week_start, r)).to_string())
        .collect();
    let month_labels = (0..weeks)
        .map(|col| padded[col * 7].date.format("%b").to_string())
        .collect();

    Ok(CalendarGrid {
        counts,
        row_labels,
        month_labels,
        grid_start,
        range_start,
        range_end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn first_week_of_2024_pads_both_boundaries() {
        // 2024-01-01 is a Monday, 2024-01-07 a Sunday: one synthetic day in
        // front (Sunday 2023-12-31), six behind, two columns total.
        let counts = vec![DayCount { date: date(2024, 1, 3), count: 2 }];
        let grid =
            build_grid(&counts, date(2024, 1, 1), date(2024, 1, 7), Weekday::Sun).unwrap();

        assert_eq!(grid.weeks(), 2);
        assert_eq!(grid.grid_start, date(2023, 12, 31));
        assert_eq!(grid.month_labels, vec!["Dec", "Jan"]);

        // 2024-01-03 is a Wednesday: row 3 of the first column.
        assert_eq!(grid.count_at(3, 0), 2);
        assert_eq!(grid.date_at(3, 0), date(2024, 1, 3));

        // Padding cells are zero-count and flagged out of range.
        assert!(!grid.in_range(0, 0));
        assert_eq!(grid.count_at(0, 0), 0);
        assert!(grid.in_range(1, 0));
        assert!(grid.in_range(0, 1)); // 2024-01-07
        assert!(!grid.in_range(1, 1));
    }

    #[test]
    fn aligned_range_needs_no_padding() {
        // 2024-01-01..2024-01-14 with a Monday week start: exactly two whole
        // weeks.
        let grid = build_grid(&[], date(2024, 1, 1), date(2024, 1, 14), Weekday::Mon).unwrap();
        assert_eq!(grid.weeks(), 2);
        assert_eq!(grid.grid_start, date(2024, 1, 1));
        assert_eq!(grid.row_labels[0], "Mon");
        assert_eq!(grid.row_labels[6], "Sun");
    }

    #[test]
    fn every_day_in_range_occupies_exactly_one_cell() {
        let start = date(2024, 2, 10);
        let end = date(2024, 4, 2);
        let grid = build_grid(&[], start, end, Weekday::Sun).unwrap();

        let mut seen = std::collections::BTreeSet::new();
        for col in 0..grid.weeks() {
            for row in 0..7 {
                if grid.in_range(row, col) {
                    assert!(seen.insert(grid.date_at(row, col)));
                }
            }
        }
        assert_eq!(seen.len() as i64, (end - start).num_days() + 1);
        assert_eq!(seen.first(), Some(&start));
        assert_eq!(seen.last(), Some(&end));
    }

    #[test]
    fn shape_is_always_seven_rows_and_whole_weeks() {
        for (s, e) in [
            (date(2024, 1, 1), date(2024, 1, 1)),
            (date(2024, 1, 1), date(2024, 12, 31)),
            (date(2023, 6, 15), date(2023, 6, 16)),
        ] {
            let grid = build_grid(&[], s, e, Weekday::Wed).unwrap();
            assert_eq!(grid.counts.len(), 7);
            for row in &grid.counts {
                assert_eq!(row.len(), grid.weeks());
            }
            let padded = (grid.date_at(6, grid.weeks() - 1) - grid.grid_start).num_days() + 1;
            assert_eq!(padded % 7, 0);
        }
    }

    #[test]
    fn row_labels_follow_the_week_start() {
        let grid = build_grid(&[], date(2024, 1, 1), date(2024, 1, 7), Weekday::Thu).unwrap();
        assert_eq!(
            grid.row_labels,
            vec!["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"]
        );
    }

    #[test]
    fn out_of_range_counts_are_ignored() {
        let counts = vec![
            DayCount { date: date(2023, 12, 31), count: 9 },
            DayCount { date: date(2024, 1, 2), count: 1 },
            DayCount { date: date(2024, 2, 1), count: 9 },
        ];
        let grid =
            build_grid(&counts, date(2024, 1, 1), date(2024, 1, 7), Weekday::Sun).unwrap();

        let total: u32 = grid.counts.iter().flatten().sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn inverted_range_is_an_error() {
        assert!(matches!(
            build_grid(&[], date(2024, 1, 7), date(2024, 1, 1), Weekday::Sun),
            Err(GridError::InvalidRange(_))
        ));
    }

    #[test]
    fn building_twice_yields_identical_grids() {
        let counts = vec![
            DayCount { date: date(2024, 3, 5), count: 4 },
            DayCount { date: date(2024, 3, 9), count: 1 },
        ];
        let a = build_grid(&counts, date(2024, 3, 1), date(2024, 3, 31), Weekday::Sun).unwrap();
        let b = build_grid(&counts, date(2024, 3, 1), date(2024, 3, 31), Weekday::Sun).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn month_label_comes_from_the_row_zero_day() {
        // A column whose top cell is still January is labeled Jan even when
        // most of the column is February.
        let grid = build_grid(&[], date(2024, 1, 28), date(2024, 2, 10), Weekday::Sun).unwrap();
        assert_eq!(grid.month_labels, vec!["Jan", "Feb"]);
    }
}
