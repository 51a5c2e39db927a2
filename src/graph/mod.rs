pub mod aggregate;
pub mod exec;
pub mod fetch;
pub mod grid;
pub mod output;

pub use aggregate::{aggregate, AuthorFilter, DailyCounts};
pub use exec::exec;
pub use fetch::{collect_records, CollectSummary};
pub use grid::build_grid;
pub use output::{output_calendar, output_json, output_ndjson};
