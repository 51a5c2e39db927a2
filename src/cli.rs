use anyhow::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gitgrid")]
#[command(about = "Contribution calendar for commit activity from git hosting APIs")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, default_value = "https://api.github.com", help = "Base URL of the hosting API")]
    pub api_base: String,

    #[arg(long, help = "API token sent in the Authorization header")]
    pub token: Option<String>,

    #[arg(long, default_value_t = 100, help = "Records per page (the API caps this at 100)")]
    pub page_size: u32,

    #[arg(long, default_value = "commit.author.date", help = "Dotted path of the timestamp field")]
    pub date_field: String,

    #[arg(long, default_value = "%+", help = "chrono format of the timestamp field (%+ is RFC3339)")]
    pub date_format: String,

    #[arg(long, help = "Start from this date (RFC3339, YYYY-MM-DD, or natural language); also stops pagination once older commits appear")]
    pub since: Option<String>,

    #[arg(long, help = "End at this date (RFC3339, YYYY-MM-DD, or natural language)")]
    pub until: Option<String>,

    #[arg(long, help = "Only count commits whose author field contains this value")]
    pub author: Option<String>,

    #[arg(long, default_value = "commit.author.name", help = "Dotted path of the author field")]
    pub author_field: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the contribution calendar
    Graph {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,

        #[arg(long, default_value = "Sun", help = "Week day the calendar rows start on")]
        week_start: String,

        #[arg(required = true, help = "Repositories as owner/name")]
        repos: Vec<String>,
    },
    /// Per-day commit counts without the calendar layout
    Days {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,

        #[arg(required = true, help = "Repositories as owner/name")]
        repos: Vec<String>,
    },
    /// Dump the fetched records
    Export {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,

        #[arg(required = true, help = "Repositories as owner/name")]
        repos: Vec<String>,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Graph { json, ndjson, week_start, repos } => {
                crate::graph::exec(self.common, repos, week_start, json, ndjson)
            }
            Commands::Days { json, ndjson, repos } => {
                crate::days::exec(self.common, repos, json, ndjson)
            }
            Commands::Export { json, ndjson, repos } => {
                crate::export::exec(self.common, repos, json, ndjson)
            }
        }
    }
}
