use crate::github::GITHUB_GRAPHQL_URL;
use crate::period::TimePeriod;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "ghstats")]
#[command(about = "GitHub contributor statistics: commits, changed lines and a commit timeline")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    #[arg(long, env = "GHSTATS_REPO", default_value = "streamlit/streamlit", help = "Repository as OWNER/NAME")]
    pub repo: String,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, help = "GitHub API token")]
    pub token: Option<String>,

    #[arg(long, help = "Start date (YYYY-MM-DD), overrides --period")]
    pub from: Option<String>,

    #[arg(long, help = "End date (YYYY-MM-DD), overrides --period")]
    pub to: Option<String>,

    #[arg(long, value_enum, default_value_t = TimePeriod::LastWeek, help = "Time period ending today")]
    pub period: TimePeriod,

    #[arg(long, env = "GHSTATS_ENDPOINT", default_value = GITHUB_GRAPHQL_URL, help = "GraphQL endpoint")]
    pub endpoint: String,

    #[arg(long, default_value_t = 30, help = "Request timeout in seconds")]
    pub timeout: u64,

    #[arg(long, env = "GHSTATS_CACHE", help = "Path to cache directory")]
    pub cache: Option<PathBuf>,

    #[arg(long, help = "Always fetch, bypassing the result cache")]
    pub no_cache: bool,

    #[arg(long, value_parser = humantime::parse_duration, default_value = "1d", help = "How long cached results stay valid")]
    pub ttl: Duration,

    #[arg(long, help = "Fail instead of fetching more than this many pages")]
    pub max_pages: Option<usize>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "More log output (-v info, -vv debug, -vvv trace)")]
    pub verbose: u8,

    #[arg(short, long, help = "Only log errors and hide progress")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Users with most commits
    Authors {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Users with most changed lines
    Changes {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Timeline of commits
    Commits {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,

        #[arg(long, help = "Show at most this many rows in the table")]
        limit: Option<usize>,
    },
    /// All three tables
    Report {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Delete cached results older than --ttl
    PurgeCache,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::logging::init(self.common.verbose, self.common.quiet);

        match self.command {
            Commands::Authors { json, ndjson } => crate::authors::exec(self.common, json, ndjson),
            Commands::Changes { json, ndjson } => crate::changes::exec(self.common, json, ndjson),
            Commands::Commits { json, ndjson, limit } => crate::commits::exec(self.common, json, ndjson, limit),
            Commands::Report { json, ndjson } => crate::report::exec(self.common, json, ndjson),
            Commands::PurgeCache => crate::fetch::purge(&self.common),
        }
    }
}
