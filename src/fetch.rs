use crate::cache::{CacheKey, NoCache, ResultCache, SqliteCache};
use crate::cli::CommonArgs;
use crate::github::{HttpTransport, PaginationOptions};
use crate::model::{DateRange, NormalizedCommitRow, RepoSlug};
use crate::period::resolve_range;
use crate::pipeline::fetch_commits_with_progress;
use anyhow::Context;
use chrono::{Local, Utc};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use std::time::Duration;

/// Normalized rows plus the inputs they were fetched for.
pub struct Fetched {
    pub repo: RepoSlug,
    pub range: DateRange,
    pub rows: Vec<NormalizedCommitRow>,
}

pub fn fetch_rows(common: &CommonArgs, show_progress: bool) -> anyhow::Result<Fetched> {
    let repo = RepoSlug::parse(&common.repo);
    let range = resolve_range(
        common.from.as_deref(),
        common.to.as_deref(),
        common.period,
        Local::now().date_naive(),
    )
    .context("Failed to resolve date range")?;

    if repo.is_empty() {
        warn!("'{}' is not OWNER/NAME, nothing to fetch", common.repo);
        return Ok(Fetched {
            repo,
            range,
            rows: Vec::new(),
        });
    }

    let token = common
        .token
        .clone()
        .context("A GitHub token is required: pass --token or set GITHUB_TOKEN")?;
    let transport = HttpTransport::new(&common.endpoint, Duration::from_secs(common.timeout))
        .context("Failed to build HTTP client")?;
    let options = PaginationOptions {
        max_pages: common.max_pages,
    };

    let pb = if show_progress && !common.quiet {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Fetching commits for {repo}..."));
    pb.enable_steady_tick(Duration::from_millis(120));

    let compute = || {
        fetch_commits_with_progress(&transport, &token, &repo, range, options, |pages, commits| {
            pb.set_message(format!("Fetching commits for {repo}: {commits} commits in {pages} pages"))
        })
    };

    let key = CacheKey::new(&common.endpoint, &repo, range, &token);
    let rows = run_with_spinner(&pb, || {
        if common.no_cache {
            Ok(NoCache.get_or_compute(&key, common.ttl, compute)?)
        } else {
            let mut cache = SqliteCache::new(common.cache.as_deref()).context("Failed to initialize cache")?;
            Ok(cache.get_or_compute(&key, common.ttl, compute)?)
        }
    })
    .with_context(|| format!("Failed to fetch commits for {repo}"))?;

    Ok(Fetched { repo, range, rows })
}

/// Runs `work` and clears `pb` whether it succeeded or not.
fn run_with_spinner<T, F>(pb: &ProgressBar, work: F) -> anyhow::Result<T>
where
    F: FnOnce() -> anyhow::Result<T>,
{
    let result = work();
    pb.finish_and_clear();
    result
}

pub fn purge(common: &CommonArgs) -> anyhow::Result<()> {
    let mut cache = SqliteCache::new(common.cache.as_deref()).context("Failed to initialize cache")?;
    let removed = cache
        .purge_expired(common.ttl, Utc::now())
        .context("Failed to purge cache")?;
    println!(
        "Removed {} expired entries from {}",
        style(removed).cyan(),
        cache.path().display()
    );
    Ok(())
}
