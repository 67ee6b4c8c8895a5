use crate::error::{GhstatsError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SCHEMA_VERSION: u32 = 2;

/// One commit as returned by the history connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    pub oid: String,
    pub url: String,
    pub message_headline: String,
    pub committed_date: DateTime<Utc>,
    pub additions: u64,
    pub deletions: u64,
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// A commit flattened for tabular display: author promoted to top-level
/// columns plus the derived `changes` total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedCommitRow {
    pub oid: String,
    pub url: String,
    pub message_headline: String,
    pub committed_date: DateTime<Utc>,
    pub additions: u64,
    pub deletions: u64,
    pub author_email: Option<String>,
    pub author_name: Option<String>,
    pub changes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPrSummary {
    pub author_email: Option<String>,
    pub author_name: Option<String>,
    #[serde(rename = "numPRs")]
    pub num_prs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorChangeSummary {
    pub author_email: Option<String>,
    pub author_name: Option<String>,
    pub additions: u64,
    pub deletions: u64,
    pub changes: u64,
}

/// `owner/name` pair identifying a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Splits on the first `/`. A missing half is left empty rather than
    /// rejected, so `"streamlit"` yields an empty name.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match input.split_once('/') {
            Some((owner, name)) => Self::new(owner.trim(), name.trim()),
            None => Self::new(input, ""),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.owner.is_empty() || self.name.is_empty()
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Calendar-date bounds, widened to UTC midnight when sent to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl DateRange {
    pub fn new(from_date: NaiveDate, to_date: NaiveDate) -> Result<Self> {
        if from_date > to_date {
            return Err(GhstatsError::InvalidDate(format!(
                "Invalid range: from ({from_date}) is after to ({to_date})"
            )));
        }
        Ok(Self { from_date, to_date })
    }

    pub fn since(&self) -> String {
        midnight_utc(self.from_date)
    }

    pub fn until(&self) -> String {
        midnight_utc(self.to_date)
    }
}

fn midnight_utc(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", date.format("%Y-%m-%d"))
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| GhstatsError::InvalidDate(format!("'{input}' is not YYYY-MM-DD: {e}")))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub commits: Vec<NormalizedCommitRow>,
    pub authors: Vec<AuthorPrSummary>,
    pub changes: Vec<AuthorChangeSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableOutput<T> {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub entries: Vec<T>,
}
