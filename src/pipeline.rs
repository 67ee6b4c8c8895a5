use crate::aggregate::{author_change_summary, author_pr_summary};
use crate::error::Result;
use crate::github::{fetch_commit_records_with_progress, PaginationOptions, Transport};
use crate::model::{AuthorChangeSummary, AuthorPrSummary, DateRange, NormalizedCommitRow, RepoSlug};
use crate::normalize::normalize;
use log::info;

/// Fetches the default-branch history of `repo` within `range` and returns it
/// as normalized rows in API order.
pub fn fetch_commits<T: Transport>(
    transport: T,
    credential: &str,
    repo: &RepoSlug,
    range: DateRange,
    options: PaginationOptions,
) -> Result<Vec<NormalizedCommitRow>> {
    fetch_commits_with_progress(transport, credential, repo, range, options, |_, _| {})
}

/// Like [`fetch_commits`], calling `on_page(pages, commits)` after each page.
pub fn fetch_commits_with_progress<T, F>(
    transport: T,
    credential: &str,
    repo: &RepoSlug,
    range: DateRange,
    options: PaginationOptions,
    mut on_page: F,
) -> Result<Vec<NormalizedCommitRow>>
where
    T: Transport,
    F: FnMut(usize, usize),
{
    let mut pages_fetched = 0;
    let records = fetch_commit_records_with_progress(transport, credential, repo, range, options, |pages, commits| {
        pages_fetched = pages;
        on_page(pages, commits);
    })?;

    info!(
        "fetched {} commits in {} pages for {} between {} and {}",
        records.len(),
        pages_fetched,
        repo,
        range.from_date,
        range.to_date
    );
    Ok(normalize(records))
}

/// The three tables handed to presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub commits: Vec<NormalizedCommitRow>,
    pub authors: Vec<AuthorPrSummary>,
    pub changes: Vec<AuthorChangeSummary>,
}

impl Report {
    pub fn from_rows(commits: Vec<NormalizedCommitRow>) -> Self {
        let authors = author_pr_summary(&commits);
        let changes = author_change_summary(&commits);
        Self {
            commits,
            authors,
            changes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GhstatsError;
    use crate::github::paginate::tests::{commit_node, history_reply, january, ScriptedTransport};
    use crate::github::GraphQlResponse;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn pipeline_normalizes_and_aggregates() {
        let transport = ScriptedTransport::new(vec![
            history_reply(
                vec![commit_node("1", "alice@example.com", "Alice", 10, 5)],
                true,
                Some("c1"),
            ),
            history_reply(vec![commit_node("2", "bob@example.com", "Bob", 2, 1)], false, None),
        ]);
        let repo = RepoSlug::new("octo", "hello");

        let rows = fetch_commits(&transport, "tok", &repo, january(), PaginationOptions::default()).unwrap();
        assert_eq!(transport.call_count(), 2);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.changes == r.additions + r.deletions));

        let report = Report::from_rows(rows);
        let counts: Vec<_> = report
            .authors
            .iter()
            .map(|a| (a.author_email.clone().unwrap(), a.num_prs))
            .collect();
        assert_eq!(
            counts,
            vec![("alice@example.com".to_string(), 1), ("bob@example.com".to_string(), 1)]
        );
        let totals: Vec<_> = report.changes.iter().map(|c| c.changes).collect();
        assert_eq!(totals, vec![15, 3]);
    }

    #[test]
    fn empty_owner_short_circuits() {
        let transport = ScriptedTransport::new(vec![]);
        let rows = fetch_commits(
            &transport,
            "",
            &RepoSlug::new("", "streamlit"),
            january(),
            PaginationOptions::default(),
        )
        .unwrap();
        assert!(rows.is_empty());
        assert_eq!(transport.call_count(), 0);
        assert!(Report::from_rows(rows).is_empty());
    }

    #[test]
    fn progress_reports_running_totals() {
        let transport = ScriptedTransport::new(vec![
            history_reply(vec![commit_node("1", "a@x", "A", 1, 1); 3], true, Some("c1")),
            history_reply(vec![commit_node("2", "b@x", "B", 1, 1); 2], false, None),
        ]);
        let mut seen = Vec::new();
        let rows = fetch_commits_with_progress(
            &transport,
            "tok",
            &RepoSlug::new("octo", "hello"),
            january(),
            PaginationOptions::default(),
            |pages, commits| seen.push((pages, commits)),
        )
        .unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(seen, vec![(1, 3), (2, 5)]);
    }

    #[test]
    fn transport_and_shape_errors_stay_distinguishable() {
        let repo = RepoSlug::new("octo", "hello");

        let transport = ScriptedTransport::new(vec![Err(GhstatsError::Transport {
            status: 404,
            query: String::new(),
        })]);
        let err = fetch_commits(&transport, "tok", &repo, january(), PaginationOptions::default()).unwrap_err();
        assert!(matches!(err, GhstatsError::Transport { status: 404, .. }));

        let transport = ScriptedTransport::new(vec![Ok(GraphQlResponse {
            data: Some(json!({ "repository": { "defaultBranchRef": null } })),
            errors: None,
        })]);
        let err = fetch_commits(&transport, "tok", &repo, january(), PaginationOptions::default()).unwrap_err();
        assert!(err.is_shape());
    }
}
