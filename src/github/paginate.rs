use super::query::{extract_history, history_variables, HistoryPage, HISTORY_QUERY};
use super::transport::Transport;
use crate::error::{GhstatsError, Result};
use crate::model::{CommitRecord, DateRange, RepoSlug};
use log::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationOptions {
    /// Stop with `PageLimit` once this many pages were fetched and the API
    /// still reports more. `None` follows the cursor until exhausted.
    pub max_pages: Option<usize>,
}

/// Lazily walks the commit history one page per `next()`.
///
/// Each call issues exactly one request and blocks on it. The iterator is
/// fused after the last page or the first error.
pub struct HistoryPages<'a, T: Transport> {
    transport: T,
    credential: &'a str,
    repo: &'a RepoSlug,
    range: DateRange,
    options: PaginationOptions,
    cursor: Option<String>,
    pages: usize,
    done: bool,
}

impl<'a, T: Transport> HistoryPages<'a, T> {
    pub fn new(
        transport: T,
        credential: &'a str,
        repo: &'a RepoSlug,
        range: DateRange,
        options: PaginationOptions,
    ) -> Self {
        Self {
            transport,
            credential,
            repo,
            range,
            options,
            cursor: None,
            pages: 0,
            done: repo.is_empty(),
        }
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    fn fetch_page(&mut self) -> Result<HistoryPage> {
        if let Some(max) = self.options.max_pages {
            if self.pages >= max {
                return Err(GhstatsError::PageLimit { pages: self.pages });
            }
        }

        let variables = history_variables(self.repo, &self.range, self.cursor.as_deref());
        let response = self
            .transport
            .execute(self.credential, HISTORY_QUERY, Some(&variables))?;
        let page = extract_history(response)?;
        self.pages += 1;

        debug!(
            "{}: page {} (cursor {:?}) returned {} commits, has_next_page={}",
            self.repo,
            self.pages,
            self.cursor,
            page.nodes.len(),
            page.page_info.has_next_page
        );

        if page.page_info.has_next_page {
            let cursor = page.page_info.end_cursor.clone().ok_or_else(|| {
                GhstatsError::shape("pageInfo.endCursor is null while hasNextPage is true")
            })?;
            self.cursor = Some(cursor);
        } else {
            self.done = true;
        }

        Ok(page)
    }
}

impl<T: Transport> Iterator for HistoryPages<'_, T> {
    type Item = Result<HistoryPage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let page = self.fetch_page();
        if page.is_err() {
            self.done = true;
        }
        Some(page)
    }
}

/// Fetches every commit on the default branch within `range`, in API order.
///
/// An empty owner or name returns no commits without issuing a request.
pub fn fetch_commit_records<T: Transport>(
    transport: T,
    credential: &str,
    repo: &RepoSlug,
    range: DateRange,
    options: PaginationOptions,
) -> Result<Vec<CommitRecord>> {
    fetch_commit_records_with_progress(transport, credential, repo, range, options, |_, _| {})
}

/// Like [`fetch_commit_records`], calling `on_page(pages, commits)` with the
/// running totals after each page.
pub fn fetch_commit_records_with_progress<T, F>(
    transport: T,
    credential: &str,
    repo: &RepoSlug,
    range: DateRange,
    options: PaginationOptions,
    mut on_page: F,
) -> Result<Vec<CommitRecord>>
where
    T: Transport,
    F: FnMut(usize, usize),
{
    let mut pages = HistoryPages::new(transport, credential, repo, range, options);
    let mut records = Vec::new();
    while let Some(page) = pages.next() {
        records.extend(page?.nodes);
        on_page(pages.pages_fetched(), records.len());
    }
    Ok(records)
}
