use crate::model::{AuthorChangeSummary, AuthorPrSummary, NormalizedCommitRow};
use std::collections::HashMap;

/// Groups rows by `author_email` in first-encounter order. `init` builds the
/// group from its first row, `fold` absorbs every later row of the group.
fn group_by_email<A>(
    rows: &[NormalizedCommitRow],
    init: impl Fn(&NormalizedCommitRow) -> A,
    fold: impl Fn(&mut A, &NormalizedCommitRow),
) -> Vec<A> {
    let mut index: HashMap<Option<&str>, usize> = HashMap::new();
    let mut groups: Vec<A> = Vec::new();

    for row in rows {
        let key = row.author_email.as_deref();
        match index.get(&key) {
            Some(&i) => fold(&mut groups[i], row),
            None => {
                index.insert(key, groups.len());
                groups.push(init(row));
            }
        }
    }

    groups
}

/// Commit count per author email, most active first.
pub fn author_pr_summary(rows: &[NormalizedCommitRow]) -> Vec<AuthorPrSummary> {
    let mut summary = group_by_email(
        rows,
        |row| AuthorPrSummary {
            author_email: row.author_email.clone(),
            author_name: row.author_name.clone(),
            num_prs: 1,
        },
        |acc: &mut AuthorPrSummary, _| acc.num_prs += 1,
    );
    summary.sort_by(|a, b| b.num_prs.cmp(&a.num_prs));
    summary
}

/// Line-change totals per author email, largest `changes` first.
pub fn author_change_summary(rows: &[NormalizedCommitRow]) -> Vec<AuthorChangeSummary> {
    let mut summary = group_by_email(
        rows,
        |row| AuthorChangeSummary {
            author_email: row.author_email.clone(),
            author_name: row.author_name.clone(),
            additions: row.additions,
            deletions: row.deletions,
            changes: row.changes,
        },
        |acc: &mut AuthorChangeSummary, row| {
            acc.additions += row.additions;
            acc.deletions += row.deletions;
            acc.changes += row.changes;
        },
    );
    summary.sort_by(|a, b| b.changes.cmp(&a.changes));
    summary
}
