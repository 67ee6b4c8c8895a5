use crate::model::{CommitRecord, NormalizedCommitRow};

/// Flattens raw history records into table rows, preserving order and length.
pub fn normalize(records: Vec<CommitRecord>) -> Vec<NormalizedCommitRow> {
    if records.is_empty() {
        return Vec::new();
    }
    records.into_iter().map(normalize_record).collect()
}

pub fn normalize_record(record: CommitRecord) -> NormalizedCommitRow {
    let CommitRecord {
        oid,
        url,
        message_headline,
        committed_date,
        additions,
        deletions,
        author,
    } = record;
    let author = author.unwrap_or_default();

    NormalizedCommitRow {
        oid,
        url,
        message_headline,
        committed_date,
        additions,
        deletions,
        author_email: author.email,
        author_name: author.name,
        changes: additions + deletions,
    }
}
