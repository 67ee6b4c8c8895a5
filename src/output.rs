use crate::fetch::Fetched;
use crate::model::{TableOutput, SCHEMA_VERSION};
use chrono::Utc;
use serde::Serialize;

pub const BAR_WIDTH: usize = 30;

pub fn table_output<T: Clone>(fetched: &Fetched, entries: &[T]) -> TableOutput<T> {
    TableOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository: fetched.repo.to_string(),
        from_date: fetched.range.from_date,
        to_date: fetched.range.to_date,
        entries: entries.to_vec(),
    }
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_ndjson<T: Serialize>(entries: &[T]) -> anyhow::Result<()> {
    for entry in entries {
        println!("{}", serde_json::to_string(entry)?);
    }
    Ok(())
}

/// Name to show for an author, falling back to the email.
pub fn display_author<'a>(name: Option<&'a str>, email: Option<&'a str>) -> &'a str {
    name.filter(|n| !n.is_empty())
        .or(email.filter(|e| !e.is_empty()))
        .unwrap_or("(unknown)")
}

/// Horizontal bar proportional to `value / max`.
pub fn bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let len = ((value as f64 / max as f64) * width as f64).round() as usize;
    "█".repeat(len.max(usize::from(value > 0)))
}

pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

pub fn print_range_header(fetched: &Fetched) {
    println!(
        "{} commits on {} from {} to {}",
        fetched.rows.len(),
        fetched.repo,
        fetched.range.from_date,
        fetched.range.to_date
    );
}
