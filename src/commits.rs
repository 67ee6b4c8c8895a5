use crate::cli::CommonArgs;
use crate::fetch::fetch_rows;
use crate::model::NormalizedCommitRow;
use crate::output::{print_json, print_ndjson, print_range_header, table_output, truncate};
use console::style;

pub fn exec(common: CommonArgs, json: bool, ndjson: bool, limit: Option<usize>) -> anyhow::Result<()> {
    let fetched = fetch_rows(&common, !(json || ndjson))?;

    if json {
        print_json(&table_output(&fetched, &fetched.rows))?;
    } else if ndjson {
        print_ndjson(&fetched.rows)?;
    } else {
        print_range_header(&fetched);
        output_table(&fetched.rows, limit);
    }
    Ok(())
}

/// Rows in API order with the columns `messageHeadline, authorEmail,
/// authorName, committedDate, changes, oid, url`.
pub fn output_table(rows: &[NormalizedCommitRow], limit: Option<usize>) {
    println!("\n{}", style("Timeline of commits").bold());
    if rows.is_empty() {
        println!("No data to display");
        return;
    }

    println!(
        "{:<44} {:<28} {:<20} {:<16} {:>7} {:<8} {}",
        style("Message").bold(),
        style("Email").bold(),
        style("Name").bold(),
        style("Date").bold(),
        style("Changes").bold(),
        style("Oid").bold(),
        style("Url").bold()
    );
    println!("{}", "─".repeat(140));

    let shown = limit.unwrap_or(rows.len()).min(rows.len());
    for row in &rows[..shown] {
        println!(
            "{:<44} {:<28} {:<20} {:<16} {:>7} {:<8} {}",
            truncate(&row.message_headline, 44),
            truncate(row.author_email.as_deref().unwrap_or(""), 28),
            truncate(row.author_name.as_deref().unwrap_or(""), 20),
            row.committed_date.format("%Y-%m-%d %H:%M").to_string(),
            row.changes,
            row.oid.chars().take(8).collect::<String>(),
            style(&row.url).dim()
        );
    }
    if rows.len() > shown {
        println!("\n... and {} more commits", rows.len() - shown);
    }
}
