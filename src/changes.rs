use crate::aggregate::author_change_summary;
use crate::cli::CommonArgs;
use crate::fetch::fetch_rows;
use crate::model::AuthorChangeSummary;
use crate::output::{bar, display_author, print_json, print_ndjson, print_range_header, table_output, truncate, BAR_WIDTH};
use console::style;

pub fn exec(common: CommonArgs, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let fetched = fetch_rows(&common, !(json || ndjson))?;
    let summary = author_change_summary(&fetched.rows);

    if json {
        print_json(&table_output(&fetched, &summary))?;
    } else if ndjson {
        print_ndjson(&summary)?;
    } else {
        print_range_header(&fetched);
        output_table(&summary);
    }
    Ok(())
}

pub fn output_table(summary: &[AuthorChangeSummary]) {
    println!("\n{}", style("Users with most changed lines").bold());
    if summary.is_empty() {
        println!("No data to display");
        return;
    }

    let max = summary.first().map(|s| s.changes).unwrap_or(0);
    println!(
        "{:<28} {:>9} {:>9} {:>9}",
        style("Author").bold(),
        style("Added").bold(),
        style("Deleted").bold(),
        style("Changes").bold()
    );
    println!("{}", "─".repeat(58 + BAR_WIDTH));
    for s in summary {
        println!(
            "{:<28} {:>9} {:>9} {:>9} {}",
            truncate(display_author(s.author_name.as_deref(), s.author_email.as_deref()), 28),
            style(s.additions).green(),
            style(s.deletions).red(),
            s.changes,
            style(bar(s.changes, max, BAR_WIDTH)).blue()
        );
    }

    let total: u64 = summary.iter().map(|s| s.changes).sum();
    println!("\nTotal lines changed: {}", style(total).cyan());
}
