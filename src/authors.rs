use crate::aggregate::author_pr_summary;
use crate::cli::CommonArgs;
use crate::fetch::fetch_rows;
use crate::model::AuthorPrSummary;
use crate::output::{bar, display_author, print_json, print_ndjson, print_range_header, table_output, truncate, BAR_WIDTH};
use console::style;

pub fn exec(common: CommonArgs, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let fetched = fetch_rows(&common, !(json || ndjson))?;
    let summary = author_pr_summary(&fetched.rows);

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

pub fn output_table(summary: &[AuthorPrSummary]) {
    println!("\n{}", style("Users with most commits").bold());
    if summary.is_empty() {
        println!("No data to display");
        return;
    }

    let max = summary.first().map(|s| s.num_prs).unwrap_or(0);
    println!(
        "{:<28} {:<36} {:>7}",
        style("Author").bold(),
        style("Email").bold(),
        style("Commits").bold()
    );
    println!("{}", "─".repeat(73 + BAR_WIDTH));
    for s in summary {
        println!(
            "{:<28} {:<36} {:>7} {}",
            truncate(display_author(s.author_name.as_deref(), s.author_email.as_deref()), 28),
            truncate(s.author_email.as_deref().unwrap_or(""), 36),
            s.num_prs,
            style(bar(s.num_prs, max, BAR_WIDTH)).green()
        );
    }
}
