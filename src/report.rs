use crate::cli::CommonArgs;
use crate::fetch::{fetch_rows, Fetched};
use crate::model::{ReportOutput, SCHEMA_VERSION};
use crate::output::{print_json, print_range_header};
use crate::pipeline::Report;
use chrono::Utc;
use serde::Serialize;

pub fn exec(common: CommonArgs, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let fetched = fetch_rows(&common, !(json || ndjson))?;
    let report = Report::from_rows(fetched.rows.clone());

    if json {
        print_json(&report_output(&fetched, report))?;
    } else if ndjson {
        output_ndjson(&report)?;
    } else {
        print_range_header(&fetched);
        crate::authors::output_table(&report.authors);
        crate::changes::output_table(&report.changes);
        crate::commits::output_table(&report.commits, Some(50));
    }
    Ok(())
}

pub fn report_output(fetched: &Fetched, report: Report) -> ReportOutput {
    ReportOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository: fetched.repo.to_string(),
        from_date: fetched.range.from_date,
        to_date: fetched.range.to_date,
        commits: report.commits,
        authors: report.authors,
        changes: report.changes,
    }
}

#[derive(Serialize)]
struct TaggedRow<'a, T> {
    table: &'static str,
    row: &'a T,
}

/// One line per row, tagged with the table it belongs to.
fn output_ndjson(report: &Report) -> anyhow::Result<()> {
    for row in &report.authors {
        println!("{}", serde_json::to_string(&TaggedRow { table: "authors", row })?);
    }
    for row in &report.changes {
        println!("{}", serde_json::to_string(&TaggedRow { table: "changes", row })?);
    }
    for row in &report.commits {
        println!("{}", serde_json::to_string(&TaggedRow { table: "commits", row })?);
    }
    Ok(())
}
