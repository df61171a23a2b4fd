//! Analyze command - exploratory overview of a data file.

use std::path::PathBuf;

use colored::Colorize;
use scour::table::{consistency_issues, ColumnStatistics, ConsistencyColumns, ConsistencyIssue, TableInfo};
use scour::{SourceMetadata, TableLoader};
use serde::Serialize;

#[derive(Serialize)]
struct Analysis<'a> {
    source: &'a SourceMetadata,
    info: &'a TableInfo,
    columns: Vec<ColumnReport<'a>>,
    consistency_issues: &'a [ConsistencyIssue],
}

#[derive(Serialize)]
struct ColumnReport<'a> {
    name: &'a str,
    #[serde(flatten)]
    stats: ColumnStatistics,
}

pub fn run(file: PathBuf, json: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (table, source) = TableLoader::new().load(&file)?;
    let info = table.info();
    let issues = consistency_issues(&table, &ConsistencyColumns::default());
    let columns: Vec<ColumnReport<'_>> = info
        .column_names
        .iter()
        .filter_map(|name| {
            table.column_stats(name).map(|stats| ColumnReport {
                name: name.as_str(),
                stats,
            })
        })
        .collect();

    if json {
        let analysis = Analysis {
            source: &source,
            info: &info,
            columns,
            consistency_issues: &issues,
        };
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Analyzing".cyan().bold(),
        file.display().to_string().white()
    );
    println!(
        "Shape: {} rows x {} columns ({} format)",
        info.rows.to_string().white().bold(),
        info.columns.to_string().white().bold(),
        source.format
    );
    if verbose {
        println!("SHA-256: {}", source.hash);
    }

    println!();
    println!("{}", "Columns:".yellow().bold());
    for column in &columns {
        let stats = &column.stats;
        let nulls = if stats.null_count > 0 {
            format!("{} missing ({:.1}%)", stats.null_count, stats.null_percentage)
                .red()
                .to_string()
        } else {
            "complete".green().to_string()
        };
        println!(
            "  {:24} {:8} {:>6} unique  {}",
            column.name,
            stats.dtype.to_string(),
            stats.unique_count,
            nulls
        );
        if let Some(numeric) = &stats.numeric {
            println!(
                "  {:24} mean={:.2} median={:.2} std={:.2} min={:.2} max={:.2}",
                "", numeric.mean, numeric.median, numeric.std, numeric.min, numeric.max
            );
        }
    }

    println!();
    if info.duplicate_rows > 0 {
        println!(
            "{} duplicate rows",
            info.duplicate_rows.to_string().yellow().bold()
        );
    }
    if issues.is_empty() {
        println!("{}", "No consistency issues found".green());
    } else {
        println!("{}", "Consistency issues:".yellow().bold());
        for issue in &issues {
            println!("  {}: {} rows", issue.description, issue.rows.to_string().red());
        }
    }

    Ok(())
}
