//! Example: Clean a CSV file with a rule file.
//!
//! Usage:
//!   cargo run --example clean -- <data.csv> <rules.json>
//!
//! Without a rule file, rules are proposed by the offline mock generator.

use std::env;

use scour::{CleaningReport, MockGenerator, RuleGenerator, RuleSet, Scour};

fn main() -> scour::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example clean -- <data.csv> [rules.json]");
        std::process::exit(1);
    }

    let scour = Scour::new();
    let (table, source) = scour.load_table(&args[1])?;
    println!(
        "Loaded {} ({} rows x {} columns)",
        source.file, source.row_count, source.column_count
    );

    let rules = match args.get(2) {
        Some(path) => RuleSet::load(path)?,
        None => MockGenerator::new().generate(&table.head(20), "example data")?,
    };
    println!("Applying {} rules", rules.len());

    let outcome = scour.apply(&table, &rules)?;
    let report = CleaningReport::new(&table, &outcome);

    for entry in &report.rules_applied {
        println!("  {} -> {}", entry.rule_id, entry.column);
    }
    for (column, count) in &report.flag_counts {
        println!("  {column}: {count} flagged");
    }
    for warning in &report.warnings {
        println!("  warning: {warning}");
    }

    Ok(())
}
