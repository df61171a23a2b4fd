//! Apply command - clean a data file with a rule file.

use colored::Colorize;
use scour::{RuleWarning, Scour};

use crate::cli::ApplyArgs;

use super::load_config;

pub fn run(args: ApplyArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(output_dir) = args.output_dir {
        config.data.output_dir = output_dir;
    }
    if let Some(name) = args.output_filename {
        config.data.cleaned_data_filename = name;
    }
    if let Some(name) = args.log_filename {
        config.data.log_filename = name;
    }
    let rules_path = args.rules.unwrap_or_else(|| config.data.rules_path());

    println!(
        "{} {} with {}",
        "Cleaning".cyan().bold(),
        args.file.display().to_string().white(),
        rules_path.display().to_string().white()
    );

    let scour = Scour::with_config(config.clone());
    let run = scour.clean(&args.file, &rules_path)?;

    let data_path = config.data.cleaned_data_path();
    let log_path = config.data.log_path();
    run.save(&data_path, &log_path)?;

    let report = &run.report;
    let skipped = run.outcome.warnings.iter().filter(|w| w.is_skip()).count();
    println!(
        "Applied {} rule/column pairs ({} skipped)",
        report.total_rules_applied.to_string().white().bold(),
        skipped.to_string().yellow()
    );
    println!(
        "Shape: {} x {} -> {} x {}",
        report.original_shape.0, report.original_shape.1, report.cleaned_shape.0, report.cleaned_shape.1
    );

    if args.show_summary {
        println!();
        println!("{}", "Rules applied:".yellow().bold());
        for entry in &report.rules_applied {
            let count = match (entry.flagged_count, entry.imputed_count) {
                (Some(n), _) => format!(" ({n} flagged)"),
                (_, Some(n)) => format!(" ({n} imputed)"),
                _ => String::new(),
            };
            println!(
                "  {} [{}] on '{}'{}",
                entry.rule_id.cyan(),
                entry.rule_type,
                entry.column,
                count
            );
        }

        if !report.flag_counts.is_empty() {
            println!();
            println!("{}", "Flag columns:".yellow().bold());
            for (column, count) in &report.flag_counts {
                println!("  {:48} {}", column, count.to_string().red());
            }
        }
    }

    if !run.outcome.warnings.is_empty() && (args.show_summary || verbose) {
        println!();
        println!("{}", "Warnings:".yellow().bold());
        for warning in &run.outcome.warnings {
            let label = match warning {
                RuleWarning::FormatApplication { .. } => "failed",
                _ => "skipped",
            };
            println!("  {} {}", label.yellow(), warning);
        }
    }

    println!();
    println!(
        "{} {}",
        "Cleaned data:".green().bold(),
        data_path.display().to_string().white()
    );
    println!(
        "{} {}",
        "Cleaning log:".green().bold(),
        log_path.display().to_string().white()
    );

    Ok(())
}
