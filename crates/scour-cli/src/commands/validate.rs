//! Validate command - check a rule file before using it.

use std::path::PathBuf;

use colored::Colorize;
use scour::RuleSet;

pub fn run(file: PathBuf, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let rules = RuleSet::load(&file)?;
    println!(
        "{} {} ({} rules)",
        "Loaded".cyan().bold(),
        file.display().to_string().white(),
        rules.len()
    );

    if verbose {
        for rule in &rules {
            println!(
                "  {:32} {:16} {}",
                rule.rule_id,
                rule.rule_type.to_string(),
                rule.columns.join(", ")
            );
        }
    }

    let unknown: Vec<_> = rules.iter().filter(|r| !r.rule_type.is_known()).collect();
    for rule in &unknown {
        println!(
            "{} rule {} has unknown type '{}' and will be skipped",
            "Warning:".yellow().bold(),
            rule.rule_id,
            rule.rule_type
        );
    }

    let problems = rules.check_patterns();
    if problems.is_empty() {
        println!("{}", "All patterns compile".green());
        return Ok(());
    }

    for problem in &problems {
        println!("  {} {}", "x".red().bold(), problem);
    }
    Err(format!("{} rules have invalid patterns or replacements", problems.len()).into())
}
