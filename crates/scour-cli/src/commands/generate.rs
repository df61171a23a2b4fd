//! Generate command - propose cleaning rules from a data sample.

use colored::Colorize;
use scour::{MockGenerator, OpenAiGenerator, Scour};

use crate::cli::GenerateArgs;

use super::load_config;

pub fn run(args: GenerateArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(model) = args.model {
        config.generator.model = model;
    }
    if let Some(temperature) = args.temperature {
        config.generator.temperature = temperature;
    }
    if let Some(sample_size) = args.sample_size {
        config.data.sample_size = sample_size;
    }
    if let Some(seed) = args.seed {
        config.data.seed = seed;
    }
    if let Some(description) = args.description {
        config.data.data_description = description;
    }
    if let Some(output_dir) = args.output_dir {
        config.data.output_dir = output_dir;
    }

    let mut scour = Scour::with_config(config.clone());
    if args.mock {
        scour = scour.with_generator(MockGenerator::new());
    } else {
        let api_key = args
            .api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or("OpenAI API key is required. Set it via --api-key or OPENAI_API_KEY in .env")?;
        scour = scour.with_generator(OpenAiGenerator::with_config(api_key, config.generator.clone())?);
    }

    println!(
        "{} {}",
        "Generating rules for".cyan().bold(),
        args.file.display().to_string().white()
    );
    if !args.mock {
        println!(
            "Model: {}  Temperature: {}",
            config.generator.model, config.generator.temperature
        );
    }
    println!("Sample size: {}", config.data.sample_size);

    let (table, _) = scour.load_table(&args.file)?;
    let rules = scour.generate_rules(
        &table,
        &config.data.data_description,
        config.data.sample_size,
        config.data.seed,
    )?;

    let rules_path = config.data.rules_path();
    rules.save(&rules_path)?;

    println!();
    println!(
        "Generated {} cleaning rules",
        rules.len().to_string().white().bold()
    );
    for (i, rule) in rules.iter().enumerate() {
        println!(
            "  {}. {}: {} (confidence: {:.2})",
            i + 1,
            rule.rule_id.cyan(),
            rule.description,
            rule.confidence
        );
        if verbose && !rule.reasoning.is_empty() {
            println!("     {}", rule.reasoning.dimmed());
        }
    }

    let problems = rules.check_patterns();
    if !problems.is_empty() {
        println!();
        println!(
            "{} {} rules will fail to apply:",
            "Warning:".yellow().bold(),
            problems.len()
        );
        for problem in &problems {
            println!("  {}", problem);
        }
    }

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        rules_path.display().to_string().white()
    );
    println!(
        "Run {} to clean the data",
        format!("scour apply {}", args.file.display()).cyan().bold()
    );

    Ok(())
}
