//! End-to-end tests: CSV on disk, rule file on disk, cleaned outputs on disk.

use std::fs;
use std::io::Write;

use tempfile::{NamedTempFile, TempDir};

use scour::{
    AppConfig, MockGenerator, Rule, RuleSet, RuleType, Scour, ScourError, TableLoader, Value,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

const SALES: &str = "Transaction ID,Item,Price Per Unit,Quantity,Total Spent,Discount Applied\n\
                     TXN_001,Item_1_FOOD,10.5,2,21.0,True\n\
                     TXN_002,,20.0,1,,False\n\
                     TXN_003,Item_3_BEV,15.753,3,,\n\
                     TXN_004,Item_4_BEV,4.0,2,9.0,True\n";

fn sales_rules() -> RuleSet {
    RuleSet::new(vec![
        Rule::new("impute_total_spent", RuleType::Imputation, ["Total Spent"])
            .with_pattern(r"^\s*$")
            .with_replacement("[Price Per Unit] * [Quantity]"),
        Rule::new("flag_total_spent_mismatch", RuleType::AnomalyFlag, ["Total Spent"])
            .with_pattern(".*"),
        Rule::new("flag_missing_item", RuleType::AnomalyFlag, ["Item"])
            .with_pattern(r"^\s*$")
            .flag_on_match(true),
        Rule::new("round_price", RuleType::FormatString, ["Price Per Unit"])
            .with_replacement("%.2f"),
    ])
    .expect("valid rules")
}

#[test]
fn test_clean_files_end_to_end() {
    let data = create_test_file(SALES);
    let dir = TempDir::new().unwrap();
    let rules_path = dir.path().join("cleaning_rules.json");
    sales_rules().save(&rules_path).unwrap();

    let run = Scour::new().clean(data.path(), &rules_path).expect("clean failed");
    assert_eq!(run.source.row_count, 4);
    assert_eq!(run.report.total_rules_applied, 4);
    assert_eq!(run.report.original_shape, (4, 6));
    assert_eq!(run.report.cleaned_shape, (4, 8));
    assert_eq!(run.report.flag_counts["Total Spent_flag_flag_total_spent_mismatch"], 1);
    assert_eq!(run.report.flag_counts["Item_flag_flag_missing_item"], 1);

    let cleaned = &run.outcome.table;
    assert_eq!(cleaned.get(1, "Total Spent"), Some(&Value::Float(20.0)));
    assert_eq!(cleaned.get(2, "Price Per Unit"), Some(&Value::Float(15.75)));

    let data_out = dir.path().join("out").join("cleaned_data.csv");
    let log_out = dir.path().join("out").join("cleaning_log.json");
    run.save(&data_out, &log_out).unwrap();

    let (reloaded, _) = TableLoader::new().load(&data_out).unwrap();
    assert_eq!(reloaded.shape(), (4, 8));
    assert_eq!(
        reloaded.get(3, "Total Spent_flag_flag_total_spent_mismatch"),
        Some(&Value::Bool(true))
    );

    let log: serde_json::Value = serde_json::from_str(&fs::read_to_string(&log_out).unwrap()).unwrap();
    assert_eq!(log["rules_applied"].as_array().unwrap().len(), 4);
    assert_eq!(log["rules_applied"][0]["imputed_count"], 2);
}

#[test]
fn test_missing_rule_file() {
    let data = create_test_file(SALES);
    let err = Scour::new()
        .clean(data.path(), "nonexistent.json")
        .unwrap_err();
    assert!(matches!(err, ScourError::NotFound { .. }));
}

#[test]
fn test_malformed_rule_file() {
    let data = create_test_file(SALES);
    let rules = create_test_file(r#"{"rules": [{"rule_id": "r", "rule_type": "imputation", "columns": ["Item"]}]}"#);
    let err = Scour::new().clean(data.path(), rules.path()).unwrap_err();
    assert!(matches!(err, ScourError::MalformedRuleSet(_)));
}

#[test]
fn test_generate_then_apply_with_mock() {
    let data = create_test_file(SALES);
    let dir = TempDir::new().unwrap();
    let mut config = AppConfig::default();
    config.data.output_dir = dir.path().to_path_buf();

    let scour = Scour::with_config(config.clone()).with_generator(MockGenerator::new());
    let (table, _) = scour.load_table(data.path()).unwrap();
    let rules = scour
        .generate_rules(&table, &config.data.data_description, config.data.sample_size, config.data.seed)
        .unwrap();
    rules.save(config.data.rules_path()).unwrap();
    assert!(rules.check_patterns().is_empty());

    let run = scour.clean(data.path(), config.data.rules_path()).unwrap();
    assert!(run.report.columns_added.contains(&"Item_flag_flag_missing_values".to_string()));
    assert!(run.outcome.warnings.is_empty());
}

#[test]
fn test_sampling_is_deterministic() {
    let data = create_test_file(SALES);
    let (table, _) = TableLoader::new().load(data.path()).unwrap();

    assert_eq!(table.sample(2, 42), table.sample(2, 42));
    assert_eq!(table.sample(2, 42).row_count(), 2);
    assert_eq!(table.sample(10, 42), table);
}
