//! Integration tests for the rule engine on a small retail fixture.

use scour::{
    EngineConfig, MissingOperandPolicy, Rule, RuleEngine, RuleSet, RuleType, RuleWarning,
    ScourError, Table, Value,
};

const MISSING: &str = r"^(nan|NULL|NaN|None|\s*)$";

fn retail_table() -> Table {
    Table::from_columns([
        (
            "Transaction ID",
            vec![Value::from("TXN_001"), Value::from("TXN_002"), Value::from("TXN_003")],
        ),
        (
            "Category",
            vec![Value::from("food"), Value::from("BEVERAGES"), Value::from("Food")],
        ),
        (
            "Item",
            vec![Value::from("Item_1_FOOD"), Value::from("Item_2_BEV"), Value::Null],
        ),
        (
            "Price Per Unit",
            vec![Value::Float(10.5), Value::Float(20.0), Value::Float(15.753)],
        ),
        ("Quantity", vec![Value::Int(2), Value::Int(1), Value::Int(3)]),
        (
            "Total Spent",
            vec![Value::Float(21.0), Value::Float(20.0), Value::Null],
        ),
        (
            "Discount Applied",
            vec![Value::Bool(true), Value::Bool(false), Value::Null],
        ),
    ])
    .expect("fixture table")
}

fn retail_rules() -> RuleSet {
    RuleSet::from_json_str(
        r#"{
        "metadata": {"total_rules": 5, "generated_at": "2024-01-01T00:00:00", "description": "Test rules"},
        "rules": [
            {
                "rule_id": "normalize_category",
                "description": "Convert Category to title case",
                "confidence": 0.95,
                "pattern": "^(.*)$",
                "replacement": "\\1",
                "columns": ["Category"],
                "rule_type": "transformation",
                "reasoning": "Standardize category names"
            },
            {
                "rule_id": "flag_missing_item",
                "description": "Flag missing Item values",
                "confidence": 0.9,
                "pattern": "^(nan|NULL|NaN|None|\\s*)$",
                "replacement": "[MISSING_ITEM]",
                "columns": ["Item"],
                "rule_type": "anomaly_flag",
                "flag_on_match": true,
                "reasoning": "Flag missing items for review"
            },
            {
                "rule_id": "impute_total_spent",
                "description": "Impute Total Spent as Price * Quantity",
                "confidence": 0.85,
                "pattern": "^(nan|NULL|NaN|None|\\s*)$",
                "replacement": "[Price Per Unit] * [Quantity]",
                "columns": ["Total Spent"],
                "rule_type": "imputation",
                "reasoning": "Calculate missing totals"
            },
            {
                "rule_id": "round_price",
                "description": "Round Price Per Unit to 2 decimals",
                "confidence": 0.98,
                "pattern": "^(\\d+\\.\\d{3,})$",
                "replacement": "%.2f",
                "columns": ["Price Per Unit"],
                "rule_type": "format_string",
                "reasoning": "Standardize price formatting"
            },
            {
                "rule_id": "impute_discount",
                "description": "Impute missing Discount Applied as False",
                "confidence": 0.8,
                "pattern": "^(nan|NULL|NaN|None|\\s*)$",
                "replacement": "False",
                "columns": ["Discount Applied"],
                "rule_type": "imputation",
                "reasoning": "Assume no discount if missing"
            }
        ]
    }"#,
    )
    .expect("fixture rules")
}

// =============================================================================
// Full fixture
// =============================================================================

#[test]
fn test_each_rule_works() {
    let table = retail_table();
    let outcome = RuleEngine::new()
        .apply(&table, retail_rules().rules())
        .expect("apply failed");
    let cleaned = &outcome.table;

    assert_eq!(
        cleaned.column("Category").unwrap(),
        &[Value::from("food"), Value::from("BEVERAGES"), Value::from("Food")]
    );
    assert_eq!(
        cleaned.column("Item_flag_flag_missing_item").unwrap(),
        &[Value::Bool(false), Value::Bool(false), Value::Bool(true)]
    );
    assert_eq!(cleaned.get(2, "Total Spent"), Some(&Value::Float(15.753 * 3.0)));
    assert_eq!(cleaned.get(2, "Price Per Unit"), Some(&Value::Float(15.75)));
    assert_eq!(cleaned.get(2, "Discount Applied"), Some(&Value::from("False")));

    let ids: Vec<&str> = outcome.log.iter().map(|e| e.rule_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "normalize_category",
            "flag_missing_item",
            "impute_total_spent",
            "round_price",
            "impute_discount"
        ]
    );
    assert!(outcome.warnings.is_empty());
    assert_eq!(table, retail_table());
}

#[test]
fn test_log_counts() {
    let outcome = RuleEngine::new()
        .apply(&retail_table(), retail_rules().rules())
        .unwrap();

    assert_eq!(outcome.log[1].flagged_count, Some(1));
    assert_eq!(outcome.log[2].imputed_count, Some(1));
    assert_eq!(outcome.log[4].imputed_count, Some(1));
    assert_eq!(outcome.log[0].flagged_count, None);
    assert_eq!(outcome.log[3].imputed_count, None);
}

#[test]
fn test_rows_and_columns_are_preserved() {
    let table = retail_table();
    let outcome = RuleEngine::new().apply(&table, retail_rules().rules()).unwrap();

    assert_eq!(outcome.table.row_count(), table.row_count());
    let original: Vec<&str> = table.column_names().collect();
    let cleaned: Vec<&str> = outcome.table.column_names().take(original.len()).collect();
    assert_eq!(original, cleaned);
    assert_eq!(outcome.table.column_count(), table.column_count() + 1);
}

// =============================================================================
// Edge cases
// =============================================================================

#[test]
fn test_empty_table() {
    let outcome = RuleEngine::new()
        .apply(&Table::new(), retail_rules().rules())
        .unwrap();

    assert!(outcome.table.is_empty());
    assert_eq!(outcome.table.column_count(), 0);
    assert!(outcome.log.is_empty());
    assert!(
        outcome
            .warnings
            .iter()
            .all(|w| matches!(w, RuleWarning::MissingColumn { .. }))
    );
}

#[test]
fn test_empty_rule_list() {
    let table = retail_table();
    let outcome = RuleEngine::new().apply(&table, &[]).unwrap();
    assert_eq!(outcome.table, table);
    assert!(outcome.log.is_empty());
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_missing_column_skips_only_that_column() {
    let rules = vec![
        Rule::new("impute", RuleType::Imputation, ["Nope", "Discount Applied"])
            .with_pattern(MISSING)
            .with_replacement("False"),
    ];
    let outcome = RuleEngine::new().apply(&retail_table(), &rules).unwrap();

    assert_eq!(outcome.log.len(), 1);
    assert_eq!(outcome.log[0].column, "Discount Applied");
    assert_eq!(
        outcome.warnings,
        vec![RuleWarning::MissingColumn {
            rule_id: "impute".to_string(),
            column: "Nope".to_string(),
        }]
    );
}

#[test]
fn test_invalid_regex_aborts_the_pass() {
    let mut rules = retail_rules().into_rules();
    rules[0].pattern = Some("invalid[regex".to_string());

    let err = RuleEngine::new().apply(&retail_table(), &rules).unwrap_err();
    assert!(matches!(err, ScourError::PatternCompile { ref rule_id, .. } if rule_id == "normalize_category"));
}

#[test]
fn test_unknown_rule_type_is_skipped() {
    let rules = vec![Rule::new("dedupe_rows", "deduplicate", ["Item"])];
    let outcome = RuleEngine::new().apply(&retail_table(), &rules).unwrap();

    assert!(outcome.log.is_empty());
    assert_eq!(outcome.table, retail_table());
    assert!(matches!(
        outcome.warnings[0],
        RuleWarning::UnknownRuleType { ref rule_type, .. } if rule_type == "deduplicate"
    ));
}

// =============================================================================
// Total check
// =============================================================================

fn total_rule() -> Vec<Rule> {
    vec![
        Rule::new("flag_total_spent_mismatch", RuleType::AnomalyFlag, ["Total Spent"])
            .with_pattern(".*"),
    ]
}

#[test]
fn test_total_check_consistent_and_inconsistent() {
    let table = Table::from_columns([
        ("Price Per Unit", vec![Value::Float(10.5), Value::Float(10.5)]),
        ("Quantity", vec![Value::Int(2), Value::Int(2)]),
        ("Total Spent", vec![Value::Float(21.0), Value::Float(25.0)]),
    ])
    .unwrap();
    let outcome = RuleEngine::new().apply(&table, &total_rule()).unwrap();

    assert_eq!(
        outcome
            .table
            .column("Total Spent_flag_flag_total_spent_mismatch")
            .unwrap(),
        &[Value::Bool(false), Value::Bool(true)]
    );
    assert_eq!(outcome.table.get(1, "Total Spent"), Some(&Value::Float(25.0)));
}

#[test]
fn test_total_check_missing_operand_policy() {
    let table = retail_table();

    let excluded = RuleEngine::new().apply(&table, &total_rule()).unwrap();
    assert_eq!(excluded.log[0].flagged_count, Some(0));

    let engine = RuleEngine::with_config(
        EngineConfig::default().with_missing_operands(MissingOperandPolicy::Flag),
    );
    let flagged = engine.apply(&table, &total_rule()).unwrap();
    assert_eq!(flagged.log[0].flagged_count, Some(1));
}

#[test]
fn test_total_check_with_renamed_operands() {
    let table = Table::from_columns([
        ("unit", vec![Value::Float(2.0)]),
        ("qty", vec![Value::Int(3)]),
        ("Total Spent", vec![Value::Float(7.0)]),
    ])
    .unwrap();

    let default = RuleEngine::new().apply(&table, &total_rule()).unwrap();
    assert!(default.log.is_empty());
    assert!(matches!(default.warnings[0], RuleWarning::MissingOperand { .. }));

    let engine = RuleEngine::with_config(EngineConfig::default().with_total_operands("unit", "qty"));
    let outcome = engine.apply(&table, &total_rule()).unwrap();
    assert_eq!(outcome.log[0].flagged_count, Some(1));
}
