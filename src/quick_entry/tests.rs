#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::taxonomy::CategoryRule;
use super::*;

fn entry(amount: Decimal, description: &str, category: &str, kind: EntryType) -> QuickEntry {
    QuickEntry {
        amount,
        description: description.into(),
        category: category.into(),
        kind,
    }
}

// ── End to end ────────────────────────────────────────────────

#[test]
fn test_pastel_is_food_expense() {
    let parser = QuickEntryParser::default();
    assert_eq!(
        parser.parse("50 pastel").unwrap(),
        entry(dec!(-50), "Pastel", "Alimentação", EntryType::Expense)
    );
}

#[test]
fn test_salary_is_income() {
    let parser = QuickEntryParser::default();
    assert_eq!(
        parser.parse("1200 salário").unwrap(),
        entry(dec!(1200), "Salário", "Salário", EntryType::Income)
    );
}

#[test]
fn test_comma_decimal_uber() {
    let parser = QuickEntryParser::default();
    assert_eq!(
        parser.parse("25,90 Uber").unwrap(),
        entry(dec!(-25.9), "Uber", "Transporte", EntryType::Expense)
    );
}

#[test]
fn test_stop_word_then_no_match() {
    let parser = QuickEntryParser::default();
    assert_eq!(
        parser.parse("30 com academia").unwrap(),
        entry(dec!(-30), "Academia", "Other", EntryType::Expense)
    );
}

#[test]
fn test_no_number_fails() {
    let parser = QuickEntryParser::default();
    assert_eq!(
        parser.parse("sem numero aqui"),
        Err(ParseError::NoAmountFound)
    );
}

#[test]
fn test_amount_only() {
    let parser = QuickEntryParser::default();
    assert_eq!(
        parser.parse("15").unwrap(),
        entry(dec!(-15), "General expense", "Other", EntryType::Expense)
    );
}

#[test]
fn test_currency_prefix_and_suffix_amount() {
    let parser = QuickEntryParser::default();
    assert_eq!(
        parser.parse("R$ 89,90 na farmácia").unwrap(),
        entry(dec!(-89.90), "Farmácia", "Saúde", EntryType::Expense)
    );
    assert_eq!(
        parser.parse("aluguel 1500").unwrap(),
        entry(dec!(-1500), "Aluguel", "Moradia", EntryType::Expense)
    );
}

#[test]
fn test_error_message_has_hint() {
    let parser = QuickEntryParser::default();
    let err = parser.parse("pastel").unwrap_err();
    assert!(err.to_string().contains("like '50 lunch'"));
}

// ── Properties ────────────────────────────────────────────────

const SAMPLES: &[&str] = &[
    "50 pastel",
    "1200 salário",
    "25,90 Uber",
    "30 com academia",
    "15",
    "R$ 9,99 netflix",
    "recebi 300 do freela",
    "0,5 bala",
    "12 pães e 3 cafés",
    "cinemark 40",
    "7 showroom",
];

#[test]
fn test_parse_is_repeatable() {
    let parser = QuickEntryParser::default();
    for input in SAMPLES {
        assert_eq!(parser.parse(input), parser.parse(input), "{input}");
    }
}

#[test]
fn test_sign_follows_kind() {
    let parser = QuickEntryParser::default();
    for input in SAMPLES {
        let parsed = parser.parse(input).unwrap();
        match parsed.kind {
            EntryType::Expense => assert!(parsed.amount < Decimal::ZERO, "{input}"),
            EntryType::Income => assert!(parsed.amount > Decimal::ZERO, "{input}"),
        }
    }
}

#[test]
fn test_category_is_closed() {
    let parser = QuickEntryParser::default();
    let labels = parser.taxonomy().labels();
    for input in SAMPLES {
        let parsed = parser.parse(input).unwrap();
        assert!(labels.contains(&parsed.category.as_str()), "{input}");
    }
}

#[test]
fn test_inputs_without_digits_always_fail() {
    let parser = QuickEntryParser::default();
    for input in ["", "pastel", "R$ ,", "...", "com uber", "um dois três"] {
        assert_eq!(parser.parse(input), Err(ParseError::NoAmountFound), "{input}");
    }
}

// ── Injected taxonomy ─────────────────────────────────────────

#[test]
fn test_custom_taxonomy() {
    let parser = QuickEntryParser::new(Taxonomy {
        income: CategoryRule::new("Paycheck", &["payroll"]),
        expense: vec![CategoryRule::new("Coffee", &["latte"])],
        fallback_category: "Misc".into(),
        fallback_description: "Something".into(),
    });
    assert_eq!(
        parser.parse("4.50 latte").unwrap(),
        entry(dec!(-4.50), "Latte", "Coffee", EntryType::Expense)
    );
    assert_eq!(
        parser.parse("2000 payroll").unwrap(),
        entry(dec!(2000), "Payroll", "Paycheck", EntryType::Income)
    );
    assert_eq!(
        parser.parse("3").unwrap(),
        entry(dec!(-3), "Something", "Misc", EntryType::Expense)
    );
}

#[test]
fn test_assemble_sign() {
    assert_eq!(
        assemble(dec!(10), "X".into(), "Other".into(), EntryType::Expense).amount,
        dec!(-10)
    );
    assert_eq!(
        assemble(dec!(-10), "X".into(), "Salário".into(), EntryType::Income).amount,
        dec!(10)
    );
}

// ── Taxonomy file ─────────────────────────────────────────────

#[test]
fn test_taxonomy_from_toml() {
    let raw = r#"
fallback_category = "Misc"

[income]
label = "Paycheck"
keywords = ["payroll"]

[[expense]]
label = "Food"
keywords = ["lunch", "dinner"]

[[expense]]
label = "Transport"
keywords = ["bus"]
"#;
    let tax = Taxonomy::from_toml_str(raw).unwrap();
    assert_eq!(tax.income.label, "Paycheck");
    assert_eq!(tax.expense.len(), 2);
    assert_eq!(tax.expense[1].label, "Transport");
    assert_eq!(tax.fallback_category, "Misc");
    assert_eq!(tax.fallback_description, "General expense");
    assert_eq!(tax.labels(), vec!["Paycheck", "Food", "Transport", "Misc"]);
}

#[test]
fn test_taxonomy_rejects_empty_keyword() {
    let raw = r#"
[income]
label = "Paycheck"
keywords = [""]
"#;
    assert!(Taxonomy::from_toml_str(raw).is_err());
}

#[test]
fn test_taxonomy_rejects_duplicate_labels() {
    let raw = r#"
[income]
label = "Food"
keywords = ["refund"]

[[expense]]
label = "food"
keywords = ["lunch"]
"#;
    assert!(Taxonomy::from_toml_str(raw).is_err());
}

#[test]
fn test_taxonomy_requires_income() {
    assert!(Taxonomy::from_toml_str("fallback_category = \"Misc\"").is_err());
}

#[test]
fn test_taxonomy_missing_file_uses_default() {
    let dir = tempfile::tempdir().unwrap();
    let tax = Taxonomy::load_or_default(&dir.path().join("taxonomy.toml")).unwrap();
    assert_eq!(tax, Taxonomy::default());
}

#[test]
fn test_taxonomy_loads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taxonomy.toml");
    std::fs::write(&path, "[income]\nlabel = \"Pay\"\nkeywords = [\"pay\"]\n").unwrap();
    let tax = Taxonomy::load_or_default(&path).unwrap();
    assert_eq!(tax.income.label, "Pay");
    assert!(tax.expense.is_empty());
}

#[test]
fn test_default_taxonomy_is_valid() {
    Taxonomy::default().validate().unwrap();
}

#[test]
fn test_find_label() {
    let tax = Taxonomy::default();
    assert_eq!(tax.find_label("transporte"), Some("Transporte"));
    assert_eq!(tax.find_label(" OTHER "), Some("Other"));
    assert_eq!(tax.find_label("Academia"), None);
}

#[test]
fn test_parser_shared_across_threads() {
    let parser = QuickEntryParser::default();
    std::thread::scope(|scope| {
        let handles: Vec<_> = ["50 pastel", "25,90 Uber"]
            .into_iter()
            .map(|input| scope.spawn(|| parser.parse(input).unwrap()))
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().amount < Decimal::ZERO);
        }
    });
}

#[test]
fn test_amount_only_ignores_keywords_in_fallback_description() {
    let parser = QuickEntryParser::new(Taxonomy {
        income: CategoryRule::new("Salário", &["salário"]),
        expense: vec![CategoryRule::new("Escritório", &["pens"])],
        ..Taxonomy::default()
    });
    assert_eq!(
        parser.parse("15").unwrap(),
        entry(dec!(-15), "General expense", "Other", EntryType::Expense)
    );
    assert_eq!(
        parser.parse("15 pens").unwrap(),
        entry(dec!(-15), "Pens", "Escritório", EntryType::Expense)
    );
}
