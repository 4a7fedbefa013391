#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;
use crate::quick_entry::{QuickEntry, QuickEntryParser};

fn owner() -> Owner {
    Owner {
        user_id: "ana".into(),
        profile_id: 7,
    }
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}

// ── Transaction ───────────────────────────────────────────────

#[test]
fn test_from_quick_entry() {
    let entry = QuickEntryParser::default().parse(" 50 pastel ").unwrap();
    let txn = Transaction::from_quick_entry(entry, " 50 pastel ", &owner(), day());
    assert_eq!(txn.user_id, "ana");
    assert_eq!(txn.profile_id, 7);
    assert_eq!(txn.date, "2024-03-09");
    assert_eq!(txn.description, "Pastel");
    assert_eq!(txn.original_input, "50 pastel");
    assert_eq!(txn.amount, dec!(-50));
    assert_eq!(txn.category, "Alimentação");
    assert!(txn.is_expense());
    assert!(!txn.is_income());
    assert!(!txn.created_at.is_empty());
}

#[test]
fn test_ids_are_fresh_uuids() {
    let entry = QuickEntry {
        amount: dec!(1200),
        description: "Salário".into(),
        category: "Salário".into(),
        kind: EntryType::Income,
    };
    let a = Transaction::from_quick_entry(entry.clone(), "", &owner(), day());
    let b = Transaction::from_quick_entry(entry, "", &owner(), day());
    assert_ne!(a.id, b.id);
    assert!(uuid::Uuid::parse_str(&a.id).is_ok());
    assert!(a.is_income());
}

// ── EntryType ─────────────────────────────────────────────────

#[test]
fn test_entry_type_parse() {
    assert_eq!(EntryType::parse("income"), Some(EntryType::Income));
    assert_eq!(EntryType::parse("RECEITA"), Some(EntryType::Income));
    assert_eq!(EntryType::parse("expense"), Some(EntryType::Expense));
    assert_eq!(EntryType::parse(" despesa "), Some(EntryType::Expense));
    assert_eq!(EntryType::parse("saída"), Some(EntryType::Expense));
    assert_eq!(EntryType::parse("transfer"), None);
}

#[test]
fn test_entry_type_roundtrip() {
    for kind in EntryType::all() {
        assert_eq!(EntryType::parse(kind.as_str()), Some(*kind));
    }
}

#[test]
fn test_entry_type_display() {
    assert_eq!(format!("{}", EntryType::Income), "income");
    assert_eq!(format!("{}", EntryType::Expense), "expense");
}

// ── Profile ───────────────────────────────────────────────────

#[test]
fn test_profile_new() {
    let profile = Profile::new("ana".into(), "Filhos".into());
    assert!(profile.id.is_none());
    assert_eq!(profile.user_id, "ana");
    assert_eq!(format!("{profile}"), "Filhos");
    assert!(!profile.created_at.is_empty());
}

#[test]
fn test_profile_find_by_name() {
    let profiles = vec![
        Profile::new("ana".into(), "Família".into()),
        Profile::new("ana".into(), "Viagem".into()),
    ];
    assert_eq!(
        Profile::find_by_name(&profiles, "viagem").map(|p| p.name.as_str()),
        Some("Viagem")
    );
    assert_eq!(
        Profile::find_by_name(&profiles, "FAMÍLIA").map(|p| p.name.as_str()),
        Some("Família")
    );
    assert!(Profile::find_by_name(&profiles, "Casa").is_none());
}
