use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::EntryType;
use crate::quick_entry::QuickEntry;

/// Who a transaction is written for: the owning user and one of their
/// profiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub user_id: String,
    pub profile_id: i64,
}

#[derive(Debug, Clone)]
pub struct Transaction {
    /// UUID v4, generated when the row is built.
    pub id: String,
    pub user_id: String,
    pub profile_id: i64,
    /// Format: "YYYY-MM-DD"
    pub date: String,
    pub description: String,
    /// The line the user typed, empty for manual entries.
    pub original_input: String,
    pub amount: Decimal,
    pub category: String,
    pub kind: EntryType,
    pub created_at: String,
}

impl Transaction {
    pub fn from_quick_entry(
        entry: QuickEntry,
        original_input: &str,
        owner: &Owner,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: owner.user_id.clone(),
            profile_id: owner.profile_id,
            date: date.format("%Y-%m-%d").to_string(),
            description: entry.description,
            original_input: original_input.trim().to_string(),
            amount: entry.amount,
            category: entry.category,
            kind: entry.kind,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == EntryType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryType::Expense
    }
}
