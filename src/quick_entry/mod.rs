//! Free-text quick entry: turns a line like `"50 pastel"` into a
//! categorized, signed transaction record.
//!
//! The pipeline is normalize → classify → assemble. It does no I/O and
//! keeps no state between calls; ids, dates and storage are the caller's.

mod classify;
mod error;
mod normalize;
mod taxonomy;

use rust_decimal::Decimal;

use crate::models::EntryType;

use classify::Classifier;
pub(crate) use error::ParseError;
use normalize::normalize;
pub(crate) use taxonomy::Taxonomy;

/// A parsed quick entry. `amount` is negative for expenses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QuickEntry {
    pub(crate) amount: Decimal,
    pub(crate) description: String,
    pub(crate) category: String,
    pub(crate) kind: EntryType,
}

/// Build the record, taking the sign from `kind` alone.
pub(crate) fn assemble(
    amount: Decimal,
    description: String,
    category: String,
    kind: EntryType,
) -> QuickEntry {
    let amount = match kind {
        EntryType::Expense => -amount.abs(),
        EntryType::Income => amount.abs(),
    };
    QuickEntry {
        amount,
        description,
        category,
        kind,
    }
}

#[derive(Debug, Clone)]
pub(crate) struct QuickEntryParser {
    taxonomy: Taxonomy,
    classifier: Classifier,
}

impl Default for QuickEntryParser {
    fn default() -> Self {
        Self::new(Taxonomy::default())
    }
}

impl QuickEntryParser {
    pub(crate) fn new(taxonomy: Taxonomy) -> Self {
        let classifier = Classifier::new(&taxonomy);
        Self {
            taxonomy,
            classifier,
        }
    }

    pub(crate) fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub(crate) fn parse(&self, input: &str) -> Result<QuickEntry, ParseError> {
        let (amount, description) = normalize(input)?;
        let (category, kind) = match &description {
            Some(description) => self.classifier.classify(description),
            None => (self.taxonomy.fallback_category.as_str(), EntryType::Expense),
        };
        let description =
            description.unwrap_or_else(|| self.taxonomy.fallback_description.clone());
        Ok(assemble(amount, description, category.to_string(), kind))
    }
}

#[cfg(test)]
mod tests;
