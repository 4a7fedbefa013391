use super::taxonomy::{CategoryRule, Taxonomy};
use crate::models::EntryType;

/// Keyword classifier built once from a [`Taxonomy`].
///
/// Matching is plain case-insensitive substring containment, so "show"
/// also hits "showroom". Income is tried first, then expense categories in
/// declaration order; the first hit wins.
#[derive(Debug, Clone)]
pub(crate) struct Classifier {
    income: CompiledCategory,
    expense: Vec<CompiledCategory>,
    fallback: String,
}

#[derive(Debug, Clone)]
struct CompiledCategory {
    label: String,
    keywords: Vec<String>,
}

impl CompiledCategory {
    fn new(rule: &CategoryRule) -> Self {
        Self {
            label: rule.label.clone(),
            keywords: rule.keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    fn matches(&self, desc_lower: &str) -> bool {
        self.keywords.iter().any(|k| desc_lower.contains(k.as_str()))
    }
}

impl Classifier {
    pub(crate) fn new(taxonomy: &Taxonomy) -> Self {
        Self {
            income: CompiledCategory::new(&taxonomy.income),
            expense: taxonomy.expense.iter().map(CompiledCategory::new).collect(),
            fallback: taxonomy.fallback_category.clone(),
        }
    }

    pub(crate) fn classify(&self, description: &str) -> (&str, EntryType) {
        let desc_lower = description.to_lowercase();

        if self.income.matches(&desc_lower) {
            return (self.income.label.as_str(), EntryType::Income);
        }

        self.expense
            .iter()
            .find(|category| category.matches(&desc_lower))
            .map_or((self.fallback.as_str(), EntryType::Expense), |category| {
                (category.label.as_str(), EntryType::Expense)
            })
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
