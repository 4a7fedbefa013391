/// Polarity of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Accepts the stored spelling plus the Portuguese words the CLI shows.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "receita" | "entrada" => Some(Self::Income),
            "expense" | "despesa" | "saida" | "saída" => Some(Self::Expense),
            _ => None,
        }
    }

    pub fn all() -> &'static [EntryType] {
        &[Self::Income, Self::Expense]
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
