use thiserror::Error;

/// Why a quick-entry line could not become a transaction.
///
/// The messages are shown to the user as-is, so each one carries the fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ParseError {
    #[error("no amount found: start with the amount, like '50 lunch'")]
    NoAmountFound,
    #[error("ambiguous amount '{0}': use a single decimal separator, like '1200,50'")]
    AmbiguousAmount(String),
    #[error("amount must be greater than zero")]
    ZeroAmount,
    #[error("amount '{0}' is too large")]
    AmountOutOfRange(String),
}
