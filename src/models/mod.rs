mod entry_type;
mod profile;
mod transaction;

pub use entry_type::EntryType;
pub use profile::Profile;
pub use transaction::{Owner, Transaction};

#[cfg(test)]
mod tests;
