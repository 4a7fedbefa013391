mod cli;

use anyhow::Result;

use crate::db::Database;
use crate::models::{Owner, Profile};
use crate::quick_entry::QuickEntryParser;

pub(crate) use cli::as_cli;

/// Everything a command needs: the ledger, the parser built from the
/// configured taxonomy, and the user the commands act for.
pub(crate) struct Session {
    pub(crate) db: Database,
    pub(crate) parser: QuickEntryParser,
    pub(crate) user_id: String,
}

impl Session {
    pub(crate) fn new(db: Database, parser: QuickEntryParser, user_id: String) -> Self {
        Self {
            db,
            parser,
            user_id,
        }
    }

    /// The active profile and the owner ids derived from it.
    pub(crate) fn owner(&self) -> Result<(Profile, Owner)> {
        let profile = self.db.get_active_profile(&self.user_id)?.ok_or_else(|| {
            anyhow::anyhow!("No profile found. Create one with `poupp profile add <name>`")
        })?;
        let profile_id = profile
            .id
            .ok_or_else(|| anyhow::anyhow!("Profile has no ID"))?;
        let owner = Owner {
            user_id: self.user_id.clone(),
            profile_id,
        };
        Ok((profile, owner))
    }
}
