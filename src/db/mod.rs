mod schema;

use anyhow::{Context, Result};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Type, ValueRef};
use rusqlite::{params, Connection, ToSql};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

const ACTIVE_PROFILE_KEY: &str = "active_profile";

const TRANSACTION_COLUMNS: &str = "id, user_id, profile_id, date, description, original_input, \
                                   amount, category, kind, created_at";

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::debug!("opened ledger at {}", path.display());
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            tracing::debug!("creating schema v{}", schema::CURRENT_VERSION);
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .context("Failed to read schema version")?;

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                tracing::info!("migrating schema from v{from_version}");
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Profiles ──────────────────────────────────────────────

    pub(crate) fn insert_profile(&self, profile: &Profile) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO profiles (user_id, name, created_at) VALUES (?1, ?2, ?3)",
                params![profile.user_id, profile.name, profile.created_at],
            )
            .with_context(|| format!("Failed to create profile '{}'", profile.name))?;
        tracing::info!("created profile '{}' for {}", profile.name, profile.user_id);
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_profiles(&self, user_id: &str) -> Result<Vec<Profile>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, created_at FROM profiles WHERE user_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(Profile {
                id: Some(row.get(0)?),
                user_id: row.get(1)?,
                name: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Create the default profile for a user who has none yet.
    pub(crate) fn ensure_default_profile(&self, user_id: &str) -> Result<()> {
        if self.get_profiles(user_id)?.is_empty() {
            let profile = Profile::new(user_id.to_string(), Profile::DEFAULT_NAME.to_string());
            self.insert_profile(&profile)?;
        }
        Ok(())
    }

    pub(crate) fn set_active_profile(&self, user_id: &str, profile_id: i64) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings (user_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id, key) DO UPDATE SET value = ?3",
            params![user_id, ACTIVE_PROFILE_KEY, profile_id.to_string()],
        )?;
        Ok(())
    }

    /// The profile the user last switched to, or their first profile when
    /// none was chosen or the chosen one is gone.
    pub(crate) fn get_active_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let profiles = self.get_profiles(user_id)?;
        let stored = match self.conn.query_row(
            "SELECT value FROM settings WHERE user_id = ?1 AND key = ?2",
            params![user_id, ACTIVE_PROFILE_KEY],
            |row| row.get::<_, String>(0),
        ) {
            Ok(value) => value.parse::<i64>().ok(),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(e.into()),
        };

        let active = stored
            .and_then(|id| profiles.iter().find(|p| p.id == Some(id)).cloned())
            .or_else(|| profiles.first().cloned());
        tracing::debug!(
            "active profile for {user_id}: {}",
            active.as_ref().map_or("<none>", |p| p.name.as_str())
        );
        Ok(active)
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn insert_transaction(&self, txn: &Transaction) -> Result<()> {
        self.conn
            .execute(
                &format!(
                    "INSERT INTO transactions ({TRANSACTION_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                ),
                params![
                    txn.id,
                    txn.user_id,
                    txn.profile_id,
                    txn.date,
                    txn.description,
                    txn.original_input,
                    txn.amount.to_string(),
                    txn.category,
                    txn.kind,
                    txn.created_at,
                ],
            )
            .context("Failed to save transaction")?;
        tracing::info!(
            "saved {} {} '{}' in {}",
            txn.kind,
            txn.amount,
            txn.description,
            txn.category
        );
        Ok(())
    }

    /// Transactions of one profile, newest first.
    pub(crate) fn get_transactions(
        &self,
        owner: &Owner,
        month: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>> {
        let mut sql = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE user_id = ?1 AND profile_id = ?2"
        );
        let mut param_values: Vec<Box<dyn ToSql>> =
            vec![Box::new(owner.user_id.clone()), Box::new(owner.profile_id)];

        if let Some(m) = month {
            sql.push_str(&format!(" AND date LIKE ?{}", param_values.len() + 1));
            param_values.push(Box::new(format!("{m}%")));
        }

        sql.push_str(" ORDER BY date DESC, created_at DESC");

        if let Some(l) = limit {
            sql.push_str(&format!(" LIMIT {l}"));
        }

        let params_ref: Vec<&dyn ToSql> = param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), row_to_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Delete the user's transaction whose id starts with `id_prefix`.
    /// Returns false when nothing matched.
    pub(crate) fn delete_transaction(&self, user_id: &str, id_prefix: &str) -> Result<bool> {
        if id_prefix.is_empty() {
            anyhow::bail!("Transaction id must not be empty");
        }
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM transactions WHERE user_id = ?1 AND substr(id, 1, ?2) = ?3")?;
        let ids = stmt
            .query_map(
                params![user_id, id_prefix.len() as i64, id_prefix],
                |row| row.get::<_, String>(0),
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        match ids.as_slice() {
            [] => Ok(false),
            [id] => {
                self.conn
                    .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
                tracing::info!("deleted transaction {id}");
                Ok(true)
            }
            _ => anyhow::bail!(
                "Id '{id_prefix}' matches {} transactions, use more characters",
                ids.len()
            ),
        }
    }

    pub(crate) fn get_transaction_count(&self, owner: &Owner, month: &str) -> Result<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM transactions
             WHERE user_id = ?1 AND profile_id = ?2 AND date LIKE ?3",
            params![owner.user_id, owner.profile_id, format!("{month}%")],
            |row| row.get(0),
        )?)
    }

    // ── Analytics ─────────────────────────────────────────────
    //
    // Amounts are stored as text and summed as Decimal here rather than
    // in SQL, where they would go through floating point.

    /// (income, expenses) for a month; expenses are negative.
    pub(crate) fn get_monthly_totals(&self, owner: &Owner, month: &str) -> Result<(Decimal, Decimal)> {
        let txns = self.get_transactions(owner, Some(month), None)?;
        let income: Decimal = txns
            .iter()
            .filter(|t| t.is_income())
            .map(|t| t.amount)
            .sum();
        let expenses: Decimal = txns
            .iter()
            .filter(|t| t.is_expense())
            .map(|t| t.amount)
            .sum();
        Ok((income, expenses))
    }

    /// Expense totals per category for a month, biggest spend first.
    pub(crate) fn get_spending_by_category(
        &self,
        owner: &Owner,
        month: &str,
    ) -> Result<Vec<(String, Decimal)>> {
        let mut totals: HashMap<String, Decimal> = HashMap::new();
        for txn in self.get_transactions(owner, Some(month), None)? {
            if txn.is_expense() {
                *totals.entry(txn.category).or_default() += txn.amount;
            }
        }
        let mut spending: Vec<_> = totals.into_iter().collect();
        spending.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Ok(spending)
    }

    /// All-time balance of a profile.
    pub(crate) fn get_balance(&self, owner: &Owner) -> Result<Decimal> {
        Ok(self
            .get_transactions(owner, None, None)?
            .iter()
            .map(|t| t.amount)
            .sum())
    }

    // ── Export ────────────────────────────────────────────────

    pub(crate) fn export_to_csv(
        &self,
        path: &Path,
        owner: &Owner,
        month: Option<&str>,
    ) -> Result<usize> {
        let txns = self.get_transactions(owner, month, None)?;
        if txns.is_empty() {
            return Ok(0);
        }

        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        wtr.write_record([
            "id",
            "date",
            "description",
            "category",
            "type",
            "amount",
            "original_input",
        ])?;
        for txn in &txns {
            wtr.write_record([
                txn.id.as_str(),
                txn.date.as_str(),
                txn.description.as_str(),
                txn.category.as_str(),
                txn.kind.as_str(),
                txn.amount.to_string().as_str(),
                txn.original_input.as_str(),
            ])?;
        }
        wtr.flush()
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("exported {} transactions to {}", txns.len(), path.display());
        Ok(txns.len())
    }
}

fn row_to_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    let amount_str: String = row.get(6)?;
    let amount = Decimal::from_str(&amount_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        profile_id: row.get(2)?,
        date: row.get(3)?,
        description: row.get(4)?,
        original_input: row.get(5)?,
        amount,
        category: row.get(7)?,
        kind: row.get(8)?,
        created_at: row.get(9)?,
    })
}

impl ToSql for EntryType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for EntryType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        EntryType::parse(s)
            .ok_or_else(|| FromSqlError::Other(format!("unknown entry type: {s}").into()))
    }
}
