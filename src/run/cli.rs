use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use super::Session;
use crate::format::{format_amount, truncate};
use crate::models::{EntryType, Profile, Transaction};
use crate::quick_entry::{self, QuickEntry};

/// Flags that take a value; their values are never positional words.
const VALUE_FLAGS: &[&str] = &["--date", "--month"];

pub(crate) fn as_cli(args: &[String], session: &Session, out: &mut impl Write) -> Result<()> {
    let Some(command) = args.get(1) else {
        return print_usage(out);
    };
    let rest = &args[2..];
    match command.as_str() {
        "add" | "a" => cli_add(rest, session, out),
        "parse" => cli_parse(rest, session, out),
        "new" => cli_new(rest, session, out),
        "list" | "ls" => cli_list(rest, session, out),
        "delete" | "rm" => cli_delete(rest, session, out),
        "summary" | "s" => cli_summary(rest, session, out),
        "export" => cli_export(rest, session, out),
        "profiles" => cli_profiles(session, out),
        "profile" => cli_profile(rest, session, out),
        "categories" => cli_categories(session, out),
        "--help" | "-h" | "help" => print_usage(out),
        "--version" | "-V" | "version" => {
            writeln!(out, "poupp {}", env!("CARGO_PKG_VERSION"))?;
            Ok(())
        }
        other => {
            print_usage(out)?;
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage(out: &mut impl Write) -> Result<()> {
    writeln!(out, "Poupp — family finance tracker")?;
    writeln!(out)?;
    writeln!(out, "Usage: poupp <command>")?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    writeln!(out, "  add <text...>                 Quick entry, e.g. poupp add 50 pastel")?;
    writeln!(out, "    --date <YYYY-MM-DD>         Date of the entry (default: today)")?;
    writeln!(out, "  parse <text...>               Show how a quick entry would be read")?;
    writeln!(out, "  new <amount> <income|expense> <category> [description...]")?;
    writeln!(out, "                                Manual entry (accepts --date)")?;
    writeln!(out, "  list [YYYY-MM]                List transactions of the active profile")?;
    writeln!(out, "  delete <id>                   Delete a transaction (id prefix is enough)")?;
    writeln!(out, "  summary [YYYY-MM]             Monthly summary (default: current month)")?;
    writeln!(out, "  export [path]                 Export transactions to CSV")?;
    writeln!(out, "    --month <YYYY-MM>           Month to export (default: current)")?;
    writeln!(out, "  profiles                      List profiles")?;
    writeln!(out, "  profile add <name>            Create a profile")?;
    writeln!(out, "  profile use <name>            Switch the active profile")?;
    writeln!(out, "  categories                    Show categories and their keywords")?;
    writeln!(out, "  --help, -h                    Show this help")?;
    writeln!(out, "  --version, -V                 Show version")?;
    Ok(())
}

const MANUAL_ENTRY_TIP: &str =
    "Tip: record it manually with `poupp new <amount> <income|expense> <category> [description]`";

fn cli_add(args: &[String], session: &Session, out: &mut impl Write) -> Result<()> {
    let text = positional(args).join(" ");
    let date = parse_date_flag(args)?;

    let entry = match session.parser.parse(&text) {
        Ok(entry) => entry,
        Err(err) => {
            writeln!(out, "{MANUAL_ENTRY_TIP}")?;
            return Err(err.into());
        }
    };
    if entry.category == session.parser.taxonomy().fallback_category {
        tracing::warn!("no category keyword matched '{}'", entry.description);
    }

    let (profile, owner) = session.owner()?;
    let txn = Transaction::from_quick_entry(entry, &text, &owner, date);
    session.db.insert_transaction(&txn)?;

    writeln!(out, "Saved to {profile}:")?;
    print_transaction(&txn, out)
}

fn cli_parse(args: &[String], session: &Session, out: &mut impl Write) -> Result<()> {
    let text = positional(args).join(" ");
    let entry = session.parser.parse(&text)?;
    writeln!(out, "  Amount:      {}", format_amount(entry.amount))?;
    writeln!(out, "  Description: {}", entry.description)?;
    writeln!(out, "  Category:    {}", entry.category)?;
    writeln!(out, "  Type:        {}", entry.kind)?;
    Ok(())
}

fn cli_new(args: &[String], session: &Session, out: &mut impl Write) -> Result<()> {
    let words = positional(args);
    let [amount, kind, category, description @ ..] = words.as_slice() else {
        anyhow::bail!("Usage: poupp new <amount> <income|expense> <category> [description...]");
    };

    let amount = parse_manual_amount(amount)?;
    let kind = EntryType::parse(kind).ok_or_else(|| {
        let known: Vec<&str> = EntryType::all().iter().map(|k| k.as_str()).collect();
        anyhow::anyhow!("Unknown type '{kind}', use {}", known.join(" or "))
    })?;
    let taxonomy = session.parser.taxonomy();
    let category = taxonomy.find_label(category).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown category '{category}'. Choose one of: {}",
            taxonomy.labels().join(", ")
        )
    })?;
    let description = if description.is_empty() {
        taxonomy.fallback_description.clone()
    } else {
        description.join(" ")
    };
    let date = parse_date_flag(args)?;

    let entry: QuickEntry =
        quick_entry::assemble(amount, description, category.to_string(), kind);
    let (profile, owner) = session.owner()?;
    let txn = Transaction::from_quick_entry(entry, "", &owner, date);
    session.db.insert_transaction(&txn)?;

    writeln!(out, "Saved to {profile}:")?;
    print_transaction(&txn, out)
}

fn cli_list(args: &[String], session: &Session, out: &mut impl Write) -> Result<()> {
    let month = positional(args).first().map(|m| parse_month(m)).transpose()?;
    let (profile, owner) = session.owner()?;
    let txns = session.db.get_transactions(&owner, month.as_deref(), None)?;

    if txns.is_empty() {
        writeln!(out, "No transactions in {profile}")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<8} {:<10} {:<28} {:<14} {:>14}",
        "ID", "Date", "Description", "Category", "Amount"
    )?;
    writeln!(out, "{}", "─".repeat(78))?;
    for txn in &txns {
        print_transaction(txn, out)?;
    }
    writeln!(out)?;
    writeln!(out, "{} transaction(s) in {profile}", txns.len())?;
    Ok(())
}

fn cli_delete(args: &[String], session: &Session, out: &mut impl Write) -> Result<()> {
    let Some(id) = positional(args).first().copied() else {
        anyhow::bail!("Usage: poupp delete <id>");
    };
    if !session.db.delete_transaction(&session.user_id, id)? {
        anyhow::bail!("No transaction matches id '{id}'");
    }
    writeln!(out, "Deleted {id}")?;
    Ok(())
}

fn cli_summary(args: &[String], session: &Session, out: &mut impl Write) -> Result<()> {
    let month = match positional(args).first() {
        Some(m) => parse_month(m)?,
        None => current_month(),
    };
    let (profile, owner) = session.owner()?;

    let (income, expenses) = session.db.get_monthly_totals(&owner, &month)?;
    let net = income + expenses;
    let balance = session.db.get_balance(&owner)?;
    let spending = session.db.get_spending_by_category(&owner, &month)?;
    let txn_count = session.db.get_transaction_count(&owner, &month)?;

    writeln!(out, "Poupp — {profile} — {month}")?;
    writeln!(out, "{}", "─".repeat(40))?;
    writeln!(out, "  Income:     {}", format_amount(income))?;
    writeln!(out, "  Expenses:   {}", format_amount(expenses.abs()))?;
    writeln!(out, "  Net:        {}", format_amount(net))?;
    writeln!(out, "  Balance:    {}", format_amount(balance))?;
    writeln!(out, "  Entries:    {txn_count}")?;

    if !spending.is_empty() {
        writeln!(out)?;
        writeln!(out, "Spending by Category:")?;
        for (name, amount) in &spending {
            writeln!(out, "  {name:<24} {}", format_amount(amount.abs()))?;
        }
    }
    Ok(())
}

fn cli_export(args: &[String], session: &Session, out: &mut impl Write) -> Result<()> {
    let month = match flag_value(args, "--month") {
        Some(m) => parse_month(m)?,
        None => current_month(),
    };

    let output_path = positional(args)
        .first()
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/poupp-export-{month}.csv")
        });

    let (_, owner) = session.owner()?;
    let count = session
        .db
        .export_to_csv(Path::new(&output_path), &owner, Some(&month))?;
    if count == 0 {
        writeln!(out, "No transactions for {month}")?;
    } else {
        writeln!(out, "Exported {count} transactions to {output_path}")?;
    }
    Ok(())
}

fn cli_profiles(session: &Session, out: &mut impl Write) -> Result<()> {
    let profiles = session.db.get_profiles(&session.user_id)?;
    if profiles.is_empty() {
        writeln!(out, "No profiles")?;
        return Ok(());
    }
    let active_id = session
        .db
        .get_active_profile(&session.user_id)?
        .and_then(|p| p.id);
    for profile in &profiles {
        let marker = if profile.id == active_id { "*" } else { " " };
        writeln!(out, "{marker} {profile}")?;
    }
    Ok(())
}

fn cli_profile(args: &[String], session: &Session, out: &mut impl Write) -> Result<()> {
    let words = positional(args);
    let (action, name) = match words.as_slice() {
        [action, name @ ..] if !name.is_empty() => (*action, name.join(" ")),
        _ => anyhow::bail!("Usage: poupp profile <add|use> <name>"),
    };

    let profiles = session.db.get_profiles(&session.user_id)?;
    match action {
        "add" => {
            if Profile::find_by_name(&profiles, &name).is_some() {
                anyhow::bail!("Profile '{name}' already exists");
            }
            let profile = Profile::new(session.user_id.clone(), name);
            session.db.insert_profile(&profile)?;
            writeln!(out, "Created profile {profile}")?;
        }
        "use" => {
            let profile = Profile::find_by_name(&profiles, &name)
                .ok_or_else(|| anyhow::anyhow!("Profile '{name}' not found"))?;
            let id = profile
                .id
                .ok_or_else(|| anyhow::anyhow!("Profile has no ID"))?;
            session.db.set_active_profile(&session.user_id, id)?;
            writeln!(out, "Active profile: {profile}")?;
        }
        other => anyhow::bail!("Unknown profile action: {other}"),
    }
    Ok(())
}

fn cli_categories(session: &Session, out: &mut impl Write) -> Result<()> {
    let taxonomy = session.parser.taxonomy();
    writeln!(
        out,
        "{:<16} income   {}",
        taxonomy.income.label,
        taxonomy.income.keywords.join(", ")
    )?;
    for rule in &taxonomy.expense {
        writeln!(out, "{:<16} expense  {}", rule.label, rule.keywords.join(", "))?;
    }
    writeln!(out, "{:<16} expense  (no keyword matched)", taxonomy.fallback_category)?;
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────

fn print_transaction(txn: &Transaction, out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "{:<8} {:<10} {:<28} {:<14} {:>14}",
        txn.id.get(..8).unwrap_or(txn.id.as_str()),
        txn.date,
        truncate(&txn.description, 28),
        truncate(&txn.category, 14),
        format_amount(txn.amount),
    )?;
    Ok(())
}

/// Words that are neither flags nor flag values.
fn positional(args: &[String]) -> Vec<&str> {
    let mut words = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else {
            words.push(arg.as_str());
        }
    }
    words
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_date_flag(args: &[String]) -> Result<NaiveDate> {
    match flag_value(args, "--date") {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{raw}', expected YYYY-MM-DD")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Canonical `YYYY-MM`, since the ledger filters by date prefix.
fn parse_month(raw: &str) -> Result<String> {
    let first = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{raw}', expected YYYY-MM"))?;
    Ok(first.format("%Y-%m").to_string())
}

fn current_month() -> String {
    chrono::Local::now().format("%Y-%m").to_string()
}

/// The whole word must be a positive number; comma is a decimal separator.
fn parse_manual_amount(raw: &str) -> Result<Decimal> {
    let normalized = raw.replace(',', ".");
    let amount = Decimal::from_str(&normalized)
        .with_context(|| format!("Invalid amount '{raw}'"))?;
    if amount <= Decimal::ZERO {
        anyhow::bail!("Amount must be greater than zero");
    }
    Ok(amount)
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
