mod config;
mod db;
mod format;
mod models;
mod quick_entry;
mod run;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let settings = config::Settings::load()?;
    init_tracing(&settings.log_filter);

    let db = db::Database::open(&settings.db_path()?)?;
    db.ensure_default_profile(&settings.user_id)?;
    let parser = quick_entry::QuickEntryParser::new(settings.load_taxonomy()?);
    let session = run::Session::new(db, parser, settings.user_id);

    let args: Vec<String> = std::env::args().collect();
    run::as_cli(&args, &session, &mut std::io::stdout().lock())
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("Ignoring invalid POUPP_LOG '{filter}': {err}");
        EnvFilter::new("warn")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
