//! Binary entry point that glues the SQLite-backed domain model to the TUI.
//! Summarizing the bootstrapping pipeline here keeps the intent obvious when
//! revisiting the code: we bring up the database schema, wire the store into
//! the app shell, and drive the Ratatui event loop until the user exits.
use flight_reservation_manager::{
    default_db_path, ensure_schema, run_app, App, SqliteStore,
};

/// Initialize persistence and launch the Ratatui event loop.
///
/// Returning a `Result` bubbles up fatal initialization problems (for example
/// an unwritable home directory) to the terminal instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let db_path = default_db_path()?;
    ensure_schema(&db_path)?;

    let store = SqliteStore::at_path(db_path);
    let mut app = App::new(Box::new(store));
    run_app(&mut app)
}
