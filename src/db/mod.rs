//! Persistence module split across logical submodules.

mod connection;
mod error;
mod reservations;
mod store;

pub use connection::{default_db_path, ensure_schema};
pub use error::StoreError;
pub use reservations::SqliteStore;
pub use store::ReservationStore;
