use std::path::PathBuf;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use crate::models::{Reservation, ReservationFields};

use super::error::StoreError;
use super::store::ReservationStore;

/// SQLite-backed reservation store. Holds only the database path; every
/// operation opens its own connection, runs a single statement, and drops the
/// connection again, so there is no long-lived handle to keep consistent with
/// the UI thread.
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Build a store over an existing database file. Callers are expected to
    /// have run [`ensure_schema`] against the same path first.
    ///
    /// [`ensure_schema`]: super::ensure_schema
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.path).context("failed to open SQLite database")
    }
}

/// Map a row to a `Reservation` by column name. The original column order in
/// the table is deliberately not relied upon; renumbering the SELECT list can
/// never silently swap two text fields.
fn row_to_reservation(row: &Row<'_>) -> rusqlite::Result<Reservation> {
    Ok(Reservation {
        id: row.get("id")?,
        fields: ReservationFields {
            name: row.get("name")?,
            flight_number: row.get("flight_number")?,
            departure: row.get("departure")?,
            destination: row.get("destination")?,
            date: row.get("date")?,
            seat_number: row.get("seat_number")?,
        },
    })
}

impl ReservationStore for SqliteStore {
    /// Insert a new reservation row and hand back the generated id so the
    /// caller can reference it without re-querying.
    fn create(&self, fields: &ReservationFields) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO reservations (name, flight_number, departure, destination, date, seat_number)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                fields.name,
                fields.flight_number,
                fields.departure,
                fields.destination,
                fields.date,
                fields.seat_number,
            ],
        )
        .context("failed to insert reservation")?;

        Ok(conn.last_insert_rowid())
    }

    /// Retrieve every reservation, newest id first. The query doubles as the
    /// single source of truth for how the list screen orders its rows.
    fn list_all(&self) -> Result<Vec<Reservation>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, name, flight_number, departure, destination, date, seat_number
                 FROM reservations ORDER BY id DESC",
            )
            .context("failed to prepare reservation query")?;

        let reservations = stmt
            .query_map([], |row| row_to_reservation(row))
            .context("failed to load reservations")?
            .collect::<Result<Vec<_>, _>>()
            .context("failed to collect reservations")?;

        Ok(reservations)
    }

    /// Fetch a single reservation. An absent id maps to `None` so callers can
    /// distinguish "gone" from a storage fault.
    fn get(&self, id: i64) -> Result<Option<Reservation>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, name, flight_number, departure, destination, date, seat_number
                 FROM reservations WHERE id = ?1",
            )
            .context("failed to prepare reservation lookup")?;

        let mut rows = stmt
            .query_map([id], |row| row_to_reservation(row))
            .context("failed to query reservation")?;

        match rows.next() {
            Some(row) => Ok(Some(row.context("failed to read reservation row")?)),
            None => Ok(None),
        }
    }

    /// Overwrite all six fields for an existing reservation. We surface a
    /// typed error when nothing was updated so the UI can show a friendly
    /// message instead of silently continuing.
    fn update(&self, id: i64, fields: &ReservationFields) -> Result<()> {
        let conn = self.connect()?;
        let updated = conn
            .execute(
                "UPDATE reservations
                 SET name = ?1, flight_number = ?2, departure = ?3,
                     destination = ?4, date = ?5, seat_number = ?6
                 WHERE id = ?7",
                params![
                    fields.name,
                    fields.flight_number,
                    fields.departure,
                    fields.destination,
                    fields.date,
                    fields.seat_number,
                    id,
                ],
            )
            .context("failed to update reservation")?;

        if updated == 0 {
            Err(StoreError::NotFound(id).into())
        } else {
            Ok(())
        }
    }

    /// Remove a reservation row. Deleting an id that is already gone is a
    /// no-op, reported through the returned flag rather than an error.
    fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.connect()?;
        let deleted = conn
            .execute("DELETE FROM reservations WHERE id = ?1", params![id])
            .context("failed to delete reservation")?;

        Ok(deleted > 0)
    }
}
