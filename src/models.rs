//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. The intent is that these types stay light-weight data holders so other
//! layers can focus on presentation and persistence logic. Keeping the
//! commentary here means later refactors can reconstruct the assumptions even
//! if other context is lost.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// The six user-entered fields of a reservation, without the identifier.
/// Grouping them lets `create` and `update` take a single value and lets tests
/// compare a full round-trip with one equality check.
pub struct ReservationFields {
    /// Passenger full name.
    pub name: String,
    /// Airline flight code, stored as entered (e.g. "AA1234").
    pub flight_number: String,
    /// Departure city or airport.
    pub departure: String,
    /// Destination city or airport.
    pub destination: String,
    /// Travel date. Kept as raw text so the store never rejects what the form
    /// accepted; the form only requires it to be non-empty.
    pub date: String,
    /// Seat assignment (e.g. "12A").
    pub seat_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A stored reservation: the immutable row id plus the editable fields.
pub struct Reservation {
    /// Primary key from the database. We keep this around even when the UI only
    /// needs display information because edit/delete flows bubble the id back to
    /// the persistence layer.
    pub id: i64,
    /// The six editable text fields.
    pub fields: ReservationFields,
}

impl Reservation {
    /// Compose a `Departure -> Destination` string for dialogs and footers.
    pub fn route(&self) -> String {
        format!("{} -> {}", self.fields.departure, self.fields.destination)
    }

    /// One-line summary used by delete confirmations so the user sees exactly
    /// which booking is about to disappear.
    pub fn summary(&self) -> String {
        format!(
            "{} on {} ({})",
            self.fields.name, self.fields.flight_number, self.fields.date
        )
    }
}

impl fmt::Display for Reservation {
    /// Write the summary to any formatter so the type plays nicely with
    /// Ratatui widgets that consume strings implicitly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
