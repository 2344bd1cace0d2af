use anyhow::Result;

use crate::models::{Reservation, ReservationFields};

/// The five CRUD operations every screen goes through. Screens never touch a
/// connection directly; they hold whatever store the shell injected, which is
/// the SQLite-backed one in production and a `Vec`-backed fake in tests.
pub trait ReservationStore {
    /// Insert a new reservation and return the id the store assigned to it.
    fn create(&self, fields: &ReservationFields) -> Result<i64>;

    /// Every stored reservation, most recently created first.
    fn list_all(&self) -> Result<Vec<Reservation>>;

    /// Look up a single reservation. A missing id is `Ok(None)`, not an error;
    /// only actual storage faults produce `Err`.
    fn get(&self, id: i64) -> Result<Option<Reservation>>;

    /// Overwrite all six fields of an existing reservation. Updating an id
    /// that no longer exists surfaces [`StoreError::NotFound`].
    ///
    /// [`StoreError::NotFound`]: super::StoreError::NotFound
    fn update(&self, id: i64, fields: &ReservationFields) -> Result<()>;

    /// Remove a reservation. Returns whether a row actually existed; deleting
    /// an absent id is not an error and must leave other rows untouched.
    fn delete(&self, id: i64) -> Result<bool>;
}
