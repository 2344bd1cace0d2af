use thiserror::Error;

/// Typed failures from the persistence layer. Most rusqlite errors travel as
/// anyhow context chains; `NotFound` gets its own variant so the UI can tell a
/// stale id apart from a genuine storage fault when reporting to the user.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested reservation id does not exist (any more).
    #[error("Reservation #{0} not found.")]
    NotFound(i64),
}
