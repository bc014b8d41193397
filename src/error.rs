use thiserror::Error;

/// Errors returned by fallible table operations.
///
/// Both kinds are recoverable: a failed operation leaves the table exactly as
/// it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Every slot is occupied. The table never grows, so the caller has to
    /// remove something before the insertion can succeed.
    #[error("hash table is full: all {capacity} slots are occupied")]
    TableFull {
        /// The fixed capacity of the table that rejected the insertion.
        capacity: usize,
    },
    /// No stored element is equal to the requested key.
    #[error("entry not found")]
    EntryNotFound,
}
