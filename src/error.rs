use thiserror::Error;

/// Errors returned by [`HashTable`](crate::HashTable) operations.
///
/// A missing key is not an error for `get`, `remove` or `contains_key`; those
/// report it as `None`/`false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// A key-taking operation was given no key. This is a caller bug.
    #[error("Key can't be null")]
    InvalidArgument,
    /// `replace` was asked to update a key that has no mapping.
    #[error("Key does not exist, cannot replace")]
    NotFound,
    /// An insert walked its whole probe sequence without finding a usable slot.
    #[error("Probe sequence exhausted after {probes} steps at capacity {capacity}")]
    ProbeExhausted { probes: usize, capacity: usize },
}

pub type Result<T> = std::result::Result<T, MapError>;
