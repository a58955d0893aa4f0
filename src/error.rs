use thiserror::Error;

/// Errors reported by bijective maps and their views.
///
/// Every error is returned before the map is touched, so a failed call leaves
/// both directions exactly as they were.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The key is already paired with some value.
    #[error("the same key already exists")]
    DuplicateKey,

    /// The value is already paired with a different key.
    #[error("the same value already exists")]
    DuplicateValue,

    #[error("key not found")]
    KeyNotFound,

    /// A mutation was attempted through a read-only view.
    #[error("{operation} is not supported on a read-only map")]
    Unsupported { operation: &'static str },

    /// Storage for the requested number of pairs could not be allocated.
    #[error("capacity overflow")]
    CapacityOverflow,
}
