use ldp_types::{Identifier, TypeError};

/// Errors from store operations.
///
/// A missing resource or binary on read is not an error; `get` reports it as
/// a value. These variants cover the cases a caller must not ignore.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An operation that requires an existing resource found none.
    #[error("resource not found: {0}")]
    NotFound(Identifier),

    /// The byte source of a binary write could not be read to the end.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A ranged binary read fell outside the stored payload.
    #[error("range {from}..={to} out of bounds for {id} ({len} bytes)")]
    RangeOutOfBounds {
        id: Identifier,
        from: usize,
        to: usize,
        len: usize,
    },

    /// The store configuration is unreadable or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A value failed type-level validation.
    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
