//! Error types for statement building.

use thiserror::Error;

/// Which precondition an entity failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidReason {
    /// No value was passed at all.
    Absent,
    /// The declared type has more than one level of reference.
    NestedReference,
    /// A single-level reference points at nothing.
    NullReference,
    /// The underlying type has no named fields.
    NotARecord,
    /// The record declares zero fields.
    NoFields,
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::Absent => "no value",
            Self::NestedReference => "reference to a reference",
            Self::NullReference => "null reference",
            Self::NotARecord => "not a record",
            Self::NoFields => "record has no fields",
        };
        f.write_str(reason)
    }
}

/// Errors raised while building a statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// The value cannot be turned into an INSERT statement.
    #[error("invalid entity: {0}")]
    InvalidEntity(InvalidReason),
}

impl EntityError {
    /// Returns the failed precondition.
    #[must_use]
    pub const fn reason(&self) -> InvalidReason {
        match self {
            Self::InvalidEntity(reason) => *reason,
        }
    }
}

impl From<InvalidReason> for EntityError {
    fn from(reason: InvalidReason) -> Self {
        Self::InvalidEntity(reason)
    }
}

/// Result type alias for statement building.
pub type Result<T> = std::result::Result<T, EntityError>;
