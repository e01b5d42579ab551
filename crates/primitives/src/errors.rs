use didbtc_encoding::EncodingError;
use thiserror::Error;

/// A verification-method operation that cannot be classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// Relationship flags outside `1..=31`.
    #[error("verification relationship flags {0} out of range")]
    InvalidFlags(u8),

    /// Neither an index nor a complete key/flags pair.
    #[error("operation has neither an index nor both a key and flags")]
    Unclassifiable,
}

/// Errors raised while validating or applying an update to a DID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error("cannot update a deactivated DID")]
    Deactivated,

    #[error("invalid verification method index {index} (have {len})")]
    VerificationMethodIndex { index: u32, len: usize },

    #[error("metadata key {0} already exists")]
    MetadataKeyExists(String),

    #[error("metadata key {0} does not exist")]
    MetadataKeyMissing(String),

    /// Carries an operation that could not be classified.
    #[error("operation: {0}")]
    Operation(#[from] OperationError),

    /// A key in the update was not a valid multibase string.
    #[error("encoding: {0}")]
    Encoding(#[from] EncodingError),
}
