use thiserror::Error;

/// Errors raised while encoding or decoding keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The multibase string is empty.
    #[error("empty multibase string")]
    EmptyMultibase,

    /// Only base58btc (`z`) is supported.
    #[error("unsupported multibase prefix '{0}'")]
    UnsupportedMultibase(char),

    /// The base58 body could not be decoded.
    #[error("invalid base58 body: {0}")]
    Base58(String),

    /// The leading bytes do not name a supported multicodec.
    #[error("unrecognized multicodec prefix {0}")]
    UnrecognizedCodec(String),

    /// The key does not have the length required by its codec.
    #[error("{codec} keys are {expected} bytes, got {actual}")]
    InvalidKeyLength {
        codec: &'static str,
        expected: usize,
        actual: usize,
    },
}
