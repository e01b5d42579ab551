use bitcoin::{consensus::encode, Txid};
use didbtc_encoding::EncodingError;
use didbtc_envelope::EnvelopeError;
use didbtc_primitives::{OperationError, UpdateError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no transactions to resolve")]
    EmptyChain,

    #[error("invalid transaction hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid transaction: {0}")]
    Decode(#[from] encode::Error),

    #[error("creation transaction {0} has no outputs")]
    NoOutputs(Txid),

    #[error("creation output does not start with the \"did\" prefix")]
    InvalidCreationPrefix,

    #[error("batch payload does not start with the \"dids\" prefix")]
    InvalidBatchPrefix,

    #[error("batch creation requires a batch index")]
    MissingBatchIndex,

    #[error("batch index {index} out of range, batch holds {count} keys")]
    BatchIndexOutOfRange { index: u32, count: usize },

    #[error("creation flags: {0}")]
    Flags(#[from] OperationError),

    #[error("encoding: {0}")]
    Encoding(#[from] EncodingError),

    #[error("envelope: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("update in {txid} cannot be applied: {source}")]
    Update {
        txid: Txid,
        #[source]
        source: UpdateError,
    },
}
