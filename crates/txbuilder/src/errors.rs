use bitcoin::{
    address::{FromScriptError, ParseError},
    script::PushBytesError,
    sighash::TaprootError,
    taproot::TaprootBuilderError,
    Amount, Network,
};
use didbtc_envelope::EnvelopeError;
use didbtc_primitives::UpdateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("at least one wallet utxo is required")]
    NoUtxos,

    #[error("fee rate must be at least 1 sat/vB, got {0}")]
    FeeRateTooLow(u64),

    #[error("did output value {0} is below the 330 sat dust limit")]
    DidOutputBelowDust(Amount),

    #[error("insufficient funds: have {available}, need {required}")]
    InsufficientFunds { available: Amount, required: Amount },

    #[error("amount overflow while computing fees")]
    AmountOverflow,

    #[error("at least one public key is required")]
    NoPublicKeys,

    #[error("public key {index} is {actual} bytes, all keys must be {expected}")]
    KeyLength {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("no updates or deactivations provided")]
    EmptyBatchUpdate,

    #[error("invalid change address for {network}: {source}")]
    InvalidChangeAddress {
        network: Network,
        #[source]
        source: ParseError,
    },

    #[error("change script has no address: {0}")]
    ChangeScript(#[from] FromScriptError),

    #[error("invalid update: {0}")]
    Update(#[from] UpdateError),

    #[error("invalid update for batch index {index}: {source}")]
    BatchUpdate {
        index: u32,
        #[source]
        source: UpdateError,
    },

    #[error("serialize update: {0}")]
    Json(#[from] serde_json::Error),

    #[error("envelope: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("push: {0}")]
    PushBytes(#[from] PushBytesError),

    #[error("taproot tree: {0}")]
    TaprootTree(#[from] TaprootBuilderError),

    #[error("could not finalize taproot spend info")]
    IncompleteTaprootTree,

    #[error("reveal script missing from taproot spend info")]
    MissingControlBlock,

    #[error("sighash: {0}")]
    Sighash(#[from] TaprootError),
}
