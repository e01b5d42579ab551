//! Core did:btc data model and the update operation algebra.

pub mod constants;
mod did;
mod errors;
mod relationships;
mod update;
mod utxo;

pub use did::{ControllerKey, Did, Metadata, VerificationMethod};
pub use errors::{OperationError, UpdateError};
pub use relationships::VerificationRelationships;
pub use update::{
    BatchDidUpdate, BatchUpdateEntry, DidUpdate, RawDidUpdate, RawVmOperation, VmOperation,
};
pub use utxo::{ParseUtxoError, Utxo, WalletUtxo};
