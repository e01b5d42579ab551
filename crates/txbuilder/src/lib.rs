//! Builds and signs did:btc transactions.
//!
//! Single creation and deactivation are one key-path signed transaction each. Batch creation
//! and (batch) updates go through a commit transaction whose first output commits to a
//! reveal script, and a reveal transaction that spends it by script path and recreates the
//! DID output.

mod builder;
mod commit_reveal;
mod errors;
mod fee;
mod ops;
mod output;
mod params;
mod signing;

pub use builder::DidTxBuilder;
pub use errors::BuilderError;
pub use fee::{add_change_if_economically_feasible, calculate_fee_and_input_value, FeeEstimate};
pub use output::{ChangeOutput, CommitRevealTransactions, DidOutputRef, DidTransaction};
pub use params::{
    BatchCreateParams, BatchUpdateParams, CreateParams, DeactivateParams, DidOutputSpec,
    Funding, UpdateParams,
};
