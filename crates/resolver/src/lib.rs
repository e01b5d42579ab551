//! Resolves the current state of a did:btc DID from its transaction chain.
//!
//! The first transaction creates the DID, either through an `OP_RETURN` output or as one key of
//! a batch inscribed in a reveal witness. Every later transaction is folded into the state in
//! order and yields an [`UpdateOutcome`] describing what it did.

mod creation;
mod errors;
mod outcome;
mod replay;


pub use creation::parse_creation;
pub use errors::ResolveError;
pub use outcome::{Resolution, SkipReason, UpdateOutcome};
pub use replay::{apply_update_transaction, decode_tx_hex, resolve_did, resolve_did_from_hex};
