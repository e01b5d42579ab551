//! did:btc identifiers and W3C DID documents.

mod document;
mod identifier;

pub use document::{DidDocument, DocumentVerificationMethod, DID_CONTEXT};
pub use identifier::{
    decode_did_btc, did_prefix, encode_did_btc, is_did_btc, BlockRef, BlockRefCodec,
    DidBtcIdentifier, IdentifierError, DID_BTC_PREFIX,
};
