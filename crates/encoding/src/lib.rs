//! Multicodec, multikey and multibase encodings used by did:btc.
//!
//! A multikey is a public key prefixed with a two byte multicodec varint. It is carried
//! on chain as raw bytes and in JSON as a base58btc multibase string (`z...`).

mod codec;
mod errors;
mod multibase;
mod multikey;

pub use codec::Codec;
pub use errors::EncodingError;
pub use multibase::{decode_multibase, encode_multibase, MULTIBASE_BASE58BTC_PREFIX};
pub use multikey::{decode_multikey, encode_multikey, prepend_codec_to_key, DecodedKey, Multikey};
