use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EncodingError;

/// Public key multicodecs understood by the method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Codec {
    /// Compressed secp256k1 public key (33 bytes).
    #[serde(rename = "secp256k1-pub")]
    Secp256k1Pub,

    /// Ed25519 public key (32 bytes).
    #[default]
    #[serde(rename = "ed25519-pub")]
    Ed25519Pub,
}

impl Codec {
    /// Multicodec varint prefix.
    pub const fn prefix(&self) -> [u8; 2] {
        match self {
            Codec::Secp256k1Pub => [0xe7, 0x01],
            Codec::Ed25519Pub => [0xed, 0x01],
        }
    }

    /// Expected length of a bare public key for this codec.
    pub const fn pubkey_len(&self) -> usize {
        match self {
            Codec::Secp256k1Pub => 33,
            Codec::Ed25519Pub => 32,
        }
    }

    /// Multicodec table name.
    pub const fn name(&self) -> &'static str {
        match self {
            Codec::Secp256k1Pub => "secp256k1-pub",
            Codec::Ed25519Pub => "ed25519-pub",
        }
    }

    /// Looks up the codec named by the first two bytes of `bytes`.
    pub fn from_prefix(bytes: &[u8]) -> Result<Self, EncodingError> {
        match bytes {
            [0xe7, 0x01, ..] => Ok(Codec::Secp256k1Pub),
            [0xed, 0x01, ..] => Ok(Codec::Ed25519Pub),
            _ => Err(EncodingError::UnrecognizedCodec(hex::encode(
                &bytes[..bytes.len().min(2)],
            ))),
        }
    }

    /// Checks that `key` has the length this codec requires.
    pub fn check_key_len(&self, key: &[u8]) -> Result<(), EncodingError> {
        if key.len() != self.pubkey_len() {
            return Err(EncodingError::InvalidKeyLength {
                codec: self.name(),
                expected: self.pubkey_len(),
                actual: key.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Codec {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secp256k1-pub" | "secp256k1" => Ok(Codec::Secp256k1Pub),
            "ed25519-pub" | "ed25519" => Ok(Codec::Ed25519Pub),
            other => Err(EncodingError::UnrecognizedCodec(other.to_owned())),
        }
    }
}
