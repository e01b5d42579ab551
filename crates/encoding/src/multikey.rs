use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{decode_multibase, encode_multibase, Codec, EncodingError};

/// Prepends the multicodec prefix of `codec` to a bare public key.
pub fn prepend_codec_to_key(key: &[u8], codec: Codec) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + key.len());
    out.extend_from_slice(&codec.prefix());
    out.extend_from_slice(key);
    out
}

/// Encodes a bare public key as a multibase multikey string.
pub fn encode_multikey(key: &[u8], codec: Codec) -> String {
    encode_multibase(&prepend_codec_to_key(key, codec))
}

/// Decodes a multibase multikey string into its codec and bare key.
pub fn decode_multikey(s: &str) -> Result<DecodedKey, EncodingError> {
    Multikey::from_multibase(s)?.decode()
}

/// A bare key together with the codec it was tagged with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedKey {
    pub codec: Codec,
    pub key: Vec<u8>,
}

/// Codec-prefixed public key bytes.
///
/// The bytes are kept exactly as they appeared on chain or in an update payload; the codec
/// is only checked when the key is decoded.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Multikey(Vec<u8>);

impl Multikey {
    /// Tags a bare key with `codec`.
    pub fn new(codec: Codec, key: &[u8]) -> Self {
        Self(prepend_codec_to_key(key, codec))
    }

    /// Wraps already prefixed bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Parses a multibase string without inspecting the codec.
    pub fn from_multibase(s: &str) -> Result<Self, EncodingError> {
        decode_multibase(s).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn to_multibase(&self) -> String {
        encode_multibase(&self.0)
    }

    /// Splits the bytes into codec and key.
    pub fn decode(&self) -> Result<DecodedKey, EncodingError> {
        let codec = Codec::from_prefix(&self.0)?;
        Ok(DecodedKey {
            codec,
            key: self.0[2..].to_vec(),
        })
    }
}

impl fmt::Debug for Multikey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Multikey({})", self.to_multibase())
    }
}

impl fmt::Display for Multikey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_multibase())
    }
}

impl Serialize for Multikey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_multibase())
    }
}

impl<'de> Deserialize<'de> for Multikey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Multikey::from_multibase(&s).map_err(de::Error::custom)
    }
}
