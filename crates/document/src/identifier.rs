//! `did:btc` identifiers.
//!
//! An identifier is `did:btc:` (or `did:btc:test:` off mainnet) followed by a block reference
//! naming the creation transaction by block height and position, plus the index of the DID
//! when the transaction created a batch. The block reference encoding itself is supplied by a
//! [`BlockRefCodec`].

use std::error::Error as StdError;

use bitcoin::Network;
use thiserror::Error;

pub const DID_BTC_PREFIX: &str = "did:btc:";

const TESTNET_SEGMENT: &str = "test:";

/// Location of a creation transaction as carried by a block reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockRef {
    pub block_height: u32,
    pub tx_index: u32,
    pub outpoint: Option<u32>,
    pub network: Network,
}

/// Encodes and decodes the compact block reference that follows the method prefix.
pub trait BlockRefCodec {
    type Error: StdError + Send + Sync + 'static;

    /// Encodes `reference` without any human readable prefix.
    fn encode(&self, reference: &BlockRef) -> Result<String, Self::Error>;

    fn decode(&self, encoded: &str) -> Result<BlockRef, Self::Error>;
}

#[derive(Debug, Error)]
pub enum IdentifierError {
    #[error("unsupported DID method: {0}")]
    UnsupportedMethod(String),

    #[error("identifier is for {prefix} but the reference is for {network}")]
    NetworkMismatch {
        prefix: &'static str,
        network: Network,
    },

    #[error("block reference: {0}")]
    BlockRef(#[source] Box<dyn StdError + Send + Sync>),
}

/// Decoded components of a `did:btc` identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DidBtcIdentifier {
    pub block_height: u32,
    pub tx_index: u32,
    /// Index within a batch creation, 0 for single creations.
    pub did_index: u32,
    pub network: Network,
}

/// Method prefix for `network`.
pub fn did_prefix(network: Network) -> &'static str {
    match network {
        Network::Bitcoin => DID_BTC_PREFIX,
        _ => "did:btc:test:",
    }
}

pub fn is_did_btc(id: &str) -> bool {
    id.starts_with(DID_BTC_PREFIX)
}

pub fn encode_did_btc<C: BlockRefCodec>(
    codec: &C,
    identifier: &DidBtcIdentifier,
) -> Result<String, IdentifierError> {
    let reference = codec
        .encode(&BlockRef {
            block_height: identifier.block_height,
            tx_index: identifier.tx_index,
            outpoint: Some(identifier.did_index),
            network: identifier.network,
        })
        .map_err(|e| IdentifierError::BlockRef(Box::new(e)))?;
    Ok(format!("{}{reference}", did_prefix(identifier.network)))
}

/// Parses a `did:btc` identifier. A reference without an outpoint names DID 0.
pub fn decode_did_btc<C: BlockRefCodec>(
    codec: &C,
    id: &str,
) -> Result<DidBtcIdentifier, IdentifierError> {
    let rest = id
        .strip_prefix(DID_BTC_PREFIX)
        .ok_or_else(|| IdentifierError::UnsupportedMethod(id.to_owned()))?;
    let (is_test, reference) = match rest.strip_prefix(TESTNET_SEGMENT) {
        Some(reference) => (true, reference),
        None => (false, rest),
    };

    let block_ref = codec
        .decode(reference)
        .map_err(|e| IdentifierError::BlockRef(Box::new(e)))?;
    if is_test == (block_ref.network == Network::Bitcoin) {
        return Err(IdentifierError::NetworkMismatch {
            prefix: if is_test { "did:btc:test:" } else { DID_BTC_PREFIX },
            network: block_ref.network,
        });
    }

    Ok(DidBtcIdentifier {
        block_height: block_ref.block_height,
        tx_index: block_ref.tx_index,
        did_index: block_ref.outpoint.unwrap_or(0),
        network: block_ref.network,
    })
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::*;

    #[derive(Debug)]
    struct BadRef;

    impl fmt::Display for BadRef {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("bad reference")
        }
    }

    impl StdError for BadRef {}

    /// `<t|m>-<height>-<tx index>[-<outpoint>]`.
    struct DashedRef;

    impl BlockRefCodec for DashedRef {
        type Error = BadRef;

        fn encode(&self, reference: &BlockRef) -> Result<String, BadRef> {
            let net = if reference.network == Network::Bitcoin { "m" } else { "t" };
            let mut s = format!("{net}-{}-{}", reference.block_height, reference.tx_index);
            if let Some(outpoint) = reference.outpoint {
                s.push_str(&format!("-{outpoint}"));
            }
            Ok(s)
        }

        fn decode(&self, encoded: &str) -> Result<BlockRef, BadRef> {
            let parts: Vec<&str> = encoded.split('-').collect();
            let network = match parts.first() {
                Some(&"m") => Network::Bitcoin,
                Some(&"t") => Network::Testnet,
                _ => return Err(BadRef),
            };
            let num = |i: usize| -> Result<u32, BadRef> {
                parts.get(i).ok_or(BadRef)?.parse().map_err(|_| BadRef)
            };
            Ok(BlockRef {
                block_height: num(1)?,
                tx_index: num(2)?,
                outpoint: parts.get(3).map(|_| num(3)).transpose()?,
                network,
            })
        }
    }

    fn identifier(network: Network) -> DidBtcIdentifier {
        DidBtcIdentifier {
            block_height: 2_819_040,
            tx_index: 1738,
            did_index: 3,
            network,
        }
    }

    #[test]
    fn test_encode_per_network() {
        assert_eq!(
            encode_did_btc(&DashedRef, &identifier(Network::Testnet)).unwrap(),
            "did:btc:test:t-2819040-1738-3"
        );
        assert_eq!(
            encode_did_btc(&DashedRef, &identifier(Network::Bitcoin)).unwrap(),
            "did:btc:m-2819040-1738-3"
        );
    }

    #[test]
    fn test_decode_round_trip() {
        let id = encode_did_btc(&DashedRef, &identifier(Network::Testnet)).unwrap();
        assert!(is_did_btc(&id));
        assert_eq!(
            decode_did_btc(&DashedRef, &id).unwrap(),
            identifier(Network::Testnet)
        );
    }

    #[test]
    fn test_missing_outpoint_is_first_did() {
        let decoded = decode_did_btc(&DashedRef, "did:btc:m-100-2").unwrap();
        assert_eq!(decoded.did_index, 0);
        assert_eq!(decoded.network, Network::Bitcoin);
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            decode_did_btc(&DashedRef, "did:key:z6Mk"),
            Err(IdentifierError::UnsupportedMethod(_))
        ));
        assert!(matches!(
            decode_did_btc(&DashedRef, "did:btc:x-1-2"),
            Err(IdentifierError::BlockRef(_))
        ));
        assert!(matches!(
            decode_did_btc(&DashedRef, "did:btc:t-1-2"),
            Err(IdentifierError::NetworkMismatch { .. })
        ));
    }
}
