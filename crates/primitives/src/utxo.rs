use std::str::FromStr;

use bitcoin::{secp256k1::SecretKey, Amount, OutPoint, Txid};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reference to a spendable output and its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Utxo {
    pub txid: Txid,
    pub vout: u32,
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub value: Amount,
}

impl Utxo {
    pub fn new(txid: Txid, vout: u32, value: Amount) -> Self {
        Self { txid, vout, value }
    }

    pub fn outpoint(&self) -> OutPoint {
        OutPoint::new(self.txid, self.vout)
    }
}

/// Error parsing the `txid:vout:sats` form of a [`Utxo`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid utxo '{0}', expected txid:vout:sats")]
pub struct ParseUtxoError(String);

impl FromStr for Utxo {
    type Err = ParseUtxoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseUtxoError(s.to_owned());
        let mut parts = s.split(':');
        let (Some(txid), Some(vout), Some(value), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(err());
        };
        Ok(Utxo {
            txid: txid.parse().map_err(|_| err())?,
            vout: vout.parse().map_err(|_| err())?,
            value: Amount::from_sat(value.parse().map_err(|_| err())?),
        })
    }
}

/// A UTXO paired with the key of its key-path P2TR output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletUtxo {
    pub utxo: Utxo,
    pub secret_key: SecretKey,
}

impl WalletUtxo {
    pub fn new(utxo: Utxo, secret_key: SecretKey) -> Self {
        Self { utxo, secret_key }
    }
}
