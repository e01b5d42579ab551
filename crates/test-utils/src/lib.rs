//! Published testnet fixtures for did:btc.
//!
//! All transactions below were broadcast on testnet and are reproduced bit for bit by the
//! builders at a fee rate of [`FEE_RATE`].

use bitcoin::{consensus, secp256k1::SecretKey, Amount, Network, Transaction, Txid};
use didbtc_primitives::{Utxo, WalletUtxo};

pub const NETWORK: Network = Network::Testnet;

/// Fee rate (sat/vB) used for every fixture transaction.
pub const FEE_RATE: u64 = 17;

/// Key controlling the funding UTXO and all fixture DID outputs.
pub const SECRET_KEY_HEX: &str =
    "8e3a123ded116fddf4b5d3c424b4a77f78ba7282016960aa2574bc254c6b0b0c";

/// Tweaked x-only key of [`SECRET_KEY_HEX`], which is also the controller key of fixture DIDs.
pub const TWEAKED_KEY_HEX: &str =
    "5daf8e901f08dcf171e6bfea8a75cf9d312a489651203720de899bf3728f1b9e";

pub const FUNDING_TXID: &str = "48452f42ac0accd63a0467f7e0406945320061bd19971bf34478582d76e85dbe";
pub const FUNDING_VOUT: u32 = 1;
pub const FUNDING_VALUE: u64 = 4_131_295;

/// Ed25519 keys used for creation.
pub const PUBKEYS: [&str; 3] = [
    "988403912c92a9e10a384620a5eb6579da156b6d48fbe08dc5815d4abef38823",
    "b9b624758eea864d3268ac5d999e1b0ac3167313bc85ed1804b7d6713904a608",
    "548edbd592684fdf0a2a159d0f8845f22fdec8dc1f56d2209cb53acdb20f3d88",
];

/// Ed25519 keys swapped in by the batch update fixtures.
pub const UPDATED_PUBKEYS: [&str; 3] = [
    "dc1b32f3e3756160c48fa1f74f7d7651aea38d30a6a6e2f759fd7f423d4338e8",
    "4c0a076e0400c35d3d312131c10c71a8e95c4db7cbb1b558e218af23ae08168c",
    "2bca2c074ec4f7aa03279de6f724430e00aa196111ad158ad8b2f34b83c9152f",
];

/// Single creation of a DID for `PUBKEYS[0]` with default flags.
pub const CREATION_TX_HEX: &str = "01000000000101be5de8762d587844f31b9719bd610032456940e0f767043ad6cc0aac422f45480100000000ffffffff030000000000000000286a2664696403ed01988403912c92a9e10a384620a5eb6579da156b6d48fbe08dc5815d4abef388234a010000000000002251205daf8e901f08dcf171e6bfea8a75cf9d312a489651203720de899bf3728f1b9e1afb3e00000000002251205daf8e901f08dcf171e6bfea8a75cf9d312a489651203720de899bf3728f1b9e014003a115576176bc0cafcc2dbc9cccfad94737476fc3a8e15bc217756694eaa8e715cac8e9d60051c613cdc64236f23d5b639df1c67b8cb24a6f0fe221161f393600000000";

/// Reveal transaction of the batch creation of all three `PUBKEYS`.
pub const BATCH_REVEAL_TX_HEX: &str = "010000000001016287f37e2ed77d8e5e1bf5195b6b077d6e5dfc007e85d1ce25e9cae710d291680000000000ffffffff014a010000000000002251205daf8e901f08dcf171e6bfea8a75cf9d312a489651203720de899bf3728f1b9e0340df7658f7d09a34683bf17a917fd048c7dc5c9ace14b0cd4dd0f388221075d0ff625b3644f4e48c0d028b6051181d2b601ef68606cac3cf82d5082dd07320b2e58e205daf8e901f08dcf171e6bfea8a75cf9d312a489651203720de899bf3728f1b9eac00634c6764696473ed0103988403912c92a9e10a384620a5eb6579da156b6d48fbe08dc5815d4abef38823b9b624758eea864d3268ac5d999e1b0ac3167313bc85ed1804b7d6713904a608548edbd592684fdf0a2a159d0f8845f22fdec8dc1f56d2209cb53acdb20f3d886821c0684a27dce671f9d17f4a25763a83a68ab4f9df58aa5db92aa488499f4f0f37bd00000000";

pub const BATCH_COMMIT_TXID: &str =
    "6891d210e7cae925ced1857e00fc5d6e7d076b5b19f51b5e8e7dd72e7ef38762";
pub const BATCH_REVEAL_TXID: &str =
    "de7523bc733b5195025583a72eafc55aa636e0a7a536e87c5ebb1ae79df42252";
pub const BATCH_CHANGE_VOUT: u32 = 1;
pub const BATCH_CHANGE_VALUE: u64 = 4_125_695;

/// Reveal of the batch update that rotates the key of DID 0.
pub const FIRST_BATCH_UPDATE_TXID: &str =
    "a722f00dc17aba62689f51e6dc790f52f6320ff6f2a7b404377e382370782814";
/// Reveal of the batch update that rotates the keys of DIDs 1 and 2.
pub const SECOND_BATCH_UPDATE_TXID: &str =
    "82b011145bf47ff2caf3db2c342946cb1a9afadca1b4b6f19534b47145cc647c";

pub fn secret_key() -> SecretKey {
    SecretKey::from_slice(&hex::decode(SECRET_KEY_HEX).expect("fixture hex")).expect("fixture key")
}

pub fn txid(s: &str) -> Txid {
    s.parse().expect("fixture txid")
}

pub fn funding_utxo() -> WalletUtxo {
    WalletUtxo::new(
        Utxo::new(
            txid(FUNDING_TXID),
            FUNDING_VOUT,
            Amount::from_sat(FUNDING_VALUE),
        ),
        secret_key(),
    )
}

/// DID output created by the batch creation reveal.
pub fn batch_did_utxo() -> WalletUtxo {
    WalletUtxo::new(
        Utxo::new(txid(BATCH_REVEAL_TXID), 0, Amount::from_sat(330)),
        secret_key(),
    )
}

/// Change left by the batch creation commit.
pub fn batch_change_utxo() -> WalletUtxo {
    WalletUtxo::new(
        Utxo::new(
            txid(BATCH_COMMIT_TXID),
            BATCH_CHANGE_VOUT,
            Amount::from_sat(BATCH_CHANGE_VALUE),
        ),
        secret_key(),
    )
}

pub fn pubkeys() -> Vec<Vec<u8>> {
    PUBKEYS
        .iter()
        .map(|k| hex::decode(k).expect("fixture hex"))
        .collect()
}

pub fn updated_pubkeys() -> Vec<Vec<u8>> {
    UPDATED_PUBKEYS
        .iter()
        .map(|k| hex::decode(k).expect("fixture hex"))
        .collect()
}

pub fn decode_tx(tx_hex: &str) -> Transaction {
    consensus::deserialize(&hex::decode(tx_hex).expect("fixture hex")).expect("fixture tx")
}
