//! Command line arguments for the `didbtc` binary.

use std::path::PathBuf;

use argh::FromArgs;
use didbtc_encoding::Codec;
use didbtc_primitives::Utxo;

/// Args.
#[derive(FromArgs)]
pub(crate) struct Args {
    #[argh(option, description = "path to a TOML config file", short = 'c')]
    pub(crate) config: Option<PathBuf>,

    #[argh(
        option,
        description = "network name [bitcoin, testnet, signet, regtest]",
        short = 'b'
    )]
    pub(crate) bitcoin_network: Option<String>,

    #[argh(option, description = "fee rate in sat/vB, overrides the config")]
    pub(crate) fee_rate: Option<u64>,

    #[argh(subcommand)]
    pub(crate) subc: Subcommand,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
pub(crate) enum Subcommand {
    Create(SubcCreate),
    BatchCreate(SubcBatchCreate),
    Update(SubcUpdate),
    BatchUpdate(SubcBatchUpdate),
    Deactivate(SubcDeactivate),
    Resolve(SubcResolve),
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "create",
    description = "builds a transaction creating one DID"
)]
pub(crate) struct SubcCreate {
    #[argh(option, description = "public key in hex")]
    pub(crate) pubkey: String,

    #[argh(
        option,
        description = "key codec [ed25519-pub, secp256k1-pub]",
        default = "Codec::Ed25519Pub"
    )]
    pub(crate) codec: Codec,

    #[argh(option, description = "verification relationship flags", default = "3")]
    pub(crate) flags: u8,

    #[argh(option, description = "funding utxo as txid:vout:sats, repeatable")]
    pub(crate) utxo: Vec<Utxo>,

    #[argh(option, description = "address receiving change")]
    pub(crate) change_address: Option<String>,

    #[argh(option, description = "hex script of the new DID output")]
    pub(crate) did_script: Option<String>,

    #[argh(option, description = "reads the hex secret key from a file", short = 'f')]
    pub(crate) key_file: Option<PathBuf>,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "batch-create",
    description = "builds commit and reveal transactions creating one DID per key"
)]
pub(crate) struct SubcBatchCreate {
    #[argh(option, description = "public key in hex, repeatable")]
    pub(crate) pubkey: Vec<String>,

    #[argh(
        option,
        description = "key codec [ed25519-pub, secp256k1-pub]",
        default = "Codec::Ed25519Pub"
    )]
    pub(crate) codec: Codec,

    #[argh(option, description = "verification relationship flags", default = "3")]
    pub(crate) flags: u8,

    #[argh(option, description = "funding utxo as txid:vout:sats, repeatable")]
    pub(crate) utxo: Vec<Utxo>,

    #[argh(option, description = "address receiving change")]
    pub(crate) change_address: Option<String>,

    #[argh(option, description = "hex script of the new DID output")]
    pub(crate) did_script: Option<String>,

    #[argh(option, description = "reads the hex secret key from a file", short = 'f')]
    pub(crate) key_file: Option<PathBuf>,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "update",
    description = "builds commit and reveal transactions updating one DID"
)]
pub(crate) struct SubcUpdate {
    #[argh(option, description = "utxo holding the DID as txid:vout:sats")]
    pub(crate) did_utxo: Utxo,

    #[argh(option, description = "JSON file with the current DID state")]
    pub(crate) did: PathBuf,

    #[argh(option, description = "JSON file with the update")]
    pub(crate) update: PathBuf,

    #[argh(option, description = "extra funding utxo as txid:vout:sats, repeatable")]
    pub(crate) utxo: Vec<Utxo>,

    #[argh(option, description = "address receiving change")]
    pub(crate) change_address: Option<String>,

    #[argh(option, description = "hex script of the new DID output")]
    pub(crate) did_script: Option<String>,

    #[argh(option, description = "reads the hex secret key from a file", short = 'f')]
    pub(crate) key_file: Option<PathBuf>,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "batch-update",
    description = "builds commit and reveal transactions updating DIDs of one batch"
)]
pub(crate) struct SubcBatchUpdate {
    #[argh(option, description = "utxo holding the batch as txid:vout:sats")]
    pub(crate) did_utxo: Utxo,

    #[argh(
        option,
        description = "JSON file with an array of index, did and update objects"
    )]
    pub(crate) updates: Option<PathBuf>,

    #[argh(option, description = "batch index to deactivate, repeatable")]
    pub(crate) deactivate: Vec<u32>,

    #[argh(option, description = "extra funding utxo as txid:vout:sats, repeatable")]
    pub(crate) utxo: Vec<Utxo>,

    #[argh(option, description = "address receiving change")]
    pub(crate) change_address: Option<String>,

    #[argh(option, description = "hex script of the new DID output")]
    pub(crate) did_script: Option<String>,

    #[argh(option, description = "reads the hex secret key from a file", short = 'f')]
    pub(crate) key_file: Option<PathBuf>,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "deactivate",
    description = "builds a transaction deactivating a DID"
)]
pub(crate) struct SubcDeactivate {
    #[argh(option, description = "utxo holding the DID as txid:vout:sats")]
    pub(crate) did_utxo: Utxo,

    #[argh(option, description = "extra funding utxo as txid:vout:sats, repeatable")]
    pub(crate) utxo: Vec<Utxo>,

    #[argh(option, description = "address receiving change")]
    pub(crate) change_address: Option<String>,

    #[argh(option, description = "reads the hex secret key from a file", short = 'f')]
    pub(crate) key_file: Option<PathBuf>,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "resolve",
    description = "resolves a DID from its transactions"
)]
pub(crate) struct SubcResolve {
    #[argh(
        positional,
        description = "transaction hex, creation first, or @path to a file with one per line"
    )]
    pub(crate) txs: Vec<String>,

    #[argh(option, description = "index of the DID within a batch creation")]
    pub(crate) index: Option<u32>,

    #[argh(option, description = "did:btc identifier to render a DID document for")]
    pub(crate) id: Option<String>,
}
