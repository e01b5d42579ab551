//! Subcommand execution.

use std::{env, fs, path::Path};

use anyhow::{bail, Context};
use bitcoin::{
    address::NetworkUnchecked,
    secp256k1::{Secp256k1, SecretKey},
    Address, Network, ScriptBuf,
};
use didbtc_config::Config;
use didbtc_document::{is_did_btc, DidDocument};
use didbtc_encoding::Multikey;
use didbtc_primitives::{
    BatchDidUpdate, Did, DidUpdate, Utxo, VerificationRelationships, WalletUtxo,
};
use didbtc_resolver::resolve_did_from_hex;
use didbtc_txbuilder::{
    BatchCreateParams, BatchUpdateParams, CreateParams, DeactivateParams, DidOutputSpec,
    DidTxBuilder, Funding, UpdateParams,
};
use serde::Deserialize;
use tracing::*;

use crate::{
    args::{
        Args, SubcBatchCreate, SubcBatchUpdate, SubcCreate, SubcDeactivate, SubcResolve,
        SubcUpdate, Subcommand,
    },
    output::{commit_reveal_json, print_json, resolution_json, transaction_json},
};

/// Secret key environment variable, read when no key file is given.
const SECRET_KEY_ENVVAR: &str = "DIDBTC_SECRET_KEY";

/// Settings resolved from the config file and global flags.
#[derive(Debug)]
pub(crate) struct CmdContext {
    pub(crate) config: Config,
    pub(crate) network: Network,
    fee_rate: Option<u64>,
}

impl CmdContext {
    pub(crate) fn from_args(args: &Args) -> anyhow::Result<Self> {
        let config = match &args.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };
        let network = match &args.bitcoin_network {
            Some(name) => name
                .parse()
                .with_context(|| format!("unsupported network option: {name}"))?,
            None => config.network,
        };
        Ok(Self {
            fee_rate: args.fee_rate.or(config.fee_rate),
            config,
            network,
        })
    }

    fn fee_rate(&self) -> anyhow::Result<u64> {
        self.fee_rate
            .context("no fee rate, pass --fee-rate or set fee_rate in the config")
    }

    fn builder(&self) -> DidTxBuilder {
        DidTxBuilder::new(Secp256k1::new(), self.network)
    }

    fn funding(
        &self,
        utxos: &[Utxo],
        secret_key: SecretKey,
        change_address: Option<&str>,
    ) -> anyhow::Result<Funding> {
        let wallet_utxos = utxos
            .iter()
            .map(|utxo| WalletUtxo::new(*utxo, secret_key))
            .collect();
        let mut funding = Funding::new(self.fee_rate()?, wallet_utxos);
        if let Some(address) = change_address {
            let address: Address<NetworkUnchecked> = address
                .parse()
                .with_context(|| format!("invalid change address {address}"))?;
            funding = funding.with_change_address(address);
        }
        Ok(funding)
    }

    fn did_output(&self, did_script: Option<&str>) -> anyhow::Result<DidOutputSpec> {
        let script = did_script
            .map(|script| hex::decode(script).map(ScriptBuf::from_bytes))
            .transpose()
            .context("invalid DID output script")?;
        Ok(DidOutputSpec {
            value: self.config.did_value(),
            script,
        })
    }
}

/// One element of the `--updates` file of `batch-update`.
#[derive(Debug, Deserialize)]
struct BatchUpdateFileEntry {
    index: u32,
    did: Did,
    update: DidUpdate,
}

pub(crate) fn exec_subc(subc: Subcommand, ctx: &CmdContext) -> anyhow::Result<()> {
    match subc {
        Subcommand::Create(subc) => exec_create(subc, ctx),
        Subcommand::BatchCreate(subc) => exec_batch_create(subc, ctx),
        Subcommand::Update(subc) => exec_update(subc, ctx),
        Subcommand::BatchUpdate(subc) => exec_batch_update(subc, ctx),
        Subcommand::Deactivate(subc) => exec_deactivate(subc, ctx),
        Subcommand::Resolve(subc) => exec_resolve(subc),
    }
}

fn exec_create(subc: SubcCreate, ctx: &CmdContext) -> anyhow::Result<()> {
    let secret_key = load_secret_key(subc.key_file.as_deref())?;
    let key = hex::decode(&subc.pubkey).context("invalid public key hex")?;
    subc.codec.check_key_len(&key)?;

    let created = ctx.builder().create(CreateParams {
        multikey: Multikey::new(subc.codec, &key),
        flags: VerificationRelationships::new(subc.flags)?,
        did_output: ctx.did_output(subc.did_script.as_deref())?,
        funding: ctx.funding(&subc.utxo, secret_key, subc.change_address.as_deref())?,
    })?;
    info!(txid = %created.txid(), "created DID");
    print_json(&transaction_json(&created))
}

fn exec_batch_create(subc: SubcBatchCreate, ctx: &CmdContext) -> anyhow::Result<()> {
    let secret_key = load_secret_key(subc.key_file.as_deref())?;
    let pubkeys = subc
        .pubkey
        .iter()
        .map(hex::decode)
        .collect::<Result<Vec<_>, _>>()
        .context("invalid public key hex")?;
    if pubkeys.is_empty() {
        bail!("at least one --pubkey is required");
    }

    let txs = ctx.builder().batch_create(BatchCreateParams {
        pubkeys,
        codec: subc.codec,
        flags: VerificationRelationships::new(subc.flags)?,
        did_output: ctx.did_output(subc.did_script.as_deref())?,
        funding: ctx.funding(&subc.utxo, secret_key, subc.change_address.as_deref())?,
    })?;
    info!(reveal_txid = %txs.reveal.txid(), "created DID batch");
    print_json(&commit_reveal_json(&txs))
}

fn exec_update(subc: SubcUpdate, ctx: &CmdContext) -> anyhow::Result<()> {
    let secret_key = load_secret_key(subc.key_file.as_deref())?;
    let did: Did = read_json(&subc.did)?;
    let update: DidUpdate = read_json(&subc.update)?;

    let txs = ctx.builder().update(UpdateParams {
        did_utxo: WalletUtxo::new(subc.did_utxo, secret_key),
        did,
        update,
        did_output: ctx.did_output(subc.did_script.as_deref())?,
        funding: ctx.funding(&subc.utxo, secret_key, subc.change_address.as_deref())?,
    })?;
    info!(reveal_txid = %txs.reveal.txid(), "updated DID");
    print_json(&commit_reveal_json(&txs))
}

fn exec_batch_update(subc: SubcBatchUpdate, ctx: &CmdContext) -> anyhow::Result<()> {
    let secret_key = load_secret_key(subc.key_file.as_deref())?;
    let updates = match &subc.updates {
        Some(path) => read_json::<Vec<BatchUpdateFileEntry>>(path)?
            .into_iter()
            .map(|entry| BatchDidUpdate {
                index: entry.index,
                did: entry.did,
                update: entry.update,
            })
            .collect(),
        None => Vec::new(),
    };

    let txs = ctx.builder().batch_update(BatchUpdateParams {
        did_utxo: WalletUtxo::new(subc.did_utxo, secret_key),
        updates,
        deactivations: subc.deactivate,
        did_output: ctx.did_output(subc.did_script.as_deref())?,
        funding: ctx.funding(&subc.utxo, secret_key, subc.change_address.as_deref())?,
    })?;
    info!(reveal_txid = %txs.reveal.txid(), "updated DID batch");
    print_json(&commit_reveal_json(&txs))
}

fn exec_deactivate(subc: SubcDeactivate, ctx: &CmdContext) -> anyhow::Result<()> {
    let secret_key = load_secret_key(subc.key_file.as_deref())?;

    let deactivated = ctx.builder().deactivate(DeactivateParams {
        did_utxo: WalletUtxo::new(subc.did_utxo, secret_key),
        funding: ctx.funding(&subc.utxo, secret_key, subc.change_address.as_deref())?,
    })?;
    info!(txid = %deactivated.txid(), "deactivated DID");
    print_json(&transaction_json(&deactivated))
}

fn exec_resolve(subc: SubcResolve) -> anyhow::Result<()> {
    let tx_hexes = expand_tx_args(&subc.txs)?;
    let resolution = resolve_did_from_hex(&tx_hexes, subc.index)?;

    let mut out = resolution_json(&resolution)?;
    if let Some(id) = &subc.id {
        if !is_did_btc(id) {
            bail!("unsupported DID method: {id}");
        }
        out["document"] = serde_json::to_value(DidDocument::build(&resolution.did, id))?;
    }
    print_json(&out)
}

/// Replaces `@path` arguments with the non-empty lines of the file at `path`.
fn expand_tx_args(args: &[String]) -> anyhow::Result<Vec<String>> {
    let mut tx_hexes = Vec::with_capacity(args.len());
    for arg in args {
        match arg.strip_prefix('@') {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("reading transactions from {path}"))?;
                tx_hexes.extend(
                    contents
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(str::to_owned),
                );
            }
            None => tx_hexes.push(arg.clone()),
        }
    }
    if tx_hexes.is_empty() {
        bail!("no transactions given");
    }
    Ok(tx_hexes)
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> anyhow::Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

/// Reads the hex secret key from `key_file` or the `DIDBTC_SECRET_KEY` environment variable.
fn load_secret_key(key_file: Option<&Path>) -> anyhow::Result<SecretKey> {
    let key_hex = match key_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading key file {}", path.display()))?,
        None => env::var(SECRET_KEY_ENVVAR)
            .with_context(|| format!("no key file given and {SECRET_KEY_ENVVAR} is not set"))?,
    };
    let bytes = hex::decode(key_hex.trim()).context("secret key is not hex")?;
    Ok(SecretKey::from_slice(&bytes)?)
}
