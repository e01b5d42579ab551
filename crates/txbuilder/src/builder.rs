use std::fmt;

use bitcoin::{
    address::NetworkUnchecked,
    secp256k1::{All, Secp256k1, Signing, Verification},
    Address, Amount, Network, ScriptBuf, Transaction, TxOut,
};
use didbtc_key_derivation::TaprootKey;
use didbtc_primitives::{constants::DUST_LIMIT, WalletUtxo};

use crate::{
    commit_reveal::{build_commit_reveal, CommitRevealRequest},
    fee::{add_change_if_economically_feasible, calculate_fee_and_input_value, make_txin, unsigned_tx},
    signing::{key_path_prevouts, sign_key_path_inputs},
    BuilderError, ChangeOutput, CommitRevealTransactions, DidOutputSpec, Funding,
};

/// Builds signed did:btc transactions for one network.
///
/// The secp context is supplied by the caller so one context can be shared across builders.
pub struct DidTxBuilder<C: Signing + Verification = All> {
    pub(crate) secp: Secp256k1<C>,
    pub(crate) network: Network,
}

impl<C: Signing + Verification> fmt::Debug for DidTxBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DidTxBuilder")
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}

impl<C: Signing + Verification> DidTxBuilder<C> {
    pub fn new(secp: Secp256k1<C>, network: Network) -> Self {
        Self { secp, network }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Script receiving change: the given address if it belongs to this network, otherwise
    /// the key-path output of `signer`.
    pub(crate) fn change_script(
        &self,
        change_address: Option<&Address<NetworkUnchecked>>,
        signer: &TaprootKey,
    ) -> Result<ScriptBuf, BuilderError> {
        match change_address {
            Some(address) => address
                .clone()
                .require_network(self.network)
                .map(|address| address.script_pubkey())
                .map_err(|source| BuilderError::InvalidChangeAddress {
                    network: self.network,
                    source,
                }),
            None => Ok(signer.output_script().clone()),
        }
    }

    pub(crate) fn taproot_keys(&self, wallet_utxos: &[WalletUtxo]) -> Vec<TaprootKey> {
        wallet_utxos
            .iter()
            .map(|wallet| TaprootKey::new(&self.secp, &wallet.secret_key))
            .collect()
    }

    /// Builds and key-path signs a transaction spending `wallet_utxos` into `outputs`, adding
    /// change when worthwhile. `output_value` is the value change is computed against.
    pub(crate) fn build_key_path_tx(
        &self,
        wallet_utxos: &[WalletUtxo],
        keys: &[TaprootKey],
        outputs: Vec<TxOut>,
        output_value: Amount,
        change_script: &ScriptBuf,
        fee_rate: u64,
    ) -> Result<(Transaction, Option<ChangeOutput>), BuilderError> {
        let utxos: Vec<_> = wallet_utxos.iter().map(|wallet| wallet.utxo).collect();
        let estimate = calculate_fee_and_input_value(
            &utxos,
            &outputs,
            change_script,
            fee_rate,
            self.network,
        )?;

        let mut tx = unsigned_tx(
            utxos.iter().map(|utxo| make_txin(utxo.outpoint())).collect(),
            outputs,
        );
        let change = add_change_if_economically_feasible(
            &mut tx,
            change_script,
            estimate.input_value,
            output_value,
            estimate.fee,
            self.network,
        )?;
        sign_key_path_inputs(&self.secp, &mut tx, keys, &key_path_prevouts(keys, &utxos))?;

        Ok((tx, change))
    }

    /// Spends `did_utxo` first, then the funding UTXOs, into a commit/reveal pair carrying
    /// `payload`. The DID key signs the reveal and receives change by default.
    pub(crate) fn spend_did_with_reveal(
        &self,
        did_utxo: WalletUtxo,
        funding: Funding,
        did_output: &DidOutputSpec,
        payload: &[u8],
    ) -> Result<CommitRevealTransactions, BuilderError> {
        let signer = TaprootKey::new(&self.secp, &did_utxo.secret_key);
        let change_script = self.change_script(funding.change_address.as_ref(), &signer)?;

        let mut wallet_utxos = Vec::with_capacity(1 + funding.wallet_utxos.len());
        wallet_utxos.push(did_utxo);
        wallet_utxos.extend(funding.wallet_utxos);

        build_commit_reveal(
            &self.secp,
            CommitRevealRequest {
                payload,
                wallet_utxos: &wallet_utxos,
                change_script,
                did_output,
                fee_rate: funding.fee_rate,
                network: self.network,
            },
        )
    }
}

pub(crate) fn check_fee_rate(fee_rate: u64) -> Result<(), BuilderError> {
    if fee_rate < 1 {
        return Err(BuilderError::FeeRateTooLow(fee_rate));
    }
    Ok(())
}

pub(crate) fn check_did_output(did_output: &DidOutputSpec) -> Result<(), BuilderError> {
    if did_output.value < DUST_LIMIT {
        return Err(BuilderError::DidOutputBelowDust(did_output.value));
    }
    Ok(())
}
