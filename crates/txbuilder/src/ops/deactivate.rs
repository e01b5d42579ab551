use bitcoin::{
    secp256k1::{Signing, Verification},
    Amount, TxOut,
};
use didbtc_primitives::constants::deactivation_script;
use tracing::*;

use crate::{builder::check_fee_rate, BuilderError, DeactivateParams, DidTransaction, DidTxBuilder};

impl<C: Signing + Verification> DidTxBuilder<C> {
    /// Spends the DID UTXO into an `OP_RETURN "d"` output without recreating it.
    pub fn deactivate(&self, params: DeactivateParams) -> Result<DidTransaction, BuilderError> {
        let DeactivateParams { did_utxo, funding } = params;
        check_fee_rate(funding.fee_rate)?;

        let mut wallet_utxos = Vec::with_capacity(1 + funding.wallet_utxos.len());
        wallet_utxos.push(did_utxo);
        wallet_utxos.extend(funding.wallet_utxos);

        let keys = self.taproot_keys(&wallet_utxos);
        let signer = keys.first().ok_or(BuilderError::NoUtxos)?;
        let change_script = self.change_script(funding.change_address.as_ref(), signer)?;

        let outputs = vec![TxOut {
            value: Amount::ZERO,
            script_pubkey: deactivation_script(),
        }];
        let (tx, change) = self.build_key_path_tx(
            &wallet_utxos,
            &keys,
            outputs,
            Amount::ZERO,
            &change_script,
            funding.fee_rate,
        )?;
        info!(txid = %tx.compute_txid(), "built DID deactivation transaction");

        Ok(DidTransaction {
            tx,
            change,
            did_output: None,
        })
    }
}
