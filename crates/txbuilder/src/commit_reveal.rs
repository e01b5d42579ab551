//! Commit/reveal pair construction.

use std::slice;

use bitcoin::{
    hashes::Hash,
    secp256k1::{Secp256k1, Signing, Verification},
    taproot::{LeafVersion, TaprootBuilder},
    Network, OutPoint, ScriptBuf, TxOut, Txid, Witness,
};
use didbtc_envelope::build_reveal_script;
use didbtc_key_derivation::TaprootKey;
use didbtc_primitives::WalletUtxo;
use tracing::*;

use crate::{
    fee::{
        add_change_if_economically_feasible, calculate_fee_and_input_value, checked_sum,
        fee_for_vsize, make_txin, unsigned_tx, SCHNORR_SIGNATURE_SIZE,
    },
    signing::{key_path_prevouts, sign_key_path_inputs, sign_reveal_input},
    BuilderError, CommitRevealTransactions, DidOutputRef, DidOutputSpec, DidTransaction,
};

/// Everything needed to build a commit/reveal pair around `payload`.
pub(crate) struct CommitRevealRequest<'a> {
    pub(crate) payload: &'a [u8],
    /// Spent by the commit transaction. The first key signs the reveal.
    pub(crate) wallet_utxos: &'a [WalletUtxo],
    pub(crate) change_script: ScriptBuf,
    pub(crate) did_output: &'a DidOutputSpec,
    pub(crate) fee_rate: u64,
    pub(crate) network: Network,
}

pub(crate) fn build_commit_reveal<C: Signing + Verification>(
    secp: &Secp256k1<C>,
    req: CommitRevealRequest<'_>,
) -> Result<CommitRevealTransactions, BuilderError> {
    let keys: Vec<TaprootKey> = req
        .wallet_utxos
        .iter()
        .map(|wallet| TaprootKey::new(secp, &wallet.secret_key))
        .collect();
    let signer = keys.first().ok_or(BuilderError::NoUtxos)?;

    let reveal_script = build_reveal_script(&signer.tweaked_key(), req.payload)?;
    let spend_info = TaprootBuilder::new()
        .add_leaf(0, reveal_script.clone())?
        .finalize(secp, signer.internal_key())
        .map_err(|_| BuilderError::IncompleteTaprootTree)?;
    let control_block = spend_info
        .control_block(&(reveal_script.clone(), LeafVersion::TapScript))
        .ok_or(BuilderError::MissingControlBlock)?;
    let commit_script =
        ScriptBuf::new_p2tr(secp, signer.internal_key(), spend_info.merkle_root());

    let did_out = TxOut {
        value: req.did_output.value,
        script_pubkey: req
            .did_output
            .script
            .clone()
            .unwrap_or_else(|| signer.output_script().clone()),
    };

    // Price the reveal with a placeholder signature; only its size matters.
    let reveal_fee = {
        let mut txin = make_txin(OutPoint::new(Txid::all_zeros(), 0));
        txin.witness = Witness::from_slice(&[
            vec![0u8; SCHNORR_SIGNATURE_SIZE],
            reveal_script.to_bytes(),
            control_block.serialize(),
        ]);
        fee_for_vsize(
            unsigned_tx(vec![txin], vec![did_out.clone()]).vsize(),
            req.fee_rate,
        )?
    };
    let commit_out = TxOut {
        value: checked_sum([reveal_fee, req.did_output.value])?,
        script_pubkey: commit_script,
    };

    let utxos: Vec<_> = req.wallet_utxos.iter().map(|wallet| wallet.utxo).collect();
    let estimate = calculate_fee_and_input_value(
        &utxos,
        slice::from_ref(&commit_out),
        &req.change_script,
        req.fee_rate,
        req.network,
    )?;

    let mut commit_tx = unsigned_tx(
        utxos.iter().map(|utxo| make_txin(utxo.outpoint())).collect(),
        vec![commit_out.clone()],
    );
    let change = add_change_if_economically_feasible(
        &mut commit_tx,
        &req.change_script,
        estimate.input_value,
        commit_out.value,
        estimate.fee,
        req.network,
    )?;

    sign_key_path_inputs(secp, &mut commit_tx, &keys, &key_path_prevouts(&keys, &utxos))?;
    let commit_txid = commit_tx.compute_txid();

    let mut reveal_tx = unsigned_tx(
        vec![make_txin(OutPoint::new(commit_txid, 0))],
        vec![did_out],
    );
    sign_reveal_input(
        secp,
        &mut reveal_tx,
        &commit_out,
        &reveal_script,
        &control_block,
        signer,
    )?;

    debug!(
        %commit_txid,
        reveal_txid = %reveal_tx.compute_txid(),
        payload_len = req.payload.len(),
        commit_fee = %estimate.fee,
        %reveal_fee,
        "built commit/reveal pair"
    );

    Ok(CommitRevealTransactions {
        commit: DidTransaction {
            tx: commit_tx,
            change,
            did_output: None,
        },
        reveal: DidTransaction {
            tx: reveal_tx,
            change: None,
            did_output: Some(DidOutputRef {
                index: 0,
                value: req.did_output.value,
            }),
        },
    })
}
