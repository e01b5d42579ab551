use bitcoin::{
    opcodes::all::OP_RETURN,
    script::{self, PushBytesBuf},
    secp256k1::{Signing, Verification},
    Amount, ScriptBuf, TxOut,
};
use didbtc_encoding::{Codec, Multikey};
use didbtc_primitives::{
    constants::{BATCH_CREATION_PREFIX, DID_CREATION_PREFIX},
    VerificationRelationships,
};
use tracing::*;

use crate::{
    builder::{check_did_output, check_fee_rate},
    commit_reveal::{build_commit_reveal, CommitRevealRequest},
    BatchCreateParams, BuilderError, CommitRevealTransactions, CreateParams, DidOutputRef,
    DidTransaction, DidTxBuilder,
};

/// `OP_RETURN <"did" || flags || multikey>`.
pub(crate) fn creation_script(
    flags: VerificationRelationships,
    multikey: &Multikey,
) -> Result<ScriptBuf, BuilderError> {
    let mut data = Vec::with_capacity(DID_CREATION_PREFIX.len() + 1 + multikey.as_bytes().len());
    data.extend_from_slice(DID_CREATION_PREFIX);
    data.push(flags.bits());
    data.extend_from_slice(multikey.as_bytes());

    Ok(script::Builder::new()
        .push_opcode(OP_RETURN)
        .push_slice(PushBytesBuf::try_from(data)?)
        .into_script())
}

/// `"dids" || codec || flags || key_0 || key_1 || ...`.
pub(crate) fn batch_creation_payload(
    pubkeys: &[Vec<u8>],
    codec: Codec,
    flags: VerificationRelationships,
) -> Vec<u8> {
    let mut payload = Vec::with_capacity(7 + pubkeys.len() * codec.pubkey_len());
    payload.extend_from_slice(BATCH_CREATION_PREFIX);
    payload.extend_from_slice(&codec.prefix());
    payload.push(flags.bits());
    for key in pubkeys {
        payload.extend_from_slice(key);
    }
    payload
}

impl<C: Signing + Verification> DidTxBuilder<C> {
    /// Creates one DID whose initial key is carried in an `OP_RETURN` output. Output 1 is the
    /// new DID UTXO.
    pub fn create(&self, params: CreateParams) -> Result<DidTransaction, BuilderError> {
        let CreateParams {
            multikey,
            flags,
            did_output,
            funding,
        } = params;

        if funding.wallet_utxos.is_empty() {
            return Err(BuilderError::NoUtxos);
        }
        check_did_output(&did_output)?;
        check_fee_rate(funding.fee_rate)?;

        let keys = self.taproot_keys(&funding.wallet_utxos);
        let signer = keys.first().ok_or(BuilderError::NoUtxos)?;
        let change_script = self.change_script(funding.change_address.as_ref(), signer)?;

        let outputs = vec![
            TxOut {
                value: Amount::ZERO,
                script_pubkey: creation_script(flags, &multikey)?,
            },
            TxOut {
                value: did_output.value,
                script_pubkey: did_output
                    .script
                    .clone()
                    .unwrap_or_else(|| signer.output_script().clone()),
            },
        ];

        let (tx, change) = self.build_key_path_tx(
            &funding.wallet_utxos,
            &keys,
            outputs,
            did_output.value,
            &change_script,
            funding.fee_rate,
        )?;
        info!(txid = %tx.compute_txid(), %multikey, "built DID creation transaction");

        Ok(DidTransaction {
            tx,
            change,
            did_output: Some(DidOutputRef {
                index: 1,
                value: did_output.value,
            }),
        })
    }

    /// Creates one DID per public key with a commit/reveal pair. The keys are inscribed in the
    /// reveal witness and the reveal's output 0 is the DID UTXO shared by the batch.
    pub fn batch_create(
        &self,
        params: BatchCreateParams,
    ) -> Result<CommitRevealTransactions, BuilderError> {
        let BatchCreateParams {
            pubkeys,
            codec,
            flags,
            did_output,
            funding,
        } = params;

        if funding.wallet_utxos.is_empty() {
            return Err(BuilderError::NoUtxos);
        }
        check_did_output(&did_output)?;
        check_fee_rate(funding.fee_rate)?;
        if pubkeys.is_empty() {
            return Err(BuilderError::NoPublicKeys);
        }
        if let Some((index, key)) = pubkeys
            .iter()
            .enumerate()
            .find(|(_, key)| key.len() != codec.pubkey_len())
        {
            return Err(BuilderError::KeyLength {
                index,
                expected: codec.pubkey_len(),
                actual: key.len(),
            });
        }

        let keys = self.taproot_keys(&funding.wallet_utxos);
        let signer = keys.first().ok_or(BuilderError::NoUtxos)?;
        let change_script = self.change_script(funding.change_address.as_ref(), signer)?;
        let payload = batch_creation_payload(&pubkeys, codec, flags);

        let txs = build_commit_reveal(
            &self.secp,
            CommitRevealRequest {
                payload: &payload,
                wallet_utxos: &funding.wallet_utxos,
                change_script,
                did_output: &did_output,
                fee_rate: funding.fee_rate,
                network: self.network,
            },
        )?;
        info!(
            dids = pubkeys.len(),
            %codec,
            reveal_txid = %txs.reveal.txid(),
            "built batch DID creation transactions"
        );
        Ok(txs)
    }
}
