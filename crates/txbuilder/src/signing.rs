//! Taproot key-path and script-path signing.
//!
//! Signatures use an all-zero auxiliary nonce input so that identical inputs always produce
//! identical transactions.

use bitcoin::{
    hashes::Hash,
    secp256k1::{schnorr, Keypair, Message, Secp256k1, Signing},
    sighash::{Prevouts, SighashCache},
    taproot::{self, ControlBlock, LeafVersion, TapLeafHash},
    ScriptBuf, TapSighash, TapSighashType, Transaction, TxOut, Witness,
};
use didbtc_key_derivation::TaprootKey;
use didbtc_primitives::Utxo;

use crate::BuilderError;

const ZERO_AUX_RAND: [u8; 32] = [0; 32];

fn sign_sighash<C: Signing>(
    secp: &Secp256k1<C>,
    sighash: TapSighash,
    keypair: &Keypair,
) -> schnorr::Signature {
    let msg = Message::from_digest(sighash.to_byte_array());
    secp.sign_schnorr_with_aux_rand(&msg, keypair, &ZERO_AUX_RAND)
}

/// Outputs spent by key-path inputs, as committed to by the sighash.
pub(crate) fn key_path_prevouts(keys: &[TaprootKey], utxos: &[Utxo]) -> Vec<TxOut> {
    keys.iter()
        .zip(utxos)
        .map(|(key, utxo)| TxOut {
            value: utxo.value,
            script_pubkey: key.output_script().clone(),
        })
        .collect()
}

/// Signs every input of `tx` as a key-path spend. `keys[i]` and `prevouts[i]` belong to
/// input `i`.
pub(crate) fn sign_key_path_inputs<C: Signing>(
    secp: &Secp256k1<C>,
    tx: &mut Transaction,
    keys: &[TaprootKey],
    prevouts: &[TxOut],
) -> Result<(), BuilderError> {
    let signatures = {
        let prevouts = Prevouts::All(prevouts);
        let mut cache = SighashCache::new(&*tx);
        keys.iter()
            .enumerate()
            .map(|(i, key)| {
                let sighash = cache.taproot_key_spend_signature_hash(
                    i,
                    &prevouts,
                    TapSighashType::Default,
                )?;
                Ok(sign_sighash(secp, sighash, key.tweaked_keypair()))
            })
            .collect::<Result<Vec<_>, BuilderError>>()?
    };

    for (input, signature) in tx.input.iter_mut().zip(signatures) {
        input.witness = Witness::p2tr_key_spend(&taproot::Signature {
            signature,
            sighash_type: TapSighashType::Default,
        });
    }
    Ok(())
}

/// Signs the single input of a reveal transaction as a script-path spend of `reveal_script`.
pub(crate) fn sign_reveal_input<C: Signing>(
    secp: &Secp256k1<C>,
    tx: &mut Transaction,
    prevout: &TxOut,
    reveal_script: &ScriptBuf,
    control_block: &ControlBlock,
    key: &TaprootKey,
) -> Result<(), BuilderError> {
    let leaf_hash = TapLeafHash::from_script(reveal_script, LeafVersion::TapScript);
    let sighash = SighashCache::new(&*tx).taproot_script_spend_signature_hash(
        0,
        &Prevouts::All(&[prevout]),
        leaf_hash,
        TapSighashType::Default,
    )?;
    let signature = sign_sighash(secp, sighash, key.tweaked_keypair());

    tx.input[0].witness = Witness::from_slice(&[
        signature.serialize().to_vec(),
        reveal_script.to_bytes(),
        control_block.serialize(),
    ]);
    Ok(())
}
