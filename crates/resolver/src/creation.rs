//! Parsing of creation transactions.

use bitcoin::{
    opcodes::all::OP_RETURN,
    script::Instruction,
    Script, Transaction,
};
use didbtc_encoding::{Codec, Multikey};
use didbtc_envelope::{parse_reveal_payload, EnvelopeError};
use didbtc_primitives::{
    constants::{BATCH_CREATION_HEADER_LEN, BATCH_CREATION_PREFIX, DID_CREATION_PREFIX},
    ControllerKey, Did, VerificationMethod, VerificationRelationships,
};
use tracing::*;

use crate::ResolveError;

/// Builds the initial state of a DID from its creation transaction.
///
/// A creation whose first output is an `OP_RETURN` is a single creation and `batch_index` is
/// ignored. Anything else is read as a batch reveal and needs `batch_index`.
pub fn parse_creation(tx: &Transaction, batch_index: Option<u32>) -> Result<Did, ResolveError> {
    let first = tx
        .output
        .first()
        .ok_or_else(|| ResolveError::NoOutputs(tx.compute_txid()))?;

    if first.script_pubkey.is_op_return() {
        let did = parse_single_creation(tx, &first.script_pubkey)?;
        debug!(txid = %tx.compute_txid(), "parsed single creation");
        return Ok(did);
    }

    let index = batch_index.ok_or(ResolveError::MissingBatchIndex)?;
    let did = parse_batch_creation(tx, index)?;
    debug!(txid = %tx.compute_txid(), %index, "parsed batch creation");
    Ok(did)
}

fn parse_single_creation(tx: &Transaction, script: &Script) -> Result<Did, ResolveError> {
    let mut instructions = script.instructions();
    let data = match (instructions.next(), instructions.next()) {
        (Some(Ok(Instruction::Op(OP_RETURN))), Some(Ok(Instruction::PushBytes(data)))) => {
            data.as_bytes()
        }
        _ => return Err(ResolveError::InvalidCreationPrefix),
    };

    let body = data
        .strip_prefix(DID_CREATION_PREFIX.as_slice())
        .ok_or(ResolveError::InvalidCreationPrefix)?;
    let (&flags, key) = body
        .split_first()
        .ok_or(ResolveError::InvalidCreationPrefix)?;
    let flags = VerificationRelationships::new(flags)?;

    let multikey = Multikey::from_bytes(key.to_vec());
    let decoded = multikey.decode()?;
    decoded.codec.check_key_len(&decoded.key)?;

    let controller = tx
        .output
        .get(1)
        .and_then(|out| taproot_output_key(&out.script_pubkey));
    Ok(Did::new(VerificationMethod::new(multikey, flags), controller))
}

fn parse_batch_creation(tx: &Transaction, index: u32) -> Result<Did, ResolveError> {
    let witness = &tx
        .input
        .first()
        .ok_or(EnvelopeError::MissingRevealScript)?
        .witness;
    let payload = parse_reveal_payload(witness)?;

    if payload.len() < BATCH_CREATION_HEADER_LEN || !payload.starts_with(BATCH_CREATION_PREFIX) {
        return Err(ResolveError::InvalidBatchPrefix);
    }
    let (header, keys) = payload.split_at(BATCH_CREATION_HEADER_LEN);
    let codec = Codec::from_prefix(&header[BATCH_CREATION_PREFIX.len()..])?;
    let flags = VerificationRelationships::new(header[BATCH_CREATION_HEADER_LEN - 1])?;

    let key_len = codec.pubkey_len();
    let start = index as usize * key_len;
    let key = keys
        .get(start..start + key_len)
        .ok_or(ResolveError::BatchIndexOutOfRange {
            index,
            count: keys.len() / key_len,
        })?;

    let controller = tx
        .output
        .first()
        .and_then(|out| taproot_output_key(&out.script_pubkey));
    Ok(Did::new(
        VerificationMethod::new(Multikey::new(codec, key), flags),
        controller,
    ))
}

/// The output key of a P2TR script.
fn taproot_output_key(script: &Script) -> Option<ControllerKey> {
    script
        .is_p2tr()
        .then(|| ControllerKey::new(script.as_bytes()[2..].to_vec()))
}

#[cfg(test)]
mod tests {
    use bitcoin::{script::PushBytesBuf, Amount, ScriptBuf, TxOut};
    use didbtc_test_utils::*;

    use super::*;

    #[test]
    fn test_parse_published_creation() {
        let did = parse_creation(&decode_tx(CREATION_TX_HEX), None).unwrap();

        assert_eq!(did.verification_methods.len(), 1);
        let vm = &did.verification_methods[0];
        assert_eq!(vm.flags, VerificationRelationships::DEFAULT);
        assert_eq!(vm.multikey, Multikey::new(Codec::Ed25519Pub, &pubkeys()[0]));
        assert_eq!(
            did.controller_key.unwrap().as_bytes(),
            hex::decode(TWEAKED_KEY_HEX).unwrap()
        );
        assert!(!did.is_deactivated);
        assert!(did.metadata.is_none());
    }

    #[test]
    fn test_parse_every_batch_index() {
        let tx = decode_tx(BATCH_REVEAL_TX_HEX);
        for (index, key) in pubkeys().iter().enumerate() {
            let did = parse_creation(&tx, Some(index as u32)).unwrap();
            assert_eq!(
                did.verification_methods[0].multikey,
                Multikey::new(Codec::Ed25519Pub, key)
            );
            assert_eq!(
                did.controller_key.unwrap().as_bytes(),
                hex::decode(TWEAKED_KEY_HEX).unwrap()
            );
        }
    }

    #[test]
    fn test_batch_index_required_and_bounded() {
        let tx = decode_tx(BATCH_REVEAL_TX_HEX);
        assert!(matches!(
            parse_creation(&tx, None),
            Err(ResolveError::MissingBatchIndex)
        ));
        assert!(matches!(
            parse_creation(&tx, Some(3)),
            Err(ResolveError::BatchIndexOutOfRange { index: 3, count: 3 })
        ));
    }

    #[test]
    fn test_rejects_foreign_op_return() {
        let mut tx = decode_tx(CREATION_TX_HEX);
        tx.output[0] = TxOut {
            value: Amount::ZERO,
            script_pubkey: ScriptBuf::new_op_return(
                PushBytesBuf::try_from(b"foo\x03".to_vec()).unwrap(),
            ),
        };
        assert!(matches!(
            parse_creation(&tx, None),
            Err(ResolveError::InvalidCreationPrefix)
        ));
    }

    #[test]
    fn test_rejects_out_of_range_flags() {
        let mut tx = decode_tx(CREATION_TX_HEX);
        let mut data = b"did".to_vec();
        data.push(32);
        data.extend_from_slice(&[0xed, 0x01]);
        data.extend_from_slice(&pubkeys()[0]);
        tx.output[0].script_pubkey = ScriptBuf::new_op_return(PushBytesBuf::try_from(data).unwrap());
        assert!(matches!(
            parse_creation(&tx, None),
            Err(ResolveError::Flags(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_codec() {
        let mut tx = decode_tx(CREATION_TX_HEX);
        let mut data = b"did\x03".to_vec();
        data.extend_from_slice(&[0x12, 0x00]);
        data.extend_from_slice(&pubkeys()[0]);
        tx.output[0].script_pubkey = ScriptBuf::new_op_return(PushBytesBuf::try_from(data).unwrap());
        assert!(matches!(
            parse_creation(&tx, None),
            Err(ResolveError::Encoding(_))
        ));
    }
}
