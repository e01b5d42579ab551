//! Replay of update transactions over a created DID.

use bitcoin::{consensus, Transaction};
use didbtc_envelope::{parse_reveal_payload, EnvelopeError};
use didbtc_primitives::{
    constants::deactivation_script, Did, DidUpdate, RawDidUpdate, UpdateError,
};
use serde_json::{Map, Value};
use tracing::*;

use crate::{parse_creation, Resolution, ResolveError, SkipReason, UpdateOutcome};

pub fn decode_tx_hex(tx_hex: &str) -> Result<Transaction, ResolveError> {
    let bytes = hex::decode(tx_hex.trim())?;
    Ok(consensus::deserialize(&bytes)?)
}

/// Resolves a DID from its transactions in chain order, creation first.
///
/// `batch_index` selects the DID within a batch creation. Chain linkage between the
/// transactions is not checked.
pub fn resolve_did(
    txs: &[Transaction],
    batch_index: Option<u32>,
) -> Result<Resolution, ResolveError> {
    let (creation, updates) = txs.split_first().ok_or(ResolveError::EmptyChain)?;
    let initial = parse_creation(creation, batch_index)?;

    let mut outcomes = Vec::with_capacity(updates.len());
    let did = updates.iter().try_fold(initial, |did, tx| {
        let (did, outcome) = apply_update_transaction(did, tx, batch_index)?;
        outcomes.push(outcome);
        Ok::<_, ResolveError>(did)
    })?;

    Ok(Resolution { did, outcomes })
}

pub fn resolve_did_from_hex<S: AsRef<str>>(
    tx_hexes: &[S],
    batch_index: Option<u32>,
) -> Result<Resolution, ResolveError> {
    let txs = tx_hexes
        .iter()
        .map(|tx_hex| decode_tx_hex(tx_hex.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    resolve_did(&txs, batch_index)
}

/// Advances `did` by one transaction of its chain.
///
/// Transactions that do not carry an update for this DID leave it unchanged. Errors are only
/// returned for payloads that are well formed but cannot be applied, and for envelopes that
/// cannot be parsed.
pub fn apply_update_transaction(
    did: Did,
    tx: &Transaction,
    batch_index: Option<u32>,
) -> Result<(Did, UpdateOutcome), ResolveError> {
    let txid = tx.compute_txid();

    let (did, outcome) = if did.is_deactivated {
        (did, UpdateOutcome::Skipped(SkipReason::AlreadyDeactivated))
    } else if tx
        .output
        .first()
        .is_some_and(|out| out.script_pubkey == deactivation_script())
    {
        (did.deactivated(), UpdateOutcome::Deactivated)
    } else {
        match read_update(tx, batch_index)? {
            Payload::Update(update) => {
                let did = did
                    .apply_update(&update)
                    .map_err(|source| ResolveError::Update { txid, source })?;
                (did, UpdateOutcome::Applied)
            }
            Payload::Deactivation => (did.deactivated(), UpdateOutcome::Deactivated),
            Payload::Skip(reason) => (did, UpdateOutcome::Skipped(reason)),
            Payload::Malformed(reason) => {
                warn!(%txid, %reason, "ignoring malformed update payload");
                (did, UpdateOutcome::Malformed(reason))
            }
        }
    };

    debug!(%txid, ?outcome, "replayed transaction");
    Ok((did, outcome))
}

/// What the reveal witness of a transaction asks of the resolved DID.
enum Payload {
    Update(DidUpdate),
    Deactivation,
    Skip(SkipReason),
    Malformed(String),
}

fn read_update(tx: &Transaction, batch_index: Option<u32>) -> Result<Payload, ResolveError> {
    let Some(input) = tx.input.first() else {
        return Ok(Payload::Skip(SkipReason::NoPayload));
    };
    let payload = match parse_reveal_payload(&input.witness) {
        Ok(payload) => payload,
        Err(EnvelopeError::MissingRevealScript | EnvelopeError::ScriptTooShort(_)) => {
            return Ok(Payload::Skip(SkipReason::NoPayload));
        }
        Err(e) => return Err(e.into()),
    };
    let Ok(value) = serde_json::from_slice::<Value>(&payload) else {
        return Ok(Payload::Skip(SkipReason::NotJson));
    };

    match (value, batch_index) {
        (Value::Array(entries), Some(index)) => {
            let Some(mut entry) = entries
                .into_iter()
                .filter_map(|entry| match entry {
                    Value::Object(entry) => Some(entry),
                    _ => None,
                })
                .find(|entry| entry.get("i").and_then(Value::as_u64) == Some(u64::from(index)))
            else {
                return Ok(Payload::Skip(SkipReason::NotAddressed));
            };

            entry.remove("i");
            if entry.is_empty() {
                return Ok(Payload::Deactivation);
            }
            classify_update(entry)
        }
        (Value::Array(_), None) => Ok(Payload::Malformed(
            "batch payload for a DID created alone".to_owned(),
        )),
        (Value::Object(_), Some(_)) => Ok(Payload::Malformed(
            "single update payload for a batch DID".to_owned(),
        )),
        (Value::Object(mut body), None) => {
            body.remove("i");
            if body.is_empty() {
                return Ok(Payload::Deactivation);
            }
            classify_update(body)
        }
        (other, _) => Ok(Payload::Malformed(format!(
            "expected an object or array, got {other}"
        ))),
    }
}

/// Turns a JSON update body into a typed update. Bodies of the wrong shape and operations that
/// cannot be classified are malformed, keys with a bad encoding are an error.
fn classify_update(body: Map<String, Value>) -> Result<Payload, ResolveError> {
    let raw: RawDidUpdate = match serde_json::from_value(Value::Object(body)) {
        Ok(raw) => raw,
        Err(e) => return Ok(Payload::Malformed(e.to_string())),
    };
    match DidUpdate::try_from(raw) {
        Ok(update) => Ok(Payload::Update(update)),
        Err(UpdateError::Encoding(e)) => Err(e.into()),
        Err(e) => Ok(Payload::Malformed(e.to_string())),
    }
}
