//! JSON rendering of command results.

use didbtc_resolver::{Resolution, UpdateOutcome};
use didbtc_txbuilder::{CommitRevealTransactions, DidTransaction};
use serde_json::{json, Value};

pub(crate) fn transaction_json(tx: &DidTransaction) -> Value {
    json!({
        "txid": tx.txid().to_string(),
        "hex": tx.to_hex(),
        "change": tx.change.as_ref().map(|change| json!({
            "index": change.index,
            "value": change.value.to_sat(),
            "address": change.address.to_string(),
        })),
        "didOutput": tx.did_output.map(|out| json!({
            "index": out.index,
            "value": out.value.to_sat(),
        })),
    })
}

pub(crate) fn commit_reveal_json(txs: &CommitRevealTransactions) -> Value {
    json!({
        "commit": transaction_json(&txs.commit),
        "reveal": transaction_json(&txs.reveal),
    })
}

fn outcome_json(outcome: &UpdateOutcome) -> Value {
    match outcome {
        UpdateOutcome::Applied => json!({ "outcome": "applied" }),
        UpdateOutcome::Deactivated => json!({ "outcome": "deactivated" }),
        UpdateOutcome::Skipped(reason) => {
            json!({ "outcome": "skipped", "reason": reason.to_string() })
        }
        UpdateOutcome::Malformed(reason) => json!({ "outcome": "malformed", "reason": reason }),
    }
}

pub(crate) fn resolution_json(resolution: &Resolution) -> anyhow::Result<Value> {
    Ok(json!({
        "did": serde_json::to_value(&resolution.did)?,
        "outcomes": resolution.outcomes.iter().map(outcome_json).collect::<Vec<_>>(),
    }))
}

pub(crate) fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use didbtc_resolver::SkipReason;

    use super::*;

    #[test]
    fn test_outcome_json() {
        assert_eq!(
            outcome_json(&UpdateOutcome::Skipped(SkipReason::NotAddressed)),
            json!({ "outcome": "skipped", "reason": "no entry for this index" })
        );
        assert_eq!(
            outcome_json(&UpdateOutcome::Applied),
            json!({ "outcome": "applied" })
        );
    }
}
