use bitcoin::secp256k1::{Signing, Verification};
use didbtc_primitives::BatchUpdateEntry;
use tracing::*;

use crate::{
    builder::{check_did_output, check_fee_rate},
    BatchUpdateParams, BuilderError, CommitRevealTransactions, DidTxBuilder, UpdateParams,
};

impl<C: Signing + Verification> DidTxBuilder<C> {
    /// Updates a single DID. The update is inscribed as a JSON object in the reveal witness.
    pub fn update(&self, params: UpdateParams) -> Result<CommitRevealTransactions, BuilderError> {
        let UpdateParams {
            did_utxo,
            did,
            update,
            did_output,
            funding,
        } = params;

        check_did_output(&did_output)?;
        check_fee_rate(funding.fee_rate)?;
        update.validate_against(&did)?;

        let payload = serde_json::to_vec(&update)?;
        let txs = self.spend_did_with_reveal(did_utxo, funding, &did_output, &payload)?;
        info!(reveal_txid = %txs.reveal.txid(), "built DID update transactions");
        Ok(txs)
    }

    /// Updates and/or deactivates DIDs of one batch. The payload is a JSON array with the
    /// updates first, then one `{"i": n}` entry per deactivation.
    pub fn batch_update(
        &self,
        params: BatchUpdateParams,
    ) -> Result<CommitRevealTransactions, BuilderError> {
        let BatchUpdateParams {
            did_utxo,
            updates,
            deactivations,
            did_output,
            funding,
        } = params;

        check_did_output(&did_output)?;
        check_fee_rate(funding.fee_rate)?;
        if updates.is_empty() && deactivations.is_empty() {
            return Err(BuilderError::EmptyBatchUpdate);
        }

        let mut entries = Vec::with_capacity(updates.len() + deactivations.len());
        for batch_update in updates {
            batch_update
                .update
                .validate_against(&batch_update.did)
                .map_err(|source| BuilderError::BatchUpdate {
                    index: batch_update.index,
                    source,
                })?;
            entries.push(BatchUpdateEntry {
                update: batch_update.update,
                i: batch_update.index,
            });
        }
        entries.extend(deactivations.iter().copied().map(BatchUpdateEntry::deactivation));

        let payload = serde_json::to_vec(&entries)?;
        let txs = self.spend_did_with_reveal(did_utxo, funding, &did_output, &payload)?;
        info!(
            entries = entries.len(),
            reveal_txid = %txs.reveal.txid(),
            "built batch DID update transactions"
        );
        Ok(txs)
    }
}
