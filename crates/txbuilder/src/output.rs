use bitcoin::{consensus::encode::serialize_hex, Address, Amount, Transaction, Txid};
use didbtc_primitives::Utxo;

/// Change output added to a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeOutput {
    pub index: u32,
    pub value: Amount,
    pub address: Address,
}

/// Position and value of the output that now carries the DID.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DidOutputRef {
    pub index: u32,
    pub value: Amount,
}

/// A fully signed transaction with the outputs callers need to track.
#[derive(Clone, Debug)]
pub struct DidTransaction {
    pub tx: Transaction,
    pub change: Option<ChangeOutput>,
    pub did_output: Option<DidOutputRef>,
}

impl DidTransaction {
    pub fn txid(&self) -> Txid {
        self.tx.compute_txid()
    }

    pub fn to_hex(&self) -> String {
        serialize_hex(&self.tx)
    }

    /// The DID output as a UTXO for the next update.
    pub fn did_utxo(&self) -> Option<Utxo> {
        self.did_output
            .map(|out| Utxo::new(self.txid(), out.index, out.value))
    }

    /// The change output as a UTXO for funding later transactions.
    pub fn change_utxo(&self) -> Option<Utxo> {
        self.change
            .as_ref()
            .map(|change| Utxo::new(self.txid(), change.index, change.value))
    }
}

/// Commit transaction and the reveal that spends its first output.
#[derive(Clone, Debug)]
pub struct CommitRevealTransactions {
    pub commit: DidTransaction,
    pub reveal: DidTransaction,
}
