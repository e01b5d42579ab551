//! Fee estimation and change handling.

use bitcoin::{
    absolute::LockTime, transaction::Version, Address, Amount, Network, OutPoint, Script,
    ScriptBuf, Sequence, Transaction, TxIn, TxOut, Witness,
};
use didbtc_primitives::{constants::DUST_LIMIT, Utxo};
use tracing::*;

use crate::{BuilderError, ChangeOutput};

/// Serialized size of an output's value and a one byte script length.
const OUTPUT_OVERHEAD: usize = 8 + 1;

/// Size of a key-path schnorr signature with the default sighash.
pub(crate) const SCHNORR_SIGNATURE_SIZE: usize = 64;

/// Fee of a transaction together with the total value of its inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeEstimate {
    pub fee: Amount,
    pub input_value: Amount,
}

pub(crate) fn make_txin(outpoint: OutPoint) -> TxIn {
    TxIn {
        previous_output: outpoint,
        script_sig: ScriptBuf::new(),
        sequence: Sequence::MAX,
        witness: Witness::new(),
    }
}

pub(crate) fn unsigned_tx(input: Vec<TxIn>, output: Vec<TxOut>) -> Transaction {
    Transaction {
        version: Version::ONE,
        lock_time: LockTime::ZERO,
        input,
        output,
    }
}

pub(crate) fn fee_for_vsize(vsize: usize, fee_rate: u64) -> Result<Amount, BuilderError> {
    (vsize as u64)
        .checked_mul(fee_rate)
        .map(Amount::from_sat)
        .ok_or(BuilderError::AmountOverflow)
}

pub(crate) fn checked_sum(
    amounts: impl IntoIterator<Item = Amount>,
) -> Result<Amount, BuilderError> {
    amounts
        .into_iter()
        .try_fold(Amount::ZERO, Amount::checked_add)
        .ok_or(BuilderError::AmountOverflow)
}

/// Estimates the fee of a transaction spending `utxos` into `outputs`.
///
/// A first pass prices the transaction as if a change output to `change_script` were present
/// and decides whether change is worth adding. The fee is then the size of the transaction as
/// it would actually be built, signatures included.
pub fn calculate_fee_and_input_value(
    utxos: &[Utxo],
    outputs: &[TxOut],
    change_script: &Script,
    fee_rate: u64,
    network: Network,
) -> Result<FeeEstimate, BuilderError> {
    let input_value = checked_sum(utxos.iter().map(|utxo| utxo.value))?;
    let output_value = checked_sum(outputs.iter().map(|out| out.value))?;

    let inputs = utxos
        .iter()
        .map(|utxo| {
            let mut txin = make_txin(utxo.outpoint());
            txin.witness = Witness::from_slice(&[[0u8; SCHNORR_SIGNATURE_SIZE]]);
            txin
        })
        .collect();
    let mut calc_tx = unsigned_tx(inputs, outputs.to_vec());

    let fee_with_change = fee_for_vsize(
        calc_tx.vsize() + change_script.len() + OUTPUT_OVERHEAD,
        fee_rate,
    )?;
    add_change_if_economically_feasible(
        &mut calc_tx,
        change_script,
        input_value,
        output_value,
        fee_with_change,
        network,
    )?;

    let fee = fee_for_vsize(calc_tx.vsize(), fee_rate)?;
    debug!(vsize = calc_tx.vsize(), %fee, %input_value, "estimated transaction fee");

    Ok(FeeEstimate { fee, input_value })
}

/// Appends a change output when what is left after `output_value` and `fee` exceeds the dust
/// limit. Smaller remainders are left to the miner.
pub fn add_change_if_economically_feasible(
    tx: &mut Transaction,
    change_script: &Script,
    input_value: Amount,
    output_value: Amount,
    fee: Amount,
    network: Network,
) -> Result<Option<ChangeOutput>, BuilderError> {
    let required = checked_sum([output_value, fee])?;
    let available = input_value
        .checked_sub(required)
        .ok_or(BuilderError::InsufficientFunds {
            available: input_value,
            required,
        })?;

    if available <= DUST_LIMIT {
        debug!(%available, "change below dust, leaving it to fees");
        return Ok(None);
    }

    let change = ChangeOutput {
        index: tx.output.len() as u32,
        value: available,
        address: Address::from_script(change_script, network)?,
    };
    tx.output.push(TxOut {
        value: available,
        script_pubkey: change_script.to_owned(),
    });

    Ok(Some(change))
}
