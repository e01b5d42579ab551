use bitcoin::{address::NetworkUnchecked, Address, Amount, ScriptBuf};
use didbtc_encoding::{Codec, Multikey};
use didbtc_primitives::{
    constants::DUST_LIMIT, BatchDidUpdate, Did, DidUpdate, VerificationRelationships, WalletUtxo,
};

/// How a transaction is paid for.
#[derive(Clone, Debug)]
pub struct Funding {
    /// Fee rate in sat/vB.
    pub fee_rate: u64,

    /// Extra UTXOs to spend. Operations that spend a DID UTXO place it before these.
    pub wallet_utxos: Vec<WalletUtxo>,

    /// Where change goes. Defaults to the key-path output of the first signer.
    pub change_address: Option<Address<NetworkUnchecked>>,
}

impl Funding {
    pub fn new(fee_rate: u64, wallet_utxos: Vec<WalletUtxo>) -> Self {
        Self {
            fee_rate,
            wallet_utxos,
            change_address: None,
        }
    }

    pub fn with_change_address(mut self, address: Address<NetworkUnchecked>) -> Self {
        self.change_address = Some(address);
        self
    }
}

/// The output that carries the DID after the transaction confirms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DidOutputSpec {
    pub value: Amount,

    /// Defaults to the key-path output of the first signer.
    pub script: Option<ScriptBuf>,
}

impl Default for DidOutputSpec {
    fn default() -> Self {
        Self {
            value: DUST_LIMIT,
            script: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CreateParams {
    /// Initial verification method key, already codec-prefixed.
    pub multikey: Multikey,
    pub flags: VerificationRelationships,
    pub did_output: DidOutputSpec,
    pub funding: Funding,
}

#[derive(Clone, Debug)]
pub struct BatchCreateParams {
    /// Bare keys, all `codec.pubkey_len()` bytes long. DID `n` gets `pubkeys[n]`.
    pub pubkeys: Vec<Vec<u8>>,
    pub codec: Codec,
    pub flags: VerificationRelationships,
    pub did_output: DidOutputSpec,
    pub funding: Funding,
}

#[derive(Clone, Debug)]
pub struct UpdateParams {
    /// The UTXO currently holding the DID.
    pub did_utxo: WalletUtxo,
    /// Current state of the DID, used to validate `update`.
    pub did: Did,
    pub update: DidUpdate,
    pub did_output: DidOutputSpec,
    pub funding: Funding,
}

#[derive(Clone, Debug)]
pub struct BatchUpdateParams {
    /// The UTXO shared by the DIDs of the batch.
    pub did_utxo: WalletUtxo,
    pub updates: Vec<BatchDidUpdate>,
    /// Batch indexes of DIDs to deactivate.
    pub deactivations: Vec<u32>,
    pub did_output: DidOutputSpec,
    pub funding: Funding,
}

#[derive(Clone, Debug)]
pub struct DeactivateParams {
    pub did_utxo: WalletUtxo,
    pub funding: Funding,
}
