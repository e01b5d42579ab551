use bitcoin::{
    address::NetworkUnchecked, secp256k1::Secp256k1, Address, Amount, Network, ScriptBuf,
};
use didbtc_encoding::{Codec, Multikey};
use didbtc_primitives::{
    constants::deactivation_script, BatchDidUpdate, ControllerKey, Did, DidUpdate,
    VerificationMethod, VerificationRelationships, VmOperation, WalletUtxo,
};
use didbtc_test_utils::*;

use crate::{
    BatchCreateParams, BatchUpdateParams, BuilderError, CreateParams, DeactivateParams,
    DidOutputRef, DidOutputSpec, DidTxBuilder, Funding, UpdateParams,
};

fn builder() -> DidTxBuilder {
    DidTxBuilder::new(Secp256k1::new(), NETWORK)
}

fn funding() -> Funding {
    Funding::new(FEE_RATE, vec![funding_utxo()])
}

fn create_params() -> CreateParams {
    CreateParams {
        multikey: Multikey::new(Codec::Ed25519Pub, &pubkeys()[0]),
        flags: VerificationRelationships::DEFAULT,
        did_output: DidOutputSpec::default(),
        funding: funding(),
    }
}

fn batch_create_params() -> BatchCreateParams {
    BatchCreateParams {
        pubkeys: pubkeys(),
        codec: Codec::Ed25519Pub,
        flags: VerificationRelationships::DEFAULT,
        did_output: DidOutputSpec::default(),
        funding: funding(),
    }
}

fn batch_did(index: usize) -> Did {
    Did::new(
        VerificationMethod::new(
            Multikey::new(Codec::Ed25519Pub, &pubkeys()[index]),
            VerificationRelationships::DEFAULT,
        ),
        Some(ControllerKey::new(hex::decode(TWEAKED_KEY_HEX).unwrap())),
    )
}

fn rotate_key(index: usize) -> BatchDidUpdate {
    BatchDidUpdate {
        index: index as u32,
        did: batch_did(index),
        update: DidUpdate {
            vm: Some(vec![VmOperation::Update {
                index: 0,
                multikey: Some(Multikey::new(Codec::Ed25519Pub, &updated_pubkeys()[index])),
                flags: None,
            }]),
            ..Default::default()
        },
    }
}

fn batch_update_params(
    did_utxo: WalletUtxo,
    change_utxo: WalletUtxo,
    updates: Vec<BatchDidUpdate>,
) -> BatchUpdateParams {
    BatchUpdateParams {
        did_utxo,
        updates,
        deactivations: vec![],
        did_output: DidOutputSpec::default(),
        funding: Funding::new(FEE_RATE, vec![change_utxo]),
    }
}

#[test]
fn test_create_matches_published_transaction() {
    let created = builder().create(create_params()).unwrap();

    assert_eq!(created.to_hex(), CREATION_TX_HEX);
    assert_eq!(
        created.did_output,
        Some(DidOutputRef {
            index: 1,
            value: Amount::from_sat(330)
        })
    );
    let change = created.change.unwrap();
    assert_eq!(change.index, 2);
    assert_eq!(change.value, Amount::from_sat(FUNDING_VALUE - 330 - 3_451));
}

#[test]
fn test_create_with_custom_change_address() {
    let address: Address<NetworkUnchecked> =
        "tb1q5w48rgj6ysqx5xln5eun25pq7qc9wu7lw3merp".parse().unwrap();
    let mut params = create_params();
    params.funding = params.funding.with_change_address(address.clone());

    let created = builder().create(params).unwrap();
    let change = created.change.unwrap();
    let expected = address.require_network(NETWORK).unwrap();
    assert_eq!(change.index, 2);
    assert_eq!(created.tx.output[2].script_pubkey, expected.script_pubkey());
    assert_eq!(change.address, expected);
}

#[test]
fn test_create_with_custom_did_script() {
    let script = ScriptBuf::from_bytes(hex::decode(format!("5120{}", "11".repeat(32))).unwrap());
    let mut params = create_params();
    params.did_output = DidOutputSpec {
        value: Amount::from_sat(1_000),
        script: Some(script.clone()),
    };

    let created = builder().create(params).unwrap();
    assert_eq!(created.tx.output[1].script_pubkey, script);
    assert_eq!(created.tx.output[1].value, Amount::from_sat(1_000));
}

#[test]
fn test_create_rejects_bad_params() {
    let mut params = create_params();
    params.funding.wallet_utxos.clear();
    assert!(matches!(
        builder().create(params),
        Err(BuilderError::NoUtxos)
    ));

    let mut params = create_params();
    params.did_output.value = Amount::from_sat(329);
    assert!(matches!(
        builder().create(params),
        Err(BuilderError::DidOutputBelowDust(_))
    ));

    let mut params = create_params();
    params.funding.fee_rate = 0;
    assert!(matches!(
        builder().create(params),
        Err(BuilderError::FeeRateTooLow(0))
    ));
}

#[test]
fn test_huge_fee_rate_is_an_error() {
    let mut params = create_params();
    params.funding.fee_rate = u64::MAX / 10;
    assert!(matches!(
        builder().create(params),
        Err(BuilderError::AmountOverflow)
    ));

    let mut params = batch_create_params();
    params.funding.fee_rate = u64::MAX / 10;
    assert!(matches!(
        builder().batch_create(params),
        Err(BuilderError::AmountOverflow)
    ));
}

#[test]
fn test_change_address_on_wrong_network() {
    let address: Address<NetworkUnchecked> =
        "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq".parse().unwrap();
    let mut params = create_params();
    params.funding = params.funding.with_change_address(address);

    assert!(matches!(
        builder().create(params),
        Err(BuilderError::InvalidChangeAddress {
            network: Network::Testnet,
            ..
        })
    ));
}

#[test]
fn test_batch_create_matches_published_transactions() {
    let txs = builder().batch_create(batch_create_params()).unwrap();

    assert_eq!(txs.commit.txid(), txid(BATCH_COMMIT_TXID));
    assert_eq!(txs.reveal.txid(), txid(BATCH_REVEAL_TXID));
    assert_eq!(txs.reveal.to_hex(), BATCH_REVEAL_TX_HEX);
    assert_eq!(
        txs.commit.change_utxo().unwrap(),
        batch_change_utxo().utxo
    );
    assert_eq!(txs.reveal.did_utxo().unwrap(), batch_did_utxo().utxo);
    assert!(txs.commit.did_output.is_none());
}

#[test]
fn test_batch_create_rejects_wrong_key_length() {
    let mut params = batch_create_params();
    params.pubkeys[1].push(0);

    assert!(matches!(
        builder().batch_create(params),
        Err(BuilderError::KeyLength {
            index: 1,
            expected: 32,
            actual: 33
        })
    ));
}

#[test]
fn test_batch_create_requires_keys() {
    let mut params = batch_create_params();
    params.pubkeys.clear();

    assert!(matches!(
        builder().batch_create(params),
        Err(BuilderError::NoPublicKeys)
    ));
}

#[test]
fn test_batch_updates_match_published_transactions() {
    let builder = builder();
    let first = builder
        .batch_update(batch_update_params(
            batch_did_utxo(),
            batch_change_utxo(),
            vec![rotate_key(0)],
        ))
        .unwrap();
    assert_eq!(first.reveal.txid(), txid(FIRST_BATCH_UPDATE_TXID));

    let second = builder
        .batch_update(batch_update_params(
            WalletUtxo::new(first.reveal.did_utxo().unwrap(), secret_key()),
            WalletUtxo::new(first.commit.change_utxo().unwrap(), secret_key()),
            vec![rotate_key(1), rotate_key(2)],
        ))
        .unwrap();
    assert_eq!(second.reveal.txid(), txid(SECOND_BATCH_UPDATE_TXID));
}

#[test]
fn test_batch_update_requires_entries() {
    let params = batch_update_params(batch_did_utxo(), batch_change_utxo(), vec![]);
    assert!(matches!(
        builder().batch_update(params),
        Err(BuilderError::EmptyBatchUpdate)
    ));
}

#[test]
fn test_batch_update_validates_each_update() {
    let mut update = rotate_key(2);
    update.did = update.did.deactivated();
    let params = batch_update_params(
        batch_did_utxo(),
        batch_change_utxo(),
        vec![rotate_key(0), update],
    );

    assert!(matches!(
        builder().batch_update(params),
        Err(BuilderError::BatchUpdate { index: 2, .. })
    ));
}

#[test]
fn test_update_rejects_out_of_range_index() {
    let mut update = rotate_key(0).update;
    if let Some(ops) = update.vm.as_mut() {
        ops[0] = VmOperation::Delete { index: 1 };
    }
    let params = UpdateParams {
        did_utxo: batch_did_utxo(),
        did: batch_did(0),
        update,
        did_output: DidOutputSpec::default(),
        funding: Funding::new(FEE_RATE, vec![batch_change_utxo()]),
    };

    assert!(matches!(
        builder().update(params),
        Err(BuilderError::Update(_))
    ));
}

#[test]
fn test_update_recreates_did_output() {
    let params = UpdateParams {
        did_utxo: batch_did_utxo(),
        did: batch_did(0),
        update: rotate_key(0).update,
        did_output: DidOutputSpec::default(),
        funding: Funding::new(FEE_RATE, vec![batch_change_utxo()]),
    };

    let txs = builder().update(params).unwrap();
    assert_eq!(txs.commit.tx.input.len(), 2);
    assert_eq!(txs.commit.tx.input[0].previous_output, batch_did_utxo().utxo.outpoint());
    assert_eq!(txs.reveal.tx.output.len(), 1);
    assert_eq!(
        txs.reveal.tx.output[0].script_pubkey,
        txs.commit.change.unwrap().address.script_pubkey()
    );
}

#[test]
fn test_deactivate_burns_did_output() {
    let params = DeactivateParams {
        did_utxo: batch_did_utxo(),
        funding: Funding::new(FEE_RATE, vec![batch_change_utxo()]),
    };

    let deactivated = builder().deactivate(params).unwrap();
    assert!(deactivated.did_output.is_none());
    assert_eq!(deactivated.tx.output[0].script_pubkey, deactivation_script());
    assert_eq!(deactivated.tx.output[0].value, Amount::ZERO);
    assert_eq!(
        deactivated.tx.input[0].previous_output,
        batch_did_utxo().utxo.outpoint()
    );
    assert_eq!(deactivated.change.unwrap().index, 1);
}
