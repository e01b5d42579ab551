//! Update payloads and their application to a [`Did`].

use didbtc_encoding::Multikey;
use serde::{Deserialize, Serialize};

use crate::{
    Did, Metadata, OperationError, UpdateError, VerificationMethod, VerificationRelationships,
};

/// Wire form of a verification-method operation: `{i?, k?, vr?}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVmOperation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i: Option<u32>,

    /// Multibase encoded multikey.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vr: Option<u8>,
}

/// A classified verification-method operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawVmOperation", into = "RawVmOperation")]
pub enum VmOperation {
    /// Pushes a new method at the end of the list.
    Append {
        multikey: Multikey,
        flags: VerificationRelationships,
    },

    /// Replaces the key and/or the flags of the method at `index`. At least one is set.
    Update {
        index: u32,
        multikey: Option<Multikey>,
        flags: Option<VerificationRelationships>,
    },

    /// Removes the method at `index`, shifting later methods down by one.
    Delete { index: u32 },
}

impl VmOperation {
    /// Classifies a wire operation.
    ///
    /// With an index the operation is an update if it carries a key or flags and a delete
    /// otherwise. Without an index it must carry both a key and flags to be an append.
    pub fn classify(raw: RawVmOperation) -> Result<Self, UpdateError> {
        let multikey = raw.k.as_deref().map(Multikey::from_multibase).transpose()?;
        let flags = raw.vr.map(VerificationRelationships::new).transpose()?;

        let op = match (raw.i, multikey, flags) {
            (Some(index), None, None) => VmOperation::Delete { index },
            (Some(index), multikey, flags) => VmOperation::Update {
                index,
                multikey,
                flags,
            },
            (None, Some(multikey), Some(flags)) => VmOperation::Append { multikey, flags },
            (None, _, _) => return Err(OperationError::Unclassifiable.into()),
        };
        Ok(op)
    }

    /// Index of the method this operation addresses, if any.
    pub fn index(&self) -> Option<u32> {
        match self {
            VmOperation::Append { .. } => None,
            VmOperation::Update { index, .. } | VmOperation::Delete { index } => Some(*index),
        }
    }
}

impl TryFrom<RawVmOperation> for VmOperation {
    type Error = UpdateError;

    fn try_from(raw: RawVmOperation) -> Result<Self, Self::Error> {
        Self::classify(raw)
    }
}

impl From<VmOperation> for RawVmOperation {
    fn from(op: VmOperation) -> Self {
        match op {
            VmOperation::Append { multikey, flags } => RawVmOperation {
                i: None,
                k: Some(multikey.to_multibase()),
                vr: Some(flags.bits()),
            },
            VmOperation::Update {
                index,
                multikey,
                flags,
            } => RawVmOperation {
                i: Some(index),
                k: multikey.map(|mk| mk.to_multibase()),
                vr: flags.map(|f| f.bits()),
            },
            VmOperation::Delete { index } => RawVmOperation {
                i: Some(index),
                ..Default::default()
            },
        }
    }
}

/// Wire form of an update body before its operations are classified.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RawDidUpdate {
    #[serde(default)]
    pub vm: Option<Vec<RawVmOperation>>,
    #[serde(default)]
    pub u: Option<Metadata>,
    #[serde(default)]
    pub d: Option<Metadata>,
    #[serde(default)]
    pub a: Option<Metadata>,
}

/// An update to a single DID.
///
/// Serialises to `{"vm":[..],"u":{..},"d":{..},"a":{..}}` with absent parts omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDidUpdate")]
pub struct DidUpdate {
    /// Verification-method operations, applied in order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm: Option<Vec<VmOperation>>,

    /// Metadata entries to overwrite. Each key must already exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub u: Option<Metadata>,

    /// Metadata keys to remove. Each key must already exist; values are ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<Metadata>,

    /// Metadata entries to add. No key may already exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<Metadata>,
}

impl TryFrom<RawDidUpdate> for DidUpdate {
    type Error = UpdateError;

    fn try_from(raw: RawDidUpdate) -> Result<Self, Self::Error> {
        let vm = raw
            .vm
            .map(|ops| {
                ops.into_iter()
                    .map(VmOperation::classify)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;
        Ok(Self {
            vm,
            u: raw.u,
            d: raw.d,
            a: raw.a,
        })
    }
}

impl DidUpdate {
    /// Checks that the update can be applied to `did` before anything is written on chain.
    ///
    /// Indexes are checked against the current method list, not against the list as it would
    /// look part way through the update.
    pub fn validate_against(&self, did: &Did) -> Result<(), UpdateError> {
        if did.is_deactivated {
            return Err(UpdateError::Deactivated);
        }

        let len = did.verification_methods.len();
        for index in self.vm.iter().flatten().filter_map(VmOperation::index) {
            if index as usize >= len {
                return Err(UpdateError::VerificationMethodIndex { index, len });
            }
        }

        for key in self.u.iter().chain(self.d.iter()).flat_map(|m| m.keys()) {
            if !did.has_metadata_key(key) {
                return Err(UpdateError::MetadataKeyMissing(key.clone()));
            }
        }

        for key in self.a.iter().flat_map(|m| m.keys()) {
            if did.has_metadata_key(key) {
                return Err(UpdateError::MetadataKeyExists(key.clone()));
            }
        }

        Ok(())
    }
}

impl Did {
    /// Applies `update` and returns the next snapshot.
    ///
    /// Verification-method operations run first, in order, then metadata additions,
    /// updates and deletions.
    pub fn apply_update(mut self, update: &DidUpdate) -> Result<Did, UpdateError> {
        for op in update.vm.iter().flatten() {
            self.apply_vm_operation(op)?;
        }

        for (key, value) in update.a.iter().flatten() {
            let metadata = self.metadata.get_or_insert_with(Metadata::new);
            if metadata.contains_key(key) {
                return Err(UpdateError::MetadataKeyExists(key.clone()));
            }
            metadata.insert(key.clone(), value.clone());
        }

        if let Some(updates) = &update.u {
            for (key, value) in updates {
                match self.metadata.as_mut().and_then(|m| m.get_mut(key)) {
                    Some(slot) => *slot = value.clone(),
                    None => return Err(UpdateError::MetadataKeyMissing(key.clone())),
                }
            }
        }

        if let Some(deletions) = &update.d {
            for key in deletions.keys() {
                if self.metadata.as_mut().and_then(|m| m.shift_remove(key)).is_none() {
                    return Err(UpdateError::MetadataKeyMissing(key.clone()));
                }
            }
        }

        Ok(self)
    }

    fn apply_vm_operation(&mut self, op: &VmOperation) -> Result<(), UpdateError> {
        let len = self.verification_methods.len();
        let out_of_range = |index: u32| UpdateError::VerificationMethodIndex { index, len };

        match op {
            VmOperation::Append { multikey, flags } => {
                self.verification_methods
                    .push(VerificationMethod::new(multikey.clone(), *flags));
            }
            VmOperation::Update {
                index,
                multikey,
                flags,
            } => {
                let vm = self
                    .verification_methods
                    .get_mut(*index as usize)
                    .ok_or_else(|| out_of_range(*index))?;
                if let Some(multikey) = multikey {
                    vm.multikey = multikey.clone();
                }
                if let Some(flags) = flags {
                    vm.flags = *flags;
                }
            }
            VmOperation::Delete { index } => {
                if *index as usize >= len {
                    return Err(out_of_range(*index));
                }
                self.verification_methods.remove(*index as usize);
            }
        }
        Ok(())
    }
}

/// Update addressed to one DID of a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchDidUpdate {
    /// Index of the DID in its batch creation transaction.
    pub index: u32,
    /// Current state, used for validation only.
    pub did: Did,
    pub update: DidUpdate,
}

/// One element of a batch update payload: the update fields followed by `i`.
///
/// An entry with no update fields deactivates the DID at `i`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BatchUpdateEntry {
    #[serde(flatten)]
    pub update: DidUpdate,
    pub i: u32,
}

impl BatchUpdateEntry {
    pub fn deactivation(i: u32) -> Self {
        Self {
            update: DidUpdate::default(),
            i,
        }
    }
}

#[cfg(test)]
mod tests {
    use didbtc_encoding::Codec;
    use serde_json::json;

    use super::*;

    fn mk(byte: u8) -> Multikey {
        Multikey::new(Codec::Ed25519Pub, &[byte; 32])
    }

    fn did_with(n: u8) -> Did {
        Did {
            verification_methods: (0..n)
                .map(|b| VerificationMethod::new(mk(b), VerificationRelationships::DEFAULT))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_classification() {
        let k = mk(9).to_multibase();

        let op: VmOperation = serde_json::from_value(json!({ "i": 1 })).unwrap();
        assert_eq!(op, VmOperation::Delete { index: 1 });

        let op: VmOperation = serde_json::from_value(json!({ "i": 0, "vr": 4 })).unwrap();
        assert_eq!(
            op,
            VmOperation::Update {
                index: 0,
                multikey: None,
                flags: Some(VerificationRelationships::KEY_AGREEMENT),
            }
        );

        let op: VmOperation = serde_json::from_value(json!({ "k": k, "vr": 1 })).unwrap();
        assert_eq!(
            op,
            VmOperation::Append {
                multikey: mk(9),
                flags: VerificationRelationships::AUTHENTICATION,
            }
        );

        assert_eq!(
            VmOperation::classify(RawVmOperation {
                k: Some(k),
                ..Default::default()
            }),
            Err(UpdateError::Operation(OperationError::Unclassifiable))
        );
        assert_eq!(
            VmOperation::classify(RawVmOperation {
                i: Some(0),
                vr: Some(0),
                ..Default::default()
            }),
            Err(UpdateError::Operation(OperationError::InvalidFlags(0)))
        );
    }

    #[test]
    fn test_update_serialization_order() {
        let update = DidUpdate {
            vm: Some(vec![VmOperation::Update {
                index: 0,
                multikey: Some(mk(1)),
                flags: None,
            }]),
            a: Some(Metadata::from_iter([("service".to_owned(), json!({}))])),
            ..Default::default()
        };
        let expected = format!(
            r#"{{"vm":[{{"i":0,"k":"{}"}}],"a":{{"service":{{}}}}}}"#,
            mk(1).to_multibase()
        );
        assert_eq!(serde_json::to_string(&update).unwrap(), expected);

        let entry = BatchUpdateEntry { update, i: 2 };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.ends_with(r#","i":2}"#), "{json}");

        assert_eq!(
            serde_json::to_string(&BatchUpdateEntry::deactivation(3)).unwrap(),
            r#"{"i":3}"#
        );
    }

    #[test]
    fn test_vm_operations_apply_in_order() {
        let update = DidUpdate {
            vm: Some(vec![
                VmOperation::Delete { index: 0 },
                // index 0 now addresses what used to be index 1
                VmOperation::Update {
                    index: 0,
                    multikey: Some(mk(7)),
                    flags: None,
                },
                VmOperation::Append {
                    multikey: mk(8),
                    flags: VerificationRelationships::CAPABILITY_DELEGATION,
                },
            ]),
            ..Default::default()
        };

        let did = did_with(3).apply_update(&update).unwrap();
        let keys: Vec<_> = did
            .verification_methods
            .iter()
            .map(|vm| vm.multikey.clone())
            .collect();
        assert_eq!(keys, vec![mk(7), mk(2), mk(8)]);
        assert_eq!(
            did.verification_methods[2].flags,
            VerificationRelationships::CAPABILITY_DELEGATION
        );
    }

    #[test]
    fn test_out_of_range_update_fails() {
        let update = DidUpdate {
            vm: Some(vec![VmOperation::Delete { index: 5 }]),
            ..Default::default()
        };
        assert_eq!(
            did_with(1).apply_update(&update),
            Err(UpdateError::VerificationMethodIndex { index: 5, len: 1 })
        );
        assert_eq!(
            update.validate_against(&did_with(1)),
            Err(UpdateError::VerificationMethodIndex { index: 5, len: 1 })
        );
    }

    #[test]
    fn test_metadata_semantics() {
        let add = DidUpdate {
            a: Some(Metadata::from_iter([("svc".to_owned(), json!(1))])),
            ..Default::default()
        };
        let did = did_with(1).apply_update(&add).unwrap();
        assert_eq!(did.metadata.as_ref().unwrap()["svc"], json!(1));

        // adding twice is rejected
        assert_eq!(
            did.clone().apply_update(&add),
            Err(UpdateError::MetadataKeyExists("svc".to_owned()))
        );
        assert_eq!(
            add.validate_against(&did),
            Err(UpdateError::MetadataKeyExists("svc".to_owned()))
        );

        let change = DidUpdate {
            u: Some(Metadata::from_iter([("svc".to_owned(), json!(2))])),
            ..Default::default()
        };
        let did = did.apply_update(&change).unwrap();
        assert_eq!(did.metadata.as_ref().unwrap()["svc"], json!(2));

        let remove = DidUpdate {
            d: Some(Metadata::from_iter([("svc".to_owned(), json!(null))])),
            ..Default::default()
        };
        let did = did.apply_update(&remove).unwrap();
        assert!(!did.has_metadata_key("svc"));

        assert_eq!(
            did.clone().apply_update(&change),
            Err(UpdateError::MetadataKeyMissing("svc".to_owned()))
        );
        assert_eq!(
            remove.validate_against(&did),
            Err(UpdateError::MetadataKeyMissing("svc".to_owned()))
        );
    }

    #[test]
    fn test_empty_additions_leave_metadata_absent() {
        let update = DidUpdate {
            a: Some(Metadata::new()),
            ..Default::default()
        };
        let did = did_with(1).apply_update(&update).unwrap();
        assert_eq!(did.metadata, None);
    }

    #[test]
    fn test_deactivated_did_rejects_updates() {
        let did = did_with(1).deactivated();
        assert_eq!(
            DidUpdate::default().validate_against(&did),
            Err(UpdateError::Deactivated)
        );
    }
}
