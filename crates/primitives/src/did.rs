use std::fmt;

use didbtc_encoding::Multikey;
use serde::{Deserialize, Serialize};

use crate::VerificationRelationships;

/// Free-form DID metadata (services and the like).
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A key bound to a DID together with its verification relationships.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    pub multikey: Multikey,
    #[serde(rename = "verificationRelationshipFlags")]
    pub flags: VerificationRelationships,
}

impl VerificationMethod {
    pub fn new(multikey: Multikey, flags: VerificationRelationships) -> Self {
        Self { multikey, flags }
    }
}

/// Key that controls the DID UTXO, taken verbatim from the output script that carries the
/// DID. For the default P2TR output these are the 32 bytes of the tweaked x-only key.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControllerKey(#[serde(with = "hex::serde")] Vec<u8>);

impl ControllerKey {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for ControllerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ControllerKey({})", hex::encode(&self.0))
    }
}

/// Resolved state of a single DID.
///
/// Values are treated as snapshots: applying an update consumes one snapshot and yields the
/// next, see [`Did::apply_update`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Did {
    /// Ordered verification methods. The position is the address used by later updates.
    pub verification_methods: Vec<VerificationMethod>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller_key: Option<ControllerKey>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    #[serde(default)]
    pub is_deactivated: bool,
}

impl Did {
    /// A fresh DID with a single verification method.
    pub fn new(initial: VerificationMethod, controller_key: Option<ControllerKey>) -> Self {
        Self {
            verification_methods: vec![initial],
            controller_key,
            metadata: None,
            is_deactivated: false,
        }
    }

    /// Returns the same DID marked as deactivated.
    pub fn deactivated(mut self) -> Self {
        self.is_deactivated = true;
        self
    }

    pub fn has_metadata_key(&self, key: &str) -> bool {
        self.metadata
            .as_ref()
            .is_some_and(|metadata| metadata.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use didbtc_encoding::Codec;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_did_json_shape() {
        let did = Did::new(
            VerificationMethod::new(
                Multikey::new(Codec::Ed25519Pub, &[1u8; 32]),
                VerificationRelationships::DEFAULT,
            ),
            Some(ControllerKey::new(vec![0xab; 32])),
        );

        let value = serde_json::to_value(&did).unwrap();
        assert_eq!(
            value["verificationMethods"][0]["verificationRelationshipFlags"],
            json!(3)
        );
        assert_eq!(value["controllerKey"], json!("ab".repeat(32)));
        assert_eq!(value["isDeactivated"], json!(false));
        assert!(value.get("metadata").is_none());

        let back: Did = serde_json::from_value(value).unwrap();
        assert_eq!(back, did);
    }

    #[test]
    fn test_metadata_lookup() {
        let mut did = Did::default();
        assert!(!did.has_metadata_key("service"));
        did.metadata = Some(Metadata::from_iter([("service".to_owned(), json!([]))]));
        assert!(did.has_metadata_key("service"));
        assert!(did.deactivated().is_deactivated);
    }
}
