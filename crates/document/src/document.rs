//! W3C DID documents rendered from resolved DID state.

use didbtc_encoding::{encode_multikey, Codec};
use didbtc_primitives::{Did, Metadata, VerificationRelationships};
use serde::Serialize;

pub const DID_CONTEXT: [&str; 2] = [
    "https://www.w3.org/ns/did/v1",
    "https://w3id.org/security/multikey/v1",
];

/// Fields owned by the document itself. Metadata entries with these names are not rendered,
/// so metadata can extend a document but never replace its identity, keys or relationships.
const RESERVED_FIELDS: [&str; 9] = [
    "@context",
    "id",
    "controller",
    "verificationMethod",
    "authentication",
    "assertionMethod",
    "keyAgreement",
    "capabilityInvocation",
    "capabilityDelegation",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVerificationMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub method_type: String,
    pub controller: String,
    pub public_key_multibase: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    pub id: String,

    /// `did:key` of the controller key, if the DID has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,

    pub verification_method: Vec<DocumentVerificationMethod>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authentication: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assertion_method: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key_agreement: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub capability_invocation: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub capability_delegation: Vec<String>,

    #[serde(flatten)]
    pub metadata: Metadata,
}

impl DidDocument {
    /// Renders `did` under the identifier `id`.
    ///
    /// Method `n` gets the fragment `#key-n`. Methods are controlled by the DID controller or,
    /// when there is none, by the DID itself.
    pub fn build(did: &Did, id: &str) -> Self {
        let controller = did.controller_key.as_ref().map(|key| {
            format!(
                "did:key:{}",
                encode_multikey(key.as_bytes(), Codec::Secp256k1Pub)
            )
        });
        let method_controller = controller.clone().unwrap_or_else(|| id.to_owned());

        let key_id = |n: usize| format!("{id}#key-{n}");
        let verification_method = did
            .verification_methods
            .iter()
            .enumerate()
            .map(|(n, vm)| DocumentVerificationMethod {
                id: key_id(n),
                method_type: "Multikey".to_owned(),
                controller: method_controller.clone(),
                public_key_multibase: vm.multikey.to_multibase(),
            })
            .collect();

        let with_flag = |flag: VerificationRelationships| -> Vec<String> {
            did.verification_methods
                .iter()
                .enumerate()
                .filter(|(_, vm)| vm.flags.contains(flag))
                .map(|(n, _)| key_id(n))
                .collect()
        };

        let metadata = did
            .metadata
            .iter()
            .flatten()
            .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            context: DID_CONTEXT.iter().map(|s| (*s).to_owned()).collect(),
            id: id.to_owned(),
            controller,
            verification_method,
            authentication: with_flag(VerificationRelationships::AUTHENTICATION),
            assertion_method: with_flag(VerificationRelationships::ASSERTION),
            key_agreement: with_flag(VerificationRelationships::KEY_AGREEMENT),
            capability_invocation: with_flag(VerificationRelationships::CAPABILITY_INVOCATION),
            capability_delegation: with_flag(VerificationRelationships::CAPABILITY_DELEGATION),
            metadata,
        }
    }
}
