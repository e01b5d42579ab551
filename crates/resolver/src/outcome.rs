use std::fmt;

use didbtc_primitives::Did;

/// What a single update transaction did to the DID.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// An update was applied.
    Applied,

    /// The DID was deactivated, by the deactivation output or an empty batch entry.
    Deactivated,

    /// The transaction does not update this DID. State passes through unchanged.
    Skipped(SkipReason),

    /// The payload is JSON but not a valid update. State passes through unchanged.
    Malformed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The spending input has no reveal script.
    NoPayload,
    /// The revealed payload is not JSON.
    NotJson,
    /// A batch payload with no entry for the resolved index.
    NotAddressed,
    /// The DID was deactivated earlier in the chain.
    AlreadyDeactivated,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::NoPayload => "no payload",
            SkipReason::NotJson => "payload is not json",
            SkipReason::NotAddressed => "no entry for this index",
            SkipReason::AlreadyDeactivated => "already deactivated",
        };
        f.write_str(s)
    }
}

/// A resolved DID with one outcome per transaction after the creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub did: Did,
    pub outcomes: Vec<UpdateOutcome>,
}
