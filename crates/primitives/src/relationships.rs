use std::{fmt, ops::BitOr};

use serde::{Deserialize, Serialize};

use crate::OperationError;

/// Verification relationship bit set of a verification method.
///
/// Valid values are `1..=31`; the zero set and bits above the fifth are rejected.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct VerificationRelationships(u8);

impl VerificationRelationships {
    pub const AUTHENTICATION: Self = Self(1);
    pub const ASSERTION: Self = Self(2);
    pub const KEY_AGREEMENT: Self = Self(4);
    pub const CAPABILITY_INVOCATION: Self = Self(8);
    pub const CAPABILITY_DELEGATION: Self = Self(16);

    /// Authentication and assertion.
    pub const DEFAULT: Self = Self(3);

    const MAX: u8 = 31;

    /// Builds a flag set, rejecting values outside `1..=31`.
    pub const fn new(bits: u8) -> Result<Self, OperationError> {
        if bits == 0 || bits > Self::MAX {
            return Err(OperationError::InvalidFlags(bits));
        }
        Ok(Self(bits))
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for VerificationRelationships {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BitOr for VerificationRelationships {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl TryFrom<u8> for VerificationRelationships {
    type Error = OperationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VerificationRelationships> for u8 {
    fn from(value: VerificationRelationships) -> Self {
        value.0
    }
}

impl fmt::Debug for VerificationRelationships {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerificationRelationships({:#07b})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range() {
        assert!(VerificationRelationships::new(0).is_err());
        assert!(VerificationRelationships::new(32).is_err());
        assert_eq!(VerificationRelationships::new(31).unwrap().bits(), 31);
        assert_eq!(VerificationRelationships::new(1).unwrap().bits(), 1);
    }

    #[test]
    fn test_default_is_auth_and_assertion() {
        let flags = VerificationRelationships::default();
        assert_eq!(
            flags,
            VerificationRelationships::AUTHENTICATION | VerificationRelationships::ASSERTION
        );
        assert!(flags.contains(VerificationRelationships::ASSERTION));
        assert!(!flags.contains(VerificationRelationships::KEY_AGREEMENT));
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<VerificationRelationships>("0").is_err());
        assert!(serde_json::from_str::<VerificationRelationships>("40").is_err());
        assert_eq!(
            serde_json::from_str::<VerificationRelationships>("5").unwrap(),
            VerificationRelationships::AUTHENTICATION | VerificationRelationships::KEY_AGREEMENT
        );
    }
}
