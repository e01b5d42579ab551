//! Taproot key material derived from a wallet secret key.

use bitcoin::{
    key::{Keypair, TapTweak, TweakedPublicKey},
    secp256k1::{Secp256k1, SecretKey, Signing, Verification, XOnlyPublicKey},
    Address, Network, ScriptBuf,
};

/// Key-path-only taproot view of a secret key.
///
/// The tweak commits to no script tree, so the output can only be spent with a signature
/// from [`TaprootKey::tweaked_keypair`].
#[derive(Clone, Debug)]
pub struct TaprootKey {
    internal_key: XOnlyPublicKey,
    tweaked_keypair: Keypair,
    tweaked_key: TweakedPublicKey,
    output_script: ScriptBuf,
}

impl TaprootKey {
    pub fn new<C: Signing + Verification>(secp: &Secp256k1<C>, secret_key: &SecretKey) -> Self {
        let keypair = Keypair::from_secret_key(secp, secret_key);
        let (internal_key, _parity) = keypair.x_only_public_key();

        let tweaked_keypair = keypair.tap_tweak(secp, None).to_inner();
        let tweaked_key =
            TweakedPublicKey::dangerous_assume_tweaked(tweaked_keypair.x_only_public_key().0);

        Self {
            internal_key,
            tweaked_keypair,
            tweaked_key,
            output_script: ScriptBuf::new_p2tr_tweaked(tweaked_key),
        }
    }

    /// Untweaked x-only key.
    pub fn internal_key(&self) -> XOnlyPublicKey {
        self.internal_key
    }

    /// Output key of the key-path P2TR output.
    pub fn tweaked_key(&self) -> XOnlyPublicKey {
        self.tweaked_key.to_inner()
    }

    /// Keypair that signs for [`TaprootKey::tweaked_key`].
    pub fn tweaked_keypair(&self) -> &Keypair {
        &self.tweaked_keypair
    }

    /// `OP_1 <tweaked key>`.
    pub fn output_script(&self) -> &ScriptBuf {
        &self.output_script
    }

    pub fn address(&self, network: Network) -> Address {
        Address::p2tr_tweaked(self.tweaked_key, network)
    }
}
