use std::array::TryFromSliceError;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::{
    compute::ComputePartyId,
    constants::{PARTY_ID_TAG, USER_ID_TAG},
};

/// Wallet-linked secret from which the compute-network identity is derived.
/// Obtained from the identity layer; opaque to this crate.
#[derive(Debug, Clone, Zeroize)]
#[zeroize(drop)]
pub struct UserKey(pub(crate) [u8; 64]);

impl TryFrom<&[u8]> for UserKey {
    type Error = TryFromSliceError;

    fn try_from(v: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(v.try_into()?))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CredentialError {
    /// The wallet session yielded no user key.
    #[error("not connected")]
    NotConnected,
}

/// Resolved compute-network identity, constructed once after the wallet
/// connects and passed by reference to every session operation. Dropping it
/// (on wallet disconnect) invalidates dependent session state. The user key
/// itself is consumed and zeroized during derivation.
#[derive(Debug, Clone)]
pub struct CredentialContext {
    user_id: String,
    party_id: ComputePartyId,
}

impl CredentialContext {
    pub fn from_user_key(user_key: UserKey) -> Self {
        let user_id = derive_id(USER_ID_TAG, &user_key);
        let party_id = ComputePartyId::new(derive_id(PARTY_ID_TAG, &user_key));
        Self { user_id, party_id }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
    pub fn party_id(&self) -> &ComputePartyId {
        &self.party_id
    }
}

/// The wallet/identity layer, seen from this crate: something that can
/// produce a user key, or report that no wallet is connected.
pub trait CredentialSource {
    fn resolve(&self) -> Result<CredentialContext, CredentialError>;
}

fn derive_id(tag: u8, user_key: &UserKey) -> String {
    let mut prf = Hmac::<Sha256>::new(user_key.0[..].into());

    prf.update(&tag.to_be_bytes());

    hex::encode(prf.finalize().into_bytes())
}
