//! API for identicall users
use serde::{Deserialize, Serialize};

use crate::{
    compute::ComputeError, crypto_tools::credential::CredentialError, registry::RegistryError,
};

pub type SessionResult<T> = Result<T, SessionError>;
pub type BytesVec = Vec<u8>;

/// Failure of a session operation.
/// Remote-call failures carry their client taxonomy unchanged;
/// none of these are retried automatically.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Compute(#[from] ComputeError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    /// The registry row at this index does not parse as `"{party_id}:{share_id}"`.
    #[error("malformed registry binding at party index {0}")]
    MalformedBinding(usize),
    /// Undecodable or absent session reference. Treated as "no active
    /// session" by the embedding layer, not as a crash.
    #[error("malformed session reference")]
    MalformedSession,
    #[error("registration not allowed in current session state")]
    RegistrationOutOfTurn,
    /// The fetched computation result does not map onto the party slots.
    #[error("computation result does not map onto party slots: {0}")]
    MalformedResult(String),
    /// Internal invariant violated; see the log at the detection site.
    #[error("internal fault")]
    Fatal,
}

/// Opaque session identity: the handle returned by the compute network
/// when the investigation program is stored. Globally unique per stored
/// program; immutable for the life of the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    /// The user-id fragment preceding the first `/` of the handle.
    /// The compute network names stored programs `{owner_user_id}/{name}`;
    /// shares are granted compute access to this owner.
    pub fn owner(&self) -> &str {
        match self.0.split_once('/') {
            Some((owner, _)) => owner,
            None => &self.0,
        }
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Expose identicall's (de)serialization functions
/// that use the appropriate bincode config options.
pub use super::wire_bytes::{decode, encode};
