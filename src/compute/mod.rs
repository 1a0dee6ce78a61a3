//! Contract toward the secure-computation network: program storage,
//! access-controlled secret shares, and joint computation over them.
//!
//! Only the fields this crate reads or writes are modeled; everything else
//! about the network is opaque. Every call may fail transiently (transport)
//! or permanently (authorization, malformed request); the session layer
//! never retries on its own.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{crypto_tools::credential::CredentialContext, sdk::api::SessionId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComputeError {
    /// Transport-level failure. Transient; safe to re-invoke.
    #[error("compute network transport failure: {0}")]
    Transport(String),
    /// A referenced share is not accessible to the caller. Permanent until
    /// the share owner grants access out-of-band.
    #[error("access denied: {0}")]
    Unauthorized(String),
    /// The supplied party/role shape does not match the stored program.
    /// The caller must re-derive bindings from a fresh registry read.
    #[error("party/role cardinality mismatch: program expects {expected}, got {actual}")]
    Cardinality { expected: usize, actual: usize },
    /// The network rejected the request as malformed.
    #[error("malformed compute request: {0}")]
    Malformed(String),
}

/// Compute-network party identity, derived from the user's credentials.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComputePartyId(String);

impl ComputePartyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ComputePartyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle of one stored secret share.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShareId(String);

impl ShareId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShareId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle of an asynchronously retrievable computation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultHandle(String);

impl ResultHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One named secret value, as stored in a share or supplied at compute
/// time. Values are decimal unsigned-integer renderings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: String,
}

/// The four independent permission grant lists on a stored share, each a
/// list of compute-network user ids. Empty means "no one besides the
/// owner".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareGrants {
    pub retrieve: Vec<String>,
    pub update: Vec<String>,
    pub delete: Vec<String>,
    pub compute: Vec<String>,
}

impl ShareGrants {
    pub fn with_compute(mut self, user_id: impl Into<String>) -> Self {
        self.compute.push(user_id.into());
        self
    }
}

/// Named input/output role bindings for a computation invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBindings {
    pub inputs: Vec<(String, ComputePartyId)>,
    pub output: (String, ComputePartyId),
}

/// Mapping from output-role name to an integer count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationResult(BTreeMap<String, u64>);

impl ComputationResult {
    pub fn from_counts(counts: BTreeMap<String, u64>) -> Self {
        Self(counts)
    }
    pub fn get(&self, output_name: &str) -> Option<u64> {
        self.0.get(output_name).copied()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(name, &count)| (name.as_str(), count))
    }
}

pub trait ComputeClient {
    /// Store the investigation program; the returned handle is the session
    /// identity.
    fn store_program(
        &mut self,
        owner: &CredentialContext,
        name: &str,
    ) -> Result<SessionId, ComputeError>;

    /// Store `values` as a secret share bound to `session` under `role`,
    /// access-controlled by `grants`.
    fn store_share(
        &mut self,
        owner: &CredentialContext,
        values: &[NamedValue],
        session: &SessionId,
        role: &str,
        grants: &ShareGrants,
    ) -> Result<ShareId, ComputeError>;

    /// Read back one named value from a share the caller owns or may
    /// retrieve.
    fn retrieve_share(
        &self,
        owner: &CredentialContext,
        share: &ShareId,
        name: &str,
    ) -> Result<String, ComputeError>;

    /// Submit a computation over `share_ids` plus inline
    /// `compute_time_secrets`, under the given role bindings.
    fn submit_compute(
        &mut self,
        caller: &CredentialContext,
        session: &SessionId,
        bindings: &RoleBindings,
        share_ids: &[ShareId],
        compute_time_secrets: &[NamedValue],
    ) -> Result<ResultHandle, ComputeError>;

    /// Retrieve the result of a prior submission. Read once per handle.
    fn fetch_result(&self, handle: &ResultHandle) -> Result<ComputationResult, ComputeError>;
}
