//! Contract toward the coordination registry: a publicly readable,
//! append-only ledger of party/secret bindings per session.
//!
//! Reads are point-in-time against a possibly lagging view; there is no
//! read-your-writes guarantee. Appends are authenticated, user-confirmed
//! transactions whose success is only known after finality.

use serde::{Deserialize, Serialize};

use crate::sdk::api::SessionId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// Transport-level failure. Transient; safe to re-invoke the
    /// operation from the top, never retried automatically.
    #[error("registry transport failure: {0}")]
    Transport(String),
    /// The user declined confirmation, or the write reverted on chain.
    #[error("registry write rejected: {0}")]
    Rejected(String),
}

/// Receipt for a submitted append, prior to finality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendReceipt {
    pub tx_hash: String,
}

/// A finalized append. The registry assigns the slot index atomically as
/// part of the append, so the index reported here is authoritative even
/// under concurrent registration by other parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedAppend {
    pub party_index: usize,
}

pub trait RegistryClient {
    /// Number of bindings currently visible for `session`.
    fn party_count(&self, session: &SessionId) -> Result<usize, RegistryError>;

    /// Raw `"{party_id}:{share_id}"` handle at `index`. Appends are
    /// monotonic and never retracted, so any index below an observed count
    /// stays readable.
    fn binding_at(&self, session: &SessionId, index: usize) -> Result<String, RegistryError>;

    /// Submit an append of `handle`. Returns once the transaction is
    /// accepted for inclusion; success of the write itself is only known
    /// via [`RegistryClient::wait_finality`].
    fn append_binding(
        &mut self,
        session: &SessionId,
        handle: &str,
    ) -> Result<AppendReceipt, RegistryError>;

    /// Block until the append is finalized (or rejected).
    fn wait_finality(&self, receipt: &AppendReceipt) -> Result<FinalizedAppend, RegistryError>;
}
