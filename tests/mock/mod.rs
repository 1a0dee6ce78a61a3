//! In-memory stand-ins for the registry, the compute network, and local
//! storage, faithful to their documented contracts: append-only monotonic
//! registry rows, grant-checked shares, equal-value match counting.

use std::collections::HashMap;

use identicall::{
    compute::{
        ComputationResult, ComputeClient, ComputeError, NamedValue, ResultHandle, RoleBindings,
        ShareGrants, ShareId,
    },
    crypto_tools::credential::{CredentialContext, CredentialError, CredentialSource, UserKey},
    investigation::KeyValueStore,
    registry::{AppendReceipt, FinalizedAppend, RegistryClient, RegistryError},
    sdk::api::{BytesVec, SessionId},
};

/// Wallet layer: holds a user key while connected.
pub struct MockWallet {
    key: Option<UserKey>,
}

impl MockWallet {
    pub fn connected(seed: u8) -> Self {
        Self {
            key: Some(UserKey::try_from(&[seed; 64][..]).unwrap()),
        }
    }

    pub fn disconnected() -> Self {
        Self { key: None }
    }
}

impl CredentialSource for MockWallet {
    fn resolve(&self) -> Result<CredentialContext, CredentialError> {
        self.key
            .clone()
            .map(CredentialContext::from_user_key)
            .ok_or(CredentialError::NotConnected)
    }
}

#[derive(Default)]
pub struct MemoryStore(HashMap<String, BytesVec>);

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Option<BytesVec> {
        self.0.get(key).cloned()
    }
    fn write(&mut self, key: &str, bytes: &[u8]) {
        self.0.insert(key.to_string(), bytes.to_vec());
    }
}

/// Append-only ledger. The slot index is assigned at append time and
/// reported via finality, matching the on-chain contract.
#[derive(Default)]
pub struct MockRegistry {
    rows: HashMap<String, Vec<String>>,
    finalized: HashMap<String, usize>,
    next_tx: usize,
    /// When set, the next append fails as if the user declined the
    /// confirmation prompt. Consumed by that append.
    pub reject_next_append: bool,
}

impl MockRegistry {
    pub fn row_count(&self, session: &SessionId) -> usize {
        self.rows.get(session.as_str()).map_or(0, Vec::len)
    }

    pub fn row(&self, session: &SessionId, index: usize) -> String {
        self.rows[session.as_str()][index].clone()
    }
}

impl RegistryClient for MockRegistry {
    fn party_count(&self, session: &SessionId) -> Result<usize, RegistryError> {
        Ok(self.row_count(session))
    }

    fn binding_at(&self, session: &SessionId, index: usize) -> Result<String, RegistryError> {
        self.rows
            .get(session.as_str())
            .and_then(|rows| rows.get(index))
            .cloned()
            .ok_or_else(|| RegistryError::Transport(format!("no binding at index {}", index)))
    }

    fn append_binding(
        &mut self,
        session: &SessionId,
        handle: &str,
    ) -> Result<AppendReceipt, RegistryError> {
        if self.reject_next_append {
            self.reject_next_append = false;
            return Err(RegistryError::Rejected(
                "user declined confirmation".to_string(),
            ));
        }
        let rows = self.rows.entry(session.as_str().to_string()).or_default();
        rows.push(handle.to_string());
        let tx_hash = format!("tx-{}", self.next_tx);
        self.next_tx += 1;
        self.finalized.insert(tx_hash.clone(), rows.len() - 1);
        Ok(AppendReceipt { tx_hash })
    }

    fn wait_finality(&self, receipt: &AppendReceipt) -> Result<FinalizedAppend, RegistryError> {
        self.finalized
            .get(&receipt.tx_hash)
            .map(|&party_index| FinalizedAppend { party_index })
            .ok_or_else(|| RegistryError::Transport("unknown transaction".to_string()))
    }
}

struct StoredShare {
    id: ShareId,
    owner_user_id: String,
    values: Vec<NamedValue>,
    grants: ShareGrants,
    revoked: bool,
}

/// Compute network that stores shares with their grants and evaluates the
/// match-counting program directly over the gathered values.
#[derive(Default)]
pub struct MockComputeNetwork {
    programs: Vec<SessionId>,
    shares: Vec<StoredShare>,
    results: HashMap<String, ComputationResult>,
    next_program: usize,
    next_share: usize,
    next_result: usize,
    /// When set, submissions whose input cardinality differs are rejected,
    /// as a program compiled for a fixed party count would.
    pub expected_parties: Option<usize>,
}

impl MockComputeNetwork {
    pub fn stored_share_ids(&self) -> Vec<ShareId> {
        self.shares.iter().map(|share| share.id.clone()).collect()
    }

    /// The share owner deleted or un-granted the share out-of-band.
    pub fn revoke(&mut self, share: &ShareId) {
        for stored in &mut self.shares {
            if &stored.id == share {
                stored.revoked = true;
            }
        }
    }

    fn share(&self, id: &ShareId) -> Result<&StoredShare, ComputeError> {
        self.shares
            .iter()
            .find(|stored| &stored.id == id)
            .ok_or_else(|| ComputeError::Malformed(format!("unknown share {}", id)))
    }
}

impl ComputeClient for MockComputeNetwork {
    fn store_program(
        &mut self,
        owner: &CredentialContext,
        name: &str,
    ) -> Result<SessionId, ComputeError> {
        let id = SessionId::new(format!("{}/{}-{}", owner.user_id(), name, self.next_program));
        self.next_program += 1;
        self.programs.push(id.clone());
        Ok(id)
    }

    fn store_share(
        &mut self,
        owner: &CredentialContext,
        values: &[NamedValue],
        _session: &SessionId,
        _role: &str,
        grants: &ShareGrants,
    ) -> Result<ShareId, ComputeError> {
        let id = ShareId::new(format!("share-{}", self.next_share));
        self.next_share += 1;
        self.shares.push(StoredShare {
            id: id.clone(),
            owner_user_id: owner.user_id().to_string(),
            values: values.to_vec(),
            grants: grants.clone(),
            revoked: false,
        });
        Ok(id)
    }

    fn retrieve_share(
        &self,
        owner: &CredentialContext,
        share: &ShareId,
        name: &str,
    ) -> Result<String, ComputeError> {
        let stored = self.share(share)?;
        let allowed = stored.owner_user_id == owner.user_id()
            || stored.grants.retrieve.iter().any(|id| id == owner.user_id());
        if stored.revoked || !allowed {
            return Err(ComputeError::Unauthorized(format!(
                "no retrieve access to {}",
                share
            )));
        }
        stored
            .values
            .iter()
            .find(|value| value.name == name)
            .map(|value| value.value.clone())
            .ok_or_else(|| ComputeError::Malformed(format!("no value named {}", name)))
    }

    fn submit_compute(
        &mut self,
        caller: &CredentialContext,
        session: &SessionId,
        bindings: &RoleBindings,
        share_ids: &[ShareId],
        compute_time_secrets: &[NamedValue],
    ) -> Result<ResultHandle, ComputeError> {
        if !self.programs.contains(session) {
            return Err(ComputeError::Malformed(format!(
                "unknown program {}",
                session
            )));
        }
        if let Some(expected) = self.expected_parties {
            if bindings.inputs.len() != expected {
                return Err(ComputeError::Cardinality {
                    expected,
                    actual: bindings.inputs.len(),
                });
            }
        }

        // gather named values from the referenced shares, grant-checked,
        // then overlay the compute-time secrets
        let mut responses: HashMap<String, String> = HashMap::new();
        for id in share_ids {
            let stored = self.share(id)?;
            let allowed = stored.owner_user_id == caller.user_id()
                || stored.grants.compute.iter().any(|id| id == caller.user_id());
            if stored.revoked || !allowed {
                return Err(ComputeError::Unauthorized(format!(
                    "no compute access to {}",
                    id
                )));
            }
            for value in &stored.values {
                responses.insert(value.name.clone(), value.value.clone());
            }
        }
        for secret in compute_time_secrets {
            responses.insert(secret.name.clone(), secret.value.clone());
        }

        let values = (0..bindings.inputs.len())
            .map(|i| {
                responses
                    .get(&format!("r{}_response", i))
                    .cloned()
                    .ok_or_else(|| ComputeError::Malformed(format!("missing r{}_response", i)))
            })
            .collect::<Result<Vec<String>, ComputeError>>()?;

        let counts = values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let count = values.iter().filter(|other| *other == value).count() as u64;
                (format!("same_response_count_for_r{}", i), count)
            })
            .collect();

        let handle = ResultHandle::new(format!("result-{}", self.next_result));
        self.next_result += 1;
        self.results
            .insert(handle.as_str().to_string(), ComputationResult::from_counts(counts));
        Ok(handle)
    }

    fn fetch_result(&self, handle: &ResultHandle) -> Result<ComputationResult, ComputeError> {
        self.results
            .get(handle.as_str())
            .cloned()
            .ok_or_else(|| ComputeError::Transport(format!("no result for {}", handle.as_str())))
    }
}
