use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    collections::{TypedUsize, VecMap},
    compute::{ComputationResult, ComputePartyId, ShareId},
    sdk::api::{SessionError, SessionResult},
};

/// Name under which the investigation program is stored on the compute
/// network.
pub const PROGRAM_NAME: &str = "identicall";

/// Marker for registry party slots: index i is role `Responder{i}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponderPartyId;

/// Party role name for slot `index`, as the stored program declares it.
pub fn responder_role(index: TypedUsize<ResponderPartyId>) -> String {
    format!("Responder{}", index)
}

/// Name of the secret share holding slot `index`'s response.
/// Must match the role's input name in the stored program, or the compute
/// step fails.
pub fn response_secret_name(index: TypedUsize<ResponderPartyId>) -> String {
    format!("r{}_response", index)
}

/// Name of the program output carrying slot `index`'s match count.
pub fn match_count_output_name(index: TypedUsize<ResponderPartyId>) -> String {
    format!("same_response_count_for_r{}", index)
}

/// One row of the registry's party list: slot index plus the parsed
/// `"{party_id}:{share_id}"` handle. Append-ordered; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyBinding {
    party_index: TypedUsize<ResponderPartyId>,
    party_id: ComputePartyId,
    share_id: ShareId,
}

impl PartyBinding {
    pub fn new(
        party_index: TypedUsize<ResponderPartyId>,
        party_id: ComputePartyId,
        share_id: ShareId,
    ) -> Self {
        Self {
            party_index,
            party_id,
            share_id,
        }
    }

    pub(super) fn from_handle(
        party_index: TypedUsize<ResponderPartyId>,
        raw: &str,
    ) -> SessionResult<Self> {
        match raw.split_once(':') {
            Some((party_id, share_id)) if !party_id.is_empty() && !share_id.is_empty() => {
                Ok(Self {
                    party_index,
                    party_id: ComputePartyId::new(party_id),
                    share_id: ShareId::new(share_id),
                })
            }
            _ => {
                warn!("malformed binding handle at slot {}", party_index);
                Err(SessionError::MalformedBinding(party_index.as_usize()))
            }
        }
    }

    /// The compound registry value `"{party_id}:{share_id}"`.
    pub fn handle(&self) -> String {
        format!("{}:{}", self.party_id, self.share_id)
    }

    pub fn party_index(&self) -> TypedUsize<ResponderPartyId> {
        self.party_index
    }
    pub fn party_id(&self) -> &ComputePartyId {
        &self.party_id
    }
    pub fn share_id(&self) -> &ShareId {
        &self.share_id
    }
}

/// User-visible step of a multi-step remote operation. The embedding layer
/// renders the display text while the call is in flight and reverts to idle
/// on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    StoringProgram,
    StoringSecret,
    AwaitingConfirmation,
    SendingTransaction,
    SubmittingComputation,
    FetchingResult,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Phase::StoringProgram => "Storing program...",
            Phase::StoringSecret => "Storing secret...",
            Phase::AwaitingConfirmation => "Awaiting user confirmation...",
            Phase::SendingTransaction => "Sending transaction...",
            Phase::SubmittingComputation => "Submitting computation...",
            Phase::FetchingResult => "Fetching result...",
        };
        write!(f, "{}", text)
    }
}

/// A computation result mapped unambiguously onto party slots: for N
/// parties, exactly N counts, one per slot, each in `[0, N]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchReport {
    counts: VecMap<ResponderPartyId, u64>,
}

impl MatchReport {
    pub(super) fn from_result(
        result: &ComputationResult,
        party_count: usize,
    ) -> SessionResult<Self> {
        if result.len() != party_count {
            return Err(SessionError::MalformedResult(format!(
                "expected {} counts, got {}",
                party_count,
                result.len()
            )));
        }
        let counts = (0..party_count)
            .map(|i| {
                let index = TypedUsize::from_usize(i);
                let name = match_count_output_name(index);
                let count = result
                    .get(&name)
                    .ok_or_else(|| SessionError::MalformedResult(format!("missing {}", name)))?;
                if count > party_count as u64 {
                    return Err(SessionError::MalformedResult(format!(
                        "{} is {}, exceeding party count {}",
                        name, count, party_count
                    )));
                }
                Ok(count)
            })
            .collect::<SessionResult<VecMap<ResponderPartyId, u64>>>()?;
        Ok(Self { counts })
    }

    pub fn party_count(&self) -> usize {
        self.counts.len()
    }

    /// How many parties submitted the same identifier as slot `index`
    /// (including the slot itself).
    pub fn count(&self, index: TypedUsize<ResponderPartyId>) -> SessionResult<u64> {
        Ok(*self.counts.get(index)?)
    }

    /// The count as a percentage of all parties, as displayed to users.
    pub fn rate_percent(&self, index: TypedUsize<ResponderPartyId>) -> SessionResult<u64> {
        Ok(*self.counts.get(index)? * 100 / self.counts.len() as u64)
    }

    pub fn iter(
        &self,
    ) -> crate::collections::VecMapIter<ResponderPartyId, std::slice::Iter<u64>> {
        self.counts.iter()
    }
}
