use tracing::{info, warn};

use crate::{
    collections::{TypedUsize, VecMap},
    compute::{ComputeClient, ComputeError, NamedValue, RoleBindings, ShareGrants, ShareId},
    crypto_tools::{commitment::IdentifierCommitment, credential::CredentialContext},
    registry::RegistryClient,
    sdk::api::{SessionError, SessionId, SessionResult},
};

use super::{
    api::{
        responder_role, response_secret_name, MatchReport, PartyBinding, Phase, ResponderPartyId,
        PROGRAM_NAME,
    },
    directory::{KeyValueStore, SessionDirectory},
    link::SessionLink,
};

/// Lifecycle of one party's view of an investigation. "Uninitialized" (no
/// session identity at all) is the absence of an [`InvestigationSession`]
/// value; "ready to compute" is a predicate over discovered bindings, not
/// a stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Session identity known; no credentials attached yet.
    Created,
    /// Credentials in hand; this party's binding is not yet in the registry.
    AwaitingOwnRegistration,
    /// This party's binding is visible in the registry.
    Registered {
        party_index: TypedUsize<ResponderPartyId>,
    },
    /// A compute submission returned a result. Terminal for that
    /// computation; recompute against a fresh binding list is allowed.
    Computed,
}

/// One investigation, as seen by one party. Holds only identity and local
/// state; the registry and compute network are passed into each operation,
/// so that a wallet disconnect invalidates them in exactly one place.
///
/// Mutating operations take `&mut self`, which gives single-flight per
/// session instance: a second registration cannot start before the first
/// completes. No cross-device locking exists or is needed, since each
/// party only ever writes its own binding.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestigationSession {
    session_id: SessionId,
    label: Option<String>,
    originated_locally: bool,
    state: SessionState,
}

impl InvestigationSession {
    /// Store a new investigation program and adopt its handle as the
    /// session identity. Repeated calls produce independent sessions with
    /// independent identities; there is no dedup.
    pub fn originate<C: ComputeClient>(
        compute: &mut C,
        credential: &CredentialContext,
        label: Option<String>,
        directory: &mut SessionDirectory,
        store: &mut impl KeyValueStore,
        progress: &mut dyn FnMut(Phase),
    ) -> SessionResult<Self> {
        progress(Phase::StoringProgram);
        let session_id = compute.store_program(credential, PROGRAM_NAME)?;
        directory.record(store, &session_id)?;
        info!("originated session {}", session_id);
        Ok(Self {
            session_id,
            label,
            originated_locally: true,
            state: SessionState::AwaitingOwnRegistration,
        })
    }

    /// Adopt a session shared by someone else's link.
    pub fn load(link: SessionLink, directory: &SessionDirectory) -> Self {
        let originated_locally = directory.originated_here(&link.session_id);
        Self {
            session_id: link.session_id,
            label: link.label,
            originated_locally,
            state: SessionState::Created,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
    /// True only on the device that created the session (advisory, from
    /// the session directory).
    pub fn originated_locally(&self) -> bool {
        self.originated_locally
    }
    pub fn state(&self) -> SessionState {
        self.state
    }
    pub fn link(&self) -> SessionLink {
        SessionLink::new(self.session_id.clone(), self.label.clone())
    }

    /// The wallet produced credentials; registration may proceed.
    pub fn credentials_ready(&mut self) {
        if self.state == SessionState::Created {
            self.state = SessionState::AwaitingOwnRegistration;
        }
    }

    /// The wallet disconnected. Everything derived from credentials is
    /// stale, so dependent state resets.
    pub fn credentials_lost(&mut self) {
        self.state = SessionState::Created;
    }

    /// Read the registry's current party list. The returned order is the
    /// role-assignment order: slot i holds role `Responder{i}`.
    ///
    /// The count read and the per-index reads are not atomic; a
    /// concurrent append can make this a strict subset of the true final
    /// list, never a superset and never reordered, since registry appends
    /// are monotonic and never retracted.
    pub fn discover_parties<R: RegistryClient>(
        &self,
        registry: &R,
    ) -> SessionResult<VecMap<ResponderPartyId, PartyBinding>> {
        let count = registry.party_count(&self.session_id)?;
        (0..count)
            .map(|i| {
                let raw = registry.binding_at(&self.session_id, i)?;
                PartyBinding::from_handle(TypedUsize::from_usize(i), &raw)
            })
            .collect()
    }

    /// Informational only: compute may be attempted with however many
    /// bindings exist, and the stored program decides whether too few
    /// parties is a failure.
    pub fn ready_to_compute(&self, bindings: &VecMap<ResponderPartyId, PartyBinding>) -> bool {
        !bindings.is_empty()
    }

    /// Store this party's commitment as a secret share, then append the
    /// resulting `"{party_id}:{share_id}"` handle to the registry, gated
    /// on transaction finality. Returns the slot index the registry
    /// assigned atomically at append.
    ///
    /// Any failure leaves the session in `AwaitingOwnRegistration` and it
    /// is safe to retry from the top; a retry stores a fresh share rather
    /// than reusing a half-written one. A share stored before a rejected
    /// append is orphaned and never cleaned up.
    pub fn register_own<R: RegistryClient, C: ComputeClient>(
        &mut self,
        registry: &mut R,
        compute: &mut C,
        credential: &CredentialContext,
        commitment: &IdentifierCommitment,
        progress: &mut dyn FnMut(Phase),
    ) -> SessionResult<TypedUsize<ResponderPartyId>> {
        if self.state != SessionState::AwaitingOwnRegistration {
            warn!("registration out of turn: session is {:?}", self.state);
            return Err(SessionError::RegistrationOutOfTurn);
        }

        progress(Phase::StoringSecret);
        let observed = TypedUsize::from_usize(registry.party_count(&self.session_id)?);
        let values = [NamedValue {
            name: response_secret_name(observed),
            value: commitment.value().to_string(),
        }];
        let grants = ShareGrants::default().with_compute(self.session_id.owner());
        let share_id = compute.store_share(
            credential,
            &values,
            &self.session_id,
            &responder_role(observed),
            &grants,
        )?;
        let handle = format!("{}:{}", credential.party_id(), share_id);

        progress(Phase::AwaitingConfirmation);
        let receipt = registry.append_binding(&self.session_id, &handle)?;
        progress(Phase::SendingTransaction);
        let finalized = registry.wait_finality(&receipt)?;

        let party_index = TypedUsize::from_usize(finalized.party_index);
        if party_index != observed {
            // another party appended between our count read and our
            // append; the stored share is still named after `observed`
            warn!(
                "assigned slot {} drifted from observed count {}",
                party_index, observed
            );
        }
        info!(
            "registered as {} in session {}",
            responder_role(party_index),
            self.session_id
        );
        self.state = SessionState::Registered { party_index };
        Ok(party_index)
    }

    /// Invoke the joint computation over the given binding list: roles
    /// `Responder0..Responder{N-1}` with the caller as the designated
    /// output party on the last slot, all N stored share ids referenced,
    /// and the caller's fresh commitment supplied inline as the last
    /// slot's response.
    ///
    /// Every input role is bound to the caller's compute party id; access
    /// control is enforced by the compute grants on the referenced shares,
    /// not by the role binding. Failures propagate untouched, with no
    /// retry; on a cardinality failure the caller should re-derive
    /// `bindings` from a fresh registry read.
    pub fn compute_matches<C: ComputeClient>(
        &mut self,
        compute: &mut C,
        credential: &CredentialContext,
        bindings: &VecMap<ResponderPartyId, PartyBinding>,
        commitment: &IdentifierCommitment,
        progress: &mut dyn FnMut(Phase),
    ) -> SessionResult<MatchReport> {
        let party_count = bindings.len();
        if party_count == 0 {
            warn!("compute attempted with no registered parties");
            return Err(ComputeError::Cardinality {
                expected: 1,
                actual: 0,
            }
            .into());
        }
        let last = TypedUsize::<ResponderPartyId>::from_usize(party_count - 1);

        let role_bindings = RoleBindings {
            inputs: bindings
                .iter()
                .map(|(index, _)| (responder_role(index), credential.party_id().clone()))
                .collect(),
            output: (responder_role(last), credential.party_id().clone()),
        };
        let share_ids: Vec<ShareId> = bindings
            .iter()
            .map(|(_, binding)| binding.share_id().clone())
            .collect();
        let secrets = [NamedValue {
            name: response_secret_name(last),
            value: commitment.value().to_string(),
        }];

        progress(Phase::SubmittingComputation);
        let handle = compute.submit_compute(
            credential,
            &self.session_id,
            &role_bindings,
            &share_ids,
            &secrets,
        )?;
        progress(Phase::FetchingResult);
        let result = compute.fetch_result(&handle)?;

        let report = MatchReport::from_result(&result, party_count)?;
        info!(
            "computed {} match counts for session {}",
            report.party_count(),
            self.session_id
        );
        self.state = SessionState::Computed;
        Ok(report)
    }
}
