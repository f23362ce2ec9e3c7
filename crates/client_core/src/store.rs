//! State container: owns a [`ContactsState`], hands out request tokens and
//! turns user intents into [`PendingRequest`]s.

use shared::{
    domain::{ContactId, FormField},
    error::ValidationError,
    protocol::{Contact, ContactDraft},
};
use tracing::{debug, error, info, warn};

use crate::{
    reducer::{reduce, Action, ActionOutcome, ShortFieldPolicy, SubmitPolicy},
    transport::ContactsApi,
    types::{ContactsState, EditContext, RequestTarget, RequestToken},
};

/// An HTTP call that has been dispatched against the state but not yet performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRequest {
    Load {
        token: RequestToken,
    },
    Create {
        token: RequestToken,
        draft: ContactDraft,
    },
    Update {
        token: RequestToken,
        id: ContactId,
        draft: ContactDraft,
    },
    Delete {
        token: RequestToken,
        id: ContactId,
    },
}

impl PendingRequest {
    pub fn name(&self) -> &'static str {
        match self {
            PendingRequest::Load { .. } => "load",
            PendingRequest::Create { .. } => "create",
            PendingRequest::Update { .. } => "update",
            PendingRequest::Delete { .. } => "delete",
        }
    }

    pub fn token(&self) -> RequestToken {
        match self {
            PendingRequest::Load { token }
            | PendingRequest::Create { token, .. }
            | PendingRequest::Update { token, .. }
            | PendingRequest::Delete { token, .. } => *token,
        }
    }
}

#[derive(Debug, Default)]
pub struct ContactStore {
    state: ContactsState,
    policy: SubmitPolicy,
    last_token: u64,
}

impl ContactStore {
    pub fn new(policy: SubmitPolicy) -> Self {
        Self {
            state: ContactsState::default(),
            policy,
            last_token: 0,
        }
    }

    pub fn state(&self) -> &ContactsState {
        &self.state
    }

    pub fn policy(&self) -> SubmitPolicy {
        self.policy
    }

    fn next_token(&mut self) -> RequestToken {
        self.last_token += 1;
        RequestToken(self.last_token)
    }

    fn dispatch(&mut self, action: Action) -> ActionOutcome {
        let state = std::mem::take(&mut self.state);
        let (next, outcome) = reduce(state, action, &self.policy);
        self.state = next;
        outcome
    }

    pub fn begin_load(&mut self) -> PendingRequest {
        let token = self.next_token();
        self.dispatch(Action::Dispatched {
            target: RequestTarget::Collection,
            token,
        });
        PendingRequest::Load { token }
    }

    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) {
        self.dispatch(Action::FieldChanged {
            field,
            value: value.into(),
        });
    }

    pub fn enter_edit(&mut self, contact: &Contact) {
        let token = self.next_token();
        debug!(contact_id = %contact.id, "contacts: entering edit mode");
        self.dispatch(Action::EditRequested {
            contact: contact.clone(),
            token,
        });
    }

    /// Create when idle, update when editing.
    ///
    /// Under [`ShortFieldPolicy::RejectBeforeRequest`] a create with a short
    /// field returns the validation error and leaves state untouched.
    pub fn begin_submit(&mut self) -> Result<PendingRequest, ValidationError> {
        let draft = self.state.form.to_draft();
        match self.state.edit.clone() {
            EditContext::Creating => {
                if self.policy.short_fields == ShortFieldPolicy::RejectBeforeRequest {
                    if let Err(err) = draft.validate() {
                        warn!("contacts: create rejected before request: {err}");
                        return Err(err);
                    }
                }
                let token = self.next_token();
                self.dispatch(Action::Dispatched {
                    target: RequestTarget::Form,
                    token,
                });
                Ok(PendingRequest::Create { token, draft })
            }
            EditContext::Editing { id } => {
                let token = self.next_token();
                self.dispatch(Action::Dispatched {
                    target: RequestTarget::Form,
                    token,
                });
                self.dispatch(Action::Dispatched {
                    target: RequestTarget::Contact(id.clone()),
                    token,
                });
                Ok(PendingRequest::Update { token, id, draft })
            }
        }
    }

    pub fn begin_delete(&mut self, id: ContactId) -> PendingRequest {
        let token = self.next_token();
        self.dispatch(Action::Dispatched {
            target: RequestTarget::Contact(id.clone()),
            token,
        });
        PendingRequest::Delete { token, id }
    }

    /// Reconciles a response action produced by [`execute`].
    pub fn apply(&mut self, action: Action) -> ActionOutcome {
        let name = action.name();
        let edited_id = match &action {
            Action::Updated { id, .. } => Some(id.clone()),
            _ => None,
        };
        let outcome = self.dispatch(action);
        match outcome {
            ActionOutcome::Superseded => {
                debug!(action = name, "contacts: dropped stale response");
            }
            ActionOutcome::Discarded => {
                info!("contacts: created contact dropped by length check; remote record may exist");
            }
            ActionOutcome::ReconciledAfterFailure => {
                warn!(
                    contact_id = ?edited_id,
                    "contacts: update failed remotely but was reconciled locally"
                );
            }
            ActionOutcome::Applied | ActionOutcome::Failed => {}
        }
        outcome
    }
}

/// Performs `request` and turns its result into the matching response action.
pub async fn execute(api: &dyn ContactsApi, request: PendingRequest) -> Action {
    match request {
        PendingRequest::Load { token } => {
            let result = api.list_contacts().await.map_err(|err| {
                error!("contacts: error fetching contacts: {err:#}");
                err.to_string()
            });
            Action::Loaded { token, result }
        }
        PendingRequest::Create { token, draft } => {
            let result = api.create_contact(&draft).await.map_err(|err| {
                error!("contacts: error adding contact: {err:#}");
                err.to_string()
            });
            Action::Created {
                token,
                draft,
                result,
            }
        }
        PendingRequest::Update { token, id, draft } => {
            let result = api
                .update_contact(&id, &draft)
                .await
                .map(|_| ())
                .map_err(|err| {
                    error!(contact_id = %id, "contacts: error updating contact: {err:#}");
                    err.to_string()
                });
            Action::Updated {
                token,
                id,
                draft,
                result,
            }
        }
        PendingRequest::Delete { token, id } => {
            let result = api.delete_contact(&id).await.map_err(|err| {
                error!(contact_id = %id, "contacts: error deleting contact: {err:#}");
                err.to_string()
            });
            Action::Deleted { token, id, result }
        }
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
