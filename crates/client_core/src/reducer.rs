//! Pure state transitions for the contact manager.
//!
//! `reduce` never performs I/O. Network work is described by
//! [`crate::store::PendingRequest`] and its results come back in as the
//! `Loaded`/`Created`/`Updated`/`Deleted` actions below, each carrying the
//! token captured when the request was dispatched.

use std::collections::HashSet;

use serde::Deserialize;
use shared::{
    domain::{ContactId, FormField},
    protocol::{Contact, ContactDraft},
};

use crate::types::{ContactsState, EditContext, FormState, RequestTarget, RequestToken};

/// What to do with a create whose fields fail the length check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortFieldPolicy {
    /// Validate before sending; nothing reaches the remote service.
    #[default]
    RejectBeforeRequest,
    /// Send the request and drop the successful response.
    DiscardResponse,
}

/// What to do with local state when an update request fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateFailurePolicy {
    /// Merge the form into the list and leave edit mode as if the update succeeded.
    #[default]
    ReconcileAsSuccess,
    /// Leave list, form and edit mode untouched.
    KeepEditing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitPolicy {
    pub short_fields: ShortFieldPolicy,
    pub update_failure: UpdateFailurePolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FieldChanged {
        field: FormField,
        value: String,
    },
    EditRequested {
        contact: Contact,
        token: RequestToken,
    },
    Dispatched {
        target: RequestTarget,
        token: RequestToken,
    },
    Loaded {
        token: RequestToken,
        result: Result<Vec<Contact>, String>,
    },
    Created {
        token: RequestToken,
        draft: ContactDraft,
        result: Result<Contact, String>,
    },
    Updated {
        token: RequestToken,
        id: ContactId,
        draft: ContactDraft,
        result: Result<(), String>,
    },
    Deleted {
        token: RequestToken,
        id: ContactId,
        result: Result<(), String>,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::FieldChanged { .. } => "field_changed",
            Action::EditRequested { .. } => "edit_requested",
            Action::Dispatched { .. } => "dispatched",
            Action::Loaded { .. } => "loaded",
            Action::Created { .. } => "created",
            Action::Updated { .. } => "updated",
            Action::Deleted { .. } => "deleted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    /// A failed update was merged locally anyway.
    ReconciledAfterFailure,
    /// The request failed and state was left unchanged.
    Failed,
    /// A successful create was dropped by the length check.
    Discarded,
    /// A newer request for the same target made this response stale.
    Superseded,
}

pub fn reduce(
    mut state: ContactsState,
    action: Action,
    policy: &SubmitPolicy,
) -> (ContactsState, ActionOutcome) {
    let outcome = match action {
        Action::FieldChanged { field, value } => {
            state.form.set(field, value);
            ActionOutcome::Applied
        }
        Action::EditRequested { contact, token } => {
            state.tokens.record(RequestTarget::Form, token);
            state.edit = EditContext::Editing {
                id: contact.id.clone(),
            };
            state.form = FormState::from(&contact);
            ActionOutcome::Applied
        }
        Action::Dispatched { target, token } => {
            state.tokens.record(target, token);
            ActionOutcome::Applied
        }
        Action::Loaded { token, result } => match result {
            Err(_) => ActionOutcome::Failed,
            Ok(_) if !state.tokens.is_current(&RequestTarget::Collection, token) => {
                ActionOutcome::Superseded
            }
            Ok(contacts) => {
                state.contacts = dedupe_by_id(contacts);
                ActionOutcome::Applied
            }
        },
        Action::Created {
            token,
            draft,
            result,
        } => match result {
            Err(_) => ActionOutcome::Failed,
            Ok(_) if draft.validate().is_err() => ActionOutcome::Discarded,
            Ok(created) => {
                upsert(&mut state.contacts, created);
                if state.tokens.is_current(&RequestTarget::Form, token) {
                    state.form = FormState::default();
                }
                ActionOutcome::Applied
            }
        },
        Action::Updated {
            token,
            id,
            draft,
            result,
        } => {
            let failed = result.is_err();
            if failed && policy.update_failure == UpdateFailurePolicy::KeepEditing {
                ActionOutcome::Failed
            } else {
                let mut touched = false;
                if state.tokens.is_current(&RequestTarget::Contact(id.clone()), token) {
                    if let Some(contact) = state.contacts.iter_mut().find(|c| c.id == id) {
                        contact.merge_draft(&draft);
                    }
                    touched = true;
                }
                if state.tokens.is_current(&RequestTarget::Form, token) {
                    state.edit = EditContext::Creating;
                    state.form = FormState::default();
                    touched = true;
                }
                match (touched, failed) {
                    (false, _) => ActionOutcome::Superseded,
                    (true, true) => ActionOutcome::ReconciledAfterFailure,
                    (true, false) => ActionOutcome::Applied,
                }
            }
        }
        Action::Deleted { token, id, result } => match result {
            Err(_) => ActionOutcome::Failed,
            Ok(()) if !state.tokens.is_current(&RequestTarget::Contact(id.clone()), token) => {
                ActionOutcome::Superseded
            }
            Ok(()) => {
                state.contacts.retain(|contact| contact.id != id);
                ActionOutcome::Applied
            }
        },
    };
    (state, outcome)
}

fn dedupe_by_id(contacts: Vec<Contact>) -> Vec<Contact> {
    let mut seen = HashSet::with_capacity(contacts.len());
    contacts
        .into_iter()
        .filter(|contact| seen.insert(contact.id.clone()))
        .collect()
}

fn upsert(contacts: &mut Vec<Contact>, contact: Contact) {
    match contacts.iter_mut().find(|existing| existing.id == contact.id) {
        Some(existing) => *existing = contact,
        None => contacts.push(contact),
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
