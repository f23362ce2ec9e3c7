use std::collections::HashMap;

use shared::{
    domain::{ContactId, FormField},
    protocol::{Contact, ContactDraft},
};

/// Transient input buffer behind the three form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl FormState {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
        }
    }

    pub fn get_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.phone.is_empty()
    }

    pub fn to_draft(&self) -> ContactDraft {
        ContactDraft::new(self.name.clone(), self.email.clone(), self.phone.clone())
    }
}

impl From<&Contact> for FormState {
    fn from(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditContext {
    #[default]
    Creating,
    Editing {
        id: ContactId,
    },
}

impl EditContext {
    pub fn is_editing(&self) -> bool {
        matches!(self, EditContext::Editing { .. })
    }

    pub fn editing_id(&self) -> Option<&ContactId> {
        match self {
            EditContext::Creating => None,
            EditContext::Editing { id } => Some(id),
        }
    }
}

/// Monotonic sequence number captured when a request is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(pub u64);

/// The slice of state a response is allowed to touch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestTarget {
    Collection,
    Form,
    Contact(ContactId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenLedger {
    latest: HashMap<RequestTarget, RequestToken>,
}

impl TokenLedger {
    /// Records `token` for `target` unless a newer one is already present.
    pub fn record(&mut self, target: RequestTarget, token: RequestToken) {
        let entry = self.latest.entry(target).or_insert(token);
        if token > *entry {
            *entry = token;
        }
    }

    pub fn latest(&self, target: &RequestTarget) -> Option<RequestToken> {
        self.latest.get(target).copied()
    }

    /// True when nothing newer than `token` was dispatched for `target`.
    pub fn is_current(&self, target: &RequestTarget, token: RequestToken) -> bool {
        self.latest(target).map_or(true, |latest| latest <= token)
    }
}

/// Everything the view renders from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactsState {
    pub contacts: Vec<Contact>,
    pub form: FormState,
    pub edit: EditContext,
    pub tokens: TokenLedger,
}

impl ContactsState {
    pub fn contact(&self, id: &ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|contact| &contact.id == id)
    }

    pub fn submit_label(&self) -> &'static str {
        if self.edit.is_editing() {
            "Update Contact"
        } else {
            "Add Contact"
        }
    }
}
