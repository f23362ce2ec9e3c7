use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    domain::{ContactId, FormField},
    error::{ValidationError, MIN_FIELD_CHARS_EXCLUSIVE},
};

/// A contact record as returned by the remote collection.
///
/// The placeholder service attaches more fields than the three the form
/// edits (`username`, `address`, `company`, ...). They are kept in `extra`
/// so an update merge only touches name/email/phone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Contact {
    pub fn new(
        id: ContactId,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            extra: Map::new(),
        }
    }

    /// Overwrites the editable fields, leaving `id` and `extra` untouched.
    pub fn merge_draft(&mut self, draft: &ContactDraft) {
        self.name = draft.name.clone();
        self.email = draft.email.clone();
        self.phone = draft.phone.clone();
    }

    pub fn to_draft(&self) -> ContactDraft {
        ContactDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Request body for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ContactDraft {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
        }
    }

    /// Length check applied to new contacts. Lengths count characters, not bytes.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for field in FormField::ALL {
            let len = self.field(field).chars().count();
            if len <= MIN_FIELD_CHARS_EXCLUSIVE {
                return Err(ValidationError::FieldTooShort { field, len });
            }
        }
        Ok(())
    }
}
