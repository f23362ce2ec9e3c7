use thiserror::Error;

use crate::domain::FormField;

/// Fields at or below this many characters are treated as empty criteria.
pub const MIN_FIELD_CHARS_EXCLUSIVE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be longer than {min} characters (got {len})", min = MIN_FIELD_CHARS_EXCLUSIVE)]
    FieldTooShort { field: FormField, len: usize },
}

impl ValidationError {
    pub fn field(&self) -> FormField {
        match self {
            ValidationError::FieldTooShort { field, .. } => *field,
        }
    }
}
