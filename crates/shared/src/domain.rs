use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Server-assigned contact identifier.
///
/// The remote collection is free to use numbers or strings. Both decode, are
/// written back in their original JSON form, and compare by exact value, so
/// `1` and `"1"` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContactId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactId::Number(n) => write!(f, "{n}"),
            ContactId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ContactId {
    fn from(value: i64) -> Self {
        ContactId::Number(value)
    }
}

impl From<&str> for ContactId {
    fn from(value: &str) -> Self {
        ContactId::Text(value.to_string())
    }
}

impl From<String> for ContactId {
    fn from(value: String) -> Self {
        ContactId::Text(value)
    }
}

/// Digits parse as a numeric id, anything else as a text id.
impl FromStr for ContactId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(ContactId::Number)
            .unwrap_or_else(|_| ContactId::Text(s.to_string())))
    }
}

/// One of the three user-editable inputs of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Phone,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Name, FormField::Email, FormField::Phone];

    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Phone => "phone",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
            FormField::Phone => "Phone",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
