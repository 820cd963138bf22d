//! Field-level validation errors shared by write payloads.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection of a malformed write payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace only.
    BlankField(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "field `{field}` must not be blank"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}
