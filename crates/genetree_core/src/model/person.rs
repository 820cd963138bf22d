//! Person records, create payloads and partial updates.
//!
//! # Invariants
//! - `first_name`, `last_name` and `gender` are never blank, on create and
//!   on update alike.
//! - `gender` falls back to [`DEFAULT_GENDER`] when a create payload omits it.
//! - `father_id` / `mother_id` are stored as given. Neither existence nor
//!   ancestry cycles are checked.

use crate::model::validation::{require_text, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Store-assigned person identifier.
pub type PersonId = i64;

/// Gender stored when a create payload leaves it out.
pub const DEFAULT_GENDER: &str = "other";

/// Create payload for one person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    /// `None` stores [`DEFAULT_GENDER`].
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub death_date: Option<NaiveDate>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub father_id: Option<PersonId>,
    #[serde(default)]
    pub mother_id: Option<PersonId>,
}

impl NewPerson {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    /// Gender that will be persisted for this payload.
    pub fn resolved_gender(&self) -> &str {
        self.gender.as_deref().unwrap_or(DEFAULT_GENDER)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("first_name", &self.first_name)?;
        require_text("last_name", &self.last_name)?;
        if let Some(gender) = self.gender.as_deref() {
            require_text("gender", gender)?;
        }
        Ok(())
    }
}

/// Stored person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub father_id: Option<PersonId>,
    pub mother_id: Option<PersonId>,
}

/// Partial update for one person.
///
/// Outer `None` means "leave unchanged". For nullable fields, `Some(None)`
/// clears the stored value, so an explicit JSON `null` is distinct from an
/// absent key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub death_date: Option<Option<NaiveDate>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub bio: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub photo_url: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub father_id: Option<Option<PersonId>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub mother_id: Option<Option<PersonId>>,
}

impl PersonPatch {
    /// Returns whether the patch names no field at all.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(first_name) = self.first_name.as_deref() {
            require_text("first_name", first_name)?;
        }
        if let Some(last_name) = self.last_name.as_deref() {
            require_text("last_name", last_name)?;
        }
        if let Some(gender) = self.gender.as_deref() {
            require_text("gender", gender)?;
        }
        Ok(())
    }

    /// Writes every present field into `person`. Absent fields are untouched.
    pub fn apply_to(&self, person: &mut Person) {
        if let Some(value) = &self.first_name {
            person.first_name = value.clone();
        }
        if let Some(value) = &self.last_name {
            person.last_name = value.clone();
        }
        if let Some(value) = &self.gender {
            person.gender = value.clone();
        }
        if let Some(value) = self.birth_date {
            person.birth_date = value;
        }
        if let Some(value) = self.death_date {
            person.death_date = value;
        }
        if let Some(value) = &self.bio {
            person.bio = value.clone();
        }
        if let Some(value) = &self.photo_url {
            person.photo_url = value.clone();
        }
        if let Some(value) = self.father_id {
            person.father_id = value;
        }
        if let Some(value) = self.mother_id {
            person.mother_id = value;
        }
    }
}

// A key that is present (even as `null`) deserializes to `Some(..)`; a
// missing key falls back to `#[serde(default)]`, i.e. `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
