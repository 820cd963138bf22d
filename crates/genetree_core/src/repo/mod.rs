//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access for people, media and tags.
//! - Keep SQL inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate payloads before SQL mutations.
//! - Missing rows surface as `RepoError::NotFound` on update/tag paths and as
//!   `Ok(None)` on plain lookups.

use crate::db::DbError;
use crate::model::media::MediaId;
use crate::model::person::PersonId;
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod media_repo;
pub mod person_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Identifies the record a `NotFound` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Person(PersonId),
    Media(MediaId),
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Person(id) => write!(f, "person {id}"),
            Self::Media(id) => write!(f, "media {id}"),
        }
    }
}

#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(EntityRef),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
