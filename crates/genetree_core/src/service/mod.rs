//! Core use-case services.
//!
//! # Responsibility
//! - Turn repository calls into the operations callers use.
//! - Return read projections rather than storage records.
//! - Map repository failures to typed, caller-facing errors.

use crate::model::media::MediaId;
use crate::model::person::PersonId;
use crate::model::validation::ValidationError;
use crate::repo::{EntityRef, RepoError};
use crate::storage::BlobError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod media_service;
pub mod person_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    PersonNotFound(PersonId),
    MediaNotFound(MediaId),
    Validation(ValidationError),
    Repo(RepoError),
    Blob(BlobError),
    /// Write succeeded but the read-back found nothing.
    InconsistentState(&'static str),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PersonNotFound(_) | Self::MediaNotFound(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersonNotFound(id) => write!(f, "person not found: {id}"),
            Self::MediaNotFound(id) => write!(f, "media not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Blob(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent store state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Blob(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(EntityRef::Person(id)) => Self::PersonNotFound(id),
            RepoError::NotFound(EntityRef::Media(id)) => Self::MediaNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<BlobError> for ServiceError {
    fn from(value: BlobError) -> Self {
        match value {
            BlobError::InvalidFileName(_) => {
                Self::Validation(ValidationError::BlankField("file_name"))
            }
            other => Self::Blob(other),
        }
    }
}
