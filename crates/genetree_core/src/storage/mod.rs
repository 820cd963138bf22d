//! Blob storage for uploaded media bytes.
//!
//! # Responsibility
//! - Persist upload bytes outside the relational store.
//! - Produce the public URL recorded on the media row.
//!
//! # Invariants
//! - `store` returns only after the destination is fully written and closed.
//! - A stored blob is never removed when later record creation fails.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Read;

mod fs_store;

pub use fs_store::FsBlobStore;

pub type BlobResult<T> = Result<T, BlobError>;

#[derive(Debug)]
pub enum BlobError {
    /// Supplied file name has no usable final component.
    InvalidFileName(String),
    Io(std::io::Error),
}

impl Display for BlobError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFileName(name) => write!(f, "invalid upload file name `{name}`"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BlobError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidFileName(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for BlobError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Where a blob ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Sanitized name the bytes were stored under.
    pub file_name: String,
    /// Public reference recorded on the media row.
    pub url: String,
}

/// Destination for upload bytes.
pub trait BlobStore {
    fn store(&self, file_name: &str, content: &mut dyn Read) -> BlobResult<StoredBlob>;
}
