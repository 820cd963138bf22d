//! Media records and the person tag link.
//!
//! # Invariants
//! - `kind` is derived from the upload content type: anything that does not
//!   start with `video` is an image.
//! - A `(media_id, person_id)` pair identifies at most one tag.

use crate::model::person::PersonId;
use crate::model::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned media identifier.
pub type MediaId = i64;

/// Media category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classifies a declared content type such as `video/mp4`.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("video") {
            Self::Video
        } else {
            Self::Image
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

/// Create payload for one media item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMedia {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Owner attribution.
    #[serde(default)]
    pub person_id: Option<PersonId>,
}

impl NewMedia {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("url", &self.url)
    }
}

/// Stored media record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub id: MediaId,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    pub title: Option<String>,
    pub person_id: Option<PersonId>,
}

/// One person tagged in one media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaTag {
    pub media_id: MediaId,
    pub person_id: PersonId,
}
