//! Media upload and tagging use-case service.
//!
//! # Responsibility
//! - Store upload bytes and record the media row with owner attribution.
//! - Add and remove person tags.
//!
//! # Invariants
//! - The owner is checked before any bytes are written.
//! - Bytes are fully stored before the media row is created. A failed
//!   insert leaves the stored file in place.
//! - Tagging twice is safe. Untagging never reports a missing entity.

use crate::model::media::{MediaId, MediaKind, MediaTag, NewMedia};
use crate::model::person::PersonId;
use crate::projection::{MediaRead, Projector};
use crate::repo::media_repo::{MediaRepository, SqliteMediaRepository, TagOutcome};
use crate::repo::person_repo::{PersonRepository, SqlitePersonRepository};
use crate::service::{ServiceError, ServiceResult};
use crate::storage::BlobStore;
use log::{info, warn};
use rusqlite::Connection;
use std::io::Read;

/// Upload metadata supplied alongside the byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Client file name; only its final path component is kept.
    pub file_name: String,
    /// Declared content type, e.g. `video/mp4`.
    pub content_type: String,
    pub owner_id: PersonId,
}

/// What a successful upload returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub url: String,
    pub media_id: MediaId,
}

/// Acknowledgment for tag operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagAck {
    Added,
    AlreadyTagged,
    Removed,
}

impl TagAck {
    pub fn message(self) -> &'static str {
        match self {
            Self::Added => "Tag added successfully",
            Self::AlreadyTagged => "Person already tagged",
            Self::Removed => "Tag removed",
        }
    }
}

/// Media service facade over repositories and a blob store.
pub struct MediaService<P: PersonRepository, M: MediaRepository, B: BlobStore> {
    people: P,
    media: M,
    blobs: B,
}

impl<'conn, B: BlobStore>
    MediaService<SqlitePersonRepository<'conn>, SqliteMediaRepository<'conn>, B>
{
    /// Service backed by SQLite repositories sharing one connection.
    pub fn for_connection(conn: &'conn Connection, blobs: B) -> Self {
        Self::new(
            SqlitePersonRepository::new(conn),
            SqliteMediaRepository::new(conn),
            blobs,
        )
    }
}

impl<P: PersonRepository, M: MediaRepository, B: BlobStore> MediaService<P, M, B> {
    pub fn new(people: P, media: M, blobs: B) -> Self {
        Self {
            people,
            media,
            blobs,
        }
    }

    /// Stores the bytes, then records a media row owned by `owner_id`.
    pub fn upload_media(
        &self,
        request: &UploadRequest,
        content: &mut dyn Read,
    ) -> ServiceResult<UploadReceipt> {
        if !self.people.person_exists(request.owner_id)? {
            return Err(ServiceError::PersonNotFound(request.owner_id));
        }

        let kind = MediaKind::from_content_type(&request.content_type);
        let stored = self.blobs.store(&request.file_name, content)?;

        let media = self
            .media
            .create_media(&NewMedia {
                kind,
                url: stored.url.clone(),
                title: Some(stored.file_name.clone()),
                person_id: Some(request.owner_id),
            })
            .map_err(|err| {
                warn!(
                    "event=media_upload module=service status=error owner_id={} error_code=record_failed orphaned_blob=true",
                    request.owner_id
                );
                err
            })?;

        info!(
            "event=media_upload module=service status=ok media_id={} owner_id={} kind={}",
            media.id,
            request.owner_id,
            kind.as_str()
        );
        Ok(UploadReceipt {
            url: media.url,
            media_id: media.id,
        })
    }

    pub fn get_media(&self, id: MediaId) -> ServiceResult<MediaRead> {
        let media = self
            .media
            .get_media(id)?
            .ok_or(ServiceError::MediaNotFound(id))?;
        Ok(Projector::new(&self.media).media_read(&media)?)
    }

    /// Tags `person_id` in `media_id`. Fails when either is missing.
    pub fn tag_person(&self, media_id: MediaId, person_id: PersonId) -> ServiceResult<TagAck> {
        let outcome = self.media.add_tag(MediaTag {
            media_id,
            person_id,
        })?;
        info!(
            "event=media_tag module=service status=ok media_id={} person_id={} outcome={:?}",
            media_id, person_id, outcome
        );
        Ok(match outcome {
            TagOutcome::Added => TagAck::Added,
            TagOutcome::AlreadyTagged => TagAck::AlreadyTagged,
        })
    }

    /// Removes a tag. Always acknowledges `Removed`, also when the tag or
    /// either entity does not exist.
    pub fn untag_person(&self, media_id: MediaId, person_id: PersonId) -> ServiceResult<TagAck> {
        let removed = self.media.remove_tag(MediaTag {
            media_id,
            person_id,
        })?;
        info!(
            "event=media_untag module=service status=ok media_id={} person_id={} removed={}",
            media_id, person_id, removed
        );
        Ok(TagAck::Removed)
    }
}
