//! Read projections handed to callers.
//!
//! # Responsibility
//! - Shape stored people and media into nested read views.
//! - Break the person -> media -> person cycle.
//!
//! # Invariants
//! - `PersonRead` nests `MediaRead`, which nests only `PersonReadSimple`.
//!   `PersonReadSimple` carries no collections, so nesting stops after two
//!   levels no matter how many people are tagged.
//! - Projections never write to the store.

use crate::model::media::{Media, MediaId, MediaKind};
use crate::model::person::{Person, PersonId};
use crate::repo::media_repo::MediaRepository;
use crate::repo::RepoResult;
use chrono::NaiveDate;
use serde::Serialize;

/// Flat person view: id and base fields, no collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonReadSimple {
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

/// Media view with the people tagged in it, each flat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaRead {
    pub id: MediaId,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    pub title: Option<String>,
    pub person_id: Option<PersonId>,
    pub tagged_people: Vec<PersonReadSimple>,
}

/// Full person view with owned media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonRead {
    #[serde(flatten)]
    pub person: PersonReadSimple,
    pub media_items: Vec<MediaRead>,
}

/// Projects one person without touching storage.
pub fn project_person_flat(person: &Person) -> PersonReadSimple {
    PersonReadSimple {
        id: person.id,
        first_name: person.first_name.clone(),
        last_name: person.last_name.clone(),
        gender: person.gender.clone(),
        birth_date: person.birth_date,
        death_date: person.death_date,
        bio: person.bio.clone(),
        photo_url: person.photo_url.clone(),
        father_id: person.father_id,
        mother_id: person.mother_id,
    }
}

/// Builds nested projections by looking related records up through a media
/// repository.
pub struct Projector<'r, M: MediaRepository> {
    media: &'r M,
}

impl<'r, M: MediaRepository> Projector<'r, M> {
    pub fn new(media: &'r M) -> Self {
        Self { media }
    }

    /// Person with every media item it owns.
    pub fn person_read(&self, person: &Person) -> RepoResult<PersonRead> {
        let media_items = self
            .media
            .list_media_owned_by(person.id)?
            .iter()
            .map(|media| self.media_read(media))
            .collect::<RepoResult<Vec<_>>>()?;

        Ok(PersonRead {
            person: project_person_flat(person),
            media_items,
        })
    }

    /// Media item with its tagged people projected flat.
    pub fn media_read(&self, media: &Media) -> RepoResult<MediaRead> {
        let tagged_people = self
            .media
            .list_tagged_people(media.id)?
            .iter()
            .map(project_person_flat)
            .collect();

        Ok(MediaRead {
            id: media.id,
            kind: media.kind,
            url: media.url.clone(),
            title: media.title.clone(),
            person_id: media.person_id,
            tagged_people,
        })
    }

    /// Media in which `person` is tagged.
    pub fn tagged_in(&self, person: &Person) -> RepoResult<Vec<MediaRead>> {
        self.media
            .list_media_tagged_with(person.id)?
            .iter()
            .map(|media| self.media_read(media))
            .collect()
    }
}
