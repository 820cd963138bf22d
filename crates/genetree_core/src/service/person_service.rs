//! Person use-case service.
//!
//! # Invariants
//! - Every person returned to callers is a `PersonRead` (or a flat
//!   projection for list-of-relatives views).
//! - `update_person` changes only the fields named in the patch.

use crate::model::person::{NewPerson, PersonId, PersonPatch};
use crate::projection::{project_person_flat, MediaRead, PersonRead, PersonReadSimple, Projector};
use crate::repo::media_repo::{MediaRepository, SqliteMediaRepository};
use crate::repo::person_repo::{PersonListQuery, PersonRepository, SqlitePersonRepository};
use crate::service::{ServiceError, ServiceResult};
use log::info;
use rusqlite::Connection;

/// Person service facade over repository implementations.
pub struct PersonService<P: PersonRepository, M: MediaRepository> {
    people: P,
    media: M,
}

impl<'conn> PersonService<SqlitePersonRepository<'conn>, SqliteMediaRepository<'conn>> {
    /// Service backed by SQLite repositories sharing one connection.
    pub fn for_connection(conn: &'conn Connection) -> Self {
        Self::new(
            SqlitePersonRepository::new(conn),
            SqliteMediaRepository::new(conn),
        )
    }
}

impl<P: PersonRepository, M: MediaRepository> PersonService<P, M> {
    pub fn new(people: P, media: M) -> Self {
        Self { people, media }
    }

    pub fn create_person(&self, person: NewPerson) -> ServiceResult<PersonRead> {
        let id = self.people.create_person(&person)?.id;
        let created = self
            .people
            .get_person(id)?
            .ok_or(ServiceError::InconsistentState(
                "created person not found in read-back",
            ))?;
        info!(
            "event=person_create module=service status=ok person_id={}",
            created.id
        );
        Ok(Projector::new(&self.media).person_read(&created)?)
    }

    /// Lists people page by page; `search` matches first or last name.
    pub fn list_people(
        &self,
        offset: u32,
        limit: Option<u32>,
        search: Option<String>,
    ) -> ServiceResult<Vec<PersonRead>> {
        let query = PersonListQuery {
            search,
            limit,
            offset,
        };
        let projector = Projector::new(&self.media);
        let people = self.people.list_people(&query)?;
        let reads = people
            .iter()
            .map(|person| projector.person_read(person))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reads)
    }

    pub fn get_person(&self, id: PersonId) -> ServiceResult<PersonRead> {
        let person = self
            .people
            .get_person(id)?
            .ok_or(ServiceError::PersonNotFound(id))?;
        Ok(Projector::new(&self.media).person_read(&person)?)
    }

    pub fn update_person(&self, id: PersonId, patch: PersonPatch) -> ServiceResult<PersonRead> {
        let updated = self.people.update_person(id, &patch)?;
        info!(
            "event=person_update module=service status=ok person_id={} empty_patch={}",
            id,
            patch.is_empty()
        );
        Ok(Projector::new(&self.media).person_read(&updated)?)
    }

    /// Direct children of `id`, flat.
    pub fn list_children(&self, id: PersonId) -> ServiceResult<Vec<PersonReadSimple>> {
        if !self.people.person_exists(id)? {
            return Err(ServiceError::PersonNotFound(id));
        }
        let children = self.people.list_children(id)?;
        Ok(children.iter().map(project_person_flat).collect())
    }

    /// Media in which `id` is tagged.
    pub fn tagged_in_media(&self, id: PersonId) -> ServiceResult<Vec<MediaRead>> {
        let person = self
            .people
            .get_person(id)?
            .ok_or(ServiceError::PersonNotFound(id))?;
        Ok(Projector::new(&self.media).tagged_in(&person)?)
    }

    pub fn count_people(&self) -> ServiceResult<u64> {
        Ok(self.people.count_people()?)
    }
}
