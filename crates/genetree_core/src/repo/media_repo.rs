//! Media and tag repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist media records with optional owner attribution.
//! - Own the `media_tag` association: at most one row per pair.
//!
//! # Invariants
//! - `add_tag` checks both entities and the pair inside one immediate
//!   transaction; a second call for the same pair inserts nothing.
//! - `remove_tag` never fails because a row or entity is missing.

use crate::model::media::{Media, MediaId, MediaKind, MediaTag, NewMedia};
use crate::model::person::{Person, PersonId};
use crate::repo::person_repo::{parse_person_row, PERSON_COLUMNS};
use crate::repo::{EntityRef, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const MEDIA_SELECT_SQL: &str = "SELECT
    m.id,
    m.type,
    m.url,
    m.title,
    m.person_id
FROM media m";

/// Result of an add-tag request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome {
    Added,
    AlreadyTagged,
}

/// Repository interface for media records and person tags.
pub trait MediaRepository {
    /// Stores one media record. A present owner must exist.
    fn create_media(&self, media: &NewMedia) -> RepoResult<Media>;
    fn get_media(&self, id: MediaId) -> RepoResult<Option<Media>>;
    /// Media attributed to `person_id` as owner.
    fn list_media_owned_by(&self, person_id: PersonId) -> RepoResult<Vec<Media>>;
    /// Media in which `person_id` is tagged.
    fn list_media_tagged_with(&self, person_id: PersonId) -> RepoResult<Vec<Media>>;
    fn list_tagged_people(&self, media_id: MediaId) -> RepoResult<Vec<Person>>;
    fn add_tag(&self, tag: MediaTag) -> RepoResult<TagOutcome>;
    /// Returns whether a tag row was actually deleted.
    fn remove_tag(&self, tag: MediaTag) -> RepoResult<bool>;
}

/// SQLite-backed media repository.
pub struct SqliteMediaRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMediaRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MediaRepository for SqliteMediaRepository<'_> {
    fn create_media(&self, media: &NewMedia) -> RepoResult<Media> {
        media.validate()?;

        if let Some(owner_id) = media.person_id {
            if !exists(self.conn, "person", owner_id)? {
                return Err(RepoError::NotFound(EntityRef::Person(owner_id)));
            }
        }

        self.conn.execute(
            "INSERT INTO media (type, url, title, person_id) VALUES (?1, ?2, ?3, ?4);",
            params![
                media.kind.as_str(),
                media.url.as_str(),
                media.title.as_deref(),
                media.person_id,
            ],
        )?;

        Ok(Media {
            id: self.conn.last_insert_rowid(),
            kind: media.kind,
            url: media.url.clone(),
            title: media.title.clone(),
            person_id: media.person_id,
        })
    }

    fn get_media(&self, id: MediaId) -> RepoResult<Option<Media>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEDIA_SELECT_SQL} WHERE m.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_media_row(row)?));
        }
        Ok(None)
    }

    fn list_media_owned_by(&self, person_id: PersonId) -> RepoResult<Vec<Media>> {
        self.query_media(
            &format!("{MEDIA_SELECT_SQL} WHERE m.person_id = ?1 ORDER BY m.id ASC;"),
            person_id,
        )
    }

    fn list_media_tagged_with(&self, person_id: PersonId) -> RepoResult<Vec<Media>> {
        self.query_media(
            &format!(
                "{MEDIA_SELECT_SQL}
                 INNER JOIN media_tag mt ON mt.media_id = m.id
                 WHERE mt.person_id = ?1
                 ORDER BY m.id ASC;"
            ),
            person_id,
        )
    }

    fn list_tagged_people(&self, media_id: MediaId) -> RepoResult<Vec<Person>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PERSON_COLUMNS}
             FROM person p
             INNER JOIN media_tag mt ON mt.person_id = p.id
             WHERE mt.media_id = ?1
             ORDER BY p.id ASC;"
        ))?;
        let mut rows = stmt.query([media_id])?;
        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }
        Ok(people)
    }

    fn add_tag(&self, tag: MediaTag) -> RepoResult<TagOutcome> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !exists(&tx, "media", tag.media_id)? {
            return Err(RepoError::NotFound(EntityRef::Media(tag.media_id)));
        }
        if !exists(&tx, "person", tag.person_id)? {
            return Err(RepoError::NotFound(EntityRef::Person(tag.person_id)));
        }

        let already_tagged: i64 = tx.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM media_tag WHERE media_id = ?1 AND person_id = ?2
            );",
            params![tag.media_id, tag.person_id],
            |row| row.get(0),
        )?;
        if already_tagged == 1 {
            return Ok(TagOutcome::AlreadyTagged);
        }

        tx.execute(
            "INSERT INTO media_tag (media_id, person_id) VALUES (?1, ?2);",
            params![tag.media_id, tag.person_id],
        )?;
        tx.commit()?;
        Ok(TagOutcome::Added)
    }

    fn remove_tag(&self, tag: MediaTag) -> RepoResult<bool> {
        let removed = self.conn.execute(
            "DELETE FROM media_tag WHERE media_id = ?1 AND person_id = ?2;",
            params![tag.media_id, tag.person_id],
        )?;
        Ok(removed > 0)
    }
}

impl SqliteMediaRepository<'_> {
    fn query_media(&self, sql: &str, id: i64) -> RepoResult<Vec<Media>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([id])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_media_row(row)?);
        }
        Ok(items)
    }
}

fn exists(conn: &Connection, table: &'static str, id: i64) -> RepoResult<bool> {
    let found: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(found == 1)
}

fn parse_media_row(row: &Row<'_>) -> RepoResult<Media> {
    let kind_text: String = row.get(1)?;
    let kind = MediaKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid media type `{kind_text}` in media.type"))
    })?;

    Ok(Media {
        id: row.get(0)?,
        kind,
        url: row.get(2)?,
        title: row.get(3)?,
        person_id: row.get(4)?,
    })
}
