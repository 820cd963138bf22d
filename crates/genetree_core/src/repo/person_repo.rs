//! Person repository contract and SQLite implementation.
//!
//! # Invariants
//! - List order is `id ASC`, so offset pagination is stable.
//! - Name search is a case-sensitive substring match on `first_name` or
//!   `last_name`. An empty search term filters nothing.
//! - Updates rewrite the row from a patched in-memory copy inside one
//!   transaction, so absent patch fields keep their stored values.

use crate::model::person::{NewPerson, Person, PersonId, PersonPatch};
use crate::repo::{EntityRef, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

/// Page size used when a list query does not name one.
pub const PEOPLE_DEFAULT_LIMIT: u32 = 100;

pub(crate) const PERSON_COLUMNS: &str = "
    p.id,
    p.first_name,
    p.last_name,
    p.gender,
    p.birth_date,
    p.death_date,
    p.bio,
    p.photo_url,
    p.father_id,
    p.mother_id";

/// Query options for listing people.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonListQuery {
    /// Substring matched against first or last name.
    pub search: Option<String>,
    /// Defaults to [`PEOPLE_DEFAULT_LIMIT`].
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for person records.
pub trait PersonRepository {
    fn create_person(&self, person: &NewPerson) -> RepoResult<Person>;
    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>>;
    fn list_people(&self, query: &PersonListQuery) -> RepoResult<Vec<Person>>;
    /// Applies only the fields present in `patch`.
    fn update_person(&self, id: PersonId, patch: &PersonPatch) -> RepoResult<Person>;
    /// Direct children: people naming `parent_id` as father or mother.
    fn list_children(&self, parent_id: PersonId) -> RepoResult<Vec<Person>>;
    fn count_people(&self) -> RepoResult<u64>;

    fn person_exists(&self, id: PersonId) -> RepoResult<bool> {
        Ok(self.get_person(id)?.is_some())
    }
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn create_person(&self, person: &NewPerson) -> RepoResult<Person> {
        person.validate()?;

        let gender = person.resolved_gender().to_string();
        self.conn.execute(
            "INSERT INTO person (
                first_name,
                last_name,
                gender,
                birth_date,
                death_date,
                bio,
                photo_url,
                father_id,
                mother_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                person.first_name.as_str(),
                person.last_name.as_str(),
                gender.as_str(),
                person.birth_date,
                person.death_date,
                person.bio.as_deref(),
                person.photo_url.as_deref(),
                person.father_id,
                person.mother_id,
            ],
        )?;

        Ok(Person {
            id: self.conn.last_insert_rowid(),
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            gender,
            birth_date: person.birth_date,
            death_date: person.death_date,
            bio: person.bio.clone(),
            photo_url: person.photo_url.clone(),
            father_id: person.father_id,
            mother_id: person.mother_id,
        })
    }

    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        load_person(self.conn, id)
    }

    fn list_people(&self, query: &PersonListQuery) -> RepoResult<Vec<Person>> {
        let mut sql = format!("SELECT {PERSON_COLUMNS} FROM person p");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(term) = query.search.as_deref().filter(|term| !term.is_empty()) {
            // instr() is case-sensitive, unlike LIKE.
            sql.push_str(" WHERE instr(p.first_name, ?) > 0 OR instr(p.last_name, ?) > 0");
            bind_values.push(Value::Text(term.to_string()));
            bind_values.push(Value::Text(term.to_string()));
        }

        sql.push_str(" ORDER BY p.id ASC LIMIT ? OFFSET ?");
        bind_values.push(Value::Integer(i64::from(
            query.limit.unwrap_or(PEOPLE_DEFAULT_LIMIT),
        )));
        bind_values.push(Value::Integer(i64::from(query.offset)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }
        Ok(people)
    }

    fn update_person(&self, id: PersonId, patch: &PersonPatch) -> RepoResult<Person> {
        patch.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut person =
            load_person(&tx, id)?.ok_or(RepoError::NotFound(EntityRef::Person(id)))?;

        if !patch.is_empty() {
            patch.apply_to(&mut person);
            tx.execute(
                "UPDATE person
                 SET
                    first_name = ?2,
                    last_name = ?3,
                    gender = ?4,
                    birth_date = ?5,
                    death_date = ?6,
                    bio = ?7,
                    photo_url = ?8,
                    father_id = ?9,
                    mother_id = ?10
                 WHERE id = ?1;",
                params![
                    person.id,
                    person.first_name.as_str(),
                    person.last_name.as_str(),
                    person.gender.as_str(),
                    person.birth_date,
                    person.death_date,
                    person.bio.as_deref(),
                    person.photo_url.as_deref(),
                    person.father_id,
                    person.mother_id,
                ],
            )?;
        }

        tx.commit()?;
        Ok(person)
    }

    fn list_children(&self, parent_id: PersonId) -> RepoResult<Vec<Person>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PERSON_COLUMNS}
             FROM person p
             WHERE p.father_id = ?1 OR p.mother_id = ?1
             ORDER BY p.id ASC;"
        ))?;
        let mut rows = stmt.query([parent_id])?;
        let mut children = Vec::new();
        while let Some(row) = rows.next()? {
            children.push(parse_person_row(row)?);
        }
        Ok(children)
    }

    fn count_people(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM person;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative person count `{count}`")))
    }
}

fn load_person(conn: &Connection, id: PersonId) -> RepoResult<Option<Person>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PERSON_COLUMNS} FROM person p WHERE p.id = ?1;"
    ))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_person_row(row)?));
    }
    Ok(None)
}

/// Decodes a row selected with [`PERSON_COLUMNS`] leading the select list.
pub(crate) fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    Ok(Person {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        gender: row.get(3)?,
        birth_date: row.get(4)?,
        death_date: row.get(5)?,
        bio: row.get(6)?,
        photo_url: row.get(7)?,
        father_id: row.get(8)?,
        mother_id: row.get(9)?,
    })
}
