//! Demo family inserted into an empty store.
//!
//! # Invariants
//! - Seeding is skipped when any person already exists.
//! - All demo rows are written in one transaction.
//! - On a fresh store the ids follow the demo order: Murilo 1, José Emerson 2,
//!   Eliane 3, Lino 4, Nilsa 5. Parent links are set after every row exists.

use crate::model::person::{NewPerson, PersonId};
use crate::repo::person_repo::{PersonRepository, SqlitePersonRepository};
use crate::repo::RepoResult;
use chrono::NaiveDate;
use log::info;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

/// Seeds the Beppler demo family. Returns `Ok(false)` when the store already
/// has people and nothing was written.
pub fn seed_if_empty(conn: &Connection) -> RepoResult<bool> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let repo = SqlitePersonRepository::new(&tx);
    if repo.count_people()? > 0 {
        info!("event=db_seed module=db status=skipped reason=not_empty");
        return Ok(false);
    }

    // Insertion order fixes the ids on a fresh store: Murilo is person 1.
    let murilo = repo.create_person(&NewPerson {
        gender: Some("male".to_string()),
        birth_date: NaiveDate::from_ymd_opt(2003, 11, 13),
        bio: Some("Entusiasta de tecnologia e criador deste projeto.".to_string()),
        ..NewPerson::new("Murilo", "Beppler")
    })?;
    let jose_emerson = repo.create_person(&NewPerson {
        gender: Some("male".to_string()),
        birth_date: NaiveDate::from_ymd_opt(1972, 10, 21),
        ..NewPerson::new("José Emerson", "Beppler")
    })?;
    let eliane = repo.create_person(&NewPerson {
        gender: Some("female".to_string()),
        birth_date: NaiveDate::from_ymd_opt(1972, 5, 13),
        ..NewPerson::new("Eliane", "Beppler")
    })?;
    let lino = repo.create_person(&NewPerson {
        gender: Some("male".to_string()),
        birth_date: NaiveDate::from_ymd_opt(1940, 2, 10),
        ..NewPerson::new("Lino", "Beppler")
    })?;
    let nilsa = repo.create_person(&NewPerson {
        gender: Some("female".to_string()),
        birth_date: NaiveDate::from_ymd_opt(1942, 7, 22),
        death_date: NaiveDate::from_ymd_opt(2010, 11, 5),
        ..NewPerson::new("Nilsa", "...")
    })?;

    link_parents(&tx, murilo.id, jose_emerson.id, eliane.id)?;
    link_parents(&tx, jose_emerson.id, lino.id, nilsa.id)?;

    tx.commit()?;
    info!(
        "event=db_seed module=db status=ok people=5 root_id={}",
        murilo.id
    );
    Ok(true)
}

fn link_parents(
    conn: &Connection,
    child_id: PersonId,
    father_id: PersonId,
    mother_id: PersonId,
) -> RepoResult<()> {
    conn.execute(
        "UPDATE person SET father_id = ?1, mother_id = ?2 WHERE id = ?3;",
        params![father_id, mother_id, child_id],
    )?;
    Ok(())
}
