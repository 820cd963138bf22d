//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `genetree_core` wiring end to end: config, logging, store,
//!   seed and person projections.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `genetree_cli [config.toml]`

use genetree_core::{
    init_logging_from_config, open_db, seed_if_empty, CoreConfig, PersonId, PersonService,
};
use log::info;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    init_logging_from_config(&config.logging)?;

    println!("genetree_core ping={}", genetree_core::ping());
    println!("genetree_core version={}", genetree_core::core_version());

    if let Some(parent) = config
        .database
        .path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
    }
    let conn = open_db(&config.database.path)?;
    if seed_if_empty(&conn)? {
        println!("seeded demo family");
    }

    let people = PersonService::for_connection(&conn);
    println!("people={}", people.count_people()?);
    for read in people.list_people(0, None, None)? {
        let person = &read.person;
        let children = people.list_children(person.id)?;
        println!(
            "#{} {} {} father={} mother={} children={} media={}",
            person.id,
            person.first_name,
            person.last_name,
            format_parent(person.father_id),
            format_parent(person.mother_id),
            children.len(),
            read.media_items.len()
        );
    }

    info!("event=cli_summary module=cli status=ok");
    Ok(())
}

fn format_parent(id: Option<PersonId>) -> String {
    id.map_or_else(|| "-".to_string(), |id| format!("#{id}"))
}
