//! Core domain logic for the Gene Tree family store.
//! This crate is the single source of truth for lineage and tagging
//! invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod projection;
pub mod repo;
pub mod service;
pub mod storage;

pub use config::{ConfigError, CoreConfig, DatabaseConfig, LoggingConfig, UploadConfig};
pub use db::{open_db, open_db_in_memory, seed_if_empty, DbError, DbResult};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::media::{Media, MediaId, MediaKind, MediaTag, NewMedia};
pub use model::person::{NewPerson, Person, PersonId, PersonPatch, DEFAULT_GENDER};
pub use model::validation::ValidationError;
pub use projection::{project_person_flat, MediaRead, PersonRead, PersonReadSimple, Projector};
pub use repo::media_repo::{MediaRepository, SqliteMediaRepository, TagOutcome};
pub use repo::person_repo::{
    PersonListQuery, PersonRepository, SqlitePersonRepository, PEOPLE_DEFAULT_LIMIT,
};
pub use repo::{EntityRef, RepoError, RepoResult};
pub use service::media_service::{MediaService, TagAck, UploadReceipt, UploadRequest};
pub use service::person_service::PersonService;
pub use service::{ServiceError, ServiceResult};
pub use storage::{BlobError, BlobResult, BlobStore, FsBlobStore, StoredBlob};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
