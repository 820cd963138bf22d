//! Domain model for the family store.
//!
//! # Responsibility
//! - Define the stored shapes of people, media and tag links.
//! - Define write payloads (create and partial update) and their validation.
//!
//! # Invariants
//! - Ids are assigned by the store and never change afterwards.
//! - Parent links are ids, never embedded records.

pub mod media;
pub mod person;
pub mod validation;
