//! Repository layer: record store access for employees and departments.
//!
//! # Responsibility
//! - Translate CRUD intents into SQL against the record store.
//! - Reconstruct entities from rows; raw rows never leave this module.
//!
//! # Invariants
//! - Repositories hold no cached state; callers reload after mutations.
//! - Every failure is reported as a `RepoError`, never as an empty result.

pub mod department_repo;
pub mod employee_repo;
pub mod error;
