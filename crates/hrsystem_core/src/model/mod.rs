//! HR domain model.
//!
//! # Responsibility
//! - Define employee/department records and increment policies.
//! - Validate raw presentation input before it reaches the record store.
//!
//! # Invariants
//! - Entity ids are assigned by the record store and never reused.
//! - Policy text is either `Yearly` or `Half-Yearly`; anything else is a
//!   validation failure, never a silent default.

pub mod department;
pub mod employee;
pub mod policy;
pub mod validation;
