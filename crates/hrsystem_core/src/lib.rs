//! Core of the HR record manager.
//!
//! Employees and departments live in a SQLite record store. Repositories map
//! rows to entities, roster caches hold the last full read for display, and
//! the increment evaluator decides who is due for a salary review.

pub mod config;
pub mod db;
pub mod increment;
pub mod logging;
pub mod model;
pub mod repo;
pub mod roster;
pub mod service;
pub mod store;

pub use config::{ConfigError, HrConfig};
pub use increment::{employees_due, months_between, DueEmployee};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::department::{Department, DepartmentId};
pub use model::employee::{Employee, EmployeeDraft, EmployeeFields, EmployeeId};
pub use model::policy::{IncrementPolicy, IncrementRule};
pub use model::validation::ValidationError;
pub use repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::error::{RepoError, RepoResult};
pub use roster::{ListenerId, RosterCache, RosterSnapshot};
pub use service::roster_service::RosterService;
pub use store::{FileStore, MemoryStore, RecordStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
