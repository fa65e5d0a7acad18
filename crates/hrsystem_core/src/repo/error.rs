//! Repository error taxonomy shared by employee and department stores.

use crate::db::DbError;
use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure of a repository operation. Every variant reaches the caller; none
/// is converted into an empty or default value.
#[derive(Debug)]
pub enum RepoError {
    /// The record store could not be opened or is not migrated.
    StoreUnavailable(DbError),
    /// Statement execution or constraint violation.
    QueryFailed(DbError),
    /// Caller-supplied (or persisted) fields are missing or malformed.
    ValidationFailed(ValidationError),
    /// Department delete blocked because employees still reference it.
    DepartmentInUse { name: String, employee_count: u64 },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreUnavailable(err) => write!(f, "store unavailable: {err}"),
            Self::QueryFailed(err) => write!(f, "query failed: {err}"),
            Self::ValidationFailed(err) => write!(f, "validation failed: {err}"),
            Self::DepartmentInUse {
                name,
                employee_count,
            } => write!(
                f,
                "department `{name}` is assigned to {employee_count} employee(s) and cannot be deleted"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreUnavailable(err) => Some(err),
            Self::QueryFailed(err) => Some(err),
            Self::ValidationFailed(err) => Some(err),
            Self::DepartmentInUse { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        if value.is_unavailable() {
            Self::StoreUnavailable(value)
        } else {
            Self::QueryFailed(value)
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::QueryFailed(DbError::Sqlite(value))
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::ValidationFailed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::RepoError;
    use crate::db::DbError;

    #[test]
    fn db_errors_split_into_unavailable_and_query_failures() {
        let schema = DbError::UninitializedSchema {
            expected_version: 2,
            actual_version: 0,
        };
        assert!(matches!(
            RepoError::from(schema),
            RepoError::StoreUnavailable(_)
        ));

        let statement = DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(
            RepoError::from(statement),
            RepoError::QueryFailed(_)
        ));
    }
}
