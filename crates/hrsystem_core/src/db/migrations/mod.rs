//! Schema versioning for the HR record store.
//!
//! # Responsibility
//! - Bring a fresh or older database up to the employee/department schema
//!   this build understands, in a single transaction.
//! - Refuse databases written by a newer build.
//! - Let repositories verify they were handed a fully migrated connection.
//!
//! # Invariants
//! - Steps are listed in ascending `version` order and never edited once
//!   shipped; schema changes get a new step.
//! - The last applied step is recorded in `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// One schema step: the version it produces and the SQL that gets there.
struct SchemaStep {
    version: u32,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        sql: include_str!("0001_init.sql"),
    },
    SchemaStep {
        version: 2,
        sql: include_str!("0002_employee_department_index.sql"),
    },
];

/// Schema version produced by the newest known step.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Runs every step newer than the database's recorded version.
///
/// # Errors
/// `UnsupportedSchemaVersion` when the database is ahead of this build;
/// `Sqlite` when a step fails, in which case nothing is applied.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = user_version(conn)?;
    let to = latest_version();
    if from > to {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: to,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > from)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from} to_version={to}");
    Ok(())
}

/// Fails unless `conn` is at exactly [`latest_version`].
pub fn ensure_schema_ready(conn: &Connection) -> DbResult<()> {
    let actual_version = user_version(conn)?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(DbError::UninitializedSchema {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

fn user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
