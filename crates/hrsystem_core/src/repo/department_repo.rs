//! Department repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listing order is `name COLLATE NOCASE ASC, id ASC`.
//! - Department names compare case-insensitively everywhere: uniqueness,
//!   the in-use guard and listing all follow the `NOCASE` column collation.
//! - A department referenced by any employee is never deleted; the guard and
//!   the delete run in one transaction.
//! - Renames do not cascade into `employees.department`.

use crate::db::migrations::ensure_schema_ready;
use crate::model::department::{Department, DepartmentId};
use crate::model::validation::normalize_name;
use crate::repo::employee_repo::count_by_department;
use crate::repo::error::{RepoError, RepoResult};
use log::{debug, warn};
use rusqlite::{Connection, OptionalExtension};

/// Repository interface for department CRUD operations.
pub trait DepartmentRepository {
    fn list_departments(&self) -> RepoResult<Vec<Department>>;
    fn get_department(&self, id: DepartmentId) -> RepoResult<Option<Department>>;
    fn insert_department(&self, name: &str) -> RepoResult<DepartmentId>;
    fn update_department(&self, id: DepartmentId, name: &str) -> RepoResult<()>;
    /// Fails with `DepartmentInUse` while any employee references the name.
    fn delete_department(&self, id: DepartmentId) -> RepoResult<()>;
    fn is_department_in_use(&self, name: &str) -> RepoResult<bool>;
    fn count_employees_in_department(&self, name: &str) -> RepoResult<u64>;
}

/// SQLite-backed department repository.
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    /// Wraps a connection that has been migrated to the latest schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn list_departments(&self) -> RepoResult<Vec<Department>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name
             FROM departments
             ORDER BY name COLLATE NOCASE ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut departments = Vec::new();
        while let Some(row) = rows.next()? {
            departments.push(Department {
                id: row.get("id")?,
                name: row.get("name")?,
            });
        }
        Ok(departments)
    }

    fn get_department(&self, id: DepartmentId) -> RepoResult<Option<Department>> {
        find_department(self.conn, id)
    }

    fn insert_department(&self, name: &str) -> RepoResult<DepartmentId> {
        let name = normalize_name("name", name)?;
        self.conn
            .execute("INSERT INTO departments (name) VALUES (?1);", [name.as_str()])?;

        let id = self.conn.last_insert_rowid();
        debug!("event=department_insert module=repo status=ok department_id={id}");
        Ok(id)
    }

    fn update_department(&self, id: DepartmentId, name: &str) -> RepoResult<()> {
        let name = normalize_name("name", name)?;

        if let Some(current) = find_department(self.conn, id)? {
            let stale_refs = count_by_department(self.conn, &current.name)?;
            if stale_refs > 0 && !current.name.eq_ignore_ascii_case(&name) {
                warn!(
                    "event=department_rename module=repo status=warn department_id={id} stale_employee_refs={stale_refs}"
                );
            }
        }

        let changed = self.conn.execute(
            "UPDATE departments SET name = ?1 WHERE id = ?2;",
            rusqlite::params![name.as_str(), id],
        )?;
        debug!(
            "event=department_update module=repo status=ok department_id={id} affected={changed}"
        );
        Ok(())
    }

    fn delete_department(&self, id: DepartmentId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let Some(department) = find_department(&tx, id)? else {
            debug!("event=department_delete module=repo status=ok department_id={id} affected=0");
            return Ok(());
        };

        let employee_count = count_by_department(&tx, &department.name)?;
        if employee_count > 0 {
            warn!(
                "event=department_delete module=repo status=blocked department_id={id} employee_count={employee_count}"
            );
            return Err(RepoError::DepartmentInUse {
                name: department.name,
                employee_count,
            });
        }

        tx.execute("DELETE FROM departments WHERE id = ?1;", [id])?;
        tx.commit()?;
        debug!("event=department_delete module=repo status=ok department_id={id} affected=1");
        Ok(())
    }

    fn is_department_in_use(&self, name: &str) -> RepoResult<bool> {
        Ok(self.count_employees_in_department(name)? > 0)
    }

    fn count_employees_in_department(&self, name: &str) -> RepoResult<u64> {
        let name = normalize_name("department", name)?;
        count_by_department(self.conn, &name)
    }
}

fn find_department(conn: &Connection, id: DepartmentId) -> RepoResult<Option<Department>> {
    let department = conn
        .query_row(
            "SELECT id, name FROM departments WHERE id = ?1;",
            [id],
            |row| {
                Ok(Department {
                    id: row.get("id")?,
                    name: row.get("name")?,
                })
            },
        )
        .optional()?;
    Ok(department)
}
