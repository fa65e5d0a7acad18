//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Map between `employees` rows and `Employee` values.
//! - Keep SQL inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate `EmployeeFields` before any statement runs.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Listing order is ascending `id`.

use crate::db::migrations::ensure_schema_ready;
use crate::model::employee::{check_salary, Employee, EmployeeFields, EmployeeId};
use crate::model::policy::IncrementPolicy;
use crate::model::validation::ValidationError;
use crate::repo::error::RepoResult;
use chrono::NaiveDate;
use log::debug;
use rusqlite::{params, Connection, Row};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    name,
    department,
    salary,
    join_date,
    increment_policy
FROM employees";

/// Repository interface for employee CRUD operations.
pub trait EmployeeRepository {
    /// Returns every employee ordered by ascending id, fully materialized.
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// Inserts a new row and returns the store-assigned id.
    fn insert_employee(&self, fields: &EmployeeFields) -> RepoResult<EmployeeId>;
    /// Replaces every mutable field. Unknown ids are a no-op success.
    fn update_employee(&self, id: EmployeeId, fields: &EmployeeFields) -> RepoResult<()>;
    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Wraps a connection that has been migrated to the latest schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }
        Ok(None)
    }

    fn insert_employee(&self, fields: &EmployeeFields) -> RepoResult<EmployeeId> {
        let draft = fields.validate()?;

        self.conn.execute(
            "INSERT INTO employees (
                name,
                department,
                salary,
                join_date,
                increment_policy
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                draft.name.as_str(),
                draft.department.as_str(),
                draft.salary,
                draft.join_date,
                draft.increment_policy.map(IncrementPolicy::as_str),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("event=employee_insert module=repo status=ok employee_id={id}");
        Ok(id)
    }

    fn update_employee(&self, id: EmployeeId, fields: &EmployeeFields) -> RepoResult<()> {
        let draft = fields.validate()?;

        let changed = self.conn.execute(
            "UPDATE employees
             SET
                name = ?1,
                department = ?2,
                salary = ?3,
                join_date = ?4,
                increment_policy = ?5
             WHERE id = ?6;",
            params![
                draft.name.as_str(),
                draft.department.as_str(),
                draft.salary,
                draft.join_date,
                draft.increment_policy.map(IncrementPolicy::as_str),
                id,
            ],
        )?;

        debug!("event=employee_update module=repo status=ok employee_id={id} affected={changed}");
        Ok(())
    }

    fn delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])?;
        debug!("event=employee_delete module=repo status=ok employee_id={id} affected={changed}");
        Ok(())
    }
}

/// Returns how many employees reference `department` by name.
pub(crate) fn count_by_department(conn: &Connection, department: &str) -> RepoResult<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM employees WHERE department = ?1;",
        [department],
        |row| row.get(0),
    )?;
    Ok(u64::try_from(count).unwrap_or(0))
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let raw_salary: f64 = row.get("salary")?;
    let salary =
        check_salary(raw_salary).map_err(|_| ValidationError::InvalidStoredValue {
            column: "employees.salary",
            value: raw_salary.to_string(),
        })?;

    let join_date = match row.get::<_, Option<String>>("join_date")? {
        Some(value) => Some(NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
            ValidationError::InvalidStoredValue {
                column: "employees.join_date",
                value,
            }
        })?),
        None => None,
    };

    let increment_policy = match row.get::<_, Option<String>>("increment_policy")? {
        Some(value) => Some(value.parse::<IncrementPolicy>().map_err(|_| {
            ValidationError::InvalidStoredValue {
                column: "employees.increment_policy",
                value,
            }
        })?),
        None => None,
    };

    Ok(Employee {
        id: row.get("id")?,
        name: row.get("name")?,
        department: row.get("department")?,
        salary,
        join_date,
        increment_policy,
    })
}

