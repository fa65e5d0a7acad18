//! Roster use-case service.
//!
//! # Responsibility
//! - Run repository mutations inside a scoped store connection.
//! - Reload the affected roster after every successful mutation.
//! - Evaluate increment-due employees against the current roster.
//!
//! # Invariants
//! - Rosters are only ever replaced by a full re-read, never patched.
//! - A failed mutation leaves both rosters untouched.
//! - A committed mutation reports success even when the follow-up reload
//!   fails; the reload failure is logged and the previous snapshot stays.
//! - A department rename reloads departments only; employee rows keep the old
//!   department text.

use crate::increment::{employees_due, DueEmployee};
use crate::model::department::{Department, DepartmentId};
use crate::model::employee::{Employee, EmployeeFields, EmployeeId};
use crate::model::policy::IncrementRule;
use crate::repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use crate::repo::error::{RepoError, RepoResult};
use crate::roster::{RosterCache, RosterSnapshot};
use crate::store::RecordStore;
use chrono::NaiveDate;
use log::{info, warn};
use std::sync::Arc;

/// Service facade pairing a record store with employee/department rosters.
pub struct RosterService<S: RecordStore> {
    store: S,
    employees: RosterCache<Employee>,
    departments: RosterCache<Department>,
}

impl<S: RecordStore> RosterService<S> {
    /// Creates a service with empty rosters. Call `reload_all` to populate.
    pub fn new(store: S) -> Self {
        Self {
            store,
            employees: RosterCache::new("employees"),
            departments: RosterCache::new("departments"),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current employee roster, ordered by id.
    pub fn employees(&self) -> Arc<RosterSnapshot<Employee>> {
        self.employees.snapshot()
    }

    /// Current department roster, ordered by name.
    pub fn departments(&self) -> Arc<RosterSnapshot<Department>> {
        self.departments.snapshot()
    }

    /// Employee roster cache, for subscribing to refreshes.
    pub fn employee_roster(&self) -> &RosterCache<Employee> {
        &self.employees
    }

    /// Department roster cache, for subscribing to refreshes.
    pub fn department_roster(&self) -> &RosterCache<Department> {
        &self.departments
    }

    pub fn reload_employees(&self) -> RepoResult<Arc<RosterSnapshot<Employee>>> {
        self.employees
            .refresh(|| self.with_employees(|repo| repo.list_employees()))
    }

    pub fn reload_departments(&self) -> RepoResult<Arc<RosterSnapshot<Department>>> {
        self.departments
            .refresh(|| self.with_departments(|repo| repo.list_departments()))
    }

    /// Reloads departments first, then employees.
    pub fn reload_all(&self) -> RepoResult<()> {
        self.reload_departments()?;
        self.reload_employees()?;
        Ok(())
    }

    /// Reads one employee straight from the store, bypassing the roster.
    pub fn find_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.with_employees(|repo| repo.get_employee(id))
    }

    pub fn find_department(&self, id: DepartmentId) -> RepoResult<Option<Department>> {
        self.with_departments(|repo| repo.get_department(id))
    }

    pub fn add_employee(&self, fields: &EmployeeFields) -> RepoResult<EmployeeId> {
        let id = log_outcome(
            "employee_add",
            self.with_employees(|repo| repo.insert_employee(fields)),
        )?;
        settle_roster("employee_add", self.reload_employees());
        Ok(id)
    }

    /// Replaces an employee's fields.
    ///
    /// Returns `false` (and changes nothing) when no employee has `id`.
    pub fn update_employee(&self, id: EmployeeId, fields: &EmployeeFields) -> RepoResult<bool> {
        let result = self.with_employees(|repo| {
            if repo.get_employee(id)?.is_none() {
                return Ok(false);
            }
            repo.update_employee(id, fields)?;
            Ok(true)
        });
        if let Ok(false) = result {
            info!("event=employee_update module=service status=not_found employee_id={id}");
            return Ok(false);
        }
        log_outcome("employee_update", result)?;
        settle_roster("employee_update", self.reload_employees());
        Ok(true)
    }

    pub fn remove_employee(&self, id: EmployeeId) -> RepoResult<()> {
        log_outcome(
            "employee_remove",
            self.with_employees(|repo| repo.delete_employee(id)),
        )?;
        settle_roster("employee_remove", self.reload_employees());
        Ok(())
    }

    pub fn add_department(&self, name: &str) -> RepoResult<DepartmentId> {
        let id = log_outcome(
            "department_add",
            self.with_departments(|repo| repo.insert_department(name)),
        )?;
        settle_roster("department_add", self.reload_departments());
        Ok(id)
    }

    pub fn rename_department(&self, id: DepartmentId, name: &str) -> RepoResult<()> {
        log_outcome(
            "department_rename",
            self.with_departments(|repo| repo.update_department(id, name)),
        )?;
        settle_roster("department_rename", self.reload_departments());
        Ok(())
    }

    /// Deletes a department unless employees still reference it.
    ///
    /// # Errors
    /// `DepartmentInUse` when blocked; the department roster is not reloaded.
    pub fn remove_department(&self, id: DepartmentId) -> RepoResult<()> {
        log_outcome(
            "department_remove",
            self.with_departments(|repo| repo.delete_department(id)),
        )?;
        settle_roster("department_remove", self.reload_departments());
        Ok(())
    }

    pub fn is_department_in_use(&self, name: &str) -> RepoResult<bool> {
        self.with_departments(|repo| repo.is_department_in_use(name))
    }

    /// Employees due for an increment on `reference_date`, from the current
    /// employee roster (no store access).
    pub fn employees_due(&self, reference_date: NaiveDate, rule: IncrementRule) -> Vec<DueEmployee> {
        employees_due(self.employees.snapshot().items(), reference_date, rule)
    }

    fn with_employees<T>(
        &self,
        op: impl FnOnce(&SqliteEmployeeRepository<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        self.store
            .with_connection(|conn| op(&SqliteEmployeeRepository::try_new(conn)?))
    }

    fn with_departments<T>(
        &self,
        op: impl FnOnce(&SqliteDepartmentRepository<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        self.store
            .with_connection(|conn| op(&SqliteDepartmentRepository::try_new(conn)?))
    }
}

fn log_outcome<T>(event: &str, result: RepoResult<T>) -> RepoResult<T> {
    match &result {
        Ok(_) => info!("event={event} module=service status=ok"),
        // Validation messages can echo raw form input; keep them out of logs.
        Err(RepoError::ValidationFailed(_)) => {
            warn!("event={event} module=service status=error error_code=validation_failed")
        }
        Err(err) => warn!(
            "event={event} module=service status=error error_code={} error={err}",
            error_code(err)
        ),
    }
    result
}

/// Logs a reload that failed after `event` committed. The roster keeps its
/// previous snapshot, so callers see the old generation and may reload later.
fn settle_roster<T>(event: &str, reload: RepoResult<T>) {
    if let Err(err) = reload {
        warn!(
            "event=roster_refresh module=service status=error after={event} error_code={}",
            error_code(&err)
        );
    }
}

fn error_code(err: &RepoError) -> &'static str {
    match err {
        RepoError::StoreUnavailable(_) => "store_unavailable",
        RepoError::QueryFailed(_) => "query_failed",
        RepoError::ValidationFailed(_) => "validation_failed",
        RepoError::DepartmentInUse { .. } => "department_in_use",
    }
}
