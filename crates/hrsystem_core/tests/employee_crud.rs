use chrono::NaiveDate;
use hrsystem_core::db::migrations::latest_version;
use hrsystem_core::db::open_db_in_memory;
use hrsystem_core::{
    EmployeeFields, EmployeeRepository, IncrementPolicy, RepoError, SqliteEmployeeRepository,
    ValidationError,
};
use rusqlite::Connection;

#[test]
fn insert_then_list_returns_exactly_one_matching_entry() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let id = repo
        .insert_employee(
            &EmployeeFields::new("Grace Hopper", "Engineering", "5200.5")
                .with_join_date("2023-01-15")
                .with_increment_policy("Yearly"),
        )
        .unwrap();

    let listed = repo.list_employees().unwrap();
    assert_eq!(listed.len(), 1);
    let employee = &listed[0];
    assert_eq!(employee.id, id);
    assert_eq!(employee.name, "Grace Hopper");
    assert_eq!(employee.department, "Engineering");
    assert_eq!(employee.salary, 5200.5);
    assert_eq!(employee.join_date, NaiveDate::from_ymd_opt(2023, 1, 15));
    assert_eq!(employee.increment_policy, Some(IncrementPolicy::Yearly));
}

#[test]
fn ids_are_never_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let first = repo
        .insert_employee(&EmployeeFields::new("A", "Ops", "1"))
        .unwrap();
    let second = repo
        .insert_employee(&EmployeeFields::new("B", "Ops", "1"))
        .unwrap();
    repo.delete_employee(second).unwrap();
    let third = repo
        .insert_employee(&EmployeeFields::new("C", "Ops", "1"))
        .unwrap();

    assert_ne!(first, second);
    assert!(third > second);
}

#[test]
fn list_is_ordered_by_ascending_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    for name in ["Zed", "Amy", "Mia"] {
        repo.insert_employee(&EmployeeFields::new(name, "Sales", "100"))
            .unwrap();
    }

    let ids: Vec<_> = repo
        .list_employees()
        .unwrap()
        .into_iter()
        .map(|employee| employee.id)
        .collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    assert_eq!(ids.len(), 3);
}

#[test]
fn update_replaces_every_mutable_field() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    let id = repo
        .insert_employee(
            &EmployeeFields::new("Alan", "Research", "3000")
                .with_join_date("2022-05-01")
                .with_increment_policy("Half-Yearly"),
        )
        .unwrap();

    repo.update_employee(id, &EmployeeFields::new("Alan Turing", "Cryptography", "3500"))
        .unwrap();

    let loaded = repo.get_employee(id).unwrap().unwrap();
    assert_eq!(loaded.name, "Alan Turing");
    assert_eq!(loaded.department, "Cryptography");
    assert_eq!(loaded.salary, 3500.0);
    assert_eq!(loaded.join_date, None);
    assert_eq!(loaded.increment_policy, None);
}

#[test]
fn update_unknown_id_is_a_noop_success() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    repo.update_employee(404, &EmployeeFields::new("Ghost", "Nowhere", "0"))
        .unwrap();
    assert!(repo.list_employees().unwrap().is_empty());
}

#[test]
fn delete_removes_only_the_matching_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    let keep = repo
        .insert_employee(&EmployeeFields::new("Keep", "Ops", "1"))
        .unwrap();
    let gone = repo
        .insert_employee(&EmployeeFields::new("Gone", "Ops", "1"))
        .unwrap();

    repo.delete_employee(gone).unwrap();

    assert!(repo.get_employee(gone).unwrap().is_none());
    assert!(repo.get_employee(keep).unwrap().is_some());
}

#[test]
fn missing_required_fields_fail_validation_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let fields = EmployeeFields {
        name: Some("No Salary".to_string()),
        department: Some("Ops".to_string()),
        ..EmployeeFields::default()
    };
    let err = repo.insert_employee(&fields).unwrap_err();
    assert!(matches!(
        err,
        RepoError::ValidationFailed(ValidationError::MissingField("salary"))
    ));
    assert!(repo.list_employees().unwrap().is_empty());
}

#[test]
fn unknown_policy_is_rejected_on_write() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let err = repo
        .insert_employee(&EmployeeFields::new("A", "Ops", "1").with_increment_policy("Quarterly"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::ValidationFailed(ValidationError::UnknownPolicy(_))
    ));
}

#[test]
fn unknown_policy_in_stored_row_is_reported_not_masked() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO employees (name, department, salary, increment_policy)
         VALUES ('Legacy', 'Ops', 10.0, 'Quarterly');",
        [],
    )
    .unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let err = repo.list_employees().unwrap_err();
    match err {
        RepoError::ValidationFailed(ValidationError::InvalidStoredValue { column, value }) => {
            assert_eq!(column, "employees.increment_policy");
            assert_eq!(value, "Quarterly");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn broken_statement_surfaces_as_query_failed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    conn.execute_batch("DROP TABLE employees;").unwrap();

    let err = repo.list_employees().unwrap_err();
    assert!(matches!(err, RepoError::QueryFailed(_)), "{err}");
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteEmployeeRepository::try_new(&conn) {
        Err(RepoError::StoreUnavailable(err)) => {
            assert!(err.to_string().contains(&latest_version().to_string()));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected unmigrated connection to be rejected"),
    }
}
