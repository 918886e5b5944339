use staffdir_core::db::open_db_in_memory;
use staffdir_core::{
    ActorContext, Argon2PasswordEncoder, DirectoryConfig, EmployeeRepository, EmployeeService,
    EmployeeServiceError, EmployeeStatus, NewEmployee, SqliteEmployeeRepository,
};

fn profile(username: &str) -> NewEmployee {
    NewEmployee {
        username: username.to_string(),
        name: "Alice".to_string(),
        phone: "13800000001".to_string(),
        sex: "0".to_string(),
        id_number: "11010119900307001X".to_string(),
    }
}

fn config_with_default_password(password: &str) -> DirectoryConfig {
    DirectoryConfig {
        default_password: password.to_string(),
        ..DirectoryConfig::default()
    }
}

#[test]
fn unknown_username_is_account_not_found_regardless_of_password() {
    let conn = open_db_in_memory().unwrap();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    service.create(profile("alice"), &ActorContext::new(1)).unwrap();

    for password in ["123456", "wrong", ""] {
        let err = service.authenticate("bob", password).unwrap_err();
        assert!(matches!(err, EmployeeServiceError::AccountNotFound));
    }
}

#[test]
fn wrong_password_on_enabled_account_is_password_mismatch() {
    let conn = open_db_in_memory().unwrap();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    service.create(profile("alice"), &ActorContext::new(1)).unwrap();

    let err = service.authenticate("alice", "654321").unwrap_err();
    assert!(matches!(err, EmployeeServiceError::PasswordMismatch));
}

#[test]
fn wrong_password_on_disabled_account_is_password_mismatch_not_locked() {
    let conn = open_db_in_memory().unwrap();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap())
        .with_config(config_with_default_password("hunter2"));
    let id = service.create(profile("alice"), &ActorContext::new(1)).unwrap();
    service.set_status(id, EmployeeStatus::Disabled).unwrap();

    let err = service.authenticate("alice", "wrong").unwrap_err();
    assert!(matches!(err, EmployeeServiceError::PasswordMismatch));
}

#[test]
fn correct_password_on_disabled_account_is_account_locked() {
    let conn = open_db_in_memory().unwrap();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap())
        .with_config(config_with_default_password("hunter2"));
    let id = service.create(profile("alice"), &ActorContext::new(1)).unwrap();
    service.set_status(id, EmployeeStatus::Disabled).unwrap();

    let err = service.authenticate("alice", "hunter2").unwrap_err();
    assert!(matches!(err, EmployeeServiceError::AccountLocked));
}

#[test]
fn successful_login_returns_stored_record_unredacted() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    let service = EmployeeService::new(&repo);
    let id = service.create(profile("alice"), &ActorContext::new(1)).unwrap();

    let employee = service.authenticate("alice", "123456").unwrap();
    let stored = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(employee, stored);
    assert_eq!(employee.password, "123456");
}

#[test]
fn argon2_encoder_keeps_check_order_and_hides_default_password() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    let service = EmployeeService::new(&repo).with_password_encoder(Argon2PasswordEncoder);
    let id = service.create(profile("alice"), &ActorContext::new(1)).unwrap();

    let stored = repo.find_by_id(id).unwrap().unwrap();
    assert_ne!(stored.password, "123456");
    assert!(stored.password.starts_with("$argon2"));

    assert_eq!(service.authenticate("alice", "123456").unwrap().id, id);
    assert!(matches!(
        service.authenticate("alice", "nope").unwrap_err(),
        EmployeeServiceError::PasswordMismatch
    ));

    service.set_status(id, EmployeeStatus::Disabled).unwrap();
    assert!(matches!(
        service.authenticate("alice", "nope").unwrap_err(),
        EmployeeServiceError::PasswordMismatch
    ));
    assert!(matches!(
        service.authenticate("alice", "123456").unwrap_err(),
        EmployeeServiceError::AccountLocked
    ));
}
