//! CLI probe for the staff directory core.
//!
//! # Responsibility
//! - Verify `staffdir_core` linkage and storage bootstrap from a shell.
//! - Seed an `admin` account into an empty database, then authenticate the
//!   given credentials and print the outcome.
//!
//! Usage: `staffdir_cli [<db_path> <username> <password>]`

use staffdir_core::db::open_db;
use staffdir_core::{
    core_version, ActorContext, EmployeePageQuery, EmployeeService, EmployeeServiceError,
    NewEmployee, SqliteEmployeeRepository,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    println!("staffdir_core version={}", core_version());

    let [db_path, username, password] = args.as_slice() else {
        println!("usage: staffdir_cli <db_path> <username> <password>");
        return ExitCode::SUCCESS;
    };

    match run(db_path, username, password) {
        Ok(line) => {
            println!("{line}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("login status=error reason={err}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: &str, username: &str, password: &str) -> Result<String, Box<dyn std::error::Error>> {
    let conn = open_db(db_path)?;
    let repo = SqliteEmployeeRepository::try_new(&conn)?;
    let service = EmployeeService::new(repo);

    let existing = service.query(&EmployeePageQuery {
        page_size: 1,
        ..EmployeePageQuery::default()
    })?;
    if existing.total == 0 {
        let id = service.create(admin_profile(), &ActorContext::system())?;
        println!("seed status=ok employee_id={id} username=admin");
    }

    match service.authenticate(username, password) {
        Ok(employee) => Ok(format!(
            "login status=ok employee_id={} name={}",
            employee.id, employee.name
        )),
        Err(
            err @ (EmployeeServiceError::AccountNotFound
            | EmployeeServiceError::PasswordMismatch
            | EmployeeServiceError::AccountLocked),
        ) => Ok(format!("login status=denied reason={err}")),
        Err(err) => Err(err.into()),
    }
}

fn admin_profile() -> NewEmployee {
    NewEmployee {
        username: "admin".to_string(),
        name: "Administrator".to_string(),
        phone: "13812312312".to_string(),
        sex: "1".to_string(),
        id_number: "110101199001010047".to_string(),
    }
}
