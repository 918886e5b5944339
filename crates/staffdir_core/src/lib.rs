//! Core domain logic for the staff directory.
//! This crate owns employee authentication and lifecycle rules.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod password;
pub mod repo;
pub mod service;

pub use clock::{Clock, SystemClock};
pub use config::{DirectoryConfig, DEFAULT_PASSWORD, PASSWORD_MASK};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::actor::{ActorContext, SYSTEM_ACTOR_ID};
pub use model::employee::{
    Employee, EmployeeId, EmployeePatch, EmployeeStatus, EmployeeValidationError, NewEmployee,
    ProfileChanges,
};
pub use password::{
    Argon2PasswordEncoder, PasswordEncoder, PasswordError, PlaintextPasswordEncoder,
};
pub use repo::employee_repo::{
    EmployeePageQuery, EmployeeRepository, PageResult, RepoError, RepoResult,
    SqliteEmployeeRepository,
};
pub use repo::memory_repo::InMemoryEmployeeRepository;
pub use service::employee_service::{EmployeeService, EmployeeServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
