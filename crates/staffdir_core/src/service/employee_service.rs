//! Employee directory use-case service.
//!
//! # Responsibility
//! - Authenticate employees by username and password.
//! - Create employees with system-assigned status, credential and audit
//!   stamps.
//! - Flip account status, overlay profile changes, and serve redacted reads.
//!
//! # Invariants
//! - Authentication checks run in a fixed order: existence, credential,
//!   status. Callers branch on which error they observe.
//! - `create` always stores `Enabled` and the encoded default password.
//! - `get_by_id` and `query` never return the stored credential.
//! - The service keeps no state between calls; the actor arrives per call.

use crate::clock::{Clock, SystemClock};
use crate::config::DirectoryConfig;
use crate::model::actor::ActorContext;
use crate::model::employee::{
    Employee, EmployeeId, EmployeePatch, EmployeeStatus, EmployeeValidationError, NewEmployee,
    ProfileChanges,
};
use crate::password::{PasswordEncoder, PasswordError, PlaintextPasswordEncoder};
use crate::repo::employee_repo::{EmployeePageQuery, EmployeeRepository, PageResult, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for employee directory use-cases.
#[derive(Debug)]
pub enum EmployeeServiceError {
    /// No employee has the supplied username.
    AccountNotFound,
    /// Supplied password does not match the stored credential.
    PasswordMismatch,
    /// Credentials are valid but the account is disabled.
    AccountLocked,
    /// Username is already taken.
    Conflict { username: String },
    /// Target employee does not exist.
    NotFound(EmployeeId),
    /// Caller input violates a model rule.
    Validation(EmployeeValidationError),
    /// Credential encoding failure.
    Password(PasswordError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for EmployeeServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccountNotFound => write!(f, "account not found"),
            Self::PasswordMismatch => write!(f, "password mismatch"),
            Self::AccountLocked => write!(f, "account locked"),
            Self::Conflict { username } => write!(f, "username already exists: {username}"),
            Self::NotFound(id) => write!(f, "employee not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Password(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EmployeeServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Password(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EmployeeServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Conflict { username } => Self::Conflict { username },
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<EmployeeValidationError> for EmployeeServiceError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PasswordError> for EmployeeServiceError {
    fn from(value: PasswordError) -> Self {
        Self::Password(value)
    }
}

pub type ServiceResult<T> = Result<T, EmployeeServiceError>;

/// Employee directory facade over a repository implementation.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
    config: DirectoryConfig,
    passwords: Box<dyn PasswordEncoder>,
    clock: Box<dyn Clock>,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    /// Creates a service with default config, plaintext credentials and the
    /// system clock.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            config: DirectoryConfig::default(),
            passwords: Box::new(PlaintextPasswordEncoder),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_config(mut self, config: DirectoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_password_encoder(mut self, encoder: impl PasswordEncoder + 'static) -> Self {
        self.passwords = Box::new(encoder);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Verifies credentials and returns the full record.
    ///
    /// # Contract
    /// - `AccountNotFound` before `PasswordMismatch` before `AccountLocked`.
    /// - The returned record is not redacted; callers must not display
    ///   `password`.
    pub fn authenticate(&self, username: &str, password: &str) -> ServiceResult<Employee> {
        let Some(employee) = self.repo.find_by_username(username)? else {
            warn!(
                "event=employee_login module=service status=error error_code=account_not_found username={}",
                username
            );
            return Err(EmployeeServiceError::AccountNotFound);
        };

        if !self.passwords.verify(password, &employee.password)? {
            warn!(
                "event=employee_login module=service status=error error_code=password_mismatch employee_id={}",
                employee.id
            );
            return Err(EmployeeServiceError::PasswordMismatch);
        }

        if employee.status == EmployeeStatus::Disabled {
            warn!(
                "event=employee_login module=service status=error error_code=account_locked employee_id={}",
                employee.id
            );
            return Err(EmployeeServiceError::AccountLocked);
        }

        info!(
            "event=employee_login module=service status=ok employee_id={}",
            employee.id
        );
        Ok(employee)
    }

    /// Creates an employee from a caller-supplied profile.
    ///
    /// # Contract
    /// - `status = Enabled`, `password = encode(default_password)`.
    /// - `create_time = update_time = now`, audit users set to `actor`.
    /// - `Conflict` when the username is taken; nothing is written.
    pub fn create(
        &self,
        profile: impl Into<NewEmployee>,
        actor: &ActorContext,
    ) -> ServiceResult<EmployeeId> {
        let profile = profile.into();
        let now = self.clock.now_epoch_ms();
        let actor_id = actor.current_actor_id();

        let mut employee = Employee {
            id: 0,
            username: profile.username,
            password: String::new(),
            name: profile.name,
            phone: profile.phone,
            sex: profile.sex,
            id_number: profile.id_number,
            status: EmployeeStatus::Enabled,
            create_time: now,
            update_time: now,
            create_user: actor_id,
            update_user: actor_id,
        };
        // Reject bad input before paying for a credential hash.
        employee.validate()?;
        employee.password = self.passwords.encode(&self.config.default_password)?;

        match self.repo.insert(&employee) {
            Ok(id) => {
                info!(
                    "event=employee_create module=service status=ok employee_id={} username={} actor_id={}",
                    id, employee.username, actor_id
                );
                Ok(id)
            }
            Err(err) => {
                warn!(
                    "event=employee_create module=service status=error username={} actor_id={} error={}",
                    employee.username, actor_id, err
                );
                Err(err.into())
            }
        }
    }

    /// Sets account status and touches no other field.
    ///
    /// Returns `NotFound` when `id` has no record.
    pub fn set_status(&self, id: EmployeeId, status: EmployeeStatus) -> ServiceResult<()> {
        self.repo
            .update_fields(id, &EmployeePatch::status_only(status))?;
        info!(
            "event=employee_status module=service status=ok employee_id={} new_status={}",
            id, status
        );
        Ok(())
    }

    /// Same as [`Self::set_status`] for a raw `0|1` code from an outer layer.
    pub fn set_status_code(&self, id: EmployeeId, code: i64) -> ServiceResult<()> {
        let status = EmployeeStatus::from_code(code)?;
        self.set_status(id, status)
    }

    /// Gets one employee with the credential masked.
    pub fn get_by_id(&self, id: EmployeeId) -> ServiceResult<Employee> {
        self.repo
            .find_by_id(id)?
            .map(|employee| employee.redacted(&self.config.password_mask))
            .ok_or(EmployeeServiceError::NotFound(id))
    }

    /// Overlays profile changes onto an existing employee.
    ///
    /// # Contract
    /// - Omitted or blank fields keep their stored values.
    /// - `update_time` and `update_user` are always refreshed; `update_time`
    ///   is clamped to `create_time` when the clock is behind it.
    /// - `password`, `status`, `username` and creation stamps are untouched.
    pub fn update(
        &self,
        changes: ProfileChanges,
        id: EmployeeId,
        actor: &ActorContext,
    ) -> ServiceResult<()> {
        let patch = EmployeePatch {
            profile: changes.normalized(),
            status: None,
            update_time: Some(self.clock.now_epoch_ms()),
            update_user: Some(actor.current_actor_id()),
        };
        self.repo.update_fields(id, &patch)?;

        info!(
            "event=employee_update module=service status=ok employee_id={} actor_id={}",
            id,
            actor.current_actor_id()
        );
        Ok(())
    }

    /// Lists one page of employees, newest first, with credentials masked.
    ///
    /// # Contract
    /// - `page` starts at 1; `0` is rejected.
    /// - `page_size = 0` uses the configured default; larger values clamp to
    ///   the configured maximum.
    /// - `total` counts every match, not just this page.
    pub fn query(&self, query: &EmployeePageQuery) -> ServiceResult<PageResult> {
        if query.page == 0 {
            return Err(EmployeeValidationError::InvalidPage(query.page).into());
        }

        let effective = EmployeePageQuery {
            name: query.name_filter().map(str::to_string),
            page: query.page,
            page_size: self.config.normalize_page_size(query.page_size),
        };
        let page = self.repo.query_page(&effective)?;

        let mask = self.config.password_mask.as_str();
        Ok(PageResult {
            total: page.total,
            records: page
                .records
                .into_iter()
                .map(|employee| employee.redacted(mask))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{EmployeeService, EmployeeServiceError};
    use crate::model::employee::EmployeeValidationError;
    use crate::repo::employee_repo::{EmployeePageQuery, RepoError};
    use crate::repo::memory_repo::InMemoryEmployeeRepository;

    #[test]
    fn repo_semantic_errors_map_to_service_kinds() {
        assert!(matches!(
            EmployeeServiceError::from(RepoError::NotFound(4)),
            EmployeeServiceError::NotFound(4)
        ));
        assert!(matches!(
            EmployeeServiceError::from(RepoError::Conflict {
                username: "alice".to_string()
            }),
            EmployeeServiceError::Conflict { username } if username == "alice"
        ));
        assert!(matches!(
            EmployeeServiceError::from(RepoError::InvalidData("x".to_string())),
            EmployeeServiceError::Repo(_)
        ));
    }

    #[test]
    fn query_rejects_page_zero() {
        let service = EmployeeService::new(InMemoryEmployeeRepository::new());
        let err = service
            .query(&EmployeePageQuery {
                page: 0,
                ..EmployeePageQuery::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            EmployeeServiceError::Validation(EmployeeValidationError::InvalidPage(0))
        ));
    }
}
