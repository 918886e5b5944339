//! Employee domain model.
//!
//! # Responsibility
//! - Define the canonical employee identity record and its status enum.
//! - Define create payloads and partial-update overlays.
//! - Check structural record rules before persistence. Profile attributes
//!   (`name`, `phone`, `sex`, `id_number`) are free-form caller text.
//!
//! # Invariants
//! - `username` is immutable after creation.
//! - `status` is always `Enabled` or `Disabled`; raw codes outside `0|1` are
//!   rejected at the boundary.
//! - `create_time <= update_time`.
//! - `password` is only exposed verbatim by the authentication path.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned employee identifier.
pub type EmployeeId = i64;

/// Account status gate checked during authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Account may log in.
    Enabled,
    /// Account is locked.
    Disabled,
}

impl EmployeeStatus {
    /// Integer code used by storage and outer layers (`1` enabled, `0` disabled).
    pub fn code(self) -> i64 {
        match self {
            Self::Enabled => 1,
            Self::Disabled => 0,
        }
    }

    /// Parses a raw status code supplied by an outer layer.
    pub fn from_code(code: i64) -> Result<Self, EmployeeValidationError> {
        match code {
            1 => Ok(Self::Enabled),
            0 => Ok(Self::Disabled),
            other => Err(EmployeeValidationError::InvalidStatusCode(other)),
        }
    }
}

impl Display for EmployeeStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enabled => write!(f, "enabled"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// Validation failures for employee attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    EmptyUsername,
    InvalidStatusCode(i64),
    InvalidPage(u32),
    TimestampOrder { create_time: i64, update_time: i64 },
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username cannot be empty"),
            Self::InvalidStatusCode(code) => {
                write!(f, "invalid status code `{code}`; expected 0|1")
            }
            Self::InvalidPage(page) => write!(f, "invalid page `{page}`; pages start at 1"),
            Self::TimestampOrder {
                create_time,
                update_time,
            } => write!(
                f,
                "update_time {update_time} is earlier than create_time {create_time}"
            ),
        }
    }
}

impl Error for EmployeeValidationError {}

/// Canonical employee identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub username: String,
    /// Encoded credential. Masked on every read path except authentication.
    pub password: String,
    pub name: String,
    pub phone: String,
    /// `"1"` male, `"0"` female.
    pub sex: String,
    pub id_number: String,
    pub status: EmployeeStatus,
    /// Unix epoch milliseconds.
    pub create_time: i64,
    /// Unix epoch milliseconds. Never earlier than `create_time`.
    pub update_time: i64,
    pub create_user: EmployeeId,
    pub update_user: EmployeeId,
}

impl Employee {
    /// Checks the login key and timestamp ordering.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.username.trim().is_empty() {
            return Err(EmployeeValidationError::EmptyUsername);
        }
        if self.update_time < self.create_time {
            return Err(EmployeeValidationError::TimestampOrder {
                create_time: self.create_time,
                update_time: self.update_time,
            });
        }
        Ok(())
    }

    /// Replaces the stored credential with `mask`.
    pub fn redacted(mut self, mask: &str) -> Self {
        self.password = mask.to_string();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.status == EmployeeStatus::Enabled
    }
}

/// Caller-supplied profile for a new employee.
///
/// Carries no password or status: both are assigned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub username: String,
    pub name: String,
    pub phone: String,
    pub sex: String,
    pub id_number: String,
}

impl From<Employee> for NewEmployee {
    /// Copies the profile of an existing record, dropping identity,
    /// credential, status and audit fields.
    fn from(value: Employee) -> Self {
        Self {
            username: value.username,
            name: value.name,
            phone: value.phone,
            sex: value.sex,
            id_number: value.id_number,
        }
    }
}

/// Caller-facing partial profile update.
///
/// `None` and blank values leave the stored attribute unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub sex: Option<String>,
    pub id_number: Option<String>,
}

impl ProfileChanges {
    /// Drops blank values so they behave like omitted fields.
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            phone: non_blank(self.phone),
            sex: non_blank(self.sex),
            id_number: non_blank(self.id_number),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.sex.is_none() && self.id_number.is_none()
    }
}

/// Storage-level targeted update.
///
/// Only `Some` fields are written; everything else on the stored record is
/// left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    pub profile: ProfileChanges,
    pub status: Option<EmployeeStatus>,
    pub update_time: Option<i64>,
    pub update_user: Option<EmployeeId>,
}

impl EmployeePatch {
    /// Patch that flips status and nothing else.
    pub fn status_only(status: EmployeeStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.profile.is_empty()
            && self.status.is_none()
            && self.update_time.is_none()
            && self.update_user.is_none()
    }

    /// Overlays present fields onto `base`.
    ///
    /// `update_time` never moves below `base.create_time`.
    pub fn apply_to(&self, base: &mut Employee) {
        if let Some(name) = &self.profile.name {
            base.name = name.clone();
        }
        if let Some(phone) = &self.profile.phone {
            base.phone = phone.clone();
        }
        if let Some(sex) = &self.profile.sex {
            base.sex = sex.clone();
        }
        if let Some(id_number) = &self.profile.id_number {
            base.id_number = id_number.clone();
        }
        if let Some(status) = self.status {
            base.status = status;
        }
        if let Some(update_time) = self.update_time {
            base.update_time = update_time.max(base.create_time);
        }
        if let Some(update_user) = self.update_user {
            base.update_user = update_user;
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|inner| !inner.trim().is_empty())
}
