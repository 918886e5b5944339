//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide lookup, insert, targeted update and paged listing over the
//!   `employee` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Inserts validate before SQL mutations.
//! - Targeted updates never stamp `update_time` below `create_time`.
//! - Username uniqueness is enforced by storage and reported as
//!   `RepoError::Conflict`, distinct from other failures.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::employee::{
    Employee, EmployeeId, EmployeePatch, EmployeeStatus, EmployeeValidationError,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    username,
    password,
    name,
    phone,
    sex,
    id_number,
    status,
    create_time,
    update_time,
    create_user,
    update_user
FROM employee";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for employee persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EmployeeValidationError),
    Db(DbError),
    NotFound(EmployeeId),
    /// Another record already owns this username.
    Conflict { username: String },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "employee not found: {id}"),
            Self::Conflict { username } => write!(f, "username already exists: {username}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted employee data: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filter and pagination options for employee listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeePageQuery {
    /// Case-insensitive substring matched against `name`.
    pub name: Option<String>,
    /// 1-indexed page number.
    pub page: u32,
    /// Maximum records per page.
    pub page_size: u32,
}

impl Default for EmployeePageQuery {
    fn default() -> Self {
        Self {
            name: None,
            page: 1,
            page_size: 10,
        }
    }
}

impl EmployeePageQuery {
    /// Number of matching rows skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Name filter with blank input treated as no filter.
    pub fn name_filter(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// One page of employees plus the total match count across all pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    pub total: u64,
    pub records: Vec<Employee>,
}

/// Persistence contract consumed by `EmployeeService`.
pub trait EmployeeRepository {
    fn find_by_username(&self, username: &str) -> RepoResult<Option<Employee>>;
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// Persists a new record and returns the storage-assigned id.
    ///
    /// `employee.id` is ignored.
    fn insert(&self, employee: &Employee) -> RepoResult<EmployeeId>;
    /// Writes only the `Some` fields of `patch`.
    fn update_fields(&self, id: EmployeeId, patch: &EmployeePatch) -> RepoResult<()>;
    /// Lists one page ordered by `create_time DESC, id DESC`.
    fn query_page(&self, query: &EmployeePageQuery) -> RepoResult<PageResult>;
}

impl<R: EmployeeRepository + ?Sized> EmployeeRepository for &R {
    fn find_by_username(&self, username: &str) -> RepoResult<Option<Employee>> {
        (**self).find_by_username(username)
    }

    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        (**self).find_by_id(id)
    }

    fn insert(&self, employee: &Employee) -> RepoResult<EmployeeId> {
        (**self).insert(employee)
    }

    fn update_fields(&self, id: EmployeeId, patch: &EmployeePatch) -> RepoResult<()> {
        (**self).update_fields(id, patch)
    }

    fn query_page(&self, query: &EmployeePageQuery) -> RepoResult<PageResult> {
        (**self).query_page(query)
    }
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    /// - `MissingRequiredTable` when `employee` does not exist.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let has_table: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'employee'
            );",
            [],
            |row| row.get(0),
        )?;
        if !has_table {
            return Err(RepoError::MissingRequiredTable("employee"));
        }

        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn find_by_username(&self, username: &str) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE username = ?1;"))?;
        let mut rows = stmt.query([username])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_employee_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_employee_row(row)?)),
            None => Ok(None),
        }
    }

    fn insert(&self, employee: &Employee) -> RepoResult<EmployeeId> {
        employee.validate()?;

        let result = self.conn.execute(
            "INSERT INTO employee (
                username,
                password,
                name,
                phone,
                sex,
                id_number,
                status,
                create_time,
                update_time,
                create_user,
                update_user
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                employee.username.as_str(),
                employee.password.as_str(),
                employee.name.as_str(),
                employee.phone.as_str(),
                employee.sex.as_str(),
                employee.id_number.as_str(),
                employee.status.code(),
                employee.create_time,
                employee.update_time,
                employee.create_user,
                employee.update_user,
            ],
        );

        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(err) if is_unique_violation(&err) => Err(RepoError::Conflict {
                username: employee.username.clone(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn update_fields(&self, id: EmployeeId, patch: &EmployeePatch) -> RepoResult<()> {
        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        let text_fields = [
            ("name = ?", &patch.profile.name),
            ("phone = ?", &patch.profile.phone),
            ("sex = ?", &patch.profile.sex),
            ("id_number = ?", &patch.profile.id_number),
        ];
        for (assignment, value) in text_fields {
            if let Some(value) = value {
                assignments.push(assignment);
                bind_values.push(Value::Text(value.clone()));
            }
        }
        if let Some(status) = patch.status {
            assignments.push("status = ?");
            bind_values.push(Value::Integer(status.code()));
        }
        if let Some(update_time) = patch.update_time {
            // Clamped so a clock that stepped backwards cannot break
            // `create_time <= update_time`.
            assignments.push("update_time = MAX(?, create_time)");
            bind_values.push(Value::Integer(update_time));
        }
        if let Some(update_user) = patch.update_user {
            assignments.push("update_user = ?");
            bind_values.push(Value::Integer(update_user));
        }

        if assignments.is_empty() {
            let exists = self
                .conn
                .query_row("SELECT 1 FROM employee WHERE id = ?1;", [id], |_| Ok(()))
                .optional()?;
            return exists.ok_or(RepoError::NotFound(id));
        }

        let sql = format!(
            "UPDATE employee SET {} WHERE id = ?;",
            assignments.join(", ")
        );
        bind_values.push(Value::Integer(id));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn query_page(&self, query: &EmployeePageQuery) -> RepoResult<PageResult> {
        let mut filter_sql = String::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = query.name_filter() {
            filter_sql.push_str(" WHERE name LIKE ? ESCAPE '\\'");
            bind_values.push(Value::Text(like_contains_pattern(name)));
        }

        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM employee{filter_sql};"),
            params_from_iter(bind_values.iter()),
            |row| row.get(0),
        )?;

        let offset = i64::try_from(query.offset()).map_err(|_| {
            RepoError::InvalidData(format!("page offset overflow for page {}", query.page))
        })?;
        let mut sql = format!("{EMPLOYEE_SELECT_SQL}{filter_sql}");
        sql.push_str(" ORDER BY create_time DESC, id DESC LIMIT ? OFFSET ?;");
        bind_values.push(Value::Integer(i64::from(query.page_size)));
        bind_values.push(Value::Integer(offset));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_employee_row(row)?);
        }

        Ok(PageResult {
            total: u64::try_from(total).unwrap_or(0),
            records,
        })
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let status_code: i64 = row.get("status")?;
    let status = EmployeeStatus::from_code(status_code).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid status value `{status_code}` in employee.status"
        ))
    })?;

    Ok(Employee {
        id: row.get("id")?,
        username: row.get("username")?,
        password: row.get("password")?,
        name: row.get("name")?,
        phone: row.get("phone")?,
        sex: row.get("sex")?,
        id_number: row.get("id_number")?,
        status,
        create_time: row.get("create_time")?,
        update_time: row.get("update_time")?,
        create_user: row.get("create_user")?,
        update_user: row.get("update_user")?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == ErrorCode::ConstraintViolation
                && inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Builds a `LIKE` pattern matching `needle` anywhere, with wildcards escaped.
fn like_contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
