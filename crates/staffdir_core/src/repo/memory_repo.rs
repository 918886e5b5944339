//! In-process employee repository.
//!
//! # Responsibility
//! - Provide a database-free `EmployeeRepository` for embedding and tests.
//!
//! # Invariants
//! - Username uniqueness is checked and the row inserted under one lock, so
//!   concurrent inserts of the same username yield exactly one success.
//! - Ordering matches the SQLite implementation: `create_time DESC, id DESC`.

use crate::model::employee::{Employee, EmployeeId, EmployeePatch};
use crate::repo::employee_repo::{
    EmployeePageQuery, EmployeeRepository, PageResult, RepoError, RepoResult,
};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct State {
    last_id: EmployeeId,
    rows: BTreeMap<EmployeeId, Employee>,
}

/// Mutex-guarded map of employees keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeRepository {
    state: Mutex<State>,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EmployeeRepository for InMemoryEmployeeRepository {
    fn find_by_username(&self, username: &str) -> RepoResult<Option<Employee>> {
        Ok(self
            .lock()
            .rows
            .values()
            .find(|employee| employee.username == username)
            .cloned())
    }

    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        Ok(self.lock().rows.get(&id).cloned())
    }

    fn insert(&self, employee: &Employee) -> RepoResult<EmployeeId> {
        employee.validate()?;

        let mut state = self.lock();
        if state
            .rows
            .values()
            .any(|existing| existing.username == employee.username)
        {
            return Err(RepoError::Conflict {
                username: employee.username.clone(),
            });
        }

        state.last_id += 1;
        let id = state.last_id;
        let mut stored = employee.clone();
        stored.id = id;
        state.rows.insert(id, stored);
        Ok(id)
    }

    fn update_fields(&self, id: EmployeeId, patch: &EmployeePatch) -> RepoResult<()> {
        let mut state = self.lock();
        let current = state.rows.get(&id).ok_or(RepoError::NotFound(id))?;

        let mut updated = current.clone();
        patch.apply_to(&mut updated);
        updated.validate()?;
        state.rows.insert(id, updated);
        Ok(())
    }

    fn query_page(&self, query: &EmployeePageQuery) -> RepoResult<PageResult> {
        let needle = query.name_filter().map(str::to_lowercase);
        let state = self.lock();

        let mut matches: Vec<&Employee> = state
            .rows
            .values()
            .filter(|employee| match needle.as_deref() {
                Some(needle) => employee.name.to_lowercase().contains(needle),
                None => true,
            })
            .collect();
        matches.sort_by(|a, b| {
            b.create_time
                .cmp(&a.create_time)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = matches.len() as u64;
        let skip = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let records = matches
            .into_iter()
            .skip(skip)
            .take(query.page_size as usize)
            .cloned()
            .collect();

        Ok(PageResult { total, records })
    }
}
