//! Employee directory domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep validation rules next to the records they guard.
//!
//! # Invariants
//! - Employees are never hard-deleted; disabling is the only way to lock an
//!   account.

pub mod actor;
pub mod employee;
