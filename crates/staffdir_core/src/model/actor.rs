//! Per-request actor identity.
//!
//! # Responsibility
//! - Carry the id of whoever performs a mutation into audit fields.
//!
//! # Invariants
//! - An `ActorContext` is immutable and owned by one logical request; it is
//!   passed explicitly to every mutating service call.

use crate::model::employee::EmployeeId;

/// Actor id used for records created by bootstrap code rather than a person.
pub const SYSTEM_ACTOR_ID: EmployeeId = 0;

/// Identity of the actor performing the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorContext {
    actor_id: EmployeeId,
}

impl ActorContext {
    pub fn new(actor_id: EmployeeId) -> Self {
        Self { actor_id }
    }

    /// Context for bootstrap/seed operations.
    pub fn system() -> Self {
        Self::new(SYSTEM_ACTOR_ID)
    }

    pub fn current_actor_id(&self) -> EmployeeId {
        self.actor_id
    }
}
