//! Domain events for the policy aggregate
//!
//! Events record the state changes of a policy. They accumulate in the
//! aggregate's buffer and are drained by the orchestration layer after a
//! successful save, where they feed the audit log. Nothing here persists
//! or redelivers them.

use chrono::{DateTime, Utc};
use core_kernel::{PolicyId, Rut};
use serde::{Deserialize, Serialize};

use crate::status::PolicyStatus;

/// Domain events emitted by the Policy aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PolicyEvent {
    /// A policy was created and entered the Pending state
    PolicyCreated {
        policy_id: PolicyId,
        policy_number: String,
        client_rut: Rut,
        occurred_at: DateTime<Utc>,
    },

    /// A policy moved to a new lifecycle status
    PolicyStatusUpdated {
        policy_id: PolicyId,
        policy_number: String,
        old_status: PolicyStatus,
        new_status: PolicyStatus,
        occurred_at: DateTime<Utc>,
    },
}

impl PolicyEvent {
    /// Returns the policy ID associated with this event
    pub fn policy_id(&self) -> PolicyId {
        match self {
            PolicyEvent::PolicyCreated { policy_id, .. } => *policy_id,
            PolicyEvent::PolicyStatusUpdated { policy_id, .. } => *policy_id,
        }
    }

    /// Returns when this event occurred
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PolicyEvent::PolicyCreated { occurred_at, .. } => *occurred_at,
            PolicyEvent::PolicyStatusUpdated { occurred_at, .. } => *occurred_at,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            PolicyEvent::PolicyCreated { .. } => "PolicyCreated",
            PolicyEvent::PolicyStatusUpdated { .. } => "PolicyStatusUpdated",
        }
    }
}
