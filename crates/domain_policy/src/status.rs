//! Policy lifecycle states and the transition table
//!
//! The status machine is the single source of truth for which lifecycle
//! moves are legal. The dedicated `can_be_cancelled` / `can_be_activated`
//! probes are derived from the same table, so there is exactly one set of
//! rules regardless of which operation a caller reaches for.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle states of a policy
///
/// `Pending` is the sole initial state. `Cancelled` and `Expired` are
/// terminal: no transition leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyStatus {
    Pending,
    Active,
    Inactive,
    Cancelled,
    Expired,
}

/// Error produced when parsing a status code from text
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown policy status: {0}")]
pub struct ParseStatusError(pub String);

impl PolicyStatus {
    /// The state every new policy starts in
    pub fn initial() -> Self {
        PolicyStatus::Pending
    }

    /// Returns the stable upper-case code used on the wire and in storage
    pub fn code(&self) -> &'static str {
        match self {
            PolicyStatus::Pending => "PENDING",
            PolicyStatus::Active => "ACTIVE",
            PolicyStatus::Inactive => "INACTIVE",
            PolicyStatus::Cancelled => "CANCELLED",
            PolicyStatus::Expired => "EXPIRED",
        }
    }

    /// Returns the localized display label (Spanish)
    pub fn display_name(&self) -> &'static str {
        match self {
            PolicyStatus::Pending => "Pendiente",
            PolicyStatus::Active => "Activa",
            PolicyStatus::Inactive => "Inactiva",
            PolicyStatus::Cancelled => "Anulada",
            PolicyStatus::Expired => "Vencida",
        }
    }

    /// Returns the statuses reachable from this one
    pub fn allowed_transitions(&self) -> &'static [PolicyStatus] {
        match self {
            PolicyStatus::Pending => &[PolicyStatus::Active, PolicyStatus::Cancelled],
            PolicyStatus::Active => &[PolicyStatus::Inactive, PolicyStatus::Cancelled],
            PolicyStatus::Inactive => &[PolicyStatus::Active, PolicyStatus::Cancelled],
            PolicyStatus::Cancelled => &[],
            PolicyStatus::Expired => &[],
        }
    }

    /// Returns true if `next` is a legal move from this status
    pub fn can_transition_to(&self, next: PolicyStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Returns true if no transition leaves this status
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Returns true if the policy can be activated
    ///
    /// Activation is the Pending -> Active move only; reactivating an
    /// Inactive policy goes through the generic transition instead.
    pub fn can_be_activated(&self) -> bool {
        matches!(self, PolicyStatus::Pending)
    }

    /// Returns true if the policy can be cancelled
    pub fn can_be_cancelled(&self) -> bool {
        self.can_transition_to(PolicyStatus::Cancelled)
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for PolicyStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(PolicyStatus::Pending),
            "ACTIVE" => Ok(PolicyStatus::Active),
            "INACTIVE" => Ok(PolicyStatus::Inactive),
            "CANCELLED" => Ok(PolicyStatus::Cancelled),
            "EXPIRED" => Ok(PolicyStatus::Expired),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}
