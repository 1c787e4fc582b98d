//! Policy domain errors

use thiserror::Error;

use crate::status::PolicyStatus;

/// Errors that can occur in the policy domain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// A creation invariant was violated; the message names the rule
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// The requested status transition is not in the transition table
    #[error("Illegal status transition from {from} to {to}")]
    IllegalTransition {
        from: PolicyStatus,
        to: PolicyStatus,
    },

    /// A required argument was missing or unset at the boundary
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl PolicyError {
    /// Creates an invalid-policy error
    pub fn invalid(message: impl Into<String>) -> Self {
        PolicyError::InvalidPolicy(message.into())
    }

    /// Creates an invalid-argument error
    pub fn argument(message: impl Into<String>) -> Self {
        PolicyError::InvalidArgument(message.into())
    }
}
