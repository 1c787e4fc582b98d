//! Policy Administration Domain
//!
//! This crate implements the core policy logic of the system, following
//! Domain-Driven Design and Hexagonal Architecture principles.
//!
//! # Architecture
//!
//! The domain layer is infrastructure-agnostic, containing only business logic:
//! - **Aggregate**: Policy is the single aggregate root
//! - **Value Objects**: PolicyStatus plus the kernel's Money, PolicyId, Rut
//! - **Domain Events**: PolicyCreated, PolicyStatusUpdated
//! - **Ports**: PolicyStore, implemented by the infrastructure layer
//!
//! # Policy Lifecycle
//!
//! ```text
//! Pending -> Active <-> Inactive
//!    |         |            |
//!    +---------+------------+--> Cancelled
//!
//! Cancelled and Expired are terminal.
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::{Policy, PolicyBuilder, PolicyStatus};
//!
//! let mut policy = PolicyBuilder::new()
//!     .policy_number("POL-2024-001")
//!     .client_rut(rut)
//!     .client_name("Ana Contreras")
//!     .client_email("ana@example.cl")
//!     .premium(premium)
//!     .coverage(coverage)
//!     .start_date(start)
//!     .end_date(end)
//!     .build()?;
//!
//! policy.update_status(PolicyStatus::Active)?;
//! let events = policy.pull_events();
//! ```

pub mod aggregate;
pub mod error;
pub mod events;
pub mod ports;
pub mod status;

pub use aggregate::{Policy, PolicyBuilder, PolicySnapshot};
pub use error::PolicyError;
pub use events::PolicyEvent;
pub use ports::{PolicyPage, PolicyQuery, PolicyStore};
pub use status::{ParseStatusError, PolicyStatus};
