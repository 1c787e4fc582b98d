//! Core Kernel - Foundational types for the policy management system
//!
//! This crate provides the fundamental building blocks used across the
//! domain and infrastructure layers:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed policy identifiers
//! - The Chilean RUT national identifier with check-digit validation
//! - Port error types for the hexagonal boundaries

pub mod identifiers;
pub mod money;
pub mod national_id;
pub mod ports;

pub use identifiers::{IdentifierError, PolicyId};
pub use money::{Currency, Money, MoneyError};
pub use national_id::{Rut, RutError};
pub use ports::{DomainPort, PortError};
