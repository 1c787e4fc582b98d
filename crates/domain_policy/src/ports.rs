//! Policy domain ports
//!
//! The `PolicyStore` trait defines everything the policy domain needs
//! from its storage collaborator. Adapters implement it against a real
//! database (infra_db) or in memory (test_utils); the orchestration
//! layer receives it as `Arc<dyn PolicyStore>` at startup.

use async_trait::async_trait;

use core_kernel::{DomainPort, PolicyId, PortError, Rut};

use crate::aggregate::Policy;
use crate::status::PolicyStatus;

/// Query parameters for listing policies
///
/// Carries the two supported filters plus a fixed page window. Listing
/// always orders by creation time, newest first.
#[derive(Debug, Clone)]
pub struct PolicyQuery {
    /// Filter by lifecycle status
    pub status: Option<PolicyStatus>,
    /// Filter by client RUT
    pub client_rut: Option<Rut>,
    /// Zero-based page index
    pub page: u32,
    /// Page size
    pub size: u32,
}

impl Default for PolicyQuery {
    fn default() -> Self {
        Self {
            status: None,
            client_rut: None,
            page: 0,
            size: 10,
        }
    }
}

impl PolicyQuery {
    /// Creates a query for the given page window
    pub fn page(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            ..Default::default()
        }
    }

    /// Adds a status filter
    pub fn with_status(mut self, status: PolicyStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Adds a client RUT filter
    pub fn with_client_rut(mut self, rut: Rut) -> Self {
        self.client_rut = Some(rut);
        self
    }

    /// Returns the row offset of this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// One page of policies plus the total match count
#[derive(Debug, Clone)]
pub struct PolicyPage {
    pub policies: Vec<Policy>,
    pub total: u64,
}

impl PolicyPage {
    /// Number of pages needed for `total` rows at the given page size
    pub fn total_pages(&self, size: u32) -> u64 {
        if size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(size))
    }
}

/// Storage port for policy aggregates
///
/// Deletion exists only here: the domain has no delete operation, but
/// the storage collaborator does.
#[async_trait]
pub trait PolicyStore: DomainPort {
    /// Persists a policy, inserting or updating by id
    async fn save(&self, policy: &Policy) -> Result<(), PortError>;

    /// Finds a policy by its identifier
    async fn find_by_id(&self, id: PolicyId) -> Result<Option<Policy>, PortError>;

    /// Lists policies matching the query, newest first
    async fn find_all(&self, query: &PolicyQuery) -> Result<Vec<Policy>, PortError>;

    /// Counts policies matching the query's filters
    async fn count(&self, query: &PolicyQuery) -> Result<u64, PortError>;

    /// Returns true if a policy with this number already exists
    async fn exists_by_policy_number(&self, policy_number: &str) -> Result<bool, PortError>;

    /// Removes a policy by its identifier
    async fn delete_by_id(&self, id: PolicyId) -> Result<(), PortError>;
}
