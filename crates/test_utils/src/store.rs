//! In-memory policy store
//!
//! A `PolicyStore` adapter backed by a mutex-guarded vector. It mirrors
//! the database adapter's observable behavior (upsert by id, filters,
//! newest-first ordering, page windows) so the API tests exercise the
//! real handlers without a running PostgreSQL.

use std::sync::Mutex;

use async_trait::async_trait;

use core_kernel::{DomainPort, PolicyId, PortError};
use domain_policy::{Policy, PolicyQuery, PolicyStore};

/// In-memory `PolicyStore` for tests
#[derive(Debug, Default)]
pub struct InMemoryPolicyStore {
    policies: Mutex<Vec<Policy>>,
}

impl InMemoryPolicyStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored policies
    pub fn len(&self) -> usize {
        self.policies.lock().expect("store lock poisoned").len()
    }

    /// Returns true if the store holds no policies
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn matches(policy: &Policy, query: &PolicyQuery) -> bool {
    if let Some(status) = query.status {
        if policy.status() != status {
            return false;
        }
    }
    if let Some(rut) = &query.client_rut {
        if policy.client_rut() != rut {
            return false;
        }
    }
    true
}

#[async_trait]
impl PolicyStore for InMemoryPolicyStore {
    async fn save(&self, policy: &Policy) -> Result<(), PortError> {
        let mut policies = self.policies.lock().expect("store lock poisoned");
        match policies.iter_mut().find(|p| p.id() == policy.id()) {
            Some(existing) => *existing = policy.clone(),
            None => policies.push(policy.clone()),
        }
        Ok(())
    }

    async fn find_by_id(&self, id: PolicyId) -> Result<Option<Policy>, PortError> {
        let policies = self.policies.lock().expect("store lock poisoned");
        Ok(policies.iter().find(|p| p.id() == id).cloned())
    }

    async fn find_all(&self, query: &PolicyQuery) -> Result<Vec<Policy>, PortError> {
        let policies = self.policies.lock().expect("store lock poisoned");

        let mut matching: Vec<Policy> = policies
            .iter()
            .filter(|p| matches(p, query))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.size as usize)
            .collect())
    }

    async fn count(&self, query: &PolicyQuery) -> Result<u64, PortError> {
        let policies = self.policies.lock().expect("store lock poisoned");
        Ok(policies.iter().filter(|p| matches(p, query)).count() as u64)
    }

    async fn exists_by_policy_number(&self, policy_number: &str) -> Result<bool, PortError> {
        let policies = self.policies.lock().expect("store lock poisoned");
        Ok(policies.iter().any(|p| p.policy_number() == policy_number))
    }

    async fn delete_by_id(&self, id: PolicyId) -> Result<(), PortError> {
        let mut policies = self.policies.lock().expect("store lock poisoned");
        policies.retain(|p| p.id() != id);
        Ok(())
    }
}

impl DomainPort for InMemoryPolicyStore {}
