//! Test data builders
//!
//! Builder for constructing test policies with sensible defaults, so
//! tests specify only the fields they care about.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{Duration, NaiveDate, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;

use core_kernel::{Money, Rut};
use domain_policy::{Policy, PolicyBuilder};

use crate::fixtures::{MoneyFixtures, RutFixtures};

static POLICY_SEQ: AtomicU32 = AtomicU32::new(1);

/// Builder for test policies
///
/// Defaults: a sequenced policy number, the fixture RUT, a faked client
/// name and email, fixture amounts, and a one-year term starting today.
pub struct TestPolicyBuilder {
    policy_number: String,
    client_rut: Rut,
    client_name: String,
    client_email: String,
    premium: Money,
    coverage: Money,
    start_date: NaiveDate,
    end_date: NaiveDate,
    insurance_type: Option<String>,
}

impl Default for TestPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPolicyBuilder {
    /// Creates a builder with default values
    pub fn new() -> Self {
        let today = Utc::now().date_naive();
        let seq = POLICY_SEQ.fetch_add(1, Ordering::Relaxed);

        Self {
            policy_number: format!("POL-TEST-{seq:06}"),
            client_rut: RutFixtures::valid(),
            client_name: Name().fake(),
            client_email: SafeEmail().fake(),
            premium: MoneyFixtures::premium(),
            coverage: MoneyFixtures::coverage(),
            start_date: today,
            end_date: today + Duration::days(365),
            insurance_type: Some("AUTO".to_string()),
        }
    }

    /// Sets the policy number
    pub fn with_policy_number(mut self, number: impl Into<String>) -> Self {
        self.policy_number = number.into();
        self
    }

    /// Sets the client RUT
    pub fn with_client_rut(mut self, rut: Rut) -> Self {
        self.client_rut = rut;
        self
    }

    /// Sets the client name
    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }

    /// Sets the premium
    pub fn with_premium(mut self, premium: Money) -> Self {
        self.premium = premium;
        self
    }

    /// Sets the coverage
    pub fn with_coverage(mut self, coverage: Money) -> Self {
        self.coverage = coverage;
        self
    }

    /// Sets the coverage period
    pub fn with_period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Sets the insurance type
    pub fn with_insurance_type(mut self, insurance_type: impl Into<String>) -> Self {
        self.insurance_type = Some(insurance_type.into());
        self
    }

    /// Builds the policy through the domain builder
    ///
    /// Panics on invalid data: a test fixture that violates the domain
    /// invariants is a bug in the test, not a scenario.
    pub fn build(self) -> Policy {
        let mut builder = PolicyBuilder::new()
            .policy_number(self.policy_number)
            .client_rut(self.client_rut)
            .client_name(self.client_name)
            .client_email(self.client_email)
            .premium(self.premium)
            .coverage(self.coverage)
            .start_date(self.start_date)
            .end_date(self.end_date);

        if let Some(insurance_type) = self.insurance_type {
            builder = builder.insurance_type(insurance_type);
        }

        builder.build().expect("test policy must satisfy invariants")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_policy::PolicyStatus;

    #[test]
    fn test_default_builder_produces_pending_policy() {
        let policy = TestPolicyBuilder::new().build();
        assert_eq!(policy.status(), PolicyStatus::Pending);
        assert!(policy.policy_number().starts_with("POL-TEST-"));
    }

    #[test]
    fn test_policy_numbers_are_sequenced() {
        let a = TestPolicyBuilder::new().build();
        let b = TestPolicyBuilder::new().build();
        assert_ne!(a.policy_number(), b.policy_number());
    }
}
