//! Policy Aggregate Root
//!
//! The Policy aggregate is the consistency boundary for policy
//! administration. All mutation goes through its methods, which validate
//! first and assign after, so a failed operation never leaves a policy
//! half-changed.
//!
//! # Invariants
//!
//! - policy number, client name and client email are non-empty
//! - premium and coverage are strictly positive amounts
//! - start date is on or before the end date and never in the past
//! - status changes follow the transition table in [`PolicyStatus`]

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Money, PolicyId, Rut};

use crate::error::PolicyError;
use crate::events::PolicyEvent;
use crate::status::PolicyStatus;

/// The Policy aggregate root
///
/// Created through [`PolicyBuilder`], which enforces the creation
/// invariants and records a `PolicyCreated` event. After creation the
/// only mutation is [`Policy::update_status`] and its conveniences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    id: PolicyId,
    policy_number: String,
    client_rut: Rut,
    client_name: String,
    client_email: String,
    premium: Money,
    coverage: Money,
    status: PolicyStatus,
    start_date: NaiveDate,
    end_date: NaiveDate,
    description: Option<String>,
    insurance_type: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Domain events awaiting drain by the orchestration layer
    #[serde(skip)]
    events: Vec<PolicyEvent>,
}

impl Policy {
    /// Returns the policy ID
    pub fn id(&self) -> PolicyId {
        self.id
    }

    /// Returns the human-readable policy number
    pub fn policy_number(&self) -> &str {
        &self.policy_number
    }

    /// Returns the client's RUT
    pub fn client_rut(&self) -> &Rut {
        &self.client_rut
    }

    /// Returns the client's name
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// Returns the client's email
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Returns the premium amount
    pub fn premium(&self) -> Money {
        self.premium
    }

    /// Returns the coverage amount
    pub fn coverage(&self) -> Money {
        self.coverage
    }

    /// Returns the current lifecycle status
    pub fn status(&self) -> PolicyStatus {
        self.status
    }

    /// Returns the coverage start date
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Returns the coverage end date
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Returns the free-form description, if any
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the insurance type code, if any
    pub fn insurance_type(&self) -> Option<&str> {
        self.insurance_type.as_deref()
    }

    /// Returns the creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last-update timestamp
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns true if the policy is currently active
    pub fn is_active(&self) -> bool {
        self.status == PolicyStatus::Active
    }

    /// Returns true if the policy is in a state that accepts changes
    pub fn can_be_modified(&self) -> bool {
        matches!(self.status, PolicyStatus::Pending | PolicyStatus::Active)
    }

    /// Moves the policy to a new lifecycle status
    ///
    /// Transitioning to the current status is a no-op: it succeeds,
    /// records no event and leaves `updated_at` untouched. Any other
    /// move is checked against the transition table.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::IllegalTransition` naming the current and
    /// requested status when the move is not allowed.
    pub fn update_status(&mut self, new_status: PolicyStatus) -> Result<(), PolicyError> {
        if self.status == new_status {
            return Ok(());
        }

        if !self.status.can_transition_to(new_status) {
            return Err(PolicyError::IllegalTransition {
                from: self.status,
                to: new_status,
            });
        }

        let old_status = self.status;
        let now = Utc::now();

        self.status = new_status;
        self.updated_at = now;

        self.events.push(PolicyEvent::PolicyStatusUpdated {
            policy_id: self.id,
            policy_number: self.policy_number.clone(),
            old_status,
            new_status,
            occurred_at: now,
        });

        Ok(())
    }

    /// Activates a pending policy
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::IllegalTransition` unless the policy is
    /// Pending. Reactivating an Inactive policy goes through
    /// [`Policy::update_status`] directly.
    pub fn activate(&mut self) -> Result<(), PolicyError> {
        if !self.status.can_be_activated() {
            return Err(PolicyError::IllegalTransition {
                from: self.status,
                to: PolicyStatus::Active,
            });
        }
        self.update_status(PolicyStatus::Active)
    }

    /// Cancels the policy
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::IllegalTransition` when the policy is in a
    /// terminal state.
    pub fn cancel(&mut self) -> Result<(), PolicyError> {
        self.update_status(PolicyStatus::Cancelled)
    }

    /// Drains the accumulated domain events
    ///
    /// Returns the buffered events in the order they were recorded and
    /// clears the buffer: each event is delivered at most once.
    pub fn pull_events(&mut self) -> Vec<PolicyEvent> {
        std::mem::take(&mut self.events)
    }

    /// Captures the persistent state of the aggregate
    pub fn snapshot(&self) -> PolicySnapshot {
        PolicySnapshot {
            id: self.id,
            policy_number: self.policy_number.clone(),
            client_rut: self.client_rut.clone(),
            client_name: self.client_name.clone(),
            client_email: self.client_email.clone(),
            premium: self.premium,
            coverage: self.coverage,
            status: self.status,
            start_date: self.start_date,
            end_date: self.end_date,
            description: self.description.clone(),
            insurance_type: self.insurance_type.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Rebuilds an aggregate from its stored state
    ///
    /// Skips creation validation and records no event: stored policies
    /// may legitimately have a start date in the past, and their
    /// creation event was already delivered.
    pub fn from_snapshot(snapshot: PolicySnapshot) -> Self {
        Self {
            id: snapshot.id,
            policy_number: snapshot.policy_number,
            client_rut: snapshot.client_rut,
            client_name: snapshot.client_name,
            client_email: snapshot.client_email,
            premium: snapshot.premium,
            coverage: snapshot.coverage,
            status: snapshot.status,
            start_date: snapshot.start_date,
            end_date: snapshot.end_date,
            description: snapshot.description,
            insurance_type: snapshot.insurance_type,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
            events: Vec::new(),
        }
    }
}

/// Storage projection of the policy aggregate
///
/// What the persistence adapter reads from and writes into its rows.
/// The event buffer is deliberately absent.
#[derive(Debug, Clone)]
pub struct PolicySnapshot {
    pub id: PolicyId,
    pub policy_number: String,
    pub client_rut: Rut,
    pub client_name: String,
    pub client_email: String,
    pub premium: Money,
    pub coverage: Money,
    pub status: PolicyStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
    pub insurance_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Builder for creating new policies
///
/// Collects the creation fields and validates them in a fixed order on
/// [`PolicyBuilder::build`]: required fields first, business rules
/// after. The first violation wins.
///
/// # Example
///
/// ```rust,ignore
/// let policy = PolicyBuilder::new()
///     .policy_number("POL-2024-001")
///     .client_rut(Rut::parse("12345678-5")?)
///     .client_name("Ana Contreras")
///     .client_email("ana@example.cl")
///     .premium(Money::of(dec!(45000))?)
///     .coverage(Money::of(dec!(25000000))?)
///     .start_date(today)
///     .end_date(today + Months::new(12))
///     .insurance_type("AUTO")
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct PolicyBuilder {
    policy_number: Option<String>,
    client_rut: Option<Rut>,
    client_name: Option<String>,
    client_email: Option<String>,
    premium: Option<Money>,
    coverage: Option<Money>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    description: Option<String>,
    insurance_type: Option<String>,
}

impl PolicyBuilder {
    /// Creates an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the policy number
    pub fn policy_number(mut self, number: impl Into<String>) -> Self {
        self.policy_number = Some(number.into());
        self
    }

    /// Sets the client's RUT
    pub fn client_rut(mut self, rut: Rut) -> Self {
        self.client_rut = Some(rut);
        self
    }

    /// Sets the client's name
    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    /// Sets the client's email
    pub fn client_email(mut self, email: impl Into<String>) -> Self {
        self.client_email = Some(email.into());
        self
    }

    /// Sets the premium amount
    pub fn premium(mut self, premium: Money) -> Self {
        self.premium = Some(premium);
        self
    }

    /// Sets the coverage amount
    pub fn coverage(mut self, coverage: Money) -> Self {
        self.coverage = Some(coverage);
        self
    }

    /// Sets the coverage start date
    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Sets the coverage end date
    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Sets the free-form description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the insurance type code
    pub fn insurance_type(mut self, insurance_type: impl Into<String>) -> Self {
        self.insurance_type = Some(insurance_type.into());
        self
    }

    /// Builds the policy
    ///
    /// Assigns a fresh identifier, forces the status to Pending, stamps
    /// creation and update times, and records a `PolicyCreated` event.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::InvalidPolicy` naming the first violated
    /// rule.
    pub fn build(self) -> Result<Policy, PolicyError> {
        let policy_number = match self.policy_number {
            Some(n) if !n.trim().is_empty() => n,
            _ => return Err(PolicyError::invalid("Policy number is required")),
        };

        let client_rut = self
            .client_rut
            .ok_or_else(|| PolicyError::invalid("Client RUT is required"))?;

        let client_name = match self.client_name {
            Some(n) if !n.trim().is_empty() => n,
            _ => return Err(PolicyError::invalid("Client name is required")),
        };

        let client_email = match self.client_email {
            Some(e) if !e.trim().is_empty() => e,
            _ => return Err(PolicyError::invalid("Client email is required")),
        };

        let premium = match self.premium {
            Some(p) if p.is_positive() => p,
            _ => return Err(PolicyError::invalid("Premium must be greater than zero")),
        };

        let coverage = match self.coverage {
            Some(c) if c.is_positive() => c,
            _ => return Err(PolicyError::invalid("Coverage must be greater than zero")),
        };

        let start_date = self
            .start_date
            .ok_or_else(|| PolicyError::invalid("Start date is required"))?;

        let end_date = self
            .end_date
            .ok_or_else(|| PolicyError::invalid("End date is required"))?;

        if start_date > end_date {
            return Err(PolicyError::invalid("Start date cannot be after end date"));
        }

        if start_date < Utc::now().date_naive() {
            return Err(PolicyError::invalid("Start date cannot be in the past"));
        }

        let id = PolicyId::generate();
        let now = Utc::now();

        let created = PolicyEvent::PolicyCreated {
            policy_id: id,
            policy_number: policy_number.clone(),
            client_rut: client_rut.clone(),
            occurred_at: now,
        };

        Ok(Policy {
            id,
            policy_number,
            client_rut,
            client_name,
            client_email,
            premium,
            coverage,
            status: PolicyStatus::initial(),
            start_date,
            end_date,
            description: self.description,
            insurance_type: self.insurance_type,
            created_at: now,
            updated_at: now,
            events: vec![created],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn test_rut() -> Rut {
        Rut::parse("12345678-5").unwrap()
    }

    fn builder() -> PolicyBuilder {
        let today = Utc::now().date_naive();
        PolicyBuilder::new()
            .policy_number("POL-2024-001")
            .client_rut(test_rut())
            .client_name("Ana Contreras")
            .client_email("ana@example.cl")
            .premium(Money::of(dec!(45000)).unwrap())
            .coverage(Money::of(dec!(25000000)).unwrap())
            .start_date(today)
            .end_date(today + Duration::days(365))
            .insurance_type("AUTO")
    }

    #[test]
    fn test_new_policy_is_pending_with_creation_event() {
        let mut policy = builder().build().unwrap();

        assert_eq!(policy.status(), PolicyStatus::Pending);
        assert_eq!(policy.created_at(), policy.updated_at());

        let events = policy.pull_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], PolicyEvent::PolicyCreated { .. }));
    }

    #[test]
    fn test_validation_order_reports_first_violation() {
        let err = PolicyBuilder::new().build().unwrap_err();
        assert_eq!(
            err,
            PolicyError::InvalidPolicy("Policy number is required".into())
        );

        let err = PolicyBuilder::new()
            .policy_number("POL-1")
            .build()
            .unwrap_err();
        assert_eq!(err, PolicyError::InvalidPolicy("Client RUT is required".into()));
    }

    #[test]
    fn test_blank_fields_are_rejected() {
        let err = builder().policy_number("   ").build().unwrap_err();
        assert_eq!(
            err,
            PolicyError::InvalidPolicy("Policy number is required".into())
        );

        let err = builder().client_name("").build().unwrap_err();
        assert_eq!(err, PolicyError::InvalidPolicy("Client name is required".into()));
    }

    #[test]
    fn test_zero_premium_is_rejected() {
        let err = builder().premium(Money::zero()).build().unwrap_err();
        assert_eq!(
            err,
            PolicyError::InvalidPolicy("Premium must be greater than zero".into())
        );
    }

    #[test]
    fn test_zero_coverage_is_rejected() {
        let err = builder().coverage(Money::zero()).build().unwrap_err();
        assert_eq!(
            err,
            PolicyError::InvalidPolicy("Coverage must be greater than zero".into())
        );
    }

    #[test]
    fn test_start_after_end_is_rejected() {
        let today = Utc::now().date_naive();
        let err = builder()
            .start_date(today + Duration::days(10))
            .end_date(today + Duration::days(5))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            PolicyError::InvalidPolicy("Start date cannot be after end date".into())
        );
    }

    #[test]
    fn test_start_in_past_is_rejected() {
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        let err = builder().start_date(yesterday).build().unwrap_err();
        assert_eq!(
            err,
            PolicyError::InvalidPolicy("Start date cannot be in the past".into())
        );
    }

    #[test]
    fn test_single_day_policy_is_accepted() {
        let today = Utc::now().date_naive();
        let policy = builder().start_date(today).end_date(today).build().unwrap();
        assert_eq!(policy.start_date(), policy.end_date());
    }

    #[test]
    fn test_update_status_happy_path() {
        let mut policy = builder().build().unwrap();
        let _ = policy.pull_events();

        policy.update_status(PolicyStatus::Active).unwrap();
        assert!(policy.is_active());

        let events = policy.pull_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            PolicyEvent::PolicyStatusUpdated {
                old_status,
                new_status,
                ..
            } => {
                assert_eq!(*old_status, PolicyStatus::Pending);
                assert_eq!(*new_status, PolicyStatus::Active);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_same_status_is_noop() {
        let mut policy = builder().build().unwrap();
        let _ = policy.pull_events();
        let updated_at = policy.updated_at();

        policy.update_status(PolicyStatus::Pending).unwrap();

        assert_eq!(policy.status(), PolicyStatus::Pending);
        assert_eq!(policy.updated_at(), updated_at);
        assert!(policy.pull_events().is_empty());
    }

    #[test]
    fn test_illegal_transition_is_rejected_without_mutation() {
        let mut policy = builder().build().unwrap();
        let _ = policy.pull_events();
        let updated_at = policy.updated_at();

        let err = policy.update_status(PolicyStatus::Expired).unwrap_err();
        assert_eq!(
            err,
            PolicyError::IllegalTransition {
                from: PolicyStatus::Pending,
                to: PolicyStatus::Expired,
            }
        );
        assert_eq!(policy.status(), PolicyStatus::Pending);
        assert_eq!(policy.updated_at(), updated_at);
        assert!(policy.pull_events().is_empty());
    }

    #[test]
    fn test_full_lifecycle_sequence() {
        let mut policy = builder().build().unwrap();

        for status in [
            PolicyStatus::Active,
            PolicyStatus::Inactive,
            PolicyStatus::Active,
            PolicyStatus::Cancelled,
        ] {
            policy.update_status(status).unwrap();
            assert_eq!(policy.status(), status);
        }

        let err = policy.update_status(PolicyStatus::Active).unwrap_err();
        assert!(matches!(err, PolicyError::IllegalTransition { .. }));
    }

    #[test]
    fn test_activate_requires_pending() {
        let mut policy = builder().build().unwrap();
        policy.activate().unwrap();
        assert!(policy.is_active());

        policy.update_status(PolicyStatus::Inactive).unwrap();
        let err = policy.activate().unwrap_err();
        assert_eq!(
            err,
            PolicyError::IllegalTransition {
                from: PolicyStatus::Inactive,
                to: PolicyStatus::Active,
            }
        );
    }

    #[test]
    fn test_cancel_follows_the_table() {
        let mut policy = builder().build().unwrap();
        policy.update_status(PolicyStatus::Active).unwrap();
        policy.update_status(PolicyStatus::Inactive).unwrap();

        // Inactive -> Cancelled is legal under the unified table
        policy.cancel().unwrap();
        assert_eq!(policy.status(), PolicyStatus::Cancelled);

        assert!(policy.cancel().is_err());
    }

    #[test]
    fn test_modifiability_follows_status() {
        let mut policy = builder().build().unwrap();
        assert!(policy.can_be_modified());

        policy.update_status(PolicyStatus::Active).unwrap();
        assert!(policy.can_be_modified());

        policy.update_status(PolicyStatus::Inactive).unwrap();
        assert!(!policy.can_be_modified());

        policy.cancel().unwrap();
        assert!(!policy.can_be_modified());
    }

    #[test]
    fn test_pull_events_is_fifo_and_drains() {
        let mut policy = builder().build().unwrap();
        policy.update_status(PolicyStatus::Active).unwrap();

        let events = policy.pull_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type(), "PolicyCreated");
        assert_eq!(events[1].event_type(), "PolicyStatusUpdated");

        assert!(policy.pull_events().is_empty());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut policy = builder().description("Seguro automotriz").build().unwrap();
        policy.update_status(PolicyStatus::Active).unwrap();

        let restored = Policy::from_snapshot(policy.snapshot());

        assert_eq!(restored.id(), policy.id());
        assert_eq!(restored.policy_number(), policy.policy_number());
        assert_eq!(restored.status(), policy.status());
        assert_eq!(restored.description(), Some("Seguro automotriz"));
        // rehydration never carries events
        assert!(Policy::from_snapshot(policy.snapshot()).pull_events().is_empty());
    }
}
