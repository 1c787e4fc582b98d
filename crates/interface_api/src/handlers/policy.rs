//! Policy handlers
//!
//! Thin orchestration over the domain: parse and validate the request,
//! run the aggregate operation, persist through the store port, then
//! drain the aggregate's events into the audit log.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};
use validator::Validate;

use core_kernel::{Money, PolicyId, Rut};
use domain_policy::{Policy, PolicyBuilder, PolicyError, PolicyPage, PolicyQuery, PolicyStatus};

use crate::dto::policy::*;
use crate::error::ApiError;
use crate::AppState;

/// Creates a new policy
///
/// `POST /api/v1/policies` - 201 on success, 400 on any validation
/// failure.
pub async fn create_policy(
    State(state): State<AppState>,
    Json(request): Json<CreatePolicyRequest>,
) -> Result<(StatusCode, Json<CreatePolicyResponse>), ApiError> {
    request.validate()?;

    info!(policy_number = %request.policy_number, "Creating new policy");

    let client_rut = Rut::parse(&request.client_rut)?;
    let premium = Money::of(request.premium)?;
    let coverage = Money::of(request.coverage)?;

    let mut builder = PolicyBuilder::new()
        .policy_number(request.policy_number.as_str())
        .client_rut(client_rut)
        .client_name(request.client_name.as_str())
        .client_email(request.client_email.as_str())
        .premium(premium)
        .coverage(coverage)
        .start_date(request.start_date)
        .end_date(request.end_date);

    if let Some(description) = request.description {
        builder = builder.description(description);
    }
    if let Some(insurance_type) = request.insurance_type {
        builder = builder.insurance_type(insurance_type);
    }

    let mut policy = builder.build()?;

    state.store.save(&policy).await?;
    publish_events(&mut policy);

    info!(policy_id = %policy.id(), "Policy created successfully");

    Ok((StatusCode::CREATED, Json(CreatePolicyResponse::from(&policy))))
}

/// Lists policies with paging and optional filters
///
/// `GET /api/v1/policies?page&size&status&clientRut`
pub async fn list_policies(
    State(state): State<AppState>,
    Query(params): Query<ListPoliciesParams>,
) -> Result<Json<ListPoliciesResponse>, ApiError> {
    if params.size < 1 || params.size > 100 {
        return Err(ApiError::BadRequest(format!(
            "Page size must be between 1 and 100, got {}",
            params.size
        )));
    }

    let mut query = PolicyQuery::page(params.page, params.size);

    if let Some(status) = params.status.as_deref().filter(|s| !s.trim().is_empty()) {
        query = query.with_status(status.parse::<PolicyStatus>()?);
    }
    if let Some(rut) = params.client_rut.as_deref().filter(|s| !s.trim().is_empty()) {
        query = query.with_client_rut(Rut::parse(rut)?);
    }

    let policies = state.store.find_all(&query).await?;
    let total = state.store.count(&query).await?;

    let page = PolicyPage { policies, total };
    let total_pages = page.total_pages(params.size);

    info!(count = page.policies.len(), total, "Retrieved policies");

    Ok(Json(ListPoliciesResponse {
        policies: page.policies.iter().map(PolicySummary::from).collect(),
        page: params.page,
        size: params.size,
        total,
        total_pages,
    }))
}

/// Gets a policy by its identifier
///
/// `GET /api/v1/policies/{id}` - 400 on a malformed id, 404 when absent.
pub async fn get_policy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GetPolicyResponse>, ApiError> {
    let policy_id = PolicyId::parse(&id)?;

    let policy = state
        .store
        .find_by_id(policy_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Policy not found with ID: {policy_id}")))?;

    Ok(Json(GetPolicyResponse::from(&policy)))
}

/// Updates the status of a policy
///
/// `PUT /api/v1/policies/{id}/status` - 409 when the transition is not
/// allowed by the lifecycle table.
pub async fn update_policy_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePolicyStatusRequest>,
) -> Result<Json<UpdatePolicyStatusResponse>, ApiError> {
    let policy_id = PolicyId::parse(&id)?;

    let status_text = request.status.trim();
    if status_text.is_empty() {
        return Err(PolicyError::argument("New status is required").into());
    }
    let new_status: PolicyStatus = status_text.parse()?;

    info!(%policy_id, status = %new_status, "Updating policy status");

    let mut policy = state
        .store
        .find_by_id(policy_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Policy not found with ID: {policy_id}")))?;

    let old_status = policy.status();

    if let Err(err) = policy.update_status(new_status) {
        warn!(%policy_id, %err, "Status transition rejected");
        return Err(err.into());
    }

    state.store.save(&policy).await?;
    publish_events(&mut policy);

    Ok(Json(UpdatePolicyStatusResponse {
        policy_id: policy.id().to_string(),
        policy_number: policy.policy_number().to_string(),
        old_status: old_status.display_name().to_string(),
        new_status: policy.status().display_name().to_string(),
        updated_at: policy.updated_at(),
    }))
}

/// Drains the aggregate's domain events into the audit log
///
/// At-most-once: events pulled here are gone from the buffer. Nothing
/// downstream consumes them beyond this log line.
fn publish_events(policy: &mut Policy) {
    for event in policy.pull_events() {
        info!(
            event_type = event.event_type(),
            policy_id = %event.policy_id(),
            occurred_at = %event.occurred_at(),
            "Domain event"
        );
    }
}
