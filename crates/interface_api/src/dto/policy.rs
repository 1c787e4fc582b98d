//! Policy DTOs
//!
//! The wire shapes of the policy endpoints. Requests carry bare decimals
//! in the home currency; projections render money through `format()` and
//! dates in ISO form. Field names are camelCase on the wire.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_policy::Policy;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePolicyRequest {
    #[validate(length(min = 1, message = "Policy number is required"))]
    pub policy_number: String,
    #[validate(length(min = 1, message = "Client RUT is required"))]
    pub client_rut: String,
    #[validate(length(min = 1, message = "Client name is required"))]
    pub client_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub client_email: String,
    pub premium: Decimal,
    pub coverage: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
    pub insurance_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePolicyStatusRequest {
    pub status: String,
}

/// Query parameters of the listing endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPoliciesParams {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
    pub status: Option<String>,
    pub client_rut: Option<String>,
}

fn default_page_size() -> u32 {
    10
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePolicyResponse {
    pub policy_id: String,
    pub policy_number: String,
    /// Localized status label
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Policy> for CreatePolicyResponse {
    fn from(policy: &Policy) -> Self {
        Self {
            policy_id: policy.id().to_string(),
            policy_number: policy.policy_number().to_string(),
            status: policy.status().display_name().to_string(),
            created_at: policy.created_at(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySummary {
    pub policy_id: String,
    pub policy_number: String,
    pub client_name: String,
    pub client_rut: String,
    pub premium: String,
    pub coverage: String,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub insurance_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Policy> for PolicySummary {
    fn from(policy: &Policy) -> Self {
        Self {
            policy_id: policy.id().to_string(),
            policy_number: policy.policy_number().to_string(),
            client_name: policy.client_name().to_string(),
            client_rut: policy.client_rut().canonical(),
            premium: policy.premium().format(),
            coverage: policy.coverage().format(),
            status: policy.status().code().to_string(),
            start_date: policy.start_date(),
            end_date: policy.end_date(),
            insurance_type: policy.insurance_type().map(str::to_string),
            created_at: policy.created_at(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPoliciesResponse {
    pub policies: Vec<PolicySummary>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPolicyResponse {
    pub policy_id: String,
    pub policy_number: String,
    pub client_name: String,
    pub client_rut: String,
    pub client_email: String,
    pub premium: String,
    pub coverage: String,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
    pub insurance_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Policy> for GetPolicyResponse {
    fn from(policy: &Policy) -> Self {
        Self {
            policy_id: policy.id().to_string(),
            policy_number: policy.policy_number().to_string(),
            client_name: policy.client_name().to_string(),
            client_rut: policy.client_rut().canonical(),
            client_email: policy.client_email().to_string(),
            premium: policy.premium().format(),
            coverage: policy.coverage().format(),
            status: policy.status().code().to_string(),
            start_date: policy.start_date(),
            end_date: policy.end_date(),
            description: policy.description().map(str::to_string),
            insurance_type: policy.insurance_type().map(str::to_string),
            created_at: policy.created_at(),
            updated_at: policy.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePolicyStatusResponse {
    pub policy_id: String,
    pub policy_number: String,
    /// Localized labels of the statuses before and after the transition
    pub old_status: String,
    pub new_status: String,
    pub updated_at: DateTime<Utc>,
}
