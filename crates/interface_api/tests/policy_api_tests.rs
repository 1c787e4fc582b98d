//! End-to-end tests for the policy REST API
//!
//! Runs the real router and handlers against the in-memory store, so
//! everything except PostgreSQL itself is exercised: DTO validation,
//! value-object parsing, aggregate invariants, the transition table and
//! the error-to-status mapping.

use std::sync::Arc;

use axum_test::TestServer;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use interface_api::{config::ApiConfig, create_router};
use test_utils::InMemoryPolicyStore;

fn test_server() -> TestServer {
    let store = Arc::new(InMemoryPolicyStore::new());
    let app = create_router(store, ApiConfig::default());
    TestServer::new(app).expect("router must start")
}

fn valid_request() -> Value {
    let today = Utc::now().date_naive();
    json!({
        "policyNumber": "POL-1",
        "clientRut": "12345678-5",
        "clientName": "Ana",
        "clientEmail": "ana@x.cl",
        "premium": 100,
        "coverage": 1000,
        "startDate": today.to_string(),
        "endDate": (today + Duration::days(30)).to_string(),
        "insuranceType": "AUTO"
    })
}

mod create {
    use super::*;

    #[tokio::test]
    async fn test_create_returns_201_with_pending_status() {
        let server = test_server();

        let response = server.post("/api/v1/policies").json(&valid_request()).await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["policyNumber"], "POL-1");
        assert_eq!(body["status"], "Pendiente");
        assert!(body["policyId"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_rut() {
        let server = test_server();
        let mut request = valid_request();
        request["clientRut"] = json!("12345678-9");

        let response = server.post("/api/v1/policies").json(&request).await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_email() {
        let server = test_server();
        let mut request = valid_request();
        request["clientEmail"] = json!("not-an-email");

        let response = server.post("/api/v1/policies").json(&request).await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_rejects_past_start_date() {
        let server = test_server();
        let mut request = valid_request();
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        request["startDate"] = json!(yesterday.to_string());

        let response = server.post("/api/v1/policies").json(&request).await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("Start date cannot be in the past"));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_premium() {
        let server = test_server();
        let mut request = valid_request();
        request["premium"] = json!(-100);

        let response = server.post("/api/v1/policies").json(&request).await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_single_day_policy_is_accepted() {
        let server = test_server();
        let mut request = valid_request();
        let today = Utc::now().date_naive();
        request["endDate"] = json!(today.to_string());

        let response = server.post("/api/v1/policies").json(&request).await;
        response.assert_status(axum::http::StatusCode::CREATED);
    }
}

mod get {
    use super::*;

    #[tokio::test]
    async fn test_get_round_trips_the_projection() {
        let server = test_server();
        let created: Value = server
            .post("/api/v1/policies")
            .json(&valid_request())
            .await
            .json();
        let id = created["policyId"].as_str().unwrap();

        let response = server.get(&format!("/api/v1/policies/{id}")).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["policyId"], *id);
        assert_eq!(body["clientRut"], "12345678-5");
        assert_eq!(body["clientEmail"], "ana@x.cl");
        assert_eq!(body["status"], "PENDING");
        assert_eq!(body["premium"], "$ 100.00");
        assert_eq!(body["coverage"], "$ 1000.00");
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_404() {
        let server = test_server();
        let response = server
            .get("/api/v1/policies/00000000-0000-0000-0000-000000000000")
            .await;
        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_get_malformed_id_is_400() {
        let server = test_server();
        let response = server.get("/api/v1/policies/not-a-uuid").await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }
}

mod update_status {
    use super::*;

    async fn create_policy(server: &TestServer) -> String {
        let created: Value = server
            .post("/api/v1/policies")
            .json(&valid_request())
            .await
            .json();
        created["policyId"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_activate_pending_policy() {
        let server = test_server();
        let id = create_policy(&server).await;

        let response = server
            .put(&format!("/api/v1/policies/{id}/status"))
            .json(&json!({ "status": "ACTIVE" }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["oldStatus"], "Pendiente");
        assert_eq!(body["newStatus"], "Activa");

        let fetched: Value = server.get(&format!("/api/v1/policies/{id}")).await.json();
        assert_eq!(fetched["status"], "ACTIVE");
    }

    #[tokio::test]
    async fn test_same_status_update_is_noop() {
        let server = test_server();
        let id = create_policy(&server).await;

        server
            .put(&format!("/api/v1/policies/{id}/status"))
            .json(&json!({ "status": "ACTIVE" }))
            .await
            .assert_status_ok();

        let response = server
            .put(&format!("/api/v1/policies/{id}/status"))
            .json(&json!({ "status": "ACTIVE" }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["oldStatus"], "Activa");
        assert_eq!(body["newStatus"], "Activa");
    }

    #[tokio::test]
    async fn test_illegal_transition_is_409() {
        let server = test_server();
        let id = create_policy(&server).await;

        let response = server
            .put(&format!("/api/v1/policies/{id}/status"))
            .json(&json!({ "status": "EXPIRED" }))
            .await;
        response.assert_status(axum::http::StatusCode::CONFLICT);

        let body: Value = response.json();
        assert_eq!(body["error"], "conflict");
    }

    #[tokio::test]
    async fn test_cancelled_policy_rejects_reactivation() {
        let server = test_server();
        let id = create_policy(&server).await;

        server
            .put(&format!("/api/v1/policies/{id}/status"))
            .json(&json!({ "status": "CANCELLED" }))
            .await
            .assert_status_ok();

        let response = server
            .put(&format!("/api/v1/policies/{id}/status"))
            .json(&json!({ "status": "ACTIVE" }))
            .await;
        response.assert_status(axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_blank_status_is_400() {
        let server = test_server();
        let id = create_policy(&server).await;

        let response = server
            .put(&format!("/api/v1/policies/{id}/status"))
            .json(&json!({ "status": "  " }))
            .await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("New status is required"));
    }

    #[tokio::test]
    async fn test_unknown_status_is_400() {
        let server = test_server();
        let id = create_policy(&server).await;

        let response = server
            .put(&format!("/api/v1/policies/{id}/status"))
            .json(&json!({ "status": "FROZEN" }))
            .await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_policy_is_404() {
        let server = test_server();
        let response = server
            .put("/api/v1/policies/00000000-0000-0000-0000-000000000000/status")
            .json(&json!({ "status": "ACTIVE" }))
            .await;
        response.assert_status_not_found();
    }
}

mod list {
    use super::*;

    async fn seed(server: &TestServer, number: &str, rut: &str) -> String {
        let mut request = valid_request();
        request["policyNumber"] = json!(number);
        request["clientRut"] = json!(rut);
        let created: Value = server.post("/api/v1/policies").json(&request).await.json();
        created["policyId"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_list_returns_page_metadata() {
        let server = test_server();
        seed(&server, "POL-1", "12345678-5").await;
        seed(&server, "POL-2", "12345678-5").await;
        seed(&server, "POL-3", "11111111-1").await;

        let response = server
            .get("/api/v1/policies")
            .add_query_param("page", 0)
            .add_query_param("size", 2)
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["policies"].as_array().unwrap().len(), 2);
        assert_eq!(body["total"], 3);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["size"], 2);
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let server = test_server();
        let id = seed(&server, "POL-1", "12345678-5").await;
        seed(&server, "POL-2", "12345678-5").await;

        server
            .put(&format!("/api/v1/policies/{id}/status"))
            .json(&json!({ "status": "ACTIVE" }))
            .await
            .assert_status_ok();

        let response = server
            .get("/api/v1/policies")
            .add_query_param("status", "ACTIVE")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        let policies = body["policies"].as_array().unwrap();
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0]["policyNumber"], "POL-1");
    }

    #[tokio::test]
    async fn test_list_filters_by_client_rut() {
        let server = test_server();
        seed(&server, "POL-1", "12345678-5").await;
        seed(&server, "POL-2", "11111111-1").await;

        let response = server
            .get("/api/v1/policies")
            .add_query_param("clientRut", "11111111-1")
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        let policies = body["policies"].as_array().unwrap();
        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0]["clientRut"], "11111111-1");
    }

    #[tokio::test]
    async fn test_list_rejects_bad_status_filter() {
        let server = test_server();
        let response = server
            .get("/api/v1/policies")
            .add_query_param("status", "BOGUS")
            .await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_rejects_oversized_page() {
        let server = test_server();
        let response = server
            .get("/api/v1/policies")
            .add_query_param("size", 500)
            .await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoints() {
        let server = test_server();
        server.get("/health").await.assert_status_ok();
        server.get("/health/ready").await.assert_status_ok();
    }
}
