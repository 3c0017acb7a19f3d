use assert_matches::assert_matches;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use professional_cell::handlers::{
    create_professional, deactivate_professional, get_professional, list_professionals,
};
use professional_cell::models::{CreateProfessionalRequest, ListProfessionalsQuery};
use shared_models::error::AppError;
use shared_utils::test_utils::{MockStoreResponses, TestAccount, TestConfig};

fn bearer() -> TypedHeader<Authorization<Bearer>> {
    TypedHeader(Authorization::bearer("test-user-token").unwrap())
}

fn new_professional_request(registration_number: &str) -> CreateProfessionalRequest {
    CreateProfessionalRequest {
        full_name: "Dr. Carlos Lima".to_string(),
        registration_number: registration_number.to_string(),
        specialty: Some("Cardiology".to_string()),
        email: None,
        phone_number: None,
    }
}

#[tokio::test]
async fn create_professional_returns_created_record() {
    let server = MockServer::start().await;
    let config = TestConfig::with_url(&server.uri()).to_arc();

    let professional_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/professionals"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([
            MockStoreResponses::professional_row(professional_id, "Dr. Carlos Lima", "CRM-12345", true)
        ])))
        .mount(&server)
        .await;

    let (status, Json(professional)) = create_professional(
        State(config),
        bearer(),
        Extension(TestAccount::admin("admin@clinic.example").to_subject()),
        Json(new_professional_request("CRM-12345")),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(professional.id, professional_id);
    assert!(professional.active);
}

#[tokio::test]
async fn create_professional_maps_duplicate_registration_to_conflict() {
    let server = MockServer::start().await;
    let config = TestConfig::with_url(&server.uri()).to_arc();

    Mock::given(method("POST"))
        .and(path("/rest/v1/professionals"))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            MockStoreResponses::error_response("duplicate key value", "23505"),
        ))
        .mount(&server)
        .await;

    let result = create_professional(
        State(config),
        bearer(),
        Extension(TestAccount::admin("admin@clinic.example").to_subject()),
        Json(new_professional_request("CRM-12345")),
    )
    .await;

    assert_matches!(result, Err(AppError::Conflict(_)));
}

#[tokio::test]
async fn create_professional_is_admin_only() {
    let config = TestConfig::default().to_arc();

    let result = create_professional(
        State(config),
        bearer(),
        Extension(TestAccount::front_desk("desk@clinic.example").to_subject()),
        Json(new_professional_request("CRM-12345")),
    )
    .await;

    assert_matches!(result, Err(AppError::Forbidden(_)));
}

#[tokio::test]
async fn clinician_can_read_professionals() {
    let server = MockServer::start().await;
    let config = TestConfig::with_url(&server.uri()).to_arc();

    let professional_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/professionals"))
        .and(query_param("id", format!("eq.{}", professional_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            MockStoreResponses::professional_row(professional_id, "Dr. Carlos Lima", "CRM-12345", true)
        ])))
        .mount(&server)
        .await;

    let Json(professional) = get_professional(
        State(config),
        bearer(),
        Extension(TestAccount::clinician("doc@clinic.example").to_subject()),
        Path(professional_id),
    )
    .await
    .unwrap();

    assert_eq!(professional.id, professional_id);
}

#[tokio::test]
async fn list_defaults_to_active_records() {
    let server = MockServer::start().await;
    let config = TestConfig::with_url(&server.uri()).to_arc();

    Mock::given(method("GET"))
        .and(path("/rest/v1/professionals"))
        .and(query_param("active", "eq.true"))
        .and(query_param("order", "full_name.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            MockStoreResponses::professional_row(Uuid::new_v4(), "Dr. Carlos Lima", "CRM-12345", true)
        ])))
        .mount(&server)
        .await;

    let Json(professionals) = list_professionals(
        State(config),
        bearer(),
        Extension(TestAccount::front_desk("desk@clinic.example").to_subject()),
        Query(ListProfessionalsQuery { active: None }),
    )
    .await
    .unwrap();

    assert_eq!(professionals.len(), 1);
}

#[tokio::test]
async fn deactivate_missing_professional_is_not_found() {
    let server = MockServer::start().await;
    let config = TestConfig::with_url(&server.uri()).to_arc();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/professionals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let result = deactivate_professional(
        State(config),
        bearer(),
        Extension(TestAccount::admin("admin@clinic.example").to_subject()),
        Path(Uuid::new_v4()),
    )
    .await;

    assert_matches!(result, Err(AppError::NotFound(_)));
}

#[tokio::test]
async fn deactivate_is_admin_only() {
    let config = TestConfig::default().to_arc();

    let result = deactivate_professional(
        State(config),
        bearer(),
        Extension(TestAccount::clinician("doc@clinic.example").to_subject()),
        Path(Uuid::new_v4()),
    )
    .await;

    assert_matches!(result, Err(AppError::Forbidden(_)));
}
