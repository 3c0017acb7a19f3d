use assert_matches::assert_matches;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patient_cell::handlers::{
    create_patient, deactivate_patient, get_patient, list_patients,
};
use patient_cell::models::{CreatePatientRequest, ListPatientsQuery};
use shared_models::error::AppError;
use shared_utils::test_utils::{MockStoreResponses, TestAccount, TestConfig};

fn bearer() -> TypedHeader<Authorization<Bearer>> {
    TypedHeader(Authorization::bearer("test-user-token").unwrap())
}

fn new_patient_request(cpf: &str) -> CreatePatientRequest {
    CreatePatientRequest {
        full_name: "Ana Souza".to_string(),
        cpf: cpf.to_string(),
        date_of_birth: None,
        phone_number: None,
        email: None,
        address: None,
        clinical_summary: None,
    }
}

#[tokio::test]
async fn create_patient_returns_created_record() {
    let server = MockServer::start().await;
    let config = TestConfig::with_url(&server.uri()).to_arc();

    let patient_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("cpf", "eq.52998224725"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([
            MockStoreResponses::patient_row(patient_id, "Ana Souza", "52998224725", true)
        ])))
        .mount(&server)
        .await;

    let (status, Json(patient)) = create_patient(
        State(config),
        bearer(),
        Extension(TestAccount::front_desk("desk@clinic.example").to_subject()),
        Json(new_patient_request("52998224725")),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(patient.id, patient_id);
    assert!(patient.active);
}

#[tokio::test]
async fn create_patient_rejects_duplicate_cpf() {
    let server = MockServer::start().await;
    let config = TestConfig::with_url(&server.uri()).to_arc();

    // An inactive record still owns its CPF.
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("cpf", "eq.52998224725"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            MockStoreResponses::patient_row(Uuid::new_v4(), "Ana Souza", "52998224725", false)
        ])))
        .mount(&server)
        .await;

    let result = create_patient(
        State(config),
        bearer(),
        Extension(TestAccount::admin("admin@clinic.example").to_subject()),
        Json(new_patient_request("52998224725")),
    )
    .await;

    assert_matches!(result, Err(AppError::Conflict(_)));
}

#[tokio::test]
async fn create_patient_requires_registration_role() {
    let config = TestConfig::default().to_arc();

    let result = create_patient(
        State(config),
        bearer(),
        Extension(TestAccount::clinician("doc@clinic.example").to_subject()),
        Json(new_patient_request("52998224725")),
    )
    .await;

    assert_matches!(result, Err(AppError::Forbidden(_)));
}

#[tokio::test]
async fn get_missing_patient_is_not_found() {
    let server = MockServer::start().await;
    let config = TestConfig::with_url(&server.uri()).to_arc();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let result = get_patient(
        State(config),
        bearer(),
        Extension(TestAccount::clinician("doc@clinic.example").to_subject()),
        Path(Uuid::new_v4()),
    )
    .await;

    assert_matches!(result, Err(AppError::NotFound(_)));
}

#[tokio::test]
async fn list_defaults_to_active_records() {
    let server = MockServer::start().await;
    let config = TestConfig::with_url(&server.uri()).to_arc();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("active", "eq.true"))
        .and(query_param("order", "full_name.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            MockStoreResponses::patient_row(Uuid::new_v4(), "Ana Souza", "52998224725", true)
        ])))
        .mount(&server)
        .await;

    let Json(patients) = list_patients(
        State(config),
        bearer(),
        Extension(TestAccount::front_desk("desk@clinic.example").to_subject()),
        Query(ListPatientsQuery { active: None }),
    )
    .await
    .unwrap();

    assert_eq!(patients.len(), 1);
}

#[tokio::test]
async fn deactivate_is_admin_only() {
    let config = TestConfig::default().to_arc();

    let result = deactivate_patient(
        State(config),
        bearer(),
        Extension(TestAccount::front_desk("desk@clinic.example").to_subject()),
        Path(Uuid::new_v4()),
    )
    .await;

    assert_matches!(result, Err(AppError::Forbidden(_)));
}

#[tokio::test]
async fn deactivate_returns_no_content() {
    let server = MockServer::start().await;
    let config = TestConfig::with_url(&server.uri()).to_arc();

    let patient_id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", format!("eq.{}", patient_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            MockStoreResponses::patient_row(patient_id, "Ana Souza", "52998224725", false)
        ])))
        .mount(&server)
        .await;

    let status = deactivate_patient(
        State(config),
        bearer(),
        Extension(TestAccount::admin("admin@clinic.example").to_subject()),
        Path(patient_id),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::NO_CONTENT);
}
