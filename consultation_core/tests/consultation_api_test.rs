use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use consultation_core::{
    create_app, get_database_pool, run_migrations, AppError, AppState, ConsultationRepository,
    ConsultationService, ConsultationStore, DatabaseConfig, DatabaseManager, MailConfig, MailError,
    Mailer, NewConsultation, OutgoingMail,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tempfile::NamedTempFile;
use tower::ServiceExt;

const VALID_FORM: &str = "name=Jane+Doe&email=jane%40example.com&phone=555-0100\
&practiceArea=Family+Law&message=Custody+question&appointmentDate=2024-03-15&appointmentTime=14%3A30";

#[derive(Default)]
struct RecordingMailer {
    fail: bool,
    sent: Mutex<Vec<OutgoingMail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        self.sent.lock().push(mail.clone());
        if self.fail {
            Err(MailError::Unavailable("relay refused connection".to_string()))
        } else {
            Ok(())
        }
    }

    fn transport_name(&self) -> &'static str {
        "recording"
    }
}

/// Fails every insert and counts the attempts.
#[derive(Default)]
struct UnavailableStore {
    attempts: AtomicUsize,
}

#[async_trait]
impl ConsultationStore for UnavailableStore {
    async fn insert(&self, _record: &NewConsultation) -> consultation_core::Result<i64> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AppError::Database("unable to open database file".to_string()))
    }
}

struct TestApp {
    router: Router,
    repository: ConsultationRepository,
    mailer: Arc<RecordingMailer>,
    _db: NamedTempFile,
}

async fn setup_app(mailer: RecordingMailer) -> TestApp {
    let temp_file = NamedTempFile::new().unwrap();
    let config = DatabaseConfig {
        url: format!("sqlite:{}", temp_file.path().display()),
        ..DatabaseConfig::default()
    };
    let pool = get_database_pool(&config).await.unwrap();
    run_migrations(pool.clone()).await.unwrap();

    let mailer = Arc::new(mailer);
    let state = AppState::with_database(DatabaseManager::new(pool.clone()), mailer.clone(), mail_config());

    TestApp {
        router: create_app(state),
        repository: ConsultationRepository::new(pool),
        mailer,
        _db: temp_file,
    }
}

fn mail_config() -> MailConfig {
    MailConfig {
        to_address: "staff@lawfirm.example".to_string(),
        from_address: "noreply@lawfirm.example".to_string(),
        ..MailConfig::default()
    }
}

fn form_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_valid_submission_is_stored_and_notified() {
    let app = setup_app(RecordingMailer::default()).await;

    let (status, body) = send(
        app.router.clone(),
        form_request(Method::POST, "/api/consultations", VALID_FORM),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body.get("warning").is_none());
    assert!(body.get("errors").is_none());

    let id = body["id"].as_i64().expect("id should be present");
    let stored = app.repository.get_by_id(id).await.unwrap().expect("record stored");
    assert_eq!(stored.name, "Jane Doe");
    assert_eq!(stored.email, "jane@example.com");
    assert_eq!(stored.practice_area, "Family Law");
    assert_eq!(stored.appointment_datetime, "2024-03-15 14:30");

    let sent = app.mailer.sent.lock();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "staff@lawfirm.example");
    assert_eq!(sent[0].from, "noreply@lawfirm.example");
    assert_eq!(sent[0].reply_to, "jane@example.com");
    assert_eq!(sent[0].subject, "New Consultation Request - Jane Doe");
    assert!(sent[0].body.contains("March 15, 2024 at 2:30 PM"));
    assert!(sent[0].body.ends_with(&format!("Request ID: #{}", id)));
}

#[tokio::test]
async fn test_legacy_path_accepts_submissions() {
    let app = setup_app(RecordingMailer::default()).await;

    let (status, body) = send(
        app.router.clone(),
        form_request(Method::POST, "/submit_consultation", VALID_FORM),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(app.repository.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_missing_fields_are_all_reported() {
    let app = setup_app(RecordingMailer::default()).await;

    let (status, body) = send(
        app.router.clone(),
        form_request(Method::POST, "/api/consultations", "name=Jane&phone=+++"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(
        body["errors"],
        serde_json::json!([
            "Email is required",
            "Phone is required",
            "Practice area is required",
            "Message is required",
            "Appointment date is required",
            "Appointment time is required"
        ])
    );
    assert_eq!(app.repository.count().await.unwrap(), 0);
    assert!(app.mailer.sent.lock().is_empty());
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    let app = setup_app(RecordingMailer::default()).await;
    let form = VALID_FORM.replace("jane%40example.com", "jane.example.com");

    let (status, body) = send(app.router.clone(), form_request(Method::POST, "/api/consultations", &form)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], serde_json::json!(["Invalid email format"]));
}

#[tokio::test]
async fn test_email_with_rfc_special_characters_is_accepted() {
    let app = setup_app(RecordingMailer::default()).await;
    let form = VALID_FORM.replace("jane%40example.com", "jane%21doe%40example.com");

    let (status, body) = send(app.router.clone(), form_request(Method::POST, "/api/consultations", &form)).await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(app.mailer.sent.lock()[0].reply_to, "jane!doe@example.com");
}

#[tokio::test]
async fn test_repeated_key_keeps_last_value() {
    let app = setup_app(RecordingMailer::default()).await;
    let form = format!("{}&name=John+Smith", VALID_FORM);

    let (status, body) = send(app.router.clone(), form_request(Method::POST, "/api/consultations", &form)).await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert!(body.get("errors").is_none());

    let id = body["id"].as_i64().unwrap();
    let stored = app.repository.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "John Smith");
    assert_eq!(stored.email, "jane@example.com");
}

#[tokio::test]
async fn test_repeated_key_reports_only_missing_fields() {
    let app = setup_app(RecordingMailer::default()).await;

    let (status, body) = send(
        app.router.clone(),
        form_request(
            Method::POST,
            "/api/consultations",
            "name=Jane&name=Jane+Doe&email=jane%40example.com&phone=555-0100&practiceArea=Tax",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        serde_json::json!([
            "Message is required",
            "Appointment date is required",
            "Appointment time is required"
        ])
    );
}

#[tokio::test]
async fn test_impossible_date_is_rejected() {
    let app = setup_app(RecordingMailer::default()).await;
    let form = VALID_FORM
        .replace("2024-03-15", "2024-02-30")
        .replace("14%3A30", "10%3A00");

    let (status, body) = send(app.router.clone(), form_request(Method::POST, "/api/consultations", &form)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        serde_json::json!({ "success": false, "message": "Invalid date/time format" })
    );
    assert_eq!(app.repository.count().await.unwrap(), 0);
    assert!(app.mailer.sent.lock().is_empty());
}

#[tokio::test]
async fn test_notification_failure_still_succeeds_with_warning() {
    let app = setup_app(RecordingMailer {
        fail: true,
        ..Default::default()
    })
    .await;

    let (status, body) = send(
        app.router.clone(),
        form_request(Method::POST, "/api/consultations", VALID_FORM),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["id"].as_i64().is_some());
    assert!(!body["warning"].as_str().unwrap_or_default().is_empty());
    assert_eq!(app.repository.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_persistence_failure_returns_500_without_notifying() {
    let store = Arc::new(UnavailableStore::default());
    let mailer = Arc::new(RecordingMailer::default());
    let service = ConsultationService::new(store.clone(), mailer.clone(), mail_config());
    let router = create_app(AppState::new(service));

    let (status, body) = send(router, form_request(Method::POST, "/api/consultations", VALID_FORM)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    let message = body["message"].as_str().unwrap();
    assert!(!message.contains("unable to open database file"));
    assert!(body.get("id").is_none());
    assert_eq!(store.attempts.load(Ordering::SeqCst), 1);
    assert!(mailer.sent.lock().is_empty());
}

#[tokio::test]
async fn test_non_post_methods_are_rejected_untouched() {
    let store = Arc::new(UnavailableStore::default());
    let mailer = Arc::new(RecordingMailer::default());
    let service = ConsultationService::new(store.clone(), mailer.clone(), mail_config());
    let router = create_app(AppState::new(service));

    for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
        let (status, body) = send(
            router.clone(),
            form_request(method.clone(), "/api/consultations", VALID_FORM),
        )
        .await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "method {}", method);
        assert_eq!(
            body,
            serde_json::json!({ "success": false, "message": "Method not allowed" })
        );
    }

    assert_eq!(store.attempts.load(Ordering::SeqCst), 0);
    assert!(mailer.sent.lock().is_empty());
}

#[tokio::test]
async fn test_non_form_body_is_treated_as_empty_form() {
    let app = setup_app(RecordingMailer::default()).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/consultations")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"Jane"}"#))
        .unwrap();

    let (status, body) = send(app.router.clone(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().map(|e| e.len()), Some(7));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = setup_app(RecordingMailer::default()).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/consultations")
        .header(header::ORIGIN, "https://lawfirm.example")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(VALID_FORM))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_health_reports_database_status() {
    let app = setup_app(RecordingMailer::default()).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app.router.clone(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database_status"], "healthy");
    assert_eq!(body["mail_transport"], "recording");
}
