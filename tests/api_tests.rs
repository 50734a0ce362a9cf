//! HTTP tests for the expense API
//!
//! Each test runs the full router against a SQLite file and an upload
//! directory inside its own temporary directory.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use expense_ledger::{create_router, AppState, LedgerConfig};
use serde_json::{json, Value};
use std::path::PathBuf;
use tower::ServiceExt;

const BOUNDARY: &str = "ledger-test-boundary";

struct TestApp {
    _dir: tempfile::TempDir,
    upload_dir: PathBuf,
    router: Router,
}

fn test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = LedgerConfig {
        db_path: dir.path().join("expenses.db"),
        upload_dir: dir.path().join("uploads"),
        ..LedgerConfig::default()
    };

    let state = AppState::from_config(&config).unwrap();
    TestApp {
        upload_dir: config.upload_dir.clone(),
        router: create_router(state, &config),
        _dir: dir,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn send_form(
        &self,
        method: &str,
        uri: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &[u8])>,
    ) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(multipart_body(fields, file)))
                .unwrap(),
        )
        .await
    }

    async fn create(&self, date: &str, name: &str, category: &str, amount: f64) -> Value {
        let (status, body) = self
            .post_json(
                "/api/expenses",
                json!({
                    "date": date,
                    "name": name,
                    "category": category,
                    "amount": amount,
                    "payment_method": "cash",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create failed: {}", body);
        body
    }

    fn uploaded_files(&self) -> usize {
        std::fs::read_dir(&self.upload_dir).unwrap().count()
    }
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }

    if let Some((filename, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, filename, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

const CEMENT_FORM: [(&str, &str); 6] = [
    ("date", "2024-05-01"),
    ("name", "Cement"),
    ("category", "Materials"),
    ("amount", "450.75"),
    ("payment_method", "bank transfer"),
    ("floor", "Ground"),
];

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();

    let (status, body) = app.get("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_create_and_get_expense() {
    let app = test_app();

    let created = app.create("2024-01-15", "Steel beams", "Materials", 1234.56).await;
    let id = created["id"].as_i64().unwrap();

    assert!(id > 0);
    assert_eq!(created["amount"].as_f64(), Some(1234.56));
    assert_eq!(created["date"], "2024-01-15");
    assert_eq!(created["proof_url"], Value::Null);

    let (status, fetched) = app.get(&format!("/api/expenses/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_rejects_negative_amount() {
    let app = test_app();

    let (status, body) = app
        .post_json(
            "/api/expenses",
            json!({
                "date": "2024-01-15",
                "name": "Refund",
                "category": "Misc",
                "amount": -5.0,
                "payment_method": "cash",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (_, list) = app.get("/api/expenses").await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let app = test_app();

    let (status, body) = app
        .post_json("/api/expenses", json!({ "name": "No date" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_upload_with_proof_file() {
    let app = test_app();

    let (status, created) = app
        .send_form(
            "POST",
            "/api/expenses/upload",
            &CEMENT_FORM,
            Some(("receipt.png", "image/png", &b"\x89PNG proof"[..])),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", created);
    assert_eq!(created["amount"].as_f64(), Some(450.75));
    assert_eq!(created["floor"], "Ground");

    let proof_url = created["proof_url"].as_str().unwrap().to_string();
    assert!(proof_url.starts_with("/uploads/"));
    assert!(proof_url.ends_with(".png"));
    assert_eq!(app.uploaded_files(), 1);

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri(&proof_url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"\x89PNG proof");
}

#[tokio::test]
async fn test_upload_without_file() {
    let app = test_app();

    let (status, created) = app
        .send_form(
            "POST",
            "/api/expenses/upload",
            &CEMENT_FORM,
            Some(("", "application/octet-stream", &b""[..])),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["proof_url"], Value::Null);
    assert_eq!(app.uploaded_files(), 0);
}

#[tokio::test]
async fn test_upload_rejects_invalid_date() {
    let app = test_app();

    let mut form = CEMENT_FORM;
    form[0] = ("date", "05/01/2024");

    let (status, body) = app
        .send_form(
            "POST",
            "/api/expenses/upload",
            &form,
            Some(("receipt.png", "image/png", &b"png"[..])),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(app.uploaded_files(), 0);
}

#[tokio::test]
async fn test_upload_rejects_unsupported_type() {
    let app = test_app();

    let (status, _) = app
        .send_form(
            "POST",
            "/api/expenses/upload",
            &CEMENT_FORM,
            Some(("notes.txt", "text/plain", &b"hello"[..])),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.uploaded_files(), 0);

    let (_, list) = app.get("/api/expenses").await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_upload_requires_fields() {
    let app = test_app();

    let (status, body) = app
        .send_form("POST", "/api/expenses/upload", &CEMENT_FORM[1..], None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("date"));
}

#[tokio::test]
async fn test_missing_expense_is_not_found() {
    let app = test_app();

    let (status, body) = app.get("/api/expenses/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, _) = app
        .send_form("PUT", "/api/expenses/999", &[("category", "Labor")], None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send_form("PUT", "/api/expenses/999", &[("date", "not-a-date")], None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, _) = app.get("/api/expenses/not-a-number").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_newest_first() {
    let app = test_app();

    app.create("2024-01-01", "First", "Materials", 10.0).await;
    app.create("2024-03-01", "Latest", "Labor", 20.0).await;
    app.create("2024-01-01", "Second", "Materials", 30.0).await;

    let (status, list) = app.get("/api/expenses").await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Latest", "Second", "First"]);

    let (status, slashed) = app.get("/api/expenses/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slashed, list);
}

#[tokio::test]
async fn test_search_matches_name_or_category() {
    let app = test_app();

    app.create("2024-01-01", "Portland cement", "Materials", 10.0).await;
    app.create("2024-01-02", "Mason wages", "Labor", 20.0).await;
    app.create("2024-01-03", "Bricks", "CEMENT works", 30.0).await;

    let (_, hits) = app.get("/api/expenses?q=Cement").await;
    assert_eq!(hits.as_array().unwrap().len(), 2);

    let (_, none) = app.get("/api/expenses?q=plumbing").await;
    assert_eq!(none.as_array().unwrap().len(), 0);

    let (_, all) = app.get("/api/expenses?q=").await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_stats() {
    let app = test_app();

    let (status, empty) = app.get("/api/expenses/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty["total_entries"], 0);
    assert_eq!(empty["total_expenses"].as_f64(), Some(0.0));
    assert_eq!(empty["avg_expense"].as_f64(), Some(0.0));
    assert_eq!(empty["date_range"], "-");

    app.create("2024-03-01", "Sand", "Materials", 200.0).await;
    app.create("2024-01-01", "Gravel", "Materials", 100.0).await;

    let (_, stats) = app.get("/api/expenses/stats").await;
    assert_eq!(stats["total_entries"], 2);
    assert_eq!(stats["total_expenses"].as_f64(), Some(300.0));
    assert_eq!(stats["avg_expense"].as_f64(), Some(150.0));
    assert_eq!(stats["date_range"], "2024-01-01 — 2024-03-01");
}

#[tokio::test]
async fn test_partial_update() {
    let app = test_app();

    let (_, created) = app
        .send_form("POST", "/api/expenses/upload", &CEMENT_FORM, None)
        .await;
    let uri = format!("/api/expenses/{}", created["id"]);

    let (status, updated) = app
        .send_form("PUT", &uri, &[("category", "Foundation"), ("date", "")], None)
        .await;

    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["category"], "Foundation");
    assert_eq!(updated["date"], created["date"]);
    assert_eq!(updated["name"], created["name"]);
    assert_eq!(updated["amount"], created["amount"]);
    assert_eq!(updated["floor"], created["floor"]);

    let (_, fetched) = app.get(&uri).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_update_attaches_proof() {
    let app = test_app();

    let created = app.create("2024-02-02", "Tiles", "Finishing", 80.0).await;
    let uri = format!("/api/expenses/{}", created["id"]);

    let (status, rejected) = app
        .send_form(
            "PUT",
            &uri,
            &[("amount", "90")],
            Some(("x.gif", "image/gif", &b"GIF"[..])),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", rejected);
    assert_eq!(app.uploaded_files(), 0);

    let (status, updated) = app
        .send_form(
            "PUT",
            &uri,
            &[("amount", "90.5")],
            Some(("invoice.pdf", "application/pdf", &b"%PDF-1.4"[..])),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["amount"].as_f64(), Some(90.5));
    assert!(updated["proof_url"].as_str().unwrap().ends_with(".pdf"));
    assert_eq!(app.uploaded_files(), 1);
}

#[tokio::test]
async fn test_response_headers() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
}
