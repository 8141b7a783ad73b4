mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use common::setup_test_service;
use sift::api::SiftApi;

const BOUNDARY: &str = "sift-test-boundary";

fn setup() -> (TempDir, Router) {
    let (service, dir) = setup_test_service();
    let api = SiftApi::new(service);
    let router = api.router();
    (dir, router)
}

async fn body_json(router: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

/// Multipart body with the given (field name, optional file name, contents) parts.
fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> String {
    let mut body = String::new();
    for (name, file_name, contents) in parts {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        match file_name {
            Some(file_name) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/csv\r\n\r\n",
                name, file_name
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                name
            )),
        }
        body.push_str(contents);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

fn upload_request(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn query_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn upload_people(router: &Router) -> String {
    let csv = "name,age,city\nalice,34,Paris\nbob,27,Oslo\ncarol,45,Lima\ndave,19,Rome\nerin,52,Kyiv";
    let (status, json) = body_json(
        router.clone(),
        upload_request(&[("file", Some("people.csv"), csv)]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["uploadId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (_dir, router) = setup();
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_upload_returns_summary() {
    let (_dir, router) = setup();
    let csv = "name,age,city\nalice,34,Paris\nbob,27,Oslo\ncarol,45,Lima\ndave,19,Rome\nerin,52,Kyiv";

    let (status, json) = body_json(
        router,
        upload_request(&[("note", None, "ignored"), ("file", Some("people.csv"), csv)]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["uploadId"].as_str().unwrap().len(), 36);
    assert_eq!(
        json["summary"],
        json!({
            "columns": [
                {"name": "name", "type": "Utf8"},
                {"name": "age", "type": "Int64"},
                {"name": "city", "type": "Utf8"}
            ],
            "rowCount": 5
        })
    );
}

#[tokio::test]
async fn test_upload_keeps_first_file_only() {
    let (_dir, router) = setup();

    let (status, json) = body_json(
        router,
        upload_request(&[
            ("file", Some("first.csv"), "a\n1\n2"),
            ("file", Some("second.csv"), "b,c\nx,y"),
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["summary"]["columns"], json!([{"name": "a", "type": "Int64"}]));
    assert_eq!(json["summary"]["rowCount"], 2);
}

#[tokio::test]
async fn test_upload_without_file() {
    let (_dir, router) = setup();

    let (status, json) = body_json(router, upload_request(&[("note", None, "hello")])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file provided");
}

#[tokio::test]
async fn test_upload_requires_multipart() {
    let (_dir, router) = setup();
    let req = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from("a,b\n1,2"))
        .unwrap();

    let (status, json) = body_json(router, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Request must be multipart/form-data");
}

#[tokio::test]
async fn test_upload_of_empty_file_fails_ingestion() {
    let (_dir, router) = setup();

    let (status, json) =
        body_json(router, upload_request(&[("file", Some("empty.csv"), "")])).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INGESTION_FAILED");
}

#[tokio::test]
async fn test_upload_then_query() {
    let (_dir, router) = setup();
    let upload_id = upload_people(&router).await;

    let (status, json) = body_json(
        router,
        query_request(json!({
            "uploadId": upload_id,
            "sql": "SELECT name, age FROM tablename WHERE age > 30 ORDER BY age;"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["truncated"], false);
    assert!(json["executionTimeMs"].is_u64());
    assert_eq!(
        json["columns"],
        json!([{"name": "name", "type": "Utf8"}, {"name": "age", "type": "Int64"}])
    );
    assert_eq!(
        json["rows"],
        json!([
            {"name": "alice", "age": 34},
            {"name": "carol", "age": 45},
            {"name": "erin", "age": 52}
        ])
    );
}

#[tokio::test]
async fn test_query_rejects_mutation() {
    let (_dir, router) = setup();
    let upload_id = upload_people(&router).await;

    let (status, json) = body_json(
        router.clone(),
        query_request(json!({"uploadId": upload_id, "sql": "DROP TABLE tablename"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "NOT_A_READ_QUERY");

    let (status, json) = body_json(
        router,
        query_request(json!({"uploadId": upload_id, "sql": "SELECT COUNT(*) AS n FROM tablename"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["rows"][0]["n"], 5);
}

#[tokio::test]
async fn test_query_engine_error() {
    let (_dir, router) = setup();
    let upload_id = upload_people(&router).await;

    let (status, json) = body_json(
        router,
        query_request(json!({"uploadId": upload_id, "sql": "SELECT * FROM tablename WHERE"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "QUERY_FAILED");
    assert!(!json["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_query_request_validation() {
    let (_dir, router) = setup();

    let (status, json) = body_json(router.clone(), query_request(json!({"sql": "SELECT 1"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "uploadId is required");

    let (status, json) = body_json(
        router.clone(),
        query_request(json!({"uploadId": "   ", "sql": "SELECT 1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "uploadId is required");

    let req = Request::builder()
        .method("POST")
        .uri("/api/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, json) = body_json(router, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid JSON body");
}

#[tokio::test]
async fn test_query_unknown_or_invalid_upload() {
    let (_dir, router) = setup();

    let (status, json) = body_json(
        router.clone(),
        query_request(json!({"uploadId": "../etc", "sql": "SELECT 1"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "INVALID_UPLOAD_ID");

    let (status, json) = body_json(
        router,
        query_request(json!({
            "uploadId": "6f1c2b8e-4d7a-4e2b-9a51-0c3d2e1f4a5b",
            "sql": "SELECT 1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "UPLOAD_NOT_FOUND");
}

#[tokio::test]
async fn test_missing_sql_is_empty_query() {
    let (_dir, router) = setup();
    let upload_id = upload_people(&router).await;

    let (status, json) = body_json(router, query_request(json!({"uploadId": upload_id}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "EMPTY_QUERY");
}
