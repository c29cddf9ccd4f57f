#![cfg(feature = "web")]

mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use sheetfix::app::{AppState, router};
use sheetfix::loader::decode;
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "sheetfix-test-boundary";

fn upload_request(filename: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"spreadsheet\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::post("/api/open")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(uri: &str, payload: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn review_workflow_over_http() {
    let app = router(Arc::new(AppState::new()));

    let response = app
        .clone()
        .oneshot(upload_request("statement.xlsx", &common::statement_xlsx()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let view = body_json(response).await;
    assert_eq!(view["sheet"], "Jan");
    assert_eq!(view["sheet_names"], json!(["Jan", "Feb"]));
    assert_eq!(view["headers"][2], "Amount");
    assert_eq!(view["dirty"], false);

    let response = app
        .clone()
        .oneshot(json_request("/api/update_cell", json!({"cell": "C2", "value": "-900"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let update = body_json(response).await;
    assert_eq!(update["cell"], "C2");
    assert_eq!(update["value"], "-900");
    assert_eq!(update["dirty"], true);

    let response = app
        .clone()
        .oneshot(Request::post("/api/export").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename*=UTF-8''statement_modified.xlsx"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let reread = decode(&bytes).unwrap();
    assert_eq!(reread.grid_for("Jan").unwrap().read_cell(1, 2), "-900");

    let response = app
        .clone()
        .oneshot(Request::get("/api/sheet").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_json(response).await["dirty"], false);
}

#[tokio::test]
async fn errors_are_reported_as_json() {
    let app = router(Arc::new(AppState::new()));

    let response = app
        .clone()
        .oneshot(Request::get("/api/sheet").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(upload_request("junk.xlsx", b"0123456789"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["status"], "error");

    let response = app
        .clone()
        .oneshot(Request::post("/api/export").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    app.clone()
        .oneshot(upload_request("statement.xlsx", &common::statement_xlsx()))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(json_request("/api/select_sheet", json!({"sheet": "Mar"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "unknown sheet 'Mar'");

    let response = app
        .clone()
        .oneshot(json_request("/api/update_cell", json!({"cell": "1A", "value": "x"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(Request::post("/api/clear").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .oneshot(Request::get("/api/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = body_json(response).await;
    assert_eq!(status["open"], false);
}

#[tokio::test]
async fn cells_past_sheet_limits_are_bad_requests() {
    let app = router(Arc::new(AppState::new()));
    app.clone()
        .oneshot(upload_request("statement.xlsx", &common::statement_xlsx()))
        .await
        .unwrap();

    for payload in [
        json!({"row": u64::MAX, "col": 0, "value": "x"}),
        json!({"row": 4_000_000_000u64, "col": 0, "value": "x"}),
        json!({"row": 0, "col": 16_384, "value": "x"}),
        json!({"cell": "A1048577", "value": "x"}),
    ] {
        let response = app
            .clone()
            .oneshot(json_request("/api/update_cell", payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["status"], "error");
    }

    let response = app
        .oneshot(Request::get("/api/sheet").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let view = body_json(response).await;
    assert_eq!(view["dirty"], false);
    assert_eq!(view["total_rows"], 5);
}

#[tokio::test]
async fn review_page_renders_names_as_text() {
    let app = router(Arc::new(AppState::new()));
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    // Sheet names and headers come from the uploaded file.
    assert!(!page.contains("innerHTML"));
    assert!(page.contains("option.textContent = n"));
    assert!(page.contains("th.textContent = h"));
}
