use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, CheckStatus, Maintenance};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn form_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.to_string())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- entities / checks / status ---

#[tokio::test]
async fn list_entities() {
    let resp = app().oneshot(get("/entities")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let entities: Value = body_json(resp).await;
    assert_eq!(entities[0]["name"], "web01");
    assert_eq!(entities[0]["checks"], 2);
    assert_eq!(entities[1]["name"], "db01");
}

#[tokio::test]
async fn list_checks_for_unknown_entity_returns_404() {
    let resp = app().oneshot(get("/checks/nope")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_of_single_check() {
    let resp = app().oneshot(get("/status/web01/HTTP")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let status: CheckStatus = body_json(resp).await;
    assert_eq!(status.name, "HTTP");
    assert_eq!(status.state, "critical");
}

// --- acknowledgements ---

#[tokio::test]
async fn acknowledge_unknown_check_returns_404() {
    let resp = app()
        .oneshot(form_request("POST", "/acknowledgements/web01/DISK", "summary=x"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn acknowledge_with_bad_duration_returns_400() {
    let resp = app()
        .oneshot(form_request("POST", "/acknowledgements/web01/PING", "duration=soon"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- scheduled maintenance ---

#[tokio::test]
async fn create_scheduled_without_duration_returns_400() {
    let resp = app()
        .oneshot(form_request(
            "POST",
            "/scheduled_maintenances/web01/PING",
            "start_time=2013-01-01T00%3A00%3A00Z",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn scheduled_maintenance_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "POST",
            "/scheduled_maintenances/web01/PING",
            "start_time=2013-01-01T00%3A00%3A00Z&duration=3600&summary=upgrade%20kernel",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // list for the entity
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/scheduled_maintenances/web01"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let list: Vec<Maintenance> = body_json(resp).await;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].duration, 3600);
    assert_eq!(list[0].summary.as_deref(), Some("upgrade kernel"));

    // list for another check — empty
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/scheduled_maintenances/web01/HTTP"))
        .await
        .unwrap();
    let list: Vec<Maintenance> = body_json(resp).await;
    assert!(list.is_empty());

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri("/scheduled_maintenances/web01/PING?start_time=2013-01-01T00%3A00%3A00Z")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // delete again — 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri("/scheduled_maintenances/web01/PING?start_time=2013-01-01T00%3A00%3A00Z")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- outages / downtime ---

#[tokio::test]
async fn outages_echo_the_requested_window() {
    let resp = app()
        .oneshot(get("/outages/web01/PING?start_time=2013-01-01T00%3A00%3A00Z"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["check"], "PING");
    assert_eq!(body["start_time"], "2013-01-01T00:00:00Z");
    assert!(body["end_time"].is_null());
    assert_eq!(body["outages"], Value::Array(Vec::new()));
}

// --- contacts ---

#[tokio::test]
async fn contact_timezone_round_trip() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", "/contacts/21/timezone", r#"{"timezone":"Australia/Perth"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/contacts/21/timezone"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["timezone"], "Australia/Perth");
}

#[tokio::test]
async fn set_timezone_for_unknown_contact_returns_404() {
    let resp = app()
        .oneshot(json_request("PUT", "/contacts/99/timezone", r#"{"timezone":"UTC"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_contacts_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/contacts", r#"{"contacts":[{"last_name":"X"}]}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
