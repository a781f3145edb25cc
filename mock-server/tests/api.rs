use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{comms_app, work_app};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(format!("/api/v1{uri}"))
        .header(http::header::CONTENT_TYPE, "application/json")
        .header("X-Org-Id", "1")
        .header("X-User-Id", "u1")
        .body(body.to_string())
        .unwrap()
}

async fn send(app: &mut Router, req: Request<String>) -> axum::response::Response {
    use tower::Service;
    ServiceExt::<Request<String>>::ready(app)
        .await
        .unwrap()
        .call(req)
        .await
        .unwrap()
}

// --- health & identity ---

#[tokio::test]
async fn health_needs_no_identity() {
    let resp = work_app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "work");
}

#[tokio::test]
async fn missing_identity_header_returns_detail() {
    let resp = comms_app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/orgs/1/memos")
                .header("X-Org-Id", "1")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["detail"], "missing X-User-Id header");
}

// --- work ---

#[tokio::test]
async fn list_workspaces_empty() {
    let resp = work_app()
        .oneshot(request("GET", "/workspaces?skip=0&limit=50", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, serde_json::json!([]));
}

#[tokio::test]
async fn get_workspace_not_found() {
    let resp = work_app()
        .oneshot(request("GET", "/workspaces/nope", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["detail"], "workspace not found");
}

#[tokio::test]
async fn work_rejects_patch() {
    let resp = work_app()
        .oneshot(request("PATCH", "/workspaces/nope", "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn invalid_pagination_returns_422() {
    let resp = work_app()
        .oneshot(request("GET", "/workspaces?skip=abc", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn tasks_are_scoped_filtered_and_paginated() {
    let mut app = work_app();

    for (ws, assignee) in [("ws1", "u1"), ("ws1", "u2"), ("ws1", "u1"), ("ws2", "u1")] {
        let body = format!(r#"{{"title":"t","assignee_id":"{assignee}"}}"#);
        let resp = send(&mut app, request("POST", &format!("/workspaces/{ws}/tasks"), &body)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = body_json(resp).await;
        assert_eq!(created["workspace_id"], ws);
        assert_eq!(created["created_by"], "u1");
    }

    let resp = send(&mut app, request("GET", "/workspaces/ws1/tasks?assignee_id=u1", "")).await;
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 2);

    let resp = send(&mut app, request("GET", "/workspaces/ws1/tasks?skip=1&limit=1", "")).await;
    let page = body_json(resp).await;
    assert_eq!(page.as_array().unwrap().len(), 1);
    assert_eq!(page[0]["assignee_id"], "u2");

    let resp = send(&mut app, request("GET", "/tasks?assignee_id=u1", "")).await;
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn task_in_other_workspace_is_not_found() {
    let mut app = work_app();
    let resp = send(&mut app, request("POST", "/workspaces/ws1/tasks", r#"{"title":"a"}"#)).await;
    let id = body_json(resp).await["id"].as_str().unwrap().to_string();

    let resp = send(&mut app, request("GET", &format!("/workspaces/ws2/tasks/{id}"), "")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["detail"], "task not found");
}

#[tokio::test]
async fn workspace_crud_lifecycle() {
    let mut app = work_app();

    // create
    let resp = send(&mut app, request("POST", "/workspaces", r#"{"name":"Acme"}"#)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["name"], "Acme");
    let id = created["id"].as_str().unwrap().to_string();

    // get
    let resp = send(&mut app, request("GET", &format!("/workspaces/{id}"), "")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, created);

    // update merges fields, id is immutable
    let resp = send(
        &mut app,
        request("PUT", &format!("/workspaces/{id}"), r#"{"description":"d","id":"x"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["name"], "Acme");
    assert_eq!(updated["description"], "d");
    assert_eq!(updated["id"], id.as_str());

    // delete
    let resp = send(&mut app, request("DELETE", &format!("/workspaces/{id}"), "")).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // gone
    let resp = send(&mut app, request("DELETE", &format!("/workspaces/{id}"), "")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- comms ---

#[tokio::test]
async fn memo_lifecycle_uses_patch_and_org_scope() {
    let mut app = comms_app();

    let resp = send(&mut app, request("POST", "/orgs/7/memos", r#"{"title":"Hi","type":"policy"}"#)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let memo = body_json(resp).await;
    assert_eq!(memo["org_id"], "7");
    let id = memo["id"].as_str().unwrap().to_string();

    let resp = send(&mut app, request("GET", "/orgs/8/memos", "")).await;
    assert_eq!(body_json(resp).await, serde_json::json!([]));
    let resp = send(&mut app, request("GET", "/orgs/7/memos?type=policy", "")).await;
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);

    let resp = send(&mut app, request("PUT", &format!("/memos/{id}"), r#"{"title":"x"}"#)).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let resp = send(&mut app, request("PATCH", &format!("/memos/{id}"), r#"{"title":"Bye"}"#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["title"], "Bye");

    let resp = send(&mut app, request("DELETE", &format!("/memos/{id}"), "")).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&mut app, request("GET", &format!("/memos/{id}"), "")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["detail"], "memo not found");
}

#[tokio::test]
async fn announcements_list_by_workspace_and_get_by_id() {
    let mut app = comms_app();
    let resp = send(
        &mut app,
        request("POST", "/workspaces/ws1/announcements", r#"{"title":"Launch","priority":"high"}"#),
    )
    .await;
    let id = body_json(resp).await["id"].as_str().unwrap().to_string();

    let resp = send(&mut app, request("GET", "/workspaces/ws1/announcements?priority=high", "")).await;
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);

    let resp = send(&mut app, request("GET", &format!("/announcements/{id}"), "")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["workspace_id"], "ws1");
}
