use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use polaris_api::app::{build_app, AppServices};
use polaris_auth::{JwtClaims, Role};
use polaris_core::UserId;
use reqwest::StatusCode;
use serde_json::{json, Value};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over the in-memory store, bound to an ephemeral port.
        let app = build_app(Arc::new(AppServices::in_memory(JWT_SECRET)));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(email: &str, roles: Vec<Role>) -> String {
    let claims = JwtClaims::new(UserId::new(), email, roles, Utc::now(), ChronoDuration::minutes(10));

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn user_token() -> String {
    mint_jwt("clerk@polaris.test", vec![Role::USER])
}

async fn post_json(client: &reqwest::Client, url: String, token: &str, body: Value) -> reqwest::Response {
    client.post(url).bearer_auth(token).json(&body).send().await.unwrap()
}

async fn create(client: &reqwest::Client, url: String, token: &str, body: Value) -> Value {
    let res = post_json(client, url, token, body).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client.get(srv.url("/whoami")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(srv.url("/customers"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unauthenticated");

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn principal_is_derived_from_token() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt("root@polaris.test", vec![Role::SUPERADMIN]);

    let client = reqwest::Client::new();
    let res = client.get(srv.url("/whoami")).bearer_auth(token).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["email"], "root@polaris.test");
    assert!(body["roles"].as_array().unwrap().iter().any(|r| r == "superadmin"));
}

#[tokio::test]
async fn signup_requires_approval_before_signin() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/auth/signup"))
        .json(&json!({
            "first_name": "Ana",
            "last_name": "Reyes",
            "email": "Ana@Example.com",
            "password": "correct horse",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let pending: Value = res.json().await.unwrap();
    assert_eq!(pending["status"], "pending");
    let pending_id = pending["id"].as_str().unwrap().to_string();

    let signin = json!({"email": "ana@example.com", "password": "correct horse"});
    let res = client.post(srv.url("/auth/signin")).json(&signin).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Only a superadmin may decide.
    let res = post_json(
        &client,
        srv.url(&format!("/admin/users/{pending_id}/decision")),
        &user_token(),
        json!({"action": "approve"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let admin = mint_jwt("root@polaris.test", vec![Role::SUPERADMIN]);
    let res = post_json(
        &client,
        srv.url(&format!("/admin/users/{pending_id}/decision")),
        &admin,
        json!({"action": "approve", "role": "sales"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let outcome: Value = res.json().await.unwrap();
    assert_eq!(outcome["outcome"], "signup_approved");
    assert_eq!(outcome["user"]["role"], "sales");

    let res = client.post(srv.url("/auth/signin")).json(&signin).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let session: Value = res.json().await.unwrap();
    let token = session["token"].as_str().unwrap();

    let res = client.get(srv.url("/whoami")).bearer_auth(token).send().await.unwrap();
    let me: Value = res.json().await.unwrap();
    assert_eq!(me["email"], "ana@example.com");
    assert_eq!(me["roles"], json!(["sales"]));
}

#[tokio::test]
async fn sales_order_total_and_names_are_projected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = user_token();

    let customer = create(&client, srv.url("/customers"), &token, json!({"name": "Acme Cooling"})).await;
    let customer_id = customer["id"].as_str().unwrap().to_string();
    let project = create(
        &client,
        srv.url("/projects"),
        &token,
        json!({"name": "Tower A", "customer_id": customer_id}),
    )
    .await;
    let project_id = project["id"].as_str().unwrap().to_string();

    let order = create(
        &client,
        srv.url("/sales/orders"),
        &token,
        json!({
            "project_id": project_id,
            "customer_id": customer_id,
            "items": [
                {"description": "split type 1.5HP", "quantity": 2, "price": 100},
                {"description": "installation", "quantity": 1, "price": 50},
            ],
        }),
    )
    .await;
    assert_eq!(order["total_amount"], 250);
    assert_eq!(order["status"], "notapproved");

    let res = client
        .get(srv.url(&format!("/sales/orders/{}", order["id"].as_str().unwrap())))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let row: Value = res.json().await.unwrap();
    assert_eq!(row["customer_name"], "Acme Cooling");
    assert_eq!(row["project_name"], "Tower A");
    assert_eq!(row["total_amount"], 250);
}

#[tokio::test]
async fn invoice_with_unknown_sku_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = user_token();

    let res = post_json(
        &client,
        srv.url("/sales/invoices"),
        &token,
        json!({
            "project_id": polaris_core::DocumentId::new(),
            "customer_id": polaris_core::DocumentId::new(),
            "sales_order_id": polaris_core::DocumentId::new(),
            "items": [{"sku": "NOPE-1", "quantity": 1}],
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_reference");

    let res = client
        .get(srv.url("/sales/invoices"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let page: Value = res.json().await.unwrap();
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn report_download_carries_file_headers() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = user_token();

    create(&client, srv.url("/customers"), &token, json!({"name": "Acme Cooling", "tin": "123-456"})).await;

    let today = Utc::now().format("%Y-%m-%d").to_string();
    let res = post_json(
        &client,
        srv.url("/reports"),
        &token,
        json!({"reportType": "customer", "startDate": today, "endDate": today, "exportType": "csv"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/csv");
    assert_eq!(
        res.headers()["content-disposition"],
        "attachment; filename=customer_report.csv"
    );
    let text = res.text().await.unwrap();
    let mut lines = text.lines();
    assert!(lines.next().unwrap().starts_with("Customer Name,"));
    assert!(lines.next().unwrap().starts_with("Acme Cooling,"));
}

#[tokio::test]
async fn unsupported_export_type_is_a_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = post_json(
        &client,
        srv.url("/reports"),
        &user_token(),
        json!({"reportType": "customer", "startDate": "2024-01-01", "endDate": "2024-01-31", "exportType": "docx"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "unsupported export type");
}

#[tokio::test]
async fn listings_are_paginated_newest_first() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = user_token();

    for i in 0..3 {
        create(&client, srv.url("/customers"), &token, json!({"name": format!("Customer {i}")})).await;
    }

    let res = client
        .get(srv.url("/customers?page=2&limit=2"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let page: Value = res.json().await.unwrap();
    assert_eq!(page["total"], 3);
    assert_eq!(page["page"], 2);
    assert_eq!(page["limit"], 2);
    let items = page["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Customer 0");

    let res = client
        .get(srv.url("/customers/not-an-id"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
