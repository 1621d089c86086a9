//! End-to-end login flow against a live server on an ephemeral port.
//!
//! Boots the router with an in-memory credential store and drives it with
//! real HTTP requests, the way a client of the service would.

use anyhow::{Context, Result};
use reqwest::{header::AUTHORIZATION, StatusCode};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tollgate::{
    auth::{AuthConfig, AuthState, TokenIssuer},
    password::MIN_COST,
    store::{CredentialStore, MemoryCredentialStore},
    tollgate::serve,
};

const SIGNING_SECRET: &str = "integration-signing-secret";
const MASTER_SECRET: &str = "integration-master-secret";

struct TestServer {
    base_url: String,
    store: Arc<MemoryCredentialStore>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Result<Self> {
        let store = Arc::new(MemoryCredentialStore::new(MIN_COST));
        let config = AuthConfig::new(SecretString::from(SIGNING_SECRET.to_string()))
            .with_bootstrap_secret(Some(SecretString::from(MASTER_SECRET.to_string())));
        let state = Arc::new(AuthState::new(&config, store.clone()));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = serve(listener, state).await;
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            store,
            handle,
        })
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

#[tokio::test]
async fn alice_is_provisioned_then_welcomed_back() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();
    let credentials = json!({"username": "alice", "password": "hunter2"});

    // No Authorization header and alice unknown: rejected, nothing stored.
    let response = client
        .post(server.url("/login"))
        .json(&credentials)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(server.store.is_empty().await);

    // Correct master secret: alice is created.
    let response = client
        .post(server.url("/login"))
        .header(AUTHORIZATION, format!("Bearer {MASTER_SECRET}"))
        .json(&credentials)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["msg"], "New user created");
    let token = body["token"].as_str().context("token missing")?.to_string();
    assert!(!token.is_empty());

    let claims = TokenIssuer::new(SecretString::from(SIGNING_SECRET.to_string())).verify(&token)?;
    let alice = server
        .store
        .find_user("alice")
        .await?
        .context("alice should exist")?;
    assert_eq!(claims.user_id, alice.id.to_string());
    assert_eq!(claims.username, "alice");

    // Same credentials again without a header: returning user.
    let response = client
        .post(server.url("/login"))
        .json(&credentials)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["msg"], "Thanks for coming back!");
    assert_eq!(server.store.len().await, 1);

    Ok(())
}

#[tokio::test]
async fn token_does_not_verify_with_another_secret() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let body: Value = client
        .post(server.url("/login"))
        .header(AUTHORIZATION, format!("Bearer {MASTER_SECRET}"))
        .json(&json!({"username": "bob", "password": "correct horse"}))
        .send()
        .await?
        .json()
        .await?;
    let token = body["token"].as_str().context("token missing")?;

    let other = TokenIssuer::new(SecretString::from("some-other-secret".to_string()));
    assert!(other.verify(token).is_err());
    Ok(())
}

#[tokio::test]
async fn rejections_share_one_response() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();
    server.store.create_user("carol", "s3cret").await?;

    let wrong_password = client
        .post(server.url("/login"))
        .json(&json!({"username": "carol", "password": "guess"}))
        .send()
        .await?;
    let wrong_status = wrong_password.status();
    let wrong_body = wrong_password.text().await?;

    let bad_bootstrap = client
        .post(server.url("/login"))
        .header(AUTHORIZATION, "Bearer not-the-master")
        .json(&json!({"username": "dave", "password": "guess"}))
        .send()
        .await?;
    let bad_status = bad_bootstrap.status();
    let bad_body = bad_bootstrap.text().await?;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, bad_status);
    assert_eq!(wrong_body, bad_body);
    assert!(server.store.find_user("dave").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_bad_request() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/login"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn health_and_openapi_are_served() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let response = client.get(server.url("/health")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let health: Value = response.json().await?;
    assert_eq!(health["store_status"], "ok");

    let doc: Value = client
        .get(server.url("/openapi.json"))
        .send()
        .await?
        .json()
        .await?;
    assert!(doc["paths"]["/login"].is_object());
    Ok(())
}
