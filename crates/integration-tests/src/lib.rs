//! Integration tests for Commande.
//!
//! Tests drive the full router in-process with `tower::ServiceExt::oneshot`,
//! against temporary data, credential and export directories. The webhook
//! endpoint is a `wiremock` server.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p commande-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `http_routes` - Login, order form, submission, estimate and download
//! - `order_submission` - Webhook gating of history commits
//! - `order_store` - History files on disk
//! - `authentication` - Credential file and password hashing
//! - `csv_export` - Per-record CSV files

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::path::PathBuf;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use tempfile::TempDir;
use tower::ServiceExt;

use commande_core::{StoredCredential, Username};
use commande_server::services::auth::hash_password;
use commande_server::store::{CredentialRepository, OrderStore};
use commande_server::{AppState, CommandeConfig, app};

/// Name of the session cookie set by the server.
pub const SESSION_COOKIE: &str = "commande_session";

/// A response with its body read.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The `Location` header, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// The `name=value` pair of the session cookie, if one was set.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(SESSION_COOKIE))
            .and_then(|v| v.split(';').next())
            .map(str::to_owned)
    }
}

/// Isolated server instance over temporary directories.
pub struct TestContext {
    pub dir: TempDir,
    pub router: Router,
    pub config: CommandeConfig,
}

impl TestContext {
    /// Server with default settings and no webhook or export.
    pub async fn new() -> Self {
        Self::with_env(&[]).await
    }

    /// Server with extra environment settings.
    ///
    /// Data, credential and export locations always point into the
    /// context's temporary directory. The credential file holds
    /// `alice` / `pw1`.
    pub async fn with_env(extra: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().unwrap();

        let mut env: HashMap<String, String> = HashMap::new();
        env.insert(
            "COMMANDE_DATA_DIR".into(),
            dir.path().join("data").display().to_string(),
        );
        env.insert(
            "COMMANDE_CREDENTIALS_FILE".into(),
            dir.path().join("users.json").display().to_string(),
        );
        for (key, value) in extra {
            env.insert((*key).to_string(), (*value).to_string());
        }

        let config = CommandeConfig::from_lookup(|key| env.get(key).cloned()).unwrap();

        CredentialRepository::new(config.credentials_file.clone())
            .insert(StoredCredential {
                username: Username::parse("alice").unwrap(),
                password_hash: hash_password("pw1").unwrap(),
            })
            .await
            .unwrap();

        let router = app(AppState::new(config.clone()).unwrap());

        Self {
            dir,
            router,
            config,
        }
    }

    /// Directory inside the context for exports.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.dir.path().join("exports")
    }

    /// The order store the server writes to.
    #[must_use]
    pub fn store(&self) -> OrderStore {
        OrderStore::new(self.config.data_dir.clone())
    }

    /// Send a request through the router.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// GET `uri`, with an optional session cookie.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// POST a urlencoded form to `uri`, with an optional session cookie.
    pub async fn post_form(&self, uri: &str, form: &[(&str, &str)], cookie: Option<&str>) -> TestResponse {
        let body = form
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    /// Log in and return the session cookie.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post_form(
                "/auth/login",
                &[("username", username), ("password", password)],
                None,
            )
            .await;
        assert_eq!(response.location(), Some("/orders"), "login failed");
        response.session_cookie().unwrap()
    }
}

/// Order form fields for 10 kg of fresh chicken.
#[must_use]
pub fn poulet_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("product", "Poulet"),
        ("unit", "Kilogram"),
        ("quantity", "10"),
        ("depot", "Fresh"),
        ("packaging", "Caisse"),
        ("notes", ""),
    ]
}
