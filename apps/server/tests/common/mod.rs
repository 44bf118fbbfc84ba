#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::ConnectInfo,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value;
use smartbudget_server::{api::app_router, build_state, config::Config};
use tempfile::TempDir;
use tower::ServiceExt;

pub const PASSWORD: &str = "s3cret-pass";

/// A fully wired app on a throwaway database and audit log.
pub struct TestApp {
    pub router: Router,
    pub config: Config,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(customize: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::from_env();
        config.db_path = dir.path().join("smartbudget.db").to_string_lossy().into_owned();
        config.audit_log_path = dir.path().join("logs").join("audit.log");
        config.secret_key = Some("0123456789abcdef0123456789abcdef".to_string());
        config.rate_limit.enabled = false;
        config.admin_email = None;
        customize(&mut config);

        let state = build_state(&config).await.unwrap();
        let router = app_router(state, &config);
        Self {
            router,
            config,
            _dir: dir,
        }
    }

    pub fn client(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookies: HashMap::new(),
            peer: None,
        }
    }

    pub fn audit_log(&self) -> String {
        std::fs::read_to_string(&self.config.audit_log_path).unwrap_or_default()
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).unwrap()
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    pub fn assert_redirect(&self, to: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.text());
        assert_eq!(self.location(), Some(to));
    }
}

/// Browser stand-in: keeps cookies between requests.
pub struct TestClient {
    router: Router,
    cookies: HashMap<String, String>,
    peer: Option<SocketAddr>,
}

impl TestClient {
    /// Requests appear to come from `addr`, as `into_make_service_with_connect_info` would report.
    pub fn from_peer(mut self, addr: SocketAddr) -> Self {
        self.peer = Some(addr);
        self
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.get(name).cloned()
    }

    pub fn set_cookie(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    pub fn forget_cookies(&mut self) {
        self.cookies.clear();
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(serde_urlencoded::to_string(fields).unwrap()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if !self.cookies.is_empty() {
            let jar = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            request
                .headers_mut()
                .insert(header::COOKIE, jar.parse().unwrap());
        }
        if let Some(addr) = self.peer {
            request.extensions_mut().insert(ConnectInfo(addr));
        }

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        for set_cookie in headers.get_all(header::SET_COOKIE) {
            self.store_cookie(set_cookie.to_str().unwrap());
        }
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    fn store_cookie(&mut self, raw: &str) {
        let mut parts = raw.split(';');
        let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
            return;
        };
        let expired = parts.any(|attr| attr.trim().eq_ignore_ascii_case("Max-Age=0"));
        if expired || value.is_empty() {
            self.cookies.remove(name.trim());
        } else {
            self.cookies
                .insert(name.trim().to_string(), value.trim().to_string());
        }
    }

    pub async fn register(&mut self, email: &str) -> TestResponse {
        self.post_form(
            "/register",
            &[
                ("email", email),
                ("password", PASSWORD),
                ("confirm_password", PASSWORD),
            ],
        )
        .await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> TestResponse {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }

    /// Registers and logs in, leaving the session cookie in the jar.
    pub async fn sign_up(&mut self, email: &str) {
        self.register(email).await.assert_redirect("/login");
        self.login(email, PASSWORD).await.assert_redirect("/dashboard");
    }

    pub async fn dashboard(&mut self) -> Value {
        let response = self.get("/dashboard").await;
        assert_eq!(response.status, StatusCode::OK, "body: {}", response.text());
        response.json()
    }

    pub async fn csrf_token(&mut self) -> String {
        self.dashboard().await["csrfToken"]
            .as_str()
            .unwrap()
            .to_string()
    }

    pub async fn add_entry(
        &mut self,
        date: &str,
        category: &str,
        amount: &str,
        entry_type: &str,
    ) -> TestResponse {
        let token = self.csrf_token().await;
        self.post_form(
            "/dashboard",
            &[
                ("csrf_token", token.as_str()),
                ("date", date),
                ("category", category),
                ("amount", amount),
                ("type", entry_type),
            ],
        )
        .await
    }
}

pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}
