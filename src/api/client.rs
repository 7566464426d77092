//! HTTP client for the Price Tracker REST API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests against the backend: catalog, favorites, price history,
//! scrape control, and login.
//!
//! All requests flow through two shared hooks:
//!
//! - outgoing: the bearer token is read from the injected [`TokenStore`]
//!   and attached as an Authorization header when present
//! - incoming: a 401 status clears the stored token and redirects to the
//!   login screen through the injected [`Navigator`], then the error is
//!   surfaced to the caller unchanged

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::auth::TokenStore;
use crate::models::{
    AuthToken, Favorite, FavoriteRemoved, FavoriteToggle, PriceTrend, Product, ScrapeTask,
    SystemStats, UserProfile,
};
use crate::router::{Navigator, LOGIN_PATH};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// The backend answers interactively-sized queries; 10s is the ceiling
/// before a request surfaces as a transport error.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default scrape target when no platform filter is given
const DEFAULT_SCRAPE_TARGET: &str = "All";

/// API client for the Price Tracker backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and the stores are shared behind Arcs.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// `base_url` is the backend root including the `/api` prefix, with
    /// no trailing slash. The token store and navigator are injected so
    /// tests can substitute in-memory stand-ins.
    pub fn new(
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            tokens,
            navigator,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build the Authorization header from the stored token.
    /// No token means no header; an unreadable store is treated the same
    /// way so anonymous endpoints keep working.
    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        match self.tokens.load() {
            Ok(Some(token)) => {
                headers.insert(
                    header::AUTHORIZATION,
                    header::HeaderValue::from_str(&format!("Bearer {}", token))
                        .context("Stored token is not a valid header value")?,
                );
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "failed to read stored token, sending request unauthenticated");
            }
        }
        Ok(headers)
    }

    /// Authentication-failure recovery, run before a 401 is surfaced.
    ///
    /// The token is cleared first so no later request can pick up the
    /// rejected credential, then the user is sent to the login screen
    /// unless they are already looking at it. A failing in-app redirect
    /// escalates to the hard fallback; neither outcome changes the error
    /// the caller sees.
    fn recover_unauthorized(&self) {
        if let Err(err) = self.tokens.clear() {
            warn!(error = %err, "failed to clear rejected token");
        }

        let current = self.navigator.current_path();
        if current == LOGIN_PATH {
            debug!("already on the login screen, skipping redirect");
            return;
        }

        debug!(from = %current, "redirecting to login after 401");
        if let Err(err) = self.navigator.navigate(LOGIN_PATH) {
            warn!(error = %err, "in-app redirect failed, forcing hard redirect");
            self.navigator.force_redirect(LOGIN_PATH);
        }
    }

    /// Check a completed response, running 401 recovery when needed.
    async fn check_response(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.recover_unauthorized();
            return Err(ApiError::Unauthorized.into());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body).into())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let response = self
            .http
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = self.check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        let response = self
            .http
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = self.check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let response = self
            .http
            .delete(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send DELETE request to {}", url))?;

        let response = self.check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    // ===== Endpoints =====

    /// Exchange login credentials for a bearer token.
    /// The backend speaks the OAuth2 password form: the email goes in
    /// the `username` field.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthToken> {
        let url = self.url("/v1/auth/login");
        let response = self
            .http
            .post(&url)
            .form(&[("username", email), ("password", password)])
            .send()
            .await
            .context("Failed to send login request")?;

        let response = self.check_response(response).await?;
        response
            .json()
            .await
            .context("Failed to parse login response")
    }

    /// Fetch the current user's profile
    pub async fn fetch_me(&self) -> Result<UserProfile> {
        self.get("/v1/users/me").await
    }

    /// Fetch the product catalog.
    /// Works unauthenticated; the favorite flags are only meaningful
    /// when a token is attached.
    pub async fn fetch_products(&self) -> Result<Vec<Product>> {
        self.get("/products").await
    }

    /// Fetch the current user's favorites
    pub async fn fetch_favorites(&self) -> Result<Vec<Favorite>> {
        self.get("/v1/favorites").await
    }

    /// Toggle a product's favorite state.
    /// The backend adds the favorite if absent and removes it if present;
    /// the response reports the resulting state.
    pub async fn toggle_favorite(&self, product_id: i64) -> Result<FavoriteToggle> {
        let body = serde_json::json!({ "product_id": product_id });
        self.post("/v1/favorites", &body).await
    }

    /// Remove a favorite by its favorite id (not the product id)
    pub async fn remove_favorite(&self, favorite_id: i64) -> Result<FavoriteRemoved> {
        self.delete(&format!("/v1/favorites/{}", favorite_id)).await
    }

    /// Fetch the price history series for a product model
    pub async fn fetch_price_history(&self, model_id: i64) -> Result<PriceTrend> {
        self.get(&format!("/products/{}/history", model_id)).await
    }

    /// Queue a scrape run on the backend worker.
    /// `target` filters by platform name; `None` scrapes everything.
    pub async fn trigger_scrape(&self, target: Option<&str>) -> Result<ScrapeTask> {
        let url = self.url("/tasks/scrape");
        let target = target.unwrap_or(DEFAULT_SCRAPE_TARGET);
        let response = self
            .http
            .post(&url)
            .query(&[("target", target)])
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send scrape request to {}", url))?;

        let response = self.check_response(response).await?;
        response
            .json()
            .await
            .context("Failed to parse scrape response")
    }

    /// Fetch system counters for the status line
    pub async fn fetch_stats(&self) -> Result<SystemStats> {
        self.get("/stats").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;
    use crate::router::NavigationError;
    use std::sync::Mutex;
    use std::sync::RwLock;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Navigator double recording every call the client makes.
    struct RecordingNavigator {
        current: RwLock<String>,
        fail_navigate: bool,
        navigations: Mutex<Vec<String>>,
        forced: Mutex<Vec<String>>,
    }

    impl RecordingNavigator {
        fn at(path: &str) -> Arc<Self> {
            Arc::new(Self {
                current: RwLock::new(path.to_string()),
                fail_navigate: false,
                navigations: Mutex::new(Vec::new()),
                forced: Mutex::new(Vec::new()),
            })
        }

        fn broken_at(path: &str) -> Arc<Self> {
            Arc::new(Self {
                current: RwLock::new(path.to_string()),
                fail_navigate: true,
                navigations: Mutex::new(Vec::new()),
                forced: Mutex::new(Vec::new()),
            })
        }

        fn navigations(&self) -> Vec<String> {
            self.navigations.lock().expect("lock").clone()
        }

        fn forced(&self) -> Vec<String> {
            self.forced.lock().expect("lock").clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn current_path(&self) -> String {
            self.current.read().expect("lock").clone()
        }

        fn navigate(&self, path: &str) -> Result<(), NavigationError> {
            if self.fail_navigate {
                return Err(NavigationError::Closed);
            }
            self.navigations.lock().expect("lock").push(path.to_string());
            Ok(())
        }

        fn force_redirect(&self, path: &str) {
            self.forced.lock().expect("lock").push(path.to_string());
        }
    }

    fn client(
        server: &MockServer,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<RecordingNavigator>,
    ) -> ApiClient {
        ApiClient::new(server.uri(), tokens, navigator).expect("client build")
    }

    #[tokio::test]
    async fn bearer_header_attached_when_token_present() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/users/me"))
            .and(header("Authorization", "Bearer abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "username": "alice",
                "email": "alice@example.com",
                "created_at": "2026-01-15T08:00:00"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = Arc::new(MemoryTokenStore::with_token("abc123"));
        let navigator = RecordingNavigator::at("/");
        let api = client(&server, tokens.clone(), navigator.clone());

        let profile = api.fetch_me().await.expect("profile");
        assert_eq!(profile.username, "alice");

        // 2xx leaves the stored token untouched
        assert_eq!(tokens.load().expect("load").as_deref(), Some("abc123"));
        assert!(navigator.navigations().is_empty());
    }

    #[tokio::test]
    async fn no_auth_header_when_token_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "name": "iPhone 16", "category": "Smartphones", "is_favorite": false}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = Arc::new(MemoryTokenStore::new());
        let api = client(&server, tokens, RecordingNavigator::at("/"));

        let products = api.fetch_products().await.expect("products");
        assert_eq!(products.len(), 1);

        let requests = server.received_requests().await.expect("requests");
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn unauthorized_clears_token_and_redirects_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/favorites"))
            .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = Arc::new(MemoryTokenStore::with_token("expired"));
        let navigator = RecordingNavigator::at("/favorites");
        let api = client(&server, tokens.clone(), navigator.clone());

        let err = api.fetch_favorites().await.expect_err("401 surfaces");
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Unauthorized)
        ));

        // Token deleted, exactly one redirect, no hard fallback
        assert!(tokens.load().expect("load").is_none());
        assert_eq!(navigator.navigations(), vec![LOGIN_PATH.to_string()]);
        assert!(navigator.forced().is_empty());
    }

    #[tokio::test]
    async fn unauthorized_on_login_screen_skips_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/users/me"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = Arc::new(MemoryTokenStore::with_token("stale"));
        let navigator = RecordingNavigator::at(LOGIN_PATH);
        let api = client(&server, tokens.clone(), navigator.clone());

        let err = api.fetch_me().await.expect_err("401 surfaces");
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Unauthorized)
        ));

        // Token still cleared, but no navigation issued at all
        assert!(tokens.load().expect("load").is_none());
        assert!(navigator.navigations().is_empty());
        assert!(navigator.forced().is_empty());
    }

    #[tokio::test]
    async fn broken_navigation_escalates_to_hard_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/favorites"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = Arc::new(MemoryTokenStore::with_token("expired"));
        let navigator = RecordingNavigator::broken_at("/favorites");
        let api = client(&server, tokens.clone(), navigator.clone());

        // The original error still reaches the caller
        let err = api.fetch_favorites().await.expect_err("401 surfaces");
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Unauthorized)
        ));

        assert!(tokens.load().expect("load").is_none());
        assert_eq!(navigator.forced(), vec![LOGIN_PATH.to_string()]);
    }

    #[tokio::test]
    async fn non_authentication_errors_surface_without_recovery() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/99/history"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such model"))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = Arc::new(MemoryTokenStore::with_token("abc123"));
        let navigator = RecordingNavigator::at("/");
        let api = client(&server, tokens.clone(), navigator.clone());

        let err = api.fetch_price_history(99).await.expect_err("404 surfaces");
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::NotFound(_))
        ));

        // No recovery side effects for non-401 failures
        assert_eq!(tokens.load().expect("load").as_deref(), Some("abc123"));
        assert!(navigator.navigations().is_empty());
    }

    #[tokio::test]
    async fn login_posts_password_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/login"))
            .and(body_string_contains("username=alice%40example.com"))
            .and(body_string_contains("password=hunter2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "fresh-token",
                "token_type": "bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(
            &server,
            Arc::new(MemoryTokenStore::new()),
            RecordingNavigator::at(LOGIN_PATH),
        );

        let token = api
            .login("alice@example.com", "hunter2")
            .await
            .expect("login");
        assert_eq!(token.access_token, "fresh-token");
    }

    #[tokio::test]
    async fn scrape_carries_target_filter() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tasks/scrape"))
            .and(query_param("target", "PChome"))
            .and(header("Authorization", "Bearer abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "accepted",
                "task_id": "t-1",
                "operator": "alice"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(
            &server,
            Arc::new(MemoryTokenStore::with_token("abc123")),
            RecordingNavigator::at("/"),
        );

        let task = api.trigger_scrape(Some("PChome")).await.expect("scrape");
        assert_eq!(task.status, "accepted");
    }

    #[tokio::test]
    async fn scrape_defaults_to_all_platforms() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tasks/scrape"))
            .and(query_param("target", "All"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "accepted"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(
            &server,
            Arc::new(MemoryTokenStore::new()),
            RecordingNavigator::at("/"),
        );

        api.trigger_scrape(None).await.expect("scrape");
    }
}
