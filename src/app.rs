//! Application state management for Pricewatch.
//!
//! This module contains the core `App` struct that owns the API client,
//! the session store, per-screen view state, and the background task
//! coordination. Screens are addressed through the route table in
//! `router`; the UI loop applies navigation requests (including the ones
//! issued by the API client's 401 recovery) between frames.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{CredentialStore, SessionData, SessionStore, TokenStore};
use crate::config::Config;
use crate::models::{Favorite, PriceTrend, Product, SystemStats, UserProfile};
use crate::router::{AppNavigator, Route};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// A full refresh produces a handful of messages; 32 leaves headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for email input.
/// Matches the backend's account column width.
const MAX_EMAIL_LENGTH: usize = 100;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from spawned fetch tasks back to the UI loop.
enum FetchResult {
    /// Product catalog fetched
    Products(Vec<Product>),
    /// Favorites list fetched
    Favorites(Vec<Favorite>),
    /// Current user profile fetched
    Profile(UserProfile),
    /// System counters fetched
    Stats(SystemStats),
    /// Price history for one model (model_id, series)
    History(i64, PriceTrend),
    /// Favorite toggled on the server; new state for the product
    FavoriteToggled { product_id: i64, is_favorite: bool },
    /// Favorite row deleted on the server
    FavoriteRemoved { product_id: i64 },
    /// Scrape task accepted by the backend worker
    ScrapeQueued(Option<String>),
    /// A full refresh pass finished
    RefreshComplete,
    /// A background fetch failed
    Error(String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub api: ApiClient,
    tokens: Arc<SessionStore>,
    navigator: Arc<AppNavigator>,
    nav_rx: mpsc::Receiver<String>,

    // Session identity for display; the token itself lives in the store
    pub session: Option<SessionData>,

    // Navigation
    pub route: Route,
    pub state: AppState,

    // View data
    pub products: Vec<Product>,
    pub product_selection: usize,
    pub favorites: Vec<Favorite>,
    pub favorite_selection: usize,
    pub history: Option<PriceTrend>,
    pub profile: Option<UserProfile>,
    pub stats: Option<SystemStats>,

    // Login form state
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Background task channel
    fetch_rx: mpsc::Receiver<FetchResult>,
    fetch_tx: mpsc::Sender<FetchResult>,

    // Status line
    pub status_message: Option<String>,
    pub refreshing: bool,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let data_dir = Config::data_dir()?;
        let tokens = Arc::new(SessionStore::new(data_dir));
        let session = tokens.read().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read session file");
            None
        });
        debug!(has_session = session.is_some(), "Session loaded");

        let (navigator, nav_rx) = AppNavigator::new();
        let navigator = Arc::new(navigator);

        let api = ApiClient::new(
            config.api_base_url(),
            tokens.clone(),
            navigator.clone(),
        )?;

        let (fetch_tx, fetch_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_email = std::env::var("PRICEWATCH_EMAIL")
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();
        let login_password = std::env::var("PRICEWATCH_PASSWORD").unwrap_or_default();

        Ok(Self {
            config,
            api,
            tokens,
            navigator,
            nav_rx,

            session,

            route: Route::Products,
            state: AppState::Normal,

            products: Vec::new(),
            product_selection: 0,
            favorites: Vec::new(),
            favorite_selection: 0,
            history: None,
            profile: None,
            stats: None,

            login_email,
            login_password,
            login_focus: LoginFocus::Email,
            login_error: None,

            fetch_rx,
            fetch_tx,

            status_message: None,
            refreshing: false,
        })
    }

    /// Check if a bearer token is stored.
    /// The server is the only judge of validity; a stale token simply
    /// earns a 401 and the recovery redirect.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.tokens.load(), Ok(Some(_)))
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Switch to a route, publish the new location, and kick off the
    /// data the screen needs.
    pub fn navigate(&mut self, route: Route) {
        debug!(path = %route.path(), "navigating");
        self.route = route;
        self.navigator.set_current(&route.path());

        match route {
            Route::Products => {
                if self.products.is_empty() {
                    self.refresh_all();
                }
            }
            Route::Favorites => {
                self.favorite_selection = 0;
                self.refresh_favorites();
            }
            Route::History { model_id } => {
                self.history = None;
                self.fetch_history(model_id);
            }
            Route::Login => {
                self.session = None;
                self.profile = None;
                self.login_error = None;
                self.login_focus = if self.login_email.is_empty() {
                    LoginFocus::Email
                } else {
                    LoginFocus::Password
                };
            }
            Route::NotFound => {}
        }
    }

    /// Apply a navigation request from the navigator queue (the path the
    /// API client's 401 recovery asks for arrives here).
    fn handle_nav_request(&mut self, path: &str) {
        let route = Route::parse(path);
        if route == Route::NotFound {
            warn!(path, "ignoring navigation request to unknown path");
            return;
        }
        self.navigate(route);
    }

    /// Hard redirect: drop all in-memory view state and start over at
    /// `path`. This is the fallback tier of authentication recovery and
    /// must always land.
    fn hard_reset(&mut self, path: &str) {
        info!(path, "hard redirect, resetting view state");
        self.products.clear();
        self.product_selection = 0;
        self.favorites.clear();
        self.favorite_selection = 0;
        self.history = None;
        self.profile = None;
        self.stats = None;
        self.session = None;
        self.login_password.clear();
        self.login_error = None;
        self.status_message = None;
        self.refreshing = false;
        self.state = AppState::Normal;

        let route = Route::parse(path);
        self.navigate(if route == Route::NotFound {
            Route::Login
        } else {
            route
        });
    }

    /// Drain background fetch results, navigation requests, and the
    /// forced-redirect slot. Called once per UI tick.
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.fetch_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.apply_fetch_result(result);
        }

        let mut requests = Vec::new();
        while let Ok(path) = self.nav_rx.try_recv() {
            requests.push(path);
        }
        for path in requests {
            self.handle_nav_request(&path);
        }

        // The hard path wins over everything queued before it
        if let Some(path) = self.navigator.take_forced() {
            self.hard_reset(&path);
        }
    }

    // =========================================================================
    // Background Fetches
    // =========================================================================

    async fn send_result(tx: &mpsc::Sender<FetchResult>, result: FetchResult) {
        if tx.send(result).await.is_err() {
            warn!("UI loop gone, dropping background fetch result");
        }
    }

    /// Refresh everything the current identity can see: catalog and
    /// stats always, favorites and profile when signed in.
    pub fn refresh_all(&mut self) {
        if self.refreshing {
            return;
        }
        self.refreshing = true;

        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        let authenticated = self.is_authenticated();

        tokio::spawn(async move {
            let (products, stats) = futures::join!(api.fetch_products(), api.fetch_stats());
            match products {
                Ok(data) => Self::send_result(&tx, FetchResult::Products(data)).await,
                Err(e) => {
                    Self::send_result(&tx, FetchResult::Error(format!("Catalog: {}", e))).await
                }
            }
            match stats {
                Ok(data) => Self::send_result(&tx, FetchResult::Stats(data)).await,
                Err(e) => {
                    // Counters are decoration; log and move on
                    debug!(error = %e, "Stats fetch failed");
                }
            }

            if authenticated {
                let (favorites, profile) = futures::join!(api.fetch_favorites(), api.fetch_me());
                match favorites {
                    Ok(data) => Self::send_result(&tx, FetchResult::Favorites(data)).await,
                    Err(e) => {
                        Self::send_result(&tx, FetchResult::Error(format!("Favorites: {}", e)))
                            .await
                    }
                }
                if let Ok(data) = profile {
                    Self::send_result(&tx, FetchResult::Profile(data)).await;
                }
            }

            Self::send_result(&tx, FetchResult::RefreshComplete).await;
        });
    }

    pub fn refresh_favorites(&mut self) {
        if !self.is_authenticated() {
            return;
        }
        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            match api.fetch_favorites().await {
                Ok(data) => Self::send_result(&tx, FetchResult::Favorites(data)).await,
                Err(e) => {
                    Self::send_result(&tx, FetchResult::Error(format!("Favorites: {}", e))).await
                }
            }
        });
    }

    pub fn fetch_history(&mut self, model_id: i64) {
        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            match api.fetch_price_history(model_id).await {
                Ok(data) => Self::send_result(&tx, FetchResult::History(model_id, data)).await,
                Err(e) => {
                    Self::send_result(&tx, FetchResult::Error(format!("History: {}", e))).await
                }
            }
        });
    }

    /// Toggle the selected product's favorite state on the server
    pub fn toggle_selected_favorite(&mut self) {
        if !self.is_authenticated() {
            self.status_message = Some("Sign in to manage favorites".to_string());
            return;
        }
        let Some(product) = self.products.get(self.product_selection) else {
            return;
        };
        let product_id = product.id;

        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            match api.toggle_favorite(product_id).await {
                Ok(toggle) => {
                    Self::send_result(
                        &tx,
                        FetchResult::FavoriteToggled {
                            product_id,
                            is_favorite: toggle.is_favorite,
                        },
                    )
                    .await
                }
                Err(e) => {
                    Self::send_result(&tx, FetchResult::Error(format!("Favorite: {}", e))).await
                }
            }
        });
    }

    /// Delete the selected favorite row
    pub fn remove_selected_favorite(&mut self) {
        let Some(favorite) = self.favorites.get(self.favorite_selection) else {
            return;
        };
        let favorite_id = favorite.id;
        let product_id = favorite.product_id;

        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            match api.remove_favorite(favorite_id).await {
                Ok(_) => {
                    Self::send_result(&tx, FetchResult::FavoriteRemoved { product_id }).await
                }
                Err(e) => {
                    Self::send_result(&tx, FetchResult::Error(format!("Favorite: {}", e))).await
                }
            }
        });
    }

    /// Queue a scrape run on the backend worker
    pub fn start_scrape(&mut self, target: Option<String>) {
        if !self.is_authenticated() {
            self.status_message = Some("Sign in to trigger a scrape".to_string());
            return;
        }
        self.status_message = Some("Queuing scrape...".to_string());

        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            match api.trigger_scrape(target.as_deref()).await {
                Ok(task) => Self::send_result(&tx, FetchResult::ScrapeQueued(task.task_id)).await,
                Err(e) => {
                    Self::send_result(&tx, FetchResult::Error(format!("Scrape: {}", e))).await
                }
            }
        });
    }

    fn apply_fetch_result(&mut self, result: FetchResult) {
        match result {
            FetchResult::Products(data) => {
                self.products = data;
                self.product_selection = self
                    .product_selection
                    .min(self.products.len().saturating_sub(1));
            }
            FetchResult::Favorites(data) => {
                self.favorites = data;
                self.favorite_selection = self
                    .favorite_selection
                    .min(self.favorites.len().saturating_sub(1));
            }
            FetchResult::Profile(data) => {
                self.profile = Some(data);
            }
            FetchResult::Stats(data) => {
                self.stats = Some(data);
            }
            FetchResult::History(model_id, data) => {
                // Only keep the series the screen is still looking at
                if self.route == (Route::History { model_id }) {
                    self.history = Some(data);
                }
            }
            FetchResult::FavoriteToggled {
                product_id,
                is_favorite,
            } => {
                if let Some(product) = self.products.iter_mut().find(|p| p.id == product_id) {
                    product.is_favorite = is_favorite;
                }
                self.status_message = Some(if is_favorite {
                    "Added to favorites".to_string()
                } else {
                    "Removed from favorites".to_string()
                });
                self.refresh_favorites();
            }
            FetchResult::FavoriteRemoved { product_id } => {
                if let Some(product) = self.products.iter_mut().find(|p| p.id == product_id) {
                    product.is_favorite = false;
                }
                self.status_message = Some("Removed from favorites".to_string());
                self.refresh_favorites();
            }
            FetchResult::ScrapeQueued(task_id) => {
                self.status_message = Some(match task_id {
                    Some(id) => format!("Scrape queued (task {})", id),
                    None => "Scrape queued".to_string(),
                });
            }
            FetchResult::RefreshComplete => {
                self.refreshing = false;
            }
            FetchResult::Error(message) => {
                warn!(%message, "background fetch failed");
                self.status_message = Some(message);
            }
        }
    }

    // =========================================================================
    // Login / Logout
    // =========================================================================

    /// Attempt login with the credentials from the login form
    pub async fn submit_login(&mut self) {
        let email = self.login_email.trim().to_string();
        let password = self.login_password.clone();

        if email.is_empty() || password.is_empty() {
            self.login_error = Some("Email and password required".to_string());
            return;
        }
        self.login_error = None;

        match self.api.login(&email, &password).await {
            Ok(token) => {
                let data = SessionData::new(token.access_token, email.clone());
                if let Err(e) = self.tokens.write(&data) {
                    warn!(error = %e, "Failed to save session");
                }
                if let Err(e) = CredentialStore::remember(&email, &password) {
                    warn!(error = %e, "Failed to store credentials in keychain");
                }

                self.config.last_email = Some(email);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.session = Some(data);
                self.login_password.clear();
                info!("Login successful");

                self.navigate(Route::Products);
                self.refresh_all();
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login_error = Some(login_failure_message(&e));
            }
        }
    }

    /// Sign out: drop the stored token and return to the login screen.
    /// The remembered keychain password is left alone.
    pub fn logout(&mut self) {
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "Failed to clear session");
        }
        self.favorites.clear();
        self.favorite_selection = 0;
        self.status_message = Some("Signed out".to_string());
        self.navigate(Route::Login);
    }

    // =========================================================================
    // Selection helpers
    // =========================================================================

    pub fn selected_product(&self) -> Option<&Product> {
        self.products.get(self.product_selection)
    }

    pub fn selected_favorite(&self) -> Option<&Favorite> {
        self.favorites.get(self.favorite_selection)
    }

    pub fn move_selection(&mut self, delta: i64) {
        let (selection, len) = match self.route {
            Route::Products => (&mut self.product_selection, self.products.len()),
            Route::Favorites => (&mut self.favorite_selection, self.favorites.len()),
            _ => return,
        };
        if len == 0 {
            *selection = 0;
            return;
        }
        let current = *selection as i64;
        *selection = (current + delta).clamp(0, len as i64 - 1) as usize;
    }
}

// ============================================================================
// Login form helpers
// ============================================================================

pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && !c.is_control()
}

pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && !c.is_control()
}

/// Map a login failure onto a message worth showing in the form
pub fn login_failure_message(err: &anyhow::Error) -> String {
    if matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized)) {
        return "Invalid email or password".to_string();
    }
    if let Some(inner) = err.downcast_ref::<reqwest::Error>() {
        if inner.is_timeout() {
            return "Connection timed out. Please try again.".to_string();
        }
        return "Unable to connect to the server.".to_string();
    }
    format!("Login failed: {}", err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_add_email_char() {
        assert!(can_add_email_char(0, 'a'));
        assert!(can_add_email_char(MAX_EMAIL_LENGTH - 1, '@'));
        assert!(!can_add_email_char(MAX_EMAIL_LENGTH, 'a'));
        assert!(!can_add_email_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, '!'));
        assert!(!can_add_password_char(MAX_PASSWORD_LENGTH, 'x'));
        assert!(!can_add_password_char(0, '\t'));
    }

    #[test]
    fn test_login_failure_message_unauthorized() {
        let err: anyhow::Error = ApiError::Unauthorized.into();
        assert_eq!(login_failure_message(&err), "Invalid email or password");
    }

    #[test]
    fn test_login_failure_message_other() {
        let err: anyhow::Error = ApiError::ServerError("boom".to_string()).into();
        assert!(login_failure_message(&err).starts_with("Login failed"));
    }
}
