//! Client-side navigation.
//!
//! Screens are addressed by the same paths the hosted web front end used,
//! so the API client's authentication recovery can reason about location
//! without knowing anything about the UI:
//!
//! - `Route`: the application's route table, with path rendering/parsing
//! - `Navigator`: the two capabilities the API client needs: read the
//!   current path, and ask for a path change
//! - `AppNavigator`: channel-backed implementation driven by the UI loop
//!
//! Navigation is two-tier: `navigate` is the in-app path and can fail
//! (the UI loop may be gone or saturated); `force_redirect` is the hard
//! fallback that always lands and costs all in-memory view state.

use std::sync::{Mutex, RwLock};

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::error;

/// Path of the login screen, the target of authentication recovery
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`, the product catalog
    Products,
    /// `/login`
    Login,
    /// `/favorites`
    Favorites,
    /// `/product/:id/history`, price trend for one model
    History { model_id: i64 },
    /// Anything else
    NotFound,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Products => "/".to_string(),
            Route::Login => LOGIN_PATH.to_string(),
            Route::Favorites => "/favorites".to_string(),
            Route::History { model_id } => format!("/product/{}/history", model_id),
            Route::NotFound => "/404".to_string(),
        }
    }

    pub fn parse(path: &str) -> Route {
        match path {
            "" | "/" => return Route::Products,
            LOGIN_PATH => return Route::Login,
            "/favorites" => return Route::Favorites,
            _ => {}
        }

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        if let ["product", id, "history"] = segments.as_slice() {
            if let Ok(model_id) = id.parse::<i64>() {
                return Route::History { model_id };
            }
        }

        Route::NotFound
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Products => "Products",
            Route::Login => "Login",
            Route::Favorites => "Favorites",
            Route::History { .. } => "History",
            Route::NotFound => "Not Found",
        }
    }
}

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("navigation target is gone")]
    Closed,

    #[error("navigation queue is full")]
    QueueFull,
}

/// The navigation capabilities the API client depends on.
///
/// `force_redirect` is infallible by contract: implementations must land
/// the redirect without returning, whatever the cost.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;

    /// In-app navigation request. May fail; callers escalate to
    /// `force_redirect` when it does.
    fn navigate(&self, path: &str) -> Result<(), NavigationError>;

    /// Hard fallback: unconditionally reset to `path`, dropping
    /// in-memory view state.
    fn force_redirect(&self, path: &str);
}

/// Size of the navigation request queue.
/// Navigation events are rare; 8 slots is already generous.
const NAV_QUEUE_SIZE: usize = 8;

/// Channel-backed `Navigator` owned by the UI loop.
///
/// `navigate` enqueues a path for the loop to apply on its next tick.
/// `force_redirect` bypasses the queue into a reset slot the loop always
/// honors, even when the queue is wedged.
pub struct AppNavigator {
    current: RwLock<String>,
    requests: mpsc::Sender<String>,
    forced: Mutex<Option<String>>,
}

impl AppNavigator {
    pub fn new() -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(NAV_QUEUE_SIZE);
        let navigator = Self {
            current: RwLock::new(Route::Products.path()),
            requests: tx,
            forced: Mutex::new(None),
        };
        (navigator, rx)
    }

    /// Publish the path the UI actually rendered. The 401 recovery's
    /// loop guard reads this, so it must track every route change.
    pub fn set_current(&self, path: &str) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = path.to_string();
    }

    /// Drain the hard-redirect slot. The UI loop checks this every tick
    /// and rebuilds its view state when it fires.
    pub fn take_forced(&self) -> Option<String> {
        self.forced
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}

impl Navigator for AppNavigator {
    fn current_path(&self) -> String {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn navigate(&self, path: &str) -> Result<(), NavigationError> {
        self.requests
            .try_send(path.to_string())
            .map_err(|err| match err {
                TrySendError::Full(_) => NavigationError::QueueFull,
                TrySendError::Closed(_) => NavigationError::Closed,
            })
    }

    fn force_redirect(&self, path: &str) {
        // The slot write cannot fail; a poisoned lock is recovered rather
        // than propagated so the hard path never dies silently.
        let mut forced = self
            .forced
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *forced = Some(path.to_string());
        error!(path, "hard redirect forced, view state will be reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths_round_trip() {
        for route in [
            Route::Products,
            Route::Login,
            Route::Favorites,
            Route::History { model_id: 4 },
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_parse_history_route() {
        assert_eq!(
            Route::parse("/product/17/history"),
            Route::History { model_id: 17 }
        );
        // Non-numeric id is not a history route
        assert_eq!(Route::parse("/product/abc/history"), Route::NotFound);
        assert_eq!(Route::parse("/product/17"), Route::NotFound);
    }

    #[test]
    fn test_parse_unknown_paths() {
        assert_eq!(Route::parse("/nope"), Route::NotFound);
        assert_eq!(Route::parse("/favorites/extra"), Route::NotFound);
        assert_eq!(Route::parse(""), Route::Products);
    }

    #[test]
    fn test_navigator_tracks_current_path() {
        let (navigator, _rx) = AppNavigator::new();
        assert_eq!(navigator.current_path(), "/");

        navigator.set_current("/favorites");
        assert_eq!(navigator.current_path(), "/favorites");
    }

    #[test]
    fn test_navigate_delivers_request() {
        let (navigator, mut rx) = AppNavigator::new();
        navigator.navigate(LOGIN_PATH).expect("navigate");
        assert_eq!(rx.try_recv().expect("request"), LOGIN_PATH);
    }

    #[test]
    fn test_navigate_fails_when_loop_is_gone() {
        let (navigator, rx) = AppNavigator::new();
        drop(rx);
        let err = navigator.navigate(LOGIN_PATH).expect_err("closed");
        assert!(matches!(err, NavigationError::Closed));
    }

    #[test]
    fn test_force_redirect_lands_without_queue() {
        let (navigator, rx) = AppNavigator::new();
        drop(rx); // queue unusable, hard path must still land
        navigator.force_redirect(LOGIN_PATH);
        assert_eq!(navigator.take_forced().as_deref(), Some(LOGIN_PATH));
        // Slot drains once
        assert!(navigator.take_forced().is_none());
    }
}
