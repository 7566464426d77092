//! REST API client module for the Price Tracker backend.
//!
//! This module provides the `ApiClient` for all outbound HTTP calls:
//! catalog, favorites, price history, scrape control, and login.
//!
//! The client owns the cross-cutting authentication behavior: every
//! request carries the stored bearer token when one exists, and a 401
//! response clears the token and redirects to the login screen before
//! the error is surfaced to the caller.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
