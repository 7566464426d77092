//! Authentication module for credential storage.
//!
//! This module provides:
//! - `TokenStore`: the storage interface the API client reads bearer
//!   tokens from and clears on authentication failure
//! - `SessionStore`: file-backed token persistence across runs
//! - `MemoryTokenStore`: in-memory store for tests and ephemeral runs
//! - `CredentialStore`: opt-in OS keychain storage of the login password
//!
//! Tokens are only invalidated by the server; a 401 response is the
//! expiry signal, and the client clears the store when it sees one.

pub mod credentials;
pub mod token;

pub use credentials::CredentialStore;
pub use token::{MemoryTokenStore, SessionData, SessionStore, TokenStore};
