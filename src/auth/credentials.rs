// Allow dead code: Infrastructure methods for future use
#![allow(dead_code)]

use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "pricewatch";

/// Opt-in "remember me" storage for the login password, keyed by email.
///
/// Only the password goes to the OS keychain; bearer tokens live in the
/// session file and are invalidated by the server.
pub struct CredentialStore;

impl CredentialStore {
    /// Remember the password for an email in the OS keychain
    pub fn remember(email: &str, password: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, email)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(password)
            .context("Failed to store password in keychain")?;
        Ok(())
    }

    /// Recall the remembered password for an email
    pub fn recall(email: &str) -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, email)
            .context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("No remembered password for this account")
    }

    /// Forget the remembered password for an email
    pub fn forget(email: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, email)
            .context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete credential from keychain")?;
        Ok(())
    }

    /// Check whether a password is remembered for an email
    pub fn is_remembered(email: &str) -> bool {
        Entry::new(SERVICE_NAME, email)
            .map(|entry| entry.get_password().is_ok())
            .unwrap_or(false)
    }
}
