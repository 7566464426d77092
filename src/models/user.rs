// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// Current account profile from `GET /v1/users/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub created_at: Option<String>,
}

impl UserProfile {
    /// Short identity line for the status bar.
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            &self.email
        } else {
            &self.username
        }
    }
}

/// Bearer token issued by `POST /v1/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_auth_token() {
        let json = r#"{"access_token": "eyJhbGciOiJIUzI1NiJ9.abc.def", "token_type": "bearer"}"#;
        let token: AuthToken = serde_json::from_str(json).expect("parse token");
        assert_eq!(token.token_type, "bearer");
        assert!(token.access_token.starts_with("eyJ"));
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let profile = UserProfile {
            username: String::new(),
            email: "alice@example.com".to_string(),
            created_at: None,
        };
        assert_eq!(profile.display_name(), "alice@example.com");
    }
}
