// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use crate::utils::format_price;

/// A saved listing from `GET /v1/favorites`, joined server-side with the
/// listing's platform and current price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub platform_name: String,
    pub url: String,
    pub current_price: Option<f64>,
    pub created_at: Option<String>,
}

impl Favorite {
    pub fn price_display(&self) -> String {
        match self.current_price {
            Some(price) => format_price(price),
            None => "—".to_string(),
        }
    }
}

/// Response from `POST /v1/favorites`.
///
/// The endpoint toggles: posting an already-saved product removes it, and
/// `is_favorite` reports the state after the call.
#[derive(Debug, Clone, Deserialize)]
pub struct FavoriteToggle {
    pub status: String,
    pub message: Option<String>,
    pub is_favorite: bool,
}

/// Response from `DELETE /v1/favorites/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct FavoriteRemoved {
    pub status: String,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_favorite_row() {
        let json = r#"{
            "id": 7,
            "product_id": 12,
            "product_name": "iPhone 16 Pro 256GB",
            "platform_name": "Momo",
            "url": "https://www.momoshop.com.tw/goods/12345",
            "current_price": 36900.0,
            "created_at": "2026-08-01T09:30:00"
        }"#;
        let favorite: Favorite = serde_json::from_str(json).expect("parse favorite");
        assert_eq!(favorite.platform_name, "Momo");
        assert_eq!(favorite.price_display(), "NT$36,900");
    }

    #[test]
    fn test_price_display_without_price() {
        let json = r#"{
            "id": 1,
            "product_id": 2,
            "product_name": "iPad Air",
            "platform_name": "PChome",
            "url": "https://24h.pchome.com.tw/prod/abc",
            "current_price": null,
            "created_at": null
        }"#;
        let favorite: Favorite = serde_json::from_str(json).expect("parse favorite");
        assert_eq!(favorite.price_display(), "—");
    }

    #[test]
    fn test_parse_toggle_response() {
        let json = r#"{"status": "removed", "message": "removed from favorites", "is_favorite": false}"#;
        let toggle: FavoriteToggle = serde_json::from_str(json).expect("parse toggle");
        assert_eq!(toggle.status, "removed");
        assert!(!toggle.is_favorite);
    }
}
