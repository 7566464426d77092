// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// A product model from the catalog (`GET /products`).
///
/// `is_favorite` is computed server-side for the authenticated user and
/// defaults to false for anonymous requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl Product {
    pub fn category_display(&self) -> &str {
        self.category.as_deref().unwrap_or("Uncategorized")
    }

    /// Marker column for list views.
    pub fn favorite_marker(&self) -> &'static str {
        if self.is_favorite {
            "★"
        } else {
            " "
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_product_with_missing_favorite_flag() {
        // Anonymous catalog responses may omit is_favorite entirely
        let json = r#"{"id": 4, "name": "iPhone 16 Pro", "category": "Smartphones"}"#;
        let product: Product = serde_json::from_str(json).expect("parse product");
        assert_eq!(product.id, 4);
        assert_eq!(product.name, "iPhone 16 Pro");
        assert!(!product.is_favorite);
        assert_eq!(product.category_display(), "Smartphones");
    }

    #[test]
    fn test_category_display_fallback() {
        let json = r#"{"id": 1, "name": "iPhone SE", "category": null, "is_favorite": true}"#;
        let product: Product = serde_json::from_str(json).expect("parse product");
        assert_eq!(product.category_display(), "Uncategorized");
        assert_eq!(product.favorite_marker(), "★");
    }
}
