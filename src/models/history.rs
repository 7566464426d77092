// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// One observation in a product's price history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    /// Observation date, `YYYY-MM-DD`
    pub date: String,
    pub price: f64,
    pub platform: String,
}

/// Price history series from `GET /products/{id}/history`.
///
/// Points are ordered oldest-first by the server and may interleave
/// observations from multiple platforms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTrend {
    pub model_name: String,
    #[serde(default)]
    pub history: Vec<PricePoint>,
}

impl PriceTrend {
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn min_price(&self) -> Option<f64> {
        self.history
            .iter()
            .map(|p| p.price)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn max_price(&self) -> Option<f64> {
        self.history
            .iter()
            .map(|p| p.price)
            .max_by(|a, b| a.total_cmp(b))
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.history.last()
    }

    /// Distinct platform names in first-seen order, for the chart legend.
    pub fn platforms(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for point in &self.history {
            if !seen.contains(&point.platform.as_str()) {
                seen.push(&point.platform);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trend() -> PriceTrend {
        serde_json::from_str(
            r#"{
                "model_name": "iPhone 16 Pro",
                "history": [
                    {"date": "2026-07-01", "price": 38900.0, "platform": "Momo"},
                    {"date": "2026-07-01", "price": 39200.0, "platform": "PChome"},
                    {"date": "2026-07-15", "price": 36900.0, "platform": "Momo"}
                ]
            }"#,
        )
        .expect("parse trend")
    }

    #[test]
    fn test_min_max_latest() {
        let trend = trend();
        assert_eq!(trend.min_price(), Some(36900.0));
        assert_eq!(trend.max_price(), Some(39200.0));
        assert_eq!(trend.latest().map(|p| p.date.as_str()), Some("2026-07-15"));
    }

    #[test]
    fn test_platforms_deduplicated_in_order() {
        assert_eq!(trend().platforms(), vec!["Momo", "PChome"]);
    }

    #[test]
    fn test_empty_history_tolerated() {
        let trend: PriceTrend =
            serde_json::from_str(r#"{"model_name": "iPhone SE"}"#).expect("parse trend");
        assert!(trend.is_empty());
        assert_eq!(trend.min_price(), None);
    }
}
