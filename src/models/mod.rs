//! Data models for Price Tracker API entities.
//!
//! This module contains the data structures exchanged with the backend:
//!
//! - `Product`: catalog entries with the per-user favorite flag
//! - `Favorite`: saved listings with their current price
//! - `UserProfile`, `AuthToken`: account and login types
//! - `PriceTrend`, `PricePoint`: price history series
//! - `ScrapeTask`, `SystemStats`: scraper control and system counters

pub mod favorite;
pub mod history;
pub mod product;
pub mod system;
pub mod user;

pub use favorite::{Favorite, FavoriteRemoved, FavoriteToggle};
pub use history::{PricePoint, PriceTrend};
pub use product::Product;
pub use system::{ScrapeTask, SystemStats};
pub use user::{AuthToken, UserProfile};
