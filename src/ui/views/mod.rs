//! Screen-specific rendering, one module per route.

pub mod favorites;
pub mod history;
pub mod login;
pub mod products;
