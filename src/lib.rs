//! SiteLens library
//!
//! Exposes the application wiring for integration testing.

pub mod app_context;
pub mod sim;

pub use app_context::AppContext;
