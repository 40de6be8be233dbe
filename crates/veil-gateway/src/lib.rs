//! HTTP surface of the veil object drop.

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod model;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use config::GatewayConfig;
pub use state::{AppState, SharedStore};
