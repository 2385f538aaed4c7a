//! HeartCure Server
//!
//! HTTP and command-line presentation surface over the HeartCure prediction
//! dispatcher.

pub mod cli;
pub mod config;
pub mod predict;
pub mod presenter;
pub mod routes;
pub mod state;

pub use cli::{Cli, Commands};
pub use config::ServerConfig;
pub use predict::run_predict;
pub use routes::create_router;
pub use state::{load_dispatcher, AppState};
