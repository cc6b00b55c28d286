//! # Blog API Server
//!
//! Actix-web application serving the `/posts` resource.
//! Exposed as a library so integration tests can start and stop real servers.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::AppConfig;
pub use server::run;
pub use state::AppState;
