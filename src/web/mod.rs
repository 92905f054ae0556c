//! Web server module
//!
//! Exposes the aggregator over a small JSON HTTP API.

mod handlers;
mod routes;
mod server;
mod state;

pub use routes::create_router;
pub use server::serve_with_grace;
pub use state::AppState;
