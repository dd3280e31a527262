//! CityCast HTTP server
//!
//! Serves city-name autocomplete (`GET /autocomplete?q=`) and the weather
//! search pass-through (`GET /search?city=`). Every other path redirects to `/`.

pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use server::{build_router, Server};
pub use state::AppState;
