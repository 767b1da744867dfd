//! Administrative endpoints.
//!
//! Out-of-band actions that sit outside the request/fan-out path. Nothing in
//! `fib` can reach these.

pub mod handlers;

use axum::{routing::any, Router};

use crate::http::AppState;
use self::handlers::*;

pub fn router() -> Router<AppState> {
    Router::new().route("/quitquitquit", any(quit))
}
