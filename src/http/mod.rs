//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace layer)
//!     → handlers.rs
//!         /fib          → fib engine (extract scope, validate, fan out)
//!         /favicon.ico  → 404
//!         /quitquitquit → admin (process exit)
//!         anything else → root
//!     → Send to client
//! ```

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer, ServerError};
