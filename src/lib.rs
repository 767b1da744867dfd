//! Fibonacci over the network: a service that recurses by calling itself.

pub mod admin;
pub mod config;
pub mod fib;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use http::HttpServer;
pub use observability::Telemetry;
