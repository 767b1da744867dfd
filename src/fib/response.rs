//! Turning a computation (or a rejected query) into the HTTP response.
//!
//! Mirrors a streaming response writer: the first status written wins, and
//! body text is appended in the order it is produced. Failure lines are
//! written in the order the failing branches reported, then the sum.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::fib::{Computation, ParamError};

/// Status-once, append-only response body.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    status: Option<StatusCode>,
    body: String,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status unless one was already set. Returns whether this call set it.
    pub fn write_header(&mut self, status: StatusCode) -> bool {
        if self.status.is_some() {
            return false;
        }
        self.status = Some(status);
        true
    }

    pub fn write_str(&mut self, text: &str) {
        self.body.push_str(text);
    }

    /// 200 unless something wrote a status.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Response for a query that never reached the engine.
    pub fn rejected(err: &ParamError) -> Self {
        let mut writer = Self::new();
        writer.write_header(StatusCode::SERVICE_UNAVAILABLE);
        writer.write_str(&err.message());
        writer
    }

    /// Response for a finished fan-out, partial or not.
    pub fn computed(computation: &Computation) -> Self {
        let mut writer = Self::new();
        for failure in &computation.failures {
            writer.write_header(StatusCode::SERVICE_UNAVAILABLE);
            writer.write_str(&format!("Failed to call child index '{}'.\n", failure.index));
        }
        writer.write_str(&computation.value.to_string());
        writer
    }
}

impl IntoResponse for ResponseWriter {
    fn into_response(self) -> Response {
        (self.status(), self.body).into_response()
    }
}
