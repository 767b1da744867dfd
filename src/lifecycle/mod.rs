//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Logging → Trace sinks → [runtime] → Metrics
//!         → Disk sampler → Bind listener → Serve
//!
//! Termination:
//!     Ctrl+C → graceful stop of the HTTP server (http/server.rs)
//!     /quitquitquit → immediate process exit (shutdown.rs)
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Trace sinks are built before the Tokio runtime exists
//! - Listener binds last (traffic only when ready)

pub mod shutdown;
pub mod startup;

pub use shutdown::terminate;
pub use startup::{run, StartupError};
