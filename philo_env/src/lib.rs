//! Dining Table Environment Abstraction Layer
//!
//! This crate provides the seams the philosopher engine uses to touch the
//! outside world, so the same engine runs against the real clock and stdout
//! in production and against tokio's paused clock and an in-memory sink in
//! tests.
//!
//! # Intercepted I/O
//!
//! - Time (`now()`, `sleep()`)
//! - Status output (`EventSink::write_line()`)
//!
//! # Example
//!
//! ```ignore
//! use philo_env::{TableContext, TokioContext, StdoutSink};
//!
//! let ctx = TokioContext::shared();
//! ctx.sleep(Duration::from_millis(200)).await;
//! println!("{} ms since start", ctx.elapsed_ms());
//! ```

mod context;
mod sink;
mod types;
mod error;
mod tokio_impl;

pub use context::TableContext;
pub use sink::{EventSink, MemorySink, StdoutSink};
pub use types::PhilosopherId;
pub use error::EnvError;
pub use tokio_impl::TokioContext;
