//! Containers that hold either a value that is already here or a future that
//! will produce one, behind a single chaining interface.
//!
//! Call sites such as resolver pipelines and middleware chains often cannot
//! know up front whether a step completes immediately or later. Wrapping
//! every result in a future makes the synchronous majority pay for the
//! asynchronous minority; [`ValueOrFuture`] classifies each outcome once, at
//! construction, and keeps synchronous work synchronous through chaining,
//! resolution, and batch joins.
//!
//! # Examples
//!
//! ```
//! use value_or_future::{Step, ValueOrFuture};
//!
//! // A computation that happens to be synchronous stays synchronous.
//! let port: ValueOrFuture<u16, String> =
//!     ValueOrFuture::new(|| "8080".parse::<u16>().map(Step::ready).map_err(|e| e.to_string()));
//! let bound = port.then(|p| Ok(Step::ready(format!("0.0.0.0:{p}"))));
//! assert_eq!(bound.resolve().now(), Some(Ok("0.0.0.0:8080".to_string())));
//! ```

use thiserror::Error;

pub mod join;
pub mod oneshot;
pub mod step;
pub mod value_or_future;

pub use join::join_all;
pub use step::Step;
pub use value_or_future::{Resolution, ValueOrFuture};

/// Errors produced by this crate's own primitives.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The [`oneshot::Completer`] was dropped without settling its waiter.
    #[error("completer dropped before settling")]
    CompleterDropped,
}
