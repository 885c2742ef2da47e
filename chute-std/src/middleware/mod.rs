//! Standard middleware.
//!
//! Every type here implements [`Middleware`](chute_core::Middleware) for any
//! request and response type, so they can be layered onto any router:
//!
//! - [`ConcurrencyLimit`] - caps calls in flight
//! - [`BurstLimit`] - token-bucket rate limit
//! - [`SetRequestId`] - stamps a [`RequestId`] extension
//! - `Timeout` - deadline per call (feature `timeout`)
//! - `Trace` - span per call (feature `tracing`)

mod limit;
mod request_id;
#[cfg(feature = "timeout")]
mod timeout;
#[cfg(feature = "tracing")]
mod trace;

pub use limit::{BurstLimit, ConcurrencyLimit, Overloaded};
pub use request_id::{RequestId, SetRequestId};
#[cfg(feature = "timeout")]
pub use timeout::{Timeout, TimeoutError};
#[cfg(feature = "tracing")]
pub use trace::Trace;
