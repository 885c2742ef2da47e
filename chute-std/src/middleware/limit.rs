//! Load-shedding middleware.
//!
//! Both limiters reject instead of queueing: a call that cannot proceed fails
//! immediately with [`Overloaded`], which a transport typically renders as
//! `503 Service Unavailable`.

use chute_core::{BoxError, BoxHandler, Handler, Middleware, RouteRequest};
use parking_lot::Mutex;
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::{Duration, Instant},
};
use thiserror::Error;

/// A call was rejected by a limiter.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overloaded {
    /// [`ConcurrencyLimit`] is at capacity.
    #[error("too many requests in flight (limit {limit})")]
    Concurrency {
        /// Configured maximum.
        limit: usize,
    },
    /// [`BurstLimit`] has no token left.
    #[error("request rate exceeded (burst {burst})")]
    Burst {
        /// Configured bucket size.
        burst: u32,
    },
}

// ============================================================================
// Concurrency Limit
// ============================================================================

/// Caps the number of calls in flight at once.
///
/// The cap is shared by every route this instance wraps. Cloning the
/// middleware shares the same counter.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimit {
    state: Arc<InFlight>,
}

#[derive(Debug)]
struct InFlight {
    limit: usize,
    current: AtomicUsize,
}

impl InFlight {
    fn try_acquire(self: &Arc<Self>) -> Option<Permit> {
        self.current
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.limit).then_some(n + 1)
            })
            .ok()
            .map(|_| Permit {
                state: Arc::clone(self),
            })
    }
}

/// Decrements the in-flight count on drop, including when the handler
/// panics or its future is cancelled.
struct Permit {
    state: Arc<InFlight>,
}

impl Drop for Permit {
    fn drop(&mut self) {
        self.state.current.fetch_sub(1, Ordering::AcqRel);
    }
}

impl ConcurrencyLimit {
    /// Allow at most `limit` concurrent calls.
    pub fn new(limit: usize) -> Self {
        Self {
            state: Arc::new(InFlight {
                limit,
                current: AtomicUsize::new(0),
            }),
        }
    }

    /// Calls currently in flight.
    pub fn in_flight(&self) -> usize {
        self.state.current.load(Ordering::Acquire)
    }

    /// Configured maximum.
    pub fn limit(&self) -> usize {
        self.state.limit
    }
}

impl<R, T> Middleware<R, T> for ConcurrencyLimit
where
    R: Send + 'static,
    T: Send + 'static,
{
    fn wrap(&self, inner: BoxHandler<R, T>) -> BoxHandler<R, T> {
        BoxHandler::new(ConcurrencyLimited {
            state: Arc::clone(&self.state),
            inner,
        })
    }
}

struct ConcurrencyLimited<R, T> {
    state: Arc<InFlight>,
    inner: BoxHandler<R, T>,
}

impl<R, T> Handler<R, T> for ConcurrencyLimited<R, T>
where
    R: Send + 'static,
    T: Send + 'static,
{
    async fn call(&self, request: RouteRequest<R>) -> Result<T, BoxError> {
        let Some(_permit) = self.state.try_acquire() else {
            #[cfg(feature = "tracing")]
            tracing::debug!(route = request.route(), limit = self.state.limit, "concurrency limit reached");
            return Err(Box::new(Overloaded::Concurrency {
                limit: self.state.limit,
            }));
        };
        self.inner.call(request).await
    }
}

// ============================================================================
// Burst Limit
// ============================================================================

/// Token bucket: up to `burst` calls at once, then one more per `interval`.
///
/// The bucket starts full. Tokens are refilled lazily from the time elapsed
/// since the last refill, so no background task is needed.
#[derive(Debug, Clone)]
pub struct BurstLimit {
    bucket: Arc<Mutex<Bucket>>,
    burst: u32,
    interval: Duration,
}

#[derive(Debug)]
struct Bucket {
    tokens: u32,
    refilled_at: Instant,
}

impl BurstLimit {
    /// Create a bucket of `burst` tokens refilled one per `interval`.
    ///
    /// A zero `interval` refills instantly, which disables the limit.
    pub fn new(burst: u32, interval: Duration) -> Self {
        Self::starting_at(burst, interval, Instant::now())
    }

    fn starting_at(burst: u32, interval: Duration, now: Instant) -> Self {
        Self {
            bucket: Arc::new(Mutex::new(Bucket {
                tokens: burst,
                refilled_at: now,
            })),
            burst,
            interval,
        }
    }

    /// Tokens currently available, without refilling.
    pub fn available(&self) -> u32 {
        self.bucket.lock().tokens
    }

    fn try_take(&self) -> bool {
        Self::take_at(&self.bucket, self.burst, self.interval, Instant::now())
    }

    fn take_at(bucket: &Mutex<Bucket>, burst: u32, interval: Duration, now: Instant) -> bool {
        if interval.is_zero() {
            return true;
        }
        let mut bucket = bucket.lock();
        let elapsed = now.saturating_duration_since(bucket.refilled_at);
        let ticks = elapsed.as_nanos() / interval.as_nanos();
        if ticks > 0 {
            let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
            bucket.tokens = bucket.tokens.saturating_add(ticks).min(burst);
            bucket.refilled_at = if bucket.tokens == burst {
                now
            } else {
                bucket.refilled_at + interval * ticks
            };
        }
        match bucket.tokens {
            0 => false,
            _ => {
                bucket.tokens -= 1;
                true
            }
        }
    }
}

impl<R, T> Middleware<R, T> for BurstLimit
where
    R: Send + 'static,
    T: Send + 'static,
{
    fn wrap(&self, inner: BoxHandler<R, T>) -> BoxHandler<R, T> {
        BoxHandler::new(BurstLimited {
            limit: self.clone(),
            inner,
        })
    }
}

struct BurstLimited<R, T> {
    limit: BurstLimit,
    inner: BoxHandler<R, T>,
}

impl<R, T> Handler<R, T> for BurstLimited<R, T>
where
    R: Send + 'static,
    T: Send + 'static,
{
    async fn call(&self, request: RouteRequest<R>) -> Result<T, BoxError> {
        if !self.limit.try_take() {
            #[cfg(feature = "tracing")]
            tracing::debug!(route = request.route(), burst = self.limit.burst, "burst limit reached");
            return Err(Box::new(Overloaded::Burst {
                burst: self.limit.burst,
            }));
        }
        self.inner.call(request).await
    }
}
