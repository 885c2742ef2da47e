//! # Reusable Object Pool
//!
//! A small concurrent pool that recycles buffers between requests so the hot
//! path does not allocate once the pool is warm.
//!
//! Values are handed out wrapped in a [`Pooled`] guard. Dropping the guard
//! returns the value to the pool, which means release happens on every exit
//! path: normal return, early `?`, a panicking handler, or a cancelled
//! future. A value can never be touched after release because the guard that
//! owned it is gone.
//!
//! # Example
//!
//! ```rust
//! use chute_core::pool::{Pool, Reset};
//!
//! #[derive(Default)]
//! struct Buffer(Vec<u8>);
//!
//! impl Reset for Buffer {
//!     fn reset(&mut self) {
//!         self.0.clear();
//!     }
//! }
//!
//! let pool: Pool<Buffer> = Pool::new();
//! {
//!     let mut buf = pool.acquire();
//!     buf.0.extend_from_slice(b"hello");
//! } // returned here
//!
//! let buf = pool.acquire();
//! assert!(buf.0.is_empty());
//! assert_eq!(pool.stats().reused, 1);
//! ```

use parking_lot::Mutex;
use std::{
    fmt,
    ops::{Deref, DerefMut},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Default cap on idle values kept by a pool.
pub const DEFAULT_MAX_IDLE: usize = 1024;

/// Types that can be cleared for reuse.
///
/// `reset` must bring the value back to the state `Default` would produce,
/// apart from retained capacity.
pub trait Reset {
    /// Clears the value, keeping allocations.
    fn reset(&mut self);
}

/// Snapshot of pool counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Values constructed because the pool was empty.
    pub created: usize,
    /// Acquisitions served from a recycled value.
    pub reused: usize,
    /// Values currently waiting in the pool.
    pub idle: usize,
}

struct Shared<T> {
    idle: Mutex<Vec<T>>,
    max_idle: usize,
    created: AtomicUsize,
    reused: AtomicUsize,
}

impl<T> Shared<T> {
    fn release(&self, value: T) {
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(value);
        }
    }
}

/// A thread-safe pool of reusable values.
///
/// Cloning a `Pool` is cheap and yields a handle to the same pool.
pub struct Pool<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Reset + Default> Pool<T> {
    /// Create an empty pool keeping at most [`DEFAULT_MAX_IDLE`] idle values.
    pub fn new() -> Self {
        Self::with_max_idle(DEFAULT_MAX_IDLE)
    }

    /// Create an empty pool keeping at most `max_idle` idle values.
    ///
    /// Values released while the pool is full are dropped.
    pub fn with_max_idle(max_idle: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                idle: Mutex::new(Vec::new()),
                max_idle,
                created: AtomicUsize::new(0),
                reused: AtomicUsize::new(0),
            }),
        }
    }

    /// Fill the pool with up to `count` fresh values.
    pub fn prefill(&self, count: usize) {
        let mut idle = self.shared.idle.lock();
        let target = count.min(self.shared.max_idle);
        while idle.len() < target {
            idle.push(T::default());
        }
    }

    /// Take a value out of the pool, constructing one if none is idle.
    ///
    /// Recycled values are reset before being handed out.
    pub fn acquire(&self) -> Pooled<T> {
        let recycled = self.shared.idle.lock().pop();
        let value = match recycled {
            Some(mut value) => {
                value.reset();
                self.shared.reused.fetch_add(1, Ordering::Relaxed);
                value
            }
            None => {
                self.shared.created.fetch_add(1, Ordering::Relaxed);
                T::default()
            }
        };
        Pooled {
            value,
            pool: Arc::clone(&self.shared),
        }
    }

    /// Current counters.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            created: self.shared.created.load(Ordering::Relaxed),
            reused: self.shared.reused.load(Ordering::Relaxed),
            idle: self.idle(),
        }
    }

    /// Number of values waiting in the pool.
    pub fn idle(&self) -> usize {
        self.shared.idle.lock().len()
    }

    /// Maximum number of idle values retained.
    pub fn max_idle(&self) -> usize {
        self.shared.max_idle
    }
}

impl<T: Reset + Default> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Pool<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("idle", &self.shared.idle.lock().len())
            .field("max_idle", &self.shared.max_idle)
            .finish()
    }
}

/// A value on loan from a [`Pool`]; returned when dropped.
pub struct Pooled<T: Reset + Default> {
    value: T,
    pool: Arc<Shared<T>>,
}

impl<T: Reset + Default> Pooled<T> {
    /// Return the value to its pool now.
    ///
    /// Equivalent to dropping the guard.
    pub fn release(self) {}
}

impl<T: Reset + Default> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Reset + Default> DerefMut for Pooled<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: Reset + Default> Drop for Pooled<T> {
    fn drop(&mut self) {
        let value = std::mem::take(&mut self.value);
        self.pool.release(value);
    }
}

impl<T: Reset + Default + fmt::Debug> fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pooled").field(&self.value).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[derive(Debug, Default)]
    struct Scratch {
        items: Vec<u32>,
    }

    impl Reset for Scratch {
        fn reset(&mut self) {
            self.items.clear();
        }
    }

    #[test]
    fn test_acquire_constructs_when_empty() {
        let pool: Pool<Scratch> = Pool::new();
        let item = pool.acquire();
        assert!(item.items.is_empty());
        assert_eq!(pool.stats().created, 1);
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_drop_returns_value() {
        let pool: Pool<Scratch> = Pool::new();
        let mut item = pool.acquire();
        item.items.push(7);
        drop(item);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_reacquired_value_is_reset_and_keeps_capacity() {
        let pool: Pool<Scratch> = Pool::new();
        let mut item = pool.acquire();
        item.items.extend(0..64);
        item.release();

        let item = pool.acquire();
        assert!(item.items.is_empty());
        assert!(item.items.capacity() >= 64);
        assert_eq!(
            pool.stats(),
            PoolStats {
                created: 1,
                reused: 1,
                idle: 0
            }
        );
    }

    #[test]
    fn test_max_idle_caps_retained_values() {
        let pool: Pool<Scratch> = Pool::with_max_idle(2);
        let held: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
        drop(held);
        assert_eq!(pool.idle(), 2);
        assert_eq!(pool.max_idle(), 2);
    }

    #[test]
    fn test_prefill() {
        let pool: Pool<Scratch> = Pool::with_max_idle(8);
        pool.prefill(4);
        assert_eq!(pool.idle(), 4);
        pool.prefill(100);
        assert_eq!(pool.idle(), 8);

        let _item = pool.acquire();
        assert_eq!(pool.stats().reused, 1);
        assert_eq!(pool.stats().created, 0);
    }

    #[test]
    fn test_release_on_panic() {
        let pool: Pool<Scratch> = Pool::new();
        let handle = pool.clone();
        let result: std::thread::Result<()> =
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
                let mut item = handle.acquire();
                item.items.push(1);
                panic!("boom");
            }));
        assert!(result.is_err());
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_concurrent_acquire_release() {
        let pool: Pool<Scratch> = Pool::new();
        let threads: Vec<_> = (0..8)
            .map(|t| {
                let pool = pool.clone();
                thread::spawn(move || {
                    for i in 0..500 {
                        let mut item = pool.acquire();
                        assert!(item.items.is_empty());
                        item.items.push(t * 1000 + i);
                        assert_eq!(item.items, [t * 1000 + i]);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        let stats = pool.stats();
        assert_eq!(stats.created + stats.reused, 8 * 500);
        assert!(stats.created <= 8);
        assert_eq!(stats.idle, stats.created);
    }
}
