//! Shared thread pool for reconstruction runs and batch redshift inversion.
//!
//! Estimators may recurse deeply while updating their mixtures, so the pool
//! uses larger stacks than rayon's global pool.

#[cfg(feature = "parallel")]
use rayon::ThreadPool;

#[cfg(feature = "parallel")]
use std::sync::OnceLock;

#[cfg(feature = "parallel")]
static THREAD_POOL: OnceLock<Option<ThreadPool>> = OnceLock::new();

/// Stack size per worker thread.
#[cfg(feature = "parallel")]
const STACK_SIZE: usize = 8 * 1024 * 1024;

/// The shared pool, built on first use with one thread per logical CPU.
///
/// `None` if the pool could not be built; work then runs on rayon's global
/// pool instead.
#[cfg(feature = "parallel")]
pub fn get_thread_pool() -> Option<&'static ThreadPool> {
    THREAD_POOL
        .get_or_init(|| {
            rayon::ThreadPoolBuilder::new()
                .stack_size(STACK_SIZE)
                .thread_name(|i| format!("bnp-worker-{i}"))
                .build()
                .map_err(|e| tracing::warn!(error = %e, "falling back to the global rayon pool"))
                .ok()
        })
        .as_ref()
}

/// Run `op` inside the shared pool, so nested parallel iterators use it.
#[cfg(feature = "parallel")]
pub fn install<OP, R>(op: OP) -> R
where
    OP: FnOnce() -> R + Send,
    R: Send,
{
    match get_thread_pool() {
        Some(pool) => pool.install(op),
        None => op(),
    }
}

/// Without the `parallel` feature there is no pool; `op` runs in place.
#[cfg(not(feature = "parallel"))]
pub fn install<OP, R>(op: OP) -> R
where
    OP: FnOnce() -> R,
{
    op()
}
