//! Shared thread pool for the parallel permutation loop.
//!
//! All parallel draws in the library go through one lazily-built pool so
//! that nested tests (per channel, per tail) don't each spin up their own
//! set of worker threads.

use rayon::ThreadPool;

use std::sync::OnceLock;

static THREAD_POOL: OnceLock<ThreadPool> = OnceLock::new();

/// Get or initialize the shared thread pool.
pub fn get_thread_pool() -> &'static ThreadPool {
    THREAD_POOL.get_or_init(|| {
        rayon::ThreadPoolBuilder::new()
            .build()
            .expect("Failed to build permutation thread pool")
    })
}

/// Execute an operation inside the shared thread pool.
pub fn install<OP, R>(op: OP) -> R
where
    OP: FnOnce() -> R + Send,
    R: Send,
{
    get_thread_pool().install(op)
}
