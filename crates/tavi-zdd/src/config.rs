//! Build configuration and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Cancellation flag shared between a caller and a running
/// [`build`](crate::Zdd::build).
///
/// Cloning yields a handle to the same flag. The flag is checked at every
/// expansion step, so a cancelled build fails promptly with
/// [`ZddError::Cancelled`](crate::ZddError::Cancelled) and leaves the
/// engine's previous root in place.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of any build holding a clone of this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Construction parameters for one engine.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Worker count for construction. `1` (the default) builds sequentially;
    /// `0` means all available hardware parallelism. Construction currently
    /// runs on one thread regardless — the node table is already linearisable,
    /// so this stays a forward-looking knob rather than a correctness switch.
    pub workers: usize,

    /// Approximate ceiling in bytes for engine-owned structures (node table
    /// and construction memo). `0` disables the check. Exceeding the ceiling
    /// fails the build with [`ZddError::MemoryLimit`](crate::ZddError::MemoryLimit).
    pub memory_limit_bytes: u64,

    /// Wall-clock limit for one build. `None` disables the deadline.
    pub timeout: Option<Duration>,

    /// Cooperative cancellation signal, checked on every expansion step.
    pub cancel: Option<CancelToken>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            memory_limit_bytes: 0,
            timeout: None,
            cancel: None,
        }
    }
}

impl BuildConfig {
    /// Resolve the `workers` knob: `0` maps to the hardware parallelism of
    /// the host, anything else is taken as-is.
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            self.workers
        }
    }
}
