//! File descriptor limit detection for capping the worker pool (Unix).

use log::debug;

use crate::utils::config::ConcurrencyLimits;

/// Estimated descriptors held per worker: the open source file plus pooled HTTP connections.
pub const FDS_PER_WORKER: usize = 4;

/// Fraction of the process FD limit to use (leave headroom for other code).
const FD_LIMIT_FRACTION: f64 = 0.8;

/// Returns the soft limit for max open file descriptors, or `None` if unavailable (e.g. Windows).
#[cfg(unix)]
pub fn max_open_fds() -> Option<u64> {
    use std::mem::MaybeUninit;
    let mut rlim = MaybeUninit::<libc::rlimit>::uninit();
    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, rlim.as_mut_ptr()) } != 0 {
        return None;
    }
    let rlim = unsafe { rlim.assume_init() };
    let cur = rlim.rlim_cur;
    // RLIM_INFINITY is typically !0 or u64::MAX; treat as "no practical limit"
    if cur == libc::RLIM_INFINITY || cur > i64::MAX as u64 {
        return None;
    }
    Some(cur)
}

#[cfg(not(unix))]
pub fn max_open_fds() -> Option<u64> {
    None
}

/// Suggested max worker count so we stay under ~80% of the FD limit.
/// Returns `None` if no limit is available (use caller's value).
pub fn max_workers_by_fd_limit() -> Option<usize> {
    let limit = max_open_fds()?;
    let usable = (limit as f64 * FD_LIMIT_FRACTION) as usize;
    if usable < FDS_PER_WORKER {
        return Some(1);
    }
    Some(usable / FDS_PER_WORKER)
}

/// Effective worker count: `requested` clamped to [`ConcurrencyLimits`], the FD budget and the item count.
pub fn effective_concurrency(requested: usize, item_count: usize) -> usize {
    let limits = ConcurrencyLimits::default();
    let mut workers = requested.clamp(limits.floor, limits.max);
    if let Some(fd_cap) = max_workers_by_fd_limit()
        && fd_cap < workers
    {
        debug!("Capping workers {} -> {} (FD limit ~80%)", workers, fd_cap);
        workers = fd_cap;
    }
    workers.min(item_count.max(1))
}
