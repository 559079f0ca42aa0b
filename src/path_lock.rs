//! Per-path reader/writer locks with priority and retry bounds.
//!
//! Every filesystem callback serializes against every other callback touching
//! the same logical path through this manager. It is pure in-process thread
//! synchronization -- there is exactly one mount process per cache root, so a
//! `HashMap`-of-slots keyed by path string is enough; nothing here needs to
//! cross a process boundary the way `fs2`'s flock wrapper does in a
//! content-addressed disk cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, ThreadId};
use std::time::Duration;

use crate::error::{CacheError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Exclusive on the leaf path (and, conceptually, on its ancestors).
    Exclusive,
    /// Shared on the leaf path, still exclusive on ancestor directories.
    SharedLeaf,
}

struct Slot {
    state: Mutex<SlotState>,
    cond: Condvar,
    /// Bumped by a high-priority waiter while it's blocked, so low-priority
    /// (background worker) acquisitions know to back off an extra poll before
    /// trying again -- a cheap approximation of queue priority without a full
    /// priority scheduler.
    high_priority_waiting: AtomicU32,
}

#[derive(Default)]
struct SlotState {
    writer: Option<(ThreadId, u32)>,
    readers: u32,
}

impl Slot {
    fn new() -> Arc<Slot> {
        Arc::new(Slot {
            state: Mutex::new(SlotState::default()),
            cond: Condvar::new(),
            high_priority_waiting: AtomicU32::new(0),
        })
    }
}

/// Scoped per-path lock manager. Locks are released automatically when the
/// returned [`PathLockGuard`] drops, on every exit path including panics
/// unwinding through it.
pub struct PathLockManager {
    slots: Mutex<HashMap<String, Arc<Slot>>>,
}

impl PathLockManager {
    pub fn new() -> PathLockManager {
        PathLockManager {
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slot_for(&self, path: &str) -> Arc<Slot> {
        let mut slots = self.slots.lock().unwrap();
        slots.entry(normalize(path)).or_insert_with(Slot::new).clone()
    }

    /// Acquire `path` in `mode`. `high_priority` lets filesystem callbacks
    /// preempt background-worker acquisitions; `max_retries` bounds how many
    /// poll attempts are made before giving up with
    /// [`CacheError::LockRetryExhausted`].
    ///
    /// Re-entrant: if the calling thread already holds an exclusive lock on
    /// `path`, acquiring it again (in either mode) is a no-op that doesn't
    /// self-deadlock.
    pub fn acquire(
        &self,
        path: &str,
        mode: LockMode,
        high_priority: bool,
        max_retries: u32,
    ) -> Result<PathLockGuard> {
        let slot = self.slot_for(path);
        let me = thread::current().id();

        {
            let mut state = slot.state.lock().unwrap();
            if let Some((owner, depth)) = state.writer.as_mut() {
                if *owner == me {
                    *depth += 1;
                    return Ok(PathLockGuard {
                        slot,
                        mode,
                        reentrant: true,
                    });
                }
            }
        }

        if high_priority {
            slot.high_priority_waiting.fetch_add(1, Ordering::Relaxed);
        }
        let release_priority = |slot: &Slot| {
            if high_priority {
                slot.high_priority_waiting.fetch_sub(1, Ordering::Relaxed);
            }
        };

        let mut state = slot.state.lock().unwrap();
        let mut attempts = 0u32;
        loop {
            let can_acquire = match mode {
                LockMode::Exclusive => state.writer.is_none() && state.readers == 0,
                LockMode::SharedLeaf => state.writer.is_none(),
            };
            if can_acquire {
                match mode {
                    LockMode::Exclusive => state.writer = Some((me, 0)),
                    LockMode::SharedLeaf => state.readers += 1,
                }
                drop(state);
                release_priority(&slot);
                return Ok(PathLockGuard {
                    slot,
                    mode,
                    reentrant: false,
                });
            }

            if attempts >= max_retries {
                release_priority(&slot);
                return Err(CacheError::LockRetryExhausted {
                    path: path.to_string(),
                    retries: max_retries,
                });
            }
            attempts += 1;

            // Low-priority waiters back off an extra tick whenever a
            // high-priority (kernel-callback) acquisition is pending, so
            // background-worker calls like `create_dummy` don't starve them.
            let wait = if !high_priority && slot.high_priority_waiting.load(Ordering::Relaxed) > 0 {
                POLL_INTERVAL * 2
            } else {
                POLL_INTERVAL
            };
            let (next_state, _timeout) = slot.cond.wait_timeout(state, wait).unwrap();
            state = next_state;
        }
    }
}

/// RAII guard for a path lock acquired through [`PathLockManager::acquire`].
pub struct PathLockGuard {
    slot: Arc<Slot>,
    mode: LockMode,
    reentrant: bool,
}

impl Drop for PathLockGuard {
    fn drop(&mut self) {
        let mut state = self.slot.state.lock().unwrap();
        if self.reentrant {
            if let Some((_, depth)) = state.writer.as_mut() {
                *depth -= 1;
            }
            return;
        }
        match self.mode {
            LockMode::Exclusive => {
                state.writer = None;
            }
            LockMode::SharedLeaf => {
                state.readers = state.readers.saturating_sub(1);
            }
        }
        drop(state);
        self.slot.cond.notify_all();
    }
}

/// Logical paths are already slash-separated and absolute; this just strips a
/// trailing slash so `"/a/"` and `"/a"` share a slot.
fn normalize(path: &str) -> String {
    if path.len() > 1 && path.ends_with('/') {
        path.trim_end_matches('/').to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Barrier;

    #[test]
    fn exclusive_excludes_concurrent_exclusive() {
        let manager = Arc::new(PathLockManager::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(4));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let manager = manager.clone();
            let counter = counter.clone();
            let barrier = barrier.clone();
            handles.push(thread::spawn(move || {
                barrier.wait();
                let guard = manager.acquire("/a", LockMode::Exclusive, true, 1000).unwrap();
                let before = counter.fetch_add(1, Ordering::SeqCst);
                assert_eq!(before, 0, "overlapping exclusive holders");
                thread::sleep(Duration::from_millis(5));
                counter.fetch_sub(1, Ordering::SeqCst);
                drop(guard);
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn shared_leaf_allows_concurrent_readers() {
        let manager = PathLockManager::new();
        let g1 = manager.acquire("/a", LockMode::SharedLeaf, true, 100).unwrap();
        let g2 = manager.acquire("/a", LockMode::SharedLeaf, true, 100).unwrap();
        drop(g1);
        drop(g2);
    }

    #[test]
    fn reentrant_exclusive_acquire_is_a_no_op() {
        let manager = PathLockManager::new();
        let outer = manager.acquire("/a", LockMode::Exclusive, true, 100).unwrap();
        let inner = manager.acquire("/a", LockMode::Exclusive, true, 100).unwrap();
        drop(inner);
        drop(outer);
    }

    #[test]
    fn exhausting_retries_raises_lock_retry_exhausted() {
        let manager = PathLockManager::new();
        let _held = manager.acquire("/a", LockMode::Exclusive, true, 100).unwrap();
        let err = manager
            .acquire("/a", LockMode::Exclusive, true, 3)
            .unwrap_err();
        assert!(matches!(err, CacheError::LockRetryExhausted { .. }));
    }

    #[test]
    fn independent_paths_do_not_contend() {
        let manager = PathLockManager::new();
        let a = manager.acquire("/a", LockMode::Exclusive, true, 10).unwrap();
        let b = manager.acquire("/b", LockMode::Exclusive, true, 10).unwrap();
        drop(a);
        drop(b);
    }
}
