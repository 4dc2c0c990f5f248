//! Parking lock backed by an OS mutex and condition variable

use std::sync::{Condvar, Mutex, MutexGuard};

use tracing::error;

use crate::{Lock, RawLock};

/// Blocking lock: waiters sleep until the holder releases.
///
/// No timeout, no cancellation, no fairness guarantee. The inner mutex only
/// guards the `locked` flag, so a waiter never sleeps while holding it.
#[derive(Debug, Default)]
pub struct BlockingLock {
    locked: Mutex<bool>,
    released: Condvar,
}

impl BlockingLock {
    fn state(&self) -> MutexGuard<'_, bool> {
        self.locked.lock().unwrap_or_else(|_| fatal("lock"))
    }
}

/// The underlying primitive failed. Nothing sensible can continue.
fn fatal(operation: &str) -> ! {
    error!(operation, "blocking lock primitive poisoned, aborting");
    std::process::abort()
}

static_assertions::assert_impl_all!(Lock<BlockingLock, usize>: Send, Sync);

unsafe impl RawLock for BlockingLock {
    type Token = ();

    fn lock(&self) {
        let mut locked = self
            .released
            .wait_while(self.state(), |locked| *locked)
            .unwrap_or_else(|_| fatal("wait"));
        *locked = true;
    }

    unsafe fn unlock(&self, _token: ()) {
        let mut locked = self.state();
        debug_assert!(*locked, "unlock of a lock that is not held");
        *locked = false;
        drop(locked);
        self.released.notify_one();
    }
}
