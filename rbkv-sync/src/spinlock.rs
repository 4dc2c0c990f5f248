//! Spinlock implementation

use core::sync::atomic::{AtomicBool, Ordering};

use crate::{Lock, RawLock};

/// A basic test-and-test-and-set spinlock.
///
/// Waiters burn CPU instead of sleeping; only worth it when critical sections
/// are a handful of pointer updates.
#[derive(Debug, Default)]
pub struct SpinLock {
    locked: AtomicBool,
}

static_assertions::assert_impl_all!(Lock<SpinLock, usize>: Send, Sync);

unsafe impl RawLock for SpinLock {
    type Token = ();

    fn lock(&self) {
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            // Spin on a plain load so contended waiters don't bounce the cache line.
            while self.locked.load(Ordering::Relaxed) {
                core::hint::spin_loop();
            }
        }
    }

    unsafe fn unlock(&self, _token: ()) {
        self.locked.store(false, Ordering::Release);
    }
}
