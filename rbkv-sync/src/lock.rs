//! Type-safe lock over a raw lock algorithm

use core::cell::UnsafeCell;
use core::mem::ManuallyDrop;
use core::ops::{Deref, DerefMut};

/// Raw lock interface.
///
/// # Safety
///
/// Implementations must be exclusive: `lock` may not return while another
/// token for the same lock is outstanding.
pub unsafe trait RawLock: Default + Send + Sync {
    /// Proof of acquisition, handed back on unlock.
    type Token;

    /// Acquire the lock, waiting as long as it takes.
    fn lock(&self) -> Self::Token;

    /// Release the lock.
    ///
    /// # Safety
    ///
    /// `self` must be held, and `token` must come from the `lock` call that
    /// acquired it.
    unsafe fn unlock(&self, token: Self::Token);
}

/// A value guarded by a raw lock.
#[derive(Debug, Default)]
pub struct Lock<L: RawLock, T> {
    inner: L,
    data: UnsafeCell<T>,
}

// SAFETY: `&mut T` is only reachable through a guard, and `L` is `Sync`.
unsafe impl<L: RawLock, T: Send> Sync for Lock<L, T> {}

impl<L: RawLock, T> Lock<L, T> {
    /// Initialize the lock around `data`.
    pub fn new(data: T) -> Self {
        Self {
            inner: L::default(),
            data: UnsafeCell::new(data),
        }
    }

    /// Destroy the lock and take back the guarded value.
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }

    /// Borrow the value without locking; `&mut self` already proves exclusivity.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    /// Block until the lock is acquired.
    pub fn lock(&self) -> LockGuard<'_, L, T> {
        let token = self.inner.lock();
        LockGuard {
            lock: self,
            token: ManuallyDrop::new(token),
        }
    }
}

/// Scoped acquisition of a [`Lock`]; released on drop.
#[derive(Debug)]
pub struct LockGuard<'s, L: RawLock, T> {
    lock: &'s Lock<L, T>,
    token: ManuallyDrop<L::Token>,
}

// SAFETY: owning the guard means owning the token and the `&mut T` it exposes.
unsafe impl<L: RawLock, T: Send> Send for LockGuard<'_, L, T> where L::Token: Send {}

// SAFETY: sharing the guard only shares `&T`.
unsafe impl<L: RawLock, T: Sync> Sync for LockGuard<'_, L, T> {}

impl<L: RawLock, T> Drop for LockGuard<'_, L, T> {
    fn drop(&mut self) {
        // SAFETY: the token is not touched again after this.
        let token = unsafe { ManuallyDrop::take(&mut self.token) };

        // SAFETY: the guard was created by `Lock::lock` with this token.
        unsafe { self.lock.inner.unlock(token) };
    }
}

impl<L: RawLock, T> Deref for LockGuard<'_, L, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the lock is held for the guard's lifetime.
        unsafe { &*self.lock.data.get() }
    }
}

impl<L: RawLock, T> DerefMut for LockGuard<'_, L, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the lock is held and the guard is borrowed uniquely.
        unsafe { &mut *self.lock.data.get() }
    }
}
