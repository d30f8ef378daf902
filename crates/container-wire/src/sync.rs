//! Opt-in coarse locking for envelopes and stores.
//!
//! Values are plain owned data and are `Send + Sync` on their own. When one
//! message or store has to be mutated from several threads, wrap it in a
//! [`Shared`] and go through [`Shared::read`] / [`Shared::write`].

use std::sync::Arc;

use parking_lot::RwLock;

/// A cloneable handle to a reader/writer-locked `T`.
///
/// Clones share the same underlying value.
#[derive(Debug, Default)]
pub struct Shared<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Runs `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.inner.read();
        f(&guard)
    }

    /// Runs `f` with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut guard)
    }

    /// Unwraps the value if this is the last handle, otherwise returns the handle.
    pub fn try_into_inner(self) -> Result<T, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(lock) => Ok(lock.into_inner()),
            Err(inner) => Err(Self { inner }),
        }
    }
}

impl<T: Clone> Shared<T> {
    /// Clones the current value out from under the lock.
    pub fn snapshot(&self) -> T {
        self.inner.read().clone()
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> From<T> for Shared<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}
