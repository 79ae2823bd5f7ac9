use std::{
    rc::Rc,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// A single-threaded, reference-counted value with interior mutability.
///
/// `StResource` wraps plain data (analytics tables, counters) that several owners on the
/// render thread read and update. It uses `Rc<RwLock<T>>` internally, so clones share
/// the same value and the type never crosses a thread boundary.
///
/// # Examples
///
/// ```ignore
/// let written = StResource::new(0u64);
/// let alias = written.clone();
///
/// *alias.get_mut() += 64;
/// assert_eq!(*written.get(), 64);
/// ```
///
/// # Panics
/// - Panics if a write lock is requested while any guard on the same value is alive
/// - Panics if the lock has been poisoned by an earlier panic
pub struct StResource<T> {
    pub resource: Rc<RwLock<T>>,
}

impl<T> StResource<T> {
    /// Creates a new `StResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Rc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read guard over the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned or already held for writing.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap()
    }

    /// Returns a write guard over the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned or already held.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap()
    }
}

impl<T> Clone for StResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_value() {
        let resource = StResource::new(vec![1, 2, 3]);
        let alias = resource.clone();

        alias.get_mut().push(4);

        assert_eq!(resource.get().len(), 4);
        assert_eq!(Rc::strong_count(&resource.resource), 2);
    }
}
