use std::{
    cell::{BorrowMutError, Ref, RefCell, RefMut},
    rc::Rc,
};

/// A single-threaded shared handle to a long-lived system.
///
/// `StSystem` is how the renderer shares its GPU-facing systems (the `wgpu::Device`,
/// the `wgpu::Queue`, the buffer registry) between owners that all live on the event
/// loop thread. It uses `Rc<RefCell<Box<T>>>` internally, so every clone points at the
/// same system and borrow rules are checked at runtime.
///
/// # Examples
///
/// ```ignore
/// let system = StSystem::new(Box::new(String::from("device")));
/// let alias = system.clone();
///
/// alias.get_mut().push_str("-0");
/// assert_eq!(system.get().as_str(), "device-0");
/// ```
///
/// # Panics
/// - Panics if `get_mut` is called while any other borrow is alive
/// - Panics if `get` is called while a mutable borrow is alive
///
/// Use [`StSystem::try_get_mut`] on paths that must not panic, such as `Drop`.
pub struct StSystem<T: ?Sized> {
    pub system: Rc<RefCell<Box<T>>>,
}

impl<T: ?Sized> StSystem<T> {
    /// Creates a new `StSystem` containing the given boxed system.
    pub fn new(system: Box<T>) -> Self {
        Self {
            system: Rc::new(RefCell::new(system)),
        }
    }

    /// Returns an immutable borrow of the contained system.
    ///
    /// # Panics
    /// Panics if the value is currently mutably borrowed.
    pub fn get(&self) -> Ref<'_, Box<T>> {
        self.system.borrow()
    }

    /// Returns a mutable borrow of the contained system.
    ///
    /// # Panics
    /// Panics if the value is currently borrowed.
    pub fn get_mut(&self) -> RefMut<'_, Box<T>> {
        self.system.borrow_mut()
    }

    /// Attempts a mutable borrow without panicking.
    pub fn try_get_mut(&self) -> Result<RefMut<'_, Box<T>>, BorrowMutError> {
        self.system.try_borrow_mut()
    }
}

impl<T: ?Sized> Clone for StSystem<T> {
    fn clone(&self) -> Self {
        Self {
            system: self.system.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_observe_mutation() {
        let system = StSystem::new(Box::new(42u32));
        let alias = system.clone();

        **alias.get_mut() = 100;

        assert_eq!(**system.get(), 100);
    }

    #[test]
    fn try_get_mut_fails_while_borrowed() {
        let system = StSystem::new(Box::new(1u8));
        let _guard = system.get();

        assert!(system.try_get_mut().is_err());
    }
}
