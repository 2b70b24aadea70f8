//! Process-wide handle to the active content registry.

use std::sync::{Arc, RwLock};

use pack_core::ContentRegistry;

/// Slot holding the frozen registry for the running game session.
///
/// The registry itself is immutable once frozen; switching the active pack
/// set builds a fresh registry and swaps the `Arc` here. Readers that cloned
/// the previous `Arc` keep a consistent view until they drop it.
#[derive(Debug, Default)]
pub struct RegistryHandle {
    inner: RwLock<Option<Arc<ContentRegistry>>>,
}

impl RegistryHandle {
    pub const fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// The currently active registry, if a load session has completed.
    pub fn current(&self) -> Option<Arc<ContentRegistry>> {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Installs a new registry, returning the one it replaced.
    pub fn swap(&self, registry: Arc<ContentRegistry>) -> Option<Arc<ContentRegistry>> {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.replace(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_returns_previous_registry() {
        let handle = RegistryHandle::new();
        assert!(handle.current().is_none());

        let mut first = ContentRegistry::new();
        first.finalize().unwrap();
        let first = Arc::new(first);

        assert!(handle.swap(Arc::clone(&first)).is_none());
        assert!(Arc::ptr_eq(&handle.current().unwrap(), &first));

        let mut second = ContentRegistry::new();
        second.finalize().unwrap();
        let previous = handle.swap(Arc::new(second)).unwrap();
        assert!(Arc::ptr_eq(&previous, &first));
    }
}
