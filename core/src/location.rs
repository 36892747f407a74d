//! Navigation/location service contract.
//!
//! The location owns the address. Everything else reads it fresh and writes
//! through patches; nobody keeps a private copy.

use crate::params::{AddressParameters, AddressPatch};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Navigation/location service.
///
/// `update` is the only way to do a read-merge-write: the merge function sees
/// the latest address at the moment it runs, so two writers in the same turn
/// cannot lose each other's change.
pub trait Location: Send + Sync {
    /// Current address parameters.
    fn read(&self) -> AddressParameters;

    /// Merge a patch into the address, replacing only the keys it names.
    fn write(&self, patch: AddressPatch);

    /// Serialized read-merge-write.
    ///
    /// The default implementation is only atomic for single-owner locations;
    /// shared implementations must override it and hold their lock across the
    /// whole merge.
    fn update(&self, merge: &dyn Fn(&AddressParameters) -> AddressPatch) {
        let patch = merge(&self.read());
        self.write(patch);
    }

    /// `path?query`, or just `path` when the address is empty.
    fn href(&self, path: &str) -> String {
        let query = self.read().to_query();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        }
    }
}

/// In-memory location.
///
/// Clones share the same address. Used as the test fake and as the
/// per-request location when serving list views.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLocation {
    address: Arc<Mutex<AddressParameters>>,
}

impl InMemoryLocation {
    /// Empty address.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing address.
    #[must_use]
    pub fn with_params(params: AddressParameters) -> Self {
        Self {
            address: Arc::new(Mutex::new(params)),
        }
    }

    /// Independent copy of the current address.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self::with_params(self.read())
    }

    fn lock(&self) -> MutexGuard<'_, AddressParameters> {
        self.address.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Location for InMemoryLocation {
    fn read(&self) -> AddressParameters {
        self.lock().clone()
    }

    fn write(&self, patch: AddressPatch) {
        self.lock().apply(patch);
    }

    fn update(&self, merge: &dyn Fn(&AddressParameters) -> AddressPatch) {
        let mut address = self.lock();
        let patch = merge(&address);
        address.apply(patch);
    }
}

impl<L: Location + ?Sized> Location for Arc<L> {
    fn read(&self) -> AddressParameters {
        (**self).read()
    }

    fn write(&self, patch: AddressPatch) {
        (**self).write(patch);
    }

    fn update(&self, merge: &dyn Fn(&AddressParameters) -> AddressPatch) {
        (**self).update(merge);
    }

    fn href(&self, path: &str) -> String {
        (**self).href(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;

    #[test]
    fn test_write_merges_keys() {
        let location = InMemoryLocation::new();
        location.write(AddressPatch::new().set("page", "2"));
        location.write(AddressPatch::new().set("order", "name"));

        let address = location.read();
        assert_eq!(address.len(), 2);
        assert!(address.contains("page"));
        assert!(address.contains("order"));
    }

    #[test]
    fn test_clones_share_fork_does_not() {
        let location = InMemoryLocation::new();
        let shared = location.clone();
        let forked = location.fork();

        shared.write(AddressPatch::new().set("page", "4"));

        assert!(location.read().contains("page"));
        assert!(!forked.read().contains("page"));
    }

    #[test]
    fn test_update_sees_latest_state() {
        let location = InMemoryLocation::new();
        location.write(AddressPatch::new().set("page", "2"));

        location.update(&|current| {
            assert_eq!(current.get("page").and_then(ParamValue::as_single), Some("2"));
            AddressPatch::new().set("per_page", "50")
        });

        let address = location.read();
        assert!(address.contains("page"));
        assert!(address.contains("per_page"));
    }

    #[test]
    fn test_href() {
        let location = InMemoryLocation::new();
        assert_eq!(location.href("/orders"), "/orders");

        location.write(AddressPatch::new().set("page", "2"));
        assert_eq!(location.href("/orders"), "/orders?page=2");
    }
}
