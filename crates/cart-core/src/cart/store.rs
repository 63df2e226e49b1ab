//! Persisted cart store.

use cart_storage::{cache_key, Backend, Cache, MemoryBackend};

use crate::cart::{CartChange, CartCommand, CartLine, CartState, CartTotals};
use crate::catalog::ProductSnapshot;
use crate::ids::{OwnerId, ProductId};
use crate::session::IdentityEvent;

/// Storage key used when none is configured.
pub fn default_state_key() -> String {
    cache_key!("cart", "state")
}

/// A cart state bound to a storage location.
///
/// The state is rehydrated once in [`CartStore::open`] and mirrored back to
/// storage after every command that changed it. Persistence is best effort:
/// a failed write is logged and the in-memory state stays authoritative.
#[derive(Debug)]
pub struct CartStore<B: Backend> {
    state: CartState,
    cache: Cache<B>,
    key: String,
}

impl CartStore<MemoryBackend> {
    /// A store backed by process memory.
    pub fn in_memory() -> Self {
        Self::open(MemoryBackend::new(), default_state_key())
    }
}

impl<B: Backend> CartStore<B> {
    /// Open a store, loading any state persisted under `key`.
    ///
    /// Missing or unreadable data yields an empty cart.
    pub fn open(backend: B, key: impl Into<String>) -> Self {
        let cache = Cache::new(backend);
        let key = key.into();
        let state = match cache.get::<CartState>(&key) {
            Ok(Some(mut state)) => {
                let repaired = state.repair();
                if repaired > 0 {
                    tracing::warn!(key = %key, repaired, "dropped invalid persisted cart lines");
                }
                tracing::debug!(key = %key, owners = state.owners().len(), "rehydrated cart");
                state
            }
            Ok(None) => CartState::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "could not rehydrate cart, starting empty");
                CartState::new()
            }
        };

        Self { state, cache, key }
    }

    /// Apply a command and persist the result if anything changed.
    pub fn dispatch(&mut self, command: CartCommand) -> CartChange {
        let change = self.state.apply(command);
        if change.is_applied() {
            self.persist();
        }
        change
    }

    /// Write the current state to storage. Failures are logged, not returned.
    pub fn persist(&self) {
        if let Err(e) = self.cache.set(&self.key, &self.state) {
            tracing::warn!(key = %self.key, error = %e, "failed to persist cart");
        }
    }

    /// Add a product for an owner, merging with an existing line.
    pub fn add(&mut self, owner_id: &OwnerId, product: ProductSnapshot, quantity: i64) -> CartChange {
        self.dispatch(CartCommand::Add {
            owner_id: owner_id.clone(),
            product,
            quantity,
        })
    }

    /// Remove an owner's line for a product.
    pub fn remove(&mut self, owner_id: &OwnerId, product_id: &ProductId) -> CartChange {
        self.dispatch(CartCommand::Remove {
            owner_id: owner_id.clone(),
            product_id: product_id.clone(),
        })
    }

    /// Set an owner's line quantity; zero or less removes the line.
    pub fn update_quantity(&mut self, owner_id: &OwnerId, product_id: &ProductId, quantity: i64) -> CartChange {
        self.dispatch(CartCommand::UpdateQuantity {
            owner_id: owner_id.clone(),
            product_id: product_id.clone(),
            quantity,
        })
    }

    /// Clear one owner's lines, or all lines.
    pub fn clear(&mut self, owner_id: Option<&OwnerId>) -> CartChange {
        self.dispatch(CartCommand::Clear {
            owner_id: owner_id.cloned(),
        })
    }

    /// Record the most recently used owner.
    pub fn set_active_owner(&mut self, owner_id: &OwnerId) -> CartChange {
        self.dispatch(CartCommand::SetActiveOwner {
            owner_id: owner_id.clone(),
        })
    }

    /// React to a login or logout from the identity provider.
    pub fn on_identity(&mut self, event: IdentityEvent) -> CartChange {
        self.dispatch(event.into_command())
    }

    /// An owner's lines in insertion order.
    pub fn lines_for(&self, owner_id: &OwnerId) -> Vec<&CartLine> {
        self.state.lines_for(owner_id)
    }

    /// Item count and subtotal for an owner.
    pub fn totals(&self, owner_id: &OwnerId) -> CartTotals {
        self.state.totals(owner_id)
    }

    /// The advisory most-recently-used owner.
    pub fn active_owner(&self) -> Option<&OwnerId> {
        self.state.active_owner()
    }

    /// Read-only view of the whole state.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// The storage key this store mirrors to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the storage cache.
    pub fn cache(&self) -> &Cache<B> {
        &self.cache
    }

    /// Tear down the store, keeping only the in-memory state.
    pub fn into_state(self) -> CartState {
        self.state
    }

    /// Tear down the store, returning the backend for reuse.
    pub fn into_backend(self) -> B {
        self.cache.into_backend()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_storage::CacheError;
    use rust_decimal::Decimal;

    /// Backend that refuses writes, like a full quota.
    #[derive(Default)]
    struct ReadOnlyBackend {
        inner: MemoryBackend,
    }

    impl Backend for ReadOnlyBackend {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            self.inner.get(key)
        }

        fn set(&self, _key: &str, _value: &[u8]) -> Result<(), CacheError> {
            Err(CacheError::StoreError("quota exceeded".into()))
        }

        fn delete(&self, key: &str) -> Result<(), CacheError> {
            self.inner.delete(key)
        }

        fn keys(&self) -> Result<Vec<String>, CacheError> {
            self.inner.keys()
        }
    }

    fn widget() -> ProductSnapshot {
        ProductSnapshot::new("w", "Widget", Decimal::new(250, 2))
    }

    #[test]
    fn test_default_key() {
        assert_eq!(default_state_key(), "cart:state");
    }

    #[test]
    fn test_mutations_are_mirrored() {
        let mut store = CartStore::in_memory();
        let u = OwnerId::new("u");
        store.add(&u, widget(), 2);

        let saved: CartState = store.cache().get(store.key()).unwrap().unwrap();
        assert_eq!(&saved, store.state());
    }

    #[test]
    fn test_ignored_commands_do_not_write() {
        let mut store = CartStore::in_memory();
        store.remove(&OwnerId::new("u"), &ProductId::new("nothing"));
        assert!(!store.cache().exists(store.key()).unwrap());
    }

    #[test]
    fn test_reopen_rehydrates() {
        let u = OwnerId::new("u");
        let mut store = CartStore::in_memory();
        store.add(&u, widget(), 3);
        let backend = store.into_backend();

        let store = CartStore::open(backend, default_state_key());
        assert_eq!(store.lines_for(&u).len(), 1);
        assert_eq!(store.totals(&u).item_count, 3);
        assert_eq!(store.active_owner(), Some(&u));
    }

    #[test]
    fn test_corrupt_data_starts_empty() {
        let backend = MemoryBackend::new();
        backend.set("cart:state", b"not json at all").unwrap();

        let store = CartStore::open(backend, "cart:state");
        assert!(store.state().is_empty());
    }

    #[test]
    fn test_rehydrate_drops_negative_prices() {
        let backend = MemoryBackend::new();
        backend
            .set(
                "cart:state",
                br#"{"lines":[{"product":{"id":"a","price":"-5.00"},"quantity":2,"owner_id":"u"}]}"#,
            )
            .unwrap();

        let store = CartStore::open(backend, "cart:state");
        let u = OwnerId::new("u");
        assert!(store.lines_for(&u).is_empty());
        assert_eq!(store.totals(&u).subtotal, Decimal::ZERO);
    }

    #[test]
    fn test_into_state_round_trips() {
        let u = OwnerId::new("u");
        let mut store = CartStore::in_memory();
        store.add(&u, widget(), 2);

        let state = store.into_state();
        let json = serde_json::to_string(&state).unwrap();
        let restored: CartState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
        assert_eq!(restored.totals(&u).item_count, 2);
    }

    #[test]
    fn test_persist_failure_keeps_memory_state() {
        let u = OwnerId::new("u");
        let mut store = CartStore::open(ReadOnlyBackend::default(), "cart:state");

        assert!(store.add(&u, widget(), 1).is_applied());
        assert!(store.add(&u, widget(), 1).is_applied());
        assert_eq!(store.totals(&u).item_count, 2);
    }

    #[test]
    fn test_identity_events() {
        let u = OwnerId::new("u");
        let mut store = CartStore::in_memory();

        store.on_identity(IdentityEvent::LoggedIn(u.clone()));
        assert_eq!(store.active_owner(), Some(&u));

        store.add(&u, widget(), 1);
        store.add(&OwnerId::new("v"), widget(), 1);
        store.on_identity(IdentityEvent::LoggedOut);
        assert!(store.state().is_empty());
        assert_eq!(store.active_owner(), None);
    }
}
