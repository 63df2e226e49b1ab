//! Type-safe persisted key-value storage for the cart store.
//!
//! Values are stored as JSON under string keys. The [`Cache`] wrapper does the
//! serialization; a [`Backend`] decides where the bytes live.
//!
//! # Example
//!
//! ```rust
//! use cart_storage::{cache_key, Cache, MemoryBackend};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Badge {
//!     count: u32,
//! }
//!
//! let cache = Cache::new(MemoryBackend::new());
//! let key = cache_key!("badge", "user-1");
//!
//! cache.set(&key, &Badge { count: 3 }).unwrap();
//! let badge: Option<Badge> = cache.get(&key).unwrap();
//! assert_eq!(badge, Some(Badge { count: 3 }));
//!
//! cache.delete(&key).unwrap();
//! assert!(!cache.exists(&key).unwrap());
//! ```

mod backend;
mod error;
mod kv;

pub use backend::{Backend, FileBackend, MemoryBackend};
pub use error::CacheError;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Backend, Cache, CacheError, FileBackend, MemoryBackend};
}
