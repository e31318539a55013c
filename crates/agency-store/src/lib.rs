//! Agency Store
//!
//! String key-value persistence used for visitor preferences (theme, reduced
//! motion, animation settings, personalization profile), plus [`Persisted`]
//! for typed access with default-on-failure reads.
//!
//! # Example
//!
//! ```
//! use agency_store::{MemoryStore, Persisted};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new());
//! let reduced_motion = Persisted::new(store, "reduced-motion", false);
//!
//! assert!(!reduced_motion.get());
//! reduced_motion.set(&true);
//! assert!(reduced_motion.get());
//! ```

pub mod backend;
mod error;
mod persisted;

pub use backend::file::FileStore;
pub use backend::memory::MemoryStore;
pub use backend::scoped::ScopedStore;
pub use backend::KeyValueStore;
pub use error::{Result, StoreError};
pub use persisted::Persisted;
