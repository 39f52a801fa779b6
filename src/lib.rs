//! chained-hashmap: a separate-chaining hash table whose buckets are
//! growable vectors with an explicit load-factor policy.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: two small containers that share one capacity policy and can be
//!   reasoned about independently.
//! - Layers:
//!   - Vector<T>: contiguous owned sequence. Grows by `growth_factor` when a
//!     push would push the load factor over `max_load_factor`; shrinks when
//!     a removal would take it under `min_load_factor`. Erase compacts.
//!   - ChainedHashMap<K, V, S>: power-of-two array of optional buckets, each
//!     bucket a `Vector` of entries. Grows before an insert and shrinks
//!     before an erase using the same one-ahead load-factor check.
//!   - Pair<K, V>: owned key/value unit stored in the buckets.
//!
//! Constraints
//! - Single-threaded, exclusive owner; no interior mutability.
//! - Unique keys: duplicate inserts fail, they never overwrite.
//! - Lookups and erases go straight to `hash & (capacity - 1)`.
//! - Every fallible operation returns `Result`; allocation failures come
//!   from fallible reservation and never leave a half-resized table.
//!
//! Hashing and rehash invariants
//! - Each entry stores the `u64` hash computed at insertion. A rehash
//!   places entries by their stored hash, so `K: Hash` never runs during a
//!   resize and a resize never calls into user code at all.
//! - A rehash sizes every destination bucket before moving anything. Once
//!   the first entry moves, nothing can fail.
//!
//! Capabilities
//! - Copy, compare and free map to `Clone`, `Eq` and `Drop`. Copies are
//!   only made where the caller asks for one (`insert_pair`,
//!   `push_back_cloned`); everything else moves.
//!
//! Notes and non-goals
//! - Iteration order depends on hashes and capacity and is unspecified.
//! - No persistence of table contents; the `serde` feature only covers the
//!   config types.
//! - Resizes are reported through `tracing` at debug (table) and trace
//!   (vector) level; the crate installs no subscriber.

mod chained_hash_map;
mod chained_hash_map_proptest;
pub mod config;
mod error;
mod pair;
mod vector;

// Public surface
pub use chained_hash_map::{ChainedHashMap, Iter, IterMut};
pub use config::{TableConfig, VectorConfig};
pub use error::{Error, Result};
pub use pair::Pair;
pub use vector::Vector;
