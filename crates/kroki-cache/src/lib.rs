//! Content-addressed storage for rendered diagrams.
//!
//! - [`DiagramKey`]: computes the [`Digest`] of a (type, source) pair
//! - [`DiagramCache`]: maps digests to files under a cache directory
//!
//! # Example
//!
//! ```no_run
//! use kroki_cache::DiagramCache;
//!
//! let cache = DiagramCache::open(".kroki-cache", "svg")?;
//! let digest = cache.key_for("graphviz", "digraph { a -> b }");
//! let path = cache.path_for(&digest);
//! if !cache.exists(&path) {
//!     cache.store(&path, b"<svg></svg>")?;
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

mod key;
mod store;

pub use key::{DiagramKey, Digest};
pub use store::DiagramCache;
