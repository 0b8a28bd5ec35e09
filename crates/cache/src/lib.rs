//! Compiled-artifact cache for the taglet template compiler.
//!
//! Artifacts are keyed by the full ordered list of candidate paths of a
//! logical template and are reused as long as no existing file in that list
//! has been modified after the artifact was recorded.
//!
//! ## Available Stores
//!
//! - [`FilesystemCacheStore`]: One JSON file per artifact, written atomically
//! - [`InMemoryCacheStore`]: Process-local map, for tests and embedding

mod error;
mod filesystem;
mod manager;
mod memory;
mod store;

pub use error::CacheError;
pub use filesystem::FilesystemCacheStore;
pub use manager::CacheManager;
pub use memory::InMemoryCacheStore;
pub use store::{CacheStore, cache_key};
