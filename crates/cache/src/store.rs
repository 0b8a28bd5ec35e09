use crate::error::CacheError;
use std::fmt::Debug;
use std::path::PathBuf;
use taglet_template_core::CompiledArtifact;

/// Persistent storage for compiled artifacts.
///
/// Stores do not judge freshness; that is the [`CacheManager`](crate::CacheManager)'s job.
pub trait CacheStore: Send + Sync + Debug {
    /// Loads the artifact stored under `key`, or `None` if there is none.
    fn load(&self, key: &str) -> Result<Option<CompiledArtifact>, CacheError>;

    /// Stores `artifact` under `key`, replacing any previous one.
    ///
    /// Concurrent writers of the same key may race; the last complete write
    /// wins and a reader never sees a partial artifact.
    fn store(&self, key: &str, artifact: &CompiledArtifact) -> Result<(), CacheError>;

    fn remove(&self, key: &str) -> Result<(), CacheError>;

    fn clear(&self) -> Result<(), CacheError>;

    /// Returns a human-readable name for this store (for logging/debugging).
    fn name(&self) -> &'static str;
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Stable key for a source identity: FNV-1a 64 over the candidate paths,
/// each terminated by a NUL byte, as 16 hex digits.
///
/// `std::hash` output is not stable across releases, so it cannot be used
/// for keys that outlive the process.
pub fn cache_key(source_identity: &[PathBuf]) -> String {
    let mut hash = FNV_OFFSET;
    for path in source_identity {
        for byte in path.to_string_lossy().bytes().chain(std::iter::once(0)) {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    format!("{:016x}", hash)
}
