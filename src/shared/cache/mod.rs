mod response_cache;

pub use response_cache::{CacheStats, MemoryResponseCache, ResponseCache};

/// Tag covering every cached movie-facing read (landing page, movie detail).
/// Coarse-grained on purpose: any aggregate write evicts the whole group.
pub const MOVIES_TAG: &str = "movies";
