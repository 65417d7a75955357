#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::HashMap;

    pub type BuildHasher = std::collections::hash_map::RandomState;
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use rustc_hash::FxHashMap as HashMap;

    pub type BuildHasher = rustc_hash::FxBuildHasher;
}

/// Insertion-ordered map used for element properties.
pub type OrderedMap<K, V> = indexmap::IndexMap<K, V, map::BuildHasher>;
