//! Simulated vertex cache and cache miss estimation
//!
//! Replays an index sequence against a fixed-capacity FIFO cache (circular
//! write cursor, no reuse promotion - real post-transform caches are FIFO,
//! not LRU) and reports the average number of misses per triangle (ACMR).
//!
//! The estimator is the measurement half of the crate: run it before and
//! after [`crate::optimize::optimize_vertex_cache_order`] to see what a
//! reorder bought. O(n * cache_size), fine for tooling and tests, not for
//! per-frame use.
//!
//! Author: Moroya Sakamoto

use crate::optimize::OptimizeConfig;
use crate::types::Mesh;

/// Average cache miss ratio of a triangle index sequence
///
/// Simulates a FIFO vertex cache with `cache_size` entries, all initially
/// empty. Every index is looked up with a linear scan; a miss stores the
/// index at the write cursor and advances the cursor circularly. Hits do
/// not touch the cache.
///
/// # Arguments
/// * `indices` - Flat triangle list segment (read-only)
/// * `cache_size` - Simulated cache capacity
///
/// # Returns
/// Misses divided by triangle count, or exactly `-1.0` when the segment
/// cannot exceed the cache (`indices.len() <= cache_size`, or a zero-size
/// cache): every vertex trivially fits and the ratio is uninformative.
pub fn average_cache_miss_ratio(indices: &[u32], cache_size: usize) -> f32 {
    let count = indices.len();
    if count <= cache_size || cache_size == 0 {
        return -1.0;
    }

    let mut cache: Vec<Option<u32>> = vec![None; cache_size];
    let mut cursor = 0usize;
    let mut misses = 0u32;

    for &index in indices {
        let hit = cache.iter().any(|&slot| slot == Some(index));
        if !hit {
            cache[cursor] = Some(index);
            cursor = (cursor + 1) % cache_size;
            misses += 1;
        }
    }

    misses as f32 / (count as f32 / 3.0)
}

/// Average cache miss ratio of a mesh's triangle list
///
/// Convenience wrapper over [`average_cache_miss_ratio`] for whole meshes.
pub fn mesh_acmr(mesh: &Mesh, config: &OptimizeConfig) -> f32 {
    average_cache_miss_ratio(&mesh.indices, config.cache_size)
}
