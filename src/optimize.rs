//! Vertex cache optimization for GPU-friendly triangle ordering
//!
//! Reorders a triangle index list in place so that vertex references hit
//! the GPU post-transform cache as often as possible. Greedy heuristic over
//! a vertex/triangle adjacency graph: every vertex carries a score built
//! from its cache position and valence, every triangle carries the sum of
//! its three vertex scores, and the highest-scoring unplaced triangle is
//! emitted next.
//!
//! # Scoring
//!
//! - Valence term `2/sqrt(remaining)` favors vertices about to run out of
//!   triangles, so nearly-orphaned vertices are consumed promptly.
//! - Cache position term `((cache_size - pos) / (cache_size - 3))^1.5`
//!   favors recently used vertices still near the front of the simulated
//!   FIFO window. The three freshly inserted slots and the three slack
//!   slots past the FIFO boundary contribute nothing.
//!
//! The selection scan is O(T^2) over the triangle count. This runs at
//! asset-build time, not per frame; determinism (lowest triangle id wins
//! score ties) is worth more here than asymptotics.
//!
//! Author: Moroya Sakamoto

use crate::types::Mesh;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Exponent of the cache position falloff curve
const CACHE_DECAY_POWER: f32 = 1.5;
/// Scale of the valence term `2/sqrt(remaining)`
const VALENCE_BOOST_SCALE: f32 = 2.0;

/// Default simulated cache capacity, matching common desktop GPUs
pub const DEFAULT_CACHE_SIZE: usize = 32;

/// Vertex cache optimization errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizeError {
    /// Fewer than 3 indices in the segment
    #[error("index count {count} is too small for a triangle list (need at least 3)")]
    TooFewIndices {
        /// Number of indices in the rejected segment
        count: usize,
    },

    /// Segment length is not a whole number of triangles
    #[error("index count {count} is not a multiple of 3")]
    NotTriangleList {
        /// Number of indices in the rejected segment
        count: usize,
    },

    /// Simulated cache too small for the scoring curve
    #[error("cache size {cache_size} is below the minimum of 4")]
    CacheTooSmall {
        /// Rejected cache capacity
        cache_size: usize,
    },

    /// Submesh counts overrun the shared index buffer
    #[error("submesh layout needs {needed} indices but only {available} are available")]
    BadSubmeshLayout {
        /// Total indices requested by the submesh counts
        needed: usize,
        /// Indices actually present in the buffer
        available: usize,
    },
}

/// Optimizer configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OptimizeConfig {
    /// Simulated post-transform cache capacity (must be >= 4)
    pub cache_size: usize,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        OptimizeConfig {
            cache_size: DEFAULT_CACHE_SIZE,
        }
    }
}

impl OptimizeConfig {
    /// Conservative configuration for older/mobile GPUs (16-entry cache)
    pub fn small() -> Self {
        OptimizeConfig { cache_size: 16 }
    }
}

struct TriData {
    added: bool,
    score: f32,
    verts: [u32; 3],
}

#[derive(Clone, Default)]
struct VertData {
    score: f32,
    remaining: Vec<u32>,
}

/// Falloff curve over cache window positions, length `cache_size + 3`.
///
/// Positions 0..=2 are the slots the current triangle's vertices are about
/// to occupy and score zero, as do the three slack slots past the FIFO
/// boundary.
fn cache_position_scores(cache_size: usize) -> Vec<f32> {
    let mut scores = vec![0.0f32; cache_size + 3];
    let falloff = (cache_size - 3) as f32;
    for (pos, score) in scores.iter_mut().enumerate().take(cache_size).skip(3) {
        *score = ((cache_size - pos) as f32 / falloff).powf(CACHE_DECAY_POWER);
    }
    scores
}

/// Reorder a triangle index list in place for vertex cache efficiency
///
/// Whole triangles are reordered; the three indices inside a triangle keep
/// their relative order, so winding is preserved. Runs a single greedy pass
/// and is fully deterministic: equal scores resolve to the lowest triangle
/// id, and two runs over the same input produce byte-identical output.
///
/// # Arguments
/// * `indices` - Flat triangle list segment, mutated in place
/// * `cache_size` - Simulated post-transform cache capacity (>= 4)
///
/// # Returns
/// `Ok(())` on success. On error the buffer is untouched.
///
/// # Errors
/// [`OptimizeError::TooFewIndices`] if the segment holds fewer than 3
/// indices, [`OptimizeError::NotTriangleList`] if its length is not a
/// multiple of 3, [`OptimizeError::CacheTooSmall`] if `cache_size < 4`.
pub fn optimize_vertex_cache_order(
    indices: &mut [u32],
    cache_size: usize,
) -> Result<(), OptimizeError> {
    let count = indices.len();
    if count < 3 {
        return Err(OptimizeError::TooFewIndices { count });
    }
    if count % 3 != 0 {
        return Err(OptimizeError::NotTriangleList { count });
    }
    if cache_size < 4 {
        return Err(OptimizeError::CacheTooSmall { cache_size });
    }

    let num_triangles = count / 3;
    let num_vertices = indices.iter().copied().max().unwrap_or(0) as usize + 1;

    let position_score = cache_position_scores(cache_size);

    let mut tris: Vec<TriData> = indices
        .chunks_exact(3)
        .map(|t| TriData {
            added: false,
            score: 0.0,
            verts: [t[0], t[1], t[2]],
        })
        .collect();

    let mut verts: Vec<VertData> = vec![VertData::default(); num_vertices];
    for (t, tri) in tris.iter().enumerate() {
        for &v in &tri.verts {
            verts[v as usize].remaining.push(t as u32);
        }
    }
    for vert in verts.iter_mut() {
        // Ids inside the dense range that no triangle references stay at
        // zero instead of evaluating 2/sqrt(0).
        vert.score = if vert.remaining.is_empty() {
            0.0
        } else {
            VALENCE_BOOST_SCALE / (vert.remaining.len() as f32).sqrt()
        };
    }
    for tri in tris.iter_mut() {
        tri.score = tri.verts.iter().map(|&v| verts[v as usize].score).sum();
    }

    // Simulated cache window: cache_size slots plus 3 slack slots so a full
    // triangle can enter before the tail falls off.
    let mut window: Vec<Option<u32>> = vec![None; cache_size + 3];
    let mut next_window: Vec<Option<u32>> = vec![None; cache_size + 3];

    for placed in 0..num_triangles {
        let mut best: Option<usize> = None;
        let mut best_score = 0.0f32;
        for (t, tri) in tris.iter().enumerate() {
            if !tri.added && tri.score > best_score {
                best_score = tri.score;
                best = Some(t);
            }
        }
        // Unplaced triangles always keep a positive score, so the fallback
        // only guards the unreachable all-nonpositive case.
        let best = match best.or_else(|| tris.iter().position(|tri| !tri.added)) {
            Some(t) => t,
            None => break,
        };

        let [a, b, c] = tris[best].verts;
        let out = placed * 3;
        indices[out] = a;
        indices[out + 1] = b;
        indices[out + 2] = c;

        tris[best].added = true;
        for v in [a, b, c] {
            verts[v as usize].remaining.retain(|&t| t as usize != best);
        }

        // Grow and compact: the fresh three enter at the front, prior
        // entries follow minus any duplicate of the fresh three, and
        // whatever no longer fits in the first cache_size slots falls off.
        for slot in next_window.iter_mut() {
            *slot = None;
        }
        next_window[0] = Some(a);
        next_window[1] = Some(b);
        next_window[2] = Some(c);
        let mut fill = 3;
        for &slot in window.iter().take(cache_size) {
            if let Some(v) = slot {
                if v != a && v != b && v != c {
                    next_window[fill] = Some(v);
                    fill += 1;
                }
            }
        }
        std::mem::swap(&mut window, &mut next_window);

        // Rescore every cached vertex and push the delta onto the
        // triangles still referencing it. Exhausted vertices are skipped:
        // nothing can select them again and 1/sqrt(0) is not a score.
        for (pos, &slot) in window.iter().enumerate() {
            if let Some(v) = slot {
                let vert = &mut verts[v as usize];
                if vert.remaining.is_empty() {
                    continue;
                }
                let new_score = position_score[pos]
                    + VALENCE_BOOST_SCALE / (vert.remaining.len() as f32).sqrt();
                let delta = new_score - vert.score;
                vert.score = new_score;
                for &t in &vert.remaining {
                    tris[t as usize].score += delta;
                }
            }
        }
    }

    log::debug!(
        "vertex cache order: {} triangles reordered against a {}-entry cache",
        num_triangles,
        cache_size
    );

    Ok(())
}

/// Reorder a mesh's triangle list in place for vertex cache efficiency
///
/// Convenience wrapper over [`optimize_vertex_cache_order`] for whole
/// meshes; only `mesh.indices` is touched.
///
/// # Errors
/// Same as [`optimize_vertex_cache_order`]; an empty mesh is rejected as
/// [`OptimizeError::TooFewIndices`].
pub fn optimize_mesh(mesh: &mut Mesh, config: &OptimizeConfig) -> Result<(), OptimizeError> {
    optimize_vertex_cache_order(&mut mesh.indices, config.cache_size)
}
