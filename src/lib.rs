//! # ALICE-VCache
//!
//! **A.L.I.C.E. - Adaptive Lightweight Index Cache Engine**
//!
//! Offline post-processing for triangle index buffers. Reorders whole
//! triangles so that vertex references land in the GPU post-transform
//! cache instead of re-running the vertex stage, and measures how well a
//! given ordering would behave under a simulated fixed-size FIFO cache.
//!
//! ## Features
//!
//! - **Optimizer**: greedy score-driven triangle reordering (in place,
//!   deterministic, tool-time)
//! - **Estimator**: ACMR (average cache misses per triangle) under a FIFO
//!   cache model
//! - **Batch**: per-submesh parallel optimization of a shared index buffer
//! - **Mesh carrier**: minimal `Mesh`/`Vertex`/`Triangle` types for
//!   pipelines that pass whole meshes around
//!
//! ## Example
//!
//! ```rust
//! use alice_vcache::prelude::*;
//!
//! // A short triangle strip as a raw index list (three indices per triangle)
//! let mut indices: Vec<u32> = (0u32..8).flat_map(|i| [i, i + 1, i + 2]).collect();
//!
//! let before = average_cache_miss_ratio(&indices, 4);
//! optimize_vertex_cache_order(&mut indices, 4).unwrap();
//! let after = average_cache_miss_ratio(&indices, 4);
//!
//! assert!(after <= before);
//! ```
//!
//! ## Author
//!
//! Moroya Sakamoto

#![warn(missing_docs)]

pub mod cache;
pub mod optimize;
pub mod parallel;
pub mod types;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::cache::{average_cache_miss_ratio, mesh_acmr};
    pub use crate::optimize::{
        optimize_mesh, optimize_vertex_cache_order, OptimizeConfig, OptimizeError,
        DEFAULT_CACHE_SIZE,
    };
    pub use crate::parallel::{acmr_per_submesh, optimize_submeshes};
    pub use crate::types::{Mesh, Triangle, Vertex};
}

// Re-exports for convenience
pub use cache::average_cache_miss_ratio;
pub use optimize::{optimize_vertex_cache_order, OptimizeConfig, OptimizeError};
pub use types::Mesh;
