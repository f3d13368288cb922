//! Common test helpers for ALICE-VCache integration tests
//!
//! Author: Moroya Sakamoto

// ============================================================================
// Standard test geometry
// ============================================================================

/// Single quad: two triangles sharing the 0-2 diagonal
#[allow(dead_code)]
pub fn quad_indices() -> Vec<u32> {
    vec![0, 1, 2, 0, 2, 3]
}

/// Triangle strip of `n` edge-sharing triangles (`n + 2` distinct vertices)
#[allow(dead_code)]
pub fn strip_indices(n: u32) -> Vec<u32> {
    (0..n).flat_map(|i| [i, i + 1, i + 2]).collect()
}

/// 8x8 quad grid (128 triangles, 81 vertices) with the triangle order
/// scattered by a fixed stride permutation
///
/// Row-major grid order already has decent locality; the stride-37 scatter
/// (coprime with 128, so still a permutation) destroys it, which gives the
/// optimizer something real to win back. Fully deterministic.
#[allow(dead_code)]
pub fn shuffled_grid_indices() -> Vec<u32> {
    const W: u32 = 8;
    const H: u32 = 8;

    let mut tris: Vec<[u32; 3]> = Vec::new();
    for y in 0..H {
        for x in 0..W {
            let v0 = y * (W + 1) + x;
            let v1 = v0 + 1;
            let v2 = v0 + W + 1;
            let v3 = v2 + 1;
            tris.push([v0, v2, v1]);
            tris.push([v1, v2, v3]);
        }
    }

    let t = tris.len();
    (0..t).flat_map(|i| tris[(i * 37) % t]).collect()
}

// ============================================================================
// Assertion helpers
// ============================================================================

/// Triangle list as a sorted multiset of unordered index triples
///
/// Two index buffers compare equal here exactly when one is a permutation
/// of the other's whole triangles (winding ignored).
#[allow(dead_code)]
pub fn triangle_multiset(indices: &[u32]) -> Vec<[u32; 3]> {
    let mut tris: Vec<[u32; 3]> = indices
        .chunks_exact(3)
        .map(|t| {
            let mut t = [t[0], t[1], t[2]];
            t.sort_unstable();
            t
        })
        .collect();
    tris.sort_unstable();
    tris
}

/// Assert two f32 values are close within tolerance
#[allow(dead_code)]
pub fn assert_close(a: f32, b: f32, tol: f32, msg: &str) {
    assert!(
        (a - b).abs() < tol,
        "{}: {} vs {} (diff={}, tol={})",
        msg,
        a,
        b,
        (a - b).abs(),
        tol
    );
}
