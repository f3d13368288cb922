//! Parallel per-submesh optimization
//!
//! Index buffers are usually shared: one allocation, consecutive segments
//! per submesh/material. Each segment is an independent optimization
//! problem, so the batch entry points split the buffer once and fan the
//! segments out with rayon. Disjoint `&mut` segments keep the in-place
//! mutation race-free.
//!
//! All segments are validated before any of them is touched: a bad count
//! anywhere leaves the whole buffer unchanged.
//!
//! Author: Moroya Sakamoto

use crate::cache::average_cache_miss_ratio;
use crate::optimize::{optimize_vertex_cache_order, OptimizeError};
use rayon::prelude::*;

fn validate_layout(available: usize, counts: &[usize]) -> Result<(), OptimizeError> {
    let needed: usize = counts.iter().sum();
    if needed > available {
        return Err(OptimizeError::BadSubmeshLayout { needed, available });
    }
    Ok(())
}

/// Optimize consecutive submesh segments of a shared index buffer in parallel
///
/// `counts[i]` is the index count of the i-th submesh; segments are taken
/// consecutively from the front of `indices`. A trailing remainder not
/// covered by `counts` is left untouched.
///
/// # Arguments
/// * `indices` - Shared index buffer, mutated in place
/// * `counts` - Per-submesh index counts, in buffer order
/// * `cache_size` - Simulated post-transform cache capacity (>= 4)
///
/// # Errors
/// [`OptimizeError::BadSubmeshLayout`] if the counts overrun the buffer,
/// otherwise the per-segment preconditions of
/// [`optimize_vertex_cache_order`]. Nothing is mutated on error.
pub fn optimize_submeshes(
    indices: &mut [u32],
    counts: &[usize],
    cache_size: usize,
) -> Result<(), OptimizeError> {
    validate_layout(indices.len(), counts)?;
    if cache_size < 4 {
        return Err(OptimizeError::CacheTooSmall { cache_size });
    }
    for &count in counts {
        if count < 3 {
            return Err(OptimizeError::TooFewIndices { count });
        }
        if count % 3 != 0 {
            return Err(OptimizeError::NotTriangleList { count });
        }
    }

    let mut segments: Vec<&mut [u32]> = Vec::with_capacity(counts.len());
    let mut rest = indices;
    for &count in counts {
        let (seg, tail) = std::mem::take(&mut rest).split_at_mut(count);
        segments.push(seg);
        rest = tail;
    }

    segments
        .into_par_iter()
        .try_for_each(|seg| optimize_vertex_cache_order(seg, cache_size))?;

    log::debug!(
        "optimized {} submeshes against a {}-entry cache",
        counts.len(),
        cache_size
    );

    Ok(())
}

/// Estimate the cache miss ratio of each submesh segment in parallel
///
/// Read-only counterpart of [`optimize_submeshes`] over the same
/// segmentation; per-segment sentinel semantics are those of
/// [`average_cache_miss_ratio`].
///
/// # Errors
/// [`OptimizeError::BadSubmeshLayout`] if the counts overrun the buffer.
pub fn acmr_per_submesh(
    indices: &[u32],
    counts: &[usize],
    cache_size: usize,
) -> Result<Vec<f32>, OptimizeError> {
    validate_layout(indices.len(), counts)?;

    let mut segments: Vec<&[u32]> = Vec::with_capacity(counts.len());
    let mut rest = indices;
    for &count in counts {
        let (seg, tail) = rest.split_at(count);
        segments.push(seg);
        rest = tail;
    }

    Ok(segments
        .into_par_iter()
        .map(|seg| average_cache_miss_ratio(seg, cache_size))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_matches_sequential() {
        let quad = [0u32, 1, 2, 0, 2, 3];
        let strip: Vec<u32> = (0u32..6).flat_map(|i| [i, i + 1, i + 2]).collect();

        let mut shared: Vec<u32> = quad.iter().copied().chain(strip.iter().copied()).collect();
        optimize_submeshes(&mut shared, &[quad.len(), strip.len()], 4).unwrap();

        let mut quad_alone = quad.to_vec();
        let mut strip_alone = strip.clone();
        optimize_vertex_cache_order(&mut quad_alone, 4).unwrap();
        optimize_vertex_cache_order(&mut strip_alone, 4).unwrap();

        assert_eq!(&shared[..quad.len()], &quad_alone[..]);
        assert_eq!(&shared[quad.len()..], &strip_alone[..]);
    }

    #[test]
    fn test_trailing_remainder_untouched() {
        let mut shared = vec![0u32, 1, 2, 0, 2, 3, 9, 8, 7];
        optimize_submeshes(&mut shared, &[6], 16).unwrap();
        assert_eq!(&shared[6..], &[9, 8, 7]);
    }

    #[test]
    fn test_layout_overrun_is_rejected() {
        let mut shared = vec![0u32, 1, 2, 0, 2, 3];
        let before = shared.clone();
        let err = optimize_submeshes(&mut shared, &[6, 6], 16).unwrap_err();
        assert_eq!(
            err,
            OptimizeError::BadSubmeshLayout {
                needed: 12,
                available: 6
            }
        );
        assert_eq!(shared, before);
    }

    #[test]
    fn test_any_bad_segment_blocks_all_mutation() {
        // Second count is not a whole number of triangles; the valid first
        // segment must stay untouched too.
        let mut shared = vec![0u32, 1, 2, 0, 2, 3, 4, 5];
        let before = shared.clone();
        let err = optimize_submeshes(&mut shared, &[6, 2], 16).unwrap_err();
        assert_eq!(err, OptimizeError::TooFewIndices { count: 2 });
        assert_eq!(shared, before);
    }

    #[test]
    fn test_acmr_per_submesh() {
        let shared = vec![0u32, 1, 2, 3, 4, 5, 0, 1, 2, 0, 1, 2, 0, 1, 2];
        let ratios = acmr_per_submesh(&shared, &[6, 9], 4).unwrap();
        assert_eq!(ratios.len(), 2);
        assert!((ratios[0] - 3.0).abs() < 1e-6);
        assert!((ratios[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_acmr_per_submesh_sentinels() {
        let shared = vec![0u32, 1, 2, 0, 1, 2];
        let ratios = acmr_per_submesh(&shared, &[3, 3], 16).unwrap();
        assert_eq!(ratios, vec![-1.0, -1.0]);
    }
}
