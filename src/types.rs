//! Mesh carrier types
//!
//! Minimal vertex/triangle/mesh containers for pipelines that hand whole
//! meshes to the optimizer instead of raw index slices. The optimizer and
//! estimator only ever touch `Mesh::indices`; vertex attributes ride along
//! untouched.
//!
//! Author: Moroya Sakamoto

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Vertex with position and normal
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vertex {
    /// Position in 3D space
    pub position: Vec3,
    /// Surface normal
    pub normal: Vec3,
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Vertex { position, normal }
    }
}

/// Triangle face indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    /// First vertex index
    pub a: u32,
    /// Second vertex index
    pub b: u32,
    /// Third vertex index
    pub c: u32,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Triangle { a, b, c }
    }

    /// The three vertex indices in face order
    pub fn indices(&self) -> [u32; 3] {
        [self.a, self.b, self.c]
    }
}

/// Triangle mesh with shared vertices
///
/// `indices` is a flat triangle list: three consecutive entries per
/// triangle, length always a multiple of 3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    /// Mesh vertices
    pub vertices: Vec<Vertex>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create an empty mesh
    pub fn new() -> Self {
        Mesh {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate the triangle list as [`Triangle`] values
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| Triangle::new(t[0], t[1], t[2]))
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
