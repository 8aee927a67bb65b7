use glam::Vec3;

use crate::types::Vertex;

/// Indexed triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append a vertex, returning its index
    pub fn push_vertex(&mut self, vertex: Vertex) -> u32 {
        self.vertices.push(vertex);
        (self.vertices.len() - 1) as u32
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Axis-aligned bounds of all vertex positions
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let positions: Vec<Vec3> = self
            .vertices
            .iter()
            .map(|v| Vec3::from_array(v.position))
            .collect();
        compute_mesh_bounds(&positions)
    }
}

/// Computes overall bounding box for vertices
pub fn compute_mesh_bounds(vertices: &[Vec3]) -> (Vec3, Vec3) {
    let Some(&first) = vertices.first() else {
        return (Vec3::ZERO, Vec3::ZERO);
    };

    vertices
        .iter()
        .skip(1)
        .fold((first, first), |(min, max), &v| (min.min(v), max.max(v)))
}
