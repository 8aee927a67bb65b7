use glam::Vec3;

use super::mesh::MeshData;
use crate::config::CylinderGeometryConfig;
use crate::types::Vertex;

/// Cylinder around the Y axis, centered on the origin.
///
/// The torso is a grid of `(radial_segments + 1) x (height_segments + 1)`
/// vertices; the seam column is duplicated so texture coordinates can run
/// from u = 0 to u = 1. Angle theta is measured from +Z towards +X. Caps are
/// added unless the cylinder is open-ended.
pub fn cylinder_mesh(radius: f32, height: f32, params: &CylinderGeometryConfig) -> MeshData {
    let radial = params.radial_segments.max(3);
    let rows = params.height_segments.max(1);
    let half_height = height * 0.5;

    let mut mesh = MeshData::default();
    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(rows as usize + 1);

    for y in 0..=rows {
        let v = y as f32 / rows as f32;
        let mut row = Vec::with_capacity(radial as usize + 1);

        for x in 0..=radial {
            let u = x as f32 / radial as f32;
            let theta = u * params.theta_length + params.theta_start;
            let (sin, cos) = theta.sin_cos();

            let position = [radius * sin, half_height - v * height, radius * cos];
            let normal = Vec3::new(sin, 0.0, cos).normalize_or_zero();

            // v grows downwards, matching image row order
            row.push(mesh.push_vertex(Vertex::new(position, normal.to_array(), [u, v])));
        }

        grid.push(row);
    }

    for x in 0..radial as usize {
        for y in 0..rows as usize {
            let a = grid[y][x];
            let b = grid[y + 1][x];
            let c = grid[y + 1][x + 1];
            let d = grid[y][x + 1];

            mesh.push_triangle(a, b, d);
            mesh.push_triangle(b, c, d);
        }
    }

    if !params.open_ended {
        push_cap(&mut mesh, radius, half_height, params, true);
        push_cap(&mut mesh, radius, half_height, params, false);
    }

    mesh
}

fn push_cap(mesh: &mut MeshData, radius: f32, half_height: f32, params: &CylinderGeometryConfig, top: bool) {
    let radial = params.radial_segments.max(3);
    let sign = if top { 1.0 } else { -1.0 };
    let y = half_height * sign;
    let normal = [0.0, sign, 0.0];

    let center = mesh.push_vertex(Vertex::new([0.0, y, 0.0], normal, [0.5, 0.5]));
    let mut rim = Vec::with_capacity(radial as usize + 1);

    for x in 0..=radial {
        let u = x as f32 / radial as f32;
        let theta = u * params.theta_length + params.theta_start;
        let (sin, cos) = theta.sin_cos();
        let uv = [cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5];
        rim.push(mesh.push_vertex(Vertex::new([radius * sin, y, radius * cos], normal, uv)));
    }

    for pair in rim.windows(2) {
        if top {
            mesh.push_triangle(pair[0], pair[1], center);
        } else {
            mesh.push_triangle(pair[1], pair[0], center);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn params(radial: u32, rows: u32, open_ended: bool) -> CylinderGeometryConfig {
        CylinderGeometryConfig {
            radial_segments: radial,
            height_segments: rows,
            open_ended,
            theta_start: 0.0,
            theta_length: 2.0 * PI,
        }
    }

    #[test]
    fn open_cylinder_counts() {
        let mesh = cylinder_mesh(3.0, 2.0, &params(8, 2, true));
        assert_eq!(mesh.vertices.len(), 9 * 3);
        assert_eq!(mesh.triangle_count(), 8 * 2 * 2);
    }

    #[test]
    fn capped_cylinder_adds_fans() {
        let mesh = cylinder_mesh(3.0, 2.0, &params(8, 1, false));
        assert_eq!(mesh.triangle_count(), 8 * 2 + 8 * 2);
    }

    #[test]
    fn vertices_lie_on_radius() {
        let mesh = cylinder_mesh(3.0, 1.851, &params(16, 4, true));
        for v in &mesh.vertices {
            let r = (v.position[0] * v.position[0] + v.position[2] * v.position[2]).sqrt();
            assert!((r - 3.0).abs() < 1e-4);
            assert!(v.position[1].abs() <= 1.851 * 0.5 + 1e-5);
        }
    }

    #[test]
    fn texture_coordinates_span_unit_square() {
        let mesh = cylinder_mesh(1.0, 1.0, &params(4, 2, true));
        let first = mesh.vertices.first().unwrap();
        let last = mesh.vertices.last().unwrap();
        assert_eq!(first.uv, [0.0, 0.0]);
        assert_eq!(last.uv, [1.0, 1.0]);
        assert!(first.position[1] > last.position[1]);
    }

    #[test]
    fn partial_arc_respects_theta_length() {
        let mut p = params(4, 1, true);
        p.theta_length = PI / 2.0;
        let mesh = cylinder_mesh(1.0, 1.0, &p);
        let end = mesh.vertices[4].position;
        assert!((end[0] - 1.0).abs() < 1e-5);
        assert!(end[2].abs() < 1e-5);
    }
}
