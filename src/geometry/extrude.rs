use glam::{Vec2, Vec3};

use super::mesh::MeshData;
use super::ring::{ClosedPath, Shape};
use crate::error::GeometryError;
use crate::types::Vertex;

/// Extrude a planar shape along +Z from `z = 0` to `z = depth`, one step,
/// no bevel.
///
/// Produces a cap at each end (normal -Z at the bottom, +Z at the top) and
/// flat-shaded side walls for the outline and every hole. Caps support a
/// convex outline with no hole or an annulus with exactly one hole.
pub fn extrude_shape(shape: &Shape, depth: f32) -> Result<MeshData, GeometryError> {
    let outline = shape.outline.counter_clockwise();
    if outline.len() < 3 {
        return Err(GeometryError::DegenerateOutline(outline.len()));
    }
    if shape.holes.len() > 1 {
        return Err(GeometryError::TooManyHoles(shape.holes.len()));
    }
    if let Some(hole) = shape.holes.iter().find(|hole| hole.len() < 3) {
        return Err(GeometryError::DegenerateOutline(hole.len()));
    }

    let mut mesh = MeshData::default();

    // Caps share one point list: outline first, then the hole
    let (cap_points, cap_triangles) = match shape.holes.first() {
        Some(hole) => {
            let hole = hole.counter_clockwise().starting_near(outline.points()[0]);
            let triangles = triangulate_annulus(&outline, &hole);
            let points: Vec<Vec2> = outline.points().iter().chain(hole.points()).copied().collect();
            (points, triangles)
        }
        None => {
            let triangles = (1..outline.len() - 1).map(|i| [0, i, i + 1]).collect();
            (outline.points().to_vec(), triangles)
        }
    };

    push_cap(&mut mesh, &cap_points, &cap_triangles, depth, true);
    push_cap(&mut mesh, &cap_points, &cap_triangles, 0.0, false);

    push_walls(&mut mesh, &outline, depth);
    for hole in &shape.holes {
        // Hole walls face into the hole, which a clockwise path gives
        push_walls(&mut mesh, &hole.clockwise(), depth);
    }

    Ok(mesh)
}

/// Triangulate the region between two counter-clockwise loops around the
/// same center by zipping them by arc-length fraction.
///
/// Indices address `outer` first, then `inner` offset by `outer.len()`.
/// Every triangle is counter-clockwise seen from +Z.
pub fn triangulate_annulus(outer: &ClosedPath, inner: &ClosedPath) -> Vec<[usize; 3]> {
    let n = outer.len();
    let m = inner.len();
    let t_outer = outer.arc_fractions();
    let t_inner = inner.arc_fractions();
    let o = |i: usize| i % n;
    let h = |j: usize| n + j % m;

    let mut triangles = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);

    while i < n || j < m {
        let advance_outer = if i == n {
            false
        } else if j == m {
            true
        } else {
            t_outer[i + 1] <= t_inner[j + 1]
        };

        if advance_outer {
            triangles.push([o(i), o(i + 1), h(j)]);
            i += 1;
        } else {
            triangles.push([o(i), h(j + 1), h(j)]);
            j += 1;
        }
    }

    triangles
}

fn push_cap(mesh: &mut MeshData, points: &[Vec2], triangles: &[[usize; 3]], z: f32, top: bool) {
    let normal = if top { [0.0, 0.0, 1.0] } else { [0.0, 0.0, -1.0] };
    let base = mesh.vertices.len() as u32;

    for p in points {
        mesh.push_vertex(Vertex::new([p.x, p.y, z], normal, [p.x, p.y]));
    }

    for [a, b, c] in triangles.iter().copied() {
        let (a, b, c) = (base + a as u32, base + b as u32, base + c as u32);
        if top {
            mesh.push_triangle(a, b, c);
        } else {
            mesh.push_triangle(a, c, b);
        }
    }
}

/// One quad per path edge; normals point to the right of the walking
/// direction, i.e. outwards for counter-clockwise paths
fn push_walls(mesh: &mut MeshData, path: &ClosedPath, depth: f32) {
    let mut along = 0.0;

    for (a, b) in path.segments() {
        let edge = b - a;
        let length = edge.length();
        let normal = Vec3::new(edge.y, -edge.x, 0.0).normalize_or_zero().to_array();

        let a0 = mesh.push_vertex(Vertex::new([a.x, a.y, 0.0], normal, [along, 0.0]));
        let b0 = mesh.push_vertex(Vertex::new([b.x, b.y, 0.0], normal, [along + length, 0.0]));
        let b1 = mesh.push_vertex(Vertex::new([b.x, b.y, depth], normal, [along + length, depth]));
        let a1 = mesh.push_vertex(Vertex::new([a.x, a.y, depth], normal, [along, depth]));

        mesh.push_triangle(a0, b0, b1);
        mesh.push_triangle(a0, b1, a1);
        along += length;
    }
}
