//! Ring outlines for the display frame.
//!
//! The frame cross-section is an annulus: the outline of a circle with the
//! outline of a smaller circle cut out as a hole. Outlines are derived from
//! flat edge-vertex buffers (`x, y, z` triples) so the derivation stays a pure
//! transformation over numbers.

use std::f32::consts::PI;

use glam::Vec2;

/// Closed polyline; the last point connects back to the first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClosedPath {
    points: Vec<Vec2>,
}

impl ClosedPath {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Every edge including the closing one from the last point to the first
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Shoelace area, positive for counter-clockwise paths
    pub fn signed_area(&self) -> f32 {
        self.segments().map(|(a, b)| a.perp_dot(b)).sum::<f32>() * 0.5
    }

    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    pub fn reversed(&self) -> Self {
        Self {
            points: self.points.iter().rev().copied().collect(),
        }
    }

    /// Same path wound counter-clockwise
    pub fn counter_clockwise(&self) -> Self {
        if self.is_clockwise() {
            self.reversed()
        } else {
            self.clone()
        }
    }

    /// Same path wound clockwise
    pub fn clockwise(&self) -> Self {
        if self.is_clockwise() {
            self.clone()
        } else {
            self.reversed()
        }
    }

    /// Cumulative arc length at every point, normalized to [0, 1); the
    /// closing point (index `len`) maps to 1
    pub fn arc_fractions(&self) -> Vec<f32> {
        let mut fractions = Vec::with_capacity(self.points.len() + 1);
        let mut total = 0.0;
        fractions.push(0.0);
        for (a, b) in self.segments() {
            total += a.distance(b);
            fractions.push(total);
        }
        if total > 0.0 {
            for f in &mut fractions {
                *f /= total;
            }
        }
        fractions
    }

    /// Rotate the start so it is the point closest to `target`
    pub fn starting_near(&self, target: Vec2) -> Self {
        let start = self
            .points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.distance_squared(target).total_cmp(&b.distance_squared(target)))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let mut points = self.points.clone();
        points.rotate_left(start);
        Self { points }
    }
}

/// Planar shape: an outline with optional holes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub outline: ClosedPath,
    pub holes: Vec<ClosedPath>,
}

impl Shape {
    pub fn new(outline: ClosedPath) -> Self {
        Self {
            outline,
            holes: Vec::new(),
        }
    }

    pub fn with_hole(mut self, hole: ClosedPath) -> Self {
        self.holes.push(hole);
        self
    }
}

/// Walk an edge-vertex buffer in strides of 3 and keep the first two
/// components of each vertex as a 2D point.
///
/// The path starts at the first vertex, visits every following vertex in
/// order and closes back to the start. A trailing partial stride is ignored.
pub fn outline_from_edge_buffer(buffer: &[f32]) -> ClosedPath {
    let points = buffer
        .chunks_exact(3)
        .map(|vertex| Vec2::new(vertex[0], vertex[1]))
        .collect();
    ClosedPath::new(points)
}

/// Edge vertices of a flat circle in the XY plane, one vertex per segment,
/// counter-clockwise starting at (radius, 0)
pub fn circle_edge_buffer(radius: f32, segments: u32) -> Vec<f32> {
    let segments = segments.max(3);
    (0..segments)
        .flat_map(|i| {
            let theta = i as f32 / segments as f32 * 2.0 * PI;
            let (sin, cos) = theta.sin_cos();
            [radius * cos, radius * sin, 0.0]
        })
        .collect()
}

/// Annular cross-section: the inner circle becomes a hole in the outer one
pub fn ring_shape(inner_radius: f32, outer_radius: f32, segments: u32) -> Shape {
    let inner = outline_from_edge_buffer(&circle_edge_buffer(inner_radius, segments));
    let outer = outline_from_edge_buffer(&circle_edge_buffer(outer_radius, segments));
    Shape::new(outer).with_hole(inner)
}
