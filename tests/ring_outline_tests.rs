use glam::{Vec2, Vec3};
use cylinder_preview::config::DisplayConfig;
use cylinder_preview::error::GeometryError;
use cylinder_preview::geometry::{
    circle_edge_buffer, cylinder_mesh, extrude_shape, outline_from_edge_buffer, ring_shape, ClosedPath, Shape,
};

#[cfg(test)]
mod frame_ring_tests {
    use super::*;

    #[test]
    fn test_frame_ring_stays_between_radii() {
        let display = DisplayConfig::default();
        let inner = display.model.inner_radius(display.radius);
        let outer = display.model.outer_radius(display.radius);
        assert!((inner - 3.02).abs() < 1e-6);
        assert!((outer - 3.23).abs() < 1e-6);

        let mesh = extrude_shape(&ring_shape(inner, outer, 64), display.height).unwrap();
        for vertex in &mesh.vertices {
            let radial = Vec2::new(vertex.position[0], vertex.position[1]).length();
            assert!(
                radial > inner - 1e-4 && radial < outer + 1e-4,
                "Vertex at radius {radial} outside the ring"
            );
            assert!(vertex.position[2] >= 0.0 && vertex.position[2] <= display.height + 1e-6);
        }

        let (min, max) = mesh.bounds();
        assert!((min.z - 0.0).abs() < 1e-6);
        assert!((max.z - display.height).abs() < 1e-6);
    }

    #[test]
    fn test_triangles_reference_existing_vertices() {
        let mesh = extrude_shape(&ring_shape(1.0, 1.5, 16), 0.5).unwrap();
        assert_eq!(mesh.indices.len() % 3, 0);
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn test_normals_are_unit_length() {
        let mesh = extrude_shape(&ring_shape(1.0, 1.5, 24), 0.5).unwrap();
        for vertex in &mesh.vertices {
            let length = Vec3::from_array(vertex.normal).length();
            assert!((length - 1.0).abs() < 1e-4, "Normal length {length}");
        }
    }

    #[test]
    fn test_clockwise_input_is_accepted() {
        let outline = outline_from_edge_buffer(&circle_edge_buffer(2.0, 12)).reversed();
        assert!(outline.is_clockwise());
        let mesh = extrude_shape(&Shape::new(outline), 1.0).unwrap();
        assert!(!mesh.is_empty());
    }

    #[test]
    fn test_degenerate_shapes_are_rejected() {
        let line = ClosedPath::new(vec![Vec2::ZERO, Vec2::X]);
        assert_eq!(
            extrude_shape(&Shape::new(line), 1.0),
            Err(GeometryError::DegenerateOutline(2))
        );

        let shape = ring_shape(1.0, 2.0, 8).with_hole(outline_from_edge_buffer(&circle_edge_buffer(0.5, 8)));
        assert_eq!(extrude_shape(&shape, 1.0), Err(GeometryError::TooManyHoles(2)));
    }
}

#[cfg(test)]
mod display_cylinder_tests {
    use super::*;

    #[test]
    fn test_display_cylinder_is_centered_on_origin() {
        let display = DisplayConfig::default();
        let mesh = cylinder_mesh(display.radius, display.height, &display.geometry);
        let (min, max) = mesh.bounds();
        assert!((min.y + display.height / 2.0).abs() < 1e-5);
        assert!((max.y - display.height / 2.0).abs() < 1e-5);
        assert!((max.x - display.radius).abs() < 1e-3);
    }

    #[test]
    fn test_open_ended_display_has_only_the_shell() {
        let display = DisplayConfig::default();
        let geometry = &display.geometry;
        let mesh = cylinder_mesh(display.radius, display.height, geometry);
        let quads = (geometry.radial_segments * geometry.height_segments) as usize;
        assert_eq!(mesh.triangle_count(), quads * 2);
    }
}
