pub mod cylinder;
pub mod extrude;
pub mod mesh;
pub mod ring;

pub use cylinder::cylinder_mesh;
pub use extrude::{extrude_shape, triangulate_annulus};
pub use mesh::{compute_mesh_bounds, MeshData};
pub use ring::{circle_edge_buffer, outline_from_edge_buffer, ring_shape, ClosedPath, Shape};
