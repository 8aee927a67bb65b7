pub mod builder;
pub mod graph;
pub mod render_loop;
pub mod session;

pub use builder::{BuiltScene, SceneBuilder};
pub use graph::{AmbientLight, Lights, Material, MeshNode, PointLight, SceneGraph, Side};
pub use render_loop::RenderLoop;
pub use session::{DisplayIndex, PreviewSession};
