//! CPU-side description of the preview scene, handed to the renderer.

use glam::{Mat4, Vec3};

use crate::geometry::MeshData;
use crate::math::hex_to_linear;
use crate::texture::TextureSettings;
use crate::types::{LightUniform, ObjectUniform};

/// Which faces of a mesh are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    /// Only faces pointing away from the viewer, i.e. the inside of a
    /// closed or curved surface
    Back,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Unlit, color multiplied by the bound texture
    Basic {
        color: u32,
        /// Index of the texture descriptor whose image is bound
        texture: Option<usize>,
        repeat_u: f32,
        side: Side,
    },
    /// Lit matte surface
    Standard {
        color: u32,
        roughness: f32,
        metalness: f32,
        side: Side,
    },
}

impl Material {
    pub fn side(&self) -> Side {
        match self {
            Self::Basic { side, .. } | Self::Standard { side, .. } => *side,
        }
    }

    pub fn texture(&self) -> Option<usize> {
        match self {
            Self::Basic { texture, .. } => *texture,
            Self::Standard { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MeshNode {
    pub name: &'static str,
    pub mesh: MeshData,
    pub transform: Mat4,
    pub material: Material,
}

impl MeshNode {
    pub fn to_uniform(&self) -> ObjectUniform {
        let (color, uv_transform) = match &self.material {
            Material::Basic { color, repeat_u, .. } => {
                let settings = TextureSettings {
                    srgb: true,
                    repeat_u: *repeat_u,
                };
                (*color, settings.uv_transform())
            }
            Material::Standard { color, .. } => (*color, [1.0, 1.0, 0.0, 0.0]),
        };
        let [r, g, b] = hex_to_linear(color);
        ObjectUniform {
            model: self.transform.to_cols_array_2d(),
            color: [r, g, b, 1.0],
            uv_transform,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: u32,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: u32,
    pub intensity: f32,
    /// Cutoff distance, 0 for unlimited
    pub distance: f32,
    pub decay: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lights {
    pub ambient: AmbientLight,
    pub point: PointLight,
}

impl Lights {
    pub fn to_uniform(&self) -> LightUniform {
        let [ar, ag, ab] = hex_to_linear(self.ambient.color);
        let [pr, pg, pb] = hex_to_linear(self.point.color);
        let p = self.point.position;
        LightUniform {
            ambient: [ar, ag, ab, self.ambient.intensity],
            point_position: [p.x, p.y, p.z, self.point.distance],
            point_color: [pr, pg, pb, self.point.intensity],
            point_params: [self.point.decay, 0.0, 0.0, 0.0],
        }
    }
}

/// Everything the renderer draws
#[derive(Debug, Clone)]
pub struct SceneGraph {
    pub background: u32,
    pub lights: Lights,
    /// Textured cylinder shell, seen from inside
    pub display: MeshNode,
    /// Ring frame around the top of the display
    pub frame: MeshNode,
}

impl SceneGraph {
    pub fn meshes(&self) -> [&MeshNode; 2] {
        [&self.display, &self.frame]
    }

    /// Point the display material at texture descriptor `index`
    pub fn bind_display_texture(&mut self, index: usize) {
        if let Material::Basic { texture, .. } = &mut self.display.material {
            *texture = Some(index);
        }
    }
}
