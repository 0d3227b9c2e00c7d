//! Baked geometry and render objects handed to the renderer

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_COLOR;

/// Raw geometry produced by a shape generator.
///
/// The armature never interprets the contents; it only carries the data and
/// pairs it with a world transform at bake time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BakedGeometry {
    /// Vertex positions in the geometry's own space
    pub vertices: Vec<[f32; 3]>,
    /// Vertex normals (one per vertex)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices
    pub indices: Vec<u32>,
    /// Material color (RGBA)
    pub color: [f32; 4],
    /// Optional material name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_name: Option<String>,
}

impl Default for BakedGeometry {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            color: DEFAULT_COLOR,
            material_name: None,
        }
    }
}

impl BakedGeometry {
    /// Create geometry from vertex/normal/index buffers with the default color
    pub fn new(vertices: Vec<[f32; 3]>, normals: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            normals,
            indices,
            ..Self::default()
        }
    }

    /// Set the material color
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A piece of geometry placed in world space, ready for rendering
#[derive(Debug, Clone)]
pub struct RenderObject {
    pub geometry: Arc<BakedGeometry>,
    /// Local-to-world transform
    pub transform: Mat4,
    /// Render without lighting (used for bone visualization)
    pub shadeless: bool,
}

impl RenderObject {
    pub fn new(geometry: Arc<BakedGeometry>, transform: Mat4) -> Self {
        Self {
            geometry,
            transform,
            shadeless: false,
        }
    }

    /// Vertex positions transformed into world space
    pub fn world_vertices(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.geometry
            .vertices
            .iter()
            .map(|v| self.transform.transform_point3(Vec3::from(*v)))
    }

    /// Per-instance data for GPU upload
    pub fn instance(&self) -> RenderInstance {
        RenderInstance {
            model: self.transform.to_cols_array_2d(),
            color: self.geometry.color,
            shadeless: u32::from(self.shadeless),
            _pad: [0; 3],
        }
    }
}

/// Render object instance data laid out for a GPU buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RenderInstance {
    /// Model transformation matrix
    pub model: [[f32; 4]; 4],
    /// Instance color (RGBA)
    pub color: [f32; 4],
    /// Lighting disabled (0 = shaded, 1 = shadeless)
    pub shadeless: u32,
    /// Padding for alignment
    pub _pad: [u32; 3],
}

impl Default for RenderInstance {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            color: DEFAULT_COLOR,
            shadeless: 0,
            _pad: [0; 3],
        }
    }
}
