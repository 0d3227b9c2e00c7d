//! Primitive mesh generation for armature visualization
//!
//! Generates vertices, normals, and indices for:
//! - Bone (unit-length capped cylinder along +Y)

mod bone;

pub use bone::{generate_bone_mesh, generate_bone_mesh_with_segments};

/// Mesh data: vertices, normals, and triangle indices
pub type MeshData = (Vec<[f32; 3]>, Vec<[f32; 3]>, Vec<u32>);
