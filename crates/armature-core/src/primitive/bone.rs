//! Bone mesh generation (capped cylinder spanning y = 0..1)

use std::f32::consts::PI;

use super::MeshData;

/// Generate a bone mesh along the Y axis
///
/// The bone starts at the origin and ends at `(0, 1, 0)`, so a bake can
/// stretch it onto any parent→child segment with a single transform.
pub fn generate_bone_mesh(radius: f32) -> MeshData {
    use crate::constants::BONE_SEGMENTS;
    generate_bone_mesh_with_segments(radius, BONE_SEGMENTS)
}

/// Generate a bone mesh with custom segment count
pub fn generate_bone_mesh_with_segments(radius: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    let ring = |i: u32| {
        let theta = (i as f32 / segments as f32) * 2.0 * PI;
        (theta.cos(), theta.sin())
    };

    // Side vertices, bottom/top pairs
    for i in 0..=segments {
        let (c, s) = ring(i);
        vertices.push([radius * c, 0.0, radius * s]);
        normals.push([c, 0.0, s]);
        vertices.push([radius * c, 1.0, radius * s]);
        normals.push([c, 0.0, s]);
    }

    for i in 0..segments {
        let base = i * 2;
        indices.extend_from_slice(&[base, base + 1, base + 2]);
        indices.extend_from_slice(&[base + 1, base + 3, base + 2]);
    }

    // Caps: (height, normal y, reversed winding)
    for (y, ny, flip) in [(1.0, 1.0, false), (0.0, -1.0, true)] {
        let center = vertices.len() as u32;
        vertices.push([0.0, y, 0.0]);
        normals.push([0.0, ny, 0.0]);

        let rim_start = vertices.len() as u32;
        for i in 0..=segments {
            let (c, s) = ring(i);
            vertices.push([radius * c, y, radius * s]);
            normals.push([0.0, ny, 0.0]);
        }

        for i in 0..segments {
            if flip {
                indices.extend_from_slice(&[center, rim_start + i, rim_start + i + 1]);
            } else {
                indices.extend_from_slice(&[center, rim_start + i + 1, rim_start + i]);
            }
        }
    }

    (vertices, normals, indices)
}
