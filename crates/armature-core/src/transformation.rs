//! Decomposed node transformation

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, rotation and scale of a node relative to its parent.
///
/// Composes as `T(position) · R(rotation) · S(scale)`. The scale is kept as an
/// affine matrix so stretches along arbitrary axes about arbitrary anchors can
/// be folded into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    position: Vec3,
    rotation: Quat,
    scale: Mat4,
}

impl Default for Transformation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transformation {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Mat4::IDENTITY,
    };

    /// Create a transformation from all three components
    pub fn new(position: Vec3, rotation: Quat, scale: Mat4) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Create a pure translation
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    /// Set the rotation from XYZ Euler angles in radians
    pub fn set_rotation_euler(&mut self, angles: Vec3) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z);
    }

    /// Rotation as XYZ Euler angles in radians
    pub fn rotation_euler(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    pub fn scale(&self) -> Mat4 {
        self.scale
    }

    /// Set an axis-aligned scale, discarding any composed stretches
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = Mat4::from_scale(scale);
    }

    pub fn set_scale_matrix(&mut self, scale: Mat4) {
        self.scale = scale;
    }

    /// Compose into a single 4x4 matrix (translate · rotate · scale)
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position) * self.scale
    }

    /// Map a point from node-local space into the parent's space
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.matrix().transform_point3(point)
    }
}
