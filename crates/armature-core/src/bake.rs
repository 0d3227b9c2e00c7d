//! Flattening an armature into render objects

use std::sync::Arc;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::armature::{Armature, ArmatureError, shortest_arc};
use crate::constants::{BONE_COLOR, BONE_RADIUS, BONE_SEGMENTS, DIRECTION_EPSILON};
use crate::geometry::{BakedGeometry, RenderInstance, RenderObject};
use crate::primitive::generate_bone_mesh_with_segments;

/// Bake configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BakeOptions {
    /// Emit a bone render object for every non-root node
    pub make_bones: bool,
    /// Bone radius (world units)
    pub bone_radius: f32,
    /// Number of segments around the bone
    pub bone_segments: u32,
    /// Bone color (RGBA)
    pub bone_color: [f32; 4],
}

impl Default for BakeOptions {
    fn default() -> Self {
        Self {
            make_bones: false,
            bone_radius: BONE_RADIUS,
            bone_segments: BONE_SEGMENTS,
            bone_color: BONE_COLOR,
        }
    }
}

impl BakeOptions {
    /// Default options with bone visualization enabled
    pub fn with_bones() -> Self {
        Self {
            make_bones: true,
            ..Self::default()
        }
    }

    fn bone_geometry(&self) -> Arc<BakedGeometry> {
        let (vertices, normals, indices) =
            generate_bone_mesh_with_segments(self.bone_radius, self.bone_segments);
        Arc::new(BakedGeometry::new(vertices, normals, indices).with_color(self.bone_color))
    }
}

/// Render-ready snapshot of an armature
#[derive(Debug, Clone, Default)]
pub struct Bake {
    /// Geometry in depth-first, child insertion order
    pub geometry: Vec<RenderObject>,
    /// Bone visualizations in the same order
    pub bones: Vec<RenderObject>,
}

impl Bake {
    /// Total number of render objects
    pub fn len(&self) -> usize {
        self.geometry.len() + self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty() && self.bones.is_empty()
    }

    /// All render objects, geometry first
    pub fn render_objects(&self) -> impl Iterator<Item = &RenderObject> {
        self.geometry.iter().chain(self.bones.iter())
    }

    /// Instance data for GPU upload, geometry first
    pub fn instances(&self) -> Vec<RenderInstance> {
        self.render_objects().map(RenderObject::instance).collect()
    }
}

impl Armature {
    /// Flatten the subtree under `root` into world-space render objects
    ///
    /// `parent_matrix` places `root` in the world; `root` itself gets no bone.
    /// With bones enabled, each other node gets one running from its parent's
    /// world origin to its own world anchor, or to its own origin when it has
    /// no anchor. Bones of zero length are skipped.
    pub fn traverse(
        &self,
        root: Uuid,
        parent_matrix: Mat4,
        options: &BakeOptions,
    ) -> Result<Bake, ArmatureError> {
        let bone = options.make_bones.then(|| options.bone_geometry());
        let mut bake = Bake::default();
        self.traverse_node(root, parent_matrix, true, bone.as_ref(), &mut bake)?;
        Ok(bake)
    }

    /// Flatten every root (in name order) from the world origin
    pub fn bake(&self, options: &BakeOptions) -> Result<Bake, ArmatureError> {
        let bone = options.make_bones.then(|| options.bone_geometry());
        let mut bake = Bake::default();
        for root in self.roots() {
            self.traverse_node(root, Mat4::IDENTITY, true, bone.as_ref(), &mut bake)?;
        }

        tracing::debug!(
            geometry = bake.geometry.len(),
            bones = bake.bones.len(),
            "baked armature '{}'",
            self.name
        );
        Ok(bake)
    }

    fn traverse_node(
        &self,
        id: Uuid,
        parent_matrix: Mat4,
        is_root: bool,
        bone: Option<&Arc<BakedGeometry>>,
        bake: &mut Bake,
    ) -> Result<(), ArmatureError> {
        let node = self.node(id)?;
        let matrix = parent_matrix * node.transformation.matrix();

        if let Some(geometry) = node.geometry() {
            bake.geometry.push(RenderObject::new(Arc::clone(geometry), matrix));
        }

        if !is_root && let Some(bone) = bone {
            let start = parent_matrix.transform_point3(Vec3::ZERO);
            let end = matrix.transform_point3(node.anchor().unwrap_or(Vec3::ZERO));
            if let Some(transform) = bone_transform(start, end) {
                bake.bones.push(RenderObject {
                    geometry: Arc::clone(bone),
                    transform,
                    shadeless: true,
                });
            }
        }

        for child_id in self.children_of(id) {
            self.traverse_node(*child_id, matrix, false, bone, bake)?;
        }
        Ok(())
    }
}

/// Transform stretching the unit bone (y = 0..1) onto `start → end`
fn bone_transform(start: Vec3, end: Vec3) -> Option<Mat4> {
    let segment = end - start;
    let length = segment.length();
    if length < DIRECTION_EPSILON {
        return None;
    }
    let rotation = shortest_arc(Vec3::Y, segment / length, None);
    Some(Mat4::from_scale_rotation_translation(
        Vec3::new(1.0, length, 1.0),
        rotation,
        start,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformation::Transformation;
    use glam::Quat;

    fn transformation(position: Vec3, angle: f32, scale: f32) -> Transformation {
        let mut t = Transformation::from_position(position);
        t.set_rotation(Quat::from_rotation_x(angle));
        t.set_scale(Vec3::splat(scale));
        t
    }

    #[test]
    fn test_three_level_product() {
        let mut armature = Armature::new("test");
        let root = armature.add_node("root");
        let child = armature.add_node("child");
        let leaf = armature.add_geometry_node("leaf", BakedGeometry::default());

        armature
            .set_transformation(root, transformation(Vec3::X, 0.2, 2.0))
            .unwrap();
        armature
            .set_transformation(child, transformation(Vec3::Y, -0.4, 0.5))
            .unwrap();
        armature
            .set_transformation(leaf, transformation(Vec3::Z, 1.1, 1.5))
            .unwrap();
        armature.add_child(root, child).unwrap();
        armature.add_child(child, leaf).unwrap();

        let bake = armature
            .traverse(root, Mat4::IDENTITY, &BakeOptions::default())
            .unwrap();

        assert_eq!(bake.geometry.len(), 1);
        assert!(bake.bones.is_empty());

        let expected = armature.local_transform(root).unwrap()
            * armature.local_transform(child).unwrap()
            * armature.local_transform(leaf).unwrap();
        assert!(bake.geometry[0].transform.abs_diff_eq(expected, 1e-5));
        assert!(!bake.geometry[0].shadeless);
    }

    #[test]
    fn test_geometry_order_follows_insertion() {
        let mut armature = Armature::new("test");
        let root = armature.add_node("root");
        let colors = [[1.0, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0], [0.0, 0.0, 1.0, 1.0]];
        for (i, color) in colors.iter().enumerate() {
            let point = armature
                .create_point(root, format!("p{i}"), Vec3::new(i as f32, 0.0, 0.0))
                .unwrap();
            armature
                .attach(point, BakedGeometry::default().with_color(*color))
                .unwrap();
        }

        let bake = armature.bake(&BakeOptions::default()).unwrap();
        let baked: Vec<[f32; 4]> = bake.geometry.iter().map(|o| o.geometry.color).collect();
        assert_eq!(baked, colors.to_vec());
        assert_eq!(
            bake.geometry[2].transform.transform_point3(Vec3::ZERO),
            Vec3::new(2.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_parent_matrix_is_applied() {
        let mut armature = Armature::new("test");
        let root = armature.add_geometry_node("root", BakedGeometry::default());
        let offset = Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0));

        let bake = armature
            .traverse(root, offset, &BakeOptions::default())
            .unwrap();
        assert_eq!(bake.geometry[0].transform, offset);
    }

    #[test]
    fn test_bones_span_parent_to_anchor() {
        let mut armature = Armature::new("test");
        let torso = armature.add_node("torso");
        let arm = armature.add_node("arm");
        let shoulder = armature
            .create_point(torso, "shoulder", Vec3::new(0.0, 2.0, 0.0))
            .unwrap();
        let top = armature.create_point(arm, "top", Vec3::ZERO).unwrap();
        armature.stick_to(top, shoulder).unwrap();

        let bake = armature.bake(&BakeOptions::with_bones()).unwrap();
        assert_eq!(bake.bones.len(), 1);

        let bone = &bake.bones[0];
        assert!(bone.shadeless);
        assert!(bone.transform.transform_point3(Vec3::ZERO).abs_diff_eq(Vec3::ZERO, 1e-5));
        assert!(
            bone.transform
                .transform_point3(Vec3::Y)
                .abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-5)
        );
        assert_eq!(bake.instances().len(), 1);
        assert_eq!(bake.instances()[0].shadeless, 1);
    }

    #[test]
    fn test_zero_length_bone_skipped() {
        let mut armature = Armature::new("test");
        let root = armature.add_node("root");
        let child = armature.add_node("child");
        armature.add_child(root, child).unwrap();

        let bake = armature.bake(&BakeOptions::with_bones()).unwrap();
        assert!(bake.is_empty());
    }
}
