//! Named points and attachment

use glam::Vec3;
use uuid::Uuid;

use super::{Armature, ArmatureError};
use crate::geometry::BakedGeometry;
use crate::transformation::Transformation;

/// A position in the local space of a specific node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Node the position is expressed in (fixed at construction)
    pub node: Uuid,
    /// Position relative to the node origin
    pub position: Vec3,
}

impl Point {
    pub fn new(node: Uuid, position: Vec3) -> Self {
        Self { node, position }
    }
}

/// Argument for hold / grab / point_at / stretch_to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// A point on some node
    Point(Point),
    /// A raw world-space coordinate
    Global(Vec3),
}

impl From<Point> for Target {
    fn from(point: Point) -> Self {
        Target::Point(point)
    }
}

impl From<Vec3> for Target {
    fn from(position: Vec3) -> Self {
        Target::Global(position)
    }
}

impl Armature {
    /// Register a named point on a node, replacing any point of the same name
    pub fn create_point(
        &mut self,
        id: Uuid,
        name: impl Into<String>,
        position: Vec3,
    ) -> Result<Point, ArmatureError> {
        self.node_mut(id)?.points.insert(name.into(), position);
        Ok(Point::new(id, position))
    }

    /// Look up a named point on a node
    pub fn point(&self, id: Uuid, name: &str) -> Result<Point, ArmatureError> {
        let position = self
            .node(id)?
            .points
            .get(name)
            .copied()
            .ok_or_else(|| ArmatureError::PointNotFound {
                node: id,
                name: name.to_string(),
            })?;
        Ok(Point::new(id, position))
    }

    /// Attach `point`'s node to `target`'s node so the two points coincide
    ///
    /// The attaching node becomes a child of the target node and `point`
    /// becomes its anchor. Rotation and scale are kept; only the position is
    /// solved.
    pub fn stick_to(&mut self, point: Point, target: Point) -> Result<(), ArmatureError> {
        if point.node == target.node {
            return Err(ArmatureError::SelfAttachment);
        }

        self.add_child(target.node, point.node)?;

        let node = self.node_mut(point.node)?;
        node.anchor = Some(point.position);

        let mut transformation = node.transformation;
        transformation.set_position(Vec3::ZERO);
        let offset = transformation.transform_point(point.position);
        transformation.set_position(target.position - offset);
        node.transformation = transformation;

        tracing::debug!(child = %point.node, parent = %target.node, "stuck point to target");
        Ok(())
    }

    /// Attach raw geometry at a point, returning the new geometry node
    pub fn attach(&mut self, point: Point, geometry: BakedGeometry) -> Result<Uuid, ArmatureError> {
        let parent = self.node(point.node)?;
        let name = self.unique_name(
            &format!("{}:geometry", parent.name),
            self.children_of(point.node).len(),
        );

        let id = self.add_geometry_node(name, geometry);
        let node = self.node_mut(id)?;
        node.anchor = Some(Vec3::ZERO);
        node.transformation = Transformation::from_position(point.position);

        self.add_child(point.node, id)?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_point_lookup() {
        let mut armature = Armature::new("test");
        let id = armature.add_node("arm");
        armature.create_point(id, "elbow", Vec3::new(0.0, -1.0, 0.0)).unwrap();

        let elbow = armature.point(id, "elbow").unwrap();
        assert_eq!(elbow.node, id);
        assert_eq!(elbow.position, Vec3::new(0.0, -1.0, 0.0));

        assert_eq!(
            armature.point(id, "wrist"),
            Err(ArmatureError::PointNotFound {
                node: id,
                name: "wrist".to_string()
            })
        );
    }

    #[test]
    fn test_stick_to_self_rejected() {
        let mut armature = Armature::new("test");
        let id = armature.add_node("arm");
        let a = armature.create_point(id, "a", Vec3::ZERO).unwrap();
        let b = armature.create_point(id, "b", Vec3::X).unwrap();

        assert_eq!(armature.stick_to(a, b), Err(ArmatureError::SelfAttachment));
        assert!(armature.parent_of(id).is_none());
    }

    #[test]
    fn test_stick_to_coincides() {
        let mut armature = Armature::new("test");
        let torso = armature.add_node("torso");
        let arm = armature.add_node("arm");

        let shoulder = armature
            .create_point(torso, "shoulder", Vec3::new(0.5, 1.0, 0.0))
            .unwrap();
        let top = armature.create_point(arm, "top", Vec3::new(0.0, 0.4, 0.1)).unwrap();

        armature.stick_to(top, shoulder).unwrap();

        assert_eq!(armature.parent_of(arm), Some(torso));
        assert_eq!(armature.anchor(arm).unwrap(), Some(top.position));
        assert_eq!(
            armature.transformation(arm).unwrap().position(),
            shoulder.position - top.position
        );

        let a = armature.global_position(arm, top.position).unwrap();
        let b = armature.global_position(torso, shoulder.position).unwrap();
        assert!(a.distance(b) < 1e-5);
    }

    #[test]
    fn test_stick_to_keeps_rotation() {
        let mut armature = Armature::new("test");
        let torso = armature.add_node("torso");
        let arm = armature.add_node("arm");

        let mut t = Transformation::default();
        t.set_rotation(Quat::from_rotation_z(FRAC_PI_4));
        t.set_scale(Vec3::new(1.0, 2.0, 1.0));
        armature.set_transformation(arm, t).unwrap();

        let shoulder = armature.create_point(torso, "shoulder", Vec3::X).unwrap();
        let top = armature.create_point(arm, "top", Vec3::new(0.0, 0.5, 0.0)).unwrap();
        armature.stick_to(top, shoulder).unwrap();

        let a = armature.global_position(arm, top.position).unwrap();
        let b = armature.global_position(torso, shoulder.position).unwrap();
        assert!(a.distance(b) < 1e-5);
        assert_eq!(
            armature.transformation(arm).unwrap().rotation(),
            Quat::from_rotation_z(FRAC_PI_4)
        );
    }

    #[test]
    fn test_attach_geometry() {
        let mut armature = Armature::new("test");
        let hand = armature.add_node("hand");
        let palm = armature.create_point(hand, "palm", Vec3::new(0.0, -0.2, 0.0)).unwrap();

        let geometry_id = armature.attach(palm, BakedGeometry::default()).unwrap();
        let node = armature.node(geometry_id).unwrap();

        assert!(node.geometry().is_some());
        assert_eq!(node.anchor(), Some(Vec3::ZERO));
        assert_eq!(node.transformation.position(), palm.position);
        assert_eq!(armature.children_of(hand), &[geometry_id]);
    }

    #[test]
    fn test_attach_names_stay_unique_after_removal() {
        let mut armature = Armature::new("test");
        let root = armature.add_node("root");
        let point = armature.create_point(root, "p", Vec3::ZERO).unwrap();

        let first = armature.attach(point, BakedGeometry::default()).unwrap();
        let second = armature.attach(point, BakedGeometry::default()).unwrap();
        armature.remove_node(first).unwrap();
        let third = armature.attach(point, BakedGeometry::default()).unwrap();

        let second_name = armature.node(second).unwrap().name.clone();
        let third_name = armature.node(third).unwrap().name.clone();
        assert_ne!(second_name, third_name);

        armature.remove_node(third).unwrap();
        assert_eq!(armature.id_by_name(&second_name), Ok(second));
    }
}
