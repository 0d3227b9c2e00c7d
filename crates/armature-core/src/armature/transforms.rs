//! Coordinate-space conversion for Armature nodes

use glam::{Mat4, Vec3};
use uuid::Uuid;

use super::point::Target;
use super::{Armature, ArmatureError};
use crate::transformation::Transformation;

impl Armature {
    /// Transformation of a node relative to its parent
    pub fn transformation(&self, id: Uuid) -> Result<Transformation, ArmatureError> {
        Ok(self.node(id)?.transformation)
    }

    /// Replace a node's transformation
    pub fn set_transformation(
        &mut self,
        id: Uuid,
        transformation: Transformation,
    ) -> Result<(), ArmatureError> {
        self.node_mut(id)?.transformation = transformation;
        Ok(())
    }

    /// Local transform matrix of a node
    pub fn local_transform(&self, id: Uuid) -> Result<Mat4, ArmatureError> {
        Ok(self.node(id)?.transformation.matrix())
    }

    /// Matrix mapping node-local coordinates into world coordinates
    pub fn local_to_global_transform(&self, id: Uuid) -> Result<Mat4, ArmatureError> {
        let local = self.local_transform(id)?;
        match self.parent_of(id) {
            Some(parent_id) => Ok(self.local_to_global_transform(parent_id)? * local),
            None => Ok(local),
        }
    }

    /// Matrix mapping world coordinates into node-local coordinates
    ///
    /// Inverse of [`Armature::local_to_global_transform`]; every scale along
    /// the chain must be non-singular.
    pub fn global_to_local_transform(&self, id: Uuid) -> Result<Mat4, ArmatureError> {
        let inverse_local = self.local_transform(id)?.inverse();
        match self.parent_of(id) {
            Some(parent_id) => Ok(inverse_local * self.global_to_local_transform(parent_id)?),
            None => Ok(inverse_local),
        }
    }

    /// Set or clear the point fixed during this node's pose solving
    pub fn set_anchor(&mut self, id: Uuid, anchor: Option<Vec3>) -> Result<(), ArmatureError> {
        self.node_mut(id)?.anchor = anchor;
        Ok(())
    }

    pub fn anchor(&self, id: Uuid) -> Result<Option<Vec3>, ArmatureError> {
        Ok(self.node(id)?.anchor)
    }

    /// Resolve a target into the local coordinate space of node `id`
    ///
    /// Points on `id` itself are taken verbatim. Points on other nodes are
    /// mapped out to world space and back into `id`'s space; world
    /// coordinates skip the first step.
    pub fn local_point_coordinate(&self, id: Uuid, target: Target) -> Result<Vec3, ArmatureError> {
        let global = match target {
            Target::Point(point) if point.node == id => {
                self.node(id)?;
                return Ok(point.position);
            }
            Target::Point(point) => self
                .local_to_global_transform(point.node)?
                .transform_point3(point.position),
            Target::Global(position) => position,
        };
        Ok(self.global_to_local_transform(id)?.transform_point3(global))
    }

    /// World position of a node-local coordinate
    pub fn global_position(&self, id: Uuid, local: Vec3) -> Result<Vec3, ArmatureError> {
        Ok(self.local_to_global_transform(id)?.transform_point3(local))
    }
}
