//! Hold / grab / point / stretch posing for Armature nodes
//!
//! Each node carries its own transient pose state: points held in place and
//! one grabbed point. `point_at` and `stretch_to` rotate (and optionally
//! stretch) the node so its grabbed point aims at a target while the held
//! points and the attachment anchor stay where they are.
//!
//! The constrained points are the held points followed by the anchor. The
//! last one is the pivot of the rotation; what remains decides the degrees
//! of freedom:
//!
//! | remaining | solve |
//! |-----------|-------|
//! | 0 | free rotation about the pivot |
//! | 1 | rotation about the pivot → held point hinge |
//! | 2+ | [`ArmatureError::OverConstrained`] |

use glam::Vec3;
use uuid::Uuid;

use super::point::Target;
use super::solve::{rotate_one_degree, rotate_two_degrees};
use super::{Armature, ArmatureError};

impl Armature {
    /// Keep a point fixed during subsequent pose operations on `id`
    pub fn hold(&mut self, id: Uuid, target: impl Into<Target>) -> Result<(), ArmatureError> {
        let local = self.local_point_coordinate(id, target.into())?;
        self.node_mut(id)?.held.push(local);
        tracing::debug!(node = %id, ?local, "hold");
        Ok(())
    }

    /// Choose the point that `point_at` / `stretch_to` will move
    pub fn grab(&mut self, id: Uuid, target: impl Into<Target>) -> Result<(), ArmatureError> {
        let local = self.local_point_coordinate(id, target.into())?;
        self.node_mut(id)?.grabbed = Some(local);
        tracing::debug!(node = %id, ?local, "grab");
        Ok(())
    }

    /// Drop all held and grabbed points of `id` (the anchor is kept)
    pub fn release(&mut self, id: Uuid) -> Result<(), ArmatureError> {
        let node = self.node_mut(id)?;
        node.held.clear();
        node.grabbed = None;
        Ok(())
    }

    /// Rotate `id` so its grabbed point aims at `target`
    pub fn point_at(&mut self, id: Uuid, target: impl Into<Target>) -> Result<(), ArmatureError> {
        self.point_and_stretch_to(id, target.into(), false)
    }

    /// Rotate and stretch `id` so its grabbed point reaches `target`
    pub fn stretch_to(&mut self, id: Uuid, target: impl Into<Target>) -> Result<(), ArmatureError> {
        self.point_and_stretch_to(id, target.into(), true)
    }

    fn point_and_stretch_to(
        &mut self,
        id: Uuid,
        target: Target,
        stretch: bool,
    ) -> Result<(), ArmatureError> {
        let node = self.node(id)?;
        let grabbed = node.grabbed.ok_or(ArmatureError::NoGrab)?;

        let mut constrained: Vec<Vec3> = node.held.clone();
        constrained.extend(node.anchor);
        let current = node.transformation;

        let target = self.local_point_coordinate(id, target)?;
        let anchor = constrained.pop().ok_or(ArmatureError::NoAnchor)?;

        let solved = match constrained.as_slice() {
            [] => rotate_two_degrees(&current, anchor, grabbed, target, stretch)?,
            [axis_point] => {
                rotate_one_degree(&current, anchor, *axis_point, grabbed, target, stretch)?
            }
            rest => return Err(ArmatureError::OverConstrained(rest.len())),
        };

        tracing::debug!(
            node = %id,
            degrees_of_freedom = 2 - constrained.len(),
            stretch,
            "posed node"
        );
        self.node_mut(id)?.transformation = solved;
        Ok(())
    }
}
