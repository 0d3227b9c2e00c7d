//! Rotation and stretch solving for posed nodes
//!
//! All solving happens in the node's scale-factored frame: local vectors with
//! the node's scale applied, which is the frame its rotation acts on. Working
//! there keeps the result exact for non-uniform and stretched scales.

use std::f32::consts::PI;

use glam::{Mat4, Quat, Vec3};

use super::ArmatureError;
use crate::constants::{DIRECTION_EPSILON, PARALLEL_COS_THRESHOLD};
use crate::transformation::Transformation;

/// Shortest-arc rotation taking unit vector `from` onto unit vector `to`
///
/// Parallel vectors give the identity. Opposite vectors give a half turn
/// about `fallback_axis` when supplied, otherwise about an arbitrary vector
/// orthogonal to `from`.
pub fn shortest_arc(from: Vec3, to: Vec3, fallback_axis: Option<Vec3>) -> Quat {
    let cos = from.dot(to);
    if cos >= PARALLEL_COS_THRESHOLD {
        return Quat::IDENTITY;
    }
    if cos <= -PARALLEL_COS_THRESHOLD {
        let axis = fallback_axis
            .and_then(|axis| axis.try_normalize())
            .unwrap_or_else(|| from.any_orthonormal_vector());
        return Quat::from_axis_angle(axis, PI);
    }
    Quat::from_rotation_arc(from, to)
}

/// Scale by `factor` along the `anchor → grabbed` axis, keeping `anchor` fixed
///
/// Built as translate(anchor) · rotate back · scale x · rotate axis onto x ·
/// translate(-anchor).
pub fn scale_axis(anchor: Vec3, grabbed: Vec3, factor: f32) -> Mat4 {
    let Some(direction) = (grabbed - anchor).try_normalize() else {
        return Mat4::IDENTITY;
    };
    let onto_x = shortest_arc(direction, Vec3::X, None);

    Mat4::from_translation(anchor)
        * Mat4::from_quat(onto_x.inverse())
        * Mat4::from_scale(Vec3::new(factor, 1.0, 1.0))
        * Mat4::from_quat(onto_x)
        * Mat4::from_translation(-anchor)
}

/// Free rotation about `anchor` aiming `grabbed` at `target` (local points)
pub(crate) fn rotate_two_degrees(
    current: &Transformation,
    anchor: Vec3,
    grabbed: Vec3,
    target: Vec3,
    stretch: bool,
) -> Result<Transformation, ArmatureError> {
    let scale = current.scale();
    let to_grabbed = scale.transform_vector3(grabbed - anchor);
    let to_target = scale.transform_vector3(target - anchor);

    let (grabbed_length, target_length) = (to_grabbed.length(), to_target.length());
    if grabbed_length < DIRECTION_EPSILON || target_length < DIRECTION_EPSILON {
        return Err(ArmatureError::DegenerateTarget);
    }

    let arc = shortest_arc(to_grabbed / grabbed_length, to_target / target_length, None);

    let new_scale = if stretch {
        let pivot = scale.transform_point3(anchor);
        scale_axis(pivot, pivot + to_grabbed, target_length / grabbed_length) * scale
    } else {
        scale
    };

    Ok(rotate_about(current, anchor, arc, new_scale))
}

/// Rotation about the `anchor → axis_point` hinge aiming `grabbed` at `target`
pub(crate) fn rotate_one_degree(
    current: &Transformation,
    anchor: Vec3,
    axis_point: Vec3,
    grabbed: Vec3,
    target: Vec3,
    stretch: bool,
) -> Result<Transformation, ArmatureError> {
    let scale = current.scale();

    // A hinge point sitting on the anchor leaves the rotation free
    let Some(axis) = scale.transform_vector3(axis_point - anchor).try_normalize() else {
        return rotate_two_degrees(current, anchor, grabbed, target, stretch);
    };

    let to_grabbed = scale.transform_vector3(grabbed - anchor);
    let to_target = scale.transform_vector3(target - anchor);

    // Offsets from the closest points on the hinge
    let grabbed_perp = to_grabbed - axis * to_grabbed.dot(axis);
    let target_perp = to_target - axis * to_target.dot(axis);

    let (grabbed_length, target_length) = (grabbed_perp.length(), target_perp.length());
    if grabbed_length < DIRECTION_EPSILON || target_length < DIRECTION_EPSILON {
        return Err(ArmatureError::DegenerateTarget);
    }

    let arc = shortest_arc(
        grabbed_perp / grabbed_length,
        target_perp / target_length,
        Some(axis),
    );

    let new_scale = if stretch {
        let closest = scale.transform_point3(anchor) + axis * to_grabbed.dot(axis);
        scale_axis(closest, closest + grabbed_perp, target_length / grabbed_length) * scale
    } else {
        scale
    };

    Ok(rotate_about(current, anchor, arc, new_scale))
}

/// Apply `arc` (in the scale-factored frame) and `new_scale`, then re-solve the
/// position so the anchor keeps its place in the parent's space.
fn rotate_about(
    current: &Transformation,
    anchor: Vec3,
    arc: Quat,
    new_scale: Mat4,
) -> Transformation {
    let fixed = current.transform_point(anchor);
    let rotation = (current.rotation() * arc).normalize();

    let mut solved = Transformation::new(Vec3::ZERO, rotation, new_scale);
    let moved = solved.transform_point(anchor);
    solved.set_position(fixed - moved);
    solved
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_shortest_arc_quarter_turn() {
        let arc = shortest_arc(Vec3::X, Vec3::Y, None);
        assert!((arc * Vec3::X).abs_diff_eq(Vec3::Y, 1e-5));
        assert!((arc.angle_between(Quat::IDENTITY) - FRAC_PI_2).abs() < 1e-4);
    }

    #[test]
    fn test_shortest_arc_parallel_is_identity() {
        assert_eq!(shortest_arc(Vec3::Z, Vec3::Z, None), Quat::IDENTITY);
    }

    #[test]
    fn test_shortest_arc_opposite_uses_fallback() {
        let arc = shortest_arc(Vec3::X, Vec3::NEG_X, Some(Vec3::Z));
        assert!((arc * Vec3::X).abs_diff_eq(Vec3::NEG_X, 1e-5));
        // Rotating about the hinge keeps it fixed
        assert!((arc * Vec3::Z).abs_diff_eq(Vec3::Z, 1e-5));

        let arc = shortest_arc(Vec3::Y, Vec3::NEG_Y, None);
        assert!((arc * Vec3::Y).abs_diff_eq(Vec3::NEG_Y, 1e-5));
    }

    #[test]
    fn test_scale_axis_fixes_anchor() {
        let anchor = Vec3::new(1.0, 1.0, 0.0);
        let grabbed = Vec3::new(1.0, 3.0, 0.0);
        let m = scale_axis(anchor, grabbed, 1.5);

        assert!(m.transform_point3(anchor).abs_diff_eq(anchor, 1e-5));
        assert!(
            m.transform_point3(grabbed)
                .abs_diff_eq(Vec3::new(1.0, 4.0, 0.0), 1e-5)
        );
        // Perpendicular directions are untouched
        assert!(
            m.transform_point3(anchor + Vec3::X)
                .abs_diff_eq(anchor + Vec3::X, 1e-5)
        );
    }

    #[test]
    fn test_scale_axis_degenerate_is_identity() {
        assert_eq!(scale_axis(Vec3::ONE, Vec3::ONE, 2.0), Mat4::IDENTITY);
    }

    #[test]
    fn test_rotate_two_degrees_with_scale() {
        let mut current = Transformation::from_position(Vec3::new(0.0, 2.0, 0.0));
        current.set_scale(Vec3::new(2.0, 0.5, 1.0));

        let anchor = Vec3::new(0.5, 0.0, 0.0);
        let grabbed = Vec3::new(1.5, 0.0, 0.0);
        let target = Vec3::new(0.5, 3.0, 1.0);

        let solved = rotate_two_degrees(&current, anchor, grabbed, target, false).unwrap();

        let anchor_before = current.transform_point(anchor);
        let anchor_after = solved.transform_point(anchor);
        assert!(anchor_before.abs_diff_eq(anchor_after, 1e-5));

        let aimed = (solved.transform_point(grabbed) - anchor_after).normalize();
        let wanted = (current.transform_point(target) - anchor_before).normalize();
        assert!(aimed.abs_diff_eq(wanted, 1e-5));
    }

    #[test]
    fn test_rotate_two_degrees_degenerate() {
        let current = Transformation::default();
        assert_eq!(
            rotate_two_degrees(&current, Vec3::ZERO, Vec3::X, Vec3::ZERO, false),
            Err(ArmatureError::DegenerateTarget)
        );
    }

    #[test]
    fn test_rotate_one_degree_grabbed_on_hinge() {
        let current = Transformation::default();
        assert_eq!(
            rotate_one_degree(&current, Vec3::ZERO, Vec3::Z, Vec3::Z * 2.0, Vec3::X, false),
            Err(ArmatureError::DegenerateTarget)
        );
    }
}
