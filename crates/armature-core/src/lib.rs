//! Armature Core Data Structures
//!
//! This crate contains the core data structures for procedural posing:
//! - Transformation: decomposed position / rotation / scale
//! - Armature: scene graph of jointed nodes with named points
//! - Pose: hold / grab / point_at / stretch_to constraint solving
//! - Bake: flattening the tree into render objects
//! - Project: serializable project file

pub mod armature;
pub mod bake;
pub mod constants;
pub mod geometry;
pub mod primitive;
pub mod project;
pub mod transformation;

pub use armature::*;
pub use bake::*;
pub use constants::*;
pub use geometry::*;
pub use primitive::*;
pub use project::*;
pub use transformation::*;
