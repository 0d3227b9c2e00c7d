//! Global constants for armature-core

/// Tolerance below which a direction vector is treated as zero length
pub const DIRECTION_EPSILON: f32 = 1e-6;

/// Cosine threshold above which two unit vectors are treated as parallel
pub const PARALLEL_COS_THRESHOLD: f32 = 1.0 - 1e-6;

/// Default number of segments for bone mesh generation
pub const BONE_SEGMENTS: u32 = 8;

/// Default bone radius (in world units)
pub const BONE_RADIUS: f32 = 0.02;

/// Default bone color (orange, RGBA)
pub const BONE_COLOR: [f32; 4] = [1.0, 0.6, 0.1, 1.0];

/// Default color for geometry (gray, RGBA)
pub const DEFAULT_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

/// Current project file format version
pub const PROJECT_VERSION: u32 = 1;
