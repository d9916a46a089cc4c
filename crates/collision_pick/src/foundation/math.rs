//! Math utilities and types
//!
//! Provides the fundamental math types shared by shape building and contact queries.

pub use nalgebra::{Translation3, UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Rigid transform (rotation + translation, no scale)
pub type Isometry = nalgebra::Isometry3<f32>;

/// Transform representing position, rotation, and scale
///
/// For a pick region the scale doubles as the requested shape dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Replace the scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rigid part of this transform (scale dropped)
    pub fn to_isometry(&self) -> Isometry {
        Isometry::from_parts(Translation3::from(self.position), self.rotation)
    }
}

/// Component-wise division guarded against degenerate divisor axes
///
/// Any axis of `size` below `epsilon` yields exactly 1.0 on that axis.
pub fn guarded_scale(dimensions: &Vec3, size: &Vec3, epsilon: f32) -> Vec3 {
    Vec3::from_fn(|i, _| {
        if size[i] < epsilon {
            1.0
        } else {
            dimensions[i] / size[i]
        }
    })
}
