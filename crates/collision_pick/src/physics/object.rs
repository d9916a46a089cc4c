//! Collision objects and their owner tags
//!
//! Every body the world reports carries an optional [`MotionState`]. Only
//! rigid bodies have one, and it names the kind of simulation object that
//! owns the body. Contact filtering matches on that tag, never on the
//! concrete type of the owner.

use super::shape_manager::NativeShape;
use crate::foundation::math::{Isometry, Point3, Vec3};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier of a simulation object (entity or avatar)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of simulation object owning a rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerKind {
    /// World entity
    Entity,
    /// Avatar (user or agent)
    Avatar,
}

impl OwnerKind {
    /// Filter bit for this kind
    pub fn mask(self) -> OwnerMask {
        match self {
            Self::Entity => OwnerMask::ENTITY,
            Self::Avatar => OwnerMask::AVATAR,
        }
    }
}

bitflags! {
    /// Set of owner kinds a contact query accepts
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OwnerMask: u32 {
        /// Accept entity bodies
        const ENTITY = 1 << 0;
        /// Accept avatar bodies
        const AVATAR = 1 << 1;
    }
}

/// Owner tag attached to rigid bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionState {
    /// Kind of owner
    pub owner: OwnerKind,
    /// Owner identifier reported back to callers
    pub object_id: ObjectId,
}

impl MotionState {
    /// Tag for an entity body
    pub fn entity(object_id: ObjectId) -> Self {
        Self {
            owner: OwnerKind::Entity,
            object_id,
        }
    }

    /// Tag for an avatar body
    pub fn avatar(object_id: ObjectId) -> Self {
        Self {
            owner: OwnerKind::Avatar,
            object_id,
        }
    }
}

/// A bounding sphere for broad contact tests
#[derive(Debug, Clone, Copy)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere intersects with another (touching counts)
    pub fn intersects(&self, other: &Self) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }
}

/// Placed collision shape, optionally owned by a simulation object
#[derive(Debug, Clone)]
pub struct CollisionObject {
    transform: Isometry,
    shape: Option<Arc<NativeShape>>,
    motion_state: Option<MotionState>,
}

impl CollisionObject {
    /// Object with no motion state (static geometry or a probe)
    pub fn new(transform: Isometry, shape: Option<Arc<NativeShape>>) -> Self {
        Self {
            transform,
            shape,
            motion_state: None,
        }
    }

    /// Rigid body tagged with its owner
    pub fn rigid_body(
        transform: Isometry,
        shape: Arc<NativeShape>,
        motion_state: MotionState,
    ) -> Self {
        Self {
            transform,
            shape: Some(shape),
            motion_state: Some(motion_state),
        }
    }

    /// World transform
    pub fn transform(&self) -> &Isometry {
        &self.transform
    }

    /// Collision shape, if any
    pub fn shape(&self) -> Option<&Arc<NativeShape>> {
        self.shape.as_ref()
    }

    /// Owner tag; `None` for anything that is not a rigid body
    pub fn motion_state(&self) -> Option<&MotionState> {
        self.motion_state.as_ref()
    }

    /// World-space sphere enclosing the shape
    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        self.shape.as_ref().map(|shape| {
            BoundingSphere::new(
                self.transform.translation.vector,
                shape.local_bounding_radius(),
            )
        })
    }

    /// Convert a world-space point into this object's local frame
    pub fn to_local(&self, world_point: &Vec3) -> Vec3 {
        self.transform
            .inverse_transform_point(&Point3::from(*world_point))
            .coords
    }
}
