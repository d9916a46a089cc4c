//! Contact-test interface to the physics world
//!
//! The narrow phase belongs to the physics engine; the pick layer only needs
//! its one-shot "what touches this object" query. [`BoundingSphereWorld`] is
//! a small in-process implementation that tests enclosing spheres, enough to
//! drive picks without a full engine.

use super::object::CollisionObject;
use crate::foundation::math::Vec3;

/// A single touching pair reported by a contact test
///
/// Either member may be the object under test; callers must check.
#[derive(Debug, Clone, Copy)]
pub struct ContactPoint<'a> {
    /// First object of the pair
    pub object_a: &'a CollisionObject,
    /// Second object of the pair
    pub object_b: &'a CollisionObject,
    /// Contact point in `object_a`'s local frame
    pub local_point_a: Vec3,
    /// Contact point in `object_b`'s local frame
    pub local_point_b: Vec3,
}

/// Receives contacts as a test reports them
pub trait ContactResultCallback {
    /// Called once per touching pair, in report order
    fn add_single_result(&mut self, contact: &ContactPoint<'_>);
}

/// World-side contact test seam
pub trait CollisionWorld {
    /// Report every body touching `object`
    ///
    /// `object` need not be registered with the world.
    fn contact_test(&self, object: &CollisionObject, callback: &mut dyn ContactResultCallback);
}

/// Bodies tested by enclosing spheres, reported in insertion order
#[derive(Debug, Default)]
pub struct BoundingSphereWorld {
    bodies: Vec<CollisionObject>,
}

impl BoundingSphereWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body, returning its index
    pub fn add_body(&mut self, body: CollisionObject) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    /// Number of registered bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// True when no body is registered
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl CollisionWorld for BoundingSphereWorld {
    fn contact_test(&self, object: &CollisionObject, callback: &mut dyn ContactResultCallback) {
        let Some(probe) = object.bounding_sphere() else {
            return;
        };

        for body in &self.bodies {
            if std::ptr::eq(body, object) {
                continue;
            }
            let Some(sphere) = body.bounding_sphere() else {
                continue;
            };
            if !probe.intersects(&sphere) {
                continue;
            }

            // Coincident centers have no separating direction; pick +x
            let direction = (sphere.center - probe.center)
                .try_normalize(f32::EPSILON)
                .unwrap_or_else(Vec3::x);
            let on_probe = probe.center + direction * probe.radius;
            let on_body = sphere.center - direction * sphere.radius;

            callback.add_single_result(&ContactPoint {
                object_a: object,
                object_b: body,
                local_point_a: object.to_local(&on_probe),
                local_point_b: body.to_local(&on_body),
            });
        }
    }
}
