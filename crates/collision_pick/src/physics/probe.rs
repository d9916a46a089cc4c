//! Ephemeral collision probe
//!
//! A probe is a collision object that is never inserted into a world: it
//! exists for the duration of one contact query. It takes one reference on
//! its shape when created and gives it back in `Drop`, so the reference is
//! returned on every exit path, including unwinding.

use super::object::CollisionObject;
use super::shape::ShapeDescriptor;
use super::shape_manager::{ShapeCache, ShapeHandle};
use crate::foundation::math::Isometry;

/// One-shot query object holding a shape reference
pub struct CollisionProbe<'a> {
    shapes: &'a dyn ShapeCache,
    handle: Option<ShapeHandle>,
    object: CollisionObject,
}

impl<'a> CollisionProbe<'a> {
    /// Acquire a shape for `descriptor` and place it at `transform`
    ///
    /// A descriptor with nothing collidable yields an empty probe.
    pub fn acquire(
        shapes: &'a dyn ShapeCache,
        descriptor: &ShapeDescriptor,
        transform: Isometry,
    ) -> Self {
        let handle = shapes.acquire(descriptor);
        let shape = handle.and_then(|handle| shapes.shape(handle));
        Self {
            shapes,
            handle,
            object: CollisionObject::new(transform, shape),
        }
    }

    /// Handle held by this probe
    pub fn handle(&self) -> Option<ShapeHandle> {
        self.handle
    }

    /// The probe's collision object
    pub fn object(&self) -> &CollisionObject {
        &self.object
    }

    /// True when there is no geometry to test with
    pub fn is_empty(&self) -> bool {
        self.object.shape().is_none()
    }
}

impl Drop for CollisionProbe<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(err) = self.shapes.release(handle) {
                log::error!("Failed to release probe shape: {}", err);
            }
        }
    }
}
