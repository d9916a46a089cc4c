//! Physics-side collaborators of a collision pick
//!
//! Shape descriptors and their builder, the shared reference-counted shape
//! cache, collision objects with owner tags, the contact-test seam and the
//! typed contact filter run over it.

pub mod contact_filter;
pub mod object;
pub mod probe;
pub mod shape;
pub mod shape_manager;
pub mod world;

pub use contact_filter::ContactResult;
pub use object::{BoundingSphere, CollisionObject, MotionState, ObjectId, OwnerKind, OwnerMask};
pub use probe::CollisionProbe;
pub use shape::{RequestedShape, ShapeBuilder, ShapeDescriptor, ShapeGeometry, ShapeKind};
pub use shape_manager::{NativeShape, ShapeCache, ShapeCacheError, ShapeHandle, ShapeManager};
pub use world::{BoundingSphereWorld, CollisionWorld, ContactPoint, ContactResultCallback};
