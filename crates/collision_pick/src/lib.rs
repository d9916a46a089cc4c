//! # Collision Pick
//!
//! Turns loaded mesh assets into collision shapes and runs one-shot,
//! owner-filtered contact queries with them.
//!
//! ## Features
//!
//! - **Shape Building**: compound hulls, simple hulls, simple compounds and
//!   static meshes, rescaled to the requested dimensions
//! - **Size Guards**: oversized models degrade to boxes instead of stalling
//! - **Shared Shapes**: reference-counted shape cache keyed by content
//! - **Typed Filtering**: contacts partitioned by owner kind (entity/avatar)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use collision_pick::prelude::*;
//!
//! let library = MeshLibrary::new();
//! let shapes = ShapeManager::new();
//! let world = BoundingSphereWorld::new();
//! let builder = ShapeBuilder::default();
//! let ctx = PickContext {
//!     assets: &library,
//!     shapes: &shapes,
//!     world: &world,
//!     builder: &builder,
//! };
//!
//! let region = CollisionRegion::new(
//!     AssetId::new("models/crate.fbx"),
//!     RequestedShape::SimpleHull,
//!     Transform::identity().with_scale(Vec3::new(1.0, 1.0, 1.0)),
//! );
//! let mut pick = CollisionPick::new(region);
//!
//! // Poll once per frame until the model has loaded
//! if let CollisionPickResult::Ready { entity_intersections, .. } = pick.pick(&ctx) {
//!     for hit in entity_intersections {
//!         println!("touching {}", hit.object_id);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod physics;
pub mod pick;

/// Common imports for pick users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, AssetId, MeshAsset, MeshAssetProvider, MeshLibrary, MeshPart, SubMesh},
        config::{Config, ConfigError, PickConfig, ShapeLimits},
        foundation::math::{Isometry, Quat, Transform, Vec3},
        physics::{
            BoundingSphereWorld, CollisionObject, CollisionWorld, ContactResult, MotionState,
            NativeShape, ObjectId, OwnerKind, OwnerMask, RequestedShape, ShapeBuilder, ShapeCache,
            ShapeDescriptor, ShapeKind, ShapeManager,
        },
        pick::{CollisionPick, CollisionPickResult, CollisionRegion, PickContext, PickResult},
    };
}
