//! Collision picks
//!
//! A collision pick asks "what is touching this model, placed here, at this
//! size?" It owns a [`CollisionRegion`] and a [`ShapeReadinessCache`], and
//! answers against collaborators handed in per call through [`PickContext`]:
//!
//! ```text
//! region ─► readiness cache ─(builder)─► descriptor
//!                                           │
//!                       shape cache ◄── probe ──► world contact test
//!                                                     │
//!                                     typed filter ◄──┘ ─► results
//! ```
//!
//! Until the model has resolved and its shape has been built, every query
//! reports [`PickResult::NotReady`], which is distinct from a ready query
//! that found nothing.

pub mod readiness;

pub use readiness::ShapeReadinessCache;

use crate::assets::{AssetId, MeshAssetProvider};
use crate::foundation::math::{Transform, Vec3};
use crate::physics::contact_filter::{self, ContactResult};
use crate::physics::object::OwnerMask;
use crate::physics::probe::CollisionProbe;
use crate::physics::shape::{RequestedShape, ShapeBuilder};
use crate::physics::shape_manager::ShapeCache;
use crate::physics::world::CollisionWorld;
use serde::{Deserialize, Serialize};

/// Where and what a collision pick tests
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionRegion {
    /// Model providing the shape
    pub model: AssetId,
    /// Shape kind to build from the model
    pub shape: RequestedShape,
    /// World placement; the scale is the requested shape dimensions
    pub transform: Transform,
    /// Registration offset recorded on the built shape
    pub registration_offset: Vec3,
}

impl CollisionRegion {
    /// Create a region with no registration offset
    pub fn new(model: AssetId, shape: RequestedShape, transform: Transform) -> Self {
        Self {
            model,
            shape,
            transform,
            registration_offset: Vec3::zeros(),
        }
    }

    /// Set the registration offset
    pub fn with_registration_offset(mut self, offset: Vec3) -> Self {
        self.registration_offset = offset;
        self
    }

    /// Requested shape dimensions
    pub fn dimensions(&self) -> Vec3 {
        self.transform.scale
    }

    /// Whether `other` builds the same shape from the same model
    fn builds_same_shape(&self, other: &Self) -> bool {
        self.model == other.model
            && self.shape == other.shape
            && self.dimensions() == other.dimensions()
            && self.registration_offset == other.registration_offset
    }
}

/// Collaborators a pick queries against
#[derive(Clone, Copy)]
pub struct PickContext<'a> {
    /// Mesh asset source
    pub assets: &'a dyn MeshAssetProvider,
    /// Shared native shape cache
    pub shapes: &'a dyn ShapeCache,
    /// World to contact-test against
    pub world: &'a dyn CollisionWorld,
    /// Shape builder (carries the configured limits)
    pub builder: &'a ShapeBuilder,
}

/// Outcome of one filtered intersection query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PickResult {
    /// Shape not built yet; no query was run
    NotReady,
    /// Query ran; contacts in world report order (possibly none)
    Ready(Vec<ContactResult>),
}

impl PickResult {
    /// True once a query actually ran
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Contacts found (empty when not ready)
    pub fn contacts(&self) -> &[ContactResult] {
        match self {
            Self::NotReady => &[],
            Self::Ready(contacts) => contacts,
        }
    }
}

/// Outcome of a combined entity and avatar pick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CollisionPickResult {
    /// Shape not built yet
    NotReady,
    /// Both passes ran
    Ready {
        /// Contacts with entity bodies
        entity_intersections: Vec<ContactResult>,
        /// Contacts with avatar bodies
        avatar_intersections: Vec<ContactResult>,
    },
}

impl CollisionPickResult {
    /// True once both passes ran
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// True when ready and at least one contact was found
    pub fn does_intersect(&self) -> bool {
        match self {
            Self::NotReady => false,
            Self::Ready {
                entity_intersections,
                avatar_intersections,
            } => !entity_intersections.is_empty() || !avatar_intersections.is_empty(),
        }
    }
}

/// A collision pick and its cached shape
#[derive(Debug)]
pub struct CollisionPick {
    region: CollisionRegion,
    readiness: ShapeReadinessCache,
}

impl CollisionPick {
    /// Create a pick; nothing is requested until the first query
    pub fn new(region: CollisionRegion) -> Self {
        Self {
            region,
            readiness: ShapeReadinessCache::new(),
        }
    }

    /// Region being tested
    pub fn region(&self) -> &CollisionRegion {
        &self.region
    }

    /// Replace the region
    ///
    /// The cached shape survives moves and rotations but is rebuilt when the
    /// kind, dimensions or registration offset change.
    pub fn set_region(&mut self, region: CollisionRegion) {
        if !self.region.builds_same_shape(&region) {
            self.readiness.invalidate();
        }
        self.region = region;
    }

    /// Contacts with entity bodies
    pub fn entity_intersection(&mut self, ctx: &PickContext<'_>) -> PickResult {
        self.intersect(ctx, OwnerMask::ENTITY)
    }

    /// Contacts with avatar bodies
    pub fn avatar_intersection(&mut self, ctx: &PickContext<'_>) -> PickResult {
        self.intersect(ctx, OwnerMask::AVATAR)
    }

    /// Run the entity and avatar passes together
    pub fn pick(&mut self, ctx: &PickContext<'_>) -> CollisionPickResult {
        if !self.ensure_ready(ctx) {
            return CollisionPickResult::NotReady;
        }

        let entity_intersections = self.query(ctx, OwnerMask::ENTITY);
        let avatar_intersections = self.query(ctx, OwnerMask::AVATAR);
        CollisionPickResult::Ready {
            entity_intersections,
            avatar_intersections,
        }
    }

    fn ensure_ready(&mut self, ctx: &PickContext<'_>) -> bool {
        self.readiness
            .ensure_ready(&self.region, ctx.assets, ctx.builder)
    }

    fn intersect(&mut self, ctx: &PickContext<'_>, filter: OwnerMask) -> PickResult {
        if !self.ensure_ready(ctx) {
            return PickResult::NotReady;
        }
        PickResult::Ready(self.query(ctx, filter))
    }

    /// One contact pass with its own probe
    fn query(&self, ctx: &PickContext<'_>, filter: OwnerMask) -> Vec<ContactResult> {
        let Some(descriptor) = self.readiness.descriptor() else {
            return Vec::new();
        };
        let transform = self.region.transform.to_isometry();
        let probe = CollisionProbe::acquire(ctx.shapes, descriptor, transform);
        contact_filter::query(&probe, ctx.world, filter)
    }
}
