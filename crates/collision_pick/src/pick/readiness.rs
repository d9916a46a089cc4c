//! Per-pick shape memoization
//!
//! Building a descriptor walks every vertex of the model, so a pick keeps
//! the last one it built and only rebuilds when the requested model changes
//! (or when told to through [`ShapeReadinessCache::invalidate`]).

use super::CollisionRegion;
use crate::assets::{AssetId, MeshAssetProvider};
use crate::physics::shape::{ShapeBuilder, ShapeDescriptor};

#[derive(Debug)]
struct CachedShape {
    descriptor: ShapeDescriptor,
    source: AssetId,
}

/// Last built descriptor of one pick, keyed by model identity
#[derive(Debug, Default)]
pub struct ShapeReadinessCache {
    requested: Option<AssetId>,
    entry: Option<CachedShape>,
}

impl ShapeReadinessCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll whether a descriptor for `region` is available, building it once
    /// the model has resolved
    ///
    /// Never blocks: a newly requested model always reports not-ready on the
    /// call that requests it.
    pub fn ensure_ready(
        &mut self,
        region: &CollisionRegion,
        assets: &dyn MeshAssetProvider,
        builder: &ShapeBuilder,
    ) -> bool {
        if self.requested.as_ref() != Some(&region.model) {
            assets.request(&region.model);
            self.requested = Some(region.model.clone());
            if let Some(previous) = self.entry.take() {
                log::debug!("Dropping shape built from {}", previous.source);
            }
            return false;
        }

        if self.entry.is_some() {
            return true;
        }

        if !assets.is_resolved(&region.model) {
            return false;
        }

        let Some(mesh) = assets.mesh(&region.model) else {
            log::warn!(
                "Model {} reported resolved but is unavailable",
                region.model
            );
            return false;
        };

        let descriptor = builder.build(
            &mesh,
            region.shape,
            region.dimensions(),
            region.registration_offset,
        );
        log::debug!(
            "Built {:?} shape for {} ({} points)",
            descriptor.kind(),
            region.model,
            descriptor.point_count()
        );
        self.entry = Some(CachedShape {
            descriptor,
            source: region.model.clone(),
        });
        true
    }

    /// Cached descriptor, once ready
    pub fn descriptor(&self) -> Option<&ShapeDescriptor> {
        self.entry.as_ref().map(|entry| &entry.descriptor)
    }

    /// Model the cached descriptor was built from
    pub fn source(&self) -> Option<&AssetId> {
        self.entry.as_ref().map(|entry| &entry.source)
    }

    /// Forget the built descriptor so the next poll rebuilds it
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
