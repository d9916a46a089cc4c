//! In-process mesh asset store
//!
//! Holds parsed assets and models the loader's asynchronous resolution with an
//! explicit pending set: `request` queues an asset, `resolve_pending` is what
//! the loader thread (or a test) calls when parsing has finished.

use super::{AssetError, AssetId, MeshAsset, MeshAssetProvider};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct LibraryState {
    /// Parsed assets, by id
    assets: HashMap<AssetId, Arc<MeshAsset>>,
    /// Requested but not yet handed out
    pending: HashSet<AssetId>,
    /// Available through `mesh`
    resolved: HashSet<AssetId>,
    /// Number of `request` calls per id
    requests: HashMap<AssetId, usize>,
}

/// Shared mesh asset store implementing [`MeshAssetProvider`]
#[derive(Default)]
pub struct MeshLibrary {
    state: RwLock<LibraryState>,
}

impl MeshLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, LibraryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LibraryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a parsed asset; it resolves once requested and loaded
    pub fn insert(&self, asset: MeshAsset) -> AssetId {
        let id = asset.id().clone();
        let mut state = self.write();
        state.resolved.remove(&id);
        state.assets.insert(id.clone(), Arc::new(asset));
        log::debug!("Registered mesh asset {}", id);
        id
    }

    /// Register a parsed asset that is immediately available
    pub fn insert_resolved(&self, asset: MeshAsset) -> AssetId {
        let id = self.insert(asset);
        let mut state = self.write();
        state.pending.remove(&id);
        state.resolved.insert(id.clone());
        id
    }

    /// Finish loading every requested asset, returning how many resolved
    pub fn resolve_pending(&self) -> usize {
        let mut state = self.write();
        let pending: Vec<AssetId> = state.pending.drain().collect();
        let count = pending.len();
        for id in pending {
            log::debug!("Mesh asset {} resolved", id);
            state.resolved.insert(id);
        }
        count
    }

    /// Look up an asset, distinguishing unknown from still loading
    pub fn get(&self, id: &AssetId) -> Result<Arc<MeshAsset>, AssetError> {
        let state = self.read();
        let asset = state
            .assets
            .get(id)
            .ok_or_else(|| AssetError::NotFound(id.clone()))?;
        if !state.resolved.contains(id) {
            return Err(AssetError::NotResolved(id.clone()));
        }
        Ok(Arc::clone(asset))
    }

    /// How many times `request` was called for `id`
    pub fn request_count(&self, id: &AssetId) -> usize {
        self.read().requests.get(id).copied().unwrap_or(0)
    }
}

impl MeshAssetProvider for MeshLibrary {
    fn request(&self, id: &AssetId) {
        let mut state = self.write();
        *state.requests.entry(id.clone()).or_insert(0) += 1;

        if state.resolved.contains(id) {
            return;
        }
        if !state.assets.contains_key(id) {
            log::warn!("Requested unknown mesh asset {}", id);
            return;
        }
        state.pending.insert(id.clone());
    }

    fn is_resolved(&self, id: &AssetId) -> bool {
        self.read().resolved.contains(id)
    }

    fn mesh(&self, id: &AssetId) -> Option<Arc<MeshAsset>> {
        self.get(id).ok()
    }
}
