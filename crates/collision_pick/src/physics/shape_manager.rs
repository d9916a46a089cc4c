//! Shared shape cache
//!
//! Native collision shapes are expensive to build and frequently identical
//! (every pick on the same model at the same size produces the same
//! descriptor), so the physics layer keeps one reference-counted instance per
//! distinct descriptor.
//!
//! **Ownership**: the cache is shared by reference between every pick and the
//! physics world; interior mutability (`Mutex`) lets `acquire`/`release` take
//! `&self`. Handles are slotmap keys, so a stale handle is detected instead of
//! aliasing a newer shape.

use super::shape::ShapeDescriptor;
use crate::foundation::collections::{HandleMap, ShapeKey};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Handle to a shape held by a [`ShapeCache`]
pub type ShapeHandle = ShapeKey;

/// Shape cache errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeCacheError {
    /// Handle was never issued or its shape is already gone
    #[error("Unknown shape handle: {0:?}")]
    UnknownHandle(ShapeHandle),
}

/// Engine-side shape built from a descriptor
#[derive(Debug)]
pub struct NativeShape {
    descriptor: Arc<ShapeDescriptor>,
    bounding_radius: f32,
}

impl NativeShape {
    /// Build the engine shape for `descriptor`
    pub fn new(descriptor: Arc<ShapeDescriptor>) -> Self {
        let bounding_radius = descriptor.local_bounding_radius();
        Self {
            descriptor,
            bounding_radius,
        }
    }

    /// Descriptor the shape was built from
    pub fn descriptor(&self) -> &ShapeDescriptor {
        &self.descriptor
    }

    /// Radius of a sphere around the local origin enclosing the shape
    pub fn local_bounding_radius(&self) -> f32 {
        self.bounding_radius
    }
}

/// Physics-side shape cache seam
pub trait ShapeCache {
    /// Get (or build) the shape for `descriptor`, taking one reference
    ///
    /// Returns `None` when the descriptor has nothing to collide with.
    fn acquire(&self, descriptor: &ShapeDescriptor) -> Option<ShapeHandle>;

    /// Drop one reference taken by [`Self::acquire`]
    fn release(&self, handle: ShapeHandle) -> Result<(), ShapeCacheError>;

    /// Look up a live shape
    fn shape(&self, handle: ShapeHandle) -> Option<Arc<NativeShape>>;
}

struct ShapeEntry {
    shape: Arc<NativeShape>,
    ref_count: usize,
}

#[derive(Default)]
struct ShapeTable {
    shapes: HandleMap<ShapeKey, ShapeEntry>,
    lookup: HashMap<Arc<ShapeDescriptor>, ShapeKey>,
}

/// Reference-counted [`ShapeCache`] keyed by descriptor content
#[derive(Default)]
pub struct ShapeManager {
    inner: Mutex<ShapeTable>,
}

impl ShapeManager {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, ShapeTable> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of distinct live shapes
    pub fn shape_count(&self) -> usize {
        self.table().shapes.len()
    }

    /// Outstanding references to `handle` (0 when it is gone)
    pub fn ref_count(&self, handle: ShapeHandle) -> usize {
        self.table()
            .shapes
            .get(handle)
            .map_or(0, |entry| entry.ref_count)
    }
}

impl ShapeCache for ShapeManager {
    fn acquire(&self, descriptor: &ShapeDescriptor) -> Option<ShapeHandle> {
        if !descriptor.is_collidable() {
            log::debug!("Skipping shape with no collidable geometry");
            return None;
        }

        let mut table = self.table();
        let existing = table.lookup.get(descriptor).copied();
        if let Some(key) = existing {
            if let Some(entry) = table.shapes.get_mut(key) {
                entry.ref_count += 1;
                return Some(key);
            }
        }

        let descriptor = Arc::new(descriptor.clone());
        let key = table.shapes.insert(ShapeEntry {
            shape: Arc::new(NativeShape::new(Arc::clone(&descriptor))),
            ref_count: 1,
        });
        table.lookup.insert(descriptor, key);
        log::debug!("Created {:?} shape {:?}", table.shapes[key].shape.descriptor().kind(), key);
        Some(key)
    }

    fn release(&self, handle: ShapeHandle) -> Result<(), ShapeCacheError> {
        let mut table = self.table();
        let entry = table
            .shapes
            .get_mut(handle)
            .ok_or(ShapeCacheError::UnknownHandle(handle))?;

        entry.ref_count -= 1;
        if entry.ref_count == 0 {
            if let Some(entry) = table.shapes.remove(handle) {
                table.lookup.remove(&entry.shape.descriptor);
            }
            log::debug!("Destroyed shape {:?}", handle);
        }
        Ok(())
    }

    fn shape(&self, handle: ShapeHandle) -> Option<Arc<NativeShape>> {
        self.table()
            .shapes
            .get(handle)
            .map(|entry| Arc::clone(&entry.shape))
    }
}
