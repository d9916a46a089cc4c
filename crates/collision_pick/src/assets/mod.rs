//! Mesh assets consumed by the shape builder
//!
//! The asset pipeline itself (download, format decoding) lives outside this
//! crate. What arrives here is an already-parsed [`MeshAsset`]; the
//! [`MeshAssetProvider`] trait is the seam through which picks ask for one and
//! poll whether it has resolved yet.

pub mod library;

pub use library::MeshLibrary;

use crate::foundation::extents::Extents;
use crate::foundation::math::Vec3;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Identifier of a mesh asset (the model URL it was loaded from)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(String);

impl AssetId {
    /// Create an identifier from a URL or path
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty identifier (no model requested)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

/// One part of a sub-mesh: a group of faces sharing the sub-mesh's vertices
///
/// Index lists come straight from the asset reader and are not sanitized:
/// their lengths need not be multiples of 3 (triangles) or 4 (quads).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshPart {
    /// Triangle vertex indices, three per face
    pub triangle_indices: Vec<u32>,
    /// Quad vertex indices, four per face
    pub quad_indices: Vec<u32>,
}

impl MeshPart {
    /// Create a part from triangle indices only
    pub fn triangles(indices: Vec<u32>) -> Self {
        Self {
            triangle_indices: indices,
            quad_indices: Vec::new(),
        }
    }

    /// Create a part from quad indices only
    pub fn quads(indices: Vec<u32>) -> Self {
        Self {
            triangle_indices: Vec::new(),
            quad_indices: indices,
        }
    }
}

/// A sub-mesh: vertices plus the parts indexing into them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubMesh {
    /// Vertex positions in model units
    pub vertices: Vec<Vec3>,
    /// Face groups
    pub parts: Vec<MeshPart>,
}

impl SubMesh {
    /// Create a sub-mesh
    pub fn new(vertices: Vec<Vec3>, parts: Vec<MeshPart>) -> Self {
        Self { vertices, parts }
    }
}

/// Immutable, fully parsed mesh asset
#[derive(Debug, Clone)]
pub struct MeshAsset {
    id: AssetId,
    meshes: Vec<SubMesh>,
    unscaled_extents: Extents,
}

impl MeshAsset {
    /// Create an asset, computing its unscaled extents from every vertex
    pub fn new(id: AssetId, meshes: Vec<SubMesh>) -> Self {
        let unscaled_extents =
            Extents::from_points(meshes.iter().flat_map(|mesh| mesh.vertices.iter()));
        Self {
            id,
            meshes,
            unscaled_extents,
        }
    }

    /// Source identifier
    pub fn id(&self) -> &AssetId {
        &self.id
    }

    /// Sub-meshes in file order
    pub fn meshes(&self) -> &[SubMesh] {
        &self.meshes
    }

    /// Total vertex count across all sub-meshes
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.vertices.len()).sum()
    }

    /// Size of the untransformed model on each axis
    pub fn unscaled_extents_size(&self) -> Vec3 {
        self.unscaled_extents.size()
    }
}

/// Asset collaborator used by picks
///
/// Resolution is asynchronous from the caller's point of view: `request`
/// must not block, and callers poll `is_resolved` on later frames.
pub trait MeshAssetProvider {
    /// Start resolving `id` if it is not already loaded or in flight
    fn request(&self, id: &AssetId);

    /// True once the asset is parsed and available through [`Self::mesh`]
    fn is_resolved(&self, id: &AssetId) -> bool;

    /// Fetch a resolved asset
    fn mesh(&self, id: &AssetId) -> Option<Arc<MeshAsset>>;
}

/// Asset lookup errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Asset was never registered
    #[error("Asset not found: {0}")]
    NotFound(AssetId),

    /// Asset is known but still loading
    #[error("Asset not resolved yet: {0}")]
    NotResolved(AssetId),
}
