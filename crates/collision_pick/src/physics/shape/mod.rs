//! Collision shape descriptors
//!
//! A [`ShapeDescriptor`] is the engine-facing description of a collision
//! shape: point lists and index buffers in model space, already rescaled to
//! the requested dimensions, plus the canonical size the physics engine uses
//! when it builds the native shape.
//!
//! # Canonical size
//!
//! Compound convex hulls carry the FULL requested dimensions; every other
//! kind (including the degraded box) carries HALF of them. The native shape
//! constructors expect exactly this.
//!
//! # Simple compound index encoding
//!
//! The native compound ingestion takes one flat `i32` buffer. Each part's
//! unique, ascending indices are followed by [`END_OF_MESH_PART`]; after the
//! last part of a sub-mesh comes [`END_OF_MESH`]. Use
//! [`ShapeDescriptor::compound_parts`] to read it back as a nested structure.

pub mod builder;

pub use builder::ShapeBuilder;

use crate::assets::AssetId;
use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Sentinel closing one part inside a simple-compound index buffer
pub const END_OF_MESH_PART: i32 = -1;

/// Sentinel closing one sub-mesh inside a simple-compound index buffer
pub const END_OF_MESH: i32 = -2;

/// Ordered list of model-space points
pub type PointList = Vec<Vec3>;

/// Every shape representation a descriptor can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// One convex hull per mesh part
    CompoundConvexHull,
    /// Single hull over every vertex
    SimpleHull,
    /// One hull per sub-mesh, parts encoded with sentinels
    SimpleCompound,
    /// Exact triangle mesh
    StaticMesh,
    /// Degraded output when a model is too large to process
    Box,
}

/// Shape kinds a pick may ask for
///
/// There is no box: [`ShapeKind::Box`] is only ever produced as a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestedShape {
    /// One convex hull per mesh part
    CompoundConvexHull,
    /// Single hull over every vertex
    SimpleHull,
    /// One hull per sub-mesh
    SimpleCompound,
    /// Exact triangle mesh
    StaticMesh,
}

impl RequestedShape {
    /// The kind a successful build produces
    pub fn kind(self) -> ShapeKind {
        match self {
            Self::CompoundConvexHull => ShapeKind::CompoundConvexHull,
            Self::SimpleHull => ShapeKind::SimpleHull,
            Self::SimpleCompound => ShapeKind::SimpleCompound,
            Self::StaticMesh => ShapeKind::StaticMesh,
        }
    }
}

/// Kind-specific geometry of a descriptor
#[derive(Debug, Clone)]
pub enum ShapeGeometry {
    /// Box sized by the descriptor's canonical size
    Box,
    /// One point list per non-empty mesh part
    CompoundConvexHull {
        /// Deduplicated hull points, one list per part
        hulls: Vec<PointList>,
    },
    /// One shared point list
    SimpleHull {
        /// Every vertex of every sub-mesh
        points: PointList,
    },
    /// One point list per non-empty sub-mesh plus the sentinel index buffer
    SimpleCompound {
        /// Vertices, one list per sub-mesh
        meshes: Vec<PointList>,
        /// Part indices with sentinels
        indices: Vec<i32>,
    },
    /// One shared point list plus a flat triangle buffer
    StaticMesh {
        /// Every vertex of every sub-mesh
        points: PointList,
        /// Triangle indices into `points`, three per face
        indices: Vec<i32>,
    },
}

impl ShapeGeometry {
    fn kind(&self) -> ShapeKind {
        match self {
            Self::Box => ShapeKind::Box,
            Self::CompoundConvexHull { .. } => ShapeKind::CompoundConvexHull,
            Self::SimpleHull { .. } => ShapeKind::SimpleHull,
            Self::SimpleCompound { .. } => ShapeKind::SimpleCompound,
            Self::StaticMesh { .. } => ShapeKind::StaticMesh,
        }
    }

    fn point_lists(&self) -> &[PointList] {
        match self {
            Self::Box => &[],
            Self::CompoundConvexHull { hulls } => hulls,
            Self::SimpleHull { points } | Self::StaticMesh { points, .. } => {
                std::slice::from_ref(points)
            }
            Self::SimpleCompound { meshes, .. } => meshes,
        }
    }

    fn indices(&self) -> &[i32] {
        match self {
            Self::SimpleCompound { indices, .. } | Self::StaticMesh { indices, .. } => indices,
            _ => &[],
        }
    }
}

/// Built collision shape, ready to hand to the physics engine
#[derive(Debug, Clone)]
pub struct ShapeDescriptor {
    /// Kind-specific geometry
    pub geometry: ShapeGeometry,
    /// Size the engine builds the native shape with (see module docs)
    pub canonical_size: Vec3,
    /// Asset the geometry came from (`None` for boxes)
    pub source: Option<AssetId>,
    /// Registration offset requested by the caller, applied by the engine
    pub registration_offset: Vec3,
}

impl ShapeDescriptor {
    /// Degraded box descriptor with the given canonical (half) size
    pub fn new_box(canonical_size: Vec3) -> Self {
        Self {
            geometry: ShapeGeometry::Box,
            canonical_size,
            source: None,
            registration_offset: Vec3::zeros(),
        }
    }

    /// Kind of this descriptor
    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// Point lists in order (empty for boxes)
    pub fn point_lists(&self) -> &[PointList] {
        self.geometry.point_lists()
    }

    /// Every point of every list
    pub fn points(&self) -> impl Iterator<Item = &Vec3> {
        self.point_lists().iter().flatten()
    }

    /// Total number of points
    pub fn point_count(&self) -> usize {
        self.point_lists().iter().map(Vec::len).sum()
    }

    /// Flat index buffer (empty for hull kinds and boxes)
    pub fn indices(&self) -> &[i32] {
        self.geometry.indices()
    }

    /// Whether the engine has anything to collide with
    pub fn is_collidable(&self) -> bool {
        matches!(self.geometry, ShapeGeometry::Box) || self.point_count() > 0
    }

    /// Radius of a model-space sphere around the origin enclosing the shape
    pub fn local_bounding_radius(&self) -> f32 {
        match self.geometry {
            ShapeGeometry::Box => self.canonical_size.magnitude(),
            _ => self
                .points()
                .map(|point| point.magnitude_squared())
                .fold(0.0f32, f32::max)
                .sqrt(),
        }
    }

    /// Decode a simple-compound index buffer into sub-mesh → part → indices
    ///
    /// Returns an empty vector for every other kind.
    pub fn compound_parts(&self) -> Vec<Vec<Vec<u32>>> {
        let ShapeGeometry::SimpleCompound { indices, .. } = &self.geometry else {
            return Vec::new();
        };

        let mut meshes = Vec::new();
        let mut parts = Vec::new();
        let mut part = Vec::new();
        for &index in indices {
            match index {
                END_OF_MESH_PART => parts.push(std::mem::take(&mut part)),
                END_OF_MESH => meshes.push(std::mem::take(&mut parts)),
                // Non-negative by construction
                _ => part.push(index.unsigned_abs()),
            }
        }
        meshes
    }
}

fn hash_vec3<H: Hasher>(value: &Vec3, state: &mut H) {
    value.x.to_bits().hash(state);
    value.y.to_bits().hash(state);
    value.z.to_bits().hash(state);
}

fn vec3_bits_eq(a: &Vec3, b: &Vec3) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits())
}

// Equality and hashing compare float bit patterns so that content-identical
// descriptors share one native shape.
impl PartialEq for ShapeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
            && vec3_bits_eq(&self.canonical_size, &other.canonical_size)
            && vec3_bits_eq(&self.registration_offset, &other.registration_offset)
            && self.source == other.source
            && self.indices() == other.indices()
            && self.point_lists().len() == other.point_lists().len()
            && self
                .point_lists()
                .iter()
                .zip(other.point_lists())
                .all(|(a, b)| {
                    a.len() == b.len() && a.iter().zip(b).all(|(p, q)| vec3_bits_eq(p, q))
                })
    }
}

impl Eq for ShapeDescriptor {}

impl Hash for ShapeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        hash_vec3(&self.canonical_size, state);
        hash_vec3(&self.registration_offset, state);
        self.source.hash(state);
        self.indices().hash(state);
        self.point_lists().len().hash(state);
        for list in self.point_lists() {
            list.len().hash(state);
            for point in list {
                hash_vec3(point, state);
            }
        }
    }
}
