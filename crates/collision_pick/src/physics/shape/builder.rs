//! Mesh asset → shape descriptor conversion
//!
//! Turns an already-parsed [`MeshAsset`] into a [`ShapeDescriptor`] for one of
//! the mesh-based shape kinds. All work is pure and synchronous; the size
//! guards keep the per-query cost bounded for pathological models.

use super::{
    PointList, RequestedShape, ShapeDescriptor, ShapeGeometry, END_OF_MESH, END_OF_MESH_PART,
};
use crate::assets::{MeshAsset, SubMesh};
use crate::config::{PickConfig, ShapeLimits};
use crate::foundation::extents::Extents;
use crate::foundation::math::{guarded_scale, Vec3};
use std::collections::{BTreeSet, HashSet};

const TRIANGLE_STRIDE: usize = 3;
const QUAD_STRIDE: usize = 4;

/// Point set preserving first-insertion order
///
/// Membership is exact value equality; `-0.0` and `0.0` are the same point.
#[derive(Default)]
struct HullPoints {
    points: PointList,
    seen: HashSet<[u32; 3]>,
}

impl HullPoints {
    fn key(point: &Vec3) -> [u32; 3] {
        // Adding +0.0 folds -0.0 onto +0.0
        [
            (point.x + 0.0).to_bits(),
            (point.y + 0.0).to_bits(),
            (point.z + 0.0).to_bits(),
        ]
    }

    fn insert(&mut self, point: Vec3) {
        if self.seen.insert(Self::key(&point)) {
            self.points.push(point);
        }
    }

    fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn into_points(self) -> PointList {
        self.points
    }
}

/// Vertex-copying kinds share one construction pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VertexShape {
    SimpleHull,
    SimpleCompound,
    StaticMesh,
}

/// Builds shape descriptors from mesh assets
#[derive(Debug, Clone, Default)]
pub struct ShapeBuilder {
    limits: ShapeLimits,
}

impl ShapeBuilder {
    /// Create a builder with explicit limits
    pub fn new(limits: ShapeLimits) -> Self {
        Self { limits }
    }

    /// Create a builder from the pick configuration
    pub fn from_config(config: &PickConfig) -> Self {
        Self::new(config.limits.clone())
    }

    /// Limits in effect
    pub fn limits(&self) -> &ShapeLimits {
        &self.limits
    }

    /// Build a descriptor for `requested` scaled to `dimensions`
    ///
    /// Models over the vertex or sub-mesh ceiling degrade to a box of half
    /// `dimensions`. An empty model yields a descriptor with no points.
    pub fn build(
        &self,
        mesh: &MeshAsset,
        requested: RequestedShape,
        dimensions: Vec3,
        registration_offset: Vec3,
    ) -> ShapeDescriptor {
        let mut descriptor = if self.exceeds_limits(mesh) {
            ShapeDescriptor::new_box(dimensions * 0.5)
        } else {
            match requested {
                RequestedShape::CompoundConvexHull => self.build_convex_hulls(mesh, dimensions),
                RequestedShape::SimpleHull => {
                    self.build_from_vertices(mesh, VertexShape::SimpleHull, dimensions)
                }
                RequestedShape::SimpleCompound => {
                    self.build_from_vertices(mesh, VertexShape::SimpleCompound, dimensions)
                }
                RequestedShape::StaticMesh => {
                    self.build_from_vertices(mesh, VertexShape::StaticMesh, dimensions)
                }
            }
        };
        descriptor.registration_offset = registration_offset;
        descriptor
    }

    fn exceeds_limits(&self, mesh: &MeshAsset) -> bool {
        let vertex_count = mesh.vertex_count();
        if vertex_count > self.limits.max_vertices {
            log::warn!(
                "Model {} has too many vertices ({} > {}) and will collide as a box",
                mesh.id(),
                vertex_count,
                self.limits.max_vertices
            );
            return true;
        }

        let mesh_count = mesh.meshes().len();
        if mesh_count > self.limits.max_meshes {
            log::warn!(
                "Model {} has too many meshes ({} > {}) and will collide as a box",
                mesh.id(),
                mesh_count,
                self.limits.max_meshes
            );
            return true;
        }

        false
    }

    /// One hull per mesh part, rescaled against the asset's unscaled extents
    fn build_convex_hulls(&self, asset: &MeshAsset, dimensions: Vec3) -> ShapeDescriptor {
        let mut hulls: Vec<PointList> = Vec::new();

        for (mesh_index, mesh) in asset.meshes().iter().enumerate() {
            for (part_index, part) in mesh.parts.iter().enumerate() {
                let faces = part
                    .triangle_indices
                    .chunks_exact(TRIANGLE_STRIDE)
                    .chain(part.quad_indices.chunks_exact(QUAD_STRIDE));

                let mut hull = HullPoints::default();
                for &index in faces.flatten() {
                    if let Some(vertex) = mesh.vertices.get(index as usize) {
                        hull.insert(*vertex);
                    }
                }

                if hull.is_empty() {
                    log::debug!(
                        "Model {} mesh {} part {} has no faces, dropping its hull",
                        asset.id(),
                        mesh_index,
                        part_index
                    );
                    continue;
                }
                hulls.push(hull.into_points());
            }
        }

        // The collision model shares the visual model's units, so it is fitted
        // against the unscaled extents rather than its own. Flat axes keep
        // their model-space size.
        let scale = guarded_scale(
            &dimensions,
            &asset.unscaled_extents_size(),
            self.limits.extent_epsilon,
        );
        for point in hulls.iter_mut().flatten() {
            *point = point.component_mul(&scale);
        }

        ShapeDescriptor {
            geometry: ShapeGeometry::CompoundConvexHull { hulls },
            canonical_size: dimensions,
            source: Some(asset.id().clone()),
            registration_offset: Vec3::zeros(),
        }
    }

    fn build_from_vertices(
        &self,
        asset: &MeshAsset,
        shape: VertexShape,
        dimensions: Vec3,
    ) -> ShapeDescriptor {
        let mut lists: Vec<PointList> = match shape {
            VertexShape::SimpleCompound => Vec::with_capacity(asset.meshes().len()),
            _ => vec![PointList::new()],
        };
        let mut indices: Vec<i32> = Vec::new();
        let mut extents = Extents::empty();

        for mesh in asset.meshes() {
            if mesh.vertices.is_empty() {
                continue;
            }
            if shape == VertexShape::SimpleCompound {
                lists.push(PointList::with_capacity(mesh.vertices.len()));
            }
            let Some(points) = lists.last_mut() else {
                continue;
            };

            let base = points.len();
            points.reserve(mesh.vertices.len());
            for vertex in &mesh.vertices {
                points.push(*vertex);
                extents.add_point(vertex);
            }

            match shape {
                VertexShape::StaticMesh => append_triangles(mesh, base, &mut indices),
                VertexShape::SimpleCompound => append_compound_parts(mesh, &mut indices),
                VertexShape::SimpleHull => {}
            }
        }

        let scale = guarded_scale(&dimensions, &extents.size(), self.limits.extent_epsilon);
        for point in lists.iter_mut().flatten() {
            *point = point.component_mul(&scale);
        }

        let geometry = match shape {
            VertexShape::SimpleHull => ShapeGeometry::SimpleHull {
                points: lists.pop().unwrap_or_default(),
            },
            VertexShape::StaticMesh => ShapeGeometry::StaticMesh {
                points: lists.pop().unwrap_or_default(),
                indices,
            },
            VertexShape::SimpleCompound => ShapeGeometry::SimpleCompound {
                meshes: lists,
                indices,
            },
        };

        ShapeDescriptor {
            geometry,
            canonical_size: dimensions * 0.5,
            source: Some(asset.id().clone()),
            registration_offset: Vec3::zeros(),
        }
    }
}

/// Append every complete triangle of `mesh`, rebased onto the shared list
///
/// Triangles referencing a missing vertex are skipped whole.
fn append_triangles(mesh: &SubMesh, base: usize, indices: &mut Vec<i32>) {
    let vertex_count = mesh.vertices.len();
    for part in &mesh.parts {
        indices.reserve(part.triangle_indices.len());
        for triangle in part.triangle_indices.chunks_exact(TRIANGLE_STRIDE) {
            let rebased: Option<Vec<i32>> = triangle
                .iter()
                .map(|&index| {
                    let index = index as usize;
                    if index < vertex_count {
                        i32::try_from(base + index).ok()
                    } else {
                        None
                    }
                })
                .collect();
            if let Some(rebased) = rebased {
                indices.extend(rebased);
            }
        }
    }
}

/// Append each part's unique ascending indices and the sentinels
fn append_compound_parts(mesh: &SubMesh, indices: &mut Vec<i32>) {
    let vertex_count = mesh.vertices.len();
    for part in &mesh.parts {
        let unique: BTreeSet<u32> = part
            .triangle_indices
            .chunks_exact(TRIANGLE_STRIDE)
            .flatten()
            .copied()
            .filter(|&index| (index as usize) < vertex_count)
            .collect();
        if unique.is_empty() {
            continue;
        }

        indices.extend(unique.into_iter().filter_map(|index| i32::try_from(index).ok()));
        indices.push(END_OF_MESH_PART);
    }
    indices.push(END_OF_MESH);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetId, MeshPart};
    use crate::physics::shape::ShapeKind;
    use approx::assert_relative_eq;

    /// Axis-aligned cube from (-1,-1,-1) to (1,1,1)
    fn cube_vertices() -> Vec<Vec3> {
        let mut vertices = Vec::new();
        for &x in &[-1.0, 1.0] {
            for &y in &[-1.0, 1.0] {
                for &z in &[-1.0, 1.0] {
                    vertices.push(Vec3::new(x, y, z));
                }
            }
        }
        vertices
    }

    fn cube_triangles() -> Vec<u32> {
        vec![
            0, 1, 3, 0, 3, 2, // -x
            4, 6, 7, 4, 7, 5, // +x
            0, 4, 5, 0, 5, 1, // -y
            2, 3, 7, 2, 7, 6, // +y
            0, 2, 6, 0, 6, 4, // -z
            1, 5, 7, 1, 7, 3, // +z
        ]
    }

    fn cube_asset() -> MeshAsset {
        MeshAsset::new(
            AssetId::new("test://cube"),
            vec![SubMesh::new(cube_vertices(), vec![MeshPart::triangles(cube_triangles())])],
        )
    }

    /// Two sub-meshes, the first with two parts and a malformed tail
    fn two_mesh_asset() -> MeshAsset {
        let quad = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 1.0),
        ];
        MeshAsset::new(
            AssetId::new("test://two"),
            vec![
                SubMesh::new(
                    quad.clone(),
                    vec![
                        MeshPart::triangles(vec![0, 1, 2, 2, 1, 0, 3, 3]),
                        MeshPart::triangles(vec![0, 2, 3]),
                    ],
                ),
                SubMesh::new(quad, vec![MeshPart::triangles(vec![1, 2, 3])]),
            ],
        )
    }

    fn dims() -> Vec3 {
        Vec3::new(4.0, 2.0, 1.0)
    }

    fn build_default(asset: &MeshAsset, requested: RequestedShape) -> ShapeDescriptor {
        ShapeBuilder::default().build(asset, requested, dims(), Vec3::zeros())
    }

    #[test]
    fn test_static_mesh_keeps_every_vertex() {
        let asset = two_mesh_asset();
        let shape = build_default(&asset, RequestedShape::StaticMesh);

        assert_eq!(shape.kind(), ShapeKind::StaticMesh);
        assert_eq!(shape.point_lists().len(), 1);
        assert_eq!(shape.point_count(), asset.vertex_count());
        assert_eq!(shape.indices().len() % 3, 0);
        assert!(shape.indices().iter().all(|&index| index >= 0));
    }

    #[test]
    fn test_static_mesh_rebases_second_mesh_indices() {
        let shape = ShapeBuilder::default().build(
            &two_mesh_asset(),
            RequestedShape::StaticMesh,
            dims(),
            Vec3::zeros(),
        );

        // Mesh 0: two triangles from part 0 (tail dropped), one from part 1.
        // Mesh 1: one triangle offset by four vertices.
        assert_eq!(shape.indices(), &[0, 1, 2, 2, 1, 0, 0, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn test_static_mesh_skips_out_of_range_triangle() {
        let asset = MeshAsset::new(
            AssetId::new("test://bad"),
            vec![SubMesh::new(
                cube_vertices(),
                vec![MeshPart::triangles(vec![0, 1, 2, 0, 1, 99])],
            )],
        );
        let shape = build_default(&asset, RequestedShape::StaticMesh);
        assert_eq!(shape.indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_simple_compound_sentinels() {
        let shape = ShapeBuilder::default().build(
            &two_mesh_asset(),
            RequestedShape::SimpleCompound,
            dims(),
            Vec3::zeros(),
        );

        assert_eq!(shape.kind(), ShapeKind::SimpleCompound);
        assert_eq!(shape.point_lists().len(), 2);
        assert_eq!(
            shape.indices(),
            &[
                0, 1, 2, END_OF_MESH_PART, 0, 2, 3, END_OF_MESH_PART, END_OF_MESH,
                1, 2, 3, END_OF_MESH_PART, END_OF_MESH,
            ]
        );

        let mesh_terminators = shape.indices().iter().filter(|&&i| i == END_OF_MESH).count();
        let part_terminators = shape.indices().iter().filter(|&&i| i == END_OF_MESH_PART).count();
        assert_eq!(mesh_terminators, 2);
        assert_eq!(part_terminators, 3);
    }

    #[test]
    fn test_simple_compound_parts_are_unique_and_ascending() {
        let shape = build_default(&cube_asset(), RequestedShape::SimpleCompound);

        for mesh in shape.compound_parts() {
            for part in mesh {
                assert!(part.windows(2).all(|pair| pair[0] < pair[1]));
            }
        }
        assert_eq!(shape.compound_parts(), vec![vec![(0..8).collect::<Vec<u32>>()]]);
    }

    #[test]
    fn test_simple_compound_degenerate_part_emits_no_terminator() {
        let asset = MeshAsset::new(
            AssetId::new("test://degenerate"),
            vec![SubMesh::new(
                cube_vertices(),
                vec![MeshPart::triangles(vec![0, 1]), MeshPart::triangles(vec![4, 5, 6])],
            )],
        );
        let shape = build_default(&asset, RequestedShape::SimpleCompound);
        assert_eq!(shape.indices(), &[4, 5, 6, END_OF_MESH_PART, END_OF_MESH]);
    }

    #[test]
    fn test_compound_hull_deduplicates_and_drops_tails() {
        let asset = MeshAsset::new(
            AssetId::new("test://hulls"),
            vec![SubMesh::new(
                cube_vertices(),
                vec![
                    // Two triangles sharing an edge plus a dangling index
                    MeshPart::triangles(vec![0, 1, 3, 0, 3, 2, 7]),
                    // No complete face at all
                    MeshPart::triangles(vec![5, 6]),
                    // One quad plus three dangling indices
                    MeshPart::quads(vec![4, 5, 7, 6, 0, 1, 2]),
                ],
            )],
        );
        let shape = ShapeBuilder::default().build(
            &asset,
            RequestedShape::CompoundConvexHull,
            Vec3::new(2.0, 2.0, 2.0),
            Vec3::zeros(),
        );

        let hulls = shape.point_lists();
        assert_eq!(hulls.len(), 2);
        let vertices = cube_vertices();
        assert_eq!(hulls[0], vec![vertices[0], vertices[1], vertices[3], vertices[2]]);
        assert_eq!(hulls[1], vec![vertices[4], vertices[5], vertices[7], vertices[6]]);
        assert!(hulls.iter().all(|hull| !hull.is_empty()));
    }

    #[test]
    fn test_compound_hull_treats_signed_zero_as_equal() {
        let asset = MeshAsset::new(
            AssetId::new("test://zero"),
            vec![SubMesh::new(
                vec![
                    Vec3::new(0.0, 1.0, 1.0),
                    Vec3::new(-0.0, 1.0, 1.0),
                    Vec3::new(1.0, 0.0, 0.0),
                ],
                vec![MeshPart::triangles(vec![0, 1, 2])],
            )],
        );
        let shape = ShapeBuilder::default().build(
            &asset,
            RequestedShape::CompoundConvexHull,
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::zeros(),
        );
        assert_eq!(shape.point_count(), 2);
    }

    #[test]
    fn test_compound_hull_scales_against_unscaled_extents() {
        let shape = build_default(&cube_asset(), RequestedShape::CompoundConvexHull);

        // Cube is 2 units on each axis
        let scale = Vec3::new(2.0, 1.0, 0.5);
        let expected: Vec<Vec3> = cube_vertices().iter().map(|v| v.component_mul(&scale)).collect();
        for point in shape.points() {
            assert!(expected.contains(point));
        }
        assert_eq!(shape.point_count(), 8);
    }

    #[test]
    fn test_canonical_size_asymmetry() {
        let builder = ShapeBuilder::default();
        let asset = cube_asset();

        let hulls = builder.build(
            &asset,
            RequestedShape::CompoundConvexHull,
            dims(),
            Vec3::zeros(),
        );
        assert_eq!(hulls.canonical_size, dims());

        for requested in [
            RequestedShape::SimpleHull,
            RequestedShape::SimpleCompound,
            RequestedShape::StaticMesh,
        ] {
            let shape = builder.build(&asset, requested, dims(), Vec3::zeros());
            assert_eq!(shape.canonical_size, dims() * 0.5);
        }
    }

    #[test]
    fn test_simple_hull_rescales_to_dimensions() {
        let shape = build_default(&cube_asset(), RequestedShape::SimpleHull);

        let extents = Extents::from_points(shape.points());
        assert_relative_eq!(extents.size(), dims(), epsilon = 1e-6);
        assert_eq!(shape.source, Some(AssetId::new("test://cube")));
    }

    #[test]
    fn test_rebuild_is_bit_identical() {
        let builder = ShapeBuilder::default();
        let asset = two_mesh_asset();
        for requested in [
            RequestedShape::CompoundConvexHull,
            RequestedShape::SimpleHull,
            RequestedShape::SimpleCompound,
            RequestedShape::StaticMesh,
        ] {
            let first = builder.build(&asset, requested, dims(), Vec3::zeros());
            let second = builder.build(&asset, requested, dims(), Vec3::zeros());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_flat_axis_keeps_unit_scale() {
        let flat = vec![
            Vec3::new(0.0, 0.0, 0.5),
            Vec3::new(2.0, 0.0, 0.5),
            Vec3::new(2.0, 4.0, 0.5),
        ];
        let asset = MeshAsset::new(
            AssetId::new("test://flat"),
            vec![SubMesh::new(flat, vec![MeshPart::triangles(vec![0, 1, 2])])],
        );

        for requested in [
            RequestedShape::CompoundConvexHull,
            RequestedShape::SimpleHull,
            RequestedShape::SimpleCompound,
            RequestedShape::StaticMesh,
        ] {
            let shape = ShapeBuilder::default().build(
                &asset,
                requested,
                Vec3::new(1.0, 1.0, 3.0),
                Vec3::zeros(),
            );
            assert!(shape.points().all(|p| p.iter().all(|c| c.is_finite())));
            // z untouched, x scaled by 1/2, y by 1/4
            assert_eq!(shape.point_lists()[0][2], Vec3::new(1.0, 1.0, 0.5));
        }
    }

    /// Two triangles with an empty sub-mesh between them
    fn gap_asset() -> MeshAsset {
        let triangle = || {
            SubMesh::new(
                vec![
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::new(0.0, 1.0, 1.0),
                ],
                vec![MeshPart::triangles(vec![0, 1, 2])],
            )
        };
        MeshAsset::new(
            AssetId::new("test://gap"),
            vec![triangle(), SubMesh::default(), triangle()],
        )
    }

    #[test]
    fn test_static_mesh_rebasing_skips_empty_mesh() {
        let shape = build_default(&gap_asset(), RequestedShape::StaticMesh);

        assert_eq!(shape.point_count(), 6);
        assert_eq!(shape.indices(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_simple_compound_empty_mesh_has_no_list_or_terminator() {
        let shape = build_default(&gap_asset(), RequestedShape::SimpleCompound);

        assert_eq!(shape.point_lists().len(), 2);
        assert_eq!(
            shape.indices(),
            &[0, 1, 2, END_OF_MESH_PART, END_OF_MESH, 0, 1, 2, END_OF_MESH_PART, END_OF_MESH]
        );
        assert_eq!(shape.compound_parts(), vec![vec![vec![0, 1, 2]], vec![vec![0, 1, 2]]]);
    }

    #[test]
    fn test_flat_compound_hull_keeps_finite_radius() {
        let asset = MeshAsset::new(
            AssetId::new("test://flat_hull"),
            vec![SubMesh::new(
                vec![
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::new(0.0, 1.0, 0.0),
                ],
                vec![MeshPart::triangles(vec![0, 1, 2])],
            )],
        );
        let shape = ShapeBuilder::default().build(
            &asset,
            RequestedShape::CompoundConvexHull,
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::zeros(),
        );

        assert!(shape.points().all(|p| p.iter().all(|c| c.is_finite())));
        assert_eq!(shape.point_lists()[0][1], Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(shape.local_bounding_radius(), 1.0);
    }

    #[test]
    fn test_vertex_ceiling_degrades_to_box() {
        let vertices = vec![Vec3::new(1.0, 2.0, 3.0); ShapeLimits::MAX_VERTICES + 1];
        let asset = MeshAsset::new(
            AssetId::new("test://huge"),
            vec![SubMesh::new(vertices, vec![MeshPart::triangles(vec![0, 1, 2])])],
        );

        for requested in [RequestedShape::CompoundConvexHull, RequestedShape::StaticMesh] {
            let shape = ShapeBuilder::default().build(&asset, requested, dims(), Vec3::zeros());
            assert_eq!(shape.kind(), ShapeKind::Box);
            assert_eq!(shape.canonical_size, dims() * 0.5);
            assert_eq!(shape.point_count(), 0);
        }
    }

    #[test]
    fn test_mesh_ceiling_degrades_to_box() {
        let builder = ShapeBuilder::new(ShapeLimits {
            max_meshes: 2,
            ..Default::default()
        });
        let asset = MeshAsset::new(
            AssetId::new("test://many"),
            vec![SubMesh::new(cube_vertices(), vec![]); 3],
        );

        let shape = builder.build(&asset, RequestedShape::SimpleCompound, dims(), Vec3::zeros());
        assert_eq!(shape.kind(), ShapeKind::Box);
        assert_eq!(shape.canonical_size, dims() * 0.5);
        assert_eq!(shape.source, None);
    }

    #[test]
    fn test_empty_asset_builds_empty_shape() {
        let empty = MeshAsset::new(
            AssetId::new("test://empty"),
            vec![SubMesh::default(), SubMesh::default()],
        );
        let builder = ShapeBuilder::default();

        for requested in [
            RequestedShape::CompoundConvexHull,
            RequestedShape::SimpleHull,
            RequestedShape::SimpleCompound,
            RequestedShape::StaticMesh,
        ] {
            let shape = builder.build(&empty, requested, dims(), Vec3::zeros());
            assert_eq!(shape.kind(), requested.kind());
            assert_eq!(shape.point_count(), 0);
            assert!(!shape.is_collidable());
        }
    }

    #[test]
    fn test_registration_offset_is_recorded() {
        let offset = Vec3::new(-0.5, -0.5, -0.5);
        let shape = ShapeBuilder::default().build(
            &cube_asset(),
            RequestedShape::SimpleHull,
            dims(),
            offset,
        );
        assert_eq!(shape.registration_offset, offset);
    }
}
