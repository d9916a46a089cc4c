//! Collision pick demo
//!
//! Registers a procedural model, scatters entity and avatar bodies around the
//! origin and polls one pick per shape kind until the model has loaded.
//!
//! Usage: `pick_demo [config.toml|config.ron]`

use collision_pick::foundation::logging;
use collision_pick::prelude::*;
use rand::Rng;

const BODY_COUNT: u64 = 24;
const SCATTER_RADIUS: f32 = 6.0;
const MAX_FRAMES: usize = 4;

/// Two stacked boxes as separate sub-meshes, the lower one with a
/// truncated index list as real exporters sometimes produce
fn stacked_boxes() -> MeshAsset {
    fn box_mesh(min: Vec3, max: Vec3, trailing: &[u32]) -> SubMesh {
        let mut vertices = Vec::with_capacity(8);
        for &x in &[min.x, max.x] {
            for &y in &[min.y, max.y] {
                for &z in &[min.z, max.z] {
                    vertices.push(Vec3::new(x, y, z));
                }
            }
        }
        let mut triangles = vec![
            0, 1, 3, 0, 3, 2, 4, 6, 7, 4, 7, 5, 0, 4, 5, 0, 5, 1, 2, 3, 7, 2, 7, 6, 0, 2, 6, 0, 6,
            4, 1, 5, 7, 1, 7, 3,
        ];
        triangles.extend_from_slice(trailing);
        SubMesh::new(vertices, vec![MeshPart::triangles(triangles)])
    }

    MeshAsset::new(
        AssetId::new("demo://stacked_boxes"),
        vec![
            box_mesh(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 1.0, 1.0), &[0, 1]),
            box_mesh(Vec3::new(-0.5, 1.0, -0.5), Vec3::new(0.5, 2.0, 0.5), &[]),
        ],
    )
}

fn load_config() -> Result<PickConfig, ConfigError> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading pick configuration from {}", path);
            PickConfig::load_from_file(&path)?
        }
        None => PickConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(log::LevelFilter::Info);

    log::info!("Starting collision pick demo");
    let config = load_config()?;

    let library = MeshLibrary::new();
    let model = library.insert(stacked_boxes());
    let shapes = ShapeManager::new();
    let builder = ShapeBuilder::from_config(&config);

    // Bodies share one box shape; the handle is held for the world's lifetime
    let body_handle = shapes
        .acquire(&ShapeDescriptor::new_box(Vec3::new(0.5, 0.5, 0.5)))
        .ok_or("body shape is not collidable")?;
    let body_shape = shapes.shape(body_handle).ok_or("body shape vanished")?;

    let mut rng = rand::thread_rng();
    let mut world = BoundingSphereWorld::new();
    for id in 0..BODY_COUNT {
        let position = Vec3::new(
            rng.gen_range(-SCATTER_RADIUS..SCATTER_RADIUS),
            rng.gen_range(-SCATTER_RADIUS..SCATTER_RADIUS),
            rng.gen_range(-SCATTER_RADIUS..SCATTER_RADIUS),
        );
        let motion_state = if rng.gen_bool(0.5) {
            MotionState::entity(ObjectId(id))
        } else {
            MotionState::avatar(ObjectId(id))
        };
        let transform = Transform::from_position(position).to_isometry();
        let shape = std::sync::Arc::clone(&body_shape);
        world.add_body(CollisionObject::rigid_body(transform, shape, motion_state));
    }
    log::info!("Scattered {} bodies", world.len());

    let ctx = PickContext {
        assets: &library,
        shapes: &shapes,
        world: &world,
        builder: &builder,
    };

    let kinds = [
        RequestedShape::CompoundConvexHull,
        RequestedShape::SimpleHull,
        RequestedShape::SimpleCompound,
        RequestedShape::StaticMesh,
    ];
    let mut picks: Vec<CollisionPick> = kinds
        .iter()
        .map(|&kind| {
            let transform = Transform::identity().with_scale(Vec3::new(4.0, 4.0, 4.0));
            CollisionPick::new(CollisionRegion::new(model.clone(), kind, transform))
        })
        .collect();

    for frame in 0..MAX_FRAMES {
        for pick in &mut picks {
            let kind = pick.region().shape;
            match pick.pick(&ctx) {
                CollisionPickResult::NotReady => {
                    log::info!("Frame {}: {:?} pick not ready", frame, kind);
                }
                result => {
                    log::info!(
                        "Frame {}: {:?} pick\n{}",
                        frame,
                        kind,
                        ron::ser::to_string_pretty(&result, Default::default())?
                    );
                }
            }
        }

        // The loader finishes between frames
        let resolved = library.resolve_pending();
        if resolved > 0 {
            log::info!("Loader resolved {} model(s)", resolved);
        }
    }

    drop(world);
    shapes.release(body_handle)?;
    log::info!("Demo finished with {} live shape(s)", shapes.shape_count());
    Ok(())
}
