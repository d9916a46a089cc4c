//! Typed contact filtering
//!
//! Runs one contact test for a probe and keeps only contacts whose other
//! body is a rigid body owned by one of the requested kinds.

use super::object::{CollisionObject, ObjectId, OwnerMask};
use super::probe::CollisionProbe;
use super::world::{CollisionWorld, ContactPoint, ContactResultCallback};
use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// One accepted contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactResult {
    /// Owner of the touched body
    pub object_id: ObjectId,
    /// Contact point in the probe's local frame
    pub point_on_probe: Vec3,
    /// Contact point in the touched body's local frame
    pub point_on_object: Vec3,
}

struct FilteredContacts<'p> {
    probe: &'p CollisionObject,
    filter: OwnerMask,
    results: Vec<ContactResult>,
}

impl ContactResultCallback for FilteredContacts<'_> {
    fn add_single_result(&mut self, contact: &ContactPoint<'_>) {
        let (candidate, point_on_probe, point_on_object) =
            if std::ptr::eq(contact.object_a, self.probe) {
                (contact.object_b, contact.local_point_a, contact.local_point_b)
            } else if std::ptr::eq(contact.object_b, self.probe) {
                (contact.object_a, contact.local_point_b, contact.local_point_a)
            } else {
                log::trace!("Ignoring contact that does not involve the probe");
                return;
            };

        let Some(motion_state) = candidate.motion_state() else {
            return;
        };
        if !self.filter.contains(motion_state.owner.mask()) {
            return;
        }

        log::trace!("Contact with {:?} {}", motion_state.owner, motion_state.object_id);
        self.results.push(ContactResult {
            object_id: motion_state.object_id,
            point_on_probe,
            point_on_object,
        });
    }
}

/// Contacts between `probe` and bodies of the kinds in `filter`
///
/// Results keep the world's report order. An empty probe returns nothing
/// without consulting the world.
pub fn query(
    probe: &CollisionProbe<'_>,
    world: &dyn CollisionWorld,
    filter: OwnerMask,
) -> Vec<ContactResult> {
    if probe.is_empty() {
        return Vec::new();
    }

    let mut contacts = FilteredContacts {
        probe: probe.object(),
        filter,
        results: Vec::new(),
    };
    world.contact_test(probe.object(), &mut contacts);
    contacts.results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Isometry, Quat, Translation3};
    use crate::physics::object::MotionState;
    use crate::physics::shape::ShapeDescriptor;
    use crate::physics::shape_manager::{NativeShape, ShapeManager};
    use crate::physics::world::BoundingSphereWorld;
    use std::cell::Cell;
    use std::sync::Arc;

    fn unit_box() -> ShapeDescriptor {
        ShapeDescriptor::new_box(Vec3::new(0.5, 0.5, 0.5))
    }

    fn body(motion_state: Option<MotionState>) -> CollisionObject {
        let shape = Arc::new(NativeShape::new(Arc::new(unit_box())));
        match motion_state {
            Some(state) => CollisionObject::rigid_body(Isometry::identity(), shape, state),
            None => CollisionObject::new(Isometry::identity(), Some(shape)),
        }
    }

    /// Reports every body, alternating which side the probe is on
    struct ScriptedWorld {
        bodies: Vec<CollisionObject>,
        calls: Cell<usize>,
    }

    impl ScriptedWorld {
        fn new(bodies: Vec<CollisionObject>) -> Self {
            Self {
                bodies,
                calls: Cell::new(0),
            }
        }
    }

    impl CollisionWorld for ScriptedWorld {
        fn contact_test(&self, object: &CollisionObject, callback: &mut dyn ContactResultCallback) {
            self.calls.set(self.calls.get() + 1);
            let on_probe = Vec3::new(1.0, 0.0, 0.0);
            let on_body = Vec3::new(0.0, 1.0, 0.0);
            for (i, other) in self.bodies.iter().enumerate() {
                let contact = if i % 2 == 0 {
                    ContactPoint {
                        object_a: object,
                        object_b: other,
                        local_point_a: on_probe,
                        local_point_b: on_body,
                    }
                } else {
                    ContactPoint {
                        object_a: other,
                        object_b: object,
                        local_point_a: on_body,
                        local_point_b: on_probe,
                    }
                };
                callback.add_single_result(&contact);
            }
        }
    }

    #[test]
    fn test_filter_keeps_requested_kind_in_order() {
        let world = ScriptedWorld::new(vec![
            body(Some(MotionState::entity(ObjectId(1)))),
            body(Some(MotionState::avatar(ObjectId(2)))),
            body(None),
            body(Some(MotionState::entity(ObjectId(3)))),
        ]);
        let manager = ShapeManager::new();
        let probe = CollisionProbe::acquire(&manager, &unit_box(), Isometry::identity());

        let entities = query(&probe, &world, OwnerMask::ENTITY);
        let ids: Vec<_> = entities.iter().map(|result| result.object_id).collect();
        assert_eq!(ids, vec![ObjectId(1), ObjectId(3)]);

        // Probe side is resolved whichever slot it was reported in
        for result in &entities {
            assert_eq!(result.point_on_probe, Vec3::new(1.0, 0.0, 0.0));
            assert_eq!(result.point_on_object, Vec3::new(0.0, 1.0, 0.0));
        }

        let avatars = query(&probe, &world, OwnerMask::AVATAR);
        assert_eq!(avatars.len(), 1);
        assert_eq!(avatars[0].object_id, ObjectId(2));
        assert_eq!(avatars[0].point_on_probe, Vec3::new(1.0, 0.0, 0.0));

        let both = query(&probe, &world, OwnerMask::all());
        assert_eq!(both.len(), 3);
        assert_eq!(world.calls.get(), 3);
    }

    #[test]
    fn test_unrequested_kinds_give_no_results() {
        let world = ScriptedWorld::new(vec![
            body(Some(MotionState::avatar(ObjectId(7)))),
            body(None),
        ]);
        let manager = ShapeManager::new();
        let probe = CollisionProbe::acquire(&manager, &unit_box(), Isometry::identity());

        assert!(query(&probe, &world, OwnerMask::ENTITY).is_empty());
    }

    #[test]
    fn test_empty_probe_skips_world() {
        let world = ScriptedWorld::new(vec![body(Some(MotionState::entity(ObjectId(1))))]);
        let manager = ShapeManager::new();
        let empty = ShapeDescriptor {
            geometry: crate::physics::shape::ShapeGeometry::StaticMesh {
                points: Vec::new(),
                indices: Vec::new(),
            },
            canonical_size: Vec3::zeros(),
            source: None,
            registration_offset: Vec3::zeros(),
        };
        let probe = CollisionProbe::acquire(&manager, &empty, Isometry::identity());

        assert!(query(&probe, &world, OwnerMask::all()).is_empty());
        assert_eq!(world.calls.get(), 0);
    }

    #[test]
    fn test_bounding_sphere_world_end_to_end() {
        let manager = ShapeManager::new();
        let mut world = BoundingSphereWorld::new();
        let shape = Arc::new(NativeShape::new(Arc::new(unit_box())));
        let near = Isometry::from_parts(Translation3::new(1.0, 0.0, 0.0), Quat::identity());
        let far = Isometry::from_parts(Translation3::new(9.0, 0.0, 0.0), Quat::identity());
        world.add_body(CollisionObject::rigid_body(
            near,
            Arc::clone(&shape),
            MotionState::avatar(ObjectId(4)),
        ));
        world.add_body(CollisionObject::rigid_body(far, shape, MotionState::avatar(ObjectId(5))));

        let probe = CollisionProbe::acquire(&manager, &unit_box(), Isometry::identity());
        let results = query(&probe, &world, OwnerMask::AVATAR);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].object_id, ObjectId(4));
        assert!(query(&probe, &world, OwnerMask::ENTITY).is_empty());
    }

    #[test]
    fn test_query_panic_still_releases_probe_shape() {
        struct PanickingWorld;

        impl CollisionWorld for PanickingWorld {
            fn contact_test(
                &self,
                _object: &CollisionObject,
                _callback: &mut dyn ContactResultCallback,
            ) {
                panic!("narrow phase failure");
            }
        }

        let manager = ShapeManager::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let probe = CollisionProbe::acquire(&manager, &unit_box(), Isometry::identity());
            query(&probe, &PanickingWorld, OwnerMask::all())
        }));

        assert!(result.is_err());
        assert_eq!(manager.shape_count(), 0);
    }
}
