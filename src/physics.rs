//! Physics collaborator interface (§6 "Physics").
//!
//! The core never talks to a concrete physics engine directly — it only
//! ever sees a `PhysicsWorld`. This keeps the crate engine-agnostic while
//! still shipping one working adapter (`RapierPhysicsWorld`, behind the
//! `rapier` feature) built on `rapier3d`, grounded in
//! `slop_engine::physics` / `slop_engine::physics_integration`'s
//! `cast_ray`-based raycast helpers.

use glam::Vec3;

use crate::hit::Hit;

/// Opaque body identifier, as handed out by the host (`Player::body_id`).
pub type BodyId = u64;

/// Read-only physics collaborator consumed during `Orchestrator::update`
/// (§5: "the physics world is treated as a read-only collaborator during
/// `update` — the solver only issues raycasts").
pub trait PhysicsWorld {
    /// World-space position of a body, if it still exists.
    fn position(&self, body_id: BodyId) -> Option<Vec3>;

    /// Cast a ray from `from` to `to`, ignoring `ignore_body_id` if given.
    /// Returns `None` both when the cast misses and when the cast itself
    /// failed — callers must treat both identically (§7: "any cast that
    /// throws or returns null is treated as not blocked").
    fn raycast(&self, from: Vec3, to: Vec3, ignore_body_id: Option<BodyId>) -> Option<Hit>;

    /// Spherecast approximation: a raycast whose effective thickness is
    /// `radius`. Backends that cannot shape-cast may simply delegate to
    /// `raycast` (§4.4 step 5: "or plain ray... if raycastEx is
    /// unavailable").
    fn raycast_ex(
        &self,
        from: Vec3,
        to: Vec3,
        radius: f32,
        ignore_body_id: Option<BodyId>,
    ) -> Option<Hit> {
        let _ = radius;
        self.raycast(from, to, ignore_body_id)
    }

    /// Whether this backend implements a true shape-cast in `raycast_ex`
    /// (as opposed to the default delegation to `raycast`). The collision
    /// solver uses this to decide whether `radius` padding already happened
    /// inside the cast or still needs to be applied afterward.
    fn supports_shapecast(&self) -> bool {
        false
    }
}

#[cfg(feature = "rapier")]
pub use rapier_adapter::RapierPhysicsWorld;

#[cfg(feature = "rapier")]
mod rapier_adapter {
    use std::collections::HashMap;

    use nalgebra::{Isometry3, Point3, Vector3};
    use rapier3d::prelude::*;

    use super::{BodyId, PhysicsWorld};
    use crate::hit::Hit;
    use glam::Vec3;

    /// Concrete `PhysicsWorld` over a `rapier3d` scene. Query-only: it does
    /// not step the simulation (§5 — the solver reads the world, it never
    /// mutates it).
    pub struct RapierPhysicsWorld {
        pub bodies: RigidBodySet,
        pub colliders: ColliderSet,
        query_pipeline: QueryPipeline,
        body_ids: HashMap<BodyId, RigidBodyHandle>,
    }

    impl RapierPhysicsWorld {
        pub fn new() -> Self {
            Self {
                bodies: RigidBodySet::new(),
                colliders: ColliderSet::new(),
                query_pipeline: QueryPipeline::new(),
                body_ids: HashMap::new(),
            }
        }

        /// Register a host-facing `BodyId` for a rigid body so `position`
        /// and the `ignore_body_id` filters can find it.
        pub fn register_body(&mut self, id: BodyId, handle: RigidBodyHandle) {
            self.body_ids.insert(id, handle);
        }

        /// Refresh the query pipeline's acceleration structures. Call once
        /// after any change to `bodies`/`colliders`, before issuing casts
        /// this tick.
        pub fn update_query_pipeline(&mut self) {
            self.query_pipeline.update(&self.bodies, &self.colliders);
        }

        fn query_filter(&self, ignore_body_id: Option<BodyId>) -> QueryFilter<'_> {
            match ignore_body_id.and_then(|id| self.body_ids.get(&id)) {
                Some(handle) => QueryFilter::default().exclude_rigid_body(*handle),
                None => QueryFilter::default(),
            }
        }

        fn cast(
            &self,
            from: Vec3,
            to: Vec3,
            radius: Option<f32>,
            ignore_body_id: Option<BodyId>,
        ) -> Option<Hit> {
            let origin = Point3::new(from.x, from.y, from.z);
            let seg = to - from;
            let max_toi = seg.length();
            if max_toi <= 1e-6 {
                return None;
            }
            let dir = Vector3::new(seg.x, seg.y, seg.z) / max_toi;
            let filter = self.query_filter(ignore_body_id);

            let result = match radius {
                Some(r) if r > 0.0 => {
                    let shape = Ball::new(r);
                    let shape_pos = Isometry3::translation(from.x, from.y, from.z);
                    self.query_pipeline.cast_shape(
                        &self.bodies,
                        &self.colliders,
                        &shape_pos,
                        &dir,
                        &shape,
                        ShapeCastOptions::with_max_time_of_impact(max_toi),
                        filter,
                    )
                    .map(|(_, hit)| (hit.time_of_impact, hit.witness1, hit.normal1))
                }
                _ => {
                    let ray = Ray::new(origin, dir);
                    self.query_pipeline
                        .cast_ray_and_get_normal(&self.bodies, &self.colliders, &ray, max_toi, true, filter)
                        .map(|(_, intersection)| {
                            (intersection.time_of_impact, intersection.point, intersection.normal)
                        })
                }
            };

            result.map(|(toi, point, normal)| {
                Hit::new(
                    Some(Vec3::new(point.x, point.y, point.z)),
                    Some(Vec3::new(normal.x, normal.y, normal.z)),
                    Some((toi / max_toi).clamp(0.0, 1.0)),
                )
            })
        }
    }

    impl Default for RapierPhysicsWorld {
        fn default() -> Self {
            Self::new()
        }
    }

    impl PhysicsWorld for RapierPhysicsWorld {
        fn position(&self, body_id: BodyId) -> Option<Vec3> {
            let handle = *self.body_ids.get(&body_id)?;
            let body = self.bodies.get(handle)?;
            let t = body.translation();
            Some(Vec3::new(t.x, t.y, t.z))
        }

        fn raycast(&self, from: Vec3, to: Vec3, ignore_body_id: Option<BodyId>) -> Option<Hit> {
            self.cast(from, to, None, ignore_body_id)
        }

        fn raycast_ex(
            &self,
            from: Vec3,
            to: Vec3,
            radius: f32,
            ignore_body_id: Option<BodyId>,
        ) -> Option<Hit> {
            self.cast(from, to, Some(radius), ignore_body_id)
        }

        fn supports_shapecast(&self) -> bool {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A trivial fixed-plane world used to exercise the trait's default
    /// `raycast_ex` delegation without pulling rapier into unit tests.
    struct PlaneWorld {
        plane_z: f32,
    }

    impl PhysicsWorld for PlaneWorld {
        fn position(&self, _body_id: BodyId) -> Option<Vec3> {
            Some(Vec3::ZERO)
        }

        fn raycast(&self, from: Vec3, to: Vec3, _ignore: Option<BodyId>) -> Option<Hit> {
            // Plane at z = plane_z, normal +Z, only blocks rays crossing it.
            if (from.z > self.plane_z) == (to.z > self.plane_z) {
                return None;
            }
            let t = (self.plane_z - from.z) / (to.z - from.z);
            let point = from + (to - from) * t;
            Some(Hit::new(Some(point), Some(Vec3::Z), Some(t)))
        }
    }

    #[test]
    fn default_raycast_ex_delegates_to_raycast() {
        let world = PlaneWorld { plane_z: -2.0 };
        let hit = world.raycast_ex(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0), 0.2, None);
        assert!(hit.is_some());
        assert!(!world.supports_shapecast());
    }

    #[test]
    fn miss_returns_none() {
        let world = PlaneWorld { plane_z: -2.0 };
        let hit = world.raycast(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0), None);
        assert!(hit.is_none());
    }
}
