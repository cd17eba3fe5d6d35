//! Rapier-backed rigid-body world for the trampoline scene.
//!
//! The world owns a handful of static colliders and one dynamic character.
//! Forces queued with [`PhysicsWorld::apply_force`] are consumed by the next
//! [`PhysicsWorld::step`] and cleared afterwards; impulses change velocity
//! immediately.
//!
//! After [`PhysicsWorld::teardown`] every mutating call returns
//! [`PhysicsError::TornDown`].

use bevy::math::{Quat, Vec3};
use log::{debug, info, warn};
use rapier3d::na::{Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::*;

use super::body::{BodyDesc, BodyShape};
use super::contact::ContactMaterials;
use super::ForceSink;
use crate::config::PhysicsConfig;
use crate::error::{BodyConfigError, PhysicsError};

/// Number of points sampled on each rim when a cylinder tapers.
const TAPERED_RIM_POINTS: usize = 24;

/// Stable identifier of a body inside one [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(RigidBodyHandle);

impl BodyId {
    pub(crate) fn handle(self) -> RigidBodyHandle {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn placeholder() -> Self {
        BodyId(RigidBodyHandle::invalid())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Snapshot of one body after the latest step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec3,
    pub rotation: Quat,
    pub linear_velocity: Vec3,
    pub dynamic: bool,
}

type VelocityCallback = Box<dyn FnMut(Vec3) + Send + Sync>;

struct VelocityObserver {
    id: ObserverId,
    body: BodyId,
    callback: VelocityCallback,
}

/// Rapier structures that live until teardown.
struct RapierSets {
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl RapierSets {
    fn new() -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }
}

pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    max_step: f32,
    /// `None` once the world has been torn down.
    sets: Option<RapierSets>,
    materials: ContactMaterials,
    observers: Vec<VelocityObserver>,
    next_observer: u64,
    steps: u64,
}

impl PhysicsWorld {
    pub fn new(config: &PhysicsConfig) -> Result<Self, PhysicsError> {
        config.validate()?;

        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.num_solver_iterations = config
            .solver_iterations
            .try_into()
            .map_err(|_| crate::error::ConfigError::ZeroSolverIterations)?;
        integration_parameters.normalized_allowed_linear_error = config.tolerance;

        Ok(Self {
            gravity: to_vector(config.gravity),
            integration_parameters,
            max_step: config.max_step,
            sets: Some(RapierSets::new()),
            materials: ContactMaterials::new(config.default_material),
            observers: Vec::new(),
            next_observer: 0,
            steps: 0,
        })
    }

    pub fn is_torn_down(&self) -> bool {
        self.sets.is_none()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn body_count(&self) -> usize {
        self.sets.as_ref().map_or(0, |sets| sets.bodies.len())
    }

    fn sets(&self) -> Result<&RapierSets, PhysicsError> {
        self.sets.as_ref().ok_or(PhysicsError::TornDown)
    }

    fn sets_mut(&mut self) -> Result<&mut RapierSets, PhysicsError> {
        self.sets.as_mut().ok_or(PhysicsError::TornDown)
    }

    /// Validates `desc` and inserts it as a rigid body with one attached collider.
    pub fn add_body(&mut self, desc: &BodyDesc) -> Result<BodyId, PhysicsError> {
        desc.validate()?;
        let collider = collider_from_desc(desc)?;
        let sets = self.sets.as_mut().ok_or(PhysicsError::TornDown)?;

        let pose = Isometry::from_parts(
            Translation3::from(to_vector(desc.position)),
            to_rotation(desc.rotation),
        );
        let body = if desc.is_static() {
            RigidBodyBuilder::fixed().pose(pose).build()
        } else {
            RigidBodyBuilder::dynamic().pose(pose).ccd_enabled(true).build()
        };

        let handle = sets.bodies.insert(body);
        let collider_handle = sets
            .colliders
            .insert_with_parent(collider, handle, &mut sets.bodies);
        if let Some(material) = desc.material {
            self.materials.insert(collider_handle, material);
        }

        debug!(
            "Added {} body '{}' at {:?}",
            if desc.is_static() { "static" } else { "dynamic" },
            desc.label,
            desc.position
        );
        Ok(BodyId(handle))
    }

    /// Destroys a body. Later forces and impulses addressed to it are ignored.
    pub fn remove_body(&mut self, id: BodyId) -> Result<bool, PhysicsError> {
        let sets = self.sets.as_mut().ok_or(PhysicsError::TornDown)?;
        let Some(body) = sets.bodies.get(id.handle()) else {
            return Ok(false);
        };
        for collider in body.colliders().to_vec() {
            self.materials.forget(collider);
        }
        sets.bodies.remove(
            id.handle(),
            &mut sets.islands,
            &mut sets.colliders,
            &mut sets.impulse_joints,
            &mut sets.multibody_joints,
            true,
        );
        self.observers.retain(|observer| observer.body != id);
        Ok(true)
    }

    /// Advances the world by `dt` seconds and returns the duration actually integrated.
    ///
    /// Frames longer than the configured maximum are clamped. Queued forces are
    /// cleared and velocity observers notified once the step completes.
    pub fn step(&mut self, dt: f32) -> Result<f32, PhysicsError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(PhysicsError::InvalidTimestep(dt));
        }
        let sets = self.sets.as_mut().ok_or(PhysicsError::TornDown)?;

        let dt = dt.min(self.max_step);
        self.integration_parameters.dt = dt;
        sets.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut sets.islands,
            &mut sets.broad_phase,
            &mut sets.narrow_phase,
            &mut sets.bodies,
            &mut sets.colliders,
            &mut sets.impulse_joints,
            &mut sets.multibody_joints,
            &mut sets.ccd_solver,
            &self.materials,
            &(),
        );

        for (_, body) in sets.bodies.iter_mut() {
            if body.is_dynamic() {
                body.reset_forces(false);
            }
        }
        self.steps += 1;

        for observer in self.observers.iter_mut() {
            if let Some(body) = sets.bodies.get(observer.body.handle()) {
                (observer.callback)(from_vector(body.linvel()));
            }
        }
        Ok(dt)
    }

    /// Queues a continuous force for the next step, applied at `local_point`
    /// (body space). Static and destroyed bodies ignore it, and non-finite
    /// input is dropped.
    pub fn apply_force(
        &mut self,
        id: BodyId,
        force: Vec3,
        local_point: Vec3,
    ) -> Result<(), PhysicsError> {
        let sets = self.sets_mut()?;
        if !force.is_finite() || !local_point.is_finite() {
            warn!("Dropping non-finite force {force:?} at {local_point:?} on body {id:?}");
            return Ok(());
        }
        let Some(body) = sets.bodies.get_mut(id.handle()) else {
            debug!("Ignoring force on destroyed body {id:?}");
            return Ok(());
        };
        if !body.is_dynamic() {
            debug!("Ignoring force on static body {id:?}");
            return Ok(());
        }
        let point = world_point(body, local_point);
        body.add_force_at_point(to_vector(force), point, true);
        Ok(())
    }

    /// Changes the body's velocity right away. Static and destroyed bodies ignore
    /// it, and non-finite input is dropped.
    pub fn apply_impulse(
        &mut self,
        id: BodyId,
        impulse: Vec3,
        local_point: Vec3,
    ) -> Result<(), PhysicsError> {
        let sets = self.sets_mut()?;
        if !impulse.is_finite() || !local_point.is_finite() {
            warn!("Dropping non-finite impulse {impulse:?} at {local_point:?} on body {id:?}");
            return Ok(());
        }
        let Some(body) = sets.bodies.get_mut(id.handle()) else {
            debug!("Ignoring impulse on destroyed body {id:?}");
            return Ok(());
        };
        if !body.is_dynamic() {
            debug!("Ignoring impulse on static body {id:?}");
            return Ok(());
        }
        let point = world_point(body, local_point);
        body.apply_impulse_at_point(to_vector(impulse), point, true);
        Ok(())
    }

    /// Registers a callback that receives the body's linear velocity after every step.
    pub fn observe_velocity(
        &mut self,
        id: BodyId,
        callback: impl FnMut(Vec3) + Send + Sync + 'static,
    ) -> Result<ObserverId, PhysicsError> {
        let sets = self.sets()?;
        if !sets.bodies.contains(id.handle()) {
            return Err(PhysicsError::UnknownBody(id));
        }
        let observer = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push(VelocityObserver {
            id: observer,
            body: id,
            callback: Box::new(callback),
        });
        Ok(observer)
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|observer| observer.id != id);
        self.observers.len() != before
    }

    pub fn body_state(&self, id: BodyId) -> Result<BodyState, PhysicsError> {
        let body = self
            .sets()?
            .bodies
            .get(id.handle())
            .ok_or(PhysicsError::UnknownBody(id))?;
        Ok(BodyState {
            position: from_vector(body.translation()),
            rotation: from_rotation(body.rotation()),
            linear_velocity: from_vector(body.linvel()),
            dynamic: body.is_dynamic(),
        })
    }

    pub fn position(&self, id: BodyId) -> Result<Vec3, PhysicsError> {
        self.body_state(id).map(|state| state.position)
    }

    pub fn rotation(&self, id: BodyId) -> Result<Quat, PhysicsError> {
        self.body_state(id).map(|state| state.rotation)
    }

    pub fn velocity(&self, id: BodyId) -> Result<Vec3, PhysicsError> {
        self.body_state(id).map(|state| state.linear_velocity)
    }

    pub fn is_dynamic(&self, id: BodyId) -> Result<bool, PhysicsError> {
        self.body_state(id).map(|state| state.dynamic)
    }

    /// Releases every body, collider and observer. The world cannot be used afterwards.
    pub fn teardown(&mut self) {
        if let Some(sets) = self.sets.take() {
            info!(
                "Tearing down physics world ({} bodies, {} steps)",
                sets.bodies.len(),
                self.steps
            );
        }
        self.materials.clear();
        self.observers.clear();
    }
}

impl ForceSink for PhysicsWorld {
    fn apply_force(
        &mut self,
        body: BodyId,
        force: Vec3,
        local_point: Vec3,
    ) -> Result<(), PhysicsError> {
        PhysicsWorld::apply_force(self, body, force, local_point)
    }

    fn apply_impulse(
        &mut self,
        body: BodyId,
        impulse: Vec3,
        local_point: Vec3,
    ) -> Result<(), PhysicsError> {
        PhysicsWorld::apply_impulse(self, body, impulse, local_point)
    }
}

/// Build a Rapier collider from a validated body description.
///
/// The collider is attached with an identity local transform, so it follows
/// the body pose exactly.
fn collider_from_desc(desc: &BodyDesc) -> Result<Collider, BodyConfigError> {
    let builder = match desc.shape {
        BodyShape::Sphere { radius } => ColliderBuilder::ball(radius),

        BodyShape::Cylinder {
            radius_top,
            radius_bottom,
            height,
        } if radius_top == radius_bottom => ColliderBuilder::cylinder(height / 2.0, radius_top),

        BodyShape::Cylinder {
            radius_top,
            radius_bottom,
            height,
        } => {
            // Rapier has no frustum primitive; hull the two rims instead.
            let half = height / 2.0;
            let rim = |radius: f32, y: f32| {
                (0..TAPERED_RIM_POINTS).map(move |i| {
                    let angle = std::f32::consts::TAU * i as f32 / TAPERED_RIM_POINTS as f32;
                    Point::new(angle.cos() * radius, y, angle.sin() * radius)
                })
            };
            let points: Vec<Point<Real>> =
                rim(radius_top, half).chain(rim(radius_bottom, -half)).collect();
            ColliderBuilder::convex_hull(&points).ok_or(BodyConfigError::DegenerateCylinder {
                top: radius_top,
                bottom: radius_bottom,
            })?
        }

        BodyShape::Plane => ColliderBuilder::halfspace(Vector::y_axis()),
    };

    let builder = if desc.is_static() {
        builder
    } else {
        builder.mass(desc.mass)
    };

    Ok(builder
        .active_hooks(ActiveHooks::MODIFY_SOLVER_CONTACTS)
        .build())
}

fn world_point(body: &RigidBody, local_point: Vec3) -> Point<Real> {
    Point::from(body.translation() + body.rotation() * to_vector(local_point))
}

fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn to_rotation(q: Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::new_normalize(Quaternion::new(q.w, q.x, q.y, q.z))
}

fn from_rotation(q: &UnitQuaternion<Real>) -> Quat {
    let c = q.coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::physics::ContactMaterial;

    fn free_fall_config() -> PhysicsConfig {
        PhysicsConfig {
            gravity: Vec3::new(0.0, -25.0, 0.0),
            ..PhysicsConfig::default()
        }
    }

    fn ball(world: &mut PhysicsWorld, y: f32) -> BodyId {
        let desc = BodyDesc::dynamic("ball", BodyShape::sphere(0.5), 70.0, Vec3::new(0.0, y, 0.0))
            .with_material(ContactMaterial::new(0.1, 0.3));
        world.add_body(&desc).unwrap()
    }

    #[test]
    fn test_sphere_falls_onto_plane_and_settles() {
        let mut world = PhysicsWorld::new(&free_fall_config()).unwrap();
        let ground = BodyDesc::fixed("ground", BodyShape::Plane, Vec3::ZERO)
            .with_material(ContactMaterial::new(0.9, 0.1));
        world.add_body(&ground).unwrap();
        let sphere = ball(&mut world, 4.0);

        let dt = 1.0 / 60.0;
        let mut fastest_descent = 0.0_f32;
        for _ in 0..240 {
            world.step(dt).unwrap();
            fastest_descent = fastest_descent.min(world.velocity(sphere).unwrap().y);
        }

        // Free fall over 3.5 m (centre drops from 4.0 to the 0.5 radius).
        let analytic = (2.0_f32 * 25.0 * 3.5).sqrt();
        assert!(
            (fastest_descent.abs() - analytic).abs() < analytic * 0.1,
            "impact speed {} far from analytic {analytic}",
            fastest_descent.abs()
        );

        let state = world.body_state(sphere).unwrap();
        assert!(state.dynamic);
        assert!(
            (state.position.y - 0.5).abs() < 0.1,
            "sphere should rest on the plane, y = {}",
            state.position.y
        );
        assert!(state.linear_velocity.y.abs() < 0.5);
    }

    #[test]
    fn test_forces_are_cleared_after_step() {
        let config = PhysicsConfig {
            gravity: Vec3::ZERO,
            ..PhysicsConfig::default()
        };
        let mut world = PhysicsWorld::new(&config).unwrap();
        let sphere = ball(&mut world, 0.0);

        world
            .apply_force(sphere, Vec3::new(70.0, 0.0, 0.0), Vec3::ZERO)
            .unwrap();
        world.step(0.1).unwrap();
        let after_push = world.velocity(sphere).unwrap().x;
        assert!(after_push > 0.0);

        world.step(0.1).unwrap();
        let coasting = world.velocity(sphere).unwrap().x;
        assert!(
            (coasting - after_push).abs() < 1e-4,
            "force leaked into the next step: {after_push} -> {coasting}"
        );
    }

    #[test]
    fn test_impulse_changes_velocity_immediately() {
        let config = PhysicsConfig {
            gravity: Vec3::ZERO,
            ..PhysicsConfig::default()
        };
        let mut world = PhysicsWorld::new(&config).unwrap();
        let sphere = ball(&mut world, 0.0);
        world.step(1.0 / 60.0).unwrap();

        world
            .apply_impulse(sphere, Vec3::new(0.0, 35.0, 0.0), Vec3::ZERO)
            .unwrap();
        let v = world.velocity(sphere).unwrap();
        assert!((v.y - 0.5).abs() < 1e-4, "35 / 70 = 0.5, got {}", v.y);
    }

    #[test]
    fn test_non_finite_forces_are_dropped() {
        let mut world = PhysicsWorld::new(&free_fall_config()).unwrap();
        let ground = BodyDesc::fixed("ground", BodyShape::Plane, Vec3::ZERO);
        world.add_body(&ground).unwrap();
        let sphere = ball(&mut world, 2.0);

        world
            .apply_force(sphere, Vec3::new(f32::NAN, 0.0, 0.0), Vec3::ZERO)
            .unwrap();
        world
            .apply_force(sphere, Vec3::X, Vec3::splat(f32::INFINITY))
            .unwrap();
        world
            .apply_impulse(sphere, Vec3::new(0.0, f32::INFINITY, 0.0), Vec3::ZERO)
            .unwrap();
        for _ in 0..3 {
            world.step(1.0 / 60.0).unwrap();
        }

        let state = world.body_state(sphere).unwrap();
        assert!(state.position.is_finite());
        assert!(state.linear_velocity.is_finite());
        assert_eq!(state.linear_velocity.x, 0.0);
    }

    #[test]
    fn test_static_and_removed_bodies_ignore_forces() {
        let mut world = PhysicsWorld::new(&free_fall_config()).unwrap();
        let pad = world
            .add_body(&BodyDesc::fixed(
                "pad",
                BodyShape::cylinder(2.0, 0.1),
                Vec3::new(0.0, 1.0, 0.0),
            ))
            .unwrap();
        world.apply_impulse(pad, Vec3::Y * 100.0, Vec3::ZERO).unwrap();
        world.apply_force(pad, Vec3::X * 100.0, Vec3::ZERO).unwrap();
        world.step(1.0 / 60.0).unwrap();
        let state = world.body_state(pad).unwrap();
        assert_eq!(world.is_dynamic(pad), Ok(false));
        assert_eq!(world.rotation(pad), Ok(Quat::IDENTITY));
        assert_eq!(state.position, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(state.linear_velocity, Vec3::ZERO);

        let sphere = ball(&mut world, 5.0);
        assert!(world.remove_body(sphere).unwrap());
        assert_eq!(world.apply_impulse(sphere, Vec3::Y, Vec3::ZERO), Ok(()));
        assert_eq!(
            world.position(sphere),
            Err(PhysicsError::UnknownBody(sphere))
        );
    }

    #[test]
    fn test_teardown_is_an_explicit_fault() {
        let mut world = PhysicsWorld::new(&free_fall_config()).unwrap();
        let sphere = ball(&mut world, 4.0);
        world.teardown();

        assert!(world.is_torn_down());
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.step(1.0 / 60.0), Err(PhysicsError::TornDown));
        assert_eq!(
            world.apply_force(sphere, Vec3::X, Vec3::ZERO),
            Err(PhysicsError::TornDown)
        );
        assert_eq!(
            world.apply_impulse(sphere, Vec3::Y, Vec3::ZERO),
            Err(PhysicsError::TornDown)
        );
        let desc = BodyDesc::fixed("ground", BodyShape::Plane, Vec3::ZERO);
        assert_eq!(world.add_body(&desc), Err(PhysicsError::TornDown));
    }

    #[test]
    fn test_invalid_bodies_rejected_at_construction() {
        let mut world = PhysicsWorld::new(&free_fall_config()).unwrap();
        let desc = BodyDesc::dynamic("ball", BodyShape::sphere(-1.0), 70.0, Vec3::ZERO);
        assert!(matches!(
            world.add_body(&desc),
            Err(PhysicsError::Body(BodyConfigError::InvalidRadius { .. }))
        ));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_invalid_timestep_rejected() {
        let mut world = PhysicsWorld::new(&free_fall_config()).unwrap();
        assert_eq!(world.step(0.0), Err(PhysicsError::InvalidTimestep(0.0)));
        assert!(matches!(
            world.step(f32::NAN),
            Err(PhysicsError::InvalidTimestep(_))
        ));
        assert_eq!(world.steps(), 0);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut world = PhysicsWorld::new(&free_fall_config()).unwrap();
        let integrated = world.step(0.5).unwrap();
        assert!((integrated - crate::constants::MAX_STEP_SECONDS).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_observer_pushes_after_each_step() {
        let mut world = PhysicsWorld::new(&free_fall_config()).unwrap();
        let sphere = ball(&mut world, 10.0);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer = world
            .observe_velocity(sphere, move |v| sink.lock().unwrap().push(v))
            .unwrap();

        for _ in 0..3 {
            world.step(1.0 / 60.0).unwrap();
        }
        {
            let seen = seen.lock().unwrap();
            assert_eq!(seen.len(), 3);
            assert!(seen[2].y < seen[0].y, "falling body should speed up");
        }

        assert!(world.remove_observer(observer));
        world.step(1.0 / 60.0).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_tapered_cylinder_builds_hull() {
        let mut world = PhysicsWorld::new(&free_fall_config()).unwrap();
        let desc = BodyDesc::fixed(
            "cone",
            BodyShape::Cylinder {
                radius_top: 0.5,
                radius_bottom: 1.0,
                height: 2.0,
            },
            Vec3::ZERO,
        );
        assert!(world.add_body(&desc).is_ok());
    }
}
