use bevy::math::Vec3;

use crate::error::PhysicsError;

pub mod body;
pub mod contact;
mod rapier;

pub use body::{BodyDesc, BodyShape, ContactMaterial};
pub use contact::ContactMaterials;
pub use rapier::{BodyId, BodyState, ObserverId, PhysicsWorld};

/// Anything that accepts forces and impulses for a body.
///
/// The character controller only needs this much of the world, which keeps
/// it testable without a Rapier pipeline.
pub trait ForceSink {
    /// Queue a continuous force for the next step, applied at `local_point` in body space.
    fn apply_force(
        &mut self,
        body: BodyId,
        force: Vec3,
        local_point: Vec3,
    ) -> Result<(), PhysicsError>;

    /// Change the body's velocity immediately.
    fn apply_impulse(
        &mut self,
        body: BodyId,
        impulse: Vec3,
        local_point: Vec3,
    ) -> Result<(), PhysicsError>;
}
