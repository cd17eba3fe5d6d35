//! Error types for scene construction and the physics world.

use bevy::math::Vec3;
use thiserror::Error;

/// A body description that cannot be turned into a collider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BodyConfigError {
    #[error("{shape} radius must be positive and finite, got {radius}")]
    InvalidRadius { shape: &'static str, radius: f32 },

    #[error("cylinder height must be positive and finite, got {0}")]
    InvalidHeight(f32),

    #[error("body mass must be 0 (static) or positive and finite, got {0}")]
    InvalidMass(f32),

    #[error("planes are infinite and must be static, got mass {0}")]
    DynamicPlane(f32),

    #[error("body position must be finite, got {0:?}")]
    NonFinitePosition(Vec3),

    #[error(
        "contact material coefficients must be finite and non-negative \
         (friction {friction}, restitution {restitution})"
    )]
    InvalidMaterial { friction: f32, restitution: f32 },

    #[error("no convex hull for a cylinder with radii {top} and {bottom}")]
    DegenerateCylinder { top: f32, bottom: f32 },
}

/// Faults raised by the rigid-body world.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// The world was stepped or written to after [`teardown`](crate::physics::PhysicsWorld::teardown).
    #[error("physics world used after teardown")]
    TornDown,

    #[error("step duration must be finite and positive, got {0}")]
    InvalidTimestep(f32),

    #[error("no body with id {0:?} in this world")]
    UnknownBody(crate::physics::BodyId),

    #[error(transparent)]
    Body(#[from] BodyConfigError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Rejected [`SimulationConfig`](crate::config::SimulationConfig) values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("solver iteration count must be at least 1")]
    ZeroSolverIterations,

    #[error("solver tolerance must be finite and positive, got {0}")]
    InvalidTolerance(f32),

    #[error("maximum step must be finite and positive, got {0}")]
    InvalidMaxStep(f32),

    #[error("gravity must be finite, got {0:?}")]
    NonFiniteGravity(Vec3),

    #[error("default contact material: {0}")]
    DefaultMaterial(BodyConfigError),

    #[error("vegetation annulus must satisfy 0 <= inner < outer, got [{inner}, {outer})")]
    InvalidAnnulus { inner: f32, outer: f32 },

    #[error("vegetation heights must satisfy 0 < min <= max, got [{min}, {max})")]
    InvalidHeightRange { min: f32, max: f32 },

    #[error("camera smoothing must lie in (0, 1], got {0}")]
    InvalidSmoothing(f32),

    #[error("surface disc needs at least 3 segments and 1 ring, got {segments} and {rings}")]
    InvalidSurfaceResolution { segments: u32, rings: u32 },

    #[error("surface radius must be positive and finite, got {0}")]
    InvalidSurfaceRadius(f32),

    #[error("surface wave {field} is out of range, got {value}")]
    InvalidSurfaceWave { field: &'static str, value: f32 },

    #[error("wind {field} must be finite, got {value}")]
    InvalidWind { field: &'static str, value: f32 },

    #[error("grass blade width must be positive and finite, got {0}")]
    InvalidBladeWidth(f32),

    #[error("movement force must be finite and non-negative, got {0}")]
    InvalidMoveForce(f32),

    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

/// Anything that stops the scene from being assembled.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("physics setup failed: {0}")]
    Physics(#[from] PhysicsError),
}
