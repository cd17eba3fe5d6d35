use bevy::math::Vec3;

pub const GRAVITY: Vec3 = Vec3::new(0.0, -25.0, 0.0);
pub const SOLVER_ITERATIONS: usize = 20;
pub const SOLVER_TOLERANCE: f32 = 0.0001;
/// Longest frame the physics world integrates in one step (seconds).
pub const MAX_STEP_SECONDS: f32 = 1.0 / 30.0;

/// Magnitude of the push applied per held direction key (force units).
pub const MOVE_FORCE: f32 = 5.0;
pub const JUMP_COOLDOWN_MS: u64 = 500;

pub const TRAMPOLINE_RADIUS: f32 = 2.0;
pub const TRAMPOLINE_HEIGHT: f32 = 0.1;
pub const TRAMPOLINE_CENTER: Vec3 = Vec3::new(0.0, 1.0, 0.0);
pub const SURFACE_SEGMENTS: u32 = 64;
pub const SURFACE_RINGS: u32 = 16;

pub const LEG_RADIUS: f32 = 0.08;
pub const LEG_HEIGHT: f32 = 1.0;
pub const LEG_POSITIONS: [Vec3; 4] = [
    Vec3::new(1.5, 0.5, 1.5),
    Vec3::new(-1.5, 0.5, 1.5),
    Vec3::new(1.5, 0.5, -1.5),
    Vec3::new(-1.5, 0.5, -1.5),
];

pub const CHARACTER_RADIUS: f32 = 0.5;
pub const CHARACTER_MASS: f32 = 70.0;
pub const CHARACTER_SPAWN: Vec3 = Vec3::new(0.0, 4.0, 0.0);

pub const GRASS_COUNT: usize = 10_000;
pub const GRASS_INNER_RADIUS: f32 = 3.0;
pub const GRASS_OUTER_RADIUS: f32 = 20.0;
pub const GRASS_BLADE_WIDTH: f32 = 0.02;

pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 3.0, 8.0);
pub const CAMERA_SMOOTHING: f32 = 0.1;
pub const CAMERA_START: Vec3 = Vec3::new(0.0, 3.0, 8.0);

// The surface and the grass each get their own noise stream derived from the session seed.
pub const SURFACE_NOISE_SEED_OFFSET: u32 = 0;
pub const WIND_NOISE_SEED_OFFSET: u32 = 7919;
