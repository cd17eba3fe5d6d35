//! Per-frame pipeline tying the physics world to everything that reads it.
//!
//! One [`SceneSimulation::advance`] call runs, in order:
//!
//! 1. the physics step, consuming forces queued during the previous frame,
//! 2. the controller, which applies jump impulses now and queues movement forces,
//! 3. the trampoline surface and the vegetation, both driven by the session clock,
//! 4. the camera, chasing the character's freshly stepped position.

use std::time::Duration;

use bevy::math::{Quat, Vec3};
use bevy_ecs::resource::Resource;
use log::{info, warn};

use crate::camera::CameraRig;
use crate::config::SimulationConfig;
use crate::error::{PhysicsError, SceneError};
use crate::noise::PerlinField;
use crate::physics::PhysicsWorld;
use crate::players::{BouncePreset, CharacterController, InputState};
use crate::scene::{build_scene, SceneBodies};
use crate::world::{TrampolineSurface, VegetationField};
use crate::{SURFACE_NOISE_SEED_OFFSET, WIND_NOISE_SEED_OFFSET};

/// What happened during one [`SceneSimulation::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    /// Session clock after this frame, in seconds.
    pub elapsed: f32,
    /// Duration the physics world actually integrated (clamped).
    pub physics_dt: f32,
    pub jumped: bool,
    pub movement_force: Vec3,
    pub repaired_vertices: usize,
    pub camera_updated: bool,
}

#[derive(Resource)]
pub struct SceneSimulation {
    world: PhysicsWorld,
    bodies: SceneBodies,
    input: InputState,
    controller: CharacterController,
    surface: TrampolineSurface,
    vegetation: VegetationField,
    camera: CameraRig,
    surface_noise: PerlinField,
    wind_noise: PerlinField,
    /// Session clock in seconds. Kept wide so long sessions don't quantize.
    elapsed: f64,
    frames: u64,
}

impl SceneSimulation {
    /// Builds the world and every visual buffer, already evaluated at `t = 0`.
    pub fn new(config: &SimulationConfig) -> Result<Self, SceneError> {
        config.validate()?;

        let mut world = PhysicsWorld::new(&config.physics)?;
        let bodies = build_scene(&mut world, &config.scene)?;

        let surface_noise = PerlinField::from_session_seed(config.seed, SURFACE_NOISE_SEED_OFFSET);
        let wind_noise = PerlinField::from_session_seed(config.seed, WIND_NOISE_SEED_OFFSET);

        let mut surface = TrampolineSurface::new(&config.surface)?;
        surface.update(0.0, &surface_noise);
        let mut vegetation = VegetationField::from_seed(&config.vegetation, config.seed);
        vegetation.update(0.0, &wind_noise);

        info!(
            "Scene mounted (seed {}, {} surface vertices, {} grass blades)",
            config.seed,
            surface.positions().len(),
            vegetation.len()
        );

        Ok(Self {
            controller: CharacterController::new(bodies.character, config.controller),
            camera: CameraRig::new(&config.camera),
            world,
            bodies,
            input: InputState::default(),
            surface,
            vegetation,
            surface_noise,
            wind_noise,
            elapsed: 0.0,
            frames: 0,
        })
    }

    /// Runs one frame of `dt` seconds.
    ///
    /// The session clock advances by the full `dt`; only the physics step is clamped.
    pub fn advance(&mut self, dt: f32) -> Result<FrameReport, PhysicsError> {
        let physics_dt = self.world.step(dt)?;

        let frame_time = Duration::try_from_secs_f32(dt).unwrap_or(Duration::MAX);
        let outcome = self
            .controller
            .update(&mut self.input, &mut self.world, frame_time)?;

        self.elapsed += f64::from(dt);
        self.frames += 1;
        let t = self.elapsed as f32;

        let repaired_vertices = self.surface.update(t, &self.surface_noise);
        if repaired_vertices > 0 {
            warn!("Repaired {repaired_vertices} surface vertices at t = {t}");
        }
        self.vegetation.update(t, &self.wind_noise);

        let character = self.world.position(self.bodies.character)?;
        let camera_updated = self.camera.follow(character);
        if !camera_updated {
            warn!("Character position {character:?} is not finite; camera held");
        }

        Ok(FrameReport {
            frame: self.frames,
            elapsed: t,
            physics_dt,
            jumped: outcome.jumped,
            movement_force: outcome.movement_force,
            repaired_vertices,
            camera_updated,
        })
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Input sampling writes here; the controller consumes it on the next advance.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn bounce_preset(&self) -> BouncePreset {
        self.controller.bounce_preset()
    }

    pub fn set_bounce_preset(&mut self, preset: BouncePreset) {
        self.controller.set_bounce_preset(preset);
    }

    pub fn bodies(&self) -> &SceneBodies {
        &self.bodies
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn surface(&self) -> &TrampolineSurface {
        &self.surface
    }

    pub fn vegetation(&self) -> &VegetationField {
        &self.vegetation
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn character_transform(&self) -> Result<(Vec3, Quat), PhysicsError> {
        let state = self.world.body_state(self.bodies.character)?;
        Ok((state.position, state.rotation))
    }

    /// Releases the physics world. Every later [`advance`](Self::advance) fails.
    pub fn teardown(&mut self) {
        if !self.world.is_torn_down() {
            info!("Unmounting scene after {} frames", self.frames);
        }
        self.input.release_all();
        self.world.teardown();
    }

    pub fn is_torn_down(&self) -> bool {
        self.world.is_torn_down()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::noise::NoiseField;
    use crate::players::MoveKey;
    use crate::world::VegetationConfig;

    fn config() -> SimulationConfig {
        SimulationConfig {
            seed: 11,
            vegetation: VegetationConfig {
                count: 200,
                ..VegetationConfig::default()
            },
            ..SimulationConfig::default()
        }
    }

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_mount_evaluates_time_zero() {
        let sim = SceneSimulation::new(&config()).unwrap();
        assert_eq!(sim.frames(), 0);
        assert_eq!(sim.elapsed(), 0.0);
        let noise = PerlinField::from_session_seed(11, SURFACE_NOISE_SEED_OFFSET);
        assert_eq!(
            sim.surface().positions()[0][1],
            noise.sample(0.0, 0.0, 0.0) * 0.02
        );
        assert_eq!(sim.camera().position(), Vec3::new(0.0, 3.0, 8.0));
    }

    #[test]
    fn test_camera_follows_stepped_character() {
        let mut sim = SceneSimulation::new(&config()).unwrap();
        let report = sim.advance(DT).unwrap();
        assert_eq!(report.frame, 1);
        assert!(report.camera_updated);

        let (character, _) = sim.character_transform().unwrap();
        assert!(character.y < 4.0, "character should have started falling");
        assert_eq!(sim.camera().look_at(), character);
    }

    #[test]
    fn test_jump_consumes_request() {
        let mut sim = SceneSimulation::new(&config()).unwrap();
        sim.input_mut().request_jump();
        sim.input_mut().set_held(MoveKey::Forward, true);
        let report = sim.advance(DT).unwrap();
        assert!(report.jumped);
        assert_eq!(report.movement_force, Vec3::new(0.0, 0.0, -5.0));
        assert!(!sim.input().jump_requested());

        sim.input_mut().request_jump();
        assert!(!sim.advance(DT).unwrap().jumped, "still cooling down");
    }

    #[test]
    fn test_clock_uses_unclamped_dt() {
        let mut sim = SceneSimulation::new(&config()).unwrap();
        let report = sim.advance(0.25).unwrap();
        assert_eq!(report.elapsed, 0.25);
        assert!(report.physics_dt < 0.25);
    }

    #[test]
    fn test_clock_keeps_precision_in_long_sessions() {
        let mut sim = SceneSimulation::new(&config()).unwrap();
        sim.advance(36_000.0).unwrap();
        for _ in 0..60 {
            sim.advance(DT).unwrap();
        }
        let expected = 36_000.0 + 60.0 * f64::from(DT);
        assert!((sim.elapsed() - expected).abs() < 1e-6, "{}", sim.elapsed());
    }

    #[test]
    fn test_invalid_wave_limit_fails_mount() {
        let bad = SimulationConfig::from_ron_str("(surface: (wave: (max_displacement: -1.0)))");
        assert!(bad.is_err());

        let mut direct = config();
        direct.surface.wave.max_displacement = -1.0;
        assert!(matches!(
            SceneSimulation::new(&direct),
            Err(SceneError::Config(ConfigError::InvalidSurfaceWave { .. }))
        ));
    }

    #[test]
    fn test_non_finite_move_force_fails_mount() {
        let mut bad = config();
        bad.controller.move_force = f32::NAN;
        assert!(matches!(
            SceneSimulation::new(&bad),
            Err(SceneError::Config(ConfigError::InvalidMoveForce(_)))
        ));
    }

    #[test]
    fn test_same_seed_same_visuals() {
        let mut a = SceneSimulation::new(&config()).unwrap();
        let mut b = SceneSimulation::new(&config()).unwrap();
        for _ in 0..5 {
            a.advance(DT).unwrap();
            b.advance(DT).unwrap();
        }
        assert_eq!(a.surface().positions(), b.surface().positions());
        assert_eq!(a.vegetation().transforms(), b.vegetation().transforms());
    }

    #[test]
    fn test_preset_selection() {
        let mut sim = SceneSimulation::new(&config()).unwrap();
        assert_eq!(sim.bounce_preset(), BouncePreset::Medium);
        sim.set_bounce_preset(BouncePreset::Extreme);
        assert_eq!(sim.bounce_preset(), BouncePreset::Extreme);
    }

    #[test]
    fn test_advance_after_teardown_fails() {
        let mut sim = SceneSimulation::new(&config()).unwrap();
        sim.advance(DT).unwrap();
        sim.teardown();
        assert!(sim.is_torn_down());
        assert_eq!(sim.advance(DT), Err(PhysicsError::TornDown));
        assert_eq!(sim.frames(), 1);
        sim.teardown();
    }

    #[test]
    fn test_invalid_config_fails_mount() {
        let mut bad = config();
        bad.camera.smoothing = 2.0;
        assert!(matches!(
            SceneSimulation::new(&bad),
            Err(SceneError::Config(_))
        ));
    }
}
