use std::fs;
use std::path::Path;

use bevy::math::Vec3;
use log::{info, warn};
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};

use crate::camera::CameraConfig;
use crate::error::ConfigError;
use crate::physics::ContactMaterial;
use crate::players::ControllerConfig;
use crate::scene::SceneLayout;
use crate::world::{SurfaceConfig, VegetationConfig};
use crate::{GRAVITY, MAX_STEP_SECONDS, SOLVER_ITERATIONS, SOLVER_TOLERANCE};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    pub solver_iterations: usize,
    pub tolerance: f32,
    /// Used for every contact pair where one side has no material.
    pub default_material: ContactMaterial,
    pub max_step: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            solver_iterations: SOLVER_ITERATIONS,
            tolerance: SOLVER_TOLERANCE,
            default_material: ContactMaterial::new(0.1, 0.9),
            max_step: MAX_STEP_SECONDS,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity.is_finite() {
            return Err(ConfigError::NonFiniteGravity(self.gravity));
        }
        if self.solver_iterations == 0 {
            return Err(ConfigError::ZeroSolverIterations);
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        if !self.max_step.is_finite() || self.max_step <= 0.0 {
            return Err(ConfigError::InvalidMaxStep(self.max_step));
        }
        self.default_material
            .validate()
            .map_err(ConfigError::DefaultMaterial)
    }
}

/// Everything tunable about one session of the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seeds both noise fields and the vegetation planting.
    pub seed: u64,
    pub physics: PhysicsConfig,
    pub scene: SceneLayout,
    pub controller: ControllerConfig,
    pub surface: SurfaceConfig,
    pub vegetation: VegetationConfig,
    pub camera: CameraConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            physics: PhysicsConfig::default(),
            scene: SceneLayout::default(),
            controller: ControllerConfig::default(),
            surface: SurfaceConfig::default(),
            vegetation: VegetationConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        self.controller.validate()?;
        self.surface.validate()?;
        self.vegetation.validate()?;
        self.camera.validate()
    }

    /// Parses and validates a RON document. Missing fields take their defaults.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig =
            ron::de::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = PrettyConfig::new().with_depth_limit(3);
        ron::ser::to_string_pretty(self, pretty).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads `path`, falling back to the defaults when the file is missing or rejected.
    pub fn load_or_default(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                info!("No scene config at {path:?} ({e}), using defaults");
                return Self::default();
            }
        };

        match Self::from_ron_str(&content) {
            Ok(config) => {
                info!("Loaded scene config from {path:?}");
                config
            }
            Err(e) => {
                warn!("Ignoring scene config at {path:?}: {e}");
                Self::default()
            }
        }
    }
}
