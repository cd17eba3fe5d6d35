//! Procedural grass around the trampoline.
//!
//! Planting happens once from a seeded RNG. After that every frame is a pure
//! function of `(instance, t, noise)`: blades lean under a sinusoidal sway plus
//! a slow noise gust, and never move or change height.

use bevy::math::{EulerRot, Mat4, Quat, Vec2, Vec3};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::error::ConfigError;
use crate::noise::NoiseField;
use crate::{GRASS_BLADE_WIDTH, GRASS_COUNT, GRASS_INNER_RADIUS, GRASS_OUTER_RADIUS};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindParams {
    /// Peak lean around X, in radians.
    pub strength: f32,
    pub speed: f32,
    /// Sway frequency around Z relative to `speed`.
    pub cross_speed_ratio: f32,
    /// Sway amplitude around Z relative to `strength`.
    pub cross_strength_ratio: f32,
    pub noise_scale: f32,
    pub noise_time_scale: f32,
}

impl Default for WindParams {
    fn default() -> Self {
        Self {
            strength: 0.15,
            speed: 2.0,
            cross_speed_ratio: 0.7,
            cross_strength_ratio: 0.5,
            noise_scale: 0.1,
            noise_time_scale: 0.5,
        }
    }
}

impl WindParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let coefficients = [
            ("strength", self.strength),
            ("speed", self.speed),
            ("cross_speed_ratio", self.cross_speed_ratio),
            ("cross_strength_ratio", self.cross_strength_ratio),
            ("noise_scale", self.noise_scale),
            ("noise_time_scale", self.noise_time_scale),
        ];
        match coefficients.into_iter().find(|(_, v)| !v.is_finite()) {
            Some((field, value)) => Err(ConfigError::InvalidWind { field, value }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationConfig {
    pub count: usize,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub blade_width: f32,
    pub wind: WindParams,
}

impl Default for VegetationConfig {
    fn default() -> Self {
        Self {
            count: GRASS_COUNT,
            inner_radius: GRASS_INNER_RADIUS,
            outer_radius: GRASS_OUTER_RADIUS,
            min_height: 0.2,
            max_height: 0.5,
            blade_width: GRASS_BLADE_WIDTH,
            wind: WindParams::default(),
        }
    }
}

impl VegetationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (inner, outer) = (self.inner_radius, self.outer_radius);
        if !(inner.is_finite() && outer.is_finite() && inner >= 0.0 && inner < outer) {
            return Err(ConfigError::InvalidAnnulus { inner, outer });
        }
        let (min, max) = (self.min_height, self.max_height);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ConfigError::InvalidHeightRange { min, max });
        }
        if !self.blade_width.is_finite() || self.blade_width <= 0.0 {
            return Err(ConfigError::InvalidBladeWidth(self.blade_width));
        }
        self.wind.validate()
    }
}

/// One planted blade. Fixed for the life of the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VegetationInstance {
    position: Vec2,
    height: f32,
    phase: f32,
}

impl VegetationInstance {
    /// Ground position as `(x, z)`.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl InstanceTransform {
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Lean angles `(x, z)` of one blade at time `t`.
pub fn wind_angles(
    instance: &VegetationInstance,
    t: f32,
    wind: &WindParams,
    noise: &impl NoiseField,
) -> (f32, f32) {
    let sway_x = (t * wind.speed + instance.phase).sin() * wind.strength;
    let sway_z = (t * wind.speed * wind.cross_speed_ratio + instance.phase).cos()
        * wind.strength
        * wind.cross_strength_ratio;
    let gust = noise.sample(
        instance.position.x * wind.noise_scale,
        instance.position.y * wind.noise_scale,
        t * wind.noise_time_scale,
    ) * wind.strength;

    let sway_z = if gust.is_finite() { sway_z + gust } else { sway_z };
    (sway_x, sway_z)
}

/// Uniform in `[min, max)`; collapses to `min` when the range is empty.
fn uniform(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    min + rng.gen::<f32>() * (max - min)
}

fn instance_transform(
    instance: &VegetationInstance,
    t: f32,
    wind: &WindParams,
    blade_width: f32,
    noise: &impl NoiseField,
) -> InstanceTransform {
    let (wind_x, wind_z) = wind_angles(instance, t, wind, noise);
    InstanceTransform {
        translation: Vec3::new(instance.position.x, 0.0, instance.position.y),
        rotation: Quat::from_euler(EulerRot::XYZ, wind_x, 0.0, wind_z),
        scale: Vec3::new(blade_width, instance.height, blade_width),
    }
}

#[derive(Debug, Clone)]
pub struct VegetationField {
    instances: Vec<VegetationInstance>,
    transforms: Vec<InstanceTransform>,
    wind: WindParams,
    blade_width: f32,
}

impl VegetationField {
    /// Plants `config.count` blades uniformly in angle and radius over the annulus.
    pub fn plant(config: &VegetationConfig, rng: &mut impl Rng) -> Self {
        let instances: Vec<VegetationInstance> = (0..config.count)
            .map(|_| {
                let angle = uniform(rng, 0.0, TAU);
                let radius = uniform(rng, config.inner_radius, config.outer_radius);
                let height = uniform(rng, config.min_height, config.max_height);
                let phase = uniform(rng, 0.0, TAU);
                VegetationInstance {
                    position: Vec2::new(angle.cos() * radius, angle.sin() * radius),
                    height,
                    phase,
                }
            })
            .collect();

        let transforms = instances
            .iter()
            .map(|instance| InstanceTransform {
                translation: Vec3::new(instance.position.x, 0.0, instance.position.y),
                rotation: Quat::IDENTITY,
                scale: Vec3::new(config.blade_width, instance.height, config.blade_width),
            })
            .collect();

        debug!("Planted {} vegetation instances", instances.len());
        Self {
            instances,
            transforms,
            wind: config.wind,
            blade_width: config.blade_width,
        }
    }

    pub fn from_seed(config: &VegetationConfig, seed: u64) -> Self {
        Self::plant(config, &mut StdRng::seed_from_u64(seed))
    }

    /// Rewrites every transform for time `t`. The buffer is never reallocated.
    pub fn update(&mut self, t: f32, noise: &impl NoiseField) {
        let wind = self.wind;
        let blade_width = self.blade_width;

        #[cfg(feature = "parallel")]
        self.transforms
            .par_iter_mut()
            .zip(self.instances.par_iter())
            .for_each(|(transform, instance)| {
                *transform = instance_transform(instance, t, &wind, blade_width, noise);
            });

        #[cfg(not(feature = "parallel"))]
        for (transform, instance) in self.transforms.iter_mut().zip(&self.instances) {
            *transform = instance_transform(instance, t, &wind, blade_width, noise);
        }
    }

    pub fn instances(&self) -> &[VegetationInstance] {
        &self.instances
    }

    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::PerlinField;

    fn small_config() -> VegetationConfig {
        VegetationConfig {
            count: 500,
            ..VegetationConfig::default()
        }
    }

    struct ConstantField(f32);

    impl NoiseField for ConstantField {
        fn sample(&self, _x: f32, _z: f32, _t: f32) -> f32 {
            self.0
        }
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = VegetationField::from_seed(&small_config(), 42);
        let b = VegetationField::from_seed(&small_config(), 42);
        assert_eq!(a.instances(), b.instances());

        let c = VegetationField::from_seed(&small_config(), 43);
        assert_ne!(a.instances(), c.instances());
    }

    #[test]
    fn test_planting_stays_inside_ranges() {
        let field = VegetationField::from_seed(&VegetationConfig::default(), 9);
        assert_eq!(field.len(), 10_000);
        for instance in field.instances() {
            let r = instance.position().length();
            assert!((3.0 - 1e-4..20.0 + 1e-4).contains(&r), "radius {r}");
            assert!((0.2..0.5).contains(&instance.height()));
            assert!((0.0..TAU).contains(&instance.phase()));
        }
    }

    #[test]
    fn test_planting_invariant_across_updates() {
        let noise = PerlinField::new(4);
        let mut field = VegetationField::from_seed(&small_config(), 1);
        let planted = field.instances().to_vec();
        let buffer = field.transforms().as_ptr();

        for frame in 0..20 {
            field.update(frame as f32 * 0.05, &noise);
        }

        assert_eq!(field.instances(), planted.as_slice());
        assert_eq!(field.transforms().as_ptr(), buffer);
        for (transform, instance) in field.transforms().iter().zip(&planted) {
            assert_eq!(
                transform.translation,
                Vec3::new(instance.position().x, 0.0, instance.position().y)
            );
            assert_eq!(
                transform.scale,
                Vec3::new(0.02, instance.height(), 0.02)
            );
        }
    }

    #[test]
    fn test_wind_formula() {
        let field = VegetationField::from_seed(&small_config(), 3);
        let instance = field.instances()[0];
        let t = 1.7;
        let (x, z) = wind_angles(&instance, t, &WindParams::default(), &ConstantField(0.4));

        let expected_x = (t * 2.0 + instance.phase()).sin() * 0.15;
        let expected_z = (t * 1.4 + instance.phase()).cos() * 0.075 + 0.4 * 0.15;
        assert!((x - expected_x).abs() < 1e-6);
        assert!((z - expected_z).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_gust_is_dropped() {
        let field = VegetationField::from_seed(&small_config(), 3);
        let instance = field.instances()[7];
        let wind = WindParams::default();
        let broken = wind_angles(&instance, 2.0, &wind, &ConstantField(f32::INFINITY));
        let calm = wind_angles(&instance, 2.0, &wind, &ConstantField(0.0));
        assert_eq!(broken, calm);
    }

    #[test]
    fn test_matrix_places_blade() {
        let transform = InstanceTransform {
            translation: Vec3::new(4.0, 0.0, -3.0),
            rotation: Quat::IDENTITY,
            scale: Vec3::new(0.02, 0.3, 0.02),
        };
        let tip = transform.to_matrix().transform_point3(Vec3::Y);
        assert!((tip - Vec3::new(4.0, 0.3, -3.0)).length() < 1e-6);
    }

    #[test]
    fn test_invalid_annulus_rejected() {
        let config = VegetationConfig {
            inner_radius: 20.0,
            outer_radius: 3.0,
            ..VegetationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidAnnulus {
                inner: 20.0,
                outer: 3.0
            })
        );
    }

    #[test]
    fn test_broken_wind_rejected() {
        let mut config = small_config();
        config.wind.strength = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWind {
                field: "strength",
                ..
            })
        ));

        config.wind = WindParams {
            cross_speed_ratio: f32::INFINITY,
            ..WindParams::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWind {
                field: "cross_speed_ratio",
                ..
            })
        ));
    }

    #[test]
    fn test_blade_width_must_be_positive() {
        for blade_width in [0.0, -0.02, f32::NAN] {
            let config = VegetationConfig {
                blade_width,
                ..small_config()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidBladeWidth(_))
            ));
        }
        assert_eq!(small_config().validate(), Ok(()));
    }
}
