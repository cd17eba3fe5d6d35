use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{CAMERA_OFFSET, CAMERA_SMOOTHING, CAMERA_START};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Target position relative to the followed subject.
    pub offset: Vec3,
    /// Fraction of the remaining distance covered each frame, in (0, 1].
    pub smoothing: f32,
    pub initial_position: Vec3,
    pub initial_look_at: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: CAMERA_OFFSET,
            smoothing: CAMERA_SMOOTHING,
            initial_position: CAMERA_START,
            initial_look_at: Vec3::ZERO,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(ConfigError::InvalidSmoothing(self.smoothing));
        }
        Ok(())
    }
}

/// Chase camera that eases towards a fixed offset from its subject.
///
/// Smoothing is applied per frame, so the catch-up speed depends on the frame rate.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    position: Vec3,
    look_at: Vec3,
    offset: Vec3,
    smoothing: f32,
}

impl CameraRig {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            position: config.initial_position,
            look_at: config.initial_look_at,
            offset: config.offset,
            smoothing: config.smoothing,
        }
    }

    pub fn target_for(&self, subject: Vec3) -> Vec3 {
        subject + self.offset
    }

    /// Moves one step towards the chase pose for `subject`.
    ///
    /// Returns false and leaves the pose untouched if `subject` is not finite.
    pub fn follow(&mut self, subject: Vec3) -> bool {
        if !subject.is_finite() {
            return false;
        }
        self.position = self.position.lerp(self.target_for(subject), self.smoothing);
        self.look_at = subject;
        true
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_authored_pose() {
        let rig = CameraRig::new(&CameraConfig::default());
        assert_eq!(rig.position(), Vec3::new(0.0, 3.0, 8.0));
        assert_eq!(rig.look_at(), Vec3::ZERO);
    }

    #[test]
    fn test_distance_shrinks_geometrically() {
        let mut rig = CameraRig::new(&CameraConfig::default());
        let subject = Vec3::new(5.0, 2.0, -4.0);
        let target = rig.target_for(subject);
        let initial = rig.position().distance(target);

        for n in 1..=30 {
            rig.follow(subject);
            let expected = initial * 0.9_f32.powi(n);
            let actual = rig.position().distance(target);
            assert!(
                (actual - expected).abs() < 1e-4,
                "frame {n}: {actual} vs {expected}"
            );
        }
        assert_eq!(rig.look_at(), subject);
    }

    #[test]
    fn test_non_finite_subject_is_ignored() {
        let mut rig = CameraRig::new(&CameraConfig::default());
        rig.follow(Vec3::new(1.0, 1.0, 1.0));
        let before = rig.clone();
        assert!(!rig.follow(Vec3::new(f32::NAN, 0.0, 0.0)));
        assert_eq!(rig, before);
    }

    #[test]
    fn test_smoothing_range() {
        let config = CameraConfig {
            smoothing: 0.0,
            ..CameraConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidSmoothing(0.0)));
        assert!(CameraConfig::default().validate().is_ok());
    }
}
