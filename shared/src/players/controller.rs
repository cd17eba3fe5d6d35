//! Keyboard-driven character policy.
//!
//! Jumps are timer-gated, not contact-gated: the character may jump in mid-air
//! as long as the cooldown has elapsed.

use std::time::Duration;

use bevy::math::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use super::input::InputState;
use crate::error::{ConfigError, PhysicsError};
use crate::physics::{BodyId, ForceSink};
use crate::{JUMP_COOLDOWN_MS, MOVE_FORCE};

/// Vertical impulse applied by a jump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BouncePreset {
    Small,
    #[default]
    Medium,
    Big,
    Extreme,
}

impl BouncePreset {
    pub const ALL: [BouncePreset; 4] = [
        BouncePreset::Small,
        BouncePreset::Medium,
        BouncePreset::Big,
        BouncePreset::Extreme,
    ];

    pub fn force(self) -> f32 {
        match self {
            BouncePreset::Small => 10.0,
            BouncePreset::Medium => 15.0,
            BouncePreset::Big => 25.0,
            BouncePreset::Extreme => 35.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BouncePreset::Small => "Small Bounce",
            BouncePreset::Medium => "Medium Bounce",
            BouncePreset::Big => "Big Bounce",
            BouncePreset::Extreme => "EXTREME!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub move_force: f32,
    pub jump_cooldown_ms: u64,
    pub bounce_preset: BouncePreset,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            move_force: MOVE_FORCE,
            jump_cooldown_ms: JUMP_COOLDOWN_MS,
            bounce_preset: BouncePreset::default(),
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.move_force.is_finite() || self.move_force < 0.0 {
            return Err(ConfigError::InvalidMoveForce(self.move_force));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpState {
    Ready,
    CoolingDown { remaining: Duration },
}

/// What one controller update did to the character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerOutcome {
    pub jumped: bool,
    pub movement_force: Vec3,
}

/// Sum of the pushes for every held key. Diagonals are not normalised.
pub fn movement_force(input: &InputState, magnitude: f32) -> Vec3 {
    input
        .held_keys()
        .fold(Vec3::ZERO, |acc, key| acc + key.direction() * magnitude)
}

#[derive(Debug, Clone)]
pub struct CharacterController {
    body: BodyId,
    config: ControllerConfig,
    state: JumpState,
}

impl CharacterController {
    pub fn new(body: BodyId, config: ControllerConfig) -> Self {
        Self {
            body,
            config,
            state: JumpState::Ready,
        }
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    pub fn state(&self) -> JumpState {
        self.state
    }

    pub fn bounce_preset(&self) -> BouncePreset {
        self.config.bounce_preset
    }

    pub fn set_bounce_preset(&mut self, preset: BouncePreset) {
        if preset != self.config.bounce_preset {
            debug!("Bounce preset set to {} ({})", preset.label(), preset.force());
        }
        self.config.bounce_preset = preset;
    }

    fn cooldown(&self) -> Duration {
        Duration::from_millis(self.config.jump_cooldown_ms)
    }

    /// Consume one frame of input.
    ///
    /// The cooldown timer advances by `dt` first, so a request arriving on the
    /// frame the timer expires is honoured. The jump impulse lands immediately;
    /// movement forces are queued for the next physics step.
    pub fn update(
        &mut self,
        input: &mut InputState,
        sink: &mut impl ForceSink,
        dt: Duration,
    ) -> Result<ControllerOutcome, PhysicsError> {
        if let JumpState::CoolingDown { remaining } = self.state {
            let remaining = remaining.saturating_sub(dt);
            self.state = if remaining.is_zero() {
                JumpState::Ready
            } else {
                JumpState::CoolingDown { remaining }
            };
        }

        let mut jumped = false;
        if input.take_jump_request() && self.state == JumpState::Ready {
            let impulse = Vec3::Y * self.config.bounce_preset.force();
            sink.apply_impulse(self.body, impulse, Vec3::ZERO)?;
            self.state = JumpState::CoolingDown {
                remaining: self.cooldown(),
            };
            jumped = true;
        }

        let mut total = Vec3::ZERO;
        for key in input.held_keys() {
            let force = key.direction() * self.config.move_force;
            sink.apply_force(self.body, force, Vec3::ZERO)?;
            total += force;
        }

        Ok(ControllerOutcome {
            jumped,
            movement_force: total,
        })
    }
}
