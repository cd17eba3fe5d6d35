use serde::{Deserialize, Serialize};
use shared::players::{BouncePreset, MoveKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameAction {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    Jump,
    SmallBounce,
    MediumBounce,
    BigBounce,
    ExtremeBounce,
}

/// Held actions and the character direction each one pushes.
pub const MOVE_ACTIONS: [(GameAction, MoveKey); 4] = [
    (GameAction::MoveForward, MoveKey::Forward),
    (GameAction::MoveBackward, MoveKey::Backward),
    (GameAction::MoveLeft, MoveKey::Left),
    (GameAction::MoveRight, MoveKey::Right),
];

pub const PRESET_ACTIONS: [(GameAction, BouncePreset); 4] = [
    (GameAction::SmallBounce, BouncePreset::Small),
    (GameAction::MediumBounce, BouncePreset::Medium),
    (GameAction::BigBounce, BouncePreset::Big),
    (GameAction::ExtremeBounce, BouncePreset::Extreme),
];
