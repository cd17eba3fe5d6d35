use bevy::math::Vec3;

/// A directional key the character responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Left,
    Right,
    Forward,
    Backward,
}

impl MoveKey {
    pub const ALL: [MoveKey; 4] = [
        MoveKey::Left,
        MoveKey::Right,
        MoveKey::Forward,
        MoveKey::Backward,
    ];

    /// Unit world axis the key pushes along. Forward is -Z, away from the camera.
    pub fn direction(self) -> Vec3 {
        match self {
            MoveKey::Left => Vec3::NEG_X,
            MoveKey::Right => Vec3::X,
            MoveKey::Forward => Vec3::NEG_Z,
            MoveKey::Backward => Vec3::Z,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Keyboard state sampled once per frame.
///
/// Held keys are level-triggered. The jump request is an edge: it stays set
/// until the controller consumes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    held: [bool; 4],
    jump_requested: bool,
}

impl InputState {
    pub fn set_held(&mut self, key: MoveKey, held: bool) {
        self.held[key.index()] = held;
    }

    pub fn is_held(&self, key: MoveKey) -> bool {
        self.held[key.index()]
    }

    pub fn held_keys(&self) -> impl Iterator<Item = MoveKey> + '_ {
        MoveKey::ALL.into_iter().filter(move |key| self.is_held(*key))
    }

    pub fn request_jump(&mut self) {
        self.jump_requested = true;
    }

    pub fn jump_requested(&self) -> bool {
        self.jump_requested
    }

    /// Returns the pending jump request and clears it.
    pub fn take_jump_request(&mut self) -> bool {
        std::mem::take(&mut self.jump_requested)
    }

    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}
