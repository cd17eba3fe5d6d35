use bevy::prelude::*;

/// Per-frame ordering inside `Update`. Configured as a chain in `main`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Input,
    Simulation,
    Visuals,
    Ui,
}
