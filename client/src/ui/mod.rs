pub mod bounce_buttons;
pub mod style;

use bevy::prelude::*;
use shared::SceneSimulation;

use crate::sets::FrameSet;
use bounce_buttons::*;

pub struct SceneUiPlugin;

impl Plugin for SceneUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_bounce_buttons_system).add_systems(
            Update,
            (bounce_button_system, button_color_system)
                .chain()
                .in_set(FrameSet::Ui)
                .run_if(resource_exists::<SceneSimulation>),
        );
    }
}
