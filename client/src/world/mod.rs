pub mod rendering;

use bevy::prelude::*;
use shared::SceneSimulation;

use crate::sets::FrameSet;
use crate::simulation::mount_scene_system;
use rendering::*;

/// Spawns the scene meshes once the simulation exists and keeps them in sync with it.
pub struct SceneRenderPlugin;

impl Plugin for SceneRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (
                setup_materials_system,
                (
                    spawn_props_system,
                    spawn_character_system,
                    spawn_membrane_system,
                    spawn_grass_system,
                )
                    .run_if(resource_exists::<SceneSimulation>),
            )
                .chain()
                .after(mount_scene_system),
        )
        .add_systems(
            Update,
            (
                update_membrane_system,
                sway_grass_system,
                sync_character_system,
            )
                .in_set(FrameSet::Visuals)
                .run_if(resource_exists::<SceneSimulation>),
        );
    }
}
