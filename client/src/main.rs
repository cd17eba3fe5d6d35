mod camera;
mod input;
mod lighting;
mod sets;
mod simulation;
mod ui;
mod world;

use std::path::PathBuf;

use bevy::{prelude::*, window::PresentMode};
use clap::Parser;
use shared::config::SimulationConfig;
use shared::SceneSimulation;

use crate::camera::{spawn_camera_system, sync_camera_system, SKY_COLOR};
use crate::input::keyboard::{get_bindings, sample_keyboard_system};
use crate::lighting::{drift_sun_system, spawn_lights_system};
use crate::sets::FrameSet;
use crate::simulation::{
    advance_simulation_system, mount_scene_system, teardown_on_exit_system, SceneConfig,
};
use crate::ui::SceneUiPlugin;
use crate::world::SceneRenderPlugin;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, help = "RON file with scene settings; defaults apply to missing fields")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Session seed for noise and grass placement")]
    seed: Option<u64>,

    #[arg(long, help = "Number of grass blades to plant")]
    grass_count: Option<usize>,

    #[arg(short, long, help = "RON file with key bindings")]
    bindings: Option<PathBuf>,
}

impl Args {
    fn simulation_config(&self) -> SimulationConfig {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load_or_default(path),
            // Without a config file every session gets fresh noise and grass.
            None => SimulationConfig {
                seed: rand::random(),
                ..SimulationConfig::default()
            },
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(count) = self.grass_count {
            config.vegetation.count = count;
        }
        config
    }
}

fn main() {
    let args = Args::parse();

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Trampoline".to_string(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }));

    // Loaded after the log plugin is installed so their diagnostics are visible.
    let config = args.simulation_config();
    let key_map = get_bindings(args.bindings.as_deref());

    app.insert_resource(ClearColor(SKY_COLOR))
        .insert_resource(SceneConfig(config))
        .insert_resource(key_map)
        .configure_sets(
            Update,
            (
                FrameSet::Input,
                FrameSet::Simulation,
                FrameSet::Visuals,
                FrameSet::Ui,
            )
                .chain(),
        )
        .add_systems(
            Startup,
            (
                mount_scene_system,
                (
                    spawn_camera_system.run_if(resource_exists::<SceneSimulation>),
                    spawn_lights_system,
                ),
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                sample_keyboard_system.in_set(FrameSet::Input),
                advance_simulation_system.in_set(FrameSet::Simulation),
                (sync_camera_system, drift_sun_system).in_set(FrameSet::Visuals),
            )
                .run_if(resource_exists::<SceneSimulation>),
        )
        .add_systems(Last, teardown_on_exit_system)
        .add_plugins((SceneRenderPlugin, SceneUiPlugin))
        .run();
}
