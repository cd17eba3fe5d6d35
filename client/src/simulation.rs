use bevy::prelude::*;
use shared::config::SimulationConfig;
use shared::SceneSimulation;

/// Configuration the scene is mounted with.
#[derive(Resource, Debug, Clone)]
pub struct SceneConfig(pub SimulationConfig);

/// Builds the scene. A rejected configuration ends the app with an error code.
pub fn mount_scene_system(
    mut commands: Commands,
    config: Res<SceneConfig>,
    mut exit: EventWriter<AppExit>,
) {
    match SceneSimulation::new(&config.0) {
        Ok(simulation) => {
            commands.insert_resource(simulation);
        }
        Err(e) => {
            error!("Failed to set up the trampoline scene: {e}");
            exit.write(AppExit::error());
        }
    }
}

pub fn advance_simulation_system(
    time: Res<Time>,
    mut simulation: ResMut<SceneSimulation>,
    mut exit: EventWriter<AppExit>,
) {
    let delta = time.delta_secs();
    if delta <= 0.0 || simulation.is_torn_down() {
        return;
    }

    match simulation.advance(delta) {
        Ok(report) => {
            if report.jumped {
                debug!(
                    "Jump with {} at t = {:.2}",
                    simulation.bounce_preset().label(),
                    report.elapsed
                );
            }
        }
        Err(e) => {
            error!("Simulation frame {} failed: {e}", simulation.frames() + 1);
            exit.write(AppExit::error());
        }
    }
}

/// Runs in `Last`, so the frame that requested the exit has already finished.
pub fn teardown_on_exit_system(
    mut exits: EventReader<AppExit>,
    simulation: Option<ResMut<SceneSimulation>>,
) {
    if exits.read().next().is_none() {
        return;
    }
    if let Some(mut simulation) = simulation {
        simulation.teardown();
    }
}
