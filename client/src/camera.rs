use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use shared::SceneSimulation;

pub const SKY_COLOR: Color = Color::srgb(0.53, 0.81, 0.92);

#[derive(Component)]
pub struct ChaseCamera;

pub fn spawn_camera_system(mut commands: Commands, simulation: Res<SceneSimulation>) {
    let rig = simulation.camera();
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 60.0_f32.to_radians(),
            ..default()
        }),
        Transform::from_translation(rig.position()).looking_at(rig.look_at(), Vec3::Y),
        DistanceFog {
            color: SKY_COLOR,
            falloff: FogFalloff::Linear {
                start: 30.0,
                end: 100.0,
            },
            ..default()
        },
        ChaseCamera,
    ));
}

pub fn sync_camera_system(
    simulation: Res<SceneSimulation>,
    mut cameras: Query<&mut Transform, With<ChaseCamera>>,
) {
    let rig = simulation.camera();
    for mut transform in cameras.iter_mut() {
        *transform = Transform::from_translation(rig.position()).looking_at(rig.look_at(), Vec3::Y);
    }
}
