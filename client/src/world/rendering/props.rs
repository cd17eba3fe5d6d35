use std::f32::consts::TAU;

use bevy::prelude::*;
use shared::SceneSimulation;

use super::materials::SceneMaterials;
use crate::simulation::SceneConfig;

/// Springs drawn between the frame ring and the membrane edge.
const SPRING_COUNT: usize = 32;
const FRAME_TUBE_RADIUS: f32 = 0.05;

#[derive(Component)]
pub struct CharacterAvatar;

/// Ground, frame, legs and springs. None of these move after spawning.
pub fn spawn_props_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    materials: Res<SceneMaterials>,
    config: Res<SceneConfig>,
) {
    let layout = &config.0.scene;

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(100.0, 100.0))),
        MeshMaterial3d(materials.ground.clone()),
        Transform::IDENTITY,
    ));

    commands.spawn((
        Mesh3d(meshes.add(Torus::new(
            layout.pad_radius - FRAME_TUBE_RADIUS,
            layout.pad_radius + FRAME_TUBE_RADIUS,
        ))),
        MeshMaterial3d(materials.frame.clone()),
        Transform::from_translation(layout.pad_center),
    ));

    let leg = meshes.add(Cylinder::new(layout.leg_radius, layout.leg_height));
    for position in layout.leg_positions {
        commands.spawn((
            Mesh3d(leg.clone()),
            MeshMaterial3d(materials.legs.clone()),
            Transform::from_translation(position),
        ));
    }

    // Short struts leaning inwards from the frame to just inside the membrane edge.
    let spring_length = 0.25;
    let spring = meshes.add(Cylinder::new(0.015, spring_length));
    let ring = layout.pad_radius - spring_length / 2.0;
    for i in 0..SPRING_COUNT {
        let angle = TAU * i as f32 / SPRING_COUNT as f32;
        let radial = Vec3::new(angle.cos(), 0.0, angle.sin());
        commands.spawn((
            Mesh3d(spring.clone()),
            MeshMaterial3d(materials.springs.clone()),
            Transform::from_translation(layout.pad_center + radial * ring)
                .with_rotation(Quat::from_rotation_arc(Vec3::Y, radial)),
        ));
    }
}

pub fn spawn_character_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    materials: Res<SceneMaterials>,
    config: Res<SceneConfig>,
) {
    let layout = &config.0.scene;
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(layout.character_radius).mesh().uv(32, 18))),
        MeshMaterial3d(materials.character.clone()),
        Transform::from_translation(layout.character_spawn),
        CharacterAvatar,
    ));
}

pub fn sync_character_system(
    simulation: Res<SceneSimulation>,
    mut avatars: Query<&mut Transform, With<CharacterAvatar>>,
) {
    let Ok((position, rotation)) = simulation.character_transform() else {
        return;
    };
    for mut transform in avatars.iter_mut() {
        transform.translation = position;
        transform.rotation = rotation;
    }
}
