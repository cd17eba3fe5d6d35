use bevy::prelude::*;
use shared::world::InstanceTransform;
use shared::SceneSimulation;

use super::materials::SceneMaterials;

/// Index of the blade in the simulation's vegetation buffer.
#[derive(Component)]
pub struct GrassBlade(pub usize);

fn blade_transform(instance: &InstanceTransform) -> Transform {
    Transform {
        translation: instance.translation,
        rotation: instance.rotation,
        scale: instance.scale,
    }
}

/// Spawns one entity per blade, all sharing a single mesh and material handle.
///
/// Bevy's automatic batching merges entities with identical mesh and material
/// into one instanced draw, so the blades go to the GPU as a single submission.
/// `sway_grass_system` copies the shared transform buffer onto them each frame.
pub fn spawn_grass_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    materials: Res<SceneMaterials>,
    simulation: Res<SceneSimulation>,
) {
    // Unit cone standing on the ground; instance scale sets width and height.
    let blade = meshes.add(Mesh::from(Cone::new(0.5, 1.0)).translated_by(Vec3::Y * 0.5));

    let blades: Vec<_> = simulation
        .vegetation()
        .transforms()
        .iter()
        .enumerate()
        .map(|(index, instance)| {
            (
                Mesh3d(blade.clone()),
                MeshMaterial3d(materials.grass.clone()),
                blade_transform(instance),
                GrassBlade(index),
            )
        })
        .collect();
    info!("Spawning {} grass blades", blades.len());
    commands.spawn_batch(blades);
}

pub fn sway_grass_system(
    simulation: Res<SceneSimulation>,
    mut blades: Query<(&GrassBlade, &mut Transform)>,
) {
    let transforms = simulation.vegetation().transforms();
    for (blade, mut transform) in blades.iter_mut() {
        if let Some(instance) = transforms.get(blade.0) {
            *transform = blade_transform(instance);
        }
    }
}
