use bevy::{
    prelude::*,
    render::mesh::{Indices, PrimitiveTopology},
    render::view::NoFrustumCulling,
};
use shared::world::SurfaceMesh;
use shared::SceneSimulation;

use super::materials::SceneMaterials;
use crate::simulation::SceneConfig;

/// The deformable membrane drawn on top of the trampoline pad.
#[derive(Component)]
pub struct TrampolineMembrane;

fn membrane_mesh(surface: &SurfaceMesh) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, Default::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, surface.positions.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, surface.normals.clone());
    mesh.insert_indices(Indices::U32(surface.indices.clone()));
    mesh
}

pub fn spawn_membrane_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    materials: Res<SceneMaterials>,
    simulation: Res<SceneSimulation>,
    config: Res<SceneConfig>,
) {
    let layout = &config.0.scene;
    let top = layout.pad_center + Vec3::Y * layout.pad_height / 2.0;
    commands.spawn((
        Mesh3d(meshes.add(membrane_mesh(simulation.surface().mesh()))),
        MeshMaterial3d(materials.membrane.clone()),
        Transform::from_translation(top),
        // Bounds are computed once from the t = 0 mesh and go stale as it ripples.
        NoFrustumCulling,
        TrampolineMembrane,
    ));
}

/// Uploads this frame's vertex heights and normals. Indices never change.
pub fn update_membrane_system(
    simulation: Res<SceneSimulation>,
    mut meshes: ResMut<Assets<Mesh>>,
    membranes: Query<&Mesh3d, With<TrampolineMembrane>>,
) {
    let surface = simulation.surface();
    for handle in membranes.iter() {
        let Some(mesh) = meshes.get_mut(&handle.0) else {
            debug!("Membrane mesh not loaded yet");
            continue;
        };
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, surface.positions().to_vec());
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, surface.normals().to_vec());
    }
}
