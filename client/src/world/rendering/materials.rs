use bevy::prelude::*;

#[derive(Resource)]
pub struct SceneMaterials {
    pub ground: Handle<StandardMaterial>,
    pub membrane: Handle<StandardMaterial>,
    pub frame: Handle<StandardMaterial>,
    pub legs: Handle<StandardMaterial>,
    pub springs: Handle<StandardMaterial>,
    pub character: Handle<StandardMaterial>,
    pub grass: Handle<StandardMaterial>,
}

pub fn setup_materials_system(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut solid = |color: Color, roughness: f32, metallic: f32| {
        materials.add(StandardMaterial {
            base_color: color,
            perceptual_roughness: roughness,
            metallic,
            ..default()
        })
    };

    let ground = solid(Color::srgb(0.24, 0.48, 0.18), 0.9, 0.0);
    let frame = solid(Color::srgb(0.2, 0.2, 0.25), 0.4, 0.8);
    let legs = solid(Color::srgb(0.3, 0.3, 0.35), 0.5, 0.7);
    let springs = solid(Color::srgb(0.75, 0.75, 0.8), 0.3, 0.9);
    let character = solid(Color::srgb(0.9, 0.35, 0.2), 0.6, 0.0);

    let membrane = materials.add(StandardMaterial {
        base_color: Color::srgb(0.08, 0.1, 0.16),
        perceptual_roughness: 0.8,
        cull_mode: None,
        double_sided: true,
        ..default()
    });
    let grass = materials.add(StandardMaterial {
        base_color: Color::srgb(0.3, 0.6, 0.2),
        perceptual_roughness: 1.0,
        cull_mode: None,
        ..default()
    });

    commands.insert_resource(SceneMaterials {
        ground,
        membrane,
        frame,
        legs,
        springs,
        character,
        grass,
    });
}
