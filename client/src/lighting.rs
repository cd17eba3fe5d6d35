use bevy::prelude::*;

#[derive(Component)]
pub struct Sun;

/// Where the sun sits at `t` seconds. Decorative only.
pub fn sun_position(t: f32) -> Vec3 {
    Vec3::new(10.0 + (t * 0.05).sin() * 2.0, 10.0, 10.0 + (t * 0.05).cos() * 2.0)
}

pub fn spawn_lights_system(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
        ..default()
    });
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(sun_position(0.0)).looking_at(Vec3::ZERO, Vec3::Y),
        Sun,
    ));
}

pub fn drift_sun_system(time: Res<Time>, mut suns: Query<&mut Transform, With<Sun>>) {
    let position = sun_position(time.elapsed_secs());
    for mut transform in suns.iter_mut() {
        *transform = Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y);
    }
}
