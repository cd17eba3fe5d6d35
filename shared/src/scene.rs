//! The fixed collider set: ground, trampoline pad, four legs and the character.

use bevy::math::Vec3;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;
use crate::physics::{BodyDesc, BodyId, BodyShape, ContactMaterial, PhysicsWorld};
use crate::{
    CHARACTER_MASS, CHARACTER_RADIUS, CHARACTER_SPAWN, LEG_HEIGHT, LEG_POSITIONS, LEG_RADIUS,
    TRAMPOLINE_CENTER, TRAMPOLINE_HEIGHT, TRAMPOLINE_RADIUS,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneLayout {
    pub ground_material: ContactMaterial,
    pub pad_center: Vec3,
    pub pad_radius: f32,
    pub pad_height: f32,
    pub pad_material: ContactMaterial,
    pub leg_radius: f32,
    pub leg_height: f32,
    pub leg_positions: [Vec3; 4],
    pub character_radius: f32,
    pub character_mass: f32,
    pub character_spawn: Vec3,
    pub character_material: ContactMaterial,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            ground_material: ContactMaterial::new(0.9, 0.1),
            pad_center: TRAMPOLINE_CENTER,
            pad_radius: TRAMPOLINE_RADIUS,
            pad_height: TRAMPOLINE_HEIGHT,
            pad_material: ContactMaterial::new(0.1, 1.4),
            leg_radius: LEG_RADIUS,
            leg_height: LEG_HEIGHT,
            leg_positions: LEG_POSITIONS,
            character_radius: CHARACTER_RADIUS,
            character_mass: CHARACTER_MASS,
            character_spawn: CHARACTER_SPAWN,
            character_material: ContactMaterial::new(0.1, 0.3),
        }
    }
}

impl SceneLayout {
    /// Body descriptions in insertion order: ground, pad, legs, character.
    pub fn bodies(&self) -> Vec<BodyDesc> {
        let mut bodies = vec![
            BodyDesc::fixed("ground", BodyShape::Plane, Vec3::ZERO)
                .with_material(self.ground_material),
            BodyDesc::fixed(
                "trampoline",
                BodyShape::cylinder(self.pad_radius, self.pad_height),
                self.pad_center,
            )
            .with_material(self.pad_material),
        ];
        // Legs carry no material, so every contact with them uses the world default.
        bodies.extend(self.leg_positions.iter().map(|position| {
            BodyDesc::fixed(
                "leg",
                BodyShape::cylinder(self.leg_radius, self.leg_height),
                *position,
            )
        }));
        bodies.push(
            BodyDesc::dynamic(
                "character",
                BodyShape::sphere(self.character_radius),
                self.character_mass,
                self.character_spawn,
            )
            .with_material(self.character_material),
        );
        bodies
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneBodies {
    pub ground: BodyId,
    pub pad: BodyId,
    pub legs: [BodyId; 4],
    pub character: BodyId,
}

/// Validates the whole layout before inserting anything, so a bad body never
/// leaves the world half built.
pub fn build_scene(
    world: &mut PhysicsWorld,
    layout: &SceneLayout,
) -> Result<SceneBodies, PhysicsError> {
    let descs = layout.bodies();
    for desc in &descs {
        desc.validate()?;
    }

    let ids = descs
        .iter()
        .map(|desc| world.add_body(desc))
        .collect::<Result<Vec<_>, _>>()?;

    info!("Scene assembled with {} bodies", ids.len());
    Ok(SceneBodies {
        ground: ids[0],
        pad: ids[1],
        legs: [ids[2], ids[3], ids[4], ids[5]],
        character: ids[6],
    })
}
