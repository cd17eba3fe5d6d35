use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use bevy::input::ButtonInput;
use bevy::prelude::*;
use ron::from_str;
use shared::SceneSimulation;

use super::data::{GameAction, MOVE_ACTIONS, PRESET_ACTIONS};
use super::KeyMap;

pub fn is_action_pressed(
    action: GameAction,
    keyboard_input: &ButtonInput<KeyCode>,
    key_map: &KeyMap,
) -> bool {
    if let Some(key_codes) = key_map.map.get(&action) {
        for key_code in key_codes {
            if keyboard_input.pressed(*key_code) {
                return true;
            }
        }
    }
    false
}

pub fn is_action_just_pressed(
    action: GameAction,
    keyboard_input: &ButtonInput<KeyCode>,
    key_map: &KeyMap,
) -> bool {
    if let Some(key_codes) = key_map.map.get(&action) {
        for key_code in key_codes {
            if keyboard_input.just_pressed(*key_code) {
                return true;
            }
        }
    }
    false
}

pub(crate) fn default_key_map() -> BTreeMap<GameAction, Vec<KeyCode>> {
    let mut map = BTreeMap::new();
    map.insert(GameAction::MoveForward, vec![KeyCode::KeyW, KeyCode::ArrowUp]);
    map.insert(
        GameAction::MoveBackward,
        vec![KeyCode::KeyS, KeyCode::ArrowDown],
    );
    map.insert(GameAction::MoveLeft, vec![KeyCode::KeyA, KeyCode::ArrowLeft]);
    map.insert(
        GameAction::MoveRight,
        vec![KeyCode::KeyD, KeyCode::ArrowRight],
    );
    map.insert(GameAction::Jump, vec![KeyCode::Space]);
    map.insert(GameAction::SmallBounce, vec![KeyCode::Digit1]);
    map.insert(GameAction::MediumBounce, vec![KeyCode::Digit2]);
    map.insert(GameAction::BigBounce, vec![KeyCode::Digit3]);
    map.insert(GameAction::ExtremeBounce, vec![KeyCode::Digit4]);
    map
}

/// Reads key bindings from a RON file, keeping the defaults when it is missing or malformed.
pub fn get_bindings(binds_path: Option<&Path>) -> KeyMap {
    let Some(binds_path) = binds_path else {
        return KeyMap::default();
    };

    match fs::read_to_string(binds_path) {
        Ok(content) => match from_str::<KeyMap>(&content) {
            Ok(key_map) => {
                info!("Loaded key bindings from {:?}", binds_path);
                key_map
            }
            Err(e) => {
                error!("Invalid key bindings in {:?}: {}", binds_path, e);
                KeyMap::default()
            }
        },
        Err(e) => {
            warn!("Could not read key bindings at {:?}: {}", binds_path, e);
            KeyMap::default()
        }
    }
}

/// Copies this frame's keyboard state into the simulation input.
///
/// Directions are level-triggered; jump and the preset keys fire on the press edge.
pub fn sample_keyboard_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    key_map: Res<KeyMap>,
    mut simulation: ResMut<SceneSimulation>,
) {
    let input = simulation.input_mut();
    for (action, key) in MOVE_ACTIONS {
        input.set_held(key, is_action_pressed(action, &keyboard_input, &key_map));
    }
    if is_action_just_pressed(GameAction::Jump, &keyboard_input, &key_map) {
        input.request_jump();
    }

    for (action, preset) in PRESET_ACTIONS {
        if is_action_just_pressed(action, &keyboard_input, &key_map) {
            simulation.set_bounce_preset(preset);
        }
    }
}
