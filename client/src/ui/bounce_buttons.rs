use bevy::prelude::*;
use shared::players::BouncePreset;
use shared::SceneSimulation;

use super::style::*;

#[derive(Component)]
pub struct BounceButton(pub BouncePreset);

const CONTROLS_HINT: &str = "Arrows / WASD to move, Space to bounce, 1-4 to pick a preset";

pub fn spawn_bounce_buttons_system(mut commands: Commands) {
    commands.spawn(panel_style()).with_children(|panel| {
        for preset in BouncePreset::ALL {
            panel
                .spawn((
                    Button,
                    preset_button_style(),
                    BackgroundColor(NORMAL_BUTTON),
                    BounceButton(preset),
                ))
                .with_children(|button| {
                    button.spawn((
                        Text::new(preset.label()),
                        text_font(BUTTON_FONT_SIZE),
                        TextColor(TEXT_COLOR),
                    ));
                });
        }
        panel.spawn((
            Text::new(CONTROLS_HINT),
            text_font(HINT_FONT_SIZE),
            TextColor(SECONDARY_TEXT_COLOR),
        ));
    });
}

pub fn bounce_button_system(
    interaction_query: Query<(&Interaction, &BounceButton), (Changed<Interaction>, With<Button>)>,
    mut simulation: ResMut<SceneSimulation>,
) {
    for (interaction, button) in interaction_query.iter() {
        if *interaction == Interaction::Pressed {
            simulation.set_bounce_preset(button.0);
        }
    }
}

/// Highlights the active preset, whether it came from a click or a number key.
pub fn button_color_system(
    simulation: Res<SceneSimulation>,
    mut buttons: Query<(&Interaction, &BounceButton, &mut BackgroundColor)>,
) {
    let selected = simulation.bounce_preset();
    for (interaction, button, mut color) in buttons.iter_mut() {
        *color = if button.0 == selected {
            SELECTED_BUTTON.into()
        } else if *interaction == Interaction::Hovered {
            HOVERED_BUTTON.into()
        } else {
            NORMAL_BUTTON.into()
        };
    }
}
