use bevy::prelude::*;
use bevy::ui::{AlignItems, FlexDirection, JustifyContent, Node, UiRect, Val};

// Common styles for buttons
pub const NORMAL_BUTTON: Color = Color::srgb(0.3, 0.3, 0.3);
pub const HOVERED_BUTTON: Color = Color::srgb(0.4, 0.4, 0.4);
pub const SELECTED_BUTTON: Color = Color::srgb(0.85, 0.45, 0.1);

pub const TEXT_COLOR: Color = Color::WHITE;
pub const SECONDARY_TEXT_COLOR: Color = Color::srgb(0.15, 0.15, 0.2);

pub const BUTTON_FONT_SIZE: f32 = 18.0;
pub const HINT_FONT_SIZE: f32 = 15.0;

pub fn preset_button_style() -> Node {
    Node {
        width: Val::Px(160.0),
        height: Val::Px(40.0),
        margin: UiRect::all(Val::Px(4.0)),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        ..Default::default()
    }
}

pub fn panel_style() -> Node {
    Node {
        position_type: PositionType::Absolute,
        top: Val::Px(12.0),
        left: Val::Px(12.0),
        flex_direction: FlexDirection::Column,
        align_items: AlignItems::FlexStart,
        ..Default::default()
    }
}

pub fn text_font(font_size: f32) -> TextFont {
    TextFont {
        font_size,
        ..Default::default()
    }
}
