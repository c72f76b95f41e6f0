//! Sky Color System
//!
//! Keeps the viewport clear color in step with the level's sky color setting.

use bevy::color::Srgba;
use bevy::prelude::*;

use crate::level_editor::session::EditorSession;

pub fn sky_color_system(session: Res<EditorSession>, mut clear_color: ResMut<ClearColor>) {
    if !session.is_changed() {
        return;
    }

    let Ok(sky) = Srgba::hex(&session.settings().sky_color) else {
        return;
    };
    let sky = Color::from(sky);
    if clear_color.0 != sky {
        clear_color.0 = sky;
    }
}
