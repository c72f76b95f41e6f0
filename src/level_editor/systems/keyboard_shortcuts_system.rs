//! Keyboard Shortcuts System for the Level Editor
//!
//! - Delete / Backspace: Delete the selected object
//! - Ctrl+D: Duplicate the selected object
//! - Ctrl+Z: Undo the last add or remove
//! - Escape: Leave the placement tool and clear the selection
//! - Ctrl+S: Save the level

use bevy::prelude::*;

use crate::level_editor::save::save_system::LevelIoRequest;
use crate::level_editor::session::{EditorKey, EditorSession};

pub fn keyboard_shortcuts_system(
    mut session: ResMut<EditorSession>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut level_requests: MessageWriter<LevelIoRequest>,
) {
    let ctrl = is_ctrl_pressed(&keyboard);

    if keyboard.just_pressed(KeyCode::Escape) {
        session.handle_key(EditorKey::Escape);
    }

    if keyboard.just_pressed(KeyCode::Delete) || keyboard.just_pressed(KeyCode::Backspace) {
        session.handle_key(EditorKey::Delete);
    }

    if ctrl && keyboard.just_pressed(KeyCode::KeyD) {
        session.handle_key(EditorKey::Duplicate);
    }

    if ctrl && keyboard.just_pressed(KeyCode::KeyZ) {
        session.handle_key(EditorKey::Undo);
    }

    if ctrl && keyboard.just_pressed(KeyCode::KeyS) {
        level_requests.write(LevelIoRequest::Save);
    }
}

/// Ctrl on either side, or Cmd on macOS
fn is_ctrl_pressed(keyboard: &ButtonInput<KeyCode>) -> bool {
    keyboard.any_pressed([
        KeyCode::ControlLeft,
        KeyCode::ControlRight,
        KeyCode::SuperLeft,
        KeyCode::SuperRight,
    ])
}
