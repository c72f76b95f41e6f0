//! Pointer Input System
//!
//! Converts the cursor into a camera ray every frame and feeds it to the session.
//! Presses are ignored while the pointer is over an egui panel; releases always reach
//! the session so a drag cannot get stuck when it ends over a panel.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::level_editor::components::EditorCamera;
use crate::level_editor::session::EditorSession;

pub fn pointer_input_system(
    mut session: ResMut<EditorSession>,
    mouse_input: Res<ButtonInput<MouseButton>>,
    query_window: Query<&Window, With<PrimaryWindow>>,
    query_camera: Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
) {
    let Ok(window) = query_window.single() else {
        return;
    };
    let Some(cursor_position) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = query_camera.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_position) else {
        return;
    };

    session.pointer_move(ray);

    if mouse_input.just_pressed(MouseButton::Left) {
        session.pointer_down(ray);
    }
}

pub fn pointer_release_system(
    mut session: ResMut<EditorSession>,
    mouse_input: Res<ButtonInput<MouseButton>>,
) {
    if mouse_input.just_released(MouseButton::Left) && session.is_dragging() {
        session.pointer_up();
    }
}
