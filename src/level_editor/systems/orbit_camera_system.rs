//! Orbit Camera System
//!
//! Right-drag orbits the camera around its focus, the wheel zooms. Both are
//! suppressed while an object is being dragged.

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

use crate::level_editor::components::EditorCamera;
use crate::level_editor::session::EditorSession;

/// Input sensitivity for the orbit camera
#[derive(Resource, Debug, Clone)]
pub struct OrbitCameraSettings {
    /// Radians per pixel of mouse motion
    pub rotate_sensitivity: f32,
    /// Fraction of the distance per wheel step
    pub zoom_sensitivity: f32,
}

impl Default for OrbitCameraSettings {
    fn default() -> Self {
        Self {
            rotate_sensitivity: 0.005,
            zoom_sensitivity: 0.1,
        }
    }
}

pub fn orbit_camera_system(
    session: Res<EditorSession>,
    settings: Res<OrbitCameraSettings>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mut query_camera: Query<(&mut EditorCamera, &mut Transform)>,
) {
    let Ok((mut camera, mut transform)) = query_camera.single_mut() else {
        mouse_motion.clear();
        mouse_wheel.clear();
        return;
    };

    if session.is_dragging() {
        mouse_motion.clear();
        mouse_wheel.clear();
        return;
    }

    if mouse_buttons.pressed(MouseButton::Right) {
        for motion in mouse_motion.read() {
            camera.yaw -= motion.delta.x * settings.rotate_sensitivity;
            camera.pitch = (camera.pitch + motion.delta.y * settings.rotate_sensitivity)
                .clamp(EditorCamera::MIN_PITCH, EditorCamera::MAX_PITCH);
        }
    } else {
        mouse_motion.clear();
    }

    for wheel in mouse_wheel.read() {
        camera.distance = (camera.distance * (1.0 - wheel.y * settings.zoom_sensitivity))
            .clamp(EditorCamera::MIN_DISTANCE, EditorCamera::MAX_DISTANCE);
    }

    *transform = camera.transform();
}
