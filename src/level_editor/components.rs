//! Level Editor Components
//!
//! Marker and state components for entities the editor spawns.

use bevy::prelude::*;

use crate::level_editor::visual::VisualId;

/// Root entity mirroring one visual from the session's visual arena
#[derive(Component, Debug)]
pub struct EditorVisual {
    pub id: VisualId,
}

/// Child of an `EditorVisual` root that carries the parts.
///
/// Cosmetic animation moves the pivot so the root transform stays equal to the record.
#[derive(Component, Debug)]
pub struct VisualPivot;

/// Idle bob and spin for collectibles
#[derive(Component, Debug)]
pub struct IdleMotion {
    pub phase: f32,
}

/// Orbit camera looking at `focus`
#[derive(Component, Debug, Clone)]
pub struct EditorCamera {
    pub focus: Vec3,
    /// Radians around +Y
    pub yaw: f32,
    /// Radians above the horizon
    pub pitch: f32,
    pub distance: f32,
}

impl EditorCamera {
    pub const MIN_DISTANCE: f32 = 3.0;
    pub const MAX_DISTANCE: f32 = 120.0;
    pub const MIN_PITCH: f32 = 0.05;
    pub const MAX_PITCH: f32 = 1.5;

    pub fn transform(&self) -> Transform {
        let offset = Vec3::new(
            self.distance * self.pitch.cos() * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            self.distance * self.pitch.cos() * self.yaw.cos(),
        );
        Transform::from_translation(self.focus + offset).looking_at(self.focus, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_orbits_at_distance() {
        let camera = EditorCamera {
            focus: Vec3::new(1.0, 0.0, 1.0),
            yaw: 0.7,
            pitch: 0.6,
            distance: 20.0,
        };
        let transform = camera.transform();
        assert!((transform.translation.distance(camera.focus) - 20.0).abs() < 1e-3);
        assert!(transform.translation.y > 0.0);
        let forward = *transform.forward();
        let to_focus = (camera.focus - transform.translation).normalize();
        assert!(forward.dot(to_focus) > 0.999);
    }
}
