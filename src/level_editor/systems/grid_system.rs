//! Editor Grid System
//!
//! Draws the placement grid on y = 0 with gizmos: one line per world unit, brighter
//! major lines every 10 cells, and short colored axes at the origin.

use bevy::prelude::*;

/// Grid display settings
#[derive(Resource, Debug, Clone)]
pub struct EditorGridSettings {
    pub visible: bool,
    /// Half the side length of the drawn grid, in cells
    pub extent: i32,
    pub color: Color,
    pub major_color: Color,
}

impl Default for EditorGridSettings {
    fn default() -> Self {
        Self {
            visible: true,
            extent: 50,
            color: Color::srgba(0.5, 0.5, 0.5, 0.25),
            major_color: Color::srgba(0.7, 0.7, 0.7, 0.6),
        }
    }
}

pub fn grid_render_system(grid_settings: Res<EditorGridSettings>, mut gizmos: Gizmos) {
    if !grid_settings.visible {
        return;
    }

    let extent = grid_settings.extent.max(1);
    let half = extent as f32;

    // Grid lines sit on cell edges, half a unit off the snapped centers
    for i in -extent..extent {
        let offset = i as f32 + 0.5;
        let color = if i % 10 == 0 {
            grid_settings.major_color
        } else {
            grid_settings.color
        };

        gizmos.line(
            Vec3::new(-half, 0.0, offset),
            Vec3::new(half, 0.0, offset),
            color,
        );
        gizmos.line(
            Vec3::new(offset, 0.0, -half),
            Vec3::new(offset, 0.0, half),
            color,
        );
    }

    let axis_length = 2.0;
    gizmos.line(Vec3::ZERO, Vec3::X * axis_length, Color::srgb(1.0, 0.0, 0.0));
    gizmos.line(Vec3::ZERO, Vec3::Y * axis_length, Color::srgb(0.0, 1.0, 0.0));
    gizmos.line(Vec3::ZERO, Vec3::Z * axis_length, Color::srgb(0.0, 0.0, 1.0));
}
