//! Selection Highlight System
//!
//! Draws the selection outline as a gizmo box whose opacity pulses over time.

use bevy::prelude::*;

use crate::level_editor::selection::outline_opacity;
use crate::level_editor::session::EditorSession;

pub fn selection_highlight_system(
    session: Res<EditorSession>,
    time: Res<Time>,
    mut gizmos: Gizmos,
) {
    let Some(outline) = session.selection().outline() else {
        return;
    };

    let color = Color::srgba(0.0, 1.0, 1.0, outline_opacity(time.elapsed_secs()));
    gizmos.cube(
        Transform::from_translation(outline.center).with_scale(outline.size),
        color,
    );
}
