//! Level Editor UI Module
//!
//! This module contains egui-based UI panels for the level editor.
//!
//! # Panel Layout
//!
//! ```text
//! +--------------------------------------------------+
//! | Menu Bar                                         |
//! +------------+---------------------+---------------+
//! | Palette    |                     | Properties    |
//! | + Level    |    3D Viewport      | Panel         |
//! | Settings   |                     | (Right)       |
//! | (Left)     |                     |               |
//! +------------+---------------------+---------------+
//! ```

pub mod menu_bar;
pub mod palette_panel;
pub mod properties_panel;

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass};

use crate::level_editor::save::{ActiveLevelStore, LevelIoRequest, SaveStatus};
use crate::level_editor::session::EditorSession;
use crate::level_editor::systems::EditorGridSettings;

use menu_bar::{editor_menu_bar, MenuBarState};
use palette_panel::editor_palette_panel;
use properties_panel::{editor_properties_panel, PendingPropertyEdits};

/// Plugin for the level editor UI systems
pub struct EditorUiPlugin;

impl Plugin for EditorUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingPropertyEdits>()
            .init_resource::<MenuBarState>()
            .add_systems(
                EguiPrimaryContextPass,
                editor_ui_system
                    .run_if(resource_exists::<EditorSession>)
                    .run_if(resource_exists::<ActiveLevelStore>),
            );
    }
}

/// Draws every editor panel. The menu bar goes first so the side panels fit below it.
pub fn editor_ui_system(
    mut contexts: EguiContexts,
    mut session: ResMut<EditorSession>,
    mut pending_edits: ResMut<PendingPropertyEdits>,
    mut menu_state: ResMut<MenuBarState>,
    mut grid_settings: ResMut<EditorGridSettings>,
    save_status: Res<SaveStatus>,
    store: Res<ActiveLevelStore>,
    mut level_requests: MessageWriter<LevelIoRequest>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    editor_menu_bar(
        ctx,
        &mut session,
        &mut menu_state,
        &mut grid_settings,
        &save_status,
        &store,
        &mut level_requests,
    );
    editor_palette_panel(ctx, &mut session);
    editor_properties_panel(ctx, &mut session, &mut pending_edits);
}
