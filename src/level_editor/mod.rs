//! Level Editor Module
//!
//! This module provides an in-browser style 3D level editor for a platformer game.
//! Authors place prototype objects on a grid, select and drag them, edit their
//! properties, undo additions and removals, and save the level as a JSON document
//! that the playback engine reads.
//!
//! # Architecture
//!
//! The engine-agnostic core:
//!
//! - `prototypes`: Static catalog of placeable object kinds
//! - `visual`: Arena of visual nodes the viewport mirrors
//! - `placement`: Placed objects, grid snapping, and the bounded undo history
//! - `spatial_query`: Ray picking against objects and the ground plane
//! - `selection`: Single selection, pulsing outline, and drag grab offsets
//! - `property_panel`: Field bindings and parsing of edited values
//! - `session`: The Idle / Placing / Dragging tool state machine
//! - `save`: Level document codec and storage
//!
//! The Bevy side:
//!
//! - `components`: Components for spawned visuals and the editor camera
//! - `systems`: Input, visual sync, highlight, grid, idle motion, and camera systems
//! - `ui`: egui panels (menu bar, palette, properties)

pub mod components;
pub mod error;
pub mod history;
pub mod placement;
pub mod property_panel;
pub mod prototypes;
pub mod save;
pub mod selection;
pub mod session;
pub mod spatial_query;
pub mod systems;
pub mod ui;
pub mod visual;

pub use components::{EditorCamera, EditorVisual};
pub use error::EditorError;
pub use placement::{ObjectId, PlacedObject, PlacementEngine};
pub use prototypes::{registry, Prototype, PrototypeRegistry};
pub use save::{ActiveLevelStore, FileLevelStore, LevelDocument, LevelIoRequest, SaveStatus};
pub use session::{EditorKey, EditorSession, ToolState};

use bevy::prelude::*;
use bevy_egui::input::{egui_wants_any_keyboard_input, egui_wants_any_pointer_input};

use save::save_system::level_io_system;
use systems::{
    grid_render_system, idle_motion_system, keyboard_shortcuts_system, orbit_camera_system,
    pointer_input_system, pointer_release_system, selection_highlight_system, sky_color_system,
    visual_sync_system, EditorGridSettings, OrbitCameraSettings, SpawnedVisuals,
};
use ui::EditorUiPlugin;

/// Plugin for the level editor
///
/// Expects an `EditorSession` and an `ActiveLevelStore` resource to be inserted by the
/// application.
pub struct LevelEditorPlugin;

impl Plugin for LevelEditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpawnedVisuals>()
            .init_resource::<SaveStatus>()
            .init_resource::<EditorGridSettings>()
            .init_resource::<OrbitCameraSettings>()
            .add_message::<LevelIoRequest>();

        app.add_systems(
            Update,
            (
                orbit_camera_system.run_if(not(egui_wants_any_pointer_input)),
                pointer_input_system.run_if(not(egui_wants_any_pointer_input)),
                pointer_release_system,
                keyboard_shortcuts_system.run_if(not(egui_wants_any_keyboard_input)),
                level_io_system,
            )
                .chain()
                .run_if(resource_exists::<EditorSession>),
        );

        app.add_systems(
            Update,
            (
                visual_sync_system,
                idle_motion_system,
                selection_highlight_system,
                grid_render_system,
                sky_color_system,
            )
                .chain()
                .after(level_io_system)
                .run_if(resource_exists::<EditorSession>),
        );

        app.add_plugins(EditorUiPlugin);

        log::info!("[LevelEditorPlugin] Level editor plugin initialized");
    }
}
