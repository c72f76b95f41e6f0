//! Level Editor Systems
//!
//! This module contains the Bevy systems that connect the editor session to input,
//! the viewport, and gizmo drawing.

pub mod grid_system;
pub mod idle_motion_system;
pub mod keyboard_shortcuts_system;
pub mod orbit_camera_system;
pub mod pointer_input_system;
pub mod selection_highlight_system;
pub mod sky_color_system;
pub mod visual_sync_system;

pub use grid_system::{grid_render_system, EditorGridSettings};
pub use idle_motion_system::idle_motion_system;
pub use keyboard_shortcuts_system::keyboard_shortcuts_system;
pub use orbit_camera_system::{orbit_camera_system, OrbitCameraSettings};
pub use pointer_input_system::{pointer_input_system, pointer_release_system};
pub use selection_highlight_system::selection_highlight_system;
pub use sky_color_system::sky_color_system;
pub use visual_sync_system::{visual_sync_system, SpawnedVisuals};
