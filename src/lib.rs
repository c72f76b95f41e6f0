#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]

use std::path::{Path, PathBuf};

use bevy::{
    prelude::{
        default, App, Camera3d, ClearColor, Color, Commands, DirectionalLight, PluginGroup,
        Startup, Transform, Vec3, Window,
    },
    window::WindowPlugin,
};
use serde::Deserialize;

pub mod level_editor;

use level_editor::{
    prototypes::registry,
    save::{ActiveLevelStore, FileLevelStore, LevelIoRequest},
    systems::{EditorGridSettings, OrbitCameraSettings},
    EditorCamera, EditorSession, LevelEditorPlugin,
};

#[derive(Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub undo_capacity: usize,
    pub duplicate_offset: [f32; 3],
    pub show_grid: bool,
    pub grid_extent: i32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_capacity: level_editor::history::DEFAULT_UNDO_CAPACITY,
            duplicate_offset: [1.0, 0.0, 1.0],
            show_grid: true,
            grid_extent: 50,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub levels_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let levels_dir = directories::ProjectDirs::from("com", "playfield", "playfield-editor")
            .map(|dirs| dirs.data_dir().join("levels"))
            .unwrap_or_else(|| PathBuf::from("levels"));
        Self { levels_dir }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f32,
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub rotate_sensitivity: f32,
    pub zoom_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 25.0,
            yaw_degrees: 45.0,
            pitch_degrees: 40.0,
            rotate_sensitivity: 0.005,
            zoom_sensitivity: 0.1,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub editor: EditorConfig,
    pub storage: StorageConfig,
    pub camera: CameraConfig,
    pub log: LogConfig,
}

pub fn load_config(path: &Path) -> Config {
    let toml_str = match std::fs::read_to_string(path) {
        Ok(toml_str) => toml_str,
        Err(error) => {
            println!(
                "Failed to load configuration from {} with error: {}",
                path.to_string_lossy(),
                error
            );
            return Config::default();
        }
    };

    match toml::from_str(&toml_str) {
        Ok(config) => {
            println!("Read configuration from {}", path.to_string_lossy());
            config
        }
        Err(error) => {
            println!(
                "Failed to load configuration from {} with error: {}",
                path.to_string_lossy(),
                error
            );
            Config::default()
        }
    }
}

/// Run the level editor
///
/// Opens `level_id` from the configured levels directory, or starts an empty level
/// under that id when nothing is stored yet.
pub fn run_level_editor(config: &Config, level_id: &str) {
    let log_level = config
        .log
        .level
        .parse::<bevy::log::Level>()
        .unwrap_or(bevy::log::Level::INFO);

    let mut app = App::new();
    app.add_plugins(
        bevy::prelude::DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "playfield-editor".to_string(),
                    ..default()
                }),
                ..default()
            })
            .set(bevy::log::LogPlugin {
                level: log_level,
                filter: "wgpu=error,naga=error,offset_allocator=warn".to_string(),
                ..default()
            }),
    );
    app.add_plugins(bevy_egui::EguiPlugin::default());

    let duplicate_offset = Vec3::from_array(config.editor.duplicate_offset);
    app.insert_resource(EditorSession::new(
        registry(),
        config.editor.undo_capacity,
        duplicate_offset,
        level_id,
    ))
    .insert_resource(ActiveLevelStore(Box::new(FileLevelStore::new(
        config.storage.levels_dir.clone(),
    ))))
    .insert_resource(ClearColor(Color::srgb(0.53, 0.81, 0.92)));

    app.add_plugins(LevelEditorPlugin);

    app.insert_resource(EditorGridSettings {
        visible: config.editor.show_grid,
        extent: config.editor.grid_extent.max(1),
        ..default()
    })
    .insert_resource(OrbitCameraSettings {
        rotate_sensitivity: config.camera.rotate_sensitivity,
        zoom_sensitivity: config.camera.zoom_sensitivity,
    });

    let camera = EditorCamera {
        focus: Vec3::ZERO,
        yaw: config.camera.yaw_degrees.to_radians(),
        pitch: config
            .camera
            .pitch_degrees
            .to_radians()
            .clamp(EditorCamera::MIN_PITCH, EditorCamera::MAX_PITCH),
        distance: config
            .camera
            .distance
            .clamp(EditorCamera::MIN_DISTANCE, EditorCamera::MAX_DISTANCE),
    };
    app.add_systems(Startup, move |mut commands: Commands| {
        commands.spawn((Camera3d::default(), camera.transform(), camera.clone()));
        commands.spawn((
            DirectionalLight {
                illuminance: 8000.0,
                shadows_enabled: true,
                ..default()
            },
            Transform::from_xyz(8.0, 16.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
        ));
    });

    log::info!(
        "[LevelEditor] Levels directory: {}",
        config.storage.levels_dir.to_string_lossy()
    );
    app.world_mut()
        .write_message(LevelIoRequest::Load(level_id.to_string()));

    app.run();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_sections_default_when_missing() {
        let config: Config = toml::from_str(
            r#"
            [editor]
            undo_capacity = 10

            [log]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.editor.undo_capacity, 10);
        assert_eq!(config.editor.duplicate_offset, [1.0, 0.0, 1.0]);
        assert!(config.editor.show_grid);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.camera.distance, 25.0);
    }

    #[test]
    fn test_load_config_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();

        let missing = load_config(&dir.path().join("missing.toml"));
        assert_eq!(missing.editor.undo_capacity, 50);

        let malformed_path = dir.path().join("malformed.toml");
        std::fs::write(&malformed_path, "editor = [").unwrap();
        let malformed = load_config(&malformed_path);
        assert_eq!(malformed.editor.grid_extent, 50);

        let valid_path = dir.path().join("valid.toml");
        std::fs::write(&valid_path, "[storage]\nlevels_dir = \"/tmp/levels\"\n").unwrap();
        let valid = load_config(&valid_path);
        assert_eq!(valid.storage.levels_dir, PathBuf::from("/tmp/levels"));
    }
}
