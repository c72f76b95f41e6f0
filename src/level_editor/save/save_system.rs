//! Save System for the Level Editor
//!
//! Bevy resources and the system that move level documents between the session and
//! the active level store.

use bevy::prelude::*;

use crate::level_editor::session::EditorSession;

use super::level_store::{LevelStore, LevelStoreError};

/// Request to save, load, or start a level
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum LevelIoRequest {
    /// Save the session under its current level id
    Save,
    /// Discard the session and load the stored level with this id
    Load(String),
    /// Discard the session and start an empty level with this id
    New(String),
}

/// The store levels are saved to
#[derive(Resource)]
pub struct ActiveLevelStore(pub Box<dyn LevelStore + Send + Sync>);

/// Outcome of the last level operation, shown in the menu bar
#[derive(Resource, Default, Debug, Clone)]
pub struct SaveStatus {
    pub message: String,
    pub failed: bool,
}

impl SaveStatus {
    pub fn set_ok(&mut self, message: String) {
        self.message = message;
        self.failed = false;
    }

    pub fn set_failed(&mut self, message: String) {
        log::warn!("[LevelStore] {}", message);
        self.message = message;
        self.failed = true;
    }
}

pub fn level_io_system(
    mut requests: MessageReader<LevelIoRequest>,
    mut session: ResMut<EditorSession>,
    store: Res<ActiveLevelStore>,
    mut status: ResMut<SaveStatus>,
) {
    for request in requests.read() {
        match request {
            LevelIoRequest::Save => {
                let level_id = session.level_id().to_string();
                match store.0.save(&level_id, &session.to_document()) {
                    Ok(()) => {
                        session.mark_saved();
                        status.set_ok(format!("Saved '{}'", level_id));
                    }
                    Err(error) => status.set_failed(format!("Save failed: {}", error)),
                }
            }
            LevelIoRequest::Load(level_id) => match store.0.load(level_id) {
                Ok(document) => {
                    let loaded = session.load_document(level_id, document);
                    status.set_ok(format!("Loaded '{}' ({} objects)", level_id, loaded));
                }
                Err(LevelStoreError::NotFound(_)) => {
                    session.new_level(level_id);
                    status.set_ok(format!("New level '{}'", level_id));
                }
                Err(error) => status.set_failed(format!("Load failed: {}", error)),
            },
            LevelIoRequest::New(level_id) => {
                session.new_level(level_id);
                status.set_ok(format!("New level '{}'", level_id));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level_editor::prototypes::registry;
    use crate::level_editor::save::FileLevelStore;

    fn app(dir: &std::path::Path) -> App {
        let mut session = EditorSession::new(registry(), 50, Vec3::new(1.0, 0.0, 1.0), "meadow");
        session.select_tool("coin").unwrap();
        session.pointer_down(Ray3d::new(Vec3::new(2.0, 10.0, 3.0), Dir3::NEG_Y));

        let mut app = App::new();
        app.add_message::<LevelIoRequest>()
            .insert_resource(session)
            .insert_resource(ActiveLevelStore(Box::new(FileLevelStore::new(dir))))
            .init_resource::<SaveStatus>()
            .add_systems(Update, level_io_system);
        app
    }

    #[test]
    fn test_save_request_writes_level() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        assert!(app.world().resource::<EditorSession>().is_modified());

        app.world_mut().write_message(LevelIoRequest::Save);
        app.update();

        assert!(dir.path().join("meadow.json").exists());
        assert!(!app.world().resource::<EditorSession>().is_modified());
        assert!(!app.world().resource::<SaveStatus>().failed);
    }

    #[test]
    fn test_load_request_replaces_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.world_mut().write_message(LevelIoRequest::Save);
        app.update();

        app.world_mut().write_message(LevelIoRequest::New(String::from("blank")));
        app.update();
        assert!(app.world().resource::<EditorSession>().engine().is_empty());

        app.world_mut().write_message(LevelIoRequest::Load(String::from("meadow")));
        app.update();
        let session = app.world().resource::<EditorSession>();
        assert_eq!(session.level_id(), "meadow");
        assert_eq!(session.engine().len(), 1);
        assert_eq!(session.engine().objects()[0].type_id(), "coin");
    }

    #[test]
    fn test_loading_unknown_level_starts_new_one() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.world_mut().write_message(LevelIoRequest::Load(String::from("fresh")));
        app.update();

        let session = app.world().resource::<EditorSession>();
        assert_eq!(session.level_id(), "fresh");
        assert!(session.engine().is_empty());
    }
}
