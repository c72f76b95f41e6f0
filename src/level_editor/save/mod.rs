//! Level Editor Save System
//!
//! This module provides the portable level document and the transport that stores it.
//!
//! # Architecture
//!
//! - `level_format`: The level document shared with the playback engine, plus the codec
//!   between live placed objects and plain records
//! - `level_store`: Where documents are kept, keyed by level id
//! - `save_system`: Bevy resources and the system that saves and loads the session

pub mod level_format;
pub mod level_store;
pub mod save_system;

pub use level_format::{
    deserialize, serialize, GameSettings, LevelDocument, ObjectRecord, WinCondition,
    LEVEL_FORMAT_VERSION,
};
pub use level_store::{FileLevelStore, LevelStore, LevelStoreError};
pub use save_system::{ActiveLevelStore, LevelIoRequest, SaveStatus};
