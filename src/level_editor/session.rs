//! Editor Session
//!
//! The session ties the editor together: it owns the placement engine, the
//! selection, and the active tool, and turns pointer rays and shortcut keys into
//! calls on them.
//!
//! Tool states:
//!
//! - `Idle`: clicks select objects; pressing on the selected object starts a drag
//! - `Placing`: a ghost of the armed prototype follows the ground hit; every click
//!   places one and selects it, staying armed for the next
//! - `Dragging`: pointer moves slide the grabbed object over the grid until release
//!
//! Recoverable failures are logged and dropped, never surfaced to the user.

use bevy::math::{Ray3d, Vec3};
use bevy::prelude::Resource;

use crate::level_editor::error::EditorError;
use crate::level_editor::placement::{ObjectId, PlacementEngine, UndoOutcome};
use crate::level_editor::property_panel::{apply_property_edit, panel_for, PanelModel, PropertyField};
use crate::level_editor::prototypes::PrototypeRegistry;
use crate::level_editor::save::{deserialize, serialize, GameSettings, LevelDocument};
use crate::level_editor::selection::{DragGrab, SelectionController};
use crate::level_editor::spatial_query::{ground_hit, pick};
use crate::level_editor::visual::VisualId;

/// Editor commands bound to keyboard shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    /// Delete / Backspace
    Delete,
    /// Ctrl+D
    Duplicate,
    Escape,
    /// Ctrl+Z
    Undo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolState {
    Idle,
    Placing {
        type_id: &'static str,
        ghost: VisualId,
    },
    Dragging(DragGrab),
}

#[derive(Resource)]
pub struct EditorSession {
    engine: PlacementEngine,
    selection: SelectionController,
    tool: ToolState,
    settings: GameSettings,
    level_id: String,
    duplicate_offset: Vec3,
    modified: bool,
}

impl EditorSession {
    pub fn new(
        registry: &'static PrototypeRegistry,
        undo_capacity: usize,
        duplicate_offset: Vec3,
        level_id: impl Into<String>,
    ) -> Self {
        Self {
            engine: PlacementEngine::new(registry, undo_capacity),
            selection: SelectionController::default(),
            tool: ToolState::Idle,
            settings: GameSettings::default(),
            level_id: level_id.into(),
            duplicate_offset,
            modified: false,
        }
    }

    pub fn engine(&self) -> &PlacementEngine {
        &self.engine
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selection.selected()
    }

    pub fn tool(&self) -> &ToolState {
        &self.tool
    }

    pub fn armed_prototype(&self) -> Option<&'static str> {
        match self.tool {
            ToolState::Placing { type_id, .. } => Some(type_id),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.tool, ToolState::Dragging(_))
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Mutable level settings; marks the level modified
    pub fn settings_mut(&mut self) -> &mut GameSettings {
        self.modified = true;
        &mut self.settings
    }

    pub fn level_id(&self) -> &str {
        &self.level_id
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Arms the placement tool for `type_id`, or disarms it if it is already armed
    pub fn select_tool(&mut self, type_id: &str) -> Result<(), EditorError> {
        if self.armed_prototype() == Some(type_id) {
            self.deactivate_tool();
            return Ok(());
        }

        let prototype = self.engine.registry().resolve(type_id)?;
        self.deactivate_tool();
        let ghost = self.engine.spawn_ghost(prototype.type_id)?;
        self.selection.clear();
        self.tool = ToolState::Placing {
            type_id: prototype.type_id,
            ghost,
        };

        log::info!("[EditorSession] Placing '{}'", prototype.type_id);
        Ok(())
    }

    /// Returns to `Idle`, disposing the ghost if one is shown
    pub fn deactivate_tool(&mut self) {
        match std::mem::replace(&mut self.tool, ToolState::Idle) {
            ToolState::Placing { type_id, ghost } => {
                self.engine.dispose_visual(ghost);
                log::info!("[EditorSession] Stopped placing '{}'", type_id);
            }
            ToolState::Dragging(grab) => {
                log::debug!("[EditorSession] Drag of {} ended", grab.id);
            }
            ToolState::Idle => {}
        }
    }

    /// Selects an object, leaving any placement tool
    pub fn select_object(&mut self, id: ObjectId) -> bool {
        self.deactivate_tool();
        self.selection.select(&self.engine, id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn pointer_down(&mut self, ray: Ray3d) {
        match self.tool.clone() {
            ToolState::Placing { type_id, .. } => {
                let Some(point) = ground_hit(ray) else {
                    return;
                };
                match self.engine.place(type_id, point) {
                    Ok(id) => {
                        self.selection.select(&self.engine, id);
                        self.modified = true;
                    }
                    Err(error) => log::debug!("[EditorSession] Placement skipped: {}", error),
                }
            }
            ToolState::Idle => {
                let Some(hit) = pick(ray, &self.engine) else {
                    return;
                };
                match hit.object {
                    Some(id) if self.selection.is_selected(id) => {
                        let grab = ground_hit(ray)
                            .and_then(|point| self.selection.begin_drag(&self.engine, point));
                        if let Some(grab) = grab {
                            log::debug!("[EditorSession] Dragging {}", grab.id);
                            self.tool = ToolState::Dragging(grab);
                        }
                    }
                    Some(id) => {
                        self.selection.select(&self.engine, id);
                    }
                    None => self.selection.clear(),
                }
            }
            ToolState::Dragging(_) => {}
        }
    }

    pub fn pointer_move(&mut self, ray: Ray3d) {
        let Some(point) = ground_hit(ray) else {
            return;
        };
        match self.tool {
            ToolState::Placing { type_id, ghost } => {
                self.engine.move_ghost(ghost, type_id, point);
            }
            ToolState::Dragging(grab) => {
                let before = self.engine.get(grab.id).map(|object| object.position());
                if self.engine.move_to(grab.id, grab.target(point)) {
                    let after = self.engine.get(grab.id).map(|object| object.position());
                    if before != after {
                        self.modified = true;
                        self.selection.refresh_outline(&self.engine);
                    }
                } else {
                    self.deactivate_tool();
                    self.selection.retain_live(&self.engine);
                }
            }
            ToolState::Idle => {}
        }
    }

    pub fn pointer_up(&mut self) {
        if self.is_dragging() {
            self.deactivate_tool();
        }
    }

    /// Handles a shortcut, returning whether it did anything. Ignored mid-drag.
    pub fn handle_key(&mut self, key: EditorKey) -> bool {
        if self.is_dragging() {
            return false;
        }

        let result = match key {
            EditorKey::Escape => {
                self.deactivate_tool();
                self.selection.clear();
                return true;
            }
            EditorKey::Delete => self.delete_selected().map(|_| ()),
            EditorKey::Duplicate => self.duplicate_selected().map(|_| ()),
            EditorKey::Undo => self.undo().map(|_| ()),
        };

        match result {
            Ok(()) => true,
            Err(error) => {
                log::debug!("[EditorSession] {:?} ignored: {}", key, error);
                false
            }
        }
    }

    pub fn delete_selected(&mut self) -> Result<ObjectId, EditorError> {
        let id = self.selection.selected().ok_or(EditorError::MissingSelection)?;
        self.selection.clear();
        self.engine.remove(id);
        self.modified = true;
        Ok(id)
    }

    /// Clones the selection at the duplicate offset and selects the clone
    pub fn duplicate_selected(&mut self) -> Result<ObjectId, EditorError> {
        let id = self.selection.selected().ok_or(EditorError::MissingSelection)?;
        let clone = self.engine.duplicate(id, self.duplicate_offset)?;
        self.selection.select(&self.engine, clone);
        self.modified = true;
        Ok(clone)
    }

    pub fn undo(&mut self) -> Result<UndoOutcome, EditorError> {
        let outcome = self.engine.undo()?;
        self.selection.retain_live(&self.engine);
        self.modified = true;
        Ok(outcome)
    }

    /// Properties of the selected object
    pub fn panel(&self) -> Option<PanelModel> {
        panel_for(&self.engine, self.selection.selected())
    }

    /// Commits a properties panel edit to the selected object
    pub fn edit_property(&mut self, field: &PropertyField, text: &str) -> bool {
        let Some(id) = self.selection.selected() else {
            return false;
        };
        let applied = apply_property_edit(&mut self.engine, id, field, text);
        if applied {
            self.modified = true;
            self.selection.refresh_outline(&self.engine);
        }
        applied
    }

    pub fn to_document(&self) -> LevelDocument {
        LevelDocument::new(self.settings.clone(), serialize(self.engine.objects()))
    }

    /// Replaces the whole level, returning how many objects were loaded
    pub fn load_document(&mut self, level_id: &str, document: LevelDocument) -> usize {
        self.reset(level_id);
        self.settings = document.settings;
        let loaded = deserialize(&mut self.engine, &document.objects).len();

        log::info!(
            "[EditorSession] Loaded level '{}' with {} objects",
            self.level_id,
            loaded
        );
        loaded
    }

    /// Starts an empty level
    pub fn new_level(&mut self, level_id: &str) {
        self.reset(level_id);
        self.settings = GameSettings::default();
        log::info!("[EditorSession] New level '{}'", self.level_id);
    }

    fn reset(&mut self, level_id: &str) {
        self.deactivate_tool();
        self.selection.clear();
        self.engine.clear();
        self.level_id = level_id.to_string();
        self.modified = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level_editor::prototypes::registry;
    use crate::level_editor::property_panel::Axis;
    use bevy::math::Dir3;

    fn session() -> EditorSession {
        EditorSession::new(registry(), 50, Vec3::new(1.0, 0.0, 1.0), "test_level")
    }

    /// Straight down onto the ground at (x, 0, z)
    fn ray_down(x: f32, z: f32) -> Ray3d {
        Ray3d::new(Vec3::new(x, 20.0, z), Dir3::NEG_Y)
    }

    fn ray_through(origin: Vec3, target: Vec3) -> Ray3d {
        Ray3d::new(origin, Dir3::new(target - origin).unwrap())
    }

    #[test]
    fn test_placing_coin_snaps_and_selects() {
        let mut session = session();
        session.select_tool("coin").unwrap();
        session.pointer_down(ray_down(2.4, 5.9));

        let id = session.selected().unwrap();
        let coin = session.engine().get(id).unwrap();
        let rest_height = registry().get("coin").unwrap().rest_height;
        assert_eq!(coin.position(), Vec3::new(2.0, rest_height, 6.0));
        assert_eq!(session.armed_prototype(), Some("coin"));
    }

    #[test]
    fn test_placing_stays_armed_for_rapid_placement() {
        let mut session = session();
        session.select_tool("stone_block").unwrap();
        session.pointer_down(ray_down(0.0, 0.0));
        session.pointer_down(ray_down(3.0, 0.0));
        session.pointer_down(ray_down(6.0, 0.0));

        assert_eq!(session.engine().len(), 3);
        // Three objects plus the ghost
        assert_eq!(session.engine().visuals().len(), 4);
    }

    #[test]
    fn test_ghost_tracks_and_is_disposed() {
        let mut session = session();
        session.select_tool("tree").unwrap();
        let ToolState::Placing { ghost, .. } = session.tool().clone() else {
            panic!("expected placing");
        };

        session.pointer_move(ray_down(4.3, -1.2));
        let node = session.engine().visuals().get(ghost).unwrap();
        assert_eq!(node.translation(), Vec3::new(4.0, 0.0, -1.0));
        assert!(node.opacity() < 1.0);

        session.select_tool("tree").unwrap();
        assert_eq!(*session.tool(), ToolState::Idle);
        assert!(!session.engine().visuals().contains(ghost));
    }

    #[test]
    fn test_switching_tools_replaces_ghost() {
        let mut session = session();
        session.select_tool("tree").unwrap();
        session.select_tool("rock").unwrap();
        assert_eq!(session.armed_prototype(), Some("rock"));
        assert_eq!(session.engine().visuals().len(), 1);
        assert!(session.select_tool("unicorn").is_err());
    }

    #[test]
    fn test_escape_cancels_placing_and_selection() {
        let mut session = session();
        session.select_tool("coin").unwrap();
        session.pointer_down(ray_down(0.0, 0.0));
        assert!(session.selected().is_some());

        assert!(session.handle_key(EditorKey::Escape));
        assert_eq!(*session.tool(), ToolState::Idle);
        assert_eq!(session.selected(), None);
        assert_eq!(session.engine().visuals().len(), 1);
    }

    #[test]
    fn test_delete_then_undo_restores_object() {
        let mut session = session();
        session.select_tool("slime").unwrap();
        session.pointer_down(ray_down(1.0, 1.0));
        session.deactivate_tool();
        let id = session.selected().unwrap();
        let before = session.engine().get(id).unwrap().snapshot();

        assert!(session.handle_key(EditorKey::Delete));
        assert!(session.engine().is_empty());
        assert_eq!(session.selected(), None);

        assert!(session.handle_key(EditorKey::Undo));
        let restored = session.engine().get(id).unwrap();
        assert_eq!(restored.id(), id);
        assert_eq!(restored.snapshot(), before);
    }

    #[test]
    fn test_undo_of_selected_add_drops_selection() {
        let mut session = session();
        session.select_tool("coin").unwrap();
        session.pointer_down(ray_down(0.0, 0.0));
        assert!(session.selection().outline().is_some());

        assert!(session.handle_key(EditorKey::Undo));
        assert_eq!(session.selected(), None);
        assert_eq!(session.selection().outline(), None);
    }

    #[test]
    fn test_shortcuts_without_selection_are_noops() {
        let mut session = session();
        assert!(!session.handle_key(EditorKey::Delete));
        assert!(!session.handle_key(EditorKey::Duplicate));
        assert!(!session.handle_key(EditorKey::Undo));
        assert_eq!(session.delete_selected(), Err(EditorError::MissingSelection));
    }

    #[test]
    fn test_duplicate_selects_clone() {
        let mut session = session();
        session.select_tool("stone_block").unwrap();
        session.pointer_down(ray_down(0.0, 0.0));
        session.deactivate_tool();
        let original = session.selected().unwrap();

        assert!(session.handle_key(EditorKey::Duplicate));
        let clone = session.selected().unwrap();
        assert_ne!(clone, original);
        assert_eq!(
            session.engine().get(clone).unwrap().position(),
            Vec3::new(1.0, 0.5, 1.0)
        );
        assert_eq!(session.engine().history().len(), 2);
    }

    #[test]
    fn test_click_selects_then_ground_clears() {
        let mut session = session();
        session.select_tool("stone_block").unwrap();
        session.pointer_down(ray_down(0.0, 0.0));
        session.pointer_down(ray_down(5.0, 0.0));
        let first = session.engine().objects()[0].id();
        let second = session.engine().objects()[1].id();
        session.deactivate_tool();

        session.pointer_down(ray_down(0.0, 0.0));
        assert_eq!(session.selected(), Some(first));
        session.pointer_down(ray_down(5.0, 0.0));
        assert_eq!(session.selected(), Some(second));
        assert!(!session.selection().is_selected(first));

        session.pointer_down(ray_down(-8.0, -8.0));
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let mut session = session();
        session.select_tool("stone_block").unwrap();
        session.pointer_down(ray_down(-1.0, -1.0));
        session.deactivate_tool();
        session.clear_selection();
        let id = session.engine().objects()[0].id();
        let height = session.engine().get(id).unwrap().position().y;

        // Hits the block's top face and meets the ground at the origin,
        // one cell away from the block's center on x and z
        let grab = ray_through(Vec3::new(-2.0, 2.0, -2.0), Vec3::ZERO);
        session.pointer_down(grab);
        assert_eq!(session.selected(), Some(id));
        session.pointer_down(grab);
        assert!(session.is_dragging());

        session.pointer_move(ray_down(3.0, 3.0));
        assert_eq!(
            session.engine().get(id).unwrap().position(),
            Vec3::new(2.0, height, 2.0)
        );
        assert!(!session.handle_key(EditorKey::Delete));

        session.pointer_up();
        assert_eq!(*session.tool(), ToolState::Idle);
        assert_eq!(session.selected(), Some(id));
    }

    #[test]
    fn test_edit_property_refreshes_outline() {
        let mut session = session();
        session.select_tool("stone_block").unwrap();
        session.pointer_down(ray_down(0.0, 0.0));
        let before = session.selection().outline().unwrap();

        assert!(session.edit_property(&PropertyField::Scale(Axis::Y), "3"));
        let after = session.selection().outline().unwrap();
        assert!(after.size.y > before.size.y);
    }

    #[test]
    fn test_load_document_replaces_level() {
        let mut source = session();
        source.select_tool("coin").unwrap();
        source.pointer_down(ray_down(0.0, 0.0));
        source.pointer_down(ray_down(2.0, 0.0));
        source.settings_mut().name = String::from("Coin Valley");
        let document = source.to_document();

        let mut target = session();
        target.select_tool("tree").unwrap();
        target.pointer_down(ray_down(9.0, 9.0));

        assert_eq!(target.load_document("coin_valley", document), 2);
        assert_eq!(*target.tool(), ToolState::Idle);
        assert_eq!(target.selected(), None);
        assert!(target.engine().history().is_empty());
        assert_eq!(target.engine().visuals().len(), 2);
        assert_eq!(target.settings().name, "Coin Valley");
        assert_eq!(target.level_id(), "coin_valley");
        assert!(!target.is_modified());
    }
}
