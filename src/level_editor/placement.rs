//! Placement Engine
//!
//! Owns the live collection of placed objects and the visuals that draw them.
//! Every record field flows one way into its visual: after any mutation here the
//! visual's transform and tint are rewritten from the record.
//!
//! Adds and removes are recorded in the undo history before they are finalized.

use std::collections::BTreeMap;
use std::fmt;

use bevy::math::{bounding::Aabb3d, Vec3};

use crate::level_editor::error::EditorError;
use crate::level_editor::history::{UndoAction, UndoEntry, UndoHistory};
use crate::level_editor::prototypes::{BehaviorValue, Prototype, PrototypeRegistry};
use crate::level_editor::save::ObjectRecord;
use crate::level_editor::visual::{VisualArena, VisualId, GHOST_OPACITY};

/// Session-unique object id, never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    pub fn new(index: u64) -> Self {
        Self(index)
    }

    pub fn index(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj_{}", self.0)
    }
}

/// Rounds to the nearest grid cell (1 world unit)
pub fn snap(value: f32) -> f32 {
    // Adding zero folds -0.0 into 0.0
    value.round() + 0.0
}

/// Snaps x/z of `position` for prototypes on the grid, leaving y untouched
pub fn snap_to_grid(prototype: &Prototype, position: Vec3) -> Vec3 {
    if prototype.grid_snapped {
        Vec3::new(snap(position.x), position.y, snap(position.z))
    } else {
        position
    }
}

/// Where a prototype lands when placed at a surface hit point
pub fn placement_position(prototype: &Prototype, hit: Vec3) -> Vec3 {
    let mut position = snap_to_grid(prototype, hit);
    position.y += prototype.rest_height;
    if prototype.ground_clamped {
        position.y = position.y.max(0.0);
    }
    position
}

/// One live instance in the level
#[derive(Debug, Clone)]
pub struct PlacedObject {
    id: ObjectId,
    prototype: &'static Prototype,
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
    color: String,
    behavior: BTreeMap<String, BehaviorValue>,
    visual: VisualId,
}

impl PlacedObject {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn type_id(&self) -> &'static str {
        self.prototype.type_id
    }

    pub fn prototype(&self) -> &'static Prototype {
        self.prototype
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Degrees
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn behavior(&self) -> &BTreeMap<String, BehaviorValue> {
        &self.behavior
    }

    pub fn visual(&self) -> VisualId {
        self.visual
    }

    /// Every serializable field, without id or visual
    pub fn snapshot(&self) -> ObjectRecord {
        ObjectRecord {
            type_id: self.prototype.type_id.to_string(),
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
            color: self.color.clone(),
            behavior: self.behavior.clone(),
        }
    }
}

/// What an undo step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    /// An add was reverted
    Removed(ObjectId),
    /// A remove was reverted
    Restored(ObjectId),
}

pub struct PlacementEngine {
    registry: &'static PrototypeRegistry,
    objects: Vec<PlacedObject>,
    visuals: VisualArena,
    history: UndoHistory,
    next_id: u64,
}

impl PlacementEngine {
    pub fn new(registry: &'static PrototypeRegistry, undo_capacity: usize) -> Self {
        Self {
            registry,
            objects: Vec::new(),
            visuals: VisualArena::default(),
            history: UndoHistory::new(undo_capacity),
            next_id: 1,
        }
    }

    pub fn registry(&self) -> &'static PrototypeRegistry {
        self.registry
    }

    /// Live objects in placement order
    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    pub fn get(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn visuals(&self) -> &VisualArena {
        &self.visuals
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    /// Places a new instance of `type_id` at a surface hit point
    pub fn place(&mut self, type_id: &str, hit: Vec3) -> Result<ObjectId, EditorError> {
        let prototype = self.registry.resolve(type_id)?;
        let record = ObjectRecord {
            type_id: prototype.type_id.to_string(),
            position: placement_position(prototype, hit),
            rotation: Vec3::ZERO,
            scale: prototype.default_scale,
            color: prototype.default_color.to_string(),
            behavior: prototype.default_behavior(),
        };

        let id = self.allocate_id();
        self.insert(prototype, id, record.clone());
        self.history.push(UndoEntry {
            action: UndoAction::Add,
            id,
            snapshot: record,
        });

        log::info!(
            "[Placement] Placed {} '{}' at {:?}",
            id,
            prototype.type_id,
            self.get(id).map(PlacedObject::position)
        );
        Ok(id)
    }

    /// Removes a live object, returning its snapshot. Unknown ids are a no-op.
    pub fn remove(&mut self, id: ObjectId) -> Option<ObjectRecord> {
        let snapshot = self.get(id)?.snapshot();
        self.history.push(UndoEntry {
            action: UndoAction::Remove,
            id,
            snapshot: snapshot.clone(),
        });
        self.destroy(id);

        log::info!("[Placement] Removed {} '{}'", id, snapshot.type_id);
        Some(snapshot)
    }

    /// Rebuilds a record into a live object without touching the undo history.
    ///
    /// With `forced_id` the object keeps that id, which is how an undone removal
    /// comes back under its original id.
    pub fn reify_from_snapshot(
        &mut self,
        snapshot: &ObjectRecord,
        forced_id: Option<ObjectId>,
    ) -> Result<ObjectId, EditorError> {
        let prototype = self.registry.resolve(&snapshot.type_id)?;

        let id = match forced_id {
            Some(id) if !self.contains(id) => {
                self.next_id = self.next_id.max(id.0 + 1);
                id
            }
            Some(id) => {
                log::warn!("[Placement] {} is already live, assigning a fresh id", id);
                self.allocate_id()
            }
            None => self.allocate_id(),
        };

        let mut record = snapshot.clone();
        record.position = snap_to_grid(prototype, record.position);
        self.insert(prototype, id, record);
        Ok(id)
    }

    /// Clones a live object at `offset` from it. Recorded as an add.
    pub fn duplicate(&mut self, id: ObjectId, offset: Vec3) -> Result<ObjectId, EditorError> {
        let source = self.get(id).ok_or(EditorError::MissingSelection)?;
        let prototype = source.prototype;
        let mut record = source.snapshot();
        record.position = snap_to_grid(prototype, record.position + offset);

        let clone_id = self.allocate_id();
        self.insert(prototype, clone_id, record.clone());
        self.history.push(UndoEntry {
            action: UndoAction::Add,
            id: clone_id,
            snapshot: record,
        });

        log::info!("[Placement] Duplicated {} as {}", id, clone_id);
        Ok(clone_id)
    }

    /// Steps back one add or remove. Undo itself is never recorded.
    pub fn undo(&mut self) -> Result<UndoOutcome, EditorError> {
        let entry = self.history.pop().ok_or(EditorError::EmptyUndoStack)?;

        match entry.action {
            UndoAction::Add => {
                self.destroy(entry.id);
                log::info!("[UndoHistory] Undid placement of {}", entry.id);
                Ok(UndoOutcome::Removed(entry.id))
            }
            UndoAction::Remove => {
                let id = self.reify_from_snapshot(&entry.snapshot, Some(entry.id))?;
                log::info!("[UndoHistory] Restored {}", id);
                Ok(UndoOutcome::Restored(id))
            }
        }
    }

    /// Moves an object to `position`, snapping x/z
    pub fn set_position(&mut self, id: ObjectId, position: Vec3) -> bool {
        self.update(id, |object| {
            object.position = snap_to_grid(object.prototype, position);
        })
    }

    /// Moves an object horizontally, keeping its height
    pub fn move_to(&mut self, id: ObjectId, target: Vec3) -> bool {
        self.update(id, |object| {
            let position = Vec3::new(target.x, object.position.y, target.z);
            object.position = snap_to_grid(object.prototype, position);
        })
    }

    pub fn set_rotation(&mut self, id: ObjectId, rotation: Vec3) -> bool {
        self.update(id, |object| object.rotation = rotation)
    }

    /// Stored even for non-resizable prototypes, whose visual ignores it
    pub fn set_scale(&mut self, id: ObjectId, scale: Vec3) -> bool {
        self.update(id, |object| object.scale = scale)
    }

    pub fn set_color(&mut self, id: ObjectId, color: &str) -> bool {
        self.update(id, |object| object.color = color.to_string())
    }

    pub fn set_behavior(&mut self, id: ObjectId, key: &str, value: BehaviorValue) -> bool {
        self.update(id, |object| {
            object.behavior.insert(key.to_string(), value);
        })
    }

    /// World-space bounding box of an object's visual
    pub fn world_bounds(&self, id: ObjectId) -> Option<Aabb3d> {
        let object = self.get(id)?;
        self.visuals.get(object.visual).map(|node| node.world_bounds())
    }

    /// Spawns a translucent preview visual for `type_id`
    pub fn spawn_ghost(&mut self, type_id: &str) -> Result<VisualId, EditorError> {
        let prototype = self.registry.resolve(type_id)?;
        let mut node = prototype
            .build_visual(prototype.default_color)
            .with_opacity(GHOST_OPACITY)
            .with_idle_motion(false);
        node.set_transform(
            Vec3::ZERO,
            Vec3::ZERO,
            prototype.visual_scale(prototype.default_scale),
        );
        Ok(self.visuals.spawn(node))
    }

    /// Moves a preview visual to where `type_id` would land at `hit`
    pub fn move_ghost(&mut self, ghost: VisualId, type_id: &str, hit: Vec3) {
        let Some(prototype) = self.registry.get(type_id) else {
            return;
        };
        if let Some(node) = self.visuals.get_mut(ghost) {
            node.set_translation(placement_position(prototype, hit));
        }
    }

    pub fn dispose_visual(&mut self, visual: VisualId) -> bool {
        self.visuals.dispose(visual)
    }

    /// Drops every object and clears the undo history
    pub fn clear(&mut self) {
        for object in self.objects.drain(..) {
            self.visuals.dispose(object.visual);
        }
        self.history.clear();
        log::info!("[Placement] Cleared all objects");
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, prototype: &'static Prototype, id: ObjectId, record: ObjectRecord) {
        let visual = self
            .visuals
            .spawn(prototype.build_visual(&record.color));
        let object = PlacedObject {
            id,
            prototype,
            position: record.position,
            rotation: record.rotation,
            scale: record.scale,
            color: record.color,
            behavior: record.behavior,
            visual,
        };
        Self::sync_visual(&mut self.visuals, &object);
        self.objects.push(object);
    }

    /// Disposes the visual first, then drops the record
    fn destroy(&mut self, id: ObjectId) -> bool {
        let Some(index) = self.objects.iter().position(|object| object.id == id) else {
            return false;
        };
        self.visuals.dispose(self.objects[index].visual);
        self.objects.remove(index);
        true
    }

    fn update(&mut self, id: ObjectId, apply: impl FnOnce(&mut PlacedObject)) -> bool {
        let Some(object) = self.objects.iter_mut().find(|object| object.id == id) else {
            return false;
        };
        apply(object);
        Self::sync_visual(&mut self.visuals, object);
        true
    }

    fn sync_visual(visuals: &mut VisualArena, object: &PlacedObject) {
        let Some(node) = visuals.get_mut(object.visual) else {
            return;
        };
        node.set_transform(
            object.position,
            object.rotation,
            object.prototype.visual_scale(object.scale),
        );
        node.recolor(&object.color);
    }
}
