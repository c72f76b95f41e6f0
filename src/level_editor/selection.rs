//! Selection Controller
//!
//! Tracks the single selected object and the outline drawn around it. The outline is
//! a box over the object's world bounds grown by `OUTLINE_MARGIN`, rebuilt whenever
//! the object's bounds may have changed and dropped as soon as the object is gone.

use bevy::math::Vec3;

use crate::level_editor::placement::{snap, ObjectId, PlacementEngine};

/// Extra size added around the selected object's bounds
pub const OUTLINE_MARGIN: f32 = 0.1;

/// Seconds per opacity pulse of the outline
pub const OUTLINE_PULSE_PERIOD: f32 = 1.2;

const OUTLINE_MIN_OPACITY: f32 = 0.35;
const OUTLINE_MAX_OPACITY: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionOutline {
    pub center: Vec3,
    pub size: Vec3,
}

/// Outline opacity at `elapsed` seconds
pub fn outline_opacity(elapsed: f32) -> f32 {
    let phase = (elapsed / OUTLINE_PULSE_PERIOD) * std::f32::consts::TAU;
    let t = 0.5 + 0.5 * phase.sin();
    OUTLINE_MIN_OPACITY + (OUTLINE_MAX_OPACITY - OUTLINE_MIN_OPACITY) * t
}

/// Where on the selected object a drag started
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGrab {
    pub id: ObjectId,
    /// Ground grab point minus the object's position
    pub offset: Vec3,
}

impl DragGrab {
    /// Snapped horizontal target for a pointer at `ground_point`
    pub fn target(&self, ground_point: Vec3) -> Vec3 {
        let target = ground_point - self.offset;
        Vec3::new(snap(target.x), 0.0, snap(target.z))
    }
}

#[derive(Debug, Default)]
pub struct SelectionController {
    selected: Option<ObjectId>,
    outline: Option<SelectionOutline>,
}

impl SelectionController {
    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selected == Some(id)
    }

    pub fn outline(&self) -> Option<SelectionOutline> {
        self.outline
    }

    /// Selects `id`, replacing any previous selection and its outline
    pub fn select(&mut self, engine: &PlacementEngine, id: ObjectId) -> bool {
        if !engine.contains(id) {
            self.clear();
            return false;
        }
        if self.selected != Some(id) {
            log::info!("[Selection] Selected {}", id);
        }
        self.selected = Some(id);
        self.refresh_outline(engine);
        true
    }

    pub fn clear(&mut self) {
        if let Some(id) = self.selected.take() {
            log::debug!("[Selection] Cleared selection of {}", id);
        }
        self.outline = None;
    }

    /// Rebuilds the outline from the object's current bounds, clearing the
    /// selection if the object no longer exists
    pub fn refresh_outline(&mut self, engine: &PlacementEngine) {
        let Some(id) = self.selected else {
            self.outline = None;
            return;
        };
        match engine.world_bounds(id) {
            Some(bounds) => {
                let min = Vec3::from(bounds.min);
                let max = Vec3::from(bounds.max);
                self.outline = Some(SelectionOutline {
                    center: (min + max) * 0.5,
                    size: (max - min) + Vec3::splat(OUTLINE_MARGIN),
                });
            }
            None => self.clear(),
        }
    }

    /// Drops the selection if its object was removed out-of-band
    pub fn retain_live(&mut self, engine: &PlacementEngine) {
        if let Some(id) = self.selected {
            if !engine.contains(id) {
                self.clear();
            }
        }
    }

    /// Starts a drag of the selected object grabbed at `ground_point`
    pub fn begin_drag(&self, engine: &PlacementEngine, ground_point: Vec3) -> Option<DragGrab> {
        let id = self.selected?;
        let position = engine.get(id)?.position();
        let offset = ground_point - position;
        Some(DragGrab {
            id,
            offset: Vec3::new(offset.x, 0.0, offset.z),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level_editor::prototypes::registry;

    #[test]
    fn test_outline_wraps_bounds_with_margin() {
        let mut engine = PlacementEngine::new(registry(), 10);
        let id = engine.place("stone_block", Vec3::new(1.0, 0.0, 1.0)).unwrap();
        let mut selection = SelectionController::default();
        assert!(selection.select(&engine, id));

        let outline = selection.outline().unwrap();
        assert!((outline.center - Vec3::new(1.0, 0.5, 1.0)).length() < 1e-5);
        assert!((outline.size - Vec3::splat(1.0 + OUTLINE_MARGIN)).length() < 1e-5);
    }

    #[test]
    fn test_selecting_b_deselects_a() {
        let mut engine = PlacementEngine::new(registry(), 10);
        let a = engine.place("stone_block", Vec3::ZERO).unwrap();
        let b = engine.place("tree", Vec3::new(5.0, 0.0, 5.0)).unwrap();
        let mut selection = SelectionController::default();

        selection.select(&engine, a);
        let outline_a = selection.outline().unwrap();
        selection.select(&engine, b);

        assert!(!selection.is_selected(a));
        assert!(selection.is_selected(b));
        assert_ne!(selection.outline().unwrap(), outline_a);
    }

    #[test]
    fn test_outline_dropped_when_object_removed() {
        let mut engine = PlacementEngine::new(registry(), 10);
        let id = engine.place("coin", Vec3::ZERO).unwrap();
        let mut selection = SelectionController::default();
        selection.select(&engine, id);

        engine.undo().unwrap();
        selection.retain_live(&engine);
        assert_eq!(selection.selected(), None);
        assert_eq!(selection.outline(), None);
    }

    #[test]
    fn test_select_missing_object_clears() {
        let engine = PlacementEngine::new(registry(), 10);
        let mut selection = SelectionController::default();
        assert!(!selection.select(&engine, ObjectId::new(7)));
        assert_eq!(selection.selected(), None);
    }

    #[test]
    fn test_drag_preserves_grab_offset() {
        let mut engine = PlacementEngine::new(registry(), 10);
        let id = engine.place("stone_block", Vec3::ZERO).unwrap();
        let height = engine.get(id).unwrap().position().y;
        let mut selection = SelectionController::default();
        selection.select(&engine, id);

        let grab = DragGrab {
            id,
            offset: Vec3::new(1.0, 0.0, 1.0),
        };
        engine.move_to(id, grab.target(Vec3::new(3.0, 0.0, 3.0)));
        assert_eq!(engine.get(id).unwrap().position(), Vec3::new(2.0, height, 2.0));
    }

    #[test]
    fn test_begin_drag_measures_offset() {
        let mut engine = PlacementEngine::new(registry(), 10);
        let id = engine.place("stone_block", Vec3::new(2.0, 0.0, 2.0)).unwrap();
        let mut selection = SelectionController::default();
        assert!(selection.begin_drag(&engine, Vec3::ZERO).is_none());

        selection.select(&engine, id);
        let grab = selection.begin_drag(&engine, Vec3::new(2.4, 0.0, 1.7)).unwrap();
        assert!((grab.offset - Vec3::new(0.4, 0.0, -0.3)).length() < 1e-5);
        assert_eq!(grab.target(Vec3::new(5.4, 0.0, 1.7)), Vec3::new(5.0, 0.0, 2.0));
    }

    #[test]
    fn test_outline_pulse_stays_in_range() {
        for step in 0..50 {
            let opacity = outline_opacity(step as f32 * 0.07);
            assert!((OUTLINE_MIN_OPACITY..=OUTLINE_MAX_OPACITY).contains(&opacity));
        }
        let a = outline_opacity(0.3);
        let b = outline_opacity(0.3 + OUTLINE_PULSE_PERIOD);
        assert!((a - b).abs() < 1e-4);
    }
}
