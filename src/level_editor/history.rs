//! Undo History
//!
//! Bounded stack of structural edits. Only adds and removes are recorded; moves and
//! property edits are not reversible, and there is no redo.

use std::collections::VecDeque;

use crate::level_editor::placement::ObjectId;
use crate::level_editor::save::ObjectRecord;

/// Default maximum number of undo entries to keep
pub const DEFAULT_UNDO_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoAction {
    Add,
    Remove,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UndoEntry {
    pub action: UndoAction,
    pub id: ObjectId,
    /// Full copy of the record at the time of the action
    pub snapshot: ObjectRecord,
}

#[derive(Debug)]
pub struct UndoHistory {
    entries: VecDeque<UndoEntry>,
    capacity: usize,
}

impl UndoHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an entry, evicting the oldest one when full
    pub fn push(&mut self, entry: UndoEntry) {
        if self.entries.len() == self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                log::debug!(
                    "[UndoHistory] Evicted oldest entry {:?} {}",
                    evicted.action,
                    evicted.id
                );
            }
        }
        self.entries.push_back(entry);
    }

    pub fn pop(&mut self) -> Option<UndoEntry> {
        self.entries.pop_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec3;
    use std::collections::BTreeMap;

    fn entry(id: u64) -> UndoEntry {
        UndoEntry {
            action: UndoAction::Add,
            id: ObjectId::new(id),
            snapshot: ObjectRecord {
                type_id: String::from("coin"),
                position: Vec3::ZERO,
                rotation: Vec3::ZERO,
                scale: Vec3::ONE,
                color: String::from("#ffd54f"),
                behavior: BTreeMap::new(),
            },
        }
    }

    #[test]
    fn test_oldest_entries_evicted() {
        let mut history = UndoHistory::new(3);
        for id in 0..5 {
            history.push(entry(id));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.pop().unwrap().id, ObjectId::new(4));
        assert_eq!(history.pop().unwrap().id, ObjectId::new(3));
        assert_eq!(history.pop().unwrap().id, ObjectId::new(2));
        assert!(history.pop().is_none());
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut history = UndoHistory::new(0);
        history.push(entry(1));
        history.push(entry(2));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.len(), 1);
        assert_eq!(history.pop().unwrap().id, ObjectId::new(2));
    }
}
