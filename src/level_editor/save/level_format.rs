//! Level Document Format
//!
//! Plain records plus a settings block, written as camelCase JSON. This is the only
//! artifact the playback engine reads, so field names and value shapes are fixed:
//!
//! ```json
//! {
//!   "version": 1,
//!   "settings": { "name": "...", "winCondition": "reachGoal", "timeLimit": 0, "gravity": 1.0, "skyColor": "#87ceeb" },
//!   "objects": [
//!     { "typeId": "coin", "position": { "x": 2.0, "y": 0.5, "z": 6.0 }, "rotation": { ... },
//!       "scale": { ... }, "color": "#ffd54f", "behavior": { "value": 1.0 } }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::level_editor::placement::{ObjectId, PlacedObject, PlacementEngine};
use crate::level_editor::prototypes::BehaviorValue;

pub const LEVEL_FORMAT_VERSION: u32 = 1;

/// One placed object without its id or visual.
///
/// Doubles as the undo snapshot of a removed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRecord {
    pub type_id: String,
    #[serde(with = "xyz")]
    pub position: Vec3,
    /// Degrees
    #[serde(with = "xyz", default = "zero")]
    pub rotation: Vec3,
    #[serde(with = "xyz", default = "one")]
    pub scale: Vec3,
    pub color: String,
    #[serde(default)]
    pub behavior: BTreeMap<String, BehaviorValue>,
}

fn zero() -> Vec3 {
    Vec3::ZERO
}

fn one() -> Vec3 {
    Vec3::ONE
}

/// `Vec3` as `{ "x": .., "y": .., "z": .. }`
mod xyz {
    use bevy::math::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Xyz {
        x: f32,
        y: f32,
        z: f32,
    }

    pub fn serialize<S: Serializer>(value: &Vec3, serializer: S) -> Result<S::Ok, S::Error> {
        Xyz {
            x: value.x,
            y: value.y,
            z: value.z,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec3, D::Error> {
        let Xyz { x, y, z } = Xyz::deserialize(deserializer)?;
        Ok(Vec3::new(x, y, z))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WinCondition {
    #[default]
    ReachGoal,
    CollectAllCoins,
    DefeatAllEnemies,
    Survive,
}

impl WinCondition {
    pub const ALL: [WinCondition; 4] = [
        WinCondition::ReachGoal,
        WinCondition::CollectAllCoins,
        WinCondition::DefeatAllEnemies,
        WinCondition::Survive,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            WinCondition::ReachGoal => "Reach the goal",
            WinCondition::CollectAllCoins => "Collect all coins",
            WinCondition::DefeatAllEnemies => "Defeat all enemies",
            WinCondition::Survive => "Survive until time runs out",
        }
    }
}

/// Level-wide settings read by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameSettings {
    pub name: String,
    pub win_condition: WinCondition,
    /// Seconds, 0 means unlimited
    pub time_limit: u32,
    /// Multiplier on the playback engine's base gravity
    pub gravity: f32,
    pub sky_color: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            name: String::from("Untitled Level"),
            win_condition: WinCondition::default(),
            time_limit: 0,
            gravity: 1.0,
            sky_color: String::from("#87ceeb"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDocument {
    #[serde(default = "current_version")]
    pub version: u32,
    #[serde(default)]
    pub settings: GameSettings,
    #[serde(default)]
    pub objects: Vec<ObjectRecord>,
}

fn current_version() -> u32 {
    LEVEL_FORMAT_VERSION
}

impl LevelDocument {
    pub fn new(settings: GameSettings, objects: Vec<ObjectRecord>) -> Self {
        Self {
            version: LEVEL_FORMAT_VERSION,
            settings,
            objects,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let document: LevelDocument = serde_json::from_str(json)?;
        if document.version > LEVEL_FORMAT_VERSION {
            log::warn!(
                "[LevelCodec] Document version {} is newer than {}, reading what is understood",
                document.version,
                LEVEL_FORMAT_VERSION
            );
        }
        Ok(document)
    }
}

/// Strips ids and visuals, keeping placement order
pub fn serialize(objects: &[PlacedObject]) -> Vec<ObjectRecord> {
    objects.iter().map(PlacedObject::snapshot).collect()
}

/// Rebuilds every record into `engine`, dropping ones whose type is unknown.
///
/// Returns the ids of the created objects in record order. Nothing is pushed to the
/// undo history.
pub fn deserialize(engine: &mut PlacementEngine, records: &[ObjectRecord]) -> Vec<ObjectId> {
    let mut created = Vec::with_capacity(records.len());
    for record in records {
        match engine.reify_from_snapshot(record, None) {
            Ok(id) => created.push(id),
            Err(error) => {
                log::warn!("[LevelCodec] Dropping record: {}", error);
            }
        }
    }

    if created.len() < records.len() {
        log::warn!(
            "[LevelCodec] Loaded {} of {} records",
            created.len(),
            records.len()
        );
    } else {
        log::info!("[LevelCodec] Loaded {} records", created.len());
    }

    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level_editor::prototypes::registry;

    fn engine() -> PlacementEngine {
        PlacementEngine::new(registry(), 50)
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let mut source = engine();
        let coin = source.place("coin", Vec3::new(2.4, 0.0, 5.9)).unwrap();
        let slime = source.place("slime", Vec3::new(-3.2, 0.0, 1.1)).unwrap();
        source.set_rotation(slime, Vec3::new(0.0, 90.0, 0.0));
        source.set_scale(slime, Vec3::new(2.0, 1.5, 2.0));
        source.set_color(coin, "#112233");
        source.set_behavior(slime, "damage", BehaviorValue::Number(42.0));

        let json = LevelDocument::new(GameSettings::default(), serialize(source.objects()))
            .to_json()
            .unwrap();
        let document = LevelDocument::from_json(&json).unwrap();

        let mut target = engine();
        let ids = deserialize(&mut target, &document.objects);
        assert_eq!(ids.len(), 2);
        assert_eq!(serialize(target.objects()), serialize(source.objects()));
        assert!(target.history().is_empty());
    }

    #[test]
    fn test_serialize_keeps_insertion_order() {
        let mut source = engine();
        source.place("tree", Vec3::new(5.0, 0.0, 5.0)).unwrap();
        source.place("coin", Vec3::ZERO).unwrap();
        source.place("bat", Vec3::new(-5.0, 0.0, 0.0)).unwrap();

        let types: Vec<_> = serialize(source.objects())
            .into_iter()
            .map(|record| record.type_id)
            .collect();
        assert_eq!(types, vec!["tree", "coin", "bat"]);
    }

    #[test]
    fn test_unknown_type_is_dropped() {
        let mut source = engine();
        source.place("coin", Vec3::ZERO).unwrap();
        source.place("rock", Vec3::new(3.0, 0.0, 0.0)).unwrap();

        let mut records = serialize(source.objects());
        records[1].type_id = String::from("retired_prototype");

        let mut target = engine();
        let ids = deserialize(&mut target, &records);
        assert_eq!(ids.len(), 1);
        assert_eq!(target.len(), 1);
        assert_eq!(target.objects()[0].type_id(), "coin");
    }

    #[test]
    fn test_json_uses_portable_field_names() {
        let mut source = engine();
        source.place("jump_pad", Vec3::new(1.0, 0.0, 2.0)).unwrap();
        let json = LevelDocument::new(GameSettings::default(), serialize(source.objects()))
            .to_json()
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let object = &value["objects"][0];
        assert_eq!(object["typeId"], "jump_pad");
        assert_eq!(object["position"]["x"], 1.0);
        assert_eq!(object["position"]["z"], 2.0);
        assert_eq!(object["behavior"]["bounceForce"], 15.0);
        assert!(object.get("id").is_none());
        assert_eq!(value["settings"]["winCondition"], "reachGoal");
        assert_eq!(value["settings"]["timeLimit"], 0);
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let json = r##"{
            "objects": [
                { "typeId": "rock", "position": { "x": 1, "y": 0.3, "z": 2 }, "color": "#757575" }
            ]
        }"##;
        let document = LevelDocument::from_json(json).unwrap();
        assert_eq!(document.version, LEVEL_FORMAT_VERSION);
        assert_eq!(document.settings, GameSettings::default());

        let record = &document.objects[0];
        assert_eq!(record.rotation, Vec3::ZERO);
        assert_eq!(record.scale, Vec3::ONE);
        assert!(record.behavior.is_empty());
    }
}
