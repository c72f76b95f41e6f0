//! Prototype Registry
//!
//! Static table of every object type the palette can place. Each prototype
//! carries a visual factory, placement defaults, and an optional behavior schema
//! that the playback engine interprets by key (`damage`, `bounceForce`, ...).
//!
//! The table is built once on first access and never mutated.

use std::collections::{BTreeMap, HashMap};

use bevy::math::{Quat, Vec3};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::level_editor::error::EditorError;
use crate::level_editor::visual::{PartShape, VisualNode, VisualPart};

/// Palette category of a prototype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrototypeCategory {
    Terrain,
    Gameplay,
    Collectible,
    Enemy,
    Environment,
}

impl PrototypeCategory {
    pub const ALL: [PrototypeCategory; 5] = [
        PrototypeCategory::Terrain,
        PrototypeCategory::Gameplay,
        PrototypeCategory::Collectible,
        PrototypeCategory::Enemy,
        PrototypeCategory::Environment,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PrototypeCategory::Terrain => "Terrain",
            PrototypeCategory::Gameplay => "Gameplay",
            PrototypeCategory::Collectible => "Collectibles",
            PrototypeCategory::Enemy => "Enemies",
            PrototypeCategory::Environment => "Environment",
        }
    }
}

/// Editing widget used for a behavior field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorKind {
    Number,
    Text,
    Multiline,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BehaviorDefault {
    Number(f64),
    Text(&'static str),
}

/// One named, typed behavior parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: BehaviorKind,
    pub default: BehaviorDefault,
}

impl BehaviorField {
    const fn number(key: &'static str, label: &'static str, default: f64) -> Self {
        Self {
            key,
            label,
            kind: BehaviorKind::Number,
            default: BehaviorDefault::Number(default),
        }
    }

    const fn text(key: &'static str, label: &'static str, default: &'static str) -> Self {
        Self {
            key,
            label,
            kind: BehaviorKind::Text,
            default: BehaviorDefault::Text(default),
        }
    }

    const fn multiline(key: &'static str, label: &'static str, default: &'static str) -> Self {
        Self {
            key,
            label,
            kind: BehaviorKind::Multiline,
            default: BehaviorDefault::Text(default),
        }
    }

    pub fn default_value(&self) -> BehaviorValue {
        match self.default {
            BehaviorDefault::Number(value) => BehaviorValue::Number(value),
            BehaviorDefault::Text(value) => BehaviorValue::Text(value.to_string()),
        }
    }
}

/// A behavior value as stored on a placed object and in the level document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BehaviorValue {
    Number(f64),
    Text(String),
}

impl BehaviorValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            BehaviorValue::Number(value) => Some(*value),
            BehaviorValue::Text(_) => None,
        }
    }

    /// Text shown in the property panel
    pub fn display(&self) -> String {
        match self {
            BehaviorValue::Number(value) => value.to_string(),
            BehaviorValue::Text(text) => text.clone(),
        }
    }
}

/// Static template for one object type
#[derive(Debug)]
pub struct Prototype {
    pub type_id: &'static str,
    pub display_name: &'static str,
    pub category: PrototypeCategory,
    /// Builds the parts of a fresh visual; nothing is shared between instances
    pub build: fn() -> Vec<VisualPart>,
    pub default_scale: Vec3,
    pub default_color: &'static str,
    /// False when scaling the silhouette makes no sense (spawn markers, flags)
    pub resizable: bool,
    /// Height of the origin above the surface it is placed on
    pub rest_height: f32,
    /// When false the object may be placed below y = 0
    pub ground_clamped: bool,
    /// When false x/z are kept as hit, not rounded to the grid
    pub grid_snapped: bool,
    pub behavior_schema: &'static [BehaviorField],
}

impl Prototype {
    /// Build a new visual for this prototype, tinted with `color`
    pub fn build_visual(&self, color: &str) -> VisualNode {
        let mut node = VisualNode::new((self.build)())
            .with_idle_motion(self.category == PrototypeCategory::Collectible);
        node.recolor(color);
        node
    }

    pub fn default_behavior(&self) -> BTreeMap<String, BehaviorValue> {
        self.behavior_schema
            .iter()
            .map(|field| (field.key.to_string(), field.default_value()))
            .collect()
    }

    pub fn behavior_field(&self, key: &str) -> Option<&BehaviorField> {
        self.behavior_schema.iter().find(|field| field.key == key)
    }

    /// Scale the visual should use; non-resizable prototypes ignore the stored scale
    pub fn visual_scale(&self, scale: Vec3) -> Vec3 {
        if self.resizable {
            scale
        } else {
            Vec3::ONE
        }
    }
}

/// Read-only lookup over every prototype
#[derive(Debug)]
pub struct PrototypeRegistry {
    prototypes: Vec<Prototype>,
    index: HashMap<&'static str, usize>,
}

impl PrototypeRegistry {
    pub fn new(prototypes: Vec<Prototype>) -> Self {
        let index = prototypes
            .iter()
            .enumerate()
            .map(|(i, prototype)| (prototype.type_id, i))
            .collect();
        Self { prototypes, index }
    }

    pub fn get(&self, type_id: &str) -> Option<&Prototype> {
        self.index.get(type_id).map(|&i| &self.prototypes[i])
    }

    /// Like `get`, but fails with `UnknownPrototype`
    pub fn resolve(&self, type_id: &str) -> Result<&Prototype, EditorError> {
        self.get(type_id)
            .ok_or_else(|| EditorError::UnknownPrototype(type_id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prototype> {
        self.prototypes.iter()
    }

    pub fn by_category(&self, category: PrototypeCategory) -> impl Iterator<Item = &Prototype> {
        self.prototypes
            .iter()
            .filter(move |prototype| prototype.category == category)
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}

lazy_static! {
    static ref PROTOTYPES: PrototypeRegistry = PrototypeRegistry::new(default_palette());
}

/// The process-wide default palette
pub fn registry() -> &'static PrototypeRegistry {
    &PROTOTYPES
}

fn cube(size: Vec3) -> PartShape {
    PartShape::Cuboid { size }
}

fn sphere(radius: f32) -> PartShape {
    PartShape::Sphere { radius }
}

fn cylinder(radius: f32, height: f32) -> PartShape {
    PartShape::Cylinder { radius, height }
}

fn cone(radius: f32, height: f32) -> PartShape {
    PartShape::Cone { radius, height }
}

const WOOD: &str = "#6d4c41";
const WHITE: &str = "#fafafa";
const BLACK: &str = "#212121";

// Terrain

fn build_grass_block() -> Vec<VisualPart> {
    vec![
        VisualPart::fixed(cube(Vec3::new(1.0, 0.8, 1.0)), Vec3::new(0.0, -0.1, 0.0), "#8d6e63"),
        VisualPart::tinted(cube(Vec3::new(1.0, 0.2, 1.0)), Vec3::new(0.0, 0.4, 0.0)),
    ]
}

fn build_solid_block() -> Vec<VisualPart> {
    vec![VisualPart::tinted(cube(Vec3::ONE), Vec3::ZERO)]
}

fn build_ramp() -> Vec<VisualPart> {
    // Stepped wedge, three slabs rising along +z
    (0..3)
        .map(|step| {
            let height = (step + 1) as f32 / 3.0;
            VisualPart::tinted(
                cube(Vec3::new(1.0, height, 1.0 / 3.0)),
                Vec3::new(0.0, height * 0.5 - 0.5, step as f32 / 3.0 - 1.0 / 3.0),
            )
        })
        .collect()
}

// Gameplay

fn build_spawn_point() -> Vec<VisualPart> {
    vec![
        VisualPart::tinted(cylinder(0.5, 0.1), Vec3::ZERO),
        VisualPart::fixed(cone(0.15, 0.4), Vec3::new(0.0, 0.25, 0.0), WHITE),
    ]
}

fn build_goal_flag() -> Vec<VisualPart> {
    vec![
        VisualPart::fixed(cylinder(0.05, 2.0), Vec3::new(0.0, 1.0, 0.0), WHITE),
        VisualPart::tinted(cube(Vec3::new(0.6, 0.4, 0.05)), Vec3::new(0.3, 1.75, 0.0)),
        VisualPart::fixed(cylinder(0.3, 0.05), Vec3::new(0.0, 0.025, 0.0), "#9e9e9e"),
    ]
}

fn build_checkpoint() -> Vec<VisualPart> {
    vec![
        VisualPart::tinted(cylinder(0.06, 1.2), Vec3::new(0.0, 0.6, 0.0)),
        VisualPart::fixed(sphere(0.15), Vec3::new(0.0, 1.3, 0.0), WHITE),
    ]
}

fn build_spikes() -> Vec<VisualPart> {
    let mut parts = vec![VisualPart::fixed(
        cube(Vec3::new(1.0, 0.1, 1.0)),
        Vec3::new(0.0, -0.2, 0.0),
        "#455a64",
    )];
    for x in [-0.25, 0.25] {
        for z in [-0.25, 0.25] {
            parts.push(VisualPart::tinted(cone(0.18, 0.4), Vec3::new(x, 0.05, z)));
        }
    }
    parts
}

fn build_jump_pad() -> Vec<VisualPart> {
    vec![
        VisualPart::fixed(cylinder(0.5, 0.15), Vec3::ZERO, "#455a64"),
        VisualPart::tinted(cylinder(0.4, 0.05), Vec3::new(0.0, 0.1, 0.0)),
    ]
}

fn build_speed_boost() -> Vec<VisualPart> {
    vec![
        VisualPart::tinted(cube(Vec3::new(1.0, 0.05, 1.0)), Vec3::ZERO),
        VisualPart::fixed(cone(0.2, 0.4), Vec3::new(0.0, 0.08, 0.0), WHITE)
            .rotated(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
    ]
}

fn build_lava() -> Vec<VisualPart> {
    vec![VisualPart::tinted(cube(Vec3::ONE), Vec3::ZERO)]
}

fn build_sign_post() -> Vec<VisualPart> {
    vec![
        VisualPart::fixed(cylinder(0.05, 1.0), Vec3::new(0.0, 0.5, 0.0), WOOD),
        VisualPart::tinted(cube(Vec3::new(0.8, 0.5, 0.06)), Vec3::new(0.0, 1.0, 0.0)),
    ]
}

// Collectibles

fn build_coin() -> Vec<VisualPart> {
    vec![VisualPart::tinted(cylinder(0.35, 0.08), Vec3::ZERO)
        .rotated(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2))]
}

fn build_gem() -> Vec<VisualPart> {
    vec![
        VisualPart::tinted(cone(0.25, 0.3), Vec3::new(0.0, 0.15, 0.0)),
        VisualPart::tinted(cone(0.25, 0.3), Vec3::new(0.0, -0.15, 0.0))
            .rotated(Quat::from_rotation_x(std::f32::consts::PI)),
    ]
}

fn build_heart() -> Vec<VisualPart> {
    vec![
        VisualPart::tinted(sphere(0.2), Vec3::new(-0.13, 0.1, 0.0)),
        VisualPart::tinted(sphere(0.2), Vec3::new(0.13, 0.1, 0.0)),
        VisualPart::tinted(cone(0.3, 0.35), Vec3::new(0.0, -0.15, 0.0))
            .rotated(Quat::from_rotation_x(std::f32::consts::PI)),
    ]
}

fn build_key() -> Vec<VisualPart> {
    vec![
        VisualPart::tinted(
            PartShape::Torus {
                minor_radius: 0.05,
                major_radius: 0.15,
            },
            Vec3::new(0.0, 0.2, 0.0),
        )
        .rotated(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
        VisualPart::tinted(cube(Vec3::new(0.08, 0.4, 0.05)), Vec3::new(0.0, -0.15, 0.0)),
    ]
}

// Enemies

fn build_slime() -> Vec<VisualPart> {
    vec![
        VisualPart::tinted(sphere(0.5), Vec3::ZERO),
        VisualPart::fixed(sphere(0.1), Vec3::new(-0.18, 0.15, 0.42), WHITE),
        VisualPart::fixed(sphere(0.1), Vec3::new(0.18, 0.15, 0.42), WHITE),
        VisualPart::fixed(sphere(0.05), Vec3::new(-0.18, 0.15, 0.5), BLACK),
        VisualPart::fixed(sphere(0.05), Vec3::new(0.18, 0.15, 0.5), BLACK),
    ]
}

fn build_bat() -> Vec<VisualPart> {
    vec![
        VisualPart::tinted(sphere(0.25), Vec3::ZERO),
        VisualPart::tinted(cube(Vec3::new(0.5, 0.05, 0.3)), Vec3::new(-0.4, 0.05, 0.0)),
        VisualPart::tinted(cube(Vec3::new(0.5, 0.05, 0.3)), Vec3::new(0.4, 0.05, 0.0)),
        VisualPart::fixed(sphere(0.05), Vec3::new(-0.08, 0.06, 0.22), "#ffeb3b"),
        VisualPart::fixed(sphere(0.05), Vec3::new(0.08, 0.06, 0.22), "#ffeb3b"),
    ]
}

fn build_turret() -> Vec<VisualPart> {
    vec![
        VisualPart::tinted(cylinder(0.4, 0.5), Vec3::ZERO),
        VisualPart::tinted(sphere(0.3), Vec3::new(0.0, 0.3, 0.0)),
        VisualPart::fixed(cylinder(0.08, 0.6), Vec3::new(0.0, 0.35, 0.35), "#263238")
            .rotated(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
    ]
}

// Environment

fn build_tree() -> Vec<VisualPart> {
    vec![
        VisualPart::fixed(cylinder(0.12, 1.0), Vec3::new(0.0, 0.5, 0.0), WOOD),
        VisualPart::tinted(cone(0.6, 1.4), Vec3::new(0.0, 1.6, 0.0)),
    ]
}

fn build_rock() -> Vec<VisualPart> {
    vec![
        VisualPart::tinted(sphere(0.45), Vec3::ZERO),
        VisualPart::tinted(sphere(0.25), Vec3::new(0.35, -0.1, 0.1)),
    ]
}

fn build_bush() -> Vec<VisualPart> {
    vec![
        VisualPart::tinted(sphere(0.4), Vec3::ZERO),
        VisualPart::tinted(sphere(0.3), Vec3::new(0.3, -0.05, 0.0)),
        VisualPart::tinted(sphere(0.3), Vec3::new(-0.25, -0.05, 0.15)),
    ]
}

fn build_lamp_post() -> Vec<VisualPart> {
    vec![
        VisualPart::fixed(cylinder(0.06, 2.0), Vec3::new(0.0, 1.0, 0.0), "#37474f"),
        VisualPart::tinted(sphere(0.18), Vec3::new(0.0, 2.1, 0.0)),
    ]
}

fn build_point_light() -> Vec<VisualPart> {
    vec![VisualPart::tinted(sphere(0.2), Vec3::ZERO)]
}

fn build_cloud() -> Vec<VisualPart> {
    vec![
        VisualPart::tinted(sphere(0.6), Vec3::ZERO),
        VisualPart::tinted(sphere(0.45), Vec3::new(0.6, -0.1, 0.0)),
        VisualPart::tinted(sphere(0.45), Vec3::new(-0.6, -0.1, 0.1)),
    ]
}

const ICE_BEHAVIOR: &[BehaviorField] = &[BehaviorField::number("friction", "Friction", 0.1)];
const GOAL_BEHAVIOR: &[BehaviorField] = &[BehaviorField::text("nextLevel", "Next level", "")];
const SPIKE_BEHAVIOR: &[BehaviorField] = &[BehaviorField::number("damage", "Damage", 25.0)];
const LAVA_BEHAVIOR: &[BehaviorField] = &[BehaviorField::number("damage", "Damage", 100.0)];
const JUMP_PAD_BEHAVIOR: &[BehaviorField] =
    &[BehaviorField::number("bounceForce", "Bounce force", 15.0)];
const SPEED_BOOST_BEHAVIOR: &[BehaviorField] = &[
    BehaviorField::number("speedMultiplier", "Speed multiplier", 1.8),
    BehaviorField::number("duration", "Duration (s)", 3.0),
];
const SIGN_BEHAVIOR: &[BehaviorField] =
    &[BehaviorField::multiline("message", "Message", "Welcome!")];
const COIN_BEHAVIOR: &[BehaviorField] = &[BehaviorField::number("value", "Value", 1.0)];
const GEM_BEHAVIOR: &[BehaviorField] = &[BehaviorField::number("value", "Value", 5.0)];
const HEART_BEHAVIOR: &[BehaviorField] = &[BehaviorField::number("heal", "Heal amount", 1.0)];
const KEY_BEHAVIOR: &[BehaviorField] = &[BehaviorField::text("opens", "Opens door", "door_1")];
const SLIME_BEHAVIOR: &[BehaviorField] = &[
    BehaviorField::number("damage", "Damage", 10.0),
    BehaviorField::number("patrolDistance", "Patrol distance", 3.0),
    BehaviorField::number("speed", "Speed", 1.5),
];
const BAT_BEHAVIOR: &[BehaviorField] = &[
    BehaviorField::number("damage", "Damage", 5.0),
    BehaviorField::number("patrolDistance", "Patrol distance", 4.0),
    BehaviorField::number("flyHeight", "Fly height", 2.0),
];
const TURRET_BEHAVIOR: &[BehaviorField] = &[
    BehaviorField::number("damage", "Damage", 15.0),
    BehaviorField::number("fireRate", "Shots per second", 1.0),
    BehaviorField::number("range", "Range", 8.0),
];
const LIGHT_BEHAVIOR: &[BehaviorField] = &[
    BehaviorField::number("intensity", "Intensity", 1.0),
    BehaviorField::number("range", "Range", 8.0),
];

fn default_palette() -> Vec<Prototype> {
    let base = Prototype {
        type_id: "",
        display_name: "",
        category: PrototypeCategory::Terrain,
        build: build_solid_block,
        default_scale: Vec3::ONE,
        default_color: WHITE,
        resizable: true,
        rest_height: 0.5,
        ground_clamped: true,
        grid_snapped: true,
        behavior_schema: &[],
    };

    vec![
        Prototype {
            type_id: "grass_block",
            display_name: "Grass Block",
            build: build_grass_block,
            default_color: "#4caf50",
            ..base
        },
        Prototype {
            type_id: "dirt_block",
            display_name: "Dirt Block",
            default_color: "#8d6e63",
            ..base
        },
        Prototype {
            type_id: "stone_block",
            display_name: "Stone Block",
            default_color: "#9e9e9e",
            ..base
        },
        Prototype {
            type_id: "ice_block",
            display_name: "Ice Block",
            default_color: "#b3e5fc",
            behavior_schema: ICE_BEHAVIOR,
            ..base
        },
        Prototype {
            type_id: "wood_platform",
            display_name: "Wood Platform",
            default_scale: Vec3::new(3.0, 0.3, 3.0),
            default_color: "#a1887f",
            rest_height: 0.15,
            ..base
        },
        Prototype {
            type_id: "ramp",
            display_name: "Ramp",
            build: build_ramp,
            default_color: "#bcaaa4",
            ..base
        },
        Prototype {
            type_id: "spawn_point",
            display_name: "Player Spawn",
            category: PrototypeCategory::Gameplay,
            build: build_spawn_point,
            default_color: "#2196f3",
            resizable: false,
            rest_height: 0.05,
            ground_clamped: false,
            ..base
        },
        Prototype {
            type_id: "goal_flag",
            display_name: "Goal Flag",
            category: PrototypeCategory::Gameplay,
            build: build_goal_flag,
            default_color: "#f44336",
            resizable: false,
            rest_height: 0.0,
            behavior_schema: GOAL_BEHAVIOR,
            ..base
        },
        Prototype {
            type_id: "checkpoint",
            display_name: "Checkpoint",
            category: PrototypeCategory::Gameplay,
            build: build_checkpoint,
            default_color: "#ff9800",
            resizable: false,
            rest_height: 0.0,
            ..base
        },
        Prototype {
            type_id: "spikes",
            display_name: "Spike Trap",
            category: PrototypeCategory::Gameplay,
            build: build_spikes,
            default_color: "#b0bec5",
            rest_height: 0.25,
            behavior_schema: SPIKE_BEHAVIOR,
            ..base
        },
        Prototype {
            type_id: "lava",
            display_name: "Lava Pool",
            category: PrototypeCategory::Gameplay,
            build: build_lava,
            default_scale: Vec3::new(2.0, 0.2, 2.0),
            default_color: "#ff5722",
            rest_height: 0.1,
            behavior_schema: LAVA_BEHAVIOR,
            ..base
        },
        Prototype {
            type_id: "jump_pad",
            display_name: "Jump Pad",
            category: PrototypeCategory::Gameplay,
            build: build_jump_pad,
            default_color: "#ffeb3b",
            rest_height: 0.075,
            behavior_schema: JUMP_PAD_BEHAVIOR,
            ..base
        },
        Prototype {
            type_id: "speed_boost",
            display_name: "Speed Boost",
            category: PrototypeCategory::Gameplay,
            build: build_speed_boost,
            default_color: "#00e5ff",
            rest_height: 0.025,
            behavior_schema: SPEED_BOOST_BEHAVIOR,
            ..base
        },
        Prototype {
            type_id: "sign_post",
            display_name: "Sign Post",
            category: PrototypeCategory::Gameplay,
            build: build_sign_post,
            default_color: "#d7ccc8",
            resizable: false,
            rest_height: 0.0,
            behavior_schema: SIGN_BEHAVIOR,
            ..base
        },
        Prototype {
            type_id: "coin",
            display_name: "Coin",
            category: PrototypeCategory::Collectible,
            build: build_coin,
            default_color: "#ffd54f",
            behavior_schema: COIN_BEHAVIOR,
            ..base
        },
        Prototype {
            type_id: "gem",
            display_name: "Gem",
            category: PrototypeCategory::Collectible,
            build: build_gem,
            default_color: "#e040fb",
            behavior_schema: GEM_BEHAVIOR,
            ..base
        },
        Prototype {
            type_id: "heart",
            display_name: "Heart",
            category: PrototypeCategory::Collectible,
            build: build_heart,
            default_color: "#f44336",
            behavior_schema: HEART_BEHAVIOR,
            ..base
        },
        Prototype {
            type_id: "key",
            display_name: "Key",
            category: PrototypeCategory::Collectible,
            build: build_key,
            default_color: "#ffc107",
            behavior_schema: KEY_BEHAVIOR,
            ..base
        },
        Prototype {
            type_id: "slime",
            display_name: "Slime",
            category: PrototypeCategory::Enemy,
            build: build_slime,
            default_scale: Vec3::new(1.0, 0.7, 1.0),
            default_color: "#8bc34a",
            rest_height: 0.35,
            behavior_schema: SLIME_BEHAVIOR,
            ..base
        },
        Prototype {
            type_id: "bat",
            display_name: "Bat",
            category: PrototypeCategory::Enemy,
            build: build_bat,
            default_color: "#5e35b1",
            rest_height: 1.5,
            behavior_schema: BAT_BEHAVIOR,
            ..base
        },
        Prototype {
            type_id: "turret",
            display_name: "Turret",
            category: PrototypeCategory::Enemy,
            build: build_turret,
            default_color: "#607d8b",
            rest_height: 0.25,
            behavior_schema: TURRET_BEHAVIOR,
            ..base
        },
        Prototype {
            type_id: "tree",
            display_name: "Tree",
            category: PrototypeCategory::Environment,
            build: build_tree,
            default_color: "#2e7d32",
            rest_height: 0.0,
            ..base
        },
        Prototype {
            type_id: "rock",
            display_name: "Rock",
            category: PrototypeCategory::Environment,
            build: build_rock,
            default_scale: Vec3::new(1.0, 0.7, 1.0),
            default_color: "#757575",
            rest_height: 0.3,
            ..base
        },
        Prototype {
            type_id: "bush",
            display_name: "Bush",
            category: PrototypeCategory::Environment,
            build: build_bush,
            default_color: "#43a047",
            rest_height: 0.3,
            ..base
        },
        Prototype {
            type_id: "lamp_post",
            display_name: "Lamp Post",
            category: PrototypeCategory::Environment,
            build: build_lamp_post,
            default_color: "#fff59d",
            resizable: false,
            rest_height: 0.0,
            ..base
        },
        Prototype {
            type_id: "point_light",
            display_name: "Floating Light",
            category: PrototypeCategory::Environment,
            build: build_point_light,
            default_color: "#fff9c4",
            resizable: false,
            rest_height: 2.5,
            ground_clamped: false,
            behavior_schema: LIGHT_BEHAVIOR,
            ..base
        },
        Prototype {
            type_id: "cloud",
            display_name: "Cloud",
            category: PrototypeCategory::Environment,
            build: build_cloud,
            default_color: WHITE,
            rest_height: 6.0,
            ..base
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ids_are_unique() {
        let registry = registry();
        let mut seen = std::collections::HashSet::new();
        for prototype in registry.iter() {
            assert!(seen.insert(prototype.type_id), "duplicate {}", prototype.type_id);
        }
        assert_eq!(seen.len(), registry.len());
    }

    #[test]
    fn test_every_category_has_prototypes() {
        for category in PrototypeCategory::ALL {
            assert!(registry().by_category(category).count() > 0, "{:?}", category);
        }
    }

    #[test]
    fn test_default_palette_is_grid_snapped() {
        assert!(registry().iter().all(|prototype| prototype.grid_snapped));
    }

    #[test]
    fn test_resolve_unknown_prototype() {
        assert_eq!(
            registry().resolve("dragon").unwrap_err(),
            EditorError::UnknownPrototype("dragon".to_string())
        );
        assert!(registry().resolve("coin").is_ok());
    }

    #[test]
    fn test_default_behavior_follows_schema() {
        let slime = registry().get("slime").unwrap();
        let behavior = slime.default_behavior();
        assert_eq!(behavior.len(), 3);
        assert_eq!(behavior["damage"], BehaviorValue::Number(10.0));
        assert_eq!(behavior["patrolDistance"], BehaviorValue::Number(3.0));

        let tree = registry().get("tree").unwrap();
        assert!(tree.default_behavior().is_empty());
    }

    #[test]
    fn test_build_visual_instances_are_independent() {
        let coin = registry().get("coin").unwrap();
        let mut first = coin.build_visual(coin.default_color);
        let second = coin.build_visual(coin.default_color);

        first.recolor("#000000");
        assert_eq!(second.parts()[0].color, coin.default_color);
        assert!(first.idle_motion());
    }

    #[test]
    fn test_slime_eyes_keep_their_color() {
        let slime = registry().get("slime").unwrap();
        let node = slime.build_visual("#123456");
        let fixed: Vec<_> = node.parts().iter().filter(|part| !part.tintable).collect();
        assert_eq!(fixed.len(), 4);
        assert!(fixed.iter().all(|part| part.color != "#123456"));
    }

    #[test]
    fn test_behavior_value_json_shape() {
        let number = serde_json::to_string(&BehaviorValue::Number(2.5)).unwrap();
        assert_eq!(number, "2.5");
        let text: BehaviorValue = serde_json::from_str("\"door_7\"").unwrap();
        assert_eq!(text, BehaviorValue::Text("door_7".to_string()));
    }
}
