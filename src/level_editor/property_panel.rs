//! Property Panel Binding
//!
//! Toolkit-independent model of the properties panel. `panel_for` reflects the
//! selected object into a list of field bindings; `apply_property_edit` parses a
//! committed field value and writes it back through the placement engine.
//!
//! Numeric input is parsed leniently: the longest numeric prefix is used, and text
//! with no numeric prefix becomes 0.

use bevy::math::Vec3;

use crate::level_editor::error::EditorError;
use crate::level_editor::placement::{ObjectId, PlacementEngine};
use crate::level_editor::prototypes::{BehaviorKind, BehaviorValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn label(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }

    fn get(&self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    fn with(&self, mut v: Vec3, value: f32) -> Vec3 {
        match self {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
            Axis::Z => v.z = value,
        }
        v
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyField {
    Position(Axis),
    Rotation(Axis),
    Scale(Axis),
    Color,
    Behavior(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    Text,
    Multiline,
    Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldBinding {
    pub field: PropertyField,
    pub label: String,
    pub kind: FieldKind,
    /// Current value as shown in the widget
    pub value: String,
}

/// Everything the properties panel shows for one selected object
#[derive(Debug, Clone, PartialEq)]
pub struct PanelModel {
    pub id: ObjectId,
    pub type_id: &'static str,
    pub display_name: &'static str,
    pub position: Vec<FieldBinding>,
    pub rotation: Vec<FieldBinding>,
    /// Empty for non-resizable prototypes
    pub scale: Vec<FieldBinding>,
    pub color: FieldBinding,
    pub behavior: Vec<FieldBinding>,
}

impl PanelModel {
    pub fn fields(&self) -> impl Iterator<Item = &FieldBinding> {
        self.position
            .iter()
            .chain(&self.rotation)
            .chain(&self.scale)
            .chain(std::iter::once(&self.color))
            .chain(&self.behavior)
    }
}

fn axis_fields(make: fn(Axis) -> PropertyField, value: Vec3) -> Vec<FieldBinding> {
    Axis::ALL
        .iter()
        .map(|axis| FieldBinding {
            field: make(*axis),
            label: axis.label().to_string(),
            kind: FieldKind::Number,
            value: axis.get(value).to_string(),
        })
        .collect()
}

/// Builds the panel for the selected object, `None` when nothing is selected
pub fn panel_for(engine: &PlacementEngine, selected: Option<ObjectId>) -> Option<PanelModel> {
    let object = engine.get(selected?)?;
    let prototype = object.prototype();

    let scale = if prototype.resizable {
        axis_fields(PropertyField::Scale, object.scale())
    } else {
        Vec::new()
    };

    // Schema fields first, in schema order, then any extra keys a loaded level carried
    let mut behavior: Vec<FieldBinding> = prototype
        .behavior_schema
        .iter()
        .map(|field| FieldBinding {
            field: PropertyField::Behavior(field.key.to_string()),
            label: field.label.to_string(),
            kind: match field.kind {
                BehaviorKind::Number => FieldKind::Number,
                BehaviorKind::Text => FieldKind::Text,
                BehaviorKind::Multiline => FieldKind::Multiline,
            },
            value: object
                .behavior()
                .get(field.key)
                .map(BehaviorValue::display)
                .unwrap_or_else(|| field.default_value().display()),
        })
        .collect();
    for (key, value) in object.behavior() {
        if prototype.behavior_field(key).is_none() {
            behavior.push(FieldBinding {
                field: PropertyField::Behavior(key.clone()),
                label: key.clone(),
                kind: match value {
                    BehaviorValue::Number(_) => FieldKind::Number,
                    BehaviorValue::Text(_) => FieldKind::Text,
                },
                value: value.display(),
            });
        }
    }

    Some(PanelModel {
        id: object.id(),
        type_id: prototype.type_id,
        display_name: prototype.display_name,
        position: axis_fields(PropertyField::Position, object.position()),
        rotation: axis_fields(PropertyField::Rotation, object.rotation()),
        scale,
        color: FieldBinding {
            field: PropertyField::Color,
            label: String::from("Color"),
            kind: FieldKind::Color,
            value: object.color().to_string(),
        },
        behavior,
    })
}

/// Parses the longest numeric prefix of `text`, like `"12.5px"` -> 12.5
pub fn parse_numeric(text: &str) -> Result<f64, EditorError> {
    let invalid = || EditorError::InvalidNumericInput(text.to_string());
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut digit_count = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        digit_count += frac_end - (end + 1);
        end = frac_end;
    }
    if digit_count == 0 {
        return Err(invalid());
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+') | Some(b'-')) {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    match trimmed[..end].parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(invalid()),
    }
}

/// `parse_numeric`, with unparsable text read as 0
pub fn numeric_or_zero(text: &str) -> f64 {
    parse_numeric(text).unwrap_or_else(|error| {
        log::debug!("[PropertyPanel] {}, using 0", error);
        0.0
    })
}

/// `numeric_or_zero` narrowed to a transform component. Values outside the f32 range
/// read as 0 so the record always stays serializable.
pub fn component_or_zero(text: &str) -> f32 {
    let value = numeric_or_zero(text) as f32;
    if value.is_finite() {
        value
    } else {
        log::debug!("[PropertyPanel] '{}' is out of range, using 0", text);
        0.0
    }
}

/// Normalizes `#rgb`, `#rrggbb` (with or without `#`) to lowercase `#rrggbb`
pub fn normalize_hex_color(text: &str) -> Option<String> {
    let hex = text.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some(format!("#{}", hex.to_ascii_lowercase())),
        3 => {
            let expanded: String = hex
                .chars()
                .flat_map(|c| [c, c])
                .collect::<String>()
                .to_ascii_lowercase();
            Some(format!("#{}", expanded))
        }
        _ => None,
    }
}

/// Writes a committed field value into the object. Returns false when nothing
/// was applied (object gone or an unusable color).
pub fn apply_property_edit(
    engine: &mut PlacementEngine,
    id: ObjectId,
    field: &PropertyField,
    text: &str,
) -> bool {
    let Some(object) = engine.get(id) else {
        return false;
    };

    match field {
        PropertyField::Position(axis) => {
            let position = axis.with(object.position(), component_or_zero(text));
            engine.set_position(id, position)
        }
        PropertyField::Rotation(axis) => {
            let rotation = axis.with(object.rotation(), component_or_zero(text));
            engine.set_rotation(id, rotation)
        }
        PropertyField::Scale(axis) => {
            let scale = axis.with(object.scale(), component_or_zero(text));
            engine.set_scale(id, scale)
        }
        PropertyField::Color => match normalize_hex_color(text) {
            Some(color) => engine.set_color(id, &color),
            None => {
                log::debug!("[PropertyPanel] Ignoring invalid color '{}'", text);
                false
            }
        },
        PropertyField::Behavior(key) => {
            let numeric = match object.prototype().behavior_field(key) {
                Some(field) => field.kind == BehaviorKind::Number,
                None => matches!(object.behavior().get(key), Some(BehaviorValue::Number(_))),
            };
            let value = if numeric {
                BehaviorValue::Number(numeric_or_zero(text))
            } else {
                BehaviorValue::Text(text.to_string())
            };
            engine.set_behavior(id, key, value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level_editor::prototypes::registry;
    use crate::level_editor::save::{serialize, GameSettings, LevelDocument};

    #[test]
    fn test_component_or_zero_rejects_f32_overflow() {
        assert_eq!(component_or_zero("1e39"), 0.0);
        assert_eq!(component_or_zero("-1e300"), 0.0);
        assert_eq!(component_or_zero("3.5e2"), 350.0);
    }

    #[test]
    fn test_parse_numeric_prefixes() {
        assert_eq!(parse_numeric("42"), Ok(42.0));
        assert_eq!(parse_numeric("  -3.5"), Ok(-3.5));
        assert_eq!(parse_numeric("12.5px"), Ok(12.5));
        assert_eq!(parse_numeric(".25"), Ok(0.25));
        assert_eq!(parse_numeric("1e3"), Ok(1000.0));
        assert_eq!(parse_numeric("7e"), Ok(7.0));
        assert_eq!(parse_numeric("+8"), Ok(8.0));
    }

    #[test]
    fn test_parse_numeric_rejects() {
        for text in ["", "abc", "-", ".", "e5", "1e999"] {
            assert_eq!(
                parse_numeric(text),
                Err(EditorError::InvalidNumericInput(text.to_string())),
                "{:?}",
                text
            );
        }
        assert_eq!(numeric_or_zero("oops"), 0.0);
    }

    #[test]
    fn test_normalize_hex_color() {
        assert_eq!(normalize_hex_color("#FFAA00"), Some(String::from("#ffaa00")));
        assert_eq!(normalize_hex_color("0f0"), Some(String::from("#00ff00")));
        assert_eq!(normalize_hex_color("#12345"), None);
        assert_eq!(normalize_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_panel_hides_scale_for_fixed_size_prototypes() {
        let mut engine = PlacementEngine::new(registry(), 10);
        let flag = engine.place("goal_flag", Vec3::ZERO).unwrap();
        let block = engine.place("stone_block", Vec3::X).unwrap();

        assert!(panel_for(&engine, Some(flag)).unwrap().scale.is_empty());
        assert_eq!(panel_for(&engine, Some(block)).unwrap().scale.len(), 3);
        assert!(panel_for(&engine, None).is_none());
    }

    #[test]
    fn test_panel_lists_behavior_in_schema_order() {
        let mut engine = PlacementEngine::new(registry(), 10);
        let id = engine.place("speed_boost", Vec3::ZERO).unwrap();

        let panel = panel_for(&engine, Some(id)).unwrap();
        let keys: Vec<_> = panel
            .behavior
            .iter()
            .map(|binding| binding.field.clone())
            .collect();
        assert_eq!(
            keys,
            vec![
                PropertyField::Behavior(String::from("speedMultiplier")),
                PropertyField::Behavior(String::from("duration")),
            ]
        );
        assert_eq!(panel.behavior[0].value, "1.8");
    }

    #[test]
    fn test_invalid_numeric_edit_becomes_zero() {
        let mut engine = PlacementEngine::new(registry(), 10);
        let id = engine.place("stone_block", Vec3::ZERO).unwrap();

        assert!(apply_property_edit(&mut engine, id, &PropertyField::Rotation(Axis::Y), "spin"));
        assert!(apply_property_edit(&mut engine, id, &PropertyField::Scale(Axis::X), "2.5m"));

        let object = engine.get(id).unwrap();
        assert_eq!(object.rotation().y, 0.0);
        assert_eq!(object.scale().x, 2.5);
    }

    #[test]
    fn test_out_of_range_edit_becomes_zero_and_level_reloads() {
        let mut engine = PlacementEngine::new(registry(), 10);
        let id = engine.place("stone_block", Vec3::ZERO).unwrap();

        assert!(apply_property_edit(&mut engine, id, &PropertyField::Position(Axis::Y), "1e300"));
        assert!(apply_property_edit(&mut engine, id, &PropertyField::Rotation(Axis::X), "1e39"));
        assert!(apply_property_edit(&mut engine, id, &PropertyField::Scale(Axis::Z), "-1e300"));

        let object = engine.get(id).unwrap();
        assert_eq!(object.position().y, 0.0);
        assert_eq!(object.rotation().x, 0.0);
        assert_eq!(object.scale().z, 0.0);
        assert!(engine.world_bounds(id).unwrap().min.is_finite());

        let document = LevelDocument::new(GameSettings::default(), serialize(engine.objects()));
        let json = document.to_json().unwrap();
        let reloaded = LevelDocument::from_json(&json).unwrap();
        assert_eq!(reloaded.objects[0].position.y, 0.0);
        assert_eq!(reloaded.objects[0].scale.z, 0.0);
    }

    #[test]
    fn test_position_edit_keeps_grid() {
        let mut engine = PlacementEngine::new(registry(), 10);
        let id = engine.place("stone_block", Vec3::ZERO).unwrap();

        apply_property_edit(&mut engine, id, &PropertyField::Position(Axis::X), "3.7");
        apply_property_edit(&mut engine, id, &PropertyField::Position(Axis::Y), "2.25");

        assert_eq!(engine.get(id).unwrap().position(), Vec3::new(4.0, 2.25, 0.0));
    }

    #[test]
    fn test_behavior_edits_follow_schema_kind() {
        let mut engine = PlacementEngine::new(registry(), 10);
        let sign = engine.place("sign_post", Vec3::ZERO).unwrap();
        let spikes = engine.place("spikes", Vec3::X).unwrap();

        let message = PropertyField::Behavior(String::from("message"));
        apply_property_edit(&mut engine, sign, &message, "Mind the gap\nand the spikes");
        let damage = PropertyField::Behavior(String::from("damage"));
        apply_property_edit(&mut engine, spikes, &damage, "40 hp");

        assert_eq!(
            engine.get(sign).unwrap().behavior()["message"],
            BehaviorValue::Text(String::from("Mind the gap\nand the spikes"))
        );
        assert_eq!(
            engine.get(spikes).unwrap().behavior()["damage"],
            BehaviorValue::Number(40.0)
        );
    }

    #[test]
    fn test_invalid_color_keeps_previous() {
        let mut engine = PlacementEngine::new(registry(), 10);
        let id = engine.place("rock", Vec3::ZERO).unwrap();
        let before = engine.get(id).unwrap().color().to_string();

        assert!(!apply_property_edit(&mut engine, id, &PropertyField::Color, "purple"));
        assert_eq!(engine.get(id).unwrap().color(), before);

        assert!(apply_property_edit(&mut engine, id, &PropertyField::Color, "#ABC"));
        assert_eq!(engine.get(id).unwrap().color(), "#aabbcc");
    }
}
