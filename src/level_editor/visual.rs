//! Editor Visuals
//!
//! This module holds the editor-side render layer: a tree of primitive parts per
//! visual (`VisualNode`) and the arena that owns every live visual (`VisualArena`).
//!
//! Visuals are written to, never read back from. Placed object records push their
//! transform and color into the node, and the Bevy layer mirrors the arena into
//! entities (see `systems::visual_sync_system`). Disposing a visual from the arena
//! is what releases its entities and GPU-side assets.

use std::collections::BTreeMap;

use bevy::math::{bounding::Aabb3d, EulerRot, Quat, Vec3};

/// Opacity used for the placement ghost
pub const GHOST_OPACITY: f32 = 0.45;

/// Handle to a visual owned by the `VisualArena`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualId(u64);

impl VisualId {
    pub fn index(&self) -> u64 {
        self.0
    }
}

/// Primitive geometry for one part of a visual, centered on the part origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartShape {
    Cuboid { size: Vec3 },
    Sphere { radius: f32 },
    /// Axis along local Y
    Cylinder { radius: f32, height: f32 },
    /// Base at -height/2, tip at +height/2
    Cone { radius: f32, height: f32 },
    /// Ring in the local XZ plane
    Torus { minor_radius: f32, major_radius: f32 },
}

impl PartShape {
    /// Half extents of the shape's local axis-aligned box
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            PartShape::Cuboid { size } => size * 0.5,
            PartShape::Sphere { radius } => Vec3::splat(radius),
            PartShape::Cylinder { radius, height } | PartShape::Cone { radius, height } => {
                Vec3::new(radius, height * 0.5, radius)
            }
            PartShape::Torus {
                minor_radius,
                major_radius,
            } => {
                let outer = major_radius + minor_radius;
                Vec3::new(outer, minor_radius, outer)
            }
        }
    }
}

/// One renderable part of a visual
#[derive(Debug, Clone, PartialEq)]
pub struct VisualPart {
    pub shape: PartShape,
    pub offset: Vec3,
    pub rotation: Quat,
    /// Current base color as `#rrggbb`
    pub color: String,
    /// Only tintable parts follow the object's color
    pub tintable: bool,
}

impl VisualPart {
    /// A part that exposes a tintable base color slot
    pub fn tinted(shape: PartShape, offset: Vec3) -> Self {
        Self {
            shape,
            offset,
            rotation: Quat::IDENTITY,
            color: String::from("#ffffff"),
            tintable: true,
        }
    }

    /// A part with a fixed color that recoloring never touches
    pub fn fixed(shape: PartShape, offset: Vec3, color: &str) -> Self {
        Self {
            shape,
            offset,
            rotation: Quat::IDENTITY,
            color: color.to_string(),
            tintable: false,
        }
    }

    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }
}

/// A live renderable instance: root transform plus its parts
#[derive(Debug, Clone, PartialEq)]
pub struct VisualNode {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
    parts: Vec<VisualPart>,
    opacity: f32,
    idle_motion: bool,
    revision: u64,
}

impl VisualNode {
    pub fn new(parts: Vec<VisualPart>) -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            parts,
            opacity: 1.0,
            idle_motion: false,
            revision: 0,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_idle_motion(mut self, idle_motion: bool) -> Self {
        self.idle_motion = idle_motion;
        self
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn parts(&self) -> &[VisualPart] {
        &self.parts
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn idle_motion(&self) -> bool {
        self.idle_motion
    }

    /// Bumped on every mutation so mirrors know when to resync
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        if self.translation != translation {
            self.translation = translation;
            self.revision += 1;
        }
    }

    /// Sets the root transform, rotation given as XYZ euler angles in degrees
    pub fn set_transform(&mut self, translation: Vec3, rotation_degrees: Vec3, scale: Vec3) {
        self.translation = translation;
        self.rotation = euler_degrees_to_quat(rotation_degrees);
        self.scale = scale;
        self.revision += 1;
    }

    /// Applies `color` to every tintable part, returns how many parts changed
    pub fn recolor(&mut self, color: &str) -> usize {
        let mut touched = 0;
        for part in self.parts.iter_mut().filter(|part| part.tintable) {
            if part.color != color {
                part.color = color.to_string();
                touched += 1;
            }
        }
        if touched > 0 {
            self.revision += 1;
        }
        touched
    }

    /// World-space axis-aligned bounding box over all parts
    pub fn world_bounds(&self) -> Aabb3d {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);

        for part in &self.parts {
            let half = part.shape.half_extents();
            for corner in BOX_CORNERS {
                let local = part.offset + part.rotation * (half * corner);
                let world = self.translation + self.rotation * (self.scale * local);
                min = min.min(world);
                max = max.max(world);
            }
        }

        if self.parts.is_empty() {
            min = self.translation;
            max = self.translation;
        }

        Aabb3d {
            min: min.into(),
            max: max.into(),
        }
    }
}

const BOX_CORNERS: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
];

pub fn euler_degrees_to_quat(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        degrees.x.to_radians(),
        degrees.y.to_radians(),
        degrees.z.to_radians(),
    )
}

/// Owner of every live visual
#[derive(Debug, Default)]
pub struct VisualArena {
    nodes: BTreeMap<VisualId, VisualNode>,
    next_id: u64,
}

impl VisualArena {
    pub fn spawn(&mut self, node: VisualNode) -> VisualId {
        let id = VisualId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    /// Drops the visual, returns false if it was already gone
    pub fn dispose(&mut self, id: VisualId) -> bool {
        self.nodes.remove(&id).is_some()
    }

    pub fn get(&self, id: VisualId) -> Option<&VisualNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: VisualId) -> Option<&mut VisualNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: VisualId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VisualId, &VisualNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }
}
