//! Visual Sync System
//!
//! Mirrors the session's visual arena into Bevy entities. Each visual becomes a root
//! entity carrying the record transform, a pivot child, and one mesh child per part.
//! Visuals gone from the arena are despawned together with their meshes and materials.

use std::collections::HashMap;

use bevy::color::{Alpha, Srgba};
use bevy::prelude::*;

use crate::level_editor::components::{EditorVisual, IdleMotion, VisualPivot};
use crate::level_editor::session::EditorSession;
use crate::level_editor::visual::{PartShape, VisualId, VisualNode};

struct SpawnedVisual {
    root: Entity,
    materials: Vec<Handle<StandardMaterial>>,
    revision: u64,
}

/// Entities spawned for each live visual
#[derive(Resource, Default)]
pub struct SpawnedVisuals {
    visuals: HashMap<VisualId, SpawnedVisual>,
}

pub fn visual_sync_system(
    mut commands: Commands,
    session: Res<EditorSession>,
    mut spawned: ResMut<SpawnedVisuals>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query_roots: Query<&mut Transform, With<EditorVisual>>,
) {
    let arena = session.engine().visuals();

    // Dispose first so a visual never outlives its record
    let disposed: Vec<VisualId> = spawned
        .visuals
        .keys()
        .copied()
        .filter(|id| !arena.contains(*id))
        .collect();
    for id in disposed {
        if let Some(visual) = spawned.visuals.remove(&id) {
            commands.entity(visual.root).despawn();
            for material in visual.materials {
                materials.remove(&material);
            }
            log::debug!("[VisualSync] Despawned visual {}", id.index());
        }
    }

    for (id, node) in arena.iter() {
        match spawned.visuals.get_mut(&id) {
            Some(visual) if visual.revision != node.revision() => {
                if let Ok(mut transform) = query_roots.get_mut(visual.root) {
                    *transform = root_transform(node);
                }
                for (handle, part) in visual.materials.iter().zip(node.parts()) {
                    if let Some(material) = materials.get_mut(handle) {
                        material.base_color = part_color(&part.color, node.opacity());
                    }
                }
                visual.revision = node.revision();
            }
            Some(_) => {}
            None => {
                let visual = spawn_visual(&mut commands, &mut meshes, &mut materials, id, node);
                spawned.visuals.insert(id, visual);
            }
        }
    }
}

fn spawn_visual(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    id: VisualId,
    node: &VisualNode,
) -> SpawnedVisual {
    let root = commands
        .spawn((
            EditorVisual { id },
            root_transform(node),
            Visibility::default(),
        ))
        .id();

    let mut pivot = commands.spawn((
        VisualPivot,
        Transform::default(),
        Visibility::default(),
        ChildOf(root),
    ));
    if node.idle_motion() {
        pivot.insert(IdleMotion {
            phase: id.index() as f32 * 0.7,
        });
    }
    let pivot = pivot.id();

    let alpha_mode = if node.opacity() < 1.0 {
        AlphaMode::Blend
    } else {
        AlphaMode::Opaque
    };

    let mut part_materials = Vec::with_capacity(node.parts().len());
    for part in node.parts() {
        let material = materials.add(StandardMaterial {
            base_color: part_color(&part.color, node.opacity()),
            perceptual_roughness: 0.8,
            alpha_mode,
            ..default()
        });
        commands.spawn((
            Mesh3d(meshes.add(part_mesh(&part.shape))),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(part.offset).with_rotation(part.rotation),
            ChildOf(pivot),
        ));
        part_materials.push(material);
    }

    log::debug!("[VisualSync] Spawned visual {}", id.index());
    SpawnedVisual {
        root,
        materials: part_materials,
        revision: node.revision(),
    }
}

fn root_transform(node: &VisualNode) -> Transform {
    Transform {
        translation: node.translation(),
        rotation: node.rotation(),
        scale: node.scale(),
    }
}

fn part_color(hex: &str, opacity: f32) -> Color {
    let color = Srgba::hex(hex).unwrap_or(Srgba::WHITE);
    Color::from(color.with_alpha(opacity))
}

fn part_mesh(shape: &PartShape) -> Mesh {
    match *shape {
        PartShape::Cuboid { size } => Mesh::from(Cuboid::from_size(size)),
        PartShape::Sphere { radius } => Mesh::from(Sphere::new(radius)),
        PartShape::Cylinder { radius, height } => Mesh::from(Cylinder::new(radius, height)),
        PartShape::Cone { radius, height } => Mesh::from(Cone::new(radius, height)),
        PartShape::Torus {
            minor_radius,
            major_radius,
        } => Mesh::from(Torus::new(
            major_radius - minor_radius,
            major_radius + minor_radius,
        )),
    }
}
