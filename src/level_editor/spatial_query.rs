//! Spatial Query
//!
//! Casts a camera ray against the ground plane (y = 0) and the bounding boxes of
//! placed objects. Every query is computed fresh; nothing is cached between calls.

use bevy::math::{
    bounding::{Aabb3d, RayCast3d},
    primitives::InfinitePlane3d,
    Ray3d, Vec3,
};

use crate::level_editor::placement::{ObjectId, PlacementEngine};

/// Result of a pointer ray cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub point: Vec3,
    /// Distance along the ray
    pub distance: f32,
    /// Struck object, `None` for the ground
    pub object: Option<ObjectId>,
}

/// Distance along `ray` to the ground plane, if it is hit in front of the origin
pub fn ground_distance(ray: Ray3d) -> Option<f32> {
    ray.intersect_plane(Vec3::ZERO, InfinitePlane3d::new(Vec3::Y))
}

pub fn ground_hit(ray: Ray3d) -> Option<Vec3> {
    ground_distance(ray).map(|distance| ray.get_point(distance))
}

fn box_distance(ray: Ray3d, bounds: &Aabb3d) -> Option<f32> {
    RayCast3d::from_ray(ray, f32::MAX).aabb_intersection_at(bounds)
}

/// Nearest struck object along `ray`, ignoring the ground
pub fn pick_object(ray: Ray3d, engine: &PlacementEngine) -> Option<Hit> {
    engine
        .objects()
        .iter()
        .filter_map(|object| {
            let bounds = engine.world_bounds(object.id())?;
            let distance = box_distance(ray, &bounds)?;
            Some(Hit {
                point: ray.get_point(distance),
                distance,
                object: Some(object.id()),
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Nearest hit among the ground and every placed object.
///
/// An object wins over the ground when it is at least as close.
pub fn pick(ray: Ray3d, engine: &PlacementEngine) -> Option<Hit> {
    let ground = ground_distance(ray).map(|distance| Hit {
        point: ray.get_point(distance),
        distance,
        object: None,
    });
    let object = pick_object(ray, engine);

    match (object, ground) {
        (Some(object), Some(ground)) if object.distance <= ground.distance => Some(object),
        (_, Some(ground)) => Some(ground),
        (object, None) => object,
    }
}
