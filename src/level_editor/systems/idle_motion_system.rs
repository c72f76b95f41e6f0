//! Idle motion for collectibles. Only pivot transforms move; records never do.

use bevy::prelude::*;

use crate::level_editor::components::{IdleMotion, VisualPivot};

const BOB_HEIGHT: f32 = 0.15;
const BOB_SPEED: f32 = 2.0;
const SPIN_SPEED: f32 = 1.5;

pub fn idle_motion_system(
    time: Res<Time>,
    mut query_pivots: Query<(&IdleMotion, &mut Transform), With<VisualPivot>>,
) {
    let t = time.elapsed_secs();
    for (motion, mut transform) in query_pivots.iter_mut() {
        transform.translation.y = (t * BOB_SPEED + motion.phase).sin() * BOB_HEIGHT;
        transform.rotation = Quat::from_rotation_y(t * SPIN_SPEED + motion.phase);
    }
}
