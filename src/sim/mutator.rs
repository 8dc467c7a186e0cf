//! Runtime mutation: the user drops a new ball into the running machine.

use glam::Vec2;

use super::factory::create_ball;
use super::world::{BodyId, World};
use crate::error::SceneError;
use crate::settings::BallPreset;

/// Spawn one primary ball at `position`.
///
/// Only adds; existing bodies keep their state until the next step.
pub fn on_spawn_request(
    world: &mut World,
    position: Vec2,
    preset: &BallPreset,
) -> Result<BodyId, SceneError> {
    let body = create_ball(world, position, preset)?;
    log::info!(
        "Spawned ball {} at ({:.0}, {:.0}); {} dynamic bodies",
        body,
        position.x,
        position.y,
        world.dynamic_body_count()
    );
    Ok(body)
}
