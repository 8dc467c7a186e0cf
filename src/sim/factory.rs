//! Entity factory
//!
//! One function per entity kind. Each call validates its preset, then adds
//! a fresh set of bodies, colliders and pivots to the world. Nothing that
//! already exists is touched, and nothing is created when validation fails.

use glam::Vec2;

use super::world::{
    BodyId, ColliderId, CollisionCategory, Color, ConstraintId, Material, ShapeDesc, World,
};
use crate::consts::BALL_COLOR;
use crate::error::SceneError;
use crate::settings::{
    BallPreset, BoundaryPreset, DominoPreset, LeverPreset, PendulumPreset, SegmentPreset,
    StickPreset,
};
use crate::{is_finite_point, segment_angle};

/// Everything a see-saw is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeverHandles {
    pub body: BodyId,
    pub collider: ColliderId,
    pub pivot: ConstraintId,
}

/// Everything a pendulum is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendulumHandles {
    pub anchor: BodyId,
    pub bob: BodyId,
    pub bob_collider: ColliderId,
    pub rope: ColliderId,
    pub pivot: ConstraintId,
}

fn ensure_position(entity: &'static str, position: Vec2) -> Result<(), SceneError> {
    if is_finite_point(position) {
        Ok(())
    } else {
        Err(SceneError::invalid(
            entity,
            format!("position must be finite, got {position}"),
        ))
    }
}

/// Static body at the segment midpoint with a capsule spanning the segment
fn static_segment(
    world: &mut World,
    start: Vec2,
    end: Vec2,
    radius: f32,
    material: Material,
    color: Option<Color>,
) -> Result<(BodyId, ColliderId), SceneError> {
    let mid = (start + end) / 2.0;
    let shape = ShapeDesc::capsule(start - mid, end - mid, radius);
    shape.validate()?;

    let body = world.add_static_body(mid, 0.0)?;
    let collider = world.attach_collider(body, shape, material, color, CollisionCategory::Scenery)?;
    Ok((body, collider))
}

/// One play-field wall
pub fn create_boundary(
    world: &mut World,
    preset: &BoundaryPreset,
) -> Result<(BodyId, ColliderId), SceneError> {
    preset.validate()?;
    static_segment(
        world,
        preset.start,
        preset.end,
        preset.thickness,
        Material::new(preset.friction, preset.elasticity),
        None,
    )
}

/// A free ball; moment is that of a uniform disc
pub fn create_ball(
    world: &mut World,
    position: Vec2,
    preset: &BallPreset,
) -> Result<BodyId, SceneError> {
    preset.validate()?;
    ensure_position("ball", position)?;

    let shape = ShapeDesc::circle(preset.radius);
    let moment = shape.moment(preset.mass);
    let body = world.add_dynamic_body(position, 0.0, preset.mass, moment)?;
    world.attach_collider(
        body,
        shape,
        Material::new(preset.friction, preset.elasticity),
        Some(Color(BALL_COLOR)),
        CollisionCategory::Ball,
    )?;
    // Balls are small and fast enough to skip through wall capsules
    world.enable_ccd(body)?;
    log::debug!("ball {} at {}", body, position);
    Ok(body)
}

/// Static ramp, funnel wall or shelf
pub fn create_segment(
    world: &mut World,
    start: Vec2,
    end: Vec2,
    preset: &SegmentPreset,
) -> Result<(BodyId, ColliderId), SceneError> {
    preset.validate()?;
    static_segment(
        world,
        start,
        end,
        preset.radius,
        Material::new(preset.friction, preset.elasticity),
        Some(preset.color),
    )
}

/// Dynamic bar that swings about `preset.pivot`
pub fn create_fixed_stick(world: &mut World, preset: &StickPreset) -> Result<BodyId, SceneError> {
    preset.validate()?;

    let mid = (preset.start + preset.end) / 2.0;
    let shape = ShapeDesc::capsule(preset.start - mid, preset.end - mid, preset.radius);
    let moment = shape.moment(preset.mass);
    let body = world.add_dynamic_body(mid, 0.0, preset.mass, moment)?;
    world.attach_collider(
        body,
        shape,
        Material::new(preset.friction, preset.elasticity),
        Some(preset.color),
        CollisionCategory::Mechanism,
    )?;
    let frame = world.static_frame();
    world.add_constraint(frame, body, preset.pivot)?;
    log::debug!("stick {} pivoted at {}", body, preset.pivot);
    Ok(body)
}

/// Plank from `start` to `end`, balanced on a pivot at its centre
pub fn create_lever(world: &mut World, preset: &LeverPreset) -> Result<LeverHandles, SceneError> {
    preset.validate()?;

    let center = (preset.start + preset.end) / 2.0;
    let length = preset.start.distance(preset.end);
    let shape = ShapeDesc::rect(length, preset.thickness);
    let moment = shape.moment(preset.mass);
    let body = world.add_dynamic_body(
        center,
        segment_angle(preset.start, preset.end),
        preset.mass,
        moment,
    )?;
    let collider = world.attach_collider(
        body,
        shape,
        Material::new(preset.friction, preset.elasticity),
        Some(preset.color),
        CollisionCategory::Mechanism,
    )?;
    let frame = world.static_frame();
    let pivot = world.add_constraint(frame, body, center)?;
    log::debug!("lever {} balanced at {}", body, center);
    Ok(LeverHandles {
        body,
        collider,
        pivot,
    })
}

/// Upright domino centred at `position`
pub fn create_domino(
    world: &mut World,
    position: Vec2,
    preset: &DominoPreset,
) -> Result<(BodyId, ColliderId), SceneError> {
    preset.validate()?;
    ensure_position("domino", position)?;

    let shape = ShapeDesc::rect(preset.width, preset.height);
    let moment = shape.moment(preset.mass);
    let body = world.add_dynamic_body(position, 0.0, preset.mass, moment)?;
    let collider = world.attach_collider(
        body,
        shape,
        Material::new(preset.friction, preset.elasticity),
        Some(preset.color),
        CollisionCategory::Domino,
    )?;
    Ok((body, collider))
}

/// Static anchor, bob with a rope collider, and the pivot between them
pub fn create_pendulum(
    world: &mut World,
    preset: &PendulumPreset,
) -> Result<PendulumHandles, SceneError> {
    preset.validate()?;

    let bob_preset = &preset.pendulum_mass;
    let material = Material::new(bob_preset.friction, bob_preset.elasticity);
    let bob_shape = ShapeDesc::circle(bob_preset.radius);
    let rope_shape = ShapeDesc::capsule(Vec2::ZERO, preset.rope_offset(), preset.rope.radius);
    rope_shape.validate()?;

    let anchor = world.add_static_body(preset.anchor, 0.0)?;
    let bob = world.add_dynamic_body(
        bob_preset.pos,
        0.0,
        bob_preset.mass,
        bob_shape.moment(bob_preset.mass),
    )?;
    let bob_collider = world.attach_collider(
        bob,
        bob_shape,
        material,
        Some(bob_preset.color),
        CollisionCategory::Mechanism,
    )?;
    let rope = world.attach_collider(
        bob,
        rope_shape,
        material,
        Some(preset.rope.color),
        CollisionCategory::Mechanism,
    )?;
    let pivot = world.add_constraint(anchor, bob, preset.anchor)?;
    log::debug!("pendulum bob {} hanging from {}", bob, preset.anchor);

    Ok(PendulumHandles {
        anchor,
        bob,
        bob_collider,
        rope,
        pivot,
    })
}
