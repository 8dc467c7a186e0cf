//! Scene assembly
//!
//! Builds the initial machine from a `SceneConfig` and the loaded holes, in
//! a fixed order so ids come out the same on every run:
//! boundaries, ramps, holes, ball stack, stick, dominoes, pendulum, levers.

use glam::Vec2;

use super::factory::{
    LeverHandles, PendulumHandles, create_ball, create_boundary, create_domino,
    create_fixed_stick, create_lever, create_pendulum, create_segment,
};
use super::geometry::HoleDescriptor;
use super::world::{BodyId, ColliderId, World};
use crate::error::SceneError;
use crate::settings::{BallPreset, BallStack, DominoPreset, SceneConfig, SegmentPreset};

/// Ids of everything the assembler created
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneHandles {
    pub boundaries: Vec<BodyId>,
    pub ramps: Vec<BodyId>,
    /// Left wall, right wall, bottom per hole
    pub holes: Vec<[ColliderId; 3]>,
    pub balls: Vec<BodyId>,
    pub stick: Option<BodyId>,
    pub dominoes: Vec<BodyId>,
    pub pendulum: Option<PendulumHandles>,
    pub levers: Vec<LeverHandles>,
}

impl SceneHandles {
    /// Dynamic bodies the assembler created
    pub fn dynamic_count(&self) -> usize {
        self.balls.len()
            + self.dominoes.len()
            + self.stick.iter().count()
            + self.pendulum.iter().count()
            + self.levers.len()
    }
}

/// Build the full machine into `world`, which should be fresh
pub fn assemble_scene(
    world: &mut World,
    config: &SceneConfig,
    holes: &[HoleDescriptor],
) -> Result<SceneHandles, SceneError> {
    config.validate()?;
    let mut scene = SceneHandles::default();

    for boundary in &config.boundaries {
        let (body, _) = create_boundary(world, boundary)?;
        scene.boundaries.push(body);
    }

    for [start, end] in &config.ramps {
        let (body, _) = create_segment(world, *start, *end, &config.wood)?;
        scene.ramps.push(body);
    }

    scene.holes = create_all_holes(world, holes)?;

    for position in ball_stack_positions(&config.ball_stack, &config.primary_ball) {
        scene.balls.push(create_ball(world, position, &config.primary_ball)?);
    }

    scene.stick = Some(create_fixed_stick(world, &config.stick)?);

    for position in domino_positions(&config.dominoes) {
        let (body, _) = create_domino(world, position, &config.dominoes)?;
        scene.dominoes.push(body);
    }

    scene.pendulum = Some(create_pendulum(world, &config.pendulum)?);

    for lever in &config.levers {
        scene.levers.push(create_lever(world, lever)?);
    }

    log::info!(
        "Scene assembled: {} static bodies, {} dynamic bodies, {} colliders, {} pivots",
        world.static_body_count(),
        world.dynamic_body_count(),
        world.collider_count(),
        world.constraint_count()
    );
    Ok(scene)
}

/// Three static segments per hole: left wall, right wall, bottom
pub fn create_all_holes(
    world: &mut World,
    holes: &[HoleDescriptor],
) -> Result<Vec<[ColliderId; 3]>, SceneError> {
    holes
        .iter()
        .map(|hole| {
            let preset = SegmentPreset {
                radius: hole.radius,
                friction: hole.friction,
                elasticity: hole.elasticity,
                color: hole.color,
            };
            let [left, right, bottom] = hole.walls();
            let (_, left) = create_segment(world, left[0], left[1], &preset)?;
            let (_, right) = create_segment(world, right[0], right[1], &preset)?;
            let (_, bottom) = create_segment(world, bottom[0], bottom[1], &preset)?;
            log::debug!("hole '{}' built", hole.name);
            Ok([left, right, bottom])
        })
        .collect()
}

/// Domino centres along the shelf.
///
/// Each centre sits half a width, a gap of `height * spacing_factor`, and
/// another half width to the right of the previous one.
pub fn domino_positions(preset: &DominoPreset) -> Vec<Vec2> {
    let half = preset.width / 2.0;
    let gap = preset.height * preset.spacing_factor;
    let mut positions: Vec<Vec2> = Vec::with_capacity(preset.count);
    for _ in 0..preset.count {
        let x = match positions.last() {
            None => preset.start.x,
            Some(prev) => prev.x + half + gap + half,
        };
        positions.push(Vec2::new(x, preset.start.y));
    }
    positions
}

/// Ball centres of a stack, lowest first
pub fn ball_stack_positions(stack: &BallStack, ball: &BallPreset) -> Vec<Vec2> {
    let pitch = 2.0 * ball.radius + stack.gap;
    (0..stack.count)
        .map(|i| stack.base - Vec2::new(0.0, pitch * i as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{LeverPreset, WorldParams};
    use crate::sim::geometry::parse_holes;
    use crate::sim::world::BodyKind;
    use proptest::prelude::*;
    use std::path::Path;

    const ONE_HOLE: &str = r#"[{
        "left_wall": [[0, 0], [0, 10]],
        "right_wall": [[10, 0], [10, 10]],
        "bottom": [[0, 10], [10, 10]],
        "radius": 2, "friction": 0.4, "elasticity": 0.5, "color": [0, 0, 0, 255]
    }]"#;

    fn bundled_holes() -> Vec<HoleDescriptor> {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/holes.json");
        crate::sim::geometry::load_holes(path).unwrap()
    }

    #[test]
    fn test_one_hole_yields_three_static_colliders() {
        let holes = parse_holes(ONE_HOLE, Path::new("holes.json")).unwrap();
        let mut world = World::new(&WorldParams::default()).unwrap();
        let ids = create_all_holes(&mut world, &holes).unwrap();

        assert_eq!(ids.len(), 1);
        assert_eq!(world.collider_count(), 3);
        assert_eq!(world.static_body_count(), 3);
        assert_eq!(world.dynamic_body_count(), 0);
        for collider in world.colliders() {
            assert!((collider.friction - 0.4).abs() < 1e-6);
            assert!((collider.elasticity - 0.5).abs() < 1e-6);
            assert_eq!(world.body(collider.body).unwrap().kind, BodyKind::Static);
        }
    }

    #[test]
    fn test_collider_count_is_three_per_hole() {
        let holes = bundled_holes();
        let mut world = World::new(&WorldParams::default()).unwrap();
        create_all_holes(&mut world, &holes).unwrap();
        assert_eq!(world.collider_count(), 3 * holes.len());
    }

    #[test]
    fn test_malformed_holes_create_nothing() {
        let text = ONE_HOLE.replace("\"radius\": 2,", "");
        let mut world = World::new(&WorldParams::default()).unwrap();
        let result = parse_holes(&text, Path::new("holes.json"))
            .and_then(|holes| create_all_holes(&mut world, &holes));
        assert!(matches!(result, Err(SceneError::ConfigMalformed { .. })));
        assert_eq!(world.collider_count(), 0);
    }

    #[test]
    fn test_default_scene_counts() {
        let config = SceneConfig::default();
        let holes = bundled_holes();
        let mut world = World::new(&config.world).unwrap();
        let scene = assemble_scene(&mut world, &config, &holes).unwrap();

        assert_eq!(world.dynamic_body_count(), 12 + 1 + 1 + 6);
        assert_eq!(
            world.static_body_count(),
            4 + config.ramps.len() + 3 * holes.len() + 1
        );
        assert_eq!(scene.dynamic_count(), world.dynamic_body_count());
        assert_eq!(scene.balls.len(), 6);
        assert_eq!(scene.dominoes.len(), 12);
        assert_eq!(scene.holes.len(), holes.len());
        // Stick pivot + pendulum pivot
        assert_eq!(world.constraint_count(), 2);
    }

    #[test]
    fn test_assembly_order_is_deterministic() {
        let config = SceneConfig::default();
        let holes = bundled_holes();

        let mut w1 = World::new(&config.world).unwrap();
        let mut w2 = World::new(&config.world).unwrap();
        let s1 = assemble_scene(&mut w1, &config, &holes).unwrap();
        let s2 = assemble_scene(&mut w2, &config, &holes).unwrap();

        assert_eq!(s1, s2);
        assert!(w1.bodies().eq(w2.bodies()));
        // Boundaries come first, right after the static frame
        assert_eq!(s1.boundaries[0], BodyId(1));
    }

    #[test]
    fn test_scene_variant_with_lever() {
        let mut config = SceneConfig::default();
        config
            .levers
            .push(LeverPreset::new(Vec2::new(900.0, 600.0), Vec2::new(1100.0, 600.0), 6.0, 2.0));
        let mut world = World::new(&config.world).unwrap();
        let scene = assemble_scene(&mut world, &config, &[]).unwrap();
        assert_eq!(scene.levers.len(), 1);
        assert_eq!(world.dynamic_body_count(), 21);
        assert_eq!(world.constraint_count(), 3);
    }

    #[test]
    fn test_invalid_config_builds_nothing() {
        let mut config = SceneConfig::default();
        config.dominoes.mass = -1.0;
        let mut world = World::new(&config.world).unwrap();
        assert!(assemble_scene(&mut world, &config, &[]).is_err());
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_default_dominoes_do_not_overlap() {
        let preset = DominoPreset::default();
        let positions = domino_positions(&preset);
        assert_eq!(positions.len(), 12);
        assert_eq!(positions[0].x, preset.start.x);
        for pair in positions.windows(2) {
            let clearance = (pair[1].x - pair[0].x) - preset.width;
            assert!((clearance - preset.height * preset.spacing_factor).abs() < 1e-3);
        }
    }

    #[test]
    fn test_ball_stack_spacing() {
        let stack = BallStack::default();
        let ball = BallPreset::default();
        let positions = ball_stack_positions(&stack, &ball);
        assert_eq!(positions.len(), stack.count);
        assert_eq!(positions[0], stack.base);
        for pair in positions.windows(2) {
            // Balls do not touch at rest
            assert!(pair[0].distance(pair[1]) > 2.0 * ball.radius);
        }
    }

    proptest! {
        #[test]
        fn prop_domino_recurrence(
            count in 1usize..40,
            x0 in -500.0f32..500.0,
            width in 1.0f32..30.0,
            height in 5.0f32..80.0,
            factor in 0.05f32..1.5,
        ) {
            let preset = DominoPreset {
                count,
                start: Vec2::new(x0, 100.0),
                width,
                height,
                spacing_factor: factor,
                ..DominoPreset::default()
            };
            let positions = domino_positions(&preset);
            prop_assert_eq!(positions.len(), count);
            for i in 1..count {
                let step = positions[i].x - positions[i - 1].x;
                prop_assert!(step > 0.0);
                let expected = width / 2.0 + height * factor + width / 2.0;
                prop_assert!((step - expected).abs() <= 1e-3 * expected.max(1.0));
                prop_assert!(step > width);
                prop_assert_eq!(positions[i].y, 100.0);
            }
        }
    }
}
