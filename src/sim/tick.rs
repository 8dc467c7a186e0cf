//! Fixed timestep simulation tick
//!
//! Frame protocol: read input, apply at most one queued spawn, advance the
//! world by exactly one fixed quantum, then damp the spin of every dynamic
//! body that exists at that point.

use std::collections::VecDeque;

use glam::Vec2;

use super::geometry::HoleDescriptor;
use super::mutator::on_spawn_request;
use super::scene::{SceneHandles, assemble_scene};
use super::snapshot::SceneSnapshot;
use super::world::{BodyId, World};
use crate::error::SceneError;
use crate::platform::PointerEvent;
use crate::settings::SceneConfig;

/// Stepper state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPhase {
    /// Scene built, no step taken yet
    Idle,
    Running,
}

/// What the frame loop should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Quit,
}

/// Input gathered for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub events: Vec<PointerEvent>,
}

impl FrameInput {
    pub fn new(events: Vec<PointerEvent>) -> Self {
        Self { events }
    }
}

/// Multiply every dynamic body's angular velocity by `factor`.
///
/// Returns how many bodies were visited.
pub fn damp_angular_velocities(world: &mut World, factor: f32) -> Result<usize, SceneError> {
    let bodies: Vec<BodyId> = world.dynamic_bodies().collect();
    for &body in &bodies {
        if let Some(angvel) = world.angular_velocity(body) {
            if angvel != 0.0 {
                world.set_angular_velocity(body, angvel * factor)?;
            }
        }
    }
    Ok(bodies.len())
}

/// The running machine: world, presets and the frame state machine
pub struct Simulation {
    world: World,
    config: SceneConfig,
    scene: SceneHandles,
    phase: SimPhase,
    frames: u64,
    pending_spawns: VecDeque<Vec2>,
}

impl Simulation {
    /// Build the whole scene; the first step happens on the first `tick`
    pub fn new(config: SceneConfig, holes: &[HoleDescriptor]) -> Result<Self, SceneError> {
        let mut world = World::new(&config.world)?;
        let scene = assemble_scene(&mut world, &config, holes)?;
        Ok(Self {
            world,
            config,
            scene,
            phase: SimPhase::Idle,
            frames: 0,
            pending_spawns: VecDeque::new(),
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneHandles {
        &self.scene
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    /// Frames fully stepped so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Spawn requests waiting for a later frame
    pub fn pending_spawns(&self) -> usize {
        self.pending_spawns.len()
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        self.world.snapshot()
    }

    /// Run one frame
    pub fn tick(&mut self, input: &FrameInput) -> Result<FrameControl, SceneError> {
        for event in &input.events {
            if event.ends_session() {
                log::info!("Quit requested after {} frames", self.frames);
                return Ok(FrameControl::Quit);
            }
            match *event {
                PointerEvent::PrimaryPress(pos) => {
                    log::info!("Left mouse click at: ({:.0}, {:.0})", pos.x, pos.y);
                }
                PointerEvent::SecondaryPress(pos) => self.pending_spawns.push_back(pos),
                _ => {}
            }
        }

        if self.phase == SimPhase::Idle {
            self.phase = SimPhase::Running;
            log::info!(
                "Simulation running at {:.0} Hz with {} dynamic bodies",
                1.0 / self.config.world.time_step,
                self.world.dynamic_body_count()
            );
        }

        // One spawn per frame; the rest wait their turn
        if let Some(pos) = self.pending_spawns.pop_front() {
            on_spawn_request(&mut self.world, pos, &self.config.primary_ball)?;
        }

        self.world.step()?;
        damp_angular_velocities(&mut self.world, self.config.world.angular_damping)?;
        self.frames += 1;
        Ok(FrameControl::Continue)
    }
}
