//! Deterministic simulation module
//!
//! Everything that touches the physics world lives here:
//! - Fixed timestep only
//! - Stable construction order (ids are dense and assigned in build order)
//! - Angular damping applied once per step to every dynamic body
//! - No rendering or platform dependencies beyond `PointerEvent`

pub mod factory;
pub mod geometry;
pub mod mutator;
pub mod scene;
pub mod snapshot;
pub mod tick;
pub mod world;

pub use factory::{LeverHandles, PendulumHandles};
pub use geometry::{HoleDescriptor, load_holes, parse_holes};
pub use mutator::on_spawn_request;
pub use scene::{SceneHandles, assemble_scene};
pub use snapshot::SceneSnapshot;
pub use tick::{FrameControl, FrameInput, SimPhase, Simulation, damp_angular_velocities};
pub use world::{
    BodyId, BodyKind, BodyView, ColliderId, ColliderView, CollisionCategory, Color, ConstraintId,
    ConstraintView, Material, ShapeDesc, World,
};
