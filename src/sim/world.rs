//! Physics world wrapper
//!
//! Owns the rapier pipeline and sets, and keeps a registry that hands out
//! sequential ids in creation order. Everything outside this module talks
//! to the engine through ids, never through rapier handles.

use std::fmt;

use glam::Vec2;
use rapier2d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::DYNAMIC_BODY_SOFT_LIMIT;
use crate::error::SceneError;
use crate::is_finite_point;
use crate::settings::WorldParams;

/// Identifier of a body, assigned sequentially at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Identifier of a collider, assigned sequentially at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColliderId(pub u32);

/// Identifier of a pivot constraint, assigned sequentially at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConstraintId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

impl fmt::Display for ColliderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "collider#{}", self.0)
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constraint#{}", self.0)
    }
}

/// RGBA display color, 0-255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0, 255]);
}

/// Surface response parameters of a collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub friction: f32,
    pub elasticity: f32,
}

impl Material {
    pub fn new(friction: f32, elasticity: f32) -> Self {
        Self {
            friction,
            elasticity,
        }
    }
}

/// Body kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// The world's own fixed reference, pivots anchor to it
    Frame,
    /// Immovable scene geometry
    Static,
    /// Mass-bearing body driven by the solver
    Dynamic,
}

/// Collision categories used as engine membership groups.
///
/// New categories take the next free group; existing ones keep theirs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionCategory {
    /// Walls, ramps, funnels
    Scenery,
    Ball,
    Domino,
    /// Sticks, levers, pendulum parts
    Mechanism,
}

impl CollisionCategory {
    pub const ALL: [CollisionCategory; 4] = [
        CollisionCategory::Scenery,
        CollisionCategory::Ball,
        CollisionCategory::Domino,
        CollisionCategory::Mechanism,
    ];

    fn group(self) -> Group {
        match self {
            CollisionCategory::Scenery => Group::GROUP_1,
            CollisionCategory::Ball => Group::GROUP_2,
            CollisionCategory::Domino => Group::GROUP_3,
            CollisionCategory::Mechanism => Group::GROUP_4,
        }
    }

    /// Membership in this category's group, colliding with everything
    pub fn interaction_groups(self) -> InteractionGroups {
        InteractionGroups::new(self.group(), Group::ALL)
    }
}

/// Collider geometry in body-local coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDesc {
    Circle { radius: f32, offset: Vec2 },
    /// Segment from `a` to `b` thickened by `radius`
    Capsule { a: Vec2, b: Vec2, radius: f32 },
    Box { half_extents: Vec2 },
    /// Convex polygon; the engine takes the hull of the vertices
    Polygon { vertices: Vec<Vec2> },
}

impl ShapeDesc {
    pub fn circle(radius: f32) -> Self {
        ShapeDesc::Circle {
            radius,
            offset: Vec2::ZERO,
        }
    }

    pub fn capsule(a: Vec2, b: Vec2, radius: f32) -> Self {
        ShapeDesc::Capsule { a, b, radius }
    }

    pub fn rect(width: f32, height: f32) -> Self {
        ShapeDesc::Box {
            half_extents: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    /// Moment of inertia about the body origin for a uniform body of `mass`
    pub fn moment(&self, mass: f32) -> f32 {
        match self {
            ShapeDesc::Circle { radius, offset } => {
                mass * (radius * radius / 2.0 + offset.length_squared())
            }
            ShapeDesc::Capsule { a, b, radius } => {
                let len_sq = (*b - *a).length_squared();
                let mid = (*a + *b) / 2.0;
                mass * ((len_sq + 4.0 * radius * radius) / 12.0 + mid.length_squared())
            }
            ShapeDesc::Box { half_extents } => {
                let w = half_extents.x * 2.0;
                let h = half_extents.y * 2.0;
                mass * (w * w + h * h) / 12.0
            }
            ShapeDesc::Polygon { vertices } => polygon_moment(mass, vertices),
        }
    }

    /// Reject shapes the engine would accept but the solver chokes on
    pub fn validate(&self) -> Result<(), SceneError> {
        match self {
            ShapeDesc::Circle { radius, offset } => {
                if !(radius.is_finite() && *radius > 0.0) || !is_finite_point(*offset) {
                    return Err(SceneError::invalid(
                        "circle",
                        format!("radius must be positive, got {radius}"),
                    ));
                }
            }
            ShapeDesc::Capsule { a, b, radius } => {
                if !(radius.is_finite() && *radius > 0.0) {
                    return Err(SceneError::invalid(
                        "capsule",
                        format!("radius must be positive, got {radius}"),
                    ));
                }
                if !is_finite_point(*a) || !is_finite_point(*b) {
                    return Err(SceneError::invalid("capsule", "non-finite endpoint"));
                }
                if a.distance_squared(*b) == 0.0 {
                    return Err(SceneError::invalid(
                        "capsule",
                        format!("zero-length segment at {a}"),
                    ));
                }
            }
            ShapeDesc::Box { half_extents } => {
                if !(half_extents.x.is_finite()
                    && half_extents.y.is_finite()
                    && half_extents.x > 0.0
                    && half_extents.y > 0.0)
                {
                    return Err(SceneError::invalid(
                        "box",
                        format!("extents must be positive, got {half_extents}"),
                    ));
                }
            }
            ShapeDesc::Polygon { vertices } => {
                if vertices.len() < 3 || !vertices.iter().all(|v| is_finite_point(*v)) {
                    return Err(SceneError::invalid(
                        "polygon",
                        format!("need at least 3 finite vertices, got {}", vertices.len()),
                    ));
                }
                if polygon_signed_area(vertices).abs() <= f32::EPSILON {
                    return Err(SceneError::invalid("polygon", "vertices are collinear"));
                }
            }
        }
        Ok(())
    }

    fn collider_builder(&self) -> Option<ColliderBuilder> {
        match self {
            ShapeDesc::Circle { radius, offset } => {
                Some(ColliderBuilder::ball(*radius).translation(vector![offset.x, offset.y]))
            }
            ShapeDesc::Capsule { a, b, radius } => Some(ColliderBuilder::new(
                SharedShape::capsule(Point::new(a.x, a.y), Point::new(b.x, b.y), *radius),
            )),
            ShapeDesc::Box { half_extents } => {
                Some(ColliderBuilder::cuboid(half_extents.x, half_extents.y))
            }
            ShapeDesc::Polygon { vertices } => {
                let points: Vec<Point<Real>> =
                    vertices.iter().map(|v| Point::new(v.x, v.y)).collect();
                ColliderBuilder::convex_hull(&points)
            }
        }
    }
}

fn polygon_signed_area(vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    (0..n)
        .map(|i| vertices[i].perp_dot(vertices[(i + 1) % n]))
        .sum::<f32>()
        / 2.0
}

fn polygon_moment(mass: f32, vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    let mut num = 0.0;
    let mut den = 0.0;
    for i in 0..n {
        let v1 = vertices[i];
        let v2 = vertices[(i + 1) % n];
        let cross = v2.perp_dot(v1);
        num += cross * (v1.dot(v1) + v1.dot(v2) + v2.dot(v2));
        den += cross;
    }
    if den == 0.0 {
        return 0.0;
    }
    mass * num / (6.0 * den)
}

/// Read-only view of a body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyView {
    pub id: BodyId,
    pub kind: BodyKind,
    pub position: Vec2,
    pub rotation: f32,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    /// Infinite for static bodies
    pub mass: f32,
    pub moment: f32,
}

/// Read-only view of a collider, shape in body-local coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColliderView {
    pub id: ColliderId,
    pub body: BodyId,
    pub category: CollisionCategory,
    pub shape: ShapeDesc,
    /// Transform of the owning body
    pub position: Vec2,
    pub rotation: f32,
    pub friction: f32,
    pub elasticity: f32,
    pub color: Option<Color>,
}

/// Read-only view of a pivot constraint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintView {
    pub id: ConstraintId,
    pub body_a: BodyId,
    pub body_b: BodyId,
    /// Current world position of the pivot as seen from `body_a`
    pub anchor: Vec2,
}

struct BodyEntry {
    handle: RigidBodyHandle,
    kind: BodyKind,
    mass: f32,
    moment: f32,
}

struct ColliderEntry {
    handle: ColliderHandle,
    body: BodyId,
    shape: ShapeDesc,
    color: Option<Color>,
    category: CollisionCategory,
}

struct ConstraintEntry {
    #[allow(dead_code)]
    handle: ImpulseJointHandle,
    body_a: BodyId,
    body_b: BodyId,
    local_anchor_a: Vec2,
}

/// The physics simulation context
pub struct World {
    params: WorldParams,
    gravity: Vector<Real>,
    /// Engine damping coefficient equivalent to `params.damping`
    damping_coefficient: f32,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    body_entries: Vec<BodyEntry>,
    collider_entries: Vec<ColliderEntry>,
    constraint_entries: Vec<ConstraintEntry>,
    frame: BodyId,
    steps: u64,
    soft_limit_warned: bool,
}

impl World {
    /// Create an empty world holding only its static frame.
    ///
    /// Rejects parameters that would give bodies a non-finite damping.
    pub fn new(params: &WorldParams) -> Result<Self, SceneError> {
        params.validate()?;
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = params.time_step;

        let mut world = Self {
            params: params.clone(),
            gravity: vector![params.gravity.x, params.gravity.y],
            damping_coefficient: damping_coefficient(params.damping),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            body_entries: Vec::new(),
            collider_entries: Vec::new(),
            constraint_entries: Vec::new(),
            frame: BodyId(0),
            steps: 0,
            soft_limit_warned: false,
        };

        let frame = RigidBodyBuilder::fixed().build();
        world.frame = world.register_body(frame, BodyKind::Frame, f32::INFINITY, f32::INFINITY);
        Ok(world)
    }

    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    /// The world's fixed reference body
    pub fn static_frame(&self) -> BodyId {
        self.frame
    }

    /// Number of completed steps
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Add an immovable body
    pub fn add_static_body(&mut self, position: Vec2, rotation: f32) -> Result<BodyId, SceneError> {
        if !is_finite_point(position) || !rotation.is_finite() {
            return Err(SceneError::invalid(
                "static body",
                format!("non-finite placement {position} / {rotation}"),
            ));
        }
        let rb = RigidBodyBuilder::fixed()
            .translation(vector![position.x, position.y])
            .rotation(rotation)
            .build();
        Ok(self.register_body(rb, BodyKind::Static, f32::INFINITY, f32::INFINITY))
    }

    /// Add a mass-bearing body. Mass and moment must be positive and finite.
    pub fn add_dynamic_body(
        &mut self,
        position: Vec2,
        rotation: f32,
        mass: f32,
        moment: f32,
    ) -> Result<BodyId, SceneError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SceneError::invalid(
                "dynamic body",
                format!("mass must be positive, got {mass}"),
            ));
        }
        if !(moment.is_finite() && moment > 0.0) {
            return Err(SceneError::invalid(
                "dynamic body",
                format!("moment must be positive, got {moment}"),
            ));
        }
        if !is_finite_point(position) || !rotation.is_finite() {
            return Err(SceneError::invalid(
                "dynamic body",
                format!("non-finite placement {position} / {rotation}"),
            ));
        }

        let rb = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y])
            .rotation(rotation)
            .additional_mass_properties(MassProperties::new(Point::new(0.0, 0.0), mass, moment))
            .linear_damping(self.damping_coefficient)
            .angular_damping(self.damping_coefficient)
            .build();
        let id = self.register_body(rb, BodyKind::Dynamic, mass, moment);

        let dynamic = self.dynamic_body_count();
        if dynamic > DYNAMIC_BODY_SOFT_LIMIT && !self.soft_limit_warned {
            log::warn!(
                "{} dynamic bodies in the world; stepping may fall below {} Hz",
                dynamic,
                (1.0 / self.params.time_step).round()
            );
            self.soft_limit_warned = true;
        }
        Ok(id)
    }

    /// Attach a collider to an existing body.
    ///
    /// Colliders carry no density: body mass comes from `add_dynamic_body`.
    pub fn attach_collider(
        &mut self,
        body: BodyId,
        shape: ShapeDesc,
        material: Material,
        color: Option<Color>,
        category: CollisionCategory,
    ) -> Result<ColliderId, SceneError> {
        let parent = self.entry(body)?.handle;
        shape.validate()?;
        if !(material.friction.is_finite() && material.friction >= 0.0) {
            return Err(SceneError::invalid(
                "collider",
                format!("friction must be non-negative, got {}", material.friction),
            ));
        }
        if !(material.elasticity.is_finite() && material.elasticity >= 0.0) {
            return Err(SceneError::invalid(
                "collider",
                format!("elasticity must be non-negative, got {}", material.elasticity),
            ));
        }

        let builder = shape
            .collider_builder()
            .ok_or_else(|| SceneError::invalid("collider", "shape has no convex hull"))?;
        let collider = builder
            .friction(material.friction)
            .restitution(material.elasticity)
            .density(0.0)
            .collision_groups(category.interaction_groups())
            .build();
        let handle = self
            .colliders
            .insert_with_parent(collider, parent, &mut self.bodies);

        let id = ColliderId(self.collider_entries.len() as u32);
        self.collider_entries.push(ColliderEntry {
            handle,
            body,
            shape,
            color,
            category,
        });
        Ok(id)
    }

    /// Pin two bodies together at a world-space point, leaving rotation free
    pub fn add_constraint(
        &mut self,
        body_a: BodyId,
        body_b: BodyId,
        anchor: Vec2,
    ) -> Result<ConstraintId, SceneError> {
        if body_a == body_b {
            return Err(SceneError::invalid(
                "constraint",
                format!("{body_a} cannot be pinned to itself"),
            ));
        }
        if !is_finite_point(anchor) {
            return Err(SceneError::invalid("constraint", "non-finite anchor"));
        }
        let ha = self.entry(body_a)?.handle;
        let hb = self.entry(body_b)?.handle;

        let anchor_pt = Point::new(anchor.x, anchor.y);
        let local_a = self.rigid_body(ha)?.position().inverse_transform_point(&anchor_pt);
        let local_b = self.rigid_body(hb)?.position().inverse_transform_point(&anchor_pt);

        let joint = RevoluteJointBuilder::new()
            .local_anchor1(local_a)
            .local_anchor2(local_b)
            .contacts_enabled(false)
            .build();
        let handle = self.impulse_joints.insert(ha, hb, joint, true);

        let id = ConstraintId(self.constraint_entries.len() as u32);
        self.constraint_entries.push(ConstraintEntry {
            handle,
            body_a,
            body_b,
            local_anchor_a: Vec2::new(local_a.x, local_a.y),
        });
        Ok(id)
    }

    /// Advance by one fixed quantum.
    ///
    /// Fails if any dynamic body comes out with a non-finite state.
    pub fn step(&mut self) -> Result<(), SceneError> {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
        self.steps += 1;

        for (index, entry) in self.body_entries.iter().enumerate() {
            if entry.kind != BodyKind::Dynamic {
                continue;
            }
            let Some(rb) = self.bodies.get(entry.handle) else {
                continue;
            };
            let t = rb.translation();
            let v = rb.linvel();
            let finite = t.x.is_finite()
                && t.y.is_finite()
                && v.x.is_finite()
                && v.y.is_finite()
                && rb.angvel().is_finite();
            if !finite {
                return Err(SceneError::EngineStepFailure {
                    step: self.steps,
                    body: BodyId(index as u32),
                });
            }
        }
        Ok(())
    }

    /// All dynamic bodies currently registered, in creation order
    pub fn dynamic_bodies(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.body_entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.kind == BodyKind::Dynamic)
            .map(|(i, _)| BodyId(i as u32))
    }

    /// Scene bodies (static and dynamic); the static frame is not counted
    pub fn body_count(&self) -> usize {
        self.body_entries.len() - 1
    }

    pub fn static_body_count(&self) -> usize {
        self.count_kind(BodyKind::Static)
    }

    pub fn dynamic_body_count(&self) -> usize {
        self.count_kind(BodyKind::Dynamic)
    }

    pub fn collider_count(&self) -> usize {
        self.collider_entries.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraint_entries.len()
    }

    pub fn body(&self, id: BodyId) -> Option<BodyView> {
        let entry = self.body_entries.get(id.0 as usize)?;
        let rb = self.bodies.get(entry.handle)?;
        let t = rb.translation();
        let v = rb.linvel();
        Some(BodyView {
            id,
            kind: entry.kind,
            position: Vec2::new(t.x, t.y),
            rotation: rb.rotation().angle(),
            linear_velocity: Vec2::new(v.x, v.y),
            angular_velocity: rb.angvel(),
            mass: entry.mass,
            moment: entry.moment,
        })
    }

    /// Scene bodies in creation order, static frame excluded
    pub fn bodies(&self) -> impl Iterator<Item = BodyView> + '_ {
        (0..self.body_entries.len())
            .map(|i| BodyId(i as u32))
            .filter(|id| *id != self.frame)
            .filter_map(|id| self.body(id))
    }

    pub fn angular_velocity(&self, id: BodyId) -> Option<f32> {
        let entry = self.body_entries.get(id.0 as usize)?;
        self.bodies.get(entry.handle).map(|rb| rb.angvel())
    }

    pub fn set_angular_velocity(&mut self, id: BodyId, angvel: f32) -> Result<(), SceneError> {
        if !angvel.is_finite() {
            return Err(SceneError::invalid(
                "body",
                format!("angular velocity of {id} must be finite, got {angvel}"),
            ));
        }
        let handle = self.entry(id)?.handle;
        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.set_angvel(angvel, false);
        }
        Ok(())
    }

    pub fn set_linear_velocity(&mut self, id: BodyId, vel: Vec2) -> Result<(), SceneError> {
        if !is_finite_point(vel) {
            return Err(SceneError::invalid(
                "body",
                format!("velocity of {id} must be finite, got {vel}"),
            ));
        }
        let handle = self.entry(id)?.handle;
        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.set_linvel(vector![vel.x, vel.y], true);
        }
        Ok(())
    }

    /// Sweep the body between steps so fast movers cannot pass through
    /// thin walls
    pub fn enable_ccd(&mut self, id: BodyId) -> Result<(), SceneError> {
        let handle = self.entry(id)?.handle;
        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.enable_ccd(true);
        }
        Ok(())
    }

    pub fn ccd_enabled(&self, id: BodyId) -> Option<bool> {
        let entry = self.body_entries.get(id.0 as usize)?;
        self.bodies.get(entry.handle).map(|rb| rb.is_ccd_enabled())
    }

    /// Write a velocity straight into the engine, skipping validation
    #[cfg(test)]
    pub(crate) fn force_linear_velocity(&mut self, id: BodyId, vel: Vec2) {
        if let Some(entry) = self.body_entries.get(id.0 as usize) {
            if let Some(rb) = self.bodies.get_mut(entry.handle) {
                rb.set_linvel(vector![vel.x, vel.y], true);
            }
        }
    }

    pub fn collider(&self, id: ColliderId) -> Option<ColliderView> {
        let entry = self.collider_entries.get(id.0 as usize)?;
        let co = self.colliders.get(entry.handle)?;
        let body = self.body(entry.body)?;
        Some(ColliderView {
            id,
            body: entry.body,
            category: entry.category,
            shape: entry.shape.clone(),
            position: body.position,
            rotation: body.rotation,
            friction: co.friction(),
            elasticity: co.restitution(),
            color: entry.color,
        })
    }

    pub fn colliders(&self) -> impl Iterator<Item = ColliderView> + '_ {
        (0..self.collider_entries.len()).filter_map(|i| self.collider(ColliderId(i as u32)))
    }

    /// Colliders attached to `body`, in creation order
    pub fn colliders_of(&self, body: BodyId) -> impl Iterator<Item = ColliderId> + '_ {
        self.collider_entries
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.body == body)
            .map(|(i, _)| ColliderId(i as u32))
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<ConstraintView> {
        let entry = self.constraint_entries.get(id.0 as usize)?;
        let body_a = self.body_entries.get(entry.body_a.0 as usize)?;
        let rb = self.bodies.get(body_a.handle)?;
        let p = rb.position() * Point::new(entry.local_anchor_a.x, entry.local_anchor_a.y);
        Some(ConstraintView {
            id,
            body_a: entry.body_a,
            body_b: entry.body_b,
            anchor: Vec2::new(p.x, p.y),
        })
    }

    pub fn constraints(&self) -> impl Iterator<Item = ConstraintView> + '_ {
        (0..self.constraint_entries.len()).filter_map(|i| self.constraint(ConstraintId(i as u32)))
    }

    fn register_body(&mut self, rb: RigidBody, kind: BodyKind, mass: f32, moment: f32) -> BodyId {
        let handle = self.bodies.insert(rb);
        let id = BodyId(self.body_entries.len() as u32);
        self.body_entries.push(BodyEntry {
            handle,
            kind,
            mass,
            moment,
        });
        id
    }

    fn entry(&self, id: BodyId) -> Result<&BodyEntry, SceneError> {
        self.body_entries
            .get(id.0 as usize)
            .ok_or_else(|| SceneError::invalid("body", format!("unknown {id}")))
    }

    fn rigid_body(&self, handle: RigidBodyHandle) -> Result<&RigidBody, SceneError> {
        self.bodies
            .get(handle)
            .ok_or_else(|| SceneError::invalid("body", "handle no longer in the engine"))
    }

    fn count_kind(&self, kind: BodyKind) -> usize {
        self.body_entries.iter().filter(|e| e.kind == kind).count()
    }
}

/// Engine damping coefficient that keeps `retained` of the velocity per second.
///
/// rapier scales velocity by `1 / (1 + dt * c)` each step, which for small
/// steps approaches `exp(-c)` per second.
pub fn damping_coefficient(retained: f32) -> f32 {
    if retained >= 1.0 {
        0.0
    } else {
        -retained.ln()
    }
}
