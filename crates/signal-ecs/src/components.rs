//! Per-entity component payloads (spec.md §3, §4.11, §4.12).
//!
//! Every type here is plain data -- no behavior, no references to other
//! components. Systems in `signal-engine` own the logic that reads and
//! writes these structs.

use signal_math::{Mat4, Quat, Vec3};

use crate::entity::EntityId;

// ---------------------------------------------------------------------------
// Transform (C3)
// ---------------------------------------------------------------------------

/// Local/world transform state for an entity (spec.md §3, §4.3).
///
/// Invariant: `dirty == false` implies `local_matrix`/`world_matrix` are
/// consistent with `position`/`rotation`/`scale`. Any mutator must set
/// `dirty = true`; only the transform-refresh pass clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub dirty: bool,
    pub local_matrix: Mat4,
    pub world_matrix: Mat4,
    /// Parent entity for world-matrix composition, or [`EntityId::INVALID`]
    /// for a root transform.
    pub parent: EntityId,
}

impl Transform {
    /// A transform at the origin with identity rotation and unit scale,
    /// already marked dirty so the next refresh pass computes matrices.
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            dirty: true,
            local_matrix: Mat4::IDENTITY,
            world_matrix: Mat4::IDENTITY,
            parent: EntityId::INVALID,
        }
    }

    /// Set position and mark dirty.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty = true;
    }

    /// Set rotation and mark dirty.
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.dirty = true;
    }

    /// Set scale and mark dirty.
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty = true;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

// ---------------------------------------------------------------------------
// Physics (C7)
// ---------------------------------------------------------------------------

/// Simulation environment a physics body experiences (affects thruster
/// efficiency, spec.md §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Space,
    Atmosphere,
}

/// 6-DOF rigid body state (spec.md §3, §4.7).
///
/// Critical invariant: `force_accumulator` and `torque_accumulator` are
/// cleared at the *end* of every physics tick, never at the start (the
/// Sprint-21 regression property, spec.md §4.7 step 9 / §8 property 3).
#[derive(Debug, Clone, PartialEq)]
pub struct Physics {
    pub mass: f32,
    pub moment_of_inertia: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub force_accumulator: Vec3,
    pub torque_accumulator: Vec3,
    pub linear_drag: f32,
    pub angular_drag: f32,
    pub kinematic: bool,
    pub has_6dof: bool,
    pub environment: Environment,
}

impl Physics {
    /// A dynamic, 6-DOF body with unit mass/inertia, no drag, in space.
    pub fn new(mass: f32, moment_of_inertia: Vec3) -> Self {
        Self {
            mass,
            moment_of_inertia,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force_accumulator: Vec3::ZERO,
            torque_accumulator: Vec3::ZERO,
            linear_drag: 0.0,
            angular_drag: 0.0,
            kinematic: false,
            has_6dof: true,
            environment: Environment::Space,
        }
    }

    /// `true` if this body should be treated as static/kinematic regardless
    /// of the `kinematic` flag (spec.md §4.7 edge case: non-positive mass or
    /// moment of inertia).
    pub fn is_effectively_kinematic(&self) -> bool {
        self.kinematic
            || self.mass <= 0.0
            || self.moment_of_inertia.x <= 0.0
            || self.moment_of_inertia.y <= 0.0
            || self.moment_of_inertia.z <= 0.0
    }

    /// Add a world-space force to this tick's accumulator.
    pub fn apply_force(&mut self, force: Vec3) {
        self.force_accumulator += force;
    }

    /// Add a world-space torque to this tick's accumulator.
    pub fn apply_torque(&mut self, torque: Vec3) {
        self.torque_accumulator += torque;
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self::new(1.0, Vec3::ONE)
    }
}

// ---------------------------------------------------------------------------
// ControlAuthority (C5)
// ---------------------------------------------------------------------------

/// Who/what is driving an entity's control commands, and how (spec.md §3,
/// §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    Manual,
    Assisted,
    Autopilot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlAuthority {
    /// The controlling entity (typically a `PLAYER`), or `EntityId::INVALID`
    /// for "nothing is driving this entity yet".
    pub controlled_by: EntityId,
    pub sensitivity: f32,
    /// In `[0, 1]`. 0 disables assist; 1 is full lock (spec.md §4.5 edge
    /// case -- never exceeds 1).
    pub stability_assist: f32,
    pub mode: ControlMode,
    /// Local-frame linear command, each axis in `[-1, 1]`.
    pub linear_cmd: Vec3,
    /// Local-frame angular command, each axis in `[-1, 1]`.
    pub angular_cmd: Vec3,
    /// Boost multiplier input, in `[0, 1]`.
    pub boost: f32,
    pub brake: bool,
}

impl Default for ControlAuthority {
    fn default() -> Self {
        Self {
            controlled_by: EntityId::INVALID,
            sensitivity: 1.0,
            stability_assist: 0.0,
            mode: ControlMode::Manual,
            linear_cmd: Vec3::ZERO,
            angular_cmd: Vec3::ZERO,
            boost: 0.0,
            brake: false,
        }
    }
}

// ---------------------------------------------------------------------------
// ThrusterSystem (C6)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ThrusterSystem {
    pub max_linear_force: Vec3,
    pub max_angular_torque: Vec3,
    pub current_linear: Vec3,
    pub current_angular: Vec3,
    /// First-order response time constant, in seconds. Must be `> 0`;
    /// `<= 0` is treated as instant response (spec.md §4.6).
    pub response_time_s: f32,
    pub atmosphere_efficiency: f32,
    pub vacuum_efficiency: f32,
    pub enabled: bool,
}

impl Default for ThrusterSystem {
    fn default() -> Self {
        Self {
            max_linear_force: Vec3::ZERO,
            max_angular_torque: Vec3::ZERO,
            current_linear: Vec3::ZERO,
            current_angular: Vec3::ZERO,
            response_time_s: 0.2,
            atmosphere_efficiency: 1.0,
            vacuum_efficiency: 1.0,
            enabled: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Camera and Light (spec.md §4.11 addition)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
    /// Entity this camera tracks, or `EntityId::INVALID` to use its own
    /// transform. Resolved fresh every frame (never cached) per spec.md §9's
    /// "cyclic reference" guidance.
    pub follow_target: EntityId,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_y_radians: 60f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            follow_target: EntityId::INVALID,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Directional,
    Point { range: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            kind: LightKind::Directional,
            color: Vec3::ONE,
            intensity: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Collision and AiGoal (spec.md §4.12/§3 addition -- minimal stand-ins for
// out-of-scope collision response and AI inference)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub radius: f32,
}

impl Default for Collision {
    fn default() -> Self {
        Self { radius: 1.0 }
    }
}

/// The minimal shape Control (§4.5 step 1) needs to read when
/// `mode == Autopilot`. Populated by an external AI collaborator; the core
/// never writes to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiGoal {
    pub desired_heading: Vec3,
    pub desired_speed: f32,
}

impl Default for AiGoal {
    fn default() -> Self {
        Self {
            desired_heading: Vec3::Z,
            desired_speed: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Marker/render-facing components
// ---------------------------------------------------------------------------

/// Marker: this entity is a player-controlled avatar (as opposed to
/// `CONTROL_AUTHORITY`'s `controlled_by`, which names *who* controls
/// another entity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Player;

/// Render-facing payload: mesh/material handles are opaque to the core
/// (spec.md §6) and given meaning only by the external asset registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderable {
    pub mesh_handle: u32,
    pub material_handle: u32,
    pub visible: bool,
}

impl Default for Renderable {
    fn default() -> Self {
        Self {
            mesh_handle: 0,
            material_handle: 0,
            visible: true,
        }
    }
}
