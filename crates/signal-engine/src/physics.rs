//! 6-DOF physics integration (C7, spec.md §4.7).
//!
//! Semi-implicit Euler integration of linear and angular motion from
//! accumulated force/torque. The critical invariant this module exists to
//! protect: accumulators are cleared *after* integration, never before --
//! the historical "Sprint-21" regression (spec.md §4.7 step 9, §8 property
//! 3, §9). Drag uses the linear form `v *= (1 - drag*dt)` (spec.md §9 open
//! question 1); rotation integrates the full axis-angle quaternion rather
//! than a small-angle approximation (§9 open question 2).

use tracing::warn;

use signal_ecs::prelude::*;
use signal_math::Vec3;

/// Per-axis clamp applied to linear/angular velocity (spec.md §4.7 edge
/// case: "exceeding configured max: clamp per-axis").
#[derive(Debug, Clone, Copy)]
pub struct VelocityLimits {
    pub max_linear_speed: f32,
    pub max_angular_speed: f32,
}

impl Default for VelocityLimits {
    fn default() -> Self {
        Self {
            max_linear_speed: 10_000.0,
            max_angular_speed: 100.0,
        }
    }
}

/// Run one physics tick for every entity with `PHYSICS` (spec.md §4.7).
pub fn run_physics(world: &mut World, dt: f32, limits: VelocityLimits) {
    let ids = world.entities_matching(ComponentBits::PHYSICS);
    for id in ids {
        let transform_state = world.get_transform(id).map(|t| (t.position, t.rotation));

        let integration = {
            let Some(physics) = world.get_physics_mut(id) else {
                continue;
            };
            integrate_body(physics, dt, limits, transform_state)
        };

        let Some(integration) = integration else {
            continue;
        };

        if let Some(transform) = world.get_transform_mut(id) {
            if let Some(new_position) = integration.new_position {
                transform.set_position(new_position);
            }
            if let Some(new_rotation) = integration.new_rotation {
                transform.set_rotation(new_rotation);
            }
        }
    }
}

struct Integration {
    new_position: Option<Vec3>,
    new_rotation: Option<signal_math::Quat>,
}

/// Integrate one body in place; returns the transform deltas to apply, or
/// `None` if the body is kinematic this tick. Pure function of
/// `(Physics, dt, limits, rotation)` so the numerical core is testable
/// without any `World`/`EntityId` plumbing.
fn integrate_body(
    physics: &mut Physics,
    dt: f32,
    limits: VelocityLimits,
    transform_state: Option<(Vec3, signal_math::Quat)>,
) -> Option<Integration> {
    let position = transform_state.map(|(p, _)| p).unwrap_or(Vec3::ZERO);
    let rotation = transform_state.map(|(_, r)| r);
    if physics.is_effectively_kinematic() {
        // Kinematic bodies are not integrated, but any force deposited this
        // tick (e.g. by thrusters on a soon-to-be-dynamic body) must still
        // be cleared so a later `kinematic -> dynamic` transition doesn't
        // inherit stale accumulators (spec.md §4.7 "State machine").
        physics.force_accumulator = Vec3::ZERO;
        physics.torque_accumulator = Vec3::ZERO;
        return None;
    }

    if !signal_math::is_finite_vec3(physics.force_accumulator)
        || !signal_math::is_finite_vec3(physics.torque_accumulator)
    {
        warn!("non-finite accumulator detected; resetting and skipping integration this tick");
        physics.force_accumulator = Vec3::ZERO;
        physics.torque_accumulator = Vec3::ZERO;
        return None;
    }

    // -- linear --------------------------------------------------------
    let acceleration = physics.force_accumulator / physics.mass;
    physics.velocity += acceleration * dt;
    physics.velocity *= (1.0 - physics.linear_drag * dt).max(0.0);
    physics.velocity = clamp_magnitude(physics.velocity, limits.max_linear_speed);
    let new_position = position + physics.velocity * dt;

    // -- angular ---------------------------------------------------------
    let mut new_rotation = None;
    if physics.has_6dof {
        let angular_acceleration = physics.torque_accumulator / physics.moment_of_inertia;
        physics.angular_velocity += angular_acceleration * dt;
        physics.angular_velocity *= (1.0 - physics.angular_drag * dt).max(0.0);
        physics.angular_velocity = clamp_magnitude(physics.angular_velocity, limits.max_angular_speed);

        let angle = physics.angular_velocity.length() * dt;
        if angle > 0.0 {
            let axis = signal_math::normalize(physics.angular_velocity);
            let dq = signal_math::quat_from_axis_angle(axis, angle);
            let current = rotation.unwrap_or(signal_math::Quat::IDENTITY);
            new_rotation = Some((dq * current).normalize());
        }
    }

    // Critical step 9 (spec.md §4.7): clear accumulators only after
    // integration has consumed them.
    physics.force_accumulator = Vec3::ZERO;
    physics.torque_accumulator = Vec3::ZERO;

    Some(Integration {
        new_position: Some(new_position),
        new_rotation,
    })
}

fn clamp_magnitude(v: Vec3, max: f32) -> Vec3 {
    let len = v.length();
    if len > max && len > 0.0 {
        v * (max / len)
    } else {
        v
    }
}
