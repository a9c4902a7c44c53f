//! Thruster system (C6, spec.md §4.6).
//!
//! Converts each controlled entity's `linear_cmd`/`angular_cmd` into
//! world-space force/torque, applying first-order response lag and
//! environment efficiency, and deposits the result into the entity's
//! `Physics` accumulators.

use signal_ecs::prelude::*;
use signal_math::Vec3;

/// Run one thruster tick for every entity with both `THRUSTER_SYSTEM` and
/// `PHYSICS` (spec.md §4.6).
pub fn run_thrusters(world: &mut World, dt: f32) {
    let ids = world.entities_matching(ComponentBits::THRUSTER_SYSTEM | ComponentBits::PHYSICS);
    for id in ids {
        let (linear_cmd, angular_cmd) = world
            .get_control_authority(id)
            .map(|a| (a.linear_cmd, a.angular_cmd))
            .unwrap_or((Vec3::ZERO, Vec3::ZERO));
        let rotation = world.get_transform(id).map(|t| t.rotation).unwrap_or(signal_math::Quat::IDENTITY);
        let environment = world
            .get_physics(id)
            .map(|p| p.environment)
            .unwrap_or(Environment::Space);

        let (force, torque) = {
            let Some(thrusters) = world.get_thruster_system_mut(id) else {
                continue;
            };
            step_thruster(thrusters, linear_cmd, angular_cmd, dt, environment)
        };

        if let Some(physics) = world.get_physics_mut(id) {
            physics.apply_force(signal_math::quaternion_rotate_vector(rotation, force));
            physics.apply_torque(signal_math::quaternion_rotate_vector(rotation, torque));
        }
    }
}

/// Advance one [`ThrusterSystem`]'s response state and return the
/// world-frame-pending (still local-frame at this point) force/torque to
/// deposit this tick. Pure function of (state, commands, dt) so it is
/// independently testable from ECS plumbing.
fn step_thruster(
    thrusters: &mut ThrusterSystem,
    linear_cmd: Vec3,
    angular_cmd: Vec3,
    dt: f32,
    environment: Environment,
) -> (Vec3, Vec3) {
    if !thrusters.enabled {
        thrusters.current_linear = Vec3::ZERO;
        thrusters.current_angular = Vec3::ZERO;
        return (Vec3::ZERO, Vec3::ZERO);
    }

    let clamped_linear = linear_cmd.clamp(Vec3::splat(-1.0), Vec3::splat(1.0));
    let clamped_angular = angular_cmd.clamp(Vec3::splat(-1.0), Vec3::splat(1.0));
    let target_lin = clamped_linear * thrusters.max_linear_force;
    let target_ang = clamped_angular * thrusters.max_angular_torque;

    let response = if thrusters.response_time_s <= 0.0 {
        1.0
    } else {
        (dt / thrusters.response_time_s).min(1.0)
    };
    thrusters.current_linear += (target_lin - thrusters.current_linear) * response;
    thrusters.current_angular += (target_ang - thrusters.current_angular) * response;

    let efficiency = environment_multiplier(environment, thrusters);
    (thrusters.current_linear * efficiency, thrusters.current_angular * efficiency)
}

/// Resolve environment efficiency against the entity's actual `Physics`
/// environment (spec.md §4.6 step 4: vacuum vs atmosphere efficiency).
/// Kept as a separate adjustment so `step_thruster`'s response-lag math
/// stays a pure function of the thruster's own data.
fn environment_multiplier(env: Environment, thrusters: &ThrusterSystem) -> f32 {
    match env {
        Environment::Space => thrusters.vacuum_efficiency,
        Environment::Atmosphere => thrusters.atmosphere_efficiency,
    }
}
