//! Control authority system (C5, spec.md §4.5).
//!
//! Maps the tick's input snapshot (or an autopilot goal) onto each
//! controlled entity's `linear_cmd`/`angular_cmd`, applying stability
//! assist, auto-level, boost, and brake. Writes only to the entity's own
//! `CONTROL_AUTHORITY` component -- never touches `Physics` directly
//! (spec.md §4.5 step 6).

use signal_ecs::prelude::*;
use signal_math::Vec3;

use crate::input::InputState;

/// Auto-level corrective strength for `Autopilot`/assisted leveling
/// (spec.md §4.5 step 4).
pub const AUTO_LEVEL_STRENGTH: f32 = 2.0;

/// Maximum boost multiplier applied to the thrust axis (spec.md §4.5 step 5).
pub const MAX_BOOST_MULTIPLIER: f32 = 3.0;

/// Run one control-authority tick for every entity with `CONTROL_AUTHORITY`
/// (spec.md §4.5). `dt` is unused by the mapping itself but kept for
/// signature symmetry with the other pipeline stages and future rate-aware
/// smoothing.
pub fn run_control(world: &mut World, input: &InputState, _dt: f32) {
    let ids = world.entities_matching(ComponentBits::CONTROL_AUTHORITY);
    for id in ids {
        let rotation = world.get_transform(id).map(|t| t.rotation);
        let goal = world.get_ai_goal(id).copied();
        let controlled_by_player = world
            .get_control_authority(id)
            .is_some_and(|a| world.is_player(a.controlled_by));
        let Some(authority) = world.get_control_authority_mut(id) else {
            continue;
        };

        // spec.md §4.5 step 1: Manual/Assisted entities only read the
        // (single, global) InputState when `controlled_by` actually names
        // the live player entity producing it -- otherwise nobody is
        // driving this entity's sticks and its command stays neutral.
        // Autopilot never reads InputState at all; it reads an AI goal.
        let reads_input = controlled_by_player && authority.mode != ControlMode::Autopilot;

        let mut linear_cmd = if reads_input { raw_linear_cmd(input) } else { Vec3::ZERO };
        let mut angular_cmd = if reads_input { raw_angular_cmd(input) } else { Vec3::ZERO };

        if authority.mode == ControlMode::Assisted {
            apply_stability_assist(&mut linear_cmd, authority.stability_assist);
            apply_stability_assist(&mut angular_cmd, authority.stability_assist);
        }

        if authority.mode == ControlMode::Autopilot {
            if let (Some(goal), Some(rotation)) = (goal, rotation) {
                angular_cmd = autopilot_angular_command(rotation, goal.desired_heading);
                linear_cmd = Vec3::new(0.0, 0.0, goal.desired_speed.clamp(-1.0, 1.0));
            }
        }

        let brake = reads_input && input.brake;
        let boost = if reads_input { input.boost } else { 0.0 };

        let boost_multiplier = 1.0 + (MAX_BOOST_MULTIPLIER - 1.0) * boost.clamp(0.0, 1.0);
        linear_cmd.z *= boost_multiplier;

        if brake {
            // Strong damping toward zero (spec.md §4.5 step 5), not a sign
            // flip -- a full-deflection command under brake must decay, not
            // fire an equally strong command in the opposite direction.
            linear_cmd = Vec3::ZERO;
            angular_cmd = Vec3::ZERO;
        }

        authority.linear_cmd = linear_cmd.clamp(Vec3::splat(-1.0), Vec3::splat(1.0));
        authority.angular_cmd = angular_cmd.clamp(Vec3::splat(-1.0), Vec3::splat(1.0));
        authority.boost = boost;
        authority.brake = brake;
    }
}

/// Default axis mapping (spec.md §4.5 step 2): thrust→+Z, strafe→+X,
/// vertical→+Y.
fn raw_linear_cmd(input: &InputState) -> Vec3 {
    Vec3::new(input.strafe, input.vertical, input.thrust)
}

/// Default axis mapping (spec.md §4.5 step 2): pitch→+X, yaw→+Y, roll→+Z.
fn raw_angular_cmd(input: &InputState) -> Vec3 {
    Vec3::new(input.pitch, input.yaw, input.roll)
}

/// Subtract `assist · (1 − |input|)` from axes with near-zero input,
/// damping drift without fighting a deliberate full-deflection command
/// (spec.md §4.5 step 3).
fn apply_stability_assist(cmd: &mut Vec3, assist: f32) {
    let assist = assist.clamp(0.0, 1.0);
    for axis in [&mut cmd.x, &mut cmd.y, &mut cmd.z] {
        let damping = assist * (1.0 - axis.abs());
        *axis *= 1.0 - damping;
    }
}

/// Auto-level: corrective angular command proportional to the angle
/// between current world-up and `{0,1,0}` (spec.md §4.5 step 4).
fn autopilot_angular_command(rotation: signal_math::Quat, desired_heading: Vec3) -> Vec3 {
    let world_up = signal_math::quaternion_rotate_vector(rotation, Vec3::Y);
    let level_error = Vec3::new(world_up.z, 0.0, -world_up.x) * AUTO_LEVEL_STRENGTH;
    let heading_error = signal_math::normalize(desired_heading) * 0.5;
    (level_error + Vec3::new(0.0, heading_error.x, 0.0)).clamp(Vec3::splat(-1.0), Vec3::splat(1.0))
}
