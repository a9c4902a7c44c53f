//! Input state snapshot (C4, spec.md §4.4).
//!
//! A single process-wide [`InputState`] is materialised once per tick from
//! whatever the (external) input driver accumulated since the previous
//! tick. After materialisation it is read-only to every downstream system
//! for the remainder of the tick -- the driver layer, device enumeration,
//! hotplug, and raw-sample calibration are all outside this crate (spec.md
//! §6).

use serde::{Deserialize, Serialize};

/// Per-axis response curve applied after deadzone (spec.md §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseCurve {
    Linear,
    Quadratic,
    Cubic,
    Exponential,
}

impl ResponseCurve {
    /// Apply the curve to a deadzone-adjusted value already clamped to
    /// `[-1, 1]`, preserving sign.
    fn apply(self, v: f32) -> f32 {
        let sign = v.signum();
        let mag = v.abs();
        let shaped = match self {
            ResponseCurve::Linear => mag,
            ResponseCurve::Quadratic => mag * mag,
            ResponseCurve::Cubic => mag * mag * mag,
            ResponseCurve::Exponential => (mag.exp() - 1.0) / (std::f32::consts::E - 1.0),
        };
        sign * shaped
    }
}

/// Per-axis deadzone + curve configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisShaping {
    /// Raw magnitude below which the axis reads as exactly zero.
    pub deadzone: f32,
    pub curve: ResponseCurve,
}

impl Default for AxisShaping {
    fn default() -> Self {
        Self {
            deadzone: 0.08,
            curve: ResponseCurve::Linear,
        }
    }
}

impl AxisShaping {
    /// Apply deadzone then curve to a raw sample, clamping the result to
    /// `[-1, 1]` (spec.md §4.4: "all values in the snapshot are finite").
    pub fn shape(&self, raw: f32) -> f32 {
        if !raw.is_finite() {
            return 0.0;
        }
        let mag = raw.abs();
        if mag <= self.deadzone {
            return 0.0;
        }
        // Rescale so the curve's domain starts right at the deadzone edge,
        // avoiding a discontinuity at the boundary.
        let rescaled = ((mag - self.deadzone) / (1.0 - self.deadzone)).clamp(0.0, 1.0);
        let shaped = self.curve.apply(raw.signum() * rescaled);
        shaped.clamp(-1.0, 1.0)
    }
}

/// Normalised, device-agnostic input snapshot for one tick (spec.md §3,
/// §4.4). Every field is finite after materialisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub thrust: f32,
    pub strafe: f32,
    pub vertical: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
    /// `[0, 1]`.
    pub boost: f32,
    pub brake: bool,
    pub action: bool,
    pub menu: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            thrust: 0.0,
            strafe: 0.0,
            vertical: 0.0,
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
            boost: 0.0,
            brake: false,
            action: false,
            menu: false,
        }
    }
}

/// Raw, unshaped samples from the (external) input driver for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawInputSample {
    pub thrust: f32,
    pub strafe: f32,
    pub vertical: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
    pub boost: f32,
    pub brake: bool,
    pub action: bool,
    pub menu: bool,
}

/// Per-axis shaping configuration for all six analog axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputShapingConfig {
    pub thrust: AxisShaping,
    pub strafe: AxisShaping,
    pub vertical: AxisShaping,
    pub pitch: AxisShaping,
    pub yaw: AxisShaping,
    pub roll: AxisShaping,
}

impl Default for InputShapingConfig {
    fn default() -> Self {
        Self {
            thrust: AxisShaping::default(),
            strafe: AxisShaping::default(),
            vertical: AxisShaping::default(),
            pitch: AxisShaping::default(),
            yaw: AxisShaping::default(),
            roll: AxisShaping::default(),
        }
    }
}

/// Materialise a [`RawInputSample`] into a shaped, clamped, finite
/// [`InputState`] (spec.md §4.4: "driver layer accumulates device events;
/// snapshot is materialised at tick start").
pub fn materialize_input(raw: &RawInputSample, config: &InputShapingConfig) -> InputState {
    InputState {
        thrust: config.thrust.shape(raw.thrust),
        strafe: config.strafe.shape(raw.strafe),
        vertical: config.vertical.shape(raw.vertical),
        pitch: config.pitch.shape(raw.pitch),
        yaw: config.yaw.shape(raw.yaw),
        roll: config.roll.shape(raw.roll),
        boost: raw.boost.clamp(0.0, 1.0).max(0.0),
        brake: raw.brake,
        action: raw.action,
        menu: raw.menu,
    }
}
