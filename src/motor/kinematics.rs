// Wheel kinematics for the 4-motor base
// Converts velocity / left-right / rotation intents into per-motor powers.
//
// Motors 1 & 4 sit on one diagonal axis and 2 & 3 on the other, so a body
// velocity (vx, vy) rotated by 45° gives the two axis powers directly.

use std::f32::consts::SQRT_2;

use super::protocol::{MAX_POWER, MOTOR_COUNT};

/// Power commands for the four motors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WheelPowers {
    pub m1: i8,
    pub m2: i8,
    pub m3: i8,
    pub m4: i8,
}

impl WheelPowers {
    pub fn new(m1: i8, m2: i8, m3: i8, m4: i8) -> Self {
        Self { m1, m2, m3, m4 }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Returns powers as array [m1, m2, m3, m4] (index = pin - 1)
    pub fn as_array(&self) -> [i8; MOTOR_COUNT] {
        [self.m1, self.m2, self.m3, self.m4]
    }

    pub fn from_array([m1, m2, m3, m4]: [i8; MOTOR_COUNT]) -> Self {
        Self { m1, m2, m3, m4 }
    }

    /// Rescale so the largest magnitude becomes `max_val`, see [`scale_powers`]
    pub fn maximized(self, max_val: i8) -> Self {
        Self::from_array(scale_powers(self.as_array(), max_val))
    }
}

/// Truncate a float power toward zero, saturating at the wire range
fn to_power(value: f32) -> i8 {
    value.clamp(-(MAX_POWER as f32), MAX_POWER as f32) as i8
}

/// Rescale powers so the largest magnitude reaches `max_val`
///
/// Ratios between motors are kept and each result is truncated toward zero.
/// `max_val` is clamped to the wire range. All-zero input is returned unchanged.
pub fn scale_powers(powers: [i8; MOTOR_COUNT], max_val: i8) -> [i8; MOTOR_COUNT] {
    let largest = powers
        .iter()
        .map(|p| p.unsigned_abs())
        .max()
        .unwrap_or(0);

    if largest == 0 {
        return powers;
    }

    // Integer math keeps the largest entry exactly at max_val
    let max_val = max_val.clamp(-MAX_POWER, MAX_POWER) as i32;
    let largest = largest as i32;
    powers.map(|p| (p as i32 * max_val / largest) as i8)
}

/// Body velocity -> motor powers
///
/// e1 = (vx + vy) / √2, e2 = (vx - vy) / √2, (m1, m2, m3, m4) = (e2, e1, e1, e2)
pub fn velocity_to_wheel_powers(vx: f32, vy: f32) -> WheelPowers {
    let e1 = to_power((vx + vy) / SQRT_2);
    let e2 = to_power((vx - vy) / SQRT_2);
    WheelPowers::new(e2, e1, e1, e2)
}

/// Heading (radians) and speed -> body velocity (vx, vy)
pub fn dir_and_speed_to_velocity(dir: f32, speed: i8) -> (f32, f32) {
    let speed = speed as f32;
    (speed * dir.cos(), speed * dir.sin())
}

/// Left/right side powers -> (left, right, left, right)
pub fn left_right_to_wheel_powers(left: i8, right: i8) -> WheelPowers {
    WheelPowers::new(left, right, left, right)
}

/// In-place rotation: left side at ±speed, right side opposite
pub fn rotate_to_wheel_powers(clockwise: bool, speed: i8) -> WheelPowers {
    let speed = speed.clamp(-MAX_POWER, MAX_POWER);
    let d = if clockwise { speed } else { -speed };
    left_right_to_wheel_powers(d, -d)
}
