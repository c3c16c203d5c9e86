// Stateful motor bank for the 4-motor base
//
// Remembers the power last transmitted for each motor and only re-sends
// motors whose power changed. Kinematic setters decompose movement intents
// into the four powers before emitting.

use std::io::Write;
use tracing::{debug, info, warn};

use super::kinematics::{
    WheelPowers, dir_and_speed_to_velocity, left_right_to_wheel_powers, rotate_to_wheel_powers,
    velocity_to_wheel_powers,
};
use super::protocol::{
    MAX_POWER, MOTOR_COUNT, Result, STOP_SEQUENCE, TOKEN_LEN, power_str, push_command,
    validate_pin, validate_power,
};
use crate::vec2d::V2Float;

/// Motor pins in transmission order
pub const MOTOR_PINS: [u8; MOTOR_COUNT] = [1, 2, 3, 4];

/// High-level driver for the motor controller board
pub struct MotorBank<W: Write> {
    port: W,
    powers: [i8; MOTOR_COUNT], // last transmitted, index = pin - 1
}

impl<W: Write> MotorBank<W> {
    /// Create a bank writing to `port`; all motors are assumed stopped
    pub fn new(port: W) -> Self {
        Self {
            port,
            powers: [0; MOTOR_COUNT],
        }
    }

    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }

    /// Set a single motor
    ///
    /// Returns `Ok(true)` if a command was transmitted, `Ok(false)` if the
    /// power equals the stored value and nothing was sent.
    pub fn set_motor(&mut self, pin: u8, power: i8) -> Result<bool> {
        let idx = validate_pin(pin)?;
        validate_power(pin, power)?;

        if self.powers[idx] == power {
            return Ok(false);
        }

        let mut line = Vec::with_capacity(TOKEN_LEN + 1);
        push_command(&mut line, pin, power);
        debug!("Motor {}: {}", pin, power_str(pin, power));
        self.send(&line)?;

        self.powers[idx] = power;
        Ok(true)
    }

    /// Set all four motors, batching changed commands into a single write
    ///
    /// With `maximize`, powers are first rescaled so the largest magnitude is
    /// 100. Returns the number of motors whose command was transmitted.
    pub fn set_all_motors(
        &mut self,
        m1: i8,
        m2: i8,
        m3: i8,
        m4: i8,
        maximize: bool,
    ) -> Result<usize> {
        self.set_wheel_powers(WheelPowers::new(m1, m2, m3, m4), maximize)
    }

    /// Send a full set of wheel powers (see [`Self::set_all_motors`])
    pub fn set_wheel_powers(&mut self, powers: WheelPowers, maximize: bool) -> Result<usize> {
        let powers = if maximize {
            powers.maximized(MAX_POWER)
        } else {
            powers
        };
        let requested = powers.as_array();

        // Reject the whole batch before touching state or the wire
        for (&pin, &power) in MOTOR_PINS.iter().zip(&requested) {
            validate_power(pin, power)?;
        }

        let mut batch = Vec::with_capacity(MOTOR_COUNT * (TOKEN_LEN + 1));
        let mut emitted = 0;
        for (idx, (&pin, &power)) in MOTOR_PINS.iter().zip(&requested).enumerate() {
            if self.powers[idx] != power {
                push_command(&mut batch, pin, power);
                emitted += 1;
            }
        }

        if emitted > 0 {
            debug!(
                "Setting motor powers: m1={}, m2={}, m3={}, m4={} ({} changed)",
                powers.m1, powers.m2, powers.m3, powers.m4, emitted
            );
            self.send(&batch)?;
            self.powers = requested;
        }

        Ok(emitted)
    }

    /// Stop all motors immediately
    ///
    /// Always transmits all four zero commands, even if the stored state is
    /// already zero.
    pub fn stop(&mut self) -> Result<()> {
        info!("Stopping all motors");
        self.send(STOP_SEQUENCE)?;
        self.powers = [0; MOTOR_COUNT];
        Ok(())
    }

    /// Drive with body velocity (vx, vy)
    pub fn set_velocity(&mut self, vx: f32, vy: f32, maximize: bool) -> Result<usize> {
        self.set_wheel_powers(velocity_to_wheel_powers(vx, vy), maximize)
    }

    /// Drive with a body velocity vector
    pub fn set_velocity_vec(&mut self, velocity: &V2Float, maximize: bool) -> Result<usize> {
        self.set_velocity(velocity.x, velocity.y, maximize)
    }

    /// Drive toward heading `dir` (radians) at `speed`
    pub fn set_dir_and_speed(&mut self, dir: f32, speed: i8, maximize: bool) -> Result<usize> {
        let (vx, vy) = dir_and_speed_to_velocity(dir, speed);
        self.set_velocity(vx, vy, maximize)
    }

    /// Drive the left and right sides independently
    pub fn set_left_right(&mut self, left: i8, right: i8, maximize: bool) -> Result<usize> {
        self.set_wheel_powers(left_right_to_wheel_powers(left, right), maximize)
    }

    /// Rotate in place at `speed`, never rescaled
    pub fn set_rotate(&mut self, clockwise: bool, speed: i8) -> Result<usize> {
        self.set_wheel_powers(rotate_to_wheel_powers(clockwise, speed), false)
    }

    /// Last transmitted power of a motor
    pub fn get_power(&self, pin: u8) -> Result<i8> {
        let idx = validate_pin(pin)?;
        Ok(self.powers[idx])
    }

    /// Last transmitted power of a motor, in wire format
    pub fn get_power_str(&self, pin: u8) -> Result<String> {
        Ok(power_str(pin, self.get_power(pin)?))
    }

    /// All last transmitted powers, index = pin - 1
    pub fn powers(&self) -> WheelPowers {
        WheelPowers::from_array(self.powers)
    }

    /// Human-readable status, e.g. "1F067, 2F000, 3R012, 4F100"
    pub fn info(&self) -> String {
        MOTOR_PINS
            .iter()
            .zip(&self.powers)
            .map(|(&pin, &power)| power_str(pin, power))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Borrow the output sink
    pub fn port(&self) -> &W {
        &self.port
    }

    /// Mutably borrow the output sink
    pub fn port_mut(&mut self) -> &mut W {
        &mut self.port
    }
}

impl<W: Write> Drop for MotorBank<W> {
    fn drop(&mut self) {
        // Last-resort physical stop
        if let Err(e) = self.stop() {
            warn!("Failed to stop motors on drop: {}", e);
        }
    }
}
