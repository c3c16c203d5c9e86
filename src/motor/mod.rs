// Motor control module for the 4-motor base
//
// Provides:
// - Motor controller board text protocol (command encoding, validation)
// - Wheel kinematics and the power scaling law
// - Stateful MotorBank that only re-sends changed motors

mod bank;
pub mod kinematics;
pub mod protocol;

pub use bank::{MOTOR_PINS, MotorBank};
pub use kinematics::{WheelPowers, scale_powers};
pub use protocol::{MAX_POWER, MOTOR_COUNT, MotorError, Result, open_port, power_str};
