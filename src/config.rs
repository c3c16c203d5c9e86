// Loop timing, transports, controller tuning
use clap::Parser;
use std::time::Duration;

use crate::motor::protocol::DEFAULT_BAUDRATE;
use crate::runtime::ControllerConfig;

// Runtime loop frequency
pub const LOOP_HZ: u64 = 50;

// Vision watchdog: stop if no frame arrived for this long
pub const FRAME_TIMEOUT: Duration = Duration::from_millis(250);

// Motor configuration
// Serial port for the motor controller board
pub const MOTOR_PORT: &str = "/dev/ttyAMA0";
pub const MOTOR_BAUDRATE: u32 = DEFAULT_BAUDRATE;

// Vision configuration
// I2C bus the vision co-processor is attached to, and its peer address
pub const I2C_BUS: u8 = 1;
pub const VISION_ADDRESS: u8 = 0x12;

// Controller tuning
pub const CHASE_SPEED: i8 = 80;
pub const SEARCH_SPEED: i8 = 30;
pub const SEARCH_CLOCKWISE: bool = true;

/// Command line for the runtime binary
#[derive(Debug, Clone, Parser)]
#[command(version, about = "Ball-chasing control loop for the 4-motor base")]
pub struct RuntimeArgs {
    /// Serial port of the motor controller board
    #[arg(long, default_value = MOTOR_PORT)]
    pub motor_port: String,

    /// Baud rate of the motor serial link
    #[arg(long, default_value_t = MOTOR_BAUDRATE)]
    pub baudrate: u32,

    /// I2C bus number of the vision co-processor
    #[arg(long, default_value_t = I2C_BUS)]
    pub i2c_bus: u8,

    /// I2C address of the vision co-processor
    #[arg(long, default_value_t = VISION_ADDRESS, value_parser = parse_address)]
    pub vision_address: u8,

    /// Control loop frequency in Hz
    #[arg(long, default_value_t = LOOP_HZ, value_parser = clap::value_parser!(u64).range(1..=1000))]
    pub loop_hz: u64,

    /// Vision watchdog timeout in milliseconds
    #[arg(long, default_value_t = FRAME_TIMEOUT.as_millis() as u64)]
    pub frame_timeout_ms: u64,

    /// Power used when driving toward the ball
    #[arg(long, default_value_t = CHASE_SPEED, value_parser = clap::value_parser!(i8).range(0..=100))]
    pub chase_speed: i8,

    /// Power used when rotating to search for the ball
    #[arg(long, default_value_t = SEARCH_SPEED, value_parser = clap::value_parser!(i8).range(0..=100))]
    pub search_speed: i8,

    /// Search by rotating counter-clockwise instead of clockwise
    #[arg(long)]
    pub search_ccw: bool,

    /// Write motor commands to stdout instead of the serial port
    #[arg(long)]
    pub dry_run: bool,

    /// Stop after this many control cycles (runs forever if omitted)
    #[arg(long)]
    pub ticks: Option<u64>,
}

/// Accepts decimal or 0x-prefixed hex
fn parse_address(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid I2C address '{}': {}", s, e))
}

impl RuntimeArgs {
    pub fn loop_period(&self) -> Duration {
        Duration::from_millis(1000 / self.loop_hz)
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            chase_speed: self.chase_speed,
            search_speed: self.search_speed,
            search_clockwise: SEARCH_CLOCKWISE != self.search_ccw,
            frame_timeout: Duration::from_millis(self.frame_timeout_ms),
        }
    }
}
