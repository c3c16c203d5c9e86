// Motor controller board (MCB) serial protocol
//
// Text protocol, one command per line:
// <pin:1 digit><dir:'F'|'R'><magnitude:3 digits>\n   e.g. "1F067\n"

use serialport::SerialPort;
use std::time::Duration;

/// Default serial configuration for the motor controller board
pub const DEFAULT_BAUDRATE: u32 = 115_200;
pub const DEFAULT_TIMEOUT_MS: u64 = 100;

/// Number of motors driven by the board
pub const MOTOR_COUNT: usize = 4;

/// Largest power magnitude the board accepts
pub const MAX_POWER: i8 = 100;

/// Length of one encoded command without its newline
pub const TOKEN_LEN: usize = 5;

/// Literal stop sequence, always sent in full
pub const STOP_SEQUENCE: &[u8] = b"1F000\n2F000\n3F000\n4F000\n";

/// Error types for motor command encoding and transmission
#[derive(Debug, thiserror::Error)]
pub enum MotorError {
    #[error("Invalid motor id {pin} (expected 1..={max})", max = MOTOR_COUNT)]
    InvalidMotorId { pin: u8 },

    #[error("Power {power} for motor {pin} is outside -100..=100")]
    PowerOutOfRange { pin: u8, power: i16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

pub type Result<T> = std::result::Result<T, MotorError>;

/// Open the serial link to the motor board (8N1)
pub fn open_port(port_name: &str, baudrate: u32) -> Result<Box<dyn SerialPort>> {
    let port = serialport::new(port_name, baudrate)
        .timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
        .open()?;
    Ok(port)
}

/// Check that `pin` names one of the four motors
pub fn validate_pin(pin: u8) -> Result<usize> {
    if (1..=MOTOR_COUNT as u8).contains(&pin) {
        Ok(pin as usize - 1)
    } else {
        Err(MotorError::InvalidMotorId { pin })
    }
}

/// Check that `power` fits the wire range
pub fn validate_power(pin: u8, power: i8) -> Result<()> {
    if (-MAX_POWER..=MAX_POWER).contains(&power) {
        Ok(())
    } else {
        Err(MotorError::PowerOutOfRange {
            pin,
            power: power as i16,
        })
    }
}

/// Direction letter: 'F' for power >= 0, 'R' for negative
fn direction(power: i8) -> char {
    if power < 0 { 'R' } else { 'F' }
}

/// Encode one command token (no trailing newline)
pub fn power_str(pin: u8, power: i8) -> String {
    format!("{}{}{:03}", pin, direction(power), power.unsigned_abs())
}

/// Append one full command line to `buf`
pub fn push_command(buf: &mut Vec<u8>, pin: u8, power: i8) {
    buf.extend_from_slice(power_str(pin, power).as_bytes());
    buf.push(b'\n');
}
