// Define message types for the runtime

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

use crate::motor::{self, MotorBank};
use crate::vec2d::V2Float;
use crate::vision::{ReaderStats, VisionFrame};

/// Movement intent for one control tick
///
/// Each variant maps onto exactly one MotorBank setter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum MoveCommand {
    Stop,
    Translate { vector: V2Float, maximize: bool },
    Rotate { clockwise: bool, speed: i8 },
}

impl MoveCommand {
    pub fn translate(vx: f32, vy: f32, maximize: bool) -> Self {
        Self::Translate {
            vector: V2Float::new(vx, vy),
            maximize,
        }
    }

    /// Translate toward heading `dir` (radians) at `speed`
    pub fn toward(dir: f32, speed: i8, maximize: bool) -> Self {
        Self::Translate {
            vector: V2Float::from_polar(dir, speed as f32),
            maximize,
        }
    }

    pub fn rotate(clockwise: bool, speed: i8) -> Self {
        Self::Rotate { clockwise, speed }
    }

    /// Apply to the motor bank
    pub fn apply<W: Write>(&self, bank: &mut MotorBank<W>) -> motor::Result<()> {
        match *self {
            Self::Stop => bank.stop(),
            Self::Translate { vector, maximize } => {
                bank.set_velocity_vec(&vector, maximize).map(|_| ())
            }
            Self::Rotate { clockwise, speed } => bank.set_rotate(clockwise, speed).map(|_| ()),
        }
    }
}

impl fmt::Display for MoveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stop => write!(f, "MoveCommand: Stop"),
            Self::Translate { vector, maximize } => {
                write!(f, "MoveCommand: Translate({:.2}, maximize={})", vector, maximize)
            }
            Self::Rotate { clockwise, speed } => {
                write!(f, "MoveCommand: Rotate(clockwise={}, speed={})", clockwise, speed)
            }
        }
    }
}

/// Health status reported by the runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    Searching,
    FrameStale,
}

/// Per-tick snapshot logged by the runtime
#[derive(Debug, Clone, Serialize)]
pub struct Telemetry {
    pub tick: u64,
    pub health: RuntimeHealth,
    pub command: MoveCommand,
    pub frame: Option<VisionFrame>,
    pub motors: [i8; motor::MOTOR_COUNT],
    pub vision: ReaderStats,
}
