// Vision frame: up to three optional object positions in camera space
//
// Wire layout (12 bytes): six little-endian u16 values
// ball.x, ball.y, yellow_goal.x, yellow_goal.y, blue_goal.x, blue_goal.y
// A pair of 0xFFFF marks an object that was not detected.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::vec2d::Vector2D;

/// Camera-space pixel coordinates, origin top-left
pub type Position = Vector2D<u16>;

/// Frame center in camera space, origin for headings
pub const CENTER: Position = Position::new(90, 70);

/// Coordinate value the peer sends for a missing object
pub const ABSENT: u16 = 0xFFFF;

/// Size of one frame on the wire
pub const FRAME_SIZE: usize = 3 * 4;

/// One decoded snapshot from the vision co-processor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VisionFrame {
    pub ball: Option<Position>,
    pub yellow_goal: Option<Position>,
    pub blue_goal: Option<Position>,
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

/// Both axes at the sentinel means absent
fn position(x: u16, y: u16) -> Option<Position> {
    if x == ABSENT && y == ABSENT {
        None
    } else {
        Some(Position::new(x, y))
    }
}

fn decode_position(bytes: &[u8], offset: usize) -> Option<Position> {
    position(read_u16(bytes, offset), read_u16(bytes, offset + 2))
}

impl VisionFrame {
    pub fn new(
        ball: Option<Position>,
        yellow_goal: Option<Position>,
        blue_goal: Option<Position>,
    ) -> Self {
        Self {
            ball,
            yellow_goal,
            blue_goal,
        }
    }

    /// Build from six raw coordinates; sentinel pairs become `None`
    pub fn from_raw(raw: [u16; 6]) -> Self {
        Self {
            ball: position(raw[0], raw[1]),
            yellow_goal: position(raw[2], raw[3]),
            blue_goal: position(raw[4], raw[5]),
        }
    }

    /// Decode a full wire frame
    ///
    /// Returns `None` when no object is present, which callers treat the
    /// same as a failed transfer.
    pub fn decode(bytes: &[u8; FRAME_SIZE]) -> Option<Self> {
        let frame = Self {
            ball: decode_position(bytes, 0),
            yellow_goal: decode_position(bytes, 4),
            blue_goal: decode_position(bytes, 8),
        };
        (!frame.is_empty()).then_some(frame)
    }

    /// Encode back to wire layout
    pub fn encode(&self) -> [u8; FRAME_SIZE] {
        let mut bytes = [0u8; FRAME_SIZE];
        let positions = [self.ball, self.yellow_goal, self.blue_goal];
        for (chunk, pos) in bytes.chunks_exact_mut(4).zip(positions) {
            let (x, y) = pos.map_or((ABSENT, ABSENT), |p| (p.x, p.y));
            chunk[..2].copy_from_slice(&x.to_le_bytes());
            chunk[2..].copy_from_slice(&y.to_le_bytes());
        }
        bytes
    }

    /// True when no object was detected
    pub fn is_empty(&self) -> bool {
        self.ball.is_none() && self.yellow_goal.is_none() && self.blue_goal.is_none()
    }

    pub fn has_ball(&self) -> bool {
        self.ball.is_some()
    }

    pub fn has_yellow_goal(&self) -> bool {
        self.yellow_goal.is_some()
    }

    pub fn has_blue_goal(&self) -> bool {
        self.blue_goal.is_some()
    }
}

// One line per object, position left blank when absent
impl fmt::Display for VisionFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("ball", self.ball),
            ("y_goal", self.yellow_goal),
            ("b_goal", self.blue_goal),
        ];
        for (name, pos) in rows {
            write!(f, "{} pos: ", name)?;
            if let Some(pos) = pos {
                write!(f, "{}", pos)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Heading in radians from the frame center toward `pos`
///
/// `atan2(-(x - 90), y - 70)`: x is inverted so that positive angles are
/// counter-clockwise, matching the orientation sensor.
pub fn pos2dir(pos: Position) -> f32 {
    let dx = CENTER.x as f32 - pos.x as f32;
    let dy = pos.y as f32 - CENTER.y as f32;
    dx.atan2(dy)
}
