// Vision co-processor link
//
// Provides:
// - VisionFrame decoding of the fixed 12-byte payload
// - pos2dir heading computation from camera-space positions
// - VisionFrameReader driving the request / decode / acknowledge cycle

pub mod frame;
pub mod reader;

pub use frame::{CENTER, FRAME_SIZE, Position, VisionFrame, pos2dir};
pub use reader::{ACK, I2cBus, ReaderStats, VisionBus, VisionFrameReader};
