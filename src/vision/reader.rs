// Request/response reader for the vision co-processor
//
// Every cycle: request FRAME_SIZE bytes, decode if all of them arrived, then
// always send the one-byte acknowledgment that advances the peer to its next
// frame.

use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, warn};

use super::frame::{FRAME_SIZE, VisionFrame};

/// Acknowledgment byte sent after every read attempt
pub const ACK: u8 = 1;

/// Addressed request/response bus shared with the vision peer
pub trait VisionBus {
    type Error: Debug;

    /// Request `buf.len()` bytes from `address`, returning how many arrived
    fn request_from(&mut self, address: u8, buf: &mut [u8]) -> usize;

    /// Send `bytes` to `address`
    fn write_to(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// [`VisionBus`] over any `embedded-hal` I2C controller
///
/// A failed read reports zero bytes received.
pub struct I2cBus<I2C> {
    i2c: I2C,
}

impl<I2C> I2cBus<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    pub fn inner_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    pub fn into_inner(self) -> I2C {
        self.i2c
    }
}

impl<I2C: embedded_hal::i2c::I2c> VisionBus for I2cBus<I2C> {
    type Error = I2C::Error;

    fn request_from(&mut self, address: u8, buf: &mut [u8]) -> usize {
        match self.i2c.read(address, buf) {
            Ok(()) => buf.len(),
            Err(e) => {
                debug!("I2C read from 0x{:02X} failed: {:?}", address, e);
                0
            }
        }
    }

    fn write_to(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, bytes)
    }
}

/// Diagnostic counters; short reads and empty frames look identical to the
/// caller of [`VisionFrameReader::read_frame`], these tell them apart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReaderStats {
    pub cycles: u64,
    pub frames: u64,
    pub empty_frames: u64,
    pub short_reads: u64,
    pub ack_failures: u64,
}

/// Polls frames from the vision peer at a fixed bus address
pub struct VisionFrameReader<B: VisionBus> {
    bus: B,
    address: u8,
    stats: ReaderStats,
}

impl<B: VisionBus> VisionFrameReader<B> {
    pub fn new(bus: B, address: u8) -> Self {
        Self {
            bus,
            address,
            stats: ReaderStats::default(),
        }
    }

    /// Run one read cycle
    ///
    /// Returns `None` for a partial transfer or a frame with no objects.
    /// The acknowledgment is sent in every case, after the decode attempt.
    pub fn read_frame(&mut self) -> Option<VisionFrame> {
        self.stats.cycles += 1;

        let mut buf = [0u8; FRAME_SIZE];
        let received = self.bus.request_from(self.address, &mut buf);

        let frame = if received != FRAME_SIZE {
            // Partial data is dropped uninterpreted
            self.stats.short_reads += 1;
            debug!(
                "Short vision read: expected {} bytes, got {}",
                FRAME_SIZE, received
            );
            None
        } else {
            match VisionFrame::decode(&buf) {
                Some(frame) => {
                    self.stats.frames += 1;
                    debug!(?frame, "Vision frame decoded");
                    Some(frame)
                }
                None => {
                    self.stats.empty_frames += 1;
                    debug!("Vision frame has no objects");
                    None
                }
            }
        };

        self.acknowledge();
        frame
    }

    fn acknowledge(&mut self) {
        if let Err(e) = self.bus.write_to(self.address, &[ACK]) {
            self.stats.ack_failures += 1;
            warn!(
                "Failed to acknowledge vision peer at 0x{:02X}: {:?}",
                self.address, e
            );
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn stats(&self) -> ReaderStats {
        self.stats
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::frame::Position;

    #[derive(Debug, PartialEq)]
    enum Event {
        Request { address: u8, len: usize },
        Write { address: u8, bytes: Vec<u8> },
    }

    /// Scripted peer: each request hands out the next canned response
    #[derive(Default)]
    struct FakeBus {
        responses: Vec<Vec<u8>>,
        fail_writes: bool,
        events: Vec<Event>,
    }

    impl FakeBus {
        fn with_responses(responses: Vec<Vec<u8>>) -> Self {
            Self {
                responses,
                ..Self::default()
            }
        }
    }

    impl VisionBus for FakeBus {
        type Error = &'static str;

        fn request_from(&mut self, address: u8, buf: &mut [u8]) -> usize {
            self.events.push(Event::Request {
                address,
                len: buf.len(),
            });
            let data = if self.responses.is_empty() {
                Vec::new()
            } else {
                self.responses.remove(0)
            };
            let n = data.len().min(buf.len());
            buf[..n].copy_from_slice(&data[..n]);
            n
        }

        fn write_to(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
            self.events.push(Event::Write {
                address,
                bytes: bytes.to_vec(),
            });
            if self.fail_writes { Err("nack") } else { Ok(()) }
        }
    }

    const ADDR: u8 = 0x12;

    fn ack() -> Event {
        Event::Write {
            address: ADDR,
            bytes: vec![ACK],
        }
    }

    fn request() -> Event {
        Event::Request {
            address: ADDR,
            len: FRAME_SIZE,
        }
    }

    #[test]
    fn test_full_frame_decoded_then_acked() {
        let bus = FakeBus::with_responses(vec![vec![
            90, 0, 70, 0, 0xFF, 0xFF, 0xFF, 0xFF, 200, 0, 150, 0,
        ]]);
        let mut reader = VisionFrameReader::new(bus, ADDR);

        let frame = reader.read_frame().expect("frame");
        assert_eq!(frame.ball, Some(Position::new(90, 70)));
        assert_eq!(frame.yellow_goal, None);
        assert_eq!(frame.blue_goal, Some(Position::new(200, 150)));

        assert_eq!(reader.bus().events, vec![request(), ack()]);
        assert_eq!(reader.stats().frames, 1);
    }

    #[test]
    fn test_short_read_is_no_frame_but_still_acked() {
        let bus = FakeBus::with_responses(vec![vec![90, 0, 70, 0, 0xFF, 0xFF]]);
        let mut reader = VisionFrameReader::new(bus, ADDR);

        assert_eq!(reader.read_frame(), None);
        assert_eq!(reader.bus().events, vec![request(), ack()]);

        let stats = reader.stats();
        assert_eq!(stats.short_reads, 1);
        assert_eq!(stats.frames, 0);
    }

    #[test]
    fn test_nothing_received_is_no_frame() {
        let mut reader = VisionFrameReader::new(FakeBus::default(), ADDR);
        assert_eq!(reader.read_frame(), None);
        assert_eq!(reader.bus().events, vec![request(), ack()]);
    }

    #[test]
    fn test_empty_frame_is_no_frame_but_still_acked() {
        let bus = FakeBus::with_responses(vec![vec![0xFF; FRAME_SIZE]]);
        let mut reader = VisionFrameReader::new(bus, ADDR);

        assert_eq!(reader.read_frame(), None);
        assert_eq!(reader.bus().events, vec![request(), ack()]);
        assert_eq!(reader.stats().empty_frames, 1);
    }

    #[test]
    fn test_ack_failure_is_counted_not_surfaced() {
        let mut bus = FakeBus::with_responses(vec![vec![1, 0, 2, 0, 3, 0, 4, 0, 5, 0, 6, 0]]);
        bus.fail_writes = true;
        let mut reader = VisionFrameReader::new(bus, ADDR);

        let frame = reader.read_frame().expect("frame is still returned");
        assert_eq!(frame.yellow_goal, Some(Position::new(3, 4)));
        assert_eq!(reader.stats().ack_failures, 1);
    }

    #[test]
    fn test_one_ack_per_cycle() {
        let bus = FakeBus::with_responses(vec![
            vec![1, 0, 1, 0, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
            vec![1, 2, 3],
            vec![0xFF; FRAME_SIZE],
        ]);
        let mut reader = VisionFrameReader::new(bus, ADDR);

        for _ in 0..3 {
            reader.read_frame();
        }

        let acks = reader
            .bus()
            .events
            .iter()
            .filter(|e| **e == ack())
            .count();
        assert_eq!(acks, 3);
        assert_eq!(
            reader.stats(),
            ReaderStats {
                cycles: 3,
                frames: 1,
                empty_frames: 1,
                short_reads: 1,
                ack_failures: 0,
            }
        );
    }
}
