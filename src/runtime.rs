// Fixed-rate control loop with vision watchdog
// Note: if the vision link goes quiet for longer than the frame timeout the
// robot is stopped instead of repeating its last command forever

use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

// local imports
use crate::config::{CHASE_SPEED, FRAME_TIMEOUT, RuntimeArgs, SEARCH_CLOCKWISE, SEARCH_SPEED};
use crate::messages::{MoveCommand, RuntimeHealth, Telemetry};
use crate::motor::MotorBank;
use crate::vision::{VisionBus, VisionFrame, VisionFrameReader, pos2dir};

/// Tuning for the ball-chasing policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    pub chase_speed: i8,
    pub search_speed: i8,
    pub search_clockwise: bool,
    pub frame_timeout: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            chase_speed: CHASE_SPEED,
            search_speed: SEARCH_SPEED,
            search_clockwise: SEARCH_CLOCKWISE,
            frame_timeout: FRAME_TIMEOUT,
        }
    }
}

/// Turns vision frames into movement intents
pub struct Controller {
    config: ControllerConfig,
    last_command: MoveCommand,
    last_frame_at: Option<Instant>,
    health: RuntimeHealth,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            last_command: MoveCommand::Stop,
            last_frame_at: None,
            health: RuntimeHealth::FrameStale, // Start stale until first frame
        }
    }

    pub fn health(&self) -> RuntimeHealth {
        self.health
    }

    /// Decide this tick's command from the latest read outcome
    ///
    /// Ball visible -> drive toward it; frame without ball -> rotate to search;
    /// no frame -> keep the last command until the watchdog expires, then stop.
    pub fn on_frame(&mut self, frame: Option<VisionFrame>, now: Instant) -> MoveCommand {
        let command = match frame {
            Some(frame) => {
                self.last_frame_at = Some(now);
                self.command_for(&frame)
            }
            None => {
                let fresh = self
                    .last_frame_at
                    .is_some_and(|at| now.saturating_duration_since(at) <= self.config.frame_timeout);

                if fresh {
                    self.last_command
                } else {
                    if self.health != RuntimeHealth::FrameStale {
                        warn!(
                            "No vision frame for over {:?}, stopping robot",
                            self.config.frame_timeout
                        );
                    }
                    self.health = RuntimeHealth::FrameStale;
                    MoveCommand::Stop
                }
            }
        };

        self.last_command = command;
        command
    }

    fn command_for(&mut self, frame: &VisionFrame) -> MoveCommand {
        match frame.ball {
            Some(ball) => {
                self.health = RuntimeHealth::Ok;
                MoveCommand::toward(pos2dir(ball), self.config.chase_speed, false)
            }
            None => {
                if self.health != RuntimeHealth::Searching {
                    debug!("Ball not in frame, searching");
                }
                self.health = RuntimeHealth::Searching;
                MoveCommand::rotate(self.config.search_clockwise, self.config.search_speed)
            }
        }
    }
}

/// Run the control loop until `args.ticks` cycles have passed (or forever)
///
/// Motors are stopped before the first cycle and again on exit, including
/// when the loop fails.
pub fn run<W: Write, B: VisionBus>(
    bank: &mut MotorBank<W>,
    reader: &mut VisionFrameReader<B>,
    args: &RuntimeArgs,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut controller = Controller::new(args.controller_config());
    let period = args.loop_period();

    info!(
        "Runtime started: {}Hz loop, {}ms vision watchdog, peer 0x{:02X}",
        args.loop_hz,
        args.frame_timeout_ms,
        reader.address()
    );

    bank.stop()?;
    let result = control_loop(bank, reader, &mut controller, period, args.ticks);

    if let Err(e) = bank.stop() {
        warn!("Failed to stop motors on shutdown: {}", e);
    }
    info!("Runtime stopped, vision stats: {:?}", reader.stats());

    result
}

fn control_loop<W: Write, B: VisionBus>(
    bank: &mut MotorBank<W>,
    reader: &mut VisionFrameReader<B>,
    controller: &mut Controller,
    period: Duration,
    max_ticks: Option<u64>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut tick: u64 = 0;
    let mut previous = MoveCommand::Stop; // run() has just stopped the bank

    while max_ticks.is_none_or(|max| tick < max) {
        let started = Instant::now();

        // 1. Poll the vision peer (always acknowledged inside read_frame)
        let frame = reader.read_frame();

        // 2. Decide (includes watchdog logic)
        let command = controller.on_frame(frame, started);

        // 3. Apply; a held stop is not re-sent every tick
        if command != MoveCommand::Stop || previous != MoveCommand::Stop {
            debug!("Applying {}", command);
            command.apply(bank)?;
        }
        previous = command;
        tick += 1;

        // 4. Telemetry
        if tracing::enabled!(tracing::Level::DEBUG) {
            let telemetry = Telemetry {
                tick,
                health: controller.health(),
                command,
                frame,
                motors: bank.powers().as_array(),
                vision: reader.stats(),
            };
            let json = serde_json::to_string(&telemetry)?;
            debug!(telemetry = %json);
        }

        if let Some(rest) = period.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    Ok(())
}
