// Keyboard teleop: WASD move, Z/X rotate, R/F speed, space stop, Q quit
//
// Usage: cargo run --example teleop -- [port]
// Pass "-" as the port to print commands instead of driving the board.
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use robo2019_runtime::config::{MOTOR_BAUDRATE, MOTOR_PORT};
use robo2019_runtime::messages::MoveCommand;
use robo2019_runtime::motor::{self, MotorBank};
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::info;

const SPEEDS: [i8; 3] = [30, 60, 100];
const INPUT_TIMEOUT_MS: u64 = 150; // Stop after this much time with no input

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| MOTOR_PORT.to_string());

    let sink: Box<dyn Write> = if port == "-" {
        Box::new(std::io::stdout())
    } else {
        info!("Opening motor port {}...", port);
        Box::new(motor::open_port(&port, MOTOR_BAUDRATE)?)
    };
    let mut bank = MotorBank::new(sink);

    info!("Controls: WASD=move, Z/X=rotate, R/F=speed, space=stop, Q=quit");
    info!("Speed: LOW");

    enable_raw_mode()?;
    let result = run_teleop(&mut bank);
    disable_raw_mode()?;

    bank.stop()?;
    result
}

fn run_teleop<W: Write>(bank: &mut MotorBank<W>) -> Result<(), BoxError> {
    let mut speed_idx: usize = 0;
    let mut command = MoveCommand::Stop;
    let mut last_movement_input = Instant::now();

    loop {
        // Poll for key with 20ms timeout (50Hz effective rate)
        if event::poll(Duration::from_millis(20))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;
                let speed = SPEEDS[speed_idx];

                match code {
                    // Movement (x forward, y left)
                    KeyCode::Char('w') if pressed => {
                        command = MoveCommand::translate(speed as f32, 0.0, true);
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('s') if pressed => {
                        command = MoveCommand::translate(-(speed as f32), 0.0, true);
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('a') if pressed => {
                        command = MoveCommand::translate(0.0, speed as f32, true);
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('d') if pressed => {
                        command = MoveCommand::translate(0.0, -(speed as f32), true);
                        last_movement_input = Instant::now();
                    }

                    // Rotation
                    KeyCode::Char('z') if pressed => {
                        command = MoveCommand::rotate(false, speed);
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('x') if pressed => {
                        command = MoveCommand::rotate(true, speed);
                        last_movement_input = Instant::now();
                    }

                    // Speed control
                    KeyCode::Char('r') if pressed => {
                        speed_idx = (speed_idx + 1).min(SPEEDS.len() - 1);
                        print_speed(speed_idx);
                    }
                    KeyCode::Char('f') if pressed => {
                        speed_idx = speed_idx.saturating_sub(1);
                        print_speed(speed_idx);
                    }

                    KeyCode::Char(' ') if pressed => {
                        command = MoveCommand::Stop;
                        command.apply(bank)?;
                    }

                    // Quit
                    KeyCode::Char('q') | KeyCode::Esc if pressed => break,

                    _ => {}
                }
            }
        }

        // Release: stop once if no movement input for INPUT_TIMEOUT_MS
        if command != MoveCommand::Stop
            && last_movement_input.elapsed() > Duration::from_millis(INPUT_TIMEOUT_MS)
        {
            command = MoveCommand::Stop;
            command.apply(bank)?;
        }

        // Only changed motors go out on the wire
        if command != MoveCommand::Stop {
            command.apply(bank)?;
        }
    }

    Ok(())
}

fn print_speed(idx: usize) {
    let label = ["LOW", "MED", "HIGH"][idx];
    info!("Speed: {}", label);
}
