// Motor test: Careful, step-by-step test of the motor controller board
//
// Usage: cargo run --example motor_test -- [port]
// Example: cargo run --example motor_test -- /dev/ttyAMA0
//
// Safety features:
// - Explicit confirmation before any writes
// - Starts with a full stop
// - Slow test powers
// - Motors stop when the bank is dropped (also on error)

use robo2019_runtime::config::{MOTOR_BAUDRATE, MOTOR_PORT};
use robo2019_runtime::messages::MoveCommand;
use robo2019_runtime::motor::{self, MOTOR_PINS, MotorBank};
use std::f32::consts::{FRAC_PI_2, PI};
use std::io::{self, Write};
use std::thread::sleep;
use std::time::Duration;

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("debug".parse()?),
        )
        .init();

    // Get port from args or use default
    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| MOTOR_PORT.to_string());

    println!("Motor test (WITH WRITES)");
    println!("  This tool WILL drive the motors!");
    println!("  Make sure wheels are OFF THE GROUND before proceeding!");
    println!();
    println!("Serial port: {} @ {} baud", port, MOTOR_BAUDRATE);
    println!();

    if !confirm("Are the robot's wheels OFF THE GROUND (robot elevated/on blocks)?")? {
        println!("Please elevate the robot so wheels can spin freely without moving the robot.");
        return Ok(());
    }

    println!("Opening serial port...");
    let mut bank = MotorBank::new(motor::open_port(&port, MOTOR_BAUDRATE)?);
    println!("  Connected");
    println!();

    // ========== STEP 1: Stop ==========
    println!("Step 1: Sending STOP to all motors (no movement expected)...");
    bank.stop()?;
    println!("  State: {}", bank.info());
    println!();

    // ========== STEP 2: One motor at a time ==========
    println!("Step 2: Each motor forward at power 20 for 0.3 seconds");
    if !confirm("Proceed with single-motor test?")? {
        return Ok(());
    }
    for pin in MOTOR_PINS {
        println!("  Motor {}...", pin);
        bank.set_motor(pin, 20)?;
        sleep(Duration::from_millis(300));
        bank.set_motor(pin, 0)?;
        sleep(Duration::from_millis(300));
    }
    println!();

    // ========== STEP 3: Movement commands ==========
    println!("Step 3: Movement commands at low power");
    println!("  Press Ctrl+C at any time to abort!");
    if !confirm("Proceed with motion test?")? {
        return Ok(());
    }

    let test_speed = 25;
    let test_duration = Duration::from_millis(300);
    let pause_duration = Duration::from_millis(500);

    let tests = [
        MoveCommand::toward(0.0, test_speed, false),
        MoveCommand::toward(PI, test_speed, false),
        MoveCommand::toward(FRAC_PI_2, test_speed, false),
        MoveCommand::toward(-FRAC_PI_2, test_speed, false),
        MoveCommand::rotate(false, test_speed),
        MoveCommand::rotate(true, test_speed),
    ];

    for cmd in tests {
        println!("  Testing: {}", cmd);
        cmd.apply(&mut bank)?;
        println!("    Motors: {}", bank.info());
        sleep(test_duration);

        // Stop between tests
        MoveCommand::Stop.apply(&mut bank)?;
        sleep(pause_duration);
    }

    // ========== FINAL: Stop ==========
    println!();
    println!("Step 4: Stopping motors...");
    bank.stop()?;
    println!("  Motors stopped: {}", bank.info());
    println!();
    println!("If the wheels moved as expected, the motor link is working.");
    println!("You can now try the full runtime with: cargo run");

    Ok(())
}
