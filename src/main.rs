use clap::Parser;
use tracing_subscriber::EnvFilter;

use robo2019_runtime::config::RuntimeArgs;
#[cfg(target_os = "linux")]
use {
    robo2019_runtime::motor::{self, MotorBank},
    robo2019_runtime::runtime,
    robo2019_runtime::vision::{I2cBus, VisionFrameReader},
    std::io::Write,
    tracing::info,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init(); // installs the subscriber globally

    let args = RuntimeArgs::parse();

    if let Err(e) = start(&args) {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_os = "linux")]
fn start(args: &RuntimeArgs) -> Result<(), BoxError> {
    let sink: Box<dyn Write> = if args.dry_run {
        info!("Dry run: motor commands go to stdout");
        Box::new(std::io::stdout())
    } else {
        info!("Opening motor port {} at {} baud", args.motor_port, args.baudrate);
        Box::new(motor::open_port(&args.motor_port, args.baudrate)?)
    };
    let mut bank = MotorBank::new(sink);

    info!(
        "Opening I2C bus {} for vision peer 0x{:02X}",
        args.i2c_bus, args.vision_address
    );
    let i2c = rppal::i2c::I2c::with_bus(args.i2c_bus)?;
    let mut reader = VisionFrameReader::new(I2cBus::new(i2c), args.vision_address);

    runtime::run(&mut bank, &mut reader, args)
}

#[cfg(not(target_os = "linux"))]
fn start(_args: &RuntimeArgs) -> Result<(), BoxError> {
    Err("the vision link needs Linux i2c-dev".into())
}
