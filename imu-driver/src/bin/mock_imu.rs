//! Mock Tamagawa IMU
//!
//! Emits binary frames at a fixed rate to a serial port, a file, or stdout.
//! Simulates a unit sitting level under gravity while turning about Z at a
//! constant rate, so yaw sweeps through its full range.

use std::f64::consts::PI;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use imu_driver::serial::READ_TIMEOUT;
use nalgebra::Vector3;
use tamagawa::{build_frame, Attitude, FrameVariant, ImuSample, StatusWord};
use tracing::{debug, info};

const GRAVITY: f64 = 9.80665;

#[derive(Parser, Debug)]
#[command(name = "mock_imu")]
#[command(about = "Mock Tamagawa IMU binary frame transmitter")]
struct Args {
    /// Serial port to transmit on (e.g., /dev/pts/3)
    #[arg(long, conflicts_with = "output")]
    serial: Option<String>,

    /// Serial baud rate
    #[arg(long, default_value = "115200")]
    baud_rate: u32,

    /// File to write frames to. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Frame rate in Hz
    #[arg(short, long, default_value = "50")]
    rate: u32,

    /// Emit standard frames (no FOG channel, no attitude)
    #[arg(long)]
    standard: bool,

    /// Simulated yaw rate in deg/s
    #[arg(long, default_value = "10.0")]
    yaw_rate_deg_s: f64,

    /// Set the built-in test error bit on every Nth frame (0 = never)
    #[arg(long, default_value = "0")]
    bit_error_every: u64,

    /// Number of frames to send (0 = infinite)
    #[arg(short, long, default_value = "0")]
    count: u64,
}

fn open_output(args: &Args) -> Result<Box<dyn Write>> {
    if let Some(path) = &args.serial {
        info!("Opening serial port: {path} at {} bps", args.baud_rate);
        let port = serialport::new(path, args.baud_rate)
            .timeout(READ_TIMEOUT)
            .open()
            .with_context(|| format!("Failed to open serial port {path}"))?;
        return Ok(Box::new(port));
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(Box::new(io::BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Sample at frame index `n`
fn sample_at(n: u64, dt: f64, yaw_rate: f64, bit_error_every: u64) -> ImuSample {
    let elapsed = n as f64 * dt;
    let yaw = (yaw_rate * elapsed + PI).rem_euclid(2.0 * PI) - PI;

    let status = if bit_error_every > 0 && n % bit_error_every == 0 && n > 0 {
        StatusWord::BIT_ERROR
    } else {
        StatusWord::empty()
    };

    ImuSample {
        // The extended layout carries only the upper half of the counter
        counter: ((n as u32) & 0xFFFF) << 16 | (n as u32 & 0xFFFF),
        status,
        angular_velocity: Vector3::new(0.0, 0.0, yaw_rate),
        linear_acceleration: Vector3::new(0.0, 0.0, GRAVITY),
        attitude: Attitude::new(0.0, 0.0, yaw),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let args = Args::parse();
    anyhow::ensure!(args.rate > 0, "rate must be positive");

    let variant = if args.standard {
        FrameVariant::Standard
    } else {
        FrameVariant::Extended
    };
    let mut out = open_output(&args)?;

    let interval = Duration::from_secs_f64(1.0 / args.rate as f64);
    let yaw_rate = args.yaw_rate_deg_s.to_radians();

    info!(
        "Starting {} transmission at {} Hz",
        variant.mode_label(),
        args.rate
    );

    let start_time = Instant::now();
    let mut next_send = Instant::now();
    let mut frame_count: u64 = 0;

    loop {
        let sample = sample_at(
            frame_count,
            interval.as_secs_f64(),
            yaw_rate,
            args.bit_error_every,
        );
        let bytes = build_frame(variant, &sample);
        out.write_all(&bytes).context("Failed to write frame")?;
        out.flush().context("Failed to flush output")?;

        debug!(
            "Sent {} byte frame, counter={:#010x}, status={:#06x}",
            bytes.len(),
            sample.counter,
            sample.status.bits()
        );

        frame_count += 1;
        if args.count > 0 && frame_count >= args.count {
            break;
        }

        if frame_count % (args.rate as u64 * 10) == 0 {
            let elapsed = start_time.elapsed().as_secs_f64();
            let rate = frame_count as f64 / elapsed;
            info!("Sent {frame_count} frames in {elapsed:.2}s ({rate:.1} Hz)");
        }

        next_send += interval;
        if let Some(wait) = next_send.checked_duration_since(Instant::now()) {
            std::thread::sleep(wait);
        }
    }

    let elapsed = start_time.elapsed().as_secs_f64();
    info!("Complete: {frame_count} frames in {elapsed:.2}s");

    Ok(())
}
