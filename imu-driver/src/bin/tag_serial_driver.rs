//! Tamagawa IMU serial driver
//!
//! Opens the IMU's serial port, requests binary output at the configured
//! rate, and writes one JSON record per decoded frame to stdout. Health
//! reports are logged to stderr once per period. Ctrl+C or SIGTERM stops
//! the reader at its next read timeout.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use imu_driver::{
    open_port, send_handshake, Driver, DriverConfig, FrameReader, HealthMonitor, JsonLinesSink,
    LatestSample, LogHealthSink, Shutdown,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "tag_serial_driver")]
#[command(about = "Serial driver for Tamagawa IMUs, publishing JSON lines on stdout")]
#[command(version)]
struct Args {
    /// JSON config file. Command-line options override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial device path
    #[arg(long)]
    device: Option<String>,

    /// Serial baud rate
    #[arg(long)]
    baud_rate: Option<u32>,

    /// Output rate requested from the device, in Hz
    #[arg(long)]
    rate: Option<u32>,

    /// Unit has the FOG channel (extended frames with attitude)
    #[arg(long)]
    use_fog: Option<bool>,

    /// Frame identifier attached to published records
    #[arg(long)]
    frame_id: Option<String>,
}

impl Args {
    fn load_config(&self) -> Result<DriverConfig> {
        let mut config = match &self.config {
            Some(path) => DriverConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => DriverConfig::default(),
        };

        if let Some(device) = &self.device {
            config.device = device.clone();
        }
        if let Some(baud_rate) = self.baud_rate {
            config.baud_rate = baud_rate;
        }
        if let Some(rate) = self.rate {
            config.rate = rate;
        }
        if let Some(use_fog) = self.use_fog {
            config.use_fog = use_fog;
        }
        if let Some(frame_id) = &self.frame_id {
            config.frame_id = frame_id.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the records
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let args = Args::parse();
    let config = args.load_config()?;
    info!(
        "IMU type {}, rate {} Hz, frame_id {}",
        config.imu_type, config.rate, config.frame_id
    );

    let mut port = open_port(&config)
        .with_context(|| format!("Failed to open serial port {}", config.device))?;
    send_handshake(&mut *port, config.rate).context("Failed to send output request")?;

    let state = LatestSample::new();
    let shutdown = Shutdown::new();

    let _monitor = HealthMonitor::spawn(
        state.clone(),
        LogHealthSink::new(),
        config.health_period(),
        config.connection_timeout(),
    );

    let mut reader = FrameReader::new(port, shutdown.clone());
    let mut driver = Driver::new(config.variant(), state);
    let frame_id = config.frame_id.clone();

    let mut decode_task = tokio::task::spawn_blocking(move || {
        let stdout = io::stdout();
        let mut sink = JsonLinesSink::new(stdout.lock(), frame_id);
        driver.run(&mut reader, &mut sink)
    });

    let result = tokio::select! {
        result = &mut decode_task => result,
        _ = shutdown_signal() => {
            shutdown.trigger();
            decode_task.await
        }
    };

    let stats = result.context("Decode thread panicked")??;
    info!(
        "Stopped: {} frames, {} records, {} unrecognized, {} truncated",
        stats.frames, stats.records, stats.unrecognized, stats.truncated
    );
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
