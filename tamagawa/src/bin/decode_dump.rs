//! Decode a raw serial capture from a Tamagawa IMU into CSV
//!
//! The capture is split on line delimiters exactly as the live driver does.
//! Lines that decode become `data` rows; anything else becomes a `skipped`
//! row with the reason and the bytes in hex.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use tamagawa::{DecodeError, Decoder, FrameVariant, MeasurementRecord, Timestamp, DELIMITER};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Variant {
    /// Units without the FOG channel
    Standard,
    /// Units with the FOG channel and attitude output
    Extended,
}

impl From<Variant> for FrameVariant {
    fn from(v: Variant) -> Self {
        match v {
            Variant::Standard => FrameVariant::Standard,
            Variant::Extended => FrameVariant::Extended,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "decode_dump")]
#[command(about = "Decode a captured Tamagawa IMU byte stream into CSV")]
struct Args {
    /// Raw capture file
    dump_file: PathBuf,

    /// Output CSV path
    output_csv: PathBuf,

    /// Frame layout the unit was configured with
    #[arg(long, value_enum, default_value = "extended")]
    variant: Variant,
}

const CSV_HEADER: &str = "type,line,counter,status,\
gyro_x_rad_s,gyro_y_rad_s,gyro_z_rad_s,\
accel_x_m_s2,accel_y_m_s2,accel_z_m_s2,\
quat_x,quat_y,quat_z,quat_w,\
skip_reason,skipped_hex";

/// Parsed line - either a record or skipped bytes
enum Row<'a> {
    Data(MeasurementRecord, i16),
    Skipped(&'static str, &'a [u8]),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut data = Vec::new();
    File::open(&args.dump_file)
        .and_then(|mut f| f.read_to_end(&mut data))
        .with_context(|| format!("Failed to read {}", args.dump_file.display()))?;

    info!("Read {} bytes from {}", data.len(), args.dump_file.display());

    let decoder = Decoder::new(args.variant.into());
    // Captures carry no host clock; stamp rows with their line index.
    let rows: Vec<Row> = data
        .split_inclusive(|&b| b == DELIMITER)
        .enumerate()
        .map(|(index, line)| {
            match decoder.decode_bytes(line, Timestamp::new(index as u64, 0)) {
                Ok(decoded) => Row::Data(decoded.record, decoded.status.raw()),
                Err(DecodeError::UnrecognizedFrame) => Row::Skipped("unrecognized", line),
                Err(DecodeError::OutOfRange(_)) => Row::Skipped("truncated", line),
            }
        })
        .collect();

    let data_count = rows.iter().filter(|r| matches!(r, Row::Data(..))).count();
    let skip_count = rows.len() - data_count;
    if data_count == 0 {
        warn!("No binary frames decoded; check --variant");
    }
    info!("Decoded {data_count} records, skipped {skip_count} lines");

    let file = File::create(&args.output_csv)
        .with_context(|| format!("Failed to create {}", args.output_csv.display()))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{CSV_HEADER}")?;

    for row in &rows {
        match row {
            Row::Data(record, status) => {
                let line = record.timestamp.seconds;
                let counter = record.counter;
                let w = record.angular_velocity;
                let a = record.linear_acceleration;
                let quat = record
                    .orientation
                    .map(|q| format!("{:.9},{:.9},{:.9},{:.9}", q.i, q.j, q.k, q.w))
                    .unwrap_or_else(|| ",,,".to_string());
                writeln!(
                    out,
                    "data,{line},{counter},{status},{:.9},{:.9},{:.9},{:.6},{:.6},{:.6},{quat},,",
                    w.x, w.y, w.z, a.x, a.y, a.z
                )?;
            }
            Row::Skipped(reason, bytes) => {
                let hex: String = bytes
                    .iter()
                    .map(|b| format!("{b:02x}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(out, "skipped,,,,,,,,,,,,,,{reason},{hex}")?;
            }
        }
    }

    out.flush()?;
    info!("Wrote {}", args.output_csv.display());
    Ok(())
}
