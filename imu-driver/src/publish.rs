//! Output sinks for measurement records and health reports

use std::io::{self, Write};

use crossbeam_channel::Sender;
use serde::Serialize;
use tamagawa::{HealthReport, HealthStatus, MeasurementRecord, HARDWARE_ID};
use thiserror::Error;
use tracing::{error, info};

/// Failure delivering a record
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Record receiver disconnected")]
    Disconnected,
}

/// Accepts decoded records one at a time, in arrival order
pub trait RecordSink {
    fn publish(&mut self, record: MeasurementRecord) -> Result<(), PublishError>;
}

/// Accepts the independent health reports produced on each tick
pub trait HealthSink: Send + 'static {
    fn report(&mut self, reports: &[HealthReport]);
}

#[derive(Serialize)]
struct ImuMessage<'a> {
    frame_id: &'a str,
    #[serde(flatten)]
    record: &'a MeasurementRecord,
}

/// Writes each record as one JSON object per line.
///
/// The writer is flushed after every record so downstream readers see
/// samples at the device rate.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    frame_id: String,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W, frame_id: impl Into<String>) -> Self {
        Self {
            writer,
            frame_id: frame_id.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn publish(&mut self, record: MeasurementRecord) -> Result<(), PublishError> {
        let message = ImuMessage {
            frame_id: &self.frame_id,
            record: &record,
        };
        serde_json::to_writer(&mut self.writer, &message)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl RecordSink for Sender<MeasurementRecord> {
    fn publish(&mut self, record: MeasurementRecord) -> Result<(), PublishError> {
        self.send(record).map_err(|_| PublishError::Disconnected)
    }
}

impl RecordSink for Vec<MeasurementRecord> {
    fn publish(&mut self, record: MeasurementRecord) -> Result<(), PublishError> {
        self.push(record);
        Ok(())
    }
}

/// Logs health reports through `tracing`.
///
/// Failures are logged at error level on every tick; recoveries and the
/// first healthy report are logged at info level.
#[derive(Debug, Default)]
pub struct LogHealthSink {
    last: Vec<HealthReport>,
}

impl LogHealthSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HealthSink for LogHealthSink {
    fn report(&mut self, reports: &[HealthReport]) {
        for report in reports {
            let previous = self.last.iter().find(|r| r.check == report.check);
            match report.status {
                HealthStatus::Ok => {
                    if previous.map_or(true, |p| !p.status.is_ok()) {
                        info!("[{HARDWARE_ID}] {}: {}", report.check.name(), report.status);
                    }
                }
                status => error!("[{HARDWARE_ID}] {}: {status}", report.check.name()),
            }
        }
        self.last = reports.to_vec();
    }
}

impl<F> HealthSink for F
where
    F: FnMut(&[HealthReport]) + Send + 'static,
{
    fn report(&mut self, reports: &[HealthReport]) {
        self(reports)
    }
}
