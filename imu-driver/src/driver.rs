//! Decode loop: frames in, records out

use std::io::Read;

use tamagawa::{DecodeError, Decoder, FrameVariant};
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::publish::{PublishError, RecordSink};
use crate::reader::{FrameReader, TransportError};
use crate::state::LatestSample;

/// Conditions that stop the decode loop
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}

/// Frame counts for one run of the loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// Lines read from the transport
    pub frames: u64,
    /// Records published
    pub records: u64,
    /// Lines without the binary tag
    pub unrecognized: u64,
    /// Binary lines too short for the layout
    pub truncated: u64,
}

/// Decodes frames for one variant and publishes the resulting records
pub struct Driver {
    decoder: Decoder,
    state: LatestSample,
    stats: DriverStats,
}

impl Driver {
    pub fn new(variant: FrameVariant, state: LatestSample) -> Self {
        Self {
            decoder: Decoder::new(variant),
            state,
            stats: DriverStats::default(),
        }
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    /// Handle one received frame.
    ///
    /// On success the record is published and the shared status and
    /// timestamp are updated together. Undecodable frames are counted and
    /// dropped.
    pub fn process<S: RecordSink + ?Sized>(
        &mut self,
        frame: &tamagawa::RawFrame,
        sink: &mut S,
    ) -> Result<(), PublishError> {
        self.stats.frames += 1;

        match self.decoder.decode(frame) {
            Ok(decoded) => {
                self.state
                    .record(decoded.status, decoded.record.timestamp);
                sink.publish(decoded.record)?;
                self.stats.records += 1;
            }
            Err(DecodeError::UnrecognizedFrame) => {
                self.stats.unrecognized += 1;
                trace!("Skipping non-binary frame of {} bytes", frame.len());
            }
            Err(DecodeError::OutOfRange(e)) => {
                self.stats.truncated += 1;
                debug!("Dropping truncated frame: {e}");
            }
        }
        Ok(())
    }

    /// Run until the transport ends or shutdown is requested.
    ///
    /// Cancellation is a clean exit and returns the accumulated counts.
    pub fn run<R: Read, S: RecordSink + ?Sized>(
        &mut self,
        reader: &mut FrameReader<R>,
        sink: &mut S,
    ) -> Result<DriverStats, DriverError> {
        info!("Decoding {} frames", self.decoder.variant().mode_label());

        loop {
            match reader.next_frame() {
                Ok(frame) => self.process(&frame, sink)?,
                Err(TransportError::Cancelled) => {
                    info!(
                        "Shutdown requested after {} frames ({} records)",
                        self.stats.frames, self.stats.records
                    );
                    return Ok(self.stats);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
