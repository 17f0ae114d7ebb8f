//! Delimiter-based frame reader over a blocking byte stream
//!
//! The serial port is opened with a short read timeout. A timed-out read is
//! not an error here: the reader checks its [`Shutdown`] token and keeps
//! accumulating the partial line, so a blocked read can be cancelled without
//! closing the port.

use std::io::{self, BufRead, BufReader, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tamagawa::{RawFrame, Timestamp, DELIMITER};
use thiserror::Error;
use tracing::{debug, trace};

/// Transport failures. All of them end the frame stream.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The byte source reached end of stream.
    #[error("Transport closed")]
    Closed,

    /// Low-level read failure.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Shutdown was requested while waiting for data.
    #[error("Read cancelled by shutdown")]
    Cancelled,
}

/// Cloneable shutdown flag shared between the reader and its owner
#[derive(Debug, Clone, Default)]
pub struct Shutdown(Arc<AtomicBool>);

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown. Blocked readers return at their next timeout.
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Reads `\n`-terminated frames from a byte source.
///
/// No maximum line length is enforced; bounding a runaway line is left to
/// the transport.
pub struct FrameReader<R> {
    inner: BufReader<R>,
    shutdown: Shutdown,
    pending: Vec<u8>,
}

impl<R: Read> FrameReader<R> {
    pub fn new(source: R, shutdown: Shutdown) -> Self {
        Self {
            inner: BufReader::new(source),
            shutdown,
            pending: Vec::with_capacity(64),
        }
    }

    /// Block until the next complete line is available.
    ///
    /// Returns the bytes up to and including the delimiter, stamped with the
    /// host clock at the moment the delimiter was read.
    pub fn next_frame(&mut self) -> Result<RawFrame, TransportError> {
        loop {
            if self.shutdown.is_triggered() {
                return Err(TransportError::Cancelled);
            }

            match self.inner.read_until(DELIMITER, &mut self.pending) {
                Ok(_) if self.pending.last() == Some(&DELIMITER) => {
                    let bytes = std::mem::take(&mut self.pending);
                    trace!("Frame of {} bytes", bytes.len());
                    return Ok(RawFrame::new(bytes, Timestamp::now()));
                }
                Ok(_) => {
                    if !self.pending.is_empty() {
                        debug!(
                            "Stream ended with {} bytes of incomplete frame",
                            self.pending.len()
                        );
                        self.pending.clear();
                    }
                    return Err(TransportError::Closed);
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
                    ) =>
                {
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Iterate over frames until the transport fails.
    ///
    /// The terminating error is yielded once, after which the iterator ends.
    pub fn frames(&mut self) -> Frames<'_, R> {
        Frames {
            reader: self,
            done: false,
        }
    }

    /// Access the underlying byte source
    pub fn get_mut(&mut self) -> &mut R {
        self.inner.get_mut()
    }
}

/// Iterator returned by [`FrameReader::frames`]
pub struct Frames<'a, R> {
    reader: &'a mut FrameReader<R>,
    done: bool,
}

impl<R: Read> Iterator for Frames<'_, R> {
    type Item = Result<RawFrame, TransportError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.reader.next_frame();
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}
