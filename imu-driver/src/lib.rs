//! Serial driver for Tamagawa IMUs.
//!
//! Reads `\n`-delimited frames from the IMU's serial port, decodes them with
//! the `tamagawa` crate, publishes one record per binary frame and reports
//! device health on a fixed period.
//!
//! The decode loop runs on a blocking thread ([`driver::Driver`]). Health is
//! evaluated by a tokio task ([`monitor::HealthMonitor`]) that shares only the
//! last status word and timestamp through [`state::LatestSample`].

pub mod config;
pub mod driver;
pub mod monitor;
pub mod publish;
pub mod reader;
pub mod serial;
pub mod state;

pub use config::{ConfigError, DriverConfig};
pub use driver::{Driver, DriverError, DriverStats};
pub use monitor::{evaluate, HealthMonitor};
pub use publish::{HealthSink, JsonLinesSink, LogHealthSink, PublishError, RecordSink};
pub use reader::{FrameReader, Shutdown, TransportError};
pub use serial::{open_port, send_handshake};
pub use state::{LatestSample, Sample};
