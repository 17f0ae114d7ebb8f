//! Serial port setup and the startup output request

use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tamagawa::output_request;
use tracing::info;

use crate::config::DriverConfig;

/// Read timeout on the port. Bounds how long shutdown waits on a quiet line.
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Open the configured device at 8N1 with no flow control
pub fn open_port(config: &DriverConfig) -> serialport::Result<Box<dyn SerialPort>> {
    info!(
        "Opening serial port: {} at {} bps",
        config.device, config.baud_rate
    );

    serialport::new(&config.device, config.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(READ_TIMEOUT)
        .open()
}

/// Ask the device to start streaming binary frames at `rate` Hz.
///
/// Sent once after opening the port; the device acknowledges nothing.
pub fn send_handshake<W: Write + ?Sized>(
    writer: &mut W,
    rate: impl fmt::Display,
) -> io::Result<()> {
    let request = output_request(rate);
    info!("Requesting output: {}", request.trim_end());
    writer.write_all(request.as_bytes())?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_bytes() {
        let mut written = Vec::new();
        send_handshake(&mut written, 50).unwrap();
        assert_eq!(written, b"$TSC,BIN,50\r\n");

        let mut written = Vec::new();
        send_handshake(&mut written, "050").unwrap();
        assert_eq!(written, b"$TSC,BIN,050\r\n");
    }

    #[test]
    fn test_open_missing_device_fails() {
        let config = DriverConfig {
            device: "/dev/does-not-exist-imu".to_string(),
            ..DriverConfig::default()
        };
        assert!(open_port(&config).is_err());
    }
}
