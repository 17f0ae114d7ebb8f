//! End-to-end pipeline tests over an in-memory byte stream.

use std::io::Cursor;
use std::thread;
use std::time::Duration;

use approx::assert_relative_eq;
use imu_driver::{
    evaluate, Driver, DriverError, FrameReader, JsonLinesSink, LatestSample, Shutdown,
    TransportError,
};
use nalgebra::Vector3;
use tamagawa::{
    build_frame, Attitude, FrameVariant, HealthStatus, ImuSample, MeasurementRecord, StatusWord,
    Timestamp,
};

fn sample(i: u32) -> ImuSample {
    let k = i as f64;
    ImuSample {
        counter: i << 16,
        status: StatusWord::empty(),
        angular_velocity: Vector3::new(0.05 * k, -0.03 * k, 0.2 * k),
        linear_acceleration: Vector3::new(0.1 * k, -0.2, 9.80665),
        attitude: Attitude::new(0.01 * k, 0.02 * k, 0.5 * k),
    }
}

fn frame(variant: FrameVariant, sample: &ImuSample) -> Vec<u8> {
    let bytes = build_frame(variant, sample);
    // An embedded newline would split the frame in the reader
    assert!(!bytes[..bytes.len() - 1].contains(&b'\n'));
    bytes
}

/// Four extended frames interleaved with an ASCII line and a truncated frame
fn noisy_stream() -> Vec<u8> {
    let mut stream = Vec::new();
    stream.extend(frame(FrameVariant::Extended, &sample(1)));
    stream.extend_from_slice(b"$TSC,ASC,TAG300 v1.2\r\n");
    stream.extend(frame(FrameVariant::Extended, &sample(2)));

    let mut truncated = frame(FrameVariant::Extended, &sample(9));
    truncated.truncate(25);
    truncated.extend_from_slice(b"\r\n");
    stream.extend(truncated);

    stream.extend(frame(FrameVariant::Extended, &sample(3)));
    let mut faulted = sample(4);
    faulted.status = StatusWord::BIT_ERROR;
    stream.extend(frame(FrameVariant::Extended, &faulted));
    stream
}

#[test]
fn test_records_published_in_order() {
    let state = LatestSample::new();
    let mut reader = FrameReader::new(Cursor::new(noisy_stream()), Shutdown::new());
    let mut driver = Driver::new(FrameVariant::Extended, state.clone());

    let (tx, rx) = crossbeam_channel::unbounded::<MeasurementRecord>();
    let handle = thread::spawn(move || {
        let mut sink = tx;
        let result = driver.run(&mut reader, &mut sink);
        (result, driver.stats())
    });

    let records: Vec<MeasurementRecord> = rx.iter().collect();
    let (result, stats) = handle.join().unwrap();

    assert!(matches!(
        result,
        Err(DriverError::Transport(TransportError::Closed))
    ));
    assert_eq!(stats.frames, 6);
    assert_eq!(stats.records, 4);
    assert_eq!(stats.unrecognized, 1);
    assert_eq!(stats.truncated, 1);

    let counters: Vec<u32> = records.iter().map(|r| r.counter).collect();
    assert_eq!(counters, vec![1 << 16, 2 << 16, 3 << 16, 4 << 16]);

    for (i, record) in records.iter().enumerate() {
        let k = (i + 1) as f64;
        assert_relative_eq!(record.angular_velocity.z, 0.2 * k, epsilon = 1e-6);
        assert_relative_eq!(record.linear_acceleration.z, 9.80665, epsilon = 3.1e-3);

        let (roll, pitch, yaw) = record.orientation.unwrap().euler_angles();
        assert_relative_eq!(roll, 0.01 * k, epsilon = 1e-4);
        assert_relative_eq!(pitch, 0.02 * k, epsilon = 1e-4);
        assert_relative_eq!(yaw, 0.5 * k, epsilon = 1e-4);
    }

    for pair in records.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }

    let latest = state.snapshot().unwrap();
    assert!(latest.status.has_bit_error());
    assert_eq!(latest.sequence, 4);
    assert_eq!(latest.timestamp, records[3].timestamp);
}

#[test]
fn test_health_after_stream() {
    let state = LatestSample::new();
    let mut reader = FrameReader::new(Cursor::new(noisy_stream()), Shutdown::new());
    let mut driver = Driver::new(FrameVariant::Extended, state.clone());
    let mut sink: Vec<MeasurementRecord> = Vec::new();
    let _ = driver.run(&mut reader, &mut sink);

    let last = state.snapshot().unwrap().timestamp;
    let timeout = Duration::from_secs(1);

    let [bit, conn] = evaluate(&state, last, timeout);
    assert_eq!(bit.status, HealthStatus::BitError);
    assert_eq!(conn.status, HealthStatus::Ok);

    let later = Timestamp::from(last.as_duration() + Duration::from_millis(1500));
    let [bit, conn] = evaluate(&state, later, timeout);
    assert_eq!(bit.status, HealthStatus::BitError);
    assert_eq!(conn.status, HealthStatus::ConnectionTimeout);
}

#[test]
fn test_standard_stream_without_orientation() {
    let mut stream = Vec::new();
    for i in 1..=3 {
        stream.extend(frame(FrameVariant::Standard, &sample(i)));
    }
    // Extended decoding of standard frames runs past the end
    let mut reader = FrameReader::new(Cursor::new(stream.clone()), Shutdown::new());
    let mut driver = Driver::new(FrameVariant::Extended, LatestSample::new());
    let mut sink: Vec<MeasurementRecord> = Vec::new();
    let _ = driver.run(&mut reader, &mut sink);
    assert!(sink.is_empty());
    assert_eq!(driver.stats().truncated, 3);

    let mut reader = FrameReader::new(Cursor::new(stream), Shutdown::new());
    let mut driver = Driver::new(FrameVariant::Standard, LatestSample::new());
    let mut sink: Vec<MeasurementRecord> = Vec::new();
    let _ = driver.run(&mut reader, &mut sink);
    assert_eq!(sink.len(), 3);
    assert!(sink.iter().all(|r| r.orientation.is_none()));
}

#[test]
fn test_json_lines_end_to_end() {
    let mut reader = FrameReader::new(Cursor::new(noisy_stream()), Shutdown::new());
    let mut driver = Driver::new(FrameVariant::Extended, LatestSample::new());
    let mut sink = JsonLinesSink::new(Vec::new(), "imu_link");
    let _ = driver.run(&mut reader, &mut sink);

    let output = String::from_utf8(sink.into_inner()).unwrap();
    let values: Vec<serde_json::Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(values.len(), 4);
    assert!(values.iter().all(|v| v["frame_id"] == "imu_link"));
    assert_eq!(values[2]["counter"], 3 << 16);
}

#[test]
fn test_shutdown_from_another_thread() {
    struct Quiet;
    impl std::io::Read for Quiet {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            thread::sleep(Duration::from_millis(5));
            Err(std::io::ErrorKind::TimedOut.into())
        }
    }

    let shutdown = Shutdown::new();
    let mut reader = FrameReader::new(Quiet, shutdown.clone());
    let handle = thread::spawn(move || {
        let mut driver = Driver::new(FrameVariant::Extended, LatestSample::new());
        let mut sink: Vec<MeasurementRecord> = Vec::new();
        driver.run(&mut reader, &mut sink)
    });

    thread::sleep(Duration::from_millis(30));
    shutdown.trigger();
    let stats = handle.join().unwrap().unwrap();
    assert_eq!(stats.frames, 0);
}
