//! Integration tests for one-shot enumeration and unblock-all.
//!
//! A named pipe with a writer attached behaves like the real device after
//! its backlog is consumed: reads block rather than hitting end of file, so
//! enumeration can only finish through the idle window.

use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rfkill_core::{decode, encode, Event, Kind, Operation};
use rfkill_ctl::application::unblock_all::UnblockAllUseCase;
use rfkill_ctl::infrastructure::{SysfsNames, SystemRadios};
use rfkill_ctl::{for_each_device, list_devices, ControlDevice, RfkillError};

fn temp_path(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{prefix}_{}", uuid::Uuid::new_v4()))
}

fn make_fifo() -> PathBuf {
    let path = temp_path("rfkill_fifo");
    let c_path = CString::new(path.as_os_str().as_bytes()).unwrap();
    let rc = unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) };
    assert_eq!(rc, 0, "mkfifo failed: {}", std::io::Error::last_os_error());
    path
}

fn attach_writer(path: &Path) -> File {
    OpenOptions::new().read(true).write(true).open(path).unwrap()
}

fn add(index: u32, kind: Kind, soft: u8) -> Event {
    Event {
        index,
        kind,
        operation: Operation::Add,
        soft,
        hard: 0,
    }
}

#[tokio::test]
async fn test_backlog_ends_at_idle_window() {
    // Arrange
    let path = make_fifo();
    let mut writer = attach_writer(&path);
    for ev in [add(0, Kind::Wlan, 0), add(1, Kind::Bluetooth, 1)] {
        writer.write_all(&encode(&ev)).unwrap();
    }
    let started = Instant::now();

    // Act
    let devices = list_devices(&ControlDevice::new(&path), Duration::from_millis(50))
        .await
        .unwrap();

    // Assert
    assert_eq!(devices, vec![add(0, Kind::Wlan, 0), add(1, Kind::Bluetooth, 1)]);
    assert!(started.elapsed() < Duration::from_secs(5));

    std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn test_continuous_events_outlive_idle_window() {
    // Arrange: a feeder writes faster than the idle window, for longer than it
    const RECORDS: u32 = 20;
    let path = make_fifo();
    let keepalive = attach_writer(&path);
    let mut feeder_handle = keepalive.try_clone().unwrap();
    let feeder = std::thread::spawn(move || {
        for i in 0..RECORDS {
            feeder_handle.write_all(&encode(&add(i, Kind::Wwan, 0))).unwrap();
            std::thread::sleep(Duration::from_millis(5));
        }
    });
    let mut handled = Vec::new();

    // Act
    let result = for_each_device(&ControlDevice::new(&path), Duration::from_millis(50), |ev| {
        handled.push(ev.index);
        Ok::<_, RfkillError>(())
    })
    .await;
    feeder.join().unwrap();

    // Assert
    assert!(result.is_ok());
    assert_eq!(handled, (0..RECORDS).collect::<Vec<_>>());

    drop(keepalive);
    std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn test_quiet_device_finishes_without_calling_handler() {
    let path = make_fifo();
    let _writer = attach_writer(&path);
    let mut calls = 0;

    let result = for_each_device(&ControlDevice::new(&path), Duration::from_millis(10), |_| {
        calls += 1;
        Ok::<_, RfkillError>(())
    })
    .await;

    assert!(result.is_ok());
    assert_eq!(calls, 0);
    std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn test_non_add_records_are_not_enumerated() {
    // Arrange
    let path = make_fifo();
    let mut writer = attach_writer(&path);
    writer.write_all(&encode(&Event::change(0, true))).unwrap();
    writer.write_all(&encode(&add(2, Kind::Gps, 0))).unwrap();

    // Act
    let devices = list_devices(&ControlDevice::new(&path), Duration::from_millis(50))
        .await
        .unwrap();

    // Assert
    assert_eq!(devices.iter().map(|e| e.index).collect::<Vec<_>>(), vec![2]);

    std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn test_handler_error_is_returned_unchanged() {
    #[derive(Debug, PartialEq)]
    enum AppError {
        Rejected(u32),
        Device(String),
    }
    impl From<RfkillError> for AppError {
        fn from(e: RfkillError) -> Self {
            AppError::Device(e.to_string())
        }
    }

    let path = make_fifo();
    let mut writer = attach_writer(&path);
    writer.write_all(&encode(&add(7, Kind::Nfc, 0))).unwrap();

    let result = for_each_device(&ControlDevice::new(&path), Duration::from_millis(50), |ev| {
        Err(AppError::Rejected(ev.index))
    })
    .await;

    assert_eq!(result, Err(AppError::Rejected(7)));
    std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn test_unblock_all_writes_unblock_for_soft_blocked_switch() {
    // Arrange: enumeration reads the FIFO, commands go to a separate file
    let dir = temp_path("rfkill_unblock_all");
    std::fs::create_dir_all(dir.join("class").join("rfkill1")).unwrap();
    std::fs::write(dir.join("class").join("rfkill1").join("name"), "hci0\n").unwrap();
    let command_sink = dir.join("commands");
    std::fs::write(&command_sink, b"").unwrap();

    let fifo = make_fifo();
    let mut writer = attach_writer(&fifo);
    for ev in [add(0, Kind::Wlan, 0), add(1, Kind::Bluetooth, 1)] {
        writer.write_all(&encode(&ev)).unwrap();
    }

    let radios = Arc::new(SystemRadios::new(
        ControlDevice::new(&command_sink),
        SysfsNames::new(dir.join("class")),
    ));

    // Act
    let mut reported = Vec::new();
    let names = UnblockAllUseCase::new(radios)
        .run(&ControlDevice::new(&fifo), Duration::from_millis(50), |name| {
            reported.push(name.to_string())
        })
        .await
        .unwrap();

    // Assert
    assert_eq!(names, vec!["hci0".to_string()]);
    assert_eq!(reported, names);
    let written = decode(&std::fs::read(&command_sink).unwrap()).unwrap();
    assert_eq!(written, Event::change(1, false));

    std::fs::remove_file(&fifo).ok();
    std::fs::remove_dir_all(&dir).ok();
}
