pub mod preview;
pub mod recording;
pub mod sysfs;

use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::frame::grid::Frame;
use crate::GlowError;

/// Root of the keyboard's driver directory on a stock install.
pub const DEFAULT_ROOT: &str = "/sys/bus/hid/drivers/hid-razer/0003:1532:020F.0001";

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("device target {path:?} not found")]
    NotFound { path: PathBuf },
    #[error("device target {path:?} rejected the write: {source}")]
    Rejected {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SinkError {
    /// Classify an I/O failure on `path`.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => SinkError::NotFound { path: path.to_path_buf() },
            _ => SinkError::Rejected { path: path.to_path_buf(), source },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SinkError::NotFound { .. })
    }
}

/// Destination for rendered frames.
pub trait DeviceSink {
    /// Write one frame as `FRAME_BYTES` raw bytes in a single write.
    fn write_frame(&mut self, frame: &Frame) -> Result<(), SinkError>;

    /// Write an auxiliary control that is not part of the frame stream.
    fn write_raw(&mut self, key: &str, value: &str) -> Result<(), SinkError>;

    fn set_brightness(&mut self, level: u8) -> Result<(), SinkError> {
        self.write_raw("brightness", &level.to_string())
    }
}

impl<S: DeviceSink + ?Sized> DeviceSink for &mut S {
    fn write_frame(&mut self, frame: &Frame) -> Result<(), SinkError> {
        (**self).write_frame(frame)
    }

    fn write_raw(&mut self, key: &str, value: &str) -> Result<(), SinkError> {
        (**self).write_raw(key, value)
    }
}

impl<S: DeviceSink + ?Sized> DeviceSink for Box<S> {
    fn write_frame(&mut self, frame: &Frame) -> Result<(), SinkError> {
        (**self).write_frame(frame)
    }

    fn write_raw(&mut self, key: &str, value: &str) -> Result<(), SinkError> {
        (**self).write_raw(key, value)
    }
}

#[derive(Clone, Debug)]
pub struct DeviceConfig {
    pub root: PathBuf,
    /// Control written while probing for the device.
    pub probe_key: String,
    pub probe_value: String,
    /// Candidate paths tried after the configured root is not found.
    pub max_attempts: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            probe_key: "brightness".to_owned(),
            probe_value: "0".to_owned(),
            max_attempts: 10,
        }
    }
}

impl DeviceConfig {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), ..Self::default() }
    }
}

/// Find a device root that accepts writes.
///
/// The configured root is probed first. While probes report
/// [`SinkError::NotFound`], the root's final character is replaced with
/// `0`, `1`, `2`, ... up to `max_attempts` candidates. A rejected write stops
/// the search: the device exists but refused the probe.
pub fn discover_root<S, F>(config: &DeviceConfig, mut open: F) -> Result<PathBuf, GlowError>
where
    S: DeviceSink,
    F: FnMut(&Path) -> S,
{
    let mut candidate = config.root.clone();
    let mut attempts = 0;

    loop {
        attempts += 1;
        let mut sink = open(&candidate);
        match sink.write_raw(&config.probe_key, &config.probe_value) {
            Ok(()) => {
                debug!("device confirmed at {} after {attempts} attempts", candidate.display());
                return Ok(candidate);
            },
            Err(err) if err.is_not_found() => {
                debug!("no device at {}", candidate.display());
            },
            Err(err) => return Err(err.into()),
        }

        let substitution = attempts - 1;
        if substitution >= config.max_attempts {
            return Err(GlowError::DeviceNotFound { root: config.root.clone(), attempts });
        }
        candidate = substitute_trailing(&config.root, substitution);
    }
}

fn substitute_trailing(root: &Path, index: usize) -> PathBuf {
    let mut path = root.to_string_lossy().into_owned();
    path.pop();
    path.push_str(&index.to_string());
    PathBuf::from(path)
}
