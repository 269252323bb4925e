use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::trace;

use super::{discover_root, DeviceConfig, DeviceSink, SinkError};
use crate::frame::grid::Frame;
use crate::GlowError;

/// Control file that receives the frame stream.
pub const FRAME_FILE: &str = "set_key_colors";

/// Sink backed by a driver directory where every control is a file.
///
/// Files are opened for writing without creation, so writing under a wrong
/// root reports [`SinkError::NotFound`] instead of littering the filesystem.
#[derive(Clone, Debug)]
pub struct SysfsSink {
    root: PathBuf,
}

impl SysfsSink {
    pub fn new(config: &DeviceConfig) -> Self {
        Self::at(&config.root)
    }

    pub fn at(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Locate the device and set its brightness to `level`.
    ///
    /// Discovery probes by writing `config.probe_value` to `config.probe_key`,
    /// which darkens the keys, so brightness is always written afterwards.
    pub fn discover(config: &DeviceConfig, level: u8) -> Result<Self, GlowError> {
        let root = discover_root(config, |path| Self::at(path))?;
        let mut sink = Self::at(root);
        sink.set_brightness(level)?;
        Ok(sink)
    }

    fn write_file(&self, name: &str, bytes: &[u8]) -> Result<(), SinkError> {
        let path = self.root.join(name);
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|err| SinkError::from_io(&path, err))?;
        file.write_all(bytes).map_err(|err| SinkError::from_io(&path, err))?;
        trace!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

impl DeviceSink for SysfsSink {
    fn write_frame(&mut self, frame: &Frame) -> Result<(), SinkError> {
        self.write_file(FRAME_FILE, &frame.to_bytes())
    }

    fn write_raw(&mut self, key: &str, value: &str) -> Result<(), SinkError> {
        self.write_file(key, value.as_bytes())
    }
}
