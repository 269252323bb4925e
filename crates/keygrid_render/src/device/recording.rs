use std::io;
use std::path::PathBuf;

use super::{DeviceSink, SinkError};
use crate::frame::grid::Frame;

/// In-memory sink that keeps every write, for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingSink {
    frames: Vec<Vec<u8>>,
    controls: Vec<(String, String)>,
    fail_next_frames: usize,
    missing: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every write reports [`SinkError::NotFound`].
    pub fn missing() -> Self {
        Self { missing: true, ..Self::default() }
    }

    /// Reject the next `count` frame writes.
    pub fn fail_next_frames(&mut self, count: usize) {
        self.fail_next_frames = count;
    }

    /// Serialized frames in write order.
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    pub fn controls(&self) -> &[(String, String)] {
        &self.controls
    }

    fn target(name: &str) -> PathBuf {
        PathBuf::from("memory").join(name)
    }
}

impl DeviceSink for RecordingSink {
    fn write_frame(&mut self, frame: &Frame) -> Result<(), SinkError> {
        if self.missing {
            return Err(SinkError::NotFound { path: Self::target("set_key_colors") });
        }
        if self.fail_next_frames > 0 {
            self.fail_next_frames -= 1;
            return Err(SinkError::Rejected {
                path: Self::target("set_key_colors"),
                source: io::Error::other("injected failure"),
            });
        }
        self.frames.push(frame.to_bytes());
        Ok(())
    }

    fn write_raw(&mut self, key: &str, value: &str) -> Result<(), SinkError> {
        if self.missing {
            return Err(SinkError::NotFound { path: Self::target(key) });
        }
        self.controls.push((key.to_owned(), value.to_owned()));
        Ok(())
    }
}
