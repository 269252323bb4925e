use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::{ImageError, ImageFormat, RgbImage};
use log::debug;

use super::{DeviceSink, SinkError};
use crate::frame::grid::{Frame, COLS, ROWS};

/// Sink that renders every frame to a numbered PNG instead of hardware.
#[derive(Debug)]
pub struct PreviewSink {
    dir: PathBuf,
    /// Edge length in image pixels of one light.
    scale: u32,
    next_frame: usize,
    controls: BTreeMap<String, String>,
}

impl PreviewSink {
    pub fn create(dir: impl Into<PathBuf>, scale: u32) -> Result<Self, SinkError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|err| SinkError::from_io(&dir, err))?;
        Ok(Self { dir, scale: scale.max(1), next_frame: 0, controls: BTreeMap::new() })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frames_written(&self) -> usize {
        self.next_frame
    }

    /// Last value written for each control key.
    pub fn controls(&self) -> &BTreeMap<String, String> {
        &self.controls
    }

    pub fn render(&self, frame: &Frame) -> RgbImage {
        let scale = self.scale;
        RgbImage::from_fn(COLS as u32 * scale, ROWS as u32 * scale, |x, y| {
            let pixel = frame.get((y / scale) as usize, (x / scale) as usize);
            image::Rgb(pixel.channels())
        })
    }
}

impl DeviceSink for PreviewSink {
    fn write_frame(&mut self, frame: &Frame) -> Result<(), SinkError> {
        let path = self.dir.join(format!("frame_{:04}.png", self.next_frame));
        self.render(frame)
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|err| image_error(&path, err))?;
        self.next_frame += 1;
        Ok(())
    }

    fn write_raw(&mut self, key: &str, value: &str) -> Result<(), SinkError> {
        debug!("preview control {key} = {value}");
        self.controls.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

fn image_error(path: &Path, err: ImageError) -> SinkError {
    match err {
        ImageError::IoError(source) => SinkError::from_io(path, source),
        other => SinkError::Rejected { path: path.to_path_buf(), source: io::Error::other(other) },
    }
}
