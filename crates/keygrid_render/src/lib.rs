//! Frame and animation engine for per-key RGB light grids.
//!
//! Effects produce [`Frame`]s, the [`Scheduler`] paces them and a
//! [`DeviceSink`] writes each one to the hardware.

mod device;
mod effects;
mod frame;
mod noise;
mod scheduler;
mod text;

use std::path::PathBuf;

pub use device::{
    discover_root, preview::PreviewSink, recording::RecordingSink, sysfs::SysfsSink,
    sysfs::FRAME_FILE, DeviceConfig, DeviceSink, SinkError, DEFAULT_ROOT,
};
pub use effects::{
    burst::{random_burst, BurstOptions, RandomBurst},
    fill::{solid_color, solid_fill, SolidFill},
    flow::{flowing_noise, FlowOptions, FlowingNoise},
    scroll::{scrolling_text, ScrollOptions, ScrollingText},
    speckle::{monochrome_noise, two_color_noise, ColorPool, SpeckleNoise, SpeckleOptions},
    wipe::{ease_delay, wipe, wipe_front, DirectionalWipe, WipeOptions},
    Effect, Repeat, Tick, Timing,
};
pub use frame::{
    color::{clamp, jitter, random_variant, Rgb},
    grid::{checked_index, index, Frame, COLS, FRAME_BYTES, PIXEL_COUNT, ROWS},
};
pub use noise::perlin::{perlin3, NoiseParams};
pub use scheduler::{
    CancelToken, Pacer, RunReport, Scheduler, SchedulerOptions, ThreadPacer, WriteErrorPolicy,
};
pub use text::{
    glyphs::{GlyphMap, GlyphSource},
    layout::{advance_width, layout_message, Layout, SCROLL_MARGIN, SPACE_ADVANCE},
};

pub type Result<T, E = GlowError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum GlowError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("no glyph for character {0:?}")]
    UnknownGlyph(char),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("no device found under {root:?} after {attempts} attempts")]
    DeviceNotFound { root: PathBuf, attempts: usize },
    #[error("failed to parse glyph table: {0}")]
    GlyphTable(#[from] serde_json::Error),
}

impl GlowError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        GlowError::InvalidParameter(message.into())
    }
}
