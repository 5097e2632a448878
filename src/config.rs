//! Extraction and sampling configuration.
//!
//! [`ExtractionConfig`] carries the tunables of the adaptive extraction
//! (scene threshold, acceptable frame-count band, fallback targets) and an
//! optional progress callback. [`SamplingConfig`] does the same for the
//! frame sampler.
//!
//! The defaults reproduce the established behaviour: threshold `0.3`,
//! accepted band `5..=50` frames, fallback aiming at `30` frames with an
//! interval of at least `10` seconds, and `8` sampled frames.
//!
//! # Example
//!
//! ```
//! use framepick::{ExtractionConfig, SamplingConfig};
//!
//! let extraction = ExtractionConfig::new()
//!     .with_scene_threshold(0.4)
//!     .with_frame_count_band(3, 40);
//! let sampling = SamplingConfig::new().with_sample_count(12);
//! assert_eq!(sampling.sample_count(), 12);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::error::FramepickError;
use crate::frame::frame_pattern;
use crate::progress::{NoOpProgress, ProgressCallback};

/// Default scene-change threshold.
pub const DEFAULT_SCENE_THRESHOLD: f64 = 0.3;
/// Default fixed interval, in seconds, for explicit `interval` mode.
pub const DEFAULT_INTERVAL_SECONDS: u32 = 10;
/// Default number of frames selected by the sampler.
pub const DEFAULT_SAMPLE_COUNT: usize = 8;

/// Configuration for frame extraction.
#[derive(Clone)]
pub struct ExtractionConfig {
    pub(crate) scene_threshold: f64,
    pub(crate) min_scene_frames: usize,
    pub(crate) max_scene_frames: usize,
    pub(crate) target_frame_count: u32,
    pub(crate) min_fallback_interval: u32,
    pub(crate) jpeg_quality: u8,
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for ExtractionConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ExtractionConfig")
            .field("scene_threshold", &self.scene_threshold)
            .field("min_scene_frames", &self.min_scene_frames)
            .field("max_scene_frames", &self.max_scene_frames)
            .field("target_frame_count", &self.target_frame_count)
            .field("min_fallback_interval", &self.min_fallback_interval)
            .field("jpeg_quality", &self.jpeg_quality)
            .finish()
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionConfig {
    /// Create a configuration with the default tunables and no progress
    /// callback.
    pub fn new() -> Self {
        Self {
            scene_threshold: DEFAULT_SCENE_THRESHOLD,
            min_scene_frames: 5,
            max_scene_frames: 50,
            target_frame_count: 30,
            min_fallback_interval: 10,
            jpeg_quality: 2,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Set the scene-change threshold used by `auto` and `scene` modes.
    ///
    /// Values outside `0.0..=1.0` are rejected when extraction runs.
    #[must_use]
    pub fn with_scene_threshold(mut self, threshold: f64) -> Self {
        self.scene_threshold = threshold;
        self
    }

    /// Set the inclusive band of scene frame counts accepted without
    /// fallback.
    #[must_use]
    pub fn with_frame_count_band(mut self, min: usize, max: usize) -> Self {
        self.min_scene_frames = min.min(max);
        self.max_scene_frames = max.max(min);
        self
    }

    /// Set how many frames the interval fallback aims for across the whole
    /// video. Clamped to a minimum of 1.
    #[must_use]
    pub fn with_target_frame_count(mut self, count: u32) -> Self {
        self.target_frame_count = count.max(1);
        self
    }

    /// Set the smallest interval, in seconds, the fallback may choose.
    /// Clamped to a minimum of 1.
    #[must_use]
    pub fn with_min_fallback_interval(mut self, seconds: u32) -> Self {
        self.min_fallback_interval = seconds.max(1);
        self
    }

    /// Set the JPEG quality passed to the engine (`2` is best, `31` worst).
    #[must_use]
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(2, 31);
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// The configured scene-change threshold.
    pub fn scene_threshold(&self) -> f64 {
        self.scene_threshold
    }

    /// Scene frame counts accepted without fallback.
    pub fn frame_count_band(&self) -> RangeInclusive<usize> {
        self.min_scene_frames..=self.max_scene_frames
    }

    /// Frame count the interval fallback aims for.
    pub fn target_frame_count(&self) -> u32 {
        self.target_frame_count
    }

    /// Smallest interval the fallback may choose.
    pub fn min_fallback_interval(&self) -> u32 {
        self.min_fallback_interval
    }

    /// JPEG quality passed to the engine.
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }
}

/// Configuration for the frame sampler.
#[derive(Clone)]
pub struct SamplingConfig {
    pub(crate) sample_count: usize,
    pub(crate) prefix: String,
    pub(crate) extension: String,
    pub(crate) keep_payload: bool,
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for SamplingConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SamplingConfig")
            .field("sample_count", &self.sample_count)
            .field("prefix", &self.prefix)
            .field("extension", &self.extension)
            .field("keep_payload", &self.keep_payload)
            .finish()
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplingConfig {
    /// Sample 8 `frame_*.jpg` files without retaining payloads.
    pub fn new() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            prefix: "frame_".to_string(),
            extension: "jpg".to_string(),
            keep_payload: false,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Set how many frames to select. Zero is rejected when sampling runs.
    #[must_use]
    pub fn with_sample_count(mut self, count: usize) -> Self {
        self.sample_count = count;
        self
    }

    /// Match files named `<prefix>*.<extension>` instead of `frame_*.jpg`.
    #[must_use]
    pub fn with_file_pattern(mut self, prefix: impl Into<String>, extension: &str) -> Self {
        self.prefix = prefix.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Keep the base64 payload of each sampled frame in the result.
    #[must_use]
    pub fn with_payload(mut self, keep: bool) -> Self {
        self.keep_payload = keep;
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// The configured sample count.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Glob pattern of matched files, e.g. `frame_*.jpg`.
    ///
    /// The prefix and extension are matched literally.
    pub fn pattern(&self) -> String {
        frame_pattern(&self.prefix, &self.extension)
    }

    pub(crate) fn validate(&self) -> Result<(), FramepickError> {
        if self.sample_count == 0 {
            return Err(FramepickError::InvalidSampleCount);
        }
        Ok(())
    }
}

pub(crate) fn validate_threshold(threshold: f64) -> Result<(), FramepickError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(FramepickError::InvalidThreshold(threshold));
    }
    Ok(())
}
