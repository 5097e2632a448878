//! Adaptive extraction strategy.
//!
//! In `auto` mode, scene-change extraction runs first. Its frame count is
//! then checked against an acceptable band (by default `5..=50`). A count
//! outside the band means scene detection degenerated, either near-zero
//! frames for static content or hundreds for noisy content; in that case the
//! video duration is probed and, if known, the scene output is replaced by
//! an interval extraction aiming at a fixed number of frames. When the
//! duration is unknown no interval can be computed, and the scene output is
//! kept as it is.
//!
//! A hard failure of the scene attempt (engine missing, engine error) is
//! returned as-is. Only a successful but unsatisfactory result falls back.
//!
//! The decision itself lives in [`decide`], separate from the engine calls,
//! so it can be tested on plain numbers.
//!
//! # Example
//!
//! ```no_run
//! use framepick::{ExtractionMode, FfmpegCli, FrameExtractor, FramepickError};
//!
//! let extractor = FrameExtractor::new(FfmpegCli::discover());
//! let extraction = extractor.extract("input.mp4", "frames", ExtractionMode::Auto)?;
//! if extraction.was_replaced() {
//!     println!("scene detection was unusable, fell back to interval extraction");
//! }
//! println!("{} frames", extraction.frames().len());
//! # Ok::<(), FramepickError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use std::str::FromStr;

use crate::config::{DEFAULT_INTERVAL_SECONDS, ExtractionConfig};
use crate::engine::FrameEngine;
use crate::error::FramepickError;
use crate::frame::FrameSet;
use crate::interval::extract_interval_frames;
use crate::probe::VideoSource;
use crate::progress::{OperationType, ProgressTracker};
use crate::scene::extract_scene_frames;

/// Which extraction strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    /// Scene detection with an interval fallback.
    #[default]
    Auto,
    /// Scene detection only.
    Scene,
    /// Fixed interval, in seconds. Never zero.
    Interval(u32),
}

impl FromStr for ExtractionMode {
    type Err = FramepickError;

    /// Parse `auto`, `scene`, `interval` (10 seconds), or a positive number
    /// of seconds.
    ///
    /// Numbers that are not positive whole seconds are invalid intervals;
    /// any other text is an invalid mode.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "auto" => return Ok(ExtractionMode::Auto),
            "scene" => return Ok(ExtractionMode::Scene),
            "interval" => return Ok(ExtractionMode::Interval(DEFAULT_INTERVAL_SECONDS)),
            _ => {}
        }

        match trimmed.parse::<i64>() {
            Ok(seconds) if seconds > 0 => u32::try_from(seconds)
                .map(ExtractionMode::Interval)
                .map_err(|_| FramepickError::InvalidInterval(trimmed.to_string())),
            Ok(_) => Err(FramepickError::InvalidInterval(trimmed.to_string())),
            // Numeric but not a whole number of seconds, e.g. `1.5`.
            Err(_) if trimmed.parse::<f64>().is_ok_and(f64::is_finite) => {
                Err(FramepickError::InvalidInterval(trimmed.to_string()))
            }
            Err(_) => Err(FramepickError::InvalidMode(trimmed.to_string())),
        }
    }
}

impl Display for ExtractionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ExtractionMode::Auto => write!(f, "auto"),
            ExtractionMode::Scene => write!(f, "scene"),
            ExtractionMode::Interval(seconds) => write!(f, "{seconds}"),
        }
    }
}

/// What to do with a scene-detection result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The frame count is inside the accepted band.
    Accept,
    /// The frame count is outside the band but the duration is unknown.
    KeepUnsatisfactory,
    /// Replace the scene output with an interval extraction.
    Fallback {
        /// Seconds between frames.
        interval: u32,
    },
}

/// Whether `frame_count` scene frames are acceptable under `config`.
pub fn is_satisfactory(frame_count: usize, config: &ExtractionConfig) -> bool {
    config.frame_count_band().contains(&frame_count)
}

/// Interval that spreads roughly the target frame count over `duration`
/// seconds, never below the configured minimum.
///
/// With the defaults this is `max(10, floor(duration / 30))`.
pub fn fallback_interval(duration: f64, config: &ExtractionConfig) -> u32 {
    let spread = (duration / f64::from(config.target_frame_count())).floor() as u32;
    spread.max(config.min_fallback_interval())
}

/// Decide the fate of a scene result with `frame_count` frames.
///
/// `duration` is only called when the count is outside the band.
pub fn decide<F>(frame_count: usize, duration: F, config: &ExtractionConfig) -> Decision
where
    F: FnOnce() -> Option<f64>,
{
    if is_satisfactory(frame_count, config) {
        return Decision::Accept;
    }

    match duration() {
        Some(duration) => Decision::Fallback {
            interval: fallback_interval(duration, config),
        },
        None => Decision::KeepUnsatisfactory,
    }
}

/// Result of an extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// The first strategy's output was used.
    Accepted(FrameSet),
    /// The scene output was discarded in favour of interval extraction.
    Replaced {
        /// The interval extraction's frames.
        frames: FrameSet,
        /// How many frames scene detection had produced.
        scene_frame_count: usize,
    },
}

impl Extraction {
    /// The frames that were kept.
    pub fn frames(&self) -> &FrameSet {
        match self {
            Extraction::Accepted(frames) | Extraction::Replaced { frames, .. } => frames,
        }
    }

    /// Consume the result, keeping the frames.
    pub fn into_frames(self) -> FrameSet {
        match self {
            Extraction::Accepted(frames) | Extraction::Replaced { frames, .. } => frames,
        }
    }

    /// Whether the interval fallback replaced the scene output.
    pub fn was_replaced(&self) -> bool {
        matches!(self, Extraction::Replaced { .. })
    }
}

/// Runs extraction strategies against a [`FrameEngine`].
///
/// Every call is independent: steps run strictly one after another and no
/// state is kept between calls.
#[derive(Debug, Clone)]
pub struct FrameExtractor<E> {
    engine: E,
    config: ExtractionConfig,
}

impl<E: FrameEngine> FrameExtractor<E> {
    /// Use `engine` with the default configuration.
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, ExtractionConfig::new())
    }

    /// Use `engine` with `config`.
    pub fn with_config(engine: E, config: ExtractionConfig) -> Self {
        Self { engine, config }
    }

    /// The underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The active configuration.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract frames from `video_path` into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`FramepickError::VideoNotFound`] before touching the engine
    /// if the video does not exist. Otherwise returns whatever the strategy
    /// that produced the final result returned.
    pub fn extract<V, O>(
        &self,
        video_path: V,
        output_dir: O,
        mode: ExtractionMode,
    ) -> Result<Extraction, FramepickError>
    where
        V: AsRef<Path>,
        O: AsRef<Path>,
    {
        let mut video = VideoSource::open(video_path)?;
        let output_dir = output_dir.as_ref();
        log::debug!(
            "Extracting frames from {} into {} (mode={mode})",
            video.path().display(),
            output_dir.display()
        );

        match mode {
            ExtractionMode::Auto => self.extract_adaptive(&mut video, output_dir),
            ExtractionMode::Scene => self.run_scene(&video, output_dir).map(Extraction::Accepted),
            ExtractionMode::Interval(seconds) => self
                .run_interval(&video, output_dir, seconds)
                .map(Extraction::Accepted),
        }
    }

    fn extract_adaptive(
        &self,
        video: &mut VideoSource,
        output_dir: &Path,
    ) -> Result<Extraction, FramepickError> {
        // An empty scene run counts as zero frames; anything else is fatal.
        let scene = match self.run_scene(video, output_dir) {
            Err(error) if !matches!(error, FramepickError::NoFramesExtracted { .. }) => {
                return Err(error);
            }
            scene => scene,
        };
        let scene_frame_count = scene.as_ref().map_or(0, FrameSet::len);

        match decide(scene_frame_count, || self.run_probe(video), &self.config) {
            Decision::Accept => scene.map(Extraction::Accepted),
            Decision::KeepUnsatisfactory => {
                log::warn!(
                    "Scene detection produced {scene_frame_count} frames (outside {:?}) and the duration is unknown; keeping them",
                    self.config.frame_count_band()
                );
                scene.map(Extraction::Accepted)
            }
            Decision::Fallback { interval } => {
                log::info!(
                    "Scene detection produced {scene_frame_count} frames (outside {:?}); falling back to one frame every {interval}s",
                    self.config.frame_count_band()
                );
                let frames = self.run_interval(video, output_dir, interval)?;
                Ok(Extraction::Replaced {
                    frames,
                    scene_frame_count,
                })
            }
        }
    }

    fn run_scene(&self, video: &VideoSource, output_dir: &Path) -> Result<FrameSet, FramepickError> {
        let tracker = ProgressTracker::start(
            self.config.progress.clone(),
            OperationType::SceneDetection,
            None,
        );
        let frames = extract_scene_frames(
            &self.engine,
            video,
            output_dir,
            self.config.scene_threshold(),
            self.config.jpeg_quality(),
        );
        tracker.finish(produced(&frames));
        frames
    }

    fn run_interval(
        &self,
        video: &VideoSource,
        output_dir: &Path,
        interval: u32,
    ) -> Result<FrameSet, FramepickError> {
        let tracker = ProgressTracker::start(
            self.config.progress.clone(),
            OperationType::IntervalExtraction,
            None,
        );
        let frames = extract_interval_frames(
            &self.engine,
            video,
            output_dir,
            interval,
            self.config.jpeg_quality(),
        );
        tracker.finish(produced(&frames));
        frames
    }

    fn run_probe(&self, video: &mut VideoSource) -> Option<f64> {
        let tracker = ProgressTracker::start(
            self.config.progress.clone(),
            OperationType::DurationProbe,
            None,
        );
        let duration = video.probe_duration(&self.engine);
        tracker.finish(u64::from(duration.is_some()));
        duration
    }
}

/// Frame count reported when a stage finishes; a failed stage produced none.
fn produced(frames: &Result<FrameSet, FramepickError>) -> u64 {
    frames.as_ref().map_or(0, |frames| frames.len() as u64)
}
