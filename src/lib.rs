//! # framepick
//!
//! Pick representative still frames from a video file and reduce them to a
//! small, evenly distributed sample for downstream visual analysis.
//!
//! Decoding is delegated to the `ffmpeg` and `ffprobe` command-line tools.
//! `framepick` decides *how* to segment a video (content-aware scene
//! detection or a fixed time interval), adapts that choice to the number of
//! frames scene detection produced, and then samples the resulting frames
//! down to a fixed budget.
//!
//! ## Quick Start
//!
//! ### Extract Frames
//!
//! ```no_run
//! use framepick::{ExtractionMode, FfmpegCli, FrameExtractor};
//!
//! let extractor = FrameExtractor::new(FfmpegCli::discover());
//! let extraction = extractor
//!     .extract("input.mp4", "frames", ExtractionMode::Auto)
//!     .unwrap();
//! for frame in extraction.frames().frames() {
//!     println!("{}", frame.path.display());
//! }
//! ```
//!
//! ### Sample Extracted Frames
//!
//! ```no_run
//! use framepick::SamplingConfig;
//!
//! let result = framepick::sample_frames("frames", &SamplingConfig::new()).unwrap();
//! println!("{} of {} frames sampled", result.analyzed_frames, result.total_frames);
//! ```
//!
//! ## Features
//!
//! - **Adaptive extraction**: scene detection first, with an interval
//!   fallback when the frame count falls outside an acceptable band
//! - **Explicit strategies**: scene-only or fixed-interval extraction
//! - **Engine discovery**: probes an ordered list of `ffmpeg` locations
//! - **Even sampling**: deterministic, evenly spaced selection of a fixed
//!   number of frames, tolerant of individual unreadable files
//! - **Progress callbacks**: observe each stage as it runs
//!
//! ## Requirements
//!
//! `ffmpeg` and `ffprobe` must be installed. The files written by an
//! extraction stay on disk; removing them is up to the caller.

pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod interval;
pub mod probe;
pub mod progress;
pub mod sampler;
pub mod scene;
pub mod selector;

pub use config::{
    DEFAULT_INTERVAL_SECONDS, DEFAULT_SAMPLE_COUNT, DEFAULT_SCENE_THRESHOLD, ExtractionConfig,
    SamplingConfig,
};
pub use engine::{EngineLocator, FfmpegCli, FrameEngine, FrameFilter};
pub use error::{ErrorClass, FramepickError};
pub use frame::{ExtractionMethod, FrameRecord, FrameSet};
pub use interval::extract_interval_frames;
pub use probe::{VideoSource, probe_duration};
pub use progress::{OperationType, ProgressCallback, ProgressInfo};
pub use sampler::{SampleResult, SampledFrame, sample_frames, select_indices};
pub use scene::extract_scene_frames;
pub use selector::{Decision, Extraction, ExtractionMode, FrameExtractor};
