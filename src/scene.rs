//! Scene-change extraction.
//!
//! Asks the engine to write one `scene_%04d.jpg` image whenever the
//! inter-frame difference score exceeds a threshold. The number of images
//! depends entirely on the content: static footage can yield none, noisy or
//! fast-cut footage hundreds.
//!
//! # Example
//!
//! ```no_run
//! use framepick::{FfmpegCli, FramepickError, VideoSource};
//!
//! let engine = FfmpegCli::discover();
//! let video = VideoSource::open("input.mp4")?;
//! let frames = framepick::scene::extract_scene_frames(&engine, &video, "frames", 0.3, 2)?;
//! println!("{} scene frames", frames.len());
//! # Ok::<(), FramepickError>(())
//! ```

use std::path::Path;

use crate::config::validate_threshold;
use crate::engine::{FrameEngine, FrameFilter};
use crate::error::FramepickError;
use crate::frame::{ExtractionMethod, FrameSet};
use crate::interval::prepare_output_directory;
use crate::probe::VideoSource;

/// Extract one frame per detected scene change into `output_dir`.
///
/// Creates `output_dir` if needed. Existing `scene_*.jpg` files with the
/// same numbers are overwritten.
///
/// # Errors
///
/// - [`FramepickError::InvalidThreshold`] if `threshold` is outside
///   `0.0..=1.0`; the engine is not run.
/// - [`FramepickError::OutputDirectory`] if the directory cannot be created.
/// - [`FramepickError::EngineNotFound`] / [`FramepickError::EngineFailed`]
///   from the engine.
/// - [`FramepickError::NoFramesExtracted`] if the engine wrote nothing.
pub fn extract_scene_frames<E, P>(
    engine: &E,
    video: &VideoSource,
    output_dir: P,
    threshold: f64,
    jpeg_quality: u8,
) -> Result<FrameSet, FramepickError>
where
    E: FrameEngine + ?Sized,
    P: AsRef<Path>,
{
    validate_threshold(threshold)?;
    let output_dir = output_dir.as_ref();
    prepare_output_directory(output_dir)?;

    let filter = FrameFilter::SceneChange { threshold };
    log::debug!(
        "Detecting scenes in {} (threshold={threshold})",
        video.path().display()
    );
    engine.write_frames(video.path(), &filter, output_dir, jpeg_quality)?;

    let frames = FrameSet::collect(
        output_dir,
        filter.prefix(),
        ExtractionMethod::SceneDetection { threshold },
    )?;
    log::debug!("Scene detection produced {} frames", frames.len());
    Ok(frames)
}
