//! Fixed-interval extraction.
//!
//! Asks the engine to write one `frame_%04d.jpg` image every `interval`
//! seconds of source video, regardless of content. The output size is
//! bounded by `duration / interval`, which makes this the deterministic
//! counterpart to [`scene`](crate::scene) extraction.

use std::fs;
use std::path::Path;

use crate::engine::{FrameEngine, FrameFilter};
use crate::error::FramepickError;
use crate::frame::{ExtractionMethod, FrameSet};
use crate::probe::VideoSource;

/// Extract one frame every `interval` seconds into `output_dir`.
///
/// Creates `output_dir` if needed and overwrites existing `frame_*.jpg`
/// files with the same numbers.
///
/// # Errors
///
/// - [`FramepickError::InvalidInterval`] if `interval` is zero; the engine
///   is not run.
/// - [`FramepickError::OutputDirectory`] if the directory cannot be created.
/// - [`FramepickError::EngineNotFound`] / [`FramepickError::EngineFailed`]
///   from the engine.
/// - [`FramepickError::NoFramesExtracted`] if the engine wrote nothing.
pub fn extract_interval_frames<E, P>(
    engine: &E,
    video: &VideoSource,
    output_dir: P,
    interval: u32,
    jpeg_quality: u8,
) -> Result<FrameSet, FramepickError>
where
    E: FrameEngine + ?Sized,
    P: AsRef<Path>,
{
    if interval == 0 {
        return Err(FramepickError::InvalidInterval(interval.to_string()));
    }
    let output_dir = output_dir.as_ref();
    prepare_output_directory(output_dir)?;

    let filter = FrameFilter::Interval { seconds: interval };
    log::debug!(
        "Extracting a frame every {interval}s from {}",
        video.path().display()
    );
    engine.write_frames(video.path(), &filter, output_dir, jpeg_quality)?;

    let frames = FrameSet::collect(
        output_dir,
        filter.prefix(),
        ExtractionMethod::Interval { interval },
    )?;
    log::debug!("Interval extraction produced {} frames", frames.len());
    Ok(frames)
}

pub(crate) fn prepare_output_directory(output_dir: &Path) -> Result<(), FramepickError> {
    fs::create_dir_all(output_dir).map_err(|error| FramepickError::OutputDirectory {
        path: output_dir.to_path_buf(),
        reason: error.to_string(),
    })
}
