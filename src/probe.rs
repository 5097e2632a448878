//! Video sources and duration probing.
//!
//! [`VideoSource`] is a checked reference to a video file on disk. Opening
//! one is the only validation the extractors need before invoking the
//! engine, so a missing file is reported without running anything.
//!
//! The duration is advisory: [`probe_duration`] turns every probing problem
//! into `None` instead of an error.

use std::path::{Path, PathBuf};

use crate::engine::FrameEngine;
use crate::error::FramepickError;

/// A video file the caller owns.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSource {
    path: PathBuf,
    duration: Option<f64>,
}

impl VideoSource {
    /// Reference the video at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FramepickError::VideoNotFound`] if nothing exists at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FramepickError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FramepickError::VideoNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
            duration: None,
        })
    }

    /// Location of the video.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file is still present.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Duration in seconds, if it has been probed successfully.
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Probe the duration through `engine` and remember the result.
    pub fn probe_duration<E: FrameEngine + ?Sized>(&mut self, engine: &E) -> Option<f64> {
        if self.duration.is_none() {
            self.duration = probe_duration(engine, &self.path);
        }
        self.duration
    }
}

/// Ask `engine` for the duration of `video`, in seconds.
///
/// Returns `None` when the engine cannot be run, fails, or prints something
/// that is not a positive number.
pub fn probe_duration<E: FrameEngine + ?Sized>(engine: &E, video: &Path) -> Option<f64> {
    match engine.query_duration(video) {
        Ok(report) => {
            let duration = parse_duration(&report);
            if duration.is_none() {
                log::debug!(
                    "Unusable duration report for {}: {:?}",
                    video.display(),
                    report.trim()
                );
            }
            duration
        }
        Err(error) => {
            log::debug!("Duration probe failed for {}: {error}", video.display());
            None
        }
    }
}

/// Parse a single duration value such as `"900.000000\n"`.
///
/// Zero, negative, and non-finite values are treated as unknown.
pub fn parse_duration(report: &str) -> Option<f64> {
    report
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|seconds| seconds.is_finite() && *seconds > 0.0)
}
