//! Error types for the `framepick` crate.
//!
//! This module defines [`FramepickError`], the unified error type returned by
//! all fallible operations in the crate. Errors carry enough context (paths,
//! program names, captured engine diagnostics) to be reported to a user
//! without additional logging at the call site.
//!
//! Every error also maps to a short [`category`](FramepickError::category)
//! and a longer [`details`](FramepickError::details) string, which is the
//! shape the CLI prints as `{"error": ..., "details": ...}`.

use std::{io::Error as IoError, path::PathBuf, process::ExitStatus};

use thiserror::Error;

/// Coarse classification of a [`FramepickError`].
///
/// Callers can branch on the class instead of matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Bad caller input: missing video, invalid mode, invalid parameters.
    Input,
    /// The extraction engine could not be found on this system.
    Environment,
    /// The extraction engine ran but failed, or produced nothing.
    Engine,
    /// Nothing could be sampled from a frames directory.
    Sampling,
    /// An unexpected I/O failure.
    Io,
}

/// The unified error type for all `framepick` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FramepickError {
    /// The video file does not exist.
    #[error("Video file not found: {path}")]
    VideoNotFound {
        /// Path that was passed in.
        path: PathBuf,
    },

    /// The extraction mode string is not one of the recognised modes.
    #[error("Invalid mode: {0:?}")]
    InvalidMode(String),

    /// An interval that is not a positive whole number of seconds.
    #[error("Invalid interval: {0:?}")]
    InvalidInterval(String),

    /// A scene-change threshold outside `0.0..=1.0`.
    #[error("Invalid scene threshold: {0}")]
    InvalidThreshold(f64),

    /// A sample count of zero was provided.
    #[error("Sample count must be greater than zero")]
    InvalidSampleCount,

    /// The extraction engine binary could not be launched.
    #[error("Frame engine not found: {program}")]
    EngineNotFound {
        /// Program that was attempted.
        program: PathBuf,
    },

    /// The extraction engine exited unsuccessfully.
    #[error("{program} failed ({status}): {stderr}")]
    EngineFailed {
        /// Program that was run.
        program: PathBuf,
        /// Exit status reported by the operating system.
        status: ExitStatus,
        /// Captured diagnostic output.
        stderr: String,
    },

    /// The output directory could not be created.
    #[error("Cannot create output directory {path}: {reason}")]
    OutputDirectory {
        /// Directory that was requested.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// The engine succeeded but no frames with the expected prefix exist.
    #[error("No {prefix}*.jpg frames were written to {path}")]
    NoFramesExtracted {
        /// Output directory.
        path: PathBuf,
        /// File-name prefix that was looked for.
        prefix: String,
    },

    /// The frames directory given to the sampler does not exist.
    #[error("Frames directory not found: {path}")]
    FramesDirectoryNotFound {
        /// Directory that was requested.
        path: PathBuf,
    },

    /// The frames directory contains no matching frame files.
    #[error("No {pattern} files in {path}")]
    NoFramesFound {
        /// Directory that was searched.
        path: PathBuf,
        /// Glob-style description of the files looked for.
        pattern: String,
    },

    /// Every selected frame failed to read.
    #[error("Could not read any of the {attempted} selected frames in {path}")]
    NoReadableFrames {
        /// Directory that was sampled.
        path: PathBuf,
        /// Number of frames that were attempted.
        attempted: usize,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),
}

impl FramepickError {
    /// The coarse class of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            FramepickError::VideoNotFound { .. }
            | FramepickError::InvalidMode(_)
            | FramepickError::InvalidInterval(_)
            | FramepickError::InvalidThreshold(_)
            | FramepickError::InvalidSampleCount
            | FramepickError::FramesDirectoryNotFound { .. } => ErrorClass::Input,
            FramepickError::EngineNotFound { .. } => ErrorClass::Environment,
            FramepickError::EngineFailed { .. }
            | FramepickError::OutputDirectory { .. }
            | FramepickError::NoFramesExtracted { .. } => ErrorClass::Engine,
            FramepickError::NoFramesFound { .. } | FramepickError::NoReadableFrames { .. } => {
                ErrorClass::Sampling
            }
            FramepickError::IoError(_) => ErrorClass::Io,
        }
    }

    /// Short, stable label for the error.
    pub fn category(&self) -> &'static str {
        match self {
            FramepickError::VideoNotFound { .. } => "Video file not found",
            FramepickError::InvalidMode(_) => "Invalid mode",
            FramepickError::InvalidInterval(_) => "Invalid interval",
            FramepickError::InvalidThreshold(_) => "Invalid threshold",
            FramepickError::InvalidSampleCount => "Invalid sample count",
            FramepickError::EngineNotFound { .. } => "ffmpeg not found",
            FramepickError::EngineFailed { .. } => "Frame extraction failed",
            FramepickError::OutputDirectory { .. } => "Output directory not writable",
            FramepickError::NoFramesExtracted { .. } => "No frames extracted",
            FramepickError::FramesDirectoryNotFound { .. } => "Frames directory not found",
            FramepickError::NoFramesFound { .. } => "No frames found",
            FramepickError::NoReadableFrames { .. } => "Failed to process frames",
            FramepickError::IoError(_) => "Unexpected error",
        }
    }

    /// Longer human-readable explanation, including remediation hints.
    pub fn details(&self) -> String {
        match self {
            FramepickError::VideoNotFound { path } => {
                format!("{} does not exist", path.display())
            }
            FramepickError::InvalidMode(mode) => format!(
                "Mode must be \"auto\", \"scene\", \"interval\" or a number of seconds, got {mode:?}"
            ),
            FramepickError::InvalidInterval(value) => {
                format!("Interval must be a positive number of seconds, got {value:?}")
            }
            FramepickError::InvalidThreshold(value) => {
                format!("Scene threshold must be between 0.0 and 1.0, got {value}")
            }
            FramepickError::InvalidSampleCount => {
                "Sample count must be at least 1".to_string()
            }
            FramepickError::EngineNotFound { program } => format!(
                "Could not run {}. Please install ffmpeg or pass its location explicitly",
                program.display()
            ),
            FramepickError::EngineFailed { stderr, status, .. } => {
                let trimmed = stderr.trim();
                if trimmed.is_empty() {
                    format!("ffmpeg exited with {status}")
                } else {
                    trimmed.to_string()
                }
            }
            FramepickError::OutputDirectory { path, reason } => {
                format!("{}: {reason}", path.display())
            }
            FramepickError::NoFramesExtracted { path, prefix } => format!(
                "ffmpeg finished but wrote no {prefix}*.jpg files to {}",
                path.display()
            ),
            FramepickError::FramesDirectoryNotFound { path } => {
                format!("Directory {} does not exist", path.display())
            }
            FramepickError::NoFramesFound { path, pattern } => {
                format!("No {pattern} files in {}", path.display())
            }
            FramepickError::NoReadableFrames { .. } => {
                "Could not read any frame files".to_string()
            }
            FramepickError::IoError(error) => error.to_string(),
        }
    }
}
