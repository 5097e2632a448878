//! Even sampling of extracted frames.
//!
//! Reduces a directory of extracted `frame_*.jpg` images to a fixed number
//! of evenly spaced frames and prepares each for transmission to an external
//! analysis capability (base64 payload, byte size, pixel dimensions).
//!
//! Selection is deterministic: with `n` frames and a budget of `k < n`, the
//! frames at `0, step, 2*step, ...` are chosen where `step = n / k`
//! (integer division). The first frame is always included; the last one
//! only when the spacing happens to land on it.
//!
//! # Example
//!
//! ```no_run
//! use framepick::{FramepickError, SamplingConfig};
//!
//! let result = framepick::sample_frames("frames", &SamplingConfig::new())?;
//! println!("{} of {} frames", result.analyzed_frames, result.total_frames);
//! for frame in &result.frames {
//!     println!("{} ({} bytes)", frame.name, frame.size);
//! }
//! # Ok::<(), FramepickError>(())
//! ```

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageReader;
use serde::Serialize;

use crate::config::SamplingConfig;
use crate::error::FramepickError;
use crate::frame::{file_name, matching_entries};
use crate::progress::{OperationType, ProgressTracker};

/// A sampled frame, ready to hand to an analysis capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampledFrame {
    /// Position of the frame in the full, ordered frame sequence.
    pub index: usize,
    /// File name, e.g. `frame_0004.jpg`.
    pub name: String,
    /// Full path to the image.
    pub path: PathBuf,
    /// Size of the image in bytes.
    pub size: u64,
    /// Length of the base64 encoding of the image.
    #[serde(rename = "base64_length")]
    pub encoded_length: usize,
    /// Pixel width, when the image header could be decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Pixel height, when the image header could be decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// The base64 payload, kept only when requested.
    #[serde(rename = "base64", skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

/// Outcome of sampling a frames directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleResult {
    /// Number of matching frames in the directory.
    pub total_frames: usize,
    /// Number of frames actually read and encoded.
    pub analyzed_frames: usize,
    /// The sampled frames in temporal order.
    pub frames: Vec<SampledFrame>,
}

impl SampleResult {
    /// Positions of the sampled frames in the full sequence.
    pub fn indices(&self) -> Vec<usize> {
        self.frames.iter().map(|frame| frame.index).collect()
    }
}

/// Indices of `sample_count` evenly spaced items out of `total`.
///
/// Returns every index when `total <= sample_count`. Otherwise returns
/// `0, step, ..., (sample_count - 1) * step` with `step = total /
/// sample_count`. A zero budget selects nothing.
pub fn select_indices(total: usize, sample_count: usize) -> Vec<usize> {
    if sample_count == 0 {
        return Vec::new();
    }
    if total <= sample_count {
        return (0..total).collect();
    }

    let step = total / sample_count;
    (0..sample_count).map(|i| i * step).collect()
}

/// Sample the frames in `frames_dir`.
///
/// Frames that cannot be read are skipped with a warning.
///
/// # Errors
///
/// - [`FramepickError::InvalidSampleCount`] if the sample count is zero.
/// - [`FramepickError::FramesDirectoryNotFound`] if `frames_dir` is not a
///   directory.
/// - [`FramepickError::NoFramesFound`] if no file matches the pattern.
/// - [`FramepickError::NoReadableFrames`] if every selected frame failed to
///   read.
pub fn sample_frames<P: AsRef<Path>>(
    frames_dir: P,
    config: &SamplingConfig,
) -> Result<SampleResult, FramepickError> {
    config.validate()?;
    let frames_dir = frames_dir.as_ref();

    if !frames_dir.is_dir() {
        return Err(FramepickError::FramesDirectoryNotFound {
            path: frames_dir.to_path_buf(),
        });
    }

    let pattern = config.pattern();
    let entries = matching_entries(frames_dir, &pattern)?;
    if entries.is_empty() {
        return Err(FramepickError::NoFramesFound {
            path: frames_dir.to_path_buf(),
            pattern,
        });
    }

    let indices = select_indices(entries.len(), config.sample_count);
    log::debug!(
        "Sampling {} of {} frames in {}",
        indices.len(),
        entries.len(),
        frames_dir.display()
    );

    let mut tracker = ProgressTracker::start(
        config.progress.clone(),
        OperationType::Sampling,
        Some(indices.len() as u64),
    );
    let mut frames = Vec::with_capacity(indices.len());
    for &index in &indices {
        let path = &entries[index];
        match read_frame(path, index, config.keep_payload) {
            Ok(frame) => frames.push(frame),
            Err(error) => log::warn!("Failed to process {}: {error}", path.display()),
        }
        tracker.advance();
    }

    if frames.is_empty() {
        return Err(FramepickError::NoReadableFrames {
            path: frames_dir.to_path_buf(),
            attempted: indices.len(),
        });
    }

    Ok(SampleResult {
        total_frames: entries.len(),
        analyzed_frames: frames.len(),
        frames,
    })
}

fn read_frame(path: &Path, index: usize, keep_payload: bool) -> Result<SampledFrame, FramepickError> {
    let bytes = fs::read(path)?;
    let payload = STANDARD.encode(&bytes);
    let dimensions = ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()
        .ok()
        .and_then(|reader| reader.into_dimensions().ok());

    Ok(SampledFrame {
        index,
        name: file_name(path),
        path: path.to_path_buf(),
        size: bytes.len() as u64,
        encoded_length: payload.len(),
        width: dimensions.map(|(width, _)| width),
        height: dimensions.map(|(_, height)| height),
        payload: keep_payload.then_some(payload),
    })
}
