//! Extracted frame records.
//!
//! The engine writes zero-padded, sequentially numbered files, so sorting
//! file names lexicographically yields extraction (temporal) order. Both the
//! extractors and the sampler rely on that when enumerating a directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::Serialize;

use crate::error::FramepickError;

/// One frame image on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameRecord {
    /// File name, e.g. `frame_0001.jpg`.
    pub name: String,
    /// Full path to the image.
    pub path: PathBuf,
    /// Size of the image in bytes.
    pub size: u64,
}

/// How a [`FrameSet`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Scene-change detection with the given threshold.
    SceneDetection {
        /// Threshold in `0.0..=1.0`.
        threshold: f64,
    },
    /// Fixed-interval sampling.
    Interval {
        /// Seconds between frames.
        interval: u32,
    },
}

impl ExtractionMethod {
    /// Short label: `scene_detection` or `interval`.
    pub fn name(&self) -> &'static str {
        match self {
            ExtractionMethod::SceneDetection { .. } => "scene_detection",
            ExtractionMethod::Interval { .. } => "interval",
        }
    }
}

/// An ordered, non-empty sequence of frames from one extraction run.
///
/// All frames live in [`output_dir`](FrameSet::output_dir) and share the
/// method's file-name prefix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSet {
    output_dir: PathBuf,
    #[serde(flatten)]
    method: ExtractionMethod,
    frames: Vec<FrameRecord>,
}

impl FrameSet {
    /// Gather the `<prefix>*.jpg` files in `output_dir` in temporal order.
    ///
    /// # Errors
    ///
    /// Returns [`FramepickError::NoFramesExtracted`] if there are none.
    pub(crate) fn collect(
        output_dir: &Path,
        prefix: &str,
        method: ExtractionMethod,
    ) -> Result<Self, FramepickError> {
        let mut frames = Vec::new();
        for path in matching_entries(output_dir, &frame_pattern(prefix, "jpg"))? {
            let metadata = match fs::metadata(&path) {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(error) => {
                    log::warn!("Skipping {}: {error}", path.display());
                    continue;
                }
            };
            frames.push(FrameRecord {
                name: file_name(&path),
                path,
                size: metadata.len(),
            });
        }

        if frames.is_empty() {
            return Err(FramepickError::NoFramesExtracted {
                path: output_dir.to_path_buf(),
                prefix: prefix.to_string(),
            });
        }

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            method,
            frames,
        })
    }

    /// Directory holding the frames.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// How the frames were produced.
    pub fn method(&self) -> ExtractionMethod {
        self.method
    }

    /// Frames in temporal order.
    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`; an empty extraction is an error.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Paths of all frames, in order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.frames.iter().map(|frame| frame.path.as_path())
    }
}

/// Glob pattern `<prefix>*.<extension>` with both parts matched literally.
pub(crate) fn frame_pattern(prefix: &str, extension: &str) -> String {
    format!("{}*.{}", Pattern::escape(prefix), Pattern::escape(extension))
}

/// Entries of `directory` whose file name matches the glob `pattern`,
/// sorted by name.
pub(crate) fn matching_entries(directory: &Path, pattern: &str) -> io::Result<Vec<PathBuf>> {
    let pattern = Pattern::new(pattern)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;
    let mut matches = Vec::new();

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_str().is_some_and(|name| pattern.matches(name)) {
            matches.push(entry.path());
        }
    }

    matches.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(matches)
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
