//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use framepick::{FrameEngine, FrameFilter, FramepickError};

/// One call made against a [`FakeEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Frames(FrameFilter),
    Duration,
}

/// Engine double that writes numbered placeholder images instead of
/// decoding video.
#[derive(Debug, Default)]
pub struct FakeEngine {
    /// Images written for a scene-change filter.
    pub scene_frames: usize,
    /// Images written for an interval filter.
    pub interval_frames: usize,
    /// Raw duration report; `None` makes the probe fail.
    pub duration_report: Option<String>,
    /// Make every frame extraction fail as if the binary were missing.
    pub missing: bool,
    pub calls: RefCell<Vec<Call>>,
}

impl FakeEngine {
    pub fn new(scene_frames: usize) -> Self {
        Self {
            scene_frames,
            interval_frames: 30,
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_report = Some(format!("{seconds:.6}\n"));
        self
    }

    pub fn with_duration_report(mut self, report: &str) -> Self {
        self.duration_report = Some(report.to_string());
        self
    }

    pub fn with_interval_frames(mut self, count: usize) -> Self {
        self.interval_frames = count;
        self
    }

    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl FrameEngine for FakeEngine {
    fn write_frames(
        &self,
        _video: &Path,
        filter: &FrameFilter,
        output_dir: &Path,
        _jpeg_quality: u8,
    ) -> Result<(), FramepickError> {
        self.calls.borrow_mut().push(Call::Frames(*filter));
        if self.missing {
            return Err(FramepickError::EngineNotFound {
                program: PathBuf::from("ffmpeg"),
            });
        }

        let count = match filter {
            FrameFilter::SceneChange { .. } => self.scene_frames,
            FrameFilter::Interval { .. } => self.interval_frames,
        };
        for number in 1..=count {
            let path = output_dir.join(format!("{}{number:04}.jpg", filter.prefix()));
            fs::write(path, b"not really a jpeg")?;
        }
        Ok(())
    }

    fn query_duration(&self, _video: &Path) -> Result<String, FramepickError> {
        self.calls.borrow_mut().push(Call::Duration);
        self.duration_report
            .clone()
            .ok_or_else(|| FramepickError::EngineNotFound {
                program: PathBuf::from("ffprobe"),
            })
    }
}

/// A scratch directory holding a placeholder `input.mp4`.
pub struct Workspace {
    pub directory: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let directory = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(directory.path().join("input.mp4"), b"placeholder video")
            .expect("Failed to write placeholder video");
        Self { directory }
    }

    pub fn video(&self) -> PathBuf {
        self.directory.path().join("input.mp4")
    }

    pub fn output(&self) -> PathBuf {
        self.directory.path().join("frames")
    }
}

/// Write `count` files named `frame_0000.jpg`, `frame_0001.jpg`, ...
pub fn write_frames(directory: &Path, count: usize) {
    for index in 0..count {
        fs::write(
            directory.join(format!("frame_{index:04}.jpg")),
            format!("frame {index}"),
        )
        .expect("Failed to write frame");
    }
}
