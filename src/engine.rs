//! Frame engine adapter.
//!
//! Decoding and image writing are delegated to an external command-line
//! engine (`ffmpeg`) and its duration-probing counterpart (`ffprobe`). This
//! module locates those programs, builds their argument lists, and runs them
//! to completion.
//!
//! The [`FrameEngine`] trait is the seam the extractors depend on, so the
//! decision logic can be exercised with a fake engine that writes numbered
//! files instead of decoding video.
//!
//! # Example
//!
//! ```no_run
//! use framepick::FfmpegCli;
//!
//! // Probe `ffmpeg`, `~/bin/ffmpeg`, `/usr/local/bin/ffmpeg`, ...
//! let engine = FfmpegCli::discover();
//! println!("using {}", engine.ffmpeg().display());
//!
//! // Or point at a specific build.
//! let engine = FfmpegCli::new("/opt/ffmpeg/bin/ffmpeg");
//! ```

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::error::FramepickError;

/// Program name used when no candidate location answers.
pub const ENGINE_PROGRAM: &str = "ffmpeg";
/// Program name of the duration-probing counterpart.
pub const PROBE_PROGRAM: &str = "ffprobe";

/// How the engine decides which frames to write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameFilter {
    /// Emit a frame whenever the scene-change score exceeds `threshold`.
    SceneChange {
        /// Threshold in `0.0..=1.0`.
        threshold: f64,
    },
    /// Emit one frame every `seconds` seconds of source video.
    Interval {
        /// Interval length in seconds, always positive.
        seconds: u32,
    },
}

impl FrameFilter {
    /// File-name prefix of the images this filter produces.
    pub fn prefix(&self) -> &'static str {
        match self {
            FrameFilter::SceneChange { .. } => "scene_",
            FrameFilter::Interval { .. } => "frame_",
        }
    }

    /// The `-vf` filter expression handed to the engine.
    pub fn video_filter(&self) -> String {
        match self {
            FrameFilter::SceneChange { threshold } => format!("select=gt(scene\\,{threshold})"),
            FrameFilter::Interval { seconds } => format!("fps=1/{seconds}"),
        }
    }
}

/// The external frame-extraction capability.
///
/// Both operations block until the engine exits.
pub trait FrameEngine {
    /// Write numbered `<prefix>%04d.jpg` images for `video` into
    /// `output_dir`, overwriting existing files.
    ///
    /// `output_dir` already exists when this is called.
    fn write_frames(
        &self,
        video: &Path,
        filter: &FrameFilter,
        output_dir: &Path,
        jpeg_quality: u8,
    ) -> Result<(), FramepickError>;

    /// Return the engine's raw textual duration report for `video`.
    fn query_duration(&self, video: &Path) -> Result<String, FramepickError>;
}

/// Ordered list of places to look for the engine.
#[derive(Debug, Clone)]
pub struct EngineLocator {
    candidates: Vec<PathBuf>,
    fallback: PathBuf,
}

impl Default for EngineLocator {
    /// `ffmpeg` in `PATH`, `~/bin/ffmpeg`, `/usr/local/bin/ffmpeg`, then
    /// `/opt/homebrew/bin/ffmpeg`.
    fn default() -> Self {
        let mut candidates = vec![PathBuf::from(ENGINE_PROGRAM)];
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join("bin").join(ENGINE_PROGRAM));
        }
        candidates.push(PathBuf::from("/usr/local/bin/ffmpeg"));
        candidates.push(PathBuf::from("/opt/homebrew/bin/ffmpeg"));

        Self {
            candidates,
            fallback: PathBuf::from(ENGINE_PROGRAM),
        }
    }
}

impl EngineLocator {
    /// Locator over an explicit candidate list, falling back to the bare
    /// `ffmpeg` name.
    pub fn new<I, P>(candidates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
            fallback: PathBuf::from(ENGINE_PROGRAM),
        }
    }

    /// Use `fallback` when no candidate answers.
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<PathBuf>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Candidates in probe order.
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Resolve by running a version query against each candidate.
    pub fn resolve(&self) -> PathBuf {
        self.resolve_with(answers_version_query)
    }

    /// Resolve using a caller-supplied liveness check.
    pub fn resolve_with<F>(&self, is_usable: F) -> PathBuf
    where
        F: FnMut(&Path) -> bool,
    {
        resolve(&self.candidates, &self.fallback, is_usable)
    }
}

/// Return the first candidate accepted by `is_usable`, else `fallback`.
pub fn resolve<F>(candidates: &[PathBuf], fallback: &Path, mut is_usable: F) -> PathBuf
where
    F: FnMut(&Path) -> bool,
{
    for candidate in candidates {
        if is_usable(candidate) {
            log::debug!("Using frame engine at {}", candidate.display());
            return candidate.clone();
        }
        log::debug!("Frame engine candidate {} did not answer", candidate.display());
    }

    log::debug!(
        "No frame engine candidate answered, falling back to {}",
        fallback.display()
    );
    fallback.to_path_buf()
}

/// Run `<program> -version` and report whether it exited successfully.
pub fn answers_version_query(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

/// Path of the probing program that accompanies `engine`.
///
/// The `ffmpeg` part of the file name is replaced with `ffprobe`, so
/// `/opt/homebrew/bin/ffmpeg` becomes `/opt/homebrew/bin/ffprobe`. A name
/// without `ffmpeg` in it yields a bare `ffprobe`.
pub fn probe_program_for(engine: &Path) -> PathBuf {
    match engine.file_name().and_then(|name| name.to_str()) {
        Some(name) if name.contains(ENGINE_PROGRAM) => {
            engine.with_file_name(name.replace(ENGINE_PROGRAM, PROBE_PROGRAM))
        }
        _ => PathBuf::from(PROBE_PROGRAM),
    }
}

/// Image sequence pattern for `prefix` inside `output_dir`.
pub fn output_pattern(output_dir: &Path, prefix: &str) -> PathBuf {
    output_dir.join(format!("{prefix}%04d.jpg"))
}

/// Arguments for an `ffmpeg` frame extraction run.
pub fn extraction_arguments(
    video: &Path,
    filter: &FrameFilter,
    pattern: &Path,
    jpeg_quality: u8,
) -> Vec<OsString> {
    let mut arguments: Vec<OsString> = vec![
        "-hide_banner".into(),
        "-i".into(),
        video.into(),
        "-vf".into(),
        filter.video_filter().into(),
    ];
    if let FrameFilter::SceneChange { .. } = filter {
        arguments.push("-vsync".into());
        arguments.push("vfr".into());
    }
    arguments.push("-q:v".into());
    arguments.push(jpeg_quality.to_string().into());
    arguments.push(pattern.into());
    arguments.push("-y".into());
    arguments
}

/// Arguments for an `ffprobe` duration query.
pub fn duration_arguments(video: &Path) -> Vec<OsString> {
    vec![
        "-v".into(),
        "error".into(),
        "-show_entries".into(),
        "format=duration".into(),
        "-of".into(),
        "default=noprint_wrappers=1:nokey=1".into(),
        video.into(),
    ]
}

/// [`FrameEngine`] backed by the `ffmpeg` and `ffprobe` command-line tools.
#[derive(Debug, Clone)]
pub struct FfmpegCli {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl FfmpegCli {
    /// Use `ffmpeg` at the given location, with `ffprobe` next to it.
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        let ffmpeg = ffmpeg.into();
        let ffprobe = probe_program_for(&ffmpeg);
        Self { ffmpeg, ffprobe }
    }

    /// Locate `ffmpeg` with the default [`EngineLocator`].
    pub fn discover() -> Self {
        Self::with_locator(&EngineLocator::default())
    }

    /// Locate `ffmpeg` with a custom locator.
    pub fn with_locator(locator: &EngineLocator) -> Self {
        Self::new(locator.resolve())
    }

    /// Override the probing program.
    #[must_use]
    pub fn with_ffprobe(mut self, ffprobe: impl Into<PathBuf>) -> Self {
        self.ffprobe = ffprobe.into();
        self
    }

    /// The extraction program.
    pub fn ffmpeg(&self) -> &Path {
        &self.ffmpeg
    }

    /// The probing program.
    pub fn ffprobe(&self) -> &Path {
        &self.ffprobe
    }
}

impl FrameEngine for FfmpegCli {
    fn write_frames(
        &self,
        video: &Path,
        filter: &FrameFilter,
        output_dir: &Path,
        jpeg_quality: u8,
    ) -> Result<(), FramepickError> {
        let pattern = output_pattern(output_dir, filter.prefix());
        let arguments = extraction_arguments(video, filter, &pattern, jpeg_quality);
        run(&self.ffmpeg, &arguments)?;
        Ok(())
    }

    fn query_duration(&self, video: &Path) -> Result<String, FramepickError> {
        let output = run(&self.ffprobe, &duration_arguments(video))?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Run `program` to completion, capturing its output.
fn run(program: &Path, arguments: &[OsString]) -> Result<Output, FramepickError> {
    log::debug!("Running {} {:?}", program.display(), arguments);

    let output = Command::new(program)
        .args(arguments)
        .stdin(Stdio::null())
        .output()
        .map_err(|error| match error.kind() {
            ErrorKind::NotFound => FramepickError::EngineNotFound {
                program: program.to_path_buf(),
            },
            _ => FramepickError::IoError(error),
        })?;

    if !output.status.success() {
        return Err(FramepickError::EngineFailed {
            program: program.to_path_buf(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(output)
}

