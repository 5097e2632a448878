//! Frame engine adapter tests.
//!
//! Candidate resolution is exercised with injected liveness checks, so no
//! installed ffmpeg is required.

use std::cell::RefCell;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use framepick::engine::{
    duration_arguments, extraction_arguments, output_pattern, probe_program_for, resolve,
};
use framepick::{EngineLocator, ErrorClass, FfmpegCli, FrameEngine, FrameFilter, FramepickError};

fn strings(arguments: &[OsString]) -> Vec<String> {
    arguments
        .iter()
        .map(|argument| argument.to_string_lossy().into_owned())
        .collect()
}

// ── Resolution ─────────────────────────────────────────────────────

#[test]
fn resolve_picks_first_usable_candidate() {
    let candidates = vec![
        PathBuf::from("/missing/ffmpeg"),
        PathBuf::from("/second/ffmpeg"),
        PathBuf::from("/third/ffmpeg"),
    ];
    let probed = RefCell::new(Vec::new());

    let resolved = resolve(&candidates, Path::new("ffmpeg"), |candidate| {
        probed.borrow_mut().push(candidate.to_path_buf());
        candidate.starts_with("/second") || candidate.starts_with("/third")
    });

    assert_eq!(resolved, PathBuf::from("/second/ffmpeg"));
    assert_eq!(probed.into_inner(), candidates[..2].to_vec());
}

#[test]
fn resolve_falls_back_to_bare_name() {
    let candidates = vec![PathBuf::from("/a/ffmpeg"), PathBuf::from("/b/ffmpeg")];
    let resolved = resolve(&candidates, Path::new("ffmpeg"), |_| false);
    assert_eq!(resolved, PathBuf::from("ffmpeg"));
}

#[test]
fn resolve_with_no_candidates() {
    let resolved = resolve(&[], Path::new("ffmpeg"), |_| true);
    assert_eq!(resolved, PathBuf::from("ffmpeg"));
}

#[test]
fn locator_with_custom_fallback() {
    let locator = EngineLocator::new(["/x/ffmpeg", "/y/ffmpeg"]).with_fallback("my-ffmpeg");
    assert_eq!(locator.resolve_with(|_| false), PathBuf::from("my-ffmpeg"));
    assert_eq!(
        locator.resolve_with(|candidate| candidate == Path::new("/y/ffmpeg")),
        PathBuf::from("/y/ffmpeg")
    );
}

#[test]
fn default_locator_order() {
    let locator = EngineLocator::default();
    let candidates = locator.candidates();

    assert_eq!(candidates.first(), Some(&PathBuf::from("ffmpeg")));
    assert_eq!(
        candidates.last(),
        Some(&PathBuf::from("/opt/homebrew/bin/ffmpeg"))
    );
    let usr_local = candidates
        .iter()
        .position(|c| c == Path::new("/usr/local/bin/ffmpeg"))
        .expect("Missing /usr/local/bin candidate");
    assert_eq!(usr_local, candidates.len() - 2);
}

#[test]
fn default_locator_checks_user_bin() {
    let Some(home) = dirs::home_dir() else {
        return;
    };
    let locator = EngineLocator::default();
    assert_eq!(
        locator.candidates().get(1),
        Some(&home.join("bin").join("ffmpeg"))
    );
}

#[test]
fn version_query_against_missing_binaries_falls_back() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let locator = EngineLocator::new([
        directory.path().join("ffmpeg"),
        directory.path().join("bin").join("ffmpeg"),
    ])
    .with_fallback("ffmpeg-fallback");

    assert_eq!(locator.resolve(), PathBuf::from("ffmpeg-fallback"));
}

// ── Probe program ──────────────────────────────────────────────────

#[test]
fn probe_program_sits_next_to_engine() {
    assert_eq!(
        probe_program_for(Path::new("/opt/homebrew/bin/ffmpeg")),
        PathBuf::from("/opt/homebrew/bin/ffprobe")
    );
    assert_eq!(
        probe_program_for(Path::new("ffmpeg")),
        PathBuf::from("ffprobe")
    );
    assert_eq!(
        probe_program_for(Path::new("C:/tools/ffmpeg.exe")),
        PathBuf::from("C:/tools/ffprobe.exe")
    );
}

#[test]
fn probe_program_for_unrelated_name() {
    assert_eq!(
        probe_program_for(Path::new("/usr/bin/avconv")),
        PathBuf::from("ffprobe")
    );
}

#[test]
fn cli_engine_derives_probe() {
    let engine = FfmpegCli::new("/usr/local/bin/ffmpeg");
    assert_eq!(engine.ffmpeg(), Path::new("/usr/local/bin/ffmpeg"));
    assert_eq!(engine.ffprobe(), Path::new("/usr/local/bin/ffprobe"));

    let engine = engine.with_ffprobe("/elsewhere/ffprobe");
    assert_eq!(engine.ffprobe(), Path::new("/elsewhere/ffprobe"));
}

// ── Arguments ──────────────────────────────────────────────────────

#[test]
fn filter_prefixes_and_expressions() {
    let scene = FrameFilter::SceneChange { threshold: 0.3 };
    assert_eq!(scene.prefix(), "scene_");
    assert_eq!(scene.video_filter(), "select=gt(scene\\,0.3)");

    let interval = FrameFilter::Interval { seconds: 10 };
    assert_eq!(interval.prefix(), "frame_");
    assert_eq!(interval.video_filter(), "fps=1/10");
}

#[test]
fn output_pattern_is_zero_padded() {
    assert_eq!(
        output_pattern(Path::new("out"), "frame_"),
        Path::new("out").join("frame_%04d.jpg")
    );
}

#[test]
fn scene_arguments() {
    let pattern = output_pattern(Path::new("out"), "scene_");
    let arguments = strings(&extraction_arguments(
        Path::new("in.mp4"),
        &FrameFilter::SceneChange { threshold: 0.3 },
        &pattern,
        2,
    ));

    let input = arguments.iter().position(|a| a == "-i").expect("Missing -i");
    assert_eq!(arguments[input + 1], "in.mp4");
    let filter = arguments.iter().position(|a| a == "-vf").expect("Missing -vf");
    assert_eq!(arguments[filter + 1], "select=gt(scene\\,0.3)");
    let vsync = arguments.iter().position(|a| a == "-vsync").expect("Missing -vsync");
    assert_eq!(arguments[vsync + 1], "vfr");
    let quality = arguments.iter().position(|a| a == "-q:v").expect("Missing -q:v");
    assert_eq!(arguments[quality + 1], "2");
    assert_eq!(arguments[arguments.len() - 2], pattern.to_string_lossy());
    assert_eq!(arguments.last().map(String::as_str), Some("-y"));
}

#[test]
fn interval_arguments() {
    let pattern = output_pattern(Path::new("out"), "frame_");
    let arguments = strings(&extraction_arguments(
        Path::new("in.mp4"),
        &FrameFilter::Interval { seconds: 30 },
        &pattern,
        5,
    ));

    assert!(arguments.iter().any(|a| a == "fps=1/30"));
    assert!(!arguments.iter().any(|a| a == "-vsync"));
    let quality = arguments.iter().position(|a| a == "-q:v").expect("Missing -q:v");
    assert_eq!(arguments[quality + 1], "5");
    assert_eq!(arguments.last().map(String::as_str), Some("-y"));
}

#[test]
fn probe_arguments() {
    let arguments = strings(&duration_arguments(Path::new("in.mp4")));
    assert_eq!(
        arguments,
        vec![
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
            "in.mp4",
        ]
    );
}

// ── Process failures ───────────────────────────────────────────────

#[test]
fn missing_binary_is_an_environment_error() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let engine = FfmpegCli::new(directory.path().join("ffmpeg"));

    let error = engine
        .write_frames(
            Path::new("in.mp4"),
            &FrameFilter::Interval { seconds: 10 },
            directory.path(),
            2,
        )
        .unwrap_err();

    assert!(
        matches!(error, FramepickError::EngineNotFound { .. }),
        "Expected EngineNotFound, got: {error:?}",
    );
    assert_eq!(error.class(), ErrorClass::Environment);
    assert!(error.details().contains("install ffmpeg"));
}

#[test]
fn missing_probe_is_unknown_duration() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let engine = FfmpegCli::new(directory.path().join("ffmpeg"));

    assert!(engine.query_duration(Path::new("in.mp4")).is_err());
    assert_eq!(framepick::probe_duration(&engine, Path::new("in.mp4")), None);
}

#[cfg(unix)]
#[test]
fn nonzero_exit_is_an_engine_failure() {
    let program = Path::new("/bin/false");
    if !program.exists() {
        return;
    }

    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let engine = FfmpegCli::new(program);
    let error = engine
        .write_frames(
            Path::new("in.mp4"),
            &FrameFilter::SceneChange { threshold: 0.3 },
            directory.path(),
            2,
        )
        .unwrap_err();

    match &error {
        FramepickError::EngineFailed { program, status, .. } => {
            assert_eq!(program, Path::new("/bin/false"));
            assert!(!status.success());
        }
        other => panic!("Expected EngineFailed, got: {other:?}"),
    }
    assert_eq!(error.class(), ErrorClass::Engine);
    assert_eq!(error.category(), "Frame extraction failed");
}

#[cfg(unix)]
#[test]
fn garbage_probe_output_is_unknown_duration() {
    let program = Path::new("/bin/echo");
    if !program.exists() {
        return;
    }

    // `echo` prints its arguments back, which is not a duration.
    let engine = FfmpegCli::new("ffmpeg").with_ffprobe(program);
    let report = engine
        .query_duration(Path::new("in.mp4"))
        .expect("echo should succeed");
    assert!(report.contains("format=duration"));
    assert_eq!(framepick::probe_duration(&engine, Path::new("in.mp4")), None);
}
