use std::{io, path::PathBuf, sync::Arc, time::Duration};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use framepick::{
    Extraction, ExtractionConfig, ExtractionMethod, ExtractionMode, FfmpegCli, FrameExtractor,
    FramepickError, OperationType, ProgressCallback, ProgressInfo, SamplingConfig,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Value, json};

const CLI_AFTER_HELP: &str = "Examples:\n  framepick extract input.mp4 frames\n  framepick extract input.mp4 frames 15 --progress\n  framepick analyze frames 8\n  framepick completions zsh > _framepick";

const ANALYZE_NOTE: &str = "Frame data prepared. To complete analysis, these frames need to be sent to a vision-capable model.";

#[derive(Debug, Parser)]
#[command(
    name = "framepick",
    version,
    about = "Extract representative frames from videos and sample them for analysis",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show debug logging output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress indicator on stderr.
    #[arg(long, global = true)]
    progress: bool,

    /// Use this ffmpeg binary instead of searching common locations.
    #[arg(long, global = true)]
    ffmpeg: Option<PathBuf>,

    /// Use this ffprobe binary instead of the one next to ffmpeg.
    #[arg(long, global = true)]
    ffprobe: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract frames from a video into a directory.
    #[command(
        about = "Extract video frames",
        after_help = "Modes:\n  auto      scene detection, falling back to a computed interval\n  scene     scene detection only\n  interval  one frame every 10 seconds\n  <N>       one frame every N seconds"
    )]
    Extract {
        /// Input video path.
        video: PathBuf,
        /// Output directory for extracted frames.
        output_dir: PathBuf,
        /// Extraction mode: auto | scene | interval | <seconds>.
        #[arg(default_value = "auto")]
        mode: String,
        /// Scene-change threshold between 0.0 and 1.0.
        #[arg(long, default_value_t = framepick::DEFAULT_SCENE_THRESHOLD)]
        threshold: f64,
    },

    /// Sample extracted frames evenly and report per-frame data.
    #[command(about = "Sample extracted frames")]
    Analyze {
        /// Directory containing frame_*.jpg files.
        frames_dir: PathBuf,
        /// Number of frames to sample.
        #[arg(default_value_t = framepick::DEFAULT_SAMPLE_COUNT)]
        sample_count: usize,
        /// Include each frame's base64 payload in the output.
        #[arg(long)]
        include_payload: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed}] {msg}") {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        let label = operation_label(info.operation);
        let message = match info.total {
            Some(total) => format!("{label} {}/{total}", info.current),
            None if info.current > 0 => format!("{label} ({} done)", info.current),
            None => format!("{label}..."),
        };
        self.bar.set_message(message);
    }
}

fn operation_label(operation: OperationType) -> &'static str {
    match operation {
        OperationType::SceneDetection => "detecting scenes",
        OperationType::DurationProbe => "probing duration",
        OperationType::IntervalExtraction => "extracting at interval",
        OperationType::Sampling => "sampling frames",
        _ => "working",
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn build_engine(global: &GlobalOptions) -> FfmpegCli {
    let engine = match &global.ffmpeg {
        Some(path) => FfmpegCli::new(path),
        None => FfmpegCli::discover(),
    };
    match &global.ffprobe {
        Some(path) => engine.with_ffprobe(path),
        None => engine,
    }
}

fn extraction_payload(extraction: &Extraction) -> Value {
    let frames = extraction.frames();
    let mut payload = json!({
        "success": true,
        "method": frames.method().name(),
        "frame_count": frames.len(),
        "frames": frames.paths().map(|path| path.display().to_string()).collect::<Vec<_>>(),
    });

    match frames.method() {
        ExtractionMethod::SceneDetection { threshold } => payload["threshold"] = json!(threshold),
        ExtractionMethod::Interval { interval } => payload["interval"] = json!(interval),
    }
    if let Extraction::Replaced {
        scene_frame_count, ..
    } = extraction
    {
        payload["scene_frame_count"] = json!(scene_frame_count);
    }
    payload
}

fn error_payload(category: &str, details: &str) -> Value {
    json!({ "error": category, "details": details })
}

fn print_json(payload: &Value) -> Result<(), FramepickError> {
    let rendered = serde_json::to_string_pretty(payload).map_err(io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

fn run(cli: Cli) -> Result<(), FramepickError> {
    let progress = cli.global.progress.then(|| Arc::new(TerminalProgress::new()));

    match cli.command {
        Commands::Extract {
            video,
            output_dir,
            mode,
            threshold,
        } => {
            let mode: ExtractionMode = mode.parse()?;
            let mut config = ExtractionConfig::new().with_scene_threshold(threshold);
            if let Some(progress) = &progress {
                config = config.with_progress(progress.clone());
            }

            eprintln!(
                "{} {}",
                "extracting".cyan().bold(),
                format!("frames from {} ({mode})", video.display())
            );
            let extractor = FrameExtractor::with_config(build_engine(&cli.global), config);
            let extraction = extractor.extract(&video, &output_dir, mode);
            if let Some(progress) = &progress {
                progress.finish();
            }
            let extraction = extraction?;

            if let Extraction::Replaced {
                scene_frame_count, ..
            } = &extraction
            {
                eprintln!(
                    "{} {}",
                    "fallback:".yellow().bold(),
                    format!(
                        "scene detection produced {scene_frame_count} frames, used interval extraction instead"
                    )
                    .yellow()
                );
            }
            print_json(&extraction_payload(&extraction))?;
        }
        Commands::Analyze {
            frames_dir,
            sample_count,
            include_payload,
        } => {
            let mut config = SamplingConfig::new()
                .with_sample_count(sample_count)
                .with_payload(include_payload);
            if let Some(progress) = &progress {
                config = config.with_progress(progress.clone());
            }

            let result = framepick::sample_frames(&frames_dir, &config);
            if let Some(progress) = &progress {
                progress.finish();
            }
            let result = result?;

            let mut payload = serde_json::to_value(&result).map_err(io::Error::from)?;
            payload["success"] = json!(true);
            payload["note"] = json!(ANALYZE_NOTE);
            print_json(&payload)?;
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "framepick", &mut io::stdout());
        }
    }

    Ok(())
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) if !error.use_stderr() => error.exit(),
        Err(error) => {
            let details = error.to_string();
            eprintln!("{}", error_payload("Invalid arguments", details.trim()));
            std::process::exit(1);
        }
    };
    init_logging(cli.global.verbose);

    if let Err(error) = run(cli) {
        eprintln!("{}", error_payload(error.category(), &error.details()));
        std::process::exit(1);
    }
}
