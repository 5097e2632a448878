//! Progress reporting.
//!
//! This module provides [`ProgressCallback`] for monitoring extraction and
//! sampling, and [`ProgressInfo`] for progress snapshots.
//!
//! Extraction stages are blocking engine invocations, so they report only
//! their start and completion. Sampling reports once per selected frame.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use framepick::{FramepickError, ProgressCallback, ProgressInfo, SamplingConfig};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("[{:?}] {pct:.1}% complete", info.operation);
//!         }
//!     }
//! }
//!
//! let config = SamplingConfig::new().with_progress(Arc::new(PrintProgress));
//! let result = framepick::sample_frames("frames", &config)?;
//! # Ok::<(), FramepickError>(())
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

/// The kind of operation currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationType {
    /// Running scene-change extraction.
    SceneDetection,
    /// Probing the video duration.
    DurationProbe,
    /// Running fixed-interval extraction.
    IntervalExtraction,
    /// Reading and encoding sampled frames.
    Sampling,
}

/// A snapshot of progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// What kind of work is being performed.
    pub operation: OperationType,
    /// How many items have been processed so far.
    ///
    /// For extraction stages this is `0` at the start and the number of
    /// frames produced at completion.
    pub current: u64,
    /// Total items expected, if known ahead of time.
    pub total: Option<u64>,
    /// Completion percentage (0.0 to 100.0), if `total` is known.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since the operation started.
    pub elapsed: Duration,
}

/// Trait for receiving progress updates.
///
/// Progress callbacks are infallible: they observe but cannot halt the
/// operation.
pub trait ProgressCallback: Send + Sync {
    /// Called when an operation starts, advances, or finishes.
    fn on_progress(&self, info: &ProgressInfo);
}

/// A no-op implementation that discards all progress notifications.
///
/// This is the default when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Internal helper that tracks progress timing and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    operation: OperationType,
    total: Option<u64>,
    current: u64,
    start_time: Instant,
}

impl ProgressTracker {
    /// Create a tracker and immediately report the start of `operation`.
    pub(crate) fn start(
        callback: Arc<dyn ProgressCallback>,
        operation: OperationType,
        total: Option<u64>,
    ) -> Self {
        let tracker = Self {
            callback,
            operation,
            total,
            current: 0,
            start_time: Instant::now(),
        };
        tracker.report();
        tracker
    }

    /// Record one completed item.
    pub(crate) fn advance(&mut self) {
        self.current += 1;
        self.report();
    }

    /// Report completion with the final item count.
    pub(crate) fn finish(mut self, produced: u64) {
        self.current = produced;
        self.report();
    }

    fn report(&self) {
        let percentage = self
            .total
            .filter(|&t| t > 0)
            .map(|t| (self.current as f32 / t as f32) * 100.0);

        let info = ProgressInfo {
            operation: self.operation,
            current: self.current,
            total: self.total,
            percentage,
            elapsed: self.start_time.elapsed(),
        };

        self.callback.on_progress(&info);
    }
}
