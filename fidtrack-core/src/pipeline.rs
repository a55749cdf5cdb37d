//! Tracking pipeline: source → table → tools
//!
//! ## Overview
//!
//! [`TrackingPipeline`] is the explicitly-constructed context that
//! replaces any notion of global tracking state. It owns the marker
//! table and the exhibit's tools; the host application calls
//! [`run_cycle`](TrackingPipeline::run_cycle) once per frame loop
//! iteration:
//!
//! ```text
//! ┌────────────┐  drain   ┌───────────┐  apply   ┌───────────┐
//! │ FrameSource │ ───────► │ newest    │ ───────► │ MarkerTable│
//! └────────────┘  (all)   │ frame only│          └─────┬─────┘
//!                         └───────────┘                │ read
//!                                                      ▼
//!                                               ┌─────────────┐
//!                                               │ MarkerTools │
//!                                               └─────────────┘
//! ```
//!
//! Everything in one cycle is strictly sequential: the drain finishes,
//! then the table settles, then every tool reads it. Tools can never
//! observe a half-applied frame.
//!
//! Older frames drained in the same cycle are stale snapshots of the
//! same markers and are discarded unapplied - freshness beats
//! completeness here. A cycle that drains nothing still ticks the
//! table with an empty frame so tracking states decay on schedule.

use crate::config::TrackingConfig;
use crate::errors::ConfigError;
use crate::markers::MarkerTable;
use crate::source::FrameSource;
use crate::time::Timestamp;
use crate::tools::{MarkerTool, ToolReading};

/// Most tools one pipeline can carry
pub const MAX_TOOLS: usize = 16;

/// What one `run_cycle` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleReport {
    /// Frames pulled off the source this cycle
    pub frames_drained: usize,
    /// Stale frames discarded unapplied (all but the newest)
    pub frames_discarded: usize,
    /// Frame number of the applied frame, `None` on an idle tick
    pub frame_number: Option<i32>,
    /// The applied frame carried the wire-level truncation flag
    pub truncated: bool,
    /// Observations folded into the table
    pub observations_applied: usize,
    /// Observations skipped for out-of-range ids
    pub observations_rejected: usize,
    /// The source reported it is permanently done (replay ended)
    pub source_exhausted: bool,
}

/// Lifetime counters across all cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineMetrics {
    /// Cycles run
    pub cycles: u64,
    /// Frames applied to the table
    pub frames_applied: u64,
    /// Stale frames discarded unapplied
    pub frames_discarded: u64,
    /// Truncated frames applied
    pub truncated_frames: u64,
    /// Observations folded into the table
    pub observations_applied: u64,
    /// Observations skipped for out-of-range ids
    pub observations_rejected: u64,
}

/// Owns the table and tools; runs the consumer cycle
pub struct TrackingPipeline {
    table: MarkerTable,
    tools: heapless::Vec<MarkerTool, MAX_TOOLS>,
    readings: heapless::Vec<ToolReading, MAX_TOOLS>,
    metrics: PipelineMetrics,
}

impl TrackingPipeline {
    /// Build a pipeline, rejecting out-of-range configuration
    pub fn new(config: TrackingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            table: MarkerTable::new(config),
            tools: heapless::Vec::new(),
            readings: heapless::Vec::new(),
            metrics: PipelineMetrics::default(),
        })
    }

    /// Add a tool, builder style
    ///
    /// Tools beyond [`MAX_TOOLS`] are dropped with a warning; an
    /// exhibit needing more has outgrown a single pipeline.
    pub fn with_tool(mut self, tool: MarkerTool) -> Self {
        if self.tools.push(tool).is_err() {
            log_warn!("tool limit {} reached, tool dropped", MAX_TOOLS);
        }
        self
    }

    /// The marker table, for direct state reads
    pub fn table(&self) -> &MarkerTable {
        &self.table
    }

    /// Last cycle's tool readings, in the order tools were added
    pub fn readings(&self) -> &[ToolReading] {
        &self.readings
    }

    /// Number of tools carried
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Lifetime counters
    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    /// Drain the source, settle the table, evaluate every tool
    ///
    /// Never blocks: pulls whatever frames have accumulated, applies
    /// only the newest, then reads all tools against the settled
    /// table. With nothing drained the table still ticks so states
    /// decay.
    pub fn run_cycle<S: FrameSource>(&mut self, source: &mut S, now: Timestamp) -> CycleReport {
        let mut newest = None;
        let mut drained = 0usize;
        let mut exhausted = false;

        loop {
            match source.poll_frame() {
                Ok(frame) => {
                    drained += 1;
                    newest = Some(frame);
                }
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(_)) => {
                    exhausted = true;
                    break;
                }
            }
        }

        let (apply, frame_number, truncated) = match &newest {
            Some(frame) => (
                self.table.apply_frame(&frame.observations, now),
                Some(frame.frame_number),
                frame.truncated,
            ),
            None => (self.table.apply_frame(&[], now), None, false),
        };

        self.readings.clear();
        for tool in self.tools.iter_mut() {
            let reading = tool.evaluate(&self.table);
            // Capacity matches the tools vec; push cannot fail
            let _ = self.readings.push(reading);
        }

        let report = CycleReport {
            frames_drained: drained,
            frames_discarded: drained.saturating_sub(1),
            frame_number,
            truncated,
            observations_applied: apply.applied,
            observations_rejected: apply.rejected,
            source_exhausted: exhausted,
        };

        self.metrics.cycles += 1;
        self.metrics.frames_applied += u64::from(frame_number.is_some());
        self.metrics.frames_discarded += report.frames_discarded as u64;
        self.metrics.truncated_frames += u64::from(truncated);
        self.metrics.observations_applied += apply.applied as u64;
        self.metrics.observations_rejected += apply.rejected as u64;

        report
    }
}
