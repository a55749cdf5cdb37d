//! UDP Transport for Fidtrack Marker Frames
//!
//! ## Overview
//!
//! The vision server broadcasts one datagram per camera frame; this
//! crate owns the socket side of that conversation so `fidtrack-core`
//! never has to touch I/O. Two pieces:
//!
//! - [`UdpMarkerReceiver`]: binds a socket, runs a background thread
//!   that decodes datagrams and feeds the core's lock-free frame
//!   queue, and hands the consumer cycle a
//!   [`FrameSource`](fidtrack_core::source::FrameSource).
//! - [`UdpFrameSender`]: encodes and sends frames, for simulators,
//!   integration tests, and replay rigs standing in for the real
//!   camera server.
//!
//! ## Why UDP
//!
//! Marker frames are idempotent snapshots at camera rate. A lost
//! frame is obsolete before any retransmit could land, so TCP's
//! ordering and retry machinery would only add latency; the tracking
//! core already rides out gaps with its occlusion inference.
//!
//! ## Threading model
//!
//! ```text
//! socket thread                      host frame loop
//!   recv_from ──decode──► FrameQueue ──poll──► TrackingPipeline
//!   (blocks ≤ poll        (lock-free)          (never blocks)
//!    timeout, rechecks
//!    the running flag)
//! ```
//!
//! A blocked `recv_from` cannot be interrupted by a flag alone, so
//! the socket runs with a short read timeout and the thread rechecks
//! its running flag between receives; [`UdpMarkerReceiver::stop`]
//! therefore returns within one timeout tick.
//!
//! ## Example
//!
//! ```no_run
//! use fidtrack_core::{TrackingConfig, TrackingPipeline};
//! use fidtrack_core::queue::QueuePolicy;
//! use fidtrack_core::time::{MonotonicClock, TimeSource};
//! use fidtrack_net::UdpMarkerReceiver;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let receiver = UdpMarkerReceiver::bind("0.0.0.0:21000", QueuePolicy::Overwrite)?;
//! let mut pipeline = TrackingPipeline::new(TrackingConfig::default())?;
//! let clock = MonotonicClock::new();
//!
//! loop {
//!     let mut source = receiver.source();
//!     let report = pipeline.run_cycle(&mut source, clock.now());
//!     // render from pipeline.table() / pipeline.readings()
//!     # if report.frames_drained > 0 { break; }
//! }
//!
//! receiver.stop();
//! # Ok(())
//! # }
//! ```

pub mod udp;

pub use udp::{ReceiverStats, UdpFrameSender, UdpMarkerReceiver};

use thiserror::Error;

/// Transport-level failures
///
/// Everything here surfaces at setup or send time; the receive loop
/// itself never dies on a bad datagram, it counts and carries on.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Socket operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame could not be encoded for sending
    #[error("Encode error: {0}")]
    Encode(#[from] fidtrack_core::TrackingError),
}
