//! Frame sources for the consumer cycle
//!
//! The cycle pulls decoded frames through [`FrameSource`] without
//! caring where they come from: a live receiver thread feeding a
//! [`FrameQueue`], or a recorded slice replayed in tests. Pull-based
//! `nb::Result` keeps the model non-blocking with no async runtime,
//! which matters inside a host frame loop.
//!
//! ```rust
//! use fidtrack_core::source::{FrameSource, ReplaySource};
//! use fidtrack_core::wire::MarkerFrame;
//!
//! let recorded = [MarkerFrame::empty(1), MarkerFrame::empty(2)];
//! let mut source = ReplaySource::new(&recorded);
//!
//! // Drain everything available right now; keep only the newest
//! let mut newest = None;
//! while let Ok(frame) = source.poll_frame() {
//!     newest = Some(frame);
//! }
//! assert_eq!(newest.map(|f| f.frame_number), Some(2));
//! ```

use thiserror_no_std::Error;

use crate::queue::FrameQueue;
use crate::wire::MarkerFrame;

/// Errors a frame source can report
///
/// Live sources never end; they report `WouldBlock` through `nb`
/// instead. Only finite sources (replay) produce an error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceError {
    /// A finite source has no more frames
    #[error("Source exhausted")]
    Exhausted,
}

#[cfg(feature = "defmt")]
impl defmt::Format for SourceError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Exhausted => defmt::write!(fmt, "Source exhausted"),
        }
    }
}

/// Pull-based supplier of decoded frames
///
/// Returns:
/// - `Ok(frame)` - a frame was waiting
/// - `Err(nb::Error::WouldBlock)` - nothing right now, try next cycle
/// - `Err(nb::Error::Other(e))` - the source is done for good
///
/// Implementations must not block; the consumer cycle calls this from
/// the host application's frame loop.
pub trait FrameSource {
    /// Attempt to pull the next frame
    fn poll_frame(&mut self) -> nb::Result<MarkerFrame, SourceError>;

    /// Bounds on remaining frames, `(0, None)` when unknown
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

/// Live source reading from a receiver-fed queue
///
/// The receiver thread pushes into the [`FrameQueue`]; each
/// `poll_frame` pops one frame. An empty queue is `WouldBlock`,
/// never an error - more datagrams are presumably on the way.
pub struct QueueSource<'a, const N: usize> {
    queue: &'a FrameQueue<N>,
}

impl<'a, const N: usize> QueueSource<'a, N> {
    /// Wrap a shared queue as a frame source
    pub fn new(queue: &'a FrameQueue<N>) -> Self {
        Self { queue }
    }
}

impl<'a, const N: usize> FrameSource for QueueSource<'a, N> {
    fn poll_frame(&mut self) -> nb::Result<MarkerFrame, SourceError> {
        match self.queue.pop() {
            Some(frame) => Ok(frame),
            None => Err(nb::Error::WouldBlock),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let queued = self.queue.len();
        (queued, Some(queued))
    }
}

/// Finite source replaying recorded frames
///
/// For unit tests and offline captures: feeds a fixed slice in order,
/// then reports [`SourceError::Exhausted`].
pub struct ReplaySource<'a> {
    frames: &'a [MarkerFrame],
    position: usize,
}

impl<'a> ReplaySource<'a> {
    /// Create a replay over a recorded slice
    pub fn new(frames: &'a [MarkerFrame]) -> Self {
        Self { frames, position: 0 }
    }

    /// Rewind to the first frame
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Frames already replayed
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether every frame has been replayed
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.frames.len()
    }
}

impl<'a> FrameSource for ReplaySource<'a> {
    fn poll_frame(&mut self) -> nb::Result<MarkerFrame, SourceError> {
        if self.position >= self.frames.len() {
            return Err(nb::Error::Other(SourceError::Exhausted));
        }

        let frame = self.frames[self.position].clone();
        self.position += 1;
        Ok(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.frames.len() - self.position;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::QueuePolicy;

    #[test]
    fn replay_in_order_then_exhausted() {
        let frames = [MarkerFrame::empty(10), MarkerFrame::empty(11)];
        let mut source = ReplaySource::new(&frames);

        assert_eq!(source.size_hint(), (2, Some(2)));
        assert_eq!(source.poll_frame().unwrap().frame_number, 10);
        assert_eq!(source.poll_frame().unwrap().frame_number, 11);
        assert!(source.is_exhausted());

        match source.poll_frame() {
            Err(nb::Error::Other(SourceError::Exhausted)) => {}
            other => panic!("expected Exhausted, got {:?}", other),
        }
    }

    #[test]
    fn replay_reset_rewinds() {
        let frames = [MarkerFrame::empty(1)];
        let mut source = ReplaySource::new(&frames);

        source.poll_frame().unwrap();
        assert!(source.is_exhausted());

        source.reset();
        assert_eq!(source.position(), 0);
        assert_eq!(source.poll_frame().unwrap().frame_number, 1);
    }

    #[test]
    fn queue_source_reports_would_block() {
        let queue = FrameQueue::<8>::new(QueuePolicy::Append);
        let mut source = QueueSource::new(&queue);

        assert!(matches!(source.poll_frame(), Err(nb::Error::WouldBlock)));

        queue.push(MarkerFrame::empty(5));
        assert_eq!(source.size_hint(), (1, Some(1)));
        assert_eq!(source.poll_frame().unwrap().frame_number, 5);
        assert!(matches!(source.poll_frame(), Err(nb::Error::WouldBlock)));
    }
}
