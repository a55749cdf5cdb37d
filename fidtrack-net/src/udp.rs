//! UDP receiver thread and frame sender
//!
//! The receiver owns its socket and thread outright: bind, spawn,
//! decode, push. The consumer side never sees bytes, only decoded
//! frames pulled through the core's queue. Datagrams that fail to
//! decode are counted and dropped; the loop never dies on bad input.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use fidtrack_core::queue::{FrameQueue, QueuePolicy, FRAME_QUEUE_CAPACITY};
use fidtrack_core::source::QueueSource;
use fidtrack_core::wire::{self, RawMarkerObservation};

use crate::TransportError;

/// How long a blocked receive waits before rechecking the running flag
const READ_TIMEOUT: Duration = Duration::from_millis(50);

/// Receive buffer size; comfortably above the largest legal frame
const DATAGRAM_BUF_LEN: usize = 2048;

/// Counters maintained by the receiver thread
///
/// All Relaxed atomics: read them for dashboards and tests, not for
/// synchronization.
#[derive(Debug, Default)]
pub struct ReceiverStats {
    /// Datagrams received from the socket
    pub datagrams_received: AtomicU64,
    /// Total payload bytes received
    pub bytes_received: AtomicU64,
    /// Datagrams that decoded into a frame
    pub frames_decoded: AtomicU64,
    /// Datagrams rejected as malformed
    pub decode_errors: AtomicU64,
    /// Decoded frames carrying the truncation flag
    pub truncated_frames: AtomicU64,
    /// Frames the queue refused (Append policy, queue full)
    pub frames_dropped: AtomicU64,
    /// Unexpected socket errors (timeouts are not counted)
    pub io_errors: AtomicU64,
}

impl ReceiverStats {
    /// Fraction of received datagrams that decoded cleanly
    ///
    /// Reads 1.0 before any datagram has arrived.
    pub fn success_rate(&self) -> f64 {
        let received = self.datagrams_received.load(Ordering::Relaxed);
        if received == 0 {
            return 1.0;
        }
        self.frames_decoded.load(Ordering::Relaxed) as f64 / received as f64
    }

    /// Zero every counter
    pub fn reset(&self) {
        self.datagrams_received.store(0, Ordering::Relaxed);
        self.bytes_received.store(0, Ordering::Relaxed);
        self.frames_decoded.store(0, Ordering::Relaxed);
        self.decode_errors.store(0, Ordering::Relaxed);
        self.truncated_frames.store(0, Ordering::Relaxed);
        self.frames_dropped.store(0, Ordering::Relaxed);
        self.io_errors.store(0, Ordering::Relaxed);
    }
}

/// Background UDP receiver feeding the core's frame queue
///
/// Created with [`bind`](UdpMarkerReceiver::bind), which spawns the
/// receiver thread immediately. The consumer cycle reads through
/// [`source`](UdpMarkerReceiver::source). Dropping the receiver stops
/// the thread; [`stop`](UdpMarkerReceiver::stop) does the same but
/// joins explicitly.
pub struct UdpMarkerReceiver {
    queue: Arc<FrameQueue<FRAME_QUEUE_CAPACITY>>,
    stats: Arc<ReceiverStats>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    local_addr: SocketAddr,
}

impl UdpMarkerReceiver {
    /// Bind `addr` and start receiving
    ///
    /// `policy` picks the hand-off behavior: `Overwrite` for live
    /// tracking (newest frame wins), `Append` for capture tools.
    pub fn bind<A: ToSocketAddrs>(addr: A, policy: QueuePolicy) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_read_timeout(Some(READ_TIMEOUT))?;
        let local_addr = socket.local_addr()?;

        let queue = Arc::new(FrameQueue::new(policy));
        let stats = Arc::new(ReceiverStats::default());
        let running = Arc::new(AtomicBool::new(true));

        let thread_queue = Arc::clone(&queue);
        let thread_stats = Arc::clone(&stats);
        let thread_running = Arc::clone(&running);
        let handle = thread::Builder::new()
            .name("fidtrack-udp".into())
            .spawn(move || receive_loop(socket, thread_queue, thread_stats, thread_running))?;

        log::info!(
            "marker receiver listening on {} ({:?} hand-off)",
            local_addr,
            queue.policy()
        );

        Ok(Self {
            queue,
            stats,
            running,
            handle: Some(handle),
            local_addr,
        })
    }

    /// Address the socket actually bound (resolves `:0` ports)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Frame source for the consumer cycle
    pub fn source(&self) -> QueueSource<'_, FRAME_QUEUE_CAPACITY> {
        QueueSource::new(&self.queue)
    }

    /// Shared handle to the frame queue
    pub fn queue(&self) -> Arc<FrameQueue<FRAME_QUEUE_CAPACITY>> {
        Arc::clone(&self.queue)
    }

    /// Receive counters
    pub fn stats(&self) -> &ReceiverStats {
        &self.stats
    }

    /// Whether the receiver thread is still running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Stop the receiver thread and wait for it to exit
    ///
    /// Returns within roughly one read-timeout tick.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("marker receiver thread panicked");
            }
        }
    }
}

impl Drop for UdpMarkerReceiver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn receive_loop(
    socket: UdpSocket,
    queue: Arc<FrameQueue<FRAME_QUEUE_CAPACITY>>,
    stats: Arc<ReceiverStats>,
    running: Arc<AtomicBool>,
) {
    let mut buf = [0u8; DATAGRAM_BUF_LEN];

    while running.load(Ordering::Relaxed) {
        let (len, peer) = match socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                // Read timeout tick; loop around and recheck the flag
                continue;
            }
            Err(e) => {
                stats.io_errors.fetch_add(1, Ordering::Relaxed);
                log::warn!("receive failed: {}", e);
                // Brief backoff so a persistent error cannot spin hot
                thread::sleep(Duration::from_millis(10));
                continue;
            }
        };

        stats.datagrams_received.fetch_add(1, Ordering::Relaxed);
        stats.bytes_received.fetch_add(len as u64, Ordering::Relaxed);

        match wire::decode_frame(&buf[..len]) {
            Ok(frame) => {
                stats.frames_decoded.fetch_add(1, Ordering::Relaxed);
                if frame.truncated {
                    stats.truncated_frames.fetch_add(1, Ordering::Relaxed);
                }
                if !queue.push(frame) {
                    stats.frames_dropped.fetch_add(1, Ordering::Relaxed);
                }
            }
            Err(e) => {
                stats.decode_errors.fetch_add(1, Ordering::Relaxed);
                log::warn!("bad datagram from {} ({} bytes): {}", peer, len, e);
            }
        }
    }

    log::debug!("marker receiver stopped");
}

/// Frame sender for simulators and tests
///
/// Stands in for the camera server: encodes observations into the
/// wire format and sends them to a fixed target. Frame numbers
/// increment automatically.
pub struct UdpFrameSender {
    socket: UdpSocket,
    target: SocketAddr,
    buf: [u8; DATAGRAM_BUF_LEN],
    next_frame: i32,
}

impl UdpFrameSender {
    /// Sender targeting `target` from an ephemeral local port
    pub fn connect<A: ToSocketAddrs>(target: A) -> Result<Self, TransportError> {
        let target = target
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "target resolved to no address",
            ))?;
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        Ok(Self {
            socket,
            target,
            buf: [0u8; DATAGRAM_BUF_LEN],
            next_frame: 0,
        })
    }

    /// Encode and send one frame, returning its frame number
    pub fn send(&mut self, observations: &[RawMarkerObservation]) -> Result<i32, TransportError> {
        let frame_number = self.next_frame;
        self.send_numbered(frame_number, observations)?;
        self.next_frame = self.next_frame.wrapping_add(1);
        Ok(frame_number)
    }

    /// Encode and send one frame with an explicit frame number
    pub fn send_numbered(
        &mut self,
        frame_number: i32,
        observations: &[RawMarkerObservation],
    ) -> Result<(), TransportError> {
        let len = wire::encode_frame(frame_number, observations, &mut self.buf)?;
        self.socket.send_to(&self.buf[..len], self.target)?;
        Ok(())
    }

    /// Send raw bytes as-is, for exercising decoder error paths
    pub fn send_raw(&self, payload: &[u8]) -> Result<(), TransportError> {
        self.socket.send_to(payload, self.target)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_success_rate() {
        let stats = ReceiverStats::default();
        assert_eq!(stats.success_rate(), 1.0);

        stats.datagrams_received.store(10, Ordering::Relaxed);
        stats.frames_decoded.store(9, Ordering::Relaxed);
        assert!((stats.success_rate() - 0.9).abs() < 1e-9);

        stats.reset();
        assert_eq!(stats.datagrams_received.load(Ordering::Relaxed), 0);
        assert_eq!(stats.success_rate(), 1.0);
    }

    #[test]
    fn bind_and_stop_joins_quickly() {
        let receiver =
            UdpMarkerReceiver::bind("127.0.0.1:0", QueuePolicy::Overwrite).expect("bind");
        assert!(receiver.is_running());
        assert_ne!(receiver.local_addr().port(), 0);

        let started = std::time::Instant::now();
        receiver.stop();
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
