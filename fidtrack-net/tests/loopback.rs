//! Loopback integration tests for the UDP transport
//!
//! Each test runs the full receive path over a real socket pair:
//! sender -> loopback datagram -> receiver thread -> frame queue ->
//! consumer cycle. Ports are always `127.0.0.1:0` so tests can run
//! in parallel without colliding.
//!
//! UDP gives no delivery guarantee even on loopback, so tests resend
//! their frames inside the polling loop and wait on observable state
//! with a deadline instead of asserting on a single datagram.

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use fidtrack_core::queue::QueuePolicy;
use fidtrack_core::time::{MonotonicClock, TimeSource};
use fidtrack_core::tools::{MarkerTool, Toggle, ToolValue};
use fidtrack_core::{RawMarkerObservation, TrackingConfig, TrackingPipeline};
use fidtrack_net::{UdpFrameSender, UdpMarkerReceiver};

const DEADLINE: Duration = Duration::from_secs(5);
const POLL_SLEEP: Duration = Duration::from_millis(5);

fn observation(id: i32, x: f32, y: f32, angle: f32) -> RawMarkerObservation {
    RawMarkerObservation {
        id,
        x,
        y,
        angle,
        size: 0.05,
    }
}

#[test]
fn frames_flow_from_socket_to_pipeline() {
    let receiver =
        UdpMarkerReceiver::bind("127.0.0.1:0", QueuePolicy::Overwrite).expect("bind receiver");
    let mut sender = UdpFrameSender::connect(receiver.local_addr()).expect("connect sender");

    let mut pipeline = TrackingPipeline::new(TrackingConfig::default())
        .expect("config")
        .with_tool(MarkerTool::Toggle(Toggle::new(3, "open", 4, "closed")));

    let clock = MonotonicClock::new();
    let started = Instant::now();
    let mut seen = false;

    while started.elapsed() < DEADLINE {
        sender
            .send(&[observation(3, 0.25, 0.75, 90.0)])
            .expect("send frame");
        std::thread::sleep(POLL_SLEEP);

        let mut source = receiver.source();
        pipeline.run_cycle(&mut source, clock.now());

        if pipeline.table().is_visible(3) {
            seen = true;
            break;
        }
    }
    assert!(seen, "marker 3 never became visible within the deadline");

    let marker = pipeline.table().get(3).expect("marker in range");
    assert!((marker.x - 0.25).abs() < 1e-6);
    assert!((marker.y - 0.75).abs() < 1e-6);
    assert!((marker.angle - 90.0).abs() < 1e-6);

    // The toggle saw side A only
    let reading = &pipeline.readings()[0];
    assert!(reading.is_tracked);
    assert_eq!(reading.value, ToolValue::Label("open"));

    let stats = receiver.stats();
    assert!(stats.datagrams_received.load(Ordering::Relaxed) >= 1);
    assert!(stats.frames_decoded.load(Ordering::Relaxed) >= 1);
    assert_eq!(stats.decode_errors.load(Ordering::Relaxed), 0);
    assert!((stats.success_rate() - 1.0).abs() < 1e-9);

    receiver.stop();
}

#[test]
fn malformed_datagrams_are_counted_not_fatal() {
    let receiver =
        UdpMarkerReceiver::bind("127.0.0.1:0", QueuePolicy::Overwrite).expect("bind receiver");
    let mut sender = UdpFrameSender::connect(receiver.local_addr()).expect("connect sender");

    // Too short for a header; the decoder must reject it
    let started = Instant::now();
    while started.elapsed() < DEADLINE
        && receiver.stats().decode_errors.load(Ordering::Relaxed) == 0
    {
        sender.send_raw(&[0xde, 0xad, 0xbe]).expect("send garbage");
        std::thread::sleep(POLL_SLEEP);
    }
    assert!(
        receiver.stats().decode_errors.load(Ordering::Relaxed) >= 1,
        "malformed datagram was never rejected"
    );
    assert!(receiver.is_running(), "receiver thread died on bad input");

    // The loop keeps decoding well-formed frames afterwards
    let started = Instant::now();
    while started.elapsed() < DEADLINE
        && receiver.stats().frames_decoded.load(Ordering::Relaxed) == 0
    {
        sender
            .send(&[observation(0, 0.5, 0.5, 0.0)])
            .expect("send frame");
        std::thread::sleep(POLL_SLEEP);
    }
    assert!(receiver.stats().frames_decoded.load(Ordering::Relaxed) >= 1);
    assert!(receiver.stats().success_rate() < 1.0);

    receiver.stop();
}

#[test]
fn append_policy_hands_frames_over_in_order() {
    let receiver =
        UdpMarkerReceiver::bind("127.0.0.1:0", QueuePolicy::Append).expect("bind receiver");
    let mut sender = UdpFrameSender::connect(receiver.local_addr()).expect("connect sender");

    for _ in 0..3 {
        sender.send(&[observation(1, 0.1, 0.2, 0.0)]).expect("send");
    }

    let started = Instant::now();
    while started.elapsed() < DEADLINE
        && receiver.stats().frames_decoded.load(Ordering::Relaxed) < 3
    {
        std::thread::sleep(POLL_SLEEP);
    }
    assert_eq!(
        receiver.stats().frames_decoded.load(Ordering::Relaxed),
        3,
        "expected all three frames on loopback"
    );

    let numbers: Vec<i32> = receiver.queue().drain().map(|f| f.frame_number).collect();
    assert_eq!(numbers, vec![0, 1, 2]);

    receiver.stop();
}
