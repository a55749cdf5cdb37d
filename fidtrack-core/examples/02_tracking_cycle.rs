//! Tracking Cycle Example
//!
//! This example drives the consumer cycle by hand, one simulated
//! 60Hz tick at a time, and shows how marker state evolves:
//! - Fresh observations mark a marker Tracked
//! - A missing marker coasts as Inferred until the timeout
//! - After the timeout it decays to NotTracked
//! - Positions converge through the temporal filter
//!
//! A real deployment runs the producer side on a receiver thread;
//! here we push frames into the queue ourselves so the timing is
//! deterministic.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_tracking_cycle
//! ```

use fidtrack_core::queue::{FrameQueue, QueuePolicy};
use fidtrack_core::source::QueueSource;
use fidtrack_core::time::{ManualClock, TimeSource};
use fidtrack_core::wire::MarkerFrame;
use fidtrack_core::{RawMarkerObservation, TrackingConfig, TrackingPipeline};

fn frame(number: i32, x: f32) -> MarkerFrame {
    let mut frame = MarkerFrame::empty(number);
    let pushed = frame.observations.push(RawMarkerObservation {
        id: 2,
        x,
        y: 0.5,
        angle: 0.0,
        size: 0.05,
    });
    assert!(pushed.is_ok());
    frame
}

fn main() {
    println!("Fidtrack Tracking Cycle Example");
    println!("===============================\n");

    let mut pipeline =
        TrackingPipeline::new(TrackingConfig::default()).expect("valid config");

    // The table reports the configuration it actually runs with
    let config = pipeline.table().config();
    println!(
        "Config: timeout {}ms, position filter {}, rotation filter {}\n",
        config.tracking_timeout_ms, config.position_filter, config.rotation_filter
    );
    let queue = FrameQueue::<16>::new(QueuePolicy::Overwrite);
    let mut clock = ManualClock::new(0);

    // Marker 2 walks right for five frames, then the camera loses it
    println!("While frames arrive:");
    for tick in 0..5 {
        queue.push(frame(tick, 0.1 + 0.1 * tick as f32));

        let mut source = QueueSource::new(&queue);
        let report = pipeline.run_cycle(&mut source, clock.now());

        let marker = pipeline.table().get(2).expect("id 2 in range");
        println!(
            "  t={:4}ms frame {:?}: x={:.3} (raw {:.2}) {:?}",
            clock.now(),
            report.frame_number,
            marker.x,
            marker.raw_x,
            marker.tracking
        );
        clock.advance(16);
    }

    // No more pushes: the queue stays empty, the cycle keeps ticking
    println!("\nAfter the camera loses the marker:");
    for _ in 0..20 {
        let mut source = QueueSource::new(&queue);
        let report = pipeline.run_cycle(&mut source, clock.now());
        assert_eq!(report.frames_drained, 0);

        let marker = pipeline.table().get(2).expect("id 2 in range");
        if clock.now() % 80 == 0 {
            println!(
                "  t={:4}ms: x={:.3} {:?}",
                clock.now(),
                marker.x,
                marker.tracking
            );
        }
        clock.advance(16);
    }

    let metrics = pipeline.metrics();
    println!("\nPipeline metrics:");
    println!("  cycles run            : {}", metrics.cycles);
    println!("  frames applied        : {}", metrics.frames_applied);
    println!("  observations applied  : {}", metrics.observations_applied);
    println!("  observations rejected : {}", metrics.observations_rejected);
}
