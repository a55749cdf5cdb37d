//! UDP Loopback Example
//!
//! This example runs both halves of a deployment in one process: a
//! simulated camera server sending marker frames over UDP, and the
//! tracking side receiving them and reading a slider.
//!
//! The knob marker sweeps back and forth along the track, so the
//! slider value oscillates between 0 and 1.
//!
//! ## Running the Example
//!
//! ```bash
//! RUST_LOG=debug cargo run --example udp_loopback
//! ```

use std::thread;
use std::time::Duration;

use fidtrack_core::queue::QueuePolicy;
use fidtrack_core::time::{MonotonicClock, TimeSource};
use fidtrack_core::tools::{MarkerTool, Slider};
use fidtrack_core::{RawMarkerObservation, TrackingConfig, TrackingPipeline};
use fidtrack_net::{UdpFrameSender, UdpMarkerReceiver};

fn obs(id: i32, x: f32, y: f32, angle: f32) -> RawMarkerObservation {
    RawMarkerObservation { id, x, y, angle, size: 0.03 }
}

fn main() -> Result<(), fidtrack_net::TransportError> {
    env_logger::init();

    println!("Fidtrack UDP Loopback Example");
    println!("=============================\n");

    let receiver = UdpMarkerReceiver::bind("127.0.0.1:0", QueuePolicy::Overwrite)?;
    println!("Receiver bound on {}", receiver.local_addr());

    let mut sender = UdpFrameSender::connect(receiver.local_addr())?;

    // Live tangibles move fast; take the light-filtering preset
    let mut pipeline = TrackingPipeline::new(TrackingConfig::responsive())
        .expect("preset config is valid")
        .with_tool(MarkerTool::Slider(Slider::new(0, 1, 2)));
    println!("Pipeline carries {} tool(s)", pipeline.tool_count());

    let clock = MonotonicClock::new();

    // ~1.5 seconds of 60Hz frames: the knob sweeps the track twice
    println!("\nSlider readings:");
    for tick in 0..90u32 {
        let sweep = (tick % 45) as f32 / 44.0;
        let knob_x = 0.1 + 0.8 * sweep;
        sender.send(&[
            obs(0, 0.1, 0.5, 0.0),
            obs(1, 0.9, 0.5, 0.0),
            obs(2, knob_x, 0.5, 0.0),
        ])?;

        thread::sleep(Duration::from_millis(16));

        let mut source = receiver.source();
        pipeline.run_cycle(&mut source, clock.now());

        if tick % 15 == 14 {
            let reading = &pipeline.readings()[0];
            println!(
                "  t={:5}ms slider={:8} tracked={}",
                clock.now(),
                format!("{}", reading.value),
                reading.is_tracked
            );
        }
    }

    let stats = receiver.stats();
    println!("\nReceiver stats:");
    println!(
        "  datagrams: {}  decoded: {}  errors: {}  dropped: {}",
        stats.datagrams_received.load(std::sync::atomic::Ordering::Relaxed),
        stats.frames_decoded.load(std::sync::atomic::Ordering::Relaxed),
        stats.decode_errors.load(std::sync::atomic::Ordering::Relaxed),
        stats.frames_dropped.load(std::sync::atomic::Ordering::Relaxed),
    );

    receiver.stop();
    println!("Receiver stopped cleanly");
    Ok(())
}
