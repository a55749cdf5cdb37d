//! Basic Frame Decoding Example
//!
//! This example demonstrates the wire format fidtrack speaks:
//! decoding marker frames from raw bytes, and how the decoder treats
//! damaged input.
//!
//! ## What You'll Learn
//!
//! - The frame layout (header + fixed-size marker records)
//! - Encoding observations into a stack buffer
//! - Strict rejection of malformed frames
//! - Tolerant truncation when the declared count disagrees
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_decode_frame
//! ```

use fidtrack_core::wire::{self, RawMarkerObservation, HEADER_LEN, RECORD_LEN};

fn main() {
    println!("Fidtrack Frame Decoding Example");
    println!("===============================\n");

    // Three markers as the camera server would report them
    let observations = [
        RawMarkerObservation { id: 0, x: 0.25, y: 0.75, angle: 0.0, size: 0.05 },
        RawMarkerObservation { id: 1, x: 0.50, y: 0.50, angle: 90.0, size: 0.05 },
        RawMarkerObservation { id: 7, x: 0.80, y: 0.10, angle: 315.0, size: 0.04 },
    ];

    let mut buf = [0u8; wire::encoded_len(8)];
    let len = wire::encode_frame(42, &observations, &mut buf)
        .expect("buffer sized for up to 8 markers");

    println!("Encoded frame 42 with {} markers into {} bytes", observations.len(), len);
    println!("  header: {} bytes, each record: {} bytes\n", HEADER_LEN, RECORD_LEN);

    // 1. A clean decode
    println!("1. Decoding the full payload:");
    let frame = wire::decode_frame(&buf[..len]).expect("well-formed frame");
    println!("   frame number : {}", frame.frame_number);
    println!("   truncated    : {}", frame.truncated);
    for obs in &frame.observations {
        println!(
            "   marker {:2} at ({:.2}, {:.2}) angle {:5.1}° size {:.2}",
            obs.id, obs.x, obs.y, obs.angle, obs.size
        );
    }

    // 2. Garbage too short for a header
    println!("\n2. Decoding a 5-byte fragment:");
    match wire::decode_frame(&buf[..5]) {
        Ok(_) => println!("   unexpectedly accepted"),
        Err(e) => println!("   rejected: {}", e),
    }

    // 3. A frame cut mid-record
    println!("\n3. Decoding a frame cut mid-record:");
    match wire::decode_frame(&buf[..HEADER_LEN + RECORD_LEN + 7]) {
        Ok(_) => println!("   unexpectedly accepted"),
        Err(e) => println!("   rejected: {}", e),
    }

    // 4. Declared count of 3, but only 2 whole records survived
    println!("\n4. Decoding with a missing final record:");
    let short = &buf[..HEADER_LEN + 2 * RECORD_LEN];
    let frame = wire::decode_frame(short).expect("record boundary is intact");
    println!(
        "   decoded {} of 3 declared markers, truncated = {}",
        frame.observations.len(),
        frame.truncated
    );

    println!("\n{}", "=".repeat(60));
    println!("Key Insights:");
    println!("- Frames cut mid-record are dropped whole; no partial marker ever");
    println!("  reaches the tracking table");
    println!("- Frames cut on a record boundary keep their intact markers and");
    println!("  carry a truncation flag for diagnostics");
}
