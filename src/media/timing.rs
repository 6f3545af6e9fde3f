/// Simulated upload timer for queued files
///
/// The queue shows a spinner per file for a size-derived duration.
/// It does not track the real transfer; see `api::transfer` for that.

use std::time::Duration;

/// Bytes per millisecond assumed by the simulation
const BYTES_PER_MS: f64 = 750.0;
const MIN_MS: f64 = 1000.0;
const MAX_MS: f64 = 4000.0;

/// Duration of the simulated upload: `clamp(size / 750, 1000, 4000)` ms
pub fn simulated_duration(size_bytes: u64) -> Duration {
    let ms = (size_bytes as f64 / BYTES_PER_MS).clamp(MIN_MS, MAX_MS);
    Duration::from_secs_f64(ms / 1000.0)
}
