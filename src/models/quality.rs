//! Maps correctness and response latency to the SM-2 quality grade.
//!
//! Speed is judged against an expected pace rather than absolute milliseconds, so
//! slow exercise types are not penalised next to quick ones.

pub const DEFAULT_AVERAGE_TIME_MS: u64 = 5000;
pub const MIN_RESPONSE_TIME_MS: u64 = 500;
pub const MAX_RESPONSE_TIME_MS: u64 = 60_000;

/// Clamps a raw response time into the accepted window.
/// Instant submissions and abandoned tabs would otherwise dominate the ratio.
pub fn clamp_response_time(response_time_ms: u64) -> u64 {
    let clamped = response_time_ms.clamp(MIN_RESPONSE_TIME_MS, MAX_RESPONSE_TIME_MS);
    if clamped != response_time_ms {
        log::warn!(
            "response time {}ms clamped to {}ms",
            response_time_ms,
            clamped
        );
    }
    clamped
}

/// Quality grade 1-5. Incorrect answers always grade 1.
pub fn quality(is_correct: bool, response_time_ms: u64, average_time_ms: u64) -> u8 {
    if !is_correct {
        return 1;
    }

    let ratio = clamp_response_time(response_time_ms) as f64 / average_time_ms as f64;
    if ratio <= 0.4 {
        5
    } else if ratio <= 0.8 {
        4
    } else {
        3
    }
}
