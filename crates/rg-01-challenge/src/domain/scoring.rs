//! Solve-latency quality score.
//!
//! Both too fast and too slow are suspicious; a solve near the ergonomic
//! optimum is the strongest positive signal.

use shared_types::UnitScore;

/// Latency with the best score.
pub const OPTIMAL_SOLVE_SECS: f64 = 20.0;

/// Score for bot-like speed.
pub const TOO_FAST_SCORE: f64 = 0.1;

/// Score for implausibly slow solves.
pub const TOO_SLOW_SCORE: f64 = 0.3;

/// Lowest score inside the plausible band.
pub const IN_BAND_FLOOR: f64 = 0.5;

/// Map a solve latency onto `[0.1, 1.0]`.
///
/// Inside `[min_plausible, max_plausible]` the score decays linearly with the
/// distance from [`OPTIMAL_SOLVE_SECS`]: `max(0.5, 1 - |latency - 20| / 20)`.
pub fn challenge_score(latency_secs: f64, min_plausible: f64, max_plausible: f64) -> UnitScore {
    if !latency_secs.is_finite() || latency_secs < min_plausible {
        return UnitScore::clamped(TOO_FAST_SCORE);
    }
    if latency_secs > max_plausible {
        return UnitScore::clamped(TOO_SLOW_SCORE);
    }
    let distance = (latency_secs - OPTIMAL_SOLVE_SECS).abs();
    UnitScore::clamped((1.0 - distance / OPTIMAL_SOLVE_SECS).max(IN_BAND_FLOOR))
}
