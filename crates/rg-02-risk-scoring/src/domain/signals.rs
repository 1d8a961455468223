//! Trust heuristics. Every function returns a `UnitScore` where higher means
//! more trustworthy.

use shared_types::{AccountId, AccountProfile, UnitScore};

/// The platform offers no view of third-party activity; this slot stays neutral.
pub const ACTIVITY_NEUTRAL_SCORE: UnitScore = UnitScore::NEUTRAL;

/// Identifier upper bounds and the score for each band. Identifiers are
/// handed out monotonically, so small ids belong to old accounts.
const AGE_BANDS: [(AccountId, f64); 4] = [
    (100_000_000, 1.0),
    (500_000_000, 0.8),
    (1_000_000_000, 0.6),
    (5_000_000_000, 0.4),
];
const NEWEST_BAND_SCORE: f64 = 0.2;

const NAME_SPAM_PATTERNS: [&str; 5] = ["test", "user", "123", "bot", "fake"];
const HANDLE_SPAM_PATTERNS: [&str; 5] = ["test", "user", "bot", "fake", "123456"];

/// Coarse account-age proxy.
pub fn account_age_score(account_id: AccountId) -> UnitScore {
    let score = AGE_BANDS
        .iter()
        .find(|(upper, _)| account_id < *upper)
        .map(|(_, score)| *score)
        .unwrap_or(NEWEST_BAND_SCORE);
    UnitScore::clamped(score)
}

/// Registration → subscription delay. Completing the whole funnel faster than
/// a human could is penalised.
pub fn subscribe_timing_score(elapsed_secs: f64) -> UnitScore {
    let score = if elapsed_secs < 60.0 {
        0.2
    } else if elapsed_secs < 300.0 {
        0.4
    } else if elapsed_secs < 3_600.0 {
        0.8
    } else {
        1.0
    };
    UnitScore::clamped(score)
}

fn contains_any(text: &str, patterns: &[&str]) -> bool {
    let lower = text.to_lowercase();
    patterns.iter().any(|p| lower.contains(p))
}

/// Display-name shape: plausible length and no spam substrings.
pub fn name_quality(name: &str) -> f64 {
    if name.is_empty() {
        return 0.0;
    }
    let mut score = 0.5;
    if (2..=30).contains(&name.chars().count()) {
        score += 0.2;
    }
    if !contains_any(name, &NAME_SPAM_PATTERNS) {
        score += 0.3;
    }
    f64::min(1.0, score)
}

/// Handle shape: plausible length, only word characters, no spam substrings.
pub fn handle_quality(handle: &str) -> f64 {
    if handle.is_empty() {
        return 0.0;
    }
    let mut score = 0.5;
    if (5..=32).contains(&handle.chars().count()) {
        score += 0.2;
    }
    let mut word_chars = handle.chars().filter(|c| *c != '_').peekable();
    let clean = word_chars.peek().is_some() && word_chars.all(char::is_alphanumeric);
    if !clean {
        score -= 0.1;
    }
    if !contains_any(handle, &HANDLE_SPAM_PATTERNS) {
        score += 0.3;
    }
    f64::min(1.0, score)
}

/// `0.5 + 0.3·name + 0.2·handle`, capped at 1.
pub fn profile_score(profile: &AccountProfile) -> UnitScore {
    let mut score = 0.5;
    if let Some(name) = profile.display_name.as_deref().filter(|n| !n.is_empty()) {
        score += name_quality(name) * 0.3;
    }
    if let Some(handle) = profile.handle.as_deref().filter(|h| !h.is_empty()) {
        score += handle_quality(handle) * 0.2;
    }
    UnitScore::clamped(score)
}
