//! Deterministic fallback classification.
//!
//! When no provider is configured or every provider fails, the (location,
//! scene) pair is synthesized from the file name alone: a stable hash of a
//! normalized name token indexes two fixed enumerations. Same file name,
//! same result — reproducible without any network.

use crate::types::AnalysisResult;

const FALLBACK_LOCATIONS: &[&str] = &[
    "Strand",
    "Restaurant",
    "Park",
    "Wald",
    "Buergersteig",
    "Innenraum",
    "Gebaeude",
    "Auto",
    "Schild",
];

const FALLBACK_SCENES: &[&str] = &[
    "sonnig",
    "bewoelkt",
    "dunkel",
    "hell",
    "gemuetlich",
    "modern",
    "Nacht",
    "standard",
];

/// Stable 32-bit string hash (`h*31 + c` per character, absolute value).
fn stable_hash(s: &str) -> u32 {
    let mut hash: i32 = 0;
    for ch in s.chars() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(ch as i32);
    }
    hash.unsigned_abs()
}

/// Base-name token for hashing: extension stripped, non-alphanumerics
/// removed, truncated to 20 characters.
fn name_token(file_name: &str) -> String {
    let base = file_name.split('.').next().unwrap_or_default();
    base.chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .take(20)
        .collect()
}

/// Synthesize the fallback classification for `file_name`.
pub fn deterministic(file_name: &str) -> AnalysisResult {
    let token = name_token(file_name);
    if token.is_empty() {
        return AnalysisResult::new("Unbekannt", "standard");
    }
    let hash = stable_hash(&token) as usize;
    AnalysisResult::new(
        FALLBACK_LOCATIONS[hash % FALLBACK_LOCATIONS.len()],
        FALLBACK_SCENES[hash % FALLBACK_SCENES.len()],
    )
}
