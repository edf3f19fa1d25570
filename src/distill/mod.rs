//! Transcript distillation: tutorial step extraction and prefix overviews.

use regex::Regex;
use std::sync::OnceLock;

use crate::transcript::TranscriptFragment;

/// Character budget for an overview before it is cut
pub const OVERVIEW_MAX_CHARS: usize = 500;

/// Marker appended to a truncated overview
pub const TRUNCATION_MARKER: &str = "...";

/// Overview used when no transcript could be obtained
pub const NO_TRANSCRIPT_PLACEHOLDER: &str = "No transcript available.";

fn step_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Anchored on both branches, no leading whitespace allowed
    PATTERN.get_or_init(|| Regex::new(r"^(?:\d+\.|\*)").expect("step pattern is valid"))
}

/// Whether a caption line reads like a numbered or bulleted step
pub fn looks_like_step(text: &str) -> bool {
    step_pattern().is_match(text)
}

/// Keep the fragments that look like steps, verbatim and in order
pub fn extract_steps(fragments: &[TranscriptFragment]) -> Vec<String> {
    fragments
        .iter()
        .filter(|fragment| looks_like_step(&fragment.text))
        .map(|fragment| fragment.text.clone())
        .collect()
}

/// Join fragment texts with single spaces and keep the first 500 characters.
///
/// The cut is by character, not word, so it may land mid-word.
pub fn summarize(fragments: &[TranscriptFragment]) -> String {
    let joined = fragments
        .iter()
        .map(|fragment| fragment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    match joined.char_indices().nth(OVERVIEW_MAX_CHARS) {
        Some((cut, _)) => format!("{}{}", &joined[..cut], TRUNCATION_MARKER),
        None => joined,
    }
}

/// Overview for a record, or the placeholder when the transcript fetch failed
pub fn overview(transcript: Option<&[TranscriptFragment]>) -> String {
    match transcript {
        Some(fragments) => summarize(fragments),
        None => NO_TRANSCRIPT_PLACEHOLDER.to_string(),
    }
}
