// SPDX-License-Identifier: GPL-3.0-or-later

//! Relevance scoring of a search hit against a `"title - artist"` search term.
//!
//! The title dominates the score (80/20 against the artist). A short fragment
//! can reach a high edit-distance ratio against a longer string, so the title
//! ratio is scaled by the length ratio of the two strings, and weak title
//! matches are halved again so a good artist match cannot carry them.

use strsim::normalized_levenshtein;
use tracing::trace;

const FILLER_TOKENS: [&str; 8] = [
    "from",
    "feat",
    "ft",
    "featuring",
    "official",
    "video",
    "audio",
    "lyrics",
];

const TITLE_WEIGHT: f64 = 0.8;
const ARTIST_WEIGHT: f64 = 0.2;
const WEAK_TITLE_THRESHOLD: f64 = 0.5;
const WEAK_TITLE_FACTOR: f64 = 0.5;
/// Artist similarity used when the search term carries no artist.
const NEUTRAL_ARTIST_SIMILARITY: f64 = 0.5;

/// Scores a candidate `(title, artist)` against a raw search term in `[0, 1]`.
///
/// The term may be `"title - artist"`; it is split on the first `" - "`.
pub fn match_score(candidate_title: &str, candidate_artist: &str, search_term: &str) -> f64 {
    let (search_title, search_artist) = match search_term.split_once(" - ") {
        Some((title, artist)) => (title, artist),
        None => (search_term, ""),
    };

    let title_similarity = title_similarity(candidate_title, search_title);
    let artist_similarity = if search_artist.trim().is_empty() {
        NEUTRAL_ARTIST_SIMILARITY
    } else {
        similarity(
            &clean_for_match(candidate_artist),
            &clean_for_match(search_artist),
        )
    };

    let score = (TITLE_WEIGHT * title_similarity + ARTIST_WEIGHT * artist_similarity).clamp(0.0, 1.0);
    trace!(
        target: "matching",
        candidate_title,
        candidate_artist,
        search_term,
        title_similarity,
        artist_similarity,
        score,
        "scored candidate"
    );
    score
}

/// Lowercases, turns punctuation into spaces, collapses whitespace and drops
/// filler words such as "feat" or "official".
pub fn clean_for_match(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .filter(|token| !FILLER_TOKENS.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_similarity(candidate: &str, search: &str) -> f64 {
    let candidate = clean_for_match(candidate);
    let search = clean_for_match(search);

    if candidate == search {
        return 1.0;
    }

    let ratio = normalized_levenshtein(&candidate, &search) * length_ratio(&candidate, &search);
    if ratio < WEAK_TITLE_THRESHOLD {
        ratio * WEAK_TITLE_FACTOR
    } else {
        ratio
    }
}

fn similarity(left: &str, right: &str) -> f64 {
    if left == right {
        return 1.0;
    }
    normalized_levenshtein(left, right)
}

fn length_ratio(left: &str, right: &str) -> f64 {
    let left_len = left.chars().count();
    let right_len = right.chars().count();
    let longest = left_len.max(right_len);
    if longest == 0 {
        return 1.0;
    }
    left_len.min(right_len) as f64 / longest as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn identical_title_and_artist_scores_one() {
        let score = match_score("Tum Hi Ho", "Arijit Singh", "Tum Hi Ho - Arijit Singh");
        assert!((score - 1.0).abs() < EPSILON, "score was {score}");
    }

    #[test]
    fn identical_after_cleaning_scores_one() {
        let score = match_score(
            "Tum Hi Ho (Official Video)",
            "Arijit Singh",
            "tum hi ho - ARIJIT SINGH",
        );
        assert!((score - 1.0).abs() < EPSILON, "score was {score}");
    }

    #[test]
    fn different_title_is_penalized_below_half() {
        let score = match_score("Totally Different Song", "X", "Some Song - X");
        assert!(score < 0.5, "score was {score}");
    }

    #[test]
    fn missing_separator_uses_neutral_artist_similarity() {
        let with_matching_artist = match_score("Kesariya", "Arijit Singh", "Kesariya");
        let with_other_artist = match_score("Kesariya", "Someone Else", "Kesariya");
        assert!((with_matching_artist - with_other_artist).abs() < EPSILON);
        assert!((with_matching_artist - (0.8 + 0.2 * 0.5)).abs() < EPSILON);
    }

    #[test]
    fn only_first_separator_splits() {
        let score = match_score("Song", "A - B", "Song - A - B");
        assert!((score - 1.0).abs() < EPSILON, "score was {score}");
    }

    #[test]
    fn short_fragment_is_scaled_by_length_ratio() {
        let fragment = match_score("Love", "X", "Love Me Like You Do - X");
        let full = match_score("Love Me Like You Do", "X", "Love Me Like You Do - X");
        assert!(fragment < full);
        assert!(fragment < 0.5, "score was {fragment}");
    }

    #[test]
    fn score_is_deterministic_and_bounded() {
        let first = match_score("Channa Mereya", "Arijit Singh", "Chana Mereya - Arijit");
        let second = match_score("Channa Mereya", "Arijit Singh", "Chana Mereya - Arijit");
        assert_eq!(first, second);
        assert!((0.0..=1.0).contains(&first));
    }

    #[test]
    fn clean_for_match_drops_fillers_and_punctuation() {
        assert_eq!(
            clean_for_match("Despacito (feat. Justin Bieber) [Official Lyrics Video]"),
            "despacito justin bieber"
        );
        assert_eq!(clean_for_match("  Rock&Roll  "), "rock roll");
    }

    #[test]
    fn empty_strings_compare_equal() {
        let score = match_score("", "", "");
        assert!((score - (0.8 + 0.2 * 0.5)).abs() < EPSILON);
    }
}
