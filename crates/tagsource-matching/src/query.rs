// SPDX-License-Identifier: GPL-3.0-or-later
use lazy_static::lazy_static;
use regex::Regex;

/// Cleans a free-text query before it is sent to a remote search endpoint.
///
/// Punctuation and medium annotations ("CD1", "disc 2") suppress recall in the
/// remote backends, so runs of non-word characters become a single space and
/// disc markers are dropped. Unicode letters are kept.
pub fn normalize_query(query: &str) -> String {
    lazy_static! {
        static ref NON_WORD_REGEX: Regex = Regex::new(r"\W+").expect("valid non-word regex");
        static ref MEDIUM_REGEX: Regex =
            Regex::new(r"(?i)\b(?:CD|disc)\s*\d+").expect("valid medium regex");
    }

    let spaced = NON_WORD_REGEX.replace_all(query, " ");
    let stripped = MEDIUM_REGEX.replace_all(&spaced, "");
    normalize_whitespace(&stripped)
}

/// Query used to find album candidates for a release.
pub fn album_query(artist: &str, release: &str, va_likely: bool) -> String {
    if va_likely {
        release.to_string()
    } else {
        format!("{release} {artist}")
    }
}

/// Query used to find track candidates for a single item.
pub fn track_query(artist: &str, title: &str) -> String {
    format!("{title} {artist}")
}

fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<&str>>().join(" ")
}
