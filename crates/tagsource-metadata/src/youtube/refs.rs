// SPDX-License-Identifier: GPL-3.0-or-later

//! Recognition of YouTube Music ids and URLs.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

lazy_static! {
    static ref BROWSE_ID_REGEX: Regex =
        Regex::new(r"^MPREb_[A-Za-z0-9_-]+$").expect("valid browse id regex");
    static ref VIDEO_ID_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid video id regex");
}

/// Album browse id from a raw `MPREb_…` id or a `…/browse/MPREb_…` URL.
pub fn album_browse_id(reference: &str) -> Option<String> {
    let reference = reference.trim();
    if BROWSE_ID_REGEX.is_match(reference) {
        return Some(reference.to_string());
    }

    let url = youtube_url(reference)?;
    let mut segments = url.path_segments()?;
    match (segments.next(), segments.next()) {
        (Some("browse"), Some(id)) if BROWSE_ID_REGEX.is_match(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Video id from a raw 11-character id, a `watch?v=` URL or a `youtu.be` link.
pub fn video_id(reference: &str) -> Option<String> {
    let reference = reference.trim();
    if VIDEO_ID_REGEX.is_match(reference) {
        return Some(reference.to_string());
    }

    let url = youtube_url(reference)?;
    let candidate = if url.host_str() == Some("youtu.be") {
        url.path_segments()?.next().map(str::to_string)
    } else if url.path() == "/watch" {
        query_value(&url, "v")
    } else {
        None
    }?;

    VIDEO_ID_REGEX.is_match(&candidate).then_some(candidate)
}

/// Playlist id from a `…/playlist?list=…` URL.
pub fn playlist_id(reference: &str) -> Option<String> {
    let url = youtube_url(reference.trim())?;
    if url.path().trim_end_matches('/') != "/playlist" {
        return None;
    }
    query_value(&url, "list").filter(|id| !id.is_empty())
}

fn youtube_url(reference: &str) -> Option<Url> {
    let url = Url::parse(reference).ok()?;
    let host = url.host_str()?;
    let belongs = host == "youtu.be" || host == "youtube.com" || host.ends_with(".youtube.com");
    belongs.then_some(url)
}

fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned())
}
