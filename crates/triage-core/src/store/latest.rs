//! Latest-episode selection.
//!
//! Unparsable dates order before every valid date. Among equal dates the
//! earliest row in table order wins.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::models::Episode;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse an episode date in any of the accepted formats.
pub fn parse_episode_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Pick the most recent episode, or `None` if the slice is empty.
///
/// If no episode has a parsable date, the first episode is returned.
pub fn select_latest(episodes: &[Episode]) -> Option<&Episode> {
    let mut best: Option<(&Episode, Option<NaiveDateTime>)> = None;

    for episode in episodes {
        let date = episode.parsed_date();
        // `None < Some(_)`, so invalid dates can only win when nothing parsed.
        let newer = match best {
            Some((_, best_date)) => date > best_date,
            None => true,
        };
        if newer {
            best = Some((episode, date));
        }
    }

    best.map(|(episode, _)| episode)
}
