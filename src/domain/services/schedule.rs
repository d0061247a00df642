use crate::domain::diagnostic::{Diagnostic, Normalized};
use crate::domain::model::ScheduledMeeting;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static DAYS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[MTWRF]+").unwrap());
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d\d:\d\d[APM]+").unwrap());

/// Separator the listing uses between meeting patterns of one section.
pub const GROUP_DELIMITER: &str = "AND";

/// Decodes the day/time and location cells into one meeting per day.
///
/// Both cells may hold several patterns joined by `AND` (lecture plus lab and
/// so on). Pattern `i` of the day/time cell goes with pattern `i` of the
/// location cell; identical pairs collapse to the first one, then each pair
/// fans out into one meeting per day letter. When the two cells disagree on the
/// number of patterns, only the pairs both sides have are decoded and the
/// result is `Defaulted`.
pub fn decode_meetings(day_times_raw: &str, locations_raw: &str) -> Normalized<Vec<ScheduledMeeting>> {
    let day_times: Vec<&str> = day_times_raw.split(GROUP_DELIMITER).collect();
    let locations: Vec<&str> = locations_raw.split(GROUP_DELIMITER).collect();

    let mut seen = HashSet::new();
    let mut meetings = Vec::new();

    for (day_time, location) in day_times.iter().zip(locations.iter()) {
        let pair = (day_time.trim(), location.trim());
        if !seen.insert(pair) {
            continue;
        }
        fan_out(pair.0, pair.1, &mut meetings);
    }

    if day_times.len() != locations.len() {
        return Normalized::Defaulted {
            value: meetings,
            reason: Diagnostic::GroupCountMismatch {
                day_times: day_times.len(),
                locations: locations.len(),
            },
        };
    }

    Normalized::Clean(meetings)
}

fn fan_out(day_time: &str, location: &str, meetings: &mut Vec<ScheduledMeeting>) {
    let days = DAYS_RE.find(day_time).map(|m| m.as_str()).unwrap_or("");

    let mut times = TIME_RE.find_iter(day_time).map(|m| m.as_str());
    let start_time = times.next().unwrap_or("");
    let end_time = times.next().unwrap_or("");

    for day in days.chars() {
        meetings.push(ScheduledMeeting {
            location: location.to_string(),
            day: day.to_string(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
        });
    }
}
