//! Deadline resolution.
//!
//! Timeline deadlines are stored without a timezone marker and are read in the
//! owning event instance's timezone, never the viewer's.

use std::fmt;

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::catalog::EventInstance;
use crate::error::{HubError, HubResult};

/// Zone an event instance declares for its deadlines, also used as the display zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Zone {
    Iana(Tz),
    Fixed(FixedOffset),
}

/// "Anywhere on Earth", the usual zone for submission deadlines.
const AOE_OFFSET_SECS: i32 = -12 * 3600;

impl Zone {
    /// Parse an IANA identifier, `AoE`, or a `UTC±H[:MM]` / `GMT±H[:MM]` offset.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.eq_ignore_ascii_case("aoe") {
            return Ok(Zone::Fixed(fixed(AOE_OFFSET_SECS)?));
        }

        if let Ok(tz) = s.parse::<Tz>() {
            return Ok(Zone::Iana(tz));
        }

        parse_utc_offset(s)
            .map(Zone::Fixed)
            .ok_or_else(|| format!("Unknown timezone '{}'", s))
    }

    /// Interpret a wall-clock time in this zone.
    ///
    /// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
    /// DST gap are read with the offset in force before the gap, which moves
    /// them forward by the gap length.
    pub fn localize(&self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Zone::Fixed(offset) => offset.from_local_datetime(naive).single(),
            Zone::Iana(tz) => match tz.from_local_datetime(naive).earliest() {
                Some(dt) => Some(dt.fixed_offset()),
                None => {
                    let before = tz
                        .from_local_datetime(&(*naive - Duration::hours(6)))
                        .earliest()?;
                    let offset = before.offset().fix();
                    let instant = (*naive - Duration::seconds(offset.local_minus_utc() as i64))
                        .and_utc();
                    Some(instant.with_timezone(tz).fixed_offset())
                }
            },
        }
    }

    /// The same instant expressed in this zone.
    pub fn convert(&self, dt: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        match self {
            Zone::Fixed(offset) => dt.with_timezone(offset),
            Zone::Iana(tz) => dt.with_timezone(tz).fixed_offset(),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Zone::Iana(tz) => write!(f, "{}", tz.name()),
            Zone::Fixed(offset) => write!(f, "UTC{}", offset),
        }
    }
}

fn fixed(secs: i32) -> Result<FixedOffset, String> {
    FixedOffset::east_opt(secs).ok_or_else(|| format!("Offset out of range: {}s", secs))
}

fn parse_utc_offset(s: &str) -> Option<FixedOffset> {
    let upper = s.to_ascii_uppercase();
    let rest = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))?;

    let (sign, rest) = match rest.chars().next()? {
        '+' => (1, &rest[1..]),
        '-' => (-1, &rest[1..]),
        _ => return None,
    };

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (offset_part(h)?, offset_part(m)?),
        None => (offset_part(rest)?, 0),
    };

    if hours > 14 || minutes >= 60 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60) as i32)
}

/// Unsigned digits only; `u32::from_str` alone would accept a leading `+`.
fn offset_part(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// A stored deadline, before it is placed in a zone.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RawDeadline {
    Local(NaiveDateTime),
    Absolute(DateTime<FixedOffset>),
}

const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn parse_raw_deadline(s: &str) -> Option<RawDeadline> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(RawDeadline::Absolute(dt));
    }

    for format in LOCAL_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(RawDeadline::Local(naive));
        }
    }

    // Date-only deadlines mean the start of that day
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(RawDeadline::Local)
}

/// Parse one deadline string in the given zone.
pub fn parse_deadline(s: &str, zone: &Zone) -> Result<DateTime<FixedOffset>, String> {
    match parse_raw_deadline(s) {
        // An explicit offset fixes the instant; it is still shown in the event zone
        Some(RawDeadline::Absolute(dt)) => Ok(zone.convert(&dt)),
        Some(RawDeadline::Local(naive)) => zone
            .localize(&naive)
            .ok_or_else(|| format!("Deadline '{}' does not exist in the event timezone", s)),
        None => Err(format!("Unparseable deadline '{}'", s)),
    }
}

/// All deadlines of an event instance, in storage order, interpreted in its timezone.
pub fn deadlines(event: &EventInstance) -> HubResult<Vec<DateTime<FixedOffset>>> {
    if event.timeline.is_empty() {
        return Err(HubError::EmptyTimeline {
            event_id: event.id.clone(),
        });
    }

    let malformed = |reason: String| HubError::MalformedTimelineEntry {
        event_id: event.id.clone(),
        reason,
    };

    let zone = Zone::parse(&event.timezone).map_err(malformed)?;

    event
        .timeline
        .iter()
        .map(|entry| parse_deadline(&entry.deadline, &zone).map_err(malformed))
        .collect()
}

/// The next deadline of an event instance relative to a reference instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Next deadline, carrying the event's own UTC offset
    pub next_deadline: DateTime<FixedOffset>,
    /// `next_deadline - now` in milliseconds; negative once the deadline has passed
    pub time_remaining_ms: i64,
    /// Index of the timeline entry the deadline came from
    pub milestone: usize,
}

/// Resolve the next upcoming deadline of `event` as seen at `now`.
///
/// The earliest deadline strictly after `now` wins. When every deadline has
/// passed, the last entry in storage order is used (not the chronologically
/// latest one).
pub fn resolve(event: &EventInstance, now: DateTime<Utc>) -> HubResult<Resolution> {
    let deadlines = deadlines(event)?;

    let upcoming = deadlines
        .iter()
        .enumerate()
        .filter(|(_, d)| **d > now)
        .min_by_key(|(_, d)| **d);

    let (milestone, next_deadline) = match upcoming {
        Some((i, d)) => (i, *d),
        None => {
            let last = deadlines.len() - 1;
            (last, deadlines[last])
        }
    };

    Ok(Resolution {
        next_deadline,
        time_remaining_ms: (next_deadline.with_timezone(&Utc) - now).num_milliseconds(),
        milestone,
    })
}

/// Time remaining broken into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub ended: bool,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// Build from a signed remaining time. Units describe the magnitude.
    pub fn from_millis(ms: i64) -> Self {
        let total_secs = ms.unsigned_abs() / 1000;
        Countdown {
            ended: ms < 0,
            days: (total_secs / 86_400) as i64,
            hours: ((total_secs % 86_400) / 3600) as i64,
            minutes: ((total_secs % 3600) / 60) as i64,
            seconds: (total_secs % 60) as i64,
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.ended {
            return write!(f, "ended");
        }
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}
