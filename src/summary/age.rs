//! Human-readable distance between a timestamp and now.
//!
//! Buckets follow the familiar "time ago in words" scale: minutes up to 45,
//! hours up to a day and a half, days up to a month, then months and years
//! with `about`, `over` and `almost` qualifiers.

use chrono::{DateTime, Datelike, Utc};

/// Age rendered when a record's timestamp is missing or garbled.
pub const UNKNOWN_AGE: &str = "unknown";

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 1_440;
const MINUTES_PER_MONTH: i64 = 43_200;
const MINUTES_PER_YEAR: i64 = 525_600;
const MINUTES_PER_QUARTER_YEAR: i64 = 131_400;
const MINUTES_PER_THREE_QUARTERS_YEAR: i64 = 394_200;

/// Describes how long ago `timestamp` was, relative to `now`.
///
/// Timestamps in the future are treated as happening now.
///
/// ```
/// use chrono::{Duration, Utc};
/// use prdigest::summary::relative_age;
///
/// let now = Utc::now();
/// assert_eq!(relative_age(now - Duration::hours(3), now), "about 3 hours ago");
/// ```
#[must_use]
pub fn relative_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format!("{} ago", distance_in_words(timestamp, now))
}

/// Like [`relative_age`], but accepts the raw timestamp and renders
/// [`UNKNOWN_AGE`] when it cannot be parsed.
#[must_use]
pub fn relative_age_or_unknown(timestamp: Option<&str>, now: DateTime<Utc>) -> String {
    crate::github::models::parse_timestamp(timestamp).map_or_else(
        |error| {
            tracing::debug!(%error, "rendering unknown age");
            UNKNOWN_AGE.to_owned()
        },
        |parsed| relative_age(parsed, now),
    )
}

fn distance_in_words(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let seconds = (to - from).num_seconds().max(0);
    let minutes = rounded_div(seconds, 60);

    match minutes {
        0 => "less than a minute".to_owned(),
        1 => "1 minute".to_owned(),
        2..45 => format!("{minutes} minutes"),
        45..90 => "about 1 hour".to_owned(),
        90..MINUTES_PER_DAY => format!("about {} hours", rounded_div(minutes, MINUTES_PER_HOUR)),
        MINUTES_PER_DAY..2_520 => "1 day".to_owned(),
        2_520..MINUTES_PER_MONTH => format!("{} days", rounded_div(minutes, MINUTES_PER_DAY)),
        MINUTES_PER_MONTH..86_400 => {
            let months = rounded_div(minutes, MINUTES_PER_MONTH);
            if months == 1 {
                "about 1 month".to_owned()
            } else {
                format!("about {months} months")
            }
        }
        86_400..MINUTES_PER_YEAR => format!("{} months", rounded_div(minutes, MINUTES_PER_MONTH)),
        _ => years_in_words(from, to, minutes),
    }
}

/// Whole years with a qualifier, discounting one day per leap year crossed.
fn years_in_words(from: DateTime<Utc>, to: DateTime<Utc>, minutes: i64) -> String {
    let from_year = if from.month() >= 3 {
        from.year() + 1
    } else {
        from.year()
    };
    let to_year = if to.month() < 3 {
        to.year() - 1
    } else {
        to.year()
    };
    let leap_years = if from_year > to_year {
        0
    } else {
        (from_year..=to_year).filter(|year| is_leap_year(*year)).count()
    };
    let leap_minutes = i64::try_from(leap_years)
        .unwrap_or(0)
        .saturating_mul(MINUTES_PER_DAY);

    let adjusted = minutes - leap_minutes;
    let years = adjusted.div_euclid(MINUTES_PER_YEAR);
    let remainder = adjusted.rem_euclid(MINUTES_PER_YEAR);

    if remainder < MINUTES_PER_QUARTER_YEAR {
        format!("about {}", pluralise_years(years))
    } else if remainder < MINUTES_PER_THREE_QUARTERS_YEAR {
        format!("over {}", pluralise_years(years))
    } else {
        format!("almost {}", pluralise_years(years + 1))
    }
}

fn pluralise_years(years: i64) -> String {
    if years == 1 {
        "1 year".to_owned()
    } else {
        format!("{years} years")
    }
}

const fn is_leap_year(year: i32) -> bool {
    (year.rem_euclid(4) == 0 && year.rem_euclid(100) != 0) || year.rem_euclid(400) == 0
}

/// Integer division rounding halves up, for non-negative numerators.
const fn rounded_div(numerator: i64, denominator: i64) -> i64 {
    (2 * numerator + denominator).div_euclid(2 * denominator)
}
