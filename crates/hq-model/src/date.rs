//! Human-relative timestamps ("3 minutes ago").

use chrono::DateTime;
use chrono::Utc;
use std::fmt;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Source of "now" for relative formatting.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Elapsed time between a timestamp and a reference instant, rounded down to one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeTime {
    seconds: i64,
}

impl RelativeTime {
    pub fn between(then: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            seconds: (now - then).num_seconds().max(0),
        }
    }
}

impl fmt::Display for RelativeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.seconds;
        let (count, unit) = match seconds {
            s if s < 45 => return f.write_str("just now"),
            s if s < HOUR => (s / MINUTE, "minute"),
            s if s < DAY => (s / HOUR, "hour"),
            s if s < MONTH => (s / DAY, "day"),
            s if s < YEAR => (s / MONTH, "month"),
            s => (s / YEAR, "year"),
        };

        match (count.max(1), unit) {
            (1, "hour") => f.write_str("an hour ago"),
            (1, unit) => write!(f, "a {unit} ago"),
            (count, unit) => write!(f, "{count} {unit}s ago"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RelativeTime;
    use chrono::DateTime;
    use chrono::Duration;
    use chrono::TimeZone;
    use chrono::Utc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 3, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(|| unreachable!())
    }

    fn ago(delta: Duration) -> String {
        RelativeTime::between(now() - delta, now()).to_string()
    }

    #[test]
    fn formats_each_unit() {
        assert_eq!(ago(Duration::seconds(10)), "just now");
        assert_eq!(ago(Duration::seconds(50)), "a minute ago");
        assert_eq!(ago(Duration::minutes(5)), "5 minutes ago");
        assert_eq!(ago(Duration::minutes(61)), "an hour ago");
        assert_eq!(ago(Duration::hours(3)), "3 hours ago");
        assert_eq!(ago(Duration::hours(30)), "a day ago");
        assert_eq!(ago(Duration::days(12)), "12 days ago");
        assert_eq!(ago(Duration::days(31)), "a month ago");
        assert_eq!(ago(Duration::days(100)), "3 months ago");
        assert_eq!(ago(Duration::days(400)), "a year ago");
        assert_eq!(ago(Duration::days(800)), "2 years ago");
    }

    #[test]
    fn future_timestamps_read_as_just_now() {
        assert_eq!(ago(Duration::hours(-2)), "just now");
    }
}
