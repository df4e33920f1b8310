use chrono::{Local, NaiveDateTime};

/// Source of the reference instant shows are classified against.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time without a timezone, as show start times are stored.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Accepts `YYYY-MM-DD HH:MM:SS`, the ISO `T` separator, or minute precision.
pub fn parse_instant(input: &str) -> Option<NaiveDateTime> {
    let cleaned = input.trim();
    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in formats.iter() {
        if let Ok(instant) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(instant);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_supported_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 10, 7)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();

        assert_eq!(parse_instant("2025-10-07 18:30:00"), Some(expected));
        assert_eq!(parse_instant("2025-10-07T18:30:00"), Some(expected));
        assert_eq!(parse_instant(" 2025-10-07 18:30 "), Some(expected));
        assert_eq!(parse_instant("Tue Oct 7"), None);
    }

    #[test]
    fn fixed_clock_returns_its_instant() {
        let instant = parse_instant("2025-01-01 00:00:00").unwrap();
        assert_eq!(FixedClock(instant).now(), instant);
    }
}
