use crate::models::ZoneId;
use chrono::{DateTime, Duration, Utc};

const LOCAL_FORMAT: &str = "%Y-%m-%d %H:%M";

/// `9h 05m`; negative spans keep their sign.
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes();
    let sign = if minutes < 0 { "-" } else { "" };
    let minutes = minutes.abs();
    format!("{}{}h {:02}m", sign, minutes / 60, minutes % 60)
}

pub fn format_local(instant: &DateTime<Utc>, zone: &ZoneId) -> String {
    zone.to_local(instant).format(LOCAL_FORMAT).to_string()
}

pub fn total_duration<I: IntoIterator<Item = Duration>>(durations: I) -> Duration {
    durations
        .into_iter()
        .fold(Duration::zero(), |total, duration| total + duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn durations() {
        assert_eq!(format_duration(Duration::zero()), "0h 00m");
        assert_eq!(format_duration(Duration::minutes(545)), "9h 05m");
        assert_eq!(format_duration(Duration::hours(31)), "31h 00m");
        assert_eq!(format_duration(Duration::seconds(119)), "0h 01m");
        assert_eq!(format_duration(Duration::minutes(-90)), "-1h 30m");
    }

    #[test]
    fn local_time_in_zone() {
        let instant = Utc.with_ymd_and_hms(2023, 1, 10, 7, 0, 0).unwrap();
        let madrid = ZoneId::Region(chrono_tz::Europe::Madrid);
        assert_eq!(format_local(&instant, &madrid), "2023-01-10 08:00");
    }

    #[test]
    fn totals() {
        let total = total_duration([Duration::hours(1), Duration::minutes(30)]);
        assert_eq!(total, Duration::minutes(90));
        assert_eq!(total_duration(Vec::new()), Duration::zero());
    }
}
