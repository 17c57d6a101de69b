use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Monday of the ISO week containing `date`. A Sunday maps back six days,
/// not forward one.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Whole minutes between two instants, floored.
pub fn elapsed_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_minutes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monday_is_its_own_week_start() {
        assert_eq!(week_start(date(2025, 3, 3)), date(2025, 3, 3));
    }

    #[test]
    fn midweek_maps_to_monday() {
        assert_eq!(week_start(date(2025, 3, 6)), date(2025, 3, 3));
    }

    #[test]
    fn sunday_maps_back_six_days() {
        assert_eq!(week_start(date(2025, 3, 9)), date(2025, 3, 3));
    }

    #[test]
    fn nine_to_half_past_six_is_570_minutes() {
        let start = Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 3, 18, 30, 0).unwrap();
        assert_eq!(elapsed_minutes(start, end), 570);
    }

    #[test]
    fn partial_minutes_floor() {
        let start = Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 3, 9, 5, 59).unwrap();
        assert_eq!(elapsed_minutes(start, end), 5);
    }
}
