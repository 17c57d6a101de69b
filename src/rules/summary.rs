use serde::Serialize;
use strum_macros::{AsRefStr, Display};
use utoipa::ToSchema;

/// Statutory weekly working-hour limit: 52 hours.
pub const WEEKLY_LIMIT_MINUTES: i64 = 52 * 60;

const WARNING_HOURS: f64 = 45.0;
const CRITICAL_HOURS: f64 = 50.0;
const MAX_HOURS: f64 = 52.0;

/// Result of folding one closed session into a weekly accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyTotals {
    pub total_minutes: i64,
    pub overtime_minutes: i64,
    pub exceeds_limit: bool,
}

/// Adds `minutes` onto the prior weekly total. Monotonically increasing
/// within a week; there is no decrement path.
pub fn accumulate(prior_total_minutes: i64, minutes: i64) -> WeeklyTotals {
    let total_minutes = prior_total_minutes + minutes;
    WeeklyTotals {
        total_minutes,
        overtime_minutes: (total_minutes - WEEKLY_LIMIT_MINUTES).max(0),
        exceeds_limit: total_minutes > WEEKLY_LIMIT_MINUTES,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr, ToSchema)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    None,
    Warning,
    Critical,
    Exceeded,
}

/// Display-only overtime alert; enforcement never blocks a clock-out.
#[derive(Debug, Serialize, ToSchema)]
pub struct WeeklyAlert {
    pub alert_level: AlertLevel,
    pub message: String,
    pub total_hours: f64,
    pub max_hours: f64,
    pub remaining_hours: f64,
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Derives the alert ladder from accumulated minutes: 45h warning,
/// 50h critical, 52h exceeded, otherwise none.
pub fn weekly_alert(total_minutes: i64) -> WeeklyAlert {
    let total_hours = round_tenth(total_minutes as f64 / 60.0);
    let remaining_hours = round_tenth(MAX_HOURS - total_hours);

    let (alert_level, message) = if total_hours >= MAX_HOURS {
        (
            AlertLevel::Exceeded,
            format!("Weekly 52-hour limit exceeded: currently at {total_hours:.1} hours"),
        )
    } else if total_hours >= CRITICAL_HOURS {
        (
            AlertLevel::Critical,
            format!(
                "Approaching the weekly 52-hour limit: {total_hours:.1} hours worked ({remaining_hours:.1} hours remaining)"
            ),
        )
    } else if total_hours >= WARNING_HOURS {
        (
            AlertLevel::Warning,
            format!(
                "Weekly working hours are building up: {total_hours:.1} hours worked ({remaining_hours:.1} hours remaining)"
            ),
        )
    } else {
        (
            AlertLevel::None,
            format!("Within the normal range: {total_hours:.1} hours worked"),
        )
    };

    WeeklyAlert {
        alert_level,
        message,
        total_hours,
        max_hours: MAX_HOURS,
        remaining_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_accumulation_sums() {
        let first = accumulate(0, 570);
        assert_eq!(first.total_minutes, 570);
        assert_eq!(first.overtime_minutes, 0);
        assert!(!first.exceeds_limit);

        let second = accumulate(first.total_minutes, 480);
        assert_eq!(second.total_minutes, 1050);
    }

    #[test]
    fn overtime_is_total_minus_limit_floored_at_zero() {
        assert_eq!(accumulate(3000, 100).overtime_minutes, 0);
        assert_eq!(accumulate(3000, 120).overtime_minutes, 0);
        assert_eq!(accumulate(3000, 200).overtime_minutes, 80);
    }

    #[test]
    fn exceeds_limit_is_strictly_greater() {
        assert!(!accumulate(0, WEEKLY_LIMIT_MINUTES).exceeds_limit);
        assert!(accumulate(0, WEEKLY_LIMIT_MINUTES + 1).exceeds_limit);
    }

    #[test]
    fn alert_ladder() {
        assert_eq!(weekly_alert(44 * 60).alert_level, AlertLevel::None);
        assert_eq!(weekly_alert(45 * 60).alert_level, AlertLevel::Warning);
        assert_eq!(weekly_alert(50 * 60).alert_level, AlertLevel::Critical);
        assert_eq!(weekly_alert(52 * 60).alert_level, AlertLevel::Exceeded);
        assert_eq!(weekly_alert(54 * 60).alert_level, AlertLevel::Exceeded);
    }

    #[test]
    fn alert_reports_remaining_hours() {
        let alert = weekly_alert(46 * 60 + 30);
        assert_eq!(alert.total_hours, 46.5);
        assert_eq!(alert.remaining_hours, 5.5);
        assert_eq!(alert.max_hours, 52.0);
    }
}
