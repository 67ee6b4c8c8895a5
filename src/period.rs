use crate::error::{GhstatsError, Result};
use crate::model::{parse_date, DateRange};
use chrono::{Days, NaiveDate};
use clap::ValueEnum;

/// Relative windows ending today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TimePeriod {
    #[default]
    LastWeek,
    #[value(name = "last-30-days")]
    Last30Days,
    #[value(name = "last-90-days")]
    Last90Days,
    #[value(name = "last-6-months")]
    Last6Months,
    LastYear,
}

impl TimePeriod {
    pub fn days(self) -> u64 {
        match self {
            TimePeriod::LastWeek => 7,
            TimePeriod::Last30Days => 30,
            TimePeriod::Last90Days => 90,
            TimePeriod::Last6Months => 30 * 6,
            TimePeriod::LastYear => 365,
        }
    }
}

fn days_before(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_sub_days(Days::new(days))
        .ok_or_else(|| GhstatsError::InvalidDate(format!("{days} days before {date} is out of range")))
}

/// Explicit dates win over the relative period. A lone `to` looks back by
/// `period`; a lone `from` runs until `today`.
pub fn resolve_range(
    from: Option<&str>,
    to: Option<&str>,
    period: TimePeriod,
    today: NaiveDate,
) -> Result<DateRange> {
    if from.is_none() && to.is_none() {
        return DateRange::new(days_before(today, period.days())?, today);
    }

    let to_date = match to {
        Some(t) => parse_date(t)?,
        None => today,
    };
    let from_date = match from {
        Some(f) => parse_date(f)?,
        None => days_before(to_date, period.days())?,
    };
    DateRange::new(from_date, to_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn relative_period_ends_today() {
        let range = resolve_range(None, None, TimePeriod::Last30Days, date("2024-03-31")).unwrap();
        assert_eq!(range.from_date, date("2024-03-01"));
        assert_eq!(range.to_date, date("2024-03-31"));

        let range = resolve_range(None, None, TimePeriod::LastYear, date("2024-12-31")).unwrap();
        assert_eq!(range.from_date, date("2024-01-01"));
    }

    #[test]
    fn explicit_dates_override_period() {
        let range = resolve_range(Some("2023-01-01"), Some("2023-06-30"), TimePeriod::LastWeek, date("2024-03-31"))
            .unwrap();
        assert_eq!(range.from_date, date("2023-01-01"));
        assert_eq!(range.to_date, date("2023-06-30"));
    }

    #[test]
    fn half_open_explicit_dates_fill_in() {
        let range = resolve_range(Some("2024-03-20"), None, TimePeriod::LastWeek, date("2024-03-31")).unwrap();
        assert_eq!(range.to_date, date("2024-03-31"));

        let range = resolve_range(None, Some("2024-03-10"), TimePeriod::LastWeek, date("2024-03-31")).unwrap();
        assert_eq!(range.from_date, date("2024-03-03"));
    }

    #[test]
    fn bad_explicit_dates_are_rejected() {
        assert!(resolve_range(Some("yesterday"), None, TimePeriod::LastWeek, date("2024-03-31")).is_err());
        assert!(matches!(
            resolve_range(Some("2024-04-01"), Some("2024-03-01"), TimePeriod::LastWeek, date("2024-03-31")),
            Err(GhstatsError::InvalidDate(_))
        ));
    }

    #[test]
    fn period_names_match_cli_values() {
        let names: Vec<_> = TimePeriod::value_variants()
            .iter()
            .filter_map(|p| p.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["last-week", "last-30-days", "last-90-days", "last-6-months", "last-year"]
        );
    }
}
