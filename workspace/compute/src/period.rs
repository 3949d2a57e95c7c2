//! Turns a year/month choice or a custom date range into a half-open
//! `[start, end)` interval with a display label.

use chrono::{Datelike, Duration, Months, NaiveDate};
use common::{PeriodType, ReportPeriod};
use tracing::{debug, instrument};

use crate::error::{ComputeError, Result};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Period parameters as they arrive from a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodSelection {
    /// "custom" selects the date range, anything else a month
    pub period_type: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub start_date: Option<NaiveDate>,
    /// Inclusive
    pub end_date: Option<NaiveDate>,
}

/// Year filter of the sales summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearFilter {
    All,
    Year(i32),
}

impl YearFilter {
    /// `None`, "all" and anything that is not a number mean all years.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(raw) if raw != "all" => raw.parse().map(YearFilter::Year).unwrap_or(YearFilter::All),
            _ => YearFilter::All,
        }
    }

    pub fn label(&self) -> String {
        match self {
            YearFilter::All => "All periods".to_string(),
            YearFilter::Year(year) => format!("Year {}", year),
        }
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            YearFilter::All => None,
            YearFilter::Year(year) => Some(*year),
        }
    }
}

/// English month name for 1-12.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

/// `[Jan 1 of year, Jan 1 of next year)`
pub fn year_interval(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| ComputeError::Date(format!("year {} is out of range", year)))?;
    let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)
        .ok_or_else(|| ComputeError::Date(format!("year {} is out of range", year + 1)))?;
    Ok((start, end))
}

/// The calendar month starting at `first`.
pub fn month_period(first: NaiveDate) -> Result<ReportPeriod> {
    let start = first.with_day(1).unwrap_or(first);
    let end = start
        .checked_add_months(Months::new(1))
        .ok_or_else(|| ComputeError::Date(format!("no month after {}", start)))?;
    let label = format!(
        "{} {}",
        month_name(start.month()).unwrap_or_default(),
        start.year()
    );

    Ok(ReportPeriod {
        period_type: PeriodType::Month,
        start,
        end,
        label,
        selected_year: start.year(),
        selected_month: start.month(),
    })
}

/// The month containing `today`.
pub fn current_month(today: NaiveDate) -> Result<ReportPeriod> {
    month_period(today)
}

/// Both bounds inclusive; the resulting interval ends the day after `end`.
pub fn custom_period(start: NaiveDate, end: NaiveDate) -> Result<ReportPeriod> {
    if end < start {
        return Err(ComputeError::InvalidPeriod(format!(
            "end date {} is before start date {}",
            end, start
        )));
    }
    let exclusive_end = end
        .checked_add_signed(Duration::days(1))
        .ok_or_else(|| ComputeError::Date(format!("no day after {}", end)))?;

    let mut period = ReportPeriod {
        period_type: PeriodType::Custom,
        start,
        end: exclusive_end,
        label: String::new(),
        selected_year: start.year(),
        selected_month: start.month(),
    };
    // The label shows the inclusive end
    period.label = format!(
        "{} - {}",
        period.start.format("%d.%m.%Y"),
        period.last_day().format("%d.%m.%Y")
    );
    Ok(period)
}

/// Resolves the request parameters into a report period.
///
/// A custom range needs both dates. A month needs a valid year and month;
/// anything else falls back to the month containing `today`.
#[instrument(level = "debug")]
pub fn resolve_period(selection: &PeriodSelection, today: NaiveDate) -> Result<ReportPeriod> {
    let custom = selection.period_type.as_deref() == Some("custom");

    if custom {
        if let (Some(start), Some(end)) = (selection.start_date, selection.end_date) {
            return custom_period(start, end);
        }
        debug!("Custom period without both dates, falling back to a month");
    }

    let first = match (selection.year, selection.month) {
        (Some(year), Some(month)) => NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_else(|| {
            debug!("Invalid year/month {}-{}, using current month", year, month);
            today
        }),
        _ => today,
    };

    month_period(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_defaults_to_current_month() {
        let period = resolve_period(&PeriodSelection::default(), date(2026, 10, 14)).unwrap();

        assert_eq!(period.period_type, PeriodType::Month);
        assert_eq!(period.start, date(2026, 10, 1));
        assert_eq!(period.end, date(2026, 11, 1));
        assert_eq!(period.label, "October 2026");
        assert_eq!(period.selected_year, 2026);
        assert_eq!(period.selected_month, 10);
    }

    #[test]
    fn test_selected_month() {
        let selection = PeriodSelection {
            year: Some(2025),
            month: Some(2),
            ..Default::default()
        };
        let period = resolve_period(&selection, date(2026, 10, 14)).unwrap();

        assert_eq!(period.start, date(2025, 2, 1));
        assert_eq!(period.end, date(2025, 3, 1));
        assert_eq!(period.label, "February 2025");
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let selection = PeriodSelection {
            year: Some(2025),
            month: Some(12),
            ..Default::default()
        };
        let period = resolve_period(&selection, date(2026, 10, 14)).unwrap();

        assert_eq!(period.start, date(2025, 12, 1));
        assert_eq!(period.end, date(2026, 1, 1));
    }

    #[test]
    fn test_invalid_month_falls_back_to_today() {
        let selection = PeriodSelection {
            year: Some(2025),
            month: Some(13),
            ..Default::default()
        };
        let period = resolve_period(&selection, date(2026, 10, 14)).unwrap();

        assert_eq!(period.start, date(2026, 10, 1));
    }

    #[test]
    fn test_year_without_month_is_ignored() {
        let selection = PeriodSelection {
            year: Some(2024),
            ..Default::default()
        };
        let period = resolve_period(&selection, date(2026, 10, 14)).unwrap();

        assert_eq!(period.start, date(2026, 10, 1));
    }

    #[test]
    fn test_custom_range_includes_end_day() {
        let selection = PeriodSelection {
            period_type: Some("custom".to_string()),
            start_date: Some(date(2026, 3, 5)),
            end_date: Some(date(2026, 3, 20)),
            ..Default::default()
        };
        let period = resolve_period(&selection, date(2026, 10, 14)).unwrap();

        assert_eq!(period.period_type, PeriodType::Custom);
        assert_eq!(period.start, date(2026, 3, 5));
        assert_eq!(period.end, date(2026, 3, 21));
        assert!(period.contains(date(2026, 3, 20)));
        assert!(!period.contains(date(2026, 3, 21)));
        assert_eq!(period.label, "05.03.2026 - 20.03.2026");
    }

    #[test]
    fn test_single_day_custom_range() {
        let period = custom_period(date(2026, 1, 1), date(2026, 1, 1)).unwrap();
        assert_eq!(period.end, date(2026, 1, 2));
        assert_eq!(period.label, "01.01.2026 - 01.01.2026");
    }

    #[test]
    fn test_custom_without_end_date_uses_month() {
        let selection = PeriodSelection {
            period_type: Some("custom".to_string()),
            start_date: Some(date(2026, 3, 5)),
            year: Some(2026),
            month: Some(4),
            ..Default::default()
        };
        let period = resolve_period(&selection, date(2026, 10, 14)).unwrap();

        assert_eq!(period.period_type, PeriodType::Month);
        assert_eq!(period.start, date(2026, 4, 1));
    }

    #[test]
    fn test_dates_without_custom_type_are_ignored() {
        let selection = PeriodSelection {
            start_date: Some(date(2026, 3, 5)),
            end_date: Some(date(2026, 3, 20)),
            ..Default::default()
        };
        let period = resolve_period(&selection, date(2026, 10, 14)).unwrap();

        assert_eq!(period.period_type, PeriodType::Month);
        assert_eq!(period.start, date(2026, 10, 1));
    }

    #[test]
    fn test_reversed_custom_range_is_rejected() {
        let result = custom_period(date(2026, 3, 20), date(2026, 3, 5));
        assert!(matches!(result, Err(ComputeError::InvalidPeriod(_))));
    }

    #[test]
    fn test_year_interval() {
        let (start, end) = year_interval(2025).unwrap();
        assert_eq!(start, date(2025, 1, 1));
        assert_eq!(end, date(2026, 1, 1));
    }

    #[test]
    fn test_year_filter_parse() {
        assert_eq!(YearFilter::parse(None), YearFilter::All);
        assert_eq!(YearFilter::parse(Some("all")), YearFilter::All);
        assert_eq!(YearFilter::parse(Some("2024")), YearFilter::Year(2024));
        assert_eq!(YearFilter::parse(Some("twenty")), YearFilter::All);
        assert_eq!(YearFilter::Year(2024).label(), "Year 2024");
        assert_eq!(YearFilter::All.label(), "All periods");
    }

    #[test]
    fn test_month_name_bounds() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }
}
