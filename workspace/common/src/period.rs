use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How a report period was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// A calendar month, the current one unless year and month were given.
    Month,
    /// An explicit, inclusive range of days.
    Custom,
}

/// A resolved reporting period.
///
/// The interval is half-open: `start` is included, `end` is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReportPeriod {
    pub period_type: PeriodType,
    /// First day of the period
    pub start: NaiveDate,
    /// First day after the period
    pub end: NaiveDate,
    /// Human readable label ("October 2026", "01.10.2026 - 15.10.2026")
    pub label: String,
    /// Year of the period start
    pub selected_year: i32,
    /// Month (1-12) of the period start
    pub selected_month: u32,
}

impl ReportPeriod {
    /// Whether the date falls inside `[start, end)`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Last day that still belongs to the period.
    pub fn last_day(&self) -> NaiveDate {
        self.end - Duration::days(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn october() -> ReportPeriod {
        ReportPeriod {
            period_type: PeriodType::Month,
            start: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            label: "October 2026".to_string(),
            selected_year: 2026,
            selected_month: 10,
        }
    }

    #[test]
    fn test_contains_is_half_open() {
        let period = october();
        assert!(period.contains(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()));
        assert!(period.contains(NaiveDate::from_ymd_opt(2026, 10, 31).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2026, 11, 1).unwrap()));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2026, 9, 30).unwrap()));
    }

    #[test]
    fn test_last_day() {
        assert_eq!(
            october().last_day(),
            NaiveDate::from_ymd_opt(2026, 10, 31).unwrap()
        );
    }

    #[test]
    fn test_period_type_serialization() {
        let json = serde_json::to_string(&PeriodType::Custom).unwrap();
        assert_eq!(json, "\"custom\"");
        let parsed: PeriodType = serde_json::from_str("\"month\"").unwrap();
        assert_eq!(parsed, PeriodType::Month);
    }
}
