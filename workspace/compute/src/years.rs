use chrono::{Datelike, NaiveDate};

/// Distinct years of the given dates, newest first.
pub fn available_years<I>(dates: I) -> Vec<i32>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut years: Vec<i32> = dates.into_iter().map(|d| d.year()).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Like [`available_years`] but never empty: without dates the year of `today` is used.
pub fn years_or_current<I>(dates: I, today: NaiveDate) -> Vec<i32>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let years = available_years(dates);
    if years.is_empty() {
        vec![today.year()]
    } else {
        years
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_available_years() {
        let dates = vec![date(2024, 5, 1), date(2026, 1, 3), date(2024, 12, 31), date(2025, 7, 7)];
        assert_eq!(available_years(dates), vec![2026, 2025, 2024]);
    }

    #[test]
    fn test_empty_falls_back_to_current_year() {
        assert!(available_years(Vec::new()).is_empty());
        assert_eq!(years_or_current(Vec::new(), date(2026, 10, 14)), vec![2026]);
        assert_eq!(years_or_current(vec![date(2023, 1, 1)], date(2026, 10, 14)), vec![2023]);
    }
}
