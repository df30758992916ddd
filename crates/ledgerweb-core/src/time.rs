//! Fixed time zone used for weekdays and the current year

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, TimeZone, Utc};

const WEEKDAY_LABELS: [&str; 7] = ["(日)", "(月)", "(火)", "(水)", "(木)", "(金)", "(土)"];

/// Label for a stored day-of-week index (0 = Sunday); "" when out of range
pub fn weekday_label(day_of_week: u32) -> &'static str {
    WEEKDAY_LABELS.get(day_of_week as usize).copied().unwrap_or("")
}

#[derive(Debug, Clone)]
pub struct LedgerClock {
    offset: FixedOffset,
    pinned: Option<DateTime<Utc>>,
}

impl LedgerClock {
    /// Clock for a zone `hours` east of UTC; out-of-range offsets fall back to UTC
    pub fn new(hours: i32) -> Self {
        let offset = FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix());
        Self { offset, pinned: None }
    }

    /// Clock that always reports `now` as the current instant
    pub fn pinned(hours: i32, now: DateTime<Utc>) -> Self {
        Self {
            pinned: Some(now),
            ..Self::new(hours)
        }
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.pinned.unwrap_or_else(Utc::now).with_timezone(&self.offset)
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    pub fn current_year(&self) -> i32 {
        self.now().year()
    }

    /// 0 = Sunday .. 6 = Saturday, for midnight of `date` in this zone
    pub fn day_of_week(&self, date: NaiveDate) -> u32 {
        date.and_hms_opt(0, 0, 0)
            .and_then(|midnight| self.offset.from_local_datetime(&midnight).single())
            .map(|local| local.weekday())
            .unwrap_or_else(|| date.weekday())
            .num_days_from_sunday()
    }

    /// Selectable years: current year down to `start_year`
    pub fn year_list(&self, start_year: i32) -> Vec<i32> {
        (start_year..=self.current_year()).rev().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_label() {
        assert_eq!(weekday_label(0), "(日)");
        assert_eq!(weekday_label(6), "(土)");
        assert_eq!(weekday_label(7), "");
    }

    #[test]
    fn test_day_of_week() {
        let clock = LedgerClock::new(9);
        // 2024-03-10 was a Sunday, 2024-03-16 a Saturday
        assert_eq!(clock.day_of_week(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()), 0);
        assert_eq!(clock.day_of_week(NaiveDate::from_ymd_opt(2024, 3, 16).unwrap()), 6);
        assert_eq!(clock.day_of_week(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()), 4);
    }

    #[test]
    fn test_current_year_uses_offset() {
        // 2024-12-31T20:00Z is already 2025 in UTC+9
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 20, 0, 0).unwrap();
        assert_eq!(LedgerClock::pinned(9, now).current_year(), 2025);
        assert_eq!(LedgerClock::pinned(0, now).current_year(), 2024);
        assert_eq!(
            LedgerClock::pinned(9, now).today(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_year_list_descending() {
        let now = Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap();
        let clock = LedgerClock::pinned(9, now);
        assert_eq!(clock.year_list(2017), vec![2020, 2019, 2018, 2017]);
        assert_eq!(clock.year_list(2020), vec![2020]);
        assert!(clock.year_list(2021).is_empty());
    }
}
