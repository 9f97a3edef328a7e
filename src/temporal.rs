//! Calendar and time-bucket derivation for a publish timestamp.
//!
//! Everything here is a pure function of one timestamp and is derived in UTC.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc, Weekday};

use crate::model::{TimePeriod, WorkDayType};

/// Calendar fields derived from a single publish timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalFields {
    pub timestamp_millis: i64,
    pub date: String,
    pub time: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub quarter: u32,
    pub week_of_month: u32,
    pub iso_week: String,
    pub day_of_week: u32,
    pub day_name: String,
    pub month_name: String,
    pub hour: u32,
    pub is_weekend: bool,
    pub work_day_type: WorkDayType,
    pub time_period: TimePeriod,
    pub is_month_start: bool,
    pub is_month_end: bool,
    pub is_year_start: bool,
    pub is_year_end: bool,
    pub date_key: String,
    pub month_key: String,
    pub quarter_key: String,
    pub year_key: String,
}

impl TemporalFields {
    /// Derive all calendar fields from a publish timestamp.
    pub fn derive(published_at: DateTime<Utc>) -> Self {
        let date = published_at.date_naive();
        let year = date.year();
        let month = date.month();
        let day = date.day();
        let quarter = quarter_of(month);
        let hour = published_at.hour();
        let is_weekend = is_weekend(date.weekday());

        Self {
            timestamp_millis: published_at.timestamp_millis(),
            date: date.format("%Y-%m-%d").to_string(),
            time: published_at.format("%H:%M:%S").to_string(),
            year,
            month,
            day,
            quarter,
            week_of_month: day.div_ceil(7),
            iso_week: iso_week_key(date),
            day_of_week: date.weekday().num_days_from_sunday(),
            day_name: date.format("%A").to_string(),
            month_name: date.format("%B").to_string(),
            hour,
            is_weekend,
            work_day_type: if is_weekend {
                WorkDayType::Weekend
            } else {
                WorkDayType::Weekday
            },
            time_period: TimePeriod::from_hour(hour),
            is_month_start: day <= 7,
            is_month_end: day > 23,
            is_year_start: month == 1,
            is_year_end: month == 12,
            date_key: date.format("%Y%m%d").to_string(),
            month_key: format!("{year}-{month:02}"),
            quarter_key: format!("{year}-Q{quarter}"),
            year_key: year.to_string(),
        }
    }
}

/// ISO-8601 week key, `YYYY-Www`.
///
/// The year is the ISO week-numbering year, which differs from the calendar
/// year for dates near January 1st (2024-12-30 is `2025-W01`).
pub fn iso_week_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{:04}-W{:02}", week.year(), week.week())
}

/// Calendar quarter (1-4) of a month (1-12).
pub fn quarter_of(month: u32) -> u32 {
    month.div_ceil(3)
}

fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}
