use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::domain::YearMonth;

/// Inclusive calendar-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Builds a window only when both bounds are supplied.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        match (start, end) {
            (Some(start), Some(end)) => Some(Self { start, end }),
            _ => None,
        }
    }

    pub const fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn month(month: YearMonth) -> Self {
        Self {
            start: month.first_day(),
            end: month.last_day(),
        }
    }

    pub fn current_month(today: NaiveDate) -> Self {
        Self::month(YearMonth::of(today))
    }

    pub fn previous_month(today: NaiveDate) -> Self {
        Self::month(YearMonth::of(today).previous())
    }

    /// Sunday-to-Saturday week containing `today`.
    pub fn current_week(today: NaiveDate) -> Self {
        let offset = today.weekday().num_days_from_sunday() as i64;
        let start = today - Duration::days(offset);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    /// From `days` days before `today` through `today`, so it spans
    /// `days + 1` calendar days.
    pub fn trailing_days(today: NaiveDate, days: u32) -> Self {
        Self {
            start: today - Duration::days(days as i64),
            end: today,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn contains_timestamp(&self, at: NaiveDateTime) -> bool {
        self.contains(at.date())
    }

    /// Whether an optional date falls in an optional window. A missing
    /// window admits everything; a missing date is never inside a window.
    pub fn admits(window: Option<&Self>, date: Option<NaiveDate>) -> bool {
        match window {
            None => true,
            Some(window) => date.map(|day| window.contains(day)).unwrap_or(false),
        }
    }

    pub fn first_month(&self) -> YearMonth {
        YearMonth::of(self.start)
    }

    pub fn last_month(&self) -> YearMonth {
        YearMonth::of(self.end)
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// Named windows offered by the dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePreset {
    Today,
    ThisWeek,
    ThisMonth,
    LastMonth,
    Custom,
    All,
}

impl DatePreset {
    /// Resolves the preset against `today`; `Custom` needs both bounds and
    /// otherwise falls back to no window at all.
    pub fn resolve(
        self,
        today: NaiveDate,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Option<DateRange> {
        match self {
            Self::Today => Some(DateRange::single_day(today)),
            Self::ThisWeek => Some(DateRange::current_week(today)),
            Self::ThisMonth => Some(DateRange::current_month(today)),
            Self::LastMonth => Some(DateRange::previous_month(today)),
            Self::Custom => DateRange::from_bounds(start, end),
            Self::All => None,
        }
    }
}
