//! Query-string shapes accepted by the dashboards and their resolution into
//! the filters the service works with.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::Deserialize;

use crate::scoring::{
    ClientId, DatePreset, DateRange, EntryKind, RoleId, RoleStatus, TeamId, UserId,
};

use super::domain::UserRole;
use super::repository::StatusFilter;

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn is_blank(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all")
}

/// Blank values are treated as absent; dashboards send `client_id=` for "any".
pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

pub(crate) fn deserialize_optional_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: From<i64>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt {
        Some(value) if !is_blank(&value) => value
            .trim()
            .parse::<i64>()
            .map(|id| Some(T::from(id)))
            .map_err(|_| serde::de::Error::custom(format!("'{value}' is not a numeric id"))),
        _ => Ok(None),
    }
}

/// Deserializes a string-backed enum, mapping blank and `all` to `None`.
pub(crate) fn deserialize_optional_choice<'de, D, T>(
    deserializer: D,
) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: DeserializeOwned,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt {
        Some(value) if !is_blank(&value) => {
            let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
            T::deserialize(normalized.into_deserializer()).map(Some)
        }
        _ => Ok(None),
    }
}

/// Optional `today=YYYY-MM-DD` override accepted by every endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TodayQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub today: Option<NaiveDate>,
}

impl TodayQuery {
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Timestamp for new records; keeps the wall-clock time when the date is overridden.
    pub fn now(&self) -> NaiveDateTime {
        let now = Local::now().naive_local();
        match self.today {
            Some(day) => day.and_time(now.time()),
            None => now,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WindowQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
}

impl WindowQuery {
    pub fn window(&self) -> Option<DateRange> {
        DateRange::from_bounds(self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleListQuery {
    #[serde(default)]
    pub status: Option<String>,
}

impl RoleListQuery {
    pub fn status_filter(&self) -> Option<StatusFilter> {
        match self.status.as_deref().map(str::trim) {
            Some("active") => Some(StatusFilter::Active),
            Some("non-active") | Some("non_active") => Some(StatusFilter::NonActive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PerformanceQuery {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub client_id: Option<ClientId>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub team_id: Option<TeamId>,
    #[serde(default, deserialize_with = "deserialize_optional_choice")]
    pub status: Option<RoleStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_choice")]
    pub date_range: Option<DatePreset>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
}

/// Resolved account-manager performance filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerformanceFilter {
    pub client_id: Option<ClientId>,
    pub team_id: Option<TeamId>,
    pub status: Option<RoleStatus>,
    pub window: Option<DateRange>,
}

impl PerformanceQuery {
    /// Explicit bounds win over a named range.
    pub fn resolve(&self, today: NaiveDate) -> PerformanceFilter {
        let window = DateRange::from_bounds(self.start_date, self.end_date).or_else(|| {
            self.date_range
                .and_then(|preset| preset.resolve(today, self.start_date, self.end_date))
        });
        PerformanceFilter {
            client_id: self.client_id,
            team_id: self.team_id,
            status: self.status,
            window,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SubmissionListQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub client_id: Option<ClientId>,
}

impl SubmissionListQuery {
    pub fn window(&self) -> Option<DateRange> {
        DateRange::from_bounds(self.start_date, self.end_date)
    }
}

/// Scope of the recruiter's running score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EbesScope {
    /// Current calendar month.
    Date,
    /// Entries for one client, all time.
    Client,
    /// Every entry on record.
    #[default]
    Combined,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct EbesQuery {
    #[serde(default, deserialize_with = "deserialize_optional_choice")]
    pub filter: Option<EbesScope>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub client_id: Option<ClientId>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RecruiterAnalyticsQuery {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub client_id: Option<ClientId>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub role_id: Option<RoleId>,
    #[serde(default, deserialize_with = "deserialize_optional_choice")]
    pub entry_type: Option<EntryKind>,
    #[serde(default, deserialize_with = "deserialize_optional_choice")]
    pub date_range: Option<DatePreset>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecruiterAnalyticsFilter {
    pub client_id: Option<ClientId>,
    pub role_id: Option<RoleId>,
    pub kind: Option<EntryKind>,
    pub window: Option<DateRange>,
}

impl RecruiterAnalyticsQuery {
    /// Defaults to the current month; an incomplete custom range means no window.
    pub fn resolve(&self, today: NaiveDate) -> RecruiterAnalyticsFilter {
        let preset = self.date_range.unwrap_or(DatePreset::ThisMonth);
        RecruiterAnalyticsFilter {
            client_id: self.client_id,
            role_id: self.role_id,
            kind: self.entry_type,
            window: preset.resolve(today, self.start_date, self.end_date),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePeriod {
    #[default]
    CurrentMonth,
    LastMonth,
    Custom,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ScorePeriodQuery {
    #[serde(default, deserialize_with = "deserialize_optional_choice")]
    pub filter: Option<ScorePeriod>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
}

impl ScorePeriodQuery {
    pub fn window(&self, today: NaiveDate) -> Option<DateRange> {
        match self.filter.unwrap_or_default() {
            ScorePeriod::CurrentMonth => Some(DateRange::current_month(today)),
            ScorePeriod::LastMonth => Some(DateRange::previous_month(today)),
            ScorePeriod::Custom => DateRange::from_bounds(self.start_date, self.end_date),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ManagerAnalyticsQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub team_id: Option<TeamId>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub client_id: Option<ClientId>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub recruiter_id: Option<UserId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManagerAnalyticsFilter {
    pub team_id: Option<TeamId>,
    pub client_id: Option<ClientId>,
    pub recruiter_id: Option<UserId>,
    pub window: Option<DateRange>,
}

impl ManagerAnalyticsQuery {
    pub fn resolve(&self) -> ManagerAnalyticsFilter {
        ManagerAnalyticsFilter {
            team_id: self.team_id,
            client_id: self.client_id,
            recruiter_id: self.recruiter_id,
            window: DateRange::from_bounds(self.start_date, self.end_date),
        }
    }
}

/// Admin performance screen filters, sent in camelCase.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStatsQuery {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub team_id: Option<TeamId>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub client_id: Option<ClientId>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerformanceStatsFilter {
    pub role: Option<UserRole>,
    pub user_name: Option<String>,
    pub team_id: Option<TeamId>,
    pub client_id: Option<ClientId>,
    pub window: Option<DateRange>,
}

impl PerformanceStatsQuery {
    pub fn resolve(&self) -> PerformanceStatsFilter {
        PerformanceStatsFilter {
            role: self.role.as_deref().and_then(UserRole::parse),
            user_name: self
                .user_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_lowercase),
            team_id: self.team_id,
            client_id: self.client_id,
            window: DateRange::from_bounds(self.start_date, self.end_date),
        }
    }
}
