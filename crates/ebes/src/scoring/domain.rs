use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(
    /// Identifier of a platform user (any of the four user roles).
    UserId
);
id_newtype!(ClientId);
id_newtype!(TeamId);
id_newtype!(
    /// Identifier of a job requisition, not of an RBAC role.
    RoleId
);
id_newtype!(EntryId);

/// How quickly a candidate was submitted after the requisition opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionSpeed {
    #[serde(rename = "6h")]
    Within6h,
    #[serde(rename = "24h")]
    Within24h,
    #[serde(rename = "after_24h")]
    After24h,
}

impl SubmissionSpeed {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Within6h => "Within 6 hours",
            Self::Within24h => "Within 24 hours",
            Self::After24h => "After 24 hours",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Submission,
    Interview,
    Deal,
    Dropout,
}

impl EntryKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Submission => "Submission",
            Self::Interview => "Interview",
            Self::Deal => "Deal",
            Self::Dropout => "Dropout",
        }
    }
}

/// Interview stage, transported as the integers 1, 2 and 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum InterviewRound {
    First,
    Second,
    Third,
}

impl InterviewRound {
    pub const fn ordered() -> [Self; 3] {
        [Self::First, Self::Second, Self::Third]
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }
}

impl TryFrom<u8> for InterviewRound {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            3 => Ok(Self::Third),
            other => Err(format!("interview round must be 1, 2 or 3 (got {other})")),
        }
    }
}

impl From<InterviewRound> for u8 {
    fn from(value: InterviewRound) -> Self {
        value.number()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleStatus {
    Active,
    Deal,
    Lost,
    OnHold,
    Cancelled,
    NoAnswer,
}

impl RoleStatus {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Active,
            Self::Deal,
            Self::Lost,
            Self::OnHold,
            Self::Cancelled,
            Self::NoAnswer,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Deal => "Deal",
            Self::Lost => "Lost",
            Self::OnHold => "On Hold",
            Self::Cancelled => "Cancelled",
            Self::NoAnswer => "No Answer",
        }
    }
}

/// One recorded recruiter action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: EntryId,
    pub recruiter_id: UserId,
    #[serde(default)]
    pub client_id: Option<ClientId>,
    #[serde(default)]
    pub team_id: Option<TeamId>,
    #[serde(default)]
    pub role_id: Option<RoleId>,
    #[serde(default)]
    pub account_manager_id: Option<UserId>,
    #[serde(default)]
    pub recruitment_manager_id: Option<UserId>,
    pub kind: EntryKind,
    #[serde(default)]
    pub submission_speed: Option<SubmissionSpeed>,
    #[serde(default)]
    pub interview_round: Option<InterviewRound>,
    #[serde(default)]
    pub submission_date: Option<NaiveDate>,
    #[serde(default)]
    pub dropout_role_id: Option<RoleId>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// A job requisition owned by exactly one account manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: RoleId,
    #[serde(default)]
    pub role_code: String,
    pub client_id: ClientId,
    pub team_id: TeamId,
    pub account_manager_id: UserId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<RoleStatus>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl RoleRecord {
    pub fn has_status(&self, status: RoleStatus) -> bool {
        self.status == Some(status)
    }

    pub fn created_on(&self) -> Option<NaiveDate> {
        self.created_at.map(|at| at.date())
    }

    pub fn updated_on(&self) -> Option<NaiveDate> {
        self.updated_at.map(|at| at.date())
    }
}

/// Batch of interviews an account manager logged against a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewLog {
    pub role_id: RoleId,
    #[serde(default)]
    pub round: Option<InterviewRound>,
    pub count: u32,
    #[serde(default)]
    pub entry_month: Option<YearMonth>,
}

/// Calendar month key rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> u32 {
        self.month
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(self) -> NaiveDate {
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        next.and_then(|day| day.pred_opt()).unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

impl std::str::FromStr for YearMonth {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("'{raw}' is not a YYYY-MM month");
        let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}
