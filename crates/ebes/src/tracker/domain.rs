use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::scoring::{
    ClientId, EntryKind, InterviewRound, RoleId, RoleStatus, ScoreKind, SubmissionSpeed, TeamId,
    UserId, YearMonth,
};

/// RBAC role of a platform user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    AccountManager,
    RecruitmentManager,
    Recruiter,
}

impl UserRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::AccountManager => "account_manager",
            Self::RecruitmentManager => "recruitment_manager",
            Self::Recruiter => "recruiter",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::AccountManager => "Account Manager",
            Self::RecruitmentManager => "Recruitment Manager",
            Self::Recruiter => "Recruiter",
        }
    }

    /// Formula used for this role's dashboard score; admins are not scored.
    pub const fn score_kind(self) -> Option<ScoreKind> {
        match self {
            Self::Admin => None,
            Self::AccountManager => Some(ScoreKind::AccountManager),
            Self::RecruitmentManager => Some(ScoreKind::RecruitmentManager),
            Self::Recruiter => Some(ScoreKind::Recruiter),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "admin" => Some(Self::Admin),
            "account_manager" => Some(Self::AccountManager),
            "recruitment_manager" => Some(Self::RecruitmentManager),
            "recruiter" => Some(Self::Recruiter),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub user_code: String,
    pub name: String,
    pub email: String,
    /// Stored as given; never serialized back out.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub role: UserRole,
    pub is_active: bool,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            user_code: self.user_code.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub user_code: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

/// Caller identity resolved once per request and passed to every service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub client_code: String,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub team_code: String,
    pub name: String,
}

/// Client and team a recruiter works for; a recruiter may hold several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub recruiter_id: UserId,
    pub client_id: ClientId,
    pub team_id: TeamId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Assignments {
    pub clients: Vec<Client>,
    pub teams: Vec<Team>,
}

/// Raised when a candidate drops out so the owning account manager can
/// re-evaluate the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingStatusReview {
    pub role_id: RoleId,
    pub previous_status: Option<RoleStatus>,
    pub reason: String,
    pub created_by: UserId,
    pub created_at: NaiveDateTime,
}

pub const DROPOUT_REVIEW_REASON: &str = "Dropout - Candidate refused offer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyReminder {
    pub user_id: UserId,
    pub month: YearMonth,
    pub confirmed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRoleRequest {
    pub client_id: ClientId,
    pub team_id: TeamId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<RoleStatus>,
}

impl RoleUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterviewLogRequest {
    pub interview_round: InterviewRound,
    pub interview_count: u32,
}

/// Recruiter entry as posted by the dashboard form.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default)]
    pub client_id: Option<ClientId>,
    #[serde(default)]
    pub team_id: Option<TeamId>,
    #[serde(default)]
    pub role_id: Option<RoleId>,
    #[serde(default)]
    pub submission_type: Option<SubmissionSpeed>,
    pub submission_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub entry_type: Option<EntryKind>,
    #[serde(default)]
    pub interview_level: Option<InterviewRound>,
    #[serde(default)]
    pub dropout_role_id: Option<RoleId>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TeamAssignmentRequest {
    pub user_id: UserId,
    pub team_id: TeamId,
}

/// Client assignment; recruiters also need the team they serve the client with.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ClientAssignmentRequest {
    pub user_id: UserId,
    pub client_id: ClientId,
    #[serde(default)]
    pub team_id: Option<TeamId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_never_leaves_the_process() {
        let user = User {
            id: UserId(1),
            user_code: "USR-0001".to_string(),
            name: "Dana Reyes".to_string(),
            email: "dana@example.com".to_string(),
            password: "hunter2".to_string(),
            role: UserRole::Recruiter,
            is_active: true,
        };
        let json = serde_json::to_value(&user).expect("serializes");
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "recruiter");
    }

    #[test]
    fn admins_have_no_score_kind() {
        assert_eq!(UserRole::Admin.score_kind(), None);
        assert_eq!(
            UserRole::parse("Recruitment-Manager"),
            Some(UserRole::RecruitmentManager)
        );
    }

    #[test]
    fn submission_request_reads_dashboard_payload() {
        let request: SubmissionRequest = serde_json::from_value(serde_json::json!({
            "role_id": 4,
            "submission_type": "24h",
            "submission_date": "2026-03-02",
            "entry_type": "interview",
            "interview_level": 2
        }))
        .expect("payload parses");
        assert_eq!(request.role_id, Some(RoleId(4)));
        assert_eq!(request.interview_level, Some(InterviewRound::Second));
        assert_eq!(request.entry_type, Some(EntryKind::Interview));
    }
}
