//! JSON payloads returned by the tracker endpoints.

use serde::Serialize;

use crate::scoring::{
    AccountTag, ActivityEntry, AdminPerformanceLabel, ClientId, EntryCounts, EntryId,
    HealthLabel, MonthSnapshot, PerformanceLabel, RiskIndicators, RoleId, RoleRecord, TeamId,
    TrendPoint, UserId, YearMonth,
};

use super::domain::{Client, Team, UserRole, UserSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuccessView {
    pub success: bool,
}

impl SuccessView {
    pub const fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginView {
    pub success: bool,
    pub user: UserSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderStatusView {
    pub should_show: bool,
    pub current_month: YearMonth,
}

/// Requisition row on the account-manager roles screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleView {
    #[serde(flatten)]
    pub role: RoleRecord,
    pub client_name: Option<String>,
    pub team_name: Option<String>,
    pub interview_1_count: u32,
    pub interview_2_count: u32,
    pub interview_3_count: u32,
    pub total_interviews: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedRoleView {
    pub success: bool,
    pub id: RoleId,
    pub role_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientAnalyticsView {
    pub client_id: ClientId,
    pub client_name: String,
    pub client_code: String,
    pub total_roles: u32,
    pub active_roles: u32,
    pub deal_roles: u32,
    pub lost_roles: u32,
    pub on_hold_roles: u32,
    pub cancelled_roles: u32,
    pub no_answer_roles: u32,
    pub submission_count: u32,
    pub total_interviews: u32,
    pub interview_1_count: u32,
    pub interview_2_count: u32,
    pub interview_3_count: u32,
    pub roles_to_deal_conversion: f64,
    pub interview_to_deal_conversion: f64,
    pub stage_1_to_2_dropoff: f64,
    pub stage_2_to_3_dropoff: f64,
    pub current_month: MonthSnapshot,
    pub last_month: MonthSnapshot,
    pub roles_growth: i64,
    pub interviews_growth: i64,
    pub deals_growth: i64,
    /// Display form of the deal growth, e.g. `+100%`.
    pub deals_trend: String,
    pub health_score: i64,
    pub health_tag: AccountTag,
    #[serde(flatten)]
    pub risks: RiskIndicators,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnalyticsSummary {
    pub total_clients: u32,
    pub strong_accounts: u32,
    pub average_accounts: u32,
    pub at_risk_accounts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountAnalyticsView {
    pub clients: Vec<ClientAnalyticsView>,
    pub summary: AnalyticsSummary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodActivity {
    pub roles: u32,
    pub interviews: u32,
    pub deals: u32,
    pub lost: u32,
}

impl From<MonthSnapshot> for PeriodActivity {
    fn from(value: MonthSnapshot) -> Self {
        Self {
            roles: value.roles_created,
            interviews: value.interviews,
            deals: value.deals,
            lost: value.lost,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceOverview {
    pub total_roles: u32,
    pub active_roles: u32,
    pub non_active_roles: u32,
    pub total_interviews: u32,
    pub interview_1_count: u32,
    pub interview_2_count: u32,
    pub interview_3_count: u32,
    pub total_deals: u32,
    pub total_lost: u32,
    pub total_on_hold: u32,
    pub total_no_answer: u32,
    pub total_cancelled: u32,
    pub ebes_score: f64,
    pub performance_label: PerformanceLabel,
    pub current_month: PeriodActivity,
    pub last_month: PeriodActivity,
    pub roles_to_interviews_conversion: f64,
    pub interviews_to_deals_conversion: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientPerformanceView {
    pub client_id: ClientId,
    pub client_name: String,
    pub client_code: String,
    pub total_roles: u32,
    pub active_roles: u32,
    pub interview_1: u32,
    pub interview_2: u32,
    pub interview_3: u32,
    pub deals: u32,
    pub lost: u32,
    pub on_hold: u32,
    pub no_answer: u32,
    pub health: HealthLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamPerformanceView {
    pub team_id: TeamId,
    pub team_name: String,
    pub team_code: String,
    pub total_roles: u32,
    pub active_roles: u32,
    pub total_interviews: u32,
    pub total_deals: u32,
    pub total_lost: u32,
    pub performance_label: HealthLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountPerformanceView {
    pub overview: PerformanceOverview,
    pub client_performance: Vec<ClientPerformanceView>,
    pub team_performance: Vec<TeamPerformanceView>,
}

/// A client a recruiter works for, with the team they serve it through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementView {
    #[serde(flatten)]
    pub client: Client,
    pub team_id: TeamId,
    pub team_name: String,
    pub team_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenRoleView {
    #[serde(flatten)]
    pub role: RoleRecord,
    pub account_manager_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamInfoView {
    pub team: Team,
    pub recruitment_manager: Option<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealRoleView {
    #[serde(flatten)]
    pub role: RoleRecord,
    pub client_name: String,
    pub team_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmissionCreatedView {
    pub success: bool,
    pub id: EntryId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionView {
    #[serde(flatten)]
    pub entry: ActivityEntry,
    pub client_name: Option<String>,
    pub team_name: Option<String>,
    pub role_title: Option<String>,
    pub role_code: Option<String>,
    pub account_manager_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionListView {
    pub submissions: Vec<SubmissionView>,
    pub stats: EntryCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleRef {
    pub id: RoleId,
    pub title: String,
    pub role_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecruiterAnalyticsView {
    pub total_submissions: u32,
    pub total_interviews: u32,
    pub interview_1: u32,
    pub interview_2: u32,
    pub interview_3: u32,
    pub total_deals: u32,
    pub total_dropouts: u32,
    pub active_roles_count: u32,
    pub client_breakdown: Vec<NamedCount>,
    pub team_breakdown: Vec<NamedCount>,
    pub daily_trend: Vec<TrendPoint>,
    pub monthly_trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecruiterRosterView {
    #[serde(flatten)]
    pub recruiter: UserSummary,
    pub team_id: TeamId,
    pub team_name: String,
    pub team_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamBreakdownView {
    pub team_id: TeamId,
    pub team_name: String,
    pub team_code: String,
    pub total_roles: u32,
    pub active_roles: u32,
    pub interviews: u32,
    pub deals: u32,
    pub lost: u32,
    pub on_hold: u32,
    pub no_answer: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecruiterBreakdownView {
    pub recruiter_id: UserId,
    pub recruiter_name: String,
    pub recruiter_code: String,
    pub total_submissions: u32,
    pub interviews: u32,
    pub deals: u32,
    /// Dropouts recorded by the recruiter.
    pub lost_roles: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManagerAnalyticsView {
    pub total_teams: u32,
    pub total_recruiters: u32,
    pub total_active_roles: u32,
    pub total_non_active_roles: u32,
    pub total_interviews: u32,
    pub total_deals: u32,
    pub total_lost: u32,
    pub total_on_hold: u32,
    pub total_no_answer: u32,
    pub team_breakdown: Vec<TeamBreakdownView>,
    pub recruiter_breakdown: Vec<RecruiterBreakdownView>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpeedStats {
    pub total_submissions: u32,
    pub submission_6h: u32,
    pub submission_24h: u32,
    pub submission_after_24h: u32,
}

impl SpeedStats {
    pub fn from_counts(counts: &EntryCounts) -> Self {
        Self {
            total_submissions: counts.total,
            submission_6h: counts.submission_6h,
            submission_24h: counts.submission_24h,
            submission_after_24h: counts.submission_after_24h,
        }
    }

    pub fn absorb(&mut self, other: &Self) {
        self.total_submissions += other.total_submissions;
        self.submission_6h += other.submission_6h;
        self.submission_24h += other.submission_24h;
        self.submission_after_24h += other.submission_after_24h;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamStats {
    pub total_recruiters: u32,
    #[serde(flatten)]
    pub speeds: SpeedStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecruiterSpeedView {
    pub recruiter_user_id: UserId,
    pub recruiter_name: String,
    pub recruiter_code: String,
    #[serde(flatten)]
    pub speeds: SpeedStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamDetailView {
    pub team: Team,
    pub team_stats: TeamStats,
    pub recruiter_stats: Vec<RecruiterSpeedView>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PerformanceSummaryView {
    pub total_submissions: u32,
    pub total_recruiters: u32,
    pub teams: Vec<Team>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodedRef {
    pub id: i64,
    pub name: String,
    pub code: String,
}

impl From<&Team> for CodedRef {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id.0,
            name: team.name.clone(),
            code: team.team_code.clone(),
        }
    }
}

impl From<&Client> for CodedRef {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id.0,
            name: client.name.clone(),
            code: client.client_code.clone(),
        }
    }
}

/// One row on the admin performance screen. Role-specific counters are
/// omitted for users of other roles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsView {
    #[serde(rename = "user_id")]
    pub user_id: UserId,
    #[serde(rename = "user_code")]
    pub user_code: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub teams: Vec<CodedRef>,
    pub clients: Vec<CodedRef>,
    pub ebes_score: f64,
    pub performance_label: AdminPerformanceLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_submissions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interviews_1st: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interviews_2nd: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interviews_3rd: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_interviews: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deals: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropouts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_roles: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_active_roles: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_roles: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deals_closed_roles: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lost_roles: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_hold_roles: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_answer_roles: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_teams: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_recruiters: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_deals: Option<u32>,
}

impl UserStatsView {
    pub fn new(
        user: &UserSummary,
        teams: Vec<CodedRef>,
        clients: Vec<CodedRef>,
        ebes_score: f64,
        performance_label: AdminPerformanceLabel,
    ) -> Self {
        Self {
            user_id: user.id,
            user_code: user.user_code.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            teams,
            clients,
            ebes_score,
            performance_label,
            total_submissions: None,
            interviews_1st: None,
            interviews_2nd: None,
            interviews_3rd: None,
            total_interviews: None,
            deals: None,
            dropouts: None,
            active_roles: None,
            non_active_roles: None,
            total_roles: None,
            deals_closed_roles: None,
            lost_roles: None,
            on_hold_roles: None,
            no_answer_roles: None,
            managed_teams: None,
            total_recruiters: None,
            total_deals: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub name: String,
    pub team: String,
    pub ebes_score: f64,
    pub performance_label: PerformanceLabel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardsView {
    pub recruiters: Vec<LeaderboardEntry>,
    pub account_managers: Vec<LeaderboardEntry>,
    pub recruitment_managers: Vec<LeaderboardEntry>,
}
