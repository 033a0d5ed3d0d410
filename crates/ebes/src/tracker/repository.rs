use crate::scoring::{
    ActivityEntry, ClientId, EntryKind, InterviewLog, RoleId, RoleRecord, RoleStatus, TeamId,
    UserId, YearMonth,
};

use super::domain::{
    Client, MonthlyReminder, PendingStatusReview, Placement, Team, User,
};

/// Which statuses a role listing should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Active,
    NonActive,
    Exactly(RoleStatus),
}

impl StatusFilter {
    pub fn matches(&self, role: &RoleRecord) -> bool {
        match self {
            Self::Active => role.has_status(RoleStatus::Active),
            Self::NonActive => !role.has_status(RoleStatus::Active),
            Self::Exactly(status) => role.has_status(*status),
        }
    }
}

/// Non-date role selection. Date windows are applied by the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleFilter {
    pub account_manager_id: Option<UserId>,
    pub client_id: Option<ClientId>,
    pub team_id: Option<TeamId>,
    /// Restricts to any of these teams when set, even if empty.
    pub team_ids: Option<Vec<TeamId>>,
    pub status: Option<StatusFilter>,
}

impl RoleFilter {
    pub fn owned_by(account_manager_id: UserId) -> Self {
        Self {
            account_manager_id: Some(account_manager_id),
            ..Self::default()
        }
    }

    pub fn in_teams(team_ids: Vec<TeamId>) -> Self {
        Self {
            team_ids: Some(team_ids),
            ..Self::default()
        }
    }

    pub fn matches(&self, role: &RoleRecord) -> bool {
        self.account_manager_id
            .map_or(true, |id| role.account_manager_id == id)
            && self.client_id.map_or(true, |id| role.client_id == id)
            && self.team_id.map_or(true, |id| role.team_id == id)
            && self
                .team_ids
                .as_ref()
                .map_or(true, |ids| ids.contains(&role.team_id))
            && self.status.map_or(true, |status| status.matches(role))
    }
}

/// Non-date entry selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub recruiter_id: Option<UserId>,
    pub account_manager_id: Option<UserId>,
    pub recruitment_manager_id: Option<UserId>,
    pub client_id: Option<ClientId>,
    pub team_id: Option<TeamId>,
    pub team_ids: Option<Vec<TeamId>>,
    pub role_id: Option<RoleId>,
    pub kind: Option<EntryKind>,
}

impl EntryFilter {
    pub fn by_recruiter(recruiter_id: UserId) -> Self {
        Self {
            recruiter_id: Some(recruiter_id),
            ..Self::default()
        }
    }

    pub fn in_teams(team_ids: Vec<TeamId>) -> Self {
        Self {
            team_ids: Some(team_ids),
            ..Self::default()
        }
    }

    pub fn matches(&self, entry: &ActivityEntry) -> bool {
        self.recruiter_id.map_or(true, |id| entry.recruiter_id == id)
            && self
                .account_manager_id
                .map_or(true, |id| entry.account_manager_id == Some(id))
            && self
                .recruitment_manager_id
                .map_or(true, |id| entry.recruitment_manager_id == Some(id))
            && self.client_id.map_or(true, |id| entry.client_id == Some(id))
            && self.team_id.map_or(true, |id| entry.team_id == Some(id))
            && self.team_ids.as_ref().map_or(true, |ids| {
                entry.team_id.map_or(false, |team| ids.contains(&team))
            })
            && self.role_id.map_or(true, |id| entry.role_id == Some(id))
            && self.kind.map_or(true, |kind| entry.kind == kind)
    }
}

/// Storage abstraction so the tracker services can be exercised in isolation.
///
/// Each mutating call is one atomic step; callers never hold a transaction
/// across calls.
pub trait TrackerRepository: Send + Sync {
    fn user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    fn user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    fn users(&self) -> Result<Vec<User>, RepositoryError>;

    fn clients(&self) -> Result<Vec<Client>, RepositoryError>;
    fn teams(&self) -> Result<Vec<Team>, RepositoryError>;

    /// Teams a user belongs to (managers and recruiters alike).
    fn user_teams(&self, user: UserId) -> Result<Vec<Team>, RepositoryError>;
    fn user_clients(&self, user: UserId) -> Result<Vec<Client>, RepositoryError>;
    fn team_members(&self, team: TeamId) -> Result<Vec<User>, RepositoryError>;
    fn assign_team(&self, user: UserId, team: TeamId) -> Result<(), RepositoryError>;
    fn unassign_team(&self, user: UserId, team: TeamId) -> Result<(), RepositoryError>;
    fn assign_client(&self, user: UserId, client: ClientId) -> Result<(), RepositoryError>;
    fn unassign_client(&self, user: UserId, client: ClientId) -> Result<(), RepositoryError>;
    fn placements(&self, recruiter: UserId) -> Result<Vec<Placement>, RepositoryError>;
    fn add_placement(&self, placement: Placement) -> Result<(), RepositoryError>;

    fn roles(&self, filter: &RoleFilter) -> Result<Vec<RoleRecord>, RepositoryError>;
    fn role(&self, id: RoleId) -> Result<Option<RoleRecord>, RepositoryError>;
    /// Stores a new role; the store assigns `id` and `role_code`.
    fn insert_role(&self, role: RoleRecord) -> Result<RoleRecord, RepositoryError>;
    fn update_role(&self, role: RoleRecord) -> Result<(), RepositoryError>;
    /// Removes the role together with its interview logs.
    fn delete_role(&self, id: RoleId) -> Result<(), RepositoryError>;

    fn interview_logs(&self, roles: &[RoleId]) -> Result<Vec<InterviewLog>, RepositoryError>;
    fn insert_interview_log(&self, log: InterviewLog) -> Result<(), RepositoryError>;

    fn entries(&self, filter: &EntryFilter) -> Result<Vec<ActivityEntry>, RepositoryError>;
    /// Stores a new entry; the store assigns `id`.
    fn insert_entry(&self, entry: ActivityEntry) -> Result<ActivityEntry, RepositoryError>;

    fn insert_pending_review(&self, review: PendingStatusReview) -> Result<(), RepositoryError>;
    fn pending_reviews(&self, role: RoleId) -> Result<Vec<PendingStatusReview>, RepositoryError>;

    fn reminder(
        &self,
        user: UserId,
        month: YearMonth,
    ) -> Result<Option<MonthlyReminder>, RepositoryError>;
    /// Upserts the reminder for `month` as confirmed.
    fn confirm_reminder(
        &self,
        user: UserId,
        month: YearMonth,
    ) -> Result<MonthlyReminder, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
