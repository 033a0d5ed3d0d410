//! Dashboard operations, one file per user role.
//!
//! Every public operation takes the caller's [`Principal`] explicitly and
//! checks the user role itself, so the service can be driven without the
//! HTTP layer.

mod account_manager;
mod admin;
mod recruiter;
mod recruitment_manager;

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::http::StatusCode;

use crate::config::TrackerConfig;
use crate::scoring::{
    compute_score, ActivityBatch, ClientId, DateRange, InterviewLog, RoleRecord, ScoreResult,
    ScoringConfig, TeamId, UserId,
};

use super::domain::{Client, LoginRequest, Principal, Team, User, UserRole};
use super::repository::{EntryFilter, RepositoryError, RoleFilter, TrackerRepository};
use super::views::LoginView;

/// Service backing every dashboard endpoint.
pub struct TrackerService<R> {
    repository: Arc<R>,
    tracker: TrackerConfig,
    scoring: ScoringConfig,
}

impl<R> TrackerService<R>
where
    R: TrackerRepository + 'static,
{
    pub fn new(repository: Arc<R>, tracker: TrackerConfig, scoring: ScoringConfig) -> Self {
        Self {
            repository,
            tracker,
            scoring,
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Resolves the caller identity carried by a request.
    pub fn authenticate(&self, user_id: UserId) -> Result<Principal, TrackerError> {
        let user = self
            .repository
            .user(user_id)?
            .ok_or(TrackerError::Unauthorized)?;
        if !user.is_active {
            return Err(TrackerError::Deactivated);
        }
        Ok(Principal {
            user_id: user.id,
            role: user.role,
        })
    }

    pub fn login(&self, request: LoginRequest) -> Result<LoginView, TrackerError> {
        let email = request.email.trim().to_lowercase();
        let user = self
            .repository
            .user_by_email(&email)?
            .ok_or(TrackerError::InvalidCredentials)?;
        if !user.is_active {
            tracing::info!(user_id = %user.id, "login refused for deactivated account");
            return Err(TrackerError::Deactivated);
        }
        if user.password != request.password {
            return Err(TrackerError::InvalidCredentials);
        }
        tracing::info!(user_id = %user.id, role = user.role.as_str(), "user logged in");
        Ok(LoginView {
            success: true,
            user: user.summary(),
        })
    }

    /// Current EBES for any scored user, as the user's own dashboard shows it.
    pub fn score_user(
        &self,
        user: &User,
        window: Option<&DateRange>,
    ) -> Result<Option<ScoreResult>, TrackerError> {
        let Some(kind) = user.role.score_kind() else {
            return Ok(None);
        };
        let batch = self.activity_for(user)?;
        Ok(Some(compute_score(
            kind,
            &batch.snapshot(),
            window,
            &self.scoring,
        )))
    }

    /// Records that feed a user's score, scoped by their user role.
    pub(crate) fn activity_for(&self, user: &User) -> Result<ActivityBatch, TrackerError> {
        let batch = match user.role {
            UserRole::Recruiter => ActivityBatch {
                entries: self.repository.entries(&EntryFilter::by_recruiter(user.id))?,
                ..ActivityBatch::default()
            },
            UserRole::AccountManager => {
                let roles = self.repository.roles(&RoleFilter::owned_by(user.id))?;
                let interviews = self.interview_logs_for(&roles)?;
                ActivityBatch {
                    entries: Vec::new(),
                    roles,
                    interviews,
                }
            }
            UserRole::RecruitmentManager => {
                let team_ids = self.team_ids(user.id)?;
                if team_ids.is_empty() {
                    return Ok(ActivityBatch::default());
                }
                ActivityBatch {
                    entries: self
                        .repository
                        .entries(&EntryFilter::in_teams(team_ids.clone()))?,
                    roles: self.repository.roles(&RoleFilter::in_teams(team_ids))?,
                    interviews: Vec::new(),
                }
            }
            UserRole::Admin => ActivityBatch::default(),
        };
        Ok(batch)
    }

    pub(crate) fn interview_logs_for(
        &self,
        roles: &[RoleRecord],
    ) -> Result<Vec<InterviewLog>, TrackerError> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<_> = roles.iter().map(|role| role.id).collect();
        Ok(self.repository.interview_logs(&ids)?)
    }

    pub(crate) fn team_ids(&self, user: UserId) -> Result<Vec<TeamId>, TrackerError> {
        Ok(self
            .repository
            .user_teams(user)?
            .into_iter()
            .map(|team| team.id)
            .collect())
    }

    pub(crate) fn client_index(&self) -> Result<BTreeMap<ClientId, Client>, TrackerError> {
        Ok(self
            .repository
            .clients()?
            .into_iter()
            .map(|client| (client.id, client))
            .collect())
    }

    pub(crate) fn team_index(&self) -> Result<BTreeMap<TeamId, Team>, TrackerError> {
        Ok(self
            .repository
            .teams()?
            .into_iter()
            .map(|team| (team.id, team))
            .collect())
    }

    pub(crate) fn user_index(&self) -> Result<BTreeMap<UserId, User>, TrackerError> {
        Ok(self
            .repository
            .users()?
            .into_iter()
            .map(|user| (user.id, user))
            .collect())
    }

    pub(crate) fn user(&self, id: UserId) -> Result<User, TrackerError> {
        self.repository
            .user(id)?
            .ok_or_else(|| TrackerError::NotFound("User not found".to_string()))
    }
}

pub(crate) fn require(principal: &Principal, role: UserRole) -> Result<(), TrackerError> {
    if principal.role == role {
        Ok(())
    } else {
        Err(TrackerError::Forbidden(format!(
            "Unauthorized - {} only",
            role.label()
        )))
    }
}

pub(crate) fn checked_window(window: Option<DateRange>) -> Result<Option<DateRange>, TrackerError> {
    match window {
        Some(range) if range.is_inverted() => Err(TrackerError::Validation(format!(
            "start date {} is after end date {}",
            range.start, range.end
        ))),
        other => Ok(other),
    }
}

/// Error raised by the tracker service.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Your account has been deactivated. Please contact your administrator.")]
    Deactivated,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error(
        "You have reached the maximum of {limit} active roles. Please update role statuses to continue."
    )]
    ActiveRoleLimit { limit: usize },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl TrackerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Deactivated | Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) | Self::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ActiveRoleLimit { .. } => StatusCode::BAD_REQUEST,
            Self::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            Self::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
