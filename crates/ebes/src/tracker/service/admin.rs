use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::scoring::{
    DateRange, EntryCounts, InterviewTally, RoleCounts, RoleId, RoleStatus, UserId,
};
use crate::tracker::domain::{
    Assignments, Client, ClientAssignmentRequest, Placement, Principal, Team,
    TeamAssignmentRequest, User, UserRole,
};
use crate::tracker::params::PerformanceStatsFilter;
use crate::tracker::repository::TrackerRepository;
use crate::tracker::views::{
    CodedRef, LeaderboardEntry, LeaderboardsView, SuccessView, UserStatsView,
};

use super::{checked_window, require, TrackerError, TrackerService};

const UNASSIGNED_TEAM: &str = "Unassigned";

impl<R> TrackerService<R>
where
    R: TrackerRepository + 'static,
{
    pub fn admin_teams(&self, principal: &Principal) -> Result<Vec<Team>, TrackerError> {
        require(principal, UserRole::Admin)?;
        Ok(self.repository.teams()?)
    }

    pub fn admin_clients(&self, principal: &Principal) -> Result<Vec<Client>, TrackerError> {
        require(principal, UserRole::Admin)?;
        Ok(self.repository.clients()?)
    }

    /// Per-user report for every active non-admin user, best score first.
    pub fn performance_stats(
        &self,
        principal: &Principal,
        filter: PerformanceStatsFilter,
    ) -> Result<Vec<UserStatsView>, TrackerError> {
        require(principal, UserRole::Admin)?;
        let window = checked_window(filter.window)?;

        let mut rows = Vec::new();
        for user in self.repository.users()? {
            if !user.is_active || user.role == UserRole::Admin {
                continue;
            }
            if filter.role.map_or(false, |role| role != user.role) {
                continue;
            }
            if let Some(needle) = &filter.user_name {
                if !user.name.to_lowercase().contains(needle.as_str()) {
                    continue;
                }
            }

            let teams = self.repository.user_teams(user.id)?;
            let clients = self.repository.user_clients(user.id)?;
            if filter
                .team_id
                .map_or(false, |id| !teams.iter().any(|team| team.id == id))
            {
                continue;
            }
            if filter
                .client_id
                .map_or(false, |id| !clients.iter().any(|client| client.id == id))
            {
                continue;
            }

            let bands = &self.scoring.admin_bands;
            let (score, label) = match self.score_user(&user, window.as_ref())? {
                Some(result) => (result.score, result.admin_label(bands)),
                None => (0.0, bands.classify(0.0)),
            };
            let mut row = UserStatsView::new(
                &user.summary(),
                teams.iter().map(CodedRef::from).collect(),
                clients.iter().map(CodedRef::from).collect(),
                score,
                label,
            );
            self.fill_role_counters(&mut row, &user, &teams, window.as_ref())?;
            rows.push(row);
        }

        rows.sort_by(|a, b| {
            b.ebes_score
                .partial_cmp(&a.ebes_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(rows)
    }

    /// All-time top performers for each scored user role.
    pub fn leaderboards(&self, principal: &Principal) -> Result<LeaderboardsView, TrackerError> {
        require(principal, UserRole::Admin)?;
        let users = self.repository.users()?;
        Ok(LeaderboardsView {
            recruiters: self.leaderboard(&users, UserRole::Recruiter)?,
            account_managers: self.leaderboard(&users, UserRole::AccountManager)?,
            recruitment_managers: self.leaderboard(&users, UserRole::RecruitmentManager)?,
        })
    }

    pub fn user_assignments(
        &self,
        principal: &Principal,
        user_id: UserId,
    ) -> Result<Assignments, TrackerError> {
        require(principal, UserRole::Admin)?;
        let user = self.user(user_id)?;
        Ok(Assignments {
            clients: self.repository.user_clients(user.id)?,
            teams: self.repository.user_teams(user.id)?,
        })
    }

    pub fn assign_team(
        &self,
        principal: &Principal,
        request: TeamAssignmentRequest,
    ) -> Result<SuccessView, TrackerError> {
        require(principal, UserRole::Admin)?;
        self.repository.assign_team(request.user_id, request.team_id)?;
        tracing::info!(user_id = %request.user_id, team_id = %request.team_id, "team assigned");
        Ok(SuccessView::ok())
    }

    pub fn unassign_team(
        &self,
        principal: &Principal,
        request: TeamAssignmentRequest,
    ) -> Result<SuccessView, TrackerError> {
        require(principal, UserRole::Admin)?;
        self.repository.unassign_team(request.user_id, request.team_id)?;
        tracing::info!(user_id = %request.user_id, team_id = %request.team_id, "team unassigned");
        Ok(SuccessView::ok())
    }

    /// Recruiters are placed on a client through a team, so they need a
    /// `team_id`; managers are assigned the client directly.
    pub fn assign_client(
        &self,
        principal: &Principal,
        request: ClientAssignmentRequest,
    ) -> Result<SuccessView, TrackerError> {
        require(principal, UserRole::Admin)?;
        let user = self.user(request.user_id)?;
        if user.role == UserRole::Recruiter {
            let team_id = request.team_id.ok_or_else(|| {
                TrackerError::Validation(
                    "team_id is required when assigning a client to a recruiter".to_string(),
                )
            })?;
            self.repository.add_placement(Placement {
                recruiter_id: user.id,
                client_id: request.client_id,
                team_id,
            })?;
        } else {
            self.repository.assign_client(user.id, request.client_id)?;
        }
        tracing::info!(user_id = %user.id, client_id = %request.client_id, "client assigned");
        Ok(SuccessView::ok())
    }

    pub fn unassign_client(
        &self,
        principal: &Principal,
        request: ClientAssignmentRequest,
    ) -> Result<SuccessView, TrackerError> {
        require(principal, UserRole::Admin)?;
        self.repository
            .unassign_client(request.user_id, request.client_id)?;
        tracing::info!(user_id = %request.user_id, client_id = %request.client_id, "client unassigned");
        Ok(SuccessView::ok())
    }

    fn leaderboard(
        &self,
        users: &[User],
        role: UserRole,
    ) -> Result<Vec<LeaderboardEntry>, TrackerError> {
        let mut board = Vec::new();
        for user in users.iter().filter(|u| u.is_active && u.role == role) {
            let Some(result) = self.score_user(user, None)? else {
                continue;
            };
            let team = self
                .repository
                .user_teams(user.id)?
                .into_iter()
                .next()
                .map(|team| team.name)
                .unwrap_or_else(|| UNASSIGNED_TEAM.to_string());
            board.push(LeaderboardEntry {
                name: user.name.clone(),
                team,
                ebes_score: result.score,
                performance_label: result.performance_label,
            });
        }
        board.sort_by(|a, b| {
            b.ebes_score
                .partial_cmp(&a.ebes_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        board.truncate(self.scoring.leaderboard_size);
        Ok(board)
    }

    fn fill_role_counters(
        &self,
        row: &mut UserStatsView,
        user: &User,
        teams: &[Team],
        window: Option<&DateRange>,
    ) -> Result<(), TrackerError> {
        let batch = self.activity_for(user)?;
        match user.role {
            UserRole::Recruiter => {
                let counts = EntryCounts::tally(&batch.entries, window);
                let role_ids: BTreeSet<RoleId> = batch
                    .entries
                    .iter()
                    .filter(|entry| DateRange::admits(window, entry.submission_date))
                    .filter_map(|entry| entry.role_id)
                    .collect();
                let (mut active, mut non_active) = (0, 0);
                for id in role_ids {
                    if let Some(role) = self.repository.role(id)? {
                        if role.has_status(RoleStatus::Active) {
                            active += 1;
                        } else {
                            non_active += 1;
                        }
                    }
                }
                row.total_submissions = Some(counts.submissions);
                row.interviews_1st = Some(counts.interview_1);
                row.interviews_2nd = Some(counts.interview_2);
                row.interviews_3rd = Some(counts.interview_3);
                row.total_interviews = Some(counts.interviews);
                row.deals = Some(counts.deals);
                row.dropouts = Some(counts.dropouts);
                row.active_roles = Some(active);
                row.non_active_roles = Some(non_active);
            }
            UserRole::AccountManager => {
                let months = window.map(|range| (range.first_month(), range.last_month()));
                let counts = RoleCounts::tally(&batch.roles, window);
                let interviews = InterviewTally::tally(&batch.interviews, months);
                row.total_roles = Some(counts.total);
                row.active_roles = Some(counts.active);
                row.non_active_roles = Some(counts.non_active);
                row.deals_closed_roles = Some(counts.deal);
                row.lost_roles = Some(counts.lost);
                row.on_hold_roles = Some(counts.on_hold);
                row.no_answer_roles = Some(counts.no_answer);
                row.interviews_1st = Some(interviews.round_1);
                row.interviews_2nd = Some(interviews.round_2);
                row.interviews_3rd = Some(interviews.round_3);
                row.total_interviews = Some(interviews.total);
            }
            UserRole::RecruitmentManager => {
                let team_ids: Vec<_> = teams.iter().map(|team| team.id).collect();
                let counts = EntryCounts::tally(&batch.entries, window);
                row.managed_teams = Some(teams.len() as u32);
                row.total_recruiters = Some(self.recruiters_across(&team_ids)?.len() as u32);
                row.total_submissions = Some(counts.total);
                row.total_interviews = Some(counts.interviews);
                row.total_deals = Some(counts.deals);
            }
            UserRole::Admin => {}
        }
        Ok(())
    }
}
