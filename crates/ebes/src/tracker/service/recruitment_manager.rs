use std::collections::{BTreeMap, BTreeSet};

use crate::scoring::{
    compute_score, ActivityEntry, ActivitySnapshot, DateRange, EntryCounts,
    InterviewTally, RoleCounts, RoleRecord, ScoreKind, ScoreResult, TeamId, UserId,
};
use crate::tracker::domain::{Client, Principal, Team, User, UserRole};
use crate::tracker::params::ManagerAnalyticsFilter;
use crate::tracker::repository::{EntryFilter, RoleFilter, TrackerRepository};
use crate::tracker::views::{
    ManagerAnalyticsView, PerformanceSummaryView, RecruiterBreakdownView, RecruiterRosterView,
    RecruiterSpeedView, SpeedStats, TeamBreakdownView, TeamDetailView, TeamStats,
};

use super::{checked_window, require, TrackerError, TrackerService};

impl<R> TrackerService<R>
where
    R: TrackerRepository + 'static,
{
    pub fn rm_teams(&self, principal: &Principal) -> Result<Vec<Team>, TrackerError> {
        require(principal, UserRole::RecruitmentManager)?;
        Ok(self.repository.user_teams(principal.user_id)?)
    }

    pub fn rm_clients(&self, principal: &Principal) -> Result<Vec<Client>, TrackerError> {
        require(principal, UserRole::RecruitmentManager)?;
        Ok(self.repository.user_clients(principal.user_id)?)
    }

    /// Recruiters on the manager's teams, one row per team membership.
    pub fn rm_recruiters(
        &self,
        principal: &Principal,
    ) -> Result<Vec<RecruiterRosterView>, TrackerError> {
        require(principal, UserRole::RecruitmentManager)?;
        let mut roster = Vec::new();
        for team in self.repository.user_teams(principal.user_id)? {
            for recruiter in self.team_recruiters(team.id)? {
                roster.push(RecruiterRosterView {
                    recruiter: recruiter.summary(),
                    team_id: team.id,
                    team_name: team.name.clone(),
                    team_code: team.team_code.clone(),
                });
            }
        }
        Ok(roster)
    }

    pub fn rm_analytics(
        &self,
        principal: &Principal,
        filter: ManagerAnalyticsFilter,
    ) -> Result<ManagerAnalyticsView, TrackerError> {
        require(principal, UserRole::RecruitmentManager)?;
        let window = checked_window(filter.window)?;
        let teams = self.repository.user_teams(principal.user_id)?;
        if teams.is_empty() {
            return Ok(ManagerAnalyticsView::default());
        }
        let team_ids: Vec<TeamId> = teams.iter().map(|team| team.id).collect();

        let roles: Vec<RoleRecord> = self
            .repository
            .roles(&RoleFilter {
                team_id: filter.team_id,
                client_id: filter.client_id,
                ..RoleFilter::in_teams(team_ids.clone())
            })?
            .into_iter()
            .filter(|role| DateRange::admits(window.as_ref(), role.created_on()))
            .collect();
        let logs = self.interview_logs_for(&roles)?;
        let counts = RoleCounts::tally(&roles, None);

        let team_breakdown = teams
            .iter()
            .map(|team| {
                let team_roles: Vec<&RoleRecord> =
                    roles.iter().filter(|role| role.team_id == team.id).collect();
                let ids: BTreeSet<_> = team_roles.iter().map(|role| role.id).collect();
                let team_counts = RoleCounts::tally(team_roles.iter().copied(), None);
                let interviews =
                    InterviewTally::tally(logs.iter().filter(|log| ids.contains(&log.role_id)), None);
                TeamBreakdownView {
                    team_id: team.id,
                    team_name: team.name.clone(),
                    team_code: team.team_code.clone(),
                    total_roles: team_counts.total,
                    active_roles: team_counts.active,
                    interviews: interviews.total,
                    deals: team_counts.deal,
                    lost: team_counts.lost,
                    on_hold: team_counts.on_hold,
                    no_answer: team_counts.no_answer,
                }
            })
            .collect();

        let recruiters: Vec<User> = self
            .recruiters_across(&team_ids)?
            .into_values()
            .filter(|user| filter.recruiter_id.map_or(true, |id| user.id == id))
            .collect();
        let entries = self.repository.entries(&EntryFilter {
            team_id: filter.team_id,
            client_id: filter.client_id,
            ..EntryFilter::in_teams(team_ids)
        })?;
        let recruiter_breakdown = recruiters
            .iter()
            .map(|recruiter| {
                let stats = EntryCounts::tally(
                    entries.iter().filter(|entry| entry.recruiter_id == recruiter.id),
                    window.as_ref(),
                );
                RecruiterBreakdownView {
                    recruiter_id: recruiter.id,
                    recruiter_name: recruiter.name.clone(),
                    recruiter_code: recruiter.user_code.clone(),
                    total_submissions: stats.total,
                    interviews: stats.interviews,
                    deals: stats.deals,
                    lost_roles: stats.dropouts,
                }
            })
            .collect();

        Ok(ManagerAnalyticsView {
            total_teams: teams.len() as u32,
            total_recruiters: recruiters.len() as u32,
            total_active_roles: counts.active,
            total_non_active_roles: counts.non_active,
            total_interviews: InterviewTally::tally(&logs, None).total,
            total_deals: counts.deal,
            total_lost: counts.lost,
            total_on_hold: counts.on_hold,
            total_no_answer: counts.no_answer,
            team_breakdown,
            recruiter_breakdown,
        })
    }

    pub fn rm_ebes_score(
        &self,
        principal: &Principal,
        window: Option<DateRange>,
    ) -> Result<ScoreResult, TrackerError> {
        require(principal, UserRole::RecruitmentManager)?;
        let window = checked_window(window)?;
        let user = self.user(principal.user_id)?;
        let batch = self.activity_for(&user)?;
        let snapshot = ActivitySnapshot {
            entries: &batch.entries,
            roles: &batch.roles,
            interviews: &[],
        };
        Ok(compute_score(
            ScoreKind::RecruitmentManager,
            &snapshot,
            window.as_ref(),
            &self.scoring,
        ))
    }

    /// Submission speed per recruiter who logged activity for the team.
    pub fn rm_team_analytics(
        &self,
        principal: &Principal,
        team_id: TeamId,
        window: Option<DateRange>,
    ) -> Result<TeamDetailView, TrackerError> {
        require(principal, UserRole::RecruitmentManager)?;
        let window = checked_window(window)?;
        let team = self
            .repository
            .user_teams(principal.user_id)?
            .into_iter()
            .find(|team| team.id == team_id)
            .ok_or_else(|| {
                TrackerError::NotFound("Team not assigned to this recruitment manager".to_string())
            })?;

        let entries = self.repository.entries(&EntryFilter {
            team_id: Some(team_id),
            ..EntryFilter::default()
        })?;
        let mut per_recruiter: BTreeMap<UserId, Vec<&ActivityEntry>> = BTreeMap::new();
        for entry in &entries {
            per_recruiter.entry(entry.recruiter_id).or_default().push(entry);
        }

        let users = self.user_index()?;
        let mut team_stats = TeamStats {
            total_recruiters: self.team_recruiters(team_id)?.len() as u32,
            speeds: SpeedStats::default(),
        };
        let mut recruiter_stats = Vec::new();
        for (recruiter_id, recruiter_entries) in per_recruiter {
            let counts = EntryCounts::tally(recruiter_entries, window.as_ref());
            if counts.total == 0 {
                continue;
            }
            let speeds = SpeedStats::from_counts(&counts);
            team_stats.speeds.absorb(&speeds);
            let user = users.get(&recruiter_id);
            recruiter_stats.push(RecruiterSpeedView {
                recruiter_user_id: recruiter_id,
                recruiter_name: user.map(|u| u.name.clone()).unwrap_or_default(),
                recruiter_code: user.map(|u| u.user_code.clone()).unwrap_or_default(),
                speeds,
            });
        }

        Ok(TeamDetailView {
            team,
            team_stats,
            recruiter_stats,
        })
    }

    pub fn rm_performance_summary(
        &self,
        principal: &Principal,
        window: Option<DateRange>,
    ) -> Result<PerformanceSummaryView, TrackerError> {
        require(principal, UserRole::RecruitmentManager)?;
        let window = checked_window(window)?;
        let teams = self.repository.user_teams(principal.user_id)?;
        if teams.is_empty() {
            return Ok(PerformanceSummaryView::default());
        }
        let team_ids: Vec<TeamId> = teams.iter().map(|team| team.id).collect();

        let entries = self.repository.entries(&EntryFilter {
            recruitment_manager_id: Some(principal.user_id),
            ..EntryFilter::default()
        })?;
        let total_submissions = EntryCounts::tally(&entries, window.as_ref()).total;

        Ok(PerformanceSummaryView {
            total_submissions,
            total_recruiters: self.recruiters_across(&team_ids)?.len() as u32,
            teams,
        })
    }

    fn team_recruiters(&self, team: TeamId) -> Result<Vec<User>, TrackerError> {
        Ok(self
            .repository
            .team_members(team)?
            .into_iter()
            .filter(|user| user.role == UserRole::Recruiter)
            .collect())
    }

    /// Distinct recruiters across several teams, keyed by id.
    pub(crate) fn recruiters_across(
        &self,
        teams: &[TeamId],
    ) -> Result<BTreeMap<UserId, User>, TrackerError> {
        let mut recruiters = BTreeMap::new();
        for team in teams {
            for user in self.team_recruiters(*team)? {
                recruiters.entry(user.id).or_insert(user);
            }
        }
        Ok(recruiters)
    }
}

