use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime};

use crate::scoring::{
    compute_score, daily_trend, entries_by, monthly_trend, ActivityEntry, ActivitySnapshot,
    ClientId, DateRange, EntryCounts, EntryId, EntryKind, RoleRecord, RoleStatus, ScoreKind,
    ScoreResult, TeamId,
};
use crate::tracker::domain::{
    PendingStatusReview, Principal, SubmissionRequest, User, UserRole, DROPOUT_REVIEW_REASON,
};
use crate::tracker::params::{EbesScope, RecruiterAnalyticsFilter};
use crate::tracker::repository::{EntryFilter, RoleFilter, StatusFilter, TrackerRepository};
use crate::tracker::views::{
    DealRoleView, NamedCount, OpenRoleView, PlacementView, RecruiterAnalyticsView, RoleRef,
    SubmissionCreatedView, SubmissionListView, SubmissionView, TeamInfoView,
};

use super::{checked_window, require, TrackerError, TrackerService};

const DEAL_ROLE_LIMIT: usize = 10;
const DAILY_TREND_DAYS: u32 = 30;
const MONTHLY_TREND_MONTHS: u32 = 12;

impl<R> TrackerService<R>
where
    R: TrackerRepository + 'static,
{
    /// Active clients the recruiter is placed on, one row per team.
    pub fn recruiter_clients(
        &self,
        principal: &Principal,
    ) -> Result<Vec<PlacementView>, TrackerError> {
        require(principal, UserRole::Recruiter)?;
        let clients = self.client_index()?;
        let teams = self.team_index()?;

        let mut views: Vec<PlacementView> = self
            .repository
            .placements(principal.user_id)?
            .into_iter()
            .filter_map(|placement| {
                let client = clients.get(&placement.client_id).filter(|c| c.is_active)?;
                let team = teams.get(&placement.team_id)?;
                Some(PlacementView {
                    client: client.clone(),
                    team_id: team.id,
                    team_name: team.name.clone(),
                    team_code: team.team_code.clone(),
                })
            })
            .collect();
        views.sort_by(|a, b| a.client.name.cmp(&b.client.name).then(a.team_id.cmp(&b.team_id)));
        Ok(views)
    }

    pub fn recruiter_open_roles(
        &self,
        principal: &Principal,
        client_id: ClientId,
        team_id: TeamId,
    ) -> Result<Vec<OpenRoleView>, TrackerError> {
        require(principal, UserRole::Recruiter)?;
        let mut roles = self.repository.roles(&RoleFilter {
            client_id: Some(client_id),
            team_id: Some(team_id),
            status: Some(StatusFilter::Active),
            ..RoleFilter::default()
        })?;
        roles.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let users = self.user_index()?;
        Ok(roles
            .into_iter()
            .map(|role| OpenRoleView {
                account_manager_name: users
                    .get(&role.account_manager_id)
                    .map(|user| user.name.clone())
                    .unwrap_or_default(),
                role,
            })
            .collect())
    }

    pub fn recruiter_team_info(&self, principal: &Principal) -> Result<TeamInfoView, TrackerError> {
        require(principal, UserRole::Recruiter)?;
        let team = self
            .repository
            .user_teams(principal.user_id)?
            .into_iter()
            .next()
            .ok_or_else(|| TrackerError::NotFound("No team assigned".to_string()))?;
        let recruitment_manager = self.team_manager(team.id)?.map(|user| user.summary());
        Ok(TeamInfoView {
            team,
            recruitment_manager,
        })
    }

    /// Up to ten roles the recruiter closed or worked on that are now deals.
    pub fn recruiter_deal_roles(
        &self,
        principal: &Principal,
    ) -> Result<Vec<DealRoleView>, TrackerError> {
        require(principal, UserRole::Recruiter)?;
        let mut entries = self
            .repository
            .entries(&EntryFilter::by_recruiter(principal.user_id))?;
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let clients = self.client_index()?;
        let teams = self.team_index()?;
        let mut seen = BTreeSet::new();
        let mut views = Vec::new();
        for entry in &entries {
            let Some(role_id) = entry.role_id else {
                continue;
            };
            if seen.contains(&role_id) {
                continue;
            }
            let Some(role) = self.repository.role(role_id)? else {
                continue;
            };
            if entry.kind != EntryKind::Deal && !role.has_status(RoleStatus::Deal) {
                continue;
            }
            seen.insert(role_id);
            views.push(DealRoleView {
                client_name: clients
                    .get(&role.client_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                team_name: teams
                    .get(&role.team_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_default(),
                role,
            });
            if views.len() == DEAL_ROLE_LIMIT {
                break;
            }
        }
        Ok(views)
    }

    /// Records one activity entry.
    ///
    /// A deal against a role marks the role as a deal; a dropout files a
    /// pending status review for the account manager of the dropped role.
    pub fn record_submission(
        &self,
        principal: &Principal,
        request: SubmissionRequest,
        now: NaiveDateTime,
    ) -> Result<SubmissionCreatedView, TrackerError> {
        require(principal, UserRole::Recruiter)?;
        let kind = request.entry_type.unwrap_or(EntryKind::Submission);
        let mut role_id = request.role_id;
        let mut client_id = request.client_id;
        let mut team_id = request.team_id;
        let mut account_manager_id = None;

        match (kind, request.dropout_role_id, request.role_id) {
            (EntryKind::Dropout, Some(dropout_role_id), _) => {
                let role = self
                    .repository
                    .role(dropout_role_id)?
                    .ok_or_else(|| TrackerError::NotFound("Dropout role not found".to_string()))?;
                role_id = Some(role.id);
                client_id = Some(role.client_id);
                team_id = Some(role.team_id);
                account_manager_id = Some(role.account_manager_id);
                self.repository.insert_pending_review(PendingStatusReview {
                    role_id: role.id,
                    previous_status: role.status,
                    reason: DROPOUT_REVIEW_REASON.to_string(),
                    created_by: principal.user_id,
                    created_at: now,
                })?;
                tracing::info!(
                    user_id = %principal.user_id,
                    role_id = %role.id,
                    "dropout filed for account manager review"
                );
            }
            (_, _, Some(id)) => {
                let mut role = self
                    .repository
                    .role(id)?
                    .ok_or_else(|| TrackerError::NotFound("Role not found".to_string()))?;
                account_manager_id = Some(role.account_manager_id);
                client_id = client_id.or(Some(role.client_id));
                team_id = team_id.or(Some(role.team_id));
                if kind == EntryKind::Deal {
                    role.status = Some(RoleStatus::Deal);
                    role.updated_at = Some(now);
                    self.repository.update_role(role)?;
                    tracing::info!(user_id = %principal.user_id, role_id = %id, "role closed as deal");
                }
            }
            _ => {}
        }

        let recruitment_manager_id = match team_id {
            Some(team) => self.team_manager(team)?.map(|user| user.id),
            None => None,
        };

        let stored = self.repository.insert_entry(ActivityEntry {
            id: EntryId(0),
            recruiter_id: principal.user_id,
            client_id,
            team_id,
            role_id,
            account_manager_id,
            recruitment_manager_id,
            kind,
            submission_speed: request.submission_type,
            interview_round: request.interview_level,
            submission_date: Some(request.submission_date),
            dropout_role_id: request.dropout_role_id,
            notes: request.notes.unwrap_or_default(),
            created_at: Some(now),
        })?;
        tracing::debug!(
            user_id = %principal.user_id,
            entry_id = %stored.id,
            kind = ?kind,
            "activity recorded"
        );

        Ok(SubmissionCreatedView {
            success: true,
            id: stored.id,
        })
    }

    pub fn recruiter_submissions(
        &self,
        principal: &Principal,
        window: Option<DateRange>,
        client_id: Option<ClientId>,
    ) -> Result<SubmissionListView, TrackerError> {
        require(principal, UserRole::Recruiter)?;
        let window = checked_window(window)?;
        let mut entries: Vec<ActivityEntry> = self
            .repository
            .entries(&EntryFilter {
                client_id,
                ..EntryFilter::by_recruiter(principal.user_id)
            })?
            .into_iter()
            .filter(|entry| DateRange::admits(window.as_ref(), entry.submission_date))
            .collect();
        entries.sort_by(|a, b| {
            b.submission_date
                .cmp(&a.submission_date)
                .then(b.created_at.cmp(&a.created_at))
        });

        let stats = EntryCounts::tally(&entries, None);
        let clients = self.client_index()?;
        let teams = self.team_index()?;
        let users = self.user_index()?;
        let mut roles: BTreeMap<_, Option<RoleRecord>> = BTreeMap::new();
        let mut submissions = Vec::with_capacity(entries.len());
        for entry in entries {
            let role = match entry.role_id {
                Some(id) => match roles.get(&id) {
                    Some(cached) => cached.clone(),
                    None => {
                        let fetched = self.repository.role(id)?;
                        roles.insert(id, fetched.clone());
                        fetched
                    }
                },
                None => None,
            };
            submissions.push(SubmissionView {
                client_name: entry
                    .client_id
                    .and_then(|id| clients.get(&id))
                    .map(|c| c.name.clone()),
                team_name: entry
                    .team_id
                    .and_then(|id| teams.get(&id))
                    .map(|t| t.name.clone()),
                role_title: role.as_ref().map(|r| r.title.clone()),
                role_code: role.as_ref().map(|r| r.role_code.clone()),
                account_manager_name: entry
                    .account_manager_id
                    .and_then(|id| users.get(&id))
                    .map(|u| u.name.clone()),
                entry,
            });
        }

        Ok(SubmissionListView { submissions, stats })
    }

    /// Dashboard EBES: `date` scores the current month, `client` one
    /// client's entries of all time, `combined` everything.
    pub fn recruiter_ebes(
        &self,
        principal: &Principal,
        scope: EbesScope,
        client_id: Option<ClientId>,
        today: NaiveDate,
    ) -> Result<ScoreResult, TrackerError> {
        require(principal, UserRole::Recruiter)?;
        let mut filter = EntryFilter::by_recruiter(principal.user_id);
        let mut window = None;
        match scope {
            EbesScope::Date => window = Some(DateRange::current_month(today)),
            EbesScope::Client => filter.client_id = client_id,
            EbesScope::Combined => {}
        }
        let entries = self.repository.entries(&filter)?;
        Ok(self.recruiter_result(&entries, window.as_ref()))
    }

    /// Distinct roles the recruiter has logged activity against.
    pub fn recruiter_roles(&self, principal: &Principal) -> Result<Vec<RoleRef>, TrackerError> {
        require(principal, UserRole::Recruiter)?;
        let ids: BTreeSet<_> = self
            .repository
            .entries(&EntryFilter::by_recruiter(principal.user_id))?
            .into_iter()
            .filter_map(|entry| entry.role_id)
            .collect();

        let mut roles = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(role) = self.repository.role(id)? {
                roles.push(RoleRef {
                    id: role.id,
                    title: role.title,
                    role_code: role.role_code,
                });
            }
        }
        roles.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(roles)
    }

    /// Totals and breakdowns inside the window; the trends look back a fixed
    /// thirty days and twelve months from `today` regardless of the window.
    pub fn recruiter_analytics(
        &self,
        principal: &Principal,
        filter: RecruiterAnalyticsFilter,
        today: NaiveDate,
    ) -> Result<RecruiterAnalyticsView, TrackerError> {
        require(principal, UserRole::Recruiter)?;
        let window = checked_window(filter.window)?;

        let all = self
            .repository
            .entries(&EntryFilter::by_recruiter(principal.user_id))?;
        let matches_role_and_kind = |entry: &ActivityEntry| {
            filter.role_id.map_or(true, |id| entry.role_id == Some(id))
                && filter.kind.map_or(true, |kind| entry.kind == kind)
        };
        let unscoped: Vec<ActivityEntry> = all
            .iter()
            .filter(|entry| matches_role_and_kind(entry))
            .cloned()
            .collect();
        let scoped: Vec<ActivityEntry> = unscoped
            .iter()
            .filter(|entry| filter.client_id.map_or(true, |id| entry.client_id == Some(id)))
            .cloned()
            .collect();

        let counts = EntryCounts::tally(&scoped, window.as_ref());

        let mut active_roles = BTreeSet::new();
        for role_id in all.iter().filter_map(|entry| entry.role_id) {
            if active_roles.contains(&role_id) {
                continue;
            }
            if let Some(role) = self.repository.role(role_id)? {
                if role.has_status(RoleStatus::Active) {
                    active_roles.insert(role_id);
                }
            }
        }

        let clients = self.client_index()?;
        let teams = self.team_index()?;
        let client_breakdown = named_counts(
            entries_by(&unscoped, window.as_ref(), |entry| entry.client_id),
            |id| clients.get(id).map(|c| c.name.clone()),
        );
        let team_breakdown = named_counts(
            entries_by(&scoped, window.as_ref(), |entry| entry.team_id),
            |id| teams.get(id).map(|t| t.name.clone()),
        );

        Ok(RecruiterAnalyticsView {
            total_submissions: counts.submissions,
            total_interviews: counts.interviews,
            interview_1: counts.interview_1,
            interview_2: counts.interview_2,
            interview_3: counts.interview_3,
            total_deals: counts.deals,
            total_dropouts: counts.dropouts,
            active_roles_count: active_roles.len() as u32,
            client_breakdown,
            team_breakdown,
            daily_trend: daily_trend(&scoped, today, DAILY_TREND_DAYS),
            monthly_trend: monthly_trend(&scoped, today, MONTHLY_TREND_MONTHS),
        })
    }

    pub fn recruiter_ebes_score(
        &self,
        principal: &Principal,
        window: Option<DateRange>,
    ) -> Result<ScoreResult, TrackerError> {
        require(principal, UserRole::Recruiter)?;
        let window = checked_window(window)?;
        let entries = self
            .repository
            .entries(&EntryFilter::by_recruiter(principal.user_id))?;
        Ok(self.recruiter_result(&entries, window.as_ref()))
    }

    fn recruiter_result(&self, entries: &[ActivityEntry], window: Option<&DateRange>) -> ScoreResult {
        let snapshot = ActivitySnapshot {
            entries,
            roles: &[],
            interviews: &[],
        };
        compute_score(ScoreKind::Recruiter, &snapshot, window, &self.scoring)
    }

    /// First recruitment manager assigned to the team.
    pub(crate) fn team_manager(&self, team: TeamId) -> Result<Option<User>, TrackerError> {
        Ok(self
            .repository
            .team_members(team)?
            .into_iter()
            .find(|user| user.role == UserRole::RecruitmentManager))
    }
}

fn named_counts<K, F>(groups: BTreeMap<K, EntryCounts>, name: F) -> Vec<NamedCount>
where
    F: Fn(&K) -> Option<String>,
{
    let mut rows: Vec<NamedCount> = groups
        .iter()
        .filter_map(|(key, counts)| {
            Some(NamedCount {
                name: name(key)?,
                count: counts.total,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    rows
}
