use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime};

use crate::scoring::{
    account_health, account_manager_score, client_label, compute_score, conversion_rate,
    entries_by, growth_label, round_tenths, rounded_growth, stage_dropoff, team_label,
    AccountManagerInputs, AccountTag, ActivitySnapshot, DateRange, InterviewLog, InterviewTally,
    MonthlyComparison, RoleCounts, RoleId, RoleRecord, RoleStatus, ScoreKind, ScoreResult,
    YearMonth,
};
use crate::tracker::domain::{
    Assignments, Client, InterviewLogRequest, NewRoleRequest, Principal, RoleUpdate, UserRole,
};
use crate::tracker::params::PerformanceFilter;
use crate::tracker::repository::{EntryFilter, RoleFilter, StatusFilter, TrackerRepository};
use crate::tracker::views::{
    AccountAnalyticsView, AccountPerformanceView, AnalyticsSummary, ClientAnalyticsView,
    ClientPerformanceView, CreatedRoleView, PerformanceOverview, ReminderStatusView, RoleView,
    SuccessView, TeamPerformanceView,
};

use super::{checked_window, require, TrackerError, TrackerService};

fn logs_for_roles(logs: &[InterviewLog], roles: &[RoleRecord]) -> Vec<InterviewLog> {
    let ids: BTreeSet<RoleId> = roles.iter().map(|role| role.id).collect();
    logs.iter()
        .filter(|log| ids.contains(&log.role_id))
        .cloned()
        .collect()
}

fn group_roles<K, F>(roles: &[RoleRecord], key: F) -> BTreeMap<K, Vec<RoleRecord>>
where
    K: Ord,
    F: Fn(&RoleRecord) -> K,
{
    let mut groups: BTreeMap<K, Vec<RoleRecord>> = BTreeMap::new();
    for role in roles {
        groups.entry(key(role)).or_default().push(role.clone());
    }
    groups
}

impl<R> TrackerService<R>
where
    R: TrackerRepository + 'static,
{
    pub fn account_manager_assignments(
        &self,
        principal: &Principal,
    ) -> Result<Assignments, TrackerError> {
        require(principal, UserRole::AccountManager)?;
        Ok(Assignments {
            clients: self.repository.user_clients(principal.user_id)?,
            teams: self.repository.user_teams(principal.user_id)?,
        })
    }

    pub fn reminder_status(
        &self,
        principal: &Principal,
        today: NaiveDate,
    ) -> Result<ReminderStatusView, TrackerError> {
        require(principal, UserRole::AccountManager)?;
        let month = YearMonth::of(today);
        let reminder = self.repository.reminder(principal.user_id, month)?;
        Ok(ReminderStatusView {
            should_show: !reminder.map(|r| r.confirmed).unwrap_or(false),
            current_month: month,
        })
    }

    pub fn confirm_reminder(
        &self,
        principal: &Principal,
        today: NaiveDate,
    ) -> Result<SuccessView, TrackerError> {
        require(principal, UserRole::AccountManager)?;
        let month = YearMonth::of(today);
        self.repository.confirm_reminder(principal.user_id, month)?;
        tracing::debug!(user_id = %principal.user_id, %month, "monthly reminder confirmed");
        Ok(SuccessView::ok())
    }

    /// Own requisitions, newest first, with all-time interview totals.
    pub fn account_manager_roles(
        &self,
        principal: &Principal,
        status: Option<StatusFilter>,
    ) -> Result<Vec<RoleView>, TrackerError> {
        require(principal, UserRole::AccountManager)?;
        let filter = RoleFilter {
            status,
            ..RoleFilter::owned_by(principal.user_id)
        };
        let mut roles = self.repository.roles(&filter)?;
        roles.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let logs = self.interview_logs_for(&roles)?;
        let clients = self.client_index()?;
        let teams = self.team_index()?;

        Ok(roles
            .into_iter()
            .map(|role| {
                let tally =
                    InterviewTally::tally(logs.iter().filter(|log| log.role_id == role.id), None);
                RoleView {
                    client_name: clients.get(&role.client_id).map(|c| c.name.clone()),
                    team_name: teams.get(&role.team_id).map(|t| t.name.clone()),
                    interview_1_count: tally.round_1,
                    interview_2_count: tally.round_2,
                    interview_3_count: tally.round_3,
                    total_interviews: tally.rounds_total(),
                    role,
                }
            })
            .collect())
    }

    pub fn create_role(
        &self,
        principal: &Principal,
        request: NewRoleRequest,
        now: NaiveDateTime,
    ) -> Result<CreatedRoleView, TrackerError> {
        require(principal, UserRole::AccountManager)?;
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(TrackerError::Validation("title must not be empty".to_string()));
        }

        let active = self.repository.roles(&RoleFilter {
            status: Some(StatusFilter::Active),
            ..RoleFilter::owned_by(principal.user_id)
        })?;
        let limit = self.tracker.active_role_limit;
        if active.len() >= limit {
            tracing::info!(user_id = %principal.user_id, limit, "active role limit reached");
            return Err(TrackerError::ActiveRoleLimit { limit });
        }

        let stored = self.repository.insert_role(RoleRecord {
            id: RoleId(0),
            role_code: String::new(),
            client_id: request.client_id,
            team_id: request.team_id,
            account_manager_id: principal.user_id,
            title,
            description: request.description.unwrap_or_default(),
            status: Some(RoleStatus::Active),
            created_at: Some(now),
            updated_at: Some(now),
        })?;
        tracing::info!(
            user_id = %principal.user_id,
            role_id = %stored.id,
            role_code = %stored.role_code,
            "role created"
        );

        Ok(CreatedRoleView {
            success: true,
            id: stored.id,
            role_code: stored.role_code,
        })
    }

    pub fn update_role(
        &self,
        principal: &Principal,
        role_id: RoleId,
        update: RoleUpdate,
        now: NaiveDateTime,
    ) -> Result<SuccessView, TrackerError> {
        require(principal, UserRole::AccountManager)?;
        let mut role = self.owned_role(principal, role_id)?;
        if update.is_empty() {
            return Err(TrackerError::Validation("No fields to update".to_string()));
        }

        if let Some(title) = update.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(TrackerError::Validation("title must not be empty".to_string()));
            }
            role.title = title;
        }
        if let Some(description) = update.description {
            role.description = description;
        }
        if let Some(status) = update.status {
            role.status = Some(status);
        }
        role.updated_at = Some(now);

        self.repository.update_role(role)?;
        tracing::info!(user_id = %principal.user_id, %role_id, "role updated");
        Ok(SuccessView::ok())
    }

    pub fn delete_role(
        &self,
        principal: &Principal,
        role_id: RoleId,
    ) -> Result<SuccessView, TrackerError> {
        require(principal, UserRole::AccountManager)?;
        self.owned_role(principal, role_id)?;
        self.repository.delete_role(role_id)?;
        tracing::info!(user_id = %principal.user_id, %role_id, "role deleted");
        Ok(SuccessView::ok())
    }

    /// Logs a batch of interviews against the current month.
    pub fn log_interviews(
        &self,
        principal: &Principal,
        role_id: RoleId,
        request: InterviewLogRequest,
        today: NaiveDate,
    ) -> Result<SuccessView, TrackerError> {
        require(principal, UserRole::AccountManager)?;
        if request.interview_count == 0 {
            return Err(TrackerError::Validation(
                "interview_count must be at least 1".to_string(),
            ));
        }
        self.owned_role(principal, role_id)?;
        self.repository.insert_interview_log(InterviewLog {
            role_id,
            round: Some(request.interview_round),
            count: request.interview_count,
            entry_month: Some(YearMonth::of(today)),
        })?;
        Ok(SuccessView::ok())
    }

    /// Per-client account health for every assigned client.
    ///
    /// Roles are limited to those created inside the window; interview
    /// totals for those roles are all-time.
    pub fn account_analytics(
        &self,
        principal: &Principal,
        window: Option<DateRange>,
        today: NaiveDate,
    ) -> Result<AccountAnalyticsView, TrackerError> {
        require(principal, UserRole::AccountManager)?;
        let window = checked_window(window)?;

        let clients = self.repository.user_clients(principal.user_id)?;
        let roles = self.repository.roles(&RoleFilter::owned_by(principal.user_id))?;
        let logs = self.interview_logs_for(&roles)?;
        let entries = self.repository.entries(&EntryFilter {
            account_manager_id: Some(principal.user_id),
            ..EntryFilter::default()
        })?;
        let submissions = entries_by(&entries, window.as_ref(), |entry| entry.client_id);

        let mut summary = AnalyticsSummary::default();
        let views: Vec<ClientAnalyticsView> = clients
            .iter()
            .map(|client| {
                let client_roles: Vec<RoleRecord> = roles
                    .iter()
                    .filter(|role| role.client_id == client.id)
                    .filter(|role| DateRange::admits(window.as_ref(), role.created_on()))
                    .cloned()
                    .collect();
                let client_logs = logs_for_roles(&logs, &client_roles);
                let submission_count = submissions
                    .get(&client.id)
                    .map(|counts| counts.total)
                    .unwrap_or(0);
                client_analytics(client, &client_roles, &client_logs, submission_count, today)
            })
            .collect();

        for view in &views {
            summary.total_clients += 1;
            match view.health_tag {
                AccountTag::Strong => summary.strong_accounts += 1,
                AccountTag::Average => summary.average_accounts += 1,
                AccountTag::AtRisk => summary.at_risk_accounts += 1,
            }
        }

        Ok(AccountAnalyticsView {
            clients: views,
            summary,
        })
    }

    pub fn account_performance(
        &self,
        principal: &Principal,
        filter: PerformanceFilter,
        today: NaiveDate,
    ) -> Result<AccountPerformanceView, TrackerError> {
        require(principal, UserRole::AccountManager)?;
        let window = checked_window(filter.window)?;

        let roles: Vec<RoleRecord> = self
            .repository
            .roles(&RoleFilter {
                client_id: filter.client_id,
                team_id: filter.team_id,
                status: filter.status.map(StatusFilter::Exactly),
                ..RoleFilter::owned_by(principal.user_id)
            })?
            .into_iter()
            .filter(|role| DateRange::admits(window.as_ref(), role.created_on()))
            .collect();
        let logs = self.interview_logs_for(&roles)?;

        let counts = RoleCounts::tally(&roles, None);
        let interviews = InterviewTally::tally(&logs, None);
        let rounds_total = interviews.rounds_total();
        let inputs = AccountManagerInputs {
            new_roles: counts.total,
            interview_1: interviews.round_1,
            interview_2: interviews.round_2,
            interview_3: interviews.round_3,
            deals: counts.deal,
            lost: counts.lost,
            no_answer: counts.no_answer,
            on_hold: counts.on_hold,
        };
        let ebes_score = account_manager_score(&inputs, &self.scoring.account_manager_weights);
        let months = MonthlyComparison::build(&roles, &logs, today);

        let overview = PerformanceOverview {
            total_roles: counts.total,
            active_roles: counts.active,
            non_active_roles: counts.non_active,
            total_interviews: rounds_total,
            interview_1_count: interviews.round_1,
            interview_2_count: interviews.round_2,
            interview_3_count: interviews.round_3,
            total_deals: counts.deal,
            total_lost: counts.lost,
            total_on_hold: counts.on_hold,
            total_no_answer: counts.no_answer,
            total_cancelled: counts.cancelled,
            ebes_score,
            performance_label: ScoreKind::AccountManager.thresholds().classify(ebes_score),
            current_month: months.current_month.into(),
            last_month: months.last_month.into(),
            roles_to_interviews_conversion: round_tenths(conversion_rate(
                rounds_total,
                counts.total,
            )),
            interviews_to_deals_conversion: round_tenths(conversion_rate(
                counts.deal,
                rounds_total,
            )),
        };

        let clients = self.client_index()?;
        let client_performance = group_roles(&roles, |role| role.client_id)
            .into_iter()
            .filter_map(|(client_id, group)| {
                let client = clients.get(&client_id)?;
                let counts = RoleCounts::tally(&group, None);
                let tally = InterviewTally::tally(&logs_for_roles(&logs, &group), None);
                Some(ClientPerformanceView {
                    client_id,
                    client_name: client.name.clone(),
                    client_code: client.client_code.clone(),
                    total_roles: counts.total,
                    active_roles: counts.active,
                    interview_1: tally.round_1,
                    interview_2: tally.round_2,
                    interview_3: tally.round_3,
                    deals: counts.deal,
                    lost: counts.lost,
                    on_hold: counts.on_hold,
                    no_answer: counts.no_answer,
                    health: client_label(&counts),
                })
            })
            .collect();

        let teams = self.team_index()?;
        let team_performance = group_roles(&roles, |role| role.team_id)
            .into_iter()
            .filter_map(|(team_id, group)| {
                let team = teams.get(&team_id)?;
                let counts = RoleCounts::tally(&group, None);
                let tally = InterviewTally::tally(&logs_for_roles(&logs, &group), None);
                Some(TeamPerformanceView {
                    team_id,
                    team_name: team.name.clone(),
                    team_code: team.team_code.clone(),
                    total_roles: counts.total,
                    active_roles: counts.active,
                    total_interviews: tally.total,
                    total_deals: counts.deal,
                    total_lost: counts.lost,
                    performance_label: team_label(&counts),
                })
            })
            .collect();

        Ok(AccountPerformanceView {
            overview,
            client_performance,
            team_performance,
        })
    }

    pub fn account_manager_ebes(
        &self,
        principal: &Principal,
        window: Option<DateRange>,
    ) -> Result<ScoreResult, TrackerError> {
        require(principal, UserRole::AccountManager)?;
        let window = checked_window(window)?;
        let roles = self.repository.roles(&RoleFilter::owned_by(principal.user_id))?;
        let interviews = self.interview_logs_for(&roles)?;
        let snapshot = ActivitySnapshot {
            entries: &[],
            roles: &roles,
            interviews: &interviews,
        };
        Ok(compute_score(
            ScoreKind::AccountManager,
            &snapshot,
            window.as_ref(),
            &self.scoring,
        ))
    }

    fn owned_role(&self, principal: &Principal, role_id: RoleId) -> Result<RoleRecord, TrackerError> {
        self.repository
            .role(role_id)?
            .filter(|role| role.account_manager_id == principal.user_id)
            .ok_or_else(|| TrackerError::NotFound("Role not found".to_string()))
    }
}

fn client_analytics(
    client: &Client,
    roles: &[RoleRecord],
    logs: &[InterviewLog],
    submission_count: u32,
    today: NaiveDate,
) -> ClientAnalyticsView {
    let counts = RoleCounts::tally(roles, None);
    let interviews = InterviewTally::tally(logs, None);
    let months = MonthlyComparison::build(roles, logs, today);
    let health = account_health(&counts, &interviews, &months);
    let (current, last) = (months.current_month, months.last_month);

    ClientAnalyticsView {
        client_id: client.id,
        client_name: client.name.clone(),
        client_code: client.client_code.clone(),
        total_roles: counts.total,
        active_roles: counts.active,
        deal_roles: counts.deal,
        lost_roles: counts.lost,
        on_hold_roles: counts.on_hold,
        cancelled_roles: counts.cancelled,
        no_answer_roles: counts.no_answer,
        submission_count,
        total_interviews: interviews.total,
        interview_1_count: interviews.round_1,
        interview_2_count: interviews.round_2,
        interview_3_count: interviews.round_3,
        roles_to_deal_conversion: round_tenths(conversion_rate(counts.deal, counts.total)),
        interview_to_deal_conversion: round_tenths(conversion_rate(counts.deal, interviews.total)),
        stage_1_to_2_dropoff: round_tenths(stage_dropoff(interviews.round_1, interviews.round_2)),
        stage_2_to_3_dropoff: round_tenths(stage_dropoff(interviews.round_2, interviews.round_3)),
        current_month: current,
        last_month: last,
        roles_growth: rounded_growth(current.roles_created, last.roles_created),
        interviews_growth: rounded_growth(current.interviews, last.interviews),
        deals_growth: rounded_growth(current.deals, last.deals),
        deals_trend: growth_label(current.deals, last.deals),
        health_score: health.score,
        health_tag: health.tag,
        risks: health.risks,
    }
}
