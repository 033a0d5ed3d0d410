//! EBES scoring engine.
//!
//! Callers fetch the records that belong to one actor, bundle them into an
//! [`ActivitySnapshot`] and hand them to [`compute_score`], which runs the
//! aggregator, the role formula and the label classifier in that order.
//! Nothing here touches storage or looks up the current user.

pub mod aggregate;
pub mod domain;
pub mod formulas;
pub mod health;
pub mod labels;
pub mod trends;
pub mod window;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use aggregate::{
    daily_trend, entries_by, monthly_trend, roles_by, EntryCounts, InterviewTally, MonthSnapshot,
    MonthlyComparison, RoleCounts, TrendPoint,
};
pub use domain::{
    ActivityEntry, ClientId, EntryId, EntryKind, InterviewLog, InterviewRound, RoleId,
    RoleRecord, RoleStatus, SubmissionSpeed, TeamId, UserId, YearMonth,
};
pub use formulas::{
    account_manager_score, recruiter_score, recruitment_manager_score, AccountManagerInputs,
    AccountManagerWeights, RecruiterInputs, RecruitmentManagerInputs,
};
pub use health::{
    account_health, client_label, team_label, AccountHealth, AccountTag, RiskIndicators,
};
pub use labels::{
    AdminBands, AdminPerformanceLabel, HealthLabel, LabelThresholds, PerformanceLabel,
};
pub use trends::{conversion_rate, growth_label, round_tenths, rounded_growth, stage_dropoff};
pub use window::{DatePreset, DateRange};

/// Which formula and threshold table to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    Recruiter,
    AccountManager,
    RecruitmentManager,
}

impl ScoreKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recruiter => "recruiter",
            Self::AccountManager => "account_manager",
            Self::RecruitmentManager => "recruitment_manager",
        }
    }

    pub const fn thresholds(self) -> LabelThresholds {
        match self {
            Self::Recruiter => LabelThresholds::RECRUITER,
            Self::AccountManager => LabelThresholds::ACCOUNT_MANAGER,
            Self::RecruitmentManager => LabelThresholds::RECRUITMENT_MANAGER,
        }
    }
}

impl fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "recruiter" => Ok(Self::Recruiter),
            "account_manager" | "am" => Ok(Self::AccountManager),
            "recruitment_manager" | "rm" => Ok(Self::RecruitmentManager),
            other => Err(format!("unknown score kind '{other}'")),
        }
    }
}

/// Records already scoped to one actor by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivitySnapshot<'a> {
    pub entries: &'a [ActivityEntry],
    pub roles: &'a [RoleRecord],
    pub interviews: &'a [InterviewLog],
}

/// Owned form of [`ActivitySnapshot`], used when records arrive as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityBatch {
    #[serde(default)]
    pub entries: Vec<ActivityEntry>,
    #[serde(default)]
    pub roles: Vec<RoleRecord>,
    #[serde(default)]
    pub interviews: Vec<InterviewLog>,
}

impl ActivityBatch {
    pub fn snapshot(&self) -> ActivitySnapshot<'_> {
        ActivitySnapshot {
            entries: &self.entries,
            roles: &self.roles,
            interviews: &self.interviews,
        }
    }
}

/// Tunables shared by every score call site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub account_manager_weights: AccountManagerWeights,
    pub admin_bands: AdminBands,
    pub leaderboard_size: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            account_manager_weights: AccountManagerWeights::default(),
            admin_bands: AdminBands::default(),
            leaderboard_size: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecruiterBreakdown {
    #[serde(flatten)]
    pub counts: EntryCounts,
    pub total_points: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecruitmentManagerBreakdown {
    pub total_submissions: u32,
    pub total_interviews: u32,
    pub total_deals: u32,
    pub total_roles: u32,
    pub active_roles: u32,
    pub activity_points: f64,
    pub capacity_points: f64,
}

/// Raw counts behind a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScoreBreakdown {
    Recruiter(RecruiterBreakdown),
    AccountManager(AccountManagerInputs),
    RecruitmentManager(RecruitmentManagerBreakdown),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    pub kind: ScoreKind,
    pub score: f64,
    pub performance_label: PerformanceLabel,
    pub breakdown: ScoreBreakdown,
}

impl ScoreResult {
    /// Places the role-native score on the coarser admin scale.
    pub fn admin_label(&self, bands: &AdminBands) -> AdminPerformanceLabel {
        bands.classify_native(&self.kind.thresholds(), self.score)
    }
}

/// Scores one actor's records inside an optional inclusive window.
///
/// Entries are windowed by submission date and roles by creation date.
/// Interview logs count when their role was created in the window and their
/// entry month is one the window touches.
pub fn compute_score(
    kind: ScoreKind,
    snapshot: &ActivitySnapshot<'_>,
    window: Option<&DateRange>,
    config: &ScoringConfig,
) -> ScoreResult {
    match kind {
        ScoreKind::Recruiter => {
            let counts = EntryCounts::tally(snapshot.entries, window);
            let result = recruiter_score(&RecruiterInputs {
                submission_6h: counts.submission_6h,
                submission_24h: counts.submission_24h,
                submission_after_24h: counts.submission_after_24h,
                interviews: counts.interviews,
                deals: counts.deals,
                dropouts: counts.dropouts,
                total_entries: counts.total,
            });
            ScoreResult {
                kind,
                score: result.score,
                performance_label: kind.thresholds().classify(result.score),
                breakdown: ScoreBreakdown::Recruiter(RecruiterBreakdown {
                    counts,
                    total_points: result.total_points,
                }),
            }
        }
        ScoreKind::AccountManager => {
            let roles = RoleCounts::tally(snapshot.roles, window);
            let new_roles: HashSet<RoleId> = snapshot
                .roles
                .iter()
                .filter(|role| DateRange::admits(window, role.created_on()))
                .map(|role| role.id)
                .collect();
            let months = window.map(|window| (window.first_month(), window.last_month()));
            let interviews = InterviewTally::tally(
                snapshot
                    .interviews
                    .iter()
                    .filter(|log| new_roles.contains(&log.role_id)),
                months,
            );
            let inputs = AccountManagerInputs {
                new_roles: roles.total,
                interview_1: interviews.round_1,
                interview_2: interviews.round_2,
                interview_3: interviews.round_3,
                deals: roles.deal,
                lost: roles.lost,
                no_answer: roles.no_answer,
                on_hold: roles.on_hold,
            };
            let score = account_manager_score(&inputs, &config.account_manager_weights);
            ScoreResult {
                kind,
                score,
                performance_label: kind.thresholds().classify(score),
                breakdown: ScoreBreakdown::AccountManager(inputs),
            }
        }
        ScoreKind::RecruitmentManager => {
            let counts = EntryCounts::tally(snapshot.entries, window);
            let roles = RoleCounts::tally(snapshot.roles, window);
            let result = recruitment_manager_score(&RecruitmentManagerInputs {
                submission_6h: counts.submission_6h,
                submission_24h: counts.submission_24h,
                submission_after_24h: counts.submission_after_24h,
                interviews: counts.interviews,
                deals: counts.deals,
                assigned_roles: roles.total,
                active_roles: roles.active,
            });
            ScoreResult {
                kind,
                score: result.score,
                performance_label: kind.thresholds().classify(result.raw_score),
                breakdown: ScoreBreakdown::RecruitmentManager(RecruitmentManagerBreakdown {
                    total_submissions: counts.total,
                    total_interviews: counts.interviews,
                    total_deals: counts.deals,
                    total_roles: roles.total,
                    active_roles: roles.active,
                    activity_points: result.activity_points,
                    capacity_points: result.capacity_points,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).expect("valid date")
    }

    fn entry(
        id: i64,
        kind: EntryKind,
        speed: Option<SubmissionSpeed>,
        date: NaiveDate,
    ) -> ActivityEntry {
        ActivityEntry {
            id: EntryId(id),
            recruiter_id: UserId(10),
            client_id: Some(ClientId(1)),
            team_id: Some(TeamId(1)),
            role_id: Some(RoleId(1)),
            account_manager_id: None,
            recruitment_manager_id: None,
            kind,
            submission_speed: speed,
            interview_round: None,
            submission_date: Some(date),
            dropout_role_id: None,
            notes: String::new(),
            created_at: None,
        }
    }

    fn role(id: i64, status: RoleStatus, created: NaiveDate) -> RoleRecord {
        RoleRecord {
            id: RoleId(id),
            role_code: format!("ROLE-{id:04}"),
            client_id: ClientId(1),
            team_id: TeamId(1),
            account_manager_id: UserId(2),
            title: "Data Engineer".to_string(),
            description: String::new(),
            status: Some(status),
            created_at: created.and_hms_opt(8, 0, 0),
            updated_at: created.and_hms_opt(8, 0, 0),
        }
    }

    #[test]
    fn empty_snapshot_scores_zero_at_risk_for_every_kind() {
        let config = ScoringConfig::default();
        for kind in [
            ScoreKind::Recruiter,
            ScoreKind::AccountManager,
            ScoreKind::RecruitmentManager,
        ] {
            let result = compute_score(kind, &ActivitySnapshot::default(), None, &config);
            assert_eq!(result.score, 0.0, "{kind}");
            assert_eq!(result.performance_label, PerformanceLabel::AtRisk, "{kind}");
        }
    }

    #[test]
    fn recruiter_scenario_is_excellent() {
        let entries = vec![
            entry(1, EntryKind::Submission, Some(SubmissionSpeed::Within6h), day(2)),
            entry(2, EntryKind::Submission, Some(SubmissionSpeed::Within6h), day(3)),
            entry(3, EntryKind::Submission, Some(SubmissionSpeed::Within24h), day(4)),
            entry(4, EntryKind::Interview, None, day(5)),
            entry(5, EntryKind::Deal, None, day(6)),
        ];
        let snapshot = ActivitySnapshot {
            entries: &entries,
            ..ActivitySnapshot::default()
        };
        let window = DateRange::current_month(day(20));

        let result = compute_score(
            ScoreKind::Recruiter,
            &snapshot,
            Some(&window),
            &ScoringConfig::default(),
        );
        assert_eq!(result.score, 5.0);
        assert_eq!(result.performance_label, PerformanceLabel::Excellent);
        match result.breakdown {
            ScoreBreakdown::Recruiter(breakdown) => {
                assert_eq!(breakdown.total_points, 25);
                assert_eq!(breakdown.counts.total, 5);
            }
            other => panic!("unexpected breakdown {other:?}"),
        }
    }

    #[test]
    fn recruitment_manager_scenario_is_strong() {
        let entries = vec![
            entry(1, EntryKind::Submission, Some(SubmissionSpeed::Within6h), day(2)),
            entry(2, EntryKind::Submission, Some(SubmissionSpeed::Within6h), day(2)),
            entry(3, EntryKind::Interview, None, day(3)),
            entry(4, EntryKind::Deal, None, day(4)),
        ];
        let roles = vec![
            role(1, RoleStatus::Active, day(1)),
            role(2, RoleStatus::Active, day(1)),
            role(3, RoleStatus::Deal, day(1)),
            role(4, RoleStatus::Lost, day(1)),
            role(5, RoleStatus::OnHold, day(1)),
        ];
        let snapshot = ActivitySnapshot {
            entries: &entries,
            roles: &roles,
            ..ActivitySnapshot::default()
        };

        let result = compute_score(
            ScoreKind::RecruitmentManager,
            &snapshot,
            None,
            &ScoringConfig::default(),
        );
        assert_eq!(result.score, 82.4);
        assert_eq!(result.performance_label, PerformanceLabel::Strong);
    }

    #[test]
    fn account_manager_interviews_follow_window_months() {
        let roles = vec![role(1, RoleStatus::Active, day(1))];
        let march = YearMonth::new(2026, 3).expect("valid");
        let logs = vec![
            InterviewLog {
                role_id: RoleId(1),
                round: Some(InterviewRound::First),
                count: 5,
                entry_month: Some(march),
            },
            InterviewLog {
                role_id: RoleId(1),
                round: Some(InterviewRound::Second),
                count: 4,
                entry_month: Some(march.previous()),
            },
            InterviewLog {
                role_id: RoleId(1),
                round: Some(InterviewRound::Third),
                count: 7,
                entry_month: Some(march),
            },
        ];
        let snapshot = ActivitySnapshot {
            roles: &roles,
            interviews: &logs,
            ..ActivitySnapshot::default()
        };
        let window = DateRange::current_month(day(15));
        let config = ScoringConfig::default();

        let result = compute_score(ScoreKind::AccountManager, &snapshot, Some(&window), &config);
        // one new role plus five first-round interviews; round three is ignored
        assert_eq!(result.score, 12.0);

        let all_time = compute_score(ScoreKind::AccountManager, &snapshot, None, &config);
        assert_eq!(all_time.score, 20.0);
        assert_eq!(all_time.performance_label, PerformanceLabel::Average);
    }

    #[test]
    fn account_manager_window_ignores_interviews_on_older_roles() {
        let february = NaiveDate::from_ymd_opt(2026, 2, 10).expect("valid date");
        let roles = vec![role(1, RoleStatus::Active, february)];
        let logs = vec![InterviewLog {
            role_id: RoleId(1),
            round: Some(InterviewRound::First),
            count: 10,
            entry_month: Some(YearMonth::of(day(1))),
        }];
        let snapshot = ActivitySnapshot {
            roles: &roles,
            interviews: &logs,
            ..ActivitySnapshot::default()
        };
        let config = ScoringConfig::default();

        let march = DateRange::current_month(day(15));
        let windowed = compute_score(ScoreKind::AccountManager, &snapshot, Some(&march), &config);
        assert_eq!(windowed.score, 0.0);
        match windowed.breakdown {
            ScoreBreakdown::AccountManager(inputs) => {
                assert_eq!(inputs.new_roles, 0);
                assert_eq!(inputs.interview_1, 0);
            }
            other => panic!("unexpected breakdown {other:?}"),
        }

        let all_time = compute_score(ScoreKind::AccountManager, &snapshot, None, &config);
        assert_eq!(all_time.score, 22.0);
    }

    #[test]
    fn admin_label_uses_configured_bands() {
        let result = ScoreResult {
            kind: ScoreKind::RecruitmentManager,
            score: 82.4,
            performance_label: PerformanceLabel::Strong,
            breakdown: ScoreBreakdown::AccountManager(AccountManagerInputs::default()),
        };
        assert_eq!(
            result.admin_label(&AdminBands::default()),
            AdminPerformanceLabel::Good
        );
        let recruiter = ScoreResult {
            kind: ScoreKind::Recruiter,
            score: 4.2,
            performance_label: PerformanceLabel::Excellent,
            breakdown: ScoreBreakdown::AccountManager(AccountManagerInputs::default()),
        };
        assert_eq!(
            recruiter.admin_label(&AdminBands::default()),
            AdminPerformanceLabel::Excellent
        );
    }

    #[test]
    fn score_kind_parses_loose_spellings() {
        assert_eq!(
            "account-manager".parse::<ScoreKind>(),
            Ok(ScoreKind::AccountManager)
        );
        assert_eq!(
            "RM".parse::<ScoreKind>(),
            Ok(ScoreKind::RecruitmentManager)
        );
        assert!("admin".parse::<ScoreKind>().is_err());
    }
}
