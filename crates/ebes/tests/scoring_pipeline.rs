//! End-to-end scoring scenarios driven through the public API: activity is
//! loaded from JSON the way the CLI reads it, then scored per user role.

use chrono::NaiveDate;
use serde_json::json;

use ebes::scoring::{
    account_health, compute_score, AccountTag, ActivityBatch, DateRange, InterviewTally,
    MonthlyComparison, PerformanceLabel, RiskIndicators, RoleCounts, ScoreBreakdown, ScoreKind,
    ScoringConfig,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn march() -> DateRange {
    DateRange::current_month(day(2026, 3, 20))
}

fn batch(value: serde_json::Value) -> ActivityBatch {
    serde_json::from_value(value).expect("activity batch parses")
}

fn recruiter_batch() -> ActivityBatch {
    batch(json!({
        "entries": [
            { "id": 1, "recruiter_id": 7, "kind": "submission", "submission_speed": "6h", "submission_date": "2026-03-02" },
            { "id": 2, "recruiter_id": 7, "kind": "submission", "submission_speed": "6h", "submission_date": "2026-03-03" },
            { "id": 3, "recruiter_id": 7, "kind": "interview", "interview_round": 2, "submission_date": "2026-03-04" },
            { "id": 4, "recruiter_id": 7, "kind": "dropout", "submission_date": "2026-02-27" }
        ]
    }))
}

#[test]
fn recruiter_dropouts_pull_the_all_time_score_down() {
    let config = ScoringConfig::default();
    let activity = recruiter_batch();

    let all_time = compute_score(ScoreKind::Recruiter, &activity.snapshot(), None, &config);
    assert_eq!(all_time.score, 1.75);
    assert_eq!(all_time.performance_label, PerformanceLabel::AtRisk);

    let this_month = compute_score(
        ScoreKind::Recruiter,
        &activity.snapshot(),
        Some(&march()),
        &config,
    );
    assert_eq!(this_month.score, 4.0);
    assert_eq!(this_month.performance_label, PerformanceLabel::Excellent);
    match this_month.breakdown {
        ScoreBreakdown::Recruiter(breakdown) => {
            assert_eq!(breakdown.counts.total, 3);
            assert_eq!(breakdown.counts.interview_2, 1);
            assert_eq!(breakdown.total_points, 12);
        }
        other => panic!("unexpected breakdown {other:?}"),
    }
}

#[test]
fn account_manager_interviews_follow_their_logged_month() {
    let activity = batch(json!({
        "roles": [
            { "id": 1, "client_id": 1, "team_id": 1, "account_manager_id": 2, "status": "active", "created_at": "2026-03-02T09:00:00" },
            { "id": 2, "client_id": 1, "team_id": 1, "account_manager_id": 2, "status": "deal", "created_at": "2026-03-03T09:00:00" },
            { "id": 3, "client_id": 2, "team_id": 1, "account_manager_id": 2, "status": "lost", "created_at": "2026-03-04T09:00:00" },
            { "id": 4, "client_id": 2, "team_id": 1, "account_manager_id": 2, "status": "no_answer", "created_at": "2026-03-05T09:00:00" }
        ],
        "interviews": [
            { "role_id": 1, "round": 1, "count": 4, "entry_month": "2026-03" },
            { "role_id": 1, "round": 3, "count": 2, "entry_month": "2026-03" },
            { "role_id": 2, "round": 2, "count": 1, "entry_month": "2026-02" }
        ]
    }));
    let config = ScoringConfig::default();

    let all_time = compute_score(
        ScoreKind::AccountManager,
        &activity.snapshot(),
        None,
        &config,
    );
    assert_eq!(all_time.score, 22.0);
    assert_eq!(all_time.performance_label, PerformanceLabel::Average);

    let this_month = compute_score(
        ScoreKind::AccountManager,
        &activity.snapshot(),
        Some(&march()),
        &config,
    );
    assert_eq!(this_month.score, 20.0);
    assert_eq!(this_month.performance_label, PerformanceLabel::Average);
}

#[test]
fn recruitment_manager_score_is_relative_to_role_load() {
    let activity = batch(json!({
        "entries": [
            { "id": 1, "recruiter_id": 7, "kind": "submission", "submission_speed": "6h", "submission_date": "2026-03-02" },
            { "id": 2, "recruiter_id": 7, "kind": "submission", "submission_speed": "24h", "submission_date": "2026-03-02" },
            { "id": 3, "recruiter_id": 8, "kind": "submission", "submission_speed": "24h", "submission_date": "2026-03-03" },
            { "id": 4, "recruiter_id": 8, "kind": "interview", "interview_round": 1, "submission_date": "2026-03-04" },
            { "id": 5, "recruiter_id": 8, "kind": "deal", "submission_date": "2026-03-06" }
        ],
        "roles": [
            { "id": 1, "client_id": 1, "team_id": 1, "account_manager_id": 2, "status": "active", "created_at": "2026-03-01T09:00:00" },
            { "id": 2, "client_id": 1, "team_id": 1, "account_manager_id": 2, "status": "deal", "created_at": "2026-03-01T10:00:00" }
        ]
    }));

    let result = compute_score(
        ScoreKind::RecruitmentManager,
        &activity.snapshot(),
        None,
        &ScoringConfig::default(),
    );
    assert_eq!(result.score, 214.3);
    assert_eq!(result.performance_label, PerformanceLabel::Excellent);

    let idle = ActivityBatch {
        roles: Vec::new(),
        ..activity
    };
    let without_roles = compute_score(
        ScoreKind::RecruitmentManager,
        &idle.snapshot(),
        None,
        &ScoringConfig::default(),
    );
    assert_eq!(without_roles.score, 0.0);
    assert_eq!(without_roles.performance_label, PerformanceLabel::AtRisk);
}

#[test]
fn scores_serialize_with_dashboard_labels() {
    let result = compute_score(
        ScoreKind::Recruiter,
        &recruiter_batch().snapshot(),
        Some(&march()),
        &ScoringConfig::default(),
    );
    let payload = serde_json::to_value(result).expect("score serializes");
    assert_eq!(payload["kind"], "recruiter");
    assert_eq!(payload["performance_label"], "Excellent");
    assert_eq!(payload["breakdown"]["total_points"], 12);
}

#[test]
fn idle_accounts_are_at_risk_without_indicators() {
    let health = account_health(
        &RoleCounts::default(),
        &InterviewTally::default(),
        &MonthlyComparison::default(),
    );
    assert_eq!(health.score, 0);
    assert_eq!(health.tag, AccountTag::AtRisk);
    assert_eq!(health.risks, RiskIndicators::default());
}
