use super::common::*;

use crate::config::TrackerConfig;
use axum::http::StatusCode;

use crate::scoring::{
    AccountTag, AdminPerformanceLabel, DateRange, EntryKind, InterviewRound, PerformanceLabel, RoleId, RoleStatus,
    SubmissionSpeed, UserId,
};
use crate::tracker::domain::{
    ClientAssignmentRequest, InterviewLogRequest, LoginRequest, NewRoleRequest, RoleUpdate,
    SubmissionRequest, UserRole, DROPOUT_REVIEW_REASON,
};
use crate::tracker::params::{
    EbesScope, ManagerAnalyticsFilter, PerformanceStatsFilter, RecruiterAnalyticsFilter,
};
use crate::tracker::repository::{EntryFilter, StatusFilter, TrackerRepository};
use crate::tracker::TrackerError;

fn submission_request(kind: EntryKind) -> SubmissionRequest {
    SubmissionRequest {
        client_id: None,
        team_id: None,
        role_id: None,
        submission_type: None,
        submission_date: today(),
        notes: None,
        entry_type: Some(kind),
        interview_level: None,
        dropout_role_id: None,
    }
}

#[test]
fn login_matches_email_case_insensitively() {
    let (service, _) = build_service();
    let view = service
        .login(LoginRequest {
            email: "  Riley@EBES.test ".to_string(),
            password: "letmein".to_string(),
        })
        .expect("valid credentials");
    assert_eq!(view.user.id, RILEY);
    assert_eq!(view.user.role, UserRole::Recruiter);
}

#[test]
fn login_rejects_wrong_password_and_deactivated_accounts() {
    let (service, _) = build_service();
    let wrong = service.login(LoginRequest {
        email: "riley@ebes.test".to_string(),
        password: "nope".to_string(),
    });
    assert!(matches!(wrong, Err(TrackerError::InvalidCredentials)));

    let former = service.login(LoginRequest {
        email: "former@ebes.test".to_string(),
        password: "letmein".to_string(),
    });
    assert!(matches!(former, Err(TrackerError::Deactivated)));
}

#[test]
fn authenticate_rejects_unknown_and_inactive_users() {
    let (service, _) = build_service();
    assert!(matches!(
        service.authenticate(UserId(99)),
        Err(TrackerError::Unauthorized)
    ));
    assert!(matches!(
        service.authenticate(FORMER),
        Err(TrackerError::Deactivated)
    ));
    let principal = service.authenticate(SAM).expect("active recruiter");
    assert_eq!(principal.role, UserRole::Recruiter);
}

#[test]
fn operations_check_the_callers_role() {
    let (service, _) = build_service();
    let result = service.account_manager_roles(&principal(RILEY, UserRole::Recruiter), None);
    match result {
        Err(TrackerError::Forbidden(message)) => {
            assert_eq!(message, "Unauthorized - Account Manager only");
        }
        other => panic!("expected forbidden, got {other:?}"),
    }
}

#[test]
fn role_listing_filters_by_status_and_carries_interview_totals() {
    let (service, _) = build_service();
    let am = principal(ACCOUNT_MANAGER, UserRole::AccountManager);

    let active = service
        .account_manager_roles(&am, Some(StatusFilter::Active))
        .expect("roles");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].role.title, "Platform Engineer");
    assert_eq!(active[0].interview_1_count, 3);
    assert_eq!(active[0].client_name.as_deref(), Some("Acme"));

    let closed = service
        .account_manager_roles(&am, Some(StatusFilter::NonActive))
        .expect("roles");
    assert_eq!(closed.len(), 2);
}

#[test]
fn create_role_enforces_the_active_role_limit() {
    let (service, _) = build_service_with(TrackerConfig {
        active_role_limit: 1,
    });
    let am = principal(ACCOUNT_MANAGER, UserRole::AccountManager);
    let result = service.create_role(
        &am,
        NewRoleRequest {
            client_id: ACME,
            team_id: PLATFORM,
            title: "Backend Engineer".to_string(),
            description: None,
        },
        at(2026, 3, 15),
    );
    match result {
        Err(error @ TrackerError::ActiveRoleLimit { limit: 1 }) => {
            assert!(error.to_string().contains("maximum of 1 active roles"));
        }
        other => panic!("expected active role limit, got {other:?}"),
    }
}

#[test]
fn create_role_assigns_the_next_role_code() {
    let (service, repository) = build_service();
    let am = principal(ACCOUNT_MANAGER, UserRole::AccountManager);
    let created = service
        .create_role(
            &am,
            NewRoleRequest {
                client_id: GLOBEX,
                team_id: DATA,
                title: " Backend Engineer ".to_string(),
                description: Some("Rust services".to_string()),
            },
            at(2026, 3, 15),
        )
        .expect("role created");
    assert_eq!(created.role_code, "ROLE-0004");

    let stored = repository
        .role(created.id)
        .expect("query")
        .expect("stored role");
    assert_eq!(stored.title, "Backend Engineer");
    assert!(stored.has_status(RoleStatus::Active));
    assert_eq!(stored.account_manager_id, ACCOUNT_MANAGER);
}

#[test]
fn update_role_requires_fields_and_ownership() {
    let (service, repository) = build_service();
    let am = principal(ACCOUNT_MANAGER, UserRole::AccountManager);

    let empty = service.update_role(&am, RoleId(1), RoleUpdate::default(), at(2026, 3, 15));
    assert!(matches!(empty, Err(TrackerError::Validation(_))));

    let missing = service.update_role(
        &am,
        RoleId(42),
        RoleUpdate {
            status: Some(RoleStatus::OnHold),
            ..RoleUpdate::default()
        },
        at(2026, 3, 15),
    );
    assert!(matches!(missing, Err(TrackerError::NotFound(_))));

    service
        .update_role(
            &am,
            RoleId(1),
            RoleUpdate {
                status: Some(RoleStatus::OnHold),
                ..RoleUpdate::default()
            },
            at(2026, 3, 15),
        )
        .expect("update");
    let stored = repository.role(RoleId(1)).expect("query").expect("role");
    assert!(stored.has_status(RoleStatus::OnHold));
    assert_eq!(stored.updated_at, Some(at(2026, 3, 15)));
}

#[test]
fn interview_batches_must_be_positive() {
    let (service, repository) = build_service();
    let am = principal(ACCOUNT_MANAGER, UserRole::AccountManager);
    let zero = service.log_interviews(
        &am,
        RoleId(1),
        InterviewLogRequest {
            interview_round: InterviewRound::Third,
            interview_count: 0,
        },
        today(),
    );
    assert!(matches!(zero, Err(TrackerError::Validation(_))));

    service
        .log_interviews(
            &am,
            RoleId(1),
            InterviewLogRequest {
                interview_round: InterviewRound::Third,
                interview_count: 2,
            },
            today(),
        )
        .expect("logged");
    let logs = repository.interview_logs(&[RoleId(1)]).expect("logs");
    assert_eq!(logs.iter().map(|log| log.count).sum::<u32>(), 5);
}

#[test]
fn reminder_disappears_once_confirmed() {
    let (service, _) = build_service();
    let am = principal(ACCOUNT_MANAGER, UserRole::AccountManager);
    assert!(service.reminder_status(&am, today()).expect("status").should_show);
    service.confirm_reminder(&am, today()).expect("confirm");
    assert!(!service.reminder_status(&am, today()).expect("status").should_show);
    assert!(
        service
            .reminder_status(&am, date(2026, 4, 1))
            .expect("status")
            .should_show
    );
}

#[test]
fn account_analytics_tags_each_client() {
    let (service, _) = build_service();
    let am = principal(ACCOUNT_MANAGER, UserRole::AccountManager);
    let analytics = service
        .account_analytics(&am, None, today())
        .expect("analytics");

    assert_eq!(analytics.summary.total_clients, 2);
    assert_eq!(analytics.summary.strong_accounts, 1);
    assert_eq!(analytics.summary.at_risk_accounts, 1);

    let acme = &analytics.clients[0];
    assert_eq!(acme.client_name, "Acme");
    assert_eq!(acme.submission_count, 3);
    assert_eq!(acme.total_interviews, 5);
    assert_eq!(acme.current_month.deals, 1);
    assert_eq!(acme.deals_trend, "+100%");
    assert_eq!(acme.health_score, 80);
    assert_eq!(acme.health_tag, AccountTag::Strong);

    let globex = &analytics.clients[1];
    assert_eq!(globex.health_tag, AccountTag::AtRisk);
}

#[test]
fn account_manager_score_uses_the_configured_weights() {
    let (service, _) = build_service();
    let am = principal(ACCOUNT_MANAGER, UserRole::AccountManager);
    let result = service.account_manager_ebes(&am, None).expect("score");
    assert_eq!(result.score, 22.0);
    assert_eq!(result.performance_label, PerformanceLabel::Average);

    let inverted = DateRange::new(date(2026, 3, 10), date(2026, 3, 1));
    assert!(matches!(
        service.account_manager_ebes(&am, Some(inverted)),
        Err(TrackerError::Validation(_))
    ));
}

#[test]
fn windowed_account_manager_score_counts_interviews_on_new_roles_only() {
    let (service, _) = build_service();
    let am = principal(ACCOUNT_MANAGER, UserRole::AccountManager);
    service
        .log_interviews(
            &am,
            RoleId(2),
            InterviewLogRequest {
                interview_round: InterviewRound::First,
                interview_count: 4,
            },
            today(),
        )
        .expect("interviews logged");

    let march = DateRange::new(date(2026, 3, 1), date(2026, 3, 31));
    let windowed = service
        .account_manager_ebes(&am, Some(march))
        .expect("score");
    assert_eq!(windowed.score, 8.0);

    let all_time = service.account_manager_ebes(&am, None).expect("score");
    assert_eq!(all_time.score, 30.0);
}

#[test]
fn deal_entries_close_the_role() {
    let (service, repository) = build_service();
    let riley = principal(RILEY, UserRole::Recruiter);
    let mut request = submission_request(EntryKind::Deal);
    request.role_id = Some(RoleId(1));

    let created = service
        .record_submission(&riley, request, at(2026, 3, 15))
        .expect("recorded");

    let role = repository.role(RoleId(1)).expect("query").expect("role");
    assert!(role.has_status(RoleStatus::Deal));
    let entries = repository
        .entries(&EntryFilter::by_recruiter(RILEY))
        .expect("entries");
    let stored = entries
        .iter()
        .find(|entry| entry.id == created.id)
        .expect("stored entry");
    assert_eq!(stored.client_id, Some(ACME));
    assert_eq!(stored.account_manager_id, Some(ACCOUNT_MANAGER));
    assert_eq!(stored.recruitment_manager_id, Some(RECRUITMENT_MANAGER));
}

#[test]
fn dropouts_file_a_pending_review() {
    let (service, repository) = build_service();
    let riley = principal(RILEY, UserRole::Recruiter);
    let mut request = submission_request(EntryKind::Dropout);
    request.dropout_role_id = Some(RoleId(2));

    service
        .record_submission(&riley, request, at(2026, 3, 15))
        .expect("recorded");

    let reviews = repository.pending_reviews(RoleId(2)).expect("reviews");
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].previous_status, Some(RoleStatus::Deal));
    assert_eq!(reviews[0].reason, DROPOUT_REVIEW_REASON);
    assert_eq!(reviews[0].created_by, RILEY);

    let mut unknown = submission_request(EntryKind::Dropout);
    unknown.dropout_role_id = Some(RoleId(77));
    match service.record_submission(&riley, unknown, at(2026, 3, 15)) {
        Err(TrackerError::NotFound(message)) => assert_eq!(message, "Dropout role not found"),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn recruiter_views_are_scoped_to_the_caller() {
    let (service, _) = build_service();
    let riley = principal(RILEY, UserRole::Recruiter);

    let clients = service.recruiter_clients(&riley).expect("clients");
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].team_name, "Platform");

    let info = service.recruiter_team_info(&riley).expect("team info");
    assert_eq!(
        info.recruitment_manager.map(|rm| rm.id),
        Some(RECRUITMENT_MANAGER)
    );

    let deals = service.recruiter_deal_roles(&riley).expect("deal roles");
    assert_eq!(deals.len(), 1);
    assert_eq!(deals[0].role.id, RoleId(2));

    let list = service
        .recruiter_submissions(&riley, None, None)
        .expect("submissions");
    assert_eq!(list.stats.total, 3);
    assert_eq!(list.submissions[0].entry.kind, EntryKind::Deal);
    assert_eq!(list.submissions[0].role_title.as_deref(), Some("Data Analyst"));
}

#[test]
fn recruiter_score_scopes() {
    let (service, _) = build_service();
    let riley = principal(RILEY, UserRole::Recruiter);

    let combined = service
        .recruiter_ebes(&riley, EbesScope::Combined, None, today())
        .expect("score");
    assert!((combined.score - 17.0 / 3.0).abs() < 1e-9);
    assert_eq!(combined.performance_label, PerformanceLabel::Excellent);

    let april = service
        .recruiter_ebes(&riley, EbesScope::Date, None, date(2026, 4, 2))
        .expect("score");
    assert_eq!(april.score, 0.0);
    assert_eq!(april.performance_label, PerformanceLabel::AtRisk);

    let sam = principal(SAM, UserRole::Recruiter);
    let globex = service
        .recruiter_ebes(&sam, EbesScope::Client, Some(GLOBEX), today())
        .expect("score");
    assert_eq!(globex.score, 3.0);
}

#[test]
fn recruiter_analytics_breaks_down_by_client_and_team() {
    let (service, _) = build_service();
    let riley = principal(RILEY, UserRole::Recruiter);
    let analytics = service
        .recruiter_analytics(
            &riley,
            RecruiterAnalyticsFilter {
                client_id: None,
                role_id: None,
                kind: None,
                window: Some(DateRange::current_month(today())),
            },
            today(),
        )
        .expect("analytics");

    assert_eq!(analytics.total_submissions, 1);
    assert_eq!(analytics.total_interviews, 1);
    assert_eq!(analytics.interview_1, 1);
    assert_eq!(analytics.total_deals, 1);
    assert_eq!(analytics.active_roles_count, 1);
    assert_eq!(analytics.client_breakdown[0].name, "Acme");
    assert_eq!(analytics.client_breakdown[0].count, 3);
    assert_eq!(analytics.daily_trend.len(), 3);
}

#[test]
fn manager_analytics_cover_only_assigned_teams() {
    let (service, _) = build_service();
    let rm = principal(RECRUITMENT_MANAGER, UserRole::RecruitmentManager);
    let analytics = service
        .rm_analytics(&rm, ManagerAnalyticsFilter::default())
        .expect("analytics");

    assert_eq!(analytics.total_teams, 1);
    assert_eq!(analytics.total_recruiters, 1);
    assert_eq!(analytics.total_active_roles, 1);
    assert_eq!(analytics.total_deals, 1);
    assert_eq!(analytics.total_interviews, 5);
    assert_eq!(analytics.recruiter_breakdown[0].recruiter_id, RILEY);
    assert_eq!(analytics.recruiter_breakdown[0].total_submissions, 3);

    let roster = service.rm_recruiters(&rm).expect("recruiters");
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].team_code, "TM-001");
}

#[test]
fn team_analytics_requires_an_assigned_team() {
    let (service, _) = build_service();
    let rm = principal(RECRUITMENT_MANAGER, UserRole::RecruitmentManager);

    match service.rm_team_analytics(&rm, DATA, None) {
        Err(TrackerError::NotFound(message)) => {
            assert_eq!(message, "Team not assigned to this recruitment manager");
        }
        other => panic!("expected not found, got {other:?}"),
    }

    let detail = service
        .rm_team_analytics(&rm, PLATFORM, None)
        .expect("team analytics");
    assert_eq!(detail.team_stats.total_recruiters, 1);
    assert_eq!(detail.team_stats.speeds.total_submissions, 3);
    assert_eq!(detail.team_stats.speeds.submission_6h, 1);
    assert_eq!(detail.recruiter_stats[0].recruiter_name, "Riley Chen");
}

#[test]
fn recruitment_manager_score_follows_team_activity() {
    let (service, _) = build_service();
    let rm = principal(RECRUITMENT_MANAGER, UserRole::RecruitmentManager);
    let result = service.rm_ebes_score(&rm, None).expect("score");
    assert_eq!(result.score, 171.4);
    assert_eq!(result.performance_label, PerformanceLabel::Excellent);

    let summary = service
        .rm_performance_summary(&rm, None)
        .expect("summary");
    assert_eq!(summary.total_submissions, 3);
    assert_eq!(summary.total_recruiters, 1);
}

#[test]
fn performance_stats_skip_admins_and_inactive_users() {
    let (service, _) = build_service();
    let admin = principal(ADMIN, UserRole::Admin);

    let everyone = service
        .performance_stats(&admin, PerformanceStatsFilter::default())
        .expect("stats");
    assert_eq!(everyone.len(), 4);
    assert!(everyone.iter().all(|row| row.role != UserRole::Admin));
    assert!(everyone.iter().all(|row| row.user_id != FORMER));

    let recruiters = service
        .performance_stats(
            &admin,
            PerformanceStatsFilter {
                role: Some(UserRole::Recruiter),
                user_name: Some("riley".to_string()),
                ..PerformanceStatsFilter::default()
            },
        )
        .expect("stats");
    assert_eq!(recruiters.len(), 1);
    assert_eq!(recruiters[0].total_submissions, Some(1));
    assert_eq!(recruiters[0].deals, Some(1));
    assert_eq!(recruiters[0].total_roles, None);
}

#[test]
fn admin_labels_rescale_each_role_score() {
    let (service, _) = build_service();
    let admin = principal(ADMIN, UserRole::Admin);
    let rows = service
        .performance_stats(&admin, PerformanceStatsFilter::default())
        .expect("stats");

    let riley = rows
        .iter()
        .find(|row| row.user_id == RILEY)
        .expect("riley listed");
    assert!((riley.ebes_score - 17.0 / 3.0).abs() < 1e-9);
    assert_eq!(riley.performance_label, AdminPerformanceLabel::Excellent);

    let am = rows
        .iter()
        .find(|row| row.user_id == ACCOUNT_MANAGER)
        .expect("account manager listed");
    assert_eq!(am.ebes_score, 22.0);
    assert_eq!(am.performance_label, AdminPerformanceLabel::NeedsImprovement);
}

#[test]
fn leaderboards_rank_each_role() {
    let (service, _) = build_service();
    let boards = service
        .leaderboards(&principal(ADMIN, UserRole::Admin))
        .expect("leaderboards");
    assert_eq!(boards.recruiters.len(), 2);
    assert_eq!(boards.recruiters[0].name, "Riley Chen");
    assert_eq!(boards.recruiters[1].team, "Data");
    assert_eq!(boards.account_managers[0].ebes_score, 22.0);
}

#[test]
fn recruiters_need_a_team_when_assigned_a_client() {
    let (service, repository) = build_service();
    let admin = principal(ADMIN, UserRole::Admin);
    let without_team = service.assign_client(
        &admin,
        ClientAssignmentRequest {
            user_id: SAM,
            client_id: ACME,
            team_id: None,
        },
    );
    assert!(matches!(without_team, Err(TrackerError::Validation(_))));

    service
        .assign_client(
            &admin,
            ClientAssignmentRequest {
                user_id: SAM,
                client_id: ACME,
                team_id: Some(PLATFORM),
            },
        )
        .expect("placement");
    let placements = repository.placements(SAM).expect("placements");
    assert_eq!(placements.len(), 2);

    let duplicate = service.assign_client(
        &admin,
        ClientAssignmentRequest {
            user_id: SAM,
            client_id: ACME,
            team_id: Some(PLATFORM),
        },
    );
    match duplicate {
        Err(error) => assert_eq!(error.status_code(), StatusCode::CONFLICT),
        Ok(_) => panic!("duplicate placement accepted"),
    }
}

#[test]
fn submission_speed_is_stored_as_sent() {
    let (service, repository) = build_service();
    let sam = principal(SAM, UserRole::Recruiter);
    let mut request = submission_request(EntryKind::Submission);
    request.client_id = Some(GLOBEX);
    request.team_id = Some(DATA);
    request.submission_type = Some(SubmissionSpeed::After24h);
    service
        .record_submission(&sam, request, at(2026, 3, 15))
        .expect("recorded");

    let entries = repository
        .entries(&EntryFilter::by_recruiter(SAM))
        .expect("entries");
    let latest = entries.last().expect("entry");
    assert_eq!(latest.submission_speed, Some(SubmissionSpeed::After24h));
    assert_eq!(latest.recruitment_manager_id, None);
}
