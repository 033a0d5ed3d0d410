use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::config::TrackerConfig;
use crate::scoring::{
    ActivityEntry, ClientId, EntryId, EntryKind, InterviewLog, InterviewRound, RoleId,
    RoleRecord, RoleStatus, ScoringConfig, SubmissionSpeed, TeamId, UserId, YearMonth,
};
use crate::tracker::domain::{Client, Placement, Principal, Team, User, UserRole};
use crate::tracker::memory::InMemoryTrackerRepository;
use crate::tracker::repository::TrackerRepository;
use crate::tracker::{tracker_router, TrackerService, USER_HEADER};

pub(super) const ADMIN: UserId = UserId(1);
pub(super) const ACCOUNT_MANAGER: UserId = UserId(2);
pub(super) const RECRUITMENT_MANAGER: UserId = UserId(3);
pub(super) const RILEY: UserId = UserId(4);
pub(super) const SAM: UserId = UserId(5);
pub(super) const FORMER: UserId = UserId(6);

pub(super) const ACME: ClientId = ClientId(1);
pub(super) const GLOBEX: ClientId = ClientId(2);
pub(super) const PLATFORM: TeamId = TeamId(1);
pub(super) const DATA: TeamId = TeamId(2);

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(9, 30, 0).expect("valid time")
}

pub(super) fn today() -> NaiveDate {
    date(2026, 3, 15)
}

pub(super) fn principal(user_id: UserId, role: UserRole) -> Principal {
    Principal { user_id, role }
}

fn user(id: UserId, name: &str, email: &str, role: UserRole, is_active: bool) -> User {
    User {
        id,
        user_code: format!("USR-{:03}", id.0),
        name: name.to_string(),
        email: email.to_string(),
        password: "letmein".to_string(),
        role,
        is_active,
    }
}

fn role(
    client_id: ClientId,
    team_id: TeamId,
    title: &str,
    status: RoleStatus,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
) -> RoleRecord {
    RoleRecord {
        id: RoleId(0),
        role_code: String::new(),
        client_id,
        team_id,
        account_manager_id: ACCOUNT_MANAGER,
        title: title.to_string(),
        description: String::new(),
        status: Some(status),
        created_at: Some(created_at),
        updated_at: Some(updated_at),
    }
}

pub(super) fn entry(
    recruiter_id: UserId,
    kind: EntryKind,
    role_id: RoleId,
    client_id: ClientId,
    team_id: TeamId,
    on: NaiveDate,
) -> ActivityEntry {
    ActivityEntry {
        id: EntryId(0),
        recruiter_id,
        client_id: Some(client_id),
        team_id: Some(team_id),
        role_id: Some(role_id),
        account_manager_id: Some(ACCOUNT_MANAGER),
        recruitment_manager_id: (team_id == PLATFORM).then_some(RECRUITMENT_MANAGER),
        kind,
        submission_speed: None,
        interview_round: None,
        submission_date: Some(on),
        dropout_role_id: None,
        notes: String::new(),
        created_at: Some(on.and_hms_opt(12, 0, 0).expect("valid time")),
    }
}

/// Seeds one account manager owning three roles across two clients, a
/// recruitment manager on the platform team and two placed recruiters.
///
/// Role 1 (Acme, platform) is active, role 2 (Acme, platform) closed as a
/// deal on 2026-03-05 and role 3 (Globex, data) was lost in February.
pub(super) fn seeded_store() -> InMemoryTrackerRepository {
    let store = InMemoryTrackerRepository::default();
    for user in [
        user(ADMIN, "Avery Admin", "admin@ebes.test", UserRole::Admin, true),
        user(ACCOUNT_MANAGER, "Alex Morgan", "am@ebes.test", UserRole::AccountManager, true),
        user(
            RECRUITMENT_MANAGER,
            "Jordan Lee",
            "rm@ebes.test",
            UserRole::RecruitmentManager,
            true,
        ),
        user(RILEY, "Riley Chen", "riley@ebes.test", UserRole::Recruiter, true),
        user(SAM, "Sam Patel", "sam@ebes.test", UserRole::Recruiter, true),
        user(FORMER, "Casey Former", "former@ebes.test", UserRole::Recruiter, false),
    ] {
        store.insert_user(user).expect("seed user");
    }

    for (id, code, name, is_active) in [
        (ACME, "CL-001", "Acme", true),
        (GLOBEX, "CL-002", "Globex", true),
        (ClientId(3), "CL-003", "Initech", false),
    ] {
        store
            .insert_client(Client {
                id,
                client_code: code.to_string(),
                name: name.to_string(),
                is_active,
            })
            .expect("seed client");
    }
    for (id, code, name) in [(PLATFORM, "TM-001", "Platform"), (DATA, "TM-002", "Data")] {
        store
            .insert_team(Team {
                id,
                team_code: code.to_string(),
                name: name.to_string(),
            })
            .expect("seed team");
    }

    store.assign_team(ACCOUNT_MANAGER, PLATFORM).expect("am team");
    store.assign_client(ACCOUNT_MANAGER, ACME).expect("am client");
    store.assign_client(ACCOUNT_MANAGER, GLOBEX).expect("am client");
    store
        .assign_team(RECRUITMENT_MANAGER, PLATFORM)
        .expect("rm team");
    store
        .assign_client(RECRUITMENT_MANAGER, ACME)
        .expect("rm client");
    store
        .add_placement(Placement {
            recruiter_id: RILEY,
            client_id: ACME,
            team_id: PLATFORM,
        })
        .expect("riley placement");
    store
        .add_placement(Placement {
            recruiter_id: SAM,
            client_id: GLOBEX,
            team_id: DATA,
        })
        .expect("sam placement");

    let open = store
        .insert_role(role(
            ACME,
            PLATFORM,
            "Platform Engineer",
            RoleStatus::Active,
            at(2026, 3, 2),
            at(2026, 3, 2),
        ))
        .expect("seed role");
    let closed = store
        .insert_role(role(
            ACME,
            PLATFORM,
            "Data Analyst",
            RoleStatus::Deal,
            at(2026, 2, 10),
            at(2026, 3, 5),
        ))
        .expect("seed role");
    let lost = store
        .insert_role(role(
            GLOBEX,
            DATA,
            "QA Lead",
            RoleStatus::Lost,
            at(2026, 2, 20),
            at(2026, 2, 25),
        ))
        .expect("seed role");

    for (role_id, round, count, month) in [
        (open.id, InterviewRound::First, 3, YearMonth::of(date(2026, 3, 1))),
        (closed.id, InterviewRound::Second, 2, YearMonth::of(date(2026, 2, 1))),
    ] {
        store
            .insert_interview_log(InterviewLog {
                role_id,
                round: Some(round),
                count,
                entry_month: Some(month),
            })
            .expect("seed interviews");
    }

    let on_platform = |kind, role_id, on| entry(RILEY, kind, role_id, ACME, PLATFORM, on);
    let mut submission = on_platform(EntryKind::Submission, open.id, date(2026, 3, 3));
    submission.submission_speed = Some(SubmissionSpeed::Within6h);
    let mut interview = on_platform(EntryKind::Interview, open.id, date(2026, 3, 4));
    interview.interview_round = Some(InterviewRound::First);
    let deal = on_platform(EntryKind::Deal, closed.id, date(2026, 3, 5));
    let mut late = entry(SAM, EntryKind::Submission, lost.id, GLOBEX, DATA, date(2026, 2, 21));
    late.submission_speed = Some(SubmissionSpeed::Within24h);
    for entry in [submission, interview, deal, late] {
        store.insert_entry(entry).expect("seed entry");
    }

    store
}

pub(super) fn build_service() -> (
    TrackerService<InMemoryTrackerRepository>,
    Arc<InMemoryTrackerRepository>,
) {
    build_service_with(TrackerConfig::default())
}

pub(super) fn build_service_with(
    tracker: TrackerConfig,
) -> (
    TrackerService<InMemoryTrackerRepository>,
    Arc<InMemoryTrackerRepository>,
) {
    let repository = Arc::new(seeded_store());
    let service = TrackerService::new(repository.clone(), tracker, ScoringConfig::default());
    (service, repository)
}

pub(super) fn router() -> axum::Router {
    let (service, _) = build_service();
    tracker_router(Arc::new(service))
}

pub(super) fn get_as(user: UserId, uri: &str) -> Request<Body> {
    Request::get(uri)
        .header(USER_HEADER, user.0.to_string())
        .body(Body::empty())
        .expect("request")
}

pub(super) fn send_json_as(
    method: &str,
    user: Option<UserId>,
    uri: &str,
    body: Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(user) = user {
        builder = builder.header(USER_HEADER, user.0.to_string());
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).expect("encode body")))
        .expect("request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
