use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use ebes::scoring::{
    ActivityEntry, ClientId, DateRange, EntryId, EntryKind, InterviewLog, InterviewRound, RoleId,
    RoleRecord, RoleStatus, SubmissionSpeed, TeamId, UserId, YearMonth,
};
use ebes::tracker::{
    Client, InMemoryTrackerRepository, Placement, RepositoryError, Team, TrackerRepository, User,
    UserRole,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) const DEMO_PASSWORD: &str = "changeme";

const ADMIN: UserId = UserId(1);
const ALEX: UserId = UserId(2);
const PRIYA: UserId = UserId(3);
const JORDAN: UserId = UserId(4);
const RILEY: UserId = UserId(5);
const SAM: UserId = UserId(6);
const TAYLOR: UserId = UserId(7);

const NORTHWIND: ClientId = ClientId(1);
const CONTOSO: ClientId = ClientId(2);
const FABRIKAM: ClientId = ClientId(3);
const PLATFORM: TeamId = TeamId(1);
const DATA: TeamId = TeamId(2);

/// Day `offset` days into the month starting at `start`, never past `today`.
fn day_in(start: NaiveDate, offset: i64, today: NaiveDate) -> NaiveDate {
    (start + Duration::days(offset)).min(today)
}

fn at_open(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::default()) + Duration::hours(9)
}

/// Builds a small agency with two account managers, one recruitment manager
/// and three recruiters, with activity spread over this month and the last.
pub(crate) fn seed_demo_store(
    today: NaiveDate,
) -> Result<InMemoryTrackerRepository, RepositoryError> {
    let store = InMemoryTrackerRepository::default();
    let this_month = DateRange::current_month(today).start;
    let last_month = DateRange::previous_month(today).start;

    for (id, name, email, role) in [
        (ADMIN, "Morgan Hale", "admin@ebes.local", UserRole::Admin),
        (ALEX, "Alex Rivera", "alex@ebes.local", UserRole::AccountManager),
        (PRIYA, "Priya Shah", "priya@ebes.local", UserRole::AccountManager),
        (JORDAN, "Jordan Lee", "jordan@ebes.local", UserRole::RecruitmentManager),
        (RILEY, "Riley Chen", "riley@ebes.local", UserRole::Recruiter),
        (SAM, "Sam Patel", "sam@ebes.local", UserRole::Recruiter),
        (TAYLOR, "Taylor Brooks", "taylor@ebes.local", UserRole::Recruiter),
    ] {
        store.insert_user(User {
            id,
            user_code: format!("USR-{:04}", id.0),
            name: name.to_string(),
            email: email.to_string(),
            password: DEMO_PASSWORD.to_string(),
            role,
            is_active: true,
        })?;
    }

    for (id, name) in [
        (NORTHWIND, "Northwind"),
        (CONTOSO, "Contoso"),
        (FABRIKAM, "Fabrikam"),
    ] {
        store.insert_client(Client {
            id,
            client_code: format!("CL-{:03}", id.0),
            name: name.to_string(),
            is_active: true,
        })?;
    }
    for (id, name) in [(PLATFORM, "Platform"), (DATA, "Data")] {
        store.insert_team(Team {
            id,
            team_code: format!("TM-{:03}", id.0),
            name: name.to_string(),
        })?;
    }

    store.assign_team(ALEX, PLATFORM)?;
    store.assign_client(ALEX, NORTHWIND)?;
    store.assign_client(ALEX, CONTOSO)?;
    store.assign_team(PRIYA, DATA)?;
    store.assign_client(PRIYA, FABRIKAM)?;
    for team in [PLATFORM, DATA] {
        store.assign_team(JORDAN, team)?;
    }
    for client in [NORTHWIND, CONTOSO, FABRIKAM] {
        store.assign_client(JORDAN, client)?;
    }
    for (recruiter_id, client_id, team_id) in [
        (RILEY, NORTHWIND, PLATFORM),
        (SAM, CONTOSO, PLATFORM),
        (TAYLOR, FABRIKAM, DATA),
    ] {
        store.add_placement(Placement {
            recruiter_id,
            client_id,
            team_id,
        })?;
    }

    let roles = [
        (ALEX, NORTHWIND, PLATFORM, "Backend Engineer", RoleStatus::Active, day_in(this_month, 0, today)),
        (ALEX, NORTHWIND, PLATFORM, "Frontend Engineer", RoleStatus::Deal, day_in(last_month, 2, today)),
        (ALEX, CONTOSO, PLATFORM, "DevOps Engineer", RoleStatus::OnHold, day_in(last_month, 9, today)),
        (ALEX, CONTOSO, PLATFORM, "Mobile Developer", RoleStatus::Active, day_in(this_month, 1, today)),
        (PRIYA, FABRIKAM, DATA, "Data Engineer", RoleStatus::Active, day_in(last_month, 4, today)),
        (PRIYA, FABRIKAM, DATA, "ML Engineer", RoleStatus::Lost, day_in(last_month, 7, today)),
    ];
    let mut role_ids = Vec::with_capacity(roles.len());
    for (account_manager_id, client_id, team_id, title, status, created) in roles {
        let stored = store.insert_role(RoleRecord {
            id: RoleId(0),
            role_code: String::new(),
            client_id,
            team_id,
            account_manager_id,
            title: title.to_string(),
            description: String::new(),
            status: Some(status),
            created_at: Some(at_open(created)),
            updated_at: Some(at_open(created)),
        })?;
        role_ids.push((stored.id, account_manager_id, client_id, team_id));
    }

    let current = YearMonth::of(today);
    let previous = YearMonth::of(last_month);
    for (index, round, count, month) in [
        (0, InterviewRound::First, 3, current),
        (1, InterviewRound::First, 4, previous),
        (1, InterviewRound::Second, 2, previous),
        (3, InterviewRound::First, 1, current),
        (4, InterviewRound::First, 2, previous),
        (4, InterviewRound::Second, 1, current),
    ] {
        store.insert_interview_log(InterviewLog {
            role_id: role_ids[index].0,
            round: Some(round),
            count,
            entry_month: Some(month),
        })?;
    }

    let activity = [
        (RILEY, 0, EntryKind::Submission, Some(SubmissionSpeed::Within6h), None, day_in(this_month, 0, today)),
        (RILEY, 0, EntryKind::Submission, Some(SubmissionSpeed::Within24h), None, day_in(this_month, 1, today)),
        (RILEY, 0, EntryKind::Interview, None, Some(InterviewRound::First), day_in(this_month, 2, today)),
        (RILEY, 1, EntryKind::Deal, None, None, day_in(last_month, 14, today)),
        (SAM, 2, EntryKind::Submission, Some(SubmissionSpeed::Within24h), None, day_in(last_month, 11, today)),
        (SAM, 3, EntryKind::Submission, Some(SubmissionSpeed::After24h), None, day_in(this_month, 1, today)),
        (SAM, 3, EntryKind::Interview, None, Some(InterviewRound::Second), day_in(this_month, 2, today)),
        (TAYLOR, 4, EntryKind::Submission, Some(SubmissionSpeed::Within6h), None, day_in(last_month, 5, today)),
        (TAYLOR, 5, EntryKind::Dropout, None, None, day_in(last_month, 8, today)),
    ];
    for (recruiter_id, index, kind, submission_speed, interview_round, date) in activity {
        let (role_id, account_manager_id, client_id, team_id) = role_ids[index];
        store.insert_entry(ActivityEntry {
            id: EntryId(0),
            recruiter_id,
            client_id: Some(client_id),
            team_id: Some(team_id),
            role_id: Some(role_id),
            account_manager_id: Some(account_manager_id),
            recruitment_manager_id: Some(JORDAN),
            kind,
            submission_speed,
            interview_round,
            submission_date: Some(date),
            dropout_role_id: (kind == EntryKind::Dropout).then_some(role_id),
            notes: String::new(),
            created_at: Some(at_open(date)),
        })?;
    }

    Ok(store)
}
