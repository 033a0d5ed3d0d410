use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use crate::scoring::{ClientId, RoleId, TeamId, UserId};

use super::domain::{
    ClientAssignmentRequest, InterviewLogRequest, LoginRequest, NewRoleRequest, Principal,
    RoleUpdate, SubmissionRequest, TeamAssignmentRequest,
};
use super::params::{
    EbesQuery, ManagerAnalyticsQuery, PerformanceQuery, PerformanceStatsQuery,
    RecruiterAnalyticsQuery, RoleListQuery, ScorePeriodQuery, SubmissionListQuery, TodayQuery,
    WindowQuery,
};
use super::repository::TrackerRepository;
use super::service::{TrackerError, TrackerService};
use super::views::SuccessView;

/// Header carrying the signed-in user's id.
pub const USER_HEADER: &str = "x-user-id";

type SharedService<R> = Arc<TrackerService<R>>;

/// Router exposing the four dashboards plus login.
pub fn tracker_router<R>(service: SharedService<R>) -> Router
where
    R: TrackerRepository + 'static,
{
    Router::new()
        .route("/api/auth/login", post(login_handler::<R>))
        .route("/api/auth/logout", post(logout_handler))
        // account manager
        .route("/api/am/assignments", get(am_assignments_handler::<R>))
        .route("/api/am/reminder-status", get(reminder_status_handler::<R>))
        .route("/api/am/confirm-reminder", post(confirm_reminder_handler::<R>))
        .route(
            "/api/am/roles",
            get(am_roles_handler::<R>).post(create_role_handler::<R>),
        )
        .route(
            "/api/am/roles/:id",
            put(update_role_handler::<R>).delete(delete_role_handler::<R>),
        )
        .route(
            "/api/am/roles/:id/interviews",
            post(log_interviews_handler::<R>),
        )
        .route("/api/am/analytics", get(am_analytics_handler::<R>))
        .route("/api/am/performance", get(am_performance_handler::<R>))
        .route("/api/am/ebes-score", get(am_score_handler::<R>))
        // recruiter
        .route("/api/recruiter/clients", get(recruiter_clients_handler::<R>))
        .route(
            "/api/recruiter/roles/:client_id/:team_id",
            get(open_roles_handler::<R>),
        )
        .route("/api/recruiter/team-info", get(team_info_handler::<R>))
        .route("/api/recruiter/deal-roles", get(deal_roles_handler::<R>))
        .route(
            "/api/recruiter/submissions",
            get(submissions_handler::<R>).post(record_submission_handler::<R>),
        )
        .route("/api/recruiter/ebes", get(recruiter_ebes_handler::<R>))
        .route("/api/recruiter/all-roles", get(recruiter_roles_handler::<R>))
        .route(
            "/api/recruiter/analytics",
            get(recruiter_analytics_handler::<R>),
        )
        .route("/api/recruiter/ebes-score", get(recruiter_score_handler::<R>))
        // recruitment manager
        .route("/api/rm/teams", get(rm_teams_handler::<R>))
        .route("/api/rm/clients", get(rm_clients_handler::<R>))
        .route("/api/rm/recruiters", get(rm_recruiters_handler::<R>))
        .route("/api/rm/analytics", get(rm_analytics_handler::<R>))
        .route("/api/rm/ebes-score", get(rm_score_handler::<R>))
        .route(
            "/api/rm/team-analytics/:team_id",
            get(rm_team_analytics_handler::<R>),
        )
        .route(
            "/api/rm/performance-summary",
            get(rm_performance_summary_handler::<R>),
        )
        // admin
        .route("/api/admin/teams", get(admin_teams_handler::<R>))
        .route("/api/admin/clients", get(admin_clients_handler::<R>))
        .route(
            "/api/admin/performance-stats",
            get(performance_stats_handler::<R>),
        )
        .route("/api/admin/leaderboards", get(leaderboards_handler::<R>))
        .route(
            "/api/admin/users/:id/assignments",
            get(user_assignments_handler::<R>),
        )
        .route("/api/admin/assign-team", post(assign_team_handler::<R>))
        .route("/api/admin/unassign-team", delete(unassign_team_handler::<R>))
        .route("/api/admin/assign-client", post(assign_client_handler::<R>))
        .route(
            "/api/admin/unassign-client",
            delete(unassign_client_handler::<R>),
        )
        .with_state(service)
}

/// Caller resolved from the `x-user-id` header.
pub struct Authenticated(pub Principal);

#[axum::async_trait]
impl<R> FromRequestParts<SharedService<R>> for Authenticated
where
    R: TrackerRepository + 'static,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        service: &SharedService<R>,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .map(UserId)
            .ok_or_else(|| error_response(TrackerError::Unauthorized))?;
        service
            .authenticate(user_id)
            .map(Self)
            .map_err(error_response)
    }
}

pub(crate) fn error_response(error: TrackerError) -> Response {
    let status = error.status_code();
    if status.is_server_error() {
        tracing::error!(error = %error, "tracker request failed");
    }
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}

fn respond<T: Serialize>(result: Result<T, TrackerError>) -> Response {
    respond_with(StatusCode::OK, result)
}

fn respond_with<T: Serialize>(status: StatusCode, result: Result<T, TrackerError>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn login_handler<R>(
    State(service): State<SharedService<R>>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.login(request))
}

pub(crate) async fn logout_handler() -> Response {
    (StatusCode::OK, Json(SuccessView::ok())).into_response()
}

async fn am_assignments_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.account_manager_assignments(&principal))
}

async fn reminder_status_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Query(today): Query<TodayQuery>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.reminder_status(&principal, today.today()))
}

async fn confirm_reminder_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Query(today): Query<TodayQuery>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.confirm_reminder(&principal, today.today()))
}

async fn am_roles_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Query(query): Query<RoleListQuery>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.account_manager_roles(&principal, query.status_filter()))
}

async fn create_role_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Query(today): Query<TodayQuery>,
    Json(request): Json<NewRoleRequest>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond_with(
        StatusCode::CREATED,
        service.create_role(&principal, request, today.now()),
    )
}

async fn update_role_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Path(id): Path<i64>,
    Query(today): Query<TodayQuery>,
    Json(update): Json<RoleUpdate>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.update_role(&principal, RoleId(id), update, today.now()))
}

async fn delete_role_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Path(id): Path<i64>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.delete_role(&principal, RoleId(id)))
}

async fn log_interviews_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Path(id): Path<i64>,
    Query(today): Query<TodayQuery>,
    Json(request): Json<InterviewLogRequest>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.log_interviews(&principal, RoleId(id), request, today.today()))
}

async fn am_analytics_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Query(window): Query<WindowQuery>,
    Query(today): Query<TodayQuery>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.account_analytics(&principal, window.window(), today.today()))
}

async fn am_performance_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Query(query): Query<PerformanceQuery>,
    Query(today): Query<TodayQuery>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    let today = today.today();
    respond(service.account_performance(&principal, query.resolve(today), today))
}

async fn am_score_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Query(window): Query<WindowQuery>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.account_manager_ebes(&principal, window.window()))
}

async fn recruiter_clients_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.recruiter_clients(&principal))
}

async fn open_roles_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Path((client_id, team_id)): Path<(i64, i64)>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.recruiter_open_roles(&principal, ClientId(client_id), TeamId(team_id)))
}

async fn team_info_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.recruiter_team_info(&principal))
}

async fn deal_roles_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.recruiter_deal_roles(&principal))
}

async fn record_submission_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Query(today): Query<TodayQuery>,
    Json(request): Json<SubmissionRequest>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond_with(
        StatusCode::CREATED,
        service.record_submission(&principal, request, today.now()),
    )
}

async fn submissions_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Query(query): Query<SubmissionListQuery>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.recruiter_submissions(&principal, query.window(), query.client_id))
}

async fn recruiter_ebes_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Query(query): Query<EbesQuery>,
    Query(today): Query<TodayQuery>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.recruiter_ebes(
        &principal,
        query.filter.unwrap_or_default(),
        query.client_id,
        today.today(),
    ))
}

async fn recruiter_roles_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.recruiter_roles(&principal))
}

async fn recruiter_analytics_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Query(query): Query<RecruiterAnalyticsQuery>,
    Query(today): Query<TodayQuery>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    let today = today.today();
    respond(service.recruiter_analytics(&principal, query.resolve(today), today))
}

async fn recruiter_score_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Query(query): Query<ScorePeriodQuery>,
    Query(today): Query<TodayQuery>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.recruiter_ebes_score(&principal, query.window(today.today())))
}

async fn rm_teams_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.rm_teams(&principal))
}

async fn rm_clients_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.rm_clients(&principal))
}

async fn rm_recruiters_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.rm_recruiters(&principal))
}

async fn rm_analytics_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Query(query): Query<ManagerAnalyticsQuery>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.rm_analytics(&principal, query.resolve()))
}

async fn rm_score_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Query(window): Query<WindowQuery>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.rm_ebes_score(&principal, window.window()))
}

async fn rm_team_analytics_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Path(team_id): Path<i64>,
    Query(window): Query<WindowQuery>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.rm_team_analytics(&principal, TeamId(team_id), window.window()))
}

async fn rm_performance_summary_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Query(window): Query<WindowQuery>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.rm_performance_summary(&principal, window.window()))
}

async fn admin_teams_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.admin_teams(&principal))
}

async fn admin_clients_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.admin_clients(&principal))
}

async fn performance_stats_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Query(query): Query<PerformanceStatsQuery>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.performance_stats(&principal, query.resolve()))
}

async fn leaderboards_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.leaderboards(&principal))
}

async fn user_assignments_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Path(id): Path<i64>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.user_assignments(&principal, UserId(id)))
}

async fn assign_team_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Json(request): Json<TeamAssignmentRequest>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.assign_team(&principal, request))
}

async fn unassign_team_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Json(request): Json<TeamAssignmentRequest>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.unassign_team(&principal, request))
}

async fn assign_client_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Json(request): Json<ClientAssignmentRequest>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.assign_client(&principal, request))
}

async fn unassign_client_handler<R>(
    State(service): State<SharedService<R>>,
    Authenticated(principal): Authenticated,
    Json(request): Json<ClientAssignmentRequest>,
) -> Response
where
    R: TrackerRepository + 'static,
{
    respond(service.unassign_client(&principal, request))
}
