use crate::infra::{parse_date, seed_demo_store, DEMO_PASSWORD};
use chrono::{Local, NaiveDate};
use clap::Args;
use ebes::config::AppConfig;
use ebes::error::AppError;
use ebes::scoring::{
    compute_score, ActivityBatch, DateRange, ScoreKind, ScoreResult, ScoringConfig,
};
use ebes::tracker::{
    LoginRequest, Principal, TrackerError, TrackerRepository, TrackerService, UserRole,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reporting date (defaults to today).
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding `entries`, `roles` and `interviews` for one user
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Formula to apply: recruiter, account_manager or recruitment_manager
    #[arg(long, default_value = "recruiter")]
    pub(crate) kind: ScoreKind,
    /// First day of the scoring window (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, requires = "end_date")]
    pub(crate) start_date: Option<NaiveDate>,
    /// Last day of the scoring window (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, requires = "start_date")]
    pub(crate) end_date: Option<NaiveDate>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let result = score_input(args, &config.scoring)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn score_input(args: ScoreArgs, scoring: &ScoringConfig) -> Result<ScoreResult, AppError> {
    let ScoreArgs {
        input,
        kind,
        start_date,
        end_date,
    } = args;

    let raw = std::fs::read_to_string(&input)?;
    let batch: ActivityBatch = serde_json::from_str(&raw)?;
    let window = DateRange::from_bounds(start_date, end_date);
    if let Some(range) = window.filter(DateRange::is_inverted) {
        return Err(TrackerError::Validation(format!(
            "start date {} is after end date {}",
            range.start, range.end
        ))
        .into());
    }

    tracing::debug!(
        %kind,
        entries = batch.entries.len(),
        roles = batch.roles.len(),
        interviews = batch.interviews.len(),
        "scoring snapshot"
    );
    Ok(compute_score(kind, &batch.snapshot(), window.as_ref(), scoring))
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let this_month = DateRange::current_month(today);

    let config = AppConfig::load()?;
    let repository = Arc::new(seed_demo_store(today).map_err(TrackerError::from)?);
    let service = TrackerService::new(repository.clone(), config.tracker, config.scoring);

    println!("EBES demo ({today})");
    println!("Demo accounts sign in with password '{DEMO_PASSWORD}'.");

    let users = repository.users().map_err(TrackerError::from)?;
    for role in [
        UserRole::Recruiter,
        UserRole::AccountManager,
        UserRole::RecruitmentManager,
    ] {
        println!("\n{}s", role.label());
        for user in users.iter().filter(|user| user.role == role) {
            let all_time = service.score_user(user, None)?;
            let month = service.score_user(user, Some(&this_month))?;
            if let (Some(all_time), Some(month)) = (all_time, month) {
                println!(
                    "- {} <{}>: {:.1} all time ({}) | {:.1} this month ({})",
                    user.name,
                    user.email,
                    all_time.score,
                    all_time.performance_label.label(),
                    month.score,
                    month.performance_label.label()
                );
            }
        }
    }

    let alex = service.login(LoginRequest {
        email: "alex@ebes.local".to_string(),
        password: DEMO_PASSWORD.to_string(),
    })?;
    let principal = Principal {
        user_id: alex.user.id,
        role: alex.user.role,
    };
    let analytics = service.account_analytics(&principal, None, today)?;
    println!("\nAccount health for {}", alex.user.name);
    for client in &analytics.clients {
        println!(
            "- {}: health {} ({}) | {} roles | deals {}",
            client.client_name,
            client.health_score,
            client.health_tag.label(),
            client.total_roles,
            client.deals_trend
        );
    }
    println!(
        "  {} strong / {} average / {} at risk",
        analytics.summary.strong_accounts,
        analytics.summary.average_accounts,
        analytics.summary.at_risk_accounts
    );

    Ok(())
}
