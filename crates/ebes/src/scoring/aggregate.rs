//! In-memory reductions over already-fetched records.
//!
//! Every tally takes an optional [`DateRange`]. Without a window the whole
//! input is counted; with a window, records missing the relevant date are
//! left out because they cannot be placed inside it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{
    ActivityEntry, EntryKind, InterviewLog, InterviewRound, RoleRecord, RoleStatus,
    SubmissionSpeed, YearMonth,
};
use super::window::DateRange;

/// Counts of recruiter entries, bucketed by kind, speed and round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntryCounts {
    pub total: u32,
    pub submissions: u32,
    pub submission_6h: u32,
    pub submission_24h: u32,
    pub submission_after_24h: u32,
    pub interviews: u32,
    pub interview_1: u32,
    pub interview_2: u32,
    pub interview_3: u32,
    pub deals: u32,
    pub dropouts: u32,
}

impl EntryCounts {
    pub fn tally<'a, I>(entries: I, window: Option<&DateRange>) -> Self
    where
        I: IntoIterator<Item = &'a ActivityEntry>,
    {
        let mut counts = Self::default();
        for entry in entries {
            if DateRange::admits(window, entry.submission_date) {
                counts.record(entry);
            }
        }
        counts
    }

    pub fn record(&mut self, entry: &ActivityEntry) {
        self.total += 1;
        match entry.kind {
            EntryKind::Submission => {
                self.submissions += 1;
                match entry.submission_speed {
                    Some(SubmissionSpeed::Within6h) => self.submission_6h += 1,
                    Some(SubmissionSpeed::Within24h) => self.submission_24h += 1,
                    Some(SubmissionSpeed::After24h) => self.submission_after_24h += 1,
                    None => {}
                }
            }
            EntryKind::Interview => {
                self.interviews += 1;
                match entry.interview_round {
                    Some(InterviewRound::First) => self.interview_1 += 1,
                    Some(InterviewRound::Second) => self.interview_2 += 1,
                    Some(InterviewRound::Third) => self.interview_3 += 1,
                    None => {}
                }
            }
            EntryKind::Deal => self.deals += 1,
            EntryKind::Dropout => self.dropouts += 1,
        }
    }

    pub fn of_kind(&self, kind: EntryKind) -> u32 {
        match kind {
            EntryKind::Submission => self.submissions,
            EntryKind::Interview => self.interviews,
            EntryKind::Deal => self.deals,
            EntryKind::Dropout => self.dropouts,
        }
    }
}

/// Requisition counts by status. `non_active` is everything that is not
/// active, including rows with no recorded status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleCounts {
    pub total: u32,
    pub active: u32,
    pub non_active: u32,
    pub deal: u32,
    pub lost: u32,
    pub on_hold: u32,
    pub cancelled: u32,
    pub no_answer: u32,
}

impl RoleCounts {
    /// Counts roles created inside `window`.
    pub fn tally<'a, I>(roles: I, window: Option<&DateRange>) -> Self
    where
        I: IntoIterator<Item = &'a RoleRecord>,
    {
        let mut counts = Self::default();
        for role in roles {
            if DateRange::admits(window, role.created_on()) {
                counts.record(role);
            }
        }
        counts
    }

    pub fn record(&mut self, role: &RoleRecord) {
        self.total += 1;
        match role.status {
            Some(RoleStatus::Active) => self.active += 1,
            Some(RoleStatus::Deal) => self.deal += 1,
            Some(RoleStatus::Lost) => self.lost += 1,
            Some(RoleStatus::OnHold) => self.on_hold += 1,
            Some(RoleStatus::Cancelled) => self.cancelled += 1,
            Some(RoleStatus::NoAnswer) => self.no_answer += 1,
            None => {}
        }
        self.non_active = self.total - self.active;
    }

    pub fn of_status(&self, status: RoleStatus) -> u32 {
        match status {
            RoleStatus::Active => self.active,
            RoleStatus::Deal => self.deal,
            RoleStatus::Lost => self.lost,
            RoleStatus::OnHold => self.on_hold,
            RoleStatus::Cancelled => self.cancelled,
            RoleStatus::NoAnswer => self.no_answer,
        }
    }
}

/// Interview totals from account-manager interview logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InterviewTally {
    pub round_1: u32,
    pub round_2: u32,
    pub round_3: u32,
    pub total: u32,
}

impl InterviewTally {
    /// Sums logs whose entry month lies in `months` (inclusive). Without a
    /// month range every log counts.
    pub fn tally<'a, I>(logs: I, months: Option<(YearMonth, YearMonth)>) -> Self
    where
        I: IntoIterator<Item = &'a InterviewLog>,
    {
        let mut tally = Self::default();
        for log in logs {
            let admitted = match (months, log.entry_month) {
                (None, _) => true,
                (Some((first, last)), Some(month)) => first <= month && month <= last,
                (Some(_), None) => false,
            };
            if admitted {
                tally.record(log);
            }
        }
        tally
    }

    /// Counts saturate at `u32::MAX`.
    pub fn record(&mut self, log: &InterviewLog) {
        self.total = self.total.saturating_add(log.count);
        let bucket = match log.round {
            Some(InterviewRound::First) => &mut self.round_1,
            Some(InterviewRound::Second) => &mut self.round_2,
            Some(InterviewRound::Third) => &mut self.round_3,
            None => return,
        };
        *bucket = bucket.saturating_add(log.count);
    }

    /// Interviews with a known round.
    pub fn rounds_total(&self) -> u32 {
        self.round_1
            .saturating_add(self.round_2)
            .saturating_add(self.round_3)
    }

    pub fn round(&self, round: InterviewRound) -> u32 {
        match round {
            InterviewRound::First => self.round_1,
            InterviewRound::Second => self.round_2,
            InterviewRound::Third => self.round_3,
        }
    }
}

/// Activity inside one calendar month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthSnapshot {
    pub roles_created: u32,
    pub interviews: u32,
    pub deals: u32,
    pub lost: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyComparison {
    pub current_month: MonthSnapshot,
    pub last_month: MonthSnapshot,
}

impl MonthlyComparison {
    /// Compares the calendar month containing `today` with the month before.
    ///
    /// Deals and losses are placed by `updated_at`, so a role whose status
    /// changed twice in a period only shows its latest change.
    pub fn build(roles: &[RoleRecord], logs: &[InterviewLog], today: NaiveDate) -> Self {
        let current = YearMonth::of(today);
        let previous = current.previous();
        Self {
            current_month: month_snapshot(roles, logs, current),
            last_month: month_snapshot(roles, logs, previous),
        }
    }
}

fn month_snapshot(roles: &[RoleRecord], logs: &[InterviewLog], month: YearMonth) -> MonthSnapshot {
    let in_month = |date: Option<NaiveDate>| date.map(|day| month.contains(day)).unwrap_or(false);

    MonthSnapshot {
        roles_created: roles.iter().filter(|role| in_month(role.created_on())).count() as u32,
        interviews: logs
            .iter()
            .filter(|log| log.entry_month == Some(month))
            .fold(0u32, |total, log| total.saturating_add(log.count)),
        deals: roles
            .iter()
            .filter(|role| role.has_status(RoleStatus::Deal) && in_month(role.updated_on()))
            .count() as u32,
        lost: roles
            .iter()
            .filter(|role| role.has_status(RoleStatus::Lost) && in_month(role.updated_on()))
            .count() as u32,
    }
}

/// Entry counts grouped by an entity key; entries without a key are skipped.
pub fn entries_by<K, F>(
    entries: &[ActivityEntry],
    window: Option<&DateRange>,
    key: F,
) -> BTreeMap<K, EntryCounts>
where
    K: Ord,
    F: Fn(&ActivityEntry) -> Option<K>,
{
    let mut groups: BTreeMap<K, EntryCounts> = BTreeMap::new();
    for entry in entries {
        if !DateRange::admits(window, entry.submission_date) {
            continue;
        }
        if let Some(group) = key(entry) {
            groups.entry(group).or_default().record(entry);
        }
    }
    groups
}

/// Role counts grouped by an entity key.
pub fn roles_by<K, F>(
    roles: &[RoleRecord],
    window: Option<&DateRange>,
    key: F,
) -> BTreeMap<K, RoleCounts>
where
    K: Ord,
    F: Fn(&RoleRecord) -> K,
{
    let mut groups: BTreeMap<K, RoleCounts> = BTreeMap::new();
    for role in roles {
        if DateRange::admits(window, role.created_on()) {
            groups.entry(key(role)).or_default().record(role);
        }
    }
    groups
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub bucket: String,
    pub count: u32,
}

/// Entries per day over the last `days` days, oldest first. Days without
/// activity are omitted.
pub fn daily_trend(entries: &[ActivityEntry], today: NaiveDate, days: u32) -> Vec<TrendPoint> {
    let window = DateRange::trailing_days(today, days);
    let mut buckets: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for date in entries.iter().filter_map(|entry| entry.submission_date) {
        if window.contains(date) {
            *buckets.entry(date).or_default() += 1;
        }
    }
    buckets
        .into_iter()
        .map(|(day, count)| TrendPoint {
            bucket: day.format("%Y-%m-%d").to_string(),
            count,
        })
        .collect()
}

/// Entries per calendar month over the last `months` months including the
/// current one, oldest first.
pub fn monthly_trend(entries: &[ActivityEntry], today: NaiveDate, months: u32) -> Vec<TrendPoint> {
    let last = YearMonth::of(today);
    let first = (1..months.max(1)).fold(last, |month, _| month.previous());
    let mut buckets: BTreeMap<YearMonth, u32> = BTreeMap::new();
    for date in entries.iter().filter_map(|entry| entry.submission_date) {
        let month = YearMonth::of(date);
        if first <= month && month <= last && date <= today {
            *buckets.entry(month).or_default() += 1;
        }
    }
    buckets
        .into_iter()
        .map(|(month, count)| TrendPoint {
            bucket: month.to_string(),
            count,
        })
        .collect()
}
