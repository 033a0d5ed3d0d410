//! Weighted EBES formulas, one per scored user role.
//!
//! Each function takes plain counts so it can be exercised without a store.

use serde::{Deserialize, Serialize};

use super::trends::round_tenths;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruiterInputs {
    pub submission_6h: u32,
    pub submission_24h: u32,
    pub submission_after_24h: u32,
    pub interviews: u32,
    pub deals: u32,
    pub dropouts: u32,
    pub total_entries: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecruiterScore {
    pub total_points: i64,
    pub total_entries: u32,
    pub score: f64,
}

/// Points per entry, never below zero.
pub fn recruiter_score(inputs: &RecruiterInputs) -> RecruiterScore {
    let total_points = inputs.submission_6h as i64 * 5
        + inputs.submission_24h as i64 * 3
        + inputs.submission_after_24h as i64
        + inputs.interviews as i64 * 2
        + inputs.deals as i64 * 10
        - inputs.dropouts as i64 * 5;
    let divisor = inputs.total_entries.max(1);
    let score = (total_points as f64 / divisor as f64).max(0.0);

    RecruiterScore {
        total_points,
        total_entries: inputs.total_entries,
        score,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountManagerInputs {
    pub new_roles: u32,
    pub interview_1: u32,
    pub interview_2: u32,
    pub interview_3: u32,
    pub deals: u32,
    pub lost: u32,
    pub no_answer: u32,
    pub on_hold: u32,
}

/// Weight table for the account-manager formula. Penalties are stored as
/// positive magnitudes and subtracted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccountManagerWeights {
    pub new_role: f64,
    pub interview_1: f64,
    pub interview_2: f64,
    /// Zero unless round-three interviews are explicitly counted.
    pub interview_3: f64,
    pub deal: f64,
    pub lost_penalty: f64,
    pub no_answer_penalty: f64,
    pub on_hold_penalty: f64,
}

impl Default for AccountManagerWeights {
    fn default() -> Self {
        Self {
            new_role: 2.0,
            interview_1: 2.0,
            interview_2: 2.0,
            interview_3: 0.0,
            deal: 10.0,
            lost_penalty: 4.0,
            no_answer_penalty: 2.0,
            on_hold_penalty: 1.0,
        }
    }
}

impl AccountManagerWeights {
    pub fn counting_round_three(mut self, enabled: bool) -> Self {
        self.interview_3 = if enabled { self.interview_2 } else { 0.0 };
        self
    }
}

/// Absolute (not normalized) score, rounded to one decimal.
pub fn account_manager_score(inputs: &AccountManagerInputs, weights: &AccountManagerWeights) -> f64 {
    let raw = inputs.new_roles as f64 * weights.new_role
        + inputs.interview_1 as f64 * weights.interview_1
        + inputs.interview_2 as f64 * weights.interview_2
        + inputs.interview_3 as f64 * weights.interview_3
        + inputs.deals as f64 * weights.deal
        - inputs.lost as f64 * weights.lost_penalty
        - inputs.no_answer as f64 * weights.no_answer_penalty
        - inputs.on_hold as f64 * weights.on_hold_penalty;
    round_tenths(raw)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruitmentManagerInputs {
    pub submission_6h: u32,
    pub submission_24h: u32,
    pub submission_after_24h: u32,
    pub interviews: u32,
    pub deals: u32,
    pub assigned_roles: u32,
    pub active_roles: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecruitmentManagerScore {
    pub activity_points: f64,
    pub capacity_points: f64,
    /// Unrounded ratio, used for classification.
    pub raw_score: f64,
    pub score: f64,
}

const SPEED_6H_WEIGHT: f64 = 2.0;
const SPEED_24H_WEIGHT: f64 = 1.5;
const SPEED_AFTER_24H_WEIGHT: f64 = 1.0;
const INTERVIEW_WEIGHT: f64 = 3.0;
const DEAL_WEIGHT: f64 = 7.0;
const ASSIGNED_ROLE_WEIGHT: f64 = 3.0;
const ACTIVE_ROLE_WEIGHT: f64 = 1.0;

/// Team activity relative to the requisition load, as a percentage.
pub fn recruitment_manager_score(inputs: &RecruitmentManagerInputs) -> RecruitmentManagerScore {
    let activity_points = inputs.submission_6h as f64 * SPEED_6H_WEIGHT
        + inputs.submission_24h as f64 * SPEED_24H_WEIGHT
        + inputs.submission_after_24h as f64 * SPEED_AFTER_24H_WEIGHT
        + inputs.interviews as f64 * INTERVIEW_WEIGHT
        + inputs.deals as f64 * DEAL_WEIGHT;
    let capacity_points = inputs.assigned_roles as f64 * ASSIGNED_ROLE_WEIGHT
        + inputs.active_roles as f64 * ACTIVE_ROLE_WEIGHT;

    let raw_score = if capacity_points > 0.0 {
        activity_points / capacity_points * 100.0
    } else {
        0.0
    };

    RecruitmentManagerScore {
        activity_points,
        capacity_points,
        raw_score,
        score: round_tenths(raw_score),
    }
}
