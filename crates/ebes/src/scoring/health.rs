//! Deal-rate health tiers and the account-health score shown on the
//! account-manager analytics screen.

use serde::{Serialize, Serializer};

use super::aggregate::{InterviewTally, MonthlyComparison, RoleCounts};
use super::labels::HealthLabel;
use super::trends::conversion_rate;

const STRONG_DEAL_RATE: f64 = 30.0;
const WEAK_DEAL_RATE: f64 = 10.0;

/// Team tier from the share of its roles that closed as deals.
pub fn team_label(roles: &RoleCounts) -> HealthLabel {
    let deal_rate = conversion_rate(roles.deal, roles.total);
    if deal_rate >= STRONG_DEAL_RATE {
        HealthLabel::Strong
    } else if deal_rate < WEAK_DEAL_RATE {
        HealthLabel::AtRisk
    } else {
        HealthLabel::Average
    }
}

/// Client tier on the performance screen. A strong client still needs an
/// open role; a weak deal rate is only at risk when losses or silence dominate.
pub fn client_label(roles: &RoleCounts) -> HealthLabel {
    let deal_rate = conversion_rate(roles.deal, roles.total);
    if deal_rate >= STRONG_DEAL_RATE && roles.active > 0 {
        HealthLabel::Strong
    } else if deal_rate < WEAK_DEAL_RATE && (roles.lost > roles.deal || roles.no_answer > 5) {
        HealthLabel::AtRisk
    } else {
        HealthLabel::Average
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountTag {
    Strong,
    Average,
    AtRisk,
}

impl AccountTag {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Strong => "Strong Account",
            Self::Average => "Average Account",
            Self::AtRisk => "At Risk Account",
        }
    }
}

impl Serialize for AccountTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskIndicators {
    pub high_active_low_deals: bool,
    pub high_interviews_no_closures: bool,
    pub consistent_closures: bool,
    pub repeated_cancellations: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccountHealth {
    /// Whole points in `0..=100`.
    pub score: i64,
    pub tag: AccountTag,
    pub risks: RiskIndicators,
}

/// Scores one client account from its role counts, all-time interview
/// totals and the month-over-month comparison.
pub fn account_health(
    roles: &RoleCounts,
    interviews: &InterviewTally,
    months: &MonthlyComparison,
) -> AccountHealth {
    let roles_to_deal = conversion_rate(roles.deal, roles.total);
    let current_deals = months.current_month.deals;
    let last_deals = months.last_month.deals;

    let mut score: f64 = 0.0;
    if roles.total > 0 {
        score += 20.0;
    }
    if roles.deal > 0 {
        score += roles.deal as f64 / roles.total.max(1) as f64 * 30.0;
    }
    if interviews.total > 0 {
        score += 15.0;
    }
    if roles_to_deal > 20.0 {
        score += 20.0;
    }
    if current_deals > last_deals {
        score += 10.0;
    }

    if roles.lost > roles.deal {
        score -= 15.0;
    }
    if roles.cancelled > 3 {
        score -= 10.0;
    }
    if roles.no_answer > 5 {
        score -= 10.0;
    }
    if roles.active > 15 && roles.deal == 0 {
        score -= 20.0;
    }

    let score = score.clamp(0.0, 100.0);
    let tag = if score >= 70.0 {
        AccountTag::Strong
    } else if score < 40.0 {
        AccountTag::AtRisk
    } else {
        AccountTag::Average
    };

    AccountHealth {
        score: (score + 0.5).floor() as i64,
        tag,
        risks: RiskIndicators {
            high_active_low_deals: roles.active > 10 && roles.deal < 2,
            high_interviews_no_closures: interviews.total > 20 && roles.deal == 0,
            consistent_closures: roles.deal >= 3 && current_deals > 0,
            repeated_cancellations: roles.cancelled > 3,
        },
    }
}
