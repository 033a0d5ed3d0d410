use serde::{Deserialize, Serialize, Serializer};

/// Tier shown next to a per-role EBES score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum PerformanceLabel {
    #[serde(rename = "At Risk")]
    AtRisk,
    Average,
    Strong,
    Excellent,
}

impl PerformanceLabel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Strong => "Strong",
            Self::Average => "Average",
            Self::AtRisk => "At Risk",
        }
    }
}

impl Serialize for PerformanceLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Inclusive lower bounds for the three upper tiers; anything below
/// `average` (including NaN) is at risk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelThresholds {
    pub excellent: f64,
    pub strong: f64,
    pub average: f64,
}

impl LabelThresholds {
    pub const RECRUITER: Self = Self {
        excellent: 4.0,
        strong: 3.0,
        average: 2.0,
    };

    pub const ACCOUNT_MANAGER: Self = Self {
        excellent: 100.0,
        strong: 50.0,
        average: 20.0,
    };

    pub const RECRUITMENT_MANAGER: Self = Self {
        excellent: 90.0,
        strong: 75.0,
        average: 60.0,
    };

    pub fn classify(&self, score: f64) -> PerformanceLabel {
        if score >= self.excellent {
            PerformanceLabel::Excellent
        } else if score >= self.strong {
            PerformanceLabel::Strong
        } else if score >= self.average {
            PerformanceLabel::Average
        } else {
            PerformanceLabel::AtRisk
        }
    }
}

pub fn classify_recruiter(score: f64) -> PerformanceLabel {
    LabelThresholds::RECRUITER.classify(score)
}

pub fn classify_account_manager(score: f64) -> PerformanceLabel {
    LabelThresholds::ACCOUNT_MANAGER.classify(score)
}

pub fn classify_recruitment_manager(score: f64) -> PerformanceLabel {
    LabelThresholds::RECRUITMENT_MANAGER.classify(score)
}

/// Coarser tiers used on the admin performance screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum AdminPerformanceLabel {
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    Average,
    Good,
    Excellent,
}

impl AdminPerformanceLabel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl Serialize for AdminPerformanceLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Cut points for [`AdminPerformanceLabel`], loaded from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdminBands {
    pub excellent: f64,
    pub good: f64,
    pub average: f64,
}

impl Default for AdminBands {
    fn default() -> Self {
        Self {
            excellent: 80.0,
            good: 60.0,
            average: 40.0,
        }
    }
}

impl AdminBands {
    pub fn classify(&self, score: f64) -> AdminPerformanceLabel {
        if score >= self.excellent {
            AdminPerformanceLabel::Excellent
        } else if score >= self.good {
            AdminPerformanceLabel::Good
        } else if score >= self.average {
            AdminPerformanceLabel::Average
        } else {
            AdminPerformanceLabel::NeedsImprovement
        }
    }

    /// Rescales a role-native score so the role's Excellent threshold lands
    /// on the admin Excellent cut point.
    pub fn normalize(&self, thresholds: &LabelThresholds, score: f64) -> f64 {
        if thresholds.excellent > 0.0 {
            score * self.excellent / thresholds.excellent
        } else {
            score
        }
    }

    pub fn classify_native(
        &self,
        thresholds: &LabelThresholds,
        score: f64,
    ) -> AdminPerformanceLabel {
        self.classify(self.normalize(thresholds, score))
    }
}

/// Three-step health tier for teams and clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum HealthLabel {
    Strong,
    Average,
    #[serde(rename = "At Risk")]
    AtRisk,
}

impl HealthLabel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::Average => "Average",
            Self::AtRisk => "At Risk",
        }
    }
}

impl Serialize for HealthLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_resolve_to_the_higher_tier() {
        assert_eq!(classify_recruiter(4.0), PerformanceLabel::Excellent);
        assert_eq!(classify_recruiter(3.0), PerformanceLabel::Strong);
        assert_eq!(classify_recruiter(2.0), PerformanceLabel::Average);
        assert_eq!(classify_recruiter(1.99), PerformanceLabel::AtRisk);

        assert_eq!(classify_account_manager(100.0), PerformanceLabel::Excellent);
        assert_eq!(classify_account_manager(50.0), PerformanceLabel::Strong);
        assert_eq!(classify_account_manager(20.0), PerformanceLabel::Average);
        assert_eq!(classify_account_manager(19.9), PerformanceLabel::AtRisk);

        assert_eq!(classify_recruitment_manager(90.0), PerformanceLabel::Excellent);
        assert_eq!(classify_recruitment_manager(75.0), PerformanceLabel::Strong);
        assert_eq!(classify_recruitment_manager(60.0), PerformanceLabel::Average);
        assert_eq!(classify_recruitment_manager(59.9), PerformanceLabel::AtRisk);
    }

    #[test]
    fn classification_is_total_over_odd_inputs() {
        for score in [f64::NAN, f64::NEG_INFINITY, -12.0, 0.0] {
            assert_eq!(classify_recruiter(score), PerformanceLabel::AtRisk);
            assert_eq!(classify_account_manager(score), PerformanceLabel::AtRisk);
            assert_eq!(classify_recruitment_manager(score), PerformanceLabel::AtRisk);
        }
        assert_eq!(
            classify_account_manager(f64::INFINITY),
            PerformanceLabel::Excellent
        );
        assert_eq!(classify_recruiter(5.0), classify_recruiter(5.0));
    }

    #[test]
    fn admin_bands_are_configurable() {
        let bands = AdminBands::default();
        assert_eq!(bands.classify(80.0), AdminPerformanceLabel::Excellent);
        assert_eq!(bands.classify(79.9), AdminPerformanceLabel::Good);
        assert_eq!(bands.classify(40.0), AdminPerformanceLabel::Average);
        assert_eq!(bands.classify(39.0), AdminPerformanceLabel::NeedsImprovement);

        let strict = AdminBands {
            excellent: 95.0,
            ..bands
        };
        assert_eq!(strict.classify(90.0), AdminPerformanceLabel::Good);
    }

    #[test]
    fn admin_bands_rescale_role_native_scores() {
        let bands = AdminBands::default();
        let recruiter = LabelThresholds::RECRUITER;
        assert_eq!(bands.normalize(&recruiter, 4.0), 80.0);
        assert_eq!(
            bands.classify_native(&recruiter, 4.5),
            AdminPerformanceLabel::Excellent
        );
        assert_eq!(
            bands.classify_native(&recruiter, 3.0),
            AdminPerformanceLabel::Good
        );
        assert_eq!(
            bands.classify_native(&recruiter, 1.5),
            AdminPerformanceLabel::NeedsImprovement
        );
        assert_eq!(
            bands.classify_native(&LabelThresholds::ACCOUNT_MANAGER, 100.0),
            AdminPerformanceLabel::Excellent
        );
        assert_eq!(
            bands.classify_native(&LabelThresholds::RECRUITMENT_MANAGER, 82.4),
            AdminPerformanceLabel::Good
        );
    }

    #[test]
    fn labels_serialize_as_display_strings() {
        let json = serde_json::to_string(&PerformanceLabel::AtRisk).expect("serializes");
        assert_eq!(json, "\"At Risk\"");
        let json =
            serde_json::to_string(&AdminPerformanceLabel::NeedsImprovement).expect("serializes");
        assert_eq!(json, "\"Needs Improvement\"");
    }
}
