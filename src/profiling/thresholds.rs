use serde::{Deserialize, Serialize};

/// Classification cut points for the three assessment scales.
///
/// Earlier revisions of the profiling rubric shipped with divergent cut
/// points (PASS at-risk 40, CAT4 stanine shortcuts); this struct carries the
/// instruction-set values and is applied uniformly everywhere. Construct once
/// and treat as read-only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// PASS percentile below which a factor is at risk.
    pub pass_risk_below: f64,
    /// PASS percentile at or above which a factor is a strength.
    pub pass_strength_min: f64,
    /// CAT4 SAS below which a battery is a weakness.
    pub cat4_weakness_below: f64,
    /// CAT4 SAS above which a battery is a strength (exclusive).
    pub cat4_strength_above: f64,
    /// Academic stanine below which a subject is a weakness.
    pub academic_weakness_below: f64,
    /// Academic stanine at or above which a subject is a strength.
    pub academic_strength_min: f64,
    /// Count of weak CAT4 batteries that marks a fragile learner.
    pub fragile_flag_min: usize,
    /// Stanine gap treated as meaningful over/under-achievement.
    pub achievement_gap_stanines: f64,
}

impl ThresholdConfig {
    /// Canonical cut points from the instruction-set revision of the rubric.
    pub const fn instruction_set() -> Self {
        Self {
            pass_risk_below: 45.0,
            pass_strength_min: 65.0,
            cat4_weakness_below: 90.0,
            cat4_strength_above: 110.0,
            academic_weakness_below: 4.0,
            academic_strength_min: 7.0,
            fragile_flag_min: 2,
            achievement_gap_stanines: 1.5,
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self::instruction_set()
    }
}
