//! Fragile-learner determination.
//!
//! Two definitions ship in the rubric and are deliberately kept as separate
//! predicates: the simple weak-battery count drives the triangulated profile
//! and the intervention table, while the stricter intersection rule
//! (cognitive potential present but attitudinal barriers in the way) is
//! exposed on its own for callers that want it. Which definition is
//! authoritative is an open product question.

use super::domain::{Cat4Profile, FragileLearnerStatus, PassProfile};
use super::thresholds::ThresholdConfig;

/// Weak-battery count rule: fragile iff at least `fragile_flag_min` CAT4
/// batteries classified as weaknesses. `Unknown` when CAT4 is unavailable.
pub fn fragile_learner_status(
    cat4: Option<&Cat4Profile>,
    thresholds: &ThresholdConfig,
) -> FragileLearnerStatus {
    match cat4 {
        None => FragileLearnerStatus::Unknown,
        Some(profile) if profile.fragile_flags >= thresholds.fragile_flag_min => {
            FragileLearnerStatus::Fragile
        }
        Some(_) => FragileLearnerStatus::NotFragile,
    }
}

/// Intersection rule: cognitive potential (>= 2 batteries at or above the
/// CAT4 weakness cut) combined with attitudinal barriers (>= 2 PASS risk
/// areas). `None` when either assessment is missing.
pub fn is_true_fragile_learner(
    cat4: Option<&Cat4Profile>,
    pass: Option<&PassProfile>,
    thresholds: &ThresholdConfig,
) -> Option<bool> {
    let cat4 = cat4?;
    let pass = pass?;

    let capable_batteries = cat4
        .domains
        .iter()
        .filter(|entry| entry.sas >= thresholds.cat4_weakness_below)
        .count();

    Some(capable_batteries >= 2 && pass.risk_areas.len() >= 2)
}
