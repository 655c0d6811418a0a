//! Threshold classification for the three assessment domains.
//!
//! Each function is a pure map from raw metrics to a profile; a domain with
//! no metrics yields `None` so "unavailable" never produces a half-filled
//! analysis. Risk and strength sublists keep evaluation order; ranking
//! happens later in the summarizer.

use std::collections::BTreeMap;

use super::domain::{
    AcademicProfile, Cat4Domain, Cat4DomainAnalysis, Cat4Profile, Cat4Score, Level,
    PassFactor, PassFactorAnalysis, PassOverallStatus, PassProfile, SubjectAnalysis,
};
use super::scale::{sas_to_stanine, stanine_to_sas};
use super::thresholds::ThresholdConfig;

pub fn classify_pass_percentile(percentile: f64, thresholds: &ThresholdConfig) -> Level {
    if percentile >= thresholds.pass_strength_min {
        Level::Strength
    } else if percentile >= thresholds.pass_risk_below {
        Level::Balanced
    } else {
        Level::AtRisk
    }
}

pub fn classify_cat4_sas(sas: f64, thresholds: &ThresholdConfig) -> Level {
    if sas > thresholds.cat4_strength_above {
        Level::Strength
    } else if sas >= thresholds.cat4_weakness_below {
        Level::Balanced
    } else {
        Level::Weakness
    }
}

pub fn classify_academic_stanine(stanine: f64, thresholds: &ThresholdConfig) -> Level {
    if stanine >= thresholds.academic_strength_min {
        Level::Strength
    } else if stanine >= thresholds.academic_weakness_below {
        Level::Balanced
    } else {
        Level::Weakness
    }
}

pub fn analyze_pass(
    percentiles: &BTreeMap<PassFactor, f64>,
    thresholds: &ThresholdConfig,
) -> Option<PassProfile> {
    if percentiles.is_empty() {
        return None;
    }

    let mut factors = Vec::with_capacity(percentiles.len());
    let mut risk_areas = Vec::new();
    let mut strength_areas = Vec::new();

    for (&factor, &percentile) in percentiles {
        let level = classify_pass_percentile(percentile, thresholds);
        let entry = PassFactorAnalysis {
            factor,
            percentile,
            level,
        };
        if level.is_concern() {
            risk_areas.push(entry.clone());
        } else if level.is_strength() {
            strength_areas.push(entry.clone());
        }
        factors.push(entry);
    }

    let overall_status = pass_overall_status(risk_areas.len(), strength_areas.len());

    Some(PassProfile {
        factors,
        risk_areas,
        strength_areas,
        overall_status,
    })
}

fn pass_overall_status(risk_count: usize, strength_count: usize) -> PassOverallStatus {
    if risk_count >= 3 {
        PassOverallStatus::HighRisk
    } else if risk_count >= 1 {
        PassOverallStatus::SomeRisk
    } else if strength_count >= 3 {
        PassOverallStatus::Strong
    } else {
        PassOverallStatus::Balanced
    }
}

pub fn analyze_cat4(
    scores: &BTreeMap<Cat4Domain, Cat4Score>,
    thresholds: &ThresholdConfig,
) -> Option<Cat4Profile> {
    if scores.is_empty() {
        return None;
    }

    let mut domains = Vec::with_capacity(scores.len());
    let mut weakness_areas = Vec::new();
    let mut strength_areas = Vec::new();

    for (&domain, &score) in scores {
        let (stanine, sas) = match score {
            Cat4Score::Stanine(stanine) => (stanine, stanine_to_sas(stanine)),
            Cat4Score::Sas(sas) => (sas_to_stanine(sas), sas),
        };
        let level = classify_cat4_sas(sas, thresholds);
        let entry = Cat4DomainAnalysis {
            domain,
            stanine,
            sas,
            level,
        };
        if level.is_concern() {
            weakness_areas.push(entry.clone());
        } else if level.is_strength() {
            strength_areas.push(entry.clone());
        }
        domains.push(entry);
    }

    let fragile_flags = weakness_areas.len();

    Some(Cat4Profile {
        domains,
        weakness_areas,
        strength_areas,
        fragile_flags,
    })
}

pub fn analyze_academic(
    stanines: &BTreeMap<String, f64>,
    thresholds: &ThresholdConfig,
) -> Option<AcademicProfile> {
    if stanines.is_empty() {
        return None;
    }

    let mut subjects = Vec::with_capacity(stanines.len());
    let mut weakness_areas = Vec::new();
    let mut strength_areas = Vec::new();
    let mut stanine_total = 0.0;

    for (subject, &stanine) in stanines {
        let level = classify_academic_stanine(stanine, thresholds);
        let entry = SubjectAnalysis {
            subject: subject.clone(),
            stanine,
            level,
        };
        if level.is_concern() {
            weakness_areas.push(entry.clone());
        } else if level.is_strength() {
            strength_areas.push(entry.clone());
        }
        stanine_total += stanine;
        subjects.push(entry);
    }

    let average_stanine = stanine_total / subjects.len() as f64;

    Some(AcademicProfile {
        subjects,
        weakness_areas,
        strength_areas,
        average_stanine,
    })
}
