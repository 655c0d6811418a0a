//! Triangulation: merges the three classified domains into ranked
//! strengths/weaknesses, a point-based risk band, and learning-profile
//! labels.

use std::cmp::Ordering;

use super::domain::{
    AcademicBand, AcademicProfile, AssessmentDomain, AttitudeProfile, Cat4Domain, Cat4Profile,
    CognitiveStyle, FragileLearnerStatus, GapAnalysis, GapStatus, LearningProfile, PassFactor,
    PassProfile, RankedFactor, RiskBand,
};
use super::thresholds::ThresholdConfig;

const TOP_FACTOR_LIMIT: usize = 5;

/// Point contributions for the triangulated risk band. Caps limit how many
/// points one domain can contribute, not how many factors get classified.
const PASS_RISK_POINTS: f64 = 1.0;
const PASS_RISK_POINT_CAP: f64 = 3.0;
const CAT4_WEAKNESS_POINTS: f64 = 0.5;
const CAT4_WEAKNESS_POINT_CAP: f64 = 2.0;
const ACADEMIC_WEAKNESS_POINTS: f64 = 1.0;
const ACADEMIC_WEAKNESS_POINT_CAP: f64 = 3.0;
const FRAGILE_LEARNER_POINTS: f64 = 2.0;
const HIGH_RISK_POINTS: f64 = 7.0;
const MEDIUM_RISK_POINTS: f64 = 4.0;

pub struct TriangulatedSummary {
    pub top_strengths: Vec<RankedFactor>,
    pub top_weaknesses: Vec<RankedFactor>,
    pub risk_profile: RiskBand,
    pub learning_profile: LearningProfile,
}

pub fn summarize(
    pass: Option<&PassProfile>,
    cat4: Option<&Cat4Profile>,
    academic: Option<&AcademicProfile>,
    fragile: FragileLearnerStatus,
    thresholds: &ThresholdConfig,
) -> TriangulatedSummary {
    let (top_strengths, top_weaknesses) = rank_factors(pass, cat4, academic);

    TriangulatedSummary {
        top_strengths,
        top_weaknesses,
        risk_profile: risk_band(pass, cat4, academic, fragile),
        learning_profile: learning_profile(pass, cat4, academic, thresholds),
    }
}

fn rank_factors(
    pass: Option<&PassProfile>,
    cat4: Option<&Cat4Profile>,
    academic: Option<&AcademicProfile>,
) -> (Vec<RankedFactor>, Vec<RankedFactor>) {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    if let Some(profile) = pass {
        for entry in &profile.strength_areas {
            strengths.push(RankedFactor {
                domain: AssessmentDomain::Pass,
                name: entry.factor.label().to_string(),
                score: entry.percentile,
                kind: "Attitudinal Strength".to_string(),
            });
        }
        for entry in &profile.risk_areas {
            weaknesses.push(RankedFactor {
                domain: AssessmentDomain::Pass,
                name: entry.factor.label().to_string(),
                score: entry.percentile,
                kind: "Attitudinal Risk".to_string(),
            });
        }
    }

    if let Some(profile) = cat4 {
        for entry in &profile.strength_areas {
            strengths.push(RankedFactor {
                domain: AssessmentDomain::Cat4,
                name: entry.domain.label().to_string(),
                score: entry.sas,
                kind: "Cognitive Strength".to_string(),
            });
        }
        for entry in &profile.weakness_areas {
            weaknesses.push(RankedFactor {
                domain: AssessmentDomain::Cat4,
                name: entry.domain.label().to_string(),
                score: entry.sas,
                kind: "Cognitive Weakness".to_string(),
            });
        }
    }

    if let Some(profile) = academic {
        for entry in &profile.strength_areas {
            strengths.push(RankedFactor {
                domain: AssessmentDomain::Academic,
                name: entry.subject.clone(),
                score: entry.stanine,
                kind: "Academic Strength".to_string(),
            });
        }
        for entry in &profile.weakness_areas {
            weaknesses.push(RankedFactor {
                domain: AssessmentDomain::Academic,
                name: entry.subject.clone(),
                score: entry.stanine,
                kind: "Academic Weakness".to_string(),
            });
        }
    }

    strengths.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    weaknesses.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));
    strengths.truncate(TOP_FACTOR_LIMIT);
    weaknesses.truncate(TOP_FACTOR_LIMIT);

    (strengths, weaknesses)
}

fn risk_band(
    pass: Option<&PassProfile>,
    cat4: Option<&Cat4Profile>,
    academic: Option<&AcademicProfile>,
    fragile: FragileLearnerStatus,
) -> RiskBand {
    let mut points = 0.0;

    if let Some(profile) = pass {
        points +=
            (profile.risk_areas.len() as f64 * PASS_RISK_POINTS).min(PASS_RISK_POINT_CAP);
    }
    if let Some(profile) = cat4 {
        points += (profile.weakness_areas.len() as f64 * CAT4_WEAKNESS_POINTS)
            .min(CAT4_WEAKNESS_POINT_CAP);
    }
    if fragile.is_fragile() {
        points += FRAGILE_LEARNER_POINTS;
    }
    if let Some(profile) = academic {
        points += (profile.weakness_areas.len() as f64 * ACADEMIC_WEAKNESS_POINTS)
            .min(ACADEMIC_WEAKNESS_POINT_CAP);
    }

    if points >= HIGH_RISK_POINTS {
        RiskBand::High
    } else if points >= MEDIUM_RISK_POINTS {
        RiskBand::Medium
    } else {
        RiskBand::Low
    }
}

fn learning_profile(
    pass: Option<&PassProfile>,
    cat4: Option<&Cat4Profile>,
    academic: Option<&AcademicProfile>,
    thresholds: &ThresholdConfig,
) -> LearningProfile {
    LearningProfile {
        cognitive_style: cognitive_style(cat4),
        attitude: attitude_profile(pass, thresholds),
        academic_band: academic_band(academic, thresholds),
        gap: gap_analysis(cat4, academic, thresholds),
    }
}

/// Verbal vs non-verbal dominance; a full stanine either way counts.
fn cognitive_style(cat4: Option<&Cat4Profile>) -> CognitiveStyle {
    let Some(profile) = cat4 else {
        return CognitiveStyle::InsufficientData;
    };
    let Some(verbal) = profile.stanine_of(Cat4Domain::Verbal) else {
        return CognitiveStyle::InsufficientData;
    };

    let nonverbal_batteries: Vec<f64> = [Cat4Domain::Nonverbal, Cat4Domain::Spatial]
        .iter()
        .filter_map(|&domain| profile.stanine_of(domain))
        .collect();
    if nonverbal_batteries.is_empty() {
        return CognitiveStyle::InsufficientData;
    }
    let nonverbal = nonverbal_batteries.iter().sum::<f64>() / nonverbal_batteries.len() as f64;

    let dominance = verbal - nonverbal;
    if dominance >= 1.0 {
        CognitiveStyle::VerbalLearner
    } else if dominance <= -1.0 {
        CognitiveStyle::NonverbalLearner
    } else {
        CognitiveStyle::EvenProfile
    }
}

/// Self-Regard x General Work Ethic quadrant at the balanced cut.
fn attitude_profile(pass: Option<&PassProfile>, thresholds: &ThresholdConfig) -> AttitudeProfile {
    let Some(profile) = pass else {
        return AttitudeProfile::InsufficientData;
    };
    let (Some(self_regard), Some(work_ethic)) = (
        profile.percentile_of(PassFactor::SelfRegard),
        profile.percentile_of(PassFactor::GeneralWorkEthic),
    ) else {
        return AttitudeProfile::InsufficientData;
    };

    let confident = self_regard >= thresholds.pass_risk_below;
    let motivated = work_ethic >= thresholds.pass_risk_below;
    match (confident, motivated) {
        (true, true) => AttitudeProfile::Engaged,
        (false, true) => AttitudeProfile::LowSelfBelief,
        (true, false) => AttitudeProfile::Coasting,
        (false, false) => AttitudeProfile::Disengaged,
    }
}

fn academic_band(
    academic: Option<&AcademicProfile>,
    thresholds: &ThresholdConfig,
) -> AcademicBand {
    let Some(profile) = academic else {
        return AcademicBand::InsufficientData;
    };
    if profile.average_stanine >= thresholds.academic_strength_min {
        AcademicBand::Strong
    } else if profile.average_stanine >= thresholds.academic_weakness_below {
        AcademicBand::OnTrack
    } else {
        AcademicBand::Struggling
    }
}

/// Mean academic stanine against mean CAT4 stanine.
fn gap_analysis(
    cat4: Option<&Cat4Profile>,
    academic: Option<&AcademicProfile>,
    thresholds: &ThresholdConfig,
) -> GapAnalysis {
    let (Some(cat4), Some(academic)) = (cat4, academic) else {
        return GapAnalysis {
            status: GapStatus::InsufficientData,
            stanine_gap: None,
        };
    };
    let Some(cognitive_mean) = cat4.mean_stanine() else {
        return GapAnalysis {
            status: GapStatus::InsufficientData,
            stanine_gap: None,
        };
    };

    let gap = academic.average_stanine - cognitive_mean;
    let status = if gap <= -thresholds.achievement_gap_stanines {
        GapStatus::Underachieving
    } else if gap >= thresholds.achievement_gap_stanines {
        GapStatus::Overachieving
    } else {
        GapStatus::AsExpected
    };

    GapAnalysis {
        status,
        stanine_gap: Some(gap),
    }
}
