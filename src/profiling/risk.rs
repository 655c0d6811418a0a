//! Weighted risk prediction.
//!
//! A second, independent risk model: weighted deficits over the currently
//! classified risk factors (70%) blended with an early-warning scan of PASS
//! factors hovering near the risk cut (30%). Deliberately not reconciled
//! with the point-based band in the triangulated summary.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{AssessmentDomain, Cat4Domain, PassFactor, Priority, TriangulatedProfile};
use super::thresholds::ThresholdConfig;

const CURRENT_RISK_WEIGHT: f64 = 0.7;
const EARLY_WARNING_WEIGHT: f64 = 0.3;
const FRAGILE_LEARNER_WEIGHT: f64 = 0.9;
const ACADEMIC_SUBJECT_WEIGHT: f64 = 0.6;
const HIGH_RISK_SCORE: f64 = 0.7;
const MEDIUM_RISK_SCORE: f64 = 0.4;
const BORDERLINE_RISK_SCORE: f64 = 0.3;
const MAX_CONFIDENCE: f64 = 0.95;
const TREND_SIGNIFICANT_CHANGE: f64 = 5.0;
const DECLINING_TREND_WEIGHT: f64 = 0.9;

/// One weighted contribution to the current-risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub domain: AssessmentDomain,
    pub factor: String,
    /// Normalized deficit in 0..=1.
    pub severity: f64,
    pub weighted_risk: f64,
    pub details: String,
}

/// A PASS factor close enough to the risk cut to watch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarlyIndicator {
    pub factor: PassFactor,
    pub level: f64,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictedRiskLevel {
    High,
    Medium,
    Borderline,
    Low,
}

impl PredictedRiskLevel {
    pub fn urgency(&self) -> &'static str {
        match self {
            PredictedRiskLevel::High => "urgent",
            PredictedRiskLevel::Medium => "soon",
            PredictedRiskLevel::Borderline => "monitor",
            PredictedRiskLevel::Low => "not urgent",
        }
    }
}

/// Preventive action suggested by the predictor, ahead of any formal
/// intervention plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreventiveRecommendation {
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub timeframe: &'static str,
}

/// PASS factor movement against the most recent prior profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    pub improving: Vec<String>,
    pub declining: Vec<String>,
    pub stable: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskPrediction {
    pub overall_risk_score: f64,
    pub risk_level: PredictedRiskLevel,
    pub time_to_intervention: &'static str,
    pub risk_factors: Vec<RiskFactor>,
    pub early_indicators: Vec<EarlyIndicator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendSummary>,
    pub confidence: f64,
    pub recommendations: Vec<PreventiveRecommendation>,
}

/// Static per-factor weights for the predictive model.
fn pass_factor_weight(factor: PassFactor) -> f64 {
    match factor {
        PassFactor::GeneralWorkEthic => 0.9,
        PassFactor::SelfRegard | PassFactor::EmotionalControl => 0.8,
        PassFactor::AttitudeToTeachers
        | PassFactor::ConfidenceInLearning
        | PassFactor::AttitudeToAttendance => 0.7,
        PassFactor::PerceivedLearningCapability
        | PassFactor::PreparednessForLearning
        | PassFactor::ResponseToCurriculum
        | PassFactor::FeelingsAboutSchool => 0.6,
        PassFactor::SocialConfidence => 0.5,
    }
}

fn cat4_domain_weight(domain: Cat4Domain) -> f64 {
    match domain {
        Cat4Domain::Verbal | Cat4Domain::Quantitative => 0.7,
        Cat4Domain::Nonverbal => 0.6,
        Cat4Domain::Spatial => 0.5,
    }
}

fn percentile_deficit(percentile: f64, risk_below: f64) -> f64 {
    ((risk_below - percentile) / risk_below).clamp(0.0, 1.0)
}

fn stanine_deficit(stanine: f64) -> f64 {
    if stanine <= 0.0 {
        return 0.0;
    }
    ((4.0 - stanine) / 3.0).clamp(0.0, 1.0)
}

pub fn predict_risk(
    profile: &TriangulatedProfile,
    history: &[TriangulatedProfile],
    thresholds: &ThresholdConfig,
) -> RiskPrediction {
    let trend = pass_trends(profile, history);
    let risk_factors = current_risk_factors(profile, trend.as_ref(), thresholds);
    let current_score = mean_of(risk_factors.iter().map(|f| f.weighted_risk));

    let early_indicators = early_warning_scan(profile);
    let early_score = mean_of(early_indicators.iter().map(|i| i.level));

    let overall_risk_score =
        current_score * CURRENT_RISK_WEIGHT + early_score * EARLY_WARNING_WEIGHT;

    let risk_level = if overall_risk_score >= HIGH_RISK_SCORE {
        PredictedRiskLevel::High
    } else if overall_risk_score >= MEDIUM_RISK_SCORE {
        PredictedRiskLevel::Medium
    } else if overall_risk_score >= BORDERLINE_RISK_SCORE {
        PredictedRiskLevel::Borderline
    } else {
        PredictedRiskLevel::Low
    };

    let recommendations = preventive_recommendations(risk_level, &risk_factors);

    RiskPrediction {
        overall_risk_score,
        risk_level,
        time_to_intervention: risk_level.urgency(),
        risk_factors,
        early_indicators,
        trend,
        confidence: prediction_confidence(profile, history),
        recommendations,
    }
}

fn mean_of(values: impl Iterator<Item = f64>) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for value in values {
        total += value;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Compares current PASS percentiles with the most recent prior profile.
/// `history` is ordered oldest first; factors absent on either side are
/// skipped rather than counted as stable.
fn pass_trends(
    profile: &TriangulatedProfile,
    history: &[TriangulatedProfile],
) -> Option<TrendSummary> {
    let current = profile.pass.as_ref()?;
    let previous = history.last()?.pass.as_ref()?;

    let baseline: BTreeMap<PassFactor, f64> = previous
        .factors
        .iter()
        .map(|entry| (entry.factor, entry.percentile))
        .collect();

    let mut trend = TrendSummary {
        improving: Vec::new(),
        declining: Vec::new(),
        stable: 0,
    };
    for entry in &current.factors {
        let Some(&before) = baseline.get(&entry.factor) else {
            continue;
        };
        let change = entry.percentile - before;
        if change >= TREND_SIGNIFICANT_CHANGE {
            trend.improving.push(entry.factor.label().to_string());
        } else if change <= -TREND_SIGNIFICANT_CHANGE {
            trend.declining.push(entry.factor.label().to_string());
        } else {
            trend.stable += 1;
        }
    }
    Some(trend)
}

fn current_risk_factors(
    profile: &TriangulatedProfile,
    trend: Option<&TrendSummary>,
    thresholds: &ThresholdConfig,
) -> Vec<RiskFactor> {
    let mut factors = Vec::new();

    if let Some(pass) = &profile.pass {
        for risk in &pass.risk_areas {
            let severity = percentile_deficit(risk.percentile, thresholds.pass_risk_below);
            let weight = pass_factor_weight(risk.factor);
            factors.push(RiskFactor {
                domain: AssessmentDomain::Pass,
                factor: risk.factor.label().to_string(),
                severity,
                weighted_risk: severity * weight,
                details: format!(
                    "{} at percentile {:.0}, below the risk threshold",
                    risk.factor.label(),
                    risk.percentile
                ),
            });
        }
    }

    if let Some(cat4) = &profile.cat4 {
        for weakness in &cat4.weakness_areas {
            let severity = stanine_deficit(weakness.stanine);
            let weight = cat4_domain_weight(weakness.domain);
            factors.push(RiskFactor {
                domain: AssessmentDomain::Cat4,
                factor: weakness.domain.label().to_string(),
                severity,
                weighted_risk: severity * weight,
                details: format!(
                    "{} at stanine {:.1} (SAS {:.0}), below average",
                    weakness.domain.label(),
                    weakness.stanine,
                    weakness.sas
                ),
            });
        }
    }

    if let Some(trend) = trend {
        if trend.declining.len() >= 2 {
            let severity = (trend.declining.len() as f64 * 0.25).min(1.0);
            factors.push(RiskFactor {
                domain: AssessmentDomain::Pass,
                factor: "Declining Attitudes".to_string(),
                severity,
                weighted_risk: severity * DECLINING_TREND_WEIGHT,
                details: format!(
                    "{} PASS factors dropped significantly since the last assessment",
                    trend.declining.len()
                ),
            });
        }
    }

    if profile.fragile_learner.is_fragile() {
        factors.push(RiskFactor {
            domain: AssessmentDomain::Cat4,
            factor: "Fragile Learner".to_string(),
            severity: 1.0,
            weighted_risk: FRAGILE_LEARNER_WEIGHT,
            details: "Student is classified as a fragile learner".to_string(),
        });
    }

    if let Some(academic) = &profile.academic {
        for weakness in &academic.weakness_areas {
            let severity = stanine_deficit(weakness.stanine);
            factors.push(RiskFactor {
                domain: AssessmentDomain::Academic,
                factor: weakness.subject.clone(),
                severity,
                weighted_risk: severity * ACADEMIC_SUBJECT_WEIGHT,
                details: format!(
                    "{} at stanine {:.1}, below average",
                    weakness.subject, weakness.stanine
                ),
            });
        }
    }

    factors.sort_by(|a, b| {
        b.weighted_risk
            .partial_cmp(&a.weighted_risk)
            .unwrap_or(Ordering::Equal)
    });
    factors
}

/// Fixed watch margins above the risk cut, per key PASS factor.
fn early_warning_scan(profile: &TriangulatedProfile) -> Vec<EarlyIndicator> {
    let Some(pass) = &profile.pass else {
        return Vec::new();
    };

    let mut indicators = Vec::new();
    for entry in &pass.factors {
        let (ceiling, span) = match entry.factor {
            PassFactor::SelfRegard | PassFactor::EmotionalControl => (50.0, 10.0),
            PassFactor::GeneralWorkEthic => (55.0, 15.0),
            _ => continue,
        };
        if entry.percentile >= 40.0 && entry.percentile <= ceiling {
            indicators.push(EarlyIndicator {
                factor: entry.factor,
                level: (ceiling - entry.percentile) / span,
                details: format!(
                    "{} at percentile {:.0}, approaching the risk threshold",
                    entry.factor.label(),
                    entry.percentile
                ),
            });
        }
    }
    indicators
}

fn prediction_confidence(profile: &TriangulatedProfile, history: &[TriangulatedProfile]) -> f64 {
    let mut confidence = 0.5;
    if profile.pass.is_some() {
        confidence += 0.1;
    }
    if profile.cat4.is_some() {
        confidence += 0.1;
    }
    if profile.academic.is_some() {
        confidence += 0.1;
    }
    confidence += (history.len() as f64 * 0.05).min(0.2);
    confidence.min(MAX_CONFIDENCE)
}

fn preventive_recommendations(
    level: PredictedRiskLevel,
    risk_factors: &[RiskFactor],
) -> Vec<PreventiveRecommendation> {
    let mut recommendations = Vec::new();

    match level {
        PredictedRiskLevel::High => {
            recommendations.push(PreventiveRecommendation {
                priority: Priority::Critical,
                title: "Immediate Comprehensive Intervention".to_string(),
                description: "Implement a multi-faceted intervention plan addressing all risk areas immediately, with weekly progress monitoring.".to_string(),
                timeframe: "within 1 week",
            });
            for factor in risk_factors.iter().take(2) {
                recommendations.push(PreventiveRecommendation {
                    priority: Priority::High,
                    title: format!("Address {}", factor.factor),
                    description: format!(
                        "Targeted intervention for {}, a significant risk area.",
                        factor.factor
                    ),
                    timeframe: "within 2 weeks",
                });
            }
        }
        PredictedRiskLevel::Medium => {
            recommendations.push(PreventiveRecommendation {
                priority: Priority::Medium,
                title: "Coordinated Intervention Plan".to_string(),
                description: "Develop an intervention plan targeting the identified risk areas, with bi-weekly progress monitoring.".to_string(),
                timeframe: "within 2 weeks",
            });
            if let Some(factor) = risk_factors.first() {
                recommendations.push(PreventiveRecommendation {
                    priority: Priority::Medium,
                    title: format!("Address {}", factor.factor),
                    description: format!(
                        "Targeted support for {}, which shows elevated risk.",
                        factor.factor
                    ),
                    timeframe: "within 3 weeks",
                });
            }
        }
        PredictedRiskLevel::Borderline => {
            recommendations.push(PreventiveRecommendation {
                priority: Priority::Medium,
                title: "Enhanced Monitoring Plan".to_string(),
                description: "Closer monitoring of the identified early warning indicators, with monthly check-ins.".to_string(),
                timeframe: "within 1 month",
            });
        }
        PredictedRiskLevel::Low => {
            recommendations.push(PreventiveRecommendation {
                priority: Priority::Low,
                title: "Maintain Current Support".to_string(),
                description: "Continue current support strategies and regular monitoring to maintain the positive trajectory.".to_string(),
                timeframe: "ongoing",
            });
        }
    }

    recommendations
}
