//! Progress tracking between assessment snapshots.
//!
//! Compares a student's current triangulated profile against a prior one,
//! factor by factor, and grades the interventions that were active in the
//! prior snapshot by how the related factors moved.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    AssessmentDomain, InterventionDomain, TriangulatedProfile,
};

/// A PASS percentile must move at least this much to count as significant.
const PASS_SIGNIFICANT_CHANGE: f64 = 5.0;
/// A CAT4 or academic stanine must move at least this much.
const STANINE_SIGNIFICANT_CHANGE: f64 = 0.5;

/// A triangulated profile pinned to an assessment date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub date: NaiveDate,
    pub profile: TriangulatedProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Improved,
    Declined,
    Unchanged,
}

/// One factor's movement between the two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorChange {
    pub domain: AssessmentDomain,
    pub name: String,
    pub previous: f64,
    pub current: f64,
    pub change: f64,
    pub direction: ChangeDirection,
    pub significant: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStatus {
    Improving,
    Stable,
    Declining,
}

/// Aggregate movement for one assessment domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainTrend {
    pub domain: AssessmentDomain,
    pub average_change: f64,
    pub status: TrendStatus,
    pub changes: Vec<FactorChange>,
}

/// Fragile-learner movement between the two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FragileTransition {
    BecameFragile,
    NoLongerFragile,
    StillFragile,
    StillNotFragile,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterventionOutcome {
    Effective,
    PartiallyEffective,
    NotEffective,
    Indeterminate,
}

/// Verdict on one intervention that was active in the baseline snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionReview {
    pub title: String,
    pub domain: InterventionDomain,
    pub outcome: InterventionOutcome,
    pub average_related_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub student_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_date: Option<NaiveDate>,
    pub current_date: NaiveDate,
    pub has_baseline: bool,
    pub domains: Vec<DomainTrend>,
    pub fragile_transition: FragileTransition,
    pub improvement_areas: Vec<String>,
    pub concern_areas: Vec<String>,
    pub intervention_reviews: Vec<InterventionReview>,
    pub summary: String,
}

pub fn track_progress(
    current: &ProfileSnapshot,
    previous: Option<&ProfileSnapshot>,
) -> ProgressReport {
    let Some(previous) = previous else {
        return no_baseline(current);
    };

    let mut domains = Vec::new();
    for domain in [
        AssessmentDomain::Pass,
        AssessmentDomain::Cat4,
        AssessmentDomain::Academic,
    ] {
        if let Some(trend) = domain_trend(domain, &current.profile, &previous.profile) {
            domains.push(trend);
        }
    }

    let fragile_transition = fragile_transition(&current.profile, &previous.profile);

    let mut improvement_areas: Vec<String> = domains
        .iter()
        .flat_map(|trend| &trend.changes)
        .filter(|change| change.significant && change.direction == ChangeDirection::Improved)
        .map(|change| change.name.clone())
        .collect();
    let mut concern_areas: Vec<String> = domains
        .iter()
        .flat_map(|trend| &trend.changes)
        .filter(|change| change.significant && change.direction == ChangeDirection::Declined)
        .map(|change| change.name.clone())
        .collect();
    match fragile_transition {
        FragileTransition::NoLongerFragile => {
            improvement_areas.push("Fragile Learner Status".to_string());
        }
        FragileTransition::BecameFragile => {
            concern_areas.push("Fragile Learner Status".to_string());
        }
        _ => {}
    }

    let intervention_reviews = review_interventions(&previous.profile, &domains);

    let summary = progress_summary(
        &current.profile.name,
        &domains,
        fragile_transition,
        &improvement_areas,
        &concern_areas,
    );

    ProgressReport {
        student_id: current.profile.student_id.clone(),
        name: current.profile.name.clone(),
        baseline_date: Some(previous.date),
        current_date: current.date,
        has_baseline: true,
        domains,
        fragile_transition,
        improvement_areas,
        concern_areas,
        intervention_reviews,
        summary,
    }
}

fn no_baseline(current: &ProfileSnapshot) -> ProgressReport {
    ProgressReport {
        student_id: current.profile.student_id.clone(),
        name: current.profile.name.clone(),
        baseline_date: None,
        current_date: current.date,
        has_baseline: false,
        domains: Vec::new(),
        fragile_transition: FragileTransition::Unknown,
        improvement_areas: Vec::new(),
        concern_areas: Vec::new(),
        intervention_reviews: Vec::new(),
        summary: format!(
            "No prior assessment on record for {}; this snapshot becomes the baseline.",
            current.profile.name
        ),
    }
}

fn domain_trend(
    domain: AssessmentDomain,
    current: &TriangulatedProfile,
    previous: &TriangulatedProfile,
) -> Option<DomainTrend> {
    let (changes, significance) = match domain {
        AssessmentDomain::Pass => {
            let (cur, prev) = (current.pass.as_ref()?, previous.pass.as_ref()?);
            let pairs: Vec<(String, f64, f64)> = cur
                .factors
                .iter()
                .filter_map(|entry| {
                    prev.percentile_of(entry.factor).map(|before| {
                        (entry.factor.label().to_string(), before, entry.percentile)
                    })
                })
                .collect();
            (pairs, PASS_SIGNIFICANT_CHANGE)
        }
        AssessmentDomain::Cat4 => {
            let (cur, prev) = (current.cat4.as_ref()?, previous.cat4.as_ref()?);
            let pairs: Vec<(String, f64, f64)> = cur
                .domains
                .iter()
                .filter_map(|entry| {
                    prev.stanine_of(entry.domain).map(|before| {
                        (entry.domain.label().to_string(), before, entry.stanine)
                    })
                })
                .collect();
            (pairs, STANINE_SIGNIFICANT_CHANGE)
        }
        AssessmentDomain::Academic => {
            let (cur, prev) = (current.academic.as_ref()?, previous.academic.as_ref()?);
            let pairs: Vec<(String, f64, f64)> = cur
                .subjects
                .iter()
                .filter_map(|entry| {
                    prev.subjects
                        .iter()
                        .find(|p| p.subject == entry.subject)
                        .map(|p| (entry.subject.clone(), p.stanine, entry.stanine))
                })
                .collect();
            (pairs, STANINE_SIGNIFICANT_CHANGE)
        }
    };

    if changes.is_empty() {
        return None;
    }

    let changes: Vec<FactorChange> = changes
        .into_iter()
        .map(|(name, before, after)| {
            let change = after - before;
            FactorChange {
                domain,
                name,
                previous: before,
                current: after,
                change,
                direction: if change > 0.0 {
                    ChangeDirection::Improved
                } else if change < 0.0 {
                    ChangeDirection::Declined
                } else {
                    ChangeDirection::Unchanged
                },
                significant: change.abs() >= significance,
            }
        })
        .collect();

    let average_change =
        changes.iter().map(|c| c.change).sum::<f64>() / changes.len() as f64;
    let status = if average_change >= significance {
        TrendStatus::Improving
    } else if average_change <= -significance {
        TrendStatus::Declining
    } else {
        TrendStatus::Stable
    };

    Some(DomainTrend {
        domain,
        average_change,
        status,
        changes,
    })
}

fn fragile_transition(
    current: &TriangulatedProfile,
    previous: &TriangulatedProfile,
) -> FragileTransition {
    use super::domain::FragileLearnerStatus as F;
    match (previous.fragile_learner, current.fragile_learner) {
        (F::Unknown, _) | (_, F::Unknown) => FragileTransition::Unknown,
        (F::NotFragile, F::Fragile) => FragileTransition::BecameFragile,
        (F::Fragile, F::NotFragile) => FragileTransition::NoLongerFragile,
        (F::Fragile, F::Fragile) => FragileTransition::StillFragile,
        (F::NotFragile, F::NotFragile) => FragileTransition::StillNotFragile,
    }
}

/// Which assessment domains an intervention is expected to move.
fn related_domains(domain: InterventionDomain) -> &'static [AssessmentDomain] {
    match domain {
        InterventionDomain::Emotional | InterventionDomain::Behavioral => {
            &[AssessmentDomain::Pass]
        }
        InterventionDomain::Cognitive => &[AssessmentDomain::Cat4],
        InterventionDomain::Academic => &[AssessmentDomain::Academic],
        InterventionDomain::Holistic => &[
            AssessmentDomain::Pass,
            AssessmentDomain::Cat4,
            AssessmentDomain::Academic,
        ],
    }
}

fn review_interventions(
    previous: &TriangulatedProfile,
    domains: &[DomainTrend],
) -> Vec<InterventionReview> {
    previous
        .interventions
        .iter()
        .map(|intervention| {
            let related = related_domains(intervention.domain);
            let related_changes: Vec<&FactorChange> = domains
                .iter()
                .filter(|trend| related.contains(&trend.domain))
                .flat_map(|trend| &trend.changes)
                .collect();

            let (outcome, average_related_change) = if related_changes.is_empty() {
                (InterventionOutcome::Indeterminate, 0.0)
            } else {
                let avg = related_changes.iter().map(|c| c.change).sum::<f64>()
                    / related_changes.len() as f64;
                let significance = match intervention.domain {
                    InterventionDomain::Emotional | InterventionDomain::Behavioral => {
                        PASS_SIGNIFICANT_CHANGE
                    }
                    _ => STANINE_SIGNIFICANT_CHANGE,
                };
                let outcome = if avg >= significance {
                    InterventionOutcome::Effective
                } else if avg > 0.0 {
                    InterventionOutcome::PartiallyEffective
                } else {
                    InterventionOutcome::NotEffective
                };
                (outcome, avg)
            };

            InterventionReview {
                title: intervention.title.clone(),
                domain: intervention.domain,
                outcome,
                average_related_change,
            }
        })
        .collect()
}

fn progress_summary(
    name: &str,
    domains: &[DomainTrend],
    fragile: FragileTransition,
    improvements: &[String],
    concerns: &[String],
) -> String {
    let mut lines = Vec::new();

    let improving = domains
        .iter()
        .filter(|t| t.status == TrendStatus::Improving)
        .count();
    let declining = domains
        .iter()
        .filter(|t| t.status == TrendStatus::Declining)
        .count();

    if declining > 0 {
        lines.push(format!(
            "{name} is declining in {declining} assessment domain(s) since the last snapshot."
        ));
    } else if improving > 0 {
        lines.push(format!(
            "{name} is improving in {improving} assessment domain(s) since the last snapshot."
        ));
    } else {
        lines.push(format!("{name} is broadly stable since the last snapshot."));
    }

    if !improvements.is_empty() {
        lines.push(format!("Significant gains: {}.", improvements.join(", ")));
    }
    if !concerns.is_empty() {
        lines.push(format!("Significant declines: {}.", concerns.join(", ")));
    }

    match fragile {
        FragileTransition::BecameFragile => {
            lines.push("The student now meets the fragile learner criteria.".to_string());
        }
        FragileTransition::NoLongerFragile => {
            lines.push("The student no longer meets the fragile learner criteria.".to_string());
        }
        _ => {}
    }

    lines.join(" ")
}
