use std::collections::BTreeMap;

use crate::profiling::domain::{
    AssessmentDomain, Cat4Domain, Cat4Score, PassFactor, StudentRecord,
};
use crate::profiling::progress::{
    track_progress, ChangeDirection, FragileTransition, InterventionOutcome, TrendStatus,
};

use super::common::snapshot;

fn baseline_record() -> StudentRecord {
    let mut record = StudentRecord::new("S400", "Hasan Nouri", "8");
    record.pass_percentiles = BTreeMap::from([
        (PassFactor::SelfRegard, 30.0),
        (PassFactor::GeneralWorkEthic, 50.0),
    ]);
    record.cat4_scores = BTreeMap::from([
        (Cat4Domain::Verbal, Cat4Score::Stanine(2.0)),
        (Cat4Domain::Quantitative, Cat4Score::Stanine(2.0)),
        (Cat4Domain::Nonverbal, Cat4Score::Stanine(5.0)),
    ]);
    record.academic_stanines = BTreeMap::from([("English".to_string(), 4.0)]);
    record
}

#[test]
fn first_snapshot_becomes_the_baseline() {
    let current = snapshot(2026, 6, 1, &baseline_record());

    let report = track_progress(&current, None);

    assert!(!report.has_baseline);
    assert!(report.baseline_date.is_none());
    assert!(report.domains.is_empty());
    assert_eq!(report.fragile_transition, FragileTransition::Unknown);
    assert!(report.summary.contains("baseline"));
}

#[test]
fn significant_pass_gains_are_flagged_as_improvements() {
    let previous = snapshot(2025, 9, 1, &baseline_record());

    let mut improved = baseline_record();
    improved
        .pass_percentiles
        .insert(PassFactor::SelfRegard, 50.0);
    let current = snapshot(2026, 6, 1, &improved);

    let report = track_progress(&current, Some(&previous));

    assert!(report.has_baseline);
    let pass_trend = report
        .domains
        .iter()
        .find(|t| t.domain == AssessmentDomain::Pass)
        .expect("PASS trend present");
    assert_eq!(pass_trend.status, TrendStatus::Improving);

    let self_regard = pass_trend
        .changes
        .iter()
        .find(|c| c.name == PassFactor::SelfRegard.label())
        .expect("self-regard tracked");
    assert_eq!(self_regard.change, 20.0);
    assert_eq!(self_regard.direction, ChangeDirection::Improved);
    assert!(self_regard.significant);
    assert!(report
        .improvement_areas
        .contains(&PassFactor::SelfRegard.label().to_string()));

    // Work ethic did not move.
    let work_ethic = pass_trend
        .changes
        .iter()
        .find(|c| c.name == PassFactor::GeneralWorkEthic.label())
        .expect("work ethic tracked");
    assert_eq!(work_ethic.direction, ChangeDirection::Unchanged);
    assert!(!work_ethic.significant);
}

#[test]
fn academic_slippage_lands_in_the_concern_list() {
    let previous = snapshot(2025, 9, 1, &baseline_record());

    let mut slipped = baseline_record();
    slipped.academic_stanines.insert("English".to_string(), 3.0);
    let current = snapshot(2026, 6, 1, &slipped);

    let report = track_progress(&current, Some(&previous));

    let academic_trend = report
        .domains
        .iter()
        .find(|t| t.domain == AssessmentDomain::Academic)
        .expect("academic trend present");
    assert_eq!(academic_trend.status, TrendStatus::Declining);
    assert!(report.concern_areas.contains(&"English".to_string()));
    assert!(report.summary.contains("declining"));
}

#[test]
fn recovering_batteries_clear_the_fragile_flag() {
    let previous = snapshot(2025, 9, 1, &baseline_record());

    let mut recovered = baseline_record();
    recovered
        .cat4_scores
        .insert(Cat4Domain::Verbal, Cat4Score::Stanine(5.0));
    recovered
        .cat4_scores
        .insert(Cat4Domain::Quantitative, Cat4Score::Stanine(5.0));
    let current = snapshot(2026, 6, 1, &recovered);

    let report = track_progress(&current, Some(&previous));

    assert_eq!(report.fragile_transition, FragileTransition::NoLongerFragile);
    assert!(report
        .improvement_areas
        .contains(&"Fragile Learner Status".to_string()));
    assert!(report.summary.contains("no longer"));
}

#[test]
fn interventions_are_graded_by_related_factor_movement() {
    let previous = snapshot(2025, 9, 1, &baseline_record());
    // The baseline self-regard risk put an emotional intervention in place.
    assert!(previous
        .profile
        .interventions
        .iter()
        .any(|i| i.title == "Self-Esteem Building"));

    let mut improved = baseline_record();
    improved
        .pass_percentiles
        .insert(PassFactor::SelfRegard, 60.0);
    improved
        .pass_percentiles
        .insert(PassFactor::GeneralWorkEthic, 55.0);
    let current = snapshot(2026, 6, 1, &improved);

    let report = track_progress(&current, Some(&previous));

    let review = report
        .intervention_reviews
        .iter()
        .find(|r| r.title == "Self-Esteem Building")
        .expect("review present");
    // PASS moved +30 and +5, averaging well past the significance cut.
    assert_eq!(review.outcome, InterventionOutcome::Effective);
    assert!(review.average_related_change > 5.0);
}
