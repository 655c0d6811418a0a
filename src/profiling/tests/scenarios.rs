use std::collections::BTreeMap;

use crate::profiling::domain::{
    Cat4Domain, Cat4Score, FragileLearnerStatus, PassFactor, RiskBand, StudentRecord,
};
use crate::profiling::{summarize_cohort, ProfileEngine};

use super::common::{profile_of, struggling_record, thriving_record};

#[test]
fn pass_only_record_profiles_without_the_other_domains() {
    let mut record = StudentRecord::new("S001", "Amina Khalid", "7");
    record.pass_percentiles = BTreeMap::from([
        (PassFactor::SelfRegard, 30.0),
        (PassFactor::GeneralWorkEthic, 70.0),
    ]);

    let profile = profile_of(&record);

    let pass = profile.pass.expect("PASS analysis present");
    assert_eq!(pass.risk_areas.len(), 1);
    assert_eq!(pass.risk_areas[0].factor, PassFactor::SelfRegard);
    assert_eq!(pass.strength_areas.len(), 1);
    assert_eq!(pass.strength_areas[0].factor, PassFactor::GeneralWorkEthic);

    assert!(profile.cat4.is_none());
    assert!(profile.academic.is_none());
    assert_eq!(profile.fragile_learner, FragileLearnerStatus::Unknown);
}

#[test]
fn two_weak_batteries_mark_a_fragile_learner() {
    let mut record = StudentRecord::new("S002", "Ben Okafor", "7");
    record.cat4_scores = BTreeMap::from([
        (Cat4Domain::Verbal, Cat4Score::Stanine(2.0)),
        (Cat4Domain::Quantitative, Cat4Score::Stanine(2.0)),
        (Cat4Domain::Nonverbal, Cat4Score::Stanine(5.0)),
        (Cat4Domain::Spatial, Cat4Score::Stanine(6.0)),
    ]);

    let profile = profile_of(&record);

    let cat4 = profile.cat4.expect("CAT4 analysis present");
    // Stanine 2 maps to SAS 81, below the weakness cut of 90.
    assert_eq!(cat4.weakness_areas.len(), 2);
    assert_eq!(cat4.fragile_flags, 2);
    assert_eq!(profile.fragile_learner, FragileLearnerStatus::Fragile);
}

#[test]
fn only_weak_subjects_get_tutoring_interventions() {
    let mut record = StudentRecord::new("S003", "Chloe Tan", "8");
    record.academic_stanines = BTreeMap::from([
        ("English".to_string(), 8.0),
        ("Mathematics".to_string(), 3.0),
        ("Science".to_string(), 5.0),
    ]);

    let profile = profile_of(&record);

    let academic = profile.academic.expect("academic analysis present");
    assert_eq!(academic.strength_areas.len(), 1);
    assert_eq!(academic.strength_areas[0].subject, "English");
    assert_eq!(academic.weakness_areas.len(), 1);
    assert_eq!(academic.weakness_areas[0].subject, "Mathematics");

    let tutoring: Vec<_> = profile
        .interventions
        .iter()
        .filter(|record| record.title.ends_with("Targeted Tutoring"))
        .collect();
    assert_eq!(tutoring.len(), 1);
    assert_eq!(tutoring[0].title, "Mathematics Targeted Tutoring");
}

#[test]
fn struggling_student_lands_in_the_high_band() {
    let profile = profile_of(&struggling_record());

    assert_eq!(profile.fragile_learner, FragileLearnerStatus::Fragile);
    assert_eq!(profile.risk_profile, RiskBand::High);
    assert!(!profile.interventions.is_empty());
    assert!(profile.top_weaknesses.len() <= 5);
}

#[test]
fn thriving_student_lands_in_the_low_band_with_no_interventions() {
    let profile = profile_of(&thriving_record());

    assert_eq!(profile.fragile_learner, FragileLearnerStatus::NotFragile);
    assert_eq!(profile.risk_profile, RiskBand::Low);
    assert!(profile.interventions.is_empty());
    assert!(profile.top_weaknesses.is_empty());
}

#[test]
fn cohort_summary_buckets_by_grade() {
    let engine = ProfileEngine::default();
    let mut year7 = struggling_record();
    year7.grade = "7".to_string();

    let profiles = engine.profile_cohort(&[year7, struggling_record(), thriving_record()]);
    let summary = summarize_cohort(&profiles);

    assert_eq!(summary.total_students, 3);
    assert_eq!(summary.grade_levels["7"].students, 1);
    assert_eq!(summary.grade_levels["7"].high_risk, 1);
    assert_eq!(summary.grade_levels["8"].students, 2);
    assert_eq!(summary.grade_levels["8"].fragile_learners, 1);
    assert_eq!(summary.grade_levels["8"].low_risk, 1);
}
