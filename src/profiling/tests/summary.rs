use crate::profiling::domain::{
    AcademicBand, AttitudeProfile, Cat4Domain, CognitiveStyle, FragileLearnerStatus, GapStatus,
    PassFactor, RiskBand,
};
use crate::profiling::summary::summarize;

use super::common::{academic_profile, cat4_profile, pass_profile, thresholds};

#[test]
fn top_lists_are_capped_at_five() {
    let pass = pass_profile(&[
        (PassFactor::SelfRegard, 10.0),
        (PassFactor::GeneralWorkEthic, 15.0),
        (PassFactor::AttitudeToTeachers, 20.0),
        (PassFactor::EmotionalControl, 25.0),
        (PassFactor::PreparednessForLearning, 30.0),
        (PassFactor::AttitudeToAttendance, 35.0),
        (PassFactor::FeelingsAboutSchool, 40.0),
    ]);

    let summary = summarize(Some(&pass), None, None, FragileLearnerStatus::Unknown, &thresholds());

    assert_eq!(summary.top_weaknesses.len(), 5);
    // Weakest first.
    assert_eq!(summary.top_weaknesses[0].name, PassFactor::SelfRegard.label());
    assert_eq!(summary.top_weaknesses[0].score, 10.0);
    assert_eq!(summary.top_weaknesses[4].score, 30.0);
}

#[test]
fn strengths_rank_strongest_first_across_domains() {
    let pass = pass_profile(&[(PassFactor::SelfRegard, 90.0)]);
    let academic = academic_profile(&[("English", 8.0)]);

    let summary = summarize(
        Some(&pass),
        None,
        Some(&academic),
        FragileLearnerStatus::Unknown,
        &thresholds(),
    );

    assert_eq!(summary.top_strengths.len(), 2);
    assert_eq!(summary.top_strengths[0].kind, "Attitudinal Strength");
    assert_eq!(summary.top_strengths[0].score, 90.0);
    assert_eq!(summary.top_strengths[1].kind, "Academic Strength");
}

#[test]
fn pass_risk_points_cap_at_three() {
    // Five at-risk factors alone contribute a capped three points, short of
    // the medium band at four.
    let pass = pass_profile(&[
        (PassFactor::SelfRegard, 10.0),
        (PassFactor::GeneralWorkEthic, 15.0),
        (PassFactor::AttitudeToTeachers, 20.0),
        (PassFactor::EmotionalControl, 25.0),
        (PassFactor::PreparednessForLearning, 30.0),
    ]);

    let summary = summarize(Some(&pass), None, None, FragileLearnerStatus::Unknown, &thresholds());
    assert_eq!(summary.risk_profile, RiskBand::Low);
}

#[test]
fn fragile_flag_tips_pass_risks_into_the_medium_band() {
    // Two PASS risks (2.0) plus the fragile flag (2.0) reaches four points.
    let pass = pass_profile(&[
        (PassFactor::SelfRegard, 10.0),
        (PassFactor::GeneralWorkEthic, 15.0),
    ]);
    let cat4 = cat4_profile(&[
        (Cat4Domain::Verbal, 2.0),
        (Cat4Domain::Quantitative, 5.0),
        (Cat4Domain::Nonverbal, 5.0),
    ]);

    let summary = summarize(
        Some(&pass),
        Some(&cat4),
        None,
        FragileLearnerStatus::Fragile,
        &thresholds(),
    );
    // One CAT4 weakness adds another half point on top.
    assert_eq!(summary.risk_profile, RiskBand::Medium);
}

#[test]
fn verbal_dominance_sets_the_cognitive_style() {
    let verbal = cat4_profile(&[
        (Cat4Domain::Verbal, 7.0),
        (Cat4Domain::Nonverbal, 5.0),
        (Cat4Domain::Spatial, 5.0),
    ]);
    let spatial = cat4_profile(&[
        (Cat4Domain::Verbal, 4.0),
        (Cat4Domain::Nonverbal, 6.0),
        (Cat4Domain::Spatial, 6.0),
    ]);
    let even = cat4_profile(&[
        (Cat4Domain::Verbal, 5.0),
        (Cat4Domain::Nonverbal, 5.5),
        (Cat4Domain::Spatial, 5.0),
    ]);

    let style = |cat4| {
        summarize(None, Some(cat4), None, FragileLearnerStatus::NotFragile, &thresholds())
            .learning_profile
            .cognitive_style
    };
    assert_eq!(style(&verbal), CognitiveStyle::VerbalLearner);
    assert_eq!(style(&spatial), CognitiveStyle::NonverbalLearner);
    assert_eq!(style(&even), CognitiveStyle::EvenProfile);
}

#[test]
fn attitude_quadrants_split_on_the_risk_cut() {
    let quadrant = |self_regard: f64, work_ethic: f64| {
        let pass = pass_profile(&[
            (PassFactor::SelfRegard, self_regard),
            (PassFactor::GeneralWorkEthic, work_ethic),
        ]);
        summarize(Some(&pass), None, None, FragileLearnerStatus::Unknown, &thresholds())
            .learning_profile
            .attitude
    };

    assert_eq!(quadrant(60.0, 60.0), AttitudeProfile::Engaged);
    assert_eq!(quadrant(30.0, 60.0), AttitudeProfile::LowSelfBelief);
    assert_eq!(quadrant(60.0, 30.0), AttitudeProfile::Coasting);
    assert_eq!(quadrant(30.0, 30.0), AttitudeProfile::Disengaged);
}

#[test]
fn able_student_with_weak_grades_reads_as_underachieving() {
    let cat4 = cat4_profile(&[
        (Cat4Domain::Verbal, 8.0),
        (Cat4Domain::Quantitative, 8.0),
    ]);
    let academic = academic_profile(&[("English", 4.0), ("Mathematics", 5.0)]);

    let summary = summarize(
        None,
        Some(&cat4),
        Some(&academic),
        FragileLearnerStatus::NotFragile,
        &thresholds(),
    );

    let gap = summary.learning_profile.gap;
    assert_eq!(gap.status, GapStatus::Underachieving);
    assert_eq!(gap.stanine_gap, Some(-3.5));
    assert_eq!(summary.learning_profile.academic_band, AcademicBand::OnTrack);
}

#[test]
fn missing_domains_read_as_insufficient_data() {
    let summary = summarize(None, None, None, FragileLearnerStatus::Unknown, &thresholds());

    assert_eq!(
        summary.learning_profile.cognitive_style,
        CognitiveStyle::InsufficientData
    );
    assert_eq!(
        summary.learning_profile.attitude,
        AttitudeProfile::InsufficientData
    );
    assert_eq!(
        summary.learning_profile.academic_band,
        AcademicBand::InsufficientData
    );
    assert_eq!(summary.learning_profile.gap.status, GapStatus::InsufficientData);
    assert_eq!(summary.risk_profile, RiskBand::Low);
    assert!(summary.top_strengths.is_empty());
}
