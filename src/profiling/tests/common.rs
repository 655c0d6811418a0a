use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::profiling::classify::{analyze_academic, analyze_cat4, analyze_pass};
use crate::profiling::domain::{
    AcademicProfile, Cat4Domain, Cat4Profile, Cat4Score, PassFactor, PassProfile, StudentRecord,
    TriangulatedProfile,
};
use crate::profiling::progress::ProfileSnapshot;
use crate::profiling::{ProfileEngine, ThresholdConfig};

pub(super) fn thresholds() -> ThresholdConfig {
    ThresholdConfig::instruction_set()
}

pub(super) fn pass_profile(entries: &[(PassFactor, f64)]) -> PassProfile {
    let percentiles: BTreeMap<_, _> = entries.iter().copied().collect();
    analyze_pass(&percentiles, &thresholds()).expect("at least one PASS factor")
}

pub(super) fn cat4_profile(stanines: &[(Cat4Domain, f64)]) -> Cat4Profile {
    let scores: BTreeMap<_, _> = stanines
        .iter()
        .map(|&(domain, stanine)| (domain, Cat4Score::Stanine(stanine)))
        .collect();
    analyze_cat4(&scores, &thresholds()).expect("at least one CAT4 battery")
}

pub(super) fn academic_profile(entries: &[(&str, f64)]) -> AcademicProfile {
    let stanines: BTreeMap<String, f64> = entries
        .iter()
        .map(|&(subject, stanine)| (subject.to_string(), stanine))
        .collect();
    analyze_academic(&stanines, &thresholds()).expect("at least one subject")
}

/// Weak everywhere: five PASS risk areas, two weak CAT4 batteries (fragile),
/// and three weak subjects.
pub(super) fn struggling_record() -> StudentRecord {
    let mut record = StudentRecord::new("S100", "Dana Mansour", "8");
    record.section = Some("B".to_string());
    record.pass_percentiles = BTreeMap::from([
        (PassFactor::SelfRegard, 30.0),
        (PassFactor::GeneralWorkEthic, 35.0),
        (PassFactor::AttitudeToTeachers, 40.0),
        (PassFactor::EmotionalControl, 25.0),
        (PassFactor::PreparednessForLearning, 38.0),
    ]);
    record.cat4_scores = BTreeMap::from([
        (Cat4Domain::Verbal, Cat4Score::Stanine(2.0)),
        (Cat4Domain::Quantitative, Cat4Score::Stanine(3.0)),
        (Cat4Domain::Nonverbal, Cat4Score::Stanine(5.0)),
        (Cat4Domain::Spatial, Cat4Score::Stanine(5.0)),
    ]);
    record.academic_stanines = BTreeMap::from([
        ("English".to_string(), 2.0),
        ("Mathematics".to_string(), 3.0),
        ("Science".to_string(), 3.0),
    ]);
    record
}

/// Strong everywhere: no risk areas in any domain.
pub(super) fn thriving_record() -> StudentRecord {
    let mut record = StudentRecord::new("S200", "Elias Haddad", "8");
    record.pass_percentiles = BTreeMap::from([
        (PassFactor::SelfRegard, 80.0),
        (PassFactor::GeneralWorkEthic, 75.0),
        (PassFactor::ConfidenceInLearning, 70.0),
    ]);
    record.cat4_scores = BTreeMap::from([
        (Cat4Domain::Verbal, Cat4Score::Stanine(7.0)),
        (Cat4Domain::Quantitative, Cat4Score::Stanine(8.0)),
        (Cat4Domain::Nonverbal, Cat4Score::Stanine(7.0)),
        (Cat4Domain::Spatial, Cat4Score::Stanine(6.0)),
    ]);
    record.academic_stanines = BTreeMap::from([
        ("English".to_string(), 8.0),
        ("Mathematics".to_string(), 7.0),
    ]);
    record
}

pub(super) fn profile_of(record: &StudentRecord) -> TriangulatedProfile {
    ProfileEngine::default().profile(record)
}

pub(super) fn snapshot(year: i32, month: u32, day: u32, record: &StudentRecord) -> ProfileSnapshot {
    ProfileSnapshot {
        date: NaiveDate::from_ymd_opt(year, month, day).expect("valid date"),
        profile: profile_of(record),
    }
}
