pub mod classify;
pub mod domain;
pub mod fragile;
pub mod interventions;
pub mod progress;
pub mod risk;
pub mod scale;
pub mod summary;
mod thresholds;

#[cfg(test)]
mod tests;

pub use thresholds::ThresholdConfig;

use tracing::debug;

use domain::{
    CohortSummary, FragileLearnerStatus, GradeLevelSummary, RiskBand, StudentRecord,
    TriangulatedProfile,
};

/// Stateless engine that triangulates a student record into a full profile.
///
/// Every call recomputes from the raw record; nothing is cached between
/// students, so a cohort can be profiled concurrently.
pub struct ProfileEngine {
    thresholds: ThresholdConfig,
}

impl Default for ProfileEngine {
    fn default() -> Self {
        Self::new(ThresholdConfig::default())
    }
}

impl ProfileEngine {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    pub fn profile(&self, record: &StudentRecord) -> TriangulatedProfile {
        let pass = classify::analyze_pass(&record.pass_percentiles, &self.thresholds);
        let cat4 = classify::analyze_cat4(&record.cat4_scores, &self.thresholds);
        let academic = classify::analyze_academic(&record.academic_stanines, &self.thresholds);

        let fragile_learner = fragile::fragile_learner_status(cat4.as_ref(), &self.thresholds);

        let summary = summary::summarize(
            pass.as_ref(),
            cat4.as_ref(),
            academic.as_ref(),
            fragile_learner,
            &self.thresholds,
        );
        let interventions =
            interventions::map_interventions(pass.as_ref(), cat4.as_ref(), academic.as_ref(), fragile_learner);

        debug!(
            student_id = %record.student_id,
            risk = ?summary.risk_profile,
            fragile = ?fragile_learner,
            interventions = interventions.len(),
            "triangulated student profile"
        );

        TriangulatedProfile {
            student_id: record.student_id.clone(),
            name: record.name.clone(),
            grade: record.grade.clone(),
            section: record.section.clone(),
            pass,
            cat4,
            academic,
            fragile_learner,
            top_strengths: summary.top_strengths,
            top_weaknesses: summary.top_weaknesses,
            learning_profile: summary.learning_profile,
            risk_profile: summary.risk_profile,
            interventions,
        }
    }

    pub fn profile_cohort(&self, records: &[StudentRecord]) -> Vec<TriangulatedProfile> {
        records.iter().map(|record| self.profile(record)).collect()
    }
}

/// Per-grade roll-up across already-computed profiles.
pub fn summarize_cohort(profiles: &[TriangulatedProfile]) -> CohortSummary {
    let mut summary = CohortSummary {
        total_students: profiles.len(),
        ..CohortSummary::default()
    };

    for profile in profiles {
        let grade = summary
            .grade_levels
            .entry(profile.grade.clone())
            .or_insert_with(GradeLevelSummary::default);
        grade.students += 1;
        match profile.risk_profile {
            RiskBand::High => grade.high_risk += 1,
            RiskBand::Medium => grade.medium_risk += 1,
            RiskBand::Low => grade.low_risk += 1,
        }
        if profile.fragile_learner == FragileLearnerStatus::Fragile {
            grade.fragile_learners += 1;
        }
    }

    summary
}
