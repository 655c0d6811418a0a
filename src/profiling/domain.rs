use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single ingested student row: identity plus whatever raw assessment
/// metrics arrived for them. Metrics that were absent in the source data are
/// simply missing from the maps, never defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub name: String,
    pub grade: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default)]
    pub pass_percentiles: BTreeMap<PassFactor, f64>,
    #[serde(default)]
    pub cat4_scores: BTreeMap<Cat4Domain, Cat4Score>,
    #[serde(default)]
    pub academic_stanines: BTreeMap<String, f64>,
}

impl StudentRecord {
    pub fn new(student_id: impl Into<String>, name: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            name: name.into(),
            grade: grade.into(),
            section: None,
            pass_percentiles: BTreeMap::new(),
            cat4_scores: BTreeMap::new(),
            academic_stanines: BTreeMap::new(),
        }
    }
}

/// PASS attitudinal factors. The first nine carry the survey's P-codes; the
/// last two appear in older exports without a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassFactor {
    PerceivedLearningCapability,
    ConfidenceInLearning,
    SelfRegard,
    AttitudeToTeachers,
    ResponseToCurriculum,
    GeneralWorkEthic,
    PreparednessForLearning,
    AttitudeToAttendance,
    FeelingsAboutSchool,
    EmotionalControl,
    SocialConfidence,
}

impl PassFactor {
    pub const ALL: [PassFactor; 11] = [
        PassFactor::PerceivedLearningCapability,
        PassFactor::ConfidenceInLearning,
        PassFactor::SelfRegard,
        PassFactor::AttitudeToTeachers,
        PassFactor::ResponseToCurriculum,
        PassFactor::GeneralWorkEthic,
        PassFactor::PreparednessForLearning,
        PassFactor::AttitudeToAttendance,
        PassFactor::FeelingsAboutSchool,
        PassFactor::EmotionalControl,
        PassFactor::SocialConfidence,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PassFactor::PerceivedLearningCapability => "Perceived Learning Capability",
            PassFactor::ConfidenceInLearning => "Confidence in Learning",
            PassFactor::SelfRegard => "Self-Regard",
            PassFactor::AttitudeToTeachers => "Attitude to Teachers",
            PassFactor::ResponseToCurriculum => "Response to Curriculum",
            PassFactor::GeneralWorkEthic => "General Work Ethic",
            PassFactor::PreparednessForLearning => "Preparedness for Learning",
            PassFactor::AttitudeToAttendance => "Attitude to Attendance",
            PassFactor::FeelingsAboutSchool => "Feelings about School",
            PassFactor::EmotionalControl => "Emotional Control",
            PassFactor::SocialConfidence => "Social Confidence",
        }
    }

    /// Survey P-code, where the factor has one.
    pub fn p_code(&self) -> Option<&'static str> {
        match self {
            PassFactor::PerceivedLearningCapability => Some("P1"),
            PassFactor::ConfidenceInLearning => Some("P2"),
            PassFactor::SelfRegard => Some("P3"),
            PassFactor::AttitudeToTeachers => Some("P4"),
            PassFactor::ResponseToCurriculum => Some("P5"),
            PassFactor::GeneralWorkEthic => Some("P6"),
            PassFactor::PreparednessForLearning => Some("P7"),
            PassFactor::AttitudeToAttendance => Some("P8"),
            PassFactor::FeelingsAboutSchool => Some("P9"),
            PassFactor::EmotionalControl | PassFactor::SocialConfidence => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PassFactor::PerceivedLearningCapability => {
                "How capable the student believes they are of learning new material."
            }
            PassFactor::ConfidenceInLearning => {
                "The student's confidence when facing unfamiliar learning tasks."
            }
            PassFactor::SelfRegard => {
                "How positive the student feels about themselves as a learner and their ability to achieve."
            }
            PassFactor::AttitudeToTeachers => {
                "How the student perceives their relationships with teaching staff."
            }
            PassFactor::ResponseToCurriculum => {
                "Whether the student feels they can cope with the learning demands placed on them."
            }
            PassFactor::GeneralWorkEthic => {
                "The student's approach to schoolwork and sense of responsibility for their learning."
            }
            PassFactor::PreparednessForLearning => {
                "How organized and ready to learn the student reports being."
            }
            PassFactor::AttitudeToAttendance => {
                "The student's disposition toward attending school regularly."
            }
            PassFactor::FeelingsAboutSchool => {
                "How connected and secure the student feels within the school community."
            }
            PassFactor::EmotionalControl => {
                "The student's ability to manage their emotional response to setbacks and challenges."
            }
            PassFactor::SocialConfidence => {
                "How comfortable the student feels in social interactions with peers."
            }
        }
    }

    /// Resolves a header or display name to a factor, tolerating the naming
    /// drift between export revisions ("Self Regard", "self_regard", "P3").
    pub fn parse(raw: &str) -> Option<Self> {
        let key: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        let factor = match key.as_str() {
            "perceivedlearningcapability" | "perceivedlearning" | "p1" => {
                PassFactor::PerceivedLearningCapability
            }
            "confidenceinlearning" | "learningconfidence" | "p2" => {
                PassFactor::ConfidenceInLearning
            }
            "selfregard" | "selfregardasalearner" | "p3" => PassFactor::SelfRegard,
            "attitudetoteachers" | "attitudesteachers" | "attitudeteachers" | "p4" => {
                PassFactor::AttitudeToTeachers
            }
            "responsetocurriculum" | "curriculumdemand" | "p5" => PassFactor::ResponseToCurriculum,
            "generalworkethic" | "workethic" | "p6" => PassFactor::GeneralWorkEthic,
            "preparednessforlearning" | "preparedness" | "p7" => {
                PassFactor::PreparednessForLearning
            }
            "attitudetoattendance" | "attitudesattendance" | "attendance" | "p8" => {
                PassFactor::AttitudeToAttendance
            }
            "feelingsaboutschool" | "p9" => PassFactor::FeelingsAboutSchool,
            "emotionalcontrol" => PassFactor::EmotionalControl,
            "socialconfidence" => PassFactor::SocialConfidence,
            _ => return None,
        };
        Some(factor)
    }
}

impl fmt::Display for PassFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// CAT4 cognitive reasoning batteries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cat4Domain {
    Verbal,
    Quantitative,
    Nonverbal,
    Spatial,
}

impl Cat4Domain {
    pub const ALL: [Cat4Domain; 4] = [
        Cat4Domain::Verbal,
        Cat4Domain::Quantitative,
        Cat4Domain::Nonverbal,
        Cat4Domain::Spatial,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Cat4Domain::Verbal => "Verbal Reasoning",
            Cat4Domain::Quantitative => "Quantitative Reasoning",
            Cat4Domain::Nonverbal => "Nonverbal Reasoning",
            Cat4Domain::Spatial => "Spatial Reasoning",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Cat4Domain::Verbal => {
                "The ability to understand and analyze words, verbal concepts, and information in text."
            }
            Cat4Domain::Quantitative => {
                "The ability to understand and solve problems using numbers and mathematical concepts."
            }
            Cat4Domain::Nonverbal => {
                "The ability to analyze visual information and solve problems using patterns and visual logic."
            }
            Cat4Domain::Spatial => {
                "The ability to manipulate shapes and understand spatial relationships in two and three dimensions."
            }
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_lowercase();
        let domain = match key.as_str() {
            "verbal" | "verbal_reasoning" | "verbal reasoning" => Cat4Domain::Verbal,
            "quantitative" | "quant" | "quantitative_reasoning" | "quantitative reasoning" => {
                Cat4Domain::Quantitative
            }
            "nonverbal" | "non-verbal" | "non_verbal" | "nonverbal_reasoning"
            | "nonverbal reasoning" => {
                Cat4Domain::Nonverbal
            }
            "spatial" | "spatial_reasoning" | "spatial reasoning" => Cat4Domain::Spatial,
            _ => return None,
        };
        Some(domain)
    }
}

impl fmt::Display for Cat4Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// CAT4 results arrive on either scale depending on the export; the
/// classifier normalizes everything to SAS before thresholding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cat4Score {
    Stanine(f64),
    Sas(f64),
}

/// Classification tier for a single metric. PASS uses the `at-risk`
/// spelling, CAT4 and academic use `weakness`; downstream UI branches on the
/// exact strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "at-risk")]
    AtRisk,
    #[serde(rename = "weakness")]
    Weakness,
    #[serde(rename = "balanced")]
    Balanced,
    #[serde(rename = "strength")]
    Strength,
}

impl Level {
    pub fn is_concern(&self) -> bool {
        matches!(self, Level::AtRisk | Level::Weakness)
    }

    pub fn is_strength(&self) -> bool {
        matches!(self, Level::Strength)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::AtRisk => "at-risk",
            Level::Weakness => "weakness",
            Level::Balanced => "balanced",
            Level::Strength => "strength",
        }
    }
}

/// A PASS factor after thresholding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassFactorAnalysis {
    pub factor: PassFactor,
    pub percentile: f64,
    pub level: Level,
}

/// A CAT4 battery after normalization and thresholding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cat4DomainAnalysis {
    pub domain: Cat4Domain,
    pub stanine: f64,
    pub sas: f64,
    pub level: Level,
}

/// An academic subject after thresholding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectAnalysis {
    pub subject: String,
    pub stanine: f64,
    pub level: Level,
}

/// Roll-up of the PASS factor mix, recovered from the triangulated engine's
/// overall-status rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PassOverallStatus {
    HighRisk,
    SomeRisk,
    Balanced,
    Strong,
}

/// PASS analysis for one student. Absent entirely when the record carried no
/// PASS metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassProfile {
    pub factors: Vec<PassFactorAnalysis>,
    pub risk_areas: Vec<PassFactorAnalysis>,
    pub strength_areas: Vec<PassFactorAnalysis>,
    pub overall_status: PassOverallStatus,
}

impl PassProfile {
    pub fn percentile_of(&self, factor: PassFactor) -> Option<f64> {
        self.factors
            .iter()
            .find(|entry| entry.factor == factor)
            .map(|entry| entry.percentile)
    }
}

/// CAT4 analysis for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cat4Profile {
    pub domains: Vec<Cat4DomainAnalysis>,
    pub weakness_areas: Vec<Cat4DomainAnalysis>,
    pub strength_areas: Vec<Cat4DomainAnalysis>,
    /// Count of weakness-level batteries; >= 2 marks a fragile learner.
    pub fragile_flags: usize,
}

impl Cat4Profile {
    pub fn mean_stanine(&self) -> Option<f64> {
        if self.domains.is_empty() {
            return None;
        }
        let total: f64 = self.domains.iter().map(|d| d.stanine).sum();
        Some(total / self.domains.len() as f64)
    }

    pub fn stanine_of(&self, domain: Cat4Domain) -> Option<f64> {
        self.domains
            .iter()
            .find(|entry| entry.domain == domain)
            .map(|entry| entry.stanine)
    }
}

/// Academic analysis for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicProfile {
    pub subjects: Vec<SubjectAnalysis>,
    pub weakness_areas: Vec<SubjectAnalysis>,
    pub strength_areas: Vec<SubjectAnalysis>,
    pub average_stanine: f64,
}

/// Fragile-learner determination. `Unknown` is distinct from `NotFragile` so
/// callers can tell "CAT4 said no" apart from "no CAT4 data".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FragileLearnerStatus {
    Fragile,
    NotFragile,
    Unknown,
}

impl FragileLearnerStatus {
    pub fn is_fragile(&self) -> bool {
        matches!(self, FragileLearnerStatus::Fragile)
    }
}

/// Which assessment a ranked factor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssessmentDomain {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "CAT4")]
    Cat4,
    #[serde(rename = "Academic")]
    Academic,
}

impl AssessmentDomain {
    pub fn label(&self) -> &'static str {
        match self {
            AssessmentDomain::Pass => "PASS",
            AssessmentDomain::Cat4 => "CAT4",
            AssessmentDomain::Academic => "Academic",
        }
    }
}

/// Entry in the top-strengths / top-weaknesses ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFactor {
    pub domain: AssessmentDomain,
    pub name: String,
    pub score: f64,
    pub kind: String,
}

/// Composite risk band from the point-based triangulation model. Independent
/// of the weighted score in the risk predictor; the two can disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

/// Intervention grouping used when rendering recommendation sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterventionDomain {
    Emotional,
    Behavioral,
    Cognitive,
    Academic,
    Holistic,
}

impl InterventionDomain {
    pub fn label(&self) -> &'static str {
        match self {
            InterventionDomain::Emotional => "Emotional",
            InterventionDomain::Behavioral => "Behavioral",
            InterventionDomain::Cognitive => "Cognitive",
            InterventionDomain::Academic => "Academic",
            InterventionDomain::Holistic => "Holistic",
        }
    }
}

/// Recommendation priority. `Critical` only occurs on the risk-prediction
/// path; triangulated interventions use high/medium/low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// One recommended support action tied to a classified risk factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionRecord {
    pub domain: InterventionDomain,
    pub trigger: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

/// Cognitive-style label derived from the verbal/non-verbal stanine balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CognitiveStyle {
    VerbalLearner,
    NonverbalLearner,
    EvenProfile,
    InsufficientData,
}

/// Attitude quadrant from Self-Regard x General Work Ethic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttitudeProfile {
    Engaged,
    LowSelfBelief,
    Coasting,
    Disengaged,
    InsufficientData,
}

/// Banding of mean academic stanine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AcademicBand {
    Strong,
    OnTrack,
    Struggling,
    InsufficientData,
}

/// Achievement relative to measured cognitive ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GapStatus {
    Underachieving,
    Overachieving,
    AsExpected,
    InsufficientData,
}

/// Academic-vs-cognitive gap, in stanine points where both means exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub status: GapStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stanine_gap: Option<f64>,
}

/// Narrative labels combined from all three assessments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningProfile {
    pub cognitive_style: CognitiveStyle,
    pub attitude: AttitudeProfile,
    pub academic_band: AcademicBand,
    pub gap: GapAnalysis,
}

/// Full triangulated view of one student, computed fresh on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangulatedProfile {
    pub student_id: String,
    pub name: String,
    pub grade: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub pass: Option<PassProfile>,
    pub cat4: Option<Cat4Profile>,
    pub academic: Option<AcademicProfile>,
    pub fragile_learner: FragileLearnerStatus,
    pub top_strengths: Vec<RankedFactor>,
    pub top_weaknesses: Vec<RankedFactor>,
    pub learning_profile: LearningProfile,
    pub risk_profile: RiskBand,
    pub interventions: Vec<InterventionRecord>,
}

/// Per-grade roll-up across a cohort of profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeLevelSummary {
    pub students: usize,
    pub high_risk: usize,
    pub medium_risk: usize,
    pub low_risk: usize,
    pub fragile_learners: usize,
}

/// Cohort-wide statistics computed as an independent map over students.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CohortSummary {
    pub total_students: usize,
    pub grade_levels: BTreeMap<String, GradeLevelSummary>,
}
