//! Intervention strategy mapping.
//!
//! Templates are data: static tables keyed by PASS factor or CAT4 battery,
//! looked up for every classified risk factor, never computed. A factor with
//! no named template falls back to its P-code group template so the coded
//! rubric still produces a recommendation. Records are stably sorted by
//! priority; nothing is deduplicated here.

use super::domain::{
    AcademicProfile, Cat4Domain, Cat4Profile, FragileLearnerStatus, InterventionDomain,
    InterventionRecord, PassFactor, PassProfile, Priority,
};

struct InterventionTemplate {
    domain: InterventionDomain,
    title: &'static str,
    description: &'static str,
    priority: Priority,
}

fn pass_templates(factor: PassFactor) -> &'static [InterventionTemplate] {
    match factor {
        PassFactor::SelfRegard => &[
            InterventionTemplate {
                domain: InterventionDomain::Emotional,
                title: "Self-Esteem Building",
                description: "Weekly sessions with a counselor focusing on identifying and celebrating strengths, with positive affirmation activities and reflective journaling.",
                priority: Priority::High,
            },
            InterventionTemplate {
                domain: InterventionDomain::Emotional,
                title: "Success Portfolio",
                description: "A portfolio where the student documents and reflects on achievements, however small, to build an evidence base for self-belief.",
                priority: Priority::Medium,
            },
        ],
        PassFactor::AttitudeToTeachers => &[InterventionTemplate {
            domain: InterventionDomain::Emotional,
            title: "Teacher-Student Mediation",
            description: "Facilitated discussion between the student and teachers to address concerns and establish mutual respect and understanding.",
            priority: Priority::High,
        }],
        PassFactor::GeneralWorkEthic => &[InterventionTemplate {
            domain: InterventionDomain::Behavioral,
            title: "Academic Coaching",
            description: "Weekly sessions to develop organizational skills, time management, and task prioritization strategies.",
            priority: Priority::High,
        }],
        PassFactor::EmotionalControl => &[InterventionTemplate {
            domain: InterventionDomain::Emotional,
            title: "Emotional Regulation Support",
            description: "Counselor-led sessions focused on identifying emotional triggers and developing healthy coping mechanisms.",
            priority: Priority::High,
        }],
        PassFactor::SocialConfidence => &[InterventionTemplate {
            domain: InterventionDomain::Emotional,
            title: "Peer Relationship Coaching",
            description: "Structured small-group activities building social skills and low-stakes peer interaction practice.",
            priority: Priority::Medium,
        }],
        _ => &[],
    }
}

/// Group templates for P-coded factors with no named entry of their own.
fn p_code_group_template(factor: PassFactor) -> Option<InterventionTemplate> {
    let template = match factor.p_code()? {
        "P3" | "P7" => InterventionTemplate {
            domain: InterventionDomain::Emotional,
            title: "Confidence Building Program",
            description: "Confidence-building activities and positive reinforcement strategies targeting self-belief as a learner.",
            priority: Priority::High,
        },
        "P4" | "P6" => InterventionTemplate {
            domain: InterventionDomain::Behavioral,
            title: "Organization Skills Support",
            description: "Structured support for time management, organization, and consistent work habits.",
            priority: Priority::High,
        },
        "P5" | "P8" => InterventionTemplate {
            domain: InterventionDomain::Behavioral,
            title: "Engagement Mentoring",
            description: "Engagement strategies and attendance monitoring with a named mentor.",
            priority: Priority::High,
        },
        "P1" | "P2" | "P9" => InterventionTemplate {
            domain: InterventionDomain::Emotional,
            title: "Learning Mindset Mentoring",
            description: "Mentoring sessions reframing the student's view of their own capability and their place in school.",
            priority: Priority::Medium,
        },
        _ => return None,
    };
    Some(template)
}

fn cat4_templates(domain: Cat4Domain) -> &'static [InterventionTemplate] {
    match domain {
        Cat4Domain::Verbal => &[InterventionTemplate {
            domain: InterventionDomain::Cognitive,
            title: "Verbal Skills Development",
            description: "Explicit instruction in vocabulary development, reading comprehension strategies, and verbal expression.",
            priority: Priority::High,
        }],
        Cat4Domain::Quantitative => &[InterventionTemplate {
            domain: InterventionDomain::Cognitive,
            title: "Numeracy Intervention",
            description: "Targeted support for numerical operations, mathematical vocabulary, and quantitative problem-solving.",
            priority: Priority::High,
        }],
        Cat4Domain::Nonverbal => &[InterventionTemplate {
            domain: InterventionDomain::Cognitive,
            title: "Abstract Reasoning Support",
            description: "Visual supports, concrete examples, and explicit connections when working with patterns and abstract concepts.",
            priority: Priority::Medium,
        }],
        Cat4Domain::Spatial => &[InterventionTemplate {
            domain: InterventionDomain::Cognitive,
            title: "Spatial Skills Support",
            description: "Additional support with diagrams, physical models, and step-by-step visual instructions for spatial tasks.",
            priority: Priority::Medium,
        }],
    }
}

const FRAGILE_LEARNER_TEMPLATE: InterventionTemplate = InterventionTemplate {
    domain: InterventionDomain::Holistic,
    title: "Comprehensive Learning Support",
    description: "Multi-faceted approach combining cognitive scaffolding, additional processing time, and alternative assessment options.",
    priority: Priority::High,
};

fn record_from(template: &InterventionTemplate, trigger: String) -> InterventionRecord {
    InterventionRecord {
        domain: template.domain,
        trigger,
        title: template.title.to_string(),
        description: template.description.to_string(),
        priority: template.priority,
    }
}

/// Maps every classified risk factor (plus the fragile flag) to its
/// intervention records, ordered by priority with insertion order preserved
/// among equals.
pub fn map_interventions(
    pass: Option<&PassProfile>,
    cat4: Option<&Cat4Profile>,
    academic: Option<&AcademicProfile>,
    fragile: FragileLearnerStatus,
) -> Vec<InterventionRecord> {
    let mut records = Vec::new();

    if let Some(profile) = pass {
        for risk in &profile.risk_areas {
            let named = pass_templates(risk.factor);
            if named.is_empty() {
                if let Some(template) = p_code_group_template(risk.factor) {
                    records.push(record_from(&template, risk.factor.label().to_string()));
                }
            } else {
                for template in named {
                    records.push(record_from(template, risk.factor.label().to_string()));
                }
            }
        }
    }

    if let Some(profile) = cat4 {
        for weakness in &profile.weakness_areas {
            for template in cat4_templates(weakness.domain) {
                records.push(record_from(template, weakness.domain.label().to_string()));
            }
        }
    }

    if let Some(profile) = academic {
        for weakness in &profile.weakness_areas {
            records.push(InterventionRecord {
                domain: InterventionDomain::Academic,
                trigger: format!("{} Performance", weakness.subject),
                title: format!("{} Targeted Tutoring", weakness.subject),
                description: format!(
                    "Subject-specific tutoring for {} focusing on foundational skills and knowledge gaps identified through assessment.",
                    weakness.subject
                ),
                priority: Priority::High,
            });
        }
    }

    if fragile.is_fragile() {
        records.push(record_from(
            &FRAGILE_LEARNER_TEMPLATE,
            "Fragile Learner".to_string(),
        ));
    }

    records.sort_by_key(|record| record.priority.rank());
    records
}
