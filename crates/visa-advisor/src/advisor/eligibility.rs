use super::domain::{InputProfile, JobCategory, SkillLevel, VisaKey};
use super::tables::CatalogEntry;
use serde::Serialize;

/// Why a candidate was removed before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionReason {
    JobCategory { job_category: JobCategory },
    SkillLevel { skill_level: SkillLevel },
    UniversityLevelMismatch,
}

impl ExclusionReason {
    pub fn summary(&self) -> String {
        match self {
            ExclusionReason::JobCategory { job_category } => {
                format!("not available for {}", job_category.label())
            }
            ExclusionReason::SkillLevel { skill_level } => {
                format!("requires a different skill level than '{}'", skill_level.label())
            }
            ExclusionReason::UniversityLevelMismatch => {
                "not suited to university-level roles".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exclusion {
    pub candidate: VisaKey,
    pub reason: ExclusionReason,
}

/// First hard exclusion that applies to `entry`, if any.
pub fn exclusion_for(entry: &CatalogEntry, profile: &InputProfile) -> Option<ExclusionReason> {
    let rules = &entry.exclusions;

    if let Some(job_category) = profile.job_category {
        if rules.job_categories.contains(&job_category) {
            return Some(ExclusionReason::JobCategory { job_category });
        }
    }

    if let Some(skill_level) = profile.skill_level {
        if rules.skill_levels.contains(&skill_level) {
            return Some(ExclusionReason::SkillLevel { skill_level });
        }
        if skill_level == SkillLevel::University && rules.incompatible_with_university {
            return Some(ExclusionReason::UniversityLevelMismatch);
        }
    }

    None
}

/// Candidates that survive every hard exclusion, in catalog order.
pub fn filter<'a>(candidates: &'a [CatalogEntry], profile: &InputProfile) -> Vec<&'a CatalogEntry> {
    candidates
        .iter()
        .filter(|entry| exclusion_for(entry, profile).is_none())
        .collect()
}

/// Survivors plus the excluded candidates with their reasons.
#[derive(Debug, Clone)]
pub struct Screening<'a> {
    pub eligible: Vec<&'a CatalogEntry>,
    pub excluded: Vec<Exclusion>,
}

pub fn screen<'a>(candidates: &'a [CatalogEntry], profile: &InputProfile) -> Screening<'a> {
    let mut eligible = Vec::new();
    let mut excluded = Vec::new();

    for entry in candidates {
        match exclusion_for(entry, profile) {
            Some(reason) => excluded.push(Exclusion {
                candidate: entry.key.clone(),
                reason,
            }),
            None => eligible.push(entry),
        }
    }

    Screening { eligible, excluded }
}
