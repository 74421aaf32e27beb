use super::super::domain::{
    CandidateLocation, DurationBand, EmploymentType, InputProfile, JobCategory, LeadTimeTolerance,
    Nationality, ProfileAttribute, SkillLevel,
};
use serde::{Deserialize, Serialize};

/// How an unanswered attribute is treated when a clause references it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Unset attributes satisfy the clause, so partial profiles still rank.
    Vacuous,
    /// Unset attributes fail the clause.
    Strict,
}

/// Membership test of one profile attribute against a fixed value set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "attribute", content = "any_of", rename_all = "snake_case")]
pub enum Clause {
    JobCategory(Vec<JobCategory>),
    EmploymentType(Vec<EmploymentType>),
    DurationBand(Vec<DurationBand>),
    SkillLevel(Vec<SkillLevel>),
    LeadTimeTolerance(Vec<LeadTimeTolerance>),
    CandidateLocation(Vec<CandidateLocation>),
    Nationality(Vec<Nationality>),
}

fn member<T: PartialEq>(value: Option<T>, set: &[T], mode: MatchMode) -> bool {
    match value {
        Some(value) => set.contains(&value),
        None => mode == MatchMode::Vacuous,
    }
}

impl Clause {
    pub fn attribute(&self) -> ProfileAttribute {
        match self {
            Clause::JobCategory(_) => ProfileAttribute::JobCategory,
            Clause::EmploymentType(_) => ProfileAttribute::EmploymentType,
            Clause::DurationBand(_) => ProfileAttribute::DurationBand,
            Clause::SkillLevel(_) => ProfileAttribute::SkillLevel,
            Clause::LeadTimeTolerance(_) => ProfileAttribute::LeadTimeTolerance,
            Clause::CandidateLocation(_) => ProfileAttribute::CandidateLocation,
            Clause::Nationality(_) => ProfileAttribute::Nationality,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Clause::JobCategory(set) => set.is_empty(),
            Clause::EmploymentType(set) => set.is_empty(),
            Clause::DurationBand(set) => set.is_empty(),
            Clause::SkillLevel(set) => set.is_empty(),
            Clause::LeadTimeTolerance(set) => set.is_empty(),
            Clause::CandidateLocation(set) => set.is_empty(),
            Clause::Nationality(set) => set.is_empty(),
        }
    }

    pub fn matches(&self, profile: &InputProfile, mode: MatchMode) -> bool {
        match self {
            Clause::JobCategory(set) => member(profile.job_category, set, mode),
            Clause::EmploymentType(set) => member(profile.employment_type, set, mode),
            Clause::DurationBand(set) => member(profile.duration_band, set, mode),
            Clause::SkillLevel(set) => member(profile.skill_level, set, mode),
            Clause::LeadTimeTolerance(set) => member(profile.lead_time_tolerance, set, mode),
            Clause::CandidateLocation(set) => member(profile.candidate_location, set, mode),
            Clause::Nationality(set) => member(profile.nationality, set, mode),
        }
    }
}

/// Conjunction of clauses. An empty condition always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Condition(pub Vec<Clause>);

impl Condition {
    pub fn clauses(&self) -> &[Clause] {
        &self.0
    }

    /// Number of constraints; used to rank narrative templates by specificity.
    pub fn specificity(&self) -> usize {
        self.0.len()
    }

    pub fn matches(&self, profile: &InputProfile, mode: MatchMode) -> bool {
        self.0.iter().all(|clause| clause.matches(profile, mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::domain::ProfileAnswer;

    fn long_duration() -> Condition {
        Condition(vec![Clause::DurationBand(vec![
            DurationBand::Y3To5,
            DurationBand::Y5Plus,
        ])])
    }

    #[test]
    fn unset_attribute_is_vacuously_satisfied() {
        let profile = InputProfile::default();
        assert!(long_duration().matches(&profile, MatchMode::Vacuous));
        assert!(!long_duration().matches(&profile, MatchMode::Strict));
    }

    #[test]
    fn set_attribute_must_be_member() {
        let profile =
            InputProfile::default().with(ProfileAnswer::DurationBand(DurationBand::Under1y));
        assert!(!long_duration().matches(&profile, MatchMode::Vacuous));

        let profile = InputProfile::default().with(ProfileAnswer::DurationBand(DurationBand::Y5Plus));
        assert!(long_duration().matches(&profile, MatchMode::Strict));
    }

    #[test]
    fn conjunction_requires_every_clause() {
        let condition = Condition(vec![
            Clause::JobCategory(vec![JobCategory::Care]),
            Clause::SkillLevel(vec![SkillLevel::Experienced]),
        ]);
        let profile = InputProfile::default()
            .with(ProfileAnswer::JobCategory(JobCategory::Care))
            .with(ProfileAnswer::SkillLevel(SkillLevel::None));

        assert!(!condition.matches(&profile, MatchMode::Vacuous));
        assert_eq!(condition.specificity(), 2);
    }

    #[test]
    fn clause_parses_from_tagged_json() {
        let clause: Clause = serde_json::from_str(
            r#"{"attribute":"employment_type","any_of":["part_time","full_time_contract"]}"#,
        )
        .expect("clause parses");
        assert_eq!(clause.attribute(), ProfileAttribute::EmploymentType);
        assert!(!clause.is_empty());
    }
}
