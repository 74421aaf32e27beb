use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog key identifying a visa candidate (e.g. `trainee`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisaKey(pub String);

impl VisaKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VisaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VisaKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobCategory {
    Manufacturing,
    Construction,
    Agriculture,
    Care,
    FoodService,
    Office,
    It,
    Logistics,
    RetailService,
    Other,
}

impl JobCategory {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Manufacturing,
            Self::Construction,
            Self::Agriculture,
            Self::Care,
            Self::FoodService,
            Self::Office,
            Self::It,
            Self::Logistics,
            Self::RetailService,
            Self::Other,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Manufacturing => "Manufacturing",
            Self::Construction => "Construction",
            Self::Agriculture => "Agriculture",
            Self::Care => "Nursing Care",
            Self::FoodService => "Food Service",
            Self::Office => "Office Work",
            Self::It => "IT / Engineering",
            Self::Logistics => "Logistics",
            Self::RetailService => "Retail & Service",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTimePermanent,
    FullTimeContract,
    PartTime,
}

impl EmploymentType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullTimePermanent => "Full-time (permanent)",
            Self::FullTimeContract => "Full-time (fixed term)",
            Self::PartTime => "Part-time",
        }
    }
}

/// Expected length of the engagement. Variants are declared shortest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DurationBand {
    #[serde(rename = "under_1y")]
    Under1y,
    #[serde(rename = "y1_to_3")]
    Y1To3,
    #[serde(rename = "y3_to_5")]
    Y3To5,
    #[serde(rename = "y5_plus")]
    Y5Plus,
}

impl DurationBand {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Under1y => "Under 1 year",
            Self::Y1To3 => "1-3 years",
            Self::Y3To5 => "3-5 years",
            Self::Y5Plus => "5 years or more",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    None,
    Experienced,
    University,
}

impl SkillLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "No experience required",
            Self::Experienced => "Trained / experienced",
            Self::University => "University-level",
        }
    }
}

/// How long the employer can wait for the first working day. Declared most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadTimeTolerance {
    Asap,
    MidTerm,
    Planned,
}

impl LeadTimeTolerance {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Asap => "As soon as possible",
            Self::MidTerm => "Within about 6 months",
            Self::Planned => "Planned hiring (6 months or more)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateLocation {
    AlreadyDomestic,
    OverseasOk,
    Either,
}

impl CandidateLocation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AlreadyDomestic => "Already living in Japan",
            Self::OverseasOk => "Recruit from overseas",
            Self::Either => "Either",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nationality {
    Vietnam,
    Philippines,
    Indonesia,
    Myanmar,
    Nepal,
    China,
    Cambodia,
    Thailand,
    Other,
}

impl Nationality {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::Vietnam,
            Self::Philippines,
            Self::Indonesia,
            Self::Myanmar,
            Self::Nepal,
            Self::China,
            Self::Cambodia,
            Self::Thailand,
            Self::Other,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Vietnam => "Vietnam",
            Self::Philippines => "Philippines",
            Self::Indonesia => "Indonesia",
            Self::Myanmar => "Myanmar",
            Self::Nepal => "Nepal",
            Self::China => "China",
            Self::Cambodia => "Cambodia",
            Self::Thailand => "Thailand",
            Self::Other => "Other",
        }
    }
}

/// Recruiting route: hire someone already in the country, or bring them in from abroad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Domestic,
    Overseas,
}

impl Route {
    /// Candidates already in the country are hired domestically; everything else goes overseas.
    pub fn for_location(location: Option<CandidateLocation>) -> Self {
        match location {
            Some(CandidateLocation::AlreadyDomestic) => Self::Domestic,
            _ => Self::Overseas,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Domestic => "Domestic hire",
            Self::Overseas => "Overseas recruitment",
        }
    }
}

fn default_headcount() -> u32 {
    1
}

/// Hiring need described by the employer. Every attribute stays `None` until answered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputProfile {
    #[serde(default)]
    pub job_category: Option<JobCategory>,
    #[serde(default)]
    pub employment_type: Option<EmploymentType>,
    #[serde(default)]
    pub duration_band: Option<DurationBand>,
    #[serde(default)]
    pub skill_level: Option<SkillLevel>,
    #[serde(default)]
    pub lead_time_tolerance: Option<LeadTimeTolerance>,
    #[serde(default)]
    pub candidate_location: Option<CandidateLocation>,
    #[serde(default = "default_headcount")]
    pub headcount: u32,
    #[serde(default)]
    pub nationality: Option<Nationality>,
}

impl Default for InputProfile {
    fn default() -> Self {
        Self {
            job_category: None,
            employment_type: None,
            duration_band: None,
            skill_level: None,
            lead_time_tolerance: None,
            candidate_location: None,
            headcount: default_headcount(),
            nationality: None,
        }
    }
}

impl InputProfile {
    /// Record a single answer, replacing any earlier answer to the same question.
    pub fn apply(&mut self, answer: ProfileAnswer) {
        match answer {
            ProfileAnswer::JobCategory(value) => self.job_category = Some(value),
            ProfileAnswer::EmploymentType(value) => self.employment_type = Some(value),
            ProfileAnswer::DurationBand(value) => self.duration_band = Some(value),
            ProfileAnswer::SkillLevel(value) => self.skill_level = Some(value),
            ProfileAnswer::LeadTimeTolerance(value) => self.lead_time_tolerance = Some(value),
            ProfileAnswer::CandidateLocation(value) => self.candidate_location = Some(value),
            ProfileAnswer::Headcount(value) => self.headcount = value,
            ProfileAnswer::Nationality(value) => self.nationality = Some(value),
        }
    }

    pub fn with(mut self, answer: ProfileAnswer) -> Self {
        self.apply(answer);
        self
    }

    pub fn clear(&mut self, attribute: ProfileAttribute) {
        match attribute {
            ProfileAttribute::JobCategory => self.job_category = None,
            ProfileAttribute::EmploymentType => self.employment_type = None,
            ProfileAttribute::DurationBand => self.duration_band = None,
            ProfileAttribute::SkillLevel => self.skill_level = None,
            ProfileAttribute::LeadTimeTolerance => self.lead_time_tolerance = None,
            ProfileAttribute::CandidateLocation => self.candidate_location = None,
            ProfileAttribute::Nationality => self.nationality = None,
        }
    }

    /// Attributes the employer has answered so far, in question order.
    pub fn answered(&self) -> Vec<ProfileAttribute> {
        ProfileAttribute::ordered()
            .into_iter()
            .filter(|attribute| self.is_set(*attribute))
            .collect()
    }

    pub fn is_set(&self, attribute: ProfileAttribute) -> bool {
        match attribute {
            ProfileAttribute::JobCategory => self.job_category.is_some(),
            ProfileAttribute::EmploymentType => self.employment_type.is_some(),
            ProfileAttribute::DurationBand => self.duration_band.is_some(),
            ProfileAttribute::SkillLevel => self.skill_level.is_some(),
            ProfileAttribute::LeadTimeTolerance => self.lead_time_tolerance.is_some(),
            ProfileAttribute::CandidateLocation => self.candidate_location.is_some(),
            ProfileAttribute::Nationality => self.nationality.is_some(),
        }
    }

    pub fn validate(&self) -> Result<(), AdvisorError> {
        if self.headcount == 0 {
            return Err(AdvisorError::InvalidHeadcount(self.headcount));
        }
        Ok(())
    }
}

/// Categorical questions in the order the intake wizard asks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileAttribute {
    JobCategory,
    EmploymentType,
    DurationBand,
    SkillLevel,
    LeadTimeTolerance,
    CandidateLocation,
    Nationality,
}

impl ProfileAttribute {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::JobCategory,
            Self::EmploymentType,
            Self::DurationBand,
            Self::SkillLevel,
            Self::LeadTimeTolerance,
            Self::CandidateLocation,
            Self::Nationality,
        ]
    }
}

/// One answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "attribute", content = "value", rename_all = "snake_case")]
pub enum ProfileAnswer {
    JobCategory(JobCategory),
    EmploymentType(EmploymentType),
    DurationBand(DurationBand),
    SkillLevel(SkillLevel),
    LeadTimeTolerance(LeadTimeTolerance),
    CandidateLocation(CandidateLocation),
    Headcount(u32),
    Nationality(Nationality),
}

/// Caller contract violations. Expected empty outcomes are modeled as values, not errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdvisorError {
    #[error("visa candidate '{0}' is not in the catalog")]
    UnknownCandidate(VisaKey),
    #[error("visa candidate '{0}' is not in the ranked list for this profile")]
    CandidateNotRanked(VisaKey),
    #[error("headcount must be at least 1 (got {0})")]
    InvalidHeadcount(u32),
    #[error("horizon must be at least 1 month (got {0})")]
    InvalidHorizon(u32),
    #[error("no benchmark is defined for job category {0:?}")]
    MissingBenchmark(JobCategory),
    #[error("invalid TCO assumption: {0}")]
    InvalidAssumption(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_profile_defaults_headcount_to_one() {
        let profile: InputProfile = serde_json::from_str("{}").expect("profile parses");
        assert_eq!(profile, InputProfile::default());
        assert_eq!(profile.headcount, 1);
        assert!(profile.answered().is_empty());
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        let err = serde_json::from_str::<InputProfile>(r#"{"job_category":"mining"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn answers_mutate_profile_incrementally() {
        let mut profile = InputProfile::default();
        profile.apply(ProfileAnswer::JobCategory(JobCategory::Care));
        profile.apply(ProfileAnswer::SkillLevel(SkillLevel::None));
        assert_eq!(
            profile.answered(),
            vec![ProfileAttribute::JobCategory, ProfileAttribute::SkillLevel]
        );

        profile.apply(ProfileAnswer::JobCategory(JobCategory::Construction));
        assert_eq!(profile.job_category, Some(JobCategory::Construction));

        profile.clear(ProfileAttribute::SkillLevel);
        assert!(!profile.is_set(ProfileAttribute::SkillLevel));
    }

    #[test]
    fn zero_headcount_is_a_contract_violation() {
        let profile = InputProfile::default().with(ProfileAnswer::Headcount(0));
        assert_eq!(profile.validate(), Err(AdvisorError::InvalidHeadcount(0)));
    }

    #[test]
    fn route_follows_candidate_location() {
        assert_eq!(
            Route::for_location(Some(CandidateLocation::AlreadyDomestic)),
            Route::Domestic
        );
        assert_eq!(
            Route::for_location(Some(CandidateLocation::Either)),
            Route::Overseas
        );
        assert_eq!(Route::for_location(None), Route::Overseas);
    }

    #[test]
    fn answer_serializes_as_tagged_pair() {
        let answer: ProfileAnswer =
            serde_json::from_str(r#"{"attribute":"duration_band","value":"y3_to_5"}"#)
                .expect("answer parses");
        assert_eq!(answer, ProfileAnswer::DurationBand(DurationBand::Y3To5));
    }
}
