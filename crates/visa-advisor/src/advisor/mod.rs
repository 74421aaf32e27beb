//! Decision support for choosing a foreign-worker visa category.
//!
//! Flow: the eligibility filter removes structurally incompatible candidates,
//! the scoring engine ranks the survivors, and the selected candidate is costed,
//! compared against a domestic hire, scheduled and explained. Every step is a
//! pure function of the input profile and the loaded [`RuleTables`].

pub mod cost;
pub mod domain;
pub mod eligibility;
pub mod explainer;
pub mod export;
pub mod router;
pub mod scoring;
pub mod service;
pub mod tables;
pub mod tco;
pub mod timeline;

#[cfg(test)]
mod tests;

pub use cost::{CostLine, CostProjection};
pub use domain::{
    AdvisorError, CandidateLocation, DurationBand, EmploymentType, InputProfile, JobCategory,
    LeadTimeTolerance, Nationality, ProfileAnswer, ProfileAttribute, Route, SkillLevel, VisaKey,
};
pub use eligibility::{Exclusion, ExclusionReason, Screening};
pub use explainer::{Explanation, DEFAULT_MAX_TAGS};
pub use export::ExportError;
pub use router::advisor_router;
pub use scoring::{Ranking, Recommendation, ScoreComponent, ScoredCandidate};
pub use service::{
    Assessment, AssessmentRequest, SelectedOption, VisaAdvisor, DEFAULT_HORIZON_MONTHS,
};
pub use tables::{CatalogEntry, RuleTableError, RuleTables};
pub use tco::{DomesticBreakdown, ForeignBreakdown, TcoAssumptions, TcoComparison};
pub use timeline::{DurationRange, ProjectedStep, TimelineOutcome, TimelineProjection};
