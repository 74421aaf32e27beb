use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cost::{self, CostProjection};
use super::domain::{AdvisorError, InputProfile, JobCategory, Nationality, Route, VisaKey};
use super::eligibility::{self, Exclusion, Screening};
use super::explainer::{self, Explanation, DEFAULT_MAX_TAGS};
use super::scoring::{self, Ranking, Recommendation, ScoredCandidate};
use super::tables::{CatalogEntry, RuleTableError, RuleTables};
use super::tco::{self, TcoAssumptions, TcoComparison, TcoInput};
use super::timeline::{self, TimelineOutcome, DECISION_BUFFER_DAYS};

/// Horizon used when an assessment request does not name one.
pub const DEFAULT_HORIZON_MONTHS: u32 = 36;

/// Stateless facade over the rule tables. Cloning shares the tables.
#[derive(Debug, Clone)]
pub struct VisaAdvisor {
    tables: Arc<RuleTables>,
    assumptions: TcoAssumptions,
    decision_buffer_days: i64,
    default_horizon_months: u32,
}

impl VisaAdvisor {
    pub fn new(tables: RuleTables) -> Self {
        Self::from_shared(Arc::new(tables))
    }

    pub fn from_shared(tables: Arc<RuleTables>) -> Self {
        let assumptions = *tables.assumptions();
        Self {
            tables,
            assumptions,
            decision_buffer_days: DECISION_BUFFER_DAYS,
            default_horizon_months: DEFAULT_HORIZON_MONTHS,
        }
    }

    pub fn standard() -> Result<Self, RuleTableError> {
        RuleTables::standard().map(Self::new)
    }

    /// Replace the TCO assumptions, e.g. for scenario analysis. The values
    /// must pass the same checks as assumptions loaded from a tables file.
    pub fn with_assumptions(
        mut self,
        assumptions: TcoAssumptions,
    ) -> Result<Self, AdvisorError> {
        assumptions.validate().map_err(AdvisorError::InvalidAssumption)?;
        self.assumptions = assumptions;
        Ok(self)
    }

    pub fn with_decision_buffer_days(mut self, days: i64) -> Self {
        self.decision_buffer_days = days;
        self
    }

    /// Horizon applied by callers that let the requester omit one.
    pub fn with_default_horizon_months(mut self, months: u32) -> Self {
        self.default_horizon_months = months;
        self
    }

    pub fn default_horizon_months(&self) -> u32 {
        self.default_horizon_months
    }

    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    pub fn assumptions(&self) -> &TcoAssumptions {
        &self.assumptions
    }

    fn entry(&self, key: &VisaKey) -> Result<&CatalogEntry, AdvisorError> {
        self.tables
            .candidate(key)
            .ok_or_else(|| AdvisorError::UnknownCandidate(key.clone()))
    }

    pub fn filter_eligible(&self, profile: &InputProfile) -> Vec<&CatalogEntry> {
        eligibility::filter(self.tables.candidates(), profile)
    }

    pub fn screen(&self, profile: &InputProfile) -> Screening<'_> {
        eligibility::screen(self.tables.candidates(), profile)
    }

    /// Filter, then score. An empty ranking is a valid outcome.
    pub fn rank_candidates(&self, profile: &InputProfile) -> Ranking {
        let survivors = self.filter_eligible(profile);
        scoring::rank(&self.tables, &survivors, profile)
    }

    pub fn explain_candidate(
        &self,
        key: &VisaKey,
        profile: &InputProfile,
    ) -> Result<Explanation, AdvisorError> {
        self.explain_candidate_with(key, profile, DEFAULT_MAX_TAGS)
    }

    pub fn explain_candidate_with(
        &self,
        key: &VisaKey,
        profile: &InputProfile,
        max_tags: usize,
    ) -> Result<Explanation, AdvisorError> {
        let entry = self.entry(key)?;
        Ok(explainer::explain(&self.tables, entry, profile, max_tags))
    }

    pub fn project_cost(
        &self,
        key: &VisaKey,
        headcount: u32,
        nationality: Option<Nationality>,
        horizon_months: u32,
    ) -> Result<CostProjection, AdvisorError> {
        let entry = self.entry(key)?;
        let factor = self.tables.nationality_factor(nationality);
        cost::project(entry, headcount, nationality, factor, horizon_months)
    }

    pub fn compare_tco(
        &self,
        key: &VisaKey,
        job_category: JobCategory,
        headcount: u32,
        horizon_months: u32,
        nationality: Option<Nationality>,
    ) -> Result<TcoComparison, AdvisorError> {
        let entry = self.entry(key)?;
        let benchmark = self
            .tables
            .benchmark(job_category)
            .ok_or(AdvisorError::MissingBenchmark(job_category))?;

        tco::compare(
            TcoInput {
                entry,
                benchmark,
                headcount,
                horizon_months,
                nationality,
                nationality_factor: self.tables.nationality_factor(nationality),
            },
            &self.assumptions,
        )
    }

    /// Schedule onboarding for `key`, anchored at `decided_on` plus the decision buffer.
    pub fn project_timeline(
        &self,
        key: &VisaKey,
        route: Route,
        decided_on: NaiveDate,
    ) -> Result<TimelineOutcome, AdvisorError> {
        let entry = self.entry(key)?;
        Ok(timeline::project_for_candidate(
            entry,
            route,
            decided_on,
            self.decision_buffer_days,
        ))
    }

    /// Run the full flow: screen, rank, select, then cost, TCO, timeline and explanation
    /// for the selection.
    pub fn assess(&self, request: &AssessmentRequest) -> Result<Assessment, AdvisorError> {
        let profile = &request.profile;
        profile.validate()?;
        if request.horizon_months == 0 {
            return Err(AdvisorError::InvalidHorizon(request.horizon_months));
        }

        let screening = self.screen(profile);
        let ranking = scoring::rank(&self.tables, &screening.eligible, profile);
        let recommendation = ranking.recommendation();

        let chosen = match &request.selected {
            Some(key) => {
                self.entry(key)?;
                Some((ranking.select(key)?.clone(), true))
            }
            None => ranking.top().cloned().map(|top| (top, false)),
        };

        let selected = match chosen {
            Some((scored, overridden)) => Some(self.selected_option(request, scored, overridden)?),
            None => None,
        };

        debug!(
            excluded = screening.excluded.len(),
            ranked = ranking.candidates.len(),
            selected = ?selected.as_ref().map(|option| option.candidate.candidate.as_str()),
            "assessment complete"
        );

        Ok(Assessment {
            table_version: self.tables.version.clone(),
            profile: profile.clone(),
            excluded: screening.excluded,
            ranking,
            recommendation,
            selected,
        })
    }

    fn selected_option(
        &self,
        request: &AssessmentRequest,
        scored: ScoredCandidate,
        overridden: bool,
    ) -> Result<SelectedOption, AdvisorError> {
        let profile = &request.profile;
        let key = scored.candidate.clone();
        let entry = self.entry(&key)?;

        let explanation = self.explain_candidate(&key, profile)?;
        let cost = self.project_cost(
            &key,
            profile.headcount,
            profile.nationality,
            request.horizon_months,
        )?;
        let tco = match profile.job_category {
            Some(job_category) => Some(self.compare_tco(
                &key,
                job_category,
                profile.headcount,
                request.horizon_months,
                profile.nationality,
            )?),
            None => None,
        };
        let route = request
            .route
            .unwrap_or_else(|| Route::for_location(profile.candidate_location));
        let timeline = self.project_timeline(&key, route, request.decided_on)?;

        Ok(SelectedOption {
            candidate: scored,
            overridden,
            entry: entry.clone(),
            explanation,
            cost,
            tco,
            timeline,
        })
    }
}

fn default_horizon() -> u32 {
    DEFAULT_HORIZON_MONTHS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub profile: InputProfile,
    /// Override of the default (top-ranked) selection.
    #[serde(default)]
    pub selected: Option<VisaKey>,
    #[serde(default = "default_horizon")]
    pub horizon_months: u32,
    pub decided_on: NaiveDate,
    /// Override of the route derived from the candidate location answer.
    #[serde(default)]
    pub route: Option<Route>,
}

impl AssessmentRequest {
    pub fn new(profile: InputProfile, decided_on: NaiveDate) -> Self {
        Self {
            profile,
            selected: None,
            horizon_months: DEFAULT_HORIZON_MONTHS,
            decided_on,
            route: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedOption {
    pub candidate: ScoredCandidate,
    pub overridden: bool,
    pub entry: CatalogEntry,
    pub explanation: Explanation,
    pub cost: CostProjection,
    /// Present only when the profile names a job category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tco: Option<TcoComparison>,
    pub timeline: TimelineOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub table_version: String,
    pub profile: InputProfile,
    pub excluded: Vec<Exclusion>,
    pub ranking: Ranking,
    pub recommendation: Recommendation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<SelectedOption>,
}
