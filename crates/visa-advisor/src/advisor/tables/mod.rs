//! Versioned reference tables driving every evaluator: the visa catalog, scoring
//! rules, explainer tags and narratives, salary/turnover benchmarks, nationality
//! cost factors and modeling assumptions.
//!
//! Tables are plain data. The bundled set lives in `assets/rule_tables.json`;
//! deployments may point at their own file instead. Every load is validated so
//! evaluators can index the tables without re-checking invariants.

mod catalog;
mod condition;

pub use catalog::{
    CatalogEntry, CostItem, CostSchedule, HardExclusion, LeadTimeByRoute, TimelineByRoute,
    TimelineStep, TurnoverRange,
};
pub use condition::{Clause, Condition, MatchMode};

use super::domain::{JobCategory, Nationality, Route, VisaKey};
use super::tco::TcoAssumptions;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

const STANDARD_TABLES: &str = include_str!("../../../assets/rule_tables.json");

/// Weighted rule contributing `points` to `candidate` when `when` holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub id: String,
    pub candidate: VisaKey,
    pub points: i32,
    pub description: String,
    #[serde(default)]
    pub when: Condition,
}

/// Human-facing justification label shown next to a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    pub candidate: VisaKey,
    pub label: String,
    #[serde(default)]
    pub when: Condition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeTemplate {
    pub candidate: VisaKey,
    #[serde(default)]
    pub when: Condition,
    pub text: String,
}

/// Domestic labor market figures for one job category. Salary is annual, in man-yen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub job_category: JobCategory,
    pub annual_salary: f64,
    pub turnover_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_note: Option<String>,
}

impl Benchmark {
    pub fn monthly_salary(&self) -> f64 {
        self.annual_salary / 12.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NationalityFactor {
    pub nationality: Nationality,
    pub factor: f64,
}

/// Complete, validated table set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTables {
    pub version: String,
    #[serde(default = "default_unit")]
    pub unit: String,
    candidates: Vec<CatalogEntry>,
    #[serde(default)]
    rules: Vec<ScoringRule>,
    #[serde(default)]
    tags: Vec<TagRule>,
    #[serde(default)]
    narratives: Vec<NarrativeTemplate>,
    fallback_narrative: String,
    benchmarks: Vec<Benchmark>,
    nationality_factors: Vec<NationalityFactor>,
    #[serde(default)]
    assumptions: TcoAssumptions,
}

fn default_unit() -> String {
    "man-yen".to_string()
}

impl RuleTables {
    /// Tables bundled with the crate.
    pub fn standard() -> Result<Self, RuleTableError> {
        Self::from_json_str(STANDARD_TABLES)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RuleTableError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RuleTableError> {
        let tables: RuleTables = serde_json::from_reader(reader)?;
        tables.validated()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RuleTableError> {
        let tables: RuleTables = serde_json::from_str(raw)?;
        tables.validated()
    }

    fn validated(self) -> Result<Self, RuleTableError> {
        self.validate()?;
        info!(
            version = %self.version,
            candidates = self.candidates.len(),
            rules = self.rules.len(),
            "rule tables loaded"
        );
        Ok(self)
    }

    /// Catalog entries in priority order; the order breaks ranking ties.
    pub fn candidates(&self) -> &[CatalogEntry] {
        &self.candidates
    }

    pub fn candidate(&self, key: &VisaKey) -> Option<&CatalogEntry> {
        self.candidates.iter().find(|entry| &entry.key == key)
    }

    /// Position in the catalog; lower is preferred on ties.
    pub fn priority(&self, key: &VisaKey) -> Option<usize> {
        self.candidates.iter().position(|entry| &entry.key == key)
    }

    pub fn rules(&self) -> &[ScoringRule] {
        &self.rules
    }

    pub fn rules_for<'a>(&'a self, key: &'a VisaKey) -> impl Iterator<Item = &'a ScoringRule> + 'a {
        self.rules.iter().filter(move |rule| &rule.candidate == key)
    }

    pub fn tags_for<'a>(&'a self, key: &'a VisaKey) -> impl Iterator<Item = &'a TagRule> + 'a {
        self.tags.iter().filter(move |tag| &tag.candidate == key)
    }

    pub fn templates_for<'a>(
        &'a self,
        key: &'a VisaKey,
    ) -> impl Iterator<Item = &'a NarrativeTemplate> + 'a {
        self.narratives
            .iter()
            .filter(move |template| &template.candidate == key)
    }

    pub fn fallback_narrative(&self) -> &str {
        &self.fallback_narrative
    }

    pub fn benchmark(&self, job_category: JobCategory) -> Option<&Benchmark> {
        self.benchmarks
            .iter()
            .find(|benchmark| benchmark.job_category == job_category)
    }

    /// Factor for one-time costs. An unanswered nationality is priced at 1.0.
    pub fn nationality_factor(&self, nationality: Option<Nationality>) -> f64 {
        nationality
            .and_then(|nationality| {
                self.nationality_factors
                    .iter()
                    .find(|entry| entry.nationality == nationality)
            })
            .map(|entry| entry.factor)
            .unwrap_or(1.0)
    }

    pub fn assumptions(&self) -> &TcoAssumptions {
        &self.assumptions
    }

    fn validate(&self) -> Result<(), RuleTableError> {
        if self.candidates.is_empty() {
            return Err(RuleTableError::EmptyCatalog);
        }

        let mut keys = HashSet::new();
        for entry in &self.candidates {
            if !keys.insert(&entry.key) {
                return Err(RuleTableError::DuplicateCandidate(entry.key.clone()));
            }
            validate_entry(entry)?;
        }

        let known = |key: &VisaKey, context: &str| {
            if keys.contains(key) {
                Ok(())
            } else {
                Err(RuleTableError::UnknownCandidate {
                    context: context.to_string(),
                    key: key.clone(),
                })
            }
        };

        for rule in &self.rules {
            known(&rule.candidate, &format!("rule '{}'", rule.id))?;
            check_condition(&rule.when, &format!("rule '{}'", rule.id))?;
        }
        for tag in &self.tags {
            known(&tag.candidate, &format!("tag '{}'", tag.label))?;
            check_condition(&tag.when, &format!("tag '{}'", tag.label))?;
        }
        for template in &self.narratives {
            known(&template.candidate, "narrative template")?;
            check_condition(&template.when, "narrative template")?;
        }

        for category in JobCategory::ordered() {
            let benchmark = self
                .benchmark(category)
                .ok_or(RuleTableError::MissingBenchmark(category))?;
            if benchmark.annual_salary <= 0.0 || !(0.0..=1.0).contains(&benchmark.turnover_rate) {
                return Err(RuleTableError::InvalidBenchmark(category));
            }
        }

        for nationality in Nationality::ordered() {
            let entry = self
                .nationality_factors
                .iter()
                .find(|entry| entry.nationality == nationality)
                .ok_or(RuleTableError::MissingNationalityFactor(nationality))?;
            if !entry.factor.is_finite() || entry.factor < 0.0 {
                return Err(RuleTableError::InvalidNationalityFactor {
                    nationality,
                    factor: entry.factor,
                });
            }
        }

        self.assumptions
            .validate()
            .map_err(RuleTableError::InvalidAssumption)
    }
}

fn validate_entry(entry: &CatalogEntry) -> Result<(), RuleTableError> {
    for item in entry.costs.one_time.iter().chain(entry.costs.monthly.iter()) {
        if item.min < 0.0 || item.max < item.min || !item.max.is_finite() {
            return Err(RuleTableError::InvalidCostItem {
                candidate: entry.key.clone(),
                label: item.label.clone(),
            });
        }
    }

    let turnover = entry.foreign_turnover;
    if turnover.min < 0.0 || turnover.max > 1.0 || turnover.min > turnover.max {
        return Err(RuleTableError::InvalidTurnover(entry.key.clone()));
    }

    for route in [Route::Domestic, Route::Overseas] {
        if let Some(last) = entry.timeline.for_route(route).last() {
            if last.duration.max_months > 0.0 {
                return Err(RuleTableError::TrailingDuration {
                    candidate: entry.key.clone(),
                    route,
                });
            }
        }
    }

    Ok(())
}

fn check_condition(condition: &Condition, context: &str) -> Result<(), RuleTableError> {
    match condition.clauses().iter().find(|clause| clause.is_empty()) {
        Some(clause) => Err(RuleTableError::EmptyClause {
            context: context.to_string(),
            attribute: format!("{:?}", clause.attribute()),
        }),
        None => Ok(()),
    }
}

/// Failure to load or validate a table set.
#[derive(Debug, thiserror::Error)]
pub enum RuleTableError {
    #[error("failed to read rule tables: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rule table data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("rule tables define no visa candidates")]
    EmptyCatalog,
    #[error("visa candidate '{0}' is defined more than once")]
    DuplicateCandidate(VisaKey),
    #[error("{context} references unknown visa candidate '{key}'")]
    UnknownCandidate { context: String, key: VisaKey },
    #[error("{context} has an empty value set for {attribute}")]
    EmptyClause { context: String, attribute: String },
    #[error("no benchmark defined for job category {0:?}")]
    MissingBenchmark(JobCategory),
    #[error("benchmark for job category {0:?} has a non-positive salary or a turnover rate outside 0..=1")]
    InvalidBenchmark(JobCategory),
    #[error("no cost factor defined for nationality {0:?}")]
    MissingNationalityFactor(Nationality),
    #[error("cost factor {factor} for nationality {nationality:?} must be a finite value >= 0")]
    InvalidNationalityFactor {
        nationality: Nationality,
        factor: f64,
    },
    #[error("cost item '{label}' of '{candidate}' must satisfy 0 <= min <= max")]
    InvalidCostItem { candidate: VisaKey, label: String },
    #[error("foreign turnover range of '{0}' must satisfy 0 <= min <= max <= 1")]
    InvalidTurnover(VisaKey),
    #[error("final {route:?} timeline step of '{candidate}' must have zero duration")]
    TrailingDuration { candidate: VisaKey, route: Route },
    #[error("invalid modeling assumption: {0}")]
    InvalidAssumption(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn standard_json() -> Value {
        serde_json::from_str(STANDARD_TABLES).expect("bundled tables are valid json")
    }

    #[test]
    fn standard_tables_load_and_cover_every_category() {
        let tables = RuleTables::standard().expect("bundled tables validate");
        assert!(!tables.version.is_empty());
        assert_eq!(tables.candidates().len(), 4);
        for category in JobCategory::ordered() {
            assert!(tables.benchmark(category).is_some(), "{category:?}");
        }
    }

    #[test]
    fn priority_follows_declaration_order() {
        let tables = RuleTables::standard().expect("tables");
        let keys: Vec<&str> = tables
            .candidates()
            .iter()
            .map(|entry| entry.key.as_str())
            .collect();
        assert_eq!(
            keys,
            vec![
                "trainee",
                "specified_skilled",
                "engineer_specialist",
                "student_part_time"
            ]
        );
        assert_eq!(tables.priority(&VisaKey::from("trainee")), Some(0));
        assert_eq!(tables.priority(&VisaKey::from("unknown")), None);
    }

    #[test]
    fn unset_nationality_uses_neutral_factor() {
        let tables = RuleTables::standard().expect("tables");
        assert_eq!(tables.nationality_factor(None), 1.0);
        assert_eq!(tables.nationality_factor(Some(Nationality::Vietnam)), 1.0);
    }

    #[test]
    fn rejects_rule_for_unknown_candidate() {
        let mut raw = standard_json();
        raw["rules"]
            .as_array_mut()
            .expect("rules array")
            .push(json!({
                "id": "ghost.any",
                "candidate": "ghost",
                "points": 1,
                "description": "never valid"
            }));

        let err = RuleTables::from_json_str(&raw.to_string()).expect_err("unknown candidate");
        assert!(matches!(err, RuleTableError::UnknownCandidate { .. }));
    }

    #[test]
    fn rejects_duplicate_candidate() {
        let mut raw = standard_json();
        let first = raw["candidates"][0].clone();
        raw["candidates"]
            .as_array_mut()
            .expect("candidates array")
            .push(first);

        let err = RuleTables::from_json_str(&raw.to_string()).expect_err("duplicate");
        assert!(matches!(err, RuleTableError::DuplicateCandidate(_)));
    }

    #[test]
    fn rejects_missing_benchmark() {
        let mut raw = standard_json();
        raw["benchmarks"]
            .as_array_mut()
            .expect("benchmarks array")
            .retain(|entry| entry["job_category"] != "care");

        let err = RuleTables::from_json_str(&raw.to_string()).expect_err("missing benchmark");
        assert!(matches!(
            err,
            RuleTableError::MissingBenchmark(JobCategory::Care)
        ));
    }

    #[test]
    fn rejects_inverted_cost_item() {
        let mut raw = standard_json();
        raw["candidates"][0]["costs"]["one_time"][0]["min"] = json!(500.0);
        raw["candidates"][0]["costs"]["one_time"][0]["max"] = json!(1.0);

        let err = RuleTables::from_json_str(&raw.to_string()).expect_err("inverted");
        assert!(matches!(err, RuleTableError::InvalidCostItem { .. }));
    }

    #[test]
    fn rejects_unparseable_step_duration() {
        let mut raw = standard_json();
        raw["candidates"][0]["timeline"]["overseas"][0]["duration"] = json!("soon-ish");

        let err = RuleTables::from_json_str(&raw.to_string()).expect_err("bad duration");
        assert!(matches!(err, RuleTableError::Parse(_)));
    }

    #[test]
    fn rejects_final_step_with_duration() {
        let mut raw = standard_json();
        let steps = raw["candidates"][0]["timeline"]["overseas"]
            .as_array_mut()
            .expect("steps");
        steps.push(json!({ "label": "Extra wait", "duration": "1 month" }));

        let err = RuleTables::from_json_str(&raw.to_string()).expect_err("trailing duration");
        assert!(matches!(
            err,
            RuleTableError::TrailingDuration {
                route: Route::Overseas,
                ..
            }
        ));
    }

    #[test]
    fn rejects_empty_clause() {
        let mut raw = standard_json();
        raw["rules"][0]["when"] = json!([{ "attribute": "job_category", "any_of": [] }]);

        let err = RuleTables::from_json_str(&raw.to_string()).expect_err("empty clause");
        assert!(matches!(err, RuleTableError::EmptyClause { .. }));
    }
}
