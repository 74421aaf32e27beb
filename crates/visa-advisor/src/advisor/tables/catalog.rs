use super::super::domain::{JobCategory, Route, SkillLevel, VisaKey};
use super::super::timeline::DurationRange;
use serde::{Deserialize, Serialize};

/// Immutable catalog record for one visa category. Evaluators read these fields
/// instead of branching on the candidate's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub key: VisaKey,
    pub label: String,
    pub max_stay: String,
    pub lead_time: LeadTimeByRoute,
    #[serde(default)]
    pub conditions: Vec<String>,
    pub caution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_size: Option<String>,
    #[serde(default)]
    pub exclusions: HardExclusion,
    pub costs: CostSchedule,
    pub foreign_turnover: TurnoverRange,
    #[serde(default)]
    pub timeline: TimelineByRoute,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadTimeByRoute {
    pub domestic: String,
    pub overseas: String,
}

impl LeadTimeByRoute {
    pub fn for_route(&self, route: Route) -> &str {
        match route {
            Route::Domestic => &self.domestic,
            Route::Overseas => &self.overseas,
        }
    }
}

/// Profile values that disqualify the candidate before any scoring happens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardExclusion {
    #[serde(default)]
    pub job_categories: Vec<JobCategory>,
    #[serde(default)]
    pub skill_levels: Vec<SkillLevel>,
    #[serde(default)]
    pub incompatible_with_university: bool,
}

/// Per-worker cost line items in man-yen (10,000 JPY).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostSchedule {
    #[serde(default)]
    pub one_time: Vec<CostItem>,
    #[serde(default)]
    pub monthly: Vec<CostItem>,
}

impl CostSchedule {
    pub fn one_time_min(&self) -> f64 {
        self.one_time.iter().map(|item| item.min).sum()
    }

    pub fn one_time_max(&self) -> f64 {
        self.one_time.iter().map(|item| item.max).sum()
    }

    pub fn monthly_min(&self) -> f64 {
        self.monthly.iter().map(|item| item.min).sum()
    }

    pub fn monthly_max(&self) -> f64 {
        self.monthly.iter().map(|item| item.max).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostItem {
    pub label: String,
    pub min: f64,
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Annual probability range that a hired foreign worker leaves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnoverRange {
    pub min: f64,
    pub max: f64,
}

impl TurnoverRange {
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineByRoute {
    #[serde(default)]
    pub domestic: Vec<TimelineStep>,
    #[serde(default)]
    pub overseas: Vec<TimelineStep>,
}

impl TimelineByRoute {
    pub fn for_route(&self, route: Route) -> &[TimelineStep] {
        match route {
            Route::Domestic => &self.domestic,
            Route::Overseas => &self.overseas,
        }
    }
}

/// Onboarding step. The human-readable duration is parsed once, when the tables load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimelineStep", into = "RawTimelineStep")]
pub struct TimelineStep {
    pub label: String,
    pub duration_text: String,
    pub duration: DurationRange,
}

impl TimelineStep {
    pub fn new(label: &str, duration_text: &str) -> Result<Self, String> {
        let duration = DurationRange::parse(duration_text)?;
        Ok(Self {
            label: label.to_string(),
            duration_text: duration_text.to_string(),
            duration,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawTimelineStep {
    label: String,
    duration: String,
}

impl TryFrom<RawTimelineStep> for TimelineStep {
    type Error = String;

    fn try_from(raw: RawTimelineStep) -> Result<Self, Self::Error> {
        TimelineStep::new(&raw.label, &raw.duration)
            .map_err(|err| format!("timeline step '{}': {err}", raw.label))
    }
}

impl From<TimelineStep> for RawTimelineStep {
    fn from(step: TimelineStep) -> Self {
        Self {
            label: step.label,
            duration: step.duration_text,
        }
    }
}
