use axum::body::to_bytes;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::advisor::domain::{
    CandidateLocation, DurationBand, EmploymentType, InputProfile, JobCategory,
    LeadTimeTolerance, SkillLevel, VisaKey,
};
use crate::advisor::service::VisaAdvisor;
use crate::advisor::tables::RuleTables;

pub(super) fn advisor() -> VisaAdvisor {
    VisaAdvisor::standard().expect("bundled tables load")
}

pub(super) fn tables() -> RuleTables {
    RuleTables::standard().expect("bundled tables load")
}

pub(super) fn key(raw: &str) -> VisaKey {
    VisaKey::from(raw)
}

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Long-term unskilled factory hire, sourced abroad.
pub(super) fn manufacturing_profile() -> InputProfile {
    InputProfile {
        job_category: Some(JobCategory::Manufacturing),
        employment_type: Some(EmploymentType::FullTimePermanent),
        duration_band: Some(DurationBand::Y3To5),
        skill_level: Some(SkillLevel::None),
        lead_time_tolerance: Some(LeadTimeTolerance::Planned),
        candidate_location: Some(CandidateLocation::OverseasOk),
        ..InputProfile::default()
    }
}

pub(super) fn it_graduate_profile() -> InputProfile {
    InputProfile {
        job_category: Some(JobCategory::It),
        employment_type: Some(EmploymentType::FullTimePermanent),
        duration_band: Some(DurationBand::Y5Plus),
        skill_level: Some(SkillLevel::University),
        lead_time_tolerance: Some(LeadTimeTolerance::MidTerm),
        candidate_location: Some(CandidateLocation::Either),
        ..InputProfile::default()
    }
}

fn step(label: &str, duration: &str) -> Value {
    json!({ "label": label, "duration": duration })
}

fn benchmarks() -> Value {
    let rows: Vec<Value> = JobCategory::ordered()
        .into_iter()
        .map(|category| {
            json!({
                "job_category": category,
                "annual_salary": 360.0,
                "turnover_rate": 0.2
            })
        })
        .collect();
    Value::Array(rows)
}

fn nationality_factors() -> Value {
    json!([
        { "nationality": "vietnam", "factor": 1.0 },
        { "nationality": "philippines", "factor": 1.5 },
        { "nationality": "indonesia", "factor": 1.0 },
        { "nationality": "myanmar", "factor": 1.0 },
        { "nationality": "nepal", "factor": 1.0 },
        { "nationality": "china", "factor": 1.0 },
        { "nationality": "cambodia", "factor": 1.0 },
        { "nationality": "thailand", "factor": 1.0 },
        { "nationality": "other", "factor": 1.0 }
    ])
}

/// Two-candidate table set with round numbers: "alpha" costs 20/60 once and 2/4
/// monthly per head; "beta" has no overseas steps and no rules of its own.
pub(super) fn compact_tables_json() -> Value {
    json!({
        "version": "test-1",
        "candidates": [
            {
                "key": "alpha",
                "label": "Alpha status",
                "max_stay": "3 years",
                "lead_time": { "domestic": "1 month", "overseas": "3 months" },
                "caution": "none",
                "exclusions": { "job_categories": ["office"] },
                "costs": {
                    "one_time": [
                        { "label": "Agency", "min": 15.0, "max": 40.0 },
                        { "label": "Visa", "min": 5.0, "max": 20.0 }
                    ],
                    "monthly": [
                        { "label": "Support", "min": 2.0, "max": 4.0 }
                    ]
                },
                "foreign_turnover": { "min": 0.1, "max": 0.3 },
                "timeline": {
                    "domestic": [step("Paperwork", "1 month"), step("Start", "0")],
                    "overseas": [
                        step("Interview", "2-4 weeks"),
                        step("Certificate", "1-3 months"),
                        step("Start", "0")
                    ]
                }
            },
            {
                "key": "beta",
                "label": "Beta status",
                "max_stay": "1 year",
                "lead_time": { "domestic": "2 weeks", "overseas": "n/a" },
                "caution": "none",
                "costs": { "one_time": [], "monthly": [] },
                "foreign_turnover": { "min": 0.0, "max": 0.0 },
                "timeline": {
                    "domestic": [step("Hire", "2 weeks"), step("Start", "0")],
                    "overseas": []
                }
            }
        ],
        "rules": [
            { "id": "alpha.base", "candidate": "alpha", "points": 5, "description": "base" },
            { "id": "alpha.long", "candidate": "alpha", "points": 10, "description": "long stay",
              "when": [{ "attribute": "duration_band", "any_of": ["y3_to_5", "y5_plus"] }] }
        ],
        "tags": [
            { "candidate": "alpha", "label": "Long stay",
              "when": [{ "attribute": "duration_band", "any_of": ["y3_to_5", "y5_plus"] }] }
        ],
        "narratives": [],
        "fallback_narrative": "{label} fits.",
        "benchmarks": benchmarks(),
        "nationality_factors": nationality_factors()
    })
}

pub(super) fn compact_advisor() -> VisaAdvisor {
    let tables = RuleTables::from_json_str(&compact_tables_json().to_string())
        .expect("compact tables validate");
    VisaAdvisor::new(tables)
}

pub(super) async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body readable");
    serde_json::from_slice(&bytes).expect("response body is json")
}

pub(super) fn approx(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-6
}
