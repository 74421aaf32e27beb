use super::common::*;

use crate::advisor::domain::{InputProfile, ProfileAttribute};
use crate::advisor::explainer::DEFAULT_MAX_TAGS;
use crate::advisor::service::VisaAdvisor;
use crate::advisor::tables::RuleTables;
use crate::advisor::AdvisorError;
use serde_json::json;

#[test]
fn tags_are_capped_in_declaration_order() {
    let advisor = advisor();
    let explanation = advisor
        .explain_candidate(&key("trainee"), &manufacturing_profile())
        .expect("trainee explained");

    assert_eq!(explanation.tags.len(), DEFAULT_MAX_TAGS);
    assert_eq!(
        explanation.tags,
        vec![
            "Fits a 3-5 year placement",
            "No experience required",
            "Works with a planned schedule"
        ]
    );
}

#[test]
fn caller_can_request_fewer_tags() {
    let advisor = advisor();
    let explanation = advisor
        .explain_candidate_with(&key("trainee"), &manufacturing_profile(), 1)
        .expect("trainee explained");
    assert_eq!(explanation.tags, vec!["Fits a 3-5 year placement"]);
}

#[test]
fn most_specific_template_wins() {
    let advisor = advisor();
    let explanation = advisor
        .explain_candidate(&key("trainee"), &manufacturing_profile())
        .expect("trainee explained");
    assert!(explanation.tailored);
    assert!(explanation
        .narrative
        .starts_with("Technical Intern Training suits a multi-year placement"));
}

#[test]
fn equally_specific_templates_keep_declaration_order() {
    let mut raw = compact_tables_json();
    raw["narratives"] = json!([
        { "candidate": "alpha",
          "when": [{ "attribute": "job_category", "any_of": ["manufacturing"] }],
          "text": "Declared first." },
        { "candidate": "alpha",
          "when": [{ "attribute": "duration_band", "any_of": ["y3_to_5"] }],
          "text": "Declared second." }
    ]);
    let tables = RuleTables::from_json_str(&raw.to_string()).expect("tables validate");
    let advisor = VisaAdvisor::new(tables);

    let explanation = advisor
        .explain_candidate(&key("alpha"), &manufacturing_profile())
        .expect("alpha explained");
    assert!(explanation.tailored);
    assert_eq!(explanation.narrative, "Declared first.");
}

#[test]
fn less_specific_template_applies_when_the_richer_one_fails() {
    let advisor = advisor();
    let mut profile = manufacturing_profile();
    profile.clear(ProfileAttribute::SkillLevel);

    let explanation = advisor
        .explain_candidate(&key("trainee"), &profile)
        .expect("trainee explained");
    assert!(explanation.tailored);
    assert!(explanation
        .narrative
        .starts_with("Technical Intern Training works when the hiring date is months away"));
}

#[test]
fn unanswered_profile_gets_the_generic_narrative() {
    let advisor = advisor();
    let explanation = advisor
        .explain_candidate(&key("trainee"), &InputProfile::default())
        .expect("trainee explained");

    assert!(explanation.tags.is_empty());
    assert!(!explanation.tailored);
    assert!(explanation
        .narrative
        .starts_with("Technical Intern Training is a workable option"));
    assert!(!explanation.narrative.contains("{label}"));
}

#[test]
fn unknown_candidate_is_rejected() {
    let advisor = advisor();
    let err = advisor
        .explain_candidate(&key("ghost"), &InputProfile::default())
        .expect_err("unknown candidate");
    assert_eq!(err, AdvisorError::UnknownCandidate(key("ghost")));
}
