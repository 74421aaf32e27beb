use super::common::*;

use crate::advisor::domain::{EmploymentType, InputProfile, ProfileAnswer};
use crate::advisor::scoring::{rank, score_candidate, Recommendation};
use crate::advisor::tables::MatchMode;
use crate::advisor::AdvisorError;

#[test]
fn example_profile_ranks_trainee_first() {
    let advisor = advisor();
    let ranking = advisor.rank_candidates(&manufacturing_profile());

    let order: Vec<&str> = ranking
        .candidates
        .iter()
        .map(|scored| scored.candidate.as_str())
        .collect();
    assert_eq!(order, vec!["trainee", "specified_skilled"]);
    assert_eq!(ranking.candidates[0].score, 80);
    assert_eq!(ranking.candidates[1].score, 25);

    let student = ranking
        .not_recommended
        .iter()
        .find(|scored| scored.candidate.as_str() == "student_part_time")
        .expect("student is scored but not recommended");
    assert_eq!(student.score, -45);
    assert!(!order.contains(&"engineer_specialist"));
}

#[test]
fn score_is_the_exact_sum_of_matched_rules() {
    let tables = tables();
    let profile = manufacturing_profile();

    for entry in tables.candidates() {
        let scored = score_candidate(&tables, entry, &profile);
        let expected: i32 = tables
            .rules_for(&entry.key)
            .filter(|rule| rule.when.matches(&profile, MatchMode::Vacuous))
            .map(|rule| rule.points)
            .sum();
        assert_eq!(scored.score, expected, "{}", entry.key);
        let component_sum: i32 = scored.components.iter().map(|c| c.points).sum();
        assert_eq!(component_sum, scored.score);
    }
}

#[test]
fn empty_profile_scores_every_rule() {
    let tables = tables();
    let advisor = advisor();
    let ranking = advisor.rank_candidates(&InputProfile::default());

    for scored in ranking.candidates.iter().chain(ranking.not_recommended.iter()) {
        let all_rules: i32 = tables
            .rules_for(&scored.candidate)
            .map(|rule| rule.points)
            .sum();
        assert_eq!(scored.score, all_rules, "{}", scored.candidate);
    }

    let order: Vec<&str> = ranking
        .candidates
        .iter()
        .map(|scored| scored.candidate.as_str())
        .collect();
    assert_eq!(
        order,
        vec![
            "specified_skilled",
            "engineer_specialist",
            "trainee",
            "student_part_time"
        ]
    );
}

#[test]
fn ties_break_on_catalog_priority() {
    let advisor = advisor();
    let ranking = advisor.rank_candidates(&InputProfile::default());
    let trainee = ranking.candidates[2].clone();
    let student = ranking.candidates[3].clone();
    assert_eq!(trainee.score, student.score);
    assert_eq!(trainee.candidate, key("trainee"));
}

#[test]
fn ranking_is_deterministic() {
    let advisor = advisor();
    let profile = it_graduate_profile();
    let first = advisor.rank_candidates(&profile);
    for _ in 0..5 {
        assert_eq!(advisor.rank_candidates(&profile), first);
    }
}

#[test]
fn part_time_answer_lifts_the_student_status() {
    let advisor = advisor();
    let profile =
        manufacturing_profile().with(ProfileAnswer::EmploymentType(EmploymentType::PartTime));
    let ranking = advisor.rank_candidates(&profile);
    let student = ranking
        .candidates
        .iter()
        .find(|scored| scored.candidate.as_str() == "student_part_time")
        .expect("student now ranked");
    assert_eq!(student.score, 35);
}

#[test]
fn no_positive_score_yields_no_suitable_candidate() {
    let advisor = compact_advisor();
    let tables = advisor.tables();
    let survivors: Vec<_> = tables
        .candidates()
        .iter()
        .filter(|entry| entry.key.as_str() == "beta")
        .collect();

    let ranking = rank(tables, &survivors, &InputProfile::default());
    assert!(ranking.is_empty());
    assert_eq!(ranking.not_recommended.len(), 1);
    assert_eq!(ranking.recommendation(), Recommendation::NoSuitableCandidate);
}

#[test]
fn select_only_accepts_ranked_candidates() {
    let advisor = advisor();
    let ranking = advisor.rank_candidates(&manufacturing_profile());

    let chosen = ranking
        .select(&key("specified_skilled"))
        .expect("ranked candidate can be selected");
    assert_eq!(chosen.score, 25);

    let err = ranking
        .select(&key("engineer_specialist"))
        .expect_err("excluded candidate cannot be selected");
    assert_eq!(err, AdvisorError::CandidateNotRanked(key("engineer_specialist")));
}
