use super::domain::{AdvisorError, InputProfile, VisaKey};
use super::tables::{CatalogEntry, MatchMode, RuleTables};
use serde::Serialize;
use std::cmp::Reverse;
use tracing::debug;

/// A matched scoring rule, kept for audit trails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreComponent {
    pub rule_id: String,
    pub points: i32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredCandidate {
    pub candidate: VisaKey,
    pub label: String,
    pub score: i32,
    pub components: Vec<ScoreComponent>,
}

/// Ranked candidates with a strictly positive score, best first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ranking {
    pub candidates: Vec<ScoredCandidate>,
    /// Eligible candidates whose net score was zero or negative.
    pub not_recommended: Vec<ScoredCandidate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Recommendation {
    Candidate(ScoredCandidate),
    NoSuitableCandidate,
}

impl Ranking {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn top(&self) -> Option<&ScoredCandidate> {
        self.candidates.first()
    }

    pub fn recommendation(&self) -> Recommendation {
        match self.top() {
            Some(top) => Recommendation::Candidate(top.clone()),
            None => Recommendation::NoSuitableCandidate,
        }
    }

    /// Caller override of the default selection; only ranked candidates qualify.
    pub fn select(&self, key: &VisaKey) -> Result<&ScoredCandidate, AdvisorError> {
        self.candidates
            .iter()
            .find(|entry| &entry.candidate == key)
            .ok_or_else(|| AdvisorError::CandidateNotRanked(key.clone()))
    }
}

/// Sum every satisfied rule for one candidate. Unset profile attributes satisfy their clause.
pub fn score_candidate(
    tables: &RuleTables,
    entry: &CatalogEntry,
    profile: &InputProfile,
) -> ScoredCandidate {
    let components: Vec<ScoreComponent> = tables
        .rules_for(&entry.key)
        .filter(|rule| rule.when.matches(profile, MatchMode::Vacuous))
        .map(|rule| ScoreComponent {
            rule_id: rule.id.clone(),
            points: rule.points,
            description: rule.description.clone(),
        })
        .collect();

    let score = components.iter().map(|component| component.points).sum();

    ScoredCandidate {
        candidate: entry.key.clone(),
        label: entry.label.clone(),
        score,
        components,
    }
}

/// Score the survivors of the eligibility filter and order them. Ties fall back to
/// catalog priority so identical profiles always produce identical rankings.
pub fn rank(tables: &RuleTables, survivors: &[&CatalogEntry], profile: &InputProfile) -> Ranking {
    let (mut candidates, not_recommended): (Vec<_>, Vec<_>) = survivors
        .iter()
        .map(|entry| score_candidate(tables, entry, profile))
        .partition(|scored| scored.score > 0);

    candidates.sort_by_key(|scored| {
        (
            Reverse(scored.score),
            tables.priority(&scored.candidate).unwrap_or(usize::MAX),
        )
    });

    debug!(
        ranked = candidates.len(),
        dropped = not_recommended.len(),
        top = ?candidates.first().map(|top| top.candidate.as_str()),
        "candidates ranked"
    );

    Ranking {
        candidates,
        not_recommended,
    }
}
