use super::domain::{InputProfile, VisaKey};
use super::tables::{CatalogEntry, MatchMode, NarrativeTemplate, RuleTables};
use serde::Serialize;

/// Number of tags shown next to a recommendation unless the caller asks otherwise.
pub const DEFAULT_MAX_TAGS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub candidate: VisaKey,
    pub tags: Vec<String>,
    pub narrative: String,
    /// False when no template matched and the generic narrative was used.
    pub tailored: bool,
}

/// Tags and narrative only count answers the employer actually gave, so both use
/// strict matching: an unset attribute never justifies a recommendation.
pub fn explain(
    tables: &RuleTables,
    entry: &CatalogEntry,
    profile: &InputProfile,
    max_tags: usize,
) -> Explanation {
    let tags = tables
        .tags_for(&entry.key)
        .filter(|tag| tag.when.matches(profile, MatchMode::Strict))
        .take(max_tags)
        .map(|tag| tag.label.clone())
        .collect();

    let (narrative, tailored) = match best_template(tables, &entry.key, profile) {
        Some(template) => (template.text.clone(), true),
        None => (
            tables.fallback_narrative().replace("{label}", &entry.label),
            false,
        ),
    };

    Explanation {
        candidate: entry.key.clone(),
        tags,
        narrative,
        tailored,
    }
}

/// Most specific fully satisfied template; the earliest declared wins ties.
fn best_template<'a>(
    tables: &'a RuleTables,
    key: &'a VisaKey,
    profile: &InputProfile,
) -> Option<&'a NarrativeTemplate> {
    let mut best: Option<&NarrativeTemplate> = None;
    for template in tables.templates_for(key) {
        if !template.when.matches(profile, MatchMode::Strict) {
            continue;
        }
        let more_specific = best
            .map(|current| template.when.specificity() > current.when.specificity())
            .unwrap_or(true);
        if more_specific {
            best = Some(template);
        }
    }
    best
}
