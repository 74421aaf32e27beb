use super::domain::Route;
use super::tables::{CatalogEntry, TimelineStep};
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Days between the hiring decision and the first onboarding step (internal approval lag).
pub const DECISION_BUFFER_DAYS: i64 = 20;

/// Weeks are converted at four per month so "2-4 weeks" reads as 0.5-1 month.
pub const WEEKS_PER_MONTH: f64 = 4.0;

pub const DAYS_PER_MONTH: f64 = 30.0;

/// Duration of a step in months, carrying both ends of the published range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min_months: f64,
    pub max_months: f64,
}

impl DurationRange {
    pub const fn zero() -> Self {
        Self {
            min_months: 0.0,
            max_months: 0.0,
        }
    }

    /// Parse "1-2 months", "1〜2ヶ月", "2–4 weeks", "10 days", "1 year" or "0".
    pub fn parse(text: &str) -> Result<Self, String> {
        let normalized = text.trim().to_lowercase();
        if matches!(normalized.as_str(), "" | "0" | "-" | "none" | "immediately") {
            return Ok(Self::zero());
        }

        let numbers = numeric_tokens(&normalized)
            .map_err(|token| format!("'{token}' in '{text}' is not a number"))?;
        let (low, high) = match numbers.as_slice() {
            [single] => (*single, *single),
            [low, high] => (*low, *high),
            _ => return Err(format!("expected a value or a range in '{text}'")),
        };
        if low == 0.0 && high == 0.0 {
            return Ok(Self::zero());
        }
        if high < low {
            return Err(format!("range '{text}' ends before it starts"));
        }

        let scale = months_per_unit(&normalized)?;

        Ok(Self {
            min_months: low * scale,
            max_months: high * scale,
        })
    }

    /// Value used for the point-estimate schedule.
    pub fn representative(&self) -> f64 {
        self.min_months
    }
}

fn numeric_tokens(text: &str) -> Result<Vec<f64>, String> {
    text.split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<f64>().map_err(|_| token.to_string()))
        .collect()
}

fn months_per_unit(text: &str) -> Result<f64, String> {
    let units = [
        (text.contains("week") || text.contains('週'), 1.0 / WEEKS_PER_MONTH),
        (text.contains("day") || text.contains('日'), 1.0 / DAYS_PER_MONTH),
        (text.contains("month") || text.contains('月'), 1.0),
        (text.contains("year") || text.contains('年'), 12.0),
    ];
    let mut named = units.iter().filter(|(present, _)| *present);
    match (named.next(), named.next()) {
        (Some((_, scale)), None) => Ok(*scale),
        (None, _) => Err(format!("no recognizable unit in '{text}'")),
        (Some(_), Some(_)) => Err(format!("'{text}' mixes more than one unit")),
    }
}

/// Calendar date `months` after `anchor`. Whole months use calendar arithmetic;
/// the fraction is spread over the following month so later offsets never land earlier.
pub fn offset_date(anchor: NaiveDate, months: f64) -> NaiveDate {
    let months = months.max(0.0);
    let whole = months.floor();
    let fraction = months - whole;

    let base = add_months(anchor, whole as u32);
    if fraction <= 0.0 {
        return base;
    }

    let next = add_months(anchor, (whole as u32).saturating_add(1));
    let span = (next - base).num_days();
    let days = (fraction * span as f64).floor() as i64;
    base.checked_add_signed(Duration::days(days))
        .unwrap_or(NaiveDate::MAX)
}

fn add_months(anchor: NaiveDate, months: u32) -> NaiveDate {
    anchor
        .checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedStep {
    pub label: String,
    pub duration_text: String,
    pub start_date: NaiveDate,
    pub start_month: String,
    pub latest_start_date: NaiveDate,
    pub duration_months: f64,
    pub duration_months_max: f64,
}

/// Dated schedule. `arrival_date` is the start of the final step, the earliest
/// month work can begin; `latest_arrival_date` uses the upper end of every range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineProjection {
    pub start_date: NaiveDate,
    pub steps: Vec<ProjectedStep>,
    pub arrival_date: NaiveDate,
    pub latest_arrival_date: NaiveDate,
    pub total_months: f64,
    pub total_months_max: f64,
}

/// Lay `steps` out on the calendar from `start_date`. Returns `None` for an empty sequence.
pub fn project_steps(steps: &[TimelineStep], start_date: NaiveDate) -> Option<TimelineProjection> {
    if steps.is_empty() {
        return None;
    }

    let mut offset = 0.0;
    let mut offset_max = 0.0;
    let mut projected = Vec::with_capacity(steps.len());

    for step in steps {
        let start = offset_date(start_date, offset);
        projected.push(ProjectedStep {
            label: step.label.clone(),
            duration_text: step.duration_text.clone(),
            start_date: start,
            start_month: format!("{}-{:02}", start.year(), start.month()),
            latest_start_date: offset_date(start_date, offset_max),
            duration_months: step.duration.representative(),
            duration_months_max: step.duration.max_months,
        });
        offset += step.duration.representative();
        offset_max += step.duration.max_months;
    }

    let last = projected.last()?;
    let arrival_date = last.start_date;
    let latest_arrival_date = last.latest_start_date;

    Some(TimelineProjection {
        start_date,
        arrival_date,
        latest_arrival_date,
        total_months: offset,
        total_months_max: offset_max,
        steps: projected,
    })
}

/// Schedule for a candidate and route, or an explicit "unavailable" result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TimelineOutcome {
    Scheduled {
        requested_route: Route,
        route_used: Route,
        fell_back: bool,
        projection: TimelineProjection,
    },
    Unavailable {
        requested_route: Route,
    },
}

impl TimelineOutcome {
    pub fn projection(&self) -> Option<&TimelineProjection> {
        match self {
            TimelineOutcome::Scheduled { projection, .. } => Some(projection),
            TimelineOutcome::Unavailable { .. } => None,
        }
    }
}

/// Resolve the step list for `route`, falling back to the overseas route when the
/// requested one has no steps, and project it from `decided_on` plus the decision buffer.
pub fn project_for_candidate(
    entry: &CatalogEntry,
    route: Route,
    decided_on: NaiveDate,
    buffer_days: i64,
) -> TimelineOutcome {
    let requested = entry.timeline.for_route(route);
    let (route_used, steps) = if requested.is_empty() {
        (Route::Overseas, entry.timeline.for_route(Route::Overseas))
    } else {
        (route, requested)
    };

    let start_date = decided_on
        .checked_add_signed(Duration::days(buffer_days))
        .unwrap_or(decided_on);

    match project_steps(steps, start_date) {
        Some(projection) => {
            let fell_back = route_used != route;
            if fell_back {
                warn!(candidate = %entry.key, ?route, "no timeline for requested route, using overseas steps");
            }
            TimelineOutcome::Scheduled {
                requested_route: route,
                route_used,
                fell_back,
                projection,
            }
        }
        None => TimelineOutcome::Unavailable {
            requested_route: route,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn step(label: &str, duration: &str) -> TimelineStep {
        TimelineStep::new(label, duration).expect("step parses")
    }

    #[test]
    fn parses_month_ranges_in_several_notations() {
        for text in ["1-2 months", "1–2 months", "1〜2ヶ月", "1~2か月", "1 to 2 months"] {
            let range = DurationRange::parse(text).expect(text);
            assert_eq!(range.min_months, 1.0, "{text}");
            assert_eq!(range.max_months, 2.0, "{text}");
        }
    }

    #[test]
    fn parses_weeks_days_and_years() {
        let weeks = DurationRange::parse("2-4 weeks").expect("weeks");
        assert_eq!(weeks.min_months, 0.5);
        assert_eq!(weeks.max_months, 1.0);

        let days = DurationRange::parse("15 days").expect("days");
        assert_eq!(days.min_months, 0.5);

        let years = DurationRange::parse("1 year").expect("years");
        assert_eq!(years.min_months, 12.0);

        assert_eq!(DurationRange::parse("0").expect("zero"), DurationRange::zero());
        assert_eq!(DurationRange::parse("").expect("empty"), DurationRange::zero());
    }

    #[test]
    fn rejects_unitless_and_inverted_ranges() {
        assert!(DurationRange::parse("3").is_err());
        assert!(DurationRange::parse("4-2 months").is_err());
        assert!(DurationRange::parse("soon").is_err());
        assert!(DurationRange::parse("1-2-3 months").is_err());
    }

    #[test]
    fn rejects_compound_durations() {
        let err = DurationRange::parse("1 year 6 months").expect_err("compound duration");
        assert!(err.contains("more than one unit"), "{err}");
        assert!(DurationRange::parse("2 weeks to 1 month").is_err());
    }

    #[test]
    fn offset_date_saturates_for_huge_offsets() {
        let anchor = date(2026, 1, 1);
        assert_eq!(offset_date(anchor, 1.0e12 + 0.5), NaiveDate::MAX);
    }

    #[test]
    fn representative_value_is_lower_bound() {
        let range = DurationRange::parse("3-6 months").expect("range");
        assert_eq!(range.representative(), 3.0);
    }

    #[test]
    fn offset_date_handles_month_ends() {
        let anchor = date(2026, 1, 31);
        assert_eq!(offset_date(anchor, 1.0), date(2026, 2, 28));
        assert_eq!(offset_date(anchor, 0.0), anchor);
        assert!(offset_date(anchor, 0.99) < offset_date(anchor, 1.0));
        assert_eq!(offset_date(date(2026, 4, 1), 0.5), date(2026, 4, 16));
    }

    #[test]
    fn projects_steps_onto_calendar() {
        let steps = vec![
            step("Recruit", "1-2 months"),
            step("Apply for status", "2-3 months"),
            step("Work begins", "0"),
        ];
        let projection = project_steps(&steps, date(2026, 11, 7)).expect("projection");

        let starts: Vec<NaiveDate> = projection.steps.iter().map(|s| s.start_date).collect();
        assert_eq!(
            starts,
            vec![date(2026, 11, 7), date(2026, 12, 7), date(2027, 2, 7)]
        );
        assert_eq!(projection.arrival_date, date(2027, 2, 7));
        assert_eq!(projection.latest_arrival_date, date(2027, 4, 7));
        assert_eq!(projection.steps[1].start_month, "2026-12");
        assert_eq!(projection.total_months, 3.0);
        assert_eq!(projection.total_months_max, 5.0);
    }

    #[test]
    fn empty_sequence_has_no_projection() {
        assert!(project_steps(&[], date(2026, 1, 1)).is_none());
    }
}
