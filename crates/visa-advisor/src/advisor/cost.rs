use super::domain::{AdvisorError, Nationality, VisaKey};
use super::tables::{CatalogEntry, CostItem};
use serde::Serialize;

/// One line item scaled to the requested headcount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostLine {
    pub label: String,
    pub min: f64,
    pub max: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Cost range for hiring `headcount` workers under one visa candidate, in man-yen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostProjection {
    pub candidate: VisaKey,
    pub headcount: u32,
    pub nationality: Option<Nationality>,
    pub nationality_factor: f64,
    pub horizon_months: u32,
    pub one_time_min: f64,
    pub one_time_max: f64,
    pub monthly_min: f64,
    pub monthly_max: f64,
    pub total_min: f64,
    pub total_max: f64,
    pub one_time_lines: Vec<CostLine>,
    pub monthly_lines: Vec<CostLine>,
}

pub(crate) fn ensure_positive(headcount: u32, horizon_months: u32) -> Result<(), AdvisorError> {
    if headcount == 0 {
        return Err(AdvisorError::InvalidHeadcount(headcount));
    }
    if horizon_months == 0 {
        return Err(AdvisorError::InvalidHorizon(horizon_months));
    }
    Ok(())
}

fn scale_lines(items: &[CostItem], multiplier: f64) -> Vec<CostLine> {
    items
        .iter()
        .map(|item| CostLine {
            label: item.label.clone(),
            min: item.min * multiplier,
            max: item.max * multiplier,
            note: item.note.clone(),
        })
        .collect()
}

/// Nationality factor applies to one-time items only; recurring costs are
/// nationality-invariant.
pub(crate) fn project(
    entry: &CatalogEntry,
    headcount: u32,
    nationality: Option<Nationality>,
    nationality_factor: f64,
    horizon_months: u32,
) -> Result<CostProjection, AdvisorError> {
    ensure_positive(headcount, horizon_months)?;

    let heads = f64::from(headcount);
    let months = f64::from(horizon_months);
    let schedule = &entry.costs;

    let one_time_min = schedule.one_time_min() * nationality_factor * heads;
    let one_time_max = schedule.one_time_max() * nationality_factor * heads;
    let monthly_min = schedule.monthly_min() * heads;
    let monthly_max = schedule.monthly_max() * heads;

    Ok(CostProjection {
        candidate: entry.key.clone(),
        headcount,
        nationality,
        nationality_factor,
        horizon_months,
        one_time_min,
        one_time_max,
        monthly_min,
        monthly_max,
        total_min: one_time_min + monthly_min * months,
        total_max: one_time_max + monthly_max * months,
        one_time_lines: scale_lines(&schedule.one_time, nationality_factor * heads),
        monthly_lines: scale_lines(&schedule.monthly, heads),
    })
}
