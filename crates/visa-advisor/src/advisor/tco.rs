//! Total-cost-of-ownership comparison between a domestic hire and a foreign hire
//! under one visa candidate, over a fixed horizon.
//!
//! The domestic side models recruiting fees inflated by failed searches,
//! turnover-driven re-recruitment, hand-over loss and vacancy loss. The foreign
//! side models the candidate's own cost schedule plus a re-recruitment term.
//! Vacancy loss is not applied to the foreign side unless
//! [`TcoAssumptions::apply_foreign_vacancy_loss`] is set.

use super::cost::ensure_positive;
use super::domain::{AdvisorError, JobCategory, Nationality, VisaKey};
use super::tables::{Benchmark, CatalogEntry};
use serde::{Deserialize, Serialize};

/// Agency fee charged for a domestic hire, as a share of annual salary.
pub const RECRUITING_COST_RATIO: f64 = 0.30;

/// Share of domestic searches that end in a hire. Recruiting cost is divided by
/// this to account for repeated searches in a tight labor market.
pub const DOMESTIC_HIRE_SUCCESS_RATE: f64 = 0.5;

/// Share of one month's salary spent training a replacement on the job.
pub const TRAINING_COST_FRACTION: f64 = 0.5;

/// Working days per month; monthly salary divided by this is the daily gross-profit proxy.
pub const DAILY_PROFIT_DIVISOR: f64 = 20.0;

/// Working days lost while a leaver's duties are handed over.
pub const HANDOVER_VACANCY_DAYS: f64 = 10.0;

/// Average working days a position stays unfilled before a hire starts.
pub const AVERAGE_VACANCY_DAYS: f64 = 30.0;

/// Modeling assumptions for the comparator. Defaults are the constants above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcoAssumptions {
    pub recruiting_cost_ratio: f64,
    pub domestic_hire_success_rate: f64,
    pub training_cost_fraction: f64,
    pub daily_profit_divisor: f64,
    pub handover_vacancy_days: f64,
    pub average_vacancy_days: f64,
    /// Charge the foreign side the same vacancy loss as the domestic side.
    pub apply_foreign_vacancy_loss: bool,
}

impl Default for TcoAssumptions {
    fn default() -> Self {
        Self {
            recruiting_cost_ratio: RECRUITING_COST_RATIO,
            domestic_hire_success_rate: DOMESTIC_HIRE_SUCCESS_RATE,
            training_cost_fraction: TRAINING_COST_FRACTION,
            daily_profit_divisor: DAILY_PROFIT_DIVISOR,
            handover_vacancy_days: HANDOVER_VACANCY_DAYS,
            average_vacancy_days: AVERAGE_VACANCY_DAYS,
            apply_foreign_vacancy_loss: false,
        }
    }
}

impl TcoAssumptions {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if !(self.domestic_hire_success_rate > 0.0 && self.domestic_hire_success_rate <= 1.0) {
            return Err(format!(
                "domestic_hire_success_rate must be in (0, 1], got {}",
                self.domestic_hire_success_rate
            ));
        }
        if self.daily_profit_divisor <= 0.0 {
            return Err(format!(
                "daily_profit_divisor must be positive, got {}",
                self.daily_profit_divisor
            ));
        }
        let non_negative = [
            ("recruiting_cost_ratio", self.recruiting_cost_ratio),
            ("training_cost_fraction", self.training_cost_fraction),
            ("handover_vacancy_days", self.handover_vacancy_days),
            ("average_vacancy_days", self.average_vacancy_days),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be a finite value >= 0, got {value}"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomesticBreakdown {
    pub annual_salary: f64,
    pub turnover_rate: f64,
    pub nominal_recruiting_cost: f64,
    pub effective_recruiting_cost: f64,
    pub expected_turnovers: f64,
    pub initial_recruiting: f64,
    pub re_recruitment: f64,
    pub turnover_transition_loss: f64,
    pub vacancy_loss: f64,
}

impl DomesticBreakdown {
    pub fn total(&self) -> f64 {
        self.initial_recruiting + self.re_recruitment + self.turnover_transition_loss + self.vacancy_loss
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignBreakdown {
    pub nationality_factor: f64,
    pub turnover_rate: f64,
    pub expected_turnovers: f64,
    pub initial_cost: f64,
    pub recurring_cost: f64,
    pub re_recruitment: f64,
    pub vacancy_loss: f64,
}

impl ForeignBreakdown {
    pub fn total(&self) -> f64 {
        self.initial_cost + self.recurring_cost + self.re_recruitment + self.vacancy_loss
    }
}

/// One row of a like-for-like comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub component: &'static str,
    pub domestic: f64,
    pub foreign: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TcoComparison {
    pub candidate: VisaKey,
    pub job_category: JobCategory,
    pub headcount: u32,
    pub horizon_months: u32,
    pub nationality: Option<Nationality>,
    pub domestic_total: f64,
    pub foreign_total: f64,
    /// Domestic minus foreign; positive means the foreign hire is cheaper.
    pub difference: f64,
    pub domestic: DomesticBreakdown,
    pub foreign: ForeignBreakdown,
    pub assumptions: TcoAssumptions,
}

impl TcoComparison {
    pub fn rows(&self) -> Vec<ComparisonRow> {
        vec![
            ComparisonRow {
                component: "Initial hiring",
                domestic: self.domestic.initial_recruiting,
                foreign: self.foreign.initial_cost,
            },
            ComparisonRow {
                component: "Recurring fees",
                domestic: 0.0,
                foreign: self.foreign.recurring_cost,
            },
            ComparisonRow {
                component: "Re-recruitment after turnover",
                domestic: self.domestic.re_recruitment,
                foreign: self.foreign.re_recruitment,
            },
            ComparisonRow {
                component: "Turnover transition loss",
                domestic: self.domestic.turnover_transition_loss,
                foreign: 0.0,
            },
            ComparisonRow {
                component: "Vacancy loss",
                domestic: self.domestic.vacancy_loss,
                foreign: self.foreign.vacancy_loss,
            },
            ComparisonRow {
                component: "Total",
                domestic: self.domestic_total,
                foreign: self.foreign_total,
            },
        ]
    }
}

pub(crate) struct TcoInput<'a> {
    pub entry: &'a CatalogEntry,
    pub benchmark: &'a Benchmark,
    pub headcount: u32,
    pub horizon_months: u32,
    pub nationality: Option<Nationality>,
    pub nationality_factor: f64,
}

pub(crate) fn compare(
    input: TcoInput<'_>,
    assumptions: &TcoAssumptions,
) -> Result<TcoComparison, AdvisorError> {
    ensure_positive(input.headcount, input.horizon_months)?;

    let heads = f64::from(input.headcount);
    let years = f64::from(input.horizon_months) / 12.0;
    let benchmark = input.benchmark;

    let monthly_salary = benchmark.monthly_salary();
    let daily_profit = monthly_salary / assumptions.daily_profit_divisor;

    let nominal_recruiting_cost = benchmark.annual_salary * assumptions.recruiting_cost_ratio;
    let effective_recruiting_cost = nominal_recruiting_cost / assumptions.domestic_hire_success_rate;
    let domestic_turnovers = benchmark.turnover_rate * years * heads;

    let domestic = DomesticBreakdown {
        annual_salary: benchmark.annual_salary,
        turnover_rate: benchmark.turnover_rate,
        nominal_recruiting_cost,
        effective_recruiting_cost,
        expected_turnovers: domestic_turnovers,
        initial_recruiting: effective_recruiting_cost * heads,
        re_recruitment: effective_recruiting_cost * domestic_turnovers,
        turnover_transition_loss: (monthly_salary * assumptions.training_cost_fraction
            + daily_profit * assumptions.handover_vacancy_days)
            * domestic_turnovers,
        vacancy_loss: daily_profit * assumptions.average_vacancy_days * (heads + domestic_turnovers),
    };

    let schedule = &input.entry.costs;
    let one_time_per_head = schedule.one_time_min() * input.nationality_factor;
    let foreign_rate = input.entry.foreign_turnover.midpoint();
    let foreign_turnovers = foreign_rate * years * heads;
    let foreign_vacancy_loss = if assumptions.apply_foreign_vacancy_loss {
        daily_profit * assumptions.average_vacancy_days * (heads + foreign_turnovers)
    } else {
        0.0
    };

    let foreign = ForeignBreakdown {
        nationality_factor: input.nationality_factor,
        turnover_rate: foreign_rate,
        expected_turnovers: foreign_turnovers,
        initial_cost: one_time_per_head * heads,
        recurring_cost: schedule.monthly_min() * f64::from(input.horizon_months) * heads,
        re_recruitment: one_time_per_head * foreign_turnovers,
        vacancy_loss: foreign_vacancy_loss,
    };

    let domestic_total = domestic.total();
    let foreign_total = foreign.total();

    Ok(TcoComparison {
        candidate: input.entry.key.clone(),
        job_category: benchmark.job_category,
        headcount: input.headcount,
        horizon_months: input.horizon_months,
        nationality: input.nationality,
        domestic_total,
        foreign_total,
        difference: domestic_total - foreign_total,
        domestic,
        foreign,
        assumptions: *assumptions,
    })
}
