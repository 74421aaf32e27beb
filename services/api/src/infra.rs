use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;
use visa_advisor::advisor::{RuleTables, VisaAdvisor};
use visa_advisor::config::AdvisorConfig;
use visa_advisor::error::AppError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) table_version: String,
}

/// Build the advisor from `--rules`, then `ADVISOR_RULES_PATH`, then the bundled tables.
pub(crate) fn load_advisor(
    rules: Option<PathBuf>,
    config: &AdvisorConfig,
) -> Result<VisaAdvisor, AppError> {
    let tables = match rules.or_else(|| config.rules_path.clone()) {
        Some(path) => {
            info!(path = %path.display(), "loading rule tables from file");
            RuleTables::from_path(&path)?
        }
        None => RuleTables::standard()?,
    };
    Ok(VisaAdvisor::new(tables).with_default_horizon_months(config.default_horizon_months))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Parse a snake_case option value into one of the advisor's enums.
pub(crate) fn parse_choice<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let value = serde_json::Value::String(raw.trim().to_ascii_lowercase().replace('-', "_"));
    serde_json::from_value(value).map_err(|_| format!("'{raw}' is not a recognized value"))
}
