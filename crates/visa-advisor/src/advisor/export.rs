use super::cost::CostProjection;
use super::tco::TcoComparison;
use std::io::Write;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv output: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv output is not valid utf-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

fn amount(value: f64) -> String {
    format!("{value:.1}")
}

/// Like-for-like comparison table: one row per cost component.
pub fn write_tco_csv<W: Write>(comparison: &TcoComparison, writer: W) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["component", "domestic", "foreign"])?;
    for row in comparison.rows() {
        out.write_record([row.component.to_string(), amount(row.domestic), amount(row.foreign)])?;
    }
    out.flush()?;
    Ok(())
}

/// Line items of a projection followed by the aggregate rows.
pub fn write_cost_csv<W: Write>(projection: &CostProjection, writer: W) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["kind", "label", "min", "max", "note"])?;
    for line in &projection.one_time_lines {
        out.write_record([
            "one_time",
            line.label.as_str(),
            amount(line.min).as_str(),
            amount(line.max).as_str(),
            line.note.as_deref().unwrap_or(""),
        ])?;
    }
    for line in &projection.monthly_lines {
        out.write_record([
            "monthly",
            line.label.as_str(),
            amount(line.min).as_str(),
            amount(line.max).as_str(),
            line.note.as_deref().unwrap_or(""),
        ])?;
    }
    let horizon = format!("{} months", projection.horizon_months);
    out.write_record([
        "total",
        horizon.as_str(),
        amount(projection.total_min).as_str(),
        amount(projection.total_max).as_str(),
        "",
    ])?;
    out.flush()?;
    Ok(())
}

pub fn tco_csv_string(comparison: &TcoComparison) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_tco_csv(comparison, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

pub fn cost_csv_string(projection: &CostProjection) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_cost_csv(projection, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
