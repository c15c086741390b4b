use crate::error::CliError;
use engine_core::report::RunReport;

fn generate_report_json(report: &RunReport) -> Result<String, CliError> {
    let json = serde_json::to_string_pretty(report)?;
    Ok(json)
}

pub async fn write_report(report: &RunReport, path: String) -> Result<(), CliError> {
    let report_json = generate_report_json(report)?;
    tokio::fs::write(path, report_json).await?;
    Ok(())
}

pub fn print_report(report: &RunReport) -> Result<(), CliError> {
    let report_json = generate_report_json(report)?;
    println!("{report_json}");
    Ok(())
}
