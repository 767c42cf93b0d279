pub mod core;
pub mod errors;
pub mod input;
pub mod output;
pub mod provider;
pub mod read_pvgis_file;
pub mod statistics;


use crate::core::generation_series::GenerationSeries;
use crate::core::trade_off::{evaluate, TradeOffResults};
use crate::input::ingest;
use crate::output::Output;
use crate::provider::GenerationSeriesProvider;
use crate::statistics::average_generation_profile;
use csv::WriterBuilder;
use std::borrow::Cow;
use std::io::Read;
use tracing::info;

pub use crate::core::trade_off::{EconomicParameters, PanelPrice, PaybackTime, TradeOffResult};
pub use crate::errors::{ConfigurationError, DataError, TradeOffError};

pub const SUMMARY_REPORT_KEY: &str = "summary";
pub const BALANCE_REPORT_KEY: &str = "balance";
pub const GENERATION_PROFILE_REPORT_KEY: &str = "generation_profile";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Run one analysis: read the configuration, obtain the generation series for the configured
/// site, evaluate every panel size and write the reports.
pub fn run_project(
    input: impl Read,
    provider: &impl GenerationSeriesProvider,
    output: impl Output,
) -> Result<TradeOffResults, anyhow::Error> {
    let input = ingest(input)?;
    let series = provider.generation_series(&input.site())?;
    let results = evaluate(&series, &input.economic_parameters(), &input.panel_sizes)?;

    if !output.is_noop() {
        write_reports(&output, &results, &series)?;
    }

    Ok(results)
}

/// Write the summary, balance and generation profile reports for a set of results.
pub fn write_reports(
    output: &impl Output,
    results: &TradeOffResults,
    series: &GenerationSeries,
) -> Result<(), anyhow::Error> {
    write_summary_report(output, results)?;
    write_balance_report(output, results, series)?;
    write_generation_profile_report(output, series)?;
    Ok(())
}

fn write_summary_report(output: &impl Output, results: &TradeOffResults) -> anyhow::Result<()> {
    info!("writing out to {SUMMARY_REPORT_KEY}");
    let writer = output.writer_for_report(SUMMARY_REPORT_KEY)?;
    let mut writer = WriterBuilder::new().from_writer(writer);

    writer.write_record([
        "Panel size",
        "Initial cost",
        "Energy generated",
        "Payback time",
    ])?;
    writer.write_record(["[W]", "[currency]", "[kWh/year]", "[years]"])?;
    for result in results.iter() {
        writer.write_record([
            result.panel_size.to_string(),
            result.initial_cost.to_string(),
            result.annual_energy_generated.to_string(),
            result.payback_time.as_years().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_balance_report(
    output: &impl Output,
    results: &TradeOffResults,
    series: &GenerationSeries,
) -> anyhow::Result<()> {
    info!("writing out to {BALANCE_REPORT_KEY}");
    let writer = output.writer_for_report(BALANCE_REPORT_KEY)?;
    let mut writer = WriterBuilder::new().from_writer(writer);

    let mut headings: Vec<Cow<'static, str>> = vec!["Timestamp".into(), "Years since start".into()];
    let mut units_row = vec!["[UTC]", "[years]"];
    for result in results.iter() {
        headings.push(format!("Panel size: {} W", result.panel_size).into());
        units_row.push("[currency]");
    }
    writer.write_record(headings.iter().map(|heading| heading.as_ref()))?;
    writer.write_record(&units_row)?;

    let trajectories = results.balance_trajectories();
    for (t_idx, (timestamp, years_since_start)) in series
        .timestamps()
        .iter()
        .zip(series.years_since_start())
        .enumerate()
    {
        let mut row: Vec<String> = vec![
            timestamp.format(TIMESTAMP_FORMAT).to_string(),
            years_since_start.to_string(),
        ];
        row.extend(
            trajectories
                .iter()
                .map(|trajectory| trajectory[t_idx].to_string()),
        );
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

fn write_generation_profile_report(
    output: &impl Output,
    series: &GenerationSeries,
) -> anyhow::Result<()> {
    info!("writing out to {GENERATION_PROFILE_REPORT_KEY}");
    let writer = output.writer_for_report(GENERATION_PROFILE_REPORT_KEY)?;
    let mut writer = WriterBuilder::new().from_writer(writer);

    let profile = average_generation_profile(series);
    let mut headings = vec!["Hour of the day".to_string()];
    headings.extend(profile.keys().map(|season| season.to_string()));
    writer.write_record(&headings)?;

    let mut units_row = vec!["[hour]"];
    units_row.extend(profile.keys().map(|_| "[W/W]"));
    writer.write_record(&units_row)?;

    let hours_per_day = profile.values().next().map_or(0, Vec::len);
    for hour in 0..hours_per_day {
        let mut row = vec![hour.to_string()];
        row.extend(
            profile
                .values()
                .map(|means| means[hour].map(|mean| mean.to_string()).unwrap_or_default()),
        );
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}
