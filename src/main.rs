extern crate solar_tradeoff;

use anyhow::Context;
use clap::Parser;
use solar_tradeoff::input::ingest;
use solar_tradeoff::output::FileOutput;
#[cfg(feature = "pvgis-api")]
use solar_tradeoff::provider::PvgisApiProvider;
use solar_tradeoff::provider::{PvgisFileProvider, PvgisRequest};
use solar_tradeoff::run_project;
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Default, Debug)]
#[clap(author, version, about, long_about = None)]
struct SolarTradeOffArgs {
    /// JSON file describing the site and the economics of the candidate installations
    input_file: String,
    /// PVGIS hourly export (JSON or CSV) for the site, normalised to 1 W of peak power. When
    /// left out, the series is requested from the PVGIS web API.
    #[arg(long, short)]
    series_file: Option<PathBuf>,
    /// Directory to write the reports to; defaults to the directory of the input file
    #[arg(long, short)]
    output_dir: Option<PathBuf>,
    /// Print the PVGIS request that produces a suitable series file, then exit
    #[arg(long, default_value_t = false)]
    print_pvgis_url: bool,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let args = SolarTradeOffArgs::parse();

    let input_file = args.input_file.as_str();
    let open_input = || {
        File::open(Path::new(input_file))
            .map(BufReader::new)
            .with_context(|| format!("Could not open input file {input_file}"))
    };

    if args.print_pvgis_url {
        let input = ingest(open_input()?)?;
        println!("{}", PvgisRequest::new(&input.site()).url());
        return Ok(());
    }

    let input_path = Path::new(input_file);
    let input_file_stem = input_path
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or(input_file);
    let output_dir = args.output_dir.clone().unwrap_or_else(|| {
        input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    });
    let output = FileOutput::new(output_dir, format!("{input_file_stem}__{{}}.csv"));

    let results = match args.series_file {
        Some(series_file) => run_project(
            open_input()?,
            &PvgisFileProvider::new(series_file),
            &output,
        )?,
        None => run_project(open_input()?, &pvgis_api_provider()?, &output)?,
    };

    for result in results.iter() {
        info!(
            "panel size {} W: {:.1} kWh/year, payback after {:.2} years",
            result.panel_size,
            result.annual_energy_generated,
            result.payback_time.as_years()
        );
    }

    Ok(())
}

#[cfg(feature = "pvgis-api")]
fn pvgis_api_provider() -> anyhow::Result<PvgisApiProvider> {
    PvgisApiProvider::new()
}

#[cfg(not(feature = "pvgis-api"))]
fn pvgis_api_provider() -> anyhow::Result<PvgisFileProvider> {
    anyhow::bail!("No --series-file given and this build cannot request series from PVGIS")
}
