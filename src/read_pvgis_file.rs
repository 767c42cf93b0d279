use crate::core::generation_series::{GenerationSample, GenerationSeries};
use anyhow::{anyhow, Context};
use chrono::NaiveDateTime;
use csv::ReaderBuilder as CsvReaderBuilder;
use serde::Deserialize;
use std::io::{BufRead, BufReader, Read};

const PVGIS_TIME_FORMAT: &str = "%Y%m%d:%H%M";
const CSV_HEADER_START: &str = "time,";
const CSV_LATITUDE_LABEL: &str = "Latitude";
const CSV_LONGITUDE_LABEL: &str = "Longitude";

/// Location the export was calculated for, as reported by PVGIS
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct PvgisLocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug)]
pub struct PvgisExport {
    pub series: GenerationSeries,
    pub location: Option<PvgisLocation>,
}

#[derive(Debug, Deserialize)]
struct PvgisJsonExport {
    inputs: Option<PvgisJsonInputs>,
    outputs: PvgisJsonOutputs,
}

#[derive(Debug, Deserialize)]
struct PvgisJsonInputs {
    location: Option<PvgisLocation>,
}

#[derive(Debug, Deserialize)]
struct PvgisJsonOutputs {
    hourly: Vec<PvgisHourlyRow>,
}

#[derive(Debug, Deserialize)]
struct PvgisHourlyRow {
    time: String,
    #[serde(rename = "P")]
    power: f64,
}

impl PvgisHourlyRow {
    fn into_sample(self) -> anyhow::Result<GenerationSample> {
        let timestamp = NaiveDateTime::parse_from_str(&self.time, PVGIS_TIME_FORMAT)
            .with_context(|| format!("Invalid PVGIS timestamp '{}'", self.time))?;
        Ok(GenerationSample::new(timestamp, self.power))
    }
}

fn rows_to_series(rows: Vec<PvgisHourlyRow>) -> anyhow::Result<GenerationSeries> {
    let samples = rows
        .into_iter()
        .map(PvgisHourlyRow::into_sample)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(GenerationSeries::new(samples)?)
}

/// Read the JSON output of the PVGIS `seriescalc` tool with PV calculation enabled.
pub fn pvgis_json_to_series(file: impl Read) -> anyhow::Result<PvgisExport> {
    let export: PvgisJsonExport = serde_json::from_reader(BufReader::new(file))?;

    Ok(PvgisExport {
        series: rows_to_series(export.outputs.hourly)?,
        location: export.inputs.and_then(|inputs| inputs.location),
    })
}

/// Read the CSV output of the PVGIS `seriescalc` tool with PV calculation enabled.
///
/// The file starts with `label: value` metadata lines, followed by a header row beginning with
/// `time,` and the hourly rows. A blank line ends the data; the legend after it is ignored.
pub fn pvgis_csv_to_series(file: impl Read) -> anyhow::Result<PvgisExport> {
    let mut latitude: Option<f64> = None;
    let mut longitude: Option<f64> = None;
    let mut data_block = String::new();
    let mut in_data = false;

    for line in BufReader::new(file).lines() {
        let line = line?;
        let line = line.trim_end();
        if in_data {
            if line.is_empty() {
                break;
            }
            data_block.push_str(line);
            data_block.push('\n');
        } else if line.starts_with(CSV_HEADER_START) {
            in_data = true;
            data_block.push_str(line);
            data_block.push('\n');
        } else if line.starts_with(CSV_LATITUDE_LABEL) {
            latitude = Some(metadata_value(line)?);
        } else if line.starts_with(CSV_LONGITUDE_LABEL) {
            longitude = Some(metadata_value(line)?);
        }
    }

    if !in_data {
        return Err(anyhow!(
            "No hourly data found: expected a header row starting with '{CSV_HEADER_START}'"
        ));
    }

    let rows = CsvReaderBuilder::new()
        .flexible(true)
        .from_reader(data_block.as_bytes())
        .deserialize::<PvgisHourlyRow>()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PvgisExport {
        series: rows_to_series(rows)?,
        location: latitude
            .zip(longitude)
            .map(|(latitude, longitude)| PvgisLocation {
                latitude,
                longitude,
            }),
    })
}

fn metadata_value(line: &str) -> anyhow::Result<f64> {
    let (_, value) = line
        .rsplit_once(':')
        .ok_or_else(|| anyhow!("Malformed metadata line '{line}'"))?;
    value
        .trim()
        .parse()
        .with_context(|| format!("Malformed metadata line '{line}'"))
}
