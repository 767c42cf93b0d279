use crate::core::generation_series::GenerationSeries;
use crate::read_pvgis_file::{
    pvgis_csv_to_series, pvgis_json_to_series, PvgisExport, PvgisLocation,
};
#[cfg(feature = "pvgis-api")]
use anyhow::anyhow;
use anyhow::Context;
use serde::Deserialize;
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
#[cfg(feature = "pvgis-api")]
use std::time::Duration;
use tracing::{info, warn};

pub const PVGIS_API_URL: &str = "https://re.jrc.ec.europa.eu/api/v5_2/";
const PVGIS_START_YEAR: i32 = 2016;
const PVGIS_END_YEAR: i32 = 2020;
const PVGIS_RADIATION_DATABASE: &str = "PVGIS-SARAH2";
// 1 W of peak power, so that P comes back per installed W
const PVGIS_PEAK_POWER_KW: f64 = 0.001;
const PVGIS_MOUNTING_PLACE: &str = "building";
#[cfg(feature = "pvgis-api")]
const PVGIS_TIMEOUT_SECONDS: u64 = 60;

// PVGIS rounds the location it reports back
const LOCATION_TOLERANCE_DEGREES: f64 = 0.01;

/// Photovoltaic cell technology, named as PVGIS names it.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum PvTechnology {
    #[serde(rename = "crystSi")]
    CrystallineSilicon,
    #[serde(rename = "CIS")]
    CopperIndiumSelenide,
    #[serde(rename = "CdTe")]
    CadmiumTelluride,
    Unknown,
}

impl PvTechnology {
    pub fn pvgis_name(&self) -> &'static str {
        match self {
            PvTechnology::CrystallineSilicon => "crystSi",
            PvTechnology::CopperIndiumSelenide => "CIS",
            PvTechnology::CadmiumTelluride => "CdTe",
            PvTechnology::Unknown => "Unknown",
        }
    }
}

/// Where and how the panels are installed.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteParameters {
    pub latitude: f64,
    pub longitude: f64,
    /// Tilt from horizontal in degrees
    pub panel_angle: f64,
    /// Clockwise from north in degrees (south=180)
    pub panel_azimuth: f64,
    pub pv_tech: PvTechnology,
    /// Horizon heights in degrees, clockwise from north
    pub horizon_data: Vec<f64>,
    /// Fraction of generation lost before the inverter
    pub system_losses: f64,
}

/// A source of hourly generation per W of installed capacity for a site.
pub trait GenerationSeriesProvider {
    fn generation_series(&self, site: &SiteParameters) -> anyhow::Result<GenerationSeries>;
}

/// The PVGIS hourly series request for a site over the fixed historical window.
#[derive(Clone, Debug)]
pub struct PvgisRequest<'a> {
    site: &'a SiteParameters,
}

impl<'a> PvgisRequest<'a> {
    pub fn new(site: &'a SiteParameters) -> Self {
        Self { site }
    }

    pub fn query_parameters(&self) -> Vec<(&'static str, String)> {
        let site = self.site;
        let mut parameters = vec![
            ("lat", site.latitude.to_string()),
            ("lon", site.longitude.to_string()),
            ("startyear", PVGIS_START_YEAR.to_string()),
            ("endyear", PVGIS_END_YEAR.to_string()),
            ("raddatabase", PVGIS_RADIATION_DATABASE.to_string()),
            ("pvcalculation", "1".to_string()),
            ("peakpower", PVGIS_PEAK_POWER_KW.to_string()),
            ("loss", (site.system_losses * 100.).to_string()),
            ("angle", site.panel_angle.to_string()),
            // PVGIS measures the aspect from south, positive towards west
            ("aspect", (site.panel_azimuth - 180.).to_string()),
            ("pvtechchoice", site.pv_tech.pvgis_name().to_string()),
            ("mountingplace", PVGIS_MOUNTING_PLACE.to_string()),
            ("usehorizon", "1".to_string()),
            ("components", "0".to_string()),
            ("outputformat", "json".to_string()),
        ];
        if !site.horizon_data.is_empty() {
            parameters.push((
                "userhorizon",
                site.horizon_data
                    .iter()
                    .map(|height| height.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            ));
        }
        parameters
    }

    pub fn url(&self) -> String {
        let query = self
            .query_parameters()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{PVGIS_API_URL}seriescalc?{query}")
    }
}

/// Reads a PVGIS hourly export previously downloaded for the site. Files ending in `.json` are
/// read as the JSON export, anything else as the CSV export.
#[derive(Clone, Debug)]
pub struct PvgisFileProvider {
    path: PathBuf,
}

impl PvgisFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GenerationSeriesProvider for PvgisFileProvider {
    fn generation_series(&self, site: &SiteParameters) -> anyhow::Result<GenerationSeries> {
        info!("reading generation series from {}", self.path.display());
        let file = BufReader::new(
            File::open(&self.path)
                .with_context(|| format!("Could not open {}", self.path.display()))?,
        );
        let is_json = self
            .path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
        let PvgisExport { series, location } = if is_json {
            pvgis_json_to_series(file)
        } else {
            pvgis_csv_to_series(file)
        }
        .with_context(|| format!("Could not parse PVGIS export {}", self.path.display()))?;

        warn_on_location_mismatch(location, site);

        info!(
            "read {} samples from {} to {}",
            series.len(),
            series.first_timestamp(),
            series.last_timestamp()
        );
        Ok(series)
    }
}

fn warn_on_location_mismatch(location: Option<PvgisLocation>, site: &SiteParameters) {
    if let Some(location) = location {
        if (location.latitude - site.latitude).abs() > LOCATION_TOLERANCE_DEGREES
            || (location.longitude - site.longitude).abs() > LOCATION_TOLERANCE_DEGREES
        {
            warn!(
                "PVGIS series is for {}, {} but the configured site is at {}, {}",
                location.latitude, location.longitude, site.latitude, site.longitude
            );
        }
    }
}

/// Requests the hourly series for the site from the PVGIS web API.
#[cfg(feature = "pvgis-api")]
#[derive(Clone, Debug)]
pub struct PvgisApiProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

#[cfg(feature = "pvgis-api")]
impl PvgisApiProvider {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_base_url(PVGIS_API_URL)
    }

    /// Use another PVGIS-compatible endpoint; `base_url` must end with a slash.
    pub fn with_base_url(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(PVGIS_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[cfg(feature = "pvgis-api")]
impl GenerationSeriesProvider for PvgisApiProvider {
    fn generation_series(&self, site: &SiteParameters) -> anyhow::Result<GenerationSeries> {
        let url = format!("{}seriescalc", self.base_url);
        info!(
            "requesting generation series for {}, {} from {url}",
            site.latitude, site.longitude
        );
        let response = self
            .client
            .get(&url)
            .query(&PvgisRequest::new(site).query_parameters())
            .send()
            .with_context(|| format!("PVGIS request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!("PVGIS responded with {status}: {body}"));
        }

        let PvgisExport { series, location } =
            pvgis_json_to_series(response).context("Could not parse PVGIS response")?;
        warn_on_location_mismatch(location, site);

        info!(
            "received {} samples from {} to {}",
            series.len(),
            series.first_timestamp(),
            series.last_timestamp()
        );
        Ok(series)
    }
}

/// A provider handing out a series that is already in memory.
#[derive(Clone, Debug)]
pub struct InMemoryProvider(pub GenerationSeries);

impl GenerationSeriesProvider for InMemoryProvider {
    fn generation_series(&self, _site: &SiteParameters) -> anyhow::Result<GenerationSeries> {
        Ok(self.0.clone())
    }
}
