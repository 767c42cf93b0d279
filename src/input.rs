use crate::core::trade_off::{EconomicParameters, PanelPrice};
use crate::provider::{PvTechnology, SiteParameters};
use serde::Deserialize;
use std::io::{BufReader, Read};

pub fn ingest(json: impl Read) -> Result<Input, anyhow::Error> {
    Ok(serde_json::from_reader(BufReader::new(json))?)
}

/// The configuration of one analysis run: the site the generation series is for, and the
/// economics of the candidate installations.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct Input {
    /// Latitude of the site in decimal degrees, north positive
    pub latitude: f64,
    /// Longitude of the site in decimal degrees, east positive
    pub longitude: f64,
    /// Tilt of the panels from horizontal, in degrees
    pub panel_angle: f64,
    /// Orientation of the panels, clockwise from north (north=0, east=90, south=180, west=270), in degrees
    pub panel_azimuth: f64,
    pub pv_tech: PvTechnology,
    /// Height of the horizon in degrees, at equally spaced directions clockwise from north
    pub horizon_data: Vec<f64>,
    /// Fraction of generation lost in cabling, soiling etc. before the inverter
    pub system_losses: f64,
    pub inverter_efficiency: f64,
    /// in W
    pub max_inverter_power: f64,
    pub panel_price: PanelPrice,
    pub energy_cost_per_kwh: f64,
    pub installation_costs: f64,
    pub subsidy_amount: f64,
    /// Candidate panel capacities in W
    pub panel_sizes: Vec<f64>,
    /// Fraction of the generated energy that earns nothing
    pub unused_energy: f64,
}

impl Input {
    pub fn site(&self) -> SiteParameters {
        SiteParameters {
            latitude: self.latitude,
            longitude: self.longitude,
            panel_angle: self.panel_angle,
            panel_azimuth: self.panel_azimuth,
            pv_tech: self.pv_tech,
            horizon_data: self.horizon_data.clone(),
            system_losses: self.system_losses,
        }
    }

    pub fn economic_parameters(&self) -> EconomicParameters {
        EconomicParameters {
            max_inverter_power: self.max_inverter_power,
            panel_price: self.panel_price.clone(),
            installation_cost: self.installation_costs,
            inverter_efficiency: self.inverter_efficiency,
            energy_cost_per_kwh: self.energy_cost_per_kwh,
            subsidy_amount: self.subsidy_amount,
            unused_energy_fraction: self.unused_energy,
        }
    }
}
