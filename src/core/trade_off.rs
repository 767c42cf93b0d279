use crate::core::generation_series::GenerationSeries;
use crate::core::units::{watt_hours_to_kilowatt_hours, WATTS_PER_KILOWATT};
use crate::errors::{ConfigurationError, TradeOffError};
use fsum::FSum;
use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, info};

/// Price of the panels, either per W of capacity or as one absolute price per candidate size.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(untagged)]
pub enum PanelPrice {
    /// Cost per W of installed capacity
    Scalar(f64),
    /// Absolute cost of each candidate panel size, in the same order as the sizes
    PerSize(Vec<f64>),
}

impl PanelPrice {
    fn validate(&self, panel_sizes: &[f64]) -> Result<(), ConfigurationError> {
        match self {
            PanelPrice::Scalar(price_per_watt) => {
                check_amount("panel price", *price_per_watt)?;
            }
            PanelPrice::PerSize(prices) => {
                if prices.len() != panel_sizes.len() {
                    return Err(ConfigurationError::PriceListSizeMismatch {
                        prices: prices.len(),
                        sizes: panel_sizes.len(),
                    });
                }
                for price in prices {
                    check_amount("panel price", *price)?;
                }
            }
        }
        Ok(())
    }

    /// Cost of the panels alone for the size at `size_index`.
    ///
    /// Only valid once the price has been validated against the panel sizes.
    fn panel_cost(&self, size_index: usize, panel_size: f64) -> f64 {
        match self {
            PanelPrice::Scalar(price_per_watt) => panel_size * price_per_watt,
            PanelPrice::PerSize(prices) => prices[size_index],
        }
    }
}

/// The economic inputs shared by every candidate panel size.
#[derive(Clone, Debug, PartialEq)]
pub struct EconomicParameters {
    /// Maximum power the inverter passes through, in W
    pub max_inverter_power: f64,
    pub panel_price: PanelPrice,
    /// One-off cost added to every installation regardless of size
    pub installation_cost: f64,
    /// Fraction of the DC power converted to usable AC power
    pub inverter_efficiency: f64,
    pub energy_cost_per_kwh: f64,
    /// One-off amount offset against the initial cost
    pub subsidy_amount: f64,
    /// Fraction of the generated energy that earns nothing (curtailed or lost to self-consumption)
    pub unused_energy_fraction: f64,
}

impl EconomicParameters {
    pub fn validate(&self, panel_sizes: &[f64]) -> Result<(), ConfigurationError> {
        self.panel_price.validate(panel_sizes)?;
        check_amount("maximum inverter power", self.max_inverter_power)?;
        check_amount("installation cost", self.installation_cost)?;
        check_amount("energy cost per kWh", self.energy_cost_per_kwh)?;
        check_amount("subsidy amount", self.subsidy_amount)?;
        check_fraction("inverter efficiency", self.inverter_efficiency)?;
        check_fraction("unused energy fraction", self.unused_energy_fraction)?;

        for (index, panel_size) in panel_sizes.iter().enumerate() {
            if !panel_size.is_finite() || *panel_size < 0. {
                return Err(ConfigurationError::InvalidPanelSize {
                    index,
                    value: *panel_size,
                });
            }
        }

        Ok(())
    }

    /// Income earned per Wh passing the inverter cap, in currency per Wh.
    fn income_per_watt_hour(&self) -> f64 {
        self.inverter_efficiency * self.energy_cost_per_kwh * (1. - self.unused_energy_fraction)
            / WATTS_PER_KILOWATT as f64
    }
}

fn check_amount(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && value >= 0. {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidAmount { name, value })
    }
}

fn check_fraction(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if (0. ..=1.).contains(&value) {
        Ok(())
    } else {
        Err(ConfigurationError::FractionOutOfRange { name, value })
    }
}

/// Time needed for the income to pay back the part of the initial cost not covered by the subsidy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaybackTime {
    Years(f64),
    /// The installation earns nothing, so an uncovered cost is never paid back
    Unreachable,
}

impl PaybackTime {
    fn new(uncovered_cost: f64, annual_income: f64) -> Self {
        if uncovered_cost == 0. {
            PaybackTime::Years(0.)
        } else if annual_income > 0. {
            PaybackTime::Years(uncovered_cost / annual_income)
        } else {
            PaybackTime::Unreachable
        }
    }

    /// Payback time in years, with an unreachable payback as positive infinity.
    pub fn as_years(&self) -> f64 {
        match self {
            PaybackTime::Years(years) => *years,
            PaybackTime::Unreachable => f64::INFINITY,
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, PaybackTime::Years(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TradeOffResult {
    /// Installed panel capacity in W
    pub panel_size: f64,
    /// Panels plus installation, before the subsidy
    pub initial_cost: f64,
    /// Energy sold or used per year, in kWh
    pub annual_energy_generated: f64,
    pub payback_time: PaybackTime,
    /// Cumulative cash balance at each timestamp of the generation series
    pub balance_trajectory: Vec<f64>,
}

/// Results for every candidate panel size, in the order the sizes were given.
#[derive(Clone, Debug, PartialEq)]
pub struct TradeOffResults {
    results: Vec<TradeOffResult>,
    observation_years: f64,
}

impl TradeOffResults {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TradeOffResult> {
        self.results.iter()
    }

    pub fn get(&self, index: usize) -> Option<&TradeOffResult> {
        self.results.get(index)
    }

    /// Length in years of the series the results were annualised over
    pub fn observation_years(&self) -> f64 {
        self.observation_years
    }

    pub fn annual_energy_generated(&self) -> Vec<f64> {
        self.iter()
            .map(|result| result.annual_energy_generated)
            .collect()
    }

    pub fn payback_times(&self) -> Vec<PaybackTime> {
        self.iter().map(|result| result.payback_time).collect()
    }

    pub fn balance_trajectories(&self) -> Vec<&[f64]> {
        self.iter()
            .map(|result| result.balance_trajectory.as_slice())
            .collect()
    }

    pub fn into_inner(self) -> Vec<TradeOffResult> {
        self.results
    }
}

/// Calculate annual energy yield, payback time and balance trajectory for each panel size.
///
/// Arguments:
/// * `series` - hourly generation per W of installed capacity
/// * `params` - economic inputs shared by all sizes
/// * `panel_sizes` - candidate panel capacities in W
///
/// Every input is validated before anything is computed, so either all results are returned
/// or none are.
pub fn evaluate(
    series: &GenerationSeries,
    params: &EconomicParameters,
    panel_sizes: &[f64],
) -> Result<TradeOffResults, TradeOffError> {
    params.validate(panel_sizes)?;
    let observation_years = series.span_in_years()?;

    info!(
        "evaluating {} panel sizes against {} samples covering {observation_years:.2} years",
        panel_sizes.len(),
        series.len(),
    );

    let results = panel_sizes
        .par_iter()
        .enumerate()
        .map(|(size_index, &panel_size)| {
            evaluate_panel_size(series, params, size_index, panel_size, observation_years)
        })
        .collect();

    Ok(TradeOffResults {
        results,
        observation_years,
    })
}

fn evaluate_panel_size(
    series: &GenerationSeries,
    params: &EconomicParameters,
    size_index: usize,
    panel_size: f64,
    observation_years: f64,
) -> TradeOffResult {
    // generation above the inverter's ceiling is clipped and lost
    let energy_per_hour: Vec<f64> = series
        .power()
        .iter()
        .map(|power| (panel_size * power).min(params.max_inverter_power))
        .collect();

    let initial_cost =
        params.panel_price.panel_cost(size_index, panel_size) + params.installation_cost;

    // a subsidy larger than the cost is not credited as a surplus
    let starting_balance = (params.subsidy_amount - initial_cost).min(0.);
    let income_per_watt_hour = params.income_per_watt_hour();
    let mut balance = starting_balance;
    let balance_trajectory = energy_per_hour
        .iter()
        .map(|energy| {
            let balance_at_start_of_hour = balance;
            balance += energy * income_per_watt_hour;
            balance_at_start_of_hour
        })
        .collect();

    let total_energy = FSum::with_all(energy_per_hour.iter()).value()
        * params.inverter_efficiency
        * (1. - params.unused_energy_fraction);
    let annual_energy_generated = watt_hours_to_kilowatt_hours(total_energy) / observation_years;

    let uncovered_cost = (initial_cost - params.subsidy_amount).max(0.);
    let payback_time = PaybackTime::new(
        uncovered_cost,
        annual_energy_generated * params.energy_cost_per_kwh,
    );

    debug!(
        "panel size {panel_size} W: {annual_energy_generated:.1} kWh/year, initial cost {initial_cost:.2}, payback {payback_time:?}"
    );

    TradeOffResult {
        panel_size,
        initial_cost,
        annual_energy_generated,
        payback_time,
        balance_trajectory,
    }
}
