use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors that stop a trade-off evaluation before any result is produced.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TradeOffError {
    #[error("Invalid economic configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Unusable generation series: {0}")]
    Data(#[from] DataError),
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("price list size mismatch: {prices} panel prices were given for {sizes} panel sizes")]
    PriceListSizeMismatch { prices: usize, sizes: usize },
    #[error("{name} must be a fraction between 0 and 1, but was {value}")]
    FractionOutOfRange { name: &'static str, value: f64 },
    #[error("{name} must be a finite, non-negative number, but was {value}")]
    InvalidAmount { name: &'static str, value: f64 },
    #[error("panel size at index {index} must be a finite, non-negative number of watts, but was {value}")]
    InvalidPanelSize { index: usize, value: f64 },
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DataError {
    #[error("generation series contains no samples")]
    EmptySeries,
    #[error("timestamp {current} at index {index} does not come after the preceding timestamp {previous}")]
    NonIncreasingTimestamps {
        index: usize,
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },
    #[error("power value {value} at index {index} is not a finite, non-negative number")]
    InvalidPower { index: usize, value: f64 },
    #[error("generation series from {first} to {last} spans less than one whole day, so it cannot be annualised")]
    SpanTooShort {
        first: NaiveDateTime,
        last: NaiveDateTime,
    },
}
