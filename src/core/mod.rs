pub mod generation_series;
pub mod trade_off;
pub mod units;
