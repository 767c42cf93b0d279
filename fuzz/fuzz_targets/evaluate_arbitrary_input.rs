#![no_main]

use chrono::{NaiveDate, TimeDelta};
use libfuzzer_sys::fuzz_target;
use solar_tradeoff::core::generation_series::{GenerationSample, GenerationSeries};
use solar_tradeoff::core::trade_off::evaluate;
use solar_tradeoff::input::Input;

fuzz_target!(|input: Input| {
    let start = NaiveDate::from_ymd_opt(2016, 1, 1)
        .unwrap()
        .and_hms_opt(0, 10, 0)
        .unwrap();
    let series = GenerationSeries::new((0..72).map(|h| {
        GenerationSample::new(start + TimeDelta::hours(h), ((h % 24) as f64 / 24.).sin())
    }))
    .unwrap();
    let _ = evaluate(&series, &input.economic_parameters(), &input.panel_sizes);
});
