#![no_main]

use chrono::{NaiveDate, TimeDelta};
use libfuzzer_sys::fuzz_target;
use solar_tradeoff::core::generation_series::{GenerationSample, GenerationSeries};
use solar_tradeoff::output::Output;
use solar_tradeoff::provider::InMemoryProvider;
use solar_tradeoff::run_project;
use std::io;
use std::io::{BufReader, Cursor, Write};

fuzz_target!(|data: &[u8]| {
    let start = NaiveDate::from_ymd_opt(2016, 1, 1)
        .unwrap()
        .and_hms_opt(0, 10, 0)
        .unwrap();
    let series = GenerationSeries::new(
        (0..48).map(|h| GenerationSample::new(start + TimeDelta::hours(h), 0.25)),
    )
    .unwrap();
    let _run = run_project(
        BufReader::new(Cursor::new(data)),
        &InMemoryProvider(series),
        SinkOutput::default(),
    );
});

/// An output that goes to nowhere/ a "sink"/ /dev/null.
#[derive(Debug, Default)]
pub struct SinkOutput;

impl Output for SinkOutput {
    fn writer_for_report(&self, _report_key: &str) -> anyhow::Result<impl Write> {
        Ok(io::sink())
    }

    fn is_noop(&self) -> bool {
        // report as a real output so fuzzing exercises the report writers
        false
    }
}
