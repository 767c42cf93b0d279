#![no_main]

use libfuzzer_sys::fuzz_target;
use solar_tradeoff::read_pvgis_file::pvgis_csv_to_series;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let _ = pvgis_csv_to_series(Cursor::new(data));
});
