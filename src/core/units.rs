pub const WATTS_PER_KILOWATT: u32 = 1_000;
pub const HOURS_PER_DAY: u32 = 24;
pub const DAYS_PER_YEAR: u32 = 365;

/// Convert a number of whole days into years of 365 days. Leap days are not special-cased, so a
/// span covering a leap year comes out slightly longer than a calendar year.
pub fn days_to_years(days: i64) -> f64 {
    days as f64 / DAYS_PER_YEAR as f64
}

/// Convert an energy amount in Wh into kWh.
pub fn watt_hours_to_kilowatt_hours(energy: f64) -> f64 {
    energy / WATTS_PER_KILOWATT as f64
}
