//! Averages of the generation series used for presenting how generation varies over a day in each
//! season. None of this feeds the trade-off engine.
use crate::core::generation_series::GenerationSeries;
use crate::core::units::HOURS_PER_DAY;
use chrono::{Datelike, Timelike};
use indexmap::IndexMap;
use statrs::statistics::Statistics;
use strum::{Display, EnumIter, IntoEnumIterator};

/// Meteorological seasons of the northern hemisphere
#[derive(Clone, Copy, Debug, Display, EnumIter, Eq, Hash, PartialEq)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Season of a month numbered 1 (January) to 12
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }
}

/// Mean generation per W of capacity for each hour of the day, by season. An hour with no
/// samples in that season has no value.
pub type GenerationProfile = IndexMap<Season, Vec<Option<f64>>>;

/// Group the samples of the series by season and hour of day and average each group. Seasons
/// with no samples at all are left out; the others are in calendar order starting with winter.
pub fn average_generation_profile(series: &GenerationSeries) -> GenerationProfile {
    let mut grouped: IndexMap<Season, Vec<Vec<f64>>> = Season::iter()
        .map(|season| (season, vec![vec![]; HOURS_PER_DAY as usize]))
        .collect();

    for sample in series.samples() {
        let season = Season::from_month(sample.timestamp.month());
        grouped[&season][sample.timestamp.hour() as usize].push(sample.power);
    }

    grouped
        .into_iter()
        .filter(|(_, hours)| hours.iter().any(|samples| !samples.is_empty()))
        .map(|(season, hours)| {
            let means = hours
                .iter()
                .map(|samples| (!samples.is_empty()).then(|| samples.iter().mean()))
                .collect();
            (season, means)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generation_series::GenerationSample;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn at(month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, month, day)
            .unwrap()
            .and_hms_opt(hour, 10, 0)
            .unwrap()
    }

    #[rstest]
    #[case(12, Season::Winter)]
    #[case(1, Season::Winter)]
    #[case(2, Season::Winter)]
    #[case(3, Season::Spring)]
    #[case(5, Season::Spring)]
    #[case(6, Season::Summer)]
    #[case(8, Season::Summer)]
    #[case(9, Season::Fall)]
    #[case(11, Season::Fall)]
    fn should_map_month_to_season(#[case] month: u32, #[case] season: Season) {
        assert_eq!(Season::from_month(month), season);
    }

    #[rstest]
    fn should_average_by_season_and_hour() {
        let series = GenerationSeries::new(vec![
            GenerationSample::new(at(1, 1, 12), 0.2),
            GenerationSample::new(at(1, 2, 12), 0.4),
            GenerationSample::new(at(2, 1, 13), 0.1),
            GenerationSample::new(at(7, 1, 12), 0.6),
            GenerationSample::new(at(7, 2, 12), 0.8),
            GenerationSample::new(at(12, 1, 12), 0.3),
        ])
        .unwrap();

        let profile = average_generation_profile(&series);

        assert_eq!(
            profile.keys().copied().collect::<Vec<_>>(),
            vec![Season::Winter, Season::Summer]
        );
        let winter = &profile[&Season::Winter];
        assert_eq!(winter.len(), 24);
        assert_relative_eq!(winter[12].unwrap(), 0.3, max_relative = 1e-12);
        assert_relative_eq!(winter[13].unwrap(), 0.1, max_relative = 1e-12);
        assert_eq!(winter[0], None);
        assert_relative_eq!(
            profile[&Season::Summer][12].unwrap(),
            0.7,
            max_relative = 1e-12
        );
    }

    #[rstest]
    fn should_display_season_names() {
        assert_eq!(
            Season::iter().map(|season| season.to_string()).collect::<Vec<_>>(),
            vec!["Winter", "Spring", "Summer", "Fall"]
        );
    }
}
