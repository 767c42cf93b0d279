use crate::core::units::days_to_years;
use crate::errors::DataError;
use chrono::{NaiveDateTime, TimeDelta};

/// One hourly sample of generation potential.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationSample {
    pub timestamp: NaiveDateTime,
    /// Power output per W of installed panel capacity
    pub power: f64,
}

impl GenerationSample {
    pub fn new(timestamp: NaiveDateTime, power: f64) -> Self {
        Self { timestamp, power }
    }
}

/// An ordered, non-empty sequence of hourly samples with strictly increasing timestamps and
/// finite, non-negative power values normalised to 1 W of installed capacity.
///
/// The invariants are checked once on construction, after which the series is immutable.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationSeries {
    timestamps: Vec<NaiveDateTime>,
    power: Vec<f64>,
}

impl GenerationSeries {
    pub fn new(samples: impl IntoIterator<Item = GenerationSample>) -> Result<Self, DataError> {
        let samples = samples.into_iter();
        let (lower_bound, _) = samples.size_hint();
        let mut timestamps: Vec<NaiveDateTime> = Vec::with_capacity(lower_bound);
        let mut power = Vec::with_capacity(lower_bound);

        for (index, sample) in samples.enumerate() {
            if !sample.power.is_finite() || sample.power < 0. {
                return Err(DataError::InvalidPower {
                    index,
                    value: sample.power,
                });
            }
            if let Some(&previous) = timestamps.last() {
                if sample.timestamp <= previous {
                    return Err(DataError::NonIncreasingTimestamps {
                        index,
                        previous,
                        current: sample.timestamp,
                    });
                }
            }
            timestamps.push(sample.timestamp);
            power.push(sample.power);
        }

        if timestamps.is_empty() {
            return Err(DataError::EmptySeries);
        }

        Ok(Self { timestamps, power })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Always false for a constructed series, provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn power(&self) -> &[f64] {
        &self.power
    }

    pub fn samples(&self) -> impl Iterator<Item = GenerationSample> + '_ {
        self.timestamps
            .iter()
            .zip(self.power.iter())
            .map(|(&timestamp, &power)| GenerationSample { timestamp, power })
    }

    pub fn first_timestamp(&self) -> NaiveDateTime {
        self.timestamps[0]
    }

    pub fn last_timestamp(&self) -> NaiveDateTime {
        self.timestamps[self.timestamps.len() - 1]
    }

    /// Time elapsed between the first and the last sample
    pub fn span(&self) -> TimeDelta {
        self.last_timestamp() - self.first_timestamp()
    }

    /// Length of the observation window in years, counting only whole days of the span.
    ///
    /// A partial final day is dropped and a partial final year counts proportionally, so short
    /// series inflate any figure annualised with this value. A span shorter than one day yields
    /// zero years and is rejected.
    pub fn span_in_years(&self) -> Result<f64, DataError> {
        let whole_days = self.span().num_days();
        if whole_days == 0 {
            return Err(DataError::SpanTooShort {
                first: self.first_timestamp(),
                last: self.last_timestamp(),
            });
        }
        Ok(days_to_years(whole_days))
    }

    /// Years elapsed from the first sample to each sample, on the same whole-day basis as
    /// [`GenerationSeries::span_in_years`].
    pub fn years_since_start(&self) -> Vec<f64> {
        let first = self.first_timestamp();
        self.timestamps
            .iter()
            .map(|timestamp| days_to_years((*timestamp - first).num_days()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn hour(hours_from_start: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 1, 1)
            .unwrap()
            .and_hms_opt(0, 10, 0)
            .unwrap()
            + TimeDelta::hours(hours_from_start)
    }

    #[fixture]
    fn two_day_series() -> GenerationSeries {
        GenerationSeries::new((0..=48).map(|h| GenerationSample::new(hour(h), 0.1))).unwrap()
    }

    #[rstest]
    fn should_keep_samples_in_order(two_day_series: GenerationSeries) {
        assert_eq!(two_day_series.len(), 49);
        assert_eq!(two_day_series.first_timestamp(), hour(0));
        assert_eq!(two_day_series.last_timestamp(), hour(48));
        assert_eq!(
            two_day_series.samples().nth(3),
            Some(GenerationSample::new(hour(3), 0.1))
        );
    }

    #[rstest]
    fn should_reject_empty_series() {
        assert_eq!(
            GenerationSeries::new(Vec::new()),
            Err(DataError::EmptySeries)
        );
    }

    #[rstest]
    fn should_reject_repeated_timestamp() {
        let samples = vec![
            GenerationSample::new(hour(0), 0.),
            GenerationSample::new(hour(1), 0.),
            GenerationSample::new(hour(1), 0.),
        ];
        assert_eq!(
            GenerationSeries::new(samples),
            Err(DataError::NonIncreasingTimestamps {
                index: 2,
                previous: hour(1),
                current: hour(1),
            })
        );
    }

    #[rstest]
    #[case(-0.1)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn should_reject_invalid_power(#[case] power: f64) {
        let samples = vec![
            GenerationSample::new(hour(0), 0.),
            GenerationSample::new(hour(1), power),
        ];
        assert!(matches!(
            GenerationSeries::new(samples),
            Err(DataError::InvalidPower { index: 1, .. })
        ));
    }

    #[rstest]
    fn should_count_whole_days_of_span(two_day_series: GenerationSeries) {
        assert_relative_eq!(two_day_series.span_in_years().unwrap(), 2. / 365.);
    }

    #[rstest]
    fn should_drop_partial_final_day() {
        let series =
            GenerationSeries::new((0..8760).map(|h| GenerationSample::new(hour(h), 0.))).unwrap();
        assert_relative_eq!(series.span_in_years().unwrap(), 364. / 365.);
    }

    #[rstest]
    fn should_reject_series_shorter_than_a_day() {
        let series =
            GenerationSeries::new((0..24).map(|h| GenerationSample::new(hour(h), 0.))).unwrap();
        assert_eq!(
            series.span_in_years(),
            Err(DataError::SpanTooShort {
                first: hour(0),
                last: hour(23),
            })
        );
    }

    #[rstest]
    fn should_give_years_since_start_per_sample(two_day_series: GenerationSeries) {
        let years = two_day_series.years_since_start();
        assert_eq!(years.len(), two_day_series.len());
        assert_eq!(years[0], 0.);
        assert_eq!(years[23], 0.);
        assert_relative_eq!(years[24], 1. / 365.);
        assert_relative_eq!(years[48], 2. / 365.);
    }
}
