use crate::models::ObservationSet;
use crate::utils::constants::{MAX_VALID_TEMP, MIN_VALID_TEMP};
use chrono::NaiveDate;
use std::fmt;
use tracing::warn;

/// A row removed for an out-of-range temperature, kept for the audit trail
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureRejection {
    pub city: String,
    pub date: NaiveDate,
    pub temperature_2m_max: Option<f64>,
    pub temperature_2m_min: Option<f64>,
}

impl fmt::Display for TemperatureRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} max={} min={}",
            self.city,
            self.date,
            display_optional(self.temperature_2m_max),
            display_optional(self.temperature_2m_min)
        )
    }
}

fn display_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "missing".to_string(), |v| v.to_string())
}

/// Reject rows whose max or min temperature falls outside [-60, 60] °C
pub fn validate_temperature(mut set: ObservationSet) -> (ObservationSet, Vec<TemperatureRejection>) {
    let mut rejected = Vec::new();

    set.observations.retain(|o| {
        if o.temperature_in_range(MIN_VALID_TEMP, MAX_VALID_TEMP) {
            return true;
        }
        rejected.push(TemperatureRejection {
            city: o.city.clone(),
            date: o.date,
            temperature_2m_max: o.temperature_2m_max,
            temperature_2m_min: o.temperature_2m_min,
        });
        false
    });

    if !rejected.is_empty() {
        warn!("Rejected {} rows with invalid temperatures", rejected.len());
        for rejection in &rejected {
            warn!(
                city = %rejection.city,
                date = %rejection.date,
                "  REJECTED: {}",
                rejection
            );
        }
    }

    (set, rejected)
}

/// Reject rows with a negative value in any present precipitation column
pub fn validate_precipitation(mut set: ObservationSet) -> (ObservationSet, usize) {
    let before = set.observations.len();
    let columns = &set.columns;
    set.observations
        .retain(|o| !o.has_negative_precipitation(columns));

    let rejected = before - set.observations.len();
    if rejected > 0 {
        warn!("Rejected {} rows with negative precipitation", rejected);
    }
    (set, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Measurement, Observation};
    use std::collections::BTreeSet;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_validate_temperature_rejects_extreme() {
        let set = ObservationSet::with_all_columns(vec![
            Observation::new("berlin", day(1)).with_temperatures(7.3, 3.4),
            Observation::new("berlin", day(2)).with_temperatures(100.0, 2.5),
        ]);

        let (result, rejected) = validate_temperature(set);

        assert_eq!(result.len(), 1);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].date, day(2));
        assert_eq!(rejected[0].temperature_2m_max, Some(100.0));
        assert_eq!(rejected[0].to_string(), "berlin 2024-01-02 max=100 min=2.5");
    }

    #[test]
    fn test_validate_temperature_bounds_are_inclusive() {
        let set = ObservationSet::with_all_columns(vec![
            Observation::new("vostok", day(1)).with_temperatures(-60.0, -60.0),
            Observation::new("death_valley", day(1)).with_temperatures(60.0, 45.0),
            Observation::new("vostok", day(2)).with_temperatures(-50.0, -60.1),
        ]);
        let (result, rejected) = validate_temperature(set);
        assert_eq!(result.len(), 2);
        assert_eq!(rejected[0].city, "vostok");
    }

    #[test]
    fn test_validate_temperature_keeps_max_below_min() {
        let set = ObservationSet::with_all_columns(vec![
            Observation::new("berlin", day(1)).with_temperatures(1.0, 5.0),
        ]);
        let (result, rejected) = validate_temperature(set);
        assert_eq!(result.len(), 1);
        assert!(rejected.is_empty());
    }

    #[test]
    fn test_validate_temperature_passes_missing_values() {
        let set = ObservationSet::with_all_columns(vec![Observation::new("berlin", day(1))]);
        let (result, _) = validate_temperature(set);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_validate_precipitation_rejects_negative() {
        let set = ObservationSet::with_all_columns(vec![
            Observation::new("berlin", day(1))
                .with(Measurement::PrecipitationSum, 1.0)
                .with(Measurement::RainSum, 1.0)
                .with(Measurement::SnowfallSum, 0.0),
            Observation::new("berlin", day(2))
                .with(Measurement::PrecipitationSum, -5.0)
                .with(Measurement::RainSum, 1.0)
                .with(Measurement::SnowfallSum, 0.0),
        ]);

        let (result, rejected) = validate_precipitation(set);
        assert_eq!(result.len(), 1);
        assert_eq!(rejected, 1);
        assert_eq!(result.observations[0].date, day(1));
    }

    #[test]
    fn test_validate_precipitation_only_checks_present_columns() {
        let columns: BTreeSet<Measurement> = [Measurement::RainSum].into_iter().collect();
        let set = ObservationSet::new(
            columns,
            vec![Observation::new("berlin", day(1))
                .with(Measurement::RainSum, 0.2)
                .with(Measurement::SnowfallSum, -1.0)],
        );
        let (result, rejected) = validate_precipitation(set);
        assert_eq!(result.len(), 1);
        assert_eq!(rejected, 0);
    }
}
