use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::Measurement;

/// A typed daily observation for one city, after type normalization.
///
/// Every measurement is optional; `None` is "missing" and is never confused
/// with a legitimate zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub city: String,
    pub date: NaiveDate,
    pub precipitation_sum: Option<f64>,
    pub temperature_2m_max: Option<f64>,
    pub temperature_2m_min: Option<f64>,
    pub rain_sum: Option<f64>,
    pub snowfall_sum: Option<f64>,
    pub weather_code: Option<i32>,
    pub wind_speed_10m_max: Option<f64>,
}

impl Observation {
    pub fn new(city: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            city: city.into(),
            date,
            precipitation_sum: None,
            temperature_2m_max: None,
            temperature_2m_min: None,
            rain_sum: None,
            snowfall_sum: None,
            weather_code: None,
            wind_speed_10m_max: None,
        }
    }

    pub fn with(mut self, measurement: Measurement, value: f64) -> Self {
        self.set_value(measurement, Some(value));
        self
    }

    pub fn with_temperatures(mut self, max: f64, min: f64) -> Self {
        self.temperature_2m_max = Some(max);
        self.temperature_2m_min = Some(min);
        self
    }

    /// Read a measurement as a float, weather code included
    pub fn value(&self, measurement: Measurement) -> Option<f64> {
        match measurement {
            Measurement::PrecipitationSum => self.precipitation_sum,
            Measurement::Temperature2mMax => self.temperature_2m_max,
            Measurement::Temperature2mMin => self.temperature_2m_min,
            Measurement::RainSum => self.rain_sum,
            Measurement::SnowfallSum => self.snowfall_sum,
            Measurement::WeatherCode => self.weather_code.map(f64::from),
            Measurement::WindSpeed10mMax => self.wind_speed_10m_max,
        }
    }

    /// Write a measurement; the weather code is rounded to the nearest integer.
    pub fn set_value(&mut self, measurement: Measurement, value: Option<f64>) {
        match measurement {
            Measurement::PrecipitationSum => self.precipitation_sum = value,
            Measurement::Temperature2mMax => self.temperature_2m_max = value,
            Measurement::Temperature2mMin => self.temperature_2m_min = value,
            Measurement::RainSum => self.rain_sum = value,
            Measurement::SnowfallSum => self.snowfall_sum = value,
            Measurement::WeatherCode => self.weather_code = value.map(|v| v.round() as i32),
            Measurement::WindSpeed10mMax => self.wind_speed_10m_max = value,
        }
    }

    /// Count missing values among the given columns
    pub fn missing_count(&self, columns: &BTreeSet<Measurement>) -> usize {
        columns.iter().filter(|m| self.value(**m).is_none()).count()
    }

    pub fn has_missing(&self, columns: &BTreeSet<Measurement>) -> bool {
        columns.iter().any(|m| self.value(*m).is_none())
    }

    pub fn temperature_in_range(&self, min: f64, max: f64) -> bool {
        let range = min..=max;
        self.temperature_2m_max.map_or(true, |t| range.contains(&t))
            && self.temperature_2m_min.map_or(true, |t| range.contains(&t))
    }

    pub fn has_negative_precipitation(&self, columns: &BTreeSet<Measurement>) -> bool {
        Measurement::PRECIPITATION
            .iter()
            .filter(|m| columns.contains(m))
            .any(|m| self.value(*m).is_some_and(|v| v < 0.0))
    }
}

/// Typed rows plus the measurement columns present in the dataset.
#[derive(Debug, Clone, Default)]
pub struct ObservationSet {
    pub columns: BTreeSet<Measurement>,
    pub observations: Vec<Observation>,
}

impl ObservationSet {
    pub fn new(columns: BTreeSet<Measurement>, observations: Vec<Observation>) -> Self {
        Self {
            columns,
            observations,
        }
    }

    /// Build a set whose columns are every known measurement
    pub fn with_all_columns(observations: Vec<Observation>) -> Self {
        Self::new(Measurement::ALL.into_iter().collect(), observations)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// An observation with its derived columns, ready for persistence.
///
/// Derived values are computed here and only here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRecord {
    pub observation: Observation,
    temp_range: Option<f64>,
    month: u32,
    day_of_week: Weekday,
}

impl WeatherRecord {
    pub fn from_observation(observation: Observation) -> Self {
        let temp_range = match (observation.temperature_2m_max, observation.temperature_2m_min) {
            (Some(max), Some(min)) => Some(max - min),
            _ => None,
        };
        let month = observation.date.month();
        let day_of_week = observation.date.weekday();

        Self {
            observation,
            temp_range,
            month,
            day_of_week,
        }
    }

    pub fn city(&self) -> &str {
        &self.observation.city
    }

    pub fn date(&self) -> NaiveDate {
        self.observation.date
    }

    pub fn temp_range(&self) -> Option<f64> {
        self.temp_range
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day_of_week(&self) -> Weekday {
        self.day_of_week
    }

    pub fn day_of_week_name(&self) -> &'static str {
        weekday_name(self.day_of_week)
    }
}

/// Full English weekday name, e.g. "Monday"
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
