use serde::{Deserialize, Serialize};
use std::fmt;

/// Measurement columns understood by the pipeline, in storage column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    PrecipitationSum,
    #[serde(rename = "temperature_2m_max")]
    Temperature2mMax,
    #[serde(rename = "temperature_2m_min")]
    Temperature2mMin,
    RainSum,
    SnowfallSum,
    WeatherCode,
    #[serde(rename = "wind_speed_10m_max")]
    WindSpeed10mMax,
}

impl Measurement {
    pub const ALL: [Measurement; 7] = [
        Measurement::PrecipitationSum,
        Measurement::Temperature2mMax,
        Measurement::Temperature2mMin,
        Measurement::RainSum,
        Measurement::SnowfallSum,
        Measurement::WeatherCode,
        Measurement::WindSpeed10mMax,
    ];

    /// Columns that must never hold a negative value
    pub const PRECIPITATION: [Measurement; 3] = [
        Measurement::PrecipitationSum,
        Measurement::RainSum,
        Measurement::SnowfallSum,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            Measurement::PrecipitationSum => "precipitation_sum",
            Measurement::Temperature2mMax => "temperature_2m_max",
            Measurement::Temperature2mMin => "temperature_2m_min",
            Measurement::RainSum => "rain_sum",
            Measurement::SnowfallSum => "snowfall_sum",
            Measurement::WeatherCode => "weather_code",
            Measurement::WindSpeed10mMax => "wind_speed_10m_max",
        }
    }

    /// Look up a measurement by its cleaned column name
    pub fn from_column_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.column_name() == name)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Measurement::WeatherCode)
    }

    pub fn is_precipitation(&self) -> bool {
        Self::PRECIPITATION.contains(self)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}
