pub mod measurement;
pub mod raw;
pub mod strategy;
pub mod weather;

pub use measurement::Measurement;
pub use raw::{RawDataset, RawRecord};
pub use strategy::MissingStrategy;
pub use weather::{weekday_name, Observation, ObservationSet, WeatherRecord};
