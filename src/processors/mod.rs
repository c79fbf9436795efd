pub mod cleaning;
pub mod enrichment;
pub mod missing_values;
pub mod transformer;
pub mod validation;

pub use cleaning::{cast_types, parse_strict_date, remove_duplicates, strip_provenance};
pub use enrichment::add_computed_columns;
pub use missing_values::{handle_missing_values, MissingValueSummary};
pub use transformer::{TransformReport, Transformer};
pub use validation::{validate_precipitation, validate_temperature, TemperatureRejection};
