pub mod columns;
pub mod csv_reader;
pub mod encoding;
pub mod extractor;
pub mod json_reader;

pub use columns::ColumnLayout;
pub use csv_reader::CsvReader;
pub use extractor::{Extractor, SourceFormat};
pub use json_reader::JsonReader;
