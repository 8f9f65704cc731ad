pub mod datetime;
pub mod errors;
mod import;
pub mod model;
pub mod schema;

pub use datetime::{parse_day_first, DateTimeLayout};
pub use errors::ImportError;
pub use import::import_patient_data;
pub use model::EventPrefix;
pub use schema::{validate_columns, EXPECTED_COLUMNS, OUTPUT_COLUMNS};
