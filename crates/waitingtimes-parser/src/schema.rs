use crate::errors::ImportError;

pub const EXPECTED_COLUMNS: [&str; 7] = [
    "PATIENT_ID",
    "ARRIVAL_DATE",
    "ARRIVAL_TIME",
    "SERVICE_DATE",
    "SERVICE_TIME",
    "DEPARTURE_DATE",
    "DEPARTURE_TIME",
];

pub const OUTPUT_COLUMNS: [&str; 10] = [
    "PATIENT_ID",
    "ARRIVAL_DATE",
    "ARRIVAL_TIME",
    "SERVICE_DATE",
    "SERVICE_TIME",
    "DEPARTURE_DATE",
    "DEPARTURE_TIME",
    "ARRIVAL_DATETIME",
    "SERVICE_DATETIME",
    "DEPARTURE_DATETIME",
];

/// Ordered, exact comparison against [`EXPECTED_COLUMNS`]. Missing, extra and
/// reordered columns are all rejected the same way.
pub fn validate_columns<S: AsRef<str>>(columns: &[S]) -> Result<(), ImportError> {
    let matches = columns.len() == EXPECTED_COLUMNS.len()
        && columns
            .iter()
            .zip(EXPECTED_COLUMNS.iter())
            .all(|(found, expected)| found.as_ref() == *expected);

    if matches {
        Ok(())
    } else {
        Err(ImportError::SchemaMismatch {
            actual: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            expected: EXPECTED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        })
    }
}
