use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub const PATIENT_DATA_ENV: &str = "WAITINGTIMES_PATIENT_DATA";

/// An explicit path wins; otherwise `WAITINGTIMES_PATIENT_DATA` is read from
/// the environment (or a `.env` file).
pub fn resolve_input(path: Option<PathBuf>) -> Result<PathBuf> {
    if path.is_none() {
        dotenvy::dotenv().ok();
    }
    resolve_input_with(path, |key| env::var(key).ok())
}

fn resolve_input_with(
    path: Option<PathBuf>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<PathBuf> {
    if let Some(path) = path {
        return Ok(path);
    }
    lookup(PATIENT_DATA_ENV)
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .with_context(|| format!("no input path given and {PATIENT_DATA_ENV} is not set"))
}
