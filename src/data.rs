//! Data loading and schema validation using Polars

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use polars::prelude::*;

use crate::error::{PersonaError, Result};

/// Columns the input CSV must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = ["COUNTRY", "SOURCE", "SEX", "AGE", "PRICE"];

/// Acquisition source of a customer (phone operating system).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Ios,
    Android,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Ios => "IOS",
            Source::Android => "ANDROID",
        }
    }
}

impl FromStr for Source {
    type Err = PersonaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "IOS" => Ok(Source::Ios),
            "ANDROID" => Ok(Source::Android),
            other => Err(PersonaError::Schema(format!(
                "unknown SOURCE value `{other}` (expected IOS or ANDROID)"
            ))),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer sex as recorded in the input data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "MALE",
            Sex::Female => "FEMALE",
        }
    }
}

impl FromStr for Sex {
    type Err = PersonaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "MALE" => Ok(Sex::Male),
            "FEMALE" => Ok(Sex::Female),
            other => Err(PersonaError::Schema(format!(
                "unknown SEX value `{other}` (expected MALE or FEMALE)"
            ))),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable transaction row from the input table.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub country: String,
    pub source: Source,
    pub sex: Sex,
    pub age: u32,
    pub price: f64,
}

/// Raw attributes of a prospective customer to classify.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub country: String,
    pub source: Source,
    pub sex: Sex,
    pub age: u32,
}

/// Load transaction records from a CSV file.
///
/// # Arguments
/// * `path` - Path to the CSV file with `COUNTRY,SOURCE,SEX,AGE,PRICE` columns
///
/// # Returns
/// * Validated `Record` rows, in file order
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let df = CsvReader::from_path(path.as_ref())?
        .has_header(true)
        .finish()?;

    let names = df.get_column_names();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !names.contains(c))
        .collect();
    if !missing.is_empty() {
        return Err(PersonaError::Schema(format!(
            "missing required columns: {}",
            missing.join(", ")
        )));
    }

    let country = df.column("COUNTRY")?.str()?.clone();
    let source = df.column("SOURCE")?.str()?.clone();
    let sex = df.column("SEX")?.str()?.clone();
    let age = df.column("AGE")?.cast(&DataType::Int64)?;
    let age = age.i64()?.clone();
    let price = df.column("PRICE")?.cast(&DataType::Float64)?;
    let price = price.f64()?.clone();

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let null_at = |col: &str| PersonaError::Schema(format!("row {i}: null {col} value"));

        let country = country.get(i).ok_or_else(|| null_at("COUNTRY"))?;
        let source: Source = source.get(i).ok_or_else(|| null_at("SOURCE"))?.parse()?;
        let sex: Sex = sex.get(i).ok_or_else(|| null_at("SEX"))?.parse()?;
        let age = age.get(i).ok_or_else(|| null_at("AGE"))?;
        let price = price.get(i).ok_or_else(|| null_at("PRICE"))?;

        let country = country.trim().to_uppercase();
        if country.is_empty() {
            return Err(PersonaError::Schema(format!("row {i}: empty COUNTRY value")));
        }
        if country.contains('_') {
            // Underscore is the key delimiter; allowing it here would break
            // key injectivity.
            return Err(PersonaError::Schema(format!(
                "row {i}: COUNTRY value `{country}` contains `_`"
            )));
        }
        if age < 0 {
            return Err(PersonaError::Schema(format!("row {i}: negative AGE {age}")));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(PersonaError::Schema(format!(
                "row {i}: invalid PRICE {price}"
            )));
        }

        records.push(Record {
            country,
            source,
            sex,
            age: age as u32,
            price,
        });
    }

    if records.is_empty() {
        return Err(PersonaError::Schema(
            "no data rows found in input file".to_string(),
        ));
    }

    Ok(records)
}
