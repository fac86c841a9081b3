//! Command-line interface definitions and argument parsing

use clap::Parser;

use crate::data::Profile;
use crate::error::{PersonaError, Result};

/// Customer persona segmentation CLI: rule-based revenue tiers from
/// country, source, sex, and age band
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV file
    #[arg(short, long, default_value = "data/persona.csv")]
    pub input: String,

    /// Output path for the segment chart
    #[arg(short, long, default_value = "segment_plot.png")]
    pub output: String,

    /// Classify a single profile as a comma-separated string.
    /// Example: --predict "FRA,ANDROID,MALE,31"
    #[arg(short, long)]
    pub predict: Option<String>,

    /// Prompt for a profile on stdin instead of passing --predict
    #[arg(long)]
    pub interactive: bool,

    /// Skip chart generation in pipeline mode
    #[arg(long)]
    pub no_charts: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse the profile from the predict string.
    /// Expected format: "country,source,sex,age"
    pub fn parse_profile(&self) -> Result<Option<Profile>> {
        let Some(ref predict_str) = self.predict else {
            return Ok(None);
        };

        let parts: Vec<&str> = predict_str.split(',').collect();
        if parts.len() != 4 {
            return Err(PersonaError::Schema(
                "predict values must be in format 'country,source,sex,age'".to_string(),
            ));
        }

        let country = parts[0].trim().to_uppercase();
        if country.is_empty() || country.contains('_') {
            return Err(PersonaError::Schema(format!(
                "invalid country value: {}",
                parts[0]
            )));
        }
        let source = parts[1].parse()?;
        let sex = parts[2].parse()?;
        let age: u32 = parts[3]
            .trim()
            .parse()
            .map_err(|_| PersonaError::Schema(format!("invalid age value: {}", parts[3])))?;

        Ok(Some(Profile {
            country,
            source,
            sex,
            age,
        }))
    }
}
