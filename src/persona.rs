//! Persona keys, aggregation, and the segment lookup table

use std::collections::HashMap;

use crate::binning::AgeBins;
use crate::data::{Profile, Record, Sex, Source};
use crate::error::{PersonaError, Result};
use crate::segment::{assign_segments, Segment};

/// Delimiter joining key components. Country values are validated at
/// ingestion to never contain it; the age band is the final component, so
/// its internal underscore cannot create collisions.
pub const KEY_DELIMITER: char = '_';

/// The four attributes that define a persona, with named fields so the key
/// component order can never silently change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonaAttrs {
    pub country: String,
    pub source: Source,
    pub sex: Sex,
    pub age_band: String,
}

impl PersonaAttrs {
    /// Canonical key: uppercased components joined with `_`, e.g.
    /// `BRA_ANDROID_MALE_19_23`.
    pub fn key(&self) -> String {
        format!(
            "{}{d}{}{d}{}{d}{}",
            self.country.to_uppercase(),
            self.source.as_str(),
            self.sex.as_str(),
            self.age_band,
            d = KEY_DELIMITER
        )
    }
}

/// A persona and its mean price, before tier assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonaAggregate {
    pub key: String,
    pub mean_price: f64,
}

/// One row of the final lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonaRow {
    pub key: String,
    pub mean_price: f64,
    pub segment: Segment,
}

/// Group records by persona key and take the arithmetic mean of price per
/// group. Every key in the output is unique; output order is unspecified.
pub fn aggregate(records: &[Record], bins: &AgeBins) -> Result<Vec<PersonaAggregate>> {
    let mut groups: HashMap<String, (f64, usize)> = HashMap::new();
    for record in records {
        let attrs = PersonaAttrs {
            country: record.country.clone(),
            source: record.source,
            sex: record.sex,
            age_band: bins.band_for(record.age)?.to_string(),
        };
        let entry = groups.entry(attrs.key()).or_insert((0.0, 0));
        entry.0 += record.price;
        entry.1 += 1;
    }

    Ok(groups
        .into_iter()
        .map(|(key, (sum, count))| PersonaAggregate {
            key,
            mean_price: sum / count as f64,
        })
        .collect())
}

/// Immutable persona lookup table: the bins it was built with, its rows
/// sorted ascending by mean price, and a key index.
///
/// A table is built once per batch; new data means building a new table and
/// swapping the whole value, never mutating rows in place. Carrying the bins
/// inside the table guarantees classification uses the exact edges the
/// aggregation used.
#[derive(Debug, Clone)]
pub struct PersonaTable {
    bins: AgeBins,
    rows: Vec<PersonaRow>,
    index: HashMap<String, usize>,
}

impl PersonaTable {
    /// Run the full build pipeline: bin, key, aggregate, segment.
    pub fn build(records: &[Record], bins: AgeBins, ladder: &[Segment]) -> Result<Self> {
        let aggregates = aggregate(records, &bins)?;
        let rows = assign_segments(aggregates, ladder)?;
        let index = rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.key.clone(), i))
            .collect();
        Ok(Self { bins, rows, index })
    }

    /// Build with bins derived from the batch itself and the default
    /// `D`/`C`/`B`/`A` ladder.
    pub fn from_records(records: &[Record]) -> Result<Self> {
        let bins = AgeBins::from_ages(records.iter().map(|r| r.age))?;
        Self::build(records, bins, &Segment::LADDER)
    }

    /// Classify a prospective customer: derive the age band (clamped, so
    /// ages beyond the observed extremes snap to the end bands), build the
    /// key, and look it up.
    ///
    /// # Returns
    /// * The matching row, or `UnknownPersona` naming the derived key when
    ///   the combination never appeared in the training data
    pub fn classify(&self, profile: &Profile) -> Result<&PersonaRow> {
        let attrs = PersonaAttrs {
            country: profile.country.clone(),
            source: profile.source,
            sex: profile.sex,
            age_band: self.bins.band_for_clamped(profile.age).to_string(),
        };
        let key = attrs.key();
        self.get(&key)
            .ok_or(PersonaError::UnknownPersona { key })
    }

    /// Look up a row by its exact key.
    pub fn get(&self, key: &str) -> Option<&PersonaRow> {
        self.index.get(key).map(|&i| &self.rows[i])
    }

    /// Rows sorted ascending by mean price.
    pub fn rows(&self) -> &[PersonaRow] {
        &self.rows
    }

    /// The bin configuration the table was built with.
    pub fn bins(&self) -> &AgeBins {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
