//! Age binning: mapping a numeric age to a categorical band label

use crate::error::{PersonaError, Result};

/// Interior cut points shared by every bin configuration. The outer edges
/// come from the observed data, so the same customer base always produces
/// the same bands on both the build path and the classify path.
pub const CUT_POINTS: [u32; 4] = [18, 23, 35, 45];

/// An ordered set of age bands over strictly increasing integer edges.
///
/// Intervals are right-closed: age `v` falls in band `i` when
/// `edges[i] < v <= edges[i+1]`, except the first band which also includes
/// its lower edge. An `AgeBins` value is built once per batch and carried
/// inside the persona table, so aggregation and classification can never
/// disagree on edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeBins {
    edges: Vec<u32>,
    labels: Vec<String>,
}

impl AgeBins {
    /// Validate and construct a bin configuration.
    ///
    /// # Arguments
    /// * `edges` - Strictly increasing boundaries covering the binnable range
    /// * `labels` - One label per interval, `edges.len() - 1` of them
    pub fn new(edges: Vec<u32>, labels: Vec<String>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(PersonaError::InvalidBins(format!(
                "need at least 2 edges, got {}",
                edges.len()
            )));
        }
        if labels.len() != edges.len() - 1 {
            return Err(PersonaError::InvalidBins(format!(
                "{} edges require {} labels, got {}",
                edges.len(),
                edges.len() - 1,
                labels.len()
            )));
        }
        if !edges.windows(2).all(|w| w[0] < w[1]) {
            return Err(PersonaError::InvalidBins(
                "edges must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { edges, labels })
    }

    /// Build the configuration for an observed age range: the canonical cut
    /// points that fall strictly inside `(min_age, max_age)`, bounded by the
    /// observed extremes, with labels derived from the resulting edges.
    pub fn from_observed(min_age: u32, max_age: u32) -> Result<Self> {
        if min_age >= max_age {
            return Err(PersonaError::InvalidBins(format!(
                "observed age range {min_age}..{max_age} spans fewer than two distinct ages"
            )));
        }
        let mut edges = vec![min_age];
        edges.extend(CUT_POINTS.iter().copied().filter(|&c| c > min_age && c < max_age));
        edges.push(max_age);
        let labels = derive_labels(&edges);
        Self::new(edges, labels)
    }

    /// Build the configuration from the ages present in a batch of records.
    pub fn from_ages<I: IntoIterator<Item = u32>>(ages: I) -> Result<Self> {
        let mut min_age = u32::MAX;
        let mut max_age = 0;
        let mut any = false;
        for age in ages {
            min_age = min_age.min(age);
            max_age = max_age.max(age);
            any = true;
        }
        if !any {
            return Err(PersonaError::InvalidBins(
                "cannot derive bins from an empty batch".to_string(),
            ));
        }
        Self::from_observed(min_age, max_age)
    }

    /// Map an age to its band label, rejecting ages outside the bin range.
    pub fn band_for(&self, age: u32) -> Result<&str> {
        if age < self.min() || age > self.max() {
            return Err(PersonaError::OutOfRange {
                age,
                min: self.min(),
                max: self.max(),
            });
        }
        Ok(self.band_for_clamped(age))
    }

    /// Map an age to its band label, snapping out-of-range ages to the
    /// nearest end band. This is the classification default: a 70-year-old
    /// belongs in the oldest band, not in an error message.
    pub fn band_for_clamped(&self, age: u32) -> &str {
        if age <= self.edges[1] {
            return &self.labels[0];
        }
        for i in 1..self.labels.len() {
            if age <= self.edges[i + 1] {
                return &self.labels[i];
            }
        }
        &self.labels[self.labels.len() - 1]
    }

    /// Lowest binnable age
    pub fn min(&self) -> u32 {
        self.edges[0]
    }

    /// Highest binnable age
    pub fn max(&self) -> u32 {
        self.edges[self.edges.len() - 1]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn edges(&self) -> &[u32] {
        &self.edges
    }
}

/// Derive `"lo_hi"` labels from edges: the first band spans both of its
/// edges inclusive, later bands start one past their lower edge.
fn derive_labels(edges: &[u32]) -> Vec<String> {
    edges
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            let lo = if i == 0 { w[0] } else { w[0] + 1 };
            format!("{}_{}", lo, w[1])
        })
        .collect()
}
