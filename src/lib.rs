//! PersonaForge: rule-based customer segmentation and revenue estimation
//!
//! This library derives level-based customer personas (country, acquisition
//! source, sex, age band) from transaction data, cuts them into quantile
//! revenue tiers, and classifies new customer profiles against the result.

pub mod binning;
pub mod cli;
pub mod data;
pub mod error;
pub mod persona;
pub mod segment;
pub mod viz;

// Re-export public items for easier access
pub use binning::AgeBins;
pub use cli::Args;
pub use data::{load_records, Profile, Record, Sex, Source};
pub use error::{PersonaError, Result};
pub use persona::{aggregate, PersonaAggregate, PersonaAttrs, PersonaRow, PersonaTable};
pub use segment::{assign_segments, Segment};
