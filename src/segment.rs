//! Quantile-based revenue tiers for aggregated personas

use std::fmt;

use crate::error::{PersonaError, Result};
use crate::persona::{PersonaAggregate, PersonaRow};

/// Ordinal revenue tier, `D` lowest through `A` highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    D,
    C,
    B,
    A,
}

impl Segment {
    /// Tiers ordered low to high, the default four-way cut.
    pub const LADDER: [Segment; 4] = [Segment::D, Segment::C, Segment::B, Segment::A];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::D => "D",
            Segment::C => "C",
            Segment::B => "B",
            Segment::A => "A",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cut aggregated personas into equal-frequency tiers by mean price.
///
/// Rows are sorted ascending by mean price (ties broken by key, so the cut
/// is deterministic regardless of input order) and the row at sorted index
/// `i` of `n` gets `ladder[i * ladder.len() / n]`. Tier sizes differ by at
/// most one; equal values straddling a boundary are split by rank rather
/// than pooled into one tier.
///
/// # Arguments
/// * `aggregates` - One entry per persona key with its mean price
/// * `ladder` - Tier labels ordered low to high; its length is the tier count
pub fn assign_segments(
    mut aggregates: Vec<PersonaAggregate>,
    ladder: &[Segment],
) -> Result<Vec<PersonaRow>> {
    let tiers = ladder.len();
    let distinct = distinct_values(&aggregates);
    if distinct < tiers {
        return Err(PersonaError::InsufficientData { distinct, tiers });
    }

    aggregates.sort_by(|a, b| {
        a.mean_price
            .total_cmp(&b.mean_price)
            .then_with(|| a.key.cmp(&b.key))
    });

    let n = aggregates.len();
    Ok(aggregates
        .into_iter()
        .enumerate()
        .map(|(i, agg)| PersonaRow {
            key: agg.key,
            mean_price: agg.mean_price,
            segment: ladder[i * tiers / n],
        })
        .collect())
}

/// Number of distinct mean prices among the aggregates.
fn distinct_values(aggregates: &[PersonaAggregate]) -> usize {
    let mut values: Vec<f64> = aggregates.iter().map(|a| a.mean_price).collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregates(prices: &[f64]) -> Vec<PersonaAggregate> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PersonaAggregate {
                key: format!("KEY_{i:02}"),
                mean_price: p,
            })
            .collect()
    }

    #[test]
    fn test_four_way_cut_orders_tiers() {
        let rows =
            assign_segments(aggregates(&[10.0, 20.0, 30.0, 40.0]), &Segment::LADDER).unwrap();

        assert_eq!(rows[0].segment, Segment::D);
        assert_eq!(rows[1].segment, Segment::C);
        assert_eq!(rows[2].segment, Segment::B);
        assert_eq!(rows[3].segment, Segment::A);
        // Highest mean price lands in the top tier.
        assert_eq!(rows[3].mean_price, 40.0);
    }

    #[test]
    fn test_tier_sizes_differ_by_at_most_one() {
        let prices: Vec<f64> = (0..10).map(|i| i as f64 * 3.5).collect();
        let rows = assign_segments(aggregates(&prices), &Segment::LADDER).unwrap();

        let mut sizes = [0usize; 4];
        for row in &rows {
            sizes[row.segment as usize] += 1;
        }
        let max = sizes.iter().max().unwrap();
        let min = sizes.iter().min().unwrap();
        assert!(max - min <= 1, "tier sizes {sizes:?} are unbalanced");
    }

    #[test]
    fn test_no_inversions_across_tiers() {
        let prices = [5.0, 1.0, 9.0, 3.0, 7.0, 2.0, 8.0, 4.0, 6.0, 10.0, 11.0, 12.0];
        let rows = assign_segments(aggregates(&prices), &Segment::LADDER).unwrap();

        for a in &rows {
            for b in &rows {
                if a.segment > b.segment {
                    assert!(a.mean_price >= b.mean_price);
                }
            }
        }
    }

    #[test]
    fn test_ties_resolve_by_key_order() {
        let mut aggs = aggregates(&[5.0, 5.0, 5.0, 1.0, 2.0, 3.0, 4.0, 6.0]);
        let forward = assign_segments(aggs.clone(), &Segment::LADDER).unwrap();
        aggs.reverse();
        let reversed = assign_segments(aggs, &Segment::LADDER).unwrap();

        let mut forward = forward;
        let mut reversed = reversed;
        forward.sort_by(|a, b| a.key.cmp(&b.key));
        reversed.sort_by(|a, b| a.key.cmp(&b.key));
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_insufficient_distinct_values() {
        let result = assign_segments(aggregates(&[7.0, 7.0, 7.0, 7.0]), &Segment::LADDER);
        assert!(matches!(
            result,
            Err(PersonaError::InsufficientData {
                distinct: 1,
                tiers: 4
            })
        ));
    }

    #[test]
    fn test_segment_ordering() {
        assert!(Segment::D < Segment::C);
        assert!(Segment::C < Segment::B);
        assert!(Segment::B < Segment::A);
        assert_eq!(Segment::A.to_string(), "A");
    }
}
