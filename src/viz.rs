//! Charts and console statistics using Plotters

use std::collections::BTreeMap;

use anyhow::Result;
use plotters::prelude::*;

use crate::data::Record;
use crate::persona::PersonaTable;
use crate::segment::Segment;

/// One bar color per segment, D through A.
const SEGMENT_COLORS: [RGBColor; 4] = [RED, YELLOW, BLUE, GREEN];

/// Quantile levels printed in the dataset summary.
const SUMMARY_QUANTILES: [f64; 6] = [0.0, 0.05, 0.50, 0.95, 0.99, 1.0];

/// Create a bar chart of average mean price per segment.
///
/// # Arguments
/// * `table` - Built persona table with segment assignments
/// * `output_path` - Path to save the PNG plot
pub fn create_segment_chart(table: &PersonaTable, output_path: &str) -> Result<()> {
    let averages = segment_averages(table);
    let max_price = averages
        .iter()
        .map(|&(_, price)| price)
        .fold(0.0f64, f64::max);

    let root = BitMapBackend::new(output_path, (600, 400)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Average Mean Price per Segment", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..(averages.len() as f64), 0f64..(max_price * 1.1))?;

    chart
        .configure_mesh()
        .x_desc("Segment (D lowest, A highest)")
        .y_desc("Mean Price")
        .x_labels(averages.len())
        .x_label_formatter(&|x| {
            let i = *x as usize;
            Segment::LADDER
                .get(i)
                .map(|s| s.to_string())
                .unwrap_or_default()
        })
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (i, &(segment, price)) in averages.iter().enumerate() {
        let color = &SEGMENT_COLORS[segment as usize];
        chart.draw_series(std::iter::once(Rectangle::new(
            [(i as f64 + 0.1, 0.0), (i as f64 + 0.9, price)],
            color.filled(),
        )))?;
    }

    root.present()?;
    println!("Segment chart saved to: {}", output_path);

    Ok(())
}

/// Create a histogram of transaction prices.
pub fn create_price_histogram(records: &[Record], output_path: &str) -> Result<()> {
    let buckets = price_buckets(records, 20);
    let max_count = buckets.iter().map(|&(_, _, n)| n).max().unwrap_or(1) as f64;
    let lo = buckets.first().map(|&(lo, _, _)| lo).unwrap_or(0.0);
    let hi = buckets.last().map(|&(_, hi, _)| hi).unwrap_or(1.0);

    let root = BitMapBackend::new(output_path, (600, 400)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("The distribution of PRICE", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(lo..hi, 0f64..(max_count * 1.1))?;

    chart
        .configure_mesh()
        .x_desc("Price")
        .y_desc("Transactions")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for &(bucket_lo, bucket_hi, count) in &buckets {
        chart.draw_series(std::iter::once(Rectangle::new(
            [(bucket_lo, 0.0), (bucket_hi, count as f64)],
            BLUE.filled(),
        )))?;
    }

    root.present()?;
    println!("Price histogram saved to: {}", output_path);

    Ok(())
}

/// Print shape, quantiles, and per-country/source revenue breakdowns.
pub fn print_dataset_summary(records: &[Record]) {
    println!("\n=== Dataset Summary ===");
    println!("Rows: {}  Columns: 5", records.len());

    let ages: Vec<f64> = records.iter().map(|r| r.age as f64).collect();
    let prices: Vec<f64> = records.iter().map(|r| r.price).collect();
    for (name, values) in [("AGE", ages), ("PRICE", prices)] {
        let mut sorted = values;
        sorted.sort_by(f64::total_cmp);
        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
        print!("{name:>6}: mean {mean:7.2} |");
        for q in SUMMARY_QUANTILES {
            print!(" q{:.2}={:.1}", q, quantile(&sorted, q));
        }
        println!();
    }

    let mut by_country: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    let mut by_source: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in records {
        let c = by_country.entry(record.country.as_str()).or_insert((0.0, 0));
        c.0 += record.price;
        c.1 += 1;
        let s = by_source.entry(record.source.as_str()).or_insert((0.0, 0));
        s.0 += record.price;
        s.1 += 1;
    }

    println!("\nSales by country:");
    for (country, (total, count)) in &by_country {
        println!(
            "  {country:>5}: {count:5} sales, total {total:9.2}, mean {:6.2}",
            total / *count as f64
        );
    }
    println!("Sales by source:");
    for (source, (total, count)) in &by_source {
        println!(
            "  {source:>7}: {count:5} sales, total {total:9.2}, mean {:6.2}",
            total / *count as f64
        );
    }
}

/// Print per-segment persona counts and price ranges.
pub fn print_table_statistics(table: &PersonaTable) {
    println!("\n=== Segment Statistics ===");
    println!("Personas: {}", table.len());
    println!("Age bands: {}", table.bins().labels().join(", "));

    println!("\n  Segment | Personas | Mean Price | Min    | Max");
    println!("  --------|----------|------------|--------|--------");
    for segment in Segment::LADDER.iter().rev() {
        let prices: Vec<f64> = table
            .rows()
            .iter()
            .filter(|row| row.segment == *segment)
            .map(|row| row.mean_price)
            .collect();
        if prices.is_empty() {
            continue;
        }
        let mean = prices.iter().sum::<f64>() / prices.len() as f64;
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        println!(
            "  {:7} | {:8} | {:10.2} | {:6.2} | {:6.2}",
            segment.as_str(),
            prices.len(),
            mean,
            min,
            max
        );
    }
}

/// Generate the full report: charts plus console statistics.
pub fn generate_visualization_report(
    records: &[Record],
    table: &PersonaTable,
    base_output_path: &str,
) -> Result<()> {
    create_segment_chart(table, base_output_path)?;

    let histogram_path = base_output_path.replace(".png", "_price_hist.png");
    create_price_histogram(records, &histogram_path)?;

    print_table_statistics(table);

    Ok(())
}

/// Average mean price per segment, ordered D through A.
fn segment_averages(table: &PersonaTable) -> Vec<(Segment, f64)> {
    Segment::LADDER
        .iter()
        .map(|&segment| {
            let prices: Vec<f64> = table
                .rows()
                .iter()
                .filter(|row| row.segment == segment)
                .map(|row| row.mean_price)
                .collect();
            let mean = if prices.is_empty() {
                0.0
            } else {
                prices.iter().sum::<f64>() / prices.len() as f64
            };
            (segment, mean)
        })
        .collect()
}

/// Linear-interpolation quantile over an ascending-sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
    }
}

/// Equal-width price buckets as (lo, hi, count) triples.
fn price_buckets(records: &[Record], bucket_count: usize) -> Vec<(f64, f64, usize)> {
    if records.is_empty() || bucket_count == 0 {
        return Vec::new();
    }
    let lo = records.iter().map(|r| r.price).fold(f64::INFINITY, f64::min);
    let hi = records
        .iter()
        .map(|r| r.price)
        .fold(f64::NEG_INFINITY, f64::max);
    let width = ((hi - lo) / bucket_count as f64).max(f64::EPSILON);

    let mut counts = vec![0usize; bucket_count];
    for record in records {
        let i = (((record.price - lo) / width) as usize).min(bucket_count - 1);
        counts[i] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, n)| (lo + i as f64 * width, lo + (i + 1) as f64 * width, n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Sex, Source};
    use crate::persona::PersonaTable;

    fn sample_table() -> PersonaTable {
        let countries = ["BRA", "USA", "TUR", "DEU", "FRA", "EUR", "CAN", "MEX"];
        let records: Vec<Record> = countries
            .iter()
            .enumerate()
            .map(|(i, country)| Record {
                country: country.to_string(),
                source: Source::Android,
                sex: Sex::Male,
                age: 20 + i as u32 * 4,
                price: 10.0 + i as f64 * 5.0,
            })
            .collect();
        PersonaTable::from_records(&records).unwrap()
    }

    #[test]
    fn test_segment_averages_ordered_and_increasing() {
        let table = sample_table();
        let averages = segment_averages(&table);

        assert_eq!(averages.len(), 4);
        assert_eq!(averages[0].0, Segment::D);
        assert_eq!(averages[3].0, Segment::A);
        // Higher tiers average higher prices.
        assert!(averages.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[test]
    fn test_quantile_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert_eq!(quantile(&sorted, 0.5), 3.0);
        assert_eq!(quantile(&sorted, 1.0), 5.0);
        assert_eq!(quantile(&sorted, 0.25), 2.0);
        assert!(quantile(&[], 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_price_buckets_cover_all_records() {
        let records: Vec<Record> = (0..50)
            .map(|i| Record {
                country: "USA".to_string(),
                source: Source::Ios,
                sex: Sex::Female,
                age: 30,
                price: i as f64,
            })
            .collect();
        let buckets = price_buckets(&records, 10);

        assert_eq!(buckets.len(), 10);
        let total: usize = buckets.iter().map(|&(_, _, n)| n).sum();
        assert_eq!(total, 50);
    }
}
