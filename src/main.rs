//! PersonaForge: customer persona segmentation CLI
//!
//! This is the main entrypoint that orchestrates data loading, table
//! building, reporting, and single-profile classification.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use personaforge::{load_records, viz, Args, PersonaTable, Profile};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    if args.verbose {
        println!("PersonaForge - Rule-Based Customer Segmentation");
        println!("===============================================\n");
    }

    if let Some(profile) = args.parse_profile()? {
        run_classification_mode(&args, profile)?;
    } else if args.interactive {
        let stdin = io::stdin();
        let profile = prompt_profile(&mut stdin.lock())?;
        run_classification_mode(&args, profile)?;
    } else {
        run_full_pipeline(&args)?;
    }

    Ok(())
}

/// Build the table and classify a single prospective customer.
fn run_classification_mode(args: &Args, profile: Profile) -> Result<()> {
    println!("=== Classification Mode ===");
    println!(
        "Profile: country={}, source={}, sex={}, age={}",
        profile.country, profile.source, profile.sex, profile.age
    );

    let start_time = Instant::now();

    if args.verbose {
        println!("\nLoading training data from: {}", args.input);
    }
    let records = load_records(&args.input)?;

    if args.verbose {
        println!("Loaded {} transactions", records.len());
        println!("\nBuilding persona table...");
    }

    let table = PersonaTable::from_records(&records)?;
    let row = table.classify(&profile)?;

    let elapsed = start_time.elapsed();

    println!("\nPersona: {}", row.key);
    println!("Segment: {}", row.segment);
    println!("Expected price: {:.2}", row.mean_price);
    if args.verbose {
        println!("Processing time: {:.2}s", elapsed.as_secs_f64());
    }

    Ok(())
}

/// Run the full segmentation pipeline and report.
fn run_full_pipeline(args: &Args) -> Result<()> {
    println!("=== Full Segmentation Pipeline ===\n");

    let start_time = Instant::now();

    // Step 1: Load and validate data
    if args.verbose {
        println!("Step 1: Loading data");
        println!("  Input file: {}", args.input);
    }

    let data_start = Instant::now();
    let records = load_records(&args.input)?;
    let data_time = data_start.elapsed();

    println!("✓ Data loaded: {} transactions", records.len());
    if args.verbose {
        println!("  Loading time: {:.2}s", data_time.as_secs_f64());
    }

    viz::print_dataset_summary(&records);

    // Step 2: Build the persona table
    if args.verbose {
        println!("\nStep 2: Building persona table");
    }

    let build_start = Instant::now();
    let table = PersonaTable::from_records(&records)?;
    let build_time = build_start.elapsed();

    println!("\n✓ Persona table built: {} personas", table.len());
    if args.verbose {
        println!("  Build time: {:.2}s", build_time.as_secs_f64());
        println!("  Age bands: {}", table.bins().labels().join(", "));
    }

    // Step 3: Report
    if args.no_charts {
        viz::print_table_statistics(&table);
    } else {
        if args.verbose {
            println!("\nStep 3: Generating report");
            println!("  Output file: {}", args.output);
        }
        viz::generate_visualization_report(&records, &table, &args.output)?;
    }

    let total_time = start_time.elapsed();
    println!("\n=== Pipeline Complete ===");
    println!("Total processing time: {:.2}s", total_time.as_secs_f64());

    Ok(())
}

/// Collect a profile from stdin, mirroring the classic interactive flow.
fn prompt_profile<R: BufRead>(reader: &mut R) -> Result<Profile> {
    let country = prompt(reader, "Enter a country name (USA/EUR/BRA/DEU/TUR/FRA): ")?;
    let country = country.trim().to_uppercase();
    let source = prompt(reader, "Enter the operating system of phone (IOS/ANDROID): ")?;
    let sex = prompt(reader, "Enter the gender (FEMALE/MALE): ")?;
    let age = prompt(reader, "Enter the age: ")?;

    Ok(Profile {
        country,
        source: source.parse()?,
        sex: sex.parse()?,
        age: age
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid age value: {}", age.trim()))?,
    })
}

fn prompt<R: BufRead>(reader: &mut R, message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line)
}
