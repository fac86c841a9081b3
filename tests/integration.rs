//! Integration tests for PersonaForge

use std::io::Write;

use personaforge::{
    aggregate, load_records, AgeBins, PersonaError, PersonaTable, Profile, Segment, Sex, Source,
};
use tempfile::NamedTempFile;

/// Twelve single-record personas with distinct prices, spanning every age
/// band of the `[15, 18, 23, 35, 45, 66]` edge set.
fn create_test_csv() -> NamedTempFile {
    let rows = [
        "BRA,ANDROID,MALE,15,19",
        "BRA,ANDROID,FEMALE,16,24",
        "USA,IOS,MALE,20,29",
        "USA,IOS,FEMALE,23,34",
        "DEU,ANDROID,MALE,30,39",
        "DEU,IOS,FEMALE,35,44",
        "TUR,ANDROID,MALE,40,49",
        "TUR,IOS,FEMALE,45,54",
        "FRA,ANDROID,MALE,50,59",
        "FRA,IOS,FEMALE,66,64",
        "EUR,ANDROID,MALE,28,9",
        "EUR,IOS,FEMALE,60,70",
    ];

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "COUNTRY,SOURCE,SEX,AGE,PRICE").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

fn profile(country: &str, source: Source, sex: Sex, age: u32) -> Profile {
    Profile {
        country: country.to_string(),
        source,
        sex,
        age,
    }
}

#[test]
fn test_end_to_end_pipeline() {
    let file = create_test_csv();
    let records = load_records(file.path()).unwrap();
    assert_eq!(records.len(), 12);

    let table = PersonaTable::from_records(&records).unwrap();

    // Every row produced its own persona, binned over the observed range.
    assert_eq!(table.len(), 12);
    assert_eq!(table.bins().edges(), &[15, 18, 23, 35, 45, 66]);
    assert_eq!(
        table.bins().labels(),
        &["15_18", "19_23", "24_35", "36_45", "46_66"]
    );

    // Tier sizes are balanced and ordered by mean price without inversions.
    let mut sizes = [0usize; 4];
    for row in table.rows() {
        sizes[row.segment as usize] += 1;
    }
    assert_eq!(sizes, [3, 3, 3, 3]);
    for a in table.rows() {
        for b in table.rows() {
            if a.segment > b.segment {
                assert!(a.mean_price >= b.mean_price);
            }
        }
    }
}

#[test]
fn test_round_trip_classification() {
    let file = create_test_csv();
    let records = load_records(file.path()).unwrap();
    let table = PersonaTable::from_records(&records).unwrap();

    // Classifying a training record returns the segment stored for its key.
    for record in &records {
        let row = table
            .classify(&profile(
                &record.country,
                record.source,
                record.sex,
                record.age,
            ))
            .unwrap();
        assert_eq!(row.segment, table.get(&row.key).unwrap().segment);
        assert_eq!(row.mean_price, record.price);
    }
}

#[test]
fn test_classify_age_fifty_selects_last_band() {
    let file = create_test_csv();
    let records = load_records(file.path()).unwrap();
    let table = PersonaTable::from_records(&records).unwrap();

    let row = table
        .classify(&profile("FRA", Source::Android, Sex::Male, 50))
        .unwrap();

    assert_eq!(row.key, "FRA_ANDROID_MALE_46_66");
    assert_eq!(row.segment, Segment::A);
    assert_eq!(row.mean_price, 59.0);
}

#[test]
fn test_boundary_age_resolves_right_closed() {
    let file = create_test_csv();
    let records = load_records(file.path()).unwrap();
    let table = PersonaTable::from_records(&records).unwrap();

    // Age 23 sits exactly on an edge; right-closed intervals put it in 19_23.
    let row = table
        .classify(&profile("USA", Source::Ios, Sex::Female, 23))
        .unwrap();
    assert_eq!(row.key, "USA_IOS_FEMALE_19_23");

    // Age 24 is one past the edge and lands in the next band.
    let err = table
        .classify(&profile("USA", Source::Ios, Sex::Female, 24))
        .unwrap_err();
    assert!(matches!(
        err,
        PersonaError::UnknownPersona { ref key } if key == "USA_IOS_FEMALE_24_35"
    ));
}

#[test]
fn test_classification_clamps_extreme_ages() {
    let file = create_test_csv();
    let records = load_records(file.path()).unwrap();
    let table = PersonaTable::from_records(&records).unwrap();

    // Age 90 is beyond the observed maximum and snaps to the oldest band.
    let row = table
        .classify(&profile("FRA", Source::Android, Sex::Male, 90))
        .unwrap();
    assert_eq!(row.key, "FRA_ANDROID_MALE_46_66");
}

#[test]
fn test_unknown_persona_message_names_key() {
    let file = create_test_csv();
    let records = load_records(file.path()).unwrap();
    let table = PersonaTable::from_records(&records).unwrap();

    let err = table
        .classify(&profile("KOR", Source::Ios, Sex::Male, 30))
        .unwrap_err();

    assert!(err.to_string().contains("KOR_IOS_MALE_24_35"));
}

#[test]
fn test_fra_android_male_aggregation_scenario() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "COUNTRY,SOURCE,SEX,AGE,PRICE").unwrap();
    writeln!(file, "FRA,ANDROID,MALE,24,30").unwrap();
    writeln!(file, "FRA,ANDROID,MALE,28,33").unwrap();
    writeln!(file, "FRA,ANDROID,MALE,30,36").unwrap();

    let records = load_records(file.path()).unwrap();
    let bins = AgeBins::from_ages(records.iter().map(|r| r.age)).unwrap();
    let aggregates = aggregate(&records, &bins).unwrap();

    assert_eq!(aggregates.len(), 1);
    assert_eq!(aggregates[0].key, "FRA_ANDROID_MALE_24_30");
    assert_eq!(aggregates[0].mean_price, 33.0);
}

#[test]
fn test_too_few_personas_for_four_tiers() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "COUNTRY,SOURCE,SEX,AGE,PRICE").unwrap();
    writeln!(file, "BRA,ANDROID,MALE,20,19").unwrap();
    writeln!(file, "USA,IOS,FEMALE,30,29").unwrap();
    writeln!(file, "TUR,IOS,MALE,40,39").unwrap();

    let records = load_records(file.path()).unwrap();
    let result = PersonaTable::from_records(&records);

    assert!(matches!(
        result,
        Err(PersonaError::InsufficientData {
            distinct: 3,
            tiers: 4
        })
    ));
}

#[test]
fn test_schema_error_surfaces_from_loader() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "COUNTRY,SOURCE,SEX,AGE").unwrap();
    writeln!(file, "USA,IOS,MALE,30").unwrap();

    let err = load_records(file.path()).unwrap_err();
    assert!(matches!(err, PersonaError::Schema(_)));
}
