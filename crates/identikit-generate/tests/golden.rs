use std::sync::Arc;

use chrono::{TimeZone, Utc};
use identikit_core::Gender;
use identikit_generate::{
    BatchGenerator, GenerateOptions, NameTables, ReferenceClock, SeededValueStream,
    UnconfiguredLocator, placeholder_picture,
};

fn generator() -> BatchGenerator {
    let instant = Utc
        .with_ymd_and_hms(2025, 3, 1, 9, 30, 0)
        .single()
        .expect("valid instant");
    BatchGenerator::new(
        Arc::new(NameTables::bundled()),
        Arc::new(UnconfiguredLocator),
        GenerateOptions {
            clock: ReferenceClock::Fixed(instant),
            ..GenerateOptions::default()
        },
    )
}

#[test]
fn keystream_is_pinned() {
    let mut stream = SeededValueStream::new(12_346);
    let draws: Vec<u64> = (0..5).map(|_| stream.next_int_below(1000)).collect();
    assert_eq!(draws, [274, 653, 473, 858, 912]);
}

#[test]
fn first_record_of_seed_12345_page_1_is_pinned() {
    let batch = generator()
        .generate_batch(3, 12_345, 1, None)
        .expect("generate");
    assert_eq!(batch.info.seed, "12346");

    let record = &batch.results[0];
    assert_eq!(record.gender, Gender::Female);
    assert_eq!(record.name.title, "Ms");
    assert_eq!(record.name.first, "Michelle");
    assert_eq!(record.name.last, "Jackson");
    assert_eq!(record.email, "michelle.jackson@example.com");

    let location = &record.location;
    assert_eq!(location.street.number, 9122);
    assert_eq!(location.street.name, "Oak Street");
    assert_eq!(location.city, "Houston");
    assert_eq!(location.state, "Illinois");
    assert_eq!(location.postcode, "57637");
    assert_eq!(location.coordinates.latitude, "22.0119");
    assert_eq!(location.coordinates.longitude, "19.7904");

    let login = &record.login;
    assert_eq!(login.uuid, "2de011d5-fe96-43ab-b45b-b5968f60570e");
    assert_eq!(login.username, "michellejackson63");
    assert_eq!(login.password, "alQ3jTT45pPO");
    assert_eq!(login.salt, "f5aa662e202afe8f");
    assert_eq!(login.md5, "a6d21c5c0bcec74a1f909e5fb49136e5");
    assert_eq!(login.sha1, "ea083400cdf624e402fdd2e3c6df2e18247a5e17");
    assert_eq!(
        login.sha256,
        "d0c69cca6fd57c55838171167f7198ebfb7cba30805c2822023f67c62bb4eb8e"
    );

    assert_eq!(record.dob.date, "1954-02-24T00:00:00Z");
    assert_eq!(record.dob.age, 71);
    assert_eq!(record.registered.date, "2005-09-05T00:00:00Z");
    assert_eq!(record.registered.age, 19);
    assert_eq!(record.phone, "(906)-635-5635");
    assert_eq!(record.cell, "(281)-528-0225");
    assert_eq!(record.id.value, "25255028");
    assert_eq!(record.picture, placeholder_picture(Gender::Female));
}

#[test]
fn later_records_follow_on_the_same_stream() {
    let batch = generator()
        .generate_batch(3, 12_345, 1, None)
        .expect("generate");

    let summary: Vec<(&str, &str, &str, &str)> = batch
        .results
        .iter()
        .map(|record| {
            (
                record.name.first.as_str(),
                record.name.last.as_str(),
                record.login.uuid.as_str(),
                record.id.value.as_str(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        [
            (
                "Michelle",
                "Jackson",
                "2de011d5-fe96-43ab-b45b-b5968f60570e",
                "25255028"
            ),
            (
                "Deborah",
                "Thomas",
                "b2e22c2e-51f7-4934-a912-9f6565be840c",
                "95582769"
            ),
            (
                "Patricia",
                "Nguyen",
                "530bff22-ca91-46c3-9848-061d72d40699",
                "75141875"
            ),
        ]
    );
}
