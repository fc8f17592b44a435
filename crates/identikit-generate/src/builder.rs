//! Single-record construction.
//!
//! [`IdentityRecordBuilder::build`] consumes the stream in a fixed order:
//! gender (only when not requested), first name, last name, photo index,
//! street number, street name, city, state, postcode, latitude, longitude,
//! UUID bytes, username suffix, password (12), salt (16), md5 (32), sha1 (40),
//! sha256 (64), birth offsets (3), registration offsets (3), phone (3),
//! cell (3), identifier. Reordering any step changes every later record for a
//! given seed.

use std::panic::AssertUnwindSafe;

use chrono::{DateTime, Months, SecondsFormat, TimeDelta, Utc};
use identikit_core::{
    Coordinates, DatedAge, Gender, Identifier, IdentityRecord, Location, Login, PersonName,
    Picture, Street,
};
use tracing::{debug, warn};

use crate::assets::NameTables;
use crate::errors::panic_message;
use crate::locator::{AssetLocator, placeholder_picture};
use crate::model::GenerateOptions;
use crate::stream::SeededValueStream;

pub const FALLBACK_MALE_FIRST: [&str; 5] = ["John", "Robert", "Michael", "David", "William"];
pub const FALLBACK_FEMALE_FIRST: [&str; 5] = ["Mary", "Patricia", "Jennifer", "Linda", "Elizabeth"];
pub const FALLBACK_LAST: [&str; 5] = ["Smith", "Johnson", "Williams", "Brown", "Jones"];

pub const STREETS: [&str; 5] = [
    "Main Street",
    "Park Avenue",
    "Oak Street",
    "Maple Avenue",
    "Cedar Road",
];
pub const CITIES: [&str; 5] = ["New York", "Los Angeles", "Chicago", "Houston", "Phoenix"];
pub const STATES: [&str; 5] = ["California", "New York", "Texas", "Florida", "Illinois"];

pub const COUNTRY: &str = "US";
pub const NATIONALITY: &str = "US";
pub const EMAIL_DOMAIN: &str = "@example.com";
pub const ID_LABEL: &str = "ID";

pub const PASSWORD_ALPHABET: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const HEX_ALPHABET: &[u8; 16] = b"abcdef0123456789";

const MIN_ADULT_AGE: u32 = 18;

/// Builds one [`IdentityRecord`] per call from a caller-owned stream.
pub struct IdentityRecordBuilder<'a> {
    names: &'a NameTables,
    locator: &'a dyn AssetLocator,
    options: &'a GenerateOptions,
    now: DateTime<Utc>,
}

impl<'a> IdentityRecordBuilder<'a> {
    /// `now` anchors every date in the records built by this instance.
    pub fn new(
        names: &'a NameTables,
        locator: &'a dyn AssetLocator,
        options: &'a GenerateOptions,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            names,
            locator,
            options,
            now,
        }
    }

    pub fn build(&self, stream: &mut SeededValueStream, gender: Option<Gender>) -> IdentityRecord {
        let gender = gender.unwrap_or_else(|| {
            if stream.next_int_below(2) == 1 {
                Gender::Male
            } else {
                Gender::Female
            }
        });

        let first = self.first_name(stream, gender);
        let last = self.last_name(stream);
        let photo_index = stream.next_int_below(u64::from(self.options.portrait_pool(gender)));

        let street = Street {
            number: 1 + stream.next_int_below(9999) as u32,
            name: pick_fixed(stream, &STREETS),
        };
        let city = pick_fixed(stream, &CITIES);
        let state = pick_fixed(stream, &STATES);
        let postcode = format!("{:05}", stream.next_int_below(99_999));
        let latitude = -90.0 + stream.next_float01() * 180.0;
        let longitude = -180.0 + stream.next_float01() * 360.0;

        let email = format!(
            "{}.{}{}",
            first.to_lowercase(),
            last.to_lowercase(),
            EMAIL_DOMAIN
        );
        let login = self.login(stream, &first, &last);
        let dob = self.dated_age(stream, 80, MIN_ADULT_AGE);
        let registered = self.dated_age(stream, 20, 0);
        let phone = phone_number(stream);
        let cell = phone_number(stream);
        let id = Identifier {
            name: ID_LABEL.to_string(),
            value: format!("{:08}", stream.next_int_below(100_000_000)),
        };
        let picture = self.picture(gender, photo_index);

        IdentityRecord {
            gender,
            name: PersonName {
                title: gender.title().to_string(),
                first,
                last,
            },
            location: Location {
                street,
                city,
                state,
                country: COUNTRY.to_string(),
                postcode,
                coordinates: Coordinates {
                    latitude: format!("{latitude:.4}"),
                    longitude: format!("{longitude:.4}"),
                },
            },
            email,
            login,
            dob,
            registered,
            phone,
            cell,
            id,
            picture,
            nat: NATIONALITY.to_string(),
        }
    }

    fn first_name(&self, stream: &mut SeededValueStream, gender: Gender) -> String {
        let loaded = self.names.first_names(gender);
        if loaded.is_empty() {
            let fallback = match gender {
                Gender::Male => &FALLBACK_MALE_FIRST,
                Gender::Female => &FALLBACK_FEMALE_FIRST,
            };
            pick_fixed(stream, fallback)
        } else {
            pick_loaded(stream, loaded)
        }
    }

    fn last_name(&self, stream: &mut SeededValueStream) -> String {
        let loaded = self.names.last_names();
        if loaded.is_empty() {
            pick_fixed(stream, &FALLBACK_LAST)
        } else {
            pick_loaded(stream, loaded)
        }
    }

    fn login(&self, stream: &mut SeededValueStream, first: &str, last: &str) -> Login {
        let mut bytes = [0_u8; 16];
        stream.fill_bytes(&mut bytes);
        let uuid = uuid::Builder::from_random_bytes(bytes).into_uuid();

        let username = format!(
            "{}{}",
            format!("{first}{last}").to_lowercase(),
            stream.next_int_below(99)
        );

        Login {
            uuid: uuid.hyphenated().to_string(),
            username,
            password: draw_string(stream, PASSWORD_ALPHABET, 12),
            salt: draw_string(stream, HEX_ALPHABET, 16),
            md5: draw_string(stream, HEX_ALPHABET, 32),
            sha1: draw_string(stream, HEX_ALPHABET, 40),
            sha256: draw_string(stream, HEX_ALPHABET, 64),
        }
    }

    /// Three draws: years below `year_span`, months below 12, days below 28.
    /// The date sits `years + floor` years, `months` months and `days` days
    /// before `now`; month arithmetic clamps to the end of shorter months.
    fn dated_age(&self, stream: &mut SeededValueStream, year_span: u64, floor: u32) -> DatedAge {
        let years = stream.next_int_below(year_span) as u32 + floor;
        let months = stream.next_int_below(12) as u32;
        let days = stream.next_int_below(28);

        let date = self
            .now
            .checked_sub_months(Months::new(years * 12 + months))
            .and_then(|date| date.checked_sub_signed(TimeDelta::days(days as i64)))
            .unwrap_or(self.now);

        DatedAge {
            date: date.to_rfc3339_opts(SecondsFormat::Secs, true),
            age: years,
        }
    }

    fn picture(&self, gender: Gender, photo_index: u64) -> Picture {
        let object_key = format!("{}/portrait ({photo_index}).png", gender.as_str());
        let located = std::panic::catch_unwind(AssertUnwindSafe(|| {
            self.locator
                .locate(&self.options.bucket, &object_key, self.options.portrait_ttl)
        }));
        match located {
            Ok(Ok(url)) => Picture {
                large: url.clone(),
                medium: url.clone(),
                thumbnail: url,
            },
            Ok(Err(err)) => {
                debug!(error = %err, object_key = %object_key, "portrait not located; using placeholder");
                placeholder_picture(gender)
            }
            Err(panic) => {
                warn!(
                    error = %panic_message(panic),
                    object_key = %object_key,
                    "portrait locator panicked; using placeholder"
                );
                placeholder_picture(gender)
            }
        }
    }
}

fn pick_fixed(stream: &mut SeededValueStream, table: &[&str]) -> String {
    stream.pick(table).copied().unwrap_or_default().to_string()
}

fn pick_loaded(stream: &mut SeededValueStream, table: &[String]) -> String {
    stream.pick(table).cloned().unwrap_or_default()
}

fn draw_string(stream: &mut SeededValueStream, alphabet: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| char::from(alphabet[stream.next_index(alphabet.len())]))
        .collect()
}

fn phone_number(stream: &mut SeededValueStream) -> String {
    let area = stream.next_int_below(1000);
    let exchange = stream.next_int_below(1000);
    let line = stream.next_int_below(10_000);
    format!("({area:03})-{exchange:03}-{line:04}")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::errors::LocatorError;
    use crate::locator::UnconfiguredLocator;

    struct EchoLocator;

    impl AssetLocator for EchoLocator {
        fn locate(
            &self,
            bucket: &str,
            object_key: &str,
            _ttl: std::time::Duration,
        ) -> Result<String, LocatorError> {
            Ok(format!("mem://{bucket}/{object_key}"))
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
            .single()
            .expect("valid instant")
    }

    #[test]
    fn requested_gender_skips_the_gender_draw() {
        let names = NameTables::empty();
        let options = GenerateOptions::default();
        let builder = IdentityRecordBuilder::new(&names, &UnconfiguredLocator, &options, fixed_now());

        let mut with_gender = SeededValueStream::new(11);
        let record = builder.build(&mut with_gender, Some(Gender::Female));
        let mut without_gender = SeededValueStream::new(11);
        builder.build(&mut without_gender, None);

        assert_eq!(record.gender, Gender::Female);
        assert_eq!(record.name.title, "Ms");
        assert_eq!(without_gender.draws(), with_gender.draws() + 1);
    }

    #[test]
    fn fixed_gender_records_consume_a_fixed_number_of_draws() {
        let names = NameTables::bundled();
        let options = GenerateOptions::default();
        let builder = IdentityRecordBuilder::new(&names, &UnconfiguredLocator, &options, fixed_now());

        // 2 names, photo, 2 street, city, state, postcode, 2 coordinates,
        // uuid, username, 12 + 16 + 32 + 40 + 64 characters, 2 x 3 dates,
        // 2 x 3 phones, identifier.
        let expected = 2 + 1 + 2 + 1 + 1 + 1 + 2 + 1 + 1 + 164 + 6 + 6 + 1;
        for seed in [0, 1, -77, 123_456_789] {
            let mut stream = SeededValueStream::new(seed);
            builder.build(&mut stream, Some(Gender::Male));
            assert_eq!(stream.draws(), expected);
        }
    }

    #[test]
    fn ages_match_their_dates() {
        let names = NameTables::empty();
        let options = GenerateOptions::default();
        let builder = IdentityRecordBuilder::new(&names, &UnconfiguredLocator, &options, fixed_now());
        let mut stream = SeededValueStream::new(5);

        for _ in 0..200 {
            let record = builder.build(&mut stream, None);
            assert!((18..98).contains(&record.dob.age));
            assert!(record.registered.age < 20);

            let dob = DateTime::parse_from_rfc3339(&record.dob.date).expect("rfc3339 dob");
            let years = fixed_now().years_since(dob.with_timezone(&Utc)).expect("dob in past");
            assert_eq!(years, record.dob.age);
            assert!(record.dob.date.ends_with('Z'));
        }
    }

    #[test]
    fn email_and_username_follow_the_name() {
        let names = NameTables::from_lists(
            vec!["Ada".to_string()],
            vec!["Grace".to_string()],
            vec!["Lovelace".to_string()],
        );
        let options = GenerateOptions::default();
        let builder = IdentityRecordBuilder::new(&names, &UnconfiguredLocator, &options, fixed_now());
        let record = builder.build(&mut SeededValueStream::new(9), Some(Gender::Male));

        assert_eq!(record.name.first, "Ada");
        assert_eq!(record.name.last, "Lovelace");
        assert_eq!(record.email, "ada.lovelace@example.com");
        let suffix = record
            .login
            .username
            .strip_prefix("adalovelace")
            .expect("username prefix");
        let suffix: u32 = suffix.parse().expect("numeric suffix");
        assert!(suffix < 99);
    }

    #[test]
    fn located_portrait_is_used_for_every_size() {
        let names = NameTables::empty();
        let options = GenerateOptions {
            male_portraits: 1,
            ..GenerateOptions::default()
        };
        let builder = IdentityRecordBuilder::new(&names, &EchoLocator, &options, fixed_now());
        let record = builder.build(&mut SeededValueStream::new(1), Some(Gender::Male));

        let expected = "mem://profile-generator/male/portrait (0).png";
        assert_eq!(record.picture.large, expected);
        assert_eq!(record.picture.medium, expected);
        assert_eq!(record.picture.thumbnail, expected);
    }

    struct PanickingLocator;

    impl AssetLocator for PanickingLocator {
        fn locate(
            &self,
            _bucket: &str,
            _object_key: &str,
            _ttl: std::time::Duration,
        ) -> Result<String, LocatorError> {
            panic!("storage client exploded");
        }
    }

    #[test]
    fn locator_panic_falls_back_to_placeholders() {
        let names = NameTables::empty();
        let options = GenerateOptions::default();
        let builder = IdentityRecordBuilder::new(&names, &PanickingLocator, &options, fixed_now());
        let mut stream = SeededValueStream::new(4);
        let record = builder.build(&mut stream, Some(Gender::Male));
        assert_eq!(record.picture, placeholder_picture(Gender::Male));

        let mut reference = SeededValueStream::new(4);
        let expected = IdentityRecordBuilder::new(&names, &UnconfiguredLocator, &options, fixed_now())
            .build(&mut reference, Some(Gender::Male));
        assert_eq!(record, expected);
    }

    #[test]
    fn locator_failure_falls_back_to_placeholders() {
        let names = NameTables::empty();
        let options = GenerateOptions::default();
        let builder = IdentityRecordBuilder::new(&names, &UnconfiguredLocator, &options, fixed_now());
        let record = builder.build(&mut SeededValueStream::new(1), Some(Gender::Female));
        assert_eq!(record.picture, placeholder_picture(Gender::Female));
    }
}
