use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::record::IdentityRecord;

const PASSWORD_LEN: usize = 12;
const SALT_LEN: usize = 16;
const MD5_LEN: usize = 32;
const SHA1_LEN: usize = 40;
const SHA256_LEN: usize = 64;

static UUID_V4: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$").ok()
});
static PHONE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\([0-9]{3}\)-[0-9]{3}-[0-9]{4}$").ok());
static DIGITS: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[0-9]+$").ok());
static ALPHANUMERIC: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").ok());
static LOWER_HEX: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[0-9a-f]+$").ok());

/// Validate the documented field formats of a generated record.
///
/// This checks:
/// - the login UUID is a lowercase, hyphenated RFC 4122 version 4 UUID
/// - postcode is five digits and the identifier value eight digits
/// - phone and cell follow `(DDD)-DDD-DDDD`
/// - password, salt and the hash-like fields have the right length and alphabet
pub fn validate_record(record: &IdentityRecord) -> Result<()> {
    let login = &record.login;

    if !is_uuid_v4(&login.uuid) {
        return invalid(format!("login.uuid is not a v4 uuid: {}", login.uuid));
    }
    if !is_digits(&record.location.postcode, 5) {
        return invalid(format!(
            "location.postcode must be 5 digits: {}",
            record.location.postcode
        ));
    }
    if !is_digits(&record.id.value, 8) {
        return invalid(format!("id.value must be 8 digits: {}", record.id.value));
    }
    for (field, value) in [("phone", &record.phone), ("cell", &record.cell)] {
        if !is_phone(value) {
            return invalid(format!("{field} must match (DDD)-DDD-DDDD: {value}"));
        }
    }
    if !is_alphanumeric(&login.password, PASSWORD_LEN) {
        return invalid(format!(
            "login.password must be {PASSWORD_LEN} alphanumeric characters"
        ));
    }
    for (field, value, len) in [
        ("salt", &login.salt, SALT_LEN),
        ("md5", &login.md5, MD5_LEN),
        ("sha1", &login.sha1, SHA1_LEN),
        ("sha256", &login.sha256, SHA256_LEN),
    ] {
        if !is_lower_hex(value, len) {
            return invalid(format!("login.{field} must be {len} lowercase hex characters"));
        }
    }

    Ok(())
}

fn invalid(message: String) -> Result<()> {
    Err(Error::InvalidRecord(message))
}

/// An uncompiled pattern matches nothing.
fn matches(pattern: &LazyLock<Option<Regex>>, value: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(value))
}

fn is_uuid_v4(value: &str) -> bool {
    matches(&UUID_V4, value)
}

fn is_phone(value: &str) -> bool {
    matches(&PHONE, value)
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && matches(&DIGITS, value)
}

fn is_alphanumeric(value: &str, len: usize) -> bool {
    value.len() == len && matches(&ALPHANUMERIC, value)
}

fn is_lower_hex(value: &str, len: usize) -> bool {
    value.len() == len && matches(&LOWER_HEX, value)
}
