use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Gender of a generated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Honorific derived from the gender; never consumes a draw.
    pub fn title(self) -> &'static str {
        match self {
            Gender::Male => "Mr",
            Gender::Female => "Ms",
        }
    }

    /// Parse `male`/`female`, ignoring ASCII case.
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("male") {
            Some(Gender::Male)
        } else if value.eq_ignore_ascii_case("female") {
            Some(Gender::Female)
        } else {
            None
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthetic identity as served by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IdentityRecord {
    pub gender: Gender,
    pub name: PersonName,
    pub location: Location,
    pub email: String,
    pub login: Login,
    /// Date of birth.
    pub dob: DatedAge,
    pub registered: DatedAge,
    pub phone: String,
    pub cell: String,
    pub id: Identifier,
    pub picture: Picture,
    /// Nationality code.
    pub nat: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PersonName {
    pub title: String,
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub street: Street,
    pub city: String,
    pub state: String,
    pub country: String,
    /// Five zero-padded digits.
    pub postcode: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Street {
    pub number: u32,
    pub name: String,
}

/// Coordinates rendered with four decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinates {
    pub latitude: String,
    pub longitude: String,
}

/// Login block. The hash-like fields are random hex of digest length, not
/// digests of anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Login {
    pub uuid: String,
    pub username: String,
    pub password: String,
    pub salt: String,
    pub md5: String,
    pub sha1: String,
    pub sha256: String,
}

/// An RFC 3339 timestamp and the whole-year age it represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DatedAge {
    pub date: String,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Identifier {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Picture {
    pub large: String,
    pub medium: String,
    pub thumbnail: String,
}

/// Rendition sizes of a portrait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureSize {
    Large,
    Medium,
    Thumbnail,
}

impl PictureSize {
    pub const ALL: [PictureSize; 3] = [
        PictureSize::Large,
        PictureSize::Medium,
        PictureSize::Thumbnail,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PictureSize::Large => "large",
            PictureSize::Medium => "medium",
            PictureSize::Thumbnail => "thumbnail",
        }
    }
}

/// Echo metadata returned alongside a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BatchInfo {
    /// Effective seed, as a decimal string so 64-bit values survive JSON clients.
    pub seed: String,
    /// Number of records in the batch.
    pub results: usize,
    pub page: u32,
}

/// Response body for a generation request. Record order is generation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BatchResult {
    pub results: Vec<IdentityRecord>,
    pub info: BatchInfo,
}
