//! Core contracts for Identikit.
//!
//! This crate defines the identity record shapes served by the API, the
//! request normalization rules applied at the boundary, and validation
//! helpers shared by the generator, the server, and the CLI.

pub mod error;
pub mod record;
pub mod request;
pub mod validation;

pub use error::{Error, Result};
pub use record::{
    BatchInfo, BatchResult, Coordinates, DatedAge, Gender, Identifier, IdentityRecord, Location,
    Login, PersonName, Picture, PictureSize, Street,
};
pub use request::{
    BatchRequest, DEFAULT_PAGE, DEFAULT_RESULTS, QueryParams, parse_gender, parse_page,
    parse_results, parse_seed,
};
pub use validation::validate_record;
