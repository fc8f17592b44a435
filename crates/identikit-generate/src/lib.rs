//! Deterministic identity generation for Identikit.
//!
//! A [`BatchGenerator`] turns a seed, page, count and optional gender into a
//! batch of [`identikit_core::IdentityRecord`]s. Every value comes from one
//! [`SeededValueStream`] consumed in a fixed order, so identical inputs yield
//! identical batches under a fixed [`ReferenceClock`].

pub mod assets;
pub mod builder;
pub mod clock;
pub mod engine;
pub mod errors;
pub mod locator;
pub mod model;
pub mod stream;

pub use assets::NameTables;
pub use builder::IdentityRecordBuilder;
pub use clock::ReferenceClock;
pub use engine::{BatchGenerator, UserGenerator};
pub use errors::{GenerationError, LocatorError};
pub use locator::{AssetLocator, SignedUrlLocator, UnconfiguredLocator, placeholder_picture};
pub use model::{DEFAULT_BUCKET, GenerateOptions, PORTRAIT_TTL};
pub use stream::SeededValueStream;
