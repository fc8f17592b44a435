use std::time::Duration;

use identikit_core::Gender;

use crate::clock::ReferenceClock;

/// Default storage bucket holding portrait images.
pub const DEFAULT_BUCKET: &str = "profile-generator";
/// Lifetime of located portrait URLs.
pub const PORTRAIT_TTL: Duration = Duration::from_secs(10 * 60);

/// Options for the generation engine.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Bucket passed to the asset locator.
    pub bucket: String,
    /// TTL requested for located portrait URLs.
    pub portrait_ttl: Duration,
    /// Number of male portraits available in the bucket.
    pub male_portraits: u32,
    /// Number of female portraits available in the bucket.
    pub female_portraits: u32,
    /// Reference for date arithmetic.
    pub clock: ReferenceClock,
}

impl GenerateOptions {
    /// Size of the portrait pool the photo index is drawn from.
    pub fn portrait_pool(&self, gender: Gender) -> u32 {
        match gender {
            Gender::Male => self.male_portraits,
            Gender::Female => self.female_portraits,
        }
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            portrait_ttl: PORTRAIT_TTL,
            male_portraits: 47,
            female_portraits: 25,
            clock: ReferenceClock::System,
        }
    }
}
