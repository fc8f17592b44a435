use crate::error::{Error, Result};
use crate::record::Gender;

/// Number of records served when `results` is missing or unusable.
pub const DEFAULT_RESULTS: usize = 1;
/// Page used when `page` is missing or unusable.
pub const DEFAULT_PAGE: u32 = 1;

/// Raw query parameters as received at the boundary.
///
/// Nothing here is trusted: every field is normalized by the `parse_*`
/// helpers, which substitute defaults instead of failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<'a> {
    pub results: Option<&'a str>,
    pub seed: Option<&'a str>,
    pub page: Option<&'a str>,
    pub gender: Option<&'a str>,
}

/// A normalized generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRequest {
    pub count: usize,
    pub seed: i64,
    pub page: u32,
    /// `None` draws a gender per record.
    pub gender: Option<Gender>,
}

impl BatchRequest {
    /// Normalize raw query parameters. `fallback_seed` is used when no usable
    /// seed was supplied.
    pub fn from_query(params: QueryParams<'_>, max_results: usize, fallback_seed: i64) -> Self {
        Self {
            count: parse_results(params.results, max_results),
            seed: parse_seed(params.seed, fallback_seed),
            page: parse_page(params.page),
            gender: parse_gender(params.gender),
        }
    }

    /// Seed actually used to key the draw stream: `seed + page`, wrapping.
    pub fn effective_seed(&self) -> i64 {
        self.seed.wrapping_add(i64::from(self.page))
    }

    /// Strict check for callers that prefer rejecting over clamping.
    pub fn validate(&self, max_results: usize) -> Result<()> {
        if self.count == 0 {
            return Err(Error::InvalidRequest(
                "results must be at least 1".to_string(),
            ));
        }
        if self.count > max_results {
            return Err(Error::InvalidRequest(format!(
                "results must be at most {max_results}"
            )));
        }
        Ok(())
    }
}

/// `results` in `1..=max_results`; anything else becomes [`DEFAULT_RESULTS`].
pub fn parse_results(value: Option<&str>, max_results: usize) -> usize {
    value
        .and_then(|raw| raw.parse::<usize>().ok())
        .filter(|count| (1..=max_results).contains(count))
        .unwrap_or(DEFAULT_RESULTS)
}

/// Signed 64-bit seed; unparseable or empty values fall back.
pub fn parse_seed(value: Option<&str>, fallback: i64) -> i64 {
    value
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| raw.parse::<i64>().ok())
        .unwrap_or(fallback)
}

/// Page number, at least 1.
pub fn parse_page(value: Option<&str>) -> u32 {
    value
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|page| *page > 0)
        .unwrap_or(DEFAULT_PAGE)
}

/// `male`/`female`; empty or unknown values mean "random per record".
pub fn parse_gender(value: Option<&str>) -> Option<Gender> {
    value.and_then(Gender::parse)
}
