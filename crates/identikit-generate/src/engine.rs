use std::sync::Arc;
use std::time::Instant;

use identikit_core::{BatchInfo, BatchRequest, BatchResult, Gender};
use tracing::{debug, warn};

use crate::assets::NameTables;
use crate::builder::IdentityRecordBuilder;
use crate::errors::{GenerationError, panic_message};
use crate::locator::{AssetLocator, UnconfiguredLocator};
use crate::model::GenerateOptions;
use crate::stream::SeededValueStream;

/// Produces batches of identity records.
///
/// The HTTP layer depends on this seam rather than on [`BatchGenerator`] so
/// handlers can be exercised with stub generators.
pub trait UserGenerator: Send + Sync {
    fn generate(&self, request: &BatchRequest) -> Result<BatchResult, GenerationError>;
}

/// Deterministic batch generator.
///
/// One [`SeededValueStream`] keyed by `seed + page` drives every record of a
/// batch, so a batch is fully determined by the effective seed, the count,
/// the requested gender, the name tables and the reference clock.
#[derive(Clone)]
pub struct BatchGenerator {
    names: Arc<NameTables>,
    locator: Arc<dyn AssetLocator>,
    options: GenerateOptions,
}

impl BatchGenerator {
    pub fn new(
        names: Arc<NameTables>,
        locator: Arc<dyn AssetLocator>,
        options: GenerateOptions,
    ) -> Self {
        Self {
            names,
            locator,
            options,
        }
    }

    /// Generator with bundled names and placeholder pictures only.
    pub fn offline(options: GenerateOptions) -> Self {
        Self::new(
            Arc::new(NameTables::bundled()),
            Arc::new(UnconfiguredLocator),
            options,
        )
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    pub fn generate_batch(
        &self,
        count: usize,
        seed: i64,
        page: u32,
        gender: Option<Gender>,
    ) -> Result<BatchResult, GenerationError> {
        let start = Instant::now();
        let effective_seed = seed.wrapping_add(i64::from(page));

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let builder = IdentityRecordBuilder::new(
                &self.names,
                self.locator.as_ref(),
                &self.options,
                self.options.clock.today(),
            );
            let mut stream = SeededValueStream::new(effective_seed);
            (0..count)
                .map(|_| builder.build(&mut stream, gender))
                .collect::<Vec<_>>()
        }));

        match outcome {
            Ok(results) => {
                debug!(
                    seed = effective_seed,
                    count,
                    page,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "batch generated"
                );
                Ok(BatchResult {
                    info: BatchInfo {
                        seed: effective_seed.to_string(),
                        results: results.len(),
                        page,
                    },
                    results,
                })
            }
            Err(panic) => {
                let message = panic_message(panic);
                warn!(seed = effective_seed, count, error = %message, "batch generation panicked");
                Err(GenerationError::Failed(message))
            }
        }
    }
}

impl UserGenerator for BatchGenerator {
    fn generate(&self, request: &BatchRequest) -> Result<BatchResult, GenerationError> {
        self.generate_batch(request.count, request.seed, request.page, request.gender)
    }
}
