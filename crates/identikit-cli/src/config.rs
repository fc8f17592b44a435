use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use identikit_admission::{
    DEFAULT_LIMIT, DEFAULT_REPORT_THRESHOLD, DEFAULT_RESET_INTERVAL, QuotaPolicy,
};
use identikit_generate::DEFAULT_BUCKET;
use serde::Deserialize;

use crate::CliError;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_RESULTS: usize = 5000;

/// Flags for `identikit serve`.
///
/// Every setting is optional here so that values from `--config` can fill
/// the gaps; flags and environment variables win over the file, and the file
/// wins over built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// TOML file with server settings.
    #[arg(long, env = "IDENTIKIT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Socket address to listen on [default: 0.0.0.0:8080].
    #[arg(long, env = "IDENTIKIT_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Records a client may request between two quota resets [default: 1000].
    #[arg(long, env = "IDENTIKIT_LIMIT")]
    pub limit: Option<u64>,

    /// Largest accepted `results` value [default: 5000].
    #[arg(long, env = "IDENTIKIT_MAX_RESULTS")]
    pub max_results: Option<usize>,

    /// Seconds between quota resets [default: 300].
    #[arg(long, env = "IDENTIKIT_RESET_INTERVAL_SECS")]
    pub reset_interval_secs: Option<u64>,

    /// Usage at which a client is logged during a reset; 0 disables [default: 1000].
    #[arg(long, env = "IDENTIKIT_REPORT_THRESHOLD")]
    pub report_threshold: Option<u64>,

    /// Storage bucket holding portraits [default: profile-generator].
    #[arg(long, env = "IDENTIKIT_BUCKET")]
    pub bucket: Option<String>,

    /// Directory with male_first.txt, female_first.txt and last.txt.
    #[arg(long, env = "IDENTIKIT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Key clients by the first X-Forwarded-For entry instead of the peer address.
    #[arg(long, env = "IDENTIKIT_TRUST_FORWARDED_FOR")]
    pub trust_forwarded_for: bool,

    /// Base URL of the portrait store.
    #[arg(long, env = "IDENTIKIT_LOCATOR_ENDPOINT")]
    pub locator_endpoint: Option<String>,

    /// Key id included in signed portrait URLs.
    #[arg(long, env = "IDENTIKIT_LOCATOR_KEY_ID")]
    pub locator_key_id: Option<String>,

    /// Secret used to sign portrait URLs.
    #[arg(long, env = "IDENTIKIT_LOCATOR_SECRET", hide_env_values = true)]
    pub locator_secret: Option<String>,
}

/// Contents of a `--config` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub listen: Option<SocketAddr>,
    pub limit: Option<u64>,
    pub max_results: Option<usize>,
    pub reset_interval_secs: Option<u64>,
    pub report_threshold: Option<u64>,
    pub bucket: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub trust_forwarded_for: Option<bool>,
    pub locator: Option<FileLocator>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileLocator {
    pub endpoint: Option<String>,
    pub key_id: Option<String>,
    pub secret: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct LocatorConfig {
    pub endpoint: String,
    pub key_id: String,
    pub secret: String,
}

impl std::fmt::Debug for LocatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocatorConfig")
            .field("endpoint", &self.endpoint)
            .field("key_id", &self.key_id)
            .field("secret", &"***")
            .finish()
    }
}

/// Validated settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub max_results: usize,
    pub quota: QuotaPolicy,
    pub bucket: String,
    pub data_dir: Option<PathBuf>,
    pub trust_forwarded_for: bool,
    pub locator: Option<LocatorConfig>,
}

impl ServerConfig {
    /// Read the `--config` file, if any, and merge it under the flags.
    pub fn load(args: ServeArgs) -> Result<Self, CliError> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::try_from((args, file))
    }
}

impl TryFrom<(ServeArgs, FileConfig)> for ServerConfig {
    type Error = CliError;

    fn try_from((args, file): (ServeArgs, FileConfig)) -> Result<Self, Self::Error> {
        let listen = match args.listen.or(file.listen) {
            Some(listen) => listen,
            None => DEFAULT_LISTEN
                .parse()
                .map_err(|err| CliError::Config(format!("bad default listen address: {err}")))?,
        };

        let max_results = args
            .max_results
            .or(file.max_results)
            .unwrap_or(DEFAULT_MAX_RESULTS);
        if max_results == 0 {
            return Err(CliError::Config(
                "max_results must be greater than 0".to_string(),
            ));
        }

        let reset_interval_secs = args
            .reset_interval_secs
            .or(file.reset_interval_secs)
            .unwrap_or(DEFAULT_RESET_INTERVAL.as_secs());
        if reset_interval_secs == 0 {
            return Err(CliError::Config(
                "reset_interval_secs must be greater than 0".to_string(),
            ));
        }

        let report_threshold = args
            .report_threshold
            .or(file.report_threshold)
            .unwrap_or(DEFAULT_REPORT_THRESHOLD);

        let file_locator = file.locator.unwrap_or_default();
        let locator = match (
            args.locator_endpoint.or(file_locator.endpoint),
            args.locator_key_id.or(file_locator.key_id),
            args.locator_secret.or(file_locator.secret),
        ) {
            (None, None, None) => None,
            (Some(endpoint), Some(key_id), Some(secret)) => Some(LocatorConfig {
                endpoint,
                key_id,
                secret,
            }),
            _ => {
                return Err(CliError::Config(
                    "locator endpoint, key id and secret must be set together".to_string(),
                ));
            }
        };

        Ok(Self {
            listen,
            max_results,
            quota: QuotaPolicy {
                limit: args.limit.or(file.limit).unwrap_or(DEFAULT_LIMIT),
                report_threshold: (report_threshold > 0).then_some(report_threshold),
                reset_interval: Duration::from_secs(reset_interval_secs),
            },
            bucket: args
                .bucket
                .or(file.bucket)
                .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            data_dir: args.data_dir.or(file.data_dir),
            trust_forwarded_for: args.trust_forwarded_for
                || file.trust_forwarded_for.unwrap_or(false),
            locator,
        })
    }
}
