mod config;
mod http;
mod telemetry;

use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use identikit_admission::AdmissionController;
use identikit_core::{BatchRequest, BatchResult, Error as CoreError, parse_gender, validate_record};
use identikit_generate::{
    AssetLocator, BatchGenerator, GenerateOptions, GenerationError, NameTables, SignedUrlLocator,
    UnconfiguredLocator, UserGenerator,
};
use thiserror::Error;
use tokio::signal;
use tracing::{info, warn};

use config::{DEFAULT_MAX_RESULTS, ServeArgs, ServerConfig};
use http::AppState;
use telemetry::{LogFormat, init_logging};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config file error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

#[derive(Parser, Debug)]
#[command(name = "identikit", version, about = "Deterministic fake identity generator")]
struct Cli {
    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
    /// Append logs to this file instead of stderr.
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve `GET /api` over HTTP.
    Serve(ServeArgs),
    /// Print one batch as JSON.
    Generate(GenerateArgs),
    /// Print the JSON Schema of a batch response.
    Schema,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of records.
    #[arg(long, default_value_t = 1)]
    results: usize,
    /// Seed; defaults to the current time in nanoseconds.
    #[arg(long, allow_negative_numbers = true)]
    seed: Option<i64>,
    /// Page added to the seed.
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// `male` or `female`; anything else draws a gender per record.
    #[arg(long)]
    gender: Option<String>,
    /// Directory with name tables; bundled tables otherwise.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Pretty-print the JSON output.
    #[arg(long, default_value_t = false)]
    pretty: bool,
    /// Validate every record's field formats before printing.
    #[arg(long, default_value_t = false)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_file.as_deref())?;

    match cli.command {
        Command::Serve(args) => run_serve(args).await,
        Command::Generate(args) => run_generate(args),
        Command::Schema => run_schema(),
    }
}

async fn run_serve(args: ServeArgs) -> Result<(), CliError> {
    let config = ServerConfig::load(args)?;
    info!(
        listen = %config.listen,
        limit = config.quota.limit,
        max_results = config.max_results,
        reset_interval_secs = config.quota.reset_interval.as_secs(),
        bucket = %config.bucket,
        "starting identikit server"
    );

    let names = load_names(config.data_dir.as_ref())?;
    let locator: Arc<dyn AssetLocator> = match &config.locator {
        Some(locator) => Arc::new(SignedUrlLocator::new(
            &locator.endpoint,
            &locator.key_id,
            locator.secret.as_bytes(),
        )),
        None => {
            info!("no portrait locator configured; serving placeholder pictures");
            Arc::new(UnconfiguredLocator)
        }
    };
    let generator = BatchGenerator::new(
        Arc::new(names),
        locator,
        GenerateOptions {
            bucket: config.bucket.clone(),
            ..GenerateOptions::default()
        },
    );

    let admission = Arc::new(AdmissionController::new(config.quota));
    let sweeper = admission.start_sweeper();

    let app = http::router(AppState {
        generator: Arc::new(generator),
        admission,
        max_results: config.max_results,
        trust_forwarded_for: config.trust_forwarded_for,
    });

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    sweeper.stop().await;
    info!("server shut down");
    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let request = BatchRequest {
        count: args.results,
        seed: args
            .seed
            .unwrap_or_else(|| chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()),
        page: args.page,
        gender: parse_gender(args.gender.as_deref()),
    };
    request.validate(DEFAULT_MAX_RESULTS)?;

    let generator = BatchGenerator::new(
        Arc::new(load_names(args.data_dir.as_ref())?),
        Arc::new(UnconfiguredLocator),
        GenerateOptions::default(),
    );
    let batch = generator.generate(&request)?;

    if args.check {
        for record in &batch.results {
            validate_record(record)?;
        }
        info!(records = batch.results.len(), "all records passed format checks");
    }

    write_json(&batch, args.pretty)
}

fn run_schema() -> Result<(), CliError> {
    let schema = schemars::schema_for!(BatchResult);
    write_json(&schema, true)
}

fn load_names(data_dir: Option<&PathBuf>) -> Result<NameTables, CliError> {
    match data_dir {
        Some(dir) => Ok(NameTables::load(dir)?),
        None => Ok(NameTables::bundled()),
    }
}

fn write_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C"),
        () = terminate => info!("received SIGTERM"),
    }
    info!("shutting down gracefully");
}
