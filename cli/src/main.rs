//! CLI entrypoint for qbank
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use qbank_application::{
    NoResolutionObserver, ProviderAnswerService, QuestionStore, ResolutionObserver,
    ResolveQuestionUseCase,
};
use qbank_infrastructure::{
    ConfigLoader, FileConfig, InMemoryQuestionStore, JsonlResolutionLogger, ProviderClient,
    build_answer_cache, open_question_store,
};
use qbank_presentation::{Cli, ConsoleFormatter, OutputFormat};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status for a rejected request (blank or oversized input)
const EXIT_INVALID_REQUEST: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };

    // Keep the guard alive so the file writer flushes on exit
    let _log_guard = init_logging(cli.verbose, &config)?;

    info!("Starting qbank");

    let question = match cli.question {
        Some(q) => q,
        None => bail!("Question is required. Use --show-config to inspect configuration."),
    };

    // === Dependency Injection ===
    let observer: Arc<dyn ResolutionObserver> = match config.logging.events_file.as_deref() {
        Some(path) => match JsonlResolutionLogger::new(path) {
            Some(logger) => Arc::new(logger),
            None => Arc::new(NoResolutionObserver),
        },
        None => Arc::new(NoResolutionObserver),
    };

    let cache = build_answer_cache(&config.to_cache_settings()?, observer.clone()).await;

    let store: Arc<dyn QuestionStore> = match open_question_store(&config.database.url).await {
        Ok(store) => store,
        Err(e) => {
            warn!(
                "Question store {} unavailable, using in-memory store: {}",
                config.database.url, e
            );
            Arc::new(InMemoryQuestionStore::new())
        }
    };

    let ai_settings = config.to_ai_settings()?;
    let provider = ProviderClient::select(&ai_settings, cli.provider.as_deref());
    if let Some(reason) = provider.stub_reason()
        && cli.output == OutputFormat::Text
    {
        eprintln!("{}", ConsoleFormatter::stand_in_notice(reason));
    }
    let provider = ProviderAnswerService::new(Arc::new(provider));

    let use_case = ResolveQuestionUseCase::new(cache, store, provider)
        .with_observer(observer)
        .with_params(config.to_resolver_params());

    let result = match use_case.resolve(&question, &cli.options, cli.kind).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(ExitCode::from(EXIT_INVALID_REQUEST));
        }
    };

    let output = match cli.output {
        OutputFormat::Text => ConsoleFormatter::format(&question, &result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };

    println!("{}", output);

    Ok(ExitCode::SUCCESS)
}

/// Initialize tracing: stderr always, plus the configured log file.
///
/// `-v` flags win over `logging.level`; `RUST_LOG` is not consulted.
fn init_logging(verbose: u8, config: &FileConfig) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => config.logging.level.as_deref().unwrap_or("warn"),
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter =
        EnvFilter::try_new(level).with_context(|| format!("invalid log level '{}'", level))?;

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match config.logging.file.as_deref() {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("logging.file '{}' has no file name", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("could not create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}
