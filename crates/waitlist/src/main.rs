//! `waitlist` - CLI for the waitlist submission pipeline.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use waitlist::cli::{Cli, Command, ConfigCommand, FallbackCommand, JoinCommand, OutputFormat};
use waitlist::{
    init_logging, Config, FallbackLog, FallbackRecord, Field, HttpCollector, KeyValueStore,
    MemoryStore, SqliteStore, SubmissionViewState, Submitter, WaitlistForm, FALLBACK_KEY,
};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Join(join_cmd) => handle_join(&config, join_cmd).await,
        Command::Fallback(fallback_cmd) => {
            handle_fallback(&config, &fallback_cmd)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

async fn handle_join(config: &Config, cmd: JoinCommand) -> anyhow::Result<ExitCode> {
    let mut config = config.clone();
    if let Some(endpoint) = &cmd.endpoint {
        config.collector.endpoint.clone_from(endpoint);
        config.validate()?;
    }

    let store: Arc<dyn KeyValueStore> = if cmd.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        let path = config.database_path();
        Arc::new(
            SqliteStore::open(&path)
                .with_context(|| format!("opening fallback store at {}", path.display()))?,
        )
    };

    let collector = HttpCollector::from_config(&config.collector)?;
    let form = WaitlistForm::new(Submitter::new(Arc::new(collector), FallbackLog::new(store)));

    let draft = cmd.draft();
    for field in Field::ALL {
        form.set_field(field, draft.get(field));
    }

    form.submit().await;
    print!("{}", form.view());

    Ok(match form.state() {
        SubmissionViewState::Submitted => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

fn handle_fallback(config: &Config, cmd: &FallbackCommand) -> anyhow::Result<()> {
    let path = config.database_path();
    match cmd {
        FallbackCommand::Path => println!("{}", path.display()),
        FallbackCommand::List { format } => {
            let (_, records) = open_fallback(&path)?;
            print_records(&records, *format)?;
        }
        FallbackCommand::Count => {
            let (store, records) = open_fallback(&path)?;
            println!("{}", records.len());
            if let Some(store) = store {
                if let Some(updated) = store.updated_at(FALLBACK_KEY)? {
                    println!("Last captured: {}", updated.to_rfc3339());
                }
            }
        }
    }
    Ok(())
}

/// Open the fallback log read-only in spirit: a missing database is reported
/// as empty rather than created.
fn open_fallback(path: &Path) -> anyhow::Result<(Option<Arc<SqliteStore>>, Vec<FallbackRecord>)> {
    if !path.exists() {
        return Ok((None, Vec::new()));
    }
    let store = Arc::new(
        SqliteStore::open(path)
            .with_context(|| format!("opening fallback store at {}", path.display()))?,
    );
    let records = FallbackLog::new(store.clone()).read()?;
    Ok((Some(store), records))
}

fn print_records(records: &[FallbackRecord], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Plain => {
            for record in records {
                println!(
                    "{} {} <{}>: {}",
                    captured_at(record),
                    record.name,
                    record.email,
                    record.pain
                );
            }
        }
        OutputFormat::Table => {
            if records.is_empty() {
                println!("No fallback submissions.");
                return Ok(());
            }
            let name_width = column_width("NAME", records.iter().map(|r| r.name.as_str()));
            let email_width = column_width("EMAIL", records.iter().map(|r| r.email.as_str()));
            println!(
                "{:<25}  {:<name_width$}  {:<email_width$}  PAIN",
                "CAPTURED", "NAME", "EMAIL"
            );
            for record in records {
                println!(
                    "{:<25}  {:<name_width$}  {:<email_width$}  {}",
                    captured_at(record),
                    record.name,
                    record.email,
                    record.pain.replace('\n', " ")
                );
            }
        }
    }
    Ok(())
}

fn captured_at(record: &FallbackRecord) -> String {
    record
        .captured_at()
        .map_or_else(|| record.timestamp.to_string(), |dt| dt.to_rfc3339())
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(header.len())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Collector]");
                println!("  Endpoint:           {}", config.collector.endpoint);
                match config.collector.timeout() {
                    Some(timeout) => println!("  Timeout:            {}s", timeout.as_secs()),
                    None => println!("  Timeout:            none"),
                }
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
