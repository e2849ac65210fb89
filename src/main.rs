mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use wellknown::config::Config;
use wellknown::settings::{ConfigStore, FjallConfigStore};
use wellknown::{api, content_type, observability};

type AnyError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();
    let config =
        Config::load().map_err(|e| format!("Failed to load config: {}", e))?;
    observability::init_tracing(&config.logging.filter);

    match cli.command {
        Commands::Server(args) => {
            let address = args.address.unwrap_or(config.server.bind_addr);
            api::run(config, address).await?
        }
        Commands::CheckType(args) => check_type(&args.value),
        Commands::List => list(&config)?,
    }

    Ok(())
}

fn check_type(value: &str) {
    let validation = content_type::validate(value);
    if validation.is_valid() {
        if validation.normalized.is_empty() {
            println!("(empty: site default type)");
        } else {
            println!("{}", validation.normalized);
        }
        return;
    }

    for error in &validation.errors {
        eprintln!("{error}");
    }
    std::process::exit(1);
}

fn list(config: &Config) -> Result<(), AnyError> {
    let store = FjallConfigStore::open(&config.server.store_path)
        .map_err(|e| format!("Failed to open settings store: {}", e))?;
    let entries = store
        .load()
        .map_err(|e| format!("Failed to load settings: {}", e))?;

    if entries.is_empty() {
        println!("Not configured");
        return Ok(());
    }

    for (index, entry) in entries.iter_indexed() {
        let content_type = if entry.content_type.is_empty() {
            "(default)"
        } else {
            entry.content_type.as_str()
        };
        println!(
            "{index:>3}  {}  {}  {} bytes",
            entry.suffix,
            content_type,
            entry.contents.len()
        );
    }

    Ok(())
}
