use crate::error::CliError;
use clap::Parser;
use commands::Commands;
use engine_config::{
    env::EnvContext,
    settings::{LoaderConfig, run::RunSettings},
};
use engine_core::coordinator::RunCoordinator;
use model::records::page::PageWindow;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod handler;
mod output;

#[derive(Parser)]
#[command(
    name = "nyc311-loader",
    version = "0.1.0",
    about = "Daily extract of NYC 311 service requests into object storage"
)]
struct Cli {
    #[arg(long, global = true, help = "Load KEY=VALUE settings from this file")]
    env_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Initialize logger
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = load_config(cli.env_file.as_deref())?;

    match cli.command {
        Commands::Run {
            run_date,
            batch_size,
            output,
        } => {
            let batch_size = batch_size.unwrap_or(config.batch_size);
            let settings = RunSettings::resolve_now(run_date.as_deref(), batch_size)?;
            let mut run = RunCoordinator::from_config(&config, settings);
            let report = run.execute().await?;

            match output {
                Some(path) => output::write_report(&report, path).await?,
                None => output::print_report(&report)?,
            }
        }
        Commands::Invoke { event } => {
            let event = handler::parse_event(&event)?;
            info!("Handling invocation event: {:?}", event);

            let result = handler::handle(event, &config).await?;
            println!("{}", serde_json::to_string(&result)?);
        }
        Commands::Query {
            run_date,
            offset,
            limit,
        } => {
            let limit = limit.unwrap_or(config.batch_size);
            let settings = RunSettings::resolve_now(run_date.as_deref(), limit)?;
            let window = PageWindow {
                offset,
                limit: settings.batch_size,
            };

            let fetcher = config.source.fetcher();
            let url = fetcher
                .query(settings.run_date, window)
                .to_url(fetcher.base_url())?;
            println!("{url}");
        }
    }

    Ok(())
}

fn load_config(env_file: Option<&str>) -> Result<LoaderConfig, CliError> {
    let mut env = EnvContext::from_system();
    if let Some(path) = env_file {
        env.load_from_file(path)?;
    }
    let config = LoaderConfig::from_env(&env)?;
    Ok(config)
}
