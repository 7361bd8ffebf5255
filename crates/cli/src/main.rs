use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use stockcast_core::client::HttpPredictionClient;
use stockcast_core::controller::{Completion, Controller};
use stockcast_core::domain::catalog;
use stockcast_core::domain::query::DateRange;
use stockcast_core::storage::JsonFileStore;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;
mod shell;

#[derive(Debug, Parser)]
#[command(name = "stockcast", about = "Stock price prediction client")]
struct Args {
    /// Prediction service base URL. Overrides PREDICTION_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Key-value store file. Overrides STOCKCAST_STORE_PATH.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Request a prediction and render it.
    Predict {
        symbol: String,

        /// Historical window: 7d, 30d, 60d or 90d.
        #[arg(long, default_value_t = DateRange::default())]
        range: DateRange,

        /// Print the chart specification as JSON instead of the text view.
        #[arg(long)]
        json: bool,

        /// Width of the text chart bars.
        #[arg(long, default_value_t = 40)]
        width: usize,
    },
    /// List catalog tickers matching a symbol prefix or name fragment.
    Suggest { input: String },
    /// List the popular ticker shortcuts.
    Popular,
    /// List recently viewed symbols.
    Recent,
    /// Interactive session.
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut settings = stockcast_core::config::Settings::from_env()?;
    if let Some(base_url) = args.base_url.clone() {
        settings.prediction_base_url = base_url;
    }
    if let Some(store) = args.store.clone() {
        settings.store_path = store;
    }

    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let client = HttpPredictionClient::from_settings(&settings)
        .context("failed to set up prediction client")?;
    let store = JsonFileStore::open(&settings.store_path);
    tracing::debug!(url = client.url(), store = %store.path().display(), "starting");

    let mut controller = Controller::new(store, Arc::new(client));

    match args.command {
        Command::Predict {
            symbol,
            range,
            json,
            width,
        } => {
            controller.input(&symbol);
            controller.set_date_range(range);

            let completion = controller.submit().await?;
            report_failure(&completion);

            if json {
                match controller.chart() {
                    Some(spec) => println!("{}", serde_json::to_string_pretty(&spec)?),
                    None => eprintln!("{}", render::panel(&controller, width).join("\n")),
                }
            } else {
                println!("{}", render::panel(&controller, width).join("\n"));
            }

            if matches!(completion, Completion::Succeeded { .. }) {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Suggest { input } => {
            let matches = catalog::suggestions(&input.to_uppercase());
            println!("{}", render::suggestions(&matches).join("\n"));
            Ok(ExitCode::SUCCESS)
        }
        Command::Popular => {
            println!("{}", render::popular(controller.popular()).join("\n"));
            Ok(ExitCode::SUCCESS)
        }
        Command::Recent => {
            println!("{}", render::recent(controller.recent()).join("\n"));
            Ok(ExitCode::SUCCESS)
        }
        Command::Shell => {
            shell::run(&mut controller).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Sends the underlying cause of a failed submission to Sentry. The UI never sees it.
pub(crate) fn report_failure(completion: &Completion) {
    if let Completion::Failed(err) = completion {
        let err = anyhow::Error::new(err.clone());
        sentry_anyhow::capture_anyhow(&err);
        tracing::debug!(error = %err, "reported prediction failure");
    }
}

fn init_sentry(settings: &stockcast_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
