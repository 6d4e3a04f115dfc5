use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use facegate_client::wire::DetectResponse;
use facegate_client::{
    check_capture, compare_faces, ClientError, ExchangeRate, FaceApiClient, HttpRateSource,
    RateProvider,
};
use facegate_core::{evaluate_quality, CaptureError, CaptureSession, Presentation, QualityVerdict};
use serde::Serialize;
use std::path::{Path, PathBuf};

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "facegate", about = "Profile photo quality gate")]
struct Cli {
    /// TOML configuration file (defaults to $FACEGATE_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print the verdict as JSON only
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a photo and check it is usable as a profile photo
    Check {
        image: PathBuf,
        /// Rejections already seen in this capture session
        #[arg(long, default_value_t = 0)]
        failures: u32,
    },
    /// Score a saved analysis response without calling the service
    Score {
        response: PathBuf,
        #[arg(long, default_value_t = 0)]
        failures: u32,
    },
    /// Compare two photos of the same person
    Compare { first: PathBuf, second: PathBuf },
    /// Fetch the current exchange rate, optionally converting an amount
    Rate { amount: Option<f64> },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Check { image, failures } => {
            let bytes = read_file(&image)?;
            let client = FaceApiClient::new(config.face_api)?;
            let mut session = CaptureSession::with_failures(failures);
            let verdict = check_capture(&client, &bytes, &mut session).await;
            emit(cli.json, &verdict, Presentation::from(&verdict))?;
        }
        Commands::Score { response, failures } => {
            let text = std::fs::read_to_string(&response)
                .with_context(|| format!("reading {}", response.display()))?;
            let verdict = score_response(&text, failures)
                .with_context(|| format!("parsing {}", response.display()))?;
            emit(cli.json, &verdict, Presentation::from(&verdict))?;
        }
        Commands::Compare { first, second } => {
            let first = read_file(&first)?;
            let second = read_file(&second)?;
            let client = FaceApiClient::new(config.face_api)?;
            let verdict = compare_faces(&client, &first, &second).await;
            emit(cli.json, &verdict, Presentation::from(&verdict))?;
        }
        Commands::Rate { amount } => {
            let fallback = ExchangeRate::fallback(&config.rates);
            let provider = RateProvider::new(HttpRateSource::new(config.rates)?, fallback);
            if let Err(err) = provider.refresh().await {
                eprintln!("{}", refresh_warning(&err));
            }
            let rate = provider.get().await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&rate)?);
            } else {
                println!("1 {} = {} {}", rate.base, rate.rate, rate.quote);
                if let Some(amount) = amount {
                    println!("{amount:.2} {} = {:.2} {}", rate.base, rate.convert(amount), rate.quote);
                }
            }
        }
    }

    Ok(())
}

fn refresh_warning(err: &ClientError) -> String {
    format!("warning: {err}; using fallback rate")
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

/// Score a saved analysis response body.
fn score_response(text: &str, failures: u32) -> Result<QualityVerdict> {
    let mut response: DetectResponse = serde_json::from_str(text)?;
    if let Some(message) = response.error_message.take() {
        return Ok(QualityVerdict::rejected(
            CaptureError::TransportError { message },
            failures,
            None,
        ));
    }
    Ok(evaluate_quality(&response.into_faces(), failures))
}

fn emit<T: Serialize>(json: bool, verdict: &T, view: Presentation) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(verdict)?);
    } else {
        print!("{view}");
    }
    Ok(())
}
