use clap::Parser;
use returncast::application::render::RenderRequest;
use returncast::application::system::Application;
use returncast::config::Config;
use returncast::domain::market::{COMPANIES, company_by_symbol};
use returncast::domain::ml::SCENARIO_PRECISION;
use std::path::PathBuf;
use tracing::Level;

/// Builds the market scenario for one company and optionally runs the model
/// on it, without the dashboard.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ticker of one of the supported companies
    #[arg(long, default_value = "AAPL")]
    symbol: String,

    /// Run the model on the assembled scenario
    #[arg(long)]
    predict: bool,

    /// Print the outcome as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Model bundle path (overrides MODEL_PATH)
    #[arg(long)]
    model: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let Some(company) = company_by_symbol(&args.symbol) else {
        let known: Vec<&str> = COMPANIES.iter().map(|c| c.symbol).collect();
        anyhow::bail!(
            "Unsupported symbol {}. Choose one of: {}",
            args.symbol,
            known.join(", ")
        );
    };

    let mut config = Config::from_env()?;
    if let Some(path) = args.model {
        config.model.model_path = path;
    }

    let app = Application::build(config)?;
    let mut handler = app.render_handler();

    let request = if args.predict {
        RenderRequest::predict(company.symbol)
    } else {
        RenderRequest::render(company.symbol)
    };
    let outcome = handler.handle(request).await;

    if args.json {
        let body = serde_json::json!({
            "symbol": company.symbol,
            "stage": outcome.stage.to_string(),
            "scenario": outcome.scenario,
            "model": outcome.model.as_ref().map(|m| serde_json::json!({
                "name": m.name,
                "version": m.version,
                "feature_order": m.feature_order,
            })),
            "expected_return": outcome.prediction.map(|p| p.expected_return),
            "error": outcome.error.as_ref().map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("{}", company.label);
        if let Some(scenario) = &outcome.scenario {
            println!("Scenario as of {}", scenario.as_of);
            for (name, value) in scenario.features.entries() {
                println!("  {:<20} {:>12.*}", name, SCENARIO_PRECISION as usize, value);
            }
        }
        if let Some(model) = &outcome.model {
            println!("Model loaded: {} ({})", model.name, model.version);
        }
        if let Some(prediction) = &outcome.prediction {
            println!("Expected close return: {}", prediction.percent_label());
        }
    }

    if let Some(err) = outcome.error {
        anyhow::bail!(err);
    }

    Ok(())
}
