//! CLI tool for the predicted (MMM) vs. actual earnings move chart
//!
//! Loads the recorded earnings-week dataset, renders the annotated chart,
//! saves it, and prints a per-ticker summary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mmm_earnings::chart::{MoveChartRenderer, CHART_TITLE};
use mmm_earnings::data::ObservationSet;
use mmm_earnings::DEFAULT_INPUT;

#[derive(Parser)]
#[command(name = "mmm_earnings")]
#[command(about = "Render the predicted (MMM) vs. actual earnings move chart", long_about = None)]
struct Cli {
    /// Input CSV file with the recorded earnings data
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output image file (defaults to the chart title with a .png extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value = "960")]
    height: u32,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mmm_earnings=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.png", CHART_TITLE)));

    let observations = ObservationSet::from_csv(&cli.input)
        .with_context(|| format!("loading {}", cli.input.display()))?;
    tracing::info!("Loaded {} observations from {}", observations.len(), cli.input.display());

    let renderer = MoveChartRenderer::new().with_size(cli.width, cli.height);
    let image = renderer.render(&observations)?;

    image
        .save(&output)
        .with_context(|| format!("saving {}", output.display()))?;
    tracing::info!("Saved chart to {}", output.display());

    print_summary(&observations);

    Ok(())
}

fn print_summary(observations: &ObservationSet) {
    println!("\n{:<12} {:<8} {:>12} {:>12} {:>10}",
        "Date", "Ticker", "Move Ratio", "IV Crush", "Predicted");
    println!("{}", "-".repeat(58));

    for obs in &observations.data {
        let verdict = if obs.within_predicted() { "within" } else { "outside" };
        println!("{:<12} {:<8} {:>12.2} {:>12.1} {:>10}",
            obs.date.format("%Y-%m-%d"),
            obs.ticker,
            obs.move_ratio,
            obs.iv_crush_rank,
            verdict);
    }

    let ratios = observations.move_ratios();
    let abs_ratios: Vec<f64> = ratios.iter().map(|r| r.abs()).collect();
    let crushes = observations.crush_ranks();
    let outside = observations.count_outside_predicted();

    println!("\n--- Statistics ---");
    println!("Moves outside predicted envelope: {} of {}", outside, observations.len());
    println!("Mean |move ratio|: {:.2} (std {:.2})", mean(&abs_ratios), std(&abs_ratios));
    println!("Mean IV crush rank: {:.1}", mean(&crushes));
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() { return 0.0; }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std(values: &[f64]) -> f64 {
    if values.len() < 2 { return 0.0; }
    let m = mean(values);
    let variance = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
