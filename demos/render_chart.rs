//! Render the earnings move chart from an in-code dataset
//!
//! This demo shows the rendering pipeline without needing the CSV export.

use std::path::Path;

use chrono::NaiveDate;
use mmm_earnings::chart::{MoveChartRenderer, CHART_TITLE};
use mmm_earnings::data::{Observation, ObservationSet};

fn main() -> anyhow::Result<()> {
    println!("=== Earnings Move Chart Demo ===\n");

    let output_dir = Path::new("output");
    if !output_dir.exists() {
        std::fs::create_dir_all(output_dir)?;
    }

    // A small slice of the Q1 2018 earnings week
    let date = NaiveDate::from_ymd_opt(2018, 1, 31).unwrap();
    let observations = ObservationSet::with_data(vec![
        Observation::new(date, "X", 1.8, -42.0),
        Observation::new(date, "MO", -0.6, -28.0),
        Observation::new(date, "V", 0.4, -51.0),
        Observation::new(date, "PFE", -1.3, -33.0),
        Observation::new(date, "EBAY", 2.4, -55.0),
        Observation::new(date, "FB", 1.1, -61.0),
    ]);

    println!("Rendering {} observations...", observations.len());
    let renderer = MoveChartRenderer::new();
    let image = renderer.render(&observations)?;
    image.save(output_dir.join("move_chart.png"))?;
    println!("  Saved: output/move_chart.png");

    println!("Rendering a small canvas...");
    let small = MoveChartRenderer::new().with_size(640, 480);
    let image = small.render(&observations)?;
    image.save(output_dir.join("move_chart_small.png"))?;
    println!("  Saved: output/move_chart_small.png");

    println!("\nChart title: {}", CHART_TITLE);
    let outside = observations.count_outside_predicted();
    println!(
        "{} of {} moves landed outside the predicted envelope",
        outside,
        observations.len()
    );

    Ok(())
}
