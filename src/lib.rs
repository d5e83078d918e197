//! # MMM Earnings Move Chart
//!
//! A small analysis library for earnings-week data recorded around the
//! ThinkorSwim Market Maker Move (MMM) prediction: for each reporting
//! company, the ratio of the actual post-earnings move to the predicted
//! move, and the implied-volatility percentile crush across the event.
//!
//! The chart shows the move ratios as a labeled scatter with the IV
//! percentile crush as background bars. The shaded band between +1 and -1
//! is the region the MMM prediction encapsulates; any dot outside it is a
//! move beyond the expected envelope.
//!
//! ## Modules
//!
//! - [`data`] - Observation records and CSV I/O
//! - [`chart`] - Chart rendering onto an RGB canvas
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use mmm_earnings::chart::{MoveChartRenderer, CHART_TITLE};
//! use mmm_earnings::data::ObservationSet;
//!
//! fn main() -> anyhow::Result<()> {
//!     let observations = ObservationSet::from_csv("ToS_MMM.csv")?;
//!
//!     let renderer = MoveChartRenderer::new();
//!     let image = renderer.render(&observations)?;
//!
//!     image.save(format!("{}.png", CHART_TITLE))?;
//!     Ok(())
//! }
//! ```

pub mod chart;
pub mod data;
pub mod error;

// Re-export commonly used types
pub use chart::{MoveChartRenderer, CHART_TITLE};
pub use data::{Observation, ObservationSet};
pub use error::{ChartError, DataError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default input dataset file name
pub const DEFAULT_INPUT: &str = "ToS_MMM.csv";
