//! # Bass Diffusion
//!
//! Estimate the Bass diffusion model from historical sales and forecast
//! adoption.
//!
//! ## Features
//!
//! - Two-column sales loading from `.csv` (comma) or `.txt` (tab) files
//! - Cumulative-sales features and the quadratic OLS regression
//! - Inversion of the regression into market size `m`, innovation `p` and
//!   imitation `q`
//! - Bass density forecasts, cumulative forecasts and the analytic peak period
//! - Text reports and chart rendering through a pluggable [`render::ChartRenderer`]
//! - Synthetic adoption series for experiments
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bass_diffusion::{BassModel, Reporter};
//!
//! let mut model = BassModel::from_path("sales.csv")?;
//! model.fit()?;
//! let params = model.predict()?;
//! println!("m = {:.1}, p = {:.4}, q = {:.4}", params.m, params.p, params.q);
//!
//! let forecast = model.forecast()?;
//! println!("{:?}", forecast.cumulative());
//! println!("{}", model.report(&Reporter::default())?);
//! # Ok::<(), bass_diffusion::BassError>(())
//! ```

pub mod data;
pub mod error;
pub mod forecast;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod simulate;

// Re-export commonly used types
pub use crate::data::{DataLoader, Delimiter, LoaderOptions, SalesData};
pub use crate::error::{BassError, Result};
pub use crate::forecast::{bass_density, forecast, predicted_peak_period, ForecastSeries};
pub use crate::models::{
    BassEstimator, BassParameters, DiffusionModel, RegressionResult, TrainedDiffusionModel,
};
pub use crate::pipeline::BassModel;
pub use crate::report::{FitSummary, ReportConfig, Reporter};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
