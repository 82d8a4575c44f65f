//! Diffusion models estimated from sales data

use crate::data::SalesData;
use crate::error::Result;
use crate::forecast::ForecastSeries;
use std::fmt::Debug;

pub mod bass;

pub use bass::{BassEstimator, BassParameters, RegressionResult, TrainedBass};

/// Trained diffusion model
pub trait TrainedDiffusionModel: Debug {
    /// Fitted Bass parameters
    fn parameters(&self) -> &BassParameters;

    /// Forecast `horizon` periods past the training data
    fn forecast(&self, horizon: usize) -> Result<ForecastSeries>;

    /// In-sample forecast over the time index of `data`
    fn predict(&self, data: &SalesData) -> Result<ForecastSeries>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Diffusion model that can be trained on sales data
pub trait DiffusionModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedDiffusionModel;

    /// Train the model on sales data
    fn train(&self, data: &SalesData) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}
