//! One dataset moving through load, fit, predict and forecast

use crate::data::{DataLoader, SalesData};
use crate::error::{BassError, Result};
use crate::forecast::ForecastSeries;
use crate::models::{BassEstimator, BassParameters, RegressionResult};
use crate::render::{Chart, ChartRenderer};
use crate::report::{FitSummary, PeakComparison, Reporter};
use std::fmt;
use std::path::Path;

/// Bass model bound to a single dataset.
///
/// Stages run in order; `fit` and `predict` replace earlier results rather
/// than mutating them.
#[derive(Debug, Clone)]
pub struct BassModel {
    data: SalesData,
    estimator: BassEstimator,
    regression: Option<RegressionResult>,
    parameters: Option<BassParameters>,
}

impl BassModel {
    /// Wrap an already loaded dataset
    pub fn new(data: SalesData) -> Self {
        Self {
            data,
            estimator: BassEstimator::new(),
            regression: None,
            parameters: None,
        }
    }

    /// Load a `.csv` or `.txt` file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(DataLoader::from_path(path)?))
    }

    /// Use a differently configured estimator
    pub fn with_estimator(mut self, estimator: BassEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Underlying dataset
    pub fn data(&self) -> &SalesData {
        &self.data
    }

    /// Latest regression, if fitted
    pub fn regression(&self) -> Option<&RegressionResult> {
        self.regression.as_ref()
    }

    /// Latest parameters, if predicted
    pub fn parameters(&self) -> Option<&BassParameters> {
        self.parameters.as_ref()
    }

    /// Run the regression; clears previously predicted parameters
    pub fn fit(&mut self) -> Result<&RegressionResult> {
        let regression = self.estimator.fit(&self.data)?;
        self.parameters = None;
        let stored: &RegressionResult = self.regression.insert(regression);
        Ok(stored)
    }

    /// Derive `(m, p, q)` from the latest regression
    pub fn predict(&mut self) -> Result<BassParameters> {
        let regression = self.regression.as_ref().ok_or_else(not_fitted)?;
        let parameters = self.estimator.predict(regression)?;
        self.parameters = Some(parameters);
        Ok(parameters)
    }

    fn fitted_parameters(&self) -> Result<&BassParameters> {
        self.parameters.as_ref().ok_or_else(not_fitted)
    }

    /// In-sample forecast over the observed periods
    pub fn forecast(&self) -> Result<ForecastSeries> {
        self.fitted_parameters()?.forecast(&self.data.time_index())
    }

    /// `ln(q/p)/(p+q)` for the fitted parameters
    pub fn predicted_peak_period(&self) -> Result<f64> {
        self.fitted_parameters()?.peak_time()
    }

    /// Predicted vs observed peak
    pub fn peak_comparison(&self) -> Result<PeakComparison> {
        Ok(PeakComparison::new(self.fitted_parameters()?, &self.data))
    }

    /// Collected results for reporting
    pub fn summary(&self) -> Result<FitSummary> {
        let regression = self.regression.clone().ok_or_else(not_fitted)?;
        FitSummary::new(&self.data, regression, *self.fitted_parameters()?)
    }

    /// Text report of the fit
    pub fn report(&self, reporter: &Reporter) -> Result<String> {
        reporter.full_report(&self.summary()?)
    }

    /// Render the forecast-vs-actual and cumulative charts
    pub fn render_charts(&self, renderer: &dyn ChartRenderer) -> Result<Vec<String>> {
        let forecast = self.forecast()?;
        [
            Chart::forecast_vs_actual(&self.data, &forecast),
            Chart::cumulative_forecast(&self.data, &forecast),
        ]
        .iter()
        .map(|chart| renderer.render(chart))
        .collect()
    }

    /// Debug-style representation, `BassModel(filename='name')`
    pub fn repr(&self) -> String {
        format!("BassModel(filename='{}')", self.data.source_name())
    }
}

fn not_fitted() -> BassError {
    BassError::InvalidParameter("Model has not been fitted; call fit() then predict()".to_string())
}

impl fmt::Display for BassModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BassModel instance for '{}'", self.data.source_name())
    }
}
