//! Bass curve evaluation and adoption forecasts

use crate::error::{BassError, Result};
use crate::models::BassParameters;
use serde::{Deserialize, Serialize};

/// Forecast sales and cumulative adoption over a time index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    /// Time points the forecast was evaluated at
    time_index: Vec<f64>,
    /// Forecast sales per period, `m · f(t)`
    sales: Vec<f64>,
    /// Running sum of the forecast sales
    cumulative: Vec<f64>,
}

impl ForecastSeries {
    /// Create a series from time points and per-period sales
    pub fn new(time_index: Vec<f64>, sales: Vec<f64>) -> Result<Self> {
        if time_index.len() != sales.len() {
            return Err(BassError::InvalidParameter(format!(
                "Time index length ({}) doesn't match sales length ({})",
                time_index.len(),
                sales.len()
            )));
        }

        let cumulative = sales
            .iter()
            .scan(0.0, |total, &s| {
                *total += s;
                Some(*total)
            })
            .collect();

        Ok(Self {
            time_index,
            sales,
            cumulative,
        })
    }

    /// Time points
    pub fn time_index(&self) -> &[f64] {
        &self.time_index
    }

    /// Forecast sales per period
    pub fn sales(&self) -> &[f64] {
        &self.sales
    }

    /// Cumulative forecast sales
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Number of forecast periods
    pub fn len(&self) -> usize {
        self.sales.len()
    }

    /// Check if the forecast is empty
    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    /// Serialize the series to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Bass adoption-rate density at time `t`
pub fn bass_density(p: f64, q: f64, t: f64) -> Result<f64> {
    Ok(bass_math::bass_density(p, q, t)?)
}

/// Bass density evaluated at every point of `time_index`
pub fn bass_density_series(p: f64, q: f64, time_index: &[f64]) -> Result<Vec<f64>> {
    time_index.iter().map(|&t| bass_density(p, q, t)).collect()
}

/// Cumulative adoption share at time `t`
pub fn bass_cdf(p: f64, q: f64, t: f64) -> Result<f64> {
    Ok(bass_math::bass_cdf(p, q, t)?)
}

/// Forecast sales `m · f(t)` and their running sum
pub fn forecast(m: f64, p: f64, q: f64, time_index: &[f64]) -> Result<ForecastSeries> {
    let sales = bass_density_series(p, q, time_index)?
        .into_iter()
        .map(|f| m * f)
        .collect();
    ForecastSeries::new(time_index.to_vec(), sales)
}

/// Forecast `horizon` periods following `observed` training periods
pub fn forecast_horizon(
    params: &BassParameters,
    observed: usize,
    horizon: usize,
) -> Result<ForecastSeries> {
    let time_index: Vec<f64> = (observed + 1..=observed + horizon)
        .map(|t| t as f64)
        .collect();
    params.forecast(&time_index)
}

/// Time of peak adoption, `ln(q/p) / (p+q)`
pub fn predicted_peak_period(p: f64, q: f64) -> Result<f64> {
    Ok(bass_math::peak_time(p, q)?)
}
