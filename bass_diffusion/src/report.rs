//! Plain-text reporting of a fitted Bass model

use crate::data::SalesData;
use crate::error::{BassError, Result};
use crate::metrics::{forecast_accuracy, ForecastAccuracy};
use crate::models::bass::COEFFICIENT_NAMES;
use crate::models::{BassParameters, RegressionResult};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Layout and precision of text reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    /// Width of the `=` separator lines
    pub width: usize,
    /// Decimals for `p` and `q`
    pub parameter_precision: usize,
    /// Decimals for `m`
    pub market_precision: usize,
    /// Decimals for the predicted peak period
    pub peak_precision: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            width: 78,
            parameter_precision: 5,
            market_precision: 3,
            peak_precision: 3,
        }
    }
}

impl ReportConfig {
    /// Set the separator width
    pub fn with_width(mut self, width: usize) -> Result<Self> {
        if width < LABEL_WIDTH {
            return Err(BassError::InvalidParameter(format!(
                "Report width must be at least {}",
                LABEL_WIDTH
            )));
        }
        self.width = width;
        Ok(self)
    }

    /// Set decimals for `p`, `q` and `m`
    pub fn with_precision(mut self, parameters: usize, market: usize) -> Self {
        self.parameter_precision = parameters;
        self.market_precision = market;
        self
    }
}

const LABEL_WIDTH: usize = 40;

/// Predicted vs observed peak of adoption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakComparison {
    /// `ln(q/p)/(p+q)`, absent when undefined for the fitted parameters
    pub predicted: Option<f64>,
    /// 0-based index of the largest observed sales
    pub actual_index: Option<usize>,
    /// 1-based time index of the largest observed sales
    pub actual_time: Option<usize>,
    /// Period label of the largest observed sales
    pub actual_label: Option<String>,
}

impl PeakComparison {
    /// Compare the analytic peak of `params` with the observed peak of `data`
    pub fn new(params: &BassParameters, data: &SalesData) -> Self {
        Self {
            predicted: params.peak_time().ok(),
            actual_index: data.peak_index(),
            actual_time: data.peak_time(),
            actual_label: data.peak_period().map(str::to_string),
        }
    }
}

/// Everything the reporter prints about one fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    pub source_name: String,
    pub regression: RegressionResult,
    pub parameters: BassParameters,
    pub peak: PeakComparison,
    /// In-sample accuracy of the Bass curve, absent for empty data
    pub accuracy: Option<ForecastAccuracy>,
}

impl FitSummary {
    /// Assemble a summary, evaluating the fitted curve against `data`
    pub fn new(
        data: &SalesData,
        regression: RegressionResult,
        parameters: BassParameters,
    ) -> Result<Self> {
        let accuracy = if data.is_empty() {
            None
        } else {
            let forecast = parameters.forecast(&data.time_index())?;
            Some(forecast_accuracy(forecast.sales(), data.sales())?)
        };

        Ok(Self {
            source_name: data.source_name().to_string(),
            peak: PeakComparison::new(&parameters, data),
            regression,
            parameters,
            accuracy,
        })
    }

    /// Serialize the summary to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Formats fit summaries as text
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    config: ReportConfig,
}

impl Reporter {
    /// Create a reporter
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    fn rule(&self, c: char) -> String {
        c.to_string().repeat(self.config.width)
    }

    /// Regression table followed by the fitted Bass parameters
    pub fn summary(&self, summary: &FitSummary) -> Result<String> {
        let mut out = String::new();
        self.write_regression(&mut out, &summary.regression)?;
        self.write_parameters(&mut out, &summary.parameters)?;
        Ok(out)
    }

    /// Predicted and observed peak periods
    pub fn peak_periods(&self, peak: &PeakComparison) -> Result<String> {
        let predicted = match peak.predicted {
            Some(t) => format!("{:.*}", self.config.peak_precision, t),
            None => "undefined".to_string(),
        };
        let actual = match (peak.actual_time, peak.actual_index, &peak.actual_label) {
            (Some(t), Some(index), Some(label)) => {
                format!("{} (period {}, index {})", t, label, index)
            }
            _ => "n/a".to_string(),
        };

        let mut out = String::new();
        writeln!(out, "{}", self.rule('='))?;
        writeln!(
            out,
            "{:<w$}{}",
            "Predicted peak sales period: ",
            predicted,
            w = LABEL_WIDTH
        )?;
        writeln!(
            out,
            "{:<w$}{}",
            "Actual peak sales period: ",
            actual,
            w = LABEL_WIDTH
        )?;
        writeln!(out, "{}", self.rule('='))?;
        Ok(out)
    }

    /// Summary, peak comparison and in-sample accuracy
    pub fn full_report(&self, summary: &FitSummary) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "Bass model for '{}'\n", summary.source_name)?;
        out.push_str(&self.summary(summary)?);
        out.push_str(&self.peak_periods(&summary.peak)?);
        if let Some(accuracy) = &summary.accuracy {
            writeln!(out)?;
            write!(out, "{}", accuracy)?;
        }
        Ok(out)
    }

    fn write_regression(&self, out: &mut String, regression: &RegressionResult) -> Result<()> {
        let diag = regression.diagnostics();
        let title = "OLS Regression Results";
        writeln!(out, "{:^w$}", title, w = self.config.width)?;
        writeln!(out, "{}", self.rule('='))?;

        let stat_rows: [(&str, String, &str, String); 6] = [
            (
                "Dep. Variable:",
                "sales".to_string(),
                "R-squared:",
                fmt_opt(diag.and_then(|d| d.r_squared)),
            ),
            (
                "No. Observations:",
                diag.map_or("n/a".to_string(), |d| d.nobs.to_string()),
                "Adj. R-squared:",
                fmt_opt(diag.and_then(|d| d.adj_r_squared)),
            ),
            (
                "Df Residuals:",
                diag.map_or("n/a".to_string(), |d| d.df_resid.to_string()),
                "F-statistic:",
                fmt_opt(diag.and_then(|d| d.f_statistic)),
            ),
            (
                "Df Model:",
                diag.map_or("n/a".to_string(), |d| d.df_model.to_string()),
                "Prob (F-statistic):",
                fmt_opt(diag.and_then(|d| d.f_pvalue)),
            ),
            (
                "Log-Likelihood:",
                fmt_opt(diag.and_then(|d| d.log_likelihood)),
                "AIC:",
                fmt_opt(diag.and_then(|d| d.aic)),
            ),
            (
                "Durbin-Watson:",
                fmt_opt(diag.and_then(|d| d.durbin_watson)),
                "BIC:",
                fmt_opt(diag.and_then(|d| d.bic)),
            ),
        ];
        for (l1, v1, l2, v2) in stat_rows.iter() {
            writeln!(out, "{:<20}{:>16}   {:<22}{:>16}", l1, v1, l2, v2)?;
        }
        writeln!(out, "{}", self.rule('='))?;

        let level = diag.map_or(0.95, |d| d.confidence_level);
        let lower = format!("[{:.3}", (1.0 - level) / 2.0);
        let upper = format!("{:.3}]", 1.0 - (1.0 - level) / 2.0);
        writeln!(
            out,
            "{:<18}{:>11}{:>11}{:>9}{:>8}{:>11}{:>11}",
            "", "coef", "std err", "t", "P>|t|", lower, upper
        )?;
        writeln!(out, "{}", self.rule('-'))?;

        for (i, (name, estimate)) in COEFFICIENT_NAMES
            .iter()
            .zip(regression.coefficients())
            .enumerate()
        {
            let stats = diag.and_then(|d| d.coefficients.get(i));
            writeln!(
                out,
                "{:<18}{:>11}{:>11}{:>9}{:>8}{:>11}{:>11}",
                name,
                fmt_num(estimate),
                fmt_opt(stats.and_then(|s| s.std_error)),
                fmt_short(stats.and_then(|s| s.t_value)),
                fmt_short(stats.and_then(|s| s.p_value)),
                fmt_opt(stats.and_then(|s| s.conf_int).map(|ci| ci.0)),
                fmt_opt(stats.and_then(|s| s.conf_int).map(|ci| ci.1)),
            )?;
        }
        Ok(())
    }

    fn write_parameters(&self, out: &mut String, params: &BassParameters) -> Result<()> {
        let precision = self.config.parameter_precision;
        writeln!(out, "{}", self.rule('='))?;
        writeln!(out)?;
        writeln!(
            out,
            "{:<w$}{:.*}",
            "Coefficient of Innovation (p): ",
            precision,
            params.p,
            w = LABEL_WIDTH
        )?;
        writeln!(
            out,
            "{:<w$}{:.*}",
            "Coefficient of Imitation (q): ",
            precision,
            params.q,
            w = LABEL_WIDTH
        )?;
        writeln!(
            out,
            "{:<w$}{:.*}",
            "Max Adopters (m): ",
            self.config.market_precision,
            params.m,
            w = LABEL_WIDTH
        )?;
        writeln!(out, "{}", self.rule('='))?;
        Ok(())
    }
}

/// Fixed notation for moderate magnitudes, scientific otherwise
fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return "nan".to_string();
    }
    let abs = v.abs();
    if abs == 0.0 || (1e-3..1e7).contains(&abs) {
        format!("{:.4}", v)
    } else {
        format!("{:.3e}", v)
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(|| "nan".to_string(), fmt_num)
}

fn fmt_short(v: Option<f64>) -> String {
    v.map_or_else(|| "nan".to_string(), |x| format!("{:.3}", x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_formatting() {
        assert_eq!(fmt_num(12.5), "12.5000");
        assert_eq!(fmt_num(0.0), "0.0000");
        assert_eq!(fmt_num(-2.5e-5), "-2.500e-5");
        assert_eq!(fmt_opt(None), "nan");
        assert_eq!(fmt_short(Some(0.04321)), "0.043");
    }

    #[test]
    fn test_width_validation() {
        assert!(ReportConfig::default().with_width(10).is_err());
        assert_eq!(ReportConfig::default().with_width(60).unwrap().width, 60);
    }
}
