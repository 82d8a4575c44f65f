//! Ordinary least squares with an intercept term
//!
//! The design matrix is column-scaled and solved through its singular value
//! decomposition, which keeps regressors of very different magnitude (a
//! series next to its square) well conditioned. Inference statistics follow
//! the classical homoskedastic OLS formulas.

use crate::{MathError, Result};
use nalgebra::{linalg::SVD, DMatrix, DVector, Dyn};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

const RANK_TOLERANCE: f64 = 1e-10;

/// Estimate and inference statistics for a single coefficient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientStats {
    /// Point estimate
    pub estimate: f64,
    /// Standard error, absent when there are no residual degrees of freedom
    pub std_error: Option<f64>,
    /// t statistic
    pub t_value: Option<f64>,
    /// Two-sided p-value of the t statistic
    pub p_value: Option<f64>,
    /// Confidence interval at the regression's confidence level
    pub conf_int: Option<(f64, f64)>,
}

/// Result of an OLS fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OlsFit {
    /// Intercept first, then one entry per regressor in input order
    pub coefficients: Vec<CoefficientStats>,
    pub fitted_values: Vec<f64>,
    pub residuals: Vec<f64>,
    pub nobs: usize,
    pub df_model: usize,
    pub df_resid: usize,
    /// Sum of squared residuals
    pub ssr: f64,
    pub r_squared: Option<f64>,
    pub adj_r_squared: Option<f64>,
    pub f_statistic: Option<f64>,
    pub f_pvalue: Option<f64>,
    pub log_likelihood: Option<f64>,
    pub aic: Option<f64>,
    pub bic: Option<f64>,
    pub durbin_watson: Option<f64>,
    pub confidence_level: f64,
}

impl OlsFit {
    /// Point estimates in coefficient order
    pub fn estimates(&self) -> Vec<f64> {
        self.coefficients.iter().map(|c| c.estimate).collect()
    }
}

/// OLS estimator `y = β₀ + β₁x₁ + … + βₖxₖ + ε`
#[derive(Debug, Clone)]
pub struct OlsRegression {
    confidence_level: f64,
}

impl Default for OlsRegression {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
        }
    }
}

impl OlsRegression {
    /// Create a regression with 95% confidence intervals
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the confidence level used for coefficient intervals
    pub fn with_confidence_level(mut self, level: f64) -> Result<Self> {
        if !(level > 0.0 && level < 1.0) {
            return Err(MathError::InvalidInput(
                "Confidence level must be between 0 and 1 (exclusive)".to_string(),
            ));
        }
        self.confidence_level = level;
        Ok(self)
    }

    /// Get the confidence level
    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Fit `response` on `regressors` plus an intercept
    pub fn fit(&self, response: &[f64], regressors: &[&[f64]]) -> Result<OlsFit> {
        let n = response.len();
        let k = regressors.len() + 1;

        if let Some(bad) = regressors.iter().position(|r| r.len() != n) {
            return Err(MathError::InvalidInput(format!(
                "Regressor {} has {} values, response has {}",
                bad,
                regressors[bad].len(),
                n
            )));
        }
        if n < k {
            return Err(MathError::InsufficientData(format!(
                "{} observations cannot identify {} coefficients",
                n, k
            )));
        }
        if response
            .iter()
            .chain(regressors.iter().flat_map(|r| r.iter()))
            .any(|v| !v.is_finite())
        {
            return Err(MathError::InvalidInput(
                "Regression inputs must be finite".to_string(),
            ));
        }

        let (x, scales) = design_matrix(regressors, n)?;
        let y = DVector::from_column_slice(response);

        let svd = x.clone().svd(true, true);
        let tolerance = RANK_TOLERANCE * svd.singular_values.max();
        let rank = svd.rank(tolerance);
        if rank < k {
            return Err(MathError::SingularMatrix(format!(
                "Design matrix has rank {}, {} coefficients requested",
                rank, k
            )));
        }
        let scaled_beta = svd
            .solve(&y, tolerance)
            .map_err(|e| MathError::SingularMatrix(e.to_string()))?;

        let fitted = &x * &scaled_beta;
        let residuals: Vec<f64> = (&y - &fitted).iter().copied().collect();
        let fitted_values: Vec<f64> = fitted.iter().copied().collect();
        let beta: Vec<f64> = scaled_beta
            .iter()
            .zip(scales.iter())
            .map(|(b, s)| b / s)
            .collect();

        let ssr: f64 = residuals.iter().map(|e| e * e).sum();
        let df_model = k - 1;
        let df_resid = n - k;

        let unscaled_variance = inverse_gram_diagonal(&svd)?;
        let coefficients =
            self.coefficient_stats(&beta, &unscaled_variance, &scales, ssr, df_resid)?;
        let summary = GoodnessOfFit::compute(response, &residuals, ssr, df_model, df_resid)?;

        Ok(OlsFit {
            coefficients,
            fitted_values,
            residuals,
            nobs: n,
            df_model,
            df_resid,
            ssr,
            r_squared: summary.r_squared,
            adj_r_squared: summary.adj_r_squared,
            f_statistic: summary.f_statistic,
            f_pvalue: summary.f_pvalue,
            log_likelihood: summary.log_likelihood,
            aic: summary.aic,
            bic: summary.bic,
            durbin_watson: summary.durbin_watson,
            confidence_level: self.confidence_level,
        })
    }

    fn coefficient_stats(
        &self,
        beta: &[f64],
        unscaled_variance: &[f64],
        scales: &[f64],
        ssr: f64,
        df_resid: usize,
    ) -> Result<Vec<CoefficientStats>> {
        let bare = |estimate: f64| CoefficientStats {
            estimate,
            std_error: None,
            t_value: None,
            p_value: None,
            conf_int: None,
        };

        if df_resid == 0 {
            return Ok(beta.iter().map(|&b| bare(b)).collect());
        }

        let sigma2 = ssr / df_resid as f64;
        let students = StudentsT::new(0.0, 1.0, df_resid as f64)
            .map_err(|e| MathError::CalculationError(e.to_string()))?;
        let t_crit = students.inverse_cdf(1.0 - (1.0 - self.confidence_level) / 2.0);

        let stats = beta
            .iter()
            .enumerate()
            .map(|(j, &estimate)| {
                let std_error = (sigma2 * unscaled_variance[j]).sqrt() / scales[j];

                if std_error > 0.0 && std_error.is_finite() {
                    let t_value = estimate / std_error;
                    let p_value = 2.0 * (1.0 - students.cdf(t_value.abs()));
                    CoefficientStats {
                        estimate,
                        std_error: Some(std_error),
                        t_value: Some(t_value),
                        p_value: Some(p_value.clamp(0.0, 1.0)),
                        conf_int: Some((
                            estimate - t_crit * std_error,
                            estimate + t_crit * std_error,
                        )),
                    }
                } else {
                    CoefficientStats {
                        std_error: Some(std_error),
                        ..bare(estimate)
                    }
                }
            })
            .collect();

        Ok(stats)
    }
}

/// Design matrix with a leading column of ones, each regressor divided by
/// its largest absolute value; returns the matrix and the column scales.
fn design_matrix(regressors: &[&[f64]], n: usize) -> Result<(DMatrix<f64>, Vec<f64>)> {
    let mut scales = Vec::with_capacity(regressors.len() + 1);
    scales.push(1.0);
    for (j, column) in regressors.iter().enumerate() {
        let scale = column.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
        if scale == 0.0 {
            return Err(MathError::SingularMatrix(format!(
                "Regressor {} is identically zero",
                j
            )));
        }
        scales.push(scale);
    }

    let x = DMatrix::from_fn(n, scales.len(), |i, j| {
        if j == 0 {
            1.0
        } else {
            regressors[j - 1][i] / scales[j]
        }
    });
    Ok((x, scales))
}

/// `diag((XᵀX)⁻¹) = Σᵢ V[j,i]² / σᵢ²`
fn inverse_gram_diagonal(svd: &SVD<f64, Dyn, Dyn>) -> Result<Vec<f64>> {
    let v_t = svd.v_t.as_ref().ok_or_else(|| {
        MathError::CalculationError("Singular value decomposition is missing Vᵀ".to_string())
    })?;

    Ok((0..v_t.ncols())
        .map(|j| {
            svd.singular_values
                .iter()
                .enumerate()
                .map(|(i, s)| (v_t[(i, j)] / s).powi(2))
                .sum::<f64>()
        })
        .collect())
}

struct GoodnessOfFit {
    r_squared: Option<f64>,
    adj_r_squared: Option<f64>,
    f_statistic: Option<f64>,
    f_pvalue: Option<f64>,
    log_likelihood: Option<f64>,
    aic: Option<f64>,
    bic: Option<f64>,
    durbin_watson: Option<f64>,
}

impl GoodnessOfFit {
    fn compute(
        response: &[f64],
        residuals: &[f64],
        ssr: f64,
        df_model: usize,
        df_resid: usize,
    ) -> Result<Self> {
        let n = response.len() as f64;
        let mean = response.iter().sum::<f64>() / n;
        let tss: f64 = response.iter().map(|y| (y - mean).powi(2)).sum();
        let n_params = (df_model + 1) as f64;

        let r_squared = (tss > 0.0).then(|| 1.0 - ssr / tss);
        let adj_r_squared = r_squared
            .filter(|_| df_resid > 0)
            .map(|r2| 1.0 - (1.0 - r2) * (n - 1.0) / df_resid as f64);

        let (f_statistic, f_pvalue) = if df_resid > 0 && df_model > 0 && ssr > 0.0 {
            let f = ((tss - ssr) / df_model as f64) / (ssr / df_resid as f64);
            let dist = FisherSnedecor::new(df_model as f64, df_resid as f64)
                .map_err(|e| MathError::CalculationError(e.to_string()))?;
            (Some(f), Some((1.0 - dist.cdf(f.max(0.0))).clamp(0.0, 1.0)))
        } else {
            (None, None)
        };

        let log_likelihood = (ssr > 0.0).then(|| {
            -n / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (ssr / n).ln() + 1.0)
        });
        let aic = log_likelihood.map(|llf| -2.0 * llf + 2.0 * n_params);
        let bic = log_likelihood.map(|llf| -2.0 * llf + n_params * n.ln());

        let durbin_watson = (ssr > 0.0).then(|| {
            residuals
                .windows(2)
                .map(|w| (w[1] - w[0]).powi(2))
                .sum::<f64>()
                / ssr
        });

        Ok(Self {
            r_squared,
            adj_r_squared,
            f_statistic,
            f_pvalue,
            log_likelihood,
            aic,
            bic,
            durbin_watson,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simple_line() {
        // y = 2 + 3x
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [2.0, 5.0, 8.0, 11.0];
        let fit = OlsRegression::new().fit(&y, &[&x]).unwrap();

        assert_relative_eq!(fit.coefficients[0].estimate, 2.0, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficients[1].estimate, 3.0, epsilon = 1e-10);
        assert!(fit.ssr < 1e-18);
        assert_relative_eq!(fit.r_squared.unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_noisy_line_statistics() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [1.1, 1.9, 3.2, 3.8, 5.1, 5.9];
        let fit = OlsRegression::new().fit(&y, &[&x]).unwrap();

        // Reference values from the closed-form simple regression
        let slope = fit.coefficients[1];
        assert_relative_eq!(slope.estimate, 17.1 / 17.5, epsilon = 1e-12);
        assert_relative_eq!(fit.coefficients[0].estimate, 0.08, epsilon = 1e-12);
        assert_eq!(fit.df_resid, 4);
        assert_eq!(fit.df_model, 1);

        let se = slope.std_error.unwrap();
        let sxx = 17.5;
        assert_relative_eq!(se, (fit.ssr / 4.0 / sxx).sqrt(), epsilon = 1e-12);

        let (lo, hi) = slope.conf_int.unwrap();
        assert!(lo < slope.estimate && slope.estimate < hi);
        assert!(slope.p_value.unwrap() < 1e-4);
        assert!(fit.f_pvalue.unwrap() < 1e-4);
        // F equals t² with a single regressor
        assert_relative_eq!(
            fit.f_statistic.unwrap(),
            slope.t_value.unwrap().powi(2),
            max_relative = 1e-9
        );
        assert!(fit.durbin_watson.unwrap() > 0.0);
    }

    #[test]
    fn test_quadratic_regressors_of_different_scale() {
        let x: Vec<f64> = (1..=8).map(|i| 1000.0 * i as f64).collect();
        let x2: Vec<f64> = x.iter().map(|v| v * v).collect();
        let y: Vec<f64> = x.iter().map(|v| 50.0 + 0.4 * v - 2.5e-5 * v * v).collect();

        let fit = OlsRegression::new().fit(&y, &[&x, &x2]).unwrap();
        let beta = fit.estimates();
        assert_relative_eq!(beta[0], 50.0, max_relative = 1e-8);
        assert_relative_eq!(beta[1], 0.4, max_relative = 1e-8);
        assert_relative_eq!(beta[2], -2.5e-5, max_relative = 1e-8);
    }

    #[test]
    fn test_cumulative_sales_design() {
        let sales = [100.0, 200.0, 400.0, 300.0, 150.0];
        let cumsales = vec![100.0, 300.0, 700.0, 1000.0, 1150.0];
        let cumsales_sq: Vec<f64> = cumsales.iter().map(|v| v * v).collect();

        let fit = OlsRegression::new().fit(&sales, &[&cumsales, &cumsales_sq]).unwrap();
        let beta = fit.estimates();
        assert_relative_eq!(beta[0], -43.9253799491, max_relative = 1e-8);
        assert_relative_eq!(beta[1], 1.25497358294, max_relative = 1e-8);
        assert_relative_eq!(beta[2], -9.3014154e-4, max_relative = 1e-6);
        assert!(fit.coefficients.iter().all(|c| c.std_error.unwrap() > 0.0));
    }

    #[test]
    fn test_exact_fit_has_no_inference() {
        let x = [1.0, 2.0, 4.0];
        let x2 = [1.0, 4.0, 16.0];
        let y = [3.0, 5.0, 4.0];
        let fit = OlsRegression::new().fit(&y, &[&x, &x2]).unwrap();

        assert_eq!(fit.df_resid, 0);
        assert!(fit.residuals.iter().all(|e| e.abs() < 1e-9));
        assert!(fit.coefficients.iter().all(|c| c.std_error.is_none()));
        assert!(fit.adj_r_squared.is_none());
        assert!(fit.f_statistic.is_none());
    }

    #[test]
    fn test_insufficient_and_singular() {
        let err = OlsRegression::new()
            .fit(&[1.0, 2.0], &[&[1.0, 2.0], &[1.0, 4.0]])
            .unwrap_err();
        assert!(matches!(err, MathError::InsufficientData(_)));

        let err = OlsRegression::new()
            .fit(&[1.0, 2.0, 3.0], &[&[0.0, 0.0, 0.0]])
            .unwrap_err();
        assert!(matches!(err, MathError::SingularMatrix(_)));

        // Second regressor duplicates the first
        let x = [1.0, 2.0, 3.0, 4.0];
        let err = OlsRegression::new()
            .fit(&[1.0, 3.0, 2.0, 5.0], &[&x, &x])
            .unwrap_err();
        assert!(matches!(err, MathError::SingularMatrix(_)));
    }

    #[test]
    fn test_input_validation() {
        assert!(OlsRegression::new().with_confidence_level(1.0).is_err());
        assert!(OlsRegression::new().with_confidence_level(0.9).is_ok());

        let err = OlsRegression::new()
            .fit(&[1.0, 2.0, 3.0], &[&[1.0, 2.0]])
            .unwrap_err();
        assert!(matches!(err, MathError::InvalidInput(_)));

        let err = OlsRegression::new()
            .fit(&[1.0, f64::NAN, 3.0], &[&[1.0, 2.0, 3.0]])
            .unwrap_err();
        assert!(matches!(err, MathError::InvalidInput(_)));
    }
}
