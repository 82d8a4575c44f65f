//! Closed-form Bass diffusion curve
//!
//! Contains:
//! - The adoption-rate density `f(t)`
//! - The cumulative adoption share `F(t)`
//! - The time of peak adoption
//! - Real roots of the quadratic used to recover the market size

use crate::{MathError, Result};

fn check_innovation(p: f64) -> Result<()> {
    if p == 0.0 {
        return Err(MathError::DomainError(
            "Coefficient of innovation p must be non-zero".to_string(),
        ));
    }
    Ok(())
}

/// Instantaneous adoption rate of the Bass model at time `t`.
///
/// `f(t) = ((p+q)²/p) · e^{-(p+q)t} / (1 + (q/p)·e^{-(p+q)t})²`
pub fn bass_density(p: f64, q: f64, t: f64) -> Result<f64> {
    check_innovation(p)?;

    let decay = (-(p + q) * t).exp();
    let denominator = 1.0 + (q / p) * decay;
    Ok(((p + q).powi(2) / p) * decay / denominator.powi(2))
}

/// Share of the market that has adopted by time `t`.
///
/// `F(t) = (1 - e^{-(p+q)t}) / (1 + (q/p)·e^{-(p+q)t})`
pub fn bass_cdf(p: f64, q: f64, t: f64) -> Result<f64> {
    check_innovation(p)?;

    let decay = (-(p + q) * t).exp();
    Ok((1.0 - decay) / (1.0 + (q / p) * decay))
}

/// Time at which the Bass density reaches its maximum, `ln(q/p) / (p+q)`.
pub fn peak_time(p: f64, q: f64) -> Result<f64> {
    let ratio = q / p;
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(MathError::DomainError(format!(
            "ln(q/p) is undefined for p = {}, q = {}",
            p, q
        )));
    }

    Ok(ratio.ln() / (p + q))
}

/// Real roots of `quadratic·x² + linear·x + constant = 0`.
///
/// Roots are returned in the order `(-b + √Δ) / 2a`, `(-b - √Δ) / 2a`.
pub fn quadratic_roots(quadratic: f64, linear: f64, constant: f64) -> Result<(f64, f64)> {
    if !(quadratic.is_finite() && linear.is_finite() && constant.is_finite()) {
        return Err(MathError::InvalidInput(
            "Quadratic coefficients must be finite".to_string(),
        ));
    }
    if quadratic == 0.0 {
        return Err(MathError::DomainError(
            "Leading coefficient is zero, quadratic is degenerate".to_string(),
        ));
    }

    let discriminant = linear * linear - 4.0 * constant * quadratic;
    if discriminant < 0.0 {
        return Err(MathError::DomainError(format!(
            "Negative discriminant ({:.6e}), no real root",
            discriminant
        )));
    }

    let sqrt_disc = discriminant.sqrt();
    Ok((
        (-linear + sqrt_disc) / (2.0 * quadratic),
        (-linear - sqrt_disc) / (2.0 * quadratic),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_density_at_zero() {
        // f(0) = (p+q)² / p / (1 + q/p)² = p
        let f0 = bass_density(0.03, 0.38, 0.0).unwrap();
        assert_relative_eq!(f0, 0.03, epsilon = 1e-12);
    }

    #[test]
    fn test_density_is_derivative_of_cdf() {
        let (p, q) = (0.03, 0.38);
        let h = 1e-5;
        for t in [1.0, 4.0, 9.5] {
            let numeric =
                (bass_cdf(p, q, t + h).unwrap() - bass_cdf(p, q, t - h).unwrap()) / (2.0 * h);
            assert_relative_eq!(bass_density(p, q, t).unwrap(), numeric, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_zero_innovation_is_rejected() {
        assert!(matches!(bass_density(0.0, 0.4, 1.0), Err(MathError::DomainError(_))));
        assert!(matches!(bass_cdf(0.0, 0.4, 1.0), Err(MathError::DomainError(_))));
    }

    #[test]
    fn test_peak_time() {
        let peak = peak_time(0.03, 0.4).unwrap();
        assert_relative_eq!(peak, (0.4f64 / 0.03).ln() / 0.43, epsilon = 1e-12);
        assert!((peak - 6.0239).abs() < 1e-3);

        assert!(peak_time(-0.03, 0.4).is_err());
        assert!(peak_time(0.0, 0.4).is_err());
        assert!(peak_time(0.03, 0.0).is_err());
    }

    #[test]
    fn test_peak_time_maximises_density() {
        let (p, q) = (0.02, 0.5);
        let peak = peak_time(p, q).unwrap();
        let at_peak = bass_density(p, q, peak).unwrap();
        assert!(at_peak > bass_density(p, q, peak - 0.1).unwrap());
        assert!(at_peak > bass_density(p, q, peak + 0.1).unwrap());
    }

    #[test]
    fn test_quadratic_roots() {
        // x² - 3x + 2 = (x - 1)(x - 2)
        let (r1, r2) = quadratic_roots(1.0, -3.0, 2.0).unwrap();
        assert_relative_eq!(r1, 2.0);
        assert_relative_eq!(r2, 1.0);

        assert!(matches!(
            quadratic_roots(1.0, 0.0, 1.0),
            Err(MathError::DomainError(_))
        ));
        assert!(matches!(
            quadratic_roots(0.0, 1.0, 1.0),
            Err(MathError::DomainError(_))
        ));
        assert!(matches!(
            quadratic_roots(f64::NAN, 1.0, 1.0),
            Err(MathError::InvalidInput(_))
        ));
    }
}
