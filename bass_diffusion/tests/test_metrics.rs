use approx::assert_relative_eq;
use bass_diffusion::metrics::forecast_accuracy;
use bass_diffusion::BassError;

#[test]
fn test_forecast_accuracy() {
    let forecast = [10.0, 20.0, 30.0, 40.0];
    let actual = [12.0, 18.0, 30.0, 44.0];

    let accuracy = forecast_accuracy(&forecast, &actual).unwrap();

    // errors: 2, -2, 0, 4
    assert_relative_eq!(accuracy.mae, 2.0, epsilon = 1e-12);
    assert_relative_eq!(accuracy.mse, 6.0, epsilon = 1e-12);
    assert_relative_eq!(accuracy.rmse, 6.0_f64.sqrt(), epsilon = 1e-12);

    let expected_mape = (2.0 / 12.0 + 2.0 / 18.0 + 0.0 + 4.0 / 44.0) * 100.0 / 4.0;
    assert_relative_eq!(accuracy.mape, expected_mape, epsilon = 1e-9);

    let expected_smape = (200.0 * 2.0 / 22.0 + 200.0 * 2.0 / 38.0 + 0.0 + 200.0 * 4.0 / 84.0) / 4.0;
    assert_relative_eq!(accuracy.smape, expected_smape, epsilon = 1e-9);
}

#[test]
fn test_mape_skips_zero_sales() {
    let accuracy = forecast_accuracy(&[1.0, 11.0], &[0.0, 10.0]).unwrap();
    assert_relative_eq!(accuracy.mape, 10.0, epsilon = 1e-12);
}

#[test]
fn test_perfect_forecast() {
    let values = [3.0, 4.0, 5.0];
    let accuracy = forecast_accuracy(&values, &values).unwrap();
    assert_eq!(accuracy.mae, 0.0);
    assert_eq!(accuracy.smape, 0.0);
}

#[test]
fn test_accuracy_input_validation() {
    assert!(matches!(
        forecast_accuracy(&[1.0, 2.0], &[1.0]),
        Err(BassError::InvalidParameter(_))
    ));
    assert!(forecast_accuracy(&[], &[]).is_err());
}

#[test]
fn test_accuracy_display() {
    let accuracy = forecast_accuracy(&[1.0], &[2.0]).unwrap();
    let text = accuracy.to_string();
    assert!(text.starts_with("Forecast Accuracy Metrics:"));
    assert!(text.contains("MAE:   1.0000"));
}
