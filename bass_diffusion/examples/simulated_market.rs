use bass_diffusion::metrics::forecast_accuracy;
use bass_diffusion::models::{BassEstimator, DiffusionModel, TrainedDiffusionModel};
use bass_diffusion::simulate::{density_sales, with_noise};
use bass_diffusion::{BassParameters, SalesData};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let truth = BassParameters::new(1000.0, 0.03, 0.38)?;
    let clean = density_sales(&truth, 20)?;

    let estimator = BassEstimator::new();
    println!("Model: {}", estimator.name());
    println!("Generating parameters: m = 1000, p = 0.03, q = 0.38\n");

    for noise in [0.0, 0.02, 0.05, 0.10] {
        let mut rng = StdRng::seed_from_u64(42);
        let sales = with_noise(&clean, noise, &mut rng)?;
        let data = SalesData::from_sales(sales)?;

        let trained = match estimator.train(&data) {
            Ok(trained) => trained,
            Err(e) => {
                println!("noise {:>4.0}%: fit failed: {}", noise * 100.0, e);
                continue;
            }
        };
        let params = trained.parameters();
        let fitted = trained.predict(&data)?;
        let accuracy = forecast_accuracy(fitted.sales(), data.sales())?;

        println!(
            "noise {:>4.0}%: m = {:>8.2}, p = {:.4}, q = {:.4}, RMSE = {:.3}",
            noise * 100.0,
            params.m,
            params.p,
            params.q,
            accuracy.rmse
        );
    }

    // Extend the noise-free fit past the observed window
    let trained = estimator.train(&SalesData::from_sales(clean)?)?;
    let ahead = trained.forecast(10)?;
    println!("\nNext 10 periods:");
    for (t, s) in ahead.time_index().iter().zip(ahead.sales()) {
        println!("t = {:>2}: {:.2}", t, s);
    }

    Ok(())
}
