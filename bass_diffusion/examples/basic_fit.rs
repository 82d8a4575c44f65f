use bass_diffusion::render::TextChartRenderer;
use bass_diffusion::{BassModel, Reporter};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let csv_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("examples")
        .join("csv")
        .join("product_sales.csv");

    println!("Loading data from: {}", csv_path.display());
    let mut model = BassModel::from_path(&csv_path)?;
    println!("Loaded {} periods", model.data().len());

    model.fit()?;
    let params = model.predict()?;
    println!(
        "m = {:.1}, p = {:.4}, q = {:.4}",
        params.m, params.p, params.q
    );

    match model.predicted_peak_period() {
        Ok(t) => println!("Predicted peak at t = {:.2}", t),
        Err(e) => println!("No predicted peak: {}", e),
    }

    println!("{}", model.report(&Reporter::default())?);

    let charts = model.render_charts(&TextChartRenderer::default())?;
    for chart in &charts {
        println!("{}", chart);
    }

    // Machine-readable copy of the results
    println!("{}", model.summary()?.to_json()?);

    Ok(())
}
