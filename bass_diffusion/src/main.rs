use bass_diffusion::render::TextChartRenderer;
use bass_diffusion::{BassModel, Reporter};
use clap::Parser;
use log::debug;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "bass_diffusion")]
#[command(about = "Estimate a Bass diffusion model from historical sales", long_about = None)]
struct Cli {
    /// Sales file with a header row: .csv (comma separated) or .txt (tab separated)
    file: PathBuf,
}

fn run(path: &Path) -> bass_diffusion::Result<()> {
    let mut model = BassModel::from_path(path)?;
    println!("{}\n", model);

    model.fit()?;
    model.predict()?;

    let reporter = Reporter::default();
    println!("{}", model.report(&reporter)?);

    for chart in model.render_charts(&TextChartRenderer::default())? {
        println!("{}", chart);
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(&cli.file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Pipeline failed: {:?}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
