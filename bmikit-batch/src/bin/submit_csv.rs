use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

#[derive(Parser)]
#[command(
    name = "submit-csv",
    about = "Submit a CSV of measurements to a running classification service"
)]
struct Args {
    /// Input CSV with columns Name, Age, Gender, Height(cm), Weight(kg)
    input: PathBuf,
    /// Base URL of the classification service
    #[arg(long, default_value = "http://localhost:8080")]
    url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    log4rs::init_file("log4rs.yml", Default::default())?;
    let args = Args::parse();

    let file = File::open(&args.input)?;
    let client = bmikit_client::create(args.url);
    let outcome = bmikit_batch::submit_reader(BufReader::new(file), &client).await?;

    for error in &outcome.rejected {
        warn!("{}", error);
    }
    for result in &outcome.results {
        info!("{:.2} ({:?})", result.bmi, result.category);
    }
    info!(
        "Classified {} rows, {} rejected locally",
        outcome.results.len(),
        outcome.rejected.len()
    );

    Ok(())
}
