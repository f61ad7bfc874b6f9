use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

use bmikit_batch::export;

#[derive(Parser)]
#[command(
    name = "batch-csv",
    about = "Classify a CSV of measurements and export the result table"
)]
struct Args {
    /// Input CSV with columns Name, Age, Gender, Height(cm), Weight(kg)
    input: PathBuf,
    /// Output CSV path
    #[arg(long, default_value = "bmi_results.csv")]
    out_csv: PathBuf,
    /// Output workbook path
    #[arg(long, default_value = "bmi_results.xlsx")]
    out_xlsx: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    log4rs::init_file("log4rs.yml", Default::default())?;
    let args = Args::parse();

    let report = bmikit_batch::process_file(&args.input)?;
    for error in &report.errors {
        warn!("{}", error);
    }
    for count in &report.summary.categories {
        info!("{:?}: {}", count.category, count.count);
    }
    if let Some(mean_bmi) = report.summary.mean_bmi {
        info!("Mean BMI: {:.2}", mean_bmi);
    }

    export::write_csv_file(&report.rows, &args.out_csv)?;
    export::write_workbook(&report.rows, &args.out_xlsx)?;
    info!(
        "Run {}: wrote {} and {}",
        report.run_id,
        args.out_csv.display(),
        args.out_xlsx.display()
    );

    Ok(())
}
