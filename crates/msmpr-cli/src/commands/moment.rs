use super::read_table;
use crate::cli::MomentArgs;
use crate::error::Result;
use msmpr::core::models::distribution::DensityFunctionSample;
use msmpr::engine::moments::MomentCalculator;
use tracing::info;

pub fn run(args: MomentArgs) -> Result<f64> {
    info!("Reading population density from {:?}", &args.input);
    let sample: DensityFunctionSample = read_table(&args.input)?;
    let value = MomentCalculator::new().moment_of(&sample, args.order)?;
    println!("Moment of order {}: {:e}", args.order, value);
    Ok(value)
}
