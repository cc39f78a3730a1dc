use super::{read_table, write_table};
use crate::cli::{ConvertArgs, FractionKind};
use crate::error::Result;
use msmpr::core::models::distribution::{NumberFractions, VolumeFractions};
use msmpr::engine::fractions::FractionConverter;
use tracing::info;

pub fn run(args: ConvertArgs) -> Result<()> {
    let converter = FractionConverter::new();
    let rows = match args.to {
        FractionKind::Volume => {
            info!("Reading number fractions from {:?}", &args.input);
            let number: NumberFractions = read_table(&args.input)?;
            let volume = converter.number_to_volume_fraction(&number)?;
            write_table(&volume, &args.output)?;
            volume.len()
        }
        FractionKind::Number => {
            info!("Reading volume fractions from {:?}", &args.input);
            let volume: VolumeFractions = read_table(&args.input)?;
            let number = converter.volume_to_number_fraction(&volume)?;
            write_table(&number, &args.output)?;
            number.len()
        }
    };
    println!(
        "Converted {} size classes into '{}'.",
        rows,
        args.output.display()
    );
    Ok(())
}
